//! Error taxonomy for the set-color endpoint.
//! Every failure is turned into an HTTP response at the top of the handler;
//! nothing propagates past it.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum SetColorError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Unauthorized")]
    Unauthorized,

    /// A required secret, token or repository coordinate is not configured.
    #[error("Server misconfigured: {0}")]
    ServerMisconfigured(&'static str),

    #[error("{0}")]
    BadRequest(&'static str),

    /// Upstream body is surfaced verbatim.
    #[error("Fetch file failed: {0}")]
    UpstreamFetch(String),

    #[error("Commit failed: {0}")]
    UpstreamCommit(String),

    /// Anything unexpected: malformed stored JSON, bad base64, transport errors.
    #[error("Server error")]
    Server(#[from] anyhow::Error),
}

impl SetColorError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::ServerMisconfigured(_)
            | Self::UpstreamFetch(_)
            | Self::UpstreamCommit(_)
            | Self::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SetColorError {
    fn into_response(self) -> Response {
        if let Self::Server(cause) = &self {
            error!(error = ?cause, "set-color failed with an unhandled fault");
        }
        (self.status(), self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(SetColorError::MethodNotAllowed.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(SetColorError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(SetColorError::BadRequest("Missing color").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            SetColorError::ServerMisconfigured("ADMIN_SECRET not set").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            SetColorError::UpstreamCommit("409".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_server_error_hides_cause() {
        let err = SetColorError::from(anyhow::anyhow!("expected value at line 1 column 1"));
        assert_eq!(err.to_string(), "Server error");
    }

    #[test]
    fn test_upstream_body_is_surfaced() {
        let err = SetColorError::UpstreamFetch("{\"message\":\"404 File Not Found\"}".into());
        assert_eq!(err.to_string(), "Fetch file failed: {\"message\":\"404 File Not Found\"}");
    }
}
