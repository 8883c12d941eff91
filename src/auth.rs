//! Shared-secret bearer authentication.

use crate::error::SetColorError;

const BEARER_PREFIX: &str = "bearer ";

/// Pulls the token out of an `Authorization: Bearer <token>` header value.
/// The scheme is matched case-insensitively and the token is trimmed.
pub fn bearer_token(header: &str) -> Option<&str> {
    let header = header.trim_start();
    let prefix = header.get(..BEARER_PREFIX.len())?;
    if !prefix.eq_ignore_ascii_case(BEARER_PREFIX) {
        return None;
    }
    let token = header[BEARER_PREFIX.len()..].trim();
    (!token.is_empty()).then_some(token)
}

/// Checks the caller's `Authorization` header against the configured secret.
pub fn authorize(header: Option<&str>, secret: Option<&str>) -> Result<(), SetColorError> {
    let secret = secret
        .filter(|s| !s.is_empty())
        .ok_or(SetColorError::ServerMisconfigured("ADMIN_SECRET not set"))?;

    match header.and_then(bearer_token) {
        Some(token) if token == secret => Ok(()),
        _ => Err(SetColorError::Unauthorized),
    }
}
