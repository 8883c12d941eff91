//! Request body validation.

use serde_json::Value;

use crate::error::SetColorError;

/// Parses the raw body and extracts a non-empty string `color`.
/// An empty body counts as a missing color.
pub fn parse_color(body: &[u8]) -> Result<String, SetColorError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(SetColorError::BadRequest("Missing color"));
    }

    let payload: Value =
        serde_json::from_slice(body).map_err(|_| SetColorError::BadRequest("Invalid JSON body"))?;

    match payload.get("color") {
        Some(Value::String(color)) if !color.is_empty() => Ok(color.clone()),
        _ => Err(SetColorError::BadRequest("Missing color")),
    }
}
