use axum::http::{HeaderMap, header::AUTHORIZATION};

/// Pulls the bearer credential out of the Authorization header. Returns None
/// for a missing header, a non-Bearer scheme, or an empty token.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|value| {
            let trimmed = value.trim_start();
            if trimmed.len() >= 7 && trimmed[..7].eq_ignore_ascii_case("bearer ") {
                Some(trimmed[7..].trim())
            } else {
                None
            }
        })
        .filter(|token| !token.is_empty())
}
