//! Authorization header parsing

/// Token from an `Authorization: Bearer <token>` value. The scheme is matched
/// case-insensitively; an empty token yields `None`.
pub fn extract_bearer(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
