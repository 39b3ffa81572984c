//! Bearer-token gate for protected routes.

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use crate::error::ServerError;
use crate::state::AppState;

/// Pull the token out of `Authorization: Bearer <token>`. The scheme is
/// matched case-insensitively and surrounding whitespace is ignored.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Reject the request with 401 unless it carries a valid, unexpired token.
/// On success the decoded [`Claims`](super::Claims) are placed in the
/// request extensions.
pub async fn require_bearer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ServerError> {
    if !req.headers().contains_key(AUTHORIZATION) {
        return Err(ServerError::unauthorized("No token provided"));
    }

    let token = bearer_token(req.headers())
        .ok_or_else(|| ServerError::unauthorized("Invalid token"))?;

    let claims = state.jwt.validate(token).map_err(|e| {
        debug!(error = %e, "Rejected bearer token");
        ServerError::unauthorized(e.to_string())
    })?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(&headers("bearer   abc ")), Some("abc"));
    }

    #[test]
    fn rejects_other_schemes_and_empty_tokens() {
        assert_eq!(bearer_token(&headers("Basic dXNlcg==")), None);
        assert_eq!(bearer_token(&headers("Bearer")), None);
        assert_eq!(bearer_token(&headers("Bearer    ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
