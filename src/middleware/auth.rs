use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::{
    auth::{cookies::ACCESS_COOKIE, jwt::decode_token},
    state::AppState,
};

/// Marks a request whose token was present but did not verify.
#[derive(Debug, Clone, Copy)]
pub struct RejectedToken;

/// Bearer header first, then the `token` cookie.
pub fn access_token_from(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }
    CookieJar::from_headers(headers)
        .get(ACCESS_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

/// Decodes the access token when one is sent and never rejects; guards decide.
pub async fn attach_claims(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Some(token) = access_token_from(req.headers()) {
        match decode_token(&state.jwt, &token) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
            }
            Err(_) => {
                req.extensions_mut().insert(RejectedToken);
            }
        }
    }
    next.run(req).await
}
