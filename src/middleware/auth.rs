use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use tracing::debug;

use crate::auth::{decode_session_token, Claims};
use crate::state::AppState;

/// Identity attached to requests that carry a valid session token
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionUser {
    pub user_id: String,
    pub role: Option<String>,
    pub email: Option<String>,
}

impl From<Claims> for SessionUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            role: claims.role.filter(|r| !r.trim().is_empty()),
            email: claims.email,
        }
    }
}

/// Decodes the session token when one is present and injects `SessionUser`.
///
/// Never rejects: missing or invalid tokens just leave the request anonymous,
/// and the gate or the handler decides what that means.
pub async fn session_middleware(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let security = &state.config.security;

    if let Some(token) = extract_session_token(request.headers(), &security.session_cookie) {
        match decode_session_token(&token, security) {
            Ok(claims) => {
                let session = SessionUser::from(claims);
                debug!("Session present for user {}", session.user_id);
                request.extensions_mut().insert(session);
            }
            Err(e) => debug!("Ignoring session token: {}", e),
        }
    }

    next.run(request).await
}

/// Session cookie first, then `Authorization: Bearer`.
pub fn extract_session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    cookie_token(headers, cookie_name).or_else(|| bearer_token(headers))
}

fn cookie_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == cookie_name && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_str = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}
