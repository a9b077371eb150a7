use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::{debug, warn};

use super::auth::SessionUser;
use crate::config::GateConfig;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Static assets and internal paths, never gated.
    Bypass,
    Allow,
    /// Redirect to the sign-in page.
    Deny,
}

/// Page-level gate. Only the presence of a session is checked here; roles and
/// permissions are enforced by the API handlers themselves.
pub fn decide(gate: &GateConfig, path: &str, has_session: bool) -> GateDecision {
    if is_excluded(gate, path) {
        return GateDecision::Bypass;
    }
    if is_api_path(gate, path) || has_session || is_public_path(gate, path) {
        GateDecision::Allow
    } else {
        GateDecision::Deny
    }
}

fn is_excluded(gate: &GateConfig, path: &str) -> bool {
    gate.excluded_files.iter().any(|file| file == path)
        || gate.excluded_prefixes.iter().any(|prefix| path.starts_with(prefix.as_str()))
}

fn is_api_path(gate: &GateConfig, path: &str) -> bool {
    path.strip_prefix(gate.api_prefix.as_str())
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

fn is_public_path(gate: &GateConfig, path: &str) -> bool {
    let trimmed = if path.len() > 1 { path.trim_end_matches('/') } else { path };
    gate.public_paths.iter().any(|public| public == trimmed)
}

/// Sign-in location carrying the originally requested path.
pub fn sign_in_location(gate: &GateConfig, original: &str) -> String {
    let callback: String = url::form_urlencoded::byte_serialize(original.as_bytes()).collect();
    format!("{}?callbackUrl={}", gate.sign_in_path, callback)
}

pub async fn gate_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let gate = &state.config.gate;
    let path = request.uri().path();
    let has_session = request.extensions().get::<SessionUser>().is_some();

    match decide(gate, path, has_session) {
        GateDecision::Bypass | GateDecision::Allow => next.run(request).await,
        GateDecision::Deny => {
            let original = request
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or(path);
            warn!("No session for {}, redirecting to sign-in", path);
            let location = sign_in_location(gate, original);
            debug!("Gate redirect -> {}", location);
            Redirect::temporary(&location).into_response()
        }
    }
}
