// handlers/api/roles.rs - GET /api/roles/current handler

use axum::{
    extract::{Extension, State},
    response::Json,
};
use serde::Serialize;

use crate::middleware::SessionUser;
use crate::roles::{ResolvedRole, RoleError};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CurrentRoleResponse {
    pub success: bool,
    #[serde(flatten)]
    pub resolved: ResolvedRole,
}

/// GET /api/roles/current - Effective role, permissions and module access
///
/// Expected Output:
/// ```json
/// {
///   "success": true,
///   "role": { "slug": "reservation", "name": "Reservation", "nameBn": "...", "source": "store" },
///   "permissions": ["booking.view", "..."],
///   "moduleAccess": ["dashboard", "bookings"]
/// }
/// ```
///
/// 401 without a session; 500 when the role store cannot be read. Both
/// failures still carry empty `permissions` and `moduleAccess` arrays.
pub async fn current_role_get(
    State(state): State<AppState>,
    session: Option<Extension<SessionUser>>,
) -> Result<Json<CurrentRoleResponse>, RoleError> {
    let session = session.map(|Extension(user)| user);
    let resolved = state.roles.resolve(session.as_ref()).await?;

    Ok(Json(CurrentRoleResponse {
        success: true,
        resolved,
    }))
}
