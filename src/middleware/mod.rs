pub mod auth;
pub mod gate;
pub mod response;

pub use auth::{extract_session_token, session_middleware, SessionUser};
pub use gate::{decide, gate_middleware, GateDecision};
pub use response::{ApiResponse, ApiResult};
