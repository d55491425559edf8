pub mod auth;
pub mod guards;
pub mod json_error;
pub mod panic;

pub use auth::attach_claims;
pub use guards::{AdminGuard, AuthGuard, AuthRoleGuard, EditorGuard, OptionalClaims, SuperAdminGuard};
pub use json_error::json_error_middleware;
pub use panic::catch_panic_layer;
