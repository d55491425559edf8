pub mod bootstrap;
pub mod cookies;
pub mod jwt;
pub mod password;
pub mod providers;
pub mod tokens;
mod types;

pub use types::{AdminRole, Claims, EditorRole, OtpPurpose, RequiredRole, Role, SuperAdminRole};
