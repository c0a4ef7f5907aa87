pub mod access;
pub mod auth;

pub use access::AccessScope;
pub use auth::{AuthService, Claims};
