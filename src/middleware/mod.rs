pub mod auth;
pub mod error_detail;
pub mod response;

pub use auth::{extract_bearer, require_admin, AuthUser};
pub use error_detail::expose_error_detail;
pub use response::ApiSuccess;
