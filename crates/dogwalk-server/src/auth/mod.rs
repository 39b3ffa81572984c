//! Authentication for the Dogwalk API server.
//!
//! Stateless bearer tokens: the signed JWT is the whole session.

pub mod claims;
pub mod jwt;
pub mod middleware;

pub use claims::Claims;
pub use jwt::JwtManager;
pub use middleware::require_bearer;
