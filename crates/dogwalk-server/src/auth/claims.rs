//! JWT claims structure for Dogwalk sessions.

use serde::{Deserialize, Serialize};

/// The only role this system grants.
pub const USER_ROLE: &str = "user";

/// JWT claims embedded in session tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// JWT ID (unique per token).
    pub jti: String,
    /// Subject (the username).
    pub sub: String,
    pub username: String,
    /// Synthetic address derived from the username.
    pub email: String,
    pub roles: Vec<String>,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
}
