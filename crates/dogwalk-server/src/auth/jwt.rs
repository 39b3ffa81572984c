//! JWT token issuance and validation.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};

use dogwalk_core::api::email_for;

use super::claims::{Claims, USER_ROLE};

/// Why a presented token was refused.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid token")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

/// Issues and verifies HMAC-signed session tokens.
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl JwtManager {
    /// Create a new `JwtManager` with the given secret and token lifetime.
    pub fn new(secret: &[u8], ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl_secs,
        }
    }

    /// Issue a session token for `username`.
    pub fn issue(&self, username: &str) -> Result<(String, Claims), jsonwebtoken::errors::Error> {
        let now = now_secs();
        let claims = Claims {
            jti: uuid::Uuid::new_v4().to_string(),
            sub: username.to_string(),
            username: username.to_string(),
            email: email_for(username),
            roles: vec![USER_ROLE.to_string()],
            iat: now,
            exp: now + self.ttl_secs,
        };

        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok((token, claims))
    }

    /// Check signature and expiry and return the embedded claims.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e),
            })
    }
}

fn now_secs() -> i64 {
    #[allow(clippy::cast_possible_wrap)]
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;
    secs
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_jwt() -> JwtManager {
        JwtManager::new(b"test-secret-key-for-testing", 3600)
    }

    #[test]
    fn issue_and_validate_token() {
        let jwt = test_jwt();
        let (token, issued) = jwt.issue("alice").unwrap();
        assert_eq!(issued.exp - issued.iat, 3600);

        let claims = jwt.validate(&token).unwrap();
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.roles, vec![USER_ROLE.to_string()]);
    }

    #[test]
    fn invalid_token_fails_validation() {
        let jwt = test_jwt();
        assert!(matches!(
            jwt.validate("not-a-valid-token"),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn wrong_secret_fails_validation() {
        let jwt1 = test_jwt();
        let jwt2 = JwtManager::new(b"different-secret", 3600);

        let (token, _) = jwt1.issue("alice").unwrap();
        assert!(matches!(jwt2.validate(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let jwt = JwtManager::new(b"test-secret-key-for-testing", -60);
        let (token, _) = jwt.issue("alice").unwrap();
        assert!(matches!(jwt.validate(&token), Err(TokenError::Expired)));
    }
}
