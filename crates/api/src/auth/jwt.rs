//! Access tokens.
//!
//! A token is an HS256 JWT over [`Claims`], handed out by `/auth/token` once
//! a confirmation code checks out. There are no refresh tokens: when one
//! expires the client exchanges its code again.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::Error as JwtError;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use yamdb_core::roles::Role;
use yamdb_core::types::DbId;

/// Token lifetime used when `JWT_ACCESS_EXPIRY_MINS` is unset.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 24 * 60;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Account id.
    pub sub: DbId,
    pub username: String,
    /// Role when the token was issued. Requests re-read the live role.
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

impl Claims {
    fn for_account(user_id: DbId, username: &str, role: Role, ttl: Duration) -> Self {
        let issued = Utc::now();
        Self {
            sub: user_id,
            username: username.to_owned(),
            role,
            iat: issued.timestamp(),
            exp: (issued + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }
}

/// Signing secret and token lifetime.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
}

impl JwtConfig {
    /// Read `JWT_SECRET` (required, non-empty) and `JWT_ACCESS_EXPIRY_MINS`.
    ///
    /// # Panics
    ///
    /// On a missing or empty secret, or an expiry that is not an integer.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_default();
        assert!(!secret.is_empty(), "JWT_SECRET must be set to a non-empty value");

        let access_token_expiry_mins = match std::env::var("JWT_ACCESS_EXPIRY_MINS") {
            Ok(raw) => raw
                .parse()
                .expect("JWT_ACCESS_EXPIRY_MINS must be a whole number of minutes"),
            Err(_) => DEFAULT_ACCESS_EXPIRY_MINS,
        };

        Self {
            secret,
            access_token_expiry_mins,
        }
    }

    fn ttl(&self) -> Duration {
        Duration::minutes(self.access_token_expiry_mins)
    }
}

/// Sign an access token for an account.
pub fn generate_access_token(
    user_id: DbId,
    username: &str,
    role: Role,
    config: &JwtConfig,
) -> Result<String, JwtError> {
    let claims = Claims::for_account(user_id, username, role, config.ttl());
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Check signature and expiry and return the claims.
pub fn validate_token(token: &str, config: &JwtConfig) -> Result<Claims, JwtError> {
    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
}
