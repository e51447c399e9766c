//! Signed session tokens (HS256 JWT).
//!
//! Expiry is checked against the caller's clock rather than the library's,
//! so every path is deterministic under test.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::{AuthError, AuthUser};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub owner_id: String,
    pub email: String,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn user(&self) -> AuthUser {
        AuthUser {
            owner_id: self.owner_id.clone(),
            email: self.email.clone(),
            username: self.username.clone(),
        }
    }
}

pub fn sign(user: &AuthUser, secret: &str, now_secs: i64, ttl_secs: i64) -> Result<String, AuthError> {
    let claims = Claims {
        owner_id: user.owner_id.clone(),
        email: user.email.clone(),
        username: user.username.clone(),
        iat: now_secs,
        exp: now_secs + ttl_secs,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::Token(e.to_string()))
}

/// Decode and check a token. `None` for a bad signature, a malformed token
/// or one that expired at or before `now_secs`.
pub fn verify(token: &str, secret: &str, now_secs: i64) -> Option<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;

    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation).ok()?;
    if data.claims.exp <= now_secs {
        return None;
    }
    Some(data.claims)
}
