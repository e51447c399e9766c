//! Accounts: sign-up, login, session restore and logout.

pub mod form;
pub mod jar;
pub mod render;
pub mod token;
pub mod validate;

use thiserror::Error;

use crate::config::AppConfig;
use crate::store::leaderboard::FALLBACK_USERNAME;
use crate::store::{NewAccount, Store, StoreError};
use crate::time::to_datetime;

use jar::TokenJar;

/// Every variant's `Display` is the message shown to the player.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Invalid(&'static str),
    #[error("Username already taken")]
    UsernameTaken,
    #[error("Email already registered")]
    EmailTaken,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Could not secure password: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("Could not sign session: {0}")]
    Token(String),
    #[error("Could not reach the frog archive: {0}")]
    Store(#[from] StoreError),
}

/// The signed-in player.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub owner_id: String,
    pub email: String,
    pub username: String,
}

fn now_secs(now_ms: f64) -> i64 {
    (now_ms / 1000.0).floor() as i64
}

fn issue(user: &AuthUser, jar: &mut dyn TokenJar, config: &AppConfig, now_ms: f64) -> Result<(), AuthError> {
    let token = token::sign(user, &config.jwt_secret, now_secs(now_ms), config.token_ttl_secs())?;
    jar.set(&token, config.cookie_days);
    Ok(())
}

pub fn sign_up(
    store: &mut dyn Store,
    jar: &mut dyn TokenJar,
    config: &AppConfig,
    email: &str,
    username: &str,
    password: &str,
    now_ms: f64,
) -> Result<AuthUser, AuthError> {
    let input = validate::sign_up(email, username, password)?;

    if store.find_profile_by_username(&input.username)?.is_some() {
        return Err(AuthError::UsernameTaken);
    }
    if store.find_auth_by_email(&input.email)?.is_some() {
        return Err(AuthError::EmailTaken);
    }

    let password_hash = bcrypt::hash(&input.password, config.bcrypt_cost)?;
    let user = AuthUser {
        owner_id: uuid::Uuid::new_v4().to_string(),
        email: input.email,
        username: input.username,
    };
    store.create_account(NewAccount {
        owner_id: user.owner_id.clone(),
        email: user.email.clone(),
        username: user.username.clone(),
        password_hash,
        created_at: to_datetime(now_ms),
    })?;

    issue(&user, jar, config, now_ms)?;
    crate::console::log(&format!("signed up {}", user.username));
    Ok(user)
}

pub fn login(
    store: &mut dyn Store,
    jar: &mut dyn TokenJar,
    config: &AppConfig,
    email: &str,
    password: &str,
    now_ms: f64,
) -> Result<AuthUser, AuthError> {
    let input = validate::login(email, password)?;

    let record = store
        .find_auth_by_email(&input.email)?
        .ok_or(AuthError::InvalidCredentials)?;
    // a corrupt hash is indistinguishable from a wrong password
    if !bcrypt::verify(&input.password, &record.password_hash).unwrap_or(false) {
        return Err(AuthError::InvalidCredentials);
    }

    let username = store
        .find_profile_by_owner(&record.owner_id)?
        .map_or_else(|| FALLBACK_USERNAME.to_string(), |p| p.username);
    store.touch_login(&record.owner_id, to_datetime(now_ms))?;

    let user = AuthUser {
        owner_id: record.owner_id,
        email: input.email,
        username,
    };
    issue(&user, jar, config, now_ms)?;
    Ok(user)
}

/// Restore the session from the jar. An invalid or expired token is removed.
pub fn current_user(jar: &mut dyn TokenJar, config: &AppConfig, now_ms: f64) -> Option<AuthUser> {
    let token = jar.get()?;
    match token::verify(&token, &config.jwt_secret, now_secs(now_ms)) {
        Some(claims) => Some(claims.user()),
        None => {
            crate::console::log("session token rejected, signing out");
            jar.clear();
            None
        }
    }
}

pub fn logout(jar: &mut dyn TokenJar) {
    jar.clear();
}

#[cfg(test)]
mod tests {
    use super::jar::MemoryJar;
    use super::*;
    use crate::store::memory::MemoryStore;

    const PW: &str = "Swamp!Lantern9";
    const NOW: f64 = 1_700_000_000_000.0;

    fn config() -> AppConfig {
        AppConfig {
            // minimum work factor keeps tests fast
            bcrypt_cost: 4,
            ..AppConfig::default()
        }
    }

    fn signed_up() -> (MemoryStore, MemoryJar, AuthUser) {
        let mut store = MemoryStore::new();
        let mut jar = MemoryJar::new();
        let user = sign_up(&mut store, &mut jar, &config(), "Lily@Pond.io", "Ribbit", PW, NOW).unwrap();
        (store, jar, user)
    }

    #[test]
    fn sign_up_creates_account_and_session() {
        let (store, mut jar, user) = signed_up();
        assert_eq!(user.email, "lily@pond.io");
        assert_eq!(user.username, "ribbit");
        assert!(store.stats(&user.owner_id).unwrap().is_some());

        let auth = store.find_auth_by_email("lily@pond.io").unwrap().unwrap();
        assert_ne!(auth.password_hash, PW);
        assert_eq!(current_user(&mut jar, &config(), NOW + 1_000.0), Some(user));
    }

    #[test]
    fn sign_up_rejects_taken_username_then_email() {
        let (mut store, mut jar, _) = signed_up();
        let err = sign_up(&mut store, &mut jar, &config(), "other@pond.io", "ribbit", PW, NOW).unwrap_err();
        assert_eq!(err.to_string(), "Username already taken");
        let err = sign_up(&mut store, &mut jar, &config(), "lily@pond.io", "croaker", PW, NOW).unwrap_err();
        assert_eq!(err.to_string(), "Email already registered");
    }

    #[test]
    fn sign_up_surfaces_validation_message() {
        let mut store = MemoryStore::new();
        let mut jar = MemoryJar::new();
        let err = sign_up(&mut store, &mut jar, &config(), "lily@pond.io", "ribbit", "short", NOW).unwrap_err();
        assert_eq!(err.to_string(), "Password must be at least 12 characters");
        assert!(jar.get().is_none());
    }

    #[test]
    fn login_with_correct_password() {
        let (mut store, _, user) = signed_up();
        let mut jar = MemoryJar::new();
        let later = NOW + 60_000.0;
        let logged_in = login(&mut store, &mut jar, &config(), " LILY@pond.io ", PW, later).unwrap();
        assert_eq!(logged_in, user);
        assert!(jar.get().is_some());
        let auth = store.find_auth_by_email("lily@pond.io").unwrap().unwrap();
        assert_eq!(auth.last_login_at, Some(to_datetime(later)));
    }

    #[test]
    fn login_failures_share_one_message() {
        let (mut store, mut jar, _) = signed_up();
        let wrong = login(&mut store, &mut jar, &config(), "lily@pond.io", "Wrong!Password1", NOW).unwrap_err();
        let unknown = login(&mut store, &mut jar, &config(), "nobody@pond.io", PW, NOW).unwrap_err();
        assert_eq!(wrong.to_string(), "Invalid credentials");
        assert_eq!(unknown.to_string(), "Invalid credentials");
    }

    #[test]
    fn login_without_profile_falls_back_to_frogling() {
        let mut store = MemoryStore::from_tables(crate::store::memory::Tables {
            auths: vec![crate::store::AuthRecord {
                email: "lily@pond.io".into(),
                password_hash: bcrypt::hash(PW, 4).unwrap(),
                owner_id: "o1".into(),
                created_at: to_datetime(0.0),
                last_login_at: None,
            }],
            ..Default::default()
        });
        let mut jar = MemoryJar::new();
        let user = login(&mut store, &mut jar, &config(), "lily@pond.io", PW, NOW).unwrap();
        assert_eq!(user.username, "frogling");
    }

    #[test]
    fn expired_session_is_cleared() {
        let (_, mut jar, _) = signed_up();
        let eight_days = 8.0 * 86_400_000.0;
        assert!(current_user(&mut jar, &config(), NOW + eight_days).is_none());
        assert!(jar.get().is_none());
    }

    #[test]
    fn foreign_token_is_cleared() {
        let mut jar = MemoryJar::new();
        jar.set("garbage.token.value", 7);
        assert!(current_user(&mut jar, &config(), NOW).is_none());
        assert!(jar.get().is_none());
    }

    #[test]
    fn logout_clears_session() {
        let (_, mut jar, _) = signed_up();
        logout(&mut jar);
        assert!(current_user(&mut jar, &config(), NOW).is_none());
    }
}
