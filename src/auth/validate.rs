//! Field rules for the sign-up and login forms.
//!
//! Each check returns the first failing rule as an [`AuthError::Invalid`]
//! carrying the message shown to the player.

use validator::ValidateEmail;

use super::AuthError;

pub const EMAIL_MAX: usize = 254;
pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 20;
pub const PASSWORD_MIN: usize = 12;
pub const PASSWORD_MAX: usize = 128;

/// Normalized sign-up fields.
#[derive(Debug, Clone, PartialEq)]
pub struct SignUpInput {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

fn invalid(msg: &'static str) -> AuthError {
    AuthError::Invalid(msg)
}

/// Trim, lowercase and check an email address.
pub fn email(raw: &str) -> Result<String, AuthError> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return Err(invalid("Email is required"));
    }
    if email.chars().count() > EMAIL_MAX {
        return Err(invalid("Email is too long"));
    }
    if !email.is_ascii() {
        return Err(invalid("Email must be ASCII only"));
    }
    if !looks_like_email(&email) {
        return Err(invalid("Please enter a valid email address"));
    }
    Ok(email)
}

/// RFC-style address check plus an alphabetic top-level domain of at least
/// two letters, so `frog@pond` and `frog@pond.12` are rejected.
fn looks_like_email(s: &str) -> bool {
    if !s.to_owned().validate_email() {
        return false;
    }
    let Some((_, domain)) = s.rsplit_once('@') else {
        return false;
    };
    domain.rsplit_once('.').is_some_and(|(_, tld)| {
        tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
    })
}

/// Trim, lowercase and check a username.
pub fn username(raw: &str) -> Result<String, AuthError> {
    let name = raw.trim().to_lowercase();
    let len = name.chars().count();
    if len < USERNAME_MIN {
        return Err(invalid("Username must be at least 3 characters"));
    }
    if len > USERNAME_MAX {
        return Err(invalid("Username must be at most 20 characters"));
    }
    let charset_ok = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if !charset_ok
        || name.starts_with('_')
        || name.ends_with('_')
        || name.contains("__")
        || name.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid(
            "Username must be lowercase letters, numbers, underscores; no leading/trailing or double underscores; not all digits",
        ));
    }
    Ok(name)
}

/// Check password strength. The password is never normalized.
pub fn password(raw: &str) -> Result<(), AuthError> {
    let len = raw.chars().count();
    if len < PASSWORD_MIN {
        return Err(invalid("Password must be at least 12 characters"));
    }
    if len > PASSWORD_MAX {
        return Err(invalid("Password is too long"));
    }
    if raw.chars().any(char::is_whitespace) {
        return Err(invalid("Password cannot contain whitespace"));
    }
    if !raw.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(invalid("Password must include at least one lowercase letter"));
    }
    if !raw.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(invalid("Password must include at least one uppercase letter"));
    }
    if !raw.chars().any(|c| c.is_ascii_digit()) {
        return Err(invalid("Password must include at least one number"));
    }
    if !raw.chars().any(|c| !c.is_ascii_alphanumeric()) {
        return Err(invalid("Password must include at least one symbol"));
    }
    Ok(())
}

pub fn sign_up(email_raw: &str, username_raw: &str, password_raw: &str) -> Result<SignUpInput, AuthError> {
    let email = email(email_raw)?;
    let username = username(username_raw)?;
    password(password_raw)?;

    let lowered = password_raw.to_lowercase();
    if lowered.contains(&username) {
        return Err(invalid("Password must not contain your username"));
    }
    let local = email.split('@').next().unwrap_or_default();
    if !local.is_empty() && lowered.contains(local) {
        return Err(invalid("Password must not contain your email name"));
    }

    Ok(SignUpInput {
        email,
        username,
        password: password_raw.to_string(),
    })
}

pub fn login(email_raw: &str, password_raw: &str) -> Result<LoginInput, AuthError> {
    let email = email(email_raw)?;
    password(password_raw)?;
    Ok(LoginInput {
        email,
        password: password_raw.to_string(),
    })
}
