//! Application configuration.
//!
//! Values are baked in at compile time from the build environment
//! (`FROG_JWT_SECRET`, `FROG_COOKIE_DAYS`) and fall back to development
//! defaults otherwise.

/// Secret used when no `FROG_JWT_SECRET` was provided at build time.
pub const DEV_JWT_SECRET: &str = "dev-insecure-secret";

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// HMAC secret for session tokens.
    pub jwt_secret: String,
    /// Lifetime of the session token and its cookie.
    pub cookie_days: u32,
    /// bcrypt work factor.
    pub bcrypt_cost: u32,
    /// Accumulation tick period.
    pub tick_ms: u32,
    /// Spell expiry sweep / hydration poll period.
    pub sweep_ms: u32,
    /// Number of rows shown on the leaderboard.
    pub leaderboard_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEV_JWT_SECRET.to_string(),
            cookie_days: 7,
            bcrypt_cost: 10,
            tick_ms: 100,
            sweep_ms: 1000,
            leaderboard_limit: 10,
        }
    }
}

impl AppConfig {
    /// Build the configuration from compile-time environment overrides.
    pub fn from_env() -> Self {
        Self::from_values(option_env!("FROG_JWT_SECRET"), option_env!("FROG_COOKIE_DAYS"))
    }

    fn from_values(secret: Option<&str>, cookie_days: Option<&str>) -> Self {
        let mut config = Self::default();

        match secret.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => config.jwt_secret = s.to_string(),
            None => crate::console::warn("FROG_JWT_SECRET not set, using the development secret"),
        }

        if let Some(raw) = cookie_days {
            match raw.trim().parse::<u32>() {
                Ok(days) if days > 0 => config.cookie_days = days,
                _ => crate::console::warn(&format!("ignoring invalid FROG_COOKIE_DAYS={raw}")),
            }
        }

        config
    }

    /// Token lifetime in seconds.
    pub fn token_ttl_secs(&self) -> i64 {
        i64::from(self.cookie_days) * 24 * 60 * 60
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_game_cadence() {
        let c = AppConfig::default();
        assert_eq!(c.tick_ms, 100);
        assert_eq!(c.sweep_ms, 1000);
        assert_eq!(c.cookie_days, 7);
        assert_eq!(c.leaderboard_limit, 10);
        assert_eq!(c.jwt_secret, DEV_JWT_SECRET);
    }

    #[test]
    fn overrides_are_applied() {
        let c = AppConfig::from_values(Some("s3cret"), Some("30"));
        assert_eq!(c.jwt_secret, "s3cret");
        assert_eq!(c.cookie_days, 30);
        assert_eq!(c.token_ttl_secs(), 30 * 86_400);
    }

    #[test]
    fn blank_or_invalid_overrides_fall_back() {
        let c = AppConfig::from_values(Some("   "), Some("zero"));
        assert_eq!(c.jwt_secret, DEV_JWT_SECRET);
        assert_eq!(c.cookie_days, 7);

        let c = AppConfig::from_values(None, Some("0"));
        assert_eq!(c.cookie_days, 7);
    }
}
