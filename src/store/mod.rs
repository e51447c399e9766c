//! Durable records and the boundary to the synced database.
//!
//! The game talks to persistence only through [`Store`]. [`memory::MemoryStore`]
//! backs tests and native builds; the wasm build wraps it in
//! `local::LocalStore`, which mirrors every write into `localStorage`.

pub mod leaderboard;
#[cfg(any(target_arch = "wasm32", test))]
pub mod local;
pub mod memory;
pub mod sync;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Credentials row, keyed by email.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthRecord {
    pub email: String,
    pub password_hash: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

pub const DEFAULT_AVATAR: &str = "🐸";
pub const DEFAULT_THEME: &str = "swamp";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub username: String,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default = "default_avatar")]
    pub avatar_emoji: String,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_avatar() -> String {
    DEFAULT_AVATAR.to_string()
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

/// Per-player cumulative counters.
///
/// Numbers are stored as plain JSON numbers, so they come back as `f64`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatsRecord {
    pub owner_id: String,
    pub total_frogs: f64,
    pub total_clicks: f64,
    pub frogs_per_second: f64,
    pub prestige: u32,
    pub last_active_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    /// Bumped by the store on every write.
    #[serde(default)]
    pub revision: u64,
}

/// Fields written by a stats merge. `prestige` and `created_at` are left alone.
#[derive(Clone, Debug, PartialEq)]
pub struct StatsMerge {
    pub total_frogs: u64,
    pub total_clicks: u64,
    pub frogs_per_second: f64,
    pub last_active_at: DateTime<Utc>,
}

/// Running total of one upgrade bought by one player.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRecord {
    pub owner_id: String,
    pub item_id: String,
    pub name: String,
    pub quantity: u32,
    pub total_spent: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoreUnlock {
    pub owner_id: String,
    pub lore_key: String,
    pub unlocked_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

/// Everything created together at sign-up.
#[derive(Clone, Debug)]
pub struct NewAccount {
    pub owner_id: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

pub trait Store {
    fn find_auth_by_email(&self, email: &str) -> Result<Option<AuthRecord>, StoreError>;
    fn find_profile_by_username(&self, username: &str) -> Result<Option<Profile>, StoreError>;
    fn find_profile_by_owner(&self, owner_id: &str) -> Result<Option<Profile>, StoreError>;

    /// Create auth, profile and zeroed stats in one transaction.
    fn create_account(&mut self, account: NewAccount) -> Result<(), StoreError>;
    fn touch_login(&mut self, owner_id: &str, at: DateTime<Utc>) -> Result<(), StoreError>;

    fn stats(&self, owner_id: &str) -> Result<Option<StatsRecord>, StoreError>;
    /// Merge into the owner's stats record. Returns the new revision.
    fn merge_stats(&mut self, owner_id: &str, merge: &StatsMerge) -> Result<u64, StoreError>;
    fn all_stats(&self) -> Result<Vec<StatsRecord>, StoreError>;

    /// Upsert: quantity += 1, total_spent += cost.
    fn record_purchase(
        &mut self,
        owner_id: &str,
        item_id: &str,
        name: &str,
        cost: u64,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError>;
    fn purchases(&self, owner_id: &str) -> Result<Vec<PurchaseRecord>, StoreError>;

    fn lore_unlocks(&self, owner_id: &str) -> Result<Vec<LoreUnlock>, StoreError>;
    /// Returns false if the entry was already unlocked.
    fn unlock_lore(&mut self, owner_id: &str, lore_key: &str, at: DateTime<Utc>)
        -> Result<bool, StoreError>;
    /// Set `read_at` on the given unread entries. Returns how many changed.
    fn mark_lore_read(
        &mut self,
        owner_id: &str,
        lore_keys: &[&str],
        at: DateTime<Utc>,
    ) -> Result<usize, StoreError>;
}
