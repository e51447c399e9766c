//! In-memory tables implementing [`Store`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    AuthRecord, LoreUnlock, NewAccount, Profile, PurchaseRecord, StatsMerge, StatsRecord, Store,
    StoreError, DEFAULT_AVATAR, DEFAULT_THEME,
};

/// Every table of the database. Serializable so it can be mirrored to disk.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Tables {
    pub auths: Vec<AuthRecord>,
    pub profiles: Vec<Profile>,
    pub stats: Vec<StatsRecord>,
    pub purchases: Vec<PurchaseRecord>,
    pub lore_unlocks: Vec<LoreUnlock>,
    /// Last revision handed out to a stats write.
    pub revision: u64,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Tables,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tables(tables: Tables) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    fn next_revision(&mut self) -> u64 {
        self.tables.revision += 1;
        self.tables.revision
    }
}

impl Store for MemoryStore {
    fn find_auth_by_email(&self, email: &str) -> Result<Option<AuthRecord>, StoreError> {
        Ok(self.tables.auths.iter().find(|a| a.email == email).cloned())
    }

    fn find_profile_by_username(&self, username: &str) -> Result<Option<Profile>, StoreError> {
        Ok(self
            .tables
            .profiles
            .iter()
            .find(|p| p.username == username)
            .cloned())
    }

    fn find_profile_by_owner(&self, owner_id: &str) -> Result<Option<Profile>, StoreError> {
        Ok(self
            .tables
            .profiles
            .iter()
            .find(|p| p.owner_id == owner_id)
            .cloned())
    }

    fn create_account(&mut self, account: NewAccount) -> Result<(), StoreError> {
        // all checks before any insert so a failure leaves nothing behind
        if self.tables.auths.iter().any(|a| a.email == account.email) {
            return Err(StoreError::Conflict(format!("email {}", account.email)));
        }
        if self.tables.profiles.iter().any(|p| p.username == account.username) {
            return Err(StoreError::Conflict(format!("username {}", account.username)));
        }

        let revision = self.next_revision();
        self.tables.auths.push(AuthRecord {
            email: account.email,
            password_hash: account.password_hash,
            owner_id: account.owner_id.clone(),
            created_at: account.created_at,
            last_login_at: Some(account.created_at),
        });
        self.tables.profiles.push(Profile {
            username: account.username,
            owner_id: account.owner_id.clone(),
            created_at: account.created_at,
            avatar_emoji: DEFAULT_AVATAR.to_string(),
            theme: DEFAULT_THEME.to_string(),
        });
        self.tables.stats.push(StatsRecord {
            owner_id: account.owner_id,
            total_frogs: 0.0,
            total_clicks: 0.0,
            frogs_per_second: 0.0,
            prestige: 0,
            last_active_at: account.created_at,
            created_at: account.created_at,
            revision,
        });
        Ok(())
    }

    fn touch_login(&mut self, owner_id: &str, at: DateTime<Utc>) -> Result<(), StoreError> {
        let auth = self
            .tables
            .auths
            .iter_mut()
            .find(|a| a.owner_id == owner_id)
            .ok_or_else(|| StoreError::NotFound(format!("auth for {owner_id}")))?;
        auth.last_login_at = Some(at);
        Ok(())
    }

    fn stats(&self, owner_id: &str) -> Result<Option<StatsRecord>, StoreError> {
        Ok(self
            .tables
            .stats
            .iter()
            .find(|s| s.owner_id == owner_id)
            .cloned())
    }

    fn merge_stats(&mut self, owner_id: &str, merge: &StatsMerge) -> Result<u64, StoreError> {
        let revision = self.next_revision();
        match self.tables.stats.iter_mut().find(|s| s.owner_id == owner_id) {
            Some(record) => {
                record.total_frogs = merge.total_frogs as f64;
                record.total_clicks = merge.total_clicks as f64;
                record.frogs_per_second = merge.frogs_per_second;
                record.last_active_at = merge.last_active_at;
                record.revision = revision;
            }
            None => self.tables.stats.push(StatsRecord {
                owner_id: owner_id.to_string(),
                total_frogs: merge.total_frogs as f64,
                total_clicks: merge.total_clicks as f64,
                frogs_per_second: merge.frogs_per_second,
                prestige: 0,
                last_active_at: merge.last_active_at,
                created_at: merge.last_active_at,
                revision,
            }),
        }
        Ok(revision)
    }

    fn all_stats(&self) -> Result<Vec<StatsRecord>, StoreError> {
        Ok(self.tables.stats.clone())
    }

    fn record_purchase(
        &mut self,
        owner_id: &str,
        item_id: &str,
        name: &str,
        cost: u64,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        match self
            .tables
            .purchases
            .iter_mut()
            .find(|p| p.owner_id == owner_id && p.item_id == item_id)
        {
            Some(p) => {
                p.quantity += 1;
                p.total_spent = p.total_spent.saturating_add(cost);
            }
            None => self.tables.purchases.push(PurchaseRecord {
                owner_id: owner_id.to_string(),
                item_id: item_id.to_string(),
                name: name.to_string(),
                quantity: 1,
                total_spent: cost,
                created_at: at,
            }),
        }
        Ok(())
    }

    fn purchases(&self, owner_id: &str) -> Result<Vec<PurchaseRecord>, StoreError> {
        Ok(self
            .tables
            .purchases
            .iter()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect())
    }

    fn lore_unlocks(&self, owner_id: &str) -> Result<Vec<LoreUnlock>, StoreError> {
        Ok(self
            .tables
            .lore_unlocks
            .iter()
            .filter(|u| u.owner_id == owner_id)
            .cloned()
            .collect())
    }

    fn unlock_lore(
        &mut self,
        owner_id: &str,
        lore_key: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let exists = self
            .tables
            .lore_unlocks
            .iter()
            .any(|u| u.owner_id == owner_id && u.lore_key == lore_key);
        if exists {
            return Ok(false);
        }
        self.tables.lore_unlocks.push(LoreUnlock {
            owner_id: owner_id.to_string(),
            lore_key: lore_key.to_string(),
            unlocked_at: at,
            read_at: None,
        });
        Ok(true)
    }

    fn mark_lore_read(
        &mut self,
        owner_id: &str,
        lore_keys: &[&str],
        at: DateTime<Utc>,
    ) -> Result<usize, StoreError> {
        let mut changed = 0;
        for unlock in self.tables.lore_unlocks.iter_mut().filter(|u| {
            u.owner_id == owner_id && u.read_at.is_none() && lore_keys.contains(&u.lore_key.as_str())
        }) {
            unlock.read_at = Some(at);
            changed += 1;
        }
        Ok(changed)
    }
}
