//! Browser-persisted database.
//!
//! ## Versioning
//!
//! - `DB_VERSION`: current envelope format. Bump when fields are added.
//! - `MIN_COMPATIBLE_VERSION`: oldest envelope that can still be read. Bump
//!   only when a field changes meaning or is removed.
//!
//! Envelopes at or above `MIN_COMPATIBLE_VERSION` are loaded with missing
//! fields defaulted. Anything older or unparsable is discarded and a fresh
//! database starts.

use serde::{Deserialize, Serialize};

use super::memory::{MemoryStore, Tables};
use super::StoreError;

const DB_VERSION: u32 = 1;
const MIN_COMPATIBLE_VERSION: u32 = 1;

#[cfg(target_arch = "wasm32")]
const STORAGE_KEY: &str = "frog_wizard_db";

#[derive(Serialize, Deserialize)]
struct Envelope {
    version: u32,
    tables: Tables,
}

fn encode(tables: &Tables) -> Result<String, StoreError> {
    let envelope = Envelope {
        version: DB_VERSION,
        tables: tables.clone(),
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Why a stored database was not loaded.
#[derive(Debug, PartialEq)]
enum Rejected {
    Corrupt(String),
    TooOld(u32),
}

fn decode(json: &str) -> Result<Tables, Rejected> {
    let envelope: Envelope =
        serde_json::from_str(json).map_err(|e| Rejected::Corrupt(e.to_string()))?;
    if envelope.version < MIN_COMPATIBLE_VERSION {
        return Err(Rejected::TooOld(envelope.version));
    }
    if envelope.version < DB_VERSION {
        crate::console::log(&format!(
            "migrating database (saved={}, current={})",
            envelope.version, DB_VERSION
        ));
    }
    Ok(envelope.tables)
}

/// Apply `write` to a copy of the tables and keep the copy only once `save`
/// has stored it. A failed save leaves memory (and its revision) untouched.
fn staged<T>(
    inner: &mut MemoryStore,
    write: impl FnOnce(&mut MemoryStore) -> Result<T, StoreError>,
    save: impl FnOnce(&Tables) -> Result<(), StoreError>,
) -> Result<T, StoreError> {
    let mut next = MemoryStore::from_tables(inner.tables().clone());
    let out = write(&mut next)?;
    save(next.tables())?;
    *inner = next;
    Ok(out)
}

#[cfg(target_arch = "wasm32")]
pub use wasm::LocalStore;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use chrono::{DateTime, Utc};

    use super::super::memory::{MemoryStore, Tables};
    use super::super::{
        AuthRecord, LoreUnlock, NewAccount, Profile, PurchaseRecord, StatsMerge, StatsRecord,
        Store, StoreError,
    };
    use super::{decode, encode, staged, Rejected, STORAGE_KEY};

    fn get_storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    /// [`MemoryStore`] mirrored into `localStorage` after every write.
    pub struct LocalStore {
        inner: MemoryStore,
    }

    impl LocalStore {
        /// Load the database, starting fresh if absent or unreadable.
        pub fn open() -> Self {
            let tables = get_storage()
                .and_then(|storage| {
                    let json = storage.get_item(STORAGE_KEY).ok()??;
                    match decode(&json) {
                        Ok(tables) => Some(tables),
                        Err(reason) => {
                            match reason {
                                Rejected::Corrupt(e) => crate::console::warn(&format!(
                                    "database unreadable, discarding: {e}"
                                )),
                                Rejected::TooOld(v) => crate::console::log(&format!(
                                    "database version {v} too old, starting fresh"
                                )),
                            }
                            let _ = storage.remove_item(STORAGE_KEY);
                            None
                        }
                    }
                })
                .unwrap_or_default();
            Self {
                inner: MemoryStore::from_tables(tables),
            }
        }

        fn write<T>(
            &mut self,
            op: impl FnOnce(&mut MemoryStore) -> Result<T, StoreError>,
        ) -> Result<T, StoreError> {
            staged(&mut self.inner, op, persist)
        }
    }

    fn persist(tables: &Tables) -> Result<(), StoreError> {
        let storage =
            get_storage().ok_or_else(|| StoreError::Unavailable("localStorage".into()))?;
        let json = encode(tables)?;
        storage
            .set_item(STORAGE_KEY, &json)
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))
    }

    impl Store for LocalStore {
        fn find_auth_by_email(&self, email: &str) -> Result<Option<AuthRecord>, StoreError> {
            self.inner.find_auth_by_email(email)
        }

        fn find_profile_by_username(&self, username: &str) -> Result<Option<Profile>, StoreError> {
            self.inner.find_profile_by_username(username)
        }

        fn find_profile_by_owner(&self, owner_id: &str) -> Result<Option<Profile>, StoreError> {
            self.inner.find_profile_by_owner(owner_id)
        }

        fn create_account(&mut self, account: NewAccount) -> Result<(), StoreError> {
            self.write(|s| s.create_account(account))
        }

        fn touch_login(&mut self, owner_id: &str, at: DateTime<Utc>) -> Result<(), StoreError> {
            self.write(|s| s.touch_login(owner_id, at))
        }

        fn stats(&self, owner_id: &str) -> Result<Option<StatsRecord>, StoreError> {
            self.inner.stats(owner_id)
        }

        fn merge_stats(&mut self, owner_id: &str, merge: &StatsMerge) -> Result<u64, StoreError> {
            self.write(|s| s.merge_stats(owner_id, merge))
        }

        fn all_stats(&self) -> Result<Vec<StatsRecord>, StoreError> {
            self.inner.all_stats()
        }

        fn record_purchase(
            &mut self,
            owner_id: &str,
            item_id: &str,
            name: &str,
            cost: u64,
            at: DateTime<Utc>,
        ) -> Result<(), StoreError> {
            self.write(|s| s.record_purchase(owner_id, item_id, name, cost, at))
        }

        fn purchases(&self, owner_id: &str) -> Result<Vec<PurchaseRecord>, StoreError> {
            self.inner.purchases(owner_id)
        }

        fn lore_unlocks(&self, owner_id: &str) -> Result<Vec<LoreUnlock>, StoreError> {
            self.inner.lore_unlocks(owner_id)
        }

        fn unlock_lore(
            &mut self,
            owner_id: &str,
            lore_key: &str,
            at: DateTime<Utc>,
        ) -> Result<bool, StoreError> {
            self.write(|s| s.unlock_lore(owner_id, lore_key, at))
        }

        fn mark_lore_read(
            &mut self,
            owner_id: &str,
            lore_keys: &[&str],
            at: DateTime<Utc>,
        ) -> Result<usize, StoreError> {
            self.write(|s| s.mark_lore_read(owner_id, lore_keys, at))
        }
    }
}
