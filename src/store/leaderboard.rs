//! Top players by total frogs.

use super::{Store, StoreError};

/// Shown when a stats record has no matching profile.
pub const FALLBACK_USERNAME: &str = "frogling";

#[derive(Clone, Debug, PartialEq)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub owner_id: String,
    pub username: String,
    pub total_frogs: f64,
}

/// Load the top `limit` players, highest total first.
pub fn top_players(store: &dyn Store, limit: usize) -> Result<Vec<LeaderboardEntry>, StoreError> {
    let mut stats = store.all_stats()?;
    stats.sort_by(|a, b| b.total_frogs.total_cmp(&a.total_frogs));
    stats.truncate(limit);

    stats
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            let username = store
                .find_profile_by_owner(&record.owner_id)?
                .map_or_else(|| FALLBACK_USERNAME.to_string(), |p| p.username);
            Ok(LeaderboardEntry {
                rank: i + 1,
                owner_id: record.owner_id,
                username,
                total_frogs: record.total_frogs,
            })
        })
        .collect()
}
