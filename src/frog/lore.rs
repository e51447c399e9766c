//! Frog Wizard Codex: lore entries unlocked by progress.

use chrono::{DateTime, Utc};

use crate::store::{LoreUnlock, Store, StoreError};

use super::state::FrogState;

/// What unlocks an entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoreCondition {
    /// Total frogs reached.
    Threshold(u64),
    Prestige(u32),
    /// Achievement id unlocked.
    Achievement(&'static str),
    /// At least one of this upgrade owned.
    Upgrade(&'static str),
    /// Opened during this part of the day (local time).
    Time(DayPhase),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DayPhase {
    Day,
    Night,
}

impl DayPhase {
    /// Night runs from 20:00 to 05:59.
    pub fn from_hour(hour: u32) -> Self {
        if hour >= 20 || hour < 6 {
            DayPhase::Night
        } else {
            DayPhase::Day
        }
    }
}

#[derive(Debug)]
pub struct LoreEntry {
    pub key: &'static str,
    pub title: &'static str,
    pub guild: &'static str,
    /// Position inside its guild.
    pub order: u32,
    pub body: &'static str,
    pub condition: LoreCondition,
}

pub const GUILDS: &[&str] = &["Pond Apprentices", "Circle of the Lily", "Order of the Portal"];

pub const LORE: &[LoreEntry] = &[
    LoreEntry {
        key: "first-croak",
        title: "The First Croak",
        guild: "Pond Apprentices",
        order: 1,
        body: "Every wizard begins with a single frog and a single word. The word is usually \"ribbit\".",
        condition: LoreCondition::Achievement("first-frog"),
    },
    LoreEntry {
        key: "lily-lessons",
        title: "Lessons of the Lily",
        guild: "Pond Apprentices",
        order: 2,
        body: "A lily pad holds one frog. A hundred lily pads hold a choir.",
        condition: LoreCondition::Upgrade("lily-pad"),
    },
    LoreEntry {
        key: "hundredfold",
        title: "The Hundredfold Chorus",
        guild: "Pond Apprentices",
        order: 3,
        body: "When the hundredth frog arrives the pond begins to hum on its own.",
        condition: LoreCondition::Threshold(100),
    },
    LoreEntry {
        key: "wand-oath",
        title: "Oath of the Wand",
        guild: "Circle of the Lily",
        order: 1,
        body: "The wand does not make frogs. It persuades them.",
        condition: LoreCondition::Upgrade("magic-wand"),
    },
    LoreEntry {
        key: "moon-chorus",
        title: "Moon Chorus",
        guild: "Circle of the Lily",
        order: 2,
        body: "After dusk the frogs sing the old songs. Only wizards still awake can hear the words.",
        condition: LoreCondition::Time(DayPhase::Night),
    },
    LoreEntry {
        key: "thousand-eyes",
        title: "A Thousand Eyes",
        guild: "Circle of the Lily",
        order: 3,
        body: "A thousand frogs watch the crystal ball. None of them blink at the same time.",
        condition: LoreCondition::Threshold(1_000),
    },
    LoreEntry {
        key: "portal-rumor",
        title: "Rumors of the Portal",
        guild: "Order of the Portal",
        order: 1,
        body: "Somewhere past ten thousand frogs the pond stops having a bottom.",
        condition: LoreCondition::Achievement("ten-thousand-frogs"),
    },
    LoreEntry {
        key: "other-ponds",
        title: "Other Ponds",
        guild: "Order of the Portal",
        order: 2,
        body: "The portal opens onto ponds where the frogs are wizards and the wizards are frogs.",
        condition: LoreCondition::Upgrade("frog-portal"),
    },
    LoreEntry {
        key: "rebirth",
        title: "The Great Leap",
        guild: "Order of the Portal",
        order: 3,
        body: "To leap is to let go of every frog you have ever held.",
        condition: LoreCondition::Prestige(1),
    },
];

pub fn lore_entry(key: &str) -> Option<&'static LoreEntry> {
    LORE.iter().find(|e| e.key == key)
}

pub fn is_satisfied(condition: LoreCondition, state: &FrogState, hour: u32) -> bool {
    match condition {
        LoreCondition::Threshold(n) => state.game.total_frogs >= n,
        LoreCondition::Prestige(n) => state.game.prestige >= n,
        LoreCondition::Achievement(id) => state.achievement(id).is_some_and(|a| a.unlocked),
        LoreCondition::Upgrade(id) => state.upgrade(id).is_some_and(|u| u.quantity >= 1),
        LoreCondition::Time(phase) => DayPhase::from_hour(hour) == phase,
    }
}

/// Entries whose condition holds and whose key is not in `already`.
pub fn newly_satisfied(state: &FrogState, hour: u32, already: &[String]) -> Vec<&'static LoreEntry> {
    LORE.iter()
        .filter(|e| !already.iter().any(|k| k == e.key))
        .filter(|e| is_satisfied(e.condition, state, hour))
        .collect()
}

/// Record every newly satisfied entry. Returns the titles unlocked now.
pub fn record_unlocks(
    store: &mut dyn Store,
    owner_id: &str,
    state: &FrogState,
    hour: u32,
    at: DateTime<Utc>,
) -> Result<Vec<&'static str>, StoreError> {
    let already: Vec<String> = store
        .lore_unlocks(owner_id)?
        .into_iter()
        .map(|u| u.lore_key)
        .collect();

    let mut titles = Vec::new();
    for entry in newly_satisfied(state, hour, &already) {
        if store.unlock_lore(owner_id, entry.key, at)? {
            titles.push(entry.title);
        }
    }
    Ok(titles)
}

#[derive(Debug, Clone)]
pub struct CodexRow {
    pub entry: &'static LoreEntry,
    pub read: bool,
}

#[derive(Debug, Clone)]
pub struct GuildGroup {
    pub guild: &'static str,
    pub rows: Vec<CodexRow>,
}

impl GuildGroup {
    pub fn unread(&self) -> usize {
        self.rows.iter().filter(|r| !r.read).count()
    }

    pub fn keys(&self) -> Vec<&'static str> {
        self.rows.iter().map(|r| r.entry.key).collect()
    }
}

/// Group unlocked entries by guild (guild order as in [`GUILDS`]), each
/// sorted by `order`. Guilds with nothing unlocked are omitted.
pub fn codex(unlocks: &[LoreUnlock]) -> Vec<GuildGroup> {
    let mut groups: Vec<GuildGroup> = Vec::new();
    for &guild in GUILDS {
        let mut rows: Vec<CodexRow> = unlocks
            .iter()
            .filter_map(|u| {
                let entry = lore_entry(&u.lore_key)?;
                (entry.guild == guild).then_some(CodexRow {
                    entry,
                    read: u.read_at.is_some(),
                })
            })
            .collect();
        if rows.is_empty() {
            continue;
        }
        rows.sort_by_key(|r| r.entry.order);
        groups.push(GuildGroup { guild, rows });
    }
    groups
}

/// Opening a guild marks all of its entries read.
pub fn open_guild(
    store: &mut dyn Store,
    owner_id: &str,
    group: &GuildGroup,
    at: DateTime<Utc>,
) -> Result<usize, StoreError> {
    let keys = group.keys();
    store.mark_lore_read(owner_id, &keys, at)
}
