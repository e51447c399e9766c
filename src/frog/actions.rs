//! Semantic action IDs for Frog Wizard click targets.
//!
//! Registered during render and dispatched back via `InputEvent::Click`.

// ── Core actions ────────────────────────────────────────────────
pub const CLICK_FROG: u16 = 0;
pub const REFRESH_LEADERBOARD: u16 = 1;
pub const LOGOUT: u16 = 2;

// ── Tab navigation ──────────────────────────────────────────────
pub const TAB_UPGRADES: u16 = 10;
pub const TAB_SPELLS: u16 = 11;
pub const TAB_ACHIEVEMENTS: u16 = 12;
pub const TAB_LORE: u16 = 13;
pub const TAB_LEADERBOARD: u16 = 14;

// ── Upgrade purchase (base + catalog index) ─────────────────────
pub const BUY_UPGRADE_BASE: u16 = 100;

// ── Spell cast (base + catalog index) ───────────────────────────
pub const CAST_SPELL_BASE: u16 = 200;

// ── Lore codex (open guild: base + guild index) ─────────────────
pub const OPEN_GUILD_BASE: u16 = 300;
pub const CLOSE_GUILD: u16 = 399;
