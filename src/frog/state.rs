/// Frog Wizard game state definitions.

use std::collections::BTreeMap;

use super::catalog::{
    AchievementDef, SpellEffect, UpgradeDef, UpgradeKind, ACHIEVEMENTS, UPGRADES,
};

/// Cost growth per unit owned.
pub const COST_GROWTH: f64 = 1.15;

/// Cost of the next unit after `owned` purchases: floor(base × 1.15^owned).
pub fn cost_after(base_cost: u64, owned: u32) -> u64 {
    let exp = i32::try_from(owned).unwrap_or(i32::MAX);
    (base_cost as f64 * COST_GROWTH.powi(exp)).floor() as u64
}

/// Cumulative counters mirrored to the stats record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GameState {
    pub total_frogs: u64,
    /// Derived: recomputed every tick.
    pub frogs_per_second: f64,
    pub total_clicks: u64,
    /// Persisted but not yet earned by any mechanic.
    pub prestige: u32,
    /// Wall-clock ms of the most recent critical click.
    pub last_crit_at: Option<f64>,
}

#[derive(Clone, Debug)]
pub struct UpgradeState {
    pub def: &'static UpgradeDef,
    pub quantity: u32,
    pub current_cost: u64,
    /// One-way latch.
    pub unlocked: bool,
}

impl UpgradeState {
    pub fn new(def: &'static UpgradeDef) -> Self {
        Self {
            def,
            quantity: 0,
            current_cost: def.base_cost,
            unlocked: def.unlocked_at_start,
        }
    }

    /// Contribution of this upgrade (click power or frogs/sec, per its kind).
    pub fn contribution(&self) -> u64 {
        u64::from(self.quantity) * self.def.multiplier
    }

    pub fn is(&self, kind: UpgradeKind) -> bool {
        self.def.kind == kind
    }
}

#[derive(Clone, Debug)]
pub struct AchievementState {
    pub def: &'static AchievementDef,
    /// One-way latch.
    pub unlocked: bool,
}

/// A timed spell currently in effect.
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveSpell {
    pub ends_at_ms: f64,
    pub effect: SpellEffect,
    pub multiplier: f64,
}

/// Which side panel is open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Panel {
    Upgrades,
    Spells,
    Achievements,
    Lore,
    Leaderboard,
}

impl Panel {
    pub fn all() -> &'static [Panel] {
        &[
            Panel::Upgrades,
            Panel::Spells,
            Panel::Achievements,
            Panel::Lore,
            Panel::Leaderboard,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Panel::Upgrades => "Shop",
            Panel::Spells => "Spells",
            Panel::Achievements => "Feats",
            Panel::Lore => "Codex",
            Panel::Leaderboard => "Ranks",
        }
    }

    pub fn key(&self) -> char {
        match self {
            Panel::Upgrades => 'u',
            Panel::Spells => 's',
            Panel::Achievements => 'a',
            Panel::Lore => 'l',
            Panel::Leaderboard => 'b',
        }
    }
}

/// Log entry for the game feed.
#[derive(Clone, Debug)]
pub struct LogEntry {
    pub text: String,
    pub is_important: bool,
}

const MAX_LOG: usize = 50;

/// Full session state of the engine.
pub struct FrogState {
    pub game: GameState,
    pub upgrades: Vec<UpgradeState>,
    pub achievements: Vec<AchievementState>,
    pub active_spells: BTreeMap<&'static str, ActiveSpell>,
    /// Remaining golden (×100) clicks.
    pub golden_clicks: u32,
    /// Message log.
    pub log: Vec<LogEntry>,
    pub panel: Panel,
    /// Ticks of click feedback left.
    pub click_flash: u32,
    /// Ticks of critical-hit feedback left.
    pub crit_flash: u32,
    /// Amount applied by the most recent click.
    pub last_applied: u64,
    /// Animation frame counter (incremented every tick).
    pub anim_frame: u32,
    /// xorshift32 state.
    pub rng_state: u32,
}

impl FrogState {
    pub fn new() -> Self {
        Self::with_seed(0x2545_F491)
    }

    pub fn with_seed(seed: u32) -> Self {
        Self {
            game: GameState::default(),
            upgrades: UPGRADES.iter().map(UpgradeState::new).collect(),
            achievements: ACHIEVEMENTS
                .iter()
                .map(|def| AchievementState { def, unlocked: false })
                .collect(),
            active_spells: BTreeMap::new(),
            golden_clicks: 0,
            log: vec![LogEntry {
                text: "Welcome to the Frog Wizard Guild!".into(),
                is_important: true,
            }],
            panel: Panel::Upgrades,
            click_flash: 0,
            crit_flash: 0,
            last_applied: 0,
            anim_frame: 0,
            // xorshift must never hold zero
            rng_state: if seed == 0 { 1 } else { seed },
        }
    }

    pub fn upgrade(&self, id: &str) -> Option<&UpgradeState> {
        self.upgrades.iter().find(|u| u.def.id == id)
    }

    pub fn achievement(&self, id: &str) -> Option<&AchievementState> {
        self.achievements.iter().find(|a| a.def.id == id)
    }

    pub fn unlocked_achievement_count(&self) -> usize {
        self.achievements.iter().filter(|a| a.unlocked).count()
    }

    /// Product of the multipliers of every active spell with `effect`.
    pub fn spell_multiplier(&self, effect: SpellEffect) -> f64 {
        self.active_spells
            .values()
            .filter(|s| s.effect == effect)
            .map(|s| s.multiplier)
            .product()
    }

    /// Click power before golden clicks or crits: 1 + Σ click upgrades.
    pub fn base_click_power(&self) -> u64 {
        1 + self
            .upgrades
            .iter()
            .filter(|u| u.is(UpgradeKind::Click))
            .map(UpgradeState::contribution)
            .sum::<u64>()
    }

    /// Passive frogs per second from upgrades alone.
    pub fn base_rate(&self) -> u64 {
        self.upgrades
            .iter()
            .filter(|u| u.is(UpgradeKind::Auto))
            .map(UpgradeState::contribution)
            .sum()
    }

    /// Remaining time of an active spell, 0 if not active.
    pub fn spell_remaining_ms(&self, id: &str, now_ms: f64) -> f64 {
        self.active_spells
            .get(id)
            .map_or(0.0, |s| (s.ends_at_ms - now_ms).max(0.0))
    }

    pub fn add_log(&mut self, text: &str, is_important: bool) {
        self.log.push(LogEntry {
            text: text.to_string(),
            is_important,
        });
        if self.log.len() > MAX_LOG {
            self.log.remove(0);
        }
    }

    /// Next xorshift32 value.
    pub fn next_random(&mut self) -> u32 {
        let mut x = self.rng_state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.rng_state = x;
        x
    }

    /// Uniform draw in [0, 1).
    pub fn next_unit(&mut self) -> f64 {
        f64::from(self.next_random()) / (f64::from(u32::MAX) + 1.0)
    }
}

impl Default for FrogState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_closed_form() {
        assert_eq!(cost_after(15, 0), 15);
        assert_eq!(cost_after(15, 1), 17); // 17.25
        assert_eq!(cost_after(15, 2), 19); // 19.8375
        assert_eq!(cost_after(100, 5), 201); // 201.13...
    }

    #[test]
    fn initial_unlocks_follow_catalog() {
        let s = FrogState::new();
        assert!(s.upgrade("lily-pad").unwrap().unlocked);
        assert!(!s.upgrade("frog-portal").unwrap().unlocked);
        assert_eq!(s.upgrade("lily-pad").unwrap().current_cost, 15);
    }

    #[test]
    fn base_click_power_counts_click_upgrades_only() {
        let mut s = FrogState::new();
        assert_eq!(s.base_click_power(), 1);
        s.upgrades[0].quantity = 3; // lily-pad (auto)
        s.upgrades[1].quantity = 2; // magic-wand (click ×2)
        assert_eq!(s.base_click_power(), 5);
        assert_eq!(s.base_rate(), 3);
    }

    #[test]
    fn spell_multiplier_defaults_to_one() {
        let s = FrogState::new();
        assert!((s.spell_multiplier(SpellEffect::ClickMultiplier) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn spell_remaining_never_negative() {
        let mut s = FrogState::new();
        s.active_spells.insert(
            "frog-rain",
            ActiveSpell {
                ends_at_ms: 1_000.0,
                effect: SpellEffect::ClickMultiplier,
                multiplier: 10.0,
            },
        );
        assert!((s.spell_remaining_ms("frog-rain", 400.0) - 600.0).abs() < 1e-9);
        assert_eq!(s.spell_remaining_ms("frog-rain", 5_000.0), 0.0);
        assert_eq!(s.spell_remaining_ms("time-warp", 0.0), 0.0);
    }

    #[test]
    fn unit_draws_stay_in_range() {
        let mut s = FrogState::with_seed(7);
        for _ in 0..10_000 {
            let u = s.next_unit();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn zero_seed_is_replaced() {
        let mut s = FrogState::with_seed(0);
        assert_ne!(s.next_random(), 0);
    }

    #[test]
    fn log_truncation() {
        let mut s = FrogState::new();
        for i in 0..60 {
            s.add_log(&format!("msg {}", i), false);
        }
        assert!(s.log.len() <= MAX_LOG);
    }
}
