/// Static catalog: upgrades, achievements and spells.

/// How an upgrade contributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpgradeKind {
    /// Adds `multiplier` to click power per unit owned.
    Click,
    /// Adds `multiplier` frogs per second per unit owned.
    Auto,
}

#[derive(Debug)]
pub struct UpgradeDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub base_cost: u64,
    pub multiplier: u64,
    pub kind: UpgradeKind,
    /// Visible from the start; otherwise unlocks at half its cost.
    pub unlocked_at_start: bool,
    pub emoji: &'static str,
}

pub const UPGRADES: &[UpgradeDef] = &[
    UpgradeDef {
        id: "lily-pad",
        name: "Lily Pad",
        description: "A comfy spot for more frogs",
        base_cost: 15,
        multiplier: 1,
        kind: UpgradeKind::Auto,
        unlocked_at_start: true,
        emoji: "🪷",
    },
    UpgradeDef {
        id: "magic-wand",
        name: "Magic Wand",
        description: "Increases clicking power",
        base_cost: 100,
        multiplier: 2,
        kind: UpgradeKind::Click,
        unlocked_at_start: true,
        emoji: "🪄",
    },
    UpgradeDef {
        id: "crystal-ball",
        name: "Crystal Ball",
        description: "Automatically generates frogs",
        base_cost: 500,
        multiplier: 5,
        kind: UpgradeKind::Auto,
        unlocked_at_start: true,
        emoji: "🔮",
    },
    UpgradeDef {
        id: "wizard-hat",
        name: "Wizard Hat",
        description: "Boosts all frog production",
        base_cost: 2_000,
        multiplier: 10,
        kind: UpgradeKind::Auto,
        unlocked_at_start: true,
        emoji: "🧙",
    },
    UpgradeDef {
        id: "enchanted-pond",
        name: "Enchanted Pond",
        description: "A magical breeding ground",
        base_cost: 10_000,
        multiplier: 50,
        kind: UpgradeKind::Auto,
        unlocked_at_start: true,
        emoji: "🌊",
    },
    UpgradeDef {
        id: "frog-portal",
        name: "Frog Portal",
        description: "Summons frogs from other dimensions",
        base_cost: 100_000,
        multiplier: 200,
        kind: UpgradeKind::Auto,
        unlocked_at_start: false,
        emoji: "🌀",
    },
];

/// What an achievement waits for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AchievementGoal {
    /// Total clicks reached.
    Clicks(u64),
    /// Total frogs reached.
    Frogs(u64),
}

#[derive(Debug)]
pub struct AchievementDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub goal: AchievementGoal,
    pub emoji: &'static str,
}

pub const FIRST_FROG: &str = "first-frog";

pub const ACHIEVEMENTS: &[AchievementDef] = &[
    AchievementDef {
        id: FIRST_FROG,
        name: "First Frog",
        description: "Click your first frog",
        goal: AchievementGoal::Clicks(1),
        emoji: "🐸",
    },
    AchievementDef {
        id: "hundred-frogs",
        name: "Frog Collector",
        description: "Collect 100 frogs",
        goal: AchievementGoal::Frogs(100),
        emoji: "💯",
    },
    AchievementDef {
        id: "thousand-frogs",
        name: "Frog Master",
        description: "Collect 1,000 frogs",
        goal: AchievementGoal::Frogs(1_000),
        emoji: "🏆",
    },
    AchievementDef {
        id: "ten-thousand-frogs",
        name: "Frog Wizard",
        description: "Collect 10,000 frogs",
        goal: AchievementGoal::Frogs(10_000),
        emoji: "🧙",
    },
    AchievementDef {
        id: "million-frogs",
        name: "Frog God",
        description: "Collect 1,000,000 frogs",
        goal: AchievementGoal::Frogs(1_000_000),
        emoji: "⚡",
    },
];

/// What a spell does while active.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpellEffect {
    /// Multiplies click power for the duration.
    ClickMultiplier,
    /// Multiplies passive production for the duration.
    AutoMultiplier,
    /// Instant: the next [`GOLDEN_CLICKS`] clicks get [`GOLDEN_MULTIPLIER`].
    GoldenClicks,
}

#[derive(Debug)]
pub struct SpellDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub cost: u64,
    /// 0 for instantaneous spells.
    pub duration_ms: u64,
    pub effect: SpellEffect,
    pub multiplier: f64,
    /// Declared for display; casting does not enforce it.
    pub cooldown_ms: u64,
    pub emoji: &'static str,
}

/// Clicks granted by Golden Touch.
pub const GOLDEN_CLICKS: u32 = 50;
/// Multiplier applied to each golden click.
pub const GOLDEN_MULTIPLIER: f64 = 100.0;

pub const SPELLS: &[SpellDef] = &[
    SpellDef {
        id: "frog-rain",
        name: "Frog Rain",
        description: "10x click power for 30 seconds",
        cost: 1_000,
        duration_ms: 30_000,
        effect: SpellEffect::ClickMultiplier,
        multiplier: 10.0,
        cooldown_ms: 120_000,
        emoji: "🌧",
    },
    SpellDef {
        id: "time-warp",
        name: "Time Warp",
        description: "5x auto production for 60 seconds",
        cost: 5_000,
        duration_ms: 60_000,
        effect: SpellEffect::AutoMultiplier,
        multiplier: 5.0,
        cooldown_ms: 300_000,
        emoji: "⏰",
    },
    SpellDef {
        id: "golden-touch",
        name: "Golden Touch",
        description: "Next 50 clicks give 100x frogs",
        cost: 10_000,
        duration_ms: 0,
        effect: SpellEffect::GoldenClicks,
        multiplier: GOLDEN_MULTIPLIER,
        cooldown_ms: 600_000,
        emoji: "✨",
    },
];

pub fn upgrade_def(id: &str) -> Option<&'static UpgradeDef> {
    UPGRADES.iter().find(|u| u.id == id)
}

pub fn spell_def(id: &str) -> Option<&'static SpellDef> {
    SPELLS.iter().find(|s| s.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique() {
        let upgrades: HashSet<_> = UPGRADES.iter().map(|u| u.id).collect();
        assert_eq!(upgrades.len(), UPGRADES.len());
        let spells: HashSet<_> = SPELLS.iter().map(|s| s.id).collect();
        assert_eq!(spells.len(), SPELLS.len());
        let achievements: HashSet<_> = ACHIEVEMENTS.iter().map(|a| a.id).collect();
        assert_eq!(achievements.len(), ACHIEVEMENTS.len());
    }

    #[test]
    fn only_golden_touch_is_instant() {
        for s in SPELLS {
            assert_eq!(s.duration_ms == 0, s.effect == SpellEffect::GoldenClicks, "{}", s.id);
        }
    }

    #[test]
    fn first_frog_counts_clicks() {
        let a = ACHIEVEMENTS.iter().find(|a| a.id == FIRST_FROG).unwrap();
        assert_eq!(a.goal, AchievementGoal::Clicks(1));
    }

    #[test]
    fn lookup_unknown_id() {
        assert!(upgrade_def("dragon").is_none());
        assert!(spell_def("fireball").is_none());
        assert!(upgrade_def("frog-portal").is_some());
    }
}
