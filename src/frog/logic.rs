//! Frog Wizard game logic: pure functions over [`FrogState`].
//!
//! Every timestamp is wall-clock milliseconds passed in by the caller.

use super::catalog::{
    spell_def, upgrade_def, AchievementGoal, SpellEffect, UpgradeKind, GOLDEN_CLICKS,
    GOLDEN_MULTIPLIER,
};
use super::state::{cost_after, ActiveSpell, FrogState};

/// Probability that a click is a critical hit.
pub const CRIT_CHANCE: f64 = 0.10;
/// Critical hits multiply the click by this.
pub const CRIT_MULTIPLIER: f64 = 3.0;
/// Accumulation ticks per second (100ms cadence).
pub const TICKS_PER_SECOND: u64 = 10;

/// Result of one click.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClickOutcome {
    /// Frogs actually added.
    pub applied: u64,
    pub critical: bool,
}

/// Overwrite the cumulative counters from the persisted record.
///
/// Trusted unconditionally: a stale push can roll back local progress.
pub fn hydrate(state: &mut FrogState, total_frogs: f64, total_clicks: f64) {
    state.game.total_frogs = to_count(total_frogs);
    state.game.total_clicks = to_count(total_clicks);
    unlock_eligible_upgrades(state);
}

/// Persisted numbers are untyped JSON numbers; floor and clamp them.
fn to_count(n: f64) -> u64 {
    if n.is_finite() && n > 0.0 {
        n.floor() as u64
    } else {
        0
    }
}

/// Click power of the next non-critical click, golden bonus included.
pub fn click_power(state: &FrogState) -> u64 {
    let mut multiplier = state.spell_multiplier(SpellEffect::ClickMultiplier);
    if state.golden_clicks > 0 {
        multiplier *= GOLDEN_MULTIPLIER;
    }
    (state.base_click_power() as f64 * multiplier).floor() as u64
}

/// Manual click: add click power (golden bonus, crit chance) to the frogs.
pub fn register_interaction(state: &mut FrogState, now_ms: f64) -> ClickOutcome {
    let base = state.base_click_power() as f64;
    let mut multiplier = state.spell_multiplier(SpellEffect::ClickMultiplier);
    let golden = state.golden_clicks > 0;
    if golden {
        multiplier *= GOLDEN_MULTIPLIER;
        state.golden_clicks -= 1;
    }

    let critical = state.next_unit() < CRIT_CHANCE;
    if critical {
        multiplier *= CRIT_MULTIPLIER;
        state.game.last_crit_at = Some(now_ms);
        state.crit_flash = 6;
    }

    let applied = (base * multiplier).floor() as u64;
    state.game.total_frogs = state.game.total_frogs.saturating_add(applied);
    state.game.total_clicks += 1;
    state.last_applied = applied;
    state.click_flash = 3;

    if golden && state.golden_clicks == 0 {
        state.add_log("✨ Golden Touch fades", false);
    }

    check_achievements(state);
    unlock_eligible_upgrades(state);

    ClickOutcome { applied, critical }
}

/// Buy one unit of an upgrade. Returns true if successful.
pub fn purchase_upgrade(state: &mut FrogState, id: &str) -> bool {
    let Some(idx) = state.upgrades.iter().position(|u| u.def.id == id) else {
        return false;
    };
    let cost = state.upgrades[idx].current_cost;
    if state.game.total_frogs < cost {
        return false;
    }

    state.game.total_frogs -= cost;
    let upgrade = &mut state.upgrades[idx];
    upgrade.quantity += 1;
    upgrade.current_cost = cost_after(upgrade.def.base_cost, upgrade.quantity);

    let msg = format!(
        "{} {} purchased! ({} owned)",
        upgrade.def.emoji, upgrade.def.name, upgrade.quantity
    );
    state.add_log(&msg, false);
    unlock_eligible_upgrades(state);
    true
}

/// Restore an owned quantity at session start (from the purchases ledger).
pub fn restore_upgrade(state: &mut FrogState, id: &str, quantity: u32) -> bool {
    match state.upgrades.iter_mut().find(|u| u.def.id == id) {
        Some(upgrade) => {
            upgrade.quantity = quantity;
            upgrade.current_cost = cost_after(upgrade.def.base_cost, quantity);
            if quantity > 0 {
                upgrade.unlocked = true;
            }
            true
        }
        None => false,
    }
}

/// Cast a spell. Returns true if successful.
///
/// Cooldowns are declared in the catalog but not enforced. Recasting an
/// active spell restarts its timer.
pub fn cast_spell(state: &mut FrogState, id: &str, now_ms: f64) -> bool {
    let Some(spell) = spell_def(id) else {
        return false;
    };
    if state.game.total_frogs < spell.cost {
        return false;
    }

    state.game.total_frogs -= spell.cost;
    match spell.effect {
        SpellEffect::GoldenClicks => {
            state.golden_clicks = GOLDEN_CLICKS;
        }
        effect => {
            state.active_spells.insert(
                spell.id,
                ActiveSpell {
                    ends_at_ms: now_ms + spell.duration_ms as f64,
                    effect,
                    multiplier: spell.multiplier,
                },
            );
        }
    }
    state.add_log(&format!("{} {} cast!", spell.emoji, spell.name), true);
    unlock_eligible_upgrades(state);
    true
}

/// Passive frogs per second including active auto-multiplier spells.
pub fn passive_rate(state: &FrogState) -> f64 {
    state.base_rate() as f64 * state.spell_multiplier(SpellEffect::AutoMultiplier)
}

/// One 100ms accumulation step.
pub fn tick(state: &mut FrogState) {
    let rate = passive_rate(state);
    let gained = (rate / TICKS_PER_SECOND as f64).floor() as u64;
    state.game.total_frogs = state.game.total_frogs.saturating_add(gained);
    state.game.frogs_per_second = rate;

    state.anim_frame = state.anim_frame.wrapping_add(1);
    state.click_flash = state.click_flash.saturating_sub(1);
    state.crit_flash = state.crit_flash.saturating_sub(1);

    if gained > 0 {
        unlock_eligible_upgrades(state);
        check_achievements(state);
    }
}

/// Remove every spell whose end time has been reached. Returns how many.
pub fn expire_spells(state: &mut FrogState, now_ms: f64) -> usize {
    let expired: Vec<&'static str> = state
        .active_spells
        .iter()
        .filter(|(_, s)| s.ends_at_ms <= now_ms)
        .map(|(id, _)| *id)
        .collect();

    for id in &expired {
        state.active_spells.remove(id);
        if let Some(def) = spell_def(id) {
            state.add_log(&format!("  {} faded", def.name), false);
        }
    }
    expired.len()
}

/// Latch every locked upgrade whose current cost is within reach (≤ 2× frogs).
pub fn unlock_eligible_upgrades(state: &mut FrogState) {
    let frogs = state.game.total_frogs as f64;
    let mut newly: Vec<&'static str> = Vec::new();
    for upgrade in state.upgrades.iter_mut().filter(|u| !u.unlocked) {
        if upgrade.current_cost as f64 / 2.0 <= frogs {
            upgrade.unlocked = true;
            newly.push(upgrade.def.name);
        }
    }
    for name in newly {
        state.add_log(&format!("🔓 {} appeared in the shop", name), true);
    }
}

/// Latch every achievement whose goal is met.
pub fn check_achievements(state: &mut FrogState) {
    let frogs = state.game.total_frogs;
    let clicks = state.game.total_clicks;
    let mut newly: Vec<String> = Vec::new();
    for a in state.achievements.iter_mut().filter(|a| !a.unlocked) {
        let met = match a.def.goal {
            AchievementGoal::Clicks(n) => clicks >= n,
            AchievementGoal::Frogs(n) => frogs >= n,
        };
        if met {
            a.unlocked = true;
            newly.push(format!("🏆 Achievement: {} {}", a.def.emoji, a.def.name));
        }
    }
    for msg in newly {
        state.add_log(&msg, true);
    }
}

/// Whether the player could afford an upgrade right now.
pub fn can_afford_upgrade(state: &FrogState, id: &str) -> bool {
    state
        .upgrade(id)
        .is_some_and(|u| state.game.total_frogs >= u.current_cost)
}

pub fn can_afford_spell(state: &FrogState, id: &str) -> bool {
    spell_def(id).is_some_and(|s| state.game.total_frogs >= s.cost)
}

/// Description of an upgrade's effect, e.g. "+2 click power" or "+5/sec".
pub fn upgrade_effect_label(id: &str) -> String {
    match upgrade_def(id) {
        Some(def) => match def.kind {
            UpgradeKind::Click => format!("+{} click power", def.multiplier),
            UpgradeKind::Auto => format!("+{}/sec", def.multiplier),
        },
        None => String::new(),
    }
}

/// Compact number: 1.23K / 4.56M / 7.89B, plain integer below 1000.
pub fn format_number(n: f64) -> String {
    if n < 0.0 {
        return format!("-{}", format_number(-n));
    }
    if n >= 1e9 {
        format!("{:.2}B", n / 1e9)
    } else if n >= 1e6 {
        format!("{:.2}M", n / 1e6)
    } else if n >= 1e3 {
        format!("{:.2}K", n / 1e3)
    } else {
        format!("{}", n.floor() as u64)
    }
}

/// Remaining time: "45s" or "1:05".
pub fn format_duration(ms: f64) -> String {
    let seconds = (ms / 1000.0).ceil().max(0.0) as u64;
    if seconds >= 60 {
        format!("{}:{:02}", seconds / 60, seconds % 60)
    } else {
        format!("{}s", seconds)
    }
}
