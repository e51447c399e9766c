/// Frog Wizard: an incremental frog-conjuring clicker.

pub mod actions;
pub mod catalog;
pub mod logic;
pub mod lore;
pub mod render;
pub mod sfx;
pub mod state;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::auth::AuthUser;
use crate::config::AppConfig;
use crate::input::{ClickState, InputEvent};
use crate::store::leaderboard::{self, LeaderboardEntry};
use crate::store::sync::StatsSync;
use crate::store::Store;
use crate::time::to_datetime;

use actions::*;
use catalog::{SPELLS, UPGRADES};
use logic::ClickOutcome;
use lore::GuildGroup;
use state::{FrogState, Panel};

/// One signed-in play session.
pub struct FrogGame {
    pub state: FrogState,
    pub user: AuthUser,
    sync: StatsSync,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub leaderboard_error: Option<String>,
    leaderboard_limit: usize,
    pub codex: Vec<GuildGroup>,
    /// Index into `codex` of the guild being read.
    pub open_guild: Option<usize>,
}

impl FrogGame {
    /// Restore the player's progress and build the session.
    pub fn start(user: AuthUser, store: &mut dyn Store, config: &AppConfig, now_ms: f64) -> Self {
        // truncation to the low 32 bits is all the RNG needs
        let mut state = FrogState::with_seed(now_ms as u64 as u32);
        let mut sync = StatsSync::new(user.owner_id.clone());
        sync.restore(store, &mut state);
        state.add_log(&format!("🧙 Welcome back, {}!", user.username), true);

        let mut game = Self {
            state,
            user,
            sync,
            leaderboard: Vec::new(),
            leaderboard_error: None,
            leaderboard_limit: config.leaderboard_limit,
            codex: Vec::new(),
            open_guild: None,
        };
        game.refresh_leaderboard(store);
        game.refresh_codex(store);
        game
    }

    /// Cues for the click about to happen, judged on the clicks made so far.
    fn click_sounds(&mut self) -> Vec<sfx::Cue> {
        let state = &mut self.state;
        sfx::click_cues(state.game.total_clicks, || state.next_unit())
    }

    pub fn click(&mut self, now_ms: f64) -> ClickOutcome {
        let cues = self.click_sounds();
        let outcome = logic::register_interaction(&mut self.state, now_ms);
        for cue in cues {
            sfx::play(cue);
        }
        if outcome.critical {
            sfx::play(sfx::Cue::Crit);
        }
        self.sync.queue(&self.state, now_ms);
        outcome
    }

    pub fn buy(&mut self, idx: usize, now_ms: f64) -> bool {
        let Some(def) = UPGRADES.get(idx) else {
            return false;
        };
        let Some(cost) = self.state.upgrade(def.id).map(|u| u.current_cost) else {
            return false;
        };
        if !logic::purchase_upgrade(&mut self.state, def.id) {
            return false;
        }
        self.sync.queue_purchase(def.id, def.name, cost, now_ms);
        self.sync.queue(&self.state, now_ms);
        true
    }

    pub fn cast(&mut self, idx: usize, now_ms: f64) -> bool {
        let Some(def) = SPELLS.get(idx) else {
            return false;
        };
        if !logic::cast_spell(&mut self.state, def.id, now_ms) {
            return false;
        }
        self.sync.queue(&self.state, now_ms);
        true
    }

    /// Run `ticks` accumulation steps.
    pub fn tick(&mut self, ticks: u32) {
        for _ in 0..ticks {
            logic::tick(&mut self.state);
        }
    }

    /// Once-per-second housekeeping: spell expiry, hydration, lore.
    pub fn sweep(&mut self, store: &mut dyn Store, now_ms: f64, hour: u32) {
        logic::expire_spells(&mut self.state, now_ms);
        self.sync.poll(store, &mut self.state);
        match lore::record_unlocks(store, &self.user.owner_id, &self.state, hour, to_datetime(now_ms)) {
            Ok(titles) if !titles.is_empty() => {
                for title in titles {
                    self.state.add_log(&format!("📜 New lore: {}", title), true);
                }
                self.refresh_codex(store);
            }
            Ok(_) => {}
            Err(e) => crate::console::warn(&format!("lore unlock failed: {e}")),
        }
    }

    /// Send queued writes.
    pub fn flush(&mut self, store: &mut dyn Store) {
        if self.sync.has_pending() {
            self.sync.flush(store);
        }
    }

    pub fn refresh_leaderboard(&mut self, store: &dyn Store) {
        match leaderboard::top_players(store, self.leaderboard_limit) {
            Ok(entries) => {
                self.leaderboard = entries;
                self.leaderboard_error = None;
            }
            Err(e) => {
                crate::console::warn(&format!("leaderboard unavailable: {e}"));
                self.leaderboard_error = Some(e.to_string());
            }
        }
    }

    fn refresh_codex(&mut self, store: &dyn Store) {
        match store.lore_unlocks(&self.user.owner_id) {
            Ok(unlocks) => self.codex = lore::codex(&unlocks),
            Err(e) => crate::console::warn(&format!("codex unavailable: {e}")),
        }
    }

    fn toggle_guild(&mut self, idx: usize, store: &mut dyn Store, now_ms: f64) {
        if self.open_guild == Some(idx) {
            self.open_guild = None;
            return;
        }
        let Some(group) = self.codex.get(idx) else {
            return;
        };
        self.open_guild = Some(idx);
        if group.unread() > 0 {
            if let Err(e) = lore::open_guild(store, &self.user.owner_id, group, to_datetime(now_ms)) {
                crate::console::warn(&format!("could not mark lore read: {e}"));
            }
            self.refresh_codex(store);
        }
    }

    fn show(&mut self, panel: Panel, store: &dyn Store) {
        self.state.panel = panel;
        if panel == Panel::Leaderboard {
            self.refresh_leaderboard(store);
        }
    }

    /// Handle an input event. Returns true if consumed.
    pub fn handle_input(&mut self, event: &InputEvent, store: &mut dyn Store, now_ms: f64) -> bool {
        match event {
            InputEvent::Key(c) => self.handle_key(*c, store, now_ms),
            InputEvent::Click(id) => self.handle_click(*id, store, now_ms),
            InputEvent::Esc if self.open_guild.is_some() => {
                self.open_guild = None;
                true
            }
            _ => false,
        }
    }

    fn handle_key(&mut self, key: char, store: &mut dyn Store, now_ms: f64) -> bool {
        if key == ' ' || key == 'f' {
            self.click(now_ms);
            return true;
        }
        if let Some(&panel) = Panel::all().iter().find(|p| p.key() == key) {
            self.show(panel, store);
            return true;
        }
        if key == 'r' && self.state.panel == Panel::Leaderboard {
            self.refresh_leaderboard(store);
            return true;
        }
        let Some(digit) = key.to_digit(10).filter(|d| *d >= 1) else {
            return false;
        };
        let idx = digit as usize - 1;
        match self.state.panel {
            Panel::Upgrades => {
                self.buy(idx, now_ms);
                true
            }
            Panel::Spells => {
                self.cast(idx, now_ms);
                true
            }
            Panel::Lore => {
                self.toggle_guild(idx, store, now_ms);
                true
            }
            _ => false,
        }
    }

    fn handle_click(&mut self, id: u16, store: &mut dyn Store, now_ms: f64) -> bool {
        match id {
            CLICK_FROG => {
                self.click(now_ms);
            }
            REFRESH_LEADERBOARD => self.refresh_leaderboard(store),
            TAB_UPGRADES => self.show(Panel::Upgrades, store),
            TAB_SPELLS => self.show(Panel::Spells, store),
            TAB_ACHIEVEMENTS => self.show(Panel::Achievements, store),
            TAB_LORE => self.show(Panel::Lore, store),
            TAB_LEADERBOARD => self.show(Panel::Leaderboard, store),
            CLOSE_GUILD => self.open_guild = None,
            id if (BUY_UPGRADE_BASE..CAST_SPELL_BASE).contains(&id) => {
                self.buy((id - BUY_UPGRADE_BASE) as usize, now_ms);
            }
            id if (CAST_SPELL_BASE..OPEN_GUILD_BASE).contains(&id) => {
                self.cast((id - CAST_SPELL_BASE) as usize, now_ms);
            }
            id if (OPEN_GUILD_BASE..CLOSE_GUILD).contains(&id) => {
                self.toggle_guild((id - OPEN_GUILD_BASE) as usize, store, now_ms);
            }
            _ => return false,
        }
        true
    }

    pub fn render(&self, f: &mut Frame, area: Rect, cs: &mut ClickState, now_ms: f64) {
        render::render(self, f, area, cs, now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::store::{NewAccount, StatsMerge};

    const NOON: u32 = 12;

    fn setup() -> (MemoryStore, FrogGame) {
        let mut store = MemoryStore::new();
        store
            .create_account(NewAccount {
                owner_id: "o1".into(),
                email: "lily@pond.io".into(),
                username: "ribbit".into(),
                password_hash: "h".into(),
                created_at: to_datetime(0.0),
            })
            .unwrap();
        let user = AuthUser {
            owner_id: "o1".into(),
            email: "lily@pond.io".into(),
            username: "ribbit".into(),
        };
        let game = FrogGame::start(user, &mut store, &AppConfig::default(), 1_000.0);
        (store, game)
    }

    #[test]
    fn click_persists_after_flush() {
        let (mut store, mut game) = setup();
        game.handle_input(&InputEvent::Key(' '), &mut store, 2_000.0);
        game.handle_input(&InputEvent::Click(CLICK_FROG), &mut store, 2_100.0);
        game.flush(&mut store);

        let stats = store.stats("o1").unwrap().unwrap();
        assert_eq!(stats.total_clicks, 2.0);
        assert_eq!(stats.total_frogs, game.state.game.total_frogs as f64);
        assert_eq!(stats.last_active_at, to_datetime(2_100.0));
    }

    #[test]
    fn own_writes_do_not_roll_back_local_progress() {
        let (mut store, mut game) = setup();
        game.click(2_000.0);
        game.flush(&mut store);
        game.state.game.total_frogs += 10;
        game.sweep(&mut store, 3_000.0, NOON);
        assert!(game.state.game.total_frogs >= 11);
    }

    #[test]
    fn foreign_change_hydrates_on_sweep() {
        let (mut store, mut game) = setup();
        store
            .merge_stats(
                "o1",
                &StatsMerge {
                    total_frogs: 12_345,
                    total_clicks: 99,
                    frogs_per_second: 0.0,
                    last_active_at: to_datetime(0.0),
                },
            )
            .unwrap();
        game.sweep(&mut store, 2_000.0, NOON);
        assert_eq!(game.state.game.total_frogs, 12_345);
        assert_eq!(game.state.game.total_clicks, 99);
    }

    #[test]
    fn purchase_goes_to_ledger_and_survives_restart() {
        let (mut store, mut game) = setup();
        game.state.game.total_frogs = 100;
        assert!(game.handle_input(&InputEvent::Click(BUY_UPGRADE_BASE), &mut store, 2_000.0));
        game.flush(&mut store);
        assert_eq!(store.purchases("o1").unwrap()[0].total_spent, 15);

        let restarted = FrogGame::start(game.user.clone(), &mut store, &AppConfig::default(), 5_000.0);
        assert_eq!(restarted.state.upgrade("lily-pad").unwrap().quantity, 1);
        assert_eq!(restarted.state.game.total_frogs, 85);
    }

    #[test]
    fn digit_keys_follow_panel() {
        let (mut store, mut game) = setup();
        game.state.game.total_frogs = 1_000;
        game.handle_input(&InputEvent::Key('s'), &mut store, 0.0);
        assert_eq!(game.state.panel, Panel::Spells);
        game.handle_input(&InputEvent::Key('1'), &mut store, 0.0);
        assert!(game.state.active_spells.contains_key("frog-rain"));
        assert_eq!(game.state.game.total_frogs, 0);
    }

    #[test]
    fn unknown_click_not_consumed() {
        let (mut store, mut game) = setup();
        assert!(!game.handle_input(&InputEvent::Click(9_999), &mut store, 0.0));
        assert!(!game.handle_input(&InputEvent::Key('z'), &mut store, 0.0));
    }

    #[test]
    fn sweep_expires_spells() {
        let (mut store, mut game) = setup();
        game.state.game.total_frogs = 1_000;
        game.cast(0, 0.0);
        game.sweep(&mut store, 29_000.0, NOON);
        assert!(!game.state.active_spells.is_empty());
        game.sweep(&mut store, 30_000.0, NOON);
        assert!(game.state.active_spells.is_empty());
    }

    #[test]
    fn sweep_unlocks_lore_and_opening_marks_read() {
        let (mut store, mut game) = setup();
        game.click(0.0);
        game.sweep(&mut store, 1_000.0, NOON);
        assert_eq!(game.codex.len(), 1);
        assert_eq!(game.codex[0].unread(), 1);

        game.handle_input(&InputEvent::Click(TAB_LORE), &mut store, 1_100.0);
        game.handle_input(&InputEvent::Click(OPEN_GUILD_BASE), &mut store, 1_200.0);
        assert_eq!(game.open_guild, Some(0));
        assert_eq!(game.codex[0].unread(), 0);

        game.handle_input(&InputEvent::Esc, &mut store, 1_300.0);
        assert_eq!(game.open_guild, None);
    }

    #[test]
    fn leaderboard_tab_refreshes() {
        let (mut store, mut game) = setup();
        assert_eq!(game.leaderboard.len(), 1);
        assert_eq!(game.leaderboard[0].username, "ribbit");
        game.click(0.0);
        game.flush(&mut store);
        game.handle_input(&InputEvent::Key('b'), &mut store, 0.0);
        assert!(game.leaderboard[0].total_frogs >= 1.0);
    }

    #[test]
    fn tier_two_sounds_start_after_five_hundred_clicks() {
        let (_, mut game) = setup();
        let tier_two = |c: &sfx::Cue| matches!(c, sfx::Cue::Moan | sfx::Cue::Crazy);

        game.state.game.total_clicks = sfx::TIER_TWO_CLICKS;
        let early = (0..3_000).flat_map(|_| game.click_sounds()).filter(tier_two).count();
        assert_eq!(early, 0);

        game.state.game.total_clicks = sfx::TIER_TWO_CLICKS + 1;
        let later = (0..3_000).flat_map(|_| game.click_sounds()).filter(tier_two).count();
        assert!(later > 0);
    }

    #[test]
    fn tick_runs_each_pulse() {
        let (_, mut game) = setup();
        logic::restore_upgrade(&mut game.state, "crystal-ball", 2); // 10/sec
        game.tick(10);
        assert_eq!(game.state.game.total_frogs, 10);
    }
}
