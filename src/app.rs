/// Top-level application: the sign-in gate and the play session.

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::auth::form::{AuthForm, Services};
use crate::auth::jar::TokenJar;
use crate::auth::{self, AuthUser};
use crate::config::AppConfig;
use crate::frog::actions::LOGOUT;
use crate::frog::FrogGame;
use crate::input::{ClickState, InputEvent};
use crate::store::Store;
use crate::time::{local_hour, GameClock};

pub enum AppState {
    /// Showing the sign-in / sign-up form.
    SignedOut(AuthForm),
    Playing(Box<FrogGame>),
}

pub struct App {
    store: Box<dyn Store>,
    jar: Box<dyn TokenJar>,
    config: AppConfig,
    clock: GameClock,
    pub state: AppState,
}

impl App {
    /// Build the app and restore the session from the token jar.
    pub fn new(store: Box<dyn Store>, jar: Box<dyn TokenJar>, config: AppConfig, now_ms: f64) -> Self {
        let clock = GameClock::new(config.tick_ms, config.sweep_ms);
        let mut app = Self {
            store,
            jar,
            config,
            clock,
            state: AppState::SignedOut(AuthForm::new()),
        };
        if let Some(user) = auth::current_user(app.jar.as_mut(), &app.config, now_ms) {
            app.enter(user, now_ms);
        }
        app
    }

    fn enter(&mut self, user: AuthUser, now_ms: f64) {
        crate::console::log(&format!("session for {}", user.username));
        let game = FrogGame::start(user, self.store.as_mut(), &self.config, now_ms);
        self.state = AppState::Playing(Box::new(game));
    }

    fn leave(&mut self) {
        if let AppState::Playing(game) = &mut self.state {
            game.flush(self.store.as_mut());
        }
        auth::logout(self.jar.as_mut());
        self.state = AppState::SignedOut(AuthForm::new());
    }

    pub fn handle_input(&mut self, event: &InputEvent, now_ms: f64) -> bool {
        match &mut self.state {
            AppState::SignedOut(form) => {
                let services = Services {
                    store: self.store.as_mut(),
                    jar: self.jar.as_mut(),
                    config: &self.config,
                    now_ms,
                };
                if let Some(user) = form.handle_input(event, services) {
                    self.enter(user, now_ms);
                }
                true
            }
            AppState::Playing(game) => {
                if game.handle_input(event, self.store.as_mut(), now_ms) {
                    return true;
                }
                match event {
                    InputEvent::Click(LOGOUT) | InputEvent::Key('q') => {
                        self.leave();
                        true
                    }
                    _ => false,
                }
            }
        }
    }

    /// Advance the clocks to `now_ms` and push queued writes.
    pub fn frame(&mut self, now_ms: f64) {
        let pulses = self.clock.update(now_ms);
        let AppState::Playing(game) = &mut self.state else {
            return;
        };
        game.tick(pulses.ticks);
        if pulses.sweeps > 0 {
            game.sweep(self.store.as_mut(), now_ms, local_hour());
        }
        game.flush(self.store.as_mut());
    }

    pub fn render(&self, f: &mut Frame, area: Rect, cs: &mut ClickState, now_ms: f64) {
        match &self.state {
            AppState::SignedOut(form) => auth::render::render(form, f, area, cs),
            AppState::Playing(game) => game.render(f, area, cs, now_ms),
        }
    }
}
