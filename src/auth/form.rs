//! Sign-in / sign-up form state and its input handling.

use crate::config::AppConfig;
use crate::input::InputEvent;
use crate::store::Store;

use super::jar::TokenJar;
use super::validate::{EMAIL_MAX, PASSWORD_MAX, USERNAME_MAX};
use super::{login, sign_up, AuthUser};

pub const FOCUS_EMAIL: u16 = 500;
pub const FOCUS_USERNAME: u16 = 501;
pub const FOCUS_PASSWORD: u16 = 502;
pub const SUBMIT: u16 = 503;
pub const TOGGLE_MODE: u16 = 504;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    SignIn,
    SignUp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Email,
    Username,
    Password,
}

impl Field {
    fn max_len(self) -> usize {
        match self {
            Field::Email => EMAIL_MAX,
            Field::Username => USERNAME_MAX,
            Field::Password => PASSWORD_MAX,
        }
    }
}

/// Everything the services need to complete a submit.
pub struct Services<'a> {
    pub store: &'a mut dyn Store,
    pub jar: &'a mut dyn TokenJar,
    pub config: &'a AppConfig,
    pub now_ms: f64,
}

pub struct AuthForm {
    pub mode: Mode,
    pub email: String,
    pub username: String,
    pub password: String,
    pub focus: Field,
    /// Message from the last failed submit.
    pub error: Option<String>,
}

impl Default for AuthForm {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthForm {
    pub fn new() -> Self {
        Self {
            mode: Mode::SignIn,
            email: String::new(),
            username: String::new(),
            password: String::new(),
            focus: Field::Email,
            error: None,
        }
    }

    /// Fields shown in the current mode, in tab order.
    pub fn fields(&self) -> &'static [Field] {
        match self.mode {
            Mode::SignIn => &[Field::Email, Field::Password],
            Mode::SignUp => &[Field::Email, Field::Username, Field::Password],
        }
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Email => &self.email,
            Field::Username => &self.username,
            Field::Password => &self.password,
        }
    }

    fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Email => &mut self.email,
            Field::Username => &mut self.username,
            Field::Password => &mut self.password,
        }
    }

    fn focus_next(&mut self) {
        let fields = self.fields();
        let idx = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(idx + 1) % fields.len()];
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            Mode::SignIn => Mode::SignUp,
            Mode::SignUp => Mode::SignIn,
        };
        if !self.fields().contains(&self.focus) {
            self.focus = Field::Email;
        }
        self.error = None;
    }

    /// Handle one event. Returns the user once a submit succeeds.
    pub fn handle_input(&mut self, event: &InputEvent, services: Services<'_>) -> Option<AuthUser> {
        match event {
            InputEvent::Key(c) => {
                let field = self.focus;
                let value = self.value_mut(field);
                if value.chars().count() < field.max_len() {
                    value.push(*c);
                }
                None
            }
            InputEvent::Backspace => {
                self.value_mut(self.focus).pop();
                None
            }
            InputEvent::Tab => {
                self.focus_next();
                None
            }
            InputEvent::Esc => {
                self.toggle_mode();
                None
            }
            InputEvent::Enter => self.submit(services),
            InputEvent::Click(FOCUS_EMAIL) => {
                self.focus = Field::Email;
                None
            }
            InputEvent::Click(FOCUS_USERNAME) if self.mode == Mode::SignUp => {
                self.focus = Field::Username;
                None
            }
            InputEvent::Click(FOCUS_PASSWORD) => {
                self.focus = Field::Password;
                None
            }
            InputEvent::Click(SUBMIT) => self.submit(services),
            InputEvent::Click(TOGGLE_MODE) => {
                self.toggle_mode();
                None
            }
            InputEvent::Click(_) => None,
        }
    }

    /// Run sign-up or login with the current fields.
    pub fn submit(&mut self, services: Services<'_>) -> Option<AuthUser> {
        let Services {
            store,
            jar,
            config,
            now_ms,
        } = services;
        let result = match self.mode {
            Mode::SignUp => sign_up(
                store,
                jar,
                config,
                &self.email,
                &self.username,
                &self.password,
                now_ms,
            ),
            Mode::SignIn => login(store, jar, config, &self.email, &self.password, now_ms),
        };
        match result {
            Ok(user) => {
                self.password.clear();
                self.error = None;
                Some(user)
            }
            Err(e) => {
                crate::console::log(&format!("auth rejected: {e}"));
                self.password.clear();
                self.focus = Field::Password;
                self.error = Some(e.to_string());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jar::MemoryJar;
    use crate::store::memory::MemoryStore;

    const GOOD_PASSWORD: &str = "Swamp-Magic-2024!";

    fn config() -> AppConfig {
        AppConfig {
            bcrypt_cost: 4,
            ..AppConfig::default()
        }
    }

    fn type_text(form: &mut AuthForm, text: &str, store: &mut MemoryStore, jar: &mut MemoryJar) {
        let config = config();
        for c in text.chars() {
            form.handle_input(
                &InputEvent::Key(c),
                Services {
                    store: &mut *store,
                    jar: &mut *jar,
                    config: &config,
                    now_ms: 0.0,
                },
            );
        }
    }

    fn press(form: &mut AuthForm, event: InputEvent, store: &mut MemoryStore, jar: &mut MemoryJar) -> Option<AuthUser> {
        let config = config();
        form.handle_input(
            &event,
            Services {
                store: &mut *store,
                jar: &mut *jar,
                config: &config,
                now_ms: 1_000.0,
            },
        )
    }

    #[test]
    fn tab_cycles_visible_fields() {
        let mut form = AuthForm::new();
        let (mut store, mut jar) = (MemoryStore::new(), MemoryJar::new());
        press(&mut form, InputEvent::Tab, &mut store, &mut jar);
        assert_eq!(form.focus, Field::Password);
        press(&mut form, InputEvent::Tab, &mut store, &mut jar);
        assert_eq!(form.focus, Field::Email);

        form.toggle_mode();
        press(&mut form, InputEvent::Tab, &mut store, &mut jar);
        assert_eq!(form.focus, Field::Username);
    }

    #[test]
    fn typing_and_backspace() {
        let mut form = AuthForm::new();
        let (mut store, mut jar) = (MemoryStore::new(), MemoryJar::new());
        type_text(&mut form, "frog", &mut store, &mut jar);
        press(&mut form, InputEvent::Backspace, &mut store, &mut jar);
        assert_eq!(form.email, "fro");
    }

    #[test]
    fn input_is_capped() {
        let mut form = AuthForm::new();
        form.toggle_mode();
        form.focus = Field::Username;
        let (mut store, mut jar) = (MemoryStore::new(), MemoryJar::new());
        type_text(&mut form, &"a".repeat(40), &mut store, &mut jar);
        assert_eq!(form.username.len(), USERNAME_MAX);
    }

    #[test]
    fn sign_up_then_sign_in() {
        let (mut store, mut jar) = (MemoryStore::new(), MemoryJar::new());

        let mut form = AuthForm::new();
        press(&mut form, InputEvent::Click(TOGGLE_MODE), &mut store, &mut jar);
        assert_eq!(form.mode, Mode::SignUp);
        type_text(&mut form, "lily@pond.io", &mut store, &mut jar);
        press(&mut form, InputEvent::Click(FOCUS_USERNAME), &mut store, &mut jar);
        type_text(&mut form, "ribbit", &mut store, &mut jar);
        press(&mut form, InputEvent::Click(FOCUS_PASSWORD), &mut store, &mut jar);
        type_text(&mut form, GOOD_PASSWORD, &mut store, &mut jar);
        let user = press(&mut form, InputEvent::Enter, &mut store, &mut jar).expect("signed up");
        assert_eq!(user.username, "ribbit");
        assert!(form.password.is_empty());

        let mut form = AuthForm::new();
        type_text(&mut form, "LILY@pond.io", &mut store, &mut jar);
        form.focus = Field::Password;
        type_text(&mut form, GOOD_PASSWORD, &mut store, &mut jar);
        let again = press(&mut form, InputEvent::Click(SUBMIT), &mut store, &mut jar).expect("signed in");
        assert_eq!(again.owner_id, user.owner_id);
    }

    #[test]
    fn failure_shows_message_and_clears_password() {
        let (mut store, mut jar) = (MemoryStore::new(), MemoryJar::new());
        let mut form = AuthForm::new();
        type_text(&mut form, "lily@pond.io", &mut store, &mut jar);
        form.focus = Field::Password;
        type_text(&mut form, GOOD_PASSWORD, &mut store, &mut jar);
        assert!(press(&mut form, InputEvent::Enter, &mut store, &mut jar).is_none());
        assert_eq!(form.error.as_deref(), Some("Invalid credentials"));
        assert!(form.password.is_empty());
        assert!(jar.get().is_none());
    }

    #[test]
    fn username_click_ignored_when_signing_in() {
        let (mut store, mut jar) = (MemoryStore::new(), MemoryJar::new());
        let mut form = AuthForm::new();
        press(&mut form, InputEvent::Click(FOCUS_USERNAME), &mut store, &mut jar);
        assert_eq!(form.focus, Field::Email);
    }
}
