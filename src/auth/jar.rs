//! Where the session token lives between page loads.

pub const COOKIE_NAME: &str = "frog_auth";

pub trait TokenJar {
    fn get(&self) -> Option<String>;
    fn set(&mut self, token: &str, days: u32);
    fn clear(&mut self);
}

/// Jar held in memory. Used by tests and native builds.
#[derive(Debug, Default)]
pub struct MemoryJar {
    token: Option<String>,
}

impl MemoryJar {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenJar for MemoryJar {
    fn get(&self) -> Option<String> {
        self.token.clone()
    }

    fn set(&mut self, token: &str, _days: u32) {
        self.token = Some(token.to_string());
    }

    fn clear(&mut self) {
        self.token = None;
    }
}

/// Find `name` in a `document.cookie` string.
pub fn find_cookie(cookies: &str, name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    cookies
        .split(';')
        .map(str::trim_start)
        .find_map(|c| c.strip_prefix(prefix.as_str()))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(target_arch = "wasm32")]
pub use wasm::CookieJar;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::JsCast;

    use super::{find_cookie, TokenJar, COOKIE_NAME};

    fn html_document() -> Option<web_sys::HtmlDocument> {
        web_sys::window()?.document()?.dyn_into::<web_sys::HtmlDocument>().ok()
    }

    /// The `frog_auth` browser cookie.
    pub struct CookieJar;

    impl TokenJar for CookieJar {
        fn get(&self) -> Option<String> {
            let cookies = html_document()?.cookie().ok()?;
            let decoded = js_sys::decode_uri_component(&cookies)
                .map(String::from)
                .unwrap_or(cookies);
            find_cookie(&decoded, COOKIE_NAME)
        }

        fn set(&mut self, token: &str, days: u32) {
            let expires = js_sys::Date::new(&(js_sys::Date::now() + f64::from(days) * 86_400_000.0).into());
            let cookie = format!(
                "{COOKIE_NAME}={token};expires={};path=/;SameSite=Lax",
                String::from(expires.to_utc_string())
            );
            if let Some(doc) = html_document() {
                if let Err(e) = doc.set_cookie(&cookie) {
                    crate::console::warn(&format!("could not store session cookie: {e:?}"));
                }
            }
        }

        fn clear(&mut self) {
            let cookie = format!("{COOKIE_NAME}=; expires=Thu, 01 Jan 1970 00:00:00 UTC; path=/;");
            if let Some(doc) = html_document() {
                let _ = doc.set_cookie(&cookie);
            }
        }
    }
}
