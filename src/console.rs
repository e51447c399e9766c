//! Browser console logging.
//!
//! On wasm every message goes to `console.log` / `console.warn` with a fixed
//! prefix. On the host target (unit tests) logging is a no-op.

const PREFIX: &str = "Frog Wizard";

#[cfg(target_arch = "wasm32")]
pub fn log(msg: &str) {
    web_sys::console::log_1(&format!("{PREFIX}: {msg}").into());
}

#[cfg(target_arch = "wasm32")]
pub fn warn(msg: &str) {
    web_sys::console::warn_1(&format!("{PREFIX}: {msg}").into());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn log(msg: &str) {
    let _ = (PREFIX, msg);
}

#[cfg(not(target_arch = "wasm32"))]
pub fn warn(msg: &str) {
    let _ = (PREFIX, msg);
}
