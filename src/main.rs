mod app;
mod auth;
mod config;
mod console;
mod frog;
mod input;
mod store;
mod time;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};

use app::App;
use config::AppConfig;
use input::{pixel_x_to_col, pixel_y_to_row, ClickState, InputEvent};
use time::now_ms;

/// Query the grid container's bounding rect and convert pixel coordinates to a cell.
fn dom_pixel_to_cell(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<(u16, u16)> {
    let window = web_sys::window()?;
    let document = window.document()?;

    // DomBackend creates a <div> as the grid container inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    let click_x = f64::from(mouse_x) - rect.left();
    let click_y = f64::from(mouse_y) - rect.top();

    let col = pixel_x_to_col(click_x, rect.width(), cs.terminal_cols)?;
    let row = pixel_y_to_row(click_y, rect.height(), cs.terminal_rows)?;
    Some((col, row))
}

#[cfg(target_arch = "wasm32")]
fn open_app(config: AppConfig) -> App {
    App::new(
        Box::new(store::local::LocalStore::open()),
        Box::new(auth::jar::CookieJar),
        config,
        now_ms(),
    )
}

#[cfg(not(target_arch = "wasm32"))]
fn open_app(config: AppConfig) -> App {
    App::new(
        Box::new(store::memory::MemoryStore::new()),
        Box::new(auth::jar::MemoryJar::new()),
        config,
        now_ms(),
    )
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();

    let app = Rc::new(RefCell::new(open_app(AppConfig::from_env())));
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    // Mouse/touch click handler
    terminal.on_mouse_event({
        let app = app.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }

            let cs = click_state.borrow();
            if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                return;
            }
            let target = dom_pixel_to_cell(mouse_event.x, mouse_event.y, &cs)
                .and_then(|(col, row)| cs.hit_test(col, row));
            drop(cs);

            if let Some(action_id) = target {
                app.borrow_mut()
                    .handle_input(&InputEvent::Click(action_id), now_ms());
            }
        }
    });

    // Keyboard handler
    terminal.on_key_event({
        let app = app.clone();
        move |key_event| {
            let event = match key_event.code {
                KeyCode::Char(c) => InputEvent::Key(c),
                KeyCode::Backspace => InputEvent::Backspace,
                KeyCode::Enter => InputEvent::Enter,
                KeyCode::Tab => InputEvent::Tab,
                KeyCode::Esc => InputEvent::Esc,
                _ => return,
            };
            app.borrow_mut().handle_input(&event, now_ms());
        }
    });

    terminal.draw_web({
        let click_state = click_state.clone();
        move |f| {
            let now = now_ms();
            let mut app = app.borrow_mut();
            app.frame(now);

            let size = f.area();
            let mut cs = click_state.borrow_mut();
            cs.terminal_cols = size.width;
            cs.terminal_rows = size.height;
            cs.clear_targets();

            app.render(f, size, &mut cs, now);
        }
    });

    Ok(())
}
