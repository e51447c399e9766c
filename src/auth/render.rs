//! The gate: sign-in / sign-up screen.

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::ClickState;
use crate::widgets::ClickableList;

use super::form::{AuthForm, Field, Mode, FOCUS_EMAIL, FOCUS_PASSWORD, FOCUS_USERNAME, SUBMIT, TOGGLE_MODE};

const BANNER: &[&str] = &[
    "   @..@      @..@   ",
    "  (----)    (----)  ",
    " ( >__< )  ( >__< ) ",
    "  FROG WIZARD GUILD ",
];

fn field_label(field: Field) -> &'static str {
    match field {
        Field::Email => "Email",
        Field::Username => "Username",
        Field::Password => "Password",
    }
}

fn field_action(field: Field) -> u16 {
    match field {
        Field::Email => FOCUS_EMAIL,
        Field::Username => FOCUS_USERNAME,
        Field::Password => FOCUS_PASSWORD,
    }
}

pub fn render(form: &AuthForm, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let width = area.width.min(50);
    let x = area.x + (area.width - width) / 2;
    let column = Rect::new(x, area.y, width, area.height);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(BANNER.len() as u16 + 1),
            Constraint::Min(10),
        ])
        .split(column);

    let banner: Vec<Line> = BANNER
        .iter()
        .map(|row| Line::from(Span::styled(*row, Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))))
        .collect();
    f.render_widget(Paragraph::new(banner).alignment(Alignment::Center), chunks[0]);

    let (title, submit, switch) = match form.mode {
        Mode::SignIn => (" Sign in ", " ▶ Enter the pond ", " New here? Create an account "),
        Mode::SignUp => (" Join the guild ", " ▶ Create account ", " Have an account? Sign in "),
    };

    let mut cl = ClickableList::new();
    for &field in form.fields() {
        let focused = form.focus == field;
        let shown = match field {
            Field::Password => "•".repeat(form.value(field).chars().count()),
            _ => form.value(field).to_string(),
        };
        let cursor = if focused { "▏" } else { "" };
        let label_style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        cl.push_clickable(
            Line::from(vec![
                Span::styled(format!(" {:<9}", field_label(field)), label_style),
                Span::styled(format!("{}{}", shown, cursor), Style::default().fg(Color::White)),
            ]),
            field_action(field),
        );
    }

    cl.push(Line::from(""));
    if let Some(err) = &form.error {
        cl.push(Line::from(Span::styled(
            format!(" {}", err),
            Style::default().fg(Color::Red),
        )));
        cl.push(Line::from(""));
    }
    cl.push_clickable(
        Line::from(Span::styled(
            submit,
            Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        SUBMIT,
    );
    cl.push_clickable(
        Line::from(Span::styled(switch, Style::default().fg(Color::Cyan))),
        TOGGLE_MODE,
    );
    cl.push(Line::from(""));
    cl.push(Line::from(Span::styled(
        " Tab next field · Enter submit · Esc switch",
        Style::default().fg(Color::DarkGray),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(title);
    cl.register_targets_with_block(chunks[1], &block, cs, 0);
    f.render_widget(
        Paragraph::new(cl.into_lines()).block(block).wrap(Wrap { trim: false }),
        chunks[1],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratzilla::ratatui::backend::TestBackend;
    use ratzilla::ratatui::Terminal;

    fn targets(form: &AuthForm) -> Vec<u16> {
        let mut terminal = Terminal::new(TestBackend::new(60, 30)).unwrap();
        let mut cs = ClickState::new();
        terminal.draw(|f| render(form, f, f.area(), &mut cs)).unwrap();
        cs.targets.iter().map(|t| t.action_id).collect()
    }

    #[test]
    fn sign_in_has_no_username_field() {
        let ids = targets(&AuthForm::new());
        assert_eq!(ids, [FOCUS_EMAIL, FOCUS_PASSWORD, SUBMIT, TOGGLE_MODE]);
    }

    #[test]
    fn sign_up_shows_all_fields() {
        let mut form = AuthForm::new();
        form.toggle_mode();
        form.error = Some("Username already taken".into());
        let ids = targets(&form);
        assert_eq!(
            ids,
            [FOCUS_EMAIL, FOCUS_USERNAME, FOCUS_PASSWORD, SUBMIT, TOGGLE_MODE]
        );
    }
}
