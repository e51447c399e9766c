//! Frog Wizard rendering: pond, shop, spellbook, feats, codex and ranks.

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::{ClickableList, TabBar};

use super::actions::*;
use super::catalog::{SpellEffect, SPELLS};
use super::logic::{
    can_afford_spell, can_afford_upgrade, click_power, format_duration, format_number,
    passive_rate, upgrade_effect_label,
};
use super::state::Panel;
use super::FrogGame;

const FROG_ART: &[&str] = &["  @..@  ", " (----) ", "( >__< )", " ^^  ^^ "];
const FROG_CLICK_ART: &[&str] = &["  @..@  ", " (-oo-) ", "( >OO< )", " ^^  ^^ "];

/// Ripples drawn under the frog while frogs are trickling in.
const RIPPLE: &[&str] = &["~ ~ ~ ~", " ~ ~ ~ ", "~  ~  ~", " ~   ~ "];

pub fn render(game: &FrogGame, f: &mut Frame, area: Rect, cs: &mut ClickState, now_ms: f64) {
    // log panel on the right when wide enough
    let (main_area, log_area) = if area.width >= 80 {
        let h = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(area);
        (h[0], Some(h[1]))
    } else {
        (area, None)
    };

    let spell_rows = spell_status_lines(game, now_ms).len() as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(8 + spell_rows),
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(main_area);

    render_header(game, f, chunks[0]);
    render_pond(game, f, chunks[1], cs, now_ms);
    render_tabs(game, f, chunks[2], cs);
    match game.state.panel {
        Panel::Upgrades => render_upgrades(game, f, chunks[3], cs),
        Panel::Spells => render_spells(game, f, chunks[3], cs, now_ms),
        Panel::Achievements => render_achievements(game, f, chunks[3]),
        Panel::Lore => render_codex(game, f, chunks[3], cs),
        Panel::Leaderboard => render_leaderboard(game, f, chunks[3], cs),
    }
    render_footer(f, chunks[4], cs);

    if let Some(log_area) = log_area {
        render_log(game, f, log_area);
    }
}

fn render_header(game: &FrogGame, f: &mut Frame, area: Rect) {
    let s = &game.state;
    let line = Line::from(vec![
        Span::styled(" 🐸 ", Style::default()),
        Span::styled(
            format_number(s.game.total_frogs as f64),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" frogs  ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("{}/s", format_number(s.game.frogs_per_second)),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("  🖱 {}", format_number(s.game.total_clicks as f64)),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(format!(" Frog Wizard · {} ", game.user.username));
    f.render_widget(Paragraph::new(line).block(block), area);
}

fn spell_status_lines(game: &FrogGame, now_ms: f64) -> Vec<Line<'static>> {
    let s = &game.state;
    let mut lines = Vec::new();
    if s.golden_clicks > 0 {
        lines.push(Line::from(Span::styled(
            format!("✨ Golden Touch: {} clicks left", s.golden_clicks),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
    }
    for def in SPELLS.iter().filter(|d| s.active_spells.contains_key(d.id)) {
        let color = match def.effect {
            SpellEffect::ClickMultiplier => Color::Cyan,
            _ => Color::Magenta,
        };
        lines.push(Line::from(Span::styled(
            format!(
                "{} {} ×{} · {}",
                def.emoji,
                def.name,
                def.multiplier,
                format_duration(s.spell_remaining_ms(def.id, now_ms))
            ),
            Style::default().fg(color),
        )));
    }
    lines
}

fn render_pond(game: &FrogGame, f: &mut Frame, area: Rect, cs: &mut ClickState, now_ms: f64) {
    let s = &game.state;
    let art = if s.click_flash > 0 { FROG_CLICK_ART } else { FROG_ART };
    let frog_color = if s.crit_flash > 0 {
        Color::Red
    } else if s.golden_clicks > 0 {
        Color::Yellow
    } else if s.click_flash > 0 {
        Color::LightGreen
    } else {
        Color::Green
    };

    let mut lines: Vec<Line> = art
        .iter()
        .map(|row| Line::from(Span::styled(*row, Style::default().fg(frog_color).add_modifier(Modifier::BOLD))))
        .collect();

    let ripple = if passive_rate(s) > 0.0 {
        RIPPLE[(s.anim_frame / 4) as usize % RIPPLE.len()]
    } else {
        ""
    };
    lines.push(Line::from(Span::styled(ripple, Style::default().fg(Color::Blue))));

    let feedback = if s.crit_flash > 0 {
        Span::styled(
            format!("CRITICAL! +{}", format_number(s.last_applied as f64)),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )
    } else if s.click_flash > 0 {
        Span::styled(
            format!("+{}", format_number(s.last_applied as f64)),
            Style::default().fg(Color::LightGreen),
        )
    } else {
        Span::styled(
            format!("tap the frog · +{} per click", format_number(click_power(s) as f64)),
            Style::default().fg(Color::DarkGray),
        )
    };
    lines.push(Line::from(feedback));
    lines.extend(spell_status_lines(game, now_ms));

    let border_color = if s.crit_flash > 0 { Color::Red } else { Color::DarkGray };
    let block = Block::default()
        .borders(if is_narrow_layout(area.width) {
            Borders::TOP | Borders::BOTTOM
        } else {
            Borders::ALL
        })
        .border_style(Style::default().fg(border_color));
    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(block),
        area,
    );
    cs.add_click_target(area, CLICK_FROG);
}

fn render_tabs(game: &FrogGame, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let active = game.state.panel;
    let unread: usize = game.codex.iter().map(|g| g.unread()).sum();
    let mut bar = TabBar::new("│");
    for &panel in Panel::all() {
        let style = if panel == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Green)
        };
        let label = if panel == Panel::Lore && unread > 0 {
            format!("{} ({})", panel.label(), unread)
        } else {
            panel.label().to_string()
        };
        bar = bar.tab(label, style, tab_action(panel));
    }
    bar.render(f, area, cs);
}

fn tab_action(panel: Panel) -> u16 {
    match panel {
        Panel::Upgrades => TAB_UPGRADES,
        Panel::Spells => TAB_SPELLS,
        Panel::Achievements => TAB_ACHIEVEMENTS,
        Panel::Lore => TAB_LORE,
        Panel::Leaderboard => TAB_LEADERBOARD,
    }
}

fn panel_block(title: &str, color: Color) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(title)
}

fn render_list(f: &mut Frame, area: Rect, cs: &mut ClickState, cl: ClickableList, block: Block) {
    cl.register_targets_with_block(area, &block, cs, 0);
    f.render_widget(
        Paragraph::new(cl.into_lines()).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn render_upgrades(game: &FrogGame, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let s = &game.state;
    let mut cl = ClickableList::new();

    for (i, u) in s.upgrades.iter().enumerate() {
        if !u.unlocked {
            cl.push(Line::from(Span::styled(" ???", Style::default().fg(Color::DarkGray))));
            continue;
        }
        let affordable = can_afford_upgrade(s, u.def.id);
        let style = if affordable {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let key = format!(" [{}] ", i + 1);
        cl.push_clickable(
            Line::from(vec![
                Span::styled(key, Style::default().fg(Color::Yellow)),
                Span::styled(format!("{} {} ", u.def.emoji, u.def.name), style),
                Span::styled(format!("×{} ", u.quantity), Style::default().fg(Color::Cyan)),
                Span::styled(
                    format!("🐸{}", format_number(u.current_cost as f64)),
                    if affordable {
                        Style::default().fg(Color::Green)
                    } else {
                        Style::default().fg(Color::Red)
                    },
                ),
                Span::styled(
                    format!("  {}", upgrade_effect_label(u.def.id)),
                    Style::default().fg(Color::DarkGray),
                ),
            ]),
            BUY_UPGRADE_BASE + i as u16,
        );
        cl.push(Line::from(Span::styled(
            format!("     {}", u.def.description),
            Style::default().fg(Color::DarkGray),
        )));
    }

    render_list(f, area, cs, cl, panel_block(" Shop ", Color::Green));
}

fn render_spells(game: &FrogGame, f: &mut Frame, area: Rect, cs: &mut ClickState, now_ms: f64) {
    let s = &game.state;
    let mut cl = ClickableList::new();

    for (i, def) in SPELLS.iter().enumerate() {
        let affordable = can_afford_spell(s, def.id);
        let remaining = s.spell_remaining_ms(def.id, now_ms);
        let status = if remaining > 0.0 {
            Span::styled(
                format!("  active {}", format_duration(remaining)),
                Style::default().fg(Color::Magenta),
            )
        } else if def.effect == SpellEffect::GoldenClicks && s.golden_clicks > 0 {
            Span::styled(
                format!("  {} left", s.golden_clicks),
                Style::default().fg(Color::Yellow),
            )
        } else {
            Span::raw("")
        };
        let key = format!(" [{}] ", i + 1);
        cl.push_clickable(
            Line::from(vec![
                Span::styled(key, Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!("{} {} ", def.emoji, def.name),
                    if affordable {
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::DarkGray)
                    },
                ),
                Span::styled(
                    format!("🐸{}", format_number(def.cost as f64)),
                    if affordable {
                        Style::default().fg(Color::Green)
                    } else {
                        Style::default().fg(Color::Red)
                    },
                ),
                status,
            ]),
            CAST_SPELL_BASE + i as u16,
        );
        cl.push(Line::from(Span::styled(
            format!("     {}", def.description),
            Style::default().fg(Color::DarkGray),
        )));
    }

    render_list(f, area, cs, cl, panel_block(" Spellbook ", Color::Magenta));
}

fn render_achievements(game: &FrogGame, f: &mut Frame, area: Rect) {
    let s = &game.state;
    let lines: Vec<Line> = s
        .achievements
        .iter()
        .map(|a| {
            if a.unlocked {
                Line::from(vec![
                    Span::raw(format!(" {} ", a.def.emoji)),
                    Span::styled(a.def.name, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                    Span::styled(format!("  {}", a.def.description), Style::default().fg(Color::Gray)),
                ])
            } else {
                Line::from(Span::styled(
                    format!(" 🔒 {}", a.def.description),
                    Style::default().fg(Color::DarkGray),
                ))
            }
        })
        .collect();

    let title = format!(
        " Feats {}/{} ",
        s.unlocked_achievement_count(),
        s.achievements.len()
    );
    f.render_widget(
        Paragraph::new(lines)
            .block(panel_block(&title, Color::Yellow))
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn render_codex(game: &FrogGame, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let mut cl = ClickableList::new();

    if game.codex.is_empty() {
        cl.push(Line::from(Span::styled(
            " The codex is empty. Keep conjuring.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    if let Some(group) = game.open_guild.and_then(|i| game.codex.get(i)) {
        cl.push_clickable(
            Line::from(Span::styled(
                format!(" ◂ {}", group.guild),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            CLOSE_GUILD,
        );
        for row in &group.rows {
            cl.push(Line::from(""));
            cl.push(Line::from(Span::styled(
                format!(" {}", row.entry.title),
                Style::default().fg(Color::Yellow),
            )));
            cl.push(Line::from(Span::styled(
                format!("   {}", row.entry.body),
                Style::default().fg(Color::Gray),
            )));
        }
    } else {
        for (i, group) in game.codex.iter().enumerate() {
            let unread = group.unread();
            let badge = if unread > 0 {
                Span::styled(format!("  {} new", unread), Style::default().fg(Color::Green))
            } else {
                Span::raw("")
            };
            let key = format!(" [{}] ", i + 1);
            cl.push_clickable(
                Line::from(vec![
                    Span::styled(key, Style::default().fg(Color::Yellow)),
                    Span::styled(group.guild, Style::default().fg(Color::White)),
                    Span::styled(
                        format!(" ({})", group.rows.len()),
                        Style::default().fg(Color::DarkGray),
                    ),
                    badge,
                ]),
                OPEN_GUILD_BASE + i as u16,
            );
        }
    }

    render_list(f, area, cs, cl, panel_block(" Codex ", Color::Cyan));
}

fn render_leaderboard(game: &FrogGame, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let mut cl = ClickableList::new();

    if let Some(err) = &game.leaderboard_error {
        cl.push(Line::from(Span::styled(
            format!(" {}", err),
            Style::default().fg(Color::Red),
        )));
    }
    for entry in &game.leaderboard {
        let is_me = entry.owner_id == game.user.owner_id;
        let style = if is_me {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        cl.push(Line::from(vec![
            Span::styled(format!(" {:>2}. ", entry.rank), Style::default().fg(Color::DarkGray)),
            Span::styled(format!("{:<20}", entry.username), style),
            Span::styled(
                format_number(entry.total_frogs),
                Style::default().fg(Color::Green),
            ),
        ]));
    }
    cl.push(Line::from(""));
    cl.push_clickable(
        Line::from(Span::styled(" [r] Refresh", Style::default().fg(Color::Yellow))),
        REFRESH_LEADERBOARD,
    );

    render_list(f, area, cs, cl, panel_block(" Ranks ", Color::Blue));
}

fn render_footer(f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let hint = Line::from(vec![
        Span::styled(" space", Style::default().fg(Color::Yellow)),
        Span::styled(" conjure  ", Style::default().fg(Color::DarkGray)),
        Span::styled("1-6", Style::default().fg(Color::Yellow)),
        Span::styled(" pick  ", Style::default().fg(Color::DarkGray)),
        Span::styled("u/s/a/l/b", Style::default().fg(Color::Yellow)),
        Span::styled(" panels", Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(Paragraph::new(hint), area);

    let label = " sign out ";
    let width = (label.len() as u16).min(area.width);
    let logout = Rect::new(area.x + area.width - width, area.y, width, 1);
    f.render_widget(
        Paragraph::new(Span::styled(label, Style::default().fg(Color::Black).bg(Color::DarkGray))),
        logout,
    );
    cs.add_click_target(logout, LOGOUT);
}

fn render_log(game: &FrogGame, f: &mut Frame, area: Rect) {
    let inner_height = area.height.saturating_sub(2) as usize;
    let start = game.state.log.len().saturating_sub(inner_height);
    let lines: Vec<Line> = game.state.log[start..]
        .iter()
        .map(|entry| {
            let style = if entry.is_important {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(Span::styled(entry.text.as_str(), style))
        })
        .collect();
    f.render_widget(
        Paragraph::new(lines)
            .block(panel_block(" Pond Log ", Color::DarkGray))
            .wrap(Wrap { trim: false }),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthUser;
    use crate::config::AppConfig;
    use crate::store::memory::MemoryStore;
    use ratzilla::ratatui::backend::TestBackend;
    use ratzilla::ratatui::Terminal;

    fn game() -> FrogGame {
        let mut store = MemoryStore::new();
        let user = AuthUser {
            owner_id: "o1".into(),
            email: "lily@pond.io".into(),
            username: "ribbit".into(),
        };
        FrogGame::start(user, &mut store, &AppConfig::default(), 0.0)
    }

    fn draw(game: &FrogGame, width: u16, height: u16) -> ClickState {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let mut cs = ClickState::new();
        terminal
            .draw(|f| render(game, f, f.area(), &mut cs, 0.0))
            .unwrap();
        cs
    }

    #[test]
    fn pond_is_clickable() {
        let g = game();
        let cs = draw(&g, 100, 40);
        // pond starts right under the 3-row header
        assert_eq!(cs.hit_test(10, 5), Some(CLICK_FROG));
    }

    #[test]
    fn every_tab_registered() {
        let g = game();
        let cs = draw(&g, 100, 40);
        let tab_row = 3 + 8;
        let hits: Vec<u16> = (0..62).filter_map(|x| cs.hit_test(x, tab_row)).collect();
        for id in [TAB_UPGRADES, TAB_SPELLS, TAB_ACHIEVEMENTS, TAB_LORE, TAB_LEADERBOARD] {
            assert!(hits.contains(&id), "tab {} missing", id);
        }
    }

    #[test]
    fn shop_rows_buy() {
        let g = game();
        let cs = draw(&g, 100, 40);
        // shop block border at 12, first row at 13, its description at 14
        assert_eq!(cs.hit_test(5, 13), Some(BUY_UPGRADE_BASE));
        assert_eq!(cs.hit_test(5, 14), None);
        assert_eq!(cs.hit_test(5, 15), Some(BUY_UPGRADE_BASE + 1));
    }

    #[test]
    fn shop_shows_descriptions() {
        let g = game();
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        let mut cs = ClickState::new();
        terminal
            .draw(|f| render(&g, f, f.area(), &mut cs, 0.0))
            .unwrap();
        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(screen.contains("A comfy spot for more frogs"));
        assert!(screen.contains("Increases clicking power"));
    }

    #[test]
    fn narrow_layout_renders() {
        let mut g = game();
        for &panel in Panel::all() {
            g.state.panel = panel;
            let cs = draw(&g, 40, 30);
            assert!(cs.hit_test(39, 29).is_some());
        }
    }
}
