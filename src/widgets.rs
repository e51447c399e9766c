//! Reusable clickable UI components.
//!
//! Each component renders and registers its own click targets, so a label
//! and the area that reacts to it can never drift apart.
//!
//! - [`TabBar`]: horizontal tab navigation.
//! - [`ClickableList`]: vertical list with per-row click targets.

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::style::{Color, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::ClickState;

// ── TabBar ─────────────────────────────────────────────────────

/// A single row of styled tab labels.
///
/// Click targets follow the rendered label widths (emoji and other wide
/// glyphs included), with the gap between two tabs split evenly.
///
/// ```ignore
/// TabBar::new(" │ ")
///     .tab("Shop", tab_style(0), TAB_UPGRADES)
///     .tab("Spells", tab_style(1), TAB_SPELLS)
///     .render(f, area, &mut cs);
/// ```
pub struct TabBar<'a> {
    tabs: Vec<(String, Style, u16)>,
    separator: &'a str,
    block: Option<Block<'a>>,
}

impl<'a> TabBar<'a> {
    pub fn new(separator: &'a str) -> Self {
        Self {
            tabs: Vec::new(),
            separator,
            block: None,
        }
    }

    pub fn tab(mut self, label: impl Into<String>, style: Style, action_id: u16) -> Self {
        self.tabs.push((label.into(), style, action_id));
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    pub fn render(self, f: &mut Frame, area: Rect, cs: &mut ClickState) {
        let mut spans: Vec<Span> = Vec::new();
        let sep_width = Line::from(self.separator).width() as u16;
        let mut tab_widths: Vec<(u16, u16)> = Vec::new();

        for (i, (label, style, action_id)) in self.tabs.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(
                    self.separator,
                    Style::default().fg(Color::DarkGray),
                ));
            }
            let padded = format!(" {} ", label);
            tab_widths.push((Line::from(padded.as_str()).width() as u16, *action_id));
            spans.push(Span::styled(padded, *style));
        }

        let inner = match &self.block {
            Some(block) => block.inner(area),
            None => area,
        };

        let line = Line::from(spans);
        let paragraph = match self.block {
            Some(block) => Paragraph::new(line).block(block),
            None => Paragraph::new(line),
        };
        f.render_widget(paragraph, area);

        cs.register_tab_targets(
            &tab_widths,
            sep_width,
            inner.x,
            area.y,
            inner.width,
            area.height.max(1),
        );
    }
}

// ── ClickableList ──────────────────────────────────────────────

/// Lines to be rendered as one wrapped `Paragraph`, some of which are
/// clickable. Row positions are derived from the line order at
/// registration time, so inserting a line above shifts every target below.
pub struct ClickableList<'a> {
    lines: Vec<Line<'a>>,
    /// (line index, action id)
    actions: Vec<(u16, u16)>,
}

impl<'a> ClickableList<'a> {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn push(&mut self, line: Line<'a>) {
        self.lines.push(line);
    }

    pub fn push_clickable(&mut self, line: Line<'a>, action_id: u16) {
        let idx = self.lines.len() as u16;
        self.actions.push((idx, action_id));
        self.lines.push(line);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn into_lines(self) -> Vec<Line<'a>> {
        self.lines
    }

    /// Rows a line takes once wrapped to `width`, as `Paragraph` renders it.
    pub fn visual_height(line: &Line<'_>, width: u16) -> u16 {
        if width == 0 {
            return 1;
        }
        let rows = Paragraph::new(line.clone())
            .wrap(Wrap { trim: false })
            .line_count(width);
        rows.max(1) as u16
    }

    /// Total wrapped height of the list.
    pub fn total_height(&self, width: u16) -> u16 {
        self.lines
            .iter()
            .map(|l| Self::visual_height(l, width))
            .sum()
    }

    /// Register targets for content rendered inside `area`.
    ///
    /// `top_offset`/`bottom_offset` reserve rows (borders, headers);
    /// `scroll` is the number of visual rows scrolled off the top. With
    /// `inner_width == 0` every line counts as one row.
    pub fn register_targets(
        &self,
        area: Rect,
        cs: &mut ClickState,
        top_offset: u16,
        bottom_offset: u16,
        scroll: u16,
        inner_width: u16,
    ) {
        let content_y = area.y + top_offset;
        let content_end = area.y + area.height.saturating_sub(bottom_offset);

        let mut visual_starts: Vec<u16> = Vec::with_capacity(self.lines.len());
        let mut visual_heights: Vec<u16> = Vec::with_capacity(self.lines.len());
        let mut cumulative: u16 = 0;
        for line in &self.lines {
            visual_starts.push(cumulative);
            let h = if inner_width == 0 {
                1
            } else {
                Self::visual_height(line, inner_width)
            };
            visual_heights.push(h);
            cumulative += h;
        }

        for &(line_idx, action_id) in &self.actions {
            let li = line_idx as usize;
            if li >= self.lines.len() {
                continue;
            }
            let vstart = visual_starts[li];
            for r in 0..visual_heights[li] {
                let vr = vstart + r;
                if vr < scroll {
                    continue;
                }
                let screen_row = content_y + (vr - scroll);
                if screen_row >= content_end {
                    break;
                }
                cs.add_row_target(area, screen_row, action_id);
            }
        }
    }

    /// Register targets for content rendered inside `block` over `area`.
    pub fn register_targets_with_block(
        &self,
        area: Rect,
        block: &Block,
        cs: &mut ClickState,
        scroll: u16,
    ) {
        let inner = block.inner(area);
        self.register_targets(inner, cs, 0, 0, scroll, inner.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratzilla::ratatui::widgets::Borders;

    #[test]
    fn clickable_list_basic() {
        let mut cl = ClickableList::new();
        cl.push(Line::from("header"));
        cl.push_clickable(Line::from("item 0"), 10);
        cl.push_clickable(Line::from("item 1"), 11);
        cl.push(Line::from("footer"));
        assert_eq!(cl.len(), 4);

        let area = Rect::new(0, 5, 80, 10);
        let mut cs = ClickState::new();
        cl.register_targets(area, &mut cs, 1, 1, 0, 0);

        assert_eq!(cs.targets.len(), 2);
        assert_eq!(cs.hit_test(10, 7), Some(10));
        assert_eq!(cs.hit_test(10, 8), Some(11));
        assert_eq!(cs.hit_test(10, 6), None);
        assert_eq!(cs.hit_test(10, 9), None);
    }

    #[test]
    fn clickable_list_with_scroll() {
        let mut cl = ClickableList::new();
        for i in 0..4 {
            cl.push_clickable(Line::from(format!("item {}", i)), 100 + i);
        }

        let area = Rect::new(0, 10, 80, 5);
        let mut cs = ClickState::new();
        cl.register_targets(area, &mut cs, 0, 1, 2, 0);

        assert_eq!(cs.targets.len(), 2);
        assert_eq!(cs.hit_test(10, 10), Some(102));
        assert_eq!(cs.hit_test(10, 11), Some(103));
    }

    #[test]
    fn clickable_list_clipped_by_area() {
        let mut cl = ClickableList::new();
        for i in 0..20 {
            cl.push_clickable(Line::from(format!("item {}", i)), 50 + i as u16);
        }
        let area = Rect::new(0, 0, 80, 5);
        let mut cs = ClickState::new();
        cl.register_targets(area, &mut cs, 1, 1, 0, 0);

        assert_eq!(cs.targets.len(), 3);
        assert_eq!(cs.hit_test(10, 3), Some(52));
        assert_eq!(cs.hit_test(10, 4), None);
    }

    #[test]
    fn wrapped_line_is_clickable_on_every_row() {
        let mut cl = ClickableList::new();
        cl.push_clickable(Line::from("123456789012345678901234567890"), 42);
        cl.push_clickable(Line::from("next"), 43);

        let area = Rect::new(0, 0, 10, 10);
        let mut cs = ClickState::new();
        cl.register_targets(area, &mut cs, 0, 0, 0, 10);

        assert_eq!(cs.hit_test(5, 0), Some(42));
        assert_eq!(cs.hit_test(5, 2), Some(42));
        assert_eq!(cs.hit_test(5, 3), Some(43));
        assert_eq!(cl.total_height(10), 4);
    }

    #[test]
    fn empty_line_takes_one_row() {
        assert_eq!(ClickableList::visual_height(&Line::from(""), 10), 1);
        assert_eq!(ClickableList::visual_height(&Line::from("abc"), 0), 1);
    }

    #[test]
    fn block_borders_are_skipped() {
        let mut cl = ClickableList::new();
        cl.push_clickable(Line::from("first"), 1);
        cl.push_clickable(Line::from("second"), 2);

        let area = Rect::new(0, 0, 20, 6);
        let block = Block::default().borders(Borders::ALL);
        let mut cs = ClickState::new();
        cl.register_targets_with_block(area, &block, &mut cs, 0);

        assert_eq!(cs.hit_test(5, 0), None);
        assert_eq!(cs.hit_test(5, 1), Some(1));
        assert_eq!(cs.hit_test(5, 2), Some(2));
        assert_eq!(cs.hit_test(0, 1), None);
    }
}
