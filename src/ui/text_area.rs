use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};
use unicode_width::UnicodeWidthChar;

use crate::app::EditorState;
use crate::host::EditorHost;

const NUMBER_COL_WIDTH: u16 = 5;

pub(super) struct TextAreaWidget {
	number_col_width: u16,
	numbers:          Vec<Line<'static>>,
	lines:            Vec<Line<'static>>,
}

impl TextAreaWidget {
	pub(super) fn from_state(state: &EditorState, area: Rect) -> (Self, Option<(u16, u16)>) {
		let buffer = &state.buffer;
		let number_col_width = if area.width <= NUMBER_COL_WIDTH { 0 } else { NUMBER_COL_WIDTH };
		let text_width = area.width.saturating_sub(number_col_width) as usize;
		let tab_width = buffer.indent_settings().tab_width.max(1);

		let (cursor_row, cursor_col) = buffer.cursor_position();
		let cursor_x = display_width_of_char_prefix(&buffer.line_text(cursor_row), cursor_col, tab_width);
		let scroll_x = cursor_x.saturating_sub(text_width.saturating_sub(1));
		let scroll_y = buffer.scroll_row();
		let selection = buffer.selection();

		let mut numbers = Vec::new();
		let mut lines = Vec::new();
		let last_row = (scroll_y + area.height as usize).min(buffer.line_count());
		for row in scroll_y..last_row {
			if number_col_width > 0 {
				numbers.push(Line::styled(format!("{:>4} ", row + 1), Style::default().fg(Color::DarkGray)));
			}

			let line_start = buffer.rope().line_to_char(row);
			let mut spans = Vec::new();
			let mut run = String::new();
			let mut run_selected = false;
			let mut col = 0;
			for (idx, ch) in buffer.line_text(row).chars().enumerate() {
				let width = char_display_width(ch, col, tab_width);
				let visible = col >= scroll_x && col + width <= scroll_x + text_width;
				col += width;
				if !visible {
					continue;
				}

				let selected = selection.as_ref().is_some_and(|range| range.contains(&(line_start + idx)));
				if selected != run_selected && !run.is_empty() {
					spans.push(styled_run(std::mem::take(&mut run), run_selected));
				}
				run_selected = selected;
				if ch == '\t' {
					run.push_str(&" ".repeat(width));
				} else {
					run.push(ch);
				}
			}
			if !run.is_empty() {
				spans.push(styled_run(run, run_selected));
			}
			lines.push(Line::from(spans));
		}

		let cursor_position = (cursor_row >= scroll_y && cursor_row < scroll_y + area.height as usize).then(|| {
			let x = area.x + number_col_width + (cursor_x - scroll_x) as u16;
			let y = area.y + (cursor_row - scroll_y) as u16;
			(x, y)
		});

		(Self { number_col_width, numbers, lines }, cursor_position)
	}
}

impl Widget for TextAreaWidget {
	fn render(self, area: Rect, buf: &mut Buffer) {
		let number_rect = Rect { width: self.number_col_width.min(area.width), ..area };
		let text_rect = Rect {
			x:      area.x.saturating_add(number_rect.width),
			width:  area.width.saturating_sub(number_rect.width),
			..area
		};
		if number_rect.width > 0 {
			Paragraph::new(self.numbers).render(number_rect, buf);
		}
		Paragraph::new(self.lines).render(text_rect, buf);
	}
}

fn styled_run(text: String, selected: bool) -> Span<'static> {
	if selected { Span::styled(text, Style::default().fg(Color::Black).bg(Color::Gray)) } else { Span::raw(text) }
}

fn char_display_width(ch: char, col: usize, tab_width: usize) -> usize {
	if ch == '\t' {
		return tab_width - col % tab_width;
	}
	UnicodeWidthChar::width(ch).unwrap_or(0)
}

fn display_width_of_char_prefix(line: &str, char_count: usize, tab_width: usize) -> usize {
	line.chars().take(char_count).fold(0, |col, ch| col + char_display_width(ch, col, tab_width))
}
