use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::app::EditorState;

pub(super) struct StatusBarWidget {
	indent_label: &'static str,
	indent_style: Style,
	status_line:  String,
}

impl StatusBarWidget {
	pub(super) fn from_state(state: &EditorState) -> Self {
		let (indent_label, bg) = if state.plugin.is_active() { ("INDENT", Color::Blue) } else { ("OFF", Color::DarkGray) };
		Self {
			indent_label,
			indent_style: Style::default().fg(Color::White).bg(bg).add_modifier(Modifier::BOLD),
			status_line: state.status_line(),
		}
	}
}

impl Widget for StatusBarWidget {
	fn render(self, area: Rect, buf: &mut Buffer) {
		Paragraph::new(Line::from(vec![
			Span::styled(format!(" {} ", self.indent_label), self.indent_style),
			Span::raw(format!(" {}", self.status_line)),
		]))
		.render(area, buf);
	}
}
