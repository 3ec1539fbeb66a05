mod status_bar;
mod terminal_session;
mod text_area;

use ratatui::layout::{Constraint, Layout};

use crate::app::EditorState;
use crate::host::EditorHost;
use status_bar::StatusBarWidget;
pub(crate) use terminal_session::TerminalSession;
use text_area::TextAreaWidget;

pub struct Renderer;

impl Renderer {
	pub fn new() -> Self {
		Self
	}

	pub fn render(&mut self, frame: &mut ratatui::Frame<'_>, state: &mut EditorState) {
		let area = frame.area();
		let chunks = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);

		state.buffer.set_viewport_rows(chunks[0].height as usize);
		state.buffer.scroll_cursor_onscreen();

		let (text_area, cursor_position) = TextAreaWidget::from_state(state, chunks[0]);
		let status_bar = StatusBarWidget::from_state(state);

		frame.render_widget(text_area, chunks[0]);
		frame.render_widget(status_bar, chunks[1]);
		if let Some(cursor_to_draw) = cursor_position {
			frame.set_cursor_position(cursor_to_draw);
		}
	}
}

impl Default for Renderer {
	fn default() -> Self {
		Self::new()
	}
}
