use std::io;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::thread;

use anyhow::{Context, Result};
use crossterm::event;
use tracing::{error, info, trace};

use crate::buffer::{PLAIN_TEXT, ScratchBuffer};
use crate::config::AppConfig;
use crate::engine::{IndentUnit, Key};
use crate::host::{EditorHost, HostError};
use crate::input::{Command, Direction, InputHandler};
use crate::plugin::SmartIndent;
use crate::ui::{Renderer, TerminalSession};

/// Everything the playground edits and renders.
#[derive(Debug)]
pub struct EditorState {
	pub buffer:  ScratchBuffer,
	pub plugin:  SmartIndent,
	pub message: String,
}

impl EditorState {
	pub fn new(buffer: ScratchBuffer, target_language: &str) -> Self {
		let mut plugin = SmartIndent::new(target_language);
		plugin.attach(&buffer);
		Self { buffer, plugin, message: "ctrl-q quit | ctrl-s save | ctrl-r read-only | ctrl-l language".to_string() }
	}

	/// Opens `path`, or an empty buffer bound to it when the file does not exist yet.
	pub fn open(config: &AppConfig, path: Option<PathBuf>, read_only: bool) -> Result<Self> {
		let mut buffer = match path {
			Some(path) => {
				let text = match std::fs::read_to_string(&path) {
					Ok(text) => text,
					Err(err) if err.kind() == io::ErrorKind::NotFound => String::new(),
					Err(err) => return Err(err).with_context(|| format!("read file failed: {}", path.display())),
				};
				info!("open_file: {}", path.display());
				ScratchBuffer::with_path(path, &text)
			}
			None => {
				let mut buffer = ScratchBuffer::default();
				buffer.set_language(Some(config.language.clone()));
				buffer
			}
		};
		buffer.set_indent_settings(config.indent);
		buffer.set_editable(!read_only);
		Ok(Self::new(buffer, &config.language))
	}

	pub fn apply(&mut self, command: Command) -> ControlFlow<()> {
		match command {
			Command::Quit => return ControlFlow::Break(()),
			Command::Save => self.save(),
			Command::Undo => {
				if !self.buffer.undo() {
					self.message = self.history_refusal("nothing to undo");
				}
			}
			Command::Redo => {
				if !self.buffer.redo() {
					self.message = self.history_refusal("nothing to redo");
				}
			}
			Command::ToggleReadOnly => {
				let editable = !self.buffer.is_editable();
				self.buffer.set_editable(editable);
				self.plugin.on_editable_changed(&self.buffer);
				self.message = if editable { "editable" } else { "read-only" }.to_string();
			}
			Command::ToggleLanguage => {
				let target = self.plugin.target_language().to_string();
				let next = if self.buffer.language() == Some(target.as_str()) { PLAIN_TEXT.to_string() } else { target };
				self.message = format!("language: {}", next);
				self.buffer.set_language(Some(next));
				self.plugin.on_language_changed(&self.buffer);
			}
			Command::Press(key) => self.press(key),
			Command::Tab => {
				let unit = IndentUnit::from_settings(self.buffer.indent_settings()).unwrap_or_else(|_| IndentUnit::tab());
				let result = self.buffer.insert_text(unit.as_str());
				self.report(result);
			}
			Command::Insert(ch) => {
				let result = self.buffer.insert_text(ch.encode_utf8(&mut [0; 4]));
				self.report(result);
			}
			Command::Move { direction, extend } => match direction {
				Direction::Left => self.buffer.move_left(extend),
				Direction::Right => self.buffer.move_right(extend),
				Direction::Up => self.buffer.move_up(extend),
				Direction::Down => self.buffer.move_down(extend),
				Direction::LineStart => self.buffer.move_line_start(extend),
				Direction::LineEnd => self.buffer.move_line_end(extend),
			},
			Command::Resize => {}
		}
		self.buffer.scroll_cursor_onscreen();
		ControlFlow::Continue(())
	}

	pub fn status_line(&self) -> String {
		let (row, col) = self.buffer.cursor_position();
		let dirty = if self.buffer.is_dirty() { " [+]" } else { "" };
		let read_only = if self.buffer.is_editable() { "" } else { " [RO]" };
		format!(
			"{}{}{} | {} | {}:{} | {}",
			self.buffer.name(),
			dirty,
			read_only,
			self.buffer.language().unwrap_or("no language"),
			row + 1,
			col + 1,
			self.message
		)
	}

	/// Offers the key to the smart indentation, then falls back to plain editing.
	fn press(&mut self, key: Key) {
		if self.plugin.on_key_press(&mut self.buffer, key) {
			return;
		}
		let result = match key {
			Key::Enter => self.buffer.insert_newline(),
			Key::Backspace => self.buffer.backspace(),
			Key::Other => Ok(()),
		};
		self.report(result);
	}

	fn history_refusal(&self, empty: &str) -> String {
		if self.buffer.is_editable() { empty.to_string() } else { HostError::ReadOnly.to_string() }
	}

	fn report(&mut self, result: Result<(), HostError>) {
		if let Err(err) = result {
			self.message = err.to_string();
		}
	}

	fn save(&mut self) {
		let Some(path) = self.buffer.path().map(PathBuf::from) else {
			self.message = "save failed: no file name".to_string();
			return;
		};
		match std::fs::write(&path, self.buffer.text()) {
			Ok(()) => {
				info!("save_file: {}", path.display());
				self.buffer.mark_saved();
				self.message = format!("saved {}", path.display());
			}
			Err(err) => {
				error!("file save failed: path={} error={}", path.display(), err);
				self.message = format!("save failed: {}", err);
			}
		}
	}
}

pub struct App {
	state:    EditorState,
	renderer: Renderer,
	event_tx: flume::Sender<Command>,
	event_rx: flume::Receiver<Command>,
}

impl App {
	pub fn new(state: EditorState) -> Self {
		let (event_tx, event_rx) = flume::bounded(1024);
		Self { state, renderer: Renderer::new(), event_tx, event_rx }
	}

	pub fn run(mut self) -> Result<()> {
		let title = format!("pyindent - {}", self.state.buffer.name());
		let mut session = TerminalSession::enter(&title).context("enter terminal session failed")?;
		self.start_input_pump();

		loop {
			session
				.draw(|frame| self.renderer.render(frame, &mut self.state))
				.context("render frame failed")?;
			trace!("redraw");

			let command = self.event_rx.recv().context("input pump disconnected")?;
			if self.state.apply(command).is_break() {
				break;
			}
		}
		Ok(())
	}

	fn start_input_pump(&self) {
		let event_tx = self.event_tx.clone();
		let input_handler = InputHandler::new();
		thread::spawn(move || {
			loop {
				let evt = match event::read() {
					Ok(evt) => evt,
					Err(err) => {
						error!("input pump stopped: failed to read terminal event: {}", err);
						break;
					}
				};
				let Some(command) = input_handler.command(&evt) else {
					continue;
				};
				if let Err(err) = event_tx.send(command) {
					error!("input pump stopped: failed to send command to event bus: {}", err);
					break;
				}
			}
		});
	}
}

#[cfg(test)]
mod tests {
	use std::ops::ControlFlow;

	use super::EditorState;
	use crate::buffer::{PLAIN_TEXT, ScratchBuffer};
	use crate::engine::Key;
	use crate::host::EditorHost;
	use crate::input::Command;

	fn python_state(text: &str) -> EditorState {
		let mut buffer = ScratchBuffer::new(text);
		buffer.set_language(Some("Python".to_string()));
		buffer.set_cursor(text.chars().count());
		EditorState::new(buffer, "Python")
	}

	fn type_text(state: &mut EditorState, text: &str) {
		for ch in text.chars() {
			let _ = state.apply(Command::Insert(ch));
		}
	}

	#[test]
	fn enter_should_use_smart_indent_when_active() {
		let mut state = python_state("def f():");
		let _ = state.apply(Command::Press(Key::Enter));
		assert_eq!(state.buffer.text(), "def f():\n    ");
	}

	#[test]
	fn enter_should_fall_back_to_plain_newline_when_inactive() {
		let mut state = python_state("def f():");
		let _ = state.apply(Command::ToggleLanguage);
		assert_eq!(state.buffer.language(), Some(PLAIN_TEXT));
		assert!(!state.plugin.is_active());

		let _ = state.apply(Command::Press(Key::Enter));
		assert_eq!(state.buffer.text(), "def f():\n");
	}

	#[test]
	fn language_toggle_should_reactivate() {
		let mut state = python_state("if x:");
		let _ = state.apply(Command::ToggleLanguage);
		let _ = state.apply(Command::ToggleLanguage);
		assert!(state.plugin.is_active());
		let _ = state.apply(Command::Press(Key::Enter));
		assert_eq!(state.buffer.text(), "if x:\n    ");
	}

	#[test]
	fn read_only_toggle_should_deactivate_and_block_edits() {
		let mut state = python_state("if x:");
		let _ = state.apply(Command::ToggleReadOnly);
		assert!(!state.plugin.is_active());

		let _ = state.apply(Command::Press(Key::Enter));
		assert_eq!(state.buffer.text(), "if x:");
		assert_eq!(state.message, "document is read-only");
	}

	#[test]
	fn backspace_should_dedent_whitespace_then_delete_chars() {
		let mut state = python_state("if x:");
		let _ = state.apply(Command::Press(Key::Enter));
		type_text(&mut state, "  ");
		let _ = state.apply(Command::Press(Key::Backspace));
		assert_eq!(state.buffer.text(), "if x:\n    ");
		let _ = state.apply(Command::Press(Key::Backspace));
		assert_eq!(state.buffer.text(), "if x:\n");
		let _ = state.apply(Command::Press(Key::Backspace));
		assert_eq!(state.buffer.text(), "if x:");
	}

	#[test]
	fn selection_should_get_default_enter() {
		let mut state = python_state("if x:");
		let _ = state.apply(Command::Move { direction: crate::input::Direction::LineStart, extend: true });
		let _ = state.apply(Command::Press(Key::Enter));
		assert_eq!(state.buffer.text(), "\n");
	}

	#[test]
	fn undo_in_read_only_should_say_read_only() {
		let mut state = python_state("if x:");
		let _ = state.apply(Command::Press(Key::Enter));
		let _ = state.apply(Command::ToggleReadOnly);

		let _ = state.apply(Command::Undo);
		assert_eq!(state.buffer.text(), "if x:\n    ");
		assert_eq!(state.message, "document is read-only");

		let _ = state.apply(Command::Redo);
		assert_eq!(state.message, "document is read-only");
	}

	#[test]
	fn undo_with_empty_history_should_say_so() {
		let mut state = python_state("x");
		let _ = state.apply(Command::Undo);
		assert_eq!(state.message, "nothing to undo");
		let _ = state.apply(Command::Redo);
		assert_eq!(state.message, "nothing to redo");
	}

	#[test]
	fn tab_should_insert_one_unit() {
		let mut state = python_state("");
		let _ = state.apply(Command::Tab);
		assert_eq!(state.buffer.text(), "    ");
	}

	#[test]
	fn quit_should_break() {
		let mut state = python_state("");
		assert!(matches!(state.apply(Command::Quit), ControlFlow::Break(())));
	}

	#[test]
	fn save_without_path_should_report() {
		let mut state = python_state("x");
		let _ = state.apply(Command::Save);
		assert_eq!(state.message, "save failed: no file name");
	}
}
