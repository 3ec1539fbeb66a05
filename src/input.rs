use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::engine::Key;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
	Quit,
	Save,
	Undo,
	Redo,
	ToggleReadOnly,
	ToggleLanguage,
	/// Enter or Backspace, offered to the smart indentation first.
	Press(Key),
	Tab,
	Insert(char),
	Move { direction: Direction, extend: bool },
	/// Terminal size changed; only triggers a redraw.
	Resize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
	Left,
	Right,
	Up,
	Down,
	LineStart,
	LineEnd,
}

/// Key as seen by the indentation engine. Modifiers are ignored.
pub fn engine_key(key: &KeyEvent) -> Key {
	match key.code {
		KeyCode::Enter => Key::Enter,
		KeyCode::Backspace => Key::Backspace,
		_ => Key::Other,
	}
}

pub struct InputHandler;

impl InputHandler {
	pub fn new() -> Self {
		Self
	}

	pub fn command(&self, event: &Event) -> Option<Command> {
		match event {
			Event::Resize(..) => Some(Command::Resize),
			Event::Key(key) if key.kind != KeyEventKind::Release => key_command(key),
			_ => None,
		}
	}
}

impl Default for InputHandler {
	fn default() -> Self {
		Self::new()
	}
}

fn key_command(key: &KeyEvent) -> Option<Command> {
	let extend = key.modifiers.contains(KeyModifiers::SHIFT);
	let moving = |direction| Some(Command::Move { direction, extend });

	if key.modifiers.contains(KeyModifiers::CONTROL) {
		return match key.code {
			KeyCode::Char('q') => Some(Command::Quit),
			KeyCode::Char('s') => Some(Command::Save),
			KeyCode::Char('z') => Some(Command::Undo),
			KeyCode::Char('y') => Some(Command::Redo),
			KeyCode::Char('r') => Some(Command::ToggleReadOnly),
			KeyCode::Char('l') => Some(Command::ToggleLanguage),
			_ => None,
		};
	}

	match key.code {
		KeyCode::Enter | KeyCode::Backspace => Some(Command::Press(engine_key(key))),
		KeyCode::Tab => Some(Command::Tab),
		KeyCode::Char(ch) => Some(Command::Insert(ch)),
		KeyCode::Left => moving(Direction::Left),
		KeyCode::Right => moving(Direction::Right),
		KeyCode::Up => moving(Direction::Up),
		KeyCode::Down => moving(Direction::Down),
		KeyCode::Home => moving(Direction::LineStart),
		KeyCode::End => moving(Direction::LineEnd),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

	use super::{Command, Direction, InputHandler, engine_key};
	use crate::engine::Key;

	fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
		KeyEvent::new(code, modifiers)
	}

	#[test]
	fn engine_key_should_ignore_modifiers() {
		assert_eq!(engine_key(&press(KeyCode::Enter, KeyModifiers::NONE)), Key::Enter);
		assert_eq!(engine_key(&press(KeyCode::Enter, KeyModifiers::SHIFT)), Key::Enter);
		assert_eq!(engine_key(&press(KeyCode::Backspace, KeyModifiers::CONTROL)), Key::Backspace);
		assert_eq!(engine_key(&press(KeyCode::Char(':'), KeyModifiers::NONE)), Key::Other);
		assert_eq!(engine_key(&press(KeyCode::Delete, KeyModifiers::NONE)), Key::Other);
	}

	#[test]
	fn control_chords_should_map_to_commands() {
		let handler = InputHandler::new();
		let cases = [
			('q', Command::Quit),
			('s', Command::Save),
			('z', Command::Undo),
			('y', Command::Redo),
			('r', Command::ToggleReadOnly),
			('l', Command::ToggleLanguage),
		];
		for (ch, expected) in cases {
			let event = Event::Key(press(KeyCode::Char(ch), KeyModifiers::CONTROL));
			assert_eq!(handler.command(&event), Some(expected));
		}
	}

	#[test]
	fn shift_arrows_should_extend_selection() {
		let handler = InputHandler::new();
		let event = Event::Key(press(KeyCode::Left, KeyModifiers::SHIFT));
		assert_eq!(handler.command(&event), Some(Command::Move { direction: Direction::Left, extend: true }));
		let event = Event::Key(press(KeyCode::End, KeyModifiers::NONE));
		assert_eq!(
			handler.command(&event),
			Some(Command::Move { direction: Direction::LineEnd, extend: false })
		);
	}

	#[test]
	fn key_release_should_be_ignored() {
		let handler = InputHandler::new();
		let release =
			KeyEvent::new_with_kind_and_state(KeyCode::Enter, KeyModifiers::NONE, KeyEventKind::Release, KeyEventState::NONE);
		assert_eq!(handler.command(&Event::Key(release)), None);
	}

	#[test]
	fn enter_and_backspace_should_reach_the_engine() {
		let handler = InputHandler::new();
		let event = Event::Key(press(KeyCode::Enter, KeyModifiers::NONE));
		assert_eq!(handler.command(&event), Some(Command::Press(Key::Enter)));
		let event = Event::Key(press(KeyCode::Backspace, KeyModifiers::NONE));
		assert_eq!(handler.command(&event), Some(Command::Press(Key::Backspace)));
	}

	#[test]
	fn typed_chars_should_insert() {
		let handler = InputHandler::new();
		let event = Event::Key(press(KeyCode::Char('A'), KeyModifiers::SHIFT));
		assert_eq!(handler.command(&event), Some(Command::Insert('A')));
	}

	#[test]
	fn resize_should_request_redraw() {
		let handler = InputHandler::new();
		assert_eq!(handler.command(&Event::Resize(120, 40)), Some(Command::Resize));
	}
}
