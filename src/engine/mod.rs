//! Indentation decisions for a single keystroke.
//!
//! Everything here is a pure function of the text before the cursor on the current
//! line, the configured indent unit and the key being pressed. The caller owns the
//! document and applies the returned [`EditAction`].

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::host::IndentSettings;

/// Keywords whose line is the last statement of a block.
pub const DEDENT_KEYWORDS: [&str; 5] = ["return", "break", "continue", "pass", "raise"];

pub const BLOCK_OPENER: char = ':';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IndentUnitError {
	#[error("indent unit of spaces needs a tab width of at least 1")]
	ZeroWidth,
}

/// The text inserted for one indentation level. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentUnit {
	text:  String,
	chars: usize,
}

impl IndentUnit {
	pub fn tab() -> Self {
		Self { text: "\t".to_string(), chars: 1 }
	}

	pub fn spaces(width: usize) -> Result<Self, IndentUnitError> {
		if width == 0 {
			return Err(IndentUnitError::ZeroWidth);
		}
		Ok(Self { text: " ".repeat(width), chars: width })
	}

	pub fn from_settings(settings: IndentSettings) -> Result<Self, IndentUnitError> {
		if settings.insert_spaces { Self::spaces(settings.tab_width) } else { Ok(Self::tab()) }
	}

	pub fn as_str(&self) -> &str {
		&self.text
	}

	/// Length in chars.
	pub fn width(&self) -> usize {
		self.chars
	}
}

impl fmt::Display for IndentUnit {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.text)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
	Enter,
	Backspace,
	Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
	pub key:           Key,
	pub has_selection: bool,
}

impl KeyEvent {
	pub fn new(key: Key) -> Self {
		Self { key, has_selection: false }
	}

	pub fn with_selection(mut self, has_selection: bool) -> Self {
		self.has_selection = has_selection;
		self
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EditAction {
	/// Let the host run its default key handling.
	None,
	/// Insert at the cursor as one undoable edit, cursor ends after the text.
	InsertText { text: String },
	/// Delete `count` chars ending at the cursor as one undoable edit.
	DeleteBefore { count: usize },
}

pub fn decide(event: KeyEvent, line_prefix: &str, unit: &IndentUnit) -> EditAction {
	if event.has_selection {
		return EditAction::None;
	}
	match event.key {
		Key::Enter => newline_action(line_prefix, unit),
		Key::Backspace => backspace_action(line_prefix, unit),
		Key::Other => EditAction::None,
	}
}

fn newline_action(line: &str, unit: &IndentUnit) -> EditAction {
	let indent = leading_whitespace(line);

	if line.ends_with(BLOCK_OPENER) {
		let mut text = String::with_capacity(1 + indent.len() + unit.as_str().len());
		text.push('\n');
		text.push_str(indent);
		text.push_str(unit.as_str());
		return EditAction::InsertText { text };
	}

	let mut keep = indent.chars().count();
	if starts_with_dedent_keyword(line.trim()) {
		// A dedent deeper than the current indent lands at column 0.
		keep = keep.saturating_sub(unit.width());
	}

	let mut text = String::with_capacity(1 + indent.len());
	text.push('\n');
	text.push_str(char_prefix(line, keep));
	EditAction::InsertText { text }
}

fn backspace_action(line: &str, unit: &IndentUnit) -> EditAction {
	if line.is_empty() || !line.chars().all(char::is_whitespace) {
		return EditAction::None;
	}

	let width = unit.width();
	let count = match line.chars().count() % width {
		0 => width,
		rest => rest,
	};
	EditAction::DeleteBefore { count }
}

/// Literal prefix match, so `returning` counts as `return`.
pub fn starts_with_dedent_keyword(stripped: &str) -> bool {
	DEDENT_KEYWORDS.iter().any(|keyword| stripped.starts_with(keyword))
}

pub fn leading_whitespace(line: &str) -> &str {
	let rest = line.trim_start();
	&line[..line.len() - rest.len()]
}

fn char_prefix(s: &str, chars: usize) -> &str {
	let end = s.char_indices().nth(chars).map(|(idx, _)| idx).unwrap_or(s.len());
	&s[..end]
}
