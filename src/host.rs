use serde::Deserialize;
use thiserror::Error;

/// Indentation preferences as configured in the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IndentSettings {
	pub insert_spaces: bool,
	pub tab_width:     usize,
}

impl Default for IndentSettings {
	fn default() -> Self {
		Self { insert_spaces: true, tab_width: 4 }
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
	#[error("document is read-only")]
	ReadOnly,
	#[error("cannot delete {requested} chars before cursor, only {available} available")]
	DeleteOutOfRange { requested: usize, available: usize },
}

/// What the smart indentation needs from the editor embedding it.
///
/// Offsets and counts are in chars. Edits go through the host's interactive path so
/// each one is a single undo step and respects editability.
pub trait EditorHost {
	/// Language name of the active document, e.g. `Python`.
	fn language(&self) -> Option<&str>;

	fn is_editable(&self) -> bool;

	fn has_selection(&self) -> bool;

	fn cursor_offset(&self) -> usize;

	/// Text of the cursor line from its start up to the cursor.
	fn line_prefix(&self) -> String;

	fn indent_settings(&self) -> IndentSettings;

	fn insert_interactive_at_cursor(&mut self, text: &str) -> Result<(), HostError>;

	fn delete_interactive_before_cursor(&mut self, count: usize) -> Result<(), HostError>;

	fn scroll_cursor_onscreen(&mut self);
}
