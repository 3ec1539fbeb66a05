//! In-memory document used as the editor host by the playground and the tests.

use std::ops::Range;
use std::path::{Path, PathBuf};

use ropey::Rope;

use crate::host::{EditorHost, HostError, IndentSettings};

pub const PLAIN_TEXT: &str = "Plain Text";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferEdit {
	pub start:    usize,
	pub deleted:  String,
	pub inserted: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
	pub edit:          BufferEdit,
	pub before_cursor: usize,
	pub after_cursor:  usize,
}

/// A text document with a char-offset cursor, an optional selection and undo history.
#[derive(Debug, Clone)]
pub struct ScratchBuffer {
	text:          Rope,
	path:          Option<PathBuf>,
	cursor:        usize,
	anchor:        Option<usize>,
	preferred_col: Option<usize>,
	language:      Option<String>,
	editable:      bool,
	settings:      IndentSettings,
	dirty:         bool,
	undo_stack:    Vec<HistoryEntry>,
	redo_stack:    Vec<HistoryEntry>,
	scroll_row:    usize,
	viewport_rows: usize,
}

impl ScratchBuffer {
	const MAX_HISTORY_ENTRIES: usize = 256;

	pub fn new(text: &str) -> Self {
		Self {
			text:          Rope::from_str(text),
			path:          None,
			cursor:        0,
			anchor:        None,
			preferred_col: None,
			language:      None,
			editable:      true,
			settings:      IndentSettings::default(),
			dirty:         false,
			undo_stack:    Vec::new(),
			redo_stack:    Vec::new(),
			scroll_row:    0,
			viewport_rows: 1,
		}
	}

	/// Buffer bound to `path`, with its language detected from the name and first line.
	pub fn with_path(path: PathBuf, text: &str) -> Self {
		let mut buffer = Self::new(text);
		buffer.language = detect_language(&path, text).map(ToString::to_string);
		buffer.path = Some(path);
		buffer
	}

	pub fn text(&self) -> String {
		self.text.to_string()
	}

	pub fn rope(&self) -> &Rope {
		&self.text
	}

	pub fn path(&self) -> Option<&Path> {
		self.path.as_deref()
	}

	pub fn name(&self) -> String {
		self
			.path
			.as_deref()
			.and_then(Path::file_name)
			.map(|name| name.to_string_lossy().into_owned())
			.unwrap_or_else(|| "untitled".to_string())
	}

	pub fn is_dirty(&self) -> bool {
		self.dirty
	}

	pub fn mark_saved(&mut self) {
		self.dirty = false;
	}

	pub fn set_language(&mut self, language: Option<String>) {
		self.language = language;
	}

	pub fn set_editable(&mut self, editable: bool) {
		self.editable = editable;
	}

	pub fn set_indent_settings(&mut self, settings: IndentSettings) {
		self.settings = settings;
	}

	pub fn cursor(&self) -> usize {
		self.cursor
	}

	/// Zero-based (row, col) of the cursor.
	pub fn cursor_position(&self) -> (usize, usize) {
		let row = self.text.char_to_line(self.cursor);
		(row, self.cursor - self.text.line_to_char(row))
	}

	pub fn set_cursor(&mut self, offset: usize) {
		self.cursor = self.snap_out_of_crlf(offset.min(self.text.len_chars()));
		self.anchor = None;
		self.preferred_col = None;
	}

	/// Selects `anchor..cursor`; the cursor sits at the second offset.
	pub fn select(&mut self, anchor: usize, cursor: usize) {
		let len = self.text.len_chars();
		self.anchor = Some(self.snap_out_of_crlf(anchor.min(len)));
		self.cursor = self.snap_out_of_crlf(cursor.min(len));
		self.preferred_col = None;
	}

	pub fn selection(&self) -> Option<Range<usize>> {
		let anchor = self.anchor?;
		if anchor == self.cursor {
			return None;
		}
		Some(anchor.min(self.cursor)..anchor.max(self.cursor))
	}

	pub fn line_count(&self) -> usize {
		self.text.len_lines()
	}

	/// Line content without its line break.
	pub fn line_text(&self, row: usize) -> String {
		if row >= self.text.len_lines() {
			return String::new();
		}
		let start = self.text.line_to_char(row);
		self.text.slice(start..start + self.line_content_len(row)).to_string()
	}

	pub fn insert_text(&mut self, text: &str) -> Result<(), HostError> {
		let range = self.selection().unwrap_or(self.cursor..self.cursor);
		self.replace(range, text)
	}

	pub fn insert_newline(&mut self) -> Result<(), HostError> {
		self.insert_text("\n")
	}

	/// Deletes the selection, or the char before the cursor.
	pub fn backspace(&mut self) -> Result<(), HostError> {
		if let Some(range) = self.selection() {
			return self.replace(range, "");
		}
		if self.cursor == 0 {
			return Ok(());
		}
		let mut start = self.cursor - 1;
		if start > 0 && self.text.char(start) == '\n' && self.text.char(start - 1) == '\r' {
			start -= 1;
		}
		self.replace(start..self.cursor, "")
	}

	pub fn move_left(&mut self, extend: bool) {
		self.begin_move(extend);
		self.cursor = self.cursor.saturating_sub(1);
		if self.is_inside_crlf(self.cursor) {
			self.cursor -= 1;
		}
		self.preferred_col = None;
	}

	pub fn move_right(&mut self, extend: bool) {
		self.begin_move(extend);
		self.cursor = (self.cursor + 1).min(self.text.len_chars());
		if self.is_inside_crlf(self.cursor) {
			self.cursor += 1;
		}
		self.preferred_col = None;
	}

	pub fn move_up(&mut self, extend: bool) {
		let (row, col) = self.cursor_position();
		if row == 0 {
			self.begin_move(extend);
			self.cursor = 0;
			return;
		}
		self.move_vertical(row - 1, col, extend);
	}

	pub fn move_down(&mut self, extend: bool) {
		let (row, col) = self.cursor_position();
		if row + 1 >= self.text.len_lines() {
			self.begin_move(extend);
			self.cursor = self.text.len_chars();
			return;
		}
		self.move_vertical(row + 1, col, extend);
	}

	pub fn move_line_start(&mut self, extend: bool) {
		self.begin_move(extend);
		let (row, _) = self.cursor_position();
		self.cursor = self.text.line_to_char(row);
		self.preferred_col = None;
	}

	pub fn move_line_end(&mut self, extend: bool) {
		self.begin_move(extend);
		let (row, _) = self.cursor_position();
		self.cursor = self.text.line_to_char(row) + self.line_content_len(row);
		self.preferred_col = None;
	}

	pub fn undo(&mut self) -> bool {
		if !self.editable {
			return false;
		}
		let Some(entry) = self.undo_stack.pop() else {
			return false;
		};
		let edit = &entry.edit;
		let inserted_end = edit.start + edit.inserted.chars().count();
		self.text.remove(edit.start..inserted_end);
		self.text.insert(edit.start, &edit.deleted);
		self.cursor = entry.before_cursor;
		self.after_history_move();
		self.redo_stack.push(entry);
		true
	}

	pub fn redo(&mut self) -> bool {
		if !self.editable {
			return false;
		}
		let Some(entry) = self.redo_stack.pop() else {
			return false;
		};
		let edit = &entry.edit;
		let deleted_end = edit.start + edit.deleted.chars().count();
		self.text.remove(edit.start..deleted_end);
		self.text.insert(edit.start, &edit.inserted);
		self.cursor = entry.after_cursor;
		self.after_history_move();
		self.undo_stack.push(entry);
		true
	}

	pub fn undo_depth(&self) -> usize {
		self.undo_stack.len()
	}

	pub fn set_viewport_rows(&mut self, rows: usize) {
		self.viewport_rows = rows.max(1);
	}

	pub fn scroll_row(&self) -> usize {
		self.scroll_row
	}

	fn replace(&mut self, range: Range<usize>, text: &str) -> Result<(), HostError> {
		if !self.editable {
			return Err(HostError::ReadOnly);
		}
		let before_cursor = self.cursor;
		let deleted = self.text.slice(range.clone()).to_string();
		self.text.remove(range.clone());
		self.text.insert(range.start, text);
		self.cursor = range.start + text.chars().count();
		self.anchor = None;
		self.preferred_col = None;
		self.dirty = true;

		self.undo_stack.push(HistoryEntry {
			edit: BufferEdit { start: range.start, deleted, inserted: text.to_string() },
			before_cursor,
			after_cursor: self.cursor,
		});
		if self.undo_stack.len() > Self::MAX_HISTORY_ENTRIES {
			self.undo_stack.remove(0);
		}
		self.redo_stack.clear();
		Ok(())
	}

	fn after_history_move(&mut self) {
		self.cursor = self.cursor.min(self.text.len_chars());
		self.anchor = None;
		self.preferred_col = None;
		self.dirty = true;
	}

	fn begin_move(&mut self, extend: bool) {
		if !extend {
			self.anchor = None;
		} else if self.anchor.is_none() {
			self.anchor = Some(self.cursor);
		}
	}

	fn move_vertical(&mut self, row: usize, col: usize, extend: bool) {
		self.begin_move(extend);
		let target_col = *self.preferred_col.get_or_insert(col);
		self.cursor = self.text.line_to_char(row) + target_col.min(self.line_content_len(row));
	}

	/// True when `offset` sits between the `\r` and `\n` of a CRLF break.
	fn is_inside_crlf(&self, offset: usize) -> bool {
		offset > 0
			&& offset < self.text.len_chars()
			&& self.text.char(offset - 1) == '\r'
			&& self.text.char(offset) == '\n'
	}

	fn snap_out_of_crlf(&self, offset: usize) -> usize {
		if self.is_inside_crlf(offset) { offset - 1 } else { offset }
	}

	fn line_content_len(&self, row: usize) -> usize {
		let line = self.text.line(row);
		let mut len = line.len_chars();
		while len > 0 && is_line_break(line.char(len - 1)) {
			len -= 1;
		}
		len
	}
}

impl Default for ScratchBuffer {
	fn default() -> Self {
		Self::new("")
	}
}

impl EditorHost for ScratchBuffer {
	fn language(&self) -> Option<&str> {
		self.language.as_deref()
	}

	fn is_editable(&self) -> bool {
		self.editable
	}

	fn has_selection(&self) -> bool {
		self.selection().is_some()
	}

	fn cursor_offset(&self) -> usize {
		self.cursor
	}

	fn line_prefix(&self) -> String {
		let row = self.text.char_to_line(self.cursor);
		let start = self.text.line_to_char(row);
		let end = self.cursor.min(start + self.line_content_len(row));
		self.text.slice(start..end).to_string()
	}

	fn indent_settings(&self) -> IndentSettings {
		self.settings
	}

	fn insert_interactive_at_cursor(&mut self, text: &str) -> Result<(), HostError> {
		self.replace(self.cursor..self.cursor, text)
	}

	fn delete_interactive_before_cursor(&mut self, count: usize) -> Result<(), HostError> {
		if !self.editable {
			return Err(HostError::ReadOnly);
		}
		if count > self.cursor {
			return Err(HostError::DeleteOutOfRange { requested: count, available: self.cursor });
		}
		self.replace(self.cursor - count..self.cursor, "")
	}

	fn scroll_cursor_onscreen(&mut self) {
		let (row, _) = self.cursor_position();
		if row < self.scroll_row {
			self.scroll_row = row;
		} else if row >= self.scroll_row + self.viewport_rows {
			self.scroll_row = row + 1 - self.viewport_rows;
		}
	}
}

/// Language name for a file, from its extension or a `python` shebang.
pub fn detect_language(path: &Path, text: &str) -> Option<&'static str> {
	let by_extension = path.extension().and_then(|ext| ext.to_str()).and_then(|ext| {
		match ext.to_ascii_lowercase().as_str() {
			"py" | "pyw" | "pyi" => Some("Python"),
			"rs" => Some("Rust"),
			"toml" => Some("TOML"),
			"md" => Some("Markdown"),
			"txt" => Some(PLAIN_TEXT),
			_ => None,
		}
	});
	by_extension.or_else(|| {
		let first_line = text.lines().next()?;
		(first_line.starts_with("#!") && first_line.contains("python")).then_some("Python")
	})
}

fn is_line_break(ch: char) -> bool {
	matches!(ch, '\n' | '\r' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}')
}
