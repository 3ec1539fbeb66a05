use tracing::{debug, info, warn};

use crate::engine::{EditAction, IndentUnit, Key, KeyEvent, decide};
use crate::host::{EditorHost, HostError};

pub const DEFAULT_LANGUAGE: &str = "Python";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
	Inactive,
	Active,
}

/// Wires the indentation engine into a host editor.
///
/// Key presses are only consumed while the host document is in the target language
/// and editable. The host reports changes of either through [`Self::on_language_changed`]
/// and [`Self::on_editable_changed`].
#[derive(Debug)]
pub struct SmartIndent {
	target_language: String,
	activation:      Activation,
}

impl SmartIndent {
	pub fn new(target_language: impl Into<String>) -> Self {
		Self { target_language: target_language.into(), activation: Activation::Inactive }
	}

	pub fn target_language(&self) -> &str {
		&self.target_language
	}

	pub fn activation(&self) -> Activation {
		self.activation
	}

	pub fn is_active(&self) -> bool {
		self.activation == Activation::Active
	}

	pub fn attach(&mut self, host: &impl EditorHost) -> Activation {
		self.update_activation(host)
	}

	pub fn detach(&mut self) {
		if self.activation == Activation::Active {
			info!("smart indent detached");
		}
		self.activation = Activation::Inactive;
	}

	pub fn on_language_changed(&mut self, host: &impl EditorHost) -> Activation {
		self.update_activation(host)
	}

	pub fn on_editable_changed(&mut self, host: &impl EditorHost) -> Activation {
		self.update_activation(host)
	}

	/// Returns true when the key was handled and the host must skip its default handling.
	pub fn on_key_press(&mut self, host: &mut impl EditorHost, key: Key) -> bool {
		if self.activation == Activation::Inactive || key == Key::Other {
			return false;
		}

		let settings = host.indent_settings();
		let unit = match IndentUnit::from_settings(settings) {
			Ok(unit) => unit,
			Err(err) => {
				warn!("smart indent skipped: {} (settings={:?})", err, settings);
				return false;
			}
		};

		let event = KeyEvent::new(key).with_selection(host.has_selection());
		let line_prefix = host.line_prefix();
		let action = decide(event, &line_prefix, &unit);
		debug!(
			"decide: key={:?} selection={} cursor={} line={:?} action={:?}",
			key,
			event.has_selection,
			host.cursor_offset(),
			line_prefix,
			action
		);

		match apply(host, &action) {
			Ok(handled) => handled,
			Err(err) => {
				warn!("smart indent edit refused by host: {}", err);
				false
			}
		}
	}

	fn update_activation(&mut self, host: &impl EditorHost) -> Activation {
		let next = if self.matches(host) { Activation::Active } else { Activation::Inactive };
		if next != self.activation {
			info!(
				"smart indent {:?} -> {:?}: language={:?} editable={}",
				self.activation,
				next,
				host.language(),
				host.is_editable()
			);
			self.activation = next;
		}
		next
	}

	fn matches(&self, host: &impl EditorHost) -> bool {
		host.is_editable() && host.language() == Some(self.target_language.as_str())
	}
}

impl Default for SmartIndent {
	fn default() -> Self {
		Self::new(DEFAULT_LANGUAGE)
	}
}

fn apply(host: &mut impl EditorHost, action: &EditAction) -> Result<bool, HostError> {
	match action {
		EditAction::None => return Ok(false),
		EditAction::InsertText { text } => host.insert_interactive_at_cursor(text)?,
		EditAction::DeleteBefore { count } => host.delete_interactive_before_cursor(*count)?,
	}
	host.scroll_cursor_onscreen();
	Ok(true)
}
