//! Command-line interface definition using clap.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};

use crate::config::AppConfig;
use crate::engine::{IndentUnit, Key, KeyEvent, decide};
use crate::host::IndentSettings;

/// Smart Python indentation: Enter indents after `:` and dedents after block exits,
/// Backspace on blank indentation removes a whole level.
#[derive(Parser, Debug)]
#[command(name = "pyindent")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
	/// Path to configuration file
	#[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
	pub config: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Open a file in the terminal playground (default)
	Edit(EditArgs),
	/// Print the edit the engine makes for one key press, as JSON
	Decide(DecideArgs),
}

#[derive(Args, Debug, Default)]
pub struct EditArgs {
	/// File to edit; created on save if missing
	#[arg(value_hint = ValueHint::FilePath)]
	pub file: Option<PathBuf>,

	/// Open the document read-only
	#[arg(long)]
	pub read_only: bool,
}

#[derive(Args, Debug)]
pub struct DecideArgs {
	/// Key being pressed
	#[arg(short, long, value_enum)]
	pub key: KeyArg,

	/// Text of the current line up to the cursor
	#[arg(allow_hyphen_values = true)]
	pub line: String,

	/// Treat the view as having an active selection
	#[arg(long)]
	pub selection: bool,

	/// Indent with this many spaces (overrides indent.tab_width and indent.insert_spaces)
	#[arg(long, conflicts_with = "tabs")]
	pub tab_width: Option<usize>,

	/// Indent with a tab instead of spaces
	#[arg(long)]
	pub tabs: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyArg {
	Enter,
	Backspace,
	Other,
}

impl From<KeyArg> for Key {
	fn from(key: KeyArg) -> Self {
		match key {
			KeyArg::Enter => Key::Enter,
			KeyArg::Backspace => Key::Backspace,
			KeyArg::Other => Key::Other,
		}
	}
}

impl DecideArgs {
	pub fn indent_settings(&self, config: &AppConfig) -> IndentSettings {
		IndentSettings {
			insert_spaces: !self.tabs && (self.tab_width.is_some() || config.indent.insert_spaces),
			tab_width:     self.tab_width.unwrap_or(config.indent.tab_width),
		}
	}
}

/// Runs the engine once and renders the resulting action as JSON.
pub fn run_decide(args: &DecideArgs, config: &AppConfig) -> Result<String> {
	let settings = args.indent_settings(config);
	let unit = IndentUnit::from_settings(settings).context("invalid indentation settings")?;
	let event = KeyEvent::new(args.key.into()).with_selection(args.selection);
	let action = decide(event, &args.line, &unit);
	serde_json::to_string(&action).context("serialize edit action failed")
}

#[cfg(test)]
mod tests {
	use clap::Parser;

	use super::{Cli, Commands, KeyArg, run_decide};
	use crate::config::AppConfig;
	use crate::host::IndentSettings;

	fn decide_json(argv: &[&str]) -> String {
		let cli = Cli::try_parse_from(argv).expect("valid arguments");
		let Some(Commands::Decide(args)) = cli.command else {
			panic!("expected decide subcommand");
		};
		run_decide(&args, &AppConfig::default()).expect("decide succeeds")
	}

	#[test]
	fn decide_should_print_insert_action() {
		let json = decide_json(&["pyindent", "decide", "--key", "enter", "    if x:"]);
		assert_eq!(json, r#"{"action":"insert_text","text":"\n        "}"#);
	}

	#[test]
	fn decide_should_honor_tab_flags() {
		let json = decide_json(&["pyindent", "decide", "--key", "enter", "--tabs", "\tif x:"]);
		assert_eq!(json, r#"{"action":"insert_text","text":"\n\t\t"}"#);

		let json = decide_json(&["pyindent", "decide", "-k", "backspace", "--tab-width", "2", "     "]);
		assert_eq!(json, r#"{"action":"delete_before","count":1}"#);
	}

	#[test]
	fn tab_width_flag_should_win_over_tab_config() {
		let config = AppConfig { indent: IndentSettings { insert_spaces: false, tab_width: 8 }, ..AppConfig::default() };
		let cli = Cli::try_parse_from(["pyindent", "decide", "--key", "enter", "--tab-width", "2", "  if x:"])
			.expect("valid arguments");
		let Some(Commands::Decide(args)) = cli.command else {
			panic!("expected decide subcommand");
		};
		let json = run_decide(&args, &config).expect("decide succeeds");
		assert_eq!(json, r#"{"action":"insert_text","text":"\n    "}"#);
	}

	#[test]
	fn tab_config_should_apply_without_tab_width_flag() {
		let config = AppConfig { indent: IndentSettings { insert_spaces: false, tab_width: 8 }, ..AppConfig::default() };
		let cli = Cli::try_parse_from(["pyindent", "decide", "--key", "enter", "\tif x:"]).expect("valid arguments");
		let Some(Commands::Decide(args)) = cli.command else {
			panic!("expected decide subcommand");
		};
		let json = run_decide(&args, &config).expect("decide succeeds");
		assert_eq!(json, r#"{"action":"insert_text","text":"\n\t\t"}"#);
	}

	#[test]
	fn tabs_and_tab_width_should_conflict() {
		assert!(Cli::try_parse_from(["pyindent", "decide", "--key", "enter", "--tabs", "--tab-width", "2", "x"]).is_err());
	}

	#[test]
	fn decide_with_selection_should_print_none() {
		let json = decide_json(&["pyindent", "decide", "--key", "enter", "--selection", "if x:"]);
		assert_eq!(json, r#"{"action":"none"}"#);
	}

	#[test]
	fn decide_should_reject_zero_tab_width() {
		let cli = Cli::try_parse_from(["pyindent", "decide", "--key", "backspace", "--tab-width", "0", "  "])
			.expect("valid arguments");
		let Some(Commands::Decide(args)) = cli.command else {
			panic!("expected decide subcommand");
		};
		assert!(run_decide(&args, &AppConfig::default()).is_err());
	}

	#[test]
	fn no_subcommand_should_parse() {
		let cli = Cli::try_parse_from(["pyindent", "--config", "custom.toml"]).expect("valid arguments");
		assert!(cli.command.is_none());
		assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("custom.toml")));
	}

	#[test]
	fn edit_should_take_file_and_read_only() {
		let cli = Cli::try_parse_from(["pyindent", "edit", "--read-only", "main.py"]).expect("valid arguments");
		let Some(Commands::Edit(args)) = cli.command else {
			panic!("expected edit subcommand");
		};
		assert!(args.read_only);
		assert_eq!(args.file.as_deref(), Some(std::path::Path::new("main.py")));
	}

	#[test]
	fn key_arg_should_parse_lowercase_names() {
		let cli = Cli::try_parse_from(["pyindent", "decide", "--key", "other", "x"]).expect("valid arguments");
		let Some(Commands::Decide(args)) = cli.command else {
			panic!("expected decide subcommand");
		};
		assert_eq!(args.key, KeyArg::Other);
	}
}
