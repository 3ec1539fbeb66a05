use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::host::IndentSettings;
use crate::plugin::DEFAULT_LANGUAGE;

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("read config failed: {}", path.display())]
	Read {
		path:   PathBuf,
		#[source]
		source: io::Error,
	},
	#[error("parse config failed: {}", path.display())]
	Parse {
		path:   PathBuf,
		#[source]
		source: toml::de::Error,
	},
	#[error("indent.tab_width must be at least 1")]
	ZeroTabWidth,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
	/// Language name the smart indentation is active for.
	pub language: String,
	pub indent:   IndentSettings,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self { language: DEFAULT_LANGUAGE.to_string(), indent: IndentSettings::default() }
	}
}

impl AppConfig {
	/// Loads `path`; a missing file yields the defaults.
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let text = match std::fs::read_to_string(path) {
			Ok(text) => text,
			Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
			Err(source) => return Err(ConfigError::Read { path: path.to_path_buf(), source }),
		};
		Self::parse(&text, path)
	}

	pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
		Self::parse(text, Path::new("<inline>"))
	}

	fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
		let config = toml::from_str::<Self>(text)
			.map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
		config.validate()?;
		Ok(config)
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if self.indent.tab_width == 0 {
			return Err(ConfigError::ZeroTabWidth);
		}
		Ok(())
	}
}
