use std::path::{Path, PathBuf};

use thiserror::Error;
use time::macros::format_description;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::UtcTime;

use crate::config::AppConfig;

pub const LOG_FILE_NAME: &str = "pyindent.log";
const DEFAULT_DIRECTIVE: &str = "pyindent=info";

#[derive(Debug, Error)]
pub enum LoggingError {
	#[error("create log directory failed: {}", path.display())]
	CreateLogDir {
		path:   PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("initialize tracing subscriber failed")]
	InitSubscriber {
		#[source]
		source: Box<dyn std::error::Error + Send + Sync>,
	},
}

/// Sends this crate's events to `<log_dir>/pyindent.log`, keeping the terminal UI clean.
/// `RUST_LOG` replaces the default `pyindent=info` filter. Returns the log file path.
pub fn init_logging(log_dir: &Path) -> Result<PathBuf, LoggingError> {
	std::fs::create_dir_all(log_dir)
		.map_err(|source| LoggingError::CreateLogDir { path: log_dir.to_path_buf(), source })?;

	let timer =
		UtcTime::new(format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]"));
	let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
	tracing_subscriber::fmt()
		.with_timer(timer)
		.with_env_filter(env_filter(std::env::var("RUST_LOG").ok().as_deref()))
		.with_writer(file_appender)
		.with_ansi(false)
		.try_init()
		.map_err(|source| LoggingError::InitSubscriber { source })?;

	Ok(log_dir.join(LOG_FILE_NAME))
}

/// Records what the session was started with, so a log can be matched to its settings.
pub fn log_session_start(config_path: &Path, config: &AppConfig, file: Option<&Path>) {
	info!("{}", session_banner(config_path, config, file));
}

fn env_filter(directives: Option<&str>) -> EnvFilter {
	directives
		.filter(|directives| !directives.trim().is_empty())
		.and_then(|directives| EnvFilter::try_new(directives).ok())
		.unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

fn session_banner(config_path: &Path, config: &AppConfig, file: Option<&Path>) -> String {
	let indent = if config.indent.insert_spaces {
		format!("{} spaces", config.indent.tab_width)
	} else {
		"tab".to_string()
	};
	format!(
		"pyindent {} starting: config={} language={} indent={} file={}",
		env!("CARGO_PKG_VERSION"),
		config_path.display(),
		config.language,
		indent,
		file.map_or_else(|| "<scratch>".to_string(), |file| file.display().to_string())
	)
}
