use anyhow::{Context, Result};
use clap::Parser;
use pyindent::app::{App, EditorState};
use pyindent::cli::{Cli, Commands, EditArgs, run_decide};
use pyindent::config::AppConfig;
use pyindent::{logging, paths};

fn main() {
	if let Err(err) = run() {
		eprintln!("{:#}", err);
		std::process::exit(1);
	}
}

fn run() -> Result<()> {
	let cli = Cli::parse();
	let config_path = cli.config.unwrap_or_else(paths::user_config_file);
	let config = AppConfig::load(&config_path).context("load config failed")?;

	match cli.command.unwrap_or_else(|| Commands::Edit(EditArgs::default())) {
		Commands::Decide(args) => {
			println!("{}", run_decide(&args, &config)?);
			Ok(())
		}
		Commands::Edit(args) => {
			logging::init_logging(&paths::user_log_dir()).context("initialize logging failed")?;
			logging::log_session_start(&config_path, &config, args.file.as_deref());
			let state = EditorState::open(&config, args.file, args.read_only).context("open document failed")?;
			App::new(state).run().context("run app failed")
		}
	}
}
