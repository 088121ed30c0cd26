use std::io;

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use crossterm::tty::IsTty;
use tracing_subscriber::EnvFilter;

use borat::cli::{Cli, Commands};
use borat::config::{default_settings_path, Overrides, Settings, SettingsFile};
use borat::dispatcher::Dispatcher;
use borat::ui::Ui;

const LOG_ENV: &str = "BORAT_LOG";

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    install_tracing()?;

    let settings_path = cli.config.clone().unwrap_or_else(default_settings_path);
    let file = SettingsFile::load(&settings_path)?;
    let settings = Settings::resolve(
        file,
        Overrides {
            data_file: cli.file,
            no_color: cli.no_color,
            quiet: cli.quiet,
        },
    );

    let stdout = io::stdout();
    let color = settings.color && stdout.is_tty();
    let ui = Ui::new(stdout.lock(), color);
    let mut dispatcher = Dispatcher::open(&settings.data_file, io::stdin().lock(), ui)
        .with_context(|| format!("cannot open task file {}", settings.data_file.display()))?;
    dispatcher.run(settings.banner)?;
    Ok(())
}

fn install_tracing() -> Result<()> {
    // Logs go to stderr; stdout carries the conversation.
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err| anyhow!("cannot install logging: {err}"))
}
