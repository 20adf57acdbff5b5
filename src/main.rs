mod cli;

use std::sync::Arc;

use clap::Parser;
use cli::{Cli, Command};
use regform::{App, Config, HttpRecordStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    // Load configuration; command-line flags win over file and environment
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        config.store.base_url = base_url;
    }
    if let Some(locale) = cli.locale {
        config.locale = locale;
    }
    config.validate()?;

    let store = Arc::new(HttpRecordStore::new(
        &config.store.base_url,
        config.store.page_size,
    )?);
    let width = cli::current_width(cli.width);
    let mut app = App::new(&config, store, width)?;

    match cli.command {
        Command::Add { values } => cli::add::add(&mut app, &values.inputs(), width).await?,
        Command::List { page } => cli::list::list(&mut app, page, width).await?,
        Command::Delete { id } => cli::delete::delete(&mut app, &id, width).await?,
        Command::Update { id, values } => {
            cli::update::update(&mut app, &id, &values.inputs(), width).await?
        }
        Command::Shell => cli::shell::shell(&mut app, cli.width).await?,
    }

    Ok(())
}
