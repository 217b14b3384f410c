//! Binary entry point that glues the SQLite-backed catalogue to the TUI: read
//! the configuration, start logging, connect, load the books and drive the
//! Ratatui event loop until the user exits.
use anyhow::Context;
use clap::Parser;
use library_catalog::config::{Cli, Settings};
use library_catalog::logging::init_logging;
use library_catalog::{run_app, App, SqliteCatalog};
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    let settings = Settings::from_cli(Cli::parse())?;
    let _log_guard = init_logging(&settings.log_dir)?;
    info!(?settings, "starting library catalog");

    let mut catalog = SqliteCatalog::new(settings.store);
    catalog.connect().context("failed to open the catalogue")?;

    let mut app = App::load(catalog).context("failed to load books")?;
    let result = run_app(&mut app);

    let mut catalog = app.into_store();
    if let Err(err) = catalog.close() {
        warn!(error = %err, "database connection did not close cleanly");
    }

    result
}
