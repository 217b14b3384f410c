//! Runtime configuration. The database and log locations arrive from
//! command-line flags or environment variables, with defaults under the
//! user's home directory.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use clap::Parser;
use directories::BaseDirs;

use crate::db::StoreLocation;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".library-catalog";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "library.sqlite";

#[derive(Debug, Parser)]
#[command(author, version, about = "Keep a rated catalogue of books in your terminal", long_about = None)]
pub struct Cli {
    /// SQLite database file holding the catalogue.
    #[arg(long, env = "LIBRARY_CATALOG_DB", value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Directory receiving the log file.
    #[arg(long, env = "LIBRARY_CATALOG_LOG_DIR", value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Keep the catalogue in memory only; nothing is written to disk.
    #[arg(long)]
    pub in_memory: bool,
}

/// Resolved settings used by `main`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub store: StoreLocation,
    pub log_dir: PathBuf,
}

impl Settings {
    /// Fill in defaults relative to the current user's home directory. The
    /// home directory is only looked up when a flag was left unset.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        Self::resolve(cli, || {
            BaseDirs::new()
                .map(|dirs| dirs.home_dir().to_path_buf())
                .ok_or_else(|| anyhow!("could not locate home directory"))
        })
    }

    /// Fill in defaults relative to `home`.
    pub fn with_home(cli: Cli, home: &Path) -> Result<Self> {
        Self::resolve(cli, || Ok(home.to_path_buf()))
    }

    fn resolve(cli: Cli, mut home: impl FnMut() -> Result<PathBuf>) -> Result<Self> {
        let mut data_dir = || home().map(|home| home.join(DATA_DIR_NAME));

        let store = match (cli.in_memory, cli.database) {
            (true, _) => StoreLocation::Memory,
            (false, Some(path)) => StoreLocation::File(path),
            (false, None) => StoreLocation::File(data_dir()?.join(DB_FILE_NAME)),
        };
        let log_dir = match cli.log_dir {
            Some(dir) => dir,
            None => data_dir()?,
        };

        Ok(Self { store, log_dir })
    }
}
