//! Core library surface for the Library Catalog TUI application.
//!
//! The binary only parses configuration and starts the event loop; everything
//! else lives here so tests and other tooling can drive the same pieces.
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod ui;

/// Persistence entry points used by `main.rs` and the integration tests.
pub use db::{BookStore, SqliteCatalog, StoreLocation};

pub use error::{StoreError, ValidationError};

/// The domain type every layer passes around.
pub use models::BookRecord;

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
