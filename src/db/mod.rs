//! Persistence module split across logical submodules.

mod books;
mod catalog;
mod connection;

pub use catalog::{BookStore, SqliteCatalog};
pub use connection::StoreLocation;
