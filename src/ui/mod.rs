//! Ratatui front-end: the book table, the input form, modal dialogs, and the
//! coordinator that turns key presses into store calls.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::{Action, App, Notice, NoticeKind};
pub use forms::{BookField, BookForm};
pub use terminal::run_app;
