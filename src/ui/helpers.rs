use std::error::Error;

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// One line for a dialog: the error plus its immediate cause. Deeper causes
/// are left out since SQLite failures already spell out their own codes.
pub(crate) fn surface_error(err: &dyn Error) -> String {
    match err.source() {
        Some(cause) => format!("{err}: {cause}"),
        None => err.to_string(),
    }
}

/// Scores print without trailing zeros so the table and the form agree.
pub(crate) fn format_score(score: f64) -> String {
    score.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    #[test]
    fn surface_error_shows_the_first_cause() {
        let err = StoreError::query(
            "insert",
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_READONLY),
                Some("attempt to write a readonly database".to_string()),
            ),
        );
        assert_eq!(
            surface_error(&err),
            "failed to insert book: attempt to write a readonly database"
        );
    }

    #[test]
    fn surface_error_names_the_directory_failure_once() {
        let err = StoreError::Open {
            path: "/data/books.sqlite".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into(),
        };
        assert_eq!(
            surface_error(&err),
            "could not open database at /data/books.sqlite: \
             failed to create data directory: denied"
        );
    }

    #[test]
    fn surface_error_without_cause_is_plain() {
        assert_eq!(surface_error(&StoreError::NotFound(7)), "Book 7 not found.");
    }

    #[test]
    fn centered_rect_stays_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(50, 50, area);
        assert_eq!(popup.width, 50);
        assert_eq!(popup.height, 20);
        assert_eq!(popup.x, 25);
        assert_eq!(popup.y, 10);
    }
}
