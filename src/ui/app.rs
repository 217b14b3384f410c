use std::mem;

use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;
use tracing::{debug, warn};

use crate::db::BookStore;
use crate::error::StoreError;
use crate::models::BookRecord;

use super::forms::{BookField, BookForm, ConfirmBookDelete};
use super::helpers::{centered_rect, format_score, surface_error};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Width of the form panel to the right of the table.
const FORM_WIDTH: u16 = 42;
/// Table headings, in display order.
const COLUMNS: [&str; 8] = [
    "ID",
    "Title",
    "Author",
    "Year",
    "Storyline",
    "Language",
    "Originality",
    "Rating",
];

/// One user intent. Every key binding resolves to exactly one of these and
/// [`App::dispatch`] carries it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Add,
    Update,
    /// Ask for confirmation before deleting the selected book.
    Delete,
    ConfirmDelete,
    CancelDelete,
    Clear,
    /// Select a table row and copy it into the form.
    Select(usize),
}

/// Fine-grained modes layered over the main screen.
enum Mode {
    Normal,
    ConfirmDelete(ConfirmBookDelete),
    Notice(Notice),
}

/// Modal message shown after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    fn style(&self) -> Style {
        match self {
            NoticeKind::Success => Style::default().fg(Color::Green),
            NoticeKind::Error => Style::default().fg(Color::Red),
        }
    }

    fn title(&self) -> &'static str {
        match self {
            NoticeKind::Success => "Success",
            NoticeKind::Error => "Error",
        }
    }
}

/// Central application state: the loaded books, the form, the current table
/// selection and whichever dialog is open. It also owns the store and turns
/// every [`Action`] into validated store calls followed by a reload.
pub struct App<S: BookStore> {
    store: S,
    books: Vec<BookRecord>,
    selected: Option<usize>,
    form: BookForm,
    mode: Mode,
    status: Option<Notice>,
}

impl<S: BookStore> App<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            books: Vec::new(),
            selected: None,
            form: BookForm::default(),
            mode: Mode::Normal,
            status: None,
        }
    }

    /// Build the app and fill the table from the store.
    pub fn load(store: S) -> Result<Self, StoreError> {
        let mut app = Self::new(store);
        app.reload_books()?;
        Ok(app)
    }

    pub fn books(&self) -> &[BookRecord] {
        &self.books
    }

    pub fn form(&self) -> &BookForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut BookForm {
        &mut self.form
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn selected_row(&self) -> Option<usize> {
        self.selected
    }

    /// Identifier of the highlighted row, if any.
    pub fn selected_book_id(&self) -> Option<i64> {
        self.selected
            .and_then(|idx| self.books.get(idx))
            .and_then(BookRecord::id)
    }

    /// The dialog currently shown, if it is a notice.
    pub fn notice(&self) -> Option<&Notice> {
        match &self.mode {
            Mode::Notice(notice) => Some(notice),
            _ => None,
        }
    }

    pub fn is_confirming_delete(&self) -> bool {
        matches!(self.mode, Mode::ConfirmDelete(_))
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Add => self.add_book(),
            Action::Update => self.update_book(),
            Action::Delete => self.request_delete(),
            Action::ConfirmDelete => self.confirm_delete(),
            Action::CancelDelete => {
                if self.is_confirming_delete() {
                    self.mode = Mode::Normal;
                    self.set_status("Deletion cancelled.", NoticeKind::Success);
                }
            }
            Action::Clear => self.clear(),
            Action::Select(row) => self.select_row(row),
        }
    }

    /// Route a plain key press. Returns `true` when the app should exit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match self.mode {
            Mode::Notice(_) => {
                self.mode = Mode::Normal;
                false
            }
            Mode::ConfirmDelete(_) => {
                match code {
                    KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                        self.dispatch(Action::ConfirmDelete)
                    }
                    KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                        self.dispatch(Action::CancelDelete)
                    }
                    _ => {}
                }
                false
            }
            Mode::Normal => {
                self.handle_normal_key(code);
                false
            }
        }
    }

    /// Route a key pressed together with Ctrl. Returns `true` on quit.
    pub fn handle_ctrl(&mut self, code: KeyCode) -> bool {
        if let KeyCode::Char('q') | KeyCode::Char('c') = code {
            return true;
        }
        match self.mode {
            Mode::Notice(_) => {
                self.mode = Mode::Normal;
                return false;
            }
            Mode::ConfirmDelete(_) => return false,
            Mode::Normal => {}
        }
        match code {
            KeyCode::Char('a') => self.dispatch(Action::Add),
            KeyCode::Char('u') => self.dispatch(Action::Update),
            KeyCode::Char('d') => self.dispatch(Action::Delete),
            KeyCode::Char('l') => self.dispatch(Action::Clear),
            _ => {}
        }
        false
    }

    fn handle_normal_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::Home if !self.books.is_empty() => self.dispatch(Action::Select(0)),
            KeyCode::End if !self.books.is_empty() => {
                self.dispatch(Action::Select(self.books.len() - 1))
            }
            KeyCode::Tab | KeyCode::Enter => self.form.next_field(),
            KeyCode::BackTab => self.form.previous_field(),
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Esc => self.dispatch(Action::Clear),
            KeyCode::Char(ch) => {
                self.form.push_char(ch);
            }
            _ => {}
        }
    }

    fn move_selection(&mut self, offset: isize) {
        if self.books.is_empty() {
            return;
        }
        let last = self.books.len() - 1;
        let next = match self.selected {
            None if offset < 0 => last,
            None => 0,
            Some(current) => current.saturating_add_signed(offset).min(last),
        };
        self.dispatch(Action::Select(next));
    }

    fn add_book(&mut self) {
        let mut book = match self.form.parse_inputs() {
            Ok(book) => book,
            Err(err) => {
                warn!(%err, "new book rejected");
                self.notify(err.to_string(), NoticeKind::Error);
                return;
            }
        };

        match self.store.create(&mut book) {
            Ok(_) => self.finish_write("Book added."),
            Err(err) => self.report_store_error(&err),
        }
    }

    fn update_book(&mut self) {
        let Some(id) = self.selected_book_id() else {
            self.notify("Select a book to update first.", NoticeKind::Error);
            return;
        };

        let mut book = match self.form.parse_inputs() {
            Ok(book) => book,
            Err(err) => {
                warn!(%err, id, "book update rejected");
                self.notify(err.to_string(), NoticeKind::Error);
                return;
            }
        };
        book.assign_id(id);

        match self.store.update(&book) {
            Ok(()) => self.finish_write("Book updated."),
            Err(err) => self.report_store_error(&err),
        }
    }

    fn request_delete(&mut self) {
        let pending = self
            .selected
            .and_then(|idx| self.books.get(idx))
            .and_then(|book| book.id().map(|id| ConfirmBookDelete::new(id, book)));

        match pending {
            Some(confirm) => self.mode = Mode::ConfirmDelete(confirm),
            None => self.notify("Select a book to delete first.", NoticeKind::Error),
        }
    }

    fn confirm_delete(&mut self) {
        let confirm = match mem::replace(&mut self.mode, Mode::Normal) {
            Mode::ConfirmDelete(confirm) => confirm,
            other => {
                self.mode = other;
                return;
            }
        };

        match self.store.delete(confirm.id) {
            Ok(_) => self.finish_write("Book deleted."),
            Err(err) => self.report_store_error(&err),
        }
    }

    fn clear(&mut self) {
        self.form.clear();
        self.selected = None;
    }

    fn select_row(&mut self, row: usize) {
        if let Some(book) = self.books.get(row) {
            let active = self.form.active();
            self.form = BookForm::from_book(book);
            self.form.focus(active);
            self.selected = Some(row);
        }
    }

    /// Shared tail of every successful write: refresh the table, empty the
    /// form and tell the user.
    fn finish_write(&mut self, message: &str) {
        self.clear();
        match self.reload_books() {
            Ok(()) => self.notify(message, NoticeKind::Success),
            Err(err) => self.report_store_error(&err),
        }
    }

    fn reload_books(&mut self) -> Result<(), StoreError> {
        self.books = self.store.read_all()?;
        debug!(count = self.books.len(), "books reloaded");
        if self.selected.is_some_and(|idx| idx >= self.books.len()) {
            self.selected = None;
        }
        Ok(())
    }

    fn report_store_error(&mut self, err: &StoreError) {
        self.notify(surface_error(err), NoticeKind::Error);
    }

    fn notify<T: Into<String>>(&mut self, text: T, kind: NoticeKind) {
        let notice = Notice {
            text: text.into(),
            kind,
        };
        self.status = Some(notice.clone());
        self.mode = Mode::Notice(notice);
    }

    fn set_status<T: Into<String>>(&mut self, text: T, kind: NoticeKind) {
        self.status = Some(Notice {
            text: text.into(),
            kind,
        });
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        let panels = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(FORM_WIDTH)])
            .split(content_area);

        self.draw_table(frame, panels[0]);
        self.draw_form(frame, panels[1]);

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Notice(notice) => self.draw_notice(frame, area, notice),
            Mode::Normal => {}
        }
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Books");

        if self.books.is_empty() {
            let message = Paragraph::new("No books yet. Fill in the form and press Ctrl+A.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let header = Row::new(COLUMNS.iter().map(|heading| Cell::from(*heading)))
            .style(Style::default().add_modifier(Modifier::BOLD));

        let rows = self.books.iter().map(|book| {
            Row::new(vec![
                book.id().map(|id| id.to_string()).unwrap_or_default(),
                book.title().to_string(),
                book.author().to_string(),
                book.publication_year().to_string(),
                format_score(book.storyline_score()),
                format_score(book.language_score()),
                format_score(book.originality_score()),
                format!("{:.2}", book.rating()),
            ])
        });

        let widths = [
            Constraint::Length(4),
            Constraint::Min(12),
            Constraint::Min(10),
            Constraint::Length(5),
            Constraint::Length(9),
            Constraint::Length(8),
            Constraint::Length(11),
            Constraint::Length(6),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut state = TableState::default().with_selected(self.selected);
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect) {
        let title = match self.selected_book_id() {
            Some(id) => format!("Book #{id}"),
            None => "New Book".to_string(),
        };
        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let mut lines: Vec<Line> = BookField::ALL
            .iter()
            .map(|field| self.form.build_line(*field))
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Tab to switch fields. Scores range from 0 to 5.",
            Style::default().fg(Color::Gray),
        )));

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        if matches!(self.mode, Mode::Normal) && !inner.is_empty() {
            let active = self.form.active();
            let row = BookField::ALL
                .iter()
                .position(|field| *field == active)
                .unwrap_or_default();
            // Long values wrap; keep the cursor on the field's first line.
            let column = format!("{}: ", active.label()).len() + self.form.value_len(active);
            let cursor_x = inner
                .x
                .saturating_add(u16::try_from(column).unwrap_or(u16::MAX))
                .min(inner.right().saturating_sub(1));
            let cursor_y = inner
                .y
                .saturating_add(u16::try_from(row).unwrap_or(u16::MAX))
                .min(inner.bottom().saturating_sub(1));
            frame.set_cursor_position((cursor_x, cursor_y));
        }
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match &self.mode {
            Mode::ConfirmDelete(_) => Line::from(vec![
                Span::styled("[Y]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[N/Esc]", key_style),
                Span::raw(" Keep"),
            ]),
            Mode::Notice(_) => Line::from(vec![
                Span::styled("[Any key]", key_style),
                Span::raw(" Continue"),
            ]),
            Mode::Normal => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Select   "),
                Span::styled("[^A]", key_style),
                Span::raw(" Add   "),
                Span::styled("[^U]", key_style),
                Span::raw(" Update   "),
                Span::styled("[^D]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[^L/Esc]", key_style),
                Span::raw(" Clear   "),
                Span::styled("[^Q]", key_style),
                Span::raw(" Quit"),
            ]),
        }
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmBookDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Delete")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from("Are you sure you want to delete this book?"),
            Line::from(confirm.summary.clone()),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_notice(&self, frame: &mut Frame, area: Rect, notice: &Notice) {
        let popup_area = centered_rect(50, 25, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(notice.kind.title())
            .borders(Borders::ALL)
            .border_style(notice.kind.style());
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(Span::styled(notice.text.clone(), notice.kind.style())),
            Line::from(""),
            Line::from(Span::styled(
                "Press any key to continue.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}
