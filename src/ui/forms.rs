use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::error::ValidationError;
use crate::models::{score_in_range, BookRecord};

/// Fields of the book form, in tab order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum BookField {
    #[default]
    Title,
    Author,
    Year,
    Storyline,
    Language,
    Originality,
}

impl BookField {
    pub const ALL: [BookField; 6] = [
        BookField::Title,
        BookField::Author,
        BookField::Year,
        BookField::Storyline,
        BookField::Language,
        BookField::Originality,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BookField::Title => "Title",
            BookField::Author => "Author",
            BookField::Year => "Year",
            BookField::Storyline => "Storyline",
            BookField::Language => "Language",
            BookField::Originality => "Originality",
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            BookField::Title | BookField::Author => "<required>",
            BookField::Year => "<e.g. 1965>",
            BookField::Storyline | BookField::Language | BookField::Originality => "<0-5>",
        }
    }

    fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|field| *field == self)
            .unwrap_or_default()
    }

    fn offset(self, step: isize) -> Self {
        let len = Self::ALL.len() as isize;
        let next = (self.index() as isize + step).rem_euclid(len);
        Self::ALL[next as usize]
    }

    /// Whether `ch` may be appended to `current` in this field. Years take
    /// digits only, scores take digits and a single decimal point.
    fn accepts(self, current: &str, ch: char) -> bool {
        match self {
            BookField::Title | BookField::Author => !ch.is_control(),
            BookField::Year => ch.is_ascii_digit(),
            BookField::Storyline | BookField::Language | BookField::Originality => {
                ch.is_ascii_digit() || (ch == '.' && !current.contains('.'))
            }
        }
    }
}

/// The six editable inputs plus which one has focus. Values are kept as raw
/// text until the form is submitted.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BookForm {
    title: String,
    author: String,
    year: String,
    storyline: String,
    language: String,
    originality: String,
    pub(crate) active: BookField,
}

impl BookForm {
    /// Populate the form from a table row. The id is not part of the form.
    pub fn from_book(book: &BookRecord) -> Self {
        Self {
            title: book.title().to_string(),
            author: book.author().to_string(),
            year: book.publication_year().to_string(),
            storyline: book.storyline_score().to_string(),
            language: book.language_score().to_string(),
            originality: book.originality_score().to_string(),
            active: BookField::Title,
        }
    }

    pub fn field(&self, field: BookField) -> &str {
        match field {
            BookField::Title => &self.title,
            BookField::Author => &self.author,
            BookField::Year => &self.year,
            BookField::Storyline => &self.storyline,
            BookField::Language => &self.language,
            BookField::Originality => &self.originality,
        }
    }

    pub fn set_field(&mut self, field: BookField, value: impl Into<String>) {
        *self.field_mut(field) = value.into();
    }

    fn field_mut(&mut self, field: BookField) -> &mut String {
        match field {
            BookField::Title => &mut self.title,
            BookField::Author => &mut self.author,
            BookField::Year => &mut self.year,
            BookField::Storyline => &mut self.storyline,
            BookField::Language => &mut self.language,
            BookField::Originality => &mut self.originality,
        }
    }

    pub fn active(&self) -> BookField {
        self.active
    }

    pub fn focus(&mut self, field: BookField) {
        self.active = field;
    }

    pub fn next_field(&mut self) {
        self.active = self.active.offset(1);
    }

    pub fn previous_field(&mut self) {
        self.active = self.active.offset(-1);
    }

    /// Append a character to the active field. Returns `false` when the field
    /// does not accept it.
    pub fn push_char(&mut self, ch: char) -> bool {
        let field = self.active;
        if !field.accepts(self.field(field), ch) {
            return false;
        }
        self.field_mut(field).push(ch);
        true
    }

    pub fn backspace(&mut self) {
        let field = self.active;
        self.field_mut(field).pop();
    }

    /// Empty every field and put the focus back on the title.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Validate the inputs and build an unsaved record.
    ///
    /// Checks run in a fixed order so the first broken rule decides the
    /// message: missing text, then unparsable numbers, then ranges.
    pub fn parse_inputs(&self) -> Result<BookRecord, ValidationError> {
        let title = self.title.trim();
        let author = self.author.trim();
        if title.is_empty() || author.is_empty() {
            return Err(ValidationError::EmptyText);
        }

        let year: i32 = parse_number(&self.year)?;
        let storyline: f64 = parse_number(&self.storyline)?;
        let language: f64 = parse_number(&self.language)?;
        let originality: f64 = parse_number(&self.originality)?;

        if year <= 0 || ![storyline, language, originality].into_iter().all(score_in_range) {
            return Err(ValidationError::OutOfRange);
        }

        Ok(BookRecord::new(
            title,
            author,
            year,
            storyline,
            language,
            originality,
        ))
    }

    /// Render one `Label: value` line, highlighting the focused field.
    pub(crate) fn build_line(&self, field: BookField) -> Line<'static> {
        let value = self.field(field);
        let is_active = self.active == field;

        let display = if value.is_empty() {
            field.placeholder().to_string()
        } else {
            value.to_string()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(display, style),
        ])
    }

    /// Character length of the requested field, used to place the cursor.
    pub(crate) fn value_len(&self, field: BookField) -> usize {
        self.field(field).chars().count()
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str) -> Result<T, ValidationError> {
    raw.trim()
        .parse()
        .map_err(|_| ValidationError::InvalidNumber)
}

/// Pending confirmation before a book is removed.
#[derive(Debug, Clone)]
pub(crate) struct ConfirmBookDelete {
    pub(crate) id: i64,
    pub(crate) summary: String,
}

impl ConfirmBookDelete {
    pub(crate) fn new(id: i64, book: &BookRecord) -> Self {
        Self {
            id,
            summary: book.to_string(),
        }
    }
}
