//! Domain model for a catalogued book. The record mirrors one row of the
//! `books` table but keeps its fields private so the rating can never drift
//! away from the three subscores it is derived from.

use std::fmt;

/// Lowest score a reviewer can give for any of the three criteria.
pub const MIN_SCORE: f64 = 0.0;
/// Highest score a reviewer can give for any of the three criteria.
pub const MAX_SCORE: f64 = 5.0;

/// Whether `score` lies within the accepted `[MIN_SCORE, MAX_SCORE]` range.
/// NaN never passes.
pub fn score_in_range(score: f64) -> bool {
    (MIN_SCORE..=MAX_SCORE).contains(&score)
}

/// In-memory representation of one book.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BookRecord {
    /// Primary key assigned by the store. `None` until the record has been
    /// persisted.
    id: Option<i64>,
    title: String,
    author: String,
    publication_year: i32,
    storyline_score: f64,
    language_score: f64,
    originality_score: f64,
    /// Mean of the three scores. Recomputed on every score change.
    rating: f64,
}

impl BookRecord {
    /// Build an unsaved record and compute its rating straight away.
    ///
    /// Values are stored as given; the form validates them before a record is
    /// ever constructed from user input.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        publication_year: i32,
        storyline_score: f64,
        language_score: f64,
        originality_score: f64,
    ) -> Self {
        let mut record = Self {
            id: None,
            title: title.into(),
            author: author.into(),
            publication_year,
            storyline_score,
            language_score,
            originality_score,
            rating: 0.0,
        };
        record.recompute_rating();
        record
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// Attach the store-generated identifier. Only the persistence layer and
    /// the coordinator (when rebuilding a record for an update) call this.
    pub(crate) fn assign_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.author = author.into();
    }

    pub fn publication_year(&self) -> i32 {
        self.publication_year
    }

    /// Years must be positive. Anything else is ignored.
    pub fn set_publication_year(&mut self, year: i32) {
        if year > 0 {
            self.publication_year = year;
        }
    }

    pub fn storyline_score(&self) -> f64 {
        self.storyline_score
    }

    pub fn set_storyline_score(&mut self, score: f64) {
        if score_in_range(score) {
            self.storyline_score = score;
            self.recompute_rating();
        }
    }

    pub fn language_score(&self) -> f64 {
        self.language_score
    }

    pub fn set_language_score(&mut self, score: f64) {
        if score_in_range(score) {
            self.language_score = score;
            self.recompute_rating();
        }
    }

    pub fn originality_score(&self) -> f64 {
        self.originality_score
    }

    pub fn set_originality_score(&mut self, score: f64) {
        if score_in_range(score) {
            self.originality_score = score;
            self.recompute_rating();
        }
    }

    /// Mean of the three scores. Read-only.
    pub fn rating(&self) -> f64 {
        self.rating
    }

    fn recompute_rating(&mut self) {
        self.rating = (self.storyline_score + self.language_score + self.originality_score) / 3.0;
    }
}

impl fmt::Display for BookRecord {
    /// `Title - Author (Year), rating 4.00`, used in dialogs and log lines.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} ({}), rating {:.2}",
            self.title, self.author, self.publication_year, self.rating
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn rating_is_mean_at_construction() {
        let book = BookRecord::new("Dune", "Herbert", 1965, 4.0, 5.0, 3.0);
        assert!((book.rating() - 4.0).abs() < EPSILON);
        assert_eq!(book.id(), None);
    }

    #[test]
    fn rating_follows_every_score_change() {
        let mut book = BookRecord::new("Dune", "Herbert", 1965, 4.0, 5.0, 3.0);

        book.set_storyline_score(1.0);
        assert!((book.rating() - 3.0).abs() < EPSILON);

        book.set_language_score(2.0);
        assert!((book.rating() - 2.0).abs() < EPSILON);

        book.set_originality_score(0.0);
        assert!((book.rating() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn rating_matches_mean_across_score_grid() {
        let steps = [0.0, 0.5, 1.25, 2.0, 3.5, 4.75, 5.0];
        for &a in &steps {
            for &b in &steps {
                for &c in &steps {
                    let book = BookRecord::new("t", "a", 2000, a, b, c);
                    assert!((book.rating() - (a + b + c) / 3.0).abs() < EPSILON);
                }
            }
        }
    }

    #[test]
    fn out_of_range_scores_are_rejected_not_clamped() {
        let mut book = BookRecord::new("Dune", "Herbert", 1965, 4.0, 5.0, 3.0);

        book.set_storyline_score(5.1);
        book.set_language_score(-0.1);
        book.set_originality_score(f64::NAN);

        assert_eq!(book.storyline_score(), 4.0);
        assert_eq!(book.language_score(), 5.0);
        assert_eq!(book.originality_score(), 3.0);
        assert!((book.rating() - 4.0).abs() < EPSILON);
    }

    #[test]
    fn boundary_scores_are_accepted() {
        let mut book = BookRecord::default();
        book.set_storyline_score(5.0);
        book.set_language_score(0.0);
        book.set_originality_score(5.0);
        assert!((book.rating() - 10.0 / 3.0).abs() < EPSILON);
    }

    #[test]
    fn non_positive_year_is_ignored() {
        let mut book = BookRecord::new("Dune", "Herbert", 1965, 4.0, 5.0, 3.0);
        book.set_publication_year(0);
        assert_eq!(book.publication_year(), 1965);
        book.set_publication_year(-12);
        assert_eq!(book.publication_year(), 1965);
        book.set_publication_year(1966);
        assert_eq!(book.publication_year(), 1966);
    }

    #[test]
    fn default_record_is_empty() {
        let book = BookRecord::default();
        assert_eq!(book.id(), None);
        assert!(book.title().is_empty());
        assert!(book.author().is_empty());
        assert_eq!(book.publication_year(), 0);
        assert_eq!(book.rating(), 0.0);
    }

    #[test]
    fn display_shows_two_decimal_rating() {
        let book = BookRecord::new("Dune", "Herbert", 1965, 4.0, 4.0, 3.0);
        assert_eq!(book.to_string(), "Dune - Herbert (1965), rating 3.67");
    }
}
