//! Completed-course records.
//!
//! One entry per course on the student's transcript, as produced by an
//! external transcript scraper.

use serde::{Deserialize, Serialize};

use super::{Term, TermSlot, Year};
use crate::normalize::CodeNormalizer;

/// A course the student has already completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedCourse {
    /// Subject code as printed on the transcript (e.g. `COMP_SCI`).
    pub subject: String,
    /// Course number, possibly with a `-0` section suffix.
    pub course_number: String,
    /// Course title.
    pub title: String,
    /// Credit units earned.
    pub earned: f64,
    /// Class year the course was taken in, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<Year>,
    /// Term the course was taken in, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<Term>,
}

impl CompletedCourse {
    /// Creates a completed course with one earned unit and no term tag.
    pub fn new(subject: impl Into<String>, course_number: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            course_number: course_number.into(),
            title: String::new(),
            earned: 1.0,
            year: None,
            term: None,
        }
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the earned credit units.
    pub fn with_earned(mut self, earned: f64) -> Self {
        self.earned = earned;
        self
    }

    /// Tags the course with the term it was taken in.
    pub fn taken_in(mut self, year: Year, term: Term) -> Self {
        self.year = Some(year);
        self.term = Some(term);
        self
    }

    /// When the course was taken, if both year and term are known.
    pub fn taken(&self) -> Option<TermSlot> {
        match (self.year, self.term) {
            (Some(year), Some(term)) => Some(TermSlot::new(year, term)),
            _ => None,
        }
    }

    /// Canonical course code.
    pub fn code(&self, normalizer: &CodeNormalizer) -> String {
        normalizer.normalize(&self.subject, &self.course_number)
    }
}
