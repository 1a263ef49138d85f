//! Schedule (solution) model.
//!
//! A schedule places remaining requirements into terms. Each term holds an
//! ordered list of courses whose unit sum stays within the per-term cap.
//! Category placeholders carry their [`Category`] tag alongside the name.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Category, Term, TermSlot, Year};

/// Name used for capacity left over once every quota is met.
pub const OPEN_SLOT: &str = "Open Slot";

/// A course placed in a term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledCourse {
    /// Course code or placeholder name.
    pub course: String,
    /// Units counted toward the term cap.
    pub units: u32,
    /// Category tag for placeholders. Not part of the wire format.
    #[serde(skip)]
    pub category: Option<Category>,
}

impl ScheduledCourse {
    /// Creates a one-unit course entry.
    pub fn new(course: impl Into<String>) -> Self {
        Self {
            course: course.into(),
            units: 1,
            category: None,
        }
    }

    /// Sets the unit weight.
    pub fn with_units(mut self, units: u32) -> Self {
        self.units = units;
        self
    }

    /// Tags the entry with a requirement category.
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// A numbered category placeholder, e.g. `Theme (3)`.
    pub fn placeholder(category: Category, index: u32) -> Self {
        Self::new(category.placeholder(index)).with_category(category)
    }

    /// A generic filler unit.
    pub fn open_slot() -> Self {
        Self::new(OPEN_SLOT)
    }

    /// Whether this is generic filler.
    pub fn is_open_slot(&self) -> bool {
        self.category.is_none() && self.course == OPEN_SLOT
    }
}

/// A term-by-term plan.
///
/// Serializes as `{ year: { term: [ { course, units } ] } }` with years and
/// terms in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule {
    terms: BTreeMap<Year, BTreeMap<Term, Vec<ScheduledCourse>>>,
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a schedule with an empty entry for every term of the program.
    pub fn with_all_terms() -> Self {
        let mut schedule = Self::new();
        for slot in TermSlot::all() {
            schedule.ensure_term(slot);
        }
        schedule
    }

    /// Makes sure `slot` is present, even if empty.
    pub fn ensure_term(&mut self, slot: TermSlot) {
        self.terms
            .entry(slot.year)
            .or_default()
            .entry(slot.term)
            .or_default();
    }

    /// Appends a course to a term.
    pub fn add(&mut self, slot: TermSlot, course: ScheduledCourse) {
        self.terms
            .entry(slot.year)
            .or_default()
            .entry(slot.term)
            .or_default()
            .push(course);
    }

    /// Courses in a term (empty if the term is absent).
    pub fn courses_in(&self, slot: TermSlot) -> &[ScheduledCourse] {
        self.terms
            .get(&slot.year)
            .and_then(|terms| terms.get(&slot.term))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Unit sum of a term.
    pub fn units_in(&self, slot: TermSlot) -> u32 {
        self.courses_in(slot).iter().map(|c| c.units).sum()
    }

    /// Finds the term a course is placed in.
    pub fn term_of(&self, course: &str) -> Option<TermSlot> {
        self.iter()
            .find(|(_, c)| c.course == course)
            .map(|(slot, _)| slot)
    }

    /// Whether a course is placed anywhere.
    pub fn contains(&self, course: &str) -> bool {
        self.term_of(course).is_some()
    }

    /// All placed courses in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (TermSlot, &ScheduledCourse)> {
        self.terms.iter().flat_map(|(&year, terms)| {
            terms.iter().flat_map(move |(&term, courses)| {
                courses.iter().map(move |c| (TermSlot::new(year, term), c))
            })
        })
    }

    /// Terms present in the schedule, in chronological order.
    pub fn term_slots(&self) -> Vec<TermSlot> {
        self.terms
            .iter()
            .flat_map(|(&year, terms)| terms.keys().map(move |&term| TermSlot::new(year, term)))
            .collect()
    }

    /// Number of placed courses.
    pub fn course_count(&self) -> usize {
        self.iter().count()
    }

    /// Unit sum across all terms.
    pub fn total_units(&self) -> u32 {
        self.iter().map(|(_, c)| c.units).sum()
    }

    /// Placeholders of one category placed anywhere.
    pub fn placeholders_of(&self, category: Category) -> usize {
        self.iter()
            .filter(|(_, c)| c.category == Some(category))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fall(year: Year) -> TermSlot {
        TermSlot::new(year, Term::Fall)
    }

    fn sample_schedule() -> Schedule {
        let mut s = Schedule::new();
        s.add(fall(Year::Freshman), ScheduledCourse::new("CS 111"));
        s.add(fall(Year::Freshman), ScheduledCourse::new("MATH 220").with_units(2));
        s.add(fall(Year::Sophomore), ScheduledCourse::placeholder(Category::Theme, 1));
        s
    }

    #[test]
    fn test_units_in_term() {
        let s = sample_schedule();
        assert_eq!(s.units_in(fall(Year::Freshman)), 3);
        assert_eq!(s.units_in(fall(Year::Senior)), 0);
        assert_eq!(s.total_units(), 4);
    }

    #[test]
    fn test_term_of() {
        let s = sample_schedule();
        assert_eq!(s.term_of("Theme (1)"), Some(fall(Year::Sophomore)));
        assert!(s.contains("CS 111"));
        assert!(!s.contains("CS 999"));
    }

    #[test]
    fn test_iter_is_chronological() {
        let mut s = Schedule::new();
        s.add(TermSlot::LAST, ScheduledCourse::new("late"));
        s.add(TermSlot::FIRST, ScheduledCourse::new("early"));
        let order: Vec<&str> = s.iter().map(|(_, c)| c.course.as_str()).collect();
        assert_eq!(order, vec!["early", "late"]);
    }

    #[test]
    fn test_with_all_terms() {
        let s = Schedule::with_all_terms();
        assert_eq!(s.term_slots().len(), 12);
        assert_eq!(s.course_count(), 0);
    }

    #[test]
    fn test_placeholder_tagging() {
        let s = sample_schedule();
        assert_eq!(s.placeholders_of(Category::Theme), 1);
        assert_eq!(s.placeholders_of(Category::Project), 0);
        assert!(ScheduledCourse::open_slot().is_open_slot());
        assert!(!ScheduledCourse::new("CS 111").is_open_slot());
    }

    #[test]
    fn test_serializes_nested_by_year_and_term() {
        let mut s = Schedule::new();
        s.add(fall(Year::Junior), ScheduledCourse::new("CS 213"));
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "junior": { "fall": [{ "course": "CS 213", "units": 1 }] } })
        );
    }
}
