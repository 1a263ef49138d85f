//! Student position (cursor) resolution.
//!
//! Determines the first term open for new assignments.
//!
//! 1. If any completed course carries a year/term tag, the cursor is the
//!    term after the latest tagged one. Senior spring is terminal and stays
//!    put.
//! 2. Otherwise the cursor is the term after the template term with the
//!    most satisfied slots (earliest term wins ties).
//! 3. With nothing to go on, the cursor is freshman fall.

use std::collections::BTreeSet;

use super::requirements::TemplateIndex;
use crate::models::{CompletedCourse, TermSlot};

/// Resolves the scheduling cursor.
///
/// `satisfied` is the satisfied-code set from
/// [`remaining_requirements`](super::requirements::remaining_requirements).
pub fn resolve_position(
    completed: &[CompletedCourse],
    index: &TemplateIndex,
    satisfied: &BTreeSet<String>,
) -> TermSlot {
    if let Some(latest) = completed.iter().filter_map(CompletedCourse::taken).max() {
        return latest.advance();
    }

    position_from_template(index, satisfied).unwrap_or(TermSlot::FIRST)
}

fn position_from_template(index: &TemplateIndex, satisfied: &BTreeSet<String>) -> Option<TermSlot> {
    let mut counts: Vec<(TermSlot, usize)> = Vec::new();
    for slot in index.slots() {
        if !slot.alternatives.iter().any(|code| satisfied.contains(code)) {
            continue;
        }
        match counts.iter_mut().find(|(term, _)| *term == slot.term) {
            Some((_, count)) => *count += 1,
            None => counts.push((slot.term, 1)),
        }
    }

    // Slots are chronological, so the first maximum is the earliest term
    let mut best: Option<(TermSlot, usize)> = None;
    for (term, count) in counts {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((term, count));
        }
    }
    best.map(|(term, _)| term.advance())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RequirementSlot, RequirementTemplate, Term, Year};
    use crate::normalize::CodeNormalizer;
    use crate::planner::requirements::remaining_requirements;

    fn index() -> TemplateIndex {
        let template = RequirementTemplate::new()
            .with_slot(Year::Freshman, Term::Fall, RequirementSlot::new("CS 111 or 150"))
            .with_slot(Year::Freshman, Term::Fall, RequirementSlot::new("MATH 220-1"))
            .with_slot(Year::Freshman, Term::Winter, RequirementSlot::new("CS 211"))
            .with_slot(Year::Sophomore, Term::Fall, RequirementSlot::new("CS 213"))
            .with_slot(Year::Sophomore, Term::Fall, RequirementSlot::new("CS 212"));
        TemplateIndex::build(&template, &CodeNormalizer::new())
    }

    fn resolve(completed: &[CompletedCourse]) -> TermSlot {
        let index = index();
        let normalizer = CodeNormalizer::new();
        let codes: Vec<String> = completed.iter().map(|c| c.code(&normalizer)).collect();
        let remaining = remaining_requirements(&index, &codes);
        resolve_position(completed, &index, &remaining.satisfied)
    }

    #[test]
    fn test_no_courses_starts_at_freshman_fall() {
        assert_eq!(resolve(&[]), TermSlot::FIRST);
    }

    #[test]
    fn test_latest_tag_wins() {
        let completed = vec![
            CompletedCourse::new("CS", "111").taken_in(Year::Freshman, Term::Fall),
            CompletedCourse::new("CS", "211").taken_in(Year::Sophomore, Term::Spring),
            CompletedCourse::new("CS", "212").taken_in(Year::Sophomore, Term::Winter),
        ];
        assert_eq!(resolve(&completed), TermSlot::new(Year::Junior, Term::Fall));
    }

    #[test]
    fn test_senior_spring_is_terminal() {
        let completed = vec![CompletedCourse::new("CS", "111").taken_in(Year::Senior, Term::Spring)];
        assert_eq!(resolve(&completed), TermSlot::LAST);
    }

    #[test]
    fn test_untagged_falls_back_to_template() {
        // Two satisfied slots in sophomore fall, one in freshman fall
        let completed = vec![
            CompletedCourse::new("CS", "150"),
            CompletedCourse::new("CS", "213"),
            CompletedCourse::new("CS", "212"),
        ];
        assert_eq!(resolve(&completed), TermSlot::new(Year::Sophomore, Term::Winter));
    }

    #[test]
    fn test_template_ties_pick_earliest_term() {
        let completed = vec![CompletedCourse::new("CS", "111"), CompletedCourse::new("CS", "213")];
        assert_eq!(resolve(&completed), TermSlot::new(Year::Freshman, Term::Winter));
    }

    #[test]
    fn test_unmatched_courses_start_at_freshman_fall() {
        let completed = vec![CompletedCourse::new("HIST", "101")];
        assert_eq!(resolve(&completed), TermSlot::FIRST);
    }
}
