//! Plan report.
//!
//! Aggregates progress counts, the final schedule and advisory notes into
//! the document handed back to the host. No scheduling happens here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::config::PlannerConfig;
use crate::models::{Category, CategoryTally, CompletedCourse, Schedule, Term, TermSlot, Year};

/// Credit progress toward the degree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProgress {
    /// Courses the program requires.
    pub courses_required: u32,
    /// Sum of earned units across completed courses.
    pub courses_completed: f64,
    /// `courses_required - courses_completed`. Negative once over-complete.
    pub courses_remaining: f64,
}

impl StudentProgress {
    /// Computes progress from the completed-course list.
    pub fn calculate(completed: &[CompletedCourse], courses_required: u32) -> Self {
        let courses_completed: f64 = completed.iter().map(|c| c.earned).sum();
        Self {
            courses_required,
            courses_completed,
            courses_remaining: f64::from(courses_required) - courses_completed,
        }
    }
}

/// Output of one planning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanReport {
    pub student_progress: StudentProgress,
    /// First term open for new courses.
    pub starting_term: TermSlot,
    pub recommended_schedule: Schedule,
    /// Requirements the planner could not place.
    pub unscheduled: Vec<String>,
    /// Advisory notes for the student.
    pub notes: Vec<String>,
    /// Planner diagnostics (cycle fallback, horizon exhaustion, oversize courses).
    pub diagnostics: Vec<String>,
    /// Canonical code → title for completed courses that carry one.
    #[serde(skip)]
    pub completed_titles: Vec<(String, String)>,
}

impl PlanReport {
    /// Whether every remaining requirement found a term.
    pub fn is_complete(&self) -> bool {
        self.unscheduled.is_empty()
    }

    /// Title of a completed course, by canonical code.
    pub fn title_of(&self, code: &str) -> Option<&str> {
        self.completed_titles
            .iter()
            .find(|(c, _)| c == code)
            .map(|(_, title)| title.as_str())
    }
}

/// Builds the advisory notes.
///
/// Gateway courses missing from `completed` (canonical codes the student
/// has already taken) are flagged first, even when the plan schedules them.
/// The breadth, theme and elective reminders follow, then any quota the
/// horizon could not absorb.
pub fn advisory_notes(
    config: &PlannerConfig,
    completed: &BTreeSet<String>,
    quotas: &CategoryTally,
    outstanding: &CategoryTally,
) -> Vec<String> {
    let mut notes = Vec::new();

    for gateway in &config.gateway_courses {
        if !completed.contains(gateway) {
            notes.push(format!(
                "Note: {gateway} is a prerequisite for many upper-level courses."
            ));
        }
    }

    notes.push(format!(
        "Complete all {} CS breadth courses to fulfill degree requirements.",
        quotas.get(Category::CsBreadth)
    ));
    notes.push(format!(
        "Theme courses ({} required) should form a coherent sequence in humanities/social sciences.",
        quotas.get(Category::Theme)
    ));
    notes.push(format!(
        "Choose {} technical electives based on your interests and career goals.",
        quotas.get(Category::TechnicalElective)
    ));

    for (category, remaining) in outstanding.iter() {
        notes.push(format!(
            "{remaining} {category} requirement(s) could not fit in the remaining terms."
        ));
    }

    notes
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl fmt::Display for PlanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "RECOMMENDED 4-YEAR SCHEDULE")?;
        writeln!(f, "===========================")?;
        writeln!(f, "Courses required: {}", self.student_progress.courses_required)?;
        writeln!(f, "Courses completed: {}", self.student_progress.courses_completed)?;
        writeln!(f, "Courses remaining: {}", self.student_progress.courses_remaining)?;
        writeln!(f)?;

        for year in Year::ALL {
            writeln!(f, "{}", year.as_str().to_uppercase())?;
            for term in Term::ALL {
                let courses = self.recommended_schedule.courses_in(TermSlot::new(year, term));
                let name = capitalize(term.as_str());
                if courses.is_empty() {
                    writeln!(f, "  {name}: No courses scheduled")?;
                    continue;
                }
                writeln!(f, "  {name}:")?;
                for course in courses {
                    let plural = if course.units > 1 { "s" } else { "" };
                    writeln!(f, "    - {} ({} unit{plural})", course.course, course.units)?;
                }
            }
            writeln!(f)?;
        }

        if !self.unscheduled.is_empty() {
            writeln!(f, "UNSCHEDULED:")?;
            for course in &self.unscheduled {
                writeln!(f, "- {course}")?;
            }
            writeln!(f)?;
        }

        writeln!(f, "NOTES:")?;
        for note in &self.notes {
            writeln!(f, "- {note}")?;
        }
        Ok(())
    }
}
