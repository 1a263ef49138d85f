//! Planner configuration.
//!
//! Everything the planner needs that is not part of a student's input:
//! the per-term unit cap, the program's course total, subject aliases,
//! and the prerequisite table.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::normalize::CodeNormalizer;

/// Maps a course to the courses that must precede it.
///
/// Any listed prerequisite that is still outstanding gates the course;
/// prerequisites already completed (or absent from the plan) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrerequisiteTable {
    entries: BTreeMap<String, Vec<String>>,
}

impl PrerequisiteTable {
    /// Creates an empty table.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Adds (or replaces) the prerequisites of one course.
    pub fn with(mut self, course: impl Into<String>, prerequisites: &[&str]) -> Self {
        self.entries.insert(
            course.into(),
            prerequisites.iter().map(|p| p.to_string()).collect(),
        );
        self
    }

    /// Prerequisites of `course`, empty if none are configured.
    pub fn prerequisites_of(&self, course: &str) -> &[String] {
        self.entries.get(course).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All `(course, prerequisites)` entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(course, prereqs)| (course.as_str(), prereqs.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PrerequisiteTable {
    /// The computer science core sequence.
    fn default() -> Self {
        Self::empty()
            .with("CS 211", &["CS 111", "CS 150", "CS 214"])
            .with("CS 212", &["CS 211"])
            .with("CS 213", &["CS 211"])
            .with("CS 214", &["CS 111", "CS 150"])
            .with("CS Breadth (1)", &["CS 211"])
            .with("CS Breadth (2)", &["CS 211"])
            .with("CS Breadth (3)", &["CS 211"])
            .with("CS Breadth (4)", &["CS 213", "CS 212"])
            .with("CS Breadth (5)", &["CS 213", "CS 212"])
            .with("Tech Elect (1)", &["CS 213", "CS 212"])
            .with("Project 1", &["CS Breadth (4)", "CS Breadth (3)"])
            .with("Project 2", &["Project 1"])
    }
}

/// Planner configuration.
///
/// # Example
///
/// ```
/// use u_curriculum::config::{PlannerConfig, PrerequisiteTable};
///
/// let config = PlannerConfig::default()
///     .with_max_units_per_term(5)
///     .with_prerequisites(PrerequisiteTable::empty().with("B 2", &["A 1"]));
/// assert_eq!(config.max_units_per_term, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Unit cap per term.
    pub max_units_per_term: u32,
    /// Courses required to graduate.
    pub total_required_courses: u32,
    /// Transcript subject → template subject.
    pub subject_aliases: BTreeMap<String, String>,
    /// Prerequisite table.
    pub prerequisites: PrerequisiteTable,
    /// Courses worth flagging in the notes while still outstanding.
    pub gateway_courses: Vec<String>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_units_per_term: 4,
            total_required_courses: 48,
            subject_aliases: BTreeMap::from([("COMP_SCI".to_string(), "CS".to_string())]),
            prerequisites: PrerequisiteTable::default(),
            gateway_courses: vec!["CS 211".to_string()],
        }
    }
}

impl PlannerConfig {
    /// Sets the per-term unit cap.
    pub fn with_max_units_per_term(mut self, units: u32) -> Self {
        self.max_units_per_term = units;
        self
    }

    /// Sets the program's total course count.
    pub fn with_total_required_courses(mut self, total: u32) -> Self {
        self.total_required_courses = total;
        self
    }

    /// Adds a subject alias.
    pub fn with_subject_alias(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.subject_aliases.insert(from.into(), to.into());
        self
    }

    /// Replaces the prerequisite table.
    pub fn with_prerequisites(mut self, prerequisites: PrerequisiteTable) -> Self {
        self.prerequisites = prerequisites;
        self
    }

    /// Replaces the gateway course list.
    pub fn with_gateway_courses(mut self, courses: Vec<String>) -> Self {
        self.gateway_courses = courses;
        self
    }

    /// Normalizer built from the alias table.
    pub fn normalizer(&self) -> CodeNormalizer {
        CodeNormalizer::from_aliases(&self.subject_aliases)
    }
}
