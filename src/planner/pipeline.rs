//! Degree planner orchestration.
//!
//! Threads one request through every stage. Each stage is a pure function
//! returning a fresh value; nothing is shared between runs.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

use super::assign::{assign_terms, StopReason, TermAssignment};
use super::backfill::backfill_quotas;
use super::order::{order_courses, CourseOrder};
use super::position::resolve_position;
use super::report::{advisory_notes, PlanReport, StudentProgress};
use super::requirements::{build_requirement_graph, remaining_requirements, TemplateIndex};
use crate::config::PlannerConfig;
use crate::error::PlannerError;
use crate::models::{CompletedCourse, RequirementTemplate};
use crate::validation::{validate_completed, validate_template};

/// Input container for one planning run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    /// The degree's canonical term-by-term plan.
    pub template: RequirementTemplate,
    /// The student's completed courses.
    #[serde(default)]
    pub completed: Vec<CompletedCourse>,
}

impl PlanRequest {
    /// Creates a request.
    pub fn new(template: RequirementTemplate, completed: Vec<CompletedCourse>) -> Self {
        Self {
            template,
            completed,
        }
    }

    /// Parses and validates both JSON documents.
    ///
    /// # Errors
    /// [`PlannerError::Json`] if either document is not JSON or does not
    /// deserialize; [`PlannerError::Validation`] with every problem found in
    /// both documents otherwise.
    pub fn from_json(template: &str, completed: &str) -> Result<Self, PlannerError> {
        let template: Value = serde_json::from_str(template)?;
        let completed: Value = serde_json::from_str(completed)?;

        let mut errors = Vec::new();
        if let Err(mut found) = validate_template(&template) {
            errors.append(&mut found);
        }
        if let Err(mut found) = validate_completed(&completed) {
            errors.append(&mut found);
        }
        if !errors.is_empty() {
            return Err(PlannerError::Validation(errors));
        }

        Ok(Self {
            template: serde_json::from_value(template)?,
            completed: serde_json::from_value(completed)?,
        })
    }
}

/// Degree planner.
///
/// # Example
///
/// ```
/// use u_curriculum::models::{CompletedCourse, RequirementSlot, RequirementTemplate, Term, Year};
/// use u_curriculum::planner::DegreePlanner;
///
/// let template = RequirementTemplate::new()
///     .with_slot(Year::Freshman, Term::Fall, RequirementSlot::new("CS 111 or 150"))
///     .with_slot(Year::Freshman, Term::Winter, RequirementSlot::new("CS 211"));
/// let completed = vec![CompletedCourse::new("COMP_SCI", "111-0")];
///
/// let report = DegreePlanner::new().plan(&template, &completed);
/// assert!(report.recommended_schedule.contains("CS 211"));
/// assert!(!report.recommended_schedule.contains("CS 150"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DegreePlanner {
    config: PlannerConfig,
}

impl DegreePlanner {
    /// Creates a planner with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: PlannerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plans the remaining terms for a student.
    ///
    /// # Algorithm
    /// 1. Normalize completed courses and apply them to the template.
    /// 2. Build the requirement graph over what remains.
    /// 3. Resolve the cursor.
    /// 4. Order the remaining courses (template order on a cycle).
    /// 5. Pack them into terms from the cursor.
    /// 6. Backfill category quotas into free capacity.
    /// 7. Compile the report.
    pub fn plan(&self, template: &RequirementTemplate, completed: &[CompletedCourse]) -> PlanReport {
        let normalizer = self.config.normalizer();
        let max_units = self.config.max_units_per_term;

        let codes: Vec<String> = completed.iter().map(|c| c.code(&normalizer)).collect();
        let taken: BTreeSet<String> = codes.iter().cloned().collect();
        let index = TemplateIndex::build(template, &normalizer);
        let remaining = remaining_requirements(&index, &codes);
        let graph = build_requirement_graph(&index, &remaining, &self.config.prerequisites);

        let start = resolve_position(completed, &index, &remaining.satisfied);
        tracing::debug!(
            cursor = %start,
            open_slots = remaining.open_slots.len(),
            "resolved student position"
        );

        let order = order_courses(&graph);
        let assignment = assign_terms(&order, &graph, &taken, start, max_units);

        let quotas = template.category_totals();
        let backfill = backfill_quotas(
            assignment.schedule.clone(),
            &assignment.assigned,
            &quotas,
            start,
            max_units,
        );

        let completed_titles = completed
            .iter()
            .zip(&codes)
            .filter(|(course, _)| !course.title.is_empty())
            .map(|(course, code)| (code.clone(), course.title.clone()))
            .collect();

        PlanReport {
            student_progress: StudentProgress::calculate(
                completed,
                self.config.total_required_courses,
            ),
            starting_term: start,
            notes: advisory_notes(&self.config, &taken, &quotas, &backfill.outstanding),
            diagnostics: diagnostics(&order, &assignment, max_units),
            recommended_schedule: backfill.schedule,
            unscheduled: assignment.unscheduled,
            completed_titles,
        }
    }

    /// Plans a prepared request.
    pub fn plan_request(&self, request: &PlanRequest) -> PlanReport {
        self.plan(&request.template, &request.completed)
    }

    /// Validates, parses and plans from raw JSON documents.
    ///
    /// # Errors
    /// See [`PlanRequest::from_json`].
    pub fn plan_json(&self, template: &str, completed: &str) -> Result<PlanReport, PlannerError> {
        let request = PlanRequest::from_json(template, completed)?;
        Ok(self.plan_request(&request))
    }
}

fn diagnostics(order: &CourseOrder, assignment: &TermAssignment, max_units: u32) -> Vec<String> {
    let mut out = Vec::new();

    if let Some(cycle) = &order.cycle {
        out.push(format!("{cycle}; scheduled in template order"));
    }

    for code in &assignment.oversized {
        out.push(format!("{code} exceeds the per-term cap of {max_units} units"));
    }

    let open = &assignment.unscheduled;
    match assignment.stop {
        StopReason::Blocked => out.push(format!(
            "{} requirement(s) blocked on unsatisfiable prerequisites: {}",
            open.len(),
            open.join("; ")
        )),
        StopReason::HorizonExhausted => out.push(format!(
            "schedule horizon exhausted with {} requirement(s) unplaced: {}",
            open.len(),
            open.join("; ")
        )),
        StopReason::Completed => {}
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PrerequisiteTable;
    use crate::models::{Category, RequirementSlot, Term, TermSlot, Year};
    use serde_json::json;

    fn slot(course: &str) -> RequirementSlot {
        RequirementSlot::new(course)
    }

    /// Template with every category quota set to zero.
    fn bare(template: RequirementTemplate) -> RequirementTemplate {
        Category::ALL
            .into_iter()
            .fold(template, |t, category| t.with_category_total(category, 0))
    }

    fn planner(prerequisites: PrerequisiteTable) -> DegreePlanner {
        DegreePlanner::new().with_config(PlannerConfig::default().with_prerequisites(prerequisites))
    }

    fn cs_template() -> RequirementTemplate {
        RequirementTemplate::new()
            .with_slot(Year::Freshman, Term::Fall, slot("CS 111 or 150"))
            .with_slot(Year::Freshman, Term::Fall, slot("MATH 220-1"))
            .with_slot(Year::Freshman, Term::Winter, slot("CS 214 or 211"))
            .with_slot(Year::Freshman, Term::Winter, slot("MATH 220-2"))
            .with_slot(Year::Freshman, Term::Spring, slot("CS 212"))
            .with_slot(Year::Sophomore, Term::Fall, slot("CS 213"))
            .with_slot(Year::Sophomore, Term::Fall, slot("CS Breadth (1)"))
            .with_slot(Year::Sophomore, Term::Winter, slot("Theme (1)"))
            .with_slot(Year::Junior, Term::Fall, slot("Tech Elect (1)"))
            .with_slot(Year::Senior, Term::Spring, slot("Project 1"))
    }

    #[test]
    fn test_prerequisite_order_within_first_term() {
        let template = bare(
            RequirementTemplate::new()
                .with_slot(Year::Freshman, Term::Fall, slot("CS 212"))
                .with_slot(Year::Freshman, Term::Fall, slot("CS 211"))
                .with_slot(Year::Freshman, Term::Winter, slot("CS 213")),
        );
        let report = planner(PrerequisiteTable::empty().with("CS 212", &["CS 211"]))
            .plan(&template, &[]);

        let fall: Vec<&str> = report
            .recommended_schedule
            .courses_in(TermSlot::FIRST)
            .iter()
            .map(|c| c.course.as_str())
            .collect();
        assert_eq!(fall[..3], ["CS 211", "CS 212", "CS 213"]);
        assert!(report.unscheduled.is_empty());
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_one_branch_removes_alternative_set() {
        let completed = vec![CompletedCourse::new("COMP_SCI", "211-0")];
        let report = DegreePlanner::new().plan(&cs_template(), &completed);

        let schedule = &report.recommended_schedule;
        assert!(!schedule.contains("CS 211"));
        assert!(!schedule.contains("CS 214"));
        assert!(schedule.contains("CS 212"));
        assert!(!report.notes.iter().any(|n| n.contains("CS 211 is a prerequisite")));
    }

    #[test]
    fn test_cycle_still_produces_plan() {
        // Template says CS 211 then CS 212; the table says the reverse
        let template = bare(
            RequirementTemplate::new()
                .with_slot(Year::Freshman, Term::Fall, slot("CS 211"))
                .with_slot(Year::Freshman, Term::Winter, slot("CS 212")),
        );
        let report = planner(PrerequisiteTable::empty().with("CS 211", &["CS 212"]))
            .plan(&template, &[]);

        assert_eq!(report.diagnostics.len(), 1);
        assert!(report.diagnostics[0].contains("circular dependency"));
        let schedule = &report.recommended_schedule;
        assert_eq!(schedule.term_of("CS 211"), Some(TermSlot::FIRST));
        assert_eq!(schedule.term_of("CS 212"), Some(TermSlot::FIRST));
        let fall = schedule.courses_in(TermSlot::FIRST);
        assert_eq!(fall[0].course, "CS 211");
        assert_eq!(fall[1].course, "CS 212");
    }

    #[test]
    fn test_met_quotas_backfill_only_open_slots() {
        let template = RequirementTemplate::new()
            .with_slot(Year::Freshman, Term::Fall, slot("Theme (1)"))
            .with_slot(Year::Freshman, Term::Fall, slot("Theme (2)"))
            .with_slot(Year::Freshman, Term::Winter, slot("CS Breadth (1)"));
        let template = bare(template)
            .with_category_total(Category::Theme, 2)
            .with_category_total(Category::CsBreadth, 1);

        let report = planner(PrerequisiteTable::empty()).plan(&template, &[]);
        let schedule = &report.recommended_schedule;

        assert_eq!(schedule.placeholders_of(Category::Theme), 2);
        assert_eq!(schedule.placeholders_of(Category::CsBreadth), 1);
        let extra_placeholders = schedule
            .iter()
            .filter(|(_, c)| !c.is_open_slot())
            .count();
        assert_eq!(extra_placeholders, 3);
    }

    #[test]
    fn test_every_term_within_cap() {
        let report = DegreePlanner::new().plan(&cs_template(), &[]);
        for term in report.recommended_schedule.term_slots() {
            assert!(report.recommended_schedule.units_in(term) <= 4, "{term}");
        }
        // Fresh student fills the whole horizon
        assert_eq!(report.recommended_schedule.units_in(TermSlot::LAST), 4);
    }

    #[test]
    fn test_identical_input_gives_identical_output() {
        let completed = vec![
            CompletedCourse::new("COMP_SCI", "111-0").taken_in(Year::Freshman, Term::Fall),
            CompletedCourse::new("MATH", "220-1").taken_in(Year::Freshman, Term::Fall),
        ];
        let planner = DegreePlanner::new();
        let first = serde_json::to_string(&planner.plan(&cs_template(), &completed)).unwrap();
        let second = serde_json::to_string(&planner.plan(&cs_template(), &completed)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_tagged_courses_set_cursor() {
        let completed = vec![
            CompletedCourse::new("CS", "111").taken_in(Year::Freshman, Term::Fall),
            CompletedCourse::new("MATH", "220-1").taken_in(Year::Freshman, Term::Fall),
        ];
        let report = DegreePlanner::new().plan(&cs_template(), &completed);

        let cursor = TermSlot::new(Year::Freshman, Term::Winter);
        assert_eq!(report.starting_term, cursor);
        assert_eq!(report.recommended_schedule.units_in(TermSlot::FIRST), 0);
        assert!(report.recommended_schedule.term_of("CS 212").unwrap() >= cursor);
    }

    #[test]
    fn test_horizon_exhaustion_is_reported() {
        let mut template = RequirementTemplate::new();
        for i in 0..6 {
            template = template.with_slot(Year::Senior, Term::Spring, slot(&format!("CS {}", 300 + i)));
        }
        let completed = vec![CompletedCourse::new("CS", "111").taken_in(Year::Senior, Term::Winter)];
        let report = planner(PrerequisiteTable::empty()).plan(&bare(template), &completed);

        assert_eq!(report.unscheduled, vec!["CS 304", "CS 305"]);
        assert!(!report.is_complete());
        assert!(report.diagnostics[0].starts_with("schedule horizon exhausted with 2 requirement(s)"));
    }

    #[test]
    fn test_progress_and_titles() {
        let completed = vec![
            CompletedCourse::new("COMP_SCI", "111-0").with_title("Fundamentals I"),
            CompletedCourse::new("MATH", "220-1").with_earned(1.0),
        ];
        let report = DegreePlanner::new().plan(&cs_template(), &completed);
        assert_eq!(report.student_progress.courses_required, 48);
        assert!((report.student_progress.courses_remaining - 46.0).abs() < 1e-10);
        assert_eq!(report.title_of("CS 111"), Some("Fundamentals I"));
    }

    #[test]
    fn test_plan_json_round_trip() {
        let template = json!({
            "year_plan": {
                "freshman": { "fall": [{ "course": "CS 111 or 150", "units": 1 }] },
                "Sophomore": { "Winter": [{ "course": "CS 211" }] }
            },
            "requirement_categories": { "theme_courses": { "total_required": 0 } }
        });
        let completed = json!([
            { "subject": "COMP_SCI", "course_number": "150-0", "title": "Intro", "earned": 1 }
        ]);

        let report = DegreePlanner::new()
            .plan_json(&template.to_string(), &completed.to_string())
            .unwrap();
        assert!(report.recommended_schedule.contains("CS 211"));
        assert!(!report.recommended_schedule.contains("CS 111"));
        // Untagged: cursor follows the satisfied freshman fall slot
        assert_eq!(report.starting_term, TermSlot::new(Year::Freshman, Term::Winter));
    }

    #[test]
    fn test_plan_json_reports_every_validation_error() {
        let template = json!({ "year_plan": { "freshman": { "autumn": [] } } });
        let completed = json!([{ "subject": "CS" }]);

        let err = DegreePlanner::new()
            .plan_json(&template.to_string(), &completed.to_string())
            .unwrap_err();
        assert!(err.validation_errors().len() >= 2);
        assert!(err.to_string().starts_with("invalid input:"));
    }

    #[test]
    fn test_scheduled_gateway_course_is_still_flagged() {
        let template = RequirementTemplate::new()
            .with_slot(Year::Freshman, Term::Fall, slot("CS 111"))
            .with_slot(Year::Freshman, Term::Winter, slot("CS 211"));
        let report = DegreePlanner::new().plan(&template, &[]);

        assert!(report.recommended_schedule.contains("CS 211"));
        assert_eq!(
            report.notes[0],
            "Note: CS 211 is a prerequisite for many upper-level courses."
        );
    }

    #[test]
    fn test_code_shared_by_two_slots_is_scheduled_twice() {
        let template = bare(
            RequirementTemplate::new()
                .with_slot(Year::Freshman, Term::Fall, slot("CS 214 or 211"))
                .with_slot(Year::Freshman, Term::Spring, slot("CS 211")),
        );
        let report = planner(PrerequisiteTable::empty()).plan(&template, &[]);

        let placed: Vec<&str> = report
            .recommended_schedule
            .iter()
            .filter(|(_, c)| !c.is_open_slot())
            .map(|(_, c)| c.course.as_str())
            .collect();
        assert_eq!(placed, vec!["CS 214", "CS 211"]);
        assert!(report.unscheduled.is_empty());
    }

    #[test]
    fn test_sibling_of_completed_branch_fills_later_slot() {
        let template = bare(
            RequirementTemplate::new()
                .with_slot(Year::Freshman, Term::Fall, slot("CS 214 or 211"))
                .with_slot(Year::Freshman, Term::Spring, slot("CS 211")),
        );
        let completed = vec![CompletedCourse::new("CS", "214").taken_in(Year::Freshman, Term::Fall)];
        let report = planner(PrerequisiteTable::empty()).plan(&template, &completed);

        assert_eq!(
            report.recommended_schedule.term_of("CS 211"),
            Some(TermSlot::new(Year::Freshman, Term::Winter))
        );
    }

    #[test]
    fn test_plan_json_requires_title_and_earned() {
        let template = json!({ "year_plan": { "freshman": { "fall": [{ "course": "CS 111" }] } } });
        let completed = json!([{ "subject": "CS", "course_number": "111-0" }]);

        let err = DegreePlanner::new()
            .plan_json(&template.to_string(), &completed.to_string())
            .unwrap_err();
        let messages: Vec<&str> = err.validation_errors().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages.len(), 2);
        assert!(messages.iter().any(|m| m.contains("[0].title")));
        assert!(messages.iter().any(|m| m.contains("[0].earned")));
    }

    #[test]
    fn test_plan_json_rejects_non_integer_quota() {
        let template = json!({
            "year_plan": {},
            "requirement_categories": {
                "theme_courses": { "total_required": "5" },
                "cs_requirements": { "cs_breadth": { "total_required": 2.5 } }
            }
        });
        let err = DegreePlanner::new()
            .plan_json(&template.to_string(), "[]")
            .unwrap_err();
        assert_eq!(err.validation_errors().len(), 2);
    }

    #[test]
    fn test_plan_json_rejects_malformed_json() {
        let err = DegreePlanner::new().plan_json("{", "[]").unwrap_err();
        assert!(matches!(err, PlannerError::Json(_)));
    }
}
