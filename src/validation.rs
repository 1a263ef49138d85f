//! Input validation for planning requests.
//!
//! Checks the raw JSON documents before they are deserialized, so that
//! every problem is reported at once with the path of the offending field.
//! Detects:
//! - Missing required keys
//! - Values of the wrong JSON type
//! - Year and term keys outside the fixed calendar
//! - Non-positive unit weights
//! - Empty course expressions

use serde_json::Value;
use thiserror::Error;

use crate::models::{Term, Year};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description, naming the field path.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A required key is absent.
    MissingField,
    /// A value has the wrong JSON type.
    InvalidType,
    /// A year key or tag is not one of the four class years.
    UnknownYear,
    /// A term key or tag is not fall, winter, or spring.
    UnknownTerm,
    /// A unit weight is zero, negative, or not an integer.
    InvalidUnits,
    /// A course expression is blank.
    EmptyCourse,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    fn missing(path: &str) -> Self {
        Self::new(
            ValidationErrorKind::MissingField,
            format!("Missing required field '{path}'"),
        )
    }

    fn invalid_type(path: &str, expected: &str) -> Self {
        Self::new(
            ValidationErrorKind::InvalidType,
            format!("Field '{path}' must be {expected}"),
        )
    }
}

/// Validates a requirement template document.
///
/// Checks:
/// 1. The document is an object with a `year_plan` object
/// 2. Every year key is a class year and maps to an object
/// 3. Every term key is a term and maps to an array of slots
/// 4. Every slot has a non-blank string `course`
/// 5. Every `units`, when present, is a positive integer
/// 6. `requirement_categories`, when present, is an object whose
///    `total_required` values (flat or one group deep) are non-negative integers
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_template(template: &Value) -> ValidationResult {
    let mut errors = Vec::new();

    let Some(root) = template.as_object() else {
        return Err(vec![ValidationError::invalid_type("<template>", "an object")]);
    };

    match root.get("year_plan") {
        None => errors.push(ValidationError::missing("year_plan")),
        Some(plan) => validate_year_plan(plan, &mut errors),
    }

    if let Some(categories) = root.get("requirement_categories") {
        validate_categories(categories, &mut errors);
    }

    finish(errors)
}

/// Each entry is either a quota object carrying `total_required`, or a
/// group of such objects one level down.
fn validate_categories(categories: &Value, errors: &mut Vec<ValidationError>) {
    let Some(categories) = categories.as_object() else {
        errors.push(ValidationError::invalid_type(
            "requirement_categories",
            "an object",
        ));
        return;
    };

    for (key, entry) in categories {
        let path = format!("requirement_categories.{key}");
        let Some(entry) = entry.as_object() else {
            errors.push(ValidationError::invalid_type(&path, "an object"));
            continue;
        };
        if entry.contains_key("total_required") {
            validate_total(entry, &path, errors);
            continue;
        }
        for (inner, quota) in entry {
            if let Some(quota) = quota.as_object() {
                validate_total(quota, &format!("{path}.{inner}"), errors);
            }
        }
    }
}

fn validate_total(
    quota: &serde_json::Map<String, Value>,
    path: &str,
    errors: &mut Vec<ValidationError>,
) {
    if let Some(total) = quota.get("total_required") {
        if !total.as_u64().is_some_and(|t| t <= u64::from(u32::MAX)) {
            errors.push(ValidationError::invalid_type(
                &format!("{path}.total_required"),
                "a non-negative integer",
            ));
        }
    }
}

fn validate_year_plan(plan: &Value, errors: &mut Vec<ValidationError>) {
    let Some(years) = plan.as_object() else {
        errors.push(ValidationError::invalid_type("year_plan", "an object"));
        return;
    };

    for (year_key, terms) in years {
        let year_path = format!("year_plan.{year_key}");
        if Year::parse(year_key).is_none() {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownYear,
                format!("Unknown year '{year_key}' at '{year_path}'"),
            ));
            continue;
        }
        let Some(terms) = terms.as_object() else {
            errors.push(ValidationError::invalid_type(&year_path, "an object"));
            continue;
        };

        for (term_key, slots) in terms {
            let term_path = format!("{year_path}.{term_key}");
            if Term::parse(term_key).is_none() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownTerm,
                    format!("Unknown term '{term_key}' at '{term_path}'"),
                ));
                continue;
            }
            let Some(slots) = slots.as_array() else {
                errors.push(ValidationError::invalid_type(&term_path, "an array"));
                continue;
            };
            for (i, slot) in slots.iter().enumerate() {
                validate_slot(slot, &format!("{term_path}[{i}]"), errors);
            }
        }
    }
}

fn validate_slot(slot: &Value, path: &str, errors: &mut Vec<ValidationError>) {
    let Some(slot) = slot.as_object() else {
        errors.push(ValidationError::invalid_type(path, "an object"));
        return;
    };

    match slot.get("course") {
        None => errors.push(ValidationError::missing(&format!("{path}.course"))),
        Some(Value::String(course)) if course.trim().is_empty() => {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyCourse,
                format!("Field '{path}.course' is blank"),
            ));
        }
        Some(Value::String(_)) => {}
        Some(_) => errors.push(ValidationError::invalid_type(
            &format!("{path}.course"),
            "a string",
        )),
    }

    if let Some(units) = slot.get("units") {
        if !units.as_u64().is_some_and(|u| u > 0 && u <= u64::from(u32::MAX)) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidUnits,
                format!("Field '{path}.units' must be a positive integer, got {units}"),
            ));
        }
    }
}

/// Validates a completed-course list document.
///
/// Checks:
/// 1. The document is an array of objects
/// 2. `subject`, `course_number` and `title` are present strings
/// 3. `earned` is present and a number
/// 4. `year` and `term`, when present, name a class year and a term
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_completed(completed: &Value) -> ValidationResult {
    let mut errors = Vec::new();

    let Some(courses) = completed.as_array() else {
        return Err(vec![ValidationError::invalid_type("<completed>", "an array")]);
    };

    for (i, course) in courses.iter().enumerate() {
        let path = format!("[{i}]");
        let Some(course) = course.as_object() else {
            errors.push(ValidationError::invalid_type(&path, "an object"));
            continue;
        };

        for key in ["subject", "course_number"] {
            match course.get(key) {
                None => errors.push(ValidationError::missing(&format!("{path}.{key}"))),
                Some(Value::String(_)) => {}
                Some(_) => errors.push(ValidationError::invalid_type(
                    &format!("{path}.{key}"),
                    "a string",
                )),
            }
        }

        match course.get("title") {
            None => errors.push(ValidationError::missing(&format!("{path}.title"))),
            Some(title) if !title.is_string() => {
                errors.push(ValidationError::invalid_type(&format!("{path}.title"), "a string"));
            }
            Some(_) => {}
        }

        match course.get("earned") {
            None => errors.push(ValidationError::missing(&format!("{path}.earned"))),
            Some(earned) if !earned.is_number() => {
                errors.push(ValidationError::invalid_type(&format!("{path}.earned"), "a number"));
            }
            Some(_) => {}
        }

        if let Some(year) = course.get("year") {
            if !year.as_str().is_some_and(|y| Year::parse(y).is_some()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownYear,
                    format!("Unknown year {year} at '{path}.year'"),
                ));
            }
        }

        if let Some(term) = course.get("term") {
            if !term.as_str().is_some_and(|t| Term::parse(t).is_some()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownTerm,
                    format!("Unknown term {term} at '{path}.term'"),
                ));
            }
        }
    }

    finish(errors)
}

fn finish(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
