//! Course code normalization.
//!
//! Transcripts and requirement templates spell the same course differently:
//! `COMP_SCI 211-0` on a transcript is `CS 211` in the template. The
//! normalizer maps both onto one canonical `"<SUBJECT> <NUMBER>"` form and
//! expands alternative expressions such as `"CS 214 or 211"`.

use std::collections::BTreeMap;

const SECTION_SUFFIX: &str = "-0";
const ALTERNATIVE_SEPARATOR: &str = " or ";

/// Canonicalizes subject/number pairs into template course codes.
///
/// # Example
///
/// ```
/// use u_curriculum::normalize::CodeNormalizer;
///
/// let normalizer = CodeNormalizer::new().with_alias("COMP_SCI", "CS");
/// assert_eq!(normalizer.normalize("COMP_SCI", "211-0"), "CS 211");
/// assert_eq!(normalizer.alternatives("CS 214 or 211"), vec!["CS 214", "CS 211"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CodeNormalizer {
    aliases: BTreeMap<String, String>,
}

impl CodeNormalizer {
    /// Creates a normalizer with no subject aliases.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a normalizer from an alias table.
    pub fn from_aliases(aliases: &BTreeMap<String, String>) -> Self {
        Self {
            aliases: aliases.clone(),
        }
    }

    /// Adds a subject alias (`from` is rewritten to `to`).
    pub fn with_alias(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.aliases.insert(from.into(), to.into());
        self
    }

    /// Canonical code for a transcript `(subject, number)` pair.
    pub fn normalize(&self, subject: &str, number: &str) -> String {
        let subject = subject.trim();
        let number = number.trim();
        let number = number.strip_suffix(SECTION_SUFFIX).unwrap_or(number);
        let subject = self.aliases.get(subject).map(String::as_str).unwrap_or(subject);
        format!("{subject} {number}")
    }

    /// Canonical form of an already-joined code such as `"COMP_SCI 211"`.
    ///
    /// Canonical codes come back unchanged. Strings without a subject/number
    /// split are returned trimmed.
    pub fn normalize_code(&self, code: &str) -> String {
        let code = code.trim();
        match code.split_once(char::is_whitespace) {
            Some((subject, number)) => self.normalize(subject, number),
            None => code.to_string(),
        }
    }

    /// Expands an alternative expression into canonical codes, in order.
    ///
    /// A branch that is only a number (`"CS 214 or 211"`) inherits the
    /// subject of the branch before it. A plain code yields one element.
    pub fn alternatives(&self, expression: &str) -> Vec<String> {
        let mut result: Vec<String> = Vec::new();
        let mut previous_subject: Option<String> = None;

        for part in expression.split(ALTERNATIVE_SEPARATOR) {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            let code = match (&previous_subject, part.contains(' ')) {
                (Some(subject), false) => format!("{subject} {part}"),
                _ => part.to_string(),
            };
            if let Some((subject, _)) = code.split_once(' ') {
                previous_subject = Some(subject.to_string());
            }
            let code = self.normalize_code(&code);
            if !result.contains(&code) {
                result.push(code);
            }
        }

        result
    }

    /// Whether the expression lists more than one course.
    pub fn is_alternative(expression: &str) -> bool {
        expression.contains(ALTERNATIVE_SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> CodeNormalizer {
        CodeNormalizer::new().with_alias("COMP_SCI", "CS")
    }

    #[test]
    fn test_strips_section_suffix() {
        let n = normalizer();
        assert_eq!(n.normalize("CS", "211-0"), "CS 211");
        assert_eq!(n.normalize("ENGL", "106-1"), "ENGL 106-1");
    }

    #[test]
    fn test_applies_subject_alias() {
        let n = normalizer();
        assert_eq!(n.normalize("COMP_SCI", "213-0"), "CS 213");
        assert_eq!(n.normalize("MATH", "220"), "MATH 220");
    }

    #[test]
    fn test_normalize_code_is_idempotent() {
        let n = normalizer();
        for code in ["CS 211", "COMP_SCI 211-0", "CS Breadth (2)", "Project 1", "Open Slot"] {
            let once = n.normalize_code(code);
            assert_eq!(n.normalize_code(&once), once);
        }
        assert_eq!(n.normalize_code("CS 211"), "CS 211");
        assert_eq!(n.normalize_code("CS Breadth (2)"), "CS Breadth (2)");
    }

    #[test]
    fn test_alternatives_inherit_subject() {
        let n = normalizer();
        assert_eq!(n.alternatives("CS 214 or 211"), vec!["CS 214", "CS 211"]);
        assert_eq!(n.alternatives("CS 111 or 150 or 110"), vec!["CS 111", "CS 150", "CS 110"]);
    }

    #[test]
    fn test_alternatives_with_full_codes() {
        let n = normalizer();
        assert_eq!(n.alternatives("MATH 228-1 or CS 212"), vec!["MATH 228-1", "CS 212"]);
        assert_eq!(n.alternatives("COMP_SCI 111 or 150"), vec!["CS 111", "CS 150"]);
    }

    #[test]
    fn test_single_course_is_one_alternative() {
        let n = normalizer();
        assert_eq!(n.alternatives("CS 211"), vec!["CS 211"]);
        assert!(!CodeNormalizer::is_alternative("CS 211"));
        assert!(CodeNormalizer::is_alternative("CS 214 or 211"));
    }
}
