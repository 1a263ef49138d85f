//! Degree requirement template.
//!
//! The canonical four-year plan: for every (year, term) an ordered list of
//! requirement slots, plus a table of category quotas.
//!
//! ```json
//! {
//!   "year_plan": {
//!     "freshman": { "fall": [{ "course": "CS 111 or 150", "units": 1 }] }
//!   },
//!   "requirement_categories": {
//!     "theme_courses": { "total_required": 7 }
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Category, CategoryTally, Term, TermSlot, Year};

const TOTAL_REQUIRED: &str = "total_required";

/// One requirement slot: a course expression and its unit weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementSlot {
    /// A canonical code, a placeholder name, or an `"A or B"` expression.
    pub course: String,
    /// Unit weight toward the per-term cap.
    #[serde(default = "default_units")]
    pub units: u32,
}

fn default_units() -> u32 {
    1
}

impl RequirementSlot {
    /// Creates a one-unit slot.
    pub fn new(course: impl Into<String>) -> Self {
        Self {
            course: course.into(),
            units: 1,
        }
    }

    /// Sets the unit weight.
    pub fn with_units(mut self, units: u32) -> Self {
        self.units = units;
        self
    }
}

/// Year → term → slots.
pub type YearPlan = BTreeMap<Year, BTreeMap<Term, Vec<RequirementSlot>>>;

/// A degree requirement template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementTemplate {
    pub year_plan: YearPlan,
    /// Category quota table. Entries are either `{ "total_required": n }`
    /// or a group object nesting such entries (e.g. `cs_requirements`).
    #[serde(default)]
    pub requirement_categories: BTreeMap<String, serde_json::Value>,
}

impl RequirementTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a slot to the given term.
    pub fn with_slot(mut self, year: Year, term: Term, slot: RequirementSlot) -> Self {
        self.year_plan
            .entry(year)
            .or_default()
            .entry(term)
            .or_default()
            .push(slot);
        self
    }

    /// Sets the quota for one category.
    pub fn with_category_total(mut self, category: Category, total: u32) -> Self {
        self.requirement_categories.insert(
            category.key().to_string(),
            serde_json::json!({ "total_required": total }),
        );
        self
    }

    /// All slots in chronological order, each with its term.
    pub fn slots(&self) -> impl Iterator<Item = (TermSlot, &RequirementSlot)> {
        self.year_plan.iter().flat_map(|(&year, terms)| {
            terms.iter().flat_map(move |(&term, slots)| {
                slots.iter().map(move |slot| (TermSlot::new(year, term), slot))
            })
        })
    }

    /// Number of slots across all terms.
    pub fn slot_count(&self) -> usize {
        self.slots().count()
    }

    /// Category quotas, falling back to defaults for unconfigured categories.
    pub fn category_totals(&self) -> CategoryTally {
        let mut totals = CategoryTally::defaults();
        for (key, value) in &self.requirement_categories {
            if value.get(TOTAL_REQUIRED).is_some() {
                apply_total(&mut totals, key, value);
            } else if let Some(group) = value.as_object() {
                for (nested_key, nested) in group {
                    apply_total(&mut totals, nested_key, nested);
                }
            }
        }
        totals
    }
}

fn apply_total(totals: &mut CategoryTally, key: &str, value: &serde_json::Value) {
    let Some(total) = value.get(TOTAL_REQUIRED).and_then(serde_json::Value::as_u64) else {
        return;
    };
    match Category::from_key(key) {
        Some(category) => totals.set(category, u32::try_from(total).unwrap_or(u32::MAX)),
        None => tracing::debug!(key, "ignoring unknown requirement category"),
    }
}
