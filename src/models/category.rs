//! Requirement categories and their quotas.
//!
//! Open-ended requirements ("any three technical electives") appear in a
//! template as numbered placeholder slots such as `Tech Elect (2)`. Each
//! placeholder is tagged with its [`Category`] once, when the template is
//! indexed; from then on the tag travels with the course.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A quota-bearing requirement category.
///
/// Variant order is the backfill priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    CsBreadth,
    TechnicalElective,
    Theme,
    BasicEngineering,
    BasicScience,
    Project,
    Unrestricted,
}

impl Category {
    /// All categories in backfill priority order.
    pub const ALL: [Category; 7] = [
        Category::CsBreadth,
        Category::TechnicalElective,
        Category::Theme,
        Category::BasicEngineering,
        Category::BasicScience,
        Category::Project,
        Category::Unrestricted,
    ];

    /// Display label, also the prefix of placeholder course names.
    pub fn label(&self) -> &'static str {
        match self {
            Category::CsBreadth => "CS Breadth",
            Category::TechnicalElective => "Tech Elect",
            Category::Theme => "Theme",
            Category::BasicEngineering => "Basic Eng",
            Category::BasicScience => "Basic Science w/ Lab",
            Category::Project => "Project",
            Category::Unrestricted => "Unrestricted",
        }
    }

    /// Key of this category in a template's `requirement_categories` table.
    pub fn key(&self) -> &'static str {
        match self {
            Category::CsBreadth => "cs_breadth",
            Category::TechnicalElective => "technical_electives",
            Category::Theme => "theme_courses",
            Category::BasicEngineering => "basic_engineering",
            Category::BasicScience => "basic_sciences",
            Category::Project => "project_courses",
            Category::Unrestricted => "unrestricted_electives",
        }
    }

    /// Quota used when the template does not configure one.
    pub fn default_total(&self) -> u32 {
        match self {
            Category::CsBreadth => 5,
            Category::TechnicalElective => 3,
            Category::Theme => 7,
            Category::BasicEngineering => 5,
            Category::BasicScience => 4,
            Category::Project => 2,
            Category::Unrestricted => 5,
        }
    }

    /// Looks up a category by its `requirement_categories` key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }

    /// Classifies a template course string.
    ///
    /// Matches the short stem of each label (`Basic Science` rather than the
    /// full `Basic Science w/ Lab`) so abbreviated template entries still tag.
    pub fn classify(course: &str) -> Option<Self> {
        const STEMS: [(&str, Category); 7] = [
            ("CS Breadth", Category::CsBreadth),
            ("Tech Elect", Category::TechnicalElective),
            ("Theme", Category::Theme),
            ("Basic Eng", Category::BasicEngineering),
            ("Basic Science", Category::BasicScience),
            ("Project", Category::Project),
            ("Unrestricted", Category::Unrestricted),
        ];
        STEMS
            .iter()
            .find(|(stem, _)| course.contains(*stem))
            .map(|&(_, category)| category)
    }

    /// Name of the `index`-th placeholder in this category (1-based).
    pub fn placeholder(&self, index: u32) -> String {
        match self {
            Category::Project => format!("Project {index}"),
            other => format!("{} ({index})", other.label()),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-category counters.
///
/// Used both for configured quotas and for the number of placeholders
/// assigned so far. Categories never touched read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTally {
    counts: BTreeMap<Category, u32>,
}

impl CategoryTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quotas at their default totals.
    pub fn defaults() -> Self {
        let counts = Category::ALL
            .into_iter()
            .map(|c| (c, c.default_total()))
            .collect();
        Self { counts }
    }

    pub fn get(&self, category: Category) -> u32 {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    pub fn set(&mut self, category: Category, value: u32) {
        self.counts.insert(category, value);
    }

    /// Increments and returns the new count.
    pub fn increment(&mut self, category: Category) -> u32 {
        let entry = self.counts.entry(category).or_insert(0);
        *entry += 1;
        *entry
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    /// Non-zero entries in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, u32)> + '_ {
        self.counts
            .iter()
            .filter(|&(_, &n)| n > 0)
            .map(|(&c, &n)| (c, n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_placeholders() {
        assert_eq!(Category::classify("CS Breadth (3)"), Some(Category::CsBreadth));
        assert_eq!(Category::classify("Tech Elect (1)"), Some(Category::TechnicalElective));
        assert_eq!(Category::classify("Basic Science w/ Lab (2)"), Some(Category::BasicScience));
        assert_eq!(Category::classify("Project 2"), Some(Category::Project));
        assert_eq!(Category::classify("CS 211"), None);
    }

    #[test]
    fn test_placeholder_names() {
        assert_eq!(Category::Theme.placeholder(4), "Theme (4)");
        assert_eq!(Category::Project.placeholder(1), "Project 1");
        assert_eq!(Category::BasicScience.placeholder(1), "Basic Science w/ Lab (1)");
    }

    #[test]
    fn test_placeholder_classifies_back() {
        for category in Category::ALL {
            assert_eq!(Category::classify(&category.placeholder(1)), Some(category));
        }
    }

    #[test]
    fn test_key_lookup() {
        assert_eq!(Category::from_key("theme_courses"), Some(Category::Theme));
        assert_eq!(Category::from_key("study_abroad"), None);
    }

    #[test]
    fn test_tally() {
        let mut tally = CategoryTally::new();
        assert_eq!(tally.get(Category::Theme), 0);
        assert_eq!(tally.increment(Category::Theme), 1);
        assert_eq!(tally.increment(Category::Theme), 2);
        tally.set(Category::Project, 1);
        assert_eq!(tally.total(), 3);
        let entries: Vec<_> = tally.iter().collect();
        assert_eq!(entries, vec![(Category::Theme, 2), (Category::Project, 1)]);
    }

    #[test]
    fn test_default_quotas() {
        let quotas = CategoryTally::defaults();
        assert_eq!(quotas.get(Category::CsBreadth), 5);
        assert_eq!(quotas.get(Category::Theme), 7);
        assert_eq!(quotas.total(), 31);
    }
}
