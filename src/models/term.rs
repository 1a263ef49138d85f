//! Academic calendar positions.
//!
//! A degree runs over four class years of three terms each. Every
//! (year, term) pair maps onto one of 12 totally ordered buckets; the
//! planner's cursor and every schedule key are expressed in these terms.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Class year, in program order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Year {
    Freshman,
    Sophomore,
    Junior,
    Senior,
}

/// Academic term within a year, in calendar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Term {
    Fall,
    Winter,
    Spring,
}

impl Year {
    /// All years in program order.
    pub const ALL: [Year; 4] = [Year::Freshman, Year::Sophomore, Year::Junior, Year::Senior];

    /// Parses a year name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "freshman" => Some(Year::Freshman),
            "sophomore" => Some(Year::Sophomore),
            "junior" => Some(Year::Junior),
            "senior" => Some(Year::Senior),
            _ => None,
        }
    }

    /// Lowercase name as used in JSON documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Year::Freshman => "freshman",
            Year::Sophomore => "sophomore",
            Year::Junior => "junior",
            Year::Senior => "senior",
        }
    }

    fn index(self) -> u8 {
        self as u8
    }

    fn next(self) -> Option<Self> {
        match self {
            Year::Freshman => Some(Year::Sophomore),
            Year::Sophomore => Some(Year::Junior),
            Year::Junior => Some(Year::Senior),
            Year::Senior => None,
        }
    }
}

impl Term {
    /// All terms in calendar order.
    pub const ALL: [Term; 3] = [Term::Fall, Term::Winter, Term::Spring];

    /// Parses a term name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fall" => Some(Term::Fall),
            "winter" => Some(Term::Winter),
            "spring" => Some(Term::Spring),
            _ => None,
        }
    }

    /// Lowercase name as used in JSON documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Term::Fall => "fall",
            Term::Winter => "winter",
            Term::Spring => "spring",
        }
    }

    fn index(self) -> u8 {
        self as u8
    }
}

impl TryFrom<String> for Year {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("unknown year '{value}'"))
    }
}

impl TryFrom<String> for Term {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("unknown term '{value}'"))
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A (year, term) position on the program timeline.
///
/// Ordering is chronological: fall < winter < spring within a year,
/// and every term of an earlier year precedes every term of a later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TermSlot {
    pub year: Year,
    pub term: Term,
}

impl TermSlot {
    /// First term of the program.
    pub const FIRST: TermSlot = TermSlot::new(Year::Freshman, Term::Fall);
    /// Last term of the program. Advancing from here is not possible.
    pub const LAST: TermSlot = TermSlot::new(Year::Senior, Term::Spring);

    pub const fn new(year: Year, term: Term) -> Self {
        Self { year, term }
    }

    /// Total order value in `1..=12`.
    pub fn ordinal(&self) -> u8 {
        self.year.index() * 3 + self.term.index() + 1
    }

    /// The following term, or `None` past senior spring.
    pub fn next(&self) -> Option<Self> {
        match self.term {
            Term::Fall => Some(Self::new(self.year, Term::Winter)),
            Term::Winter => Some(Self::new(self.year, Term::Spring)),
            Term::Spring => self.year.next().map(|y| Self::new(y, Term::Fall)),
        }
    }

    /// The following term, saturating at senior spring.
    pub fn advance(&self) -> Self {
        self.next().unwrap_or(*self)
    }

    /// All twelve terms in chronological order.
    pub fn all() -> impl Iterator<Item = TermSlot> {
        Year::ALL
            .into_iter()
            .flat_map(|y| Term::ALL.into_iter().map(move |t| TermSlot::new(y, t)))
    }

    /// Terms from `self` through senior spring, inclusive.
    pub fn horizon(&self) -> impl Iterator<Item = TermSlot> {
        let start = *self;
        Self::all().filter(move |slot| *slot >= start)
    }
}

impl fmt::Display for TermSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.year, self.term)
    }
}
