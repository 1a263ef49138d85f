//! Degree-planning domain models.
//!
//! Provides the core data types for describing a degree program, a
//! student's transcript, and the resulting plan.
//!
//! # Domain Mappings
//!
//! | u-curriculum | Scheduling analogue |
//! |--------------|---------------------|
//! | RequirementTemplate | Job set with precedence |
//! | RequirementSlot | Operation |
//! | TermSlot | Time bucket |
//! | Schedule | Production plan |

mod category;
mod course;
mod schedule;
mod template;
mod term;

pub use category::{Category, CategoryTally};
pub use course::CompletedCourse;
pub use schedule::{Schedule, ScheduledCourse, OPEN_SLOT};
pub use template::{RequirementSlot, RequirementTemplate, YearPlan};
pub use term::{Term, TermSlot, Year};
