//! Degree planning pipeline.
//!
//! Turns a requirement template and a transcript into a term-by-term plan.
//!
//! # Stages
//!
//! | Stage | Module | Output |
//! |-------|--------|--------|
//! | Remaining requirements + graph | `requirements` | [`CourseGraph`](crate::graph::CourseGraph) |
//! | Position resolution | `position` | cursor [`TermSlot`](crate::models::TermSlot) |
//! | Ordering | `order` | [`CourseOrder`] |
//! | Term assignment | `assign` | [`TermAssignment`] |
//! | Quota backfill | `backfill` | [`Backfill`] |
//! | Report | `report` | [`PlanReport`] |
//!
//! [`DegreePlanner`] runs them in sequence. Term assignment is a greedy
//! heuristic: it never reorders across terms to improve packing.
//!
//! # References
//!
//! - Kahn (1962), "Topological sorting of large networks"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4

mod assign;
mod backfill;
mod order;
mod pipeline;
mod position;
mod report;
mod requirements;

pub use assign::{assign_terms, StopReason, TermAssignment};
pub use backfill::{backfill_quotas, Backfill};
pub use order::{order_courses, CourseOrder};
pub use pipeline::{DegreePlanner, PlanRequest};
pub use position::resolve_position;
pub use report::{advisory_notes, PlanReport, StudentProgress};
pub use requirements::{
    build_requirement_graph, remaining_requirements, IndexedSlot, RemainingRequirements,
    TemplateIndex,
};
