//! Degree planning for the U-Engine ecosystem.
//!
//! Takes a degree requirement template and a student's completed courses
//! and produces a forward-looking, term-by-term plan that respects
//! prerequisites, a per-term unit cap and category quotas.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `RequirementTemplate`, `CompletedCourse`,
//!   `TermSlot`, `Category`, `Schedule`
//! - **`normalize`**: Canonical course codes and `"A or B"` expressions
//! - **`graph`**: Course dependency graph with deterministic topological order
//! - **`planner`**: The planning pipeline and its `DegreePlanner` entry point
//! - **`config`**: Unit cap, aliases, prerequisite table
//! - **`validation`**: Input integrity checks on raw JSON documents
//! - **`error`**: `PlannerError`
//!
//! # Architecture
//!
//! Every stage is a pure function of its inputs. There is no I/O and no
//! state shared between runs; hosts load the JSON documents and call
//! [`DegreePlanner::plan_json`](planner::DegreePlanner::plan_json).
//! Progress is logged through `tracing`; the host installs the subscriber.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Kahn (1962), "Topological sorting of large networks", CACM 5(11)

pub mod config;
pub mod error;
pub mod graph;
pub mod models;
pub mod normalize;
pub mod planner;
pub mod validation;

pub use config::PlannerConfig;
pub use error::PlannerError;
pub use planner::{DegreePlanner, PlanReport, PlanRequest};
