//! Remaining requirements and the requirement graph.
//!
//! # Algorithm
//!
//! 1. Index the template: one entry per slot, each alternative expanded to
//!    canonical codes, each code given its first-appearance position.
//! 2. Walk the completed courses in order; each consumes the first
//!    still-open slot it satisfies. The consumed slot's alternatives all
//!    count as satisfied.
//! 3. Build the graph over every code of every open slot, with
//!    prerequisite edges from the configured table and term-ordering edges
//!    from template position. Satisfaction is per slot: a code listed in an
//!    open slot gets a node there even if it also closed an earlier slot,
//!    and a code listed in several open slots gets one node per slot.
//!
//! Term-ordering edges are skipped between two category placeholders:
//! electives are interchangeable and must not be ordered against each other.

use std::collections::{BTreeSet, HashMap};

use crate::config::PrerequisiteTable;
use crate::graph::{CourseGraph, CourseNode};
use crate::models::{Category, RequirementTemplate, TermSlot};
use crate::normalize::CodeNormalizer;

/// A template slot with its alternatives resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedSlot {
    /// Term the template lists the slot in.
    pub term: TermSlot,
    /// The slot's course expression as written.
    pub expression: String,
    /// Canonical codes that satisfy the slot, in listed order.
    pub alternatives: Vec<String>,
    /// Unit weight.
    pub units: u32,
    /// Category tag, for placeholder slots.
    pub category: Option<Category>,
}

/// Linear view of a requirement template.
///
/// Slot order is chronological, then listed order within a term. Code
/// positions (the scheduling tie-break key) follow the same order.
#[derive(Debug, Clone, Default)]
pub struct TemplateIndex {
    slots: Vec<IndexedSlot>,
    positions: HashMap<String, usize>,
}

impl TemplateIndex {
    /// Indexes a template.
    pub fn build(template: &RequirementTemplate, normalizer: &CodeNormalizer) -> Self {
        let mut index = Self::default();
        for (term, slot) in template.slots() {
            let alternatives = normalizer.alternatives(&slot.course);
            for code in &alternatives {
                let next = index.positions.len();
                index.positions.entry(code.clone()).or_insert(next);
            }
            index.slots.push(IndexedSlot {
                term,
                expression: slot.course.clone(),
                category: Category::classify(&slot.course),
                alternatives,
                units: slot.units,
            });
        }
        index
    }

    /// Slots in template order.
    pub fn slots(&self) -> &[IndexedSlot] {
        &self.slots
    }

    /// First-appearance position of a code.
    pub fn position(&self, code: &str) -> Option<usize> {
        self.positions.get(code).copied()
    }

    /// Every distinct code, in position order.
    pub fn linear_order(&self) -> Vec<&str> {
        let mut codes: Vec<(&str, usize)> = self
            .positions
            .iter()
            .map(|(code, &pos)| (code.as_str(), pos))
            .collect();
        codes.sort_by_key(|&(_, pos)| pos);
        codes.into_iter().map(|(code, _)| code).collect()
    }

    /// Index of the first slot in `open` that `code` satisfies.
    fn first_open_slot(&self, code: &str, open: &[bool]) -> Option<usize> {
        self.slots
            .iter()
            .enumerate()
            .find(|(i, slot)| open[*i] && slot.alternatives.iter().any(|alt| alt == code))
            .map(|(i, _)| i)
    }
}

/// What is left of the template after completed courses are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemainingRequirements {
    /// Indices (into [`TemplateIndex::slots`]) of slots still open.
    pub open_slots: Vec<usize>,
    /// Indices of slots satisfied by completed courses.
    pub satisfied_slots: Vec<usize>,
    /// Codes already satisfied: every completed code, plus every
    /// alternative of a consumed slot.
    pub satisfied: BTreeSet<String>,
}

/// Applies completed courses to the template.
///
/// Each completed code consumes at most one slot, the first open one (in
/// template order) that lists it. Re-running with the same codes gives the
/// same result.
pub fn remaining_requirements(index: &TemplateIndex, completed: &[String]) -> RemainingRequirements {
    let mut open = vec![true; index.slots().len()];
    let mut satisfied: BTreeSet<String> = BTreeSet::new();

    for code in completed {
        satisfied.insert(code.clone());
        if let Some(slot) = index.first_open_slot(code, &open) {
            open[slot] = false;
            satisfied.extend(index.slots()[slot].alternatives.iter().cloned());
        }
    }

    let (open_slots, satisfied_slots): (Vec<usize>, Vec<usize>) =
        (0..open.len()).partition(|&i| open[i]);

    RemainingRequirements {
        open_slots,
        satisfied_slots,
        satisfied,
    }
}

/// Builds the requirement graph over the remaining slots.
///
/// Node keys are the course code, or `"<code> [<slot>]"` for every
/// repeat of a code already keyed by an earlier slot.
pub fn build_requirement_graph(
    index: &TemplateIndex,
    remaining: &RemainingRequirements,
    prerequisites: &PrerequisiteTable,
) -> CourseGraph {
    let mut graph = CourseGraph::new();

    for &slot_id in &remaining.open_slots {
        let slot = &index.slots()[slot_id];
        for code in &slot.alternatives {
            let key = if graph.contains(code) {
                format!("{code} [{slot_id}]")
            } else {
                code.clone()
            };
            graph.add_node(
                CourseNode::new(code.clone())
                    .with_key(key)
                    .with_units(slot.units)
                    .with_category(slot.category)
                    .with_group(slot_id)
                    .with_position(index.position(code).unwrap_or(usize::MAX))
                    .with_term_ordinal(slot.term.ordinal()),
            );
        }
    }

    let mut prerequisite_edges = 0;
    for (course, prereqs) in prerequisites.iter() {
        let targets: Vec<String> = graph.keys_of(course).into_iter().map(String::from).collect();
        for prereq in prereqs {
            let sources: Vec<String> = graph.keys_of(prereq).into_iter().map(String::from).collect();
            for source in &sources {
                for target in &targets {
                    if graph.add_edge(source, target) {
                        prerequisite_edges += 1;
                    }
                }
            }
        }
    }

    let mut term_edges = 0;
    let nodes: Vec<CourseNode> = graph.nodes().to_vec();
    for earlier in &nodes {
        for later in &nodes {
            if earlier.term_ordinal >= later.term_ordinal {
                continue;
            }
            if earlier.is_placeholder() && later.is_placeholder() {
                continue;
            }
            if graph.add_edge(&earlier.key, &later.key) {
                term_edges += 1;
            }
        }
    }

    tracing::debug!(
        nodes = graph.node_count(),
        prerequisite_edges,
        term_edges,
        "built requirement graph"
    );
    graph
}
