//! Greedy term assignment.
//!
//! # Algorithm
//!
//! Starting at the cursor, repeatedly:
//! 1. Collect pending courses whose predecessors are all resolved: their
//!    slot is filled, or their course was already taken. If there are
//!    none, stop. Under the cycle fallback, an edge between two courses
//!    of the cycle gates only in fallback order.
//! 2. Sort them by template position.
//! 3. Append them to the current term in that order until the next one
//!    would exceed the unit cap. Each placed course resolves at once,
//!    so a prerequisite and its follower may share a term on a later pass.
//!    Placing one branch of an alternative slot fills the slot and retires
//!    its siblings; the same code in another slot stays pending.
//! 4. Advance to the next term when the current one is full or nothing
//!    fit. Advancing past senior spring ends the run.
//!
//! Slots still open at the end are reported, never dropped.
//!
//! # Complexity
//! O(n² · d) where n = courses and d = max in-degree.

use std::collections::{BTreeSet, HashMap};

use super::order::CourseOrder;
use crate::graph::{CourseGraph, CourseNode};
use crate::models::{CategoryTally, Schedule, ScheduledCourse, TermSlot};

/// Why assignment stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every placeable course was placed.
    Completed,
    /// Courses remain but none has its prerequisites resolved, e.g. when
    /// a prerequisite is itself unplaceable.
    Blocked,
    /// Senior spring filled up with courses still pending.
    HorizonExhausted,
}

/// Result of term assignment.
#[derive(Debug, Clone)]
pub struct TermAssignment {
    /// Placed courses. Every term of the program is present, possibly empty.
    pub schedule: Schedule,
    /// Placeholders placed so far, per category.
    pub assigned: CategoryTally,
    /// One entry per slot left open, its branches joined with `" or "`.
    pub unscheduled: Vec<String>,
    /// Courses whose units exceed the per-term cap and whose slot stayed
    /// open. Their slots are also in `unscheduled`.
    pub oversized: Vec<String>,
    /// Why the loop ended.
    pub stop: StopReason,
}

/// Gating state shared by every pass.
struct Gate<'a> {
    graph: &'a CourseGraph,
    rank: HashMap<&'a str, usize>,
    cyclic: BTreeSet<&'a str>,
}

impl Gate<'_> {
    fn rank(&self, key: &str) -> usize {
        self.rank.get(key).copied().unwrap_or(usize::MAX)
    }

    fn is_unlocked(&self, node: &CourseNode, taken: &BTreeSet<String>, filled: &BTreeSet<usize>) -> bool {
        let own = node.key.as_str();
        self.graph.predecessors(own).into_iter().all(|key| {
            let Some(pred) = self.graph.node(key) else {
                return true;
            };
            filled.contains(&pred.group)
                || taken.contains(&pred.code)
                || (self.cyclic.contains(key)
                    && self.cyclic.contains(own)
                    && self.rank(key) > self.rank(own))
        })
    }
}

/// Packs ordered courses into terms from `start` onward.
///
/// `taken` holds the canonical codes of completed courses.
pub fn assign_terms(
    order: &CourseOrder,
    graph: &CourseGraph,
    taken: &BTreeSet<String>,
    start: TermSlot,
    max_units_per_term: u32,
) -> TermAssignment {
    let mut taken = taken.clone();
    let mut filled: BTreeSet<usize> = BTreeSet::new();
    let mut schedule = Schedule::with_all_terms();
    let mut assigned = CategoryTally::new();

    let nodes: Vec<&CourseNode> = order
        .courses
        .iter()
        .filter_map(|key| graph.node(key))
        .collect();
    let (oversized, mut pending): (Vec<&CourseNode>, Vec<&CourseNode>) = nodes
        .iter()
        .copied()
        .partition(|node| node.units > max_units_per_term);

    let gate = Gate {
        graph,
        rank: order
            .courses
            .iter()
            .enumerate()
            .map(|(i, key)| (key.as_str(), i))
            .collect(),
        cyclic: order.cyclic(),
    };

    let mut current = start;
    let mut term_units = schedule.units_in(current);
    let mut stop = StopReason::Completed;

    while !pending.is_empty() {
        let mut assignable: Vec<&CourseNode> = pending
            .iter()
            .copied()
            .filter(|node| gate.is_unlocked(node, &taken, &filled))
            .collect();

        if assignable.is_empty() {
            stop = StopReason::Blocked;
            break;
        }
        assignable.sort_by_key(|node| node.position);

        let mut placed = 0;
        for node in assignable {
            // Filled earlier in this pass by a sibling branch
            if filled.contains(&node.group) {
                continue;
            }
            if term_units + node.units > max_units_per_term {
                break;
            }

            let mut entry = ScheduledCourse::new(node.code.clone()).with_units(node.units);
            if let Some(category) = node.category {
                assigned.increment(category);
                entry = entry.with_category(category);
            }
            schedule.add(current, entry);
            term_units += node.units;
            placed += 1;

            taken.insert(node.code.clone());
            filled.insert(node.group);
        }

        pending.retain(|node| !filled.contains(&node.group));

        if term_units >= max_units_per_term || placed == 0 {
            match current.next() {
                Some(next) => {
                    current = next;
                    term_units = schedule.units_in(current);
                }
                None => {
                    if !pending.is_empty() {
                        stop = StopReason::HorizonExhausted;
                    }
                    break;
                }
            }
        }
    }

    let oversized: Vec<String> = oversized
        .into_iter()
        .filter(|node| !filled.contains(&node.group))
        .map(|node| {
            tracing::warn!(
                course = %node.code,
                units = node.units,
                cap = max_units_per_term,
                "course exceeds the per-term unit cap"
            );
            node.code.clone()
        })
        .collect();
    let unscheduled = open_slots(&nodes, &filled);

    match stop {
        StopReason::Blocked => tracing::warn!(
            requirements = ?unscheduled,
            "requirements blocked on prerequisites that are never satisfied"
        ),
        StopReason::HorizonExhausted => tracing::warn!(
            requirements = ?unscheduled,
            "schedule horizon exhausted before all requirements were placed"
        ),
        StopReason::Completed => {}
    }
    tracing::debug!(
        placed = schedule.course_count(),
        unscheduled = unscheduled.len(),
        "assigned courses to terms"
    );

    TermAssignment {
        schedule,
        assigned,
        unscheduled,
        oversized,
        stop,
    }
}

/// Slots with no placed branch, in scheduling order.
fn open_slots(nodes: &[&CourseNode], filled: &BTreeSet<usize>) -> Vec<String> {
    let mut slots: Vec<(usize, Vec<&str>)> = Vec::new();
    for node in nodes.iter().filter(|node| !filled.contains(&node.group)) {
        match slots.iter_mut().find(|(group, _)| *group == node.group) {
            Some((_, branches)) => branches.push(node.code.as_str()),
            None => slots.push((node.group, vec![node.code.as_str()])),
        }
    }
    slots
        .into_iter()
        .map(|(_, branches)| branches.join(" or "))
        .collect()
}
