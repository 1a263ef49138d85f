//! Course dependency graph.
//!
//! A small owned adjacency-list DAG over course codes, sized to what the
//! planner needs: add node, add edge, predecessor lookup, and a
//! deterministic topological order.
//!
//! # Algorithm
//! Kahn's algorithm with a min-heap keyed on each node's template position,
//! so that among nodes with no unmet dependencies the one listed earliest in
//! the template always comes first. If fewer nodes are emitted than exist,
//! the remainder lies on or behind a cycle and is reported as a [`CycleError`].
//!
//! # Reference
//! Kahn (1962), "Topological sorting of large networks", CACM 5(11)

use std::cmp::Ordering;
use std::collections::{BTreeSet, BinaryHeap, HashMap};
use thiserror::Error;

use crate::models::Category;

/// A course node.
///
/// One node per (slot, course) pair. Each branch of an alternative slot
/// gets its own node; branches share the `group` of the slot they came
/// from. A course listed in several slots gets one node per slot, told
/// apart by `key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseNode {
    /// Unique graph key. Equals `code` unless the code repeats.
    pub key: String,
    /// Canonical course code or placeholder name.
    pub code: String,
    /// Unit weight.
    pub units: u32,
    /// Category tag for open-ended placeholders.
    pub category: Option<Category>,
    /// Index of the originating template slot.
    pub group: usize,
    /// First-appearance position in the template (tie-break key).
    pub position: usize,
    /// Term ordinal (1..=12) of the originating template slot.
    pub term_ordinal: u8,
}

impl CourseNode {
    /// Creates a one-unit node.
    pub fn new(code: impl Into<String>) -> Self {
        let code = code.into();
        Self {
            key: code.clone(),
            code,
            units: 1,
            category: None,
            group: 0,
            position: usize::MAX,
            term_ordinal: 0,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_units(mut self, units: u32) -> Self {
        self.units = units;
        self
    }

    pub fn with_category(mut self, category: Option<Category>) -> Self {
        self.category = category;
        self
    }

    pub fn with_group(mut self, group: usize) -> Self {
        self.group = group;
        self
    }

    pub fn with_position(mut self, position: usize) -> Self {
        self.position = position;
        self
    }

    pub fn with_term_ordinal(mut self, term_ordinal: u8) -> Self {
        self.term_ordinal = term_ordinal;
        self
    }

    /// Whether this node is an interchangeable category placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.category.is_some()
    }
}

/// Topological sort failed: the listed nodes could not be ordered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("circular dependency among {} course(s): {}", .courses.len(), .courses.join(", "))]
pub struct CycleError {
    /// Keys left unordered, in template order.
    pub courses: Vec<String>,
}

/// Directed graph of course nodes, addressed by [`CourseNode::key`].
///
/// Edges point from a course to the courses that must come after it.
/// Adjacency sets are ordered so every traversal is deterministic.
#[derive(Debug, Clone, Default)]
pub struct CourseGraph {
    nodes: Vec<CourseNode>,
    index: HashMap<String, usize>,
    successors: Vec<BTreeSet<usize>>,
    predecessors: Vec<BTreeSet<usize>>,
}

#[derive(Debug, PartialEq, Eq)]
struct Ready {
    position: usize,
    node: usize,
}

impl Ord for Ready {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behaviour
        other
            .position
            .cmp(&self.position)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Ready {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl CourseGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node. A key already present keeps its first node.
    ///
    /// Returns `true` if the node was inserted.
    pub fn add_node(&mut self, node: CourseNode) -> bool {
        if self.index.contains_key(&node.key) {
            return false;
        }
        self.index.insert(node.key.clone(), self.nodes.len());
        self.nodes.push(node);
        self.successors.push(BTreeSet::new());
        self.predecessors.push(BTreeSet::new());
        true
    }

    /// Adds an edge `from → to`.
    ///
    /// Returns `false` (and adds nothing) if either endpoint is absent,
    /// the endpoints coincide, or the edge already exists.
    pub fn add_edge(&mut self, from: &str, to: &str) -> bool {
        let (Some(&a), Some(&b)) = (self.index.get(from), self.index.get(to)) else {
            return false;
        };
        if a == b || !self.successors[a].insert(b) {
            return false;
        }
        self.predecessors[b].insert(a);
        true
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Keys of every node carrying `code`, in insertion order.
    pub fn keys_of(&self, code: &str) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|node| node.code == code)
            .map(|node| node.key.as_str())
            .collect()
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        match (self.index.get(from), self.index.get(to)) {
            (Some(&a), Some(&b)) => self.successors[a].contains(&b),
            _ => false,
        }
    }

    pub fn node(&self, key: &str) -> Option<&CourseNode> {
        self.index.get(key).map(|&i| &self.nodes[i])
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> &[CourseNode] {
        &self.nodes
    }

    /// Keys that must precede `key`.
    pub fn predecessors(&self, key: &str) -> Vec<&str> {
        self.neighbours(key, &self.predecessors)
    }

    /// Keys that must follow `key`.
    pub fn successors(&self, key: &str) -> Vec<&str> {
        self.neighbours(key, &self.successors)
    }

    fn neighbours<'a>(&'a self, key: &str, adjacency: &'a [BTreeSet<usize>]) -> Vec<&'a str> {
        self.index
            .get(key)
            .map(|&i| {
                adjacency[i]
                    .iter()
                    .map(|&j| self.nodes[j].key.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.successors.iter().map(BTreeSet::len).sum()
    }

    /// Topological order of all nodes, ties broken by template position.
    ///
    /// # Errors
    /// [`CycleError`] listing every node that could not be ordered.
    pub fn topological_order(&self) -> Result<Vec<&CourseNode>, CycleError> {
        let n = self.nodes.len();
        let mut in_degree: Vec<usize> = self.predecessors.iter().map(BTreeSet::len).collect();

        let mut heap: BinaryHeap<Ready> = in_degree
            .iter()
            .enumerate()
            .filter(|&(_, &d)| d == 0)
            .map(|(i, _)| self.ready(i))
            .collect();

        let mut order: Vec<usize> = Vec::with_capacity(n);
        while let Some(Ready { node, .. }) = heap.pop() {
            order.push(node);
            for &next in &self.successors[node] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    heap.push(self.ready(next));
                }
            }
        }

        if order.len() != n {
            let mut stuck: Vec<&CourseNode> = in_degree
                .iter()
                .enumerate()
                .filter(|&(_, &d)| d > 0)
                .map(|(i, _)| &self.nodes[i])
                .collect();
            stuck.sort_by_key(|node| node.position);
            return Err(CycleError {
                courses: stuck.into_iter().map(|node| node.key.clone()).collect(),
            });
        }

        Ok(order.into_iter().map(|i| &self.nodes[i]).collect())
    }

    fn ready(&self, node: usize) -> Ready {
        Ready {
            position: self.nodes[node].position,
            node,
        }
    }
}
