//! Deterministic ordering of remaining courses.
//!
//! Topological order of the requirement graph, ties broken by template
//! position. A cycle does not abort planning: the planner logs a warning,
//! keeps the [`CycleError`] for the report, and orders every node purely
//! by template position instead.

use std::collections::BTreeSet;

use crate::graph::{CourseGraph, CourseNode, CycleError};

/// Ordered node keys plus the cycle that forced a fallback, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseOrder {
    /// Node keys, earliest first.
    pub courses: Vec<String>,
    /// Set when the graph was cyclic and template order was used.
    pub cycle: Option<CycleError>,
}

impl CourseOrder {
    /// Whether the fallback ordering was used.
    pub fn is_fallback(&self) -> bool {
        self.cycle.is_some()
    }

    /// Keys the cycle left unordered. Empty for an acyclic graph.
    pub fn cyclic(&self) -> BTreeSet<&str> {
        self.cycle
            .iter()
            .flat_map(|cycle| cycle.courses.iter().map(String::as_str))
            .collect()
    }
}

/// Orders every node of the graph.
pub fn order_courses(graph: &CourseGraph) -> CourseOrder {
    match graph.topological_order() {
        Ok(nodes) => CourseOrder {
            courses: keys(nodes),
            cycle: None,
        },
        Err(cycle) => {
            tracing::warn!(
                courses = ?cycle.courses,
                "requirement graph is cyclic; falling back to template order"
            );
            let mut nodes: Vec<&CourseNode> = graph.nodes().iter().collect();
            nodes.sort_by_key(|node| node.position);
            CourseOrder {
                courses: keys(nodes),
                cycle: Some(cycle),
            }
        }
    }
}

fn keys(nodes: Vec<&CourseNode>) -> Vec<String> {
    nodes.into_iter().map(|node| node.key.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(codes: &[&str]) -> CourseGraph {
        let mut g = CourseGraph::new();
        for (i, code) in codes.iter().enumerate() {
            g.add_node(CourseNode::new(*code).with_position(i));
        }
        g
    }

    #[test]
    fn test_acyclic_order() {
        let mut g = graph(&["B", "A", "C"]);
        g.add_edge("A", "B");
        let order = order_courses(&g);
        assert_eq!(order.courses, vec!["A", "B", "C"]);
        assert!(!order.is_fallback());
        assert!(order.cyclic().is_empty());
    }

    #[test]
    fn test_cycle_falls_back_to_template_order() {
        let mut g = graph(&["X", "Y", "Z"]);
        g.add_edge("Z", "X");
        g.add_edge("X", "Z");
        let order = order_courses(&g);
        assert_eq!(order.courses, vec!["X", "Y", "Z"]);
        assert!(order.is_fallback());
        assert_eq!(order.cyclic(), BTreeSet::from(["X", "Z"]));
        assert_eq!(order.cycle.unwrap().courses, vec!["X", "Z"]);
    }

    #[test]
    fn test_empty_graph() {
        let order = order_courses(&CourseGraph::new());
        assert!(order.courses.is_empty());
        assert!(order.cycle.is_none());
    }
}
