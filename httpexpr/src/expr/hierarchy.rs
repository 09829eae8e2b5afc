use std::collections::HashMap;

use itertools::Itertools;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::expr::HttpService;

pub type ParentGraph = DiGraph<String, ()>;

/// The parent/child edges between services, keyed by service name. Orders
/// evaluation parent-before-child and reports cyclic parent chains so that
/// validation can reject them.
#[derive(Debug, Default)]
pub struct Hierarchy {
    graph: ParentGraph,
    node_map: HashMap<String, NodeIndex>,
}

impl Hierarchy {
    /// Builds the parent graph for `services`. Nodes are added in declaration
    /// order. A parent name that matches no service produces no edge; the
    /// unresolved reference is reported by validation, not here.
    pub fn build(services: &[HttpService]) -> Self {
        let mut hierarchy = Self::default();
        for service in services {
            let index = hierarchy.graph.add_node(service.name.clone());
            hierarchy.node_map.insert(service.name.clone(), index);
        }
        for service in services {
            let Some(parent) = &service.parent else {
                continue;
            };
            if let (Some(&parent), Some(&child)) = (
                hierarchy.node_map.get(parent),
                hierarchy.node_map.get(&service.name),
            ) {
                hierarchy.graph.add_edge(parent, child, ());
            }
        }
        hierarchy
    }

    /// Service names in evaluation order: every service follows all of its
    /// transitive parents, with declaration order breaking ties among
    /// services whose order is otherwise unconstrained. Services on a cyclic
    /// parent chain cannot be ordered and are appended in declaration order;
    /// the cycle itself is reported by [Hierarchy::cycle_members].
    pub fn sorted_names(&self) -> Vec<String> {
        let count = self.graph.node_count();
        let mut indegree = vec![0usize; count];
        for edge in self.graph.edge_indices() {
            if let Some((_, child)) = self.graph.edge_endpoints(edge) {
                indegree[child.index()] += 1;
            }
        }

        let mut placed = vec![false; count];
        let mut order = Vec::with_capacity(count);
        while let Some(next) = (0..count).find(|&i| !placed[i] && indegree[i] == 0) {
            placed[next] = true;
            order.push(next);
            for child in self.graph.neighbors(NodeIndex::new(next)) {
                indegree[child.index()] -= 1;
            }
        }
        for i in 0..count {
            if !placed[i] {
                order.push(i);
            }
        }

        order
            .into_iter()
            .map(|i| self.graph[NodeIndex::new(i)].clone())
            .collect_vec()
    }

    /// Names of the services sitting on a cyclic parent chain, self-parents
    /// included, in declaration order.
    pub fn cycle_members(&self) -> Vec<String> {
        tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || component
                        .first()
                        .is_some_and(|&node| self.graph.contains_edge(node, node))
            })
            .flatten()
            .sorted()
            .map(|node| self.graph[node].clone())
            .collect_vec()
    }

    pub fn contains_edge(&self, parent: &str, child: &str) -> bool {
        match (self.node_map.get(parent), self.node_map.get(child)) {
            (Some(&parent), Some(&child)) => self.graph.contains_edge(parent, child),
            _ => false,
        }
    }
}
