//! The finished package graph.

use crate::node::PackageNode;
use ahash::AHashMap;
use cranforge_core::PackageId;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::sync::Arc;

/// Realized, pruned graph keyed by package identity.
///
/// Every node is unblocked. Edges may point at identities that were pruned;
/// use [`PackageGraph::dependencies_of`] to follow only retained ones.
#[derive(Debug, Clone, Default)]
pub struct PackageGraph {
    nodes: AHashMap<PackageId, Arc<PackageNode>>,
}

impl PackageGraph {
    pub(crate) fn new(nodes: AHashMap<PackageId, Arc<PackageNode>>) -> Self {
        Self { nodes }
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node for `id`.
    #[must_use]
    pub fn get(&self, id: &PackageId) -> Option<&Arc<PackageNode>> {
        self.nodes.get(id)
    }

    /// True if `id` is in the graph.
    #[must_use]
    pub fn contains(&self, id: &PackageId) -> bool {
        self.nodes.contains_key(id)
    }

    /// All nodes sorted by versioned id.
    #[must_use]
    pub fn nodes(&self) -> Vec<Arc<PackageNode>> {
        let mut nodes: Vec<_> = self.nodes.values().cloned().collect();
        nodes.sort_by(|a, b| a.id().cmp(b.id()));
        nodes
    }

    /// Retained dependencies of `id`, optional ones included.
    #[must_use]
    pub fn dependencies_of(&self, id: &PackageId) -> Vec<Arc<PackageNode>> {
        let Some(node) = self.nodes.get(id) else {
            return Vec::new();
        };
        node.edges()
            .iter()
            .filter_map(|edge| self.nodes.get(edge.package_id()).cloned())
            .collect()
    }

    /// Nodes grouped so every group comes after the groups it depends on.
    ///
    /// Packages in a dependency cycle share a group. Optional edges are
    /// ignored. Groups and their members are deterministic.
    #[must_use]
    pub fn build_order(&self) -> Vec<Vec<Arc<PackageNode>>> {
        let nodes = self.nodes();
        let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(nodes.len(), nodes.len());
        let mut index: AHashMap<&PackageId, NodeIndex> = AHashMap::with_capacity(nodes.len());

        for (i, node) in nodes.iter().enumerate() {
            index.insert(node.package_id(), graph.add_node(i));
        }
        for node in &nodes {
            let from = index[node.package_id()];
            for edge in node.edges().iter().filter(|e| !e.is_optional()) {
                if let Some(&to) = index.get(edge.package_id()) {
                    graph.update_edge(from, to, ());
                }
            }
        }

        // Tarjan emits a component only after everything it reaches.
        tarjan_scc(&graph)
            .into_iter()
            .map(|component| {
                let mut group: Vec<_> = component
                    .into_iter()
                    .map(|ix| Arc::clone(&nodes[graph[ix]]))
                    .collect();
                group.sort_by(|a, b| a.id().cmp(b.id()));
                group
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a PackageGraph {
    type Item = (&'a PackageId, &'a Arc<PackageNode>);
    type IntoIter = std::collections::hash_map::Iter<'a, PackageId, Arc<PackageNode>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
