//! Concurrent construction of the transitive dependency graph.
//!
//! Every new node starts a resolution task. A task waits for one of a fixed
//! number of permits, asks the dependency cache and then the package
//! database, and links the results into the shared node map, starting tasks
//! for the nodes it creates. [`PackageGraphBuilder::build`] waits for the
//! whole closure to resolve, propagates blocking from broken or missing
//! packages to everything that needs them, and prunes what was blocked.

use crate::blocklist::Blocklist;
use crate::error::{GraphError, Result};
use crate::graph::PackageGraph;
use crate::node::{DependencyEdge, PackageNode, task_failed};
use crate::replaced::ReplacedPackageProvider;
use crate::sample;
use crate::stats::BuilderStats;
use ahash::{AHashMap, AHashSet};
use cranforge_cache::DependencyCache;
use cranforge_core::{PackageId, PackageVersionId, ResolvedDependency, ResolvedDependencySet};
use cranforge_repository::MetadataSource;
use futures::FutureExt;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, trace};

type NodeMap = AHashMap<PackageId, Arc<PackageNode>>;

/// Builds a [`PackageGraph`] from seed packages.
///
/// Must be used inside a Tokio runtime.
pub struct PackageGraphBuilder<S> {
    inner: Arc<Inner<S>>,
}

struct Inner<S> {
    source: S,
    cache: DependencyCache,
    replaced: ReplacedPackageProvider,
    blocklist: Blocklist,
    nodes: Mutex<NodeMap>,
    permits: Semaphore,
    stats: BuilderStats,
}

impl<S: MetadataSource + 'static> PackageGraphBuilder<S> {
    /// Create a builder running at most `workers` resolutions at once.
    #[must_use]
    pub fn new(
        source: S,
        cache: DependencyCache,
        replaced: ReplacedPackageProvider,
        blocklist: Blocklist,
        workers: usize,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                cache,
                replaced,
                blocklist,
                nodes: Mutex::new(AHashMap::new()),
                permits: Semaphore::new(workers.max(1)),
                stats: BuilderStats::default(),
            }),
        }
    }

    /// Add a seed package and start resolving it.
    ///
    /// The blocklist is normally applied as dependencies are discovered.
    /// Seeds are checked here as well, so a blocklisted seed starts out
    /// blocked instead of being resolved into the graph.
    ///
    /// # Errors
    /// Returns [`GraphError::AlreadyAdded`] if a node with the same identity
    /// already exists, whatever its version.
    pub fn add(&self, id: PackageVersionId) -> Result<Arc<PackageNode>> {
        let mut nodes = self.inner.nodes.lock();
        self.inner.insert_seed(&mut nodes, id)
    }

    /// Add the packages matching `filter` as seeds.
    ///
    /// A filter containing `:` is a single versioned id. Anything else is
    /// sent to the package database as a list query; `sample` then thins
    /// the result (see [`sample::sample`]). Returns the number of seeds added.
    ///
    /// All seeds are registered under one hold of the node map, so a seed's
    /// resolution can never claim the identity of a seed later in the list.
    ///
    /// # Errors
    /// Returns error if the filter or query fails, the sample rate is
    /// invalid, or a listed package was already added.
    pub async fn add_filter(&self, filter: &str, sample_rate: Option<f64>) -> Result<usize> {
        let ids = self.query(filter, sample_rate).await?;
        info!(filter, count = ids.len(), "adding seed packages");
        let count = ids.len();

        let mut nodes = self.inner.nodes.lock();
        for id in ids {
            debug!(package = %id, "adding seed");
            self.inner.insert_seed(&mut nodes, id)?;
        }
        Ok(count)
    }

    async fn query(&self, filter: &str, sample_rate: Option<f64>) -> Result<Vec<PackageVersionId>> {
        if filter.contains(':') {
            return Ok(vec![PackageVersionId::from_triplet(filter)?]);
        }

        info!(filter, "querying package list");
        let ids = self
            .inner
            .source
            .query_package_list(filter)
            .await
            .map_err(|source| GraphError::Query {
                filter: filter.to_string(),
                source,
            })?;
        info!(filter, count = ids.len(), "package list query returned");

        match sample_rate {
            Some(rate) => {
                let total = ids.len();
                let kept = sample::sample(ids, rate, &mut rand::thread_rng())?;
                info!(rate, total, kept = kept.len(), "sampled package list");
                Ok(kept)
            }
            None => Ok(ids),
        }
    }

    /// Wait for every node to resolve, propagate blocking and prune.
    ///
    /// # Errors
    /// Returns the first resolution failure met while walking the graph.
    /// No partial graph is returned.
    pub async fn build(&self) -> Result<PackageGraph> {
        self.realize().await?;

        let mut nodes = self.inner.nodes.lock();
        link_reverse_dependencies(&nodes);
        propagate_blocked(&nodes);

        let before = nodes.len();
        nodes.retain(|_, node| !node.is_blocked());
        for _ in nodes.len()..before {
            self.inner.stats.record_blocked();
        }
        info!(
            packages = nodes.len(),
            excluded = before - nodes.len(),
            "dependency graph complete"
        );
        Ok(PackageGraph::new(nodes.clone()))
    }

    /// Breadth-first walk awaiting each node's dependencies.
    async fn realize(&self) -> Result<()> {
        let mut queue: VecDeque<Arc<PackageNode>> = {
            let nodes = self.inner.nodes.lock();
            let mut seeds: Vec<_> = nodes.values().cloned().collect();
            seeds.sort_by(|a, b| a.id().cmp(b.id()));
            seeds.into()
        };
        let mut visited: AHashSet<PackageId> = AHashSet::new();

        while let Some(node) = queue.pop_front() {
            if !visited.insert(node.package_id().clone()) {
                continue;
            }
            let edges = node.dependencies().await?;

            let nodes = self.inner.nodes.lock();
            for edge in edges.iter() {
                if visited.contains(edge.package_id()) {
                    continue;
                }
                if let Some(target) = nodes.get(edge.package_id()) {
                    queue.push_back(Arc::clone(target));
                }
            }
        }
        debug!(nodes = visited.len(), "all dependencies realized");
        Ok(())
    }

    /// Node for `id`, if one was created.
    #[must_use]
    pub fn node(&self, id: &PackageId) -> Option<Arc<PackageNode>> {
        self.inner.nodes.lock().get(id).cloned()
    }

    /// Number of nodes created so far, blocked ones included until pruned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.nodes.lock().len()
    }

    /// True if no node was created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.nodes.lock().is_empty()
    }

    /// Builder statistics.
    #[must_use]
    pub fn stats(&self) -> &BuilderStats {
        &self.inner.stats
    }

    /// The dependency cache.
    #[must_use]
    pub fn cache(&self) -> &DependencyCache {
        &self.inner.cache
    }
}

impl<S> std::fmt::Debug for PackageGraphBuilder<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackageGraphBuilder")
            .field("nodes", &self.inner.nodes.lock().len())
            .field("available_permits", &self.inner.permits.available_permits())
            .finish_non_exhaustive()
    }
}

impl<S: MetadataSource + 'static> Inner<S> {
    fn insert_seed(
        self: &Arc<Self>,
        nodes: &mut NodeMap,
        id: PackageVersionId,
    ) -> Result<Arc<PackageNode>> {
        if nodes.contains_key(id.package_id()) {
            return Err(GraphError::AlreadyAdded { id });
        }
        let blocked = self.blocklist.is_blocked_name(id.name());
        let node = Arc::new(self.pending_node(id, blocked));
        nodes.insert(node.package_id().clone(), Arc::clone(&node));
        Ok(node)
    }

    /// Create a node and start resolving its dependencies.
    fn pending_node(self: &Arc<Self>, id: PackageVersionId, blocked: bool) -> PackageNode {
        self.stats.record_node();
        let handle = tokio::spawn(Arc::clone(self).resolve(id.clone()));
        let task_id = id.clone();
        let edges = async move {
            match handle.await {
                Ok(result) => result,
                Err(e) => Err(task_failed(&task_id, &e)),
            }
        }
        .boxed()
        .shared();
        PackageNode::pending(id, edges, blocked)
    }

    async fn resolve(self: Arc<Self>, id: PackageVersionId) -> Result<Arc<[DependencyEdge]>> {
        self.stats.record_resolution();
        let set = {
            let _permit = self
                .permits
                .acquire()
                .await
                .map_err(|e| GraphError::TaskFailed {
                    id: id.clone(),
                    message: e.to_string(),
                })?;
            self.fetch(&id).await?
        };
        trace!(package = %id, dependencies = set.len(), "resolved");
        Ok(self.link(&set).into())
    }

    async fn fetch(&self, id: &PackageVersionId) -> Result<ResolvedDependencySet> {
        if let Some(set) = self.cache.get(id).await {
            self.stats.record_cache_hit();
            return Ok(set);
        }

        debug!(package = %id, "resolving dependencies");
        self.stats.record_service_call();
        let set = self
            .source
            .resolve_dependencies(id)
            .await
            .map_err(|source| GraphError::Resolution {
                id: id.clone(),
                source,
            })?;
        self.cache.put(id, &set).await;
        Ok(set)
    }

    /// Turn resolved entries into edges, creating any node not yet present.
    fn link(self: &Arc<Self>, set: &ResolvedDependencySet) -> Vec<DependencyEdge> {
        let mut nodes = self.nodes.lock();
        set.iter()
            .map(|entry| {
                let target = match &entry.package_version_id {
                    Some(id) => self.node_for(&mut nodes, id, entry),
                    None => self.missing_node(&mut nodes, &entry.name),
                };
                DependencyEdge::new(target, entry.optional)
            })
            .collect()
    }

    /// Existing node for `id`'s identity, or a new one. The first version
    /// seen for an identity wins.
    fn node_for(
        self: &Arc<Self>,
        nodes: &mut NodeMap,
        id: &PackageVersionId,
        entry: &ResolvedDependency,
    ) -> PackageVersionId {
        if let Some(existing) = nodes.get(id.package_id()) {
            return existing.id().clone();
        }

        let node = if self.replaced.short_circuits(id, entry.is_replaced()) {
            trace!(package = %id, "using replacement build");
            self.stats.record_node();
            self.stats.record_replaced();
            PackageNode::replaced(id.clone(), entry.replacement_version.clone())
        } else {
            let blocked = self.blocklist.is_blocked_name(id.name());
            self.pending_node(id.clone(), blocked)
        };
        nodes.insert(id.package_id().clone(), Arc::new(node));
        id.clone()
    }

    fn missing_node(&self, nodes: &mut NodeMap, name: &str) -> PackageVersionId {
        let id = PackageId::missing(name);
        if let Some(existing) = nodes.get(&id) {
            return existing.id().clone();
        }
        debug!(package = name, "dependency could not be resolved");
        self.stats.record_node();
        self.stats.record_missing();
        let node = Arc::new(PackageNode::missing(name));
        let version_id = node.id().clone();
        nodes.insert(id, node);
        version_id
    }
}

/// Record every required edge on its target. Optional edges never carry
/// blocking.
fn link_reverse_dependencies(nodes: &NodeMap) {
    for node in nodes.values() {
        for edge in node.edges().iter().filter(|e| !e.is_optional()) {
            if let Some(target) = nodes.get(edge.package_id()) {
                target.add_reverse_dependency(node.package_id().clone());
            }
        }
    }
}

/// Block everything that transitively requires a blocked node.
fn propagate_blocked(nodes: &NodeMap) {
    let mut roots: Vec<&Arc<PackageNode>> = nodes.values().filter(|n| n.is_blocked()).collect();
    roots.sort_by(|a, b| a.id().cmp(b.id()));

    let mut worklist: Vec<(&Arc<PackageNode>, &PackageVersionId)> =
        roots.into_iter().map(|node| (node, node.id())).collect();

    while let Some((blocked, root)) = worklist.pop() {
        for dependent_id in blocked.reverse_dependencies() {
            let Some(dependent) = nodes.get(&dependent_id) else {
                continue;
            };
            if dependent.mark_blocked() {
                info!(
                    package = %dependent.id(),
                    dependency = %blocked.id(),
                    root = %root,
                    "blocklisting package because of (transitive) dependency"
                );
                worklist.push((dependent, root));
            }
        }
    }
}
