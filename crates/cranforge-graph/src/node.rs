//! Graph nodes and edges.

use crate::error::{GraphError, Result};
use cranforge_core::{AHashSet, Mutex, PackageId, PackageVersionId};
use futures::future::{BoxFuture, FutureExt, Shared};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Shared handle to a node's pending dependency list.
pub type EdgesFuture = Shared<BoxFuture<'static, Result<Arc<[DependencyEdge]>>>>;

/// A dependency from one node on another.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencyEdge {
    target: PackageVersionId,
    optional: bool,
}

impl DependencyEdge {
    /// Create an edge to `target`.
    #[must_use]
    pub const fn new(target: PackageVersionId, optional: bool) -> Self {
        Self { target, optional }
    }

    /// The version the edge resolved to.
    #[must_use]
    pub const fn target(&self) -> &PackageVersionId {
        &self.target
    }

    /// Identity of the target node.
    #[must_use]
    pub const fn package_id(&self) -> &PackageId {
        self.target.package_id()
    }

    /// True if the dependency is optional.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.optional
    }
}

impl fmt::Display for DependencyEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.optional {
            write!(f, "{} (optional)", self.target)
        } else {
            write!(f, "{}", self.target)
        }
    }
}

/// One package in the graph.
///
/// The dependency list is filled in asynchronously. Until it is realized,
/// [`PackageNode::edges`] is empty; [`PackageNode::dependencies`] waits for
/// it. The blocked flag only ever goes from false to true.
pub struct PackageNode {
    id: PackageVersionId,
    pending: EdgesFuture,
    realized: OnceLock<Arc<[DependencyEdge]>>,
    reverse_dependencies: Mutex<AHashSet<PackageId>>,
    replacement_version: Option<String>,
    replaced: bool,
    blocked: AtomicBool,
}

impl PackageNode {
    /// A node whose dependencies are still being resolved.
    #[must_use]
    pub fn pending(id: PackageVersionId, edges: EdgesFuture, blocked: bool) -> Self {
        Self {
            id,
            pending: edges,
            realized: OnceLock::new(),
            reverse_dependencies: Mutex::new(AHashSet::new()),
            replacement_version: None,
            replaced: false,
            blocked: AtomicBool::new(blocked),
        }
    }

    /// A node built by a replacement; its dependencies are never resolved.
    #[must_use]
    pub fn replaced(id: PackageVersionId, replacement_version: Option<String>) -> Self {
        let mut node = Self::realized(id, false);
        node.replaced = true;
        node.replacement_version = replacement_version;
        node
    }

    /// Placeholder for a dependency the database could not resolve.
    ///
    /// Missing nodes are blocked from the start so their dependents are too.
    #[must_use]
    pub fn missing(name: &str) -> Self {
        Self::realized(PackageId::missing(name).with_version("0"), true)
    }

    fn realized(id: PackageVersionId, blocked: bool) -> Self {
        let empty: Arc<[DependencyEdge]> = Arc::from(Vec::new());
        let node = Self::pending(
            id,
            futures::future::ready(Ok(Arc::clone(&empty))).boxed().shared(),
            blocked,
        );
        let _ = node.realized.set(empty);
        node
    }

    /// Package version.
    #[must_use]
    pub const fn id(&self) -> &PackageVersionId {
        &self.id
    }

    /// Version-independent identity.
    #[must_use]
    pub const fn package_id(&self) -> &PackageId {
        self.id.package_id()
    }

    /// Wait for the dependency list.
    ///
    /// # Errors
    /// Returns the resolution error if the node's dependencies could not be
    /// resolved. Every caller sees the same error.
    pub async fn dependencies(&self) -> Result<Arc<[DependencyEdge]>> {
        if let Some(edges) = self.realized.get() {
            return Ok(Arc::clone(edges));
        }
        let edges = self.pending.clone().await?;
        Ok(Arc::clone(self.realized.get_or_init(|| edges)))
    }

    /// Dependencies seen so far; empty until realized.
    #[must_use]
    pub fn edges(&self) -> &[DependencyEdge] {
        match self.realized.get() {
            Some(edges) => edges,
            None => &[],
        }
    }

    /// True once the dependency list is available.
    #[must_use]
    pub fn is_realized(&self) -> bool {
        self.realized.get().is_some()
    }

    /// True if this node is built by a replacement.
    #[must_use]
    pub const fn is_replaced(&self) -> bool {
        self.replaced
    }

    /// Replacement build version, if the database reported one.
    #[must_use]
    pub fn replacement_version(&self) -> Option<&str> {
        self.replacement_version.as_deref()
    }

    /// True if this node was never resolved because it is missing.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.id.group() == PackageId::MISSING_GROUP
    }

    /// True if this node is excluded from the graph.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::Acquire)
    }

    /// Block this node. Returns true if it was not blocked before.
    pub fn mark_blocked(&self) -> bool {
        !self.blocked.swap(true, Ordering::AcqRel)
    }

    /// Record that `dependent` depends on this node.
    pub fn add_reverse_dependency(&self, dependent: PackageId) {
        self.reverse_dependencies.lock().insert(dependent);
    }

    /// Identities of the nodes depending on this one, sorted.
    #[must_use]
    pub fn reverse_dependencies(&self) -> Vec<PackageId> {
        let mut ids: Vec<_> = self.reverse_dependencies.lock().iter().cloned().collect();
        ids.sort();
        ids
    }
}

impl fmt::Debug for PackageNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackageNode")
            .field("id", &self.id)
            .field("edges", &self.edges())
            .field("replaced", &self.replaced)
            .field("blocked", &self.is_blocked())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for PackageNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Convert a join failure into the error every reader of the node sees.
pub(crate) fn task_failed(id: &PackageVersionId, err: &tokio::task::JoinError) -> GraphError {
    GraphError::TaskFailed {
        id: id.clone(),
        message: err.to_string(),
    }
}
