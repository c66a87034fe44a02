//! End-to-end tests for graph construction against an in-memory database.

use cranforge_cache::DependencyCache;
use cranforge_core::{PackageId, ResolvedDependency};
use cranforge_graph::{
    Blocklist, GraphError, PackageGraph, PackageGraphBuilder, ReplacedPackageProvider, package_list,
};
use cranforge_test_utils::prelude::*;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

struct Harness {
    universe: TempUniverse,
    source: Arc<StaticMetadataSource>,
}

impl Harness {
    fn new(universe: TempUniverse, source: StaticMetadataSource) -> Self {
        Self {
            universe,
            source: Arc::new(source),
        }
    }

    fn builder(&self) -> PackageGraphBuilder<Arc<StaticMetadataSource>> {
        self.builder_with(4)
    }

    fn builder_with(&self, workers: usize) -> PackageGraphBuilder<Arc<StaticMetadataSource>> {
        let config = self.universe.config();
        PackageGraphBuilder::new(
            Arc::clone(&self.source),
            DependencyCache::new(config.cache_root(), &config.cache_model),
            ReplacedPackageProvider::scan(&config.replacements_dir()).unwrap(),
            Blocklist::load(&config.packages_dir()).unwrap(),
            workers,
        )
    }
}

fn names(graph: &PackageGraph) -> Vec<String> {
    graph.nodes().iter().map(|n| n.id().name().to_string()).collect()
}

#[tokio::test]
async fn test_taint_travels_up_required_chain() {
    let source = StaticMetadataSource::new()
        .with_package(cran("A", "1.0"), vec![dep("B", "1.0"), optional_dep("C", "1.0")])
        .with_package(cran("B", "1.0"), vec![dep("D", "1.0")]);
    let universe = TempUniverse::builder().blocklist(&["D"]).build().unwrap();
    let harness = Harness::new(universe, source);

    let builder = harness.builder();
    builder.add(cran("A", "1.0")).unwrap();
    let graph = builder.build().await.unwrap();

    assert_eq!(names(&graph), vec!["C"]);
    assert_eq!(builder.stats().snapshot().blocked, 3);
}

#[tokio::test]
async fn test_optional_dependency_on_blocked_package_is_harmless() {
    let source = StaticMetadataSource::new()
        .with_package(cran("A", "1.0"), vec![optional_dep("D", "1.0"), dep("E", "2.0")]);
    let universe = TempUniverse::builder().blocklist(&["D"]).build().unwrap();
    let harness = Harness::new(universe, source);

    let builder = harness.builder();
    builder.add(cran("A", "1.0")).unwrap();
    let graph = builder.build().await.unwrap();

    assert_eq!(names(&graph), vec!["A", "E"]);
    // The edge stays on the node even though its target was pruned.
    let a = graph.get(&PackageId::cran("A")).unwrap();
    assert_eq!(a.edges().len(), 2);
    assert_eq!(graph.dependencies_of(&PackageId::cran("A")).len(), 1);
}

#[tokio::test]
async fn test_unresolved_dependency_excludes_dependents() {
    let source = StaticMetadataSource::new()
        .with_package(cran("A", "1.0"), vec![dep("B", "1.0")])
        .with_package(cran("B", "1.0"), vec![unresolved_dep("ghost")])
        .with_package(cran("Z", "1.0"), vec![ResolvedDependency::unresolved("ghost", true)]);
    let harness = Harness::new(TempUniverse::empty().unwrap(), source);

    let builder = harness.builder();
    builder.add(cran("A", "1.0")).unwrap();
    builder.add(cran("Z", "1.0")).unwrap();
    let graph = builder.build().await.unwrap();

    assert_eq!(names(&graph), vec!["Z"]);
    assert!(!graph.contains(&PackageId::missing("ghost")));
    assert_eq!(builder.stats().snapshot().missing, 1);
}

#[tokio::test]
async fn test_duplicate_seed_rejected() {
    let harness = Harness::new(TempUniverse::empty().unwrap(), StaticMetadataSource::new());
    let builder = harness.builder();
    builder.add(cran("MASS", "7.3-51.4")).unwrap();

    let err = builder.add(cran("MASS", "7.3-50")).unwrap_err();
    assert!(matches!(err, GraphError::AlreadyAdded { .. }));
    assert_eq!(builder.len(), 1);
}

#[tokio::test]
async fn test_blocklisted_seed_is_pruned() {
    let source =
        StaticMetadataSource::new().with_package(cran("rJava", "0.9"), vec![dep("B", "1.0")]);
    let universe = TempUniverse::builder().blocklist(&["rJava"]).build().unwrap();
    let harness = Harness::new(universe, source);

    let builder = harness.builder();
    builder.add(cran("rJava", "0.9")).unwrap();
    let graph = builder.build().await.unwrap();

    assert_eq!(names(&graph), vec!["B"]);
}

#[tokio::test]
async fn test_replacement_short_circuits_resolution() {
    let source = StaticMetadataSource::new()
        .with_package(
            cran("A", "1.0"),
            vec![dep("Matrix", "1.2-6"), replaced_dep("stats", "3.5", "3.5-b7")],
        )
        .with_package(cran("Matrix", "1.2-6"), vec![dep("lattice", "0.20")]);
    let universe = TempUniverse::builder().replacement("Matrix").build().unwrap();
    let harness = Harness::new(universe, source);

    let builder = harness.builder();
    builder.add(cran("A", "1.0")).unwrap();
    let graph = builder.build().await.unwrap();

    assert_eq!(names(&graph), vec!["A", "Matrix", "stats"]);
    assert_eq!(harness.source.calls_for(&cran("Matrix", "1.2-6")), 0);
    assert_eq!(harness.source.calls_for(&cran("stats", "3.5")), 0);

    let stats = graph.get(&PackageId::cran("stats")).unwrap();
    assert!(stats.is_replaced());
    assert_eq!(stats.replacement_version(), Some("3.5-b7"));
    assert_eq!(builder.stats().snapshot().replaced, 2);
}

#[tokio::test]
async fn test_always_rebuilt_packages_are_resolved() {
    let source = StaticMetadataSource::new()
        .with_package(
            cran("A", "1.0"),
            vec![replaced_dep("Rcpp", "1.0.1", "1.0.1-b3"), dep("testthat", "2.1.1")],
        )
        .with_package(cran("testthat", "2.1.1"), vec![dep("crayon", "1.3.4")]);
    let harness = Harness::new(
        TempUniverse::builder().replacement("testthat").build().unwrap(),
        source,
    );

    let builder = harness.builder();
    builder.add(cran("A", "1.0")).unwrap();
    let graph = builder.build().await.unwrap();

    assert_eq!(names(&graph), vec!["A", "Rcpp", "crayon", "testthat"]);
    assert!(!graph.get(&PackageId::cran("Rcpp")).unwrap().is_replaced());
    assert!(!graph.get(&PackageId::cran("testthat")).unwrap().is_replaced());
    assert_eq!(harness.source.calls_for(&cran("Rcpp", "1.0.1")), 1);
    assert_eq!(harness.source.calls_for(&cran("testthat", "2.1.1")), 1);
}

#[tokio::test]
async fn test_diamond_resolves_each_package_once() {
    let source = StaticMetadataSource::new()
        .with_package(cran("A", "1.0"), vec![dep("B", "1.0"), dep("C", "1.0")])
        .with_package(cran("B", "1.0"), vec![dep("D", "1.0")])
        .with_package(cran("C", "1.0"), vec![dep("D", "2.0")])
        .with_delay(Duration::from_millis(5));
    let harness = Harness::new(TempUniverse::empty().unwrap(), source);

    let builder = harness.builder_with(2);
    builder.add(cran("A", "1.0")).unwrap();
    let graph = builder.build().await.unwrap();

    assert_eq!(names(&graph), vec!["A", "B", "C", "D"]);
    assert_eq!(harness.source.total_calls(), 4);

    // Whichever version arrived first is shared by both edges.
    let d = graph.get(&PackageId::cran("D")).unwrap().id().clone();
    for parent in ["B", "C"] {
        let edges = graph.get(&PackageId::cran(parent)).unwrap().edges().to_vec();
        assert_eq!(edges[0].target(), &d);
    }
}

#[tokio::test]
async fn test_cycle_terminates() {
    let source = StaticMetadataSource::new()
        .with_package(cran("A", "1.0"), vec![dep("B", "1.0")])
        .with_package(cran("B", "1.0"), vec![dep("C", "1.0")])
        .with_package(cran("C", "1.0"), vec![dep("A", "1.0")]);
    let harness = Harness::new(TempUniverse::empty().unwrap(), source);

    let builder = harness.builder_with(1);
    builder.add(cran("A", "1.0")).unwrap();
    let graph = builder.build().await.unwrap();

    assert_eq!(names(&graph), vec!["A", "B", "C"]);
    let order = graph.build_order();
    assert_eq!(order.len(), 1);
    assert_eq!(order[0].len(), 3);
}

#[tokio::test]
async fn test_blocked_cycle_member_blocks_whole_cycle() {
    let source = StaticMetadataSource::new()
        .with_package(cran("A", "1.0"), vec![dep("B", "1.0")])
        .with_package(cran("B", "1.0"), vec![dep("A", "1.0"), dep("X", "1.0")]);
    let universe = TempUniverse::builder().blocklist(&["X"]).build().unwrap();
    let harness = Harness::new(universe, source);

    let builder = harness.builder();
    builder.add(cran("A", "1.0")).unwrap();
    let graph = builder.build().await.unwrap();

    assert!(graph.is_empty());
}

#[tokio::test]
async fn test_build_order_puts_dependencies_first() {
    let source = StaticMetadataSource::new()
        .with_package(cran("A", "1.0"), vec![dep("B", "1.0"), optional_dep("Z", "1.0")])
        .with_package(cran("B", "1.0"), vec![dep("C", "1.0")])
        .with_package(cran("Z", "1.0"), vec![dep("A", "1.0")]);
    let harness = Harness::new(TempUniverse::empty().unwrap(), source);

    let builder = harness.builder();
    builder.add(cran("A", "1.0")).unwrap();
    let graph = builder.build().await.unwrap();

    let order: Vec<Vec<String>> = graph
        .build_order()
        .iter()
        .map(|group| group.iter().map(|n| n.id().name().to_string()).collect())
        .collect();
    let position = |name: &str| {
        order
            .iter()
            .position(|g| g.contains(&name.to_string()))
            .unwrap()
    };

    assert_eq!(order.len(), 4);
    assert!(position("C") < position("B"));
    assert!(position("B") < position("A"));
    assert!(position("A") < position("Z"));
}

#[tokio::test]
async fn test_second_run_uses_cache() {
    let source = StaticMetadataSource::new()
        .with_package(cran("A", "1.0"), vec![dep("B", "1.0")])
        .with_package(cran("B", "1.0"), vec![]);
    let harness = Harness::new(TempUniverse::empty().unwrap(), source);

    let first = harness.builder();
    first.add(cran("A", "1.0")).unwrap();
    first.build().await.unwrap();
    assert_eq!(harness.source.total_calls(), 2);

    let second = harness.builder();
    second.add(cran("A", "1.0")).unwrap();
    let graph = second.build().await.unwrap();

    assert_eq!(names(&graph), vec!["A", "B"]);
    assert_eq!(harness.source.total_calls(), 2);
    assert_eq!(second.stats().snapshot().cache_hits, 2);
}

#[tokio::test]
async fn test_service_failure_fails_build() {
    let source = StaticMetadataSource::new()
        .with_package(cran("A", "1.0"), vec![dep("B", "1.0")])
        .with_failure(cran("B", "1.0"), 503);
    let harness = Harness::new(TempUniverse::empty().unwrap(), source);

    let builder = harness.builder();
    builder.add(cran("A", "1.0")).unwrap();
    let err = builder.build().await.unwrap_err();

    match err {
        GraphError::Resolution { id, .. } => assert_eq!(id, cran("B", "1.0")),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_add_filter_with_triplet() {
    let harness = Harness::new(TempUniverse::empty().unwrap(), StaticMetadataSource::new());
    let builder = harness.builder();

    let added = builder.add_filter("org.renjin.cran:MASS:7.3-51.4", None).await;
    assert_eq!(added.unwrap(), 1);
    assert!(builder.node(&PackageId::cran("MASS")).is_some());
    assert!(builder.add_filter("org.renjin.cran:MASS", None).await.is_err());
}

#[tokio::test]
async fn test_add_filter_queries_and_samples() {
    let listed: Vec<_> = (0..50).map(|i| cran(&format!("pkg{i}"), "1.0")).collect();
    let source = StaticMetadataSource::new().with_package_list("cran/latest", listed);
    let harness = Harness::new(TempUniverse::empty().unwrap(), source);

    let all = harness.builder();
    assert_eq!(all.add_filter("cran/latest", None).await.unwrap(), 50);
    assert_eq!(all.build().await.unwrap().len(), 50);

    let none = harness.builder();
    assert_eq!(none.add_filter("cran/latest", Some(0.0)).await.unwrap(), 0);
    assert!(none.is_empty());

    let invalid = harness.builder();
    assert!(matches!(
        invalid.add_filter("cran/latest", Some(-1.0)).await,
        Err(GraphError::InvalidSampleRate { .. })
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_add_filter_seeds_that_depend_on_later_seeds() {
    const HALF: usize = 10_000;
    let listed: Vec<_> = (0..2 * HALF)
        .map(|i| cran(&format!("pkg{i}"), "1.0"))
        .collect();
    let source = (0..HALF).fold(
        StaticMetadataSource::new().with_package_list("cran/latest", listed),
        |source, i| {
            source.with_package(
                cran(&format!("pkg{i}"), "1.0"),
                vec![dep(&format!("pkg{}", i + HALF), "1.0")],
            )
        },
    );
    let harness = Harness::new(TempUniverse::empty().unwrap(), source);

    let builder = harness.builder();
    assert_eq!(builder.add_filter("cran/latest", None).await.unwrap(), 2 * HALF);
    let graph = builder.build().await.unwrap();

    assert_eq!(graph.len(), 2 * HALF);
    assert_eq!(harness.source.total_calls(), 2 * HALF);
    assert_eq!(graph.dependencies_of(&PackageId::cran("pkg0")).len(), 1);
}

#[tokio::test]
async fn test_package_list_round_trip() {
    let source = StaticMetadataSource::new().with_package(
        cran("A", "1.0"),
        vec![dep("Matrix", "1.2-6"), replaced_dep("stats", "3.5", "3.5-b7")],
    );
    let universe = TempUniverse::builder().replacement("Matrix").build().unwrap();
    let harness = Harness::new(universe, source);

    let builder = harness.builder();
    builder.add(cran("A", "1.0")).unwrap();
    let graph = builder.build().await.unwrap();

    let path = harness.universe.config().package_list_file();
    assert_eq!(package_list::write(&graph, &path).unwrap(), 3);
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "org.renjin.cran:A:1.0\n\
         org.renjin.cran:Matrix:1.2-6*\n\
         org.renjin.cran:stats:3.5-b7*\n"
    );

    let entries = package_list::read(&path).unwrap();
    let prebuilt: Vec<_> = entries
        .iter()
        .filter(|e| e.prebuilt)
        .map(|e| e.id.name().to_string())
        .collect();
    assert_eq!(prebuilt, vec!["Matrix", "stats"]);
}
