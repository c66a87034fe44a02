//! CLI integration tests for cranforge.
//!
//! Commands that talk to the package database run against a wiremock server
//! passed in through `CRANFORGE_PACKAGE_DB_URL`.

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use cranforge_core::ResolvedDependencySet;
use cranforge_test_utils::prelude::*;
use predicates::prelude::*;
use std::process::{Command, Output};

/// Get the cranforge binary command for a universe.
fn cranforge(universe: &TempUniverse) -> Command {
    let mut cmd = Command::new(cargo_bin!("cranforge"));
    cmd.arg("--universe").arg(universe.path());
    for var in ["CRANFORGE_PACKAGE_DB_URL", "CRANFORGE_WORKERS", "CRANFORGE_UNIVERSE", "RUST_LOG"] {
        cmd.env_remove(var);
    }
    cmd
}

/// Run a command off the async runtime so the mock server keeps serving.
async fn output(mut cmd: Command) -> Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

fn set(deps: Vec<cranforge_core::ResolvedDependency>) -> ResolvedDependencySet {
    ResolvedDependencySet::new(deps)
}

#[test]
fn test_help_output() {
    Command::new(cargo_bin!("cranforge"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("dependency graph"))
        .stdout(predicate::str::contains("update-list"))
        .stdout(predicate::str::contains("includes"));
}

#[test]
fn test_version_output() {
    Command::new(cargo_bin!("cranforge"))
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cranforge"));
}

#[test]
fn test_includes_lists_replacements() {
    let universe = TempUniverse::builder()
        .replacement("stats")
        .replacement("Matrix")
        .stray_replacement_dir("scratch")
        .build()
        .unwrap();

    cranforge(&universe)
        .arg("includes")
        .assert()
        .success()
        .stdout("includeBuild '../replacements/Matrix'\nincludeBuild '../replacements/stats'\n");
}

#[test]
fn test_missing_package_lists_fail() {
    let dir = tempfile::tempdir().unwrap();
    Command::new(cargo_bin!("cranforge"))
        .arg("--universe")
        .arg(dir.path())
        .env("CRANFORGE_PACKAGE_DB_URL", "http://127.0.0.1:9")
        .args(["update-list", "org.renjin.cran:MASS:7.3-51.4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_invalid_config_rejected() {
    let universe = TempUniverse::empty().unwrap();
    cranforge(&universe)
        .env("CRANFORGE_PACKAGE_DB_URL", "ftp://packages")
        .args(["resolve", "org.renjin.cran:MASS:7.3-51.4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("packageDbUrl"));
}

#[test]
fn test_resolve_rejects_bad_triplet() {
    let universe = TempUniverse::empty().unwrap();
    cranforge(&universe)
        .args(["resolve", "MASS"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("MASS"));
}

#[tokio::test]
async fn test_update_list_writes_package_list() {
    let universe = TempUniverse::builder()
        .blocklist(&["rJava  # needs a JVM"])
        .replacement("Matrix")
        .build()
        .unwrap();
    let db = MockPackageDatabase::start().await;

    db.register_package_list("cran/latest", &[cran("survey", "3.35-1"), cran("xlsx", "0.6.1")])
        .await;
    db.register_dependencies(
        &cran("survey", "3.35-1"),
        &set(vec![
            dep("MASS", "7.3-51.4"),
            dep("Matrix", "1.2-6"),
            optional_dep("rJava", "0.9-11"),
        ]),
    )
    .await;
    db.register_dependencies(&cran("xlsx", "0.6.1"), &set(vec![dep("rJava", "0.9-11")]))
        .await;
    db.register_dependencies(&cran("MASS", "7.3-51.4"), &set(vec![])).await;
    db.register_dependencies(&cran("rJava", "0.9-11"), &set(vec![])).await;

    let mut cmd = cranforge(&universe);
    cmd.env("CRANFORGE_PACKAGE_DB_URL", db.url())
        .args(["update-list", "cran/latest", "--workers", "2"]);
    output(cmd)
        .await
        .assert()
        .success()
        .stdout(predicate::str::contains("Package count: 3"));

    let list = std::fs::read_to_string(universe.config().package_list_file()).unwrap();
    assert_eq!(
        list,
        "org.renjin.cran:MASS:7.3-51.4\n\
         org.renjin.cran:Matrix:1.2-6*\n\
         org.renjin.cran:survey:3.35-1\n"
    );
}

#[tokio::test]
async fn test_resolve_prints_json_and_caches() {
    let universe = TempUniverse::empty().unwrap();
    let db = MockPackageDatabase::start().await;
    let id = cran("survey", "3.35-1");
    db.register_dependencies(&id, &set(vec![dep("MASS", "7.3-51.4"), unresolved_dep("ghost")]))
        .await;

    for _ in 0..2 {
        let mut cmd = cranforge(&universe);
        cmd.env("CRANFORGE_PACKAGE_DB_URL", db.url())
            .args(["resolve", "org.renjin.cran:survey:3.35-1"]);
        output(cmd)
            .await
            .assert()
            .success()
            .stdout(predicate::str::contains("\"packageVersionId\""))
            .stdout(predicate::str::contains("org.renjin.cran:MASS:7.3-51.4"))
            .stdout(predicate::str::contains("ghost"));
    }

    assert_eq!(db.received_requests().await, 1);
    assert!(
        universe
            .join("packages/cran/survey/survey_3.35-1.dependencies.json")
            .exists()
    );
}

#[tokio::test]
async fn test_order_prints_dependencies_first() {
    let universe = TempUniverse::empty().unwrap();
    let db = MockPackageDatabase::start().await;
    db.register_dependencies(&cran("survey", "3.35-1"), &set(vec![dep("MASS", "7.3-51.4")]))
        .await;
    db.register_dependencies(&cran("MASS", "7.3-51.4"), &set(vec![])).await;

    let mut cmd = cranforge(&universe);
    cmd.env("CRANFORGE_PACKAGE_DB_URL", db.url())
        .args(["order", "org.renjin.cran:survey:3.35-1"]);
    output(cmd)
        .await
        .assert()
        .success()
        .stdout("org.renjin.cran:MASS:7.3-51.4\norg.renjin.cran:survey:3.35-1\n");
}
