//! End-to-end tests of resource cleanup against a scripted spawner.

mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use common::{test_environment, MockSpawner};
use jvm_launcher::{EnvTokenAuthenticator, Error, MapEnvironment, ResourceCleanupLauncher};

fn authenticator() -> Arc<EnvTokenAuthenticator> {
    Arc::new(EnvTokenAuthenticator::new(Arc::new(MapEnvironment::new())))
}

const OBR: &str = "mvn:dev.galasa/dev.galasa.uber.obr/0.43.0/obr";

#[smol_potat::test]
async fn cleanup_returns_once_the_jvm_exits() {
    let home_dir = tempfile::tempdir().unwrap();
    let spawner = Arc::new(MockSpawner::immediate(vec![], 0));
    let env = test_environment(spawner, home_dir.path());
    let launcher = ResourceCleanupLauncher::new(
        env,
        authenticator(),
        vec![OBR.to_string()],
        vec![],
        vec![],
    );

    launcher.run_resource_cleanup().await.unwrap();
}

#[smol_potat::test]
async fn cleanup_wakes_promptly_when_the_jvm_finishes_mid_interval() {
    let home_dir = tempfile::tempdir().unwrap();
    let (spawner, gate) = MockSpawner::gated(vec![], 0);
    let env = test_environment(Arc::new(spawner), home_dir.path());
    let launcher = ResourceCleanupLauncher::new(
        env,
        authenticator(),
        vec![OBR.to_string()],
        vec![],
        vec![],
    );

    let opener = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(200));
        gate.open();
    });

    // The poll interval is 30 seconds. Finishing well inside that shows
    // the completion interrupt cut the sleep short.
    let start = Instant::now();
    launcher.run_resource_cleanup().await.unwrap();
    assert!(
        start.elapsed() < Duration::from_secs(25),
        "cleanup waited out the full poll interval instead of waking early"
    );
    opener.join().unwrap();
}

#[smol_potat::test]
async fn cleanup_command_carries_the_monitor_patterns() {
    let home_dir = tempfile::tempdir().unwrap();
    let spawner = Arc::new(MockSpawner::immediate(vec![], 0));
    let records = spawner.spawn_records();
    let env = test_environment(spawner, home_dir.path());
    let launcher = ResourceCleanupLauncher::new(
        env,
        authenticator(),
        vec![OBR.to_string()],
        vec!["dev.galasa.*".to_string()],
        vec!["*ExcludeMe".to_string()],
    );

    launcher.run_resource_cleanup().await.unwrap();

    let records = records.lock().unwrap();
    assert_eq!(records.len(), 1);
    let args = &records[0].args;
    assert!(args.contains(&"--local-resource-management".to_string()));
    let include_index = args
        .iter()
        .position(|a| a == "--includes-monitor-pattern")
        .unwrap();
    assert_eq!(args[include_index + 1], "dev.galasa.*");
    let exclude_index = args
        .iter()
        .position(|a| a == "--excludes-monitor-pattern")
        .unwrap();
    assert_eq!(args[exclude_index + 1], "*ExcludeMe");
}

#[smol_potat::test]
async fn cleanup_failure_exit_code_is_not_surfaced() {
    let home_dir = tempfile::tempdir().unwrap();
    let spawner = Arc::new(MockSpawner::immediate(vec![], 9));
    let env = test_environment(spawner, home_dir.path());
    let launcher = ResourceCleanupLauncher::new(
        env,
        authenticator(),
        vec![OBR.to_string()],
        vec![],
        vec![],
    );

    // The JVM finishing badly is logged, not returned.
    launcher.run_resource_cleanup().await.unwrap();
}

#[smol_potat::test]
async fn malformed_obr_fails_before_anything_is_spawned() {
    let home_dir = tempfile::tempdir().unwrap();
    let spawner = Arc::new(MockSpawner::immediate(vec![], 0));
    let records = spawner.spawn_records();
    let env = test_environment(spawner, home_dir.path());
    let launcher = ResourceCleanupLauncher::new(
        env,
        authenticator(),
        vec!["mvn:too/few/parts".to_string()],
        vec![],
        vec![],
    );

    let err = launcher.run_resource_cleanup().await.unwrap_err();
    assert!(matches!(err, Error::ObrWrongPartCount { .. }));
    assert!(records.lock().unwrap().is_empty());
}
