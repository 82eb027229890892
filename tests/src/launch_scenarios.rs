//! End-to-end coverage of the launch engine's per-container race and
//! topological launch order (spec.md §4.5, §5, §8 scenarios S1/S3/S4/S5
//! and testable property 10), driven against `support::FakeRuntime`
//! instead of a real container daemon.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use engine::launch::LaunchContext;
use engine::runtime::PodState;
use shared::model::{ExitCondition, OutputCondition, OutputSource, Status, TimeoutCondition};
use shared::Error;

use crate::support::{container, FakeRuntime};

fn ctx(project_name: &str, containers: HashMap<String, shared::model::Container>, runtime: Arc<FakeRuntime>) -> LaunchContext {
    LaunchContext {
        project_name: project_name.to_string(),
        net_config_path: std::env::temp_dir(),
        containers,
        volumes: HashMap::new(),
        hosts_entries: vec![],
        runtime,
    }
}

/// S1 — linear chain success: `db`, then `api` depending on it, both
/// gated on an `Output` regex. Expected order `[db, api]`, both verdicts
/// `nil`, both processes still alive at the end.
#[tokio::test]
async fn s1_linear_chain_success() {
    let mut db = container("db", "echo READY && sleep 5", &[]);
    db.state_conditions.outputs.push(OutputCondition {
        source: OutputSource::Stdout,
        regex: "READY".to_string(),
        status: Status::Success,
    });

    let mut api = container("api", "echo READY && sleep 5", &["db"]);
    api.state_conditions.outputs.push(OutputCondition {
        source: OutputSource::Stdout,
        regex: "READY".to_string(),
        status: Status::Success,
    });

    let mut containers = HashMap::new();
    containers.insert("db".to_string(), db);
    containers.insert("api".to_string(), api);

    let order = engine::resolver::topological_order(&containers).unwrap();
    assert_eq!(order, vec!["db", "api"]);

    let runtime = Arc::new(FakeRuntime::new());
    let context = ctx("s1", containers, runtime.clone());

    engine::launch::launch_all(&context, &order).await.unwrap();

    let pods = runtime.list_pods("s1").await.unwrap();
    assert_eq!(pods.len(), 2);
    assert!(pods.values().all(|p| p.state == PodState::Running));
}

/// S3 — a dependency allowed to exit successfully is not required to be
/// running for its dependent to launch.
#[tokio::test]
async fn s3_allowed_exit_permits_missing_dependency() {
    let mut init = container("init", "exit 0", &[]);
    init.state_conditions.exit = Some(ExitCondition {
        codes: HashSet::from([0]),
        status: Status::Success,
    });

    let mut app = container("app", "echo UP && sleep 5", &["init"]);
    app.state_conditions.outputs.push(OutputCondition {
        source: OutputSource::Stdout,
        regex: "UP".to_string(),
        status: Status::Success,
    });

    let mut containers = HashMap::new();
    containers.insert("init".to_string(), init);
    containers.insert("app".to_string(), app);

    let order = engine::resolver::topological_order(&containers).unwrap();
    assert_eq!(order, vec!["init", "app"]);

    let runtime = Arc::new(FakeRuntime::new());
    let context = ctx("s3", containers, runtime.clone());

    engine::launch::launch_all(&context, &order).await.unwrap();

    let pods = runtime.list_pods("s3").await.unwrap();
    assert_eq!(pods["s3-init"].state, PodState::Exited);
    assert_eq!(pods["s3-app"].state, PodState::Running);
}

/// S4 — an `Output` success and a `Timeout` failure race; whichever
/// fires first wins.
#[tokio::test]
async fn s4_output_wins_race_against_timeout() {
    let mut c = container("c", "sleep 0.3 && echo OK && sleep 5", &[]);
    c.state_conditions.timeout = Some(TimeoutCondition {
        duration_seconds: 2,
        status: Status::Failure,
    });
    c.state_conditions.outputs.push(OutputCondition {
        source: OutputSource::Stdout,
        regex: "OK".to_string(),
        status: Status::Success,
    });

    let mut containers = HashMap::new();
    containers.insert("c".to_string(), c);
    let order = vec!["c".to_string()];

    let runtime = Arc::new(FakeRuntime::new());
    let context = ctx("s4a", containers, runtime);

    let start = Instant::now();
    engine::launch::launch_all(&context, &order).await.unwrap();
    assert!(
        start.elapsed() < Duration::from_secs(2),
        "the output monitor should have won well before the 2s timeout"
    );
}

#[tokio::test]
async fn s4_timeout_wins_when_output_never_arrives() {
    let mut c = container("c", "sleep 5", &[]);
    c.state_conditions.timeout = Some(TimeoutCondition {
        duration_seconds: 1,
        status: Status::Failure,
    });
    c.state_conditions.outputs.push(OutputCondition {
        source: OutputSource::Stdout,
        regex: "OK".to_string(),
        status: Status::Success,
    });

    let mut containers = HashMap::new();
    containers.insert("c".to_string(), c);
    let order = vec!["c".to_string()];

    let runtime = Arc::new(FakeRuntime::new());
    let context = ctx("s4b", containers, runtime);

    let result = engine::launch::launch_all(&context, &order).await;
    assert!(matches!(result, Err(Error::MonitorFailure(_))));
}

/// S5 — a mid-chain failure aborts every container after it, but leaves
/// already-launched containers running.
#[tokio::test]
async fn s5_failure_aborts_remaining_containers() {
    let mut a = container("a", "echo READY && sleep 2", &[]);
    a.state_conditions.outputs.push(OutputCondition {
        source: OutputSource::Stdout,
        regex: "READY".to_string(),
        status: Status::Success,
    });

    let mut b = container("b", "exit 0", &[]);
    b.state_conditions.exit = Some(ExitCondition {
        codes: HashSet::from([0]),
        status: Status::Failure,
    });

    let c = container("c", "echo should-not-run && sleep 2", &[]);

    let mut containers = HashMap::new();
    containers.insert("a".to_string(), a);
    containers.insert("b".to_string(), b);
    containers.insert("c".to_string(), c);

    let order = engine::resolver::topological_order(&containers).unwrap();
    assert_eq!(order, vec!["a", "b", "c"]);

    let runtime = Arc::new(FakeRuntime::new());
    let context = ctx("s5", containers, runtime.clone());

    let result = engine::launch::launch_all(&context, &order).await;
    assert!(matches!(result, Err(Error::MonitorFailure(_))));

    assert_eq!(
        runtime.spawned_argv().len(),
        2,
        "c must never be spawned once b's verdict fails"
    );

    let pods = runtime.list_pods("s5").await.unwrap();
    assert_eq!(pods["s5-a"].state, PodState::Running, "a is left running after the abort");
}

/// Testable property 10 — the dependency IP walk collects every
/// transitively reachable dependency's IP exactly once.
#[tokio::test]
async fn dependency_ip_walk_collects_transitive_ips_once_each() {
    let a = container("a", "sleep 5", &["b"]);
    let b = container("b", "sleep 5", &["c"]);
    let c = container("c", "sleep 5", &[]);

    let mut containers = HashMap::new();
    containers.insert("a".to_string(), a);
    containers.insert("b".to_string(), b);
    containers.insert("c".to_string(), c);

    let order = engine::resolver::topological_order(&containers).unwrap();
    assert_eq!(order, vec!["c", "b", "a"]);

    let runtime = Arc::new(FakeRuntime::new());
    let context = ctx("dep", containers, runtime.clone());

    engine::launch::launch_all(&context, &order).await.unwrap();

    let pods = runtime.list_pods("dep").await.unwrap();
    let b_ip = pods["dep-b"].networks[0].ip.clone();
    let c_ip = pods["dep-c"].networks[0].ip.clone();

    let argvs = runtime.spawned_argv();
    let a_argv = argvs.last().expect("a should have been spawned last");

    let b_entry = format!("--hosts-entry={}={}", b_ip, "b");
    let c_entry = format!("--hosts-entry={}={}", c_ip, "c");
    assert_eq!(a_argv.iter().filter(|t| **t == b_entry).count(), 1);
    assert_eq!(a_argv.iter().filter(|t| **t == c_entry).count(), 1);
}
