//! End-to-end coverage of the network config generator (spec.md §4.7):
//! persistence and reuse across calls, which `engine::network`'s own unit
//! tests don't exercise since they only test `generate` in isolation.

use engine::network::{load_or_generate, InterfaceProbe};
use ipnet::Ipv4Net;
use tempfile::tempdir;

struct NoLocalNetworks;

impl InterfaceProbe for NoLocalNetworks {
    fn local_networks(&self) -> Vec<Ipv4Net> {
        vec![]
    }
}

#[tokio::test]
async fn generates_once_and_reuses_the_persisted_file() {
    let dir = tempdir().unwrap();
    let probe = NoLocalNetworks;

    let first = load_or_generate(dir.path(), "proj", &probe).await.unwrap();

    let conf_path = dir.path().join("net.d").join("proj.conf");
    assert!(conf_path.exists());

    let second = load_or_generate(dir.path(), "proj", &probe).await.unwrap();
    assert_eq!(first.ipam.subnet, second.ipam.subnet);
    assert_eq!(first.bridge, second.bridge);
}

#[tokio::test]
async fn different_projects_get_independent_files() {
    let dir = tempdir().unwrap();
    let probe = NoLocalNetworks;

    load_or_generate(dir.path(), "proj-a", &probe).await.unwrap();
    load_or_generate(dir.path(), "proj-b", &probe).await.unwrap();

    assert!(dir.path().join("net.d").join("proj-a.conf").exists());
    assert!(dir.path().join("net.d").join("proj-b.conf").exists());
}
