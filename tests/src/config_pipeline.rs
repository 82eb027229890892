//! End-to-end coverage of config loading: `require` resolution and merge
//! semantics, override application, and cross-reference validation
//! (spec.md §6, §8 properties 2 and 8), exercised through real temp files
//! rather than hand-built `Config` values.

use std::path::Path;

use engine::config::{load, LoadOptions};
use shared::Error;
use tempfile::tempdir;

fn write(path: &Path, contents: &str) {
    std::fs::write(path, contents).unwrap();
}

fn base_opts(constellation_file: std::path::PathBuf) -> LoadOptions {
    LoadOptions {
        constellation_file,
        include_dirs: vec![],
        image_overrides: vec![],
        volume_overrides: vec![],
        hosts_entries: vec![],
    }
}

#[tokio::test]
async fn require_merges_included_file_keeping_root_on_conflict() {
    let dir = tempdir().unwrap();

    write(
        &dir.path().join("included.yaml"),
        r#"
containers:
  shared_name:
    image: included-image
  only_in_included:
    image: included-only
"#,
    );

    let root_path = dir.path().join("root.yaml");
    write(
        &root_path,
        r#"
require: included.yaml
containers:
  shared_name:
    image: root-image
"#,
    );

    let mut opts = base_opts(root_path);
    opts.include_dirs = vec![dir.path().to_path_buf()];

    let resolved = load(&opts).await.unwrap();

    assert_eq!(resolved.containers.len(), 2);
    assert_eq!(resolved.containers["shared_name"].image, "root-image");
    assert_eq!(resolved.containers["only_in_included"].image, "included-only");
}

#[tokio::test]
async fn require_list_form_merges_every_entry() {
    let dir = tempdir().unwrap();

    write(&dir.path().join("a.yaml"), "containers:\n  a:\n    image: a-image\n");
    write(&dir.path().join("b.yaml"), "containers:\n  b:\n    image: b-image\n");

    let root_path = dir.path().join("root.yaml");
    write(&root_path, "require:\n  - a.yaml\n  - b.yaml\ncontainers: {}\n");

    let mut opts = base_opts(root_path);
    opts.include_dirs = vec![dir.path().to_path_buf()];

    let resolved = load(&opts).await.unwrap();
    assert_eq!(resolved.containers.len(), 2);
    assert_eq!(resolved.containers["a"].image, "a-image");
    assert_eq!(resolved.containers["b"].image, "b-image");
}

#[tokio::test]
async fn image_override_applies_through_full_load_pipeline() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("c.yaml");
    write(
        &path,
        "containers:\n  app:\n    image: registry.example.com/myapp:v1\n",
    );

    let mut opts = base_opts(path);
    opts.image_overrides = vec!["myapp:v2".to_string()];

    let resolved = load(&opts).await.unwrap();
    assert_eq!(resolved.containers["app"].image, "registry.example.com/myapp:v2");
}

#[tokio::test]
async fn volume_override_replaces_host_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("c.yaml");
    write(
        &path,
        "containers: {}\nvolumes:\n  data:\n    path: /var/data\n",
    );

    let mut opts = base_opts(path);
    opts.volume_overrides = vec!["data:/srv/data".to_string()];

    let resolved = load(&opts).await.unwrap();
    assert_eq!(resolved.volumes["data"].path, "/srv/data");
}

#[tokio::test]
async fn unknown_mount_volume_fails_validation() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("c.yaml");
    write(
        &path,
        "containers:\n  app:\n    image: img\n    mounts:\n      - \"ghost:/data\"\n",
    );

    let opts = base_opts(path);
    let err = load(&opts).await.unwrap_err();
    assert!(matches!(err, Error::Reference { .. }));
}

#[tokio::test]
async fn file_monitor_outside_any_mount_fails_validation() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("c.yaml");
    write(
        &path,
        r#"
containers:
  app:
    image: img
    mounts:
      - "v:/in-container"
    state_conditions:
      filemonitor:
        - file: /elsewhere/app.log
          regex: READY
          status: success
volumes:
  v:
    path: /host/v
"#,
    );

    let opts = base_opts(path);
    let err = load(&opts).await.unwrap_err();
    assert!(matches!(err, Error::Reference { .. }));
}

#[tokio::test]
async fn missing_required_file_is_a_config_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("c.yaml");
    write(&path, "require: does-not-exist.yaml\ncontainers: {}\n");

    let opts = base_opts(path);
    let err = load(&opts).await.unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}
