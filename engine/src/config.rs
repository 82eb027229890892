//! Config loading, `require` merging, override application, and
//! cross-reference validation (spec.md §4 "Config model", §6, §8
//! properties 2/3/8/9).
//!
//! Grounded on the teacher's `node/src/config.rs` load-from-environment
//! idiom for the shape of a plain, explicitly-constructed config value
//! (spec.md §9 "Global mutable state" — no module-level config here), and
//! on `examples/original_source/config/processor.go`'s `findFile` /
//! `config/config.go`'s `Merge` for require-resolution and merge semantics.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use shared::model::{Config, Container, HostsEntry, Volume};
use shared::Error;

/// The CLI-surface settings table from spec.md §6.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub constellation_file: PathBuf,
    pub include_dirs: Vec<PathBuf>,
    pub image_overrides: Vec<String>,
    pub volume_overrides: Vec<String>,
    pub hosts_entries: Vec<String>,
}

/// A config with `require`s merged, overrides applied, and
/// cross-references validated — ready for the resolver and launch engine.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub containers: HashMap<String, Container>,
    pub volumes: HashMap<String, Volume>,
    pub hosts_entries: Vec<HostsEntry>,
}

pub async fn load(opts: &LoadOptions) -> Result<ResolvedConfig, Error> {
    let mut visited = HashSet::new();
    let mut config = load_and_merge(&opts.constellation_file, &opts.include_dirs, &mut visited).await?;

    apply_image_overrides(&mut config.containers, &opts.image_overrides)?;
    apply_volume_overrides(&mut config.volumes, &opts.volume_overrides)?;
    let hosts_entries = parse_hosts_entries(&opts.hosts_entries)?;

    let resolved = ResolvedConfig {
        containers: config.containers,
        volumes: config.volumes,
        hosts_entries,
    };

    validate(&resolved)?;
    Ok(resolved)
}

/// Loads a single file and recursively merges every file it `require`s,
/// in declaration order, keeping earlier-declared keys on conflict.
async fn load_and_merge(
    path: &Path,
    include_dirs: &[PathBuf],
    visited: &mut HashSet<PathBuf>,
) -> Result<Config, Error> {
    let canonical = path
        .canonicalize()
        .unwrap_or_else(|_| path.to_path_buf());
    if !visited.insert(canonical) {
        return Ok(Config::default());
    }

    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::Config(format!("reading {}: {}", path.display(), e)))?;
    let mut config: Config = serde_yaml::from_str(&raw)
        .map_err(|e| Error::Config(format!("parsing {}: {}", path.display(), e)))?;
    config.fill_names();

    let requires = std::mem::take(&mut config.require);
    for entry in requires {
        let required_path = find_file(&entry, include_dirs)?;
        let required = Box::pin(load_and_merge(&required_path, include_dirs, visited)).await?;
        merge(&mut config, required);
    }

    Ok(config)
}

/// Resolves a `require` entry: the bare path first, then each
/// `includeDirs` entry joined with it, in order (original source's
/// `findFile`).
fn find_file(entry: &str, include_dirs: &[PathBuf]) -> Result<PathBuf, Error> {
    let bare = PathBuf::from(entry);
    if bare.is_file() {
        return Ok(bare);
    }
    for dir in include_dirs {
        let candidate = dir.join(entry);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }
    Err(Error::Config(format!(
        "could not find required file \"{}\" (looked in includeDirs)",
        entry
    )))
}

/// Merges `other` into `base`: base's entries win on name conflicts, and a
/// conflict is logged as a warning rather than treated as an error
/// (spec.md §6, §8 property 8).
fn merge(base: &mut Config, other: Config) {
    for (name, container) in other.containers {
        if base.containers.contains_key(&name) {
            tracing::warn!(container = %name, "duplicate container name during merge, keeping the earlier definition");
        } else {
            base.containers.insert(name, container);
        }
    }
    for (name, volume) in other.volumes {
        if base.volumes.contains_key(&name) {
            tracing::warn!(volume = %name, "duplicate volume name during merge, keeping the earlier definition");
        } else {
            base.volumes.insert(name, volume);
        }
    }
}

/// `[source/]name[:version]` split into its parts.
fn split_image(image: &str) -> (Option<&str>, &str, Option<&str>) {
    let (source, rest) = match image.rfind('/') {
        Some(idx) => (Some(&image[..idx]), &image[idx + 1..]),
        None => (None, image),
    };
    match rest.rfind(':') {
        Some(idx) => (source, &rest[..idx], Some(&rest[idx + 1..])),
        None => (source, rest, None),
    }
}

fn join_image(source: Option<&str>, name: &str, version: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(source) = source {
        out.push_str(source);
        out.push('/');
    }
    out.push_str(name);
    if let Some(version) = version {
        out.push(':');
        out.push_str(version);
    }
    out
}

/// Replaces a container's image when its bare name matches an override's
/// bare name, keeping whatever source/version the override didn't specify
/// (spec.md §6 `imageOverrides`, §8 property/scenario S6).
fn apply_image_overrides(
    containers: &mut HashMap<String, Container>,
    overrides: &[String],
) -> Result<(), Error> {
    for raw in overrides {
        let (override_source, override_name, override_version) = split_image(raw);
        for container in containers.values_mut() {
            let (current_source, current_name, current_version) = split_image(&container.image);
            if current_name != override_name {
                continue;
            }
            let source = override_source.or(current_source);
            let version = override_version.or(current_version);
            container.image = join_image(source, override_name, version);
        }
    }
    Ok(())
}

/// Replaces a volume's host path by name (`volumeOverrides`, `name:path`).
fn apply_volume_overrides(
    volumes: &mut HashMap<String, Volume>,
    overrides: &[String],
) -> Result<(), Error> {
    for raw in overrides {
        let (name, path) = raw.split_once(':').ok_or_else(|| {
            Error::Config(format!(
                "volume overrides need the form <name>:<path>, got \"{}\"",
                raw
            ))
        })?;
        if let Some(volume) = volumes.get_mut(name) {
            volume.path = path.to_string();
        }
    }
    Ok(())
}

fn parse_hosts_entries(raw: &[String]) -> Result<Vec<HostsEntry>, Error> {
    raw.iter()
        .map(|s| {
            HostsEntry::parse(s).ok_or_else(|| {
                Error::Config(format!(
                    "hosts entries need the form <ip>=<name>, got \"{}\"",
                    s
                ))
            })
        })
        .collect()
}

/// Validates mount -> volume references and file-monitor path prefixing
/// (spec.md §8 properties 2/3). `depends_on` -> container references are
/// validated by the resolver, which needs the same walk to build the
/// topological order anyway.
fn validate(config: &ResolvedConfig) -> Result<(), Error> {
    for container in config.containers.values() {
        for mount in &container.mounts {
            if !config.volumes.contains_key(&mount.volume) {
                return Err(Error::Reference {
                    from: container.name.clone(),
                    to: mount.volume.clone(),
                });
            }
        }
        for file_monitor in &container.state_conditions.file_monitors {
            resolve_file_monitor_path(container, &config.volumes, &file_monitor.file)?;
        }
    }
    Ok(())
}

/// Rewrites a file monitor's container-internal path to the host path it
/// actually resides at, by finding the mount whose container path prefixes
/// it (spec.md §3 invariant, §8 property 3).
pub fn resolve_file_monitor_path(
    container: &Container,
    volumes: &HashMap<String, Volume>,
    file: &str,
) -> Result<PathBuf, Error> {
    let mount = container
        .mounts
        .iter()
        .filter(|m| file.starts_with(&m.path))
        .max_by_key(|m| m.path.len())
        .ok_or_else(|| {
            Error::Reference {
                from: format!("{} file monitor \"{}\"", container.name, file),
                to: "a mount path prefix".to_string(),
            }
        })?;

    let volume = volumes.get(&mount.volume).ok_or_else(|| Error::Reference {
        from: container.name.clone(),
        to: mount.volume.clone(),
    })?;

    let relative = file.strip_prefix(&mount.path).unwrap_or("");
    Ok(Path::new(&volume.path).join(relative.trim_start_matches('/')))
}
