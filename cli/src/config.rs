//! Process-level settings loaded once at startup (spec.md §6, §9 "Global
//! mutable state" — an explicit value threaded through the engine, not a
//! module-level config). Loaded from the environment the way the
//! teacher's `cli/src/config.rs` loads its server URL, with the recognized
//! keys from spec.md §6's table.

use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub project_name: String,
    pub net_config_path: PathBuf,
    pub constellation_file: PathBuf,
    pub include_dirs: Vec<PathBuf>,
    pub image_overrides: Vec<String>,
    pub volume_overrides: Vec<String>,
    pub hosts_entries: Vec<String>,
    pub runtime_bin: String,
}

impl Config {
    pub fn from_env() -> Self {
        let project_name =
            env::var("CONSTELLATION_PROJECT_NAME").unwrap_or_else(|_| "constellation".to_string());

        let net_config_path = env::var("CONSTELLATION_NET_CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/etc/constellation"));

        let constellation_file = env::var("CONSTELLATION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("constellation.yaml"));

        let include_dirs = split_env("CONSTELLATION_INCLUDE_DIRS")
            .into_iter()
            .map(PathBuf::from)
            .collect();

        let image_overrides = split_env("CONSTELLATION_IMAGE_OVERRIDES");
        let volume_overrides = split_env("CONSTELLATION_VOLUME_OVERRIDES");
        let hosts_entries = split_env("CONSTELLATION_HOSTS_ENTRIES");

        let runtime_bin =
            env::var("CONSTELLATION_RUNTIME_BIN").unwrap_or_else(|_| "docker".to_string());

        Config {
            project_name,
            net_config_path,
            constellation_file,
            include_dirs,
            image_overrides,
            volume_overrides,
            hosts_entries,
            runtime_bin,
        }
    }
}

fn split_env(key: &str) -> Vec<String> {
    env::var(key)
        .ok()
        .map(|raw| {
            raw.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}
