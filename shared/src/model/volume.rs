use serde::{Deserialize, Serialize};

/// Location that mounts mount from on the host machine.
///
/// Lifecycle: created on disk before any container that mounts it starts
/// (`Volume::create_dir`, spec.md §3); never destroyed by this system.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Volume {
    #[serde(skip)]
    pub name: String,
    #[serde(default = "default_kind")]
    pub kind: String,
    pub path: String,
    #[serde(default)]
    pub uid: Option<u32>,
    #[serde(default)]
    pub gid: Option<u32>,
    #[serde(default)]
    pub mode: Option<u32>,
}

fn default_kind() -> String {
    "host".to_string()
}

impl Volume {
    /// Creates the host-path directory for a `host`-kind volume if it does
    /// not already exist. A no-op for other kinds. Grounded on the original
    /// source's `types.Volume.CreateDir`.
    pub fn create_dir(&self) -> std::io::Result<()> {
        if self.kind == "host" {
            std::fs::create_dir_all(&self.path)?;
            #[cfg(unix)]
            if let Some(mode) = self.mode {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(mode))?;
            }
        }
        Ok(())
    }
}
