use serde::{Deserialize, Serialize};

/// A published container port. `host_port` is filled in by the engine's
/// ephemeral allocator when left unset in the config (spec.md §3, §4).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Port {
    pub name: String,
    #[serde(default = "default_protocol")]
    pub protocol: String,
    pub container_port: u16,
    #[serde(default)]
    pub host_port: Option<u16>,
}

fn default_protocol() -> String {
    "tcp".to_string()
}

/// One `ip name` line added to a container's `/etc/hosts`.
///
/// Config files write this as a single `"ip=name"` string (mirroring the
/// `volume:path` mount shorthand, spec.md §6), so it round-trips through a
/// plain string rather than a mapping.
#[derive(Debug, Clone)]
pub struct HostsEntry {
    pub ip: String,
    pub name: String,
}

impl HostsEntry {
    pub fn parse(spec: &str) -> Option<HostsEntry> {
        let (ip, name) = spec.split_once('=')?;
        Some(HostsEntry {
            ip: ip.to_string(),
            name: name.to_string(),
        })
    }
}

impl<'de> Deserialize<'de> for HostsEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        HostsEntry::parse(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "hosts entries need to be in the format <ip>=<name>, got \"{}\"",
                raw
            ))
        })
    }
}

impl Serialize for HostsEntry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!("{}={}", self.ip, self.name))
    }
}
