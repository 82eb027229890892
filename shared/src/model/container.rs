use std::collections::HashMap;
use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::model::state_condition::StateConditions;

/// Declarative definition of a container within a constellation.
///
/// `depends_on` and mount volume names are resolved against the surrounding
/// `Config` (§3 "Ownership": dependency targets are owned by the `Config`,
/// not embedded here as pointers — see DESIGN.md's note on the original
/// source's back-reference design).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Container {
    #[serde(skip)]
    pub name: String,
    pub image: String,
    #[serde(default)]
    pub exec: Option<String>,
    #[serde(default)]
    pub environment: HashMap<String, String>,
    #[serde(default)]
    pub mounts: Vec<Mount>,
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub state_conditions: StateConditions,
}

/// A `(volume_name, container_path)` pair. Purely declarative until the
/// engine resolves `volume` against the surrounding `Config`'s volume set.
///
/// Config files write this as a single `"volume:path"` string (spec.md §6),
/// so (de)serialization goes straight to/from that form rather than a
/// nested mapping.
#[derive(Debug, Clone)]
pub struct Mount {
    pub volume: String,
    pub path: String,
}

impl Mount {
    /// Parses a `volume:path` string as accepted in the `mounts:` stanza.
    pub fn parse(spec: &str) -> Option<Mount> {
        let (volume, path) = spec.split_once(':')?;
        Some(Mount {
            volume: volume.to_string(),
            path: path.to_string(),
        })
    }
}

impl<'de> Deserialize<'de> for Mount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MountVisitor;

        impl<'de> Visitor<'de> for MountVisitor {
            type Value = Mount;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string in the form \"volume:path\"")
            }

            fn visit_str<E>(self, v: &str) -> Result<Mount, E>
            where
                E: de::Error,
            {
                Mount::parse(v).ok_or_else(|| {
                    de::Error::custom(format!(
                        "mount strings need to be in the format <volume>:<path>, got \"{}\"",
                        v
                    ))
                })
            }
        }

        deserializer.deserialize_str(MountVisitor)
    }
}

impl Serialize for Mount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{}:{}", self.volume, self.path))
    }
}
