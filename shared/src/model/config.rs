use std::collections::HashMap;
use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::model::container::Container;
use crate::model::volume::Volume;

/// Raw, unresolved contents of a constellation file.
///
/// This is pure data: no merging of `require`d files, no cross-reference
/// validation, no override application. All of that is `engine::config`'s
/// job, which walks a `Config` tree and produces a fully-resolved one
/// (spec.md §4 "Config resolution").
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub containers: HashMap<String, Container>,
    #[serde(default)]
    pub volumes: HashMap<String, Volume>,
    /// A bare string or a list of strings (spec.md §6): `require: foo.yaml`
    /// and `require: [foo.yaml, bar.yaml]` both deserialize here.
    #[serde(default, deserialize_with = "string_or_list")]
    pub require: Vec<String>,
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, v: &str) -> Result<Vec<String>, E>
        where
            E: de::Error,
        {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Vec<String>, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            let mut out = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                out.push(item);
            }
            Ok(out)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

impl Config {
    /// Copies each map key down into its value's `name` field. `serde`
    /// has no notion of "the key I was parsed under", so this has to run
    /// once right after deserialization.
    pub fn fill_names(&mut self) {
        for (name, container) in self.containers.iter_mut() {
            container.name = name.clone();
        }
        for (name, volume) in self.volumes.iter_mut() {
            volume.name = name.clone();
        }
    }
}
