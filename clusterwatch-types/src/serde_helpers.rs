//! Lenient deserializers for fields the cluster encodes inconsistently.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

/// Accept a boolean or an integer flag (`0` is false, anything else true).
pub(crate) fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(i) => i != 0,
    })
}

/// Accept either a list of ids or a `name -> id` object, keeping the ids.
pub(crate) fn seq_or_map_values<'de, D>(deserializer: D) -> Result<Vec<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Members {
        List(Vec<u64>),
        Named(BTreeMap<String, u64>),
    }

    Ok(match Members::deserialize(deserializer)? {
        Members::List(ids) => ids,
        Members::Named(named) => named.into_values().collect(),
    })
}
