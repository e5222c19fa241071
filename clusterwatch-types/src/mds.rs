//! Metadata server map.

/// Snapshot of the metadata server map.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MdsMap {
    /// Number of active metadata server ranks the filesystem is configured for.
    pub max_mds: u32,

    /// Daemons that are up. The cluster reports this as a `name -> gid`
    /// object; a plain list is accepted as well.
    #[cfg_attr(
        feature = "serde",
        serde(deserialize_with = "crate::serde_helpers::seq_or_map_values")
    )]
    pub up: Vec<u64>,

    /// Ranks that are in.
    #[cfg_attr(feature = "serde", serde(rename = "in"))]
    pub in_: Vec<u64>,
}

impl MdsMap {
    pub fn num_up(&self) -> usize {
        self.up.len()
    }

    pub fn num_in(&self) -> usize {
        self.in_.len()
    }
}
