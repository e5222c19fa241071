//! Artifact kinds - the type keys raw snapshots are filed under.

use core::fmt;

/// The type key of a raw snapshot artifact.
///
/// Derivations declare their inputs as a set of kinds; the snake_case
/// [`name`](ArtifactKind::name) is also the key used in JSON bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ArtifactKind {
    /// Object storage daemon map ([`OsdMap`](crate::OsdMap)).
    OsdMap,
    /// Placement group brief ([`PgBrief`](crate::PgBrief)).
    PgBrief,
    /// Crush topology tree ([`OsdTree`](crate::OsdTree)).
    OsdTree,
    /// Metadata server map ([`MdsMap`](crate::MdsMap)).
    MdsMap,
    /// Monitor status ([`MonStatus`](crate::MonStatus)).
    MonStatus,
}

impl ArtifactKind {
    /// Every kind, in bundle order.
    pub const ALL: [ArtifactKind; 5] = [
        ArtifactKind::OsdMap,
        ArtifactKind::PgBrief,
        ArtifactKind::OsdTree,
        ArtifactKind::MdsMap,
        ArtifactKind::MonStatus,
    ];

    /// Stable snake_case name of this kind.
    pub const fn name(&self) -> &'static str {
        match self {
            ArtifactKind::OsdMap => "osd_map",
            ArtifactKind::PgBrief => "pg_brief",
            ArtifactKind::OsdTree => "osd_tree",
            ArtifactKind::MdsMap => "mds_map",
            ArtifactKind::MonStatus => "mon_status",
        }
    }

    /// Look a kind up by its snake_case name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_lookup() {
        for kind in ArtifactKind::ALL {
            assert_eq!(ArtifactKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ArtifactKind::from_name("pg_dump"), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_name_matches() {
        let json = serde_json::to_string(&ArtifactKind::MonStatus).unwrap();
        assert_eq!(json, "\"mon_status\"");
    }
}
