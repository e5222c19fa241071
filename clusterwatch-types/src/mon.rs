//! Monitor status - the monitor map and the current quorum.

/// Snapshot of monitor status.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonStatus {
    pub monmap: MonMap,

    /// Ranks currently participating in consensus.
    pub quorum: Vec<u32>,
}

impl MonStatus {
    /// Build a status with one anonymous monitor per rank.
    pub fn new(ranks: impl IntoIterator<Item = u32>, quorum: Vec<u32>) -> Self {
        Self {
            monmap: MonMap {
                mons: ranks.into_iter().map(MonInfo::new).collect(),
            },
            quorum,
        }
    }

    /// Whether the given rank is in quorum.
    pub fn in_quorum(&self, rank: u32) -> bool {
        self.quorum.contains(&rank)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonMap {
    pub mons: Vec<MonInfo>,
}

/// A monitor entry of the monitor map.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonInfo {
    pub rank: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub addr: String,
}

impl MonInfo {
    pub fn new(rank: u32) -> Self {
        Self {
            rank,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_quorum() {
        let status = MonStatus::new([0, 1, 2], vec![0, 2]);
        assert_eq!(status.monmap.mons.len(), 3);
        assert!(status.in_quorum(2));
        assert!(!status.in_quorum(1));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_status() {
        let json = r#"{
            "name": "a", "rank": 0, "state": "leader",
            "monmap": {"epoch": 1, "mons": [
                {"rank": 0, "name": "a", "addr": "10.0.0.1:6789/0"},
                {"rank": 1, "name": "b", "addr": "10.0.0.2:6789/0"}
            ]},
            "quorum": [0]
        }"#;
        let status: MonStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status.monmap.mons[1].name, "b");
        assert_eq!(status.quorum, vec![0]);
    }
}
