//! Placement group brief.

use crate::OsdId;

/// The brief placement group dump: one entry per placement group.
pub type PgBrief = Vec<PgBriefEntry>;

/// Separator between concurrent condition flags in a state string.
pub const STATE_SEPARATOR: char = '+';

/// One placement group as reported by the brief dump.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PgBriefEntry {
    /// `<pool_id>.<shard>`, e.g. `"1.2f"`.
    pub pgid: String,

    /// OSDs currently serving this placement group.
    pub acting: Vec<OsdId>,

    /// OSDs the placement group maps to.
    #[cfg_attr(feature = "serde", serde(default))]
    pub up: Vec<OsdId>,

    /// `+`-joined condition flags, e.g. `"active+clean"`.
    pub state: String,
}

impl PgBriefEntry {
    /// Create an entry whose up set equals its acting set.
    pub fn new(pgid: impl Into<String>, acting: Vec<OsdId>, state: impl Into<String>) -> Self {
        Self {
            pgid: pgid.into(),
            up: acting.clone(),
            acting,
            state: state.into(),
        }
    }

    /// Iterate the individual condition flags of the state string, in order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.state.split(STATE_SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_split() {
        let pg = PgBriefEntry::new("2.0", vec![1, 2], "active+recovering+degraded");
        let labels: Vec<&str> = pg.labels().collect();
        assert_eq!(labels, vec!["active", "recovering", "degraded"]);
    }

    #[test]
    fn test_single_label() {
        let pg = PgBriefEntry::new("2.1", vec![], "creating");
        assert_eq!(pg.labels().collect::<Vec<_>>(), vec!["creating"]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_brief() {
        let json = r#"[
            {"pgid": "0.1", "acting": [0, 2], "up": [0, 2], "state": "active+clean",
             "up_primary": 0, "acting_primary": 0}
        ]"#;
        let brief: PgBrief = serde_json::from_str(json).unwrap();
        assert_eq!(brief[0].acting, vec![0, 2]);
        assert_eq!(brief[0].state, "active+clean");
    }
}
