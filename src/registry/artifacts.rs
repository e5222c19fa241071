//! The typed artifact set supplied to each run.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clusterwatch_types::{ArtifactKind, MdsMap, MonStatus, OsdMap, OsdTree, PgBrief};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{trace, warn};

use crate::error::ArtifactError;

/// The latest snapshot of each artifact kind.
///
/// A set is frozen for the duration of a run; sources hand out whole sets
/// so a run never mixes artifacts from two snapshot generations.
///
/// Artifacts that were present in a bundle but failed to parse are kept as
/// [`ArtifactError`]s so the units depending on them fail with a useful
/// message while the others still run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArtifactSet {
    osd_map: Option<OsdMap>,
    pg_brief: Option<PgBrief>,
    osd_tree: Option<OsdTree>,
    mds_map: Option<MdsMap>,
    mon_status: Option<MonStatus>,
    malformed: BTreeMap<ArtifactKind, ArtifactError>,
}

impl ArtifactSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON bundle from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading artifact bundle {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("parsing artifact bundle {}", path.display()))
    }

    /// Parse a JSON bundle: an object keyed by artifact kind name.
    ///
    /// Missing or `null` kinds are absent from the set. A kind whose value
    /// does not match its schema is recorded as malformed. Unknown keys are
    /// ignored.
    pub fn parse(content: &str) -> serde_json::Result<Self> {
        let raw: BTreeMap<String, Value> = serde_json::from_str(content)?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(mut raw: BTreeMap<String, Value>) -> Self {
        let mut set = Self::new();
        set.osd_map = set.take(&mut raw, ArtifactKind::OsdMap);
        set.pg_brief = set.take(&mut raw, ArtifactKind::PgBrief);
        set.osd_tree = set.take(&mut raw, ArtifactKind::OsdTree);
        set.mds_map = set.take(&mut raw, ArtifactKind::MdsMap);
        set.mon_status = set.take(&mut raw, ArtifactKind::MonStatus);

        for key in raw.keys() {
            trace!(key = %key, "ignoring unknown bundle key");
        }
        set
    }

    fn take<T: DeserializeOwned>(
        &mut self,
        raw: &mut BTreeMap<String, Value>,
        kind: ArtifactKind,
    ) -> Option<T> {
        match raw.remove(kind.name()) {
            None | Some(Value::Null) => None,
            Some(value) => match serde_json::from_value(value) {
                Ok(artifact) => Some(artifact),
                Err(e) => {
                    warn!(%kind, error = %e, "malformed artifact in bundle");
                    self.malformed
                        .insert(kind, ArtifactError::new(kind, e.to_string()));
                    None
                }
            },
        }
    }

    pub fn with_osd_map(mut self, osd_map: OsdMap) -> Self {
        self.osd_map = Some(osd_map);
        self.malformed.remove(&ArtifactKind::OsdMap);
        self
    }

    pub fn with_pg_brief(mut self, pg_brief: PgBrief) -> Self {
        self.pg_brief = Some(pg_brief);
        self.malformed.remove(&ArtifactKind::PgBrief);
        self
    }

    pub fn with_osd_tree(mut self, osd_tree: OsdTree) -> Self {
        self.osd_tree = Some(osd_tree);
        self.malformed.remove(&ArtifactKind::OsdTree);
        self
    }

    pub fn with_mds_map(mut self, mds_map: MdsMap) -> Self {
        self.mds_map = Some(mds_map);
        self.malformed.remove(&ArtifactKind::MdsMap);
        self
    }

    pub fn with_mon_status(mut self, mon_status: MonStatus) -> Self {
        self.mon_status = Some(mon_status);
        self.malformed.remove(&ArtifactKind::MonStatus);
        self
    }

    pub fn osd_map(&self) -> Option<&OsdMap> {
        self.osd_map.as_ref()
    }

    pub fn pg_brief(&self) -> Option<&PgBrief> {
        self.pg_brief.as_ref()
    }

    pub fn osd_tree(&self) -> Option<&OsdTree> {
        self.osd_tree.as_ref()
    }

    pub fn mds_map(&self) -> Option<&MdsMap> {
        self.mds_map.as_ref()
    }

    pub fn mon_status(&self) -> Option<&MonStatus> {
        self.mon_status.as_ref()
    }

    /// Whether a well-formed artifact of this kind is present.
    pub fn contains(&self, kind: ArtifactKind) -> bool {
        match kind {
            ArtifactKind::OsdMap => self.osd_map.is_some(),
            ArtifactKind::PgBrief => self.pg_brief.is_some(),
            ArtifactKind::OsdTree => self.osd_tree.is_some(),
            ArtifactKind::MdsMap => self.mds_map.is_some(),
            ArtifactKind::MonStatus => self.mon_status.is_some(),
        }
    }

    /// Kinds with a well-formed artifact present.
    pub fn kinds(&self) -> BTreeSet<ArtifactKind> {
        ArtifactKind::ALL
            .into_iter()
            .filter(|kind| self.contains(*kind))
            .collect()
    }

    /// The parse error recorded for a kind, if it was malformed.
    pub fn malformed(&self, kind: ArtifactKind) -> Option<&ArtifactError> {
        self.malformed.get(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.kinds().is_empty() && self.malformed.is_empty()
    }
}
