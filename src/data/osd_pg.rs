//! Cross-referencing placement groups against OSDs.
//!
//! Joins the placement group brief with the OSD map and the crush tree to
//! produce, for every OSD, how many placement groups it serves in each
//! state, which pools it serves, and which host it lives on. Also builds the
//! reverse index from state label to the OSDs touched by placement groups
//! in that state.

use std::collections::{BTreeMap, BTreeSet};

use clusterwatch_types::{ArtifactKind, Osd, OsdId, OsdMap, OsdTree, PgBrief, PgBriefEntry};
use serde::Serialize;
use tracing::debug;

use super::severity::Taxonomy;
use super::topology::HostIndex;
use crate::error::ArtifactError;

/// State label -> OSDs whose acting set includes a placement group in that
/// state. Serialized with sorted lists as values.
pub type StateIndex = BTreeMap<String, BTreeSet<OsdId>>;

/// A placement group with its state split into individual labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PgRecord {
    pub pgid: String,
    pub acting: Vec<OsdId>,
    pub up: Vec<OsdId>,
    pub state: Vec<String>,
}

impl PgRecord {
    pub fn from_entry(entry: &PgBriefEntry) -> Self {
        Self {
            pgid: entry.pgid.clone(),
            acting: entry.acting.clone(),
            up: entry.up.clone(),
            state: entry.labels().map(str::to_string).collect(),
        }
    }

    /// Pool id encoded as the integer prefix of the pgid.
    pub fn pool_id(&self) -> Result<u64, ArtifactError> {
        let (prefix, _) = self.pgid.split_once('.').ok_or_else(|| {
            ArtifactError::new(
                ArtifactKind::PgBrief,
                format!("pgid {:?} has no pool separator", self.pgid),
            )
        })?;
        prefix.parse().map_err(|_| {
            ArtifactError::new(
                ArtifactKind::PgBrief,
                format!("pgid {:?} has a non-numeric pool id", self.pgid),
            )
        })
    }
}

/// An OSD record extended with placement group, pool and host information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedOsd {
    pub id: OsdId,
    pub osd: OsdId,
    pub uuid: String,
    pub up: bool,
    #[serde(rename = "in")]
    pub in_: bool,
    pub up_from: u64,
    pub public_addr: String,
    pub cluster_addr: String,
    pub heartbeat_back_addr: String,
    pub heartbeat_front_addr: String,
    /// Placement groups served per state label. Holds every known label,
    /// zero when the OSD serves no placement group in that state.
    pub pg_states: BTreeMap<String, u64>,
    /// Names of the pools this OSD serves.
    pub pools: BTreeSet<String>,
    /// Host bucket the OSD sits directly under, if any.
    pub host: Option<String>,
}

impl EnrichedOsd {
    fn new(
        osd: &Osd,
        pg_states: BTreeMap<String, u64>,
        pools: BTreeSet<String>,
        host: Option<String>,
    ) -> Self {
        Self {
            id: osd.osd,
            osd: osd.osd,
            uuid: osd.uuid.clone(),
            up: osd.up,
            in_: osd.in_,
            up_from: osd.up_from,
            public_addr: osd.public_addr.clone(),
            cluster_addr: osd.cluster_addr.clone(),
            heartbeat_back_addr: osd.heartbeat_back_addr.clone(),
            heartbeat_front_addr: osd.heartbeat_front_addr.clone(),
            pg_states,
            pools,
            host,
        }
    }
}

/// The cross-referenced OSD/PG view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OsdPgDetailView {
    pub osds: Vec<EnrichedOsd>,
    pub osds_by_pg_state: StateIndex,
    pub pgs: Vec<PgRecord>,
}

/// Cross-reference placement groups with OSDs and topology.
///
/// OSDs are reported in OSD map order. Acting set members missing from the
/// OSD map still show up in the state index. Placement groups of pools
/// missing from the pool directory add no pool names.
///
/// # Errors
///
/// Fails if a pgid lacks an integer pool prefix.
pub fn generate(
    osd_map: &OsdMap,
    pg_brief: &PgBrief,
    osd_tree: &OsdTree,
) -> Result<OsdPgDetailView, ArtifactError> {
    let pgs: Vec<PgRecord> = pg_brief.iter().map(PgRecord::from_entry).collect();

    let pools_by_id: BTreeMap<u64, &str> = osd_map
        .pools
        .iter()
        .map(|p| (p.pool, p.pool_name.as_str()))
        .collect();

    // Every OSD starts with every known label at zero
    let taxonomy = Taxonomy::standard();
    let zeroed: BTreeMap<String, u64> = taxonomy
        .labels()
        .map(str::to_string)
        .chain(pgs.iter().flat_map(|pg| pg.state.iter().cloned()))
        .map(|label| (label, 0))
        .collect();
    let mut pg_states_by_osd: BTreeMap<OsdId, BTreeMap<String, u64>> = osd_map
        .osds
        .iter()
        .map(|osd| (osd.osd, zeroed.clone()))
        .collect();
    let mut pools_by_osd: BTreeMap<OsdId, BTreeSet<String>> = osd_map
        .osds
        .iter()
        .map(|osd| (osd.osd, BTreeSet::new()))
        .collect();
    let mut osds_by_pg_state = StateIndex::new();

    for pg in &pgs {
        let pool_name = pools_by_id.get(&pg.pool_id()?).copied();
        let acting: BTreeSet<OsdId> = pg.acting.iter().copied().collect();
        let labels: BTreeSet<&str> = pg.state.iter().map(String::as_str).collect();

        for label in labels {
            osds_by_pg_state
                .entry(label.to_string())
                .or_default()
                .extend(&acting);

            for osd_id in &acting {
                if let Some(states) = pg_states_by_osd.get_mut(osd_id) {
                    *states.entry(label.to_string()).or_insert(0) += 1;
                }
            }
        }

        if let Some(name) = pool_name {
            for osd_id in &acting {
                if let Some(pools) = pools_by_osd.get_mut(osd_id) {
                    pools.insert(name.to_string());
                }
            }
        }
    }

    let hosts = HostIndex::from_tree(osd_tree);

    let osds: Vec<EnrichedOsd> = osd_map
        .osds
        .iter()
        .map(|osd| {
            EnrichedOsd::new(
                osd,
                pg_states_by_osd.get(&osd.osd).cloned().unwrap_or_default(),
                pools_by_osd.get(&osd.osd).cloned().unwrap_or_default(),
                hosts.host_of_osd(osd.osd).map(str::to_string),
            )
        })
        .collect();

    debug!(
        osds = osds.len(),
        pgs = pgs.len(),
        states = osds_by_pg_state.len(),
        unresolved_hosts = osds.iter().filter(|o| o.host.is_none()).count(),
        "cross-referenced placement groups"
    );

    Ok(OsdPgDetailView {
        osds,
        osds_by_pg_state,
        pgs,
    })
}
