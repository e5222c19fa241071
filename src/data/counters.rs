//! Per-subsystem health counters.
//!
//! OSDs, monitors and placement groups each get an ok/warn/critical triple.
//! The metadata server block is a plain set of counts and is not tiered.

use std::collections::{BTreeMap, BTreeSet};

use clusterwatch_types::{MdsMap, MonStatus, OsdMap, PgBrief, STATE_SEPARATOR};
use serde::Serialize;

use super::severity::{SeverityBucket, SeverityCounters, Taxonomy};

/// Metadata server counts. Differences are signed: a map caught mid-update
/// can report more ranks in than daemons up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MdsCounters {
    pub total: i64,
    pub up_in: i64,
    pub up_not_in: i64,
    pub not_up_not_in: i64,
}

/// Counters for every subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ClusterCounters {
    pub osd: SeverityCounters,
    pub mds: MdsCounters,
    pub mon: SeverityCounters,
    pub pg: SeverityCounters,
}

/// The health counters view.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct HealthCountersView {
    pub counters: ClusterCounters,
}

/// Compute counters for every subsystem.
pub fn generate(
    osd_map: &OsdMap,
    mds_map: &MdsMap,
    mon_status: &MonStatus,
    pg_brief: &PgBrief,
) -> HealthCountersView {
    HealthCountersView {
        counters: ClusterCounters {
            osd: osd_counters(osd_map),
            mds: mds_counters(mds_map),
            mon: mon_counters(mon_status),
            pg: pg_counters(pg_brief, &Taxonomy::standard()),
        },
    }
}

/// Classify OSDs by their `(up, in)` pair.
///
/// | up | in | tier     | label      |
/// |----|----|----------|------------|
/// | y  | y  | ok       | `up/in`    |
/// | y  | n  | warn     | `up/out`   |
/// | n  | y  | warn     | `down/in`  |
/// | n  | n  | critical | `down/out` |
pub fn osd_counters(osd_map: &OsdMap) -> SeverityCounters {
    let (mut up_in, mut up_out, mut down_in, mut down_out) = (0, 0, 0, 0);
    for osd in &osd_map.osds {
        match (osd.up, osd.in_) {
            (true, true) => up_in += 1,
            (true, false) => up_out += 1,
            (false, true) => down_in += 1,
            (false, false) => down_out += 1,
        }
    }

    SeverityCounters {
        ok: SeverityBucket::from_states([("up/in", up_in)]),
        warn: SeverityBucket::from_states([("up/out", up_out), ("down/in", down_in)]),
        critical: SeverityBucket::from_states([("down/out", down_out)]),
    }
}

pub fn mds_counters(mds_map: &MdsMap) -> MdsCounters {
    let total = i64::from(mds_map.max_mds);
    let up = mds_map.num_up() as i64;
    let in_ = mds_map.num_in() as i64;

    MdsCounters {
        total,
        up_in: in_,
        up_not_in: up - in_,
        not_up_not_in: total - up,
    }
}

/// Classify monitors by quorum membership.
///
/// Monitors outside quorum are critical. The warn tier is always empty:
/// telling "unreachable" apart from "down" needs information the monitor
/// status does not carry.
pub fn mon_counters(mon_status: &MonStatus) -> SeverityCounters {
    let quorum: BTreeSet<u32> = mon_status.quorum.iter().copied().collect();
    let (in_quorum, out_of_quorum): (Vec<_>, Vec<_>) = mon_status
        .monmap
        .mons
        .iter()
        .partition(|mon| quorum.contains(&mon.rank));

    SeverityCounters {
        ok: SeverityBucket::from_states([("in", in_quorum.len() as u64)]),
        warn: SeverityBucket::default(),
        critical: SeverityBucket::from_states([("out", out_of_quorum.len() as u64)]),
    }
}

/// Classify placement groups by state.
///
/// Placement groups are tallied per raw state string first, then each
/// distinct string is classified once with its tally as weight.
pub fn pg_counters(pg_brief: &PgBrief, taxonomy: &Taxonomy) -> SeverityCounters {
    let mut pgs_by_state: BTreeMap<&str, u64> = BTreeMap::new();
    for pg in pg_brief {
        *pgs_by_state.entry(pg.state.as_str()).or_insert(0) += 1;
    }

    let mut counters = SeverityCounters::default();
    for (state, count) in pgs_by_state {
        let labels: Vec<String> = state
            .split(STATE_SEPARATOR)
            .map(str::to_lowercase)
            .collect();
        taxonomy.classify(labels.iter().map(String::as_str), count, &mut counters);
    }
    counters
}
