//! # clusterwatch-types
//!
//! Raw artifact schema for storage cluster snapshots. Each artifact is an
//! independent, immutable point-in-time view of one part of the cluster:
//!
//! - [`OsdMap`]: object storage daemons and the pool directory
//! - [`PgBrief`]: the brief placement group dump
//! - [`OsdTree`]: the crush topology tree
//! - [`MdsMap`]: the metadata server map
//! - [`MonStatus`]: monitor map and current quorum
//!
//! Artifacts are tagged by [`ArtifactKind`], which is how consumers declare
//! which inputs they need.
//!
//! ## Features
//!
//! - `serde`: JSON (and any other serde format) support. Field names follow
//!   the cluster's own JSON dumps, so `ceph osd dump --format=json` style
//!   output deserializes directly.
//!
//! ## Example
//!
//! ```rust
//! use clusterwatch_types::{CrushNode, Osd, OsdMap, OsdTree, PgBriefEntry, Pool};
//!
//! let osd_map = OsdMap {
//!     osds: vec![Osd::new(0, true, true), Osd::new(1, true, false)],
//!     pools: vec![Pool::new(1, "rbd")],
//! };
//! let tree = OsdTree {
//!     nodes: vec![CrushNode::host(-2, "node-a", vec![0, 1]), CrushNode::osd(0), CrushNode::osd(1)],
//! };
//! let pgs = vec![PgBriefEntry::new("1.0", vec![0, 1], "active+clean")];
//!
//! assert_eq!(osd_map.osds[1].name(), "osd.1");
//! assert_eq!(tree.nodes.len(), 3);
//! assert_eq!(pgs[0].labels().count(), 2);
//! ```

mod crush;
mod kind;
mod mds;
mod mon;
mod osd;
mod pg;

#[cfg(feature = "serde")]
mod serde_helpers;

pub use crush::*;
pub use kind::*;
pub use mds::*;
pub use mon::*;
pub use osd::*;
pub use pg::*;

/// Identifier of an object storage daemon.
pub type OsdId = u32;

/// Identifier of a crush tree node. Buckets (hosts, racks, roots) use
/// negative ids, devices use their OSD id.
pub type NodeId = i64;
