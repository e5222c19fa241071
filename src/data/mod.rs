//! Derived views computed from raw artifacts.
//!
//! Every function here is pure: the same artifacts always produce the same
//! output, and all maps are ordered so serialized output is byte-stable.
//!
//! ## Submodules
//!
//! - [`severity`]: ok/warn/critical classification of state labels
//! - [`topology`]: OSD to host resolution from the crush tree
//! - [`osd_pg`]: per-OSD placement group, pool and host enrichment
//! - [`counters`]: per-subsystem health counters
//!
//! ## Data Flow
//!
//! ```text
//! OsdMap ─┬──────────────┐
//! PgBrief ┼─▶ osd_pg ────┼─▶ OsdPgDetailView
//! OsdTree ┴─▶ topology ──┘
//!
//! OsdMap, MdsMap, MonStatus, PgBrief ─▶ counters (via severity) ─▶ HealthCountersView
//! ```

pub mod counters;
pub mod osd_pg;
pub mod severity;
pub mod topology;

pub use counters::{ClusterCounters, HealthCountersView, MdsCounters};
pub use osd_pg::{EnrichedOsd, OsdPgDetailView, PgRecord, StateIndex};
pub use severity::{Severity, SeverityBucket, SeverityCounters, Taxonomy};
pub use topology::HostIndex;
