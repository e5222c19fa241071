//! # clusterwatch
//!
//! Derives human-facing health summaries from raw storage cluster state
//! snapshots.
//!
//! Raw snapshots arrive as independent typed artifacts (OSD map, placement
//! group brief, crush tree, MDS map, monitor status; see
//! [`clusterwatch_types`]). A [`Registry`] of derivation units declares
//! which artifacts each derived view needs and recomputes every view from
//! scratch whenever a new [`ArtifactSet`] arrives.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  ┌──────────┐    ┌─────────────┐    ┌────────┐               │
//! │  │  source  │───▶│  registry   │───▶│  data  │──▶ views      │
//! │  │ (input)  │    │ (dispatch)  │    │ (pure) │   (JSON)      │
//! │  └──────────┘    └─────────────┘    └────────┘               │
//! │  FileSource        OsdPgDetail       severity, topology,     │
//! │  ChannelSource     HealthCounters    osd_pg, counters        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: hands over complete artifact sets ([`ArtifactSource`]
//!   trait) from a bundle file or an in-process channel
//! - **[`registry`]**: typed registry of [`Derivation`] units, dependency
//!   checking and the run driver
//! - **[`data`]**: the derivations themselves - severity classification,
//!   host resolution, OSD/PG cross-referencing and health counters
//! - **[`config`]**: layered settings for the binary
//!
//! ## Output
//!
//! The standard units produce these top-level keys:
//!
//! - `osds`, `osds_by_pg_state`, `pgs` from [`OsdPgDetail`]
//! - `counters` (`osd`, `mds`, `mon`, `pg`) from [`HealthCounters`]
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Derive once from a bundle written by a collector
//! clusterwatch derive cluster.json --pretty
//!
//! # Re-derive whenever the bundle changes
//! clusterwatch watch cluster.json --refresh 5
//! ```
//!
//! ### As a library
//!
//! ```
//! use clusterwatch::{ArtifactSet, Registry};
//!
//! let artifacts = ArtifactSet::parse(r#"{
//!     "osd_map": {"osds": [], "pools": []},
//!     "pg_brief": [],
//!     "osd_tree": {"nodes": []}
//! }"#).unwrap();
//!
//! let derivations = Registry::standard().run(&artifacts);
//!
//! // health_counters lacks mds_map and mon_status; osd_pg_detail still runs
//! assert!(derivations.get("osd_pg_detail").unwrap().is_ok());
//! assert!(derivations.get("health_counters").unwrap().is_err());
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod registry;
pub mod source;

pub use crate::config::Settings;
pub use data::{
    EnrichedOsd, HealthCountersView, HostIndex, OsdPgDetailView, Severity, SeverityBucket,
    SeverityCounters, Taxonomy,
};
pub use error::{ArtifactError, DeriveError, RegistryError};
pub use registry::{
    ArtifactSet, Derivation, DerivationContext, Derivations, DerivedView, HealthCounters,
    OsdPgDetail, Registry, RegistryBuilder, UnitOutcome,
};
pub use source::{ArtifactSource, ChannelSource, FileSource, SetPublisher};
