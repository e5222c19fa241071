//! Derivation registry and pipeline driver.
//!
//! A [`Registry`] is an ordered list of [`Derivation`] units. Each unit
//! declares the artifact kinds it reads; before a unit runs, the registry
//! checks that every declared kind is present and well-formed, then hands
//! the unit a [`DerivationContext`] that only exposes those kinds.
//!
//! Units do not read each other's output, so their order does not matter
//! and they may run concurrently over the same frozen [`ArtifactSet`].
//!
//! ```
//! use clusterwatch::{ArtifactSet, Registry};
//! use clusterwatch_types::{MdsMap, MonStatus, Osd, OsdMap, OsdTree, PgBriefEntry};
//!
//! let artifacts = ArtifactSet::new()
//!     .with_osd_map(OsdMap { osds: vec![Osd::new(0, true, true)], pools: vec![] })
//!     .with_pg_brief(vec![PgBriefEntry::new("1.0", vec![0], "active+clean")])
//!     .with_osd_tree(OsdTree::default())
//!     .with_mds_map(MdsMap::default())
//!     .with_mon_status(MonStatus::new([0], vec![0]));
//!
//! let derivations = Registry::standard().run(&artifacts);
//! assert!(derivations.is_complete());
//!
//! let merged = derivations.merged().unwrap();
//! assert!(merged.contains_key("osds"));
//! assert!(merged.contains_key("counters"));
//! ```

mod artifacts;
mod units;

pub use artifacts::ArtifactSet;
pub use units::{HealthCounters, OsdPgDetail};

use std::collections::BTreeSet;
use std::fmt::Debug;
use std::time::Instant;

use clusterwatch_types::{ArtifactKind, MdsMap, MonStatus, OsdMap, OsdTree, PgBrief};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, debug_span, warn};

use crate::data::{HealthCountersView, OsdPgDetailView};
use crate::error::{ArtifactError, DeriveError, RegistryError};
use crate::source::ArtifactSource;

/// A unit of the derivation pipeline.
///
/// Implementations must be pure: no I/O, no interior mutability, no
/// dependence on time or on previous runs.
pub trait Derivation: Send + Sync + Debug {
    /// Stable name of the unit, used in configuration and error messages.
    fn name(&self) -> &'static str;

    /// Artifact kinds this unit reads.
    fn depends(&self) -> &'static [ArtifactKind];

    /// Compute the unit's view.
    fn generate(&self, ctx: &DerivationContext<'_>) -> Result<DerivedView, DeriveError>;
}

/// Output of a derivation unit.
///
/// Serializes to the unit's top-level keys (`osds`, `osds_by_pg_state`,
/// `pgs` or `counters`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DerivedView {
    OsdPgDetail(OsdPgDetailView),
    HealthCounters(HealthCountersView),
}

impl DerivedView {
    pub fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

/// Typed, per-run access to the artifacts a unit declared.
#[derive(Debug)]
pub struct DerivationContext<'a> {
    unit: &'static str,
    declared: &'static [ArtifactKind],
    artifacts: &'a ArtifactSet,
}

impl<'a> DerivationContext<'a> {
    /// Check the unit's declared dependencies against the artifact set.
    fn new(unit: &dyn Derivation, artifacts: &'a ArtifactSet) -> Result<Self, DeriveError> {
        for &kind in unit.depends() {
            if let Some(source) = artifacts.malformed(kind) {
                return Err(DeriveError::Malformed {
                    unit: unit.name(),
                    source: source.clone(),
                });
            }
            if !artifacts.contains(kind) {
                return Err(DeriveError::MissingDependency {
                    unit: unit.name(),
                    kind,
                });
            }
        }

        Ok(Self {
            unit: unit.name(),
            declared: unit.depends(),
            artifacts,
        })
    }

    /// Name of the unit this context was built for.
    pub fn unit(&self) -> &'static str {
        self.unit
    }

    /// Wrap an artifact error as a failure of this unit.
    pub fn malformed(&self, source: ArtifactError) -> DeriveError {
        DeriveError::Malformed {
            unit: self.unit,
            source,
        }
    }

    fn require<T>(&self, kind: ArtifactKind, artifact: Option<&'a T>) -> Result<&'a T, DeriveError> {
        if !self.declared.contains(&kind) {
            return Err(DeriveError::UndeclaredDependency {
                unit: self.unit,
                kind,
            });
        }
        artifact.ok_or(DeriveError::MissingDependency {
            unit: self.unit,
            kind,
        })
    }

    pub fn osd_map(&self) -> Result<&'a OsdMap, DeriveError> {
        self.require(ArtifactKind::OsdMap, self.artifacts.osd_map())
    }

    pub fn pg_brief(&self) -> Result<&'a PgBrief, DeriveError> {
        self.require(ArtifactKind::PgBrief, self.artifacts.pg_brief())
    }

    pub fn osd_tree(&self) -> Result<&'a OsdTree, DeriveError> {
        self.require(ArtifactKind::OsdTree, self.artifacts.osd_tree())
    }

    pub fn mds_map(&self) -> Result<&'a MdsMap, DeriveError> {
        self.require(ArtifactKind::MdsMap, self.artifacts.mds_map())
    }

    pub fn mon_status(&self) -> Result<&'a MonStatus, DeriveError> {
        self.require(ArtifactKind::MonStatus, self.artifacts.mon_status())
    }
}

/// Result of one unit's run.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitOutcome {
    pub unit: &'static str,
    pub result: Result<DerivedView, DeriveError>,
}

/// Results of one pipeline run, in registry order.
#[derive(Debug, Clone, PartialEq)]
pub struct Derivations {
    outcomes: Vec<UnitOutcome>,
}

impl Derivations {
    pub fn outcomes(&self) -> &[UnitOutcome] {
        &self.outcomes
    }

    /// Result of the named unit.
    pub fn get(&self, unit: &str) -> Option<&Result<DerivedView, DeriveError>> {
        self.outcomes
            .iter()
            .find(|o| o.unit == unit)
            .map(|o| &o.result)
    }

    /// Errors of the units that failed.
    pub fn errors(&self) -> impl Iterator<Item = &DeriveError> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().err())
    }

    /// Whether every unit succeeded.
    pub fn is_complete(&self) -> bool {
        self.errors().next().is_none()
    }

    /// Fold the successful views into one JSON object.
    pub fn merged(&self) -> serde_json::Result<Map<String, Value>> {
        let mut merged = Map::new();
        for view in self.outcomes.iter().filter_map(|o| o.result.as_ref().ok()) {
            if let Value::Object(fields) = view.to_json()? {
                merged.extend(fields);
            }
        }
        Ok(merged)
    }
}

/// Ordered set of derivation units.
#[derive(Debug)]
pub struct Registry {
    units: Vec<Box<dyn Derivation>>,
}

impl Registry {
    /// Create a builder for composing a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// The standard units: [`OsdPgDetail`] and [`HealthCounters`].
    pub fn standard() -> Self {
        Self {
            units: vec![Box::new(OsdPgDetail), Box::new(HealthCounters)],
        }
    }

    pub fn units(&self) -> impl Iterator<Item = &dyn Derivation> {
        self.units.iter().map(|u| u.as_ref())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.units().map(|u| u.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Union of every unit's dependencies.
    pub fn required_kinds(&self) -> BTreeSet<ArtifactKind> {
        self.units()
            .flat_map(|u| u.depends().iter().copied())
            .collect()
    }

    /// Keep only the named units, preserving registry order.
    ///
    /// An empty list keeps every unit.
    pub fn retain_units<S: AsRef<str>>(mut self, names: &[S]) -> Result<Self, RegistryError> {
        if names.is_empty() {
            return Ok(self);
        }
        for name in names {
            let name = name.as_ref();
            if !self.units.iter().any(|u| u.name() == name) {
                return Err(RegistryError::UnknownUnit(name.to_string()));
            }
        }
        self.units
            .retain(|u| names.iter().any(|n| n.as_ref() == u.name()));
        Ok(self)
    }

    /// Run every unit, one after another.
    pub fn run(&self, artifacts: &ArtifactSet) -> Derivations {
        let outcomes: Vec<UnitOutcome> = self
            .units()
            .map(|unit| run_unit(unit, artifacts))
            .collect();
        Derivations { outcomes }
    }

    /// Poll a source and run every unit over the set it hands out, if any.
    pub fn poll_and_run(&self, source: &mut dyn ArtifactSource) -> Option<Derivations> {
        let artifacts = source.poll()?;
        debug!(source = source.description(), kinds = ?artifacts.kinds(), "new artifact set");
        Some(self.run(&artifacts))
    }

    /// Run every unit on its own thread.
    ///
    /// Produces the same [`Derivations`] as [`run`](Registry::run).
    pub fn run_concurrent(&self, artifacts: &ArtifactSet) -> Derivations {
        let outcomes: Vec<UnitOutcome> = std::thread::scope(|scope| {
            let handles: Vec<_> = self
                .units()
                .map(|unit| scope.spawn(move || run_unit(unit, artifacts)))
                .collect();
            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect()
        });
        Derivations { outcomes }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}

fn run_unit(unit: &dyn Derivation, artifacts: &ArtifactSet) -> UnitOutcome {
    let span = debug_span!("derive", unit = unit.name());
    let _enter = span.enter();

    let started = Instant::now();
    let result = DerivationContext::new(unit, artifacts).and_then(|ctx| unit.generate(&ctx));

    match &result {
        Ok(_) => debug!(elapsed = ?started.elapsed(), "derivation complete"),
        Err(e) => warn!(error = %e, "derivation failed"),
    }

    UnitOutcome {
        unit: unit.name(),
        result,
    }
}

/// Builder for [`Registry`] that validates units as they are composed.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    units: Vec<Box<dyn Derivation>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a unit.
    pub fn unit(mut self, unit: impl Derivation + 'static) -> Self {
        self.units.push(Box::new(unit));
        self
    }

    /// Build the registry.
    ///
    /// # Errors
    ///
    /// Fails if two units share a name or a unit declares no dependencies.
    pub fn build(self) -> Result<Registry, RegistryError> {
        let mut seen = BTreeSet::new();
        for unit in &self.units {
            if !seen.insert(unit.name()) {
                return Err(RegistryError::DuplicateUnit(unit.name()));
            }
            if unit.depends().is_empty() {
                return Err(RegistryError::NoDependencies(unit.name()));
            }
        }
        Ok(Registry { units: self.units })
    }
}
