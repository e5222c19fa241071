//! Error types for the derivation pipeline.

use clusterwatch_types::ArtifactKind;
use thiserror::Error;

/// A raw artifact that does not have the shape derivations rely on.
///
/// Raised either while loading a bundle (the artifact failed to parse) or
/// while deriving (e.g. a placement group id without a pool prefix).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed {kind} artifact: {detail}")]
pub struct ArtifactError {
    pub kind: ArtifactKind,
    pub detail: String,
}

impl ArtifactError {
    pub fn new(kind: ArtifactKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

/// Errors that fail a single derivation unit's run.
///
/// Other units of the same run are not affected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeriveError {
    /// An input artifact is malformed.
    #[error("derivation {unit} failed: {source}")]
    Malformed {
        unit: &'static str,
        #[source]
        source: ArtifactError,
    },

    /// A declared dependency was not supplied by the driver.
    #[error("derivation {unit} is missing its {kind} dependency")]
    MissingDependency {
        unit: &'static str,
        kind: ArtifactKind,
    },

    /// The unit asked for an artifact it did not declare.
    #[error("derivation {unit} read {kind} without declaring it")]
    UndeclaredDependency {
        unit: &'static str,
        kind: ArtifactKind,
    },
}

impl DeriveError {
    /// Name of the unit whose run failed.
    pub fn unit(&self) -> &'static str {
        match self {
            DeriveError::Malformed { unit, .. }
            | DeriveError::MissingDependency { unit, .. }
            | DeriveError::UndeclaredDependency { unit, .. } => unit,
        }
    }
}

/// Errors raised while composing a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two units share a name.
    #[error("derivation {0} registered twice")]
    DuplicateUnit(&'static str),

    /// A unit declares no input artifacts.
    #[error("derivation {0} declares no dependencies")]
    NoDependencies(&'static str),

    /// A configured unit name matches no registered unit.
    #[error("unknown derivation: {0}")]
    UnknownUnit(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_unit_and_record() {
        let err = DeriveError::Malformed {
            unit: "osd_pg_detail",
            source: ArtifactError::new(ArtifactKind::PgBrief, "pgid \"12\" has no pool separator"),
        };
        let msg = err.to_string();
        assert!(msg.contains("osd_pg_detail"));
        assert!(msg.contains("pg_brief"));
        assert!(msg.contains("\"12\""));
        assert_eq!(err.unit(), "osd_pg_detail");
    }

    #[test]
    fn test_missing_dependency_display() {
        let err = DeriveError::MissingDependency {
            unit: "health_counters",
            kind: ArtifactKind::MdsMap,
        };
        assert_eq!(
            err.to_string(),
            "derivation health_counters is missing its mds_map dependency"
        );
    }
}
