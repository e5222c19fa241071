//! Three-tier severity classification of state labels.
//!
//! A state such as `"down+peering"` carries several concurrent condition
//! flags. The observation is attributed to the worst tier any of its flags
//! belongs to, and every flag matching that tier is counted.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::debug;

/// Placement group flags that mean data is unavailable or at risk.
pub const CRITICAL_STATES: &[&str] = &["stale", "down", "peering", "inconsistent", "incomplete"];

/// Placement group flags for transient or degraded-but-serving conditions.
pub const WARN_STATES: &[&str] = &[
    "creating",
    "recovery_wait",
    "recovering",
    "replay",
    "splitting",
    "degraded",
    "remapped",
    "scrubbing",
    "repair",
    "wait_backfill",
    "backfilling",
    "backfill_toofull",
];

/// Placement group flags of a healthy placement group.
pub const OK_STATES: &[&str] = &["active", "clean"];

/// Severity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Ok,
    Warn,
    Critical,
}

/// Observations attributed to one tier: the total weight and a per-label
/// breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SeverityBucket {
    pub count: u64,
    pub states: BTreeMap<String, u64>,
}

impl SeverityBucket {
    /// Build a bucket from `(label, count)` pairs. Zero counts are left out
    /// of the breakdown.
    pub fn from_states<'a>(states: impl IntoIterator<Item = (&'a str, u64)>) -> Self {
        let mut bucket = Self::default();
        for (label, count) in states {
            if count > 0 {
                bucket.count += count;
                *bucket.states.entry(label.to_string()).or_insert(0) += count;
            }
        }
        bucket
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// The ok/warn/critical triple reported for a subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SeverityCounters {
    pub ok: SeverityBucket,
    pub warn: SeverityBucket,
    pub critical: SeverityBucket,
}

impl SeverityCounters {
    pub fn bucket(&self, severity: Severity) -> &SeverityBucket {
        match severity {
            Severity::Ok => &self.ok,
            Severity::Warn => &self.warn,
            Severity::Critical => &self.critical,
        }
    }

    pub fn bucket_mut(&mut self, severity: Severity) -> &mut SeverityBucket {
        match severity {
            Severity::Ok => &mut self.ok,
            Severity::Warn => &mut self.warn,
            Severity::Critical => &mut self.critical,
        }
    }

    /// Weight attributed across all three tiers.
    pub fn total(&self) -> u64 {
        self.ok.count + self.warn.count + self.critical.count
    }

    /// Worst tier with any weight, if any.
    pub fn worst(&self) -> Option<Severity> {
        [Severity::Critical, Severity::Warn, Severity::Ok]
            .into_iter()
            .find(|s| !self.bucket(*s).is_empty())
    }
}

/// Label membership per tier, evaluated critical first.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    tiers: [(Severity, BTreeSet<&'static str>); 3],
}

impl Taxonomy {
    /// Build a taxonomy from three label sets. The sets are expected to be
    /// disjoint; if they are not, the higher tier wins.
    pub fn new(critical: &[&'static str], warn: &[&'static str], ok: &[&'static str]) -> Self {
        Self {
            tiers: [
                (Severity::Critical, critical.iter().copied().collect()),
                (Severity::Warn, warn.iter().copied().collect()),
                (Severity::Ok, ok.iter().copied().collect()),
            ],
        }
    }

    /// The fixed placement group taxonomy.
    pub fn standard() -> Self {
        Self::new(CRITICAL_STATES, WARN_STATES, OK_STATES)
    }

    /// The tier a single label belongs to.
    pub fn severity_of(&self, label: &str) -> Option<Severity> {
        self.tiers
            .iter()
            .find(|(_, members)| members.contains(label))
            .map(|(severity, _)| *severity)
    }

    /// Every label of the taxonomy, critical tier first.
    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tiers.iter().flat_map(|(_, members)| members.iter().copied())
    }

    /// Attribute `weight` to the first tier intersecting `labels`.
    ///
    /// Every label in the intersection gets `weight` added to its
    /// breakdown entry. Labels are expected lowercased. Returns the tier
    /// the weight went to, or `None` if no tier matched and the weight was
    /// dropped.
    pub fn classify<'a, I>(
        &self,
        labels: I,
        weight: u64,
        counters: &mut SeverityCounters,
    ) -> Option<Severity>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let observed: BTreeSet<&str> = labels.into_iter().collect();

        for (severity, members) in &self.tiers {
            let matched: Vec<&str> = observed
                .iter()
                .copied()
                .filter(|label| members.contains(*label))
                .collect();
            if matched.is_empty() {
                continue;
            }

            let bucket = counters.bucket_mut(*severity);
            bucket.count += weight;
            for label in matched {
                *bucket.states.entry(label.to_string()).or_insert(0) += weight;
            }
            return Some(*severity);
        }

        debug!(labels = ?observed, weight, "state matches no severity tier, dropped");
        None
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worst_flag_wins() {
        let taxonomy = Taxonomy::standard();
        let mut counters = SeverityCounters::default();

        let tier = taxonomy.classify(["active", "degraded", "down"], 3, &mut counters);

        assert_eq!(tier, Some(Severity::Critical));
        assert_eq!(counters.critical.count, 3);
        assert_eq!(counters.critical.states.get("down"), Some(&3));
        // Lower tiers see nothing of this observation
        assert!(counters.warn.is_empty());
        assert!(counters.ok.is_empty());
    }

    #[test]
    fn test_every_matching_label_is_counted() {
        let taxonomy = Taxonomy::standard();
        let mut counters = SeverityCounters::default();

        taxonomy.classify(["active", "clean"], 5, &mut counters);

        assert_eq!(counters.ok.count, 5);
        assert_eq!(counters.ok.states.get("active"), Some(&5));
        assert_eq!(counters.ok.states.get("clean"), Some(&5));
    }

    #[test]
    fn test_multiple_warn_labels() {
        let taxonomy = Taxonomy::standard();
        let mut counters = SeverityCounters::default();

        taxonomy.classify(["active", "recovering", "degraded"], 2, &mut counters);

        assert_eq!(counters.warn.count, 2);
        assert_eq!(counters.warn.states.len(), 2);
        assert_eq!(counters.warn.states["recovering"], 2);
        assert_eq!(counters.warn.states["degraded"], 2);
    }

    #[test]
    fn test_unknown_labels_are_dropped() {
        let taxonomy = Taxonomy::standard();
        let mut counters = SeverityCounters::default();

        assert_eq!(taxonomy.classify(["unknown_state"], 4, &mut counters), None);
        taxonomy.classify(["active"], 1, &mut counters);

        // 5 observed, only 1 attributed
        assert_eq!(counters.total(), 1);
        assert_eq!(counters, {
            let mut expected = SeverityCounters::default();
            expected.ok = SeverityBucket::from_states([("active", 1)]);
            expected
        });
    }

    #[test]
    fn test_duplicate_labels_count_once() {
        let taxonomy = Taxonomy::standard();
        let mut counters = SeverityCounters::default();

        taxonomy.classify(["stale", "stale"], 1, &mut counters);

        assert_eq!(counters.critical.count, 1);
        assert_eq!(counters.critical.states["stale"], 1);
    }

    #[test]
    fn test_severity_of() {
        let taxonomy = Taxonomy::standard();
        assert_eq!(taxonomy.severity_of("peering"), Some(Severity::Critical));
        assert_eq!(taxonomy.severity_of("backfill_toofull"), Some(Severity::Warn));
        assert_eq!(taxonomy.severity_of("clean"), Some(Severity::Ok));
        assert_eq!(taxonomy.severity_of("Clean"), None);
        assert_eq!(taxonomy.labels().count(), 19);
    }

    #[test]
    fn test_from_states_skips_zero() {
        let bucket = SeverityBucket::from_states([("up/out", 0), ("down/in", 2)]);
        assert_eq!(bucket.count, 2);
        assert_eq!(bucket.states.len(), 1);
    }

    #[test]
    fn test_worst() {
        let mut counters = SeverityCounters::default();
        assert_eq!(counters.worst(), None);
        counters.ok = SeverityBucket::from_states([("in", 3)]);
        assert_eq!(counters.worst(), Some(Severity::Ok));
        counters.warn = SeverityBucket::from_states([("up", 1)]);
        assert_eq!(counters.worst(), Some(Severity::Warn));
    }

    #[test]
    fn test_ordering() {
        assert!(Severity::Critical > Severity::Warn);
        assert!(Severity::Warn > Severity::Ok);
    }
}
