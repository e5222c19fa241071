//! The standard derivation units.

use clusterwatch_types::ArtifactKind;

use super::{Derivation, DerivationContext, DerivedView};
use crate::data::{counters, osd_pg};
use crate::error::DeriveError;

/// Per-OSD placement group, pool and host detail plus the state index.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsdPgDetail;

impl Derivation for OsdPgDetail {
    fn name(&self) -> &'static str {
        "osd_pg_detail"
    }

    fn depends(&self) -> &'static [ArtifactKind] {
        &[ArtifactKind::OsdMap, ArtifactKind::PgBrief, ArtifactKind::OsdTree]
    }

    fn generate(&self, ctx: &DerivationContext<'_>) -> Result<DerivedView, DeriveError> {
        let view = osd_pg::generate(ctx.osd_map()?, ctx.pg_brief()?, ctx.osd_tree()?)
            .map_err(|e| ctx.malformed(e))?;
        Ok(DerivedView::OsdPgDetail(view))
    }
}

/// Ok/warn/critical counters for OSDs, monitors and placement groups, plus
/// metadata server counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct HealthCounters;

impl Derivation for HealthCounters {
    fn name(&self) -> &'static str {
        "health_counters"
    }

    fn depends(&self) -> &'static [ArtifactKind] {
        &[
            ArtifactKind::OsdMap,
            ArtifactKind::MdsMap,
            ArtifactKind::MonStatus,
            ArtifactKind::PgBrief,
        ]
    }

    fn generate(&self, ctx: &DerivationContext<'_>) -> Result<DerivedView, DeriveError> {
        Ok(DerivedView::HealthCounters(counters::generate(
            ctx.osd_map()?,
            ctx.mds_map()?,
            ctx.mon_status()?,
            ctx.pg_brief()?,
        )))
    }
}
