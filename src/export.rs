//! Exporter-facing boundary: the finished artifact bundle and the external
//! serializer contract.

use crate::foundation::error::{RigportError, RigportResult};
use crate::pipeline::context::{ExportContext, StageExchange, TargetVersion};
use crate::pipeline::notify::PipelineReport;
use crate::pipeline::runner::Pipeline;
use crate::scene::avatar::AvatarScene;
use serde::Serialize;

/// Finished conversion artifacts handed to an external exporter.
#[derive(Debug, Clone, Serialize)]
pub struct ExportArtifacts {
    /// The transformed scene clone.
    pub avatar: AvatarScene,
    /// Metadata accumulated by the stages (bone table, expressions, spring
    /// chains, special materials).
    pub exchange: StageExchange,
    /// Output schema variant the artifacts target.
    pub version: TargetVersion,
    /// Full pipeline report, including the notification log.
    pub report: PipelineReport,
}

/// External serializer boundary.
///
/// The pipeline itself never writes files; an exporter takes the finished
/// artifacts and either returns the interchange-format bytes or fails.
pub trait AvatarExporter {
    /// Serialize finished artifacts into interchange-format bytes.
    fn export(&mut self, artifacts: &ExportArtifacts) -> RigportResult<Vec<u8>>;
}

/// Exporter double that serializes the exchange metadata and notification
/// log as JSON. Useful in tests and debugging tooling; the real interchange
/// serializer lives outside this crate.
#[derive(Debug, Default)]
pub struct JsonMetadataExporter;

impl AvatarExporter for JsonMetadataExporter {
    fn export(&mut self, artifacts: &ExportArtifacts) -> RigportResult<Vec<u8>> {
        let value = serde_json::json!({
            "version": artifacts.version,
            "exchange": artifacts.exchange,
            "notifications": artifacts.report.notifications,
        });
        serde_json::to_vec_pretty(&value)
            .map_err(|e| RigportError::conversion(format!("metadata serialization failed: {e}")))
    }
}

/// Run the standard pipeline over a clone of `source`.
///
/// The source scene is validated at the boundary and never mutated. The
/// returned artifacts carry the full report; a run halted by an Error still
/// returns `Ok` with `report.success()` false, and only a structurally
/// invalid source is an `Err`.
pub fn convert(
    source: &AvatarScene,
    version: TargetVersion,
    disabled_stages: &[&str],
) -> RigportResult<ExportArtifacts> {
    source.validate()?;

    let mut pipeline = Pipeline::standard();
    for id in disabled_stages {
        pipeline.set_enabled(id, false);
    }

    let mut ctx = ExportContext::new(source, version);
    let report = pipeline.execute(&mut ctx);
    let (avatar, exchange, _log) = ctx.finish();

    Ok(ExportArtifacts {
        avatar,
        exchange,
        version,
        report,
    })
}

#[cfg(test)]
#[path = "../tests/unit/export.rs"]
mod tests;
