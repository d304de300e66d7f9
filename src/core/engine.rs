use crate::core::Pipeline;
use crate::domain::model::PackageOutcome;
use crate::utils::error::Result;

pub struct PackEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> PackEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<PackageOutcome> {
        tracing::info!("Verifying pre-built artifacts...");
        let inputs = self.pipeline.verify().await?;
        tracing::info!(
            "Found {} binaries and {} scripts",
            inputs.binaries.len(),
            inputs.scripts.len()
        );

        tracing::info!("Staging artifacts...");
        let report = self.pipeline.stage(inputs).await?;
        for staged in report.binaries.iter().chain(&report.scripts) {
            tracing::debug!("Staged {} ({} bytes)", staged.destination.display(), staged.size);
        }

        tracing::info!("Writing package metadata...");
        let outcome = self.pipeline.finalize(report).await?;
        if let Some(archive) = &outcome.archive_path {
            tracing::info!("Archive written to: {}", archive.display());
        }

        Ok(outcome)
    }
}
