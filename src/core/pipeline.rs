use crate::core::archive::build_archive;
use crate::core::metadata::{read_long_description, write_pkg_info, PKG_INFO};
use crate::core::scripts::{register_scripts, verify_scripts, write_script_manifest};
use crate::core::staging::{copy_artifacts, verify_artifacts};
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{PackageOutcome, StageReport, VerifiedInputs};
use crate::utils::error::{PackError, Result};

/// Stages the configured binaries and scripts and writes package metadata.
pub struct PackagePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> PackagePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for PackagePipeline<S, C> {
    async fn verify(&self) -> Result<VerifiedInputs> {
        let plan = self.config.plan();

        tracing::debug!(
            "Checking {} binaries in {}",
            plan.binaries.len(),
            plan.bin_dir.display()
        );
        let binaries = verify_artifacts(&self.storage, &plan.bin_dir, &plan.binaries, |path| {
            PackError::MissingArtifact { path }
        })
        .await?;

        let scripts = verify_scripts(&self.storage, &plan.scripts_source_dir, &plan.scripts).await?;

        if self.storage.file_size(&plan.readme).await?.is_none() {
            return Err(PackError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("long description file {} not found", plan.readme.display()),
            )));
        }
        let long_description = read_long_description(&self.storage, &plan.readme).await?;

        Ok(VerifiedInputs {
            binaries,
            scripts,
            long_description,
        })
    }

    async fn stage(&self, inputs: VerifiedInputs) -> Result<StageReport> {
        let plan = self.config.plan();

        let binaries = copy_artifacts(&self.storage, &inputs.binaries, &plan.output_dir).await?;
        let scripts =
            register_scripts(&self.storage, &inputs.scripts, &plan.scripts_output_dir).await?;

        Ok(StageReport {
            binaries,
            scripts,
            long_description: inputs.long_description,
        })
    }

    async fn finalize(&self, report: StageReport) -> Result<PackageOutcome> {
        let plan = self.config.plan();
        let metadata = self.config.metadata();

        let pkg_info = write_pkg_info(
            &self.storage,
            &plan.output_dir,
            metadata,
            &report.long_description,
        )
        .await?;
        write_script_manifest(&self.storage, &plan.output_dir, &report.scripts).await?;

        let archive_path = match &plan.dist_dir {
            Some(dist_dir) => {
                Some(build_archive(&self.storage, dist_dir, metadata, &report, &pkg_info).await?)
            }
            None => None,
        };

        Ok(PackageOutcome {
            output_dir: plan.output_dir.clone(),
            metadata_path: plan.output_dir.join(PKG_INFO),
            report,
            archive_path,
        })
    }
}
