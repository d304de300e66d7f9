use crate::domain::model::{
    PackageMetadata, PackageOutcome, StagePlan, StageReport, VerifiedInputs,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::future::Future;
use std::path::Path;

pub trait Storage: Send + Sync {
    /// Size of `path` if it is a regular file, `None` if it is absent or not a file.
    fn file_size(&self, path: &Path) -> impl Future<Output = Result<Option<u64>>> + Send;
    fn read_file(&self, path: &Path) -> impl Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(&self, path: &Path, data: &[u8]) -> impl Future<Output = Result<()>> + Send;
    fn create_dir_all(&self, path: &Path) -> impl Future<Output = Result<()>> + Send;
    /// Copies `from` to `to`, replacing `to` if it exists. Returns bytes copied.
    fn copy_file(&self, from: &Path, to: &Path) -> impl Future<Output = Result<u64>> + Send;
    fn set_executable(&self, path: &Path) -> impl Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn metadata(&self) -> &PackageMetadata;
    fn plan(&self) -> &StagePlan;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn verify(&self) -> Result<VerifiedInputs>;
    async fn stage(&self, inputs: VerifiedInputs) -> Result<StageReport>;
    async fn finalize(&self, report: StageReport) -> Result<PackageOutcome>;
}
