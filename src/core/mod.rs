pub mod archive;
pub mod engine;
pub mod metadata;
pub mod pipeline;
pub mod scripts;
pub mod staging;

pub use crate::domain::model::{Artifact, PackageOutcome, StageReport, StagedFile};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
