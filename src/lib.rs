pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::VsacConfig;

pub use crate::core::orchestrator::{
    resolve_descriptors, DownloadOrchestrator, DownloadSettings, VsacDownloader,
};
pub use domain::model::{BatchOutcome, ValueSetDescriptor, ValueSetIndex, INDEX_FILE_NAME};
pub use utils::error::{Result, VsacError};
