pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::pipelines::tfa_pipeline::TfaPipeline;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use core::{classifier::DomainSetClassifier, etl::ReconEngine, reference::FamilyReference};
pub use utils::error::{EtlError, Result};
