pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use core::pipeline::ReportPipeline;
pub use core::range::{Evaluation, RangeEngine};
pub use core::runner::ReportRunner;
pub use utils::error::{ReportError, Result};
