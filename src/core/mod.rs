pub mod pipeline;
pub mod range;
pub mod report;
pub mod runner;

pub use crate::domain::model::{AnalysisReport, LabResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
