use crate::core::range::{Palette, ScaleConstants};
use crate::core::report::RangeReport;
use crate::domain::model::{AnalysisReport, ReportSource};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn source(&self) -> ReportSource;
    fn access_token(&self) -> Option<&str>;
    fn request_timeout(&self) -> Option<Duration>;
    fn headers(&self) -> Vec<(String, String)>;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn bundle_filename(&self) -> Option<&str>;
    fn scale_constants(&self) -> ScaleConstants;
    fn palette(&self) -> Palette;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<AnalysisReport>;
    async fn transform(&self, report: AnalysisReport) -> Result<RangeReport>;
    async fn load(&self, report: RangeReport) -> Result<String>;
}
