use crate::core::range::RangeEngine;
use crate::core::report::RangeReport;
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{AnalysisReport, ReportSource};
use crate::utils::error::{ReportError, Result};
use reqwest::Client;
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

pub const CSV_FILENAME: &str = "range_report.csv";
pub const JSON_FILENAME: &str = "range_report.json";

pub struct ReportPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
    engine: RangeEngine,
}

impl<S: Storage, C: ConfigProvider> ReportPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        let engine = RangeEngine::new(config.scale_constants(), config.palette());
        Self {
            storage,
            config,
            client: Client::new(),
            engine,
        }
    }

    async fn fetch(&self, url: &str) -> Result<AnalysisReport> {
        let mut request = self.client.get(url);

        for (key, value) in self.config.headers() {
            request = request.header(key, value);
        }

        if let Some(token) = self.config.access_token() {
            request = request.bearer_auth(token);
        }

        if let Some(timeout) = self.config.request_timeout() {
            request = request.timeout(timeout);
        }

        tracing::debug!("Requesting analysis data from: {}", url);
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("Analysis API response status: {}", status);

        if !status.is_success() {
            return Err(ReportError::SourceError {
                source_name: url.to_string(),
                message: format!("unexpected response status {}", status),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn render(&self, format: &str, report: &RangeReport) -> Result<(&'static str, Vec<u8>)> {
        match format {
            "csv" => {
                let mut writer = csv::Writer::from_writer(Vec::new());
                for row in report.rows() {
                    writer.serialize(row)?;
                }
                let data = writer
                    .into_inner()
                    .map_err(|e| ReportError::IoError(e.into_error()))?;
                Ok((CSV_FILENAME, data))
            }
            "json" => Ok((JSON_FILENAME, serde_json::to_vec_pretty(report)?)),
            other => Err(ReportError::ProcessingError {
                message: format!("unsupported output format '{}'", other),
            }),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ReportPipeline<S, C> {
    async fn extract(&self) -> Result<AnalysisReport> {
        let source = self.config.source();
        tracing::info!("📥 Loading analysis results from: {}", source);

        let report = match &source {
            ReportSource::Http { url } => self.fetch(url).await?,
            ReportSource::File { path } => {
                let data = tokio::fs::read(path).await?;
                serde_json::from_slice(&data)?
            }
        };

        tracing::info!(
            "Loaded {} results (laboratory: {})",
            report.results.len(),
            report.laboratory.as_deref().unwrap_or("unknown")
        );

        Ok(report)
    }

    async fn transform(&self, report: AnalysisReport) -> Result<RangeReport> {
        if report.results.is_empty() {
            tracing::warn!("Analysis document contains no results");
        }

        let report = RangeReport::build(&self.engine, report);

        for entry in &report.entries {
            tracing::debug!(
                test = %entry.result.test_name,
                tone = entry.evaluation.tone().as_str(),
                "evaluated"
            );
        }

        tracing::info!(
            "Evaluated {} results, {} flagged, summary: {:?}",
            report.entries.len(),
            report.flagged_count(),
            report.summary
        );

        Ok(report)
    }

    async fn load(&self, report: RangeReport) -> Result<String> {
        let mut files = Vec::new();
        for format in self.config.output_formats() {
            files.push(self.render(format, &report)?);
        }

        if files.is_empty() {
            return Err(ReportError::MissingConfigError {
                field: "output_formats".to_string(),
            });
        }

        let output_name = if let Some(bundle) = self.config.bundle_filename() {
            tracing::debug!("Creating ZIP bundle with {} files", files.len());

            let zip_data = {
                let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                for (name, data) in &files {
                    zip.start_file(*name, SimpleFileOptions::default())?;
                    zip.write_all(data)?;
                }
                zip.finish()?.into_inner()
            };

            tracing::debug!("Writing ZIP bundle ({} bytes) to storage", zip_data.len());
            self.storage.write_file(bundle, &zip_data).await?;
            bundle.to_string()
        } else {
            for (name, data) in &files {
                tracing::debug!("Writing {} ({} bytes)", name, data.len());
                self.storage.write_file(name, data).await?;
            }
            files[0].0.to_string()
        };

        Ok(format!("{}/{}", self.config.output_path(), output_name))
    }
}
