pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use self::command_line::CliConfig;

#[cfg(feature = "cli")]
mod command_line {
    use crate::core::range::{Palette, ScaleConstants};
    use crate::core::ConfigProvider;
    use crate::domain::model::ReportSource;
    use crate::utils::error::Result;
    use crate::utils::logger::LogFormat;
    use crate::utils::validation::{
        validate_formats, validate_path, validate_range, validate_url, Validate,
    };
    use clap::Parser;
    use std::time::Duration;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "vita-range")]
    #[command(about = "Classify lab results against their reference ranges and lay out range bars")]
    pub struct CliConfig {
        /// Analysis endpoint (http/https) or path to an analysis JSON file
        #[arg(long)]
        pub source: String,

        /// Bearer token sent to the analysis endpoint
        #[arg(long)]
        pub token: Option<String>,

        #[arg(long)]
        pub timeout_seconds: Option<u64>,

        #[arg(long, default_value = "./output")]
        pub output_path: String,

        #[arg(long, value_delimiter = ',', default_value = "csv,json")]
        pub formats: Vec<String>,

        /// Bundle all outputs into this ZIP file instead of writing them separately
        #[arg(long)]
        pub bundle: Option<String>,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
        pub log_format: LogFormat,
    }

    impl ConfigProvider for CliConfig {
        fn source(&self) -> ReportSource {
            ReportSource::parse(&self.source)
        }

        fn access_token(&self) -> Option<&str> {
            self.token.as_deref()
        }

        fn request_timeout(&self) -> Option<Duration> {
            self.timeout_seconds.map(Duration::from_secs)
        }

        fn headers(&self) -> Vec<(String, String)> {
            Vec::new()
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn output_formats(&self) -> &[String] {
            &self.formats
        }

        fn bundle_filename(&self) -> Option<&str> {
            self.bundle.as_deref()
        }

        fn scale_constants(&self) -> ScaleConstants {
            ScaleConstants::default()
        }

        fn palette(&self) -> Palette {
            Palette::default()
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            match self.source() {
                ReportSource::Http { url } => validate_url("source", &url)?,
                ReportSource::File { .. } => validate_path("source", &self.source)?,
            }
            validate_path("output_path", &self.output_path)?;
            validate_formats("formats", &self.formats, super::toml_config::OUTPUT_FORMATS)?;
            if let Some(timeout) = self.timeout_seconds {
                validate_range("timeout_seconds", timeout, 1, 600)?;
            }
            if let Some(bundle) = &self.bundle {
                validate_path("bundle", bundle)?;
            }
            Ok(())
        }
    }

}
