use anyhow::Result;
use httpmock::prelude::*;
use std::io::Read;
use tempfile::TempDir;
use vita_range::utils::logger::LogFormat;
use vita_range::utils::validation::Validate;
use vita_range::{CliConfig, LocalStorage, ReportError, ReportPipeline, ReportRunner, TomlConfig};

fn analysis_body() -> serde_json::Value {
    serde_json::json!({
        "laboratory": "Regina Maria",
        "collection_date": "2025-06-18",
        "rezults": [
            {"test_name": "Hemoglobina", "numeric_value": 14.1, "um": "g/dL",
             "min_reference": 12.0, "max_reference": 16.0, "text_reference": "12 - 16"},
            {"test_name": "Colesterol LDL", "numeric_value": 172.0, "um": "mg/dL",
             "flag": "Crescut",
             "limits": [
                {"lowerBound": null, "upperBound": 100.0, "label": "Optim", "status": "NORMAL"},
                {"lowerBound": 100.0, "upperBound": 130.0, "label": "Aproape optim", "status": "HIGH"},
                {"lowerBound": 130.0, "upperBound": 160.0, "label": "La limita", "status": "HIGH"},
                {"lowerBound": 160.0, "upperBound": null, "label": "Crescut", "status": "HIGH"}
             ]},
            {"test_name": "Vitamina B12", "numeric_value": 150.0, "um": "pg/mL",
             "min_reference": 197.0, "max_reference": 771.0},
            {"test_name": "Ac. anti-HCV", "string_value": "Negativ", "flag": "Negativ"},
            {"test_name": "TSH", "numeric_value": 2.1, "um": "µUI/mL"}
        ]
    })
}

fn cli_config(source: String, output_path: &str) -> CliConfig {
    CliConfig {
        source,
        token: None,
        timeout_seconds: Some(5),
        output_path: output_path.to_string(),
        formats: vec!["csv".to_string(), "json".to_string()],
        bundle: None,
        verbose: false,
        log_format: LogFormat::Compact,
    }
}

#[tokio::test]
async fn test_end_to_end_report_over_http() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/tests/42/test-data")
            .header("Authorization", "Bearer patient-token");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(analysis_body());
    });

    let mut config = cli_config(server.url("/api/tests/42/test-data"), &output_path);
    config.token = Some("patient-token".to_string());
    config.validate()?;

    let pipeline = ReportPipeline::new(LocalStorage::new(&output_path), config);
    let output = ReportRunner::new(pipeline).run().await?;

    api_mock.assert();
    assert!(output.ends_with("range_report.csv"));

    let csv_content = std::fs::read_to_string(temp_dir.path().join("range_report.csv"))?;
    let mut reader = csv::Reader::from_reader(csv_content.as_bytes());
    let rows: Vec<csv::StringRecord> = reader.records().collect::<std::result::Result<_, _>>()?;
    assert_eq!(rows.len(), 5);

    assert_eq!(&rows[0][0], "Hemoglobina");
    assert_eq!(&rows[0][2], "12 - 16");
    assert_eq!(&rows[0][3], "NORMAL");

    assert_eq!(&rows[1][3], "HIGH");
    assert_eq!(&rows[1][4], "Crescut");
    assert_eq!(&rows[1][6], "Crescut");

    assert_eq!(&rows[2][3], "LOW");
    assert_eq!(&rows[2][5], "low");

    assert_eq!(&rows[3][3], "TEXT");
    assert_eq!(&rows[4][3], "NO_REFERENCE");

    let json: serde_json::Value =
        serde_json::from_slice(&std::fs::read(temp_dir.path().join("range_report.json"))?)?;
    assert_eq!(json["laboratory"], "Regina Maria");
    assert_eq!(json["collection_date"], "2025-06-18");
    assert_eq!(json["summary"]["high"], 1);
    assert_eq!(json["summary"]["low"], 1);

    let ldl = &json["entries"][1]["evaluation"];
    assert_eq!(ldl["kind"], "plotted");
    let colors: Vec<&str> = ldl["segments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["color"].as_str().unwrap())
        .collect();
    assert_eq!(
        colors,
        ["bg-green-500", "bg-orange-300", "bg-orange-500", "bg-red-600"]
    );

    Ok(())
}

#[tokio::test]
async fn test_report_from_file_source() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("analysis.json");
    std::fs::write(&input, serde_json::to_vec(&analysis_body())?)?;

    let output_dir = temp_dir.path().join("out");
    let output_path = output_dir.to_str().unwrap().to_string();
    let mut config = cli_config(input.to_str().unwrap().to_string(), &output_path);
    config.formats = vec!["json".to_string()];

    let pipeline = ReportPipeline::new(LocalStorage::new(&output_path), config);
    let output = ReportRunner::new(pipeline).run().await?;

    assert!(output.ends_with("range_report.json"));
    assert!(output_dir.join("range_report.json").exists());
    assert!(!output_dir.join("range_report.csv").exists());

    Ok(())
}

#[tokio::test]
async fn test_toml_config_with_zip_bundle() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("analysis.json");
    std::fs::write(&input, serde_json::to_vec(&analysis_body())?)?;
    let output_path = temp_dir.path().join("reports");

    let toml = format!(
        r#"
[report]
name = "bundle-test"

[source]
endpoint = "{}"

[load]
output_path = "{}"
output_formats = ["csv", "json"]

[load.bundle]
enabled = true
filename = "analysis_report.zip"

[palette.normal]
background = "bg-teal-500"
marker = "bg-teal-700"
"#,
        input.display(),
        output_path.display()
    );

    let config = TomlConfig::from_toml_str(&toml)?;
    config.validate()?;

    let storage = LocalStorage::new(&output_path);
    let output = ReportRunner::new(ReportPipeline::new(storage, config))
        .run()
        .await?;
    assert!(output.ends_with("analysis_report.zip"));

    let zip_data = std::fs::read(output_path.join("analysis_report.zip"))?;
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data))?;
    assert_eq!(archive.len(), 2);

    let mut json_content = String::new();
    archive
        .by_name("range_report.json")?
        .read_to_string(&mut json_content)?;
    let json: serde_json::Value = serde_json::from_str(&json_content)?;
    assert_eq!(
        json["entries"][0]["evaluation"]["segments"][1]["color"],
        "bg-teal-500"
    );
    assert_eq!(
        json["entries"][0]["evaluation"]["marker_color"],
        "bg-teal-700"
    );

    Ok(())
}

#[tokio::test]
async fn test_unauthorized_source_fails_with_network_category() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/tests/1/test-data");
        then.status(401);
    });

    let config = cli_config(server.url("/api/tests/1/test-data"), &output_path);
    let pipeline = ReportPipeline::new(LocalStorage::new(&output_path), config);
    let err = ReportRunner::new(pipeline).run().await.unwrap_err();

    api_mock.assert();
    assert!(matches!(err, ReportError::SourceError { .. }));
    assert!(err.exit_code() > 0);
    assert!(std::fs::read_dir(temp_dir.path())?.next().is_none());

    Ok(())
}

#[tokio::test]
async fn test_malformed_document_is_a_data_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("broken.json");
    std::fs::write(&input, b"{\"rezults\": [")?;

    let output_path = temp_dir.path().join("out").to_str().unwrap().to_string();
    let config = cli_config(input.to_str().unwrap().to_string(), &output_path);
    let pipeline = ReportPipeline::new(LocalStorage::new(&output_path), config);

    let err = ReportRunner::new(pipeline).run().await.unwrap_err();
    assert!(matches!(err, ReportError::SerializationError(_)));

    Ok(())
}
