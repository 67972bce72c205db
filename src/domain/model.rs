use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// One end of a reference band. The analysis service sends `null` for an
/// open end, which maps to `Unbounded`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum Bound {
    Bounded(f64),
    #[default]
    Unbounded,
}

impl Bound {
    pub fn value(self) -> Option<f64> {
        match self {
            Bound::Bounded(v) => Some(v),
            Bound::Unbounded => None,
        }
    }
}

impl From<Option<f64>> for Bound {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => Bound::Bounded(v),
            _ => Bound::Unbounded,
        }
    }
}

impl From<Bound> for Option<f64> {
    fn from(bound: Bound) -> Self {
        bound.value()
    }
}

/// Status attached to a reference band. The set is open: anything the
/// analysis service invents is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LimitStatus {
    Low,
    Normal,
    High,
    Inconclusive,
    Other(String),
}

impl LimitStatus {
    pub fn as_str(&self) -> &str {
        match self {
            LimitStatus::Low => "LOW",
            LimitStatus::Normal => "NORMAL",
            LimitStatus::High => "HIGH",
            LimitStatus::Inconclusive => "INCONCLUSIVE",
            LimitStatus::Other(s) => s,
        }
    }
}

impl From<String> for LimitStatus {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "LOW" => LimitStatus::Low,
            "NORMAL" => LimitStatus::Normal,
            "HIGH" => LimitStatus::High,
            "INCONCLUSIVE" => LimitStatus::Inconclusive,
            _ => LimitStatus::Other(value),
        }
    }
}

impl From<&str> for LimitStatus {
    fn from(value: &str) -> Self {
        LimitStatus::from(value.to_string())
    }
}

impl From<LimitStatus> for String {
    fn from(status: LimitStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for LimitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceLimit {
    #[serde(default)]
    pub lower_bound: Bound,
    #[serde(default)]
    pub upper_bound: Bound,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub status: Option<LimitStatus>,
}

impl ReferenceLimit {
    pub fn new(status: LimitStatus, label: &str, lower_bound: Bound, upper_bound: Bound) -> Self {
        Self {
            lower_bound,
            upper_bound,
            label: Some(label.to_string()),
            status: Some(status),
        }
    }

    pub fn is_status(&self, status: &LimitStatus) -> bool {
        self.status.as_ref() == Some(status)
    }

    pub fn display_label(&self) -> &str {
        match (&self.label, &self.status) {
            (Some(label), _) => label,
            (None, Some(status)) => status.as_str(),
            (None, None) => "",
        }
    }
}

/// A single row of the analysis service's `rezults` list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabResult {
    #[serde(default)]
    pub test_name: String,
    #[serde(default)]
    pub numeric_value: Option<f64>,
    #[serde(default)]
    pub string_value: Option<String>,
    #[serde(default, rename = "um")]
    pub unit: Option<String>,
    #[serde(default, rename = "min_reference")]
    pub min: Option<f64>,
    #[serde(default, rename = "max_reference")]
    pub max: Option<f64>,
    #[serde(default)]
    pub text_reference: Option<String>,
    #[serde(default)]
    pub flag: Option<String>,
    #[serde(default)]
    pub limits: Option<Vec<ReferenceLimit>>,
}

impl LabResult {
    /// Non-blank flag text, if any.
    pub fn flag(&self) -> Option<&str> {
        self.flag.as_deref().map(str::trim).filter(|f| !f.is_empty())
    }

    pub fn text_value(&self) -> Option<&str> {
        self.string_value
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Document produced by the analysis job for one uploaded lab test.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    #[serde(default)]
    pub laboratory: Option<String>,
    #[serde(default)]
    pub collection_date: Option<String>,
    #[serde(default, rename = "rezults", alias = "results")]
    pub results: Vec<LabResult>,
}

impl AnalysisReport {
    /// `collection_date` parsed as `YYYY-MM-DD`; malformed dates yield `None`.
    pub fn collection_date(&self) -> Option<NaiveDate> {
        self.collection_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok())
    }
}

/// Where the analysis document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportSource {
    Http { url: String },
    File { path: PathBuf },
}

impl ReportSource {
    /// `http://` and `https://` locations are fetched, anything else is read from disk.
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            ReportSource::Http {
                url: trimmed.to_string(),
            }
        } else {
            ReportSource::File {
                path: PathBuf::from(trimmed),
            }
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, ReportSource::Http { .. })
    }
}

impl fmt::Display for ReportSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportSource::Http { url } => f.write_str(url),
            ReportSource::File { path } => write!(f, "{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_deserializes_from_nullable_number() {
        let limit: ReferenceLimit = serde_json::from_value(serde_json::json!({
            "lowerBound": null,
            "upperBound": 150.0,
            "label": "Normal",
            "status": "NORMAL"
        }))
        .unwrap();

        assert_eq!(limit.lower_bound, Bound::Unbounded);
        assert_eq!(limit.upper_bound, Bound::Bounded(150.0));
        assert_eq!(limit.status, Some(LimitStatus::Normal));
    }

    #[test]
    fn test_missing_bounds_default_to_unbounded() {
        let limit: ReferenceLimit =
            serde_json::from_value(serde_json::json!({"label": "Crescut", "status": "HIGH"}))
                .unwrap();
        assert_eq!(limit.lower_bound, Bound::Unbounded);
        assert_eq!(limit.upper_bound, Bound::Unbounded);
    }

    #[test]
    fn test_unknown_status_is_preserved() {
        let status = LimitStatus::from("Borderline");
        assert_eq!(status, LimitStatus::Other("Borderline".to_string()));
        assert_eq!(status.to_string(), "Borderline");
        assert_eq!(LimitStatus::from(" high "), LimitStatus::High);
    }

    #[test]
    fn test_analysis_report_wire_shape() {
        let report: AnalysisReport = serde_json::from_value(serde_json::json!({
            "laboratory": "Synevo",
            "collection_date": "2025-03-14",
            "rezults": [{
                "test_name": "Glicemie",
                "numeric_value": 92.0,
                "string_value": null,
                "um": "mg/dL",
                "min_reference": 70.0,
                "max_reference": 105.0,
                "text_reference": "70 - 105",
                "flag": "Normal",
                "limits": null
            }]
        }))
        .unwrap();

        assert_eq!(report.results.len(), 1);
        let item = &report.results[0];
        assert_eq!(item.unit.as_deref(), Some("mg/dL"));
        assert_eq!(item.min, Some(70.0));
        assert_eq!(item.max, Some(105.0));
        assert!(item.limits.is_none());
        assert_eq!(
            report.collection_date(),
            NaiveDate::from_ymd_opt(2025, 3, 14)
        );
    }

    #[test]
    fn test_malformed_collection_date() {
        let report = AnalysisReport {
            collection_date: Some("14.03.2025".to_string()),
            ..Default::default()
        };
        assert!(report.collection_date().is_none());
    }

    #[test]
    fn test_report_source_parse() {
        assert_eq!(
            ReportSource::parse("https://portal.example/api/tests/7/test-data"),
            ReportSource::Http {
                url: "https://portal.example/api/tests/7/test-data".to_string()
            }
        );
        assert!(ReportSource::parse("HTTP://localhost:8080/x").is_remote());
        assert_eq!(
            ReportSource::parse("./results.json"),
            ReportSource::File {
                path: PathBuf::from("./results.json")
            }
        );
    }

    #[test]
    fn test_blank_flag_is_ignored() {
        let item = LabResult {
            flag: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(item.flag().is_none());
    }
}
