use crate::core::range::{BadgeTone, Evaluation, RangeEngine};
use crate::domain::model::{AnalysisReport, LabResult};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub result: LabResult,
    pub evaluation: Evaluation,
}

/// Evaluated analysis document, ready to be written out.
#[derive(Debug, Clone, Serialize)]
pub struct RangeReport {
    pub laboratory: Option<String>,
    pub collection_date: Option<NaiveDate>,
    pub generated_at: DateTime<Utc>,
    pub entries: Vec<ReportEntry>,
    /// Result count per badge tone.
    pub summary: BTreeMap<&'static str, usize>,
}

impl RangeReport {
    pub fn build(engine: &RangeEngine, report: AnalysisReport) -> Self {
        let collection_date = report.collection_date();
        let entries: Vec<ReportEntry> = report
            .results
            .into_iter()
            .map(|result| {
                let evaluation = engine.evaluate(&result);
                ReportEntry { result, evaluation }
            })
            .collect();

        let mut summary = BTreeMap::new();
        for entry in &entries {
            *summary.entry(entry.evaluation.tone().as_str()).or_insert(0) += 1;
        }

        Self {
            laboratory: report.laboratory,
            collection_date,
            generated_at: Utc::now(),
            entries,
            summary,
        }
    }

    pub fn rows(&self) -> Vec<ReportRow> {
        self.entries.iter().map(ReportRow::from).collect()
    }

    /// Results whose badge is anything but normal.
    pub fn flagged_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.evaluation.tone() != BadgeTone::Normal)
            .count()
    }
}

/// Flat, table-friendly view of one entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub test_name: String,
    pub value: String,
    pub reference: String,
    pub status: String,
    pub badge: String,
    pub tone: String,
    pub active_segment: Option<String>,
    pub marker_position: Option<f64>,
    pub marker_color: Option<String>,
    pub axis_min: Option<f64>,
    pub axis_max: Option<f64>,
}

impl From<&ReportEntry> for ReportRow {
    fn from(entry: &ReportEntry) -> Self {
        let result = &entry.result;
        let evaluation = &entry.evaluation;

        let status = match evaluation {
            Evaluation::NotApplicable => "N/A".to_string(),
            Evaluation::Textual { .. } => "TEXT".to_string(),
            Evaluation::NoReference { .. } => "NO_REFERENCE".to_string(),
            Evaluation::Plotted(view) => view.status.to_string(),
        };

        let mut row = ReportRow {
            test_name: result.test_name.clone(),
            value: display_value(result),
            reference: display_reference(result),
            status,
            badge: evaluation
                .badge()
                .map(|b| b.text.clone())
                .unwrap_or_default(),
            tone: evaluation.tone().as_str().to_string(),
            active_segment: None,
            marker_position: None,
            marker_color: None,
            axis_min: None,
            axis_max: None,
        };

        if let Evaluation::Plotted(view) = evaluation {
            row.active_segment = view.active_segment().map(|s| s.label.clone());
            row.marker_position = Some(round2(view.layout.marker_position));
            row.marker_color = Some(view.marker_color.clone());
            row.axis_min = Some(round2(view.layout.axis_min));
            row.axis_max = Some(round2(view.layout.axis_max));
        }

        row
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `"<value> <unit>"`, the text value, or `N/A`.
pub fn display_value(result: &LabResult) -> String {
    if let Some(value) = result.numeric_value {
        return match result.unit.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            Some(unit) => format!("{} {}", value, unit),
            None => value.to_string(),
        };
    }

    result
        .text_value()
        .map(str::to_string)
        .unwrap_or_else(|| "N/A".to_string())
}

/// The lab's own reference text, else one rebuilt from the scalar bounds.
pub fn display_reference(result: &LabResult) -> String {
    if let Some(text) = result
        .text_reference
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        return text.to_string();
    }

    match (result.min, result.max) {
        (Some(min), Some(max)) => format!("{} - {}", min, max),
        (None, Some(max)) => format!("< {}", max),
        (Some(min), None) => format!("> {}", min),
        (None, None) => "-".to_string(),
    }
}
