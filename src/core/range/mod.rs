//! Reference-range classification and scale layout for a single lab result.
//!
//! Everything here is pure: no I/O, no shared state, nothing cached between
//! calls. A `RangeEngine` can be shared freely across rows and threads.

pub mod classify;
pub mod layout;
pub mod palette;
pub mod segments;

pub use layout::{ScaleConstants, ScaleLayout};
pub use palette::{BadgeTone, Palette, Swatch};
pub use segments::ReferenceSet;

use crate::domain::model::{LabResult, LimitStatus, ReferenceLimit};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Badge {
    pub text: String,
    pub tone: BadgeTone,
    pub class: &'static str,
}

impl Badge {
    fn new(text: String, tone: BadgeTone) -> Self {
        Self {
            text,
            tone,
            class: tone.class(),
        }
    }

    /// Badge built from the flag text alone, when there is no band to compare with.
    fn from_flag(flag: Option<&str>) -> Option<Self> {
        flag.map(|f| Badge::new(f.to_string(), palette::tone_for_flag(Some(f))))
    }
}

/// One rendered band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub label: String,
    pub status: Option<LimitStatus>,
    pub lower_bound: Option<f64>,
    pub upper_bound: Option<f64>,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeView {
    pub segments: Vec<Segment>,
    pub layout: ScaleLayout,
    pub marker_color: String,
    pub status: LimitStatus,
    pub badge: Badge,
}

impl RangeView {
    pub fn active_segment(&self) -> Option<&Segment> {
        self.segments.get(self.layout.active_segment)
    }
}

/// Outcome for one result. Only `Plotted` carries a scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Evaluation {
    /// Neither a numeric nor a text value: shown as "N/A".
    NotApplicable,
    /// Text result such as "Negativ"; styled from the flag vocabulary.
    Textual { value: String, badge: Option<Badge> },
    /// Numeric value without any usable reference data.
    NoReference { value: f64, badge: Option<Badge> },
    Plotted(RangeView),
}

impl Evaluation {
    pub fn badge(&self) -> Option<&Badge> {
        match self {
            Evaluation::NotApplicable => None,
            Evaluation::Textual { badge, .. } | Evaluation::NoReference { badge, .. } => {
                badge.as_ref()
            }
            Evaluation::Plotted(view) => Some(&view.badge),
        }
    }

    /// Tone used for styling; anything without a badge is styled normal.
    pub fn tone(&self) -> BadgeTone {
        self.badge().map(|b| b.tone).unwrap_or(BadgeTone::Normal)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RangeEngine {
    constants: ScaleConstants,
    palette: Palette,
}

impl RangeEngine {
    pub fn new(constants: ScaleConstants, palette: Palette) -> Self {
        Self { constants, palette }
    }

    pub fn build_segments(&self, result: &LabResult) -> Option<ReferenceSet> {
        segments::build_segments(result.limits.as_deref(), result.min, result.max)
    }

    pub fn layout_scale(&self, set: &ReferenceSet, value: f64) -> ScaleLayout {
        layout::layout_scale(set, value, &self.constants)
    }

    pub fn classify(&self, value: f64, set: &ReferenceSet) -> LimitStatus {
        classify::classify(value, set)
    }

    /// Runs segment construction, layout and classification for one result.
    pub fn evaluate(&self, result: &LabResult) -> Evaluation {
        let Some(value) = result.numeric_value.filter(|v| v.is_finite()) else {
            return match result.text_value() {
                Some(text) => Evaluation::Textual {
                    value: text.to_string(),
                    badge: Badge::from_flag(result.flag()),
                },
                None => Evaluation::NotApplicable,
            };
        };

        let Some(set) = self.build_segments(result) else {
            tracing::debug!(test = %result.test_name, "no reference data");
            return Evaluation::NoReference {
                value,
                badge: Badge::from_flag(result.flag()),
            };
        };

        Evaluation::Plotted(self.plot(&set, value, result.flag()))
    }

    fn plot(&self, set: &ReferenceSet, value: f64, flag: Option<&str>) -> RangeView {
        let layout = self.layout_scale(set, value);
        let colors = self.palette.segment_colors(set.limits());
        let marker_color = palette::marker_color(&colors, layout.active_segment);

        let status = self.classify(value, set);
        let text = flag
            .map(str::to_string)
            .unwrap_or_else(|| palette::default_badge_text(&status));
        let badge = Badge::new(text, BadgeTone::from_status(&status));

        let segments = set
            .limits()
            .iter()
            .zip(colors)
            .map(|(limit, swatch)| to_segment(limit, swatch.background.clone()))
            .collect();

        RangeView {
            segments,
            layout,
            marker_color,
            status,
            badge,
        }
    }
}

fn to_segment(limit: &ReferenceLimit, color: String) -> Segment {
    Segment {
        label: limit.display_label().to_string(),
        status: limit.status.clone(),
        lower_bound: limit.lower_bound.value(),
        upper_bound: limit.upper_bound.value(),
        color,
    }
}
