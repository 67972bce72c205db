//! Segment background colors, marker dots and badge tones.
//!
//! Colors are CSS utility class names so the front end can use them as-is.

use crate::domain::model::{LimitStatus, ReferenceLimit};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

pub const LOW_STRONG: &str = "bg-blue-500";
pub const LOW_MUTED: &str = "bg-blue-300";
pub const HIGH_MILD: &str = "bg-orange-300";
pub const HIGH_MODERATE: &str = "bg-orange-500";
pub const HIGH_SEVERE: &str = "bg-red-600";
pub const CAUTION: &str = "bg-yellow-400";
pub const NORMAL: &str = "bg-green-500";

/// Used when a segment has no swatch to take the dot from.
pub const NEUTRAL_MARKER: &str = "bg-gray-500";

/// A segment background and the darker dot drawn on top of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swatch {
    pub background: String,
    pub marker: String,
}

impl Swatch {
    pub fn new(background: &str, marker: &str) -> Self {
        Self {
            background: background.to_string(),
            marker: marker.to_string(),
        }
    }
}

/// Swatches per status. Overridable from configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub low_strong: Swatch,
    pub low_muted: Swatch,
    /// Mildest first.
    pub high_steps: [Swatch; 3],
    pub caution: Swatch,
    pub normal: Swatch,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            low_strong: Swatch::new(LOW_STRONG, "bg-blue-700"),
            low_muted: Swatch::new(LOW_MUTED, "bg-blue-500"),
            high_steps: [
                Swatch::new(HIGH_MILD, "bg-orange-500"),
                Swatch::new(HIGH_MODERATE, "bg-orange-700"),
                Swatch::new(HIGH_SEVERE, "bg-red-800"),
            ],
            caution: Swatch::new(CAUTION, "bg-yellow-600"),
            normal: Swatch::new(NORMAL, "bg-green-700"),
        }
    }
}

impl Palette {
    /// Every swatch with the config key it is set under.
    pub fn swatches(&self) -> [(&'static str, &Swatch); 7] {
        [
            ("palette.low_strong", &self.low_strong),
            ("palette.low_muted", &self.low_muted),
            ("palette.high_steps", &self.high_steps[0]),
            ("palette.high_steps", &self.high_steps[1]),
            ("palette.high_steps", &self.high_steps[2]),
            ("palette.caution", &self.caution),
            ("palette.normal", &self.normal),
        ]
    }

    /// One swatch per segment, left to right.
    ///
    /// Within a run of consecutive LOW bands only the first is strong. A run
    /// of HIGH bands takes the escalation steps right-aligned, so the last
    /// HIGH band is always the most severe.
    pub fn segment_colors(&self, segments: &[ReferenceLimit]) -> Vec<&Swatch> {
        let steps = self.high_steps.len();
        let mut colors = Vec::with_capacity(segments.len());
        let mut i = 0;

        while i < segments.len() {
            match segments[i].status {
                Some(LimitStatus::Low) => {
                    let run = run_length(&segments[i..], &LimitStatus::Low);
                    colors.push(&self.low_strong);
                    colors.extend(std::iter::repeat(&self.low_muted).take(run - 1));
                    i += run;
                }
                Some(LimitStatus::High) => {
                    let run = run_length(&segments[i..], &LimitStatus::High);
                    for k in 0..run {
                        let step = (k + steps).saturating_sub(run);
                        colors.push(&self.high_steps[step]);
                    }
                    i += run;
                }
                Some(LimitStatus::Inconclusive) => {
                    colors.push(&self.caution);
                    i += 1;
                }
                _ => {
                    colors.push(&self.normal);
                    i += 1;
                }
            }
        }

        colors
    }
}

fn run_length(segments: &[ReferenceLimit], status: &LimitStatus) -> usize {
    segments.iter().take_while(|s| s.is_status(status)).count()
}

/// Dot color for the marker on the segment at `active`.
pub fn marker_color(colors: &[&Swatch], active: usize) -> String {
    colors
        .get(active)
        .map(|swatch| swatch.marker.trim())
        .filter(|marker| !marker.is_empty())
        .unwrap_or(NEUTRAL_MARKER)
        .to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTone {
    Normal,
    Low,
    High,
    Borderline,
    Inconclusive,
}

impl BadgeTone {
    pub fn from_status(status: &LimitStatus) -> Self {
        match status {
            LimitStatus::Low => BadgeTone::Low,
            LimitStatus::High => BadgeTone::High,
            LimitStatus::Inconclusive => BadgeTone::Inconclusive,
            LimitStatus::Normal | LimitStatus::Other(_) => BadgeTone::Normal,
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            BadgeTone::Normal => "bg-green-100 text-green-800",
            BadgeTone::Low => "bg-blue-100 text-blue-800",
            BadgeTone::High => "bg-red-100 text-red-800",
            BadgeTone::Borderline => "bg-orange-100 text-orange-800",
            BadgeTone::Inconclusive => "bg-yellow-100 text-yellow-800",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BadgeTone::Normal => "normal",
            BadgeTone::Low => "low",
            BadgeTone::High => "high",
            BadgeTone::Borderline => "borderline",
            BadgeTone::Inconclusive => "inconclusive",
        }
    }
}

// Checked in order; normal markers go first so "Negativ" never reads as low.
static FLAG_VOCABULARY: LazyLock<Vec<(Regex, BadgeTone)>> = LazyLock::new(|| {
    [
        (
            r"(?i)\b(normal|negativ|negative|acceptabil|acceptable|optim|optimal|absent|in limite)\b",
            BadgeTone::Normal,
        ),
        (
            r"(?i)(neconcludent|inconclusive|echivoc|equivocal|nedeterminat|indeterminate)",
            BadgeTone::Inconclusive,
        ),
        (r"(?i)(la limit|borderline|limit[aă])", BadgeTone::Borderline),
        (
            r"(?i)(crescut|ridicat|mărit|marit|high|elevated|pozitiv|positive|reactiv|anormal|abnormal|\bh\b)",
            BadgeTone::High,
        ),
        (r"(?i)(sc[aă]zut|deficit|redus|low|decreased|\bl\b)", BadgeTone::Low),
    ]
    .into_iter()
    .filter_map(|(pattern, tone)| match Regex::new(pattern) {
        Ok(re) => Some((re, tone)),
        Err(e) => {
            tracing::error!("invalid flag pattern {}: {}", pattern, e);
            None
        }
    })
    .collect()
});

/// Badge tone for a free-text flag. Unknown or missing flags are styled normal.
pub fn tone_for_flag(flag: Option<&str>) -> BadgeTone {
    let Some(flag) = flag else {
        return BadgeTone::Normal;
    };

    FLAG_VOCABULARY
        .iter()
        .find(|(re, _)| re.is_match(flag))
        .map(|(_, tone)| *tone)
        .unwrap_or(BadgeTone::Normal)
}

/// Default badge text when no flag was supplied.
pub fn default_badge_text(status: &LimitStatus) -> String {
    match status {
        LimitStatus::Low => "Low".to_string(),
        LimitStatus::Normal => "Normal".to_string(),
        LimitStatus::High => "High".to_string(),
        LimitStatus::Inconclusive => "Inconclusive".to_string(),
        LimitStatus::Other(s) => s.clone(),
    }
}
