use super::segments::ReferenceSet;
use crate::utils::error::Result;
use crate::utils::validation::{validate_range, Validate};
use serde::{Deserialize, Serialize};

/// Display tuning for the range bar. These only affect legibility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleConstants {
    /// Padding below a non-positive first threshold, as a share of its magnitude.
    pub low_pad_ratio: f64,
    /// Axis minimum multiplier when a negative value falls below the axis.
    pub negative_value_headroom: f64,
    /// Axis maximum as a multiple of the highest threshold.
    pub high_headroom: f64,
    /// Extra room past a value that overshoots the axis maximum.
    pub overflow_pad_ratio: f64,
    /// Axis maximum when nothing else gives one.
    pub default_axis_max: f64,
    pub marker_min_percent: f64,
    pub marker_max_percent: f64,
}

impl Default for ScaleConstants {
    fn default() -> Self {
        Self {
            low_pad_ratio: 0.5,
            negative_value_headroom: 1.2,
            high_headroom: 1.3,
            overflow_pad_ratio: 0.2,
            default_axis_max: 10.0,
            marker_min_percent: 2.0,
            marker_max_percent: 98.0,
        }
    }
}

impl Validate for ScaleConstants {
    fn validate(&self) -> Result<()> {
        validate_range("scale.low_pad_ratio", self.low_pad_ratio, 0.0, 10.0)?;
        validate_range(
            "scale.negative_value_headroom",
            self.negative_value_headroom,
            1.0,
            10.0,
        )?;
        validate_range("scale.high_headroom", self.high_headroom, 1.0, 10.0)?;
        validate_range("scale.overflow_pad_ratio", self.overflow_pad_ratio, 0.0, 10.0)?;
        validate_range(
            "scale.default_axis_max",
            self.default_axis_max,
            f64::MIN_POSITIVE,
            f64::MAX,
        )?;
        validate_range("scale.marker_min_percent", self.marker_min_percent, 0.0, 50.0)?;
        validate_range("scale.marker_max_percent", self.marker_max_percent, 50.0, 100.0)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleLayout {
    pub axis_min: f64,
    pub axis_max: f64,
    /// Boundary values between adjacent segments, one fewer than segments.
    pub thresholds: Vec<f64>,
    /// Width of every segment in percent. Segments are equal-width, not to scale.
    pub segment_width: f64,
    pub marker_position: f64,
    pub active_segment: usize,
}

/// Boundary between each adjacent pair of bands.
///
/// A pair with no finite boundary on either side repeats the previous
/// threshold, or borrows the next finite one when it comes first.
pub fn thresholds(set: &ReferenceSet) -> Vec<f64> {
    let raw: Vec<Option<f64>> = set
        .limits()
        .windows(2)
        .map(|pair| pair[0].upper_bound.value().or(pair[1].lower_bound.value()))
        .collect();

    let first_known = raw.iter().flatten().copied().next().unwrap_or(0.0);
    let mut previous = first_known;

    raw.into_iter()
        .map(|t| {
            let t = t.unwrap_or(previous);
            previous = t;
            t
        })
        .collect()
}

pub fn axis_min(thresholds: &[f64], value: f64, constants: &ScaleConstants) -> f64 {
    let mut min = match thresholds.first() {
        None => 0.0,
        Some(&first) if first > 0.0 => 0.0,
        Some(&first) => first - first.abs() * constants.low_pad_ratio,
    };

    if value < min {
        min = if value < 0.0 {
            value * constants.negative_value_headroom
        } else {
            0.0
        };
    }

    min
}

pub fn axis_max(thresholds: &[f64], value: f64, constants: &ScaleConstants) -> f64 {
    let mut max = match thresholds.last() {
        None => constants.default_axis_max,
        Some(&last) => last * constants.high_headroom,
    };

    if max == 0.0 {
        max = constants.default_axis_max;
    }

    if value > max {
        max = value + value.abs() * constants.overflow_pad_ratio;
    }

    max
}

/// Lays out the bar for `value` over `set`.
pub fn layout_scale(set: &ReferenceSet, value: f64, constants: &ScaleConstants) -> ScaleLayout {
    let thresholds = thresholds(set);
    let axis_min = axis_min(&thresholds, value, constants);
    let axis_max = axis_max(&thresholds, value, constants);
    let segment_width = 100.0 / set.len() as f64;

    let mut points = Vec::with_capacity(thresholds.len() + 2);
    points.push(axis_min);
    points.extend_from_slice(&thresholds);
    points.push(axis_max);

    let (active_segment, marker_position) = place_marker(&points, value, segment_width, constants);

    ScaleLayout {
        axis_min,
        axis_max,
        thresholds,
        segment_width,
        marker_position,
        active_segment,
    }
}

fn place_marker(
    points: &[f64],
    value: f64,
    segment_width: f64,
    constants: &ScaleConstants,
) -> (usize, f64) {
    let last_segment = points.len() - 2;

    if value < points[0] {
        return (0, constants.marker_min_percent);
    }
    if value > points[points.len() - 1] {
        return (last_segment, constants.marker_max_percent);
    }

    let enclosing = points
        .windows(2)
        .position(|w| w[0] <= value && value <= w[1]);

    match enclosing {
        Some(i) => {
            let (start, end) = (points[i], points[i + 1]);
            let fraction = if end == start {
                0.5
            } else {
                (value - start) / (end - start)
            };
            let position = i as f64 * segment_width + fraction * segment_width;
            // a marker on the very edge of the bar is not visible
            let position = position
                .max(constants.marker_min_percent)
                .min(constants.marker_max_percent);
            (i, position)
        }
        None => {
            // only reachable for NaN values
            tracing::debug!(value, "no enclosing interval, pinning marker right");
            (last_segment, constants.marker_max_percent)
        }
    }
}
