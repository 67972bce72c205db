use crate::domain::model::{Bound, LimitStatus, ReferenceLimit};
use serde::Serialize;

/// Ordered, non-empty list of reference bands, ascending along the axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ReferenceSet(Vec<ReferenceLimit>);

impl ReferenceSet {
    pub fn new(limits: Vec<ReferenceLimit>) -> Option<Self> {
        if limits.is_empty() {
            None
        } else {
            Some(Self(limits))
        }
    }

    pub fn limits(&self) -> &[ReferenceLimit] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> &ReferenceLimit {
        &self.0[0]
    }

    pub fn last(&self) -> &ReferenceLimit {
        &self.0[self.0.len() - 1]
    }

    pub fn into_inner(self) -> Vec<ReferenceLimit> {
        self.0
    }
}

/// Builds the band list for a result. Explicit limits win over the legacy
/// scalar `min`/`max`; `None` means there is nothing to draw.
pub fn build_segments(
    limits: Option<&[ReferenceLimit]>,
    min: Option<f64>,
    max: Option<f64>,
) -> Option<ReferenceSet> {
    let segments = match limits {
        Some(limits) if !limits.is_empty() => limits.to_vec(),
        _ => synthesize(min, max)?,
    };

    drop_zero_floor_low(segments)
}

fn synthesize(min: Option<f64>, max: Option<f64>) -> Option<Vec<ReferenceLimit>> {
    let min = min.filter(|v| v.is_finite());
    let max = max.filter(|v| v.is_finite());

    let segments = match (min, max) {
        (Some(min), Some(max)) => vec![
            ReferenceLimit::new(LimitStatus::Low, "Low", Bound::Unbounded, Bound::Bounded(min)),
            ReferenceLimit::new(
                LimitStatus::Normal,
                "Normal",
                Bound::Bounded(min),
                Bound::Bounded(max),
            ),
            ReferenceLimit::new(LimitStatus::High, "High", Bound::Bounded(max), Bound::Unbounded),
        ],
        (None, Some(max)) => vec![
            ReferenceLimit::new(
                LimitStatus::Normal,
                "Normal",
                Bound::Unbounded,
                Bound::Bounded(max),
            ),
            ReferenceLimit::new(LimitStatus::High, "High", Bound::Bounded(max), Bound::Unbounded),
        ],
        (Some(min), None) => vec![
            ReferenceLimit::new(LimitStatus::Low, "Low", Bound::Unbounded, Bound::Bounded(min)),
            ReferenceLimit::new(
                LimitStatus::Normal,
                "Normal",
                Bound::Bounded(min),
                Bound::Unbounded,
            ),
        ],
        (None, None) => return None,
    };

    Some(segments)
}

/// A leading LOW band ending exactly at 0 only covers non-positive values
/// and is not shown.
fn drop_zero_floor_low(mut segments: Vec<ReferenceLimit>) -> Option<ReferenceSet> {
    let zero_floor = segments
        .first()
        .is_some_and(|s| s.is_status(&LimitStatus::Low) && s.upper_bound == Bound::Bounded(0.0));

    if zero_floor {
        tracing::trace!("dropping zero-floor LOW band");
        segments.remove(0);
    }

    ReferenceSet::new(segments)
}
