use super::segments::ReferenceSet;
use crate::domain::model::LimitStatus;

/// Status of `value` against `set`. Total: every input yields a status.
///
/// The open outer bands are checked first, then the closed interior bands
/// (inclusive at both ends).
pub fn classify(value: f64, set: &ReferenceSet) -> LimitStatus {
    let first = set.first();
    if let Some(upper) = first.upper_bound.value() {
        if value < upper {
            return first.status.clone().unwrap_or(LimitStatus::Normal);
        }
    }

    let last = set.last();
    if let Some(lower) = last.lower_bound.value() {
        if value > lower {
            return last.status.clone().unwrap_or(LimitStatus::High);
        }
    }

    set.limits()
        .iter()
        .find(|limit| {
            match (limit.lower_bound.value(), limit.upper_bound.value()) {
                (Some(lower), Some(upper)) => lower <= value && value <= upper,
                _ => false,
            }
        })
        .map(|limit| limit.status.clone().unwrap_or(LimitStatus::Normal))
        .unwrap_or(LimitStatus::Normal)
}
