use crate::error::PlotError;
use crate::group::{group_by, Series};
use crate::table::Field;

/// Mean duration at one x value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub x: f64,
    pub mean_y: f64,
}

/// Mean-duration trend line of one series, strictly ascending in `x`.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedCurve {
    pub x_field: Field,
    pub points: Vec<CurvePoint>,
}

impl AggregatedCurve {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A curve with a single x value is drawn as a point, not a line.
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 2
    }

    pub fn coords(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.x, p.mean_y)).collect()
    }

    /// Point with the lowest mean duration.
    pub fn min_mean(&self) -> Option<CurvePoint> {
        self.points
            .iter()
            .copied()
            .min_by(|a, b| a.mean_y.total_cmp(&b.mean_y))
    }
}

/// The single fastest raw sample of a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtremumPoint {
    pub x: f64,
    pub y: f64,
}

/// Durations are averaged and compared, so NaN or infinite values can't be used.
fn check_durations(series: &Series) -> Result<(), PlotError> {
    match series.samples.iter().position(|s| !s.duration_ms.is_finite()) {
        Some(idx) => Err(PlotError::malformed(
            None,
            format!(
                "{}: sample {} has a non-finite duration ({})",
                series.label(),
                idx + 1,
                series.samples[idx].duration_ms
            ),
        )),
        None => Ok(()),
    }
}

/// Mean `duration_ms` of `series` at each distinct value of `x_field`.
pub fn aggregate(series: &Series, x_field: Field) -> Result<AggregatedCurve, PlotError> {
    if series.is_empty() {
        return Err(PlotError::EmptySeries {
            name: series.label(),
        });
    }
    check_durations(series)?;

    let points = group_by(&series.samples, x_field)?
        .iter()
        .map(|bucket| {
            let sum: f64 = bucket.samples.iter().map(|s| s.duration_ms).sum();
            CurvePoint {
                x: bucket.group_value,
                mean_y: sum / bucket.len() as f64,
            }
        })
        .collect();

    Ok(AggregatedCurve { x_field, points })
}

/// Raw sample with the minimum duration; the first one wins on ties.
pub fn extremum(series: &Series, x_field: Field) -> Result<ExtremumPoint, PlotError> {
    check_durations(series)?;
    series
        .samples
        .iter()
        .min_by(|a, b| a.duration_ms.total_cmp(&b.duration_ms))
        .map(|s| ExtremumPoint {
            x: x_field.value(s),
            y: s.duration_ms,
        })
        .ok_or_else(|| PlotError::EmptySeries {
            name: series.label(),
        })
}
