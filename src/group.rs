use crate::error::PlotError;
use crate::table::{Field, Sample};

/// Label shared by every no-index series, whatever chart it appears in.
pub const BASELINE_LABEL: &str = "baseline (no index)";

/// Samples sharing one value of the grouping field.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub field: Field,
    pub group_value: f64,
    pub samples: Vec<Sample>,
}

impl Series {
    /// The no-index control series. Only grid-size groupings have one.
    pub fn is_baseline(&self) -> bool {
        self.field == Field::GridSize
            && self
                .samples
                .first()
                .map(|s| s.config.is_baseline())
                .unwrap_or(false)
    }

    pub fn label(&self) -> String {
        if self.is_baseline() {
            BASELINE_LABEL.to_string()
        } else {
            format!(
                "{} {}={}",
                self.field.name(),
                self.field.symbol(),
                self.group_value
            )
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Partition `samples` by the distinct values of `field`, ascending.
///
/// Every sample lands in exactly one series and keeps its relative order within it.
/// NaN values cannot be ordered and are rejected.
pub fn group_by(samples: &[Sample], field: Field) -> Result<Vec<Series>, PlotError> {
    if let Some(idx) = samples.iter().position(|s| field.value(s).is_nan()) {
        return Err(PlotError::malformed(
            None,
            format!("sample {} has a NaN {}", idx + 1, field.name().to_lowercase()),
        ));
    }

    let mut sorted = samples.to_vec();
    // Stable sort: ties keep input order.
    sorted.sort_by(|a, b| field.value(a).total_cmp(&field.value(b)));

    let series = sorted
        .chunk_by(|a, b| field.value(a) == field.value(b))
        .map(|chunk| Series {
            field,
            group_value: field.value(&chunk[0]),
            samples: chunk.to_vec(),
        })
        .collect();

    Ok(series)
}

/// Sorted distinct values of `field`.
pub fn distinct_values(samples: &[Sample], field: Field) -> Result<Vec<f64>, PlotError> {
    Ok(group_by(samples, field)?
        .iter()
        .map(|s| s.group_value)
        .collect())
}
