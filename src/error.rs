use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by the load, aggregation, and render stages.
#[derive(Debug, Error)]
pub enum PlotError {
    /// Wrong column count, a non-numeric cell, or NaN where values are compared.
    #[error(
        "malformed input{}: {reason}",
        .line.map(|l| format!(" at line {l}")).unwrap_or_default()
    )]
    MalformedInput { line: Option<usize>, reason: String },

    /// A view or series has nothing to plot once filters are applied.
    #[error("'{name}' has no samples to plot")]
    EmptySeries { name: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to render {}: {message}", .path.display())]
    Render { path: PathBuf, message: String },

    #[error("invalid option: {0}")]
    InvalidOption(String),
}

impl PlotError {
    pub fn malformed(line: Option<usize>, reason: impl Into<String>) -> Self {
        PlotError::MalformedInput {
            line,
            reason: reason.into(),
        }
    }

    /// Errors that only invalidate the chart being drawn. Everything else aborts the batch.
    pub fn is_per_chart(&self) -> bool {
        matches!(self, PlotError::EmptySeries { .. })
    }
}
