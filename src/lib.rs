pub mod aggregate;
pub mod chart;
pub mod error;
pub mod group;
pub mod pipeline;
pub mod style;
pub mod summary;
pub mod table;

pub use chart::{ChartRenderer, PngRenderer};
pub use error::PlotError;
pub use pipeline::{prepare, run_views, BatchReport, View};
pub use table::Table;
