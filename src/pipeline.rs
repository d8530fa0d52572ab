use crate::aggregate::{aggregate, extremum, AggregatedCurve, ExtremumPoint};
use crate::chart::{ChartOptions, ChartRenderer, YScale};
use crate::error::PlotError;
use crate::group::{group_by, Series};
use crate::style::{jitter_offsets, Palette, SeriesStyle, StyleAssignment};
use crate::summary::print_summary;
use crate::table::{Field, Table};
use rand::Rng;
use std::path::{Path, PathBuf};

/// One comparison chart: which field splits the series, which goes on the x axis.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub name: String,
    /// Written into the output directory; not configurable.
    pub file_name: String,
    pub group_by: Field,
    pub x_field: Field,
    /// Drop no-index rows before grouping.
    pub exclude_baseline: bool,
    /// Mark the fastest raw sample of each series.
    pub mark_extrema: bool,
    /// Half-width of the uniform x offset applied to scatter points only.
    pub jitter: f64,
    pub options: ChartOptions,
}

impl View {
    /// Frame time against query radius, one series per grid size plus the baseline.
    pub fn by_query_radius() -> Self {
        Self {
            name: "by_query_radius".to_string(),
            file_name: "by_query_radius.png".to_string(),
            group_by: Field::GridSize,
            x_field: Field::QueryRadius,
            exclude_baseline: false,
            mark_extrema: false,
            jitter: 0.5,
            options: ChartOptions {
                caption: "Frame Time by Query Radius (log scale)".to_string(),
                x_label: Field::QueryRadius.axis_label().to_string(),
                y_scale: YScale::Logarithmic,
                ..ChartOptions::default()
            },
        }
    }

    /// Frame time against grid size, one series per query radius.
    pub fn by_grid_size() -> Self {
        Self {
            name: "by_grid_size".to_string(),
            file_name: "by_grid_size.png".to_string(),
            group_by: Field::QueryRadius,
            x_field: Field::GridSize,
            exclude_baseline: true,
            mark_extrema: false,
            jitter: 0.0,
            options: ChartOptions {
                caption: "Frame Time by Grid Size".to_string(),
                x_label: Field::GridSize.axis_label().to_string(),
                y_scale: YScale::Linear,
                ..ChartOptions::default()
            },
        }
    }

    /// Frame time against grid size per workload, with the best grid size marked.
    pub fn by_workload_minima() -> Self {
        Self {
            name: "by_workload_minima".to_string(),
            file_name: "by_workload_minima.png".to_string(),
            group_by: Field::WorkloadSize,
            x_field: Field::GridSize,
            exclude_baseline: true,
            mark_extrema: true,
            jitter: 0.0,
            options: ChartOptions {
                caption: "Fastest Grid Size per Workload (log scale)".to_string(),
                x_label: Field::GridSize.axis_label().to_string(),
                y_scale: YScale::Logarithmic,
                ..ChartOptions::default()
            },
        }
    }

    pub fn standard() -> Vec<View> {
        vec![
            Self::by_query_radius(),
            Self::by_grid_size(),
            Self::by_workload_minima(),
        ]
    }

    /// Replace the jitter width of every view that plots query radius on x.
    /// Views with grid size on x keep their own setting.
    pub fn override_query_jitter(views: &mut [View], jitter: f64) {
        for view in views.iter_mut().filter(|v| v.x_field == Field::QueryRadius) {
            view.jitter = jitter;
        }
    }
}

/// Everything drawn for one series.
#[derive(Debug, Clone)]
pub struct ChartLayer {
    pub series: Series,
    pub curve: AggregatedCurve,
    pub extremum: Option<ExtremumPoint>,
    pub style: SeriesStyle,
    /// Raw samples as drawn: jittered x, duration in ms.
    pub scatter: Vec<(f64, f64)>,
}

/// A view after aggregation, ready for a renderer.
#[derive(Debug, Clone)]
pub struct PreparedChart {
    pub view_name: String,
    pub x_field: Field,
    pub options: ChartOptions,
    pub layers: Vec<ChartLayer>,
}

/// Filter, group, aggregate, and style `table` for `view`.
pub fn prepare<R: Rng + ?Sized>(
    table: &Table,
    view: &View,
    palette: &Palette,
    rng: &mut R,
) -> Result<PreparedChart, PlotError> {
    let filtered;
    let samples = if view.exclude_baseline {
        filtered = table.without_baseline();
        &filtered.samples
    } else {
        &table.samples
    };

    if samples.is_empty() {
        return Err(PlotError::EmptySeries {
            name: view.name.clone(),
        });
    }

    let series = group_by(samples, view.group_by)?;
    let styles = StyleAssignment::assign(&series, palette);

    let mut layers = Vec::with_capacity(series.len());
    for (series, style) in series.into_iter().zip(styles.iter().cloned()) {
        let curve = aggregate(&series, view.x_field)?;
        let best = if view.mark_extrema {
            Some(extremum(&series, view.x_field)?)
        } else {
            None
        };

        let offsets = jitter_offsets(&mut *rng, series.len(), view.jitter)?;
        let scatter = series
            .samples
            .iter()
            .zip(offsets)
            .map(|(s, dx)| (view.x_field.value(s) + dx, s.duration_ms))
            .collect();

        log::debug!(
            "[{}] {}: {} samples, {} x values",
            view.name,
            style.label,
            series.len(),
            curve.len()
        );

        layers.push(ChartLayer {
            series,
            curve,
            extremum: best,
            style,
            scatter,
        });
    }

    Ok(PreparedChart {
        view_name: view.name.clone(),
        x_field: view.x_field,
        options: view.options.clone(),
        layers,
    })
}

/// Outcome of a batch of views.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub written: Vec<PathBuf>,
    /// Views that could not be drawn, with the reason.
    pub skipped: Vec<(String, PlotError)>,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Prepare and render every view into `output_dir`.
///
/// A view with nothing to plot is reported and skipped. Any other failure stops the batch.
pub fn run_views<R: Rng + ?Sized>(
    table: &Table,
    views: &[View],
    palette: &Palette,
    renderer: &mut dyn ChartRenderer,
    output_dir: &Path,
    rng: &mut R,
) -> Result<BatchReport, PlotError> {
    std::fs::create_dir_all(output_dir).map_err(|source| PlotError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut report = BatchReport::default();

    for view in views {
        let output = output_dir.join(&view.file_name);
        let result = prepare(table, view, palette, &mut *rng).and_then(|chart| {
            print_summary(&chart);
            renderer.render(&chart, &output)
        });

        match result {
            Ok(()) => {
                log::info!("Generated: {}", output.display());
                report.written.push(output);
            }
            Err(err) if err.is_per_chart() => {
                log::error!("Skipping {}: {}", view.name, err);
                report.skipped.push((view.name.clone(), err));
            }
            Err(err) => return Err(err),
        }
    }

    Ok(report)
}
