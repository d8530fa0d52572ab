use crate::error::PlotError;
use crate::pipeline::PreparedChart;
use crate::style::Marker;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::ranged1d::ValueFormatter;
use plotters::coord::types::RangedCoordf64;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::fmt::Display;
use std::ops::Range;
use std::path::Path;

// Font sizes
const TITLE_FONT_SIZE: u32 = 40;
const AXIS_LABEL_FONT_SIZE: u32 = 26;
const TICK_LABEL_FONT_SIZE: u32 = 20;
const LEGEND_FONT_SIZE: u32 = 20;
const DATA_LABEL_FONT_SIZE: u32 = 16;

// Layout tuning
const DEFAULT_MARGIN_BOTTOM: u32 = 40;
const DEFAULT_X_LABEL_AREA_SIZE: u32 = 70;
const DEFAULT_Y_LABEL_AREA_SIZE: u32 = 110;

const MARKER_SIZE: i32 = 4;
const EXTREMUM_RING_SIZE: i32 = 10;
const LINE_WIDTH: u32 = 2;

#[cfg(unix)]
const OUTPUT_MODE: u32 = 0o644;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YScale {
    Linear,
    Logarithmic,
}

/// Axis and figure settings for one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub caption: String,
    pub x_label: String,
    pub y_label: String,
    pub y_scale: YScale,
    /// Image size in pixels.
    pub size: (u32, u32),
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            caption: String::new(),
            x_label: String::new(),
            y_label: "Frame Time [ms]".to_string(),
            y_scale: YScale::Linear,
            size: (1600, 800),
        }
    }
}

/// Sink for finished charts.
pub trait ChartRenderer {
    /// Write `chart` to `output`, replacing any existing file.
    fn render(&mut self, chart: &PreparedChart, output: &Path) -> Result<(), PlotError>;
}

/// Draws charts as PNG files with the plotters bitmap backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct PngRenderer;

impl ChartRenderer for PngRenderer {
    fn render(&mut self, chart: &PreparedChart, output: &Path) -> Result<(), PlotError> {
        stage_output(output, |staged| draw_png(chart, staged, output))
    }
}

/// Run `draw` against a temp file next to `output`, then move it into place.
///
/// The temp file keeps `output`'s extension so backends that pick an encoder by
/// extension still work. On any failure the temp file is removed and `output` is untouched.
pub fn stage_output<F>(output: &Path, draw: F) -> Result<(), PlotError>
where
    F: FnOnce(&Path) -> Result<(), PlotError>,
{
    let io_error = |source| PlotError::Io {
        path: output.to_path_buf(),
        source,
    };

    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let suffix = output
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    let staged = tempfile::Builder::new()
        .prefix(".staged-")
        .suffix(&suffix)
        .tempfile_in(dir)
        .map_err(io_error)?;

    draw(staged.path())?;

    // Temp files are created owner-only; charts are ordinary shared output.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(staged.path(), std::fs::Permissions::from_mode(OUTPUT_MODE))
            .map_err(io_error)?;
    }

    staged.persist(output).map_err(|e| io_error(e.error))?;
    Ok(())
}

fn render_error<E: Display>(output: &Path) -> impl Fn(E) -> PlotError + '_ {
    move |err| PlotError::Render {
        path: output.to_path_buf(),
        message: err.to_string(),
    }
}

fn draw_png(prepared: &PreparedChart, staged: &Path, output: &Path) -> Result<(), PlotError> {
    let options = &prepared.options;
    let root = BitMapBackend::new(staged, options.size).into_drawing_area();
    root.fill(&WHITE).map_err(render_error(output))?;

    let x_range = x_range(prepared);
    let (y_lo, y_hi) = y_bounds(prepared, options.y_scale);

    let mut builder = ChartBuilder::on(&root);
    builder
        .caption(&options.caption, ("sans-serif", TITLE_FONT_SIZE))
        .margin(20)
        .margin_bottom(DEFAULT_MARGIN_BOTTOM)
        .x_label_area_size(DEFAULT_X_LABEL_AREA_SIZE)
        .y_label_area_size(DEFAULT_Y_LABEL_AREA_SIZE);

    match options.y_scale {
        YScale::Linear => {
            let mut chart = builder
                .build_cartesian_2d(x_range, y_lo..y_hi)
                .map_err(render_error(output))?;
            draw_layers(&mut chart, prepared).map_err(render_error(output))?;
        }
        YScale::Logarithmic => {
            let mut chart = builder
                .build_cartesian_2d(x_range, (y_lo..y_hi).log_scale())
                .map_err(render_error(output))?;
            draw_layers(&mut chart, prepared).map_err(render_error(output))?;
        }
    }

    root.present().map_err(render_error(output))?;
    Ok(())
}

fn draw_layers<'a, DB, Y>(
    chart: &mut ChartContext<'a, DB, Cartesian2d<RangedCoordf64, Y>>,
    prepared: &PreparedChart,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>>
where
    DB: DrawingBackend + 'a,
    Y: Ranged<ValueType = f64> + ValueFormatter<f64>,
{
    let options = &prepared.options;
    chart
        .configure_mesh()
        .x_desc(options.x_label.as_str())
        .y_desc(options.y_label.as_str())
        .y_label_formatter(&|y| format_millis(*y))
        .label_style(("sans-serif", TICK_LABEL_FONT_SIZE))
        .axis_desc_style(("sans-serif", AXIS_LABEL_FONT_SIZE))
        .draw()?;

    let mut extremum_in_legend = false;

    for layer in &prepared.layers {
        let color = layer.style.color;
        let points = layer.scatter.iter().copied();
        let fill = color.mix(0.7).filled();

        let anno = match layer.style.marker {
            Marker::Circle => {
                chart.draw_series(points.map(|p| Circle::new(p, MARKER_SIZE, fill)))?
            }
            Marker::Triangle => chart
                .draw_series(points.map(|p| TriangleMarker::new(p, MARKER_SIZE + 1, fill)))?,
            Marker::Square => chart.draw_series(points.map(|p| {
                EmptyElement::at(p)
                    + Rectangle::new(
                        [(-MARKER_SIZE, -MARKER_SIZE), (MARKER_SIZE, MARKER_SIZE)],
                        fill,
                    )
            }))?,
            Marker::Cross => chart.draw_series(
                points.map(|p| Cross::new(p, MARKER_SIZE, color.stroke_width(LINE_WIDTH))),
            )?,
        };
        anno.label(layer.style.label.as_str()).legend(move |(x, y)| {
            PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3))
        });

        // A single x value has no trend to draw; the scatter already shows it.
        if !layer.curve.is_degenerate() {
            let coords = layer.curve.coords();
            let line_style = color.stroke_width(LINE_WIDTH);
            match layer.style.dash.pattern() {
                None => {
                    chart.draw_series(LineSeries::new(coords, line_style))?;
                }
                Some((dash, gap)) => {
                    chart.draw_series(DashedLineSeries::new(coords, dash, gap, line_style))?;
                }
            }
        }

        if let Some(best) = layer.extremum {
            let ring = chart.draw_series(std::iter::once(Circle::new(
                (best.x, best.y),
                EXTREMUM_RING_SIZE,
                BLACK.stroke_width(LINE_WIDTH),
            )))?;
            if !extremum_in_legend {
                ring.label("fastest sample").legend(|(x, y)| {
                    Circle::new((x + 10, y), 6, BLACK.stroke_width(LINE_WIDTH))
                });
                extremum_in_legend = true;
            }

            chart.draw_series(std::iter::once(Text::new(
                format!("{}={}", prepared.x_field.symbol(), best.x),
                (best.x, best.y),
                ("sans-serif", DATA_LABEL_FONT_SIZE)
                    .into_font()
                    .color(&BLACK)
                    .pos(Pos::new(HPos::Left, VPos::Top)),
            )))?;
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", LEGEND_FONT_SIZE))
        .draw()?;

    Ok(())
}

/// Format a millisecond value for axis ticks.
pub fn format_millis(ms: f64) -> String {
    if ms >= 1000.0 {
        format!("{:.1}s", ms / 1000.0)
    } else if ms >= 10.0 {
        format!("{:.0}ms", ms)
    } else if ms >= 1.0 {
        format!("{:.1}ms", ms)
    } else {
        format!("{:.2}ms", ms)
    }
}

/// Horizontal extent of every drawn point, padded so edge markers stay visible.
fn x_range(prepared: &PreparedChart) -> Range<f64> {
    let (lo, hi) = prepared
        .layers
        .iter()
        .flat_map(|l| {
            l.scatter
                .iter()
                .map(|p| p.0)
                .chain(l.curve.points.iter().map(|p| p.x))
        })
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
            (lo.min(x), hi.max(x))
        });

    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    let pad = ((hi - lo) * 0.05).max(0.5);
    (lo - pad)..(hi + pad)
}

/// Vertical bounds. A log axis starts at the smallest positive value.
fn y_bounds(prepared: &PreparedChart, scale: YScale) -> (f64, f64) {
    let values = prepared.layers.iter().flat_map(|l| {
        l.scatter
            .iter()
            .map(|p| p.1)
            .chain(l.curve.points.iter().map(|p| p.mean_y))
    });

    match scale {
        YScale::Linear => {
            let hi = values.fold(0.0_f64, f64::max);
            (0.0, (hi * 1.1).max(1.0))
        }
        YScale::Logarithmic => {
            let (lo, hi) = values
                .filter(|&v| v > 0.0 && v.is_finite())
                .fold((f64::INFINITY, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
            if !lo.is_finite() {
                return (0.1, 1.0);
            }
            let lo = lo * 0.8;
            let hi = (hi * 1.25).max(lo * 10.0);
            (lo, hi)
        }
    }
}
