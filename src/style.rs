use crate::error::PlotError;
use crate::group::{Series, BASELINE_LABEL};
use plotters::style::RGBColor;
use rand::distributions::{Distribution, Uniform};
use rand::Rng;

/// Categorical palette, matches the usual ten-color cycle.
const CATEGORY_COLORS: &[RGBColor] = &[
    RGBColor(31, 119, 180),  // Blue
    RGBColor(255, 127, 14),  // Orange
    RGBColor(44, 160, 44),   // Green
    RGBColor(214, 39, 40),   // Red
    RGBColor(148, 103, 189), // Purple
    RGBColor(140, 86, 75),   // Brown
    RGBColor(227, 119, 194), // Pink
    RGBColor(127, 127, 127), // Gray
    RGBColor(188, 189, 34),  // Olive
    RGBColor(23, 190, 207),  // Cyan
];

pub const BASELINE_COLOR: RGBColor = RGBColor(0, 0, 0);
pub const BASELINE_MARKER: Marker = Marker::Cross;
pub const BASELINE_DASH: LineDash = LineDash::Solid;

const MARKERS: &[Marker] = &[Marker::Circle, Marker::Triangle, Marker::Square];
const DASHES: &[LineDash] = &[LineDash::Dashed, LineDash::Dotted];

#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<RGBColor>,
}

impl Palette {
    /// Fails on an empty color list.
    pub fn new(colors: Vec<RGBColor>) -> Result<Self, PlotError> {
        if colors.is_empty() {
            return Err(PlotError::InvalidOption(
                "palette needs at least one color".into(),
            ));
        }
        Ok(Self { colors })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color for slot `index`, wrapping around past the end.
    pub fn pick(&self, index: usize) -> RGBColor {
        self.colors[index % self.colors.len()]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: CATEGORY_COLORS.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    Circle,
    Triangle,
    Square,
    Cross,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineDash {
    Solid,
    Dashed,
    Dotted,
}

impl LineDash {
    /// Dash and gap length in pixels, `None` for a solid line.
    pub fn pattern(&self) -> Option<(u32, u32)> {
        match self {
            LineDash::Solid => None,
            LineDash::Dashed => Some((12, 6)),
            LineDash::Dotted => Some((3, 5)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStyle {
    pub label: String,
    pub color: RGBColor,
    pub marker: Marker,
    pub dash: LineDash,
}

/// Styles for one chart's series, in the same order as the series.
///
/// Regular series are styled by their rank among the non-baseline series, so the same
/// sorted value list always produces the same colors. The baseline is styled apart.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleAssignment {
    styles: Vec<SeriesStyle>,
}

impl StyleAssignment {
    pub fn assign(series: &[Series], palette: &Palette) -> Self {
        let mut rank = 0;
        let styles = series
            .iter()
            .map(|s| {
                if s.is_baseline() {
                    return SeriesStyle {
                        label: BASELINE_LABEL.to_string(),
                        color: BASELINE_COLOR,
                        marker: BASELINE_MARKER,
                        dash: BASELINE_DASH,
                    };
                }
                let style = SeriesStyle {
                    label: s.label(),
                    color: palette.pick(rank),
                    marker: MARKERS[rank % MARKERS.len()],
                    dash: DASHES[rank % DASHES.len()],
                };
                rank += 1;
                style
            })
            .collect();
        Self { styles }
    }

    pub fn get(&self, index: usize) -> Option<&SeriesStyle> {
        self.styles.get(index)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeriesStyle> {
        self.styles.iter()
    }
}

/// `n` display offsets drawn uniformly from `[-half_width, half_width]`.
pub fn jitter_offsets<R: Rng + ?Sized>(
    rng: &mut R,
    n: usize,
    half_width: f64,
) -> Result<Vec<f64>, PlotError> {
    if !half_width.is_finite() || half_width < 0.0 {
        return Err(PlotError::InvalidOption(format!(
            "jitter half-width must be a finite value >= 0, got {}",
            half_width
        )));
    }
    let dist = Uniform::new_inclusive(-half_width, half_width);
    Ok((0..n).map(|_| dist.sample(rng)).collect())
}
