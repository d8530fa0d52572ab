use crate::chart::format_millis;
use crate::pipeline::PreparedChart;
use std::fmt;

/// Console table of per-series means for one chart.
pub struct Summary<'a>(pub &'a PreparedChart);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chart = self.0;
        let symbol = chart.x_field.symbol();

        writeln!(f, "\n{:=<80}", "")?;
        writeln!(f, "{} ({})", chart.options.caption, chart.view_name)?;
        writeln!(f, "{:=<80}", "")?;
        writeln!(
            f,
            "  {:<28} {:>8} {:>14} {:>14}",
            "Series", "Samples", "Best mean", "Fastest run"
        )?;
        writeln!(f, "  {:-<66}", "")?;

        for layer in &chart.layers {
            let best_mean = layer
                .curve
                .min_mean()
                .map(|p| format!("{} @ {}={}", format_millis(p.mean_y), symbol, p.x))
                .unwrap_or_default();
            let fastest = layer
                .extremum
                .map(|p| format!("{} @ {}={}", format_millis(p.y), symbol, p.x))
                .unwrap_or_else(|| "-".to_string());

            writeln!(
                f,
                "  {:<28} {:>8} {:>14} {:>14}",
                layer.style.label,
                layer.series.len(),
                best_mean,
                fastest
            )?;
            for point in &layer.curve.points {
                writeln!(
                    f,
                    "      {}={:<10} {:>12}",
                    symbol,
                    point.x,
                    format_millis(point.mean_y)
                )?;
            }
        }
        Ok(())
    }
}

pub fn format_summary(chart: &PreparedChart) -> String {
    Summary(chart).to_string()
}

pub fn print_summary(chart: &PreparedChart) {
    print!("{}", Summary(chart));
}
