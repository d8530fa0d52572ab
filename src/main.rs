use anyhow::{Context, Result};
use clap::Parser;
use index_bench_plot::style::Palette;
use index_bench_plot::{run_views, PngRenderer, Table, View};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "index-bench-plot")]
#[command(about = "Plot spatial-index benchmark results")]
struct Cli {
    /// Benchmark log: grid size, query radius, frame time [s], points per line
    input: PathBuf,

    /// Directory the charts are written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Jitter half-width for scatter points on the query-radius chart
    #[arg(short, long)]
    jitter: Option<f64>,

    /// Random seed for jitter
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Enable debug logging
    #[arg(short, long, default_value = "false")]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let table = Table::load(&cli.input).context("Failed to load benchmark log")?;
    log::info!("Loaded {} samples from {}", table.len(), cli.input.display());

    let mut views = View::standard();
    if let Some(jitter) = cli.jitter {
        View::override_query_jitter(&mut views, jitter);
    }

    let mut rng = StdRng::seed_from_u64(cli.seed);
    let mut renderer = PngRenderer;
    let report = run_views(
        &table,
        &views,
        &Palette::default(),
        &mut renderer,
        &cli.output_dir,
        &mut rng,
    )?;

    if !report.is_complete() {
        anyhow::bail!(
            "{} of {} charts could not be drawn",
            report.skipped.len(),
            views.len()
        );
    }

    log::info!("Wrote {} charts", report.written.len());
    Ok(())
}
