use index_bench_plot::chart::stage_output;
use index_bench_plot::pipeline::PreparedChart;
use index_bench_plot::style::Palette;
use index_bench_plot::{prepare, run_views, BatchReport, ChartRenderer, PlotError, Table, View};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Writes a one-line text file per chart instead of an image.
#[derive(Default)]
struct RecordingRenderer {
    rendered: Vec<(String, PathBuf)>,
}

impl ChartRenderer for RecordingRenderer {
    fn render(&mut self, chart: &PreparedChart, output: &Path) -> Result<(), PlotError> {
        stage_output(output, |staged| {
            std::fs::write(staged, format!("{} series", chart.layers.len())).map_err(
                |source| PlotError::Io {
                    path: staged.to_path_buf(),
                    source,
                },
            )
        })?;
        self.rendered
            .push((chart.view_name.clone(), output.to_path_buf()));
        Ok(())
    }
}

type BatchOutcome = (Result<BatchReport, PlotError>, RecordingRenderer);

fn run(input: &str, dir: &Path) -> BatchOutcome {
    let table = Table::from_reader(input.as_bytes()).unwrap();
    let mut renderer = RecordingRenderer::default();
    let mut rng = StdRng::seed_from_u64(42);
    let report = run_views(
        &table,
        &View::standard(),
        &Palette::default(),
        &mut renderer,
        dir,
        &mut rng,
    );
    (report, renderer)
}

const FULL_RUN: &str = "\
-1, 4, 0.180, 1000
-1, 8, 0.190, 1000
8, 4, 0.006, 1000
8, 8, 0.011, 1000
32, 4, 0.009, 1000
32, 8, 0.010, 1000
8, 4, 0.030, 4000
32, 4, 0.021, 4000
";

#[test]
fn test_all_views_written() {
    let dir = TempDir::new().unwrap();
    let (report, renderer) = run(FULL_RUN, dir.path());
    let report = report.unwrap();

    assert!(report.is_complete());
    assert_eq!(report.written.len(), 3);
    for file in ["by_query_radius.png", "by_grid_size.png", "by_workload_minima.png"] {
        assert!(dir.path().join(file).exists(), "{file} missing");
    }

    let names: Vec<&str> = renderer.rendered.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["by_query_radius", "by_grid_size", "by_workload_minima"]);

    // Baseline plus two grid sizes.
    let contents = std::fs::read_to_string(dir.path().join("by_query_radius.png")).unwrap();
    assert_eq!(contents, "3 series");
}

#[test]
fn test_empty_view_is_skipped_and_others_complete() {
    let dir = TempDir::new().unwrap();
    let (report, _) = run("-1, 4, 0.180, 1000\n-1, 8, 0.190, 1000\n", dir.path());
    let report = report.unwrap();

    assert!(!report.is_complete());
    assert_eq!(report.written, vec![dir.path().join("by_query_radius.png")]);

    let skipped: Vec<&str> = report.skipped.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(skipped, vec!["by_grid_size", "by_workload_minima"]);
    assert!(report
        .skipped
        .iter()
        .all(|(_, e)| matches!(e, PlotError::EmptySeries { .. })));

    assert!(!dir.path().join("by_grid_size.png").exists());
}

#[test]
fn test_malformed_value_aborts_batch() {
    let dir = TempDir::new().unwrap();
    let (report, renderer) = run("NaN, 4, 0.1, 1000\n", dir.path());

    assert!(matches!(report, Err(PlotError::MalformedInput { .. })));
    assert!(renderer.rendered.is_empty());
}

#[test]
fn test_existing_output_is_replaced() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("by_grid_size.png");
    std::fs::write(&target, "stale").unwrap();

    let (report, _) = run(FULL_RUN, dir.path());
    report.unwrap();

    assert_eq!(std::fs::read_to_string(&target).unwrap(), "2 series");
    // No staged files left behind.
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 3);
}

#[test]
fn test_output_dir_created() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("charts/latest");
    let (report, _) = run(FULL_RUN, &nested);

    assert_eq!(report.unwrap().written.len(), 3);
    assert!(nested.join("by_workload_minima.png").exists());
}

#[test]
fn test_same_seed_same_charts() {
    let table = Table::from_reader(FULL_RUN.as_bytes()).unwrap();
    let view = View::by_query_radius();

    let palette = Palette::default();
    let a = prepare(&table, &view, &palette, &mut StdRng::seed_from_u64(9)).unwrap();
    let b = prepare(&table, &view, &palette, &mut StdRng::seed_from_u64(9)).unwrap();

    for (la, lb) in a.layers.iter().zip(&b.layers) {
        assert_eq!(la.scatter, lb.scatter);
        assert_eq!(la.style, lb.style);
    }
}

#[test]
fn test_load_error_names_path_once() {
    let path = Path::new("/no/such/dir/bench.csv");
    let err = anyhow::Error::from(Table::load(path).unwrap_err())
        .context("Failed to load benchmark log");

    let message = format!("{:#}", err);
    assert!(message.starts_with("Failed to load benchmark log: "), "{message}");
    assert_eq!(message.matches("/no/such/dir/bench.csv").count(), 1, "{message}");
}
