use crate::error::PlotError;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Number of columns in a benchmark row: grid size, query radius, duration, workload size.
pub const COLUMN_COUNT: usize = 4;

/// Raw grid-size value the benchmark emits when no spatial index was used.
pub const BASELINE_SENTINEL: f64 = -1.0;

const SECONDS_TO_MILLIS: f64 = 1000.0;

/// Spatial-index configuration a sample was measured under.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndexConfig {
    /// No spatial index; every query scans all entities.
    Baseline,
    /// Spatial hashmap with cell size `h`.
    Grid(f64),
}

impl IndexConfig {
    pub fn from_raw(value: f64) -> Self {
        if value == BASELINE_SENTINEL {
            IndexConfig::Baseline
        } else {
            IndexConfig::Grid(value)
        }
    }

    pub fn raw(&self) -> f64 {
        match self {
            IndexConfig::Baseline => BASELINE_SENTINEL,
            IndexConfig::Grid(h) => *h,
        }
    }

    pub fn is_baseline(&self) -> bool {
        matches!(self, IndexConfig::Baseline)
    }
}

/// One benchmark measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub config: IndexConfig,
    pub query_radius: f64,
    pub duration_ms: f64,
    pub workload_size: f64,
}

/// Independent variables a view can group by or put on the x axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    GridSize,
    QueryRadius,
    WorkloadSize,
}

impl Field {
    pub fn all() -> &'static [Field] {
        &[Field::GridSize, Field::QueryRadius, Field::WorkloadSize]
    }

    pub fn value(&self, sample: &Sample) -> f64 {
        match self {
            Field::GridSize => sample.config.raw(),
            Field::QueryRadius => sample.query_radius,
            Field::WorkloadSize => sample.workload_size,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Field::GridSize => "Grid Size",
            Field::QueryRadius => "Query Radius",
            Field::WorkloadSize => "Points",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Field::GridSize => "h",
            Field::QueryRadius => "r",
            Field::WorkloadSize => "n",
        }
    }

    pub fn axis_label(&self) -> &'static str {
        match self {
            Field::GridSize => "Grid Size (h)",
            Field::QueryRadius => "Query Square Radius (r)",
            Field::WorkloadSize => "Number of Points (n)",
        }
    }
}

/// All samples of one benchmark run, durations already in milliseconds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub samples: Vec<Sample>,
}

impl Table {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    /// Load a comma-separated benchmark log. Lines starting with `#` are ignored.
    pub fn load(path: &Path) -> Result<Self, PlotError> {
        let file = File::open(path).map_err(|source| PlotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file).map_err(|err| match err {
            PlotError::Io { source, .. } => PlotError::Io {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, PlotError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader);

        let mut samples = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_error)?;
            let line = record.position().map(|p| p.line() as usize);
            samples.push(parse_row(&record, line)?);
        }

        log::debug!("Loaded {} samples", samples.len());
        Ok(Self { samples })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sub-table with all no-index rows removed.
    pub fn without_baseline(&self) -> Table {
        Table {
            samples: self
                .samples
                .iter()
                .filter(|s| !s.config.is_baseline())
                .copied()
                .collect(),
        }
    }
}

fn parse_row(record: &csv::StringRecord, line: Option<usize>) -> Result<Sample, PlotError> {
    if record.len() != COLUMN_COUNT {
        return Err(PlotError::malformed(
            line,
            format!("expected {} columns, found {}", COLUMN_COUNT, record.len()),
        ));
    }

    let mut values = [0.0_f64; COLUMN_COUNT];
    for (idx, cell) in record.iter().enumerate() {
        values[idx] = cell.parse::<f64>().map_err(|_| {
            PlotError::malformed(line, format!("column {} is not a number: {:?}", idx + 1, cell))
        })?;
    }

    let [grid_size, query_radius, duration_s, workload_size] = values;
    if !duration_s.is_finite() {
        return Err(PlotError::malformed(
            line,
            format!("duration must be a finite number, got {}", duration_s),
        ));
    }
    Ok(Sample {
        config: IndexConfig::from_raw(grid_size),
        query_radius,
        duration_ms: duration_s * SECONDS_TO_MILLIS,
        workload_size,
    })
}

fn csv_error(err: csv::Error) -> PlotError {
    let line = err.position().map(|p| p.line() as usize);
    match err.into_kind() {
        csv::ErrorKind::Io(source) => PlotError::Io {
            path: "<input>".into(),
            source,
        },
        other => PlotError::malformed(line, format!("{:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_benchmark_output() {
        let input = "4, 8, 0.016, 10000\n-1, 8, 0.25, 10000\n";
        let table = Table::from_reader(input.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.samples[0].config, IndexConfig::Grid(4.0));
        assert_eq!(table.samples[0].query_radius, 8.0);
        assert_eq!(table.samples[0].duration_ms, 16.0);
        assert_eq!(table.samples[0].workload_size, 10000.0);
        assert_eq!(table.samples[1].config, IndexConfig::Baseline);
    }

    #[test]
    fn test_duration_converted_to_millis() {
        let table = Table::from_reader("2,1,0.01,500".as_bytes()).unwrap();
        assert_eq!(table.samples[0].duration_ms, 10.0);
    }

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let input = "# grid,radius,duration,points\n\n4,8,0.5,100\n\n";
        let table = Table::from_reader(input.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_empty_input_is_empty_table() {
        let table = Table::from_reader("".as_bytes()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_wrong_column_count() {
        let err = Table::from_reader("4,8,0.5,100\n4,8,0.5\n".as_bytes()).unwrap_err();
        match err {
            PlotError::MalformedInput { line, reason } => {
                assert_eq!(line, Some(2));
                assert!(reason.contains("expected 4 columns, found 3"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_cell() {
        let err = Table::from_reader("4,eight,0.5,100\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            PlotError::MalformedInput { line: Some(1), .. }
        ));
    }

    #[test]
    fn test_non_finite_duration_rejected() {
        for cell in ["NaN", "-NaN", "inf", "-inf"] {
            let input = format!("4, 4, 0.01, 1000\n4, 2, {}, 1000\n", cell);
            match Table::from_reader(input.as_bytes()) {
                Err(PlotError::MalformedInput { line, reason }) => {
                    assert_eq!(line, Some(2), "{cell}");
                    assert!(reason.contains("finite"), "{cell}: {reason}");
                }
                other => panic!("{cell}: unexpected result {other:?}"),
            }
        }
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = Table::load(Path::new("/definitely/not/here.csv")).unwrap_err();
        match err {
            PlotError::Io { path, .. } => assert_eq!(path, Path::new("/definitely/not/here.csv")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "8, 4, 0.002, 1000").unwrap();
        writeln!(file, "16, 4, 0.003, 1000").unwrap();
        file.flush().unwrap();

        let table = Table::load(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.samples[1].duration_ms, 3.0);
    }

    #[test]
    fn test_without_baseline() {
        let input = "-1,1,0.1,10\n4,1,0.1,10\n-1,2,0.1,10\n";
        let table = Table::from_reader(input.as_bytes()).unwrap();
        let filtered = table.without_baseline();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.samples[0].config, IndexConfig::Grid(4.0));
    }

    #[test]
    fn test_index_config_raw_roundtrip() {
        assert_eq!(IndexConfig::from_raw(-1.0), IndexConfig::Baseline);
        assert_eq!(IndexConfig::Baseline.raw(), -1.0);
        assert_eq!(IndexConfig::from_raw(32.0).raw(), 32.0);
        assert!(!IndexConfig::from_raw(0.0).is_baseline());
    }
}
