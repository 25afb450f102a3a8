//! CSV export of query results.
use crate::core::{Currency, QueryResult, Statistics};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Serialize)]
struct SummaryRow {
    currency: Currency,
    current: f64,
    mean_30d: f64,
    std_30d: f64,
    min_30d: f64,
    max_30d: f64,
    change_pct: f64,
}

impl From<&Statistics> for SummaryRow {
    fn from(stats: &Statistics) -> Self {
        SummaryRow {
            currency: stats.currency,
            current: stats.current,
            mean_30d: stats.mean,
            std_30d: stats.std,
            min_30d: stats.min,
            max_30d: stats.max,
            change_pct: stats.change_pct,
        }
    }
}

#[derive(Serialize)]
struct DetailRow {
    date: NaiveDate,
    rate: f64,
    /// Empty until a full rolling window is available.
    rolling_avg: Option<f64>,
}

/// Writes `result` as CSV and returns the number of data rows.
pub fn write_csv<W: Write>(result: &QueryResult, writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let rows = match result {
        QueryResult::Summary { statistics, .. } => {
            for stats in statistics {
                csv_writer
                    .serialize(SummaryRow::from(stats))
                    .context("Failed to write summary row")?;
            }
            statistics.len()
        }
        QueryResult::Detail { series, statistics } => {
            let observations = series.observations();
            let undefined = observations.len() - statistics.rolling_average.len();
            let rolling = std::iter::repeat_n(None, undefined)
                .chain(statistics.rolling_average.iter().map(|p| Some(p.value)));
            for (obs, rolling_avg) in observations.iter().zip(rolling) {
                csv_writer
                    .serialize(DetailRow {
                        date: obs.date,
                        rate: obs.rate,
                        rolling_avg,
                    })
                    .context("Failed to write detail row")?;
            }
            observations.len()
        }
    };
    csv_writer.flush().context("Failed to flush CSV")?;
    Ok(rows)
}

/// Saves results as CSV files inside one directory.
pub struct CsvExporter {
    dir: PathBuf,
}

impl CsvExporter {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// File name used when the user does not pick one.
    pub fn default_file_name(result: &QueryResult, window_days: u32) -> String {
        match result {
            QueryResult::Summary { statistics, .. } => {
                let codes: Vec<String> = statistics
                    .iter()
                    .map(|s| s.currency.code().to_lowercase())
                    .collect();
                format!("summary_{}_{window_days}days.csv", codes.join("_"))
            }
            QueryResult::Detail { series, .. } => format!(
                "breakdown_{}_{window_days}days.csv",
                series.currency().code().to_lowercase()
            ),
        }
    }

    /// Blank input selects `default`; a missing `.csv` extension is appended.
    pub fn resolve_file_name(input: &str, default: &str) -> String {
        let name = input.trim();
        if name.is_empty() {
            default.to_string()
        } else if name.ends_with(".csv") {
            name.to_string()
        } else {
            format!("{name}.csv")
        }
    }

    /// Writes `result` to `file_name` inside the export directory, creating
    /// the directory if needed. Returns the path written and the row count.
    pub fn save(&self, result: &QueryResult, file_name: &str) -> Result<(PathBuf, usize)> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create directory: {}", self.dir.display()))?;
        let path = self.dir.join(file_name);
        let rows = Self::save_to_path(result, &path)?;
        Ok((path, rows))
    }

    pub fn save_to_path(result: &QueryResult, path: &Path) -> Result<usize> {
        let file = fs::File::create(path)
            .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
        let rows = write_csv(result, file)
            .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
        debug!("Saved {} {} rows to {}", rows, result.kind(), path.display());
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::series::tests::date;
    use crate::core::stats;
    use crate::core::{Observation, Series};

    fn series(currency: Currency, rates: &[f64]) -> Series {
        let observations = rates
            .iter()
            .enumerate()
            .map(|(i, &rate)| Observation {
                date: date(2025, 3, 3 + i as u32),
                rate,
            })
            .collect();
        Series::new(currency, observations).unwrap()
    }

    fn detail() -> QueryResult {
        let series = series(Currency::Usd, &[41.0, 41.5, 42.0, 42.5]);
        let statistics = stats::compute(&series, 3).unwrap();
        QueryResult::Detail { series, statistics }
    }

    fn summary() -> QueryResult {
        let statistics = vec![
            stats::compute(&series(Currency::Usd, &[40.0, 42.0]), 7).unwrap(),
            stats::compute(&series(Currency::Eur, &[45.0, 45.0]), 7).unwrap(),
        ];
        QueryResult::Summary {
            as_of: date(2025, 3, 4),
            statistics,
        }
    }

    fn to_string(result: &QueryResult) -> String {
        let mut buf = Vec::new();
        write_csv(result, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_summary_csv_layout() {
        let csv = to_string(&summary());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "currency,current,mean_30d,std_30d,min_30d,max_30d,change_pct",
                "USD,42.0,41.0,1.0,40.0,42.0,0.05",
                "EUR,45.0,45.0,0.0,45.0,45.0,0.0",
            ]
        );
    }

    #[test]
    fn test_detail_csv_leaves_undefined_rolling_blank() {
        let csv = to_string(&detail());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "date,rate,rolling_avg",
                "2025-03-03,41.0,",
                "2025-03-04,41.5,",
                "2025-03-05,42.0,41.5",
                "2025-03-06,42.5,42.0",
            ]
        );
    }

    #[test]
    fn test_default_file_names() {
        assert_eq!(
            CsvExporter::default_file_name(&summary(), 30),
            "summary_usd_eur_30days.csv"
        );
        assert_eq!(
            CsvExporter::default_file_name(&detail(), 30),
            "breakdown_usd_30days.csv"
        );
    }

    #[test]
    fn test_resolve_file_name() {
        assert_eq!(CsvExporter::resolve_file_name("  ", "default.csv"), "default.csv");
        assert_eq!(CsvExporter::resolve_file_name("rates", "default.csv"), "rates.csv");
        assert_eq!(CsvExporter::resolve_file_name("rates.csv", "d.csv"), "rates.csv");
    }

    #[test]
    fn test_save_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = CsvExporter::new(dir.path().join("data"));

        let (path, rows) = exporter.save(&detail(), "usd.csv").unwrap();

        assert_eq!(rows, 4);
        assert_eq!(path, dir.path().join("data").join("usd.csv"));
        let written = fs::read_to_string(path).unwrap();
        assert!(written.starts_with("date,rate,rolling_avg\n"));
    }
}
