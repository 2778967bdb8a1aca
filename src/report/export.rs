use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::ReportRecord;

const FILE_PREFIX: &str = "snyk_fixable_issues";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFiles {
    pub unsorted: PathBuf,
    pub sorted: PathBuf,
}

pub struct CsvExporter {
    output_dir: PathBuf,
}

impl CsvExporter {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub fn file_names(&self, generated_at: &DateTime<Local>) -> ReportFiles {
        let timestamp = generated_at.format(TIMESTAMP_FORMAT);
        ReportFiles {
            unsorted: self
                .output_dir
                .join(format!("{}_{}.csv", FILE_PREFIX, timestamp)),
            sorted: self
                .output_dir
                .join(format!("{}_sorted_{}.csv", FILE_PREFIX, timestamp)),
        }
    }

    /// Writes the traversal-order and severity-sorted reports. Nothing is
    /// written when `records` is empty.
    pub fn export(
        &self,
        records: &[ReportRecord],
        generated_at: &DateTime<Local>,
    ) -> Result<Option<ReportFiles>> {
        if records.is_empty() {
            tracing::info!("No records to export, skipping CSV output");
            return Ok(None);
        }

        std::fs::create_dir_all(&self.output_dir)?;
        let files = self.file_names(generated_at);

        write_csv(&files.unsorted, records.iter())?;
        tracing::info!("Wrote {} rows to {}", records.len(), files.unsorted.display());

        let sorted = sort_by_severity(records);
        write_csv(&files.sorted, sorted.iter())?;
        tracing::info!("Wrote {} rows to {}", sorted.len(), files.sorted.display());

        Ok(Some(files))
    }
}

/// Severity rank descending, then score descending. The sort is stable so
/// ties keep traversal order.
pub fn sort_by_severity(records: &[ReportRecord]) -> Vec<ReportRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        b.severity_rank
            .cmp(&a.severity_rank)
            .then_with(|| b.score.cmp_for_sort(&a.score))
    });
    sorted
}

fn write_csv<'a, I>(path: &Path, records: I) -> Result<()>
where
    I: Iterator<Item = &'a ReportRecord>,
{
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
