pub mod extractor;
pub mod export;
pub mod pipeline;

pub use export::{sort_by_severity, CsvExporter, ReportFiles};
pub use extractor::{extract_record, extract_records};
pub use pipeline::{IssueFetch, ReportPipeline, ReportRun, RunSummary};
