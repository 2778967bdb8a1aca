pub mod config;
pub mod error;
pub mod models;
pub mod snyk;
pub mod report;

pub use config::{Config, ReportConfig};
pub use error::{Error, Result};
pub use snyk::{SnykApi, SnykClient};
pub use report::{CsvExporter, ReportPipeline};
