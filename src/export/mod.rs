pub mod exporter;
pub mod writer;

pub use exporter::{ExportReport, TableExporter};
pub use writer::AtomicCsvWriter;
