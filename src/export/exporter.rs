use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::StreamExt;
use indicatif::ProgressBar;

use crate::error::Result;
use crate::export::writer::AtomicCsvWriter;
use crate::models::TableSpec;
use crate::source::NamedTableSource;

#[derive(Debug, Clone)]
pub struct ExportReport {
    pub table: &'static str,
    pub path: PathBuf,
    pub rows: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

pub struct TableExporter {
    source: Arc<dyn NamedTableSource>,
    output_dir: PathBuf,
}

impl TableExporter {
    pub fn new(source: Arc<dyn NamedTableSource>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            output_dir: output_dir.into(),
        }
    }

    pub async fn export(&self, spec: &TableSpec) -> Result<ExportReport> {
        self.export_with_progress(spec, &ProgressBar::hidden()).await
    }

    /// Streams `spec.table` into its CSV, one record in flight at a time.
    ///
    /// The output only appears once every row is written; on error the
    /// previous file, if any, is left untouched.
    pub async fn export_with_progress(
        &self,
        spec: &TableSpec,
        progress: &ProgressBar,
    ) -> Result<ExportReport> {
        let started_at = Utc::now();
        let mut stream = self.source.open_table(spec.table).await?;

        let path = self.output_dir.join(spec.output_file);
        let mut writer = AtomicCsvWriter::create(&path, spec.headers())?;

        while let Some(record) = stream.next().await {
            let record = record?;
            writer.write_row(spec.project(&record))?;
            progress.inc(1);
        }

        let rows = writer.rows();
        let path = writer.finish()?;
        tracing::info!("{} finished -> {} ({} rows)", spec.table, path.display(), rows);

        Ok(ExportReport {
            table: spec.table,
            path,
            rows,
            started_at,
            finished_at: Utc::now(),
        })
    }
}
