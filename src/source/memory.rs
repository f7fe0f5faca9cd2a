use std::collections::HashMap;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};

use crate::error::{Error, Result};
use crate::source::{NamedTableSource, Record, RecordStream};

/// Tables held in memory. Backs tests and offline runs.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    tables: HashMap<String, Vec<Record>>,
    fail_after: HashMap<String, usize>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: &str, records: Vec<Record>) -> Self {
        self.tables.insert(table.to_string(), records);
        self
    }

    /// Make `table` yield `rows` records and then a `SourceUnavailable` error.
    pub fn fail_after(mut self, table: &str, rows: usize) -> Self {
        self.fail_after.insert(table.to_string(), rows);
        self
    }
}

#[async_trait]
impl NamedTableSource for InMemorySource {
    async fn open_table(&self, table: &str) -> Result<RecordStream> {
        let records = self
            .tables
            .get(table)
            .cloned()
            .ok_or_else(|| Error::source_unavailable(table, "no such table"))?;

        match self.fail_after.get(table).copied() {
            None => Ok(stream::iter(records.into_iter().map(Ok)).boxed()),
            Some(limit) => {
                let table = table.to_string();
                let rows = records.into_iter().take(limit).map(Ok);
                let failure = stream::once(async move {
                    Err(Error::source_unavailable(&table, "connection reset mid-stream"))
                });
                Ok(stream::iter(rows).chain(failure).boxed())
            }
        }
    }
}
