use std::collections::VecDeque;

use futures::stream::{self, StreamExt};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::source::client::HuggingFaceClient;
use crate::source::{Record, RecordStream};

/// One page of the datasets-server `/rows` response.
#[derive(Debug, Clone, Deserialize)]
pub struct RowsPage {
    #[serde(default)]
    pub rows: Vec<RowEntry>,
    #[serde(default)]
    pub num_rows_total: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RowEntry {
    pub row_idx: u64,
    pub row: Record,
    #[serde(default)]
    pub truncated_cells: Vec<String>,
}

impl RowsPage {
    pub fn parse(table: &str, body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| {
            Error::source_unavailable(table, format!("malformed rows page: {}", e))
        })
    }
}

/// Walks a table page by page. Holds at most one page of rows.
pub struct RowsPaginator {
    client: HuggingFaceClient,
    table: String,
    page_size: u32,
    offset: u64,
    total: Option<u64>,
    buffer: VecDeque<Record>,
    exhausted: bool,
}

impl RowsPaginator {
    pub fn new(client: HuggingFaceClient, table: &str) -> Self {
        let page_size = client.page_size();
        Self {
            client,
            table: table.to_string(),
            page_size,
            offset: 0,
            total: None,
            buffer: VecDeque::new(),
            exhausted: false,
        }
    }

    /// Fetch the first page so an unknown table fails before anything is written.
    pub async fn prime(mut self) -> Result<Self> {
        self.fetch_next_page().await?;
        Ok(self)
    }

    pub fn into_stream(self) -> RecordStream {
        stream::unfold(self, |mut pager| async move {
            loop {
                if let Some(record) = pager.buffer.pop_front() {
                    return Some((Ok(record), pager));
                }
                if pager.exhausted {
                    return None;
                }
                if let Err(e) = pager.fetch_next_page().await {
                    pager.exhausted = true;
                    return Some((Err(e), pager));
                }
            }
        })
        .boxed()
    }

    async fn fetch_next_page(&mut self) -> Result<()> {
        let page = self
            .client
            .fetch_rows(&self.table, self.offset, self.page_size)
            .await?;
        self.absorb(page);
        Ok(())
    }

    fn absorb(&mut self, page: RowsPage) {
        if page.num_rows_total.is_some() {
            self.total = page.num_rows_total;
        }

        let count = page.rows.len() as u64;
        for entry in page.rows {
            if !entry.truncated_cells.is_empty() {
                tracing::warn!(
                    "{} row {}: server truncated cells {:?}",
                    self.table,
                    entry.row_idx,
                    entry.truncated_cells
                );
            }
            self.buffer.push_back(entry.row);
        }

        self.offset += count;
        self.exhausted = count < self.page_size as u64
            || self.total.is_some_and(|total| self.offset >= total);

        tracing::debug!(
            "{}: fetched {} rows (offset {} of {:?})",
            self.table,
            count,
            self.offset,
            self.total
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn pager(page_size: u32) -> RowsPaginator {
        let config = Config {
            page_size,
            ..Config::default()
        };
        let client = HuggingFaceClient::new(&config).unwrap();
        RowsPaginator::new(client, "all_pull_request")
    }

    fn page(ids: &[u64], total: Option<u64>) -> RowsPage {
        RowsPage {
            rows: ids
                .iter()
                .map(|id| RowEntry {
                    row_idx: *id,
                    row: Record::new().with("id", *id),
                    truncated_cells: Vec::new(),
                })
                .collect(),
            num_rows_total: total,
        }
    }

    #[test]
    fn test_parse_rows_page() {
        let body = r#"{
            "features": [{"feature_idx": 0, "name": "id", "type": {"dtype": "int64"}}],
            "rows": [
                {"row_idx": 0, "row": {"id": 11, "title": "Add CI"}, "truncated_cells": []},
                {"row_idx": 1, "row": {"id": 12, "title": null}, "truncated_cells": ["body"]}
            ],
            "num_rows_total": 2,
            "num_rows_per_page": 100,
            "partial": false
        }"#;

        let page = RowsPage::parse("all_pull_request", body).unwrap();
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.num_rows_total, Some(2));
        assert_eq!(page.rows[0].row.field("title"), "Add CI");
        assert_eq!(page.rows[1].row.field("title"), "");
        assert_eq!(page.rows[1].truncated_cells, vec!["body"]);
    }

    #[test]
    fn test_parse_error_body_is_source_unavailable() {
        let err = RowsPage::parse("nope", "<html>502</html>").unwrap_err();
        assert!(matches!(err, Error::SourceUnavailable { .. }));
    }

    #[test]
    fn test_full_page_keeps_going() {
        let mut p = pager(2);
        p.absorb(page(&[0, 1], Some(5)));
        assert!(!p.exhausted);
        assert_eq!(p.offset, 2);
        assert_eq!(p.buffer.len(), 2);
    }

    #[test]
    fn test_short_page_ends_stream() {
        let mut p = pager(2);
        p.absorb(page(&[0, 1], None));
        p.absorb(page(&[2], None));
        assert!(p.exhausted);
        assert_eq!(p.offset, 3);
    }

    #[test]
    fn test_total_reached_ends_stream() {
        let mut p = pager(2);
        p.absorb(page(&[0, 1], Some(4)));
        p.absorb(page(&[2, 3], None));
        assert!(p.exhausted);
    }

    #[test]
    fn test_empty_page_ends_stream() {
        let mut p = pager(100);
        p.absorb(page(&[], Some(0)));
        assert!(p.exhausted);
        assert!(p.buffer.is_empty());
    }
}
