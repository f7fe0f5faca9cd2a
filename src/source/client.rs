use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::source::paginator::{RowsPage, RowsPaginator};
use crate::source::rate_limiter::{retry_after_secs, RateLimiter};
use crate::source::{NamedTableSource, RecordStream};

/// Reads dataset tables through the Hugging Face datasets-server `/rows` API.
///
/// Each dataset config is treated as one named table.
#[derive(Clone)]
pub struct HuggingFaceClient {
    client: Client,
    rate_limiter: Arc<RateLimiter>,
    base_url: String,
    dataset: String,
    split: String,
    page_size: u32,
}

impl HuggingFaceClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = &config.hf_token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("aidev-export/0.1"),
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            rate_limiter: Arc::new(RateLimiter::new(config.requests_per_minute)),
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            dataset: config.dataset.clone(),
            split: config.split.clone(),
            page_size: config.page_size,
        })
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub async fn fetch_rows(&self, table: &str, offset: u64, length: u32) -> Result<RowsPage> {
        self.rate_limiter.wait().await;
        let url = format!("{}/rows", self.base_url);
        tracing::debug!("Fetching {} rows {}..+{}", table, offset, length);

        let offset = offset.to_string();
        let length = length.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("dataset", self.dataset.as_str()),
                ("config", table),
                ("split", self.split.as_str()),
                ("offset", offset.as_str()),
                ("length", length.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::source_unavailable(table, format!("request failed: {}", e)))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let hint = retry_after_secs(&response)
                .map(|secs| format!(", retry after {}s", secs))
                .unwrap_or_default();
            return Err(Error::source_unavailable(
                table,
                format!("rate limited by datasets-server{}", hint),
            ));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::source_unavailable(
                table,
                format!("{} - {}", status, body.trim()),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::source_unavailable(table, format!("reading body: {}", e)))?;

        RowsPage::parse(table, &body)
    }
}

#[async_trait]
impl NamedTableSource for HuggingFaceClient {
    async fn open_table(&self, table: &str) -> Result<RecordStream> {
        tracing::info!("Streaming table: {} ({})", table, self.dataset);
        let pager = RowsPaginator::new(self.clone(), table).prime().await?;
        Ok(pager.into_stream())
    }
}
