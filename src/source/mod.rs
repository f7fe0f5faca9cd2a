pub mod client;
pub mod memory;
pub mod paginator;
pub mod rate_limiter;
pub mod record;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::Result;

pub use client::HuggingFaceClient;
pub use memory::InMemorySource;
pub use paginator::RowsPaginator;
pub use rate_limiter::RateLimiter;
pub use record::Record;

/// Forward-only stream of records from one table.
pub type RecordStream = BoxStream<'static, Result<Record>>;

/// A dataset that exposes named tables as record streams.
///
/// Each `open_table` call starts a fresh pass from the first row. A table that
/// does not exist, or a remote that cannot be reached, fails with
/// [`crate::Error::SourceUnavailable`].
#[async_trait]
pub trait NamedTableSource: Send + Sync {
    async fn open_table(&self, table: &str) -> Result<RecordStream>;
}
