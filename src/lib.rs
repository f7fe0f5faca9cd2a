pub mod config;
pub mod error;
pub mod models;
pub mod source;
pub mod sanitize;
pub mod taxonomy;
pub mod export;
pub mod analysis;

pub use config::{Config, PipelineConfig};
pub use error::{Error, Result};
pub use source::{HuggingFaceClient, InMemorySource, NamedTableSource, Record};
pub use sanitize::clean_patch;
pub use taxonomy::is_security_related;
pub use export::TableExporter;
pub use analysis::{ExportPipeline, Task};
