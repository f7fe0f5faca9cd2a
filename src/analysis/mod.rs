pub mod pipeline;
pub mod summary;

pub use pipeline::{ExportPipeline, Task, TaskReport};
pub use summary::{load_task_types, SummaryStats, Summarizer};
