use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};

use crate::analysis::summary::{SummaryStats, Summarizer};
use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::export::TableExporter;
use crate::models::{TableSpec, COMMIT_DETAILS, PULL_REQUESTS, REPOSITORIES, SUMMARY_FILE, TASK_TYPES};
use crate::source::NamedTableSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    PullRequests,
    Repositories,
    TaskTypes,
    CommitDetails,
    Summary,
}

impl Task {
    /// Fixed run-all order.
    pub const ALL: [Task; 5] = [
        Task::PullRequests,
        Task::Repositories,
        Task::TaskTypes,
        Task::CommitDetails,
        Task::Summary,
    ];

    pub fn number(self) -> u8 {
        match self {
            Task::PullRequests => 1,
            Task::Repositories => 2,
            Task::TaskTypes => 3,
            Task::CommitDetails => 4,
            Task::Summary => 5,
        }
    }

    /// Projection for the four export tasks; `None` for the summary.
    pub fn table_spec(self) -> Option<&'static TableSpec> {
        match self {
            Task::PullRequests => Some(&PULL_REQUESTS),
            Task::Repositories => Some(&REPOSITORIES),
            Task::TaskTypes => Some(&TASK_TYPES),
            Task::CommitDetails => Some(&COMMIT_DETAILS),
            Task::Summary => None,
        }
    }

    pub fn output_file(self) -> &'static str {
        self.table_spec()
            .map(|spec| spec.output_file)
            .unwrap_or(SUMMARY_FILE)
    }

    /// Tasks whose output files must already exist before this one runs.
    pub fn prerequisites(self) -> &'static [Task] {
        match self {
            Task::Summary => &[Task::PullRequests, Task::TaskTypes],
            _ => &[],
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task{}", self.number())
    }
}

#[derive(Debug, Clone)]
pub struct TaskReport {
    pub task: Task,
    pub path: PathBuf,
    pub rows: u64,
    pub summary: Option<SummaryStats>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

pub struct ExportPipeline {
    exporter: TableExporter,
    config: PipelineConfig,
}

impl ExportPipeline {
    pub fn new(source: Arc<dyn NamedTableSource>, config: PipelineConfig) -> Self {
        Self {
            exporter: TableExporter::new(source, config.output_dir.clone()),
            config,
        }
    }

    /// Runs tasks 1 through 5 in order, stopping at the first failure.
    /// Outputs of tasks that already finished are kept.
    pub async fn run_all(&self) -> Result<Vec<TaskReport>> {
        let mut reports = Vec::with_capacity(Task::ALL.len());
        for task in Task::ALL {
            reports.push(self.run_task(task).await?);
        }
        tracing::info!("All tasks 1-5 done.");
        Ok(reports)
    }

    pub async fn run_task(&self, task: Task) -> Result<TaskReport> {
        self.check_prerequisites(task)?;
        std::fs::create_dir_all(&self.config.output_dir)?;

        let progress = self.progress_bar(task);
        let started_at = Utc::now();

        let result = match task.table_spec() {
            Some(spec) => self
                .exporter
                .export_with_progress(spec, &progress)
                .await
                .map(|report| (report.path, report.rows, None)),
            None => self.summarize().map(|(path, stats)| (path, stats.rows, Some(stats))),
        };

        match result {
            Ok((path, rows, summary)) => {
                progress.finish_with_message(format!("{} done", task));
                Ok(TaskReport {
                    task,
                    path,
                    rows,
                    summary,
                    started_at,
                    finished_at: Utc::now(),
                })
            }
            Err(e) => {
                progress.abandon_with_message(format!("{} failed", task));
                tracing::error!("{} failed: {}", task, e);
                Err(e)
            }
        }
    }

    pub fn output_path(&self, task: Task) -> PathBuf {
        self.config.output_dir.join(task.output_file())
    }

    fn check_prerequisites(&self, task: Task) -> Result<()> {
        for required in task.prerequisites() {
            let path = self.output_path(*required);
            if !path.is_file() {
                return Err(Error::MissingDependency(format!(
                    "{} needs {} output {}; run {} first",
                    task,
                    required,
                    path.display(),
                    required
                )));
            }
        }
        Ok(())
    }

    fn summarize(&self) -> Result<(PathBuf, SummaryStats)> {
        let summarizer = Summarizer::new(
            self.output_path(Task::PullRequests),
            self.output_path(Task::TaskTypes),
        );
        let output = self.output_path(Task::Summary);
        let stats = summarizer.run(&output)?;
        Ok((output, stats))
    }

    fn progress_bar(&self, task: Task) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {prefix} {pos} rows {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_prefix(task.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(120));
        pb
    }
}
