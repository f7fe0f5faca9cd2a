use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use aidev_export::analysis::TaskReport;
use aidev_export::{Config, ExportPipeline, HuggingFaceClient, PipelineConfig, Task};

#[derive(Parser, Debug)]
#[command(name = "aidev-export")]
#[command(version = "0.1.0")]
#[command(about = "Export the AIDev dataset to CSV and build the security summary")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Directory the CSV files are written to
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Hugging Face dataset to read
    #[arg(long, global = true)]
    dataset: Option<String>,

    /// Dataset split to read
    #[arg(long, global = true)]
    split: Option<String>,

    /// Disable progress spinners
    #[arg(long, global = true)]
    no_progress: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run tasks 1-5 in order (default)
    All,
    /// Run a single task; `summary` needs the pull-request and task-type exports
    Task {
        #[arg(value_enum)]
        task: TaskArg,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TaskArg {
    PullRequests,
    Repositories,
    TaskTypes,
    CommitDetails,
    Summary,
}

impl From<TaskArg> for Task {
    fn from(arg: TaskArg) -> Self {
        match arg {
            TaskArg::PullRequests => Task::PullRequests,
            TaskArg::Repositories => Task::Repositories,
            TaskArg::TaskTypes => Task::TaskTypes,
            TaskArg::CommitDetails => Task::CommitDetails,
            TaskArg::Summary => Task::Summary,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("aidev_export=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(dataset) = &args.dataset {
        config.dataset = dataset.clone();
    }
    if let Some(split) = &args.split {
        config.split = split.clone();
    }
    config.validate()?;

    let source = HuggingFaceClient::new(&config)?;
    let mut pipeline_config = PipelineConfig::from(&config);
    pipeline_config.show_progress = !args.no_progress;

    let pipeline = ExportPipeline::new(Arc::new(source), pipeline_config);

    tracing::info!("Exporting dataset {} to {}", config.dataset, config.output_dir.display());
    let reports = match args.command.unwrap_or(Command::All) {
        Command::All => pipeline.run_all().await?,
        Command::Task { task } => vec![pipeline.run_task(task.into()).await?],
    };

    print!("{}", format_reports(&reports));
    Ok(())
}

fn format_reports(reports: &[TaskReport]) -> String {
    let mut output = String::new();

    for report in reports {
        let elapsed = report.finished_at - report.started_at;
        output.push_str(&format!(
            "{}: {} rows -> {} ({:.1}s)\n",
            report.task,
            report.rows,
            report.path.display(),
            elapsed.num_milliseconds() as f64 / 1000.0
        ));
        if let Some(stats) = &report.summary {
            output.push_str(&format!(
                "  typed: {}  security-flagged: {}\n",
                stats.matched, stats.flagged
            ));
        }
    }

    output
}
