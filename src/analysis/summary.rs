use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use csv::{Reader, StringRecord};

use crate::error::{Error, Result};
use crate::export::AtomicCsvWriter;
use crate::models::{SummaryRecord, TaskTypeEntry, SUMMARY_HEADERS};
use crate::taxonomy::is_security_related;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryStats {
    pub rows: u64,
    pub matched: u64,
    pub flagged: u64,
}

/// Joins the pull-request export with the task-type export and flags
/// security-related PRs.
pub struct Summarizer {
    pull_requests: PathBuf,
    task_types: PathBuf,
}

impl Summarizer {
    pub fn new(pull_requests: impl Into<PathBuf>, task_types: impl Into<PathBuf>) -> Self {
        Self {
            pull_requests: pull_requests.into(),
            task_types: task_types.into(),
        }
    }

    /// Writes one summary row per pull request to `output`.
    pub fn run(&self, output: &Path) -> Result<SummaryStats> {
        tracing::info!(
            "Loading {} into memory for joins...",
            self.task_types.display()
        );
        let types = load_task_types(&self.task_types)?;
        tracing::info!("Loaded {} task types", types.len());

        let mut reader = open_csv(&self.pull_requests)?;
        let headers = reader.headers()?.clone();
        let columns = PullRequestColumns::resolve(&headers, &self.pull_requests)?;

        let mut writer = AtomicCsvWriter::create(output, SUMMARY_HEADERS)?;
        let mut stats = SummaryStats::default();

        for row in reader.records() {
            let row = row?;
            let record = columns.summarize(&row, &types);

            stats.rows += 1;
            if types.contains_key(&record.id) {
                stats.matched += 1;
            }
            if record.is_flagged() {
                stats.flagged += 1;
            }
            writer.serialize_row(&record)?;
        }

        writer.finish()?;
        tracing::info!(
            "Summary finished -> {} ({} rows, {} typed, {} security)",
            output.display(),
            stats.rows,
            stats.matched,
            stats.flagged
        );
        Ok(stats)
    }
}

/// Reads the task-type export into a map keyed by PR id. Later rows for the
/// same id overwrite earlier ones.
pub fn load_task_types(path: &Path) -> Result<HashMap<String, TaskTypeEntry>> {
    let mut reader = open_csv(path)?;
    let headers = reader.headers()?.clone();

    let id_idx = require_column(&headers, "PRID", path)?;
    let type_idx = column_index(&headers, "PRTYPE");
    let confidence_idx = column_index(&headers, "CONFIDENCE");

    let mut types = HashMap::new();
    for row in reader.records() {
        let row = row?;
        let id = cell(&row, Some(id_idx)).to_string();
        types.insert(
            id,
            TaskTypeEntry {
                task_type: cell(&row, type_idx).to_string(),
                confidence: cell(&row, confidence_idx).to_string(),
            },
        );
    }
    Ok(types)
}

struct PullRequestColumns {
    id: usize,
    agent: usize,
    title: usize,
    body: usize,
}

impl PullRequestColumns {
    fn resolve(headers: &StringRecord, path: &Path) -> Result<Self> {
        Ok(Self {
            id: require_column(headers, "ID", path)?,
            agent: require_column(headers, "AGENTNAME", path)?,
            title: require_column(headers, "TITLE", path)?,
            body: require_column(headers, "BODYSTRING", path)?,
        })
    }

    fn summarize(
        &self,
        row: &StringRecord,
        types: &HashMap<String, TaskTypeEntry>,
    ) -> SummaryRecord {
        let id = cell(row, Some(self.id)).to_string();
        let (task_type, confidence) = match types.get(&id) {
            Some(entry) => (entry.task_type.clone(), entry.confidence.clone()),
            None => (String::new(), String::new()),
        };
        let security = is_security_related(cell(row, Some(self.title)), cell(row, Some(self.body)));

        SummaryRecord {
            id,
            agent: cell(row, Some(self.agent)).to_string(),
            task_type,
            confidence,
            security: u8::from(security),
        }
    }
}

fn open_csv(path: &Path) -> Result<Reader<BufReader<File>>> {
    let file = File::open(path).map_err(|e| {
        Error::MissingDependency(format!("cannot open {}: {}", path.display(), e))
    })?;
    Ok(Reader::from_reader(BufReader::new(file)))
}

fn column_index(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

fn require_column(headers: &StringRecord, name: &str, path: &Path) -> Result<usize> {
    column_index(headers, name).ok_or_else(|| {
        Error::MissingDependency(format!(
            "{} has no {} column",
            path.display(),
            name
        ))
    })
}

fn cell(row: &StringRecord, idx: Option<usize>) -> &str {
    idx.and_then(|i| row.get(i)).unwrap_or("")
}
