use serde::{Deserialize, Serialize};

pub const SUMMARY_FILE: &str = "task5_summary.csv";

pub const SUMMARY_HEADERS: [&str; 5] = ["ID", "AGENT", "TYPE", "CONFIDENCE", "SECURITY"];

/// Classification carried over from the task-type export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTypeEntry {
    pub task_type: String,
    pub confidence: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "AGENT")]
    pub agent: String,
    #[serde(rename = "TYPE")]
    pub task_type: String,
    #[serde(rename = "CONFIDENCE")]
    pub confidence: String,
    #[serde(rename = "SECURITY")]
    pub security: u8,
}

impl SummaryRecord {
    pub fn is_flagged(&self) -> bool {
        self.security == 1
    }
}
