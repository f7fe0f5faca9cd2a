use crate::sanitize::clean_patch;
use crate::source::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTransform {
    Verbatim,
    CleanPatch,
}

/// One output column: which source field feeds it and under what header.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub header: &'static str,
    pub field: &'static str,
    pub transform: FieldTransform,
}

const fn col(header: &'static str, field: &'static str) -> Column {
    Column {
        header,
        field,
        transform: FieldTransform::Verbatim,
    }
}

/// A source table and the fixed projection it is exported through.
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    pub table: &'static str,
    pub output_file: &'static str,
    pub columns: &'static [Column],
}

impl TableSpec {
    pub fn headers(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.header).collect()
    }

    pub fn project(&self, record: &Record) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| {
                let value = record.field(c.field);
                match c.transform {
                    FieldTransform::Verbatim => value,
                    FieldTransform::CleanPatch => clean_patch(&value),
                }
            })
            .collect()
    }
}

pub const PULL_REQUESTS: TableSpec = TableSpec {
    table: "all_pull_request",
    output_file: "task1_all_pull_request.csv",
    columns: &[
        col("TITLE", "title"),
        col("ID", "id"),
        col("AGENTNAME", "agent"),
        col("BODYSTRING", "body"),
        col("REPOID", "repo_id"),
        col("REPOURL", "repo_url"),
    ],
};

pub const REPOSITORIES: TableSpec = TableSpec {
    table: "all_repository",
    output_file: "task2_all_repository.csv",
    columns: &[
        col("REPOID", "id"),
        col("LANG", "language"),
        col("STARS", "stars"),
        col("REPOURL", "url"),
    ],
};

pub const TASK_TYPES: TableSpec = TableSpec {
    table: "pr_task_type",
    output_file: "task3_pr_task_type.csv",
    columns: &[
        col("PRID", "id"),
        col("PRTITLE", "title"),
        col("PRREASON", "reason"),
        col("PRTYPE", "type"),
        col("CONFIDENCE", "confidence"),
    ],
};

pub const COMMIT_DETAILS: TableSpec = TableSpec {
    table: "pr_commit_details",
    output_file: "task4_pr_commit_details.csv",
    columns: &[
        col("PRID", "pr_id"),
        col("PRSHA", "sha"),
        col("PRCOMMITMESSAGE", "message"),
        col("PRFILE", "filename"),
        col("PRSTATUS", "status"),
        col("PRADDS", "additions"),
        col("PRDELSS", "deletions"),
        col("PRCHANGECOUNT", "changes"),
        Column {
            header: "PRDIFF",
            field: "patch",
            transform: FieldTransform::CleanPatch,
        },
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_headers() {
        assert_eq!(
            PULL_REQUESTS.headers(),
            vec!["TITLE", "ID", "AGENTNAME", "BODYSTRING", "REPOID", "REPOURL"]
        );
        assert_eq!(REPOSITORIES.headers(), vec!["REPOID", "LANG", "STARS", "REPOURL"]);
        assert_eq!(
            TASK_TYPES.headers(),
            vec!["PRID", "PRTITLE", "PRREASON", "PRTYPE", "CONFIDENCE"]
        );
        assert_eq!(
            COMMIT_DETAILS.headers(),
            vec![
                "PRID",
                "PRSHA",
                "PRCOMMITMESSAGE",
                "PRFILE",
                "PRSTATUS",
                "PRADDS",
                "PRDELSS",
                "PRCHANGECOUNT",
                "PRDIFF"
            ]
        );
    }

    #[test]
    fn test_project_fills_missing_fields() {
        let record = Record::new().with("id", 2).with("title", "No body here");
        assert_eq!(
            PULL_REQUESTS.project(&record),
            vec!["No body here", "2", "", "", "", ""]
        );
    }

    #[test]
    fn test_only_patch_is_cleaned() {
        let record = Record::new()
            .with("pr_id", 9)
            .with("message", "keep\r\nnewlines")
            .with("patch", "@@ -1 +1 @@\r\n-a\0\r\n+b");
        let row = COMMIT_DETAILS.project(&record);
        assert_eq!(row[0], "9");
        assert_eq!(row[2], "keep\r\nnewlines");
        assert_eq!(row[8], "@@ -1 +1 @@ -a +b");
    }
}
