//! Atomic CSV output.
//!
//! Rows are written to a temp file next to the destination. `finish()`
//! renames it over the destination; dropping the writer first deletes it,
//! so a failed export never leaves a half-written file behind.

use std::io::BufWriter;
use std::path::{Path, PathBuf};

use csv::{Terminator, Writer, WriterBuilder};
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::{Error, Result};

pub struct AtomicCsvWriter {
    writer: Writer<BufWriter<NamedTempFile>>,
    final_path: PathBuf,
    rows: u64,
}

impl AtomicCsvWriter {
    /// Creates the temp file and writes the header row.
    pub fn create<H>(final_path: impl AsRef<Path>, headers: H) -> Result<Self>
    where
        H: IntoIterator,
        H::Item: AsRef<[u8]>,
    {
        let final_path = final_path.as_ref().to_path_buf();

        let parent_dir = match final_path.parent() {
            Some(p) if p.as_os_str().is_empty() => Path::new("."),
            Some(p) => p,
            None => {
                return Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("no parent directory for {}", final_path.display()),
                )))
            }
        };

        let temp_file = NamedTempFile::new_in(parent_dir)?;
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .terminator(Terminator::CRLF)
            .from_writer(BufWriter::new(temp_file));
        writer.write_record(headers)?;

        Ok(Self {
            writer,
            final_path,
            rows: 0,
        })
    }

    pub fn write_row<R>(&mut self, row: R) -> Result<()>
    where
        R: IntoIterator,
        R::Item: AsRef<[u8]>,
    {
        self.writer.write_record(row)?;
        self.rows += 1;
        Ok(())
    }

    pub fn serialize_row<S: Serialize>(&mut self, row: &S) -> Result<()> {
        self.writer.serialize(row)?;
        self.rows += 1;
        Ok(())
    }

    /// Data rows written so far, header excluded.
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Flushes and atomically replaces the destination.
    pub fn finish(self) -> Result<PathBuf> {
        let buf_writer = self
            .writer
            .into_inner()
            .map_err(|e| Error::Io(std::io::Error::other(e.error().to_string())))?;

        let named_temp = buf_writer.into_inner().map_err(|e| e.into_error())?;

        named_temp
            .persist(&self.final_path)
            .map_err(|e| Error::Io(e.error))?;

        Ok(self.final_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_successful_write() {
        let temp_dir = TempDir::new().unwrap();
        let final_path = temp_dir.path().join("out.csv");

        let mut writer = AtomicCsvWriter::create(&final_path, ["ID", "AGENT"]).unwrap();
        writer.write_row(["1", "Codex"]).unwrap();
        writer.write_row(["2", "Devin"]).unwrap();
        assert_eq!(writer.rows(), 2);

        let result_path = writer.finish().unwrap();
        assert_eq!(result_path, final_path);

        let content = fs::read_to_string(&final_path).unwrap();
        assert_eq!(content, "ID,AGENT\r\n1,Codex\r\n2,Devin\r\n");
    }

    #[test]
    fn test_drop_leaves_previous_output() {
        let temp_dir = TempDir::new().unwrap();
        let final_path = temp_dir.path().join("out.csv");
        fs::write(&final_path, "OLD").unwrap();

        {
            let mut writer = AtomicCsvWriter::create(&final_path, ["ID"]).unwrap();
            writer.write_row(["partial"]).unwrap();
        }

        assert_eq!(fs::read_to_string(&final_path).unwrap(), "OLD");
        let entries = fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(entries, 1, "temp file should be cleaned up");
    }

    #[test]
    fn test_header_only_file() {
        let temp_dir = TempDir::new().unwrap();
        let final_path = temp_dir.path().join("empty.csv");

        let writer = AtomicCsvWriter::create(&final_path, ["PRID", "PRTYPE"]).unwrap();
        writer.finish().unwrap();

        assert_eq!(fs::read_to_string(&final_path).unwrap(), "PRID,PRTYPE\r\n");
    }

    #[test]
    fn test_quoting_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let final_path = temp_dir.path().join("quoted.csv");

        let mut writer = AtomicCsvWriter::create(&final_path, ["TITLE", "BODY"]).unwrap();
        writer.write_row(["Fix, again", "line one\nline \"two\""]).unwrap();
        writer.finish().unwrap();

        let mut reader = csv::Reader::from_path(&final_path).unwrap();
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[0], "Fix, again");
        assert_eq!(&record[1], "line one\nline \"two\"");
    }
}
