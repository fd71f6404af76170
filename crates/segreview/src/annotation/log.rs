//! Append-only annotation log: the durable record of completed reviews.

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::case::RatingCounts;
use crate::error::{ReviewError, Result};

use super::record::AnnotationRecord;

/// Number of columns in a complete row.
const COLUMNS: usize = 5;

/// The `annotations.csv` file of a session root.
///
/// Rows are only ever appended; nothing here truncates or rewrites the file.
/// The log does not enforce uniqueness: callers must not append the same
/// image twice.
#[derive(Debug, Clone)]
pub struct AnnotationLog {
    root: PathBuf,
    path: PathBuf,
}

impl AnnotationLog {
    /// Log named `file_name` inside `root`. Nothing is touched on disk.
    pub fn new(root: impl Into<PathBuf>, file_name: &str) -> Self {
        let root = root.into();
        let path = root.join(file_name);
        Self { root, path }
    }

    /// Location of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Session root that relative paths are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check whether a previous session left a log behind.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Load every complete record, in file order.
    ///
    /// Returns an empty list when the log does not exist yet.
    pub fn load(&self) -> Result<Vec<AnnotationRecord>> {
        if !self.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path).map_err(|e| ReviewError::io(&self.path, e))?;
        read_records(file)
    }

    /// Append one record.
    ///
    /// Safe across restarts: the file is opened in append mode and a row left
    /// unterminated by a crash, including one cut inside a quoted field, is
    /// closed off first. The repair and the new row go out in a single write.
    pub fn append(&self, record: &AnnotationRecord) -> Result<()> {
        let mut buffer = repair_for_tail(&self.path)?.to_vec();

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer.serialize(record)?;
        let row = writer
            .into_inner()
            .map_err(|e| ReviewError::io(&self.path, e.into_error()))?;
        buffer.extend_from_slice(&row);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| ReviewError::io(&self.path, e))?;
        file.write_all(&buffer)
            .and_then(|_| file.flush())
            .map_err(|e| ReviewError::io(&self.path, e))?;

        Ok(())
    }

    /// Absolute image paths of every record, resolved against the root.
    pub fn already_reviewed_image_paths(&self, records: &[AnnotationRecord]) -> HashSet<PathBuf> {
        records
            .iter()
            .map(|record| record.image_path(&self.root))
            .collect()
    }

    /// Rating counts over the records.
    pub fn summarize(records: &[AnnotationRecord]) -> RatingCounts {
        RatingCounts::tally(records.iter().map(|record| record.rating))
    }
}

/// Parse headerless annotation rows from any reader.
///
/// Rows with the wrong number of columns or unknown labels are skipped with a
/// warning: they can only come from an interrupted write or a hand edit.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<AnnotationRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                tracing::warn!("Skipping unreadable annotation row {}: {}", index + 1, e);
                continue;
            }
        };

        if row.len() != COLUMNS {
            tracing::warn!(
                "Skipping incomplete annotation row {} ({} of {} columns)",
                index + 1,
                row.len(),
                COLUMNS
            );
            continue;
        }

        match row.deserialize::<AnnotationRecord>(None) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!("Skipping malformed annotation row {}: {}", index + 1, e);
            }
        }
    }

    Ok(records)
}

/// Bytes that terminate whatever row a crash left open at the end of the log.
///
/// csv escapes a literal quote as `""`, so an odd quote count means the file
/// ends inside a quoted field.
fn repair_for_tail(path: &Path) -> Result<&'static [u8]> {
    let contents = match fs::read(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(&b""[..]),
        Err(e) => return Err(ReviewError::io(path, e)),
    };

    let quotes = contents.iter().filter(|&&b| b == b'"').count();
    if quotes % 2 == 1 {
        tracing::warn!("Closing a quoted field left open in {}", path.display());
        Ok(&b"\"\n"[..])
    } else if contents.last().is_some_and(|&b| b != b'\n') {
        Ok(&b"\n"[..])
    } else {
        Ok(&b""[..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::{MaskStatus, Rating};
    use tempfile::TempDir;

    fn record(file: &str, rating: Rating) -> AnnotationRecord {
        AnnotationRecord {
            relative_image_path: file.to_string(),
            rating,
            comment: String::new(),
            relative_mask_path: String::new(),
            mask_status: MaskStatus::NoMaskFound,
        }
    }

    #[test]
    fn test_load_missing_log_is_empty() {
        let dir = TempDir::new().unwrap();
        let log = AnnotationLog::new(dir.path(), "annotations.csv");

        assert!(!log.exists());
        assert!(log.load().unwrap().is_empty());
    }

    #[test]
    fn test_append_writes_headerless_rows() {
        let dir = TempDir::new().unwrap();
        let log = AnnotationLog::new(dir.path(), "annotations.csv");

        let mut first = record("a.nii", Rating::AcceptableNoChanges);
        first.comment = "clean, tight boundary".to_string();
        log.append(&first).unwrap();
        log.append(&record("b.nii", Rating::BadImages)).unwrap();

        let contents = fs::read_to_string(log.path()).unwrap();
        assert_eq!(
            contents,
            "a.nii,Acceptable with no changes,\"clean, tight boundary\",,No mask\n\
             b.nii,Bad images,,,No mask\n"
        );

        let loaded = log.load().unwrap();
        assert_eq!(loaded, vec![first, record("b.nii", Rating::BadImages)]);
    }

    #[test]
    fn test_append_never_truncates() {
        let dir = TempDir::new().unwrap();
        let log = AnnotationLog::new(dir.path(), "annotations.csv");
        log.append(&record("a.nii", Rating::AcceptableNoChanges)).unwrap();

        // A second handle, as after a restart.
        let reopened = AnnotationLog::new(dir.path(), "annotations.csv");
        reopened.append(&record("b.nii", Rating::BadImages)).unwrap();

        assert_eq!(reopened.load().unwrap().len(), 2);
    }

    fn files(log: &AnnotationLog) -> Vec<String> {
        log.load()
            .unwrap()
            .into_iter()
            .map(|r| r.relative_image_path)
            .collect()
    }

    #[test]
    fn test_partial_trailing_row_is_skipped_and_closed_off() {
        let dir = TempDir::new().unwrap();
        let log = AnnotationLog::new(dir.path(), "annotations.csv");
        log.append(&record("a.nii", Rating::AcceptableNoChanges)).unwrap();

        // Simulate a crash mid-row.
        let mut file = OpenOptions::new().append(true).open(log.path()).unwrap();
        file.write_all(b"b.nii,Acceptable with").unwrap();
        drop(file);

        assert_eq!(log.load().unwrap().len(), 1);

        log.append(&record("c.nii", Rating::BadImages)).unwrap();
        assert_eq!(files(&log), vec!["a.nii", "c.nii"]);
    }

    #[test]
    fn test_crash_inside_quoted_comment_is_closed_off() {
        let dir = TempDir::new().unwrap();
        let log = AnnotationLog::new(dir.path(), "annotations.csv");
        let mut first = record("a.nii", Rating::AcceptableNoChanges);
        first.comment = "said \"fine\", moved on".to_string();
        log.append(&first).unwrap();

        // Crash after the opening quote of a comment.
        let mut file = OpenOptions::new().append(true).open(log.path()).unwrap();
        file.write_all(b"b.nii,Bad images,\"half a comment, cut").unwrap();
        drop(file);

        log.append(&record("c.nii", Rating::BadImages)).unwrap();
        log.append(&record("d.nii", Rating::BadImages)).unwrap();

        assert_eq!(files(&log), vec!["a.nii", "c.nii", "d.nii"]);
        assert_eq!(log.load().unwrap()[0].comment, "said \"fine\", moved on");
    }

    #[test]
    fn test_crash_after_newline_inside_quoted_comment() {
        let dir = TempDir::new().unwrap();
        let log = AnnotationLog::new(dir.path(), "annotations.csv");
        log.append(&record("a.nii", Rating::AcceptableNoChanges)).unwrap();

        let mut file = OpenOptions::new().append(true).open(log.path()).unwrap();
        file.write_all(b"b.nii,Bad images,\"first line\n").unwrap();
        drop(file);

        log.append(&record("c.nii", Rating::BadImages)).unwrap();

        assert_eq!(files(&log), vec!["a.nii", "c.nii"]);
    }

    #[test]
    fn test_unknown_labels_are_skipped() {
        let data = "a.nii,Great,,,No mask\nb.nii,Bad images,,,No mask\n";
        let records = read_records(data.as_bytes()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].relative_image_path, "b.nii");
    }

    #[test]
    fn test_already_reviewed_resolves_against_root() {
        let log = AnnotationLog::new("/data/review", "annotations.csv");
        let reviewed = log.already_reviewed_image_paths(&[
            record("a.nii", Rating::BadImages),
            record("sub/b.nii.gz", Rating::AcceptableNoChanges),
        ]);

        assert!(reviewed.contains(Path::new("/data/review/a.nii")));
        assert!(reviewed.contains(Path::new("/data/review/sub/b.nii.gz")));
        assert_eq!(reviewed.len(), 2);
    }

    #[test]
    fn test_summarize() {
        let counts = AnnotationLog::summarize(&[
            record("a.nii", Rating::AcceptableNoChanges),
            record("b.nii", Rating::AcceptableNoChanges),
            record("c.nii", Rating::UnacceptableNotVisible),
        ]);

        assert_eq!(counts.acceptable_no_changes, 2);
        assert_eq!(counts.unacceptable_not_visible, 1);
        assert_eq!(counts.total(), 3);
    }
}
