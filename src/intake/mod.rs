//! Feedback file intake.
//!
//! Holds the two selected CSV files, one per teaching period, and decides
//! whether an analysis can be started.

use crate::models::Period;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Label shown for a slot that has no file yet.
pub const EMPTY_SLOT_LABEL: &str = "Click to upload a CSV file";

/// A feedback file read fully into memory.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    /// File name shown as the slot label.
    pub name: String,
    /// Where the file was read from.
    pub path: PathBuf,
    /// Raw file content.
    pub text: String,
}

impl SelectedFile {
    /// Creates a file from in-memory text.
    #[cfg(test)]
    pub fn from_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: PathBuf::from(&name),
            name,
            text: text.into(),
        }
    }

    /// Reads a file from disk. Content is not validated.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read feedback file: {}", path.display()))?;

        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if !is_csv {
            debug!("{} does not have a .csv extension", path.display());
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            path: path.to_path_buf(),
            text: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }

    /// Counts data records below the header row.
    ///
    /// Informational only: ragged rows are accepted, and `None` means the
    /// text could not be read as CSV at all.
    pub fn record_count(&self) -> Option<usize> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(true)
            .from_reader(self.text.as_bytes());

        let mut count = 0;
        for record in reader.records() {
            record.ok()?;
            count += 1;
        }
        Some(count)
    }
}

/// The two file slots for one analysis session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    period1: Option<SelectedFile>,
    period2: Option<SelectedFile>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `file` in the given slot, replacing any earlier selection.
    /// Returns the slot's new label.
    pub fn select(&mut self, period: Period, file: SelectedFile) -> &str {
        debug!("Selected {} for {}", file.name, period);
        let slot = self.slot_mut(period);
        *slot = Some(file);
        slot.as_ref().map(|f| f.name.as_str()).unwrap_or(EMPTY_SLOT_LABEL)
    }

    /// Returns the file selected for a period, if any.
    pub fn file(&self, period: Period) -> Option<&SelectedFile> {
        match period {
            Period::First => self.period1.as_ref(),
            Period::Second => self.period2.as_ref(),
        }
    }

    /// Label for a slot: the file name, or the placeholder when empty.
    pub fn label(&self, period: Period) -> &str {
        self.file(period)
            .map(|f| f.name.as_str())
            .unwrap_or(EMPTY_SLOT_LABEL)
    }

    /// True iff both slots hold a file.
    pub fn can_analyze(&self) -> bool {
        self.period1.is_some() && self.period2.is_some()
    }

    /// Both files, when both are present.
    pub fn files(&self) -> Option<(&SelectedFile, &SelectedFile)> {
        Some((self.period1.as_ref()?, self.period2.as_ref()?))
    }

    fn slot_mut(&mut self, period: Period) -> &mut Option<SelectedFile> {
        match period {
            Period::First => &mut self.period1,
            Period::Second => &mut self.period2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_can_analyze_requires_both_slots() {
        let mut session = Session::new();
        assert!(!session.can_analyze());

        session.select(Period::First, SelectedFile::from_text("a.csv", "x"));
        assert!(!session.can_analyze());

        session.select(Period::Second, SelectedFile::from_text("b.csv", "y"));
        assert!(session.can_analyze());
    }

    #[test]
    fn test_only_second_slot_is_not_ready() {
        let mut session = Session::new();
        session.select(Period::Second, SelectedFile::from_text("b.csv", "y"));
        assert!(!session.can_analyze());
        assert!(session.files().is_none());
    }

    #[test]
    fn test_reselect_overwrites_only_that_slot() {
        let mut session = Session::new();
        session.select(Period::First, SelectedFile::from_text("old.csv", "1"));
        session.select(Period::Second, SelectedFile::from_text("other.csv", "2"));

        let label = session.select(Period::First, SelectedFile::from_text("new.csv", "3"));
        assert_eq!(label, "new.csv");

        assert_eq!(session.label(Period::First), "new.csv");
        assert_eq!(session.file(Period::First).unwrap().text, "3");
        assert_eq!(session.label(Period::Second), "other.csv");
    }

    #[test]
    fn test_empty_slot_label() {
        let session = Session::new();
        assert_eq!(session.label(Period::First), EMPTY_SLOT_LABEL);
        assert_eq!(session.label(Period::Second), EMPTY_SLOT_LABEL);
    }

    #[test]
    fn test_load_reads_text_and_name() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("period1.csv");
        std::fs::write(&path, "comment\nGreat examples,5").unwrap();

        let file = SelectedFile::load(&path).unwrap();
        assert_eq!(file.name, "period1.csv");
        assert_eq!(file.text, "comment\nGreat examples,5");
    }

    #[test]
    fn test_load_accepts_any_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("feedback.txt");
        std::fs::write(&path, "not really csv").unwrap();

        assert!(SelectedFile::load(&path).is_ok());
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(SelectedFile::load(&temp_dir.path().join("missing.csv")).is_err());
    }

    #[test]
    fn test_record_count_is_flexible() {
        let text = "comment,score\nGreat,5\nToo long\nOk,3,extra\n";
        let file = SelectedFile::from_text("f.csv", text);
        assert_eq!(file.record_count(), Some(3));
    }

    #[test]
    fn test_fixture_files() {
        let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures");
        let mut session = Session::new();

        let files = [(Period::First, "period1.csv"), (Period::Second, "period2.csv")];
        for (period, name) in files {
            let file = SelectedFile::load(&fixtures.join(name)).unwrap();
            assert_eq!(file.record_count(), Some(6));
            session.select(period, file);
        }

        assert!(session.can_analyze());
        assert_eq!(session.label(Period::Second), "period2.csv");
    }
}
