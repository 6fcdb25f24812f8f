//! The persisted pid record.
//!
//! The record is a single file containing the decimal pid and a newline.
//! Its presence is advisory: callers always confirm liveness before
//! trusting it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::pid::Pid;

/// Result of reading the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordState {
    /// No record file.
    Missing,
    /// A well-formed record.
    Present(Pid),
    /// The file exists but could not be read or parsed.
    Corrupt(String),
}

/// Pid record stored at a fixed path.
#[derive(Debug, Clone)]
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read the record.
    pub fn read(&self) -> RecordState {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return RecordState::Missing,
            Err(e) => return RecordState::Corrupt(e.to_string()),
        };

        match content.parse::<Pid>() {
            Ok(pid) => RecordState::Present(pid),
            Err(e) => RecordState::Corrupt(e.to_string()),
        }
    }

    /// Write the record, replacing any previous one.
    ///
    /// Creates parent directories if they don't exist. The content goes to
    /// a sibling temp file first and is renamed over the record.
    pub fn write(&self, pid: Pid) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.tmp_path();
        fs::write(&tmp, format!("{pid}\n"))?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }

        debug!(pid = %pid, path = %self.path.display(), "Wrote pid record");
        Ok(())
    }

    /// Remove the record.
    ///
    /// A missing file is success. Any other failure is logged and
    /// swallowed: the next operation will find the record again and
    /// reconcile it.
    pub fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Cleared pid record"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove pid record"
            ),
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(format!(".{}.tmp", std::process::id()));
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_read_missing_record() {
        let temp = tempdir().unwrap();
        let record = PidFile::new(temp.path().join("lock.pid"));
        assert_eq!(record.read(), RecordState::Missing);
        assert!(!record.exists());
    }

    #[test]
    fn test_write_then_read() {
        let temp = tempdir().unwrap();
        let record = PidFile::new(temp.path().join("lock.pid"));
        let pid = Pid::new(4321).unwrap();

        record.write(pid).unwrap();

        assert_eq!(record.read(), RecordState::Present(pid));
        let raw = fs::read_to_string(record.path()).unwrap();
        assert_eq!(raw, "4321\n");
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp = tempdir().unwrap();
        let record = PidFile::new(temp.path().join("a/b/lock.pid"));
        record.write(Pid::new(7).unwrap()).unwrap();
        assert!(record.exists());
    }

    #[test]
    fn test_write_overwrites_and_leaves_no_temp_files() {
        let temp = tempdir().unwrap();
        let record = PidFile::new(temp.path().join("lock.pid"));
        record.write(Pid::new(1).unwrap()).unwrap();
        record.write(Pid::new(2).unwrap()).unwrap();

        assert_eq!(record.read(), RecordState::Present(Pid::new(2).unwrap()));
        let entries = fs::read_dir(temp.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_read_corrupt_record() {
        let temp = tempdir().unwrap();
        let record = PidFile::new(temp.path().join("lock.pid"));
        fs::write(record.path(), "not a pid").unwrap();
        assert!(matches!(record.read(), RecordState::Corrupt(_)));

        fs::write(record.path(), "0\n").unwrap();
        assert!(matches!(record.read(), RecordState::Corrupt(_)));
    }

    #[test]
    fn test_unreadable_record_is_corrupt() {
        let temp = tempdir().unwrap();
        // A directory at the record path cannot be read as a file
        let record = PidFile::new(temp.path().join("lock.pid"));
        fs::create_dir(record.path()).unwrap();
        assert!(matches!(record.read(), RecordState::Corrupt(_)));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let temp = tempdir().unwrap();
        let record = PidFile::new(temp.path().join("lock.pid"));
        record.write(Pid::new(99).unwrap()).unwrap();

        record.clear();
        assert!(!record.exists());
        record.clear();
        assert_eq!(record.read(), RecordState::Missing);
    }
}
