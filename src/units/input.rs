//! Stdin sources for input-driven tests

use std::fs;
use std::path::{Path, PathBuf};

use crate::capture::StdinReplay;
use crate::error::GradeError;

/// Where a test's stdin lines come from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StdinSource {
    /// Lines given directly, each usually ending in `\n`
    Lines(Vec<String>),
    /// Lines loaded from a file when the test was built
    File { path: PathBuf, lines: Vec<String> },
}

impl StdinSource {
    pub fn lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StdinSource::Lines(lines.into_iter().map(Into::into).collect())
    }

    /// Load every line of `path`, keeping a trailing newline on each.
    ///
    /// Blank lines become a lone `\n`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GradeError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| GradeError::InputFile {
            path: path.to_path_buf(),
            source,
        })?;

        let lines = content.lines().map(|line| format!("{line}\n")).collect();
        Ok(StdinSource::File {
            path: path.to_path_buf(),
            lines,
        })
    }

    pub fn as_lines(&self) -> &[String] {
        match self {
            StdinSource::Lines(lines) | StdinSource::File { lines, .. } => lines,
        }
    }

    /// File name as written by the test author, for file-fed sources
    pub fn file_label(&self) -> Option<String> {
        match self {
            StdinSource::File { path, .. } => Some(path.display().to_string()),
            StdinSource::Lines(_) => None,
        }
    }

    /// Fresh replay buffer positioned at the first line
    pub fn replay(&self) -> StdinReplay {
        StdinReplay::new(self.as_lines().iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_literal_lines() {
        let source = StdinSource::lines(["3\n", "4\n"]);
        assert_eq!(source.as_lines(), ["3\n", "4\n"]);
        assert!(source.file_label().is_none());
        assert_eq!(source.replay().len(), 2);
    }

    #[test]
    fn test_file_lines_keep_newlines() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "alpha\n\nbeta").unwrap();

        let source = StdinSource::from_file(file.path()).unwrap();
        assert_eq!(source.as_lines(), ["alpha\n", "\n", "beta\n"]);
        assert_eq!(source.file_label(), Some(file.path().display().to_string()));
    }

    #[test]
    fn test_missing_file() {
        let err = StdinSource::from_file("/nonexistent/diffgrade/input.txt").unwrap_err();
        assert!(matches!(err, GradeError::InputFile { .. }));
        assert!(err.to_string().contains("/nonexistent/diffgrade/input.txt"));
    }
}
