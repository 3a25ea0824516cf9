//! The annotated reference script shown in the code panel.
//!
//! Content is decorative narrative material, not executed logic. The default
//! script ships embedded in the binary; a `script_path` in the config may
//! swap in an external file at startup.

use std::fs;

/// The builtin training script the narrative annotates.
pub const EMBEDDED_SCRIPT: &str = include_str!("../assets/predictor.py");

/// Immutable, ordered sequence of source lines, loaded once at startup.
#[derive(Debug, Clone)]
pub struct ReferenceText {
    lines: Vec<String>,
}

impl ReferenceText {
    pub fn from_source(source: &str) -> Self {
        Self {
            lines: source.lines().map(str::to_string).collect(),
        }
    }

    pub fn embedded() -> Self {
        Self::from_source(EMBEDDED_SCRIPT)
    }

    pub fn from_file(path: &str) -> Result<Self, String> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(Self::from_source(&contents)),
            Err(e) => Err(format!("Failed to read script file {}: {}", path, e)),
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// 1-indexed line access.
    pub fn line(&self, line_number: usize) -> Option<&str> {
        if line_number == 0 {
            return None;
        }
        self.lines.get(line_number - 1).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_script_covers_builtin_ranges() {
        let script = ReferenceText::embedded();
        // The last builtin step highlights up to line 159.
        assert!(script.line_count() >= 159, "got {}", script.line_count());
        assert_eq!(script.line(1), Some("import pandas as pd"));
    }

    #[test]
    fn line_access_is_one_indexed() {
        let script = ReferenceText::from_source("first\nsecond");
        assert_eq!(script.line(0), None);
        assert_eq!(script.line(1), Some("first"));
        assert_eq!(script.line(2), Some("second"));
        assert_eq!(script.line(3), None);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ReferenceText::from_file("/nonexistent/script.py").unwrap_err();
        assert!(err.contains("/nonexistent/script.py"));
    }
}
