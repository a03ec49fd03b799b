// Free-text log scanning: the fast, lower-confidence failure channel.

use regex::RegexSet;

use super::model::Severity;

/// Tag carried by this crate's own log lines. The scanner skips tagged lines
/// so a logged builder error message can never re-trigger the log channel.
pub const SELF_LOG_TAG: &str = "[UploadWatcher]";

/// Signatures matched when no custom set is configured.
pub const DEFAULT_FAILURE_SIGNATURES: &[&str] = &[
    "Failed to build",
    "build was aborted",
    "Failed to assign network IDs",
];

/// Matches error log lines against the configured failure signatures.
pub struct LogScanner {
    signatures: RegexSet,
}

impl LogScanner {
    /// Build a scanner from signature substrings. Signatures are matched
    /// literally; they are escaped before compilation.
    pub fn new<I, S>(signatures: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns: Vec<String> = signatures
            .into_iter()
            .map(|s| regex::escape(s.as_ref()))
            .collect();
        let signatures = RegexSet::new(&patterns).expect("Invalid signature set");
        Self { signatures }
    }

    /// True if this line is evidence of a build failure.
    pub fn matches(&self, text: &str, severity: Severity) -> bool {
        if severity != Severity::Error {
            return false;
        }
        if text.contains(SELF_LOG_TAG) {
            return false;
        }
        self.signatures.is_match(text)
    }
}

impl Default for LogScanner {
    fn default() -> Self {
        Self::new(DEFAULT_FAILURE_SIGNATURES.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_default_signatures_on_error_lines() {
        let scanner = LogScanner::default();

        assert!(scanner.matches("Failed to build MyWorld", Severity::Error));
        assert!(scanner.matches("the build was aborted by the user", Severity::Error));
        assert!(scanner.matches("Failed to assign network IDs to scene", Severity::Error));
    }

    #[test]
    fn ignores_non_error_severities() {
        let scanner = LogScanner::default();

        assert!(!scanner.matches("Failed to build MyWorld", Severity::Warning));
        assert!(!scanner.matches("Failed to build MyWorld", Severity::Info));
    }

    #[test]
    fn ignores_unrelated_error_lines() {
        let scanner = LogScanner::default();

        assert!(!scanner.matches("NullReferenceException in OnGUI", Severity::Error));
    }

    #[test]
    fn ignores_own_log_lines() {
        let scanner = LogScanner::default();

        assert!(!scanner.matches(
            "[UploadWatcher] build error: Failed to build MyWorld",
            Severity::Error
        ));
    }

    #[test]
    fn custom_signatures_replace_the_defaults() {
        let scanner = LogScanner::new(["publish step exploded"]);

        assert!(scanner.matches("error: publish step exploded badly", Severity::Error));
        assert!(!scanner.matches("Failed to build MyWorld", Severity::Error));
    }

    #[test]
    fn signatures_are_matched_literally() {
        // Regex metacharacters in a configured signature must not be
        // interpreted.
        let scanner = LogScanner::new(["build (step 2) failed"]);

        assert!(scanner.matches("build (step 2) failed", Severity::Error));
        assert!(!scanner.matches("build step 2 failed", Severity::Error));
    }
}
