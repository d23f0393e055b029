//! Line-addressed reporting of problems found in Kale source code.
//!
//! Instead of a process-wide "had error" flag, every scan owns a
//! [Diagnostics] collector and hands it back to the caller, who decides
//! what an error means for the rest of the run.
use core::fmt::{Display, Formatter};

use log::debug;

/// A single reported problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line the problem was found on.
    pub line: usize,
    /// Additional location information, empty if there is none.
    pub location: String,
    /// Human-readable description.
    pub message: String,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        if self.location.is_empty() {
            write!(f, "[line {}] Error: {}", self.line, self.message)
        } else {
            write!(f, "[line {}] Error {}: {}", self.line, self.location, self.message)
        }
    }
}

/// Collects [`Diagnostics`](Diagnostic) in the order they were reported.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Diagnostics {
    /// Everything reported so far.
    reported: Vec<Diagnostic>,
}

impl Diagnostics {
    /// An empty collector.
    #[must_use]
    pub const fn new() -> Self {
        Diagnostics { reported: Vec::new() }
    }

    /// Records a problem at the given line and location.
    pub fn report<L: Into<String>, M: Display>(&mut self, line: usize, location: L, message: M) {
        let diagnostic = Diagnostic {
            line,
            location: location.into(),
            message: message.to_string(),
        };
        debug!("{diagnostic}");
        self.reported.push(diagnostic);
    }

    /// Records a problem that has no location beyond its line.
    pub fn error<M: Display>(&mut self, line: usize, message: M) {
        self.report(line, "", message);
    }

    /// Whether anything was reported at all.
    #[must_use]
    pub fn had_error(&self) -> bool {
        !self.is_empty()
    }

    /// Number of reported problems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reported.len()
    }

    /// Whether nothing was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reported.is_empty()
    }

    /// Reported problems, oldest first.
    pub fn iter(&self) -> core::slice::Iter<'_, Diagnostic> {
        self.reported.iter()
    }

    /// Hands out the reported problems, oldest first.
    #[must_use]
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.reported
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = core::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod test {
    use super::{Diagnostic, Diagnostics};

    #[test]
    fn error_reports_without_location() {
        let mut diagnostics = Diagnostics::new();
        assert!(!diagnostics.had_error());

        diagnostics.error(3, "Unterminated string.");

        assert!(diagnostics.had_error());
        assert_eq!(
            diagnostics.iter().collect::<Vec<_>>(),
            vec![&Diagnostic {
                line: 3,
                location: String::new(),
                message: "Unterminated string.".to_owned(),
            }]
        );
    }

    #[test]
    fn display_formats() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.error(1, "Unexpected character '@'.");
        diagnostics.report(2, "at end", "Expect ';'.");

        let lines: Vec<String> = diagnostics.iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            vec![
                "[line 1] Error: Unexpected character '@'.",
                "[line 2] Error at end: Expect ';'.",
            ]
        );
    }

    #[test]
    fn collectors_are_independent() {
        let mut first = Diagnostics::new();
        let second = Diagnostics::new();
        first.error(1, "boom");
        first.error(1, "boom again");

        assert_eq!(first.len(), 2);
        assert!(first.had_error());
        assert!(second.is_empty());
        assert_eq!(
            first.into_vec().into_iter().map(|d| d.message).collect::<Vec<_>>(),
            vec!["boom", "boom again"]
        );
    }
}
