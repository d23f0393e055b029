//! Errors that can occur during the lifetime of the tool.
use std::io::Error as IOError;
use std::process::ExitCode;

use thiserror::Error;

use crate::kale::diagnostics::Diagnostic;

/// An error that occurred inside the Kale engine.
/// This enum will be extended bit by bit as new phases
/// get added.
///
/// Exit codes follow the
/// [`<sysexits.h>`](https://man.freebsd.org/cgi/man.cgi?query=sysexits&apropos=0&sektion=0&manpath=FreeBSD+4.3-RELEASE&format=html)
/// header, see the `From<EngineError> for ExitCode` implementation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// An error in how the tool is called.
    #[error("Usage: {0} [script]")]
    UsageError(String),
    /// The source file could not be loaded.
    #[error("Error reading source file: {0}")]
    FileError(#[source] IOError),
    /// Reading from the REPL prompt failed.
    #[error("Error reading input: {0}")]
    PromptError(#[source] IOError),
    /// Writing the scanned tokens failed.
    #[error("Error writing output: {0}")]
    OutputError(#[source] IOError),
    /// Errors that happened during the lexing phase.
    #[error("{}", display_diagnostics(.0))]
    LexingErrors(Vec<Diagnostic>),
}

/// One diagnostic per line.
fn display_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl From<EngineError> for ExitCode {
    fn from(value: EngineError) -> Self {
        ExitCode::from(match value {
            EngineError::UsageError(_) => 64,    // EX_USAGE
            EngineError::LexingErrors(_) => 65,  // EX_DATAERR
            EngineError::FileError(_) => 66,     // EX_NOINPUT
            EngineError::PromptError(_)
            | EngineError::OutputError(_) => 74, // EX_IOERR
        })
    }
}

#[cfg(test)]
mod test {
    use std::io::{Error as IOError, ErrorKind};

    use super::EngineError;
    use crate::kale::diagnostics::Diagnostic;

    fn diagnostic(line: usize, message: &str) -> Diagnostic {
        Diagnostic {
            line,
            location: String::new(),
            message: message.to_owned(),
        }
    }

    #[test]
    fn lexing_errors_print_one_per_line() {
        let err = EngineError::LexingErrors(vec![
            diagnostic(1, "Unexpected character '@'."),
            diagnostic(4, "Unterminated string."),
        ]);
        assert_eq!(
            err.to_string(),
            "[line 1] Error: Unexpected character '@'.\n[line 4] Error: Unterminated string."
        );
    }

    #[test]
    fn usage_and_file_messages() {
        assert_eq!(
            EngineError::UsageError("kale".to_owned()).to_string(),
            "Usage: kale [script]"
        );
        let io = IOError::new(ErrorKind::NotFound, "no such file");
        assert_eq!(
            EngineError::FileError(io).to_string(),
            "Error reading source file: no such file"
        );
    }
}
