//! # Kale - the lexical front end of a small interpreted language
//!
//! Kale source text is turned into a flat list of typed tokens, each of which
//! remembers the exact text it was scanned from and the line it was found on.
//! There is no parser or evaluator (yet); the tool prints the tokens it finds.
//!
//! ## Usage
//!
//! - `kale <script>` scans the given file, prints every token and exits with
//!   status 65 if any lexical error was found.
//! - `kale` without arguments starts a REPL which scans one line at a time
//!   and ends the session at the first line containing a lexical error.
//!
//! ## Quirks
//!
//! - Block comments end right before the first `/` they contain, which is then
//!   scanned as a division operator. `/* a */` therefore leaves a `/` behind.
//!   Pass `--strict-comments` (or set `KALE_STRICT_COMMENTS=true`) to end them
//!   at `*/` instead.
//! - String literals do not support escape sequences and may span lines.
//!
//! ## Lints
//!
//! - `#![deny(...)]` for most optional lints, including a lot from clippy.
//!   Circumventing these via `#[expect(...)]` should be taken as a last precaution,
//!   where the alternative would complicate or make the code less readable.
#![deny(
    future_incompatible,
    keyword_idents,
    let_underscore,
    nonstandard_style,
    refining_impl_trait,
)]
#![deny(
    rust_2018_compatibility,
    rust_2021_compatibility,
    rust_2024_compatibility,
)]
#![deny(
    clippy::all,
    clippy::pedantic,
)]
#![deny(
    clippy::absolute_paths,
    clippy::allow_attributes_without_reason,
    clippy::as_conversions,
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::else_if_without_else,
    clippy::empty_structs_with_brackets,
    clippy::get_unwrap,
    clippy::if_then_some_else_none,
    clippy::impl_trait_in_params,
    clippy::let_underscore_must_use,
    clippy::let_underscore_untyped,
    clippy::map_err_ignore,
    clippy::mem_forget,
    clippy::mixed_read_write_in_expression,
    clippy::multiple_inherent_impl,
    clippy::needless_raw_strings,
    clippy::panic_in_result_fn,
    clippy::rc_buffer,
    clippy::redundant_type_annotations,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::same_name_method,
    clippy::self_named_module_files,
    clippy::str_to_string,
    clippy::string_add,
    clippy::string_to_string,
    clippy::tests_outside_test_module,
    clippy::todo,
    clippy::try_err,
    clippy::unimplemented,
    clippy::unneeded_field_pattern,
    clippy::unused_result_ok,
    clippy::unwrap_in_result,
    clippy::unwrap_used,
    clippy::verbose_file_reads,
)]
#![warn(unused)]
pub mod kale;

use clap::{ArgAction, Parser};
use log::info;

use kale::errors::EngineError;
use kale::token::lexer::{ScanResult, Scanner, ScannerConfig};

use std::fs;
use std::io::{self, stdin, stdout, BufRead, Write};
use std::path::Path;
use std::process::{ExitCode, Termination};

/// Writes every token on its own line.
fn write_tokens<W: Write>(output: &mut W, result: &ScanResult) -> io::Result<()> {
    for token in &result.tokens {
        writeln!(output, "{token}")?;
    }
    Ok(())
}

/// Load a file and run it through the scanner.
///
/// Bytes that are not valid UTF-8 are replaced with U+FFFD, so they surface
/// as unexpected characters (or as part of a string literal) instead of
/// failing the whole read.
/// TODO: Currently, only lexes. Hand the tokens to a parser once one exists.
fn run_file<P: AsRef<Path>>(file: P, config: ScannerConfig) -> Result<(), EngineError> {
    let file = file.as_ref();
    info!("scanning {}", file.display());
    let bytes = fs::read(file).map_err(EngineError::FileError)?;
    let source = String::from_utf8_lossy(&bytes);
    let result = Scanner::with_config(&source, config).scan_tokens();

    write_tokens(&mut stdout().lock(), &result).map_err(EngineError::OutputError)?;
    result
        .into_result()
        .map(|_| ())
        .map_err(EngineError::LexingErrors)
}

/// Run the REPL Prompt on standard input and output.
fn run_prompt(config: ScannerConfig) -> Result<(), EngineError> {
    prompt_loop(stdin().lock(), stdout().lock(), config)
}

/// The REPL loop over any line source.
///
/// Every line is scanned on its own, so a fresh [Scanner] is used for each.
/// The session ends at end of input, or after a line with lexical errors.
fn prompt_loop<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
    config: ScannerConfig,
) -> Result<(), EngineError> {
    let mut line = Vec::new();
    loop {
        write!(output, "> ").map_err(EngineError::PromptError)?;
        output.flush().map_err(EngineError::PromptError)?;

        line.clear();
        let read = input
            .read_until(b'\n', &mut line)
            .map_err(EngineError::PromptError)?;
        if read == 0 {
            info!("end of input, leaving the prompt");
            break Ok(());
        }

        let source = String::from_utf8_lossy(&line);
        let result = Scanner::with_config(source.trim(), config).scan_tokens();
        write_tokens(&mut output, &result).map_err(EngineError::PromptError)?;

        if result.had_error() {
            for diagnostic in &result.diagnostics {
                eprintln!("{diagnostic}");
            }
            break Ok(());
        }
    }
}

/// Picks file or prompt mode from the positional arguments.
fn dispatch(scripts: &[String], config: ScannerConfig) -> Result<(), EngineError> {
    match *scripts {
        [] => run_prompt(config),
        [ref script] => run_file(script, config),
        [_, _, ..] => Err(EngineError::UsageError(env!("CARGO_PKG_NAME").to_owned())),
    }
}

/// Isomorphic to `Result<T, EngineError>`,
/// this allows for overriding the [Termination]
/// trait impl and report custom exit codes instead.
///
/// As this is only supposed to be used on the very
/// outer shell, T defaults to `()`.
#[derive(Debug)]
enum EngineResult<T = ()> {
    /// Ok variant.
    Ok(T),
    /// Error variant
    Err(EngineError),
}

impl Termination for EngineResult {
    fn report(self) -> ExitCode {
        if let EngineResult::Err(err) = self {
            eprintln!("{err}");
            err.into()
        } else {
            ExitCode::SUCCESS
        }
    }
}

impl<T, E> From<Result<T, E>> for EngineResult<T>
where
    EngineError: From<E>,
{
    fn from(value: Result<T, E>) -> Self {
        match value {
            Ok(value) => EngineResult::Ok(value),
            Err(err) => EngineResult::Err(err.into()),
        }
    }
}

/// kale scans source code of the Kale language into tokens and prints them,
/// either for a whole file, or line by line on an interactive prompt.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct KaleArgs {
    /// Script to scan. Without one, an interactive prompt is started.
    #[arg(value_name = "SCRIPT")]
    scripts: Vec<String>,

    /// End block comments at `*/` instead of at the first `/`.
    #[arg(long, env = "KALE_STRICT_COMMENTS")]
    strict_comments: bool,

    /// Log more; repeat for even more output.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Silence all logging.
    #[arg(short, long)]
    quiet: bool,
}

impl KaleArgs {
    /// The scanner settings selected on the command line.
    const fn scanner_config(&self) -> ScannerConfig {
        ScannerConfig {
            strict_block_comments: self.strict_comments,
        }
    }
}

/// Sets up logging to standard error, based on `--verbose` and `--quiet`.
fn init_logging(args: &KaleArgs) {
    if let Err(err) = stderrlog::new()
        .module(module_path!())
        .quiet(args.quiet)
        .verbosity(usize::from(args.verbose))
        .init()
    {
        eprintln!("could not set up logging: {err}");
    }
}

fn main() -> EngineResult {
    let args = KaleArgs::parse();
    init_logging(&args);
    dispatch(&args.scripts, args.scanner_config()).into()
}

#[cfg(test)]
mod test {
    use std::io::Write;
    use std::process::ExitCode;

    use clap::Parser;
    use tempfile::NamedTempFile;

    use super::{dispatch, prompt_loop, run_file, KaleArgs};
    use crate::kale::errors::EngineError;
    use crate::kale::token::lexer::ScannerConfig;

    fn source_file(contents: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents).expect("written source");
        file
    }

    fn prompt_session(input: &str) -> (Result<(), EngineError>, String) {
        let mut output = Vec::new();
        let result = prompt_loop(input.as_bytes(), &mut output, ScannerConfig::default());
        (result, String::from_utf8(output).expect("utf-8 output"))
    }

    #[test]
    fn no_arguments_means_prompt() {
        let args = KaleArgs::try_parse_from(["kale"]).expect("valid arguments");
        assert!(args.scripts.is_empty());
        assert!(!args.quiet);
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn scripts_and_flags() {
        let args = KaleArgs::try_parse_from(["kale", "-vv", "--strict-comments", "main.kale"])
            .expect("valid arguments");
        assert_eq!(args.scripts, vec!["main.kale".to_owned()]);
        assert_eq!(args.verbose, 2);
        assert!(args.scanner_config().strict_block_comments);
    }

    #[test]
    fn more_than_one_script_is_a_usage_error() {
        let args = KaleArgs::try_parse_from(["kale", "a.kale", "b.kale"]).expect("valid arguments");
        let err = dispatch(&args.scripts, args.scanner_config()).expect_err("usage error");

        assert!(matches!(err, EngineError::UsageError(_)));
        assert_eq!(ExitCode::from(err), ExitCode::from(64));
    }

    #[test]
    fn clean_file_succeeds() {
        let file = source_file(b"var answer = 42;\n// done\n");
        assert!(run_file(file.path(), ScannerConfig::default()).is_ok());
    }

    #[test]
    fn lexical_errors_in_a_file_exit_with_data_error() {
        let file = source_file(b"print 1;\n\"open");
        let err = run_file(file.path(), ScannerConfig::default()).expect_err("lexing error");

        let EngineError::LexingErrors(ref diagnostics) = err else {
            panic!("expected lexing errors, got {err:?}");
        };
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, 2);
        assert_eq!(diagnostics[0].message, "Unterminated string.");
        assert_eq!(ExitCode::from(err), ExitCode::from(65));
    }

    #[test]
    fn missing_file_exits_with_no_input() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = run_file(dir.path().join("missing.kale"), ScannerConfig::default())
            .expect_err("file error");

        assert!(matches!(err, EngineError::FileError(_)));
        assert_eq!(ExitCode::from(err), ExitCode::from(66));
    }

    #[test]
    fn invalid_utf8_is_scanned_as_unexpected_characters() {
        let file = source_file(b"var x = 1; \xFF\n\"ok\"");
        let err = run_file(file.path(), ScannerConfig::default()).expect_err("lexing error");

        let EngineError::LexingErrors(ref diagnostics) = err else {
            panic!("expected lexing errors, got {err:?}");
        };
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, 1);
        assert!(diagnostics[0].message.starts_with("Unexpected character"));
        assert_eq!(ExitCode::from(err), ExitCode::from(65));
    }

    #[test]
    fn invalid_utf8_inside_a_string_is_accepted() {
        let file = source_file(b"print \"caf\xE9\";");
        assert!(run_file(file.path(), ScannerConfig::default()).is_ok());
    }

    #[test]
    fn prompt_prints_tokens_per_line() {
        let (result, output) = prompt_session("1 + 2\nvar x;\n");
        assert!(result.is_ok());
        assert!(output.contains("NUMBER 1 1\nPLUS + null\nNUMBER 2 2\nEOF  null\n"));
        assert!(output.contains("VAR var null\nIDENTIFIER x null\nSEMICOLON ; null\n"));
        assert_eq!(output.matches("> ").count(), 3);
    }

    #[test]
    fn prompt_ends_after_an_erroneous_line() {
        let (result, output) = prompt_session("1\n@ 2\n3\n");
        assert!(result.is_ok());
        assert!(output.contains("NUMBER 2 2"));
        assert!(!output.contains("NUMBER 3 3"));
        assert_eq!(output.matches("> ").count(), 2);
    }

    #[test]
    fn prompt_ends_at_end_of_input() {
        let (result, output) = prompt_session("");
        assert!(result.is_ok());
        assert_eq!(output, "> ");
    }
}
