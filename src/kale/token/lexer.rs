//! Encapsulates all behaviour necessary to properly lex Kale code.
//!
//! Note: Lexing is also commonly categorized as tokenizing. The [Scanner]
//! walks the source once, front to back, and never looks more than two
//! bytes ahead. Problems in the input do not stop it: they are recorded as
//! [`Diagnostics`](Diagnostic) and scanning carries on with the next byte.
//!
//! ```rust
//! use crate::kale::token::lexer::Scanner;
//! use crate::kale::token::tokens::TokenType;
//!
//! let result = Scanner::new("var x = \"foo\" + 20; // done").scan_tokens();
//! assert!(!result.had_error());
//! assert_eq!(result.tokens.len(), 8);
//! assert_eq!(result.tokens[3].token_type, TokenType::String("foo".to_owned()));
//! assert_eq!(result.tokens[3].lexeme, "\"foo\"");
//! ```

use log::{debug, trace};
use thiserror::Error;

use crate::kale::diagnostics::{Diagnostic, Diagnostics};
use crate::kale::token::tokens::{Token, TokenType, KEYWORDS};

/// Errors that can happen during lexing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexingError {
    /// A character that cannot start any token.
    #[error("Unexpected character '{}'.", .0.escape_debug())]
    UnexpectedCharacter(char),
    /// A string was started but not terminated until the end of input/file.
    #[error("Unterminated string.")]
    UnterminatedString,
    /// A block comment ran into the end of input/file.
    #[error("Unterminated block comment.")]
    UnterminatedComment,
}

/// Knobs for behaviour that is kept for compatibility but may change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScannerConfig {
    /// When `false`, a block comment ends right before the first `/` it
    /// contains, and that `/` is scanned again as a regular character.
    /// When `true`, a block comment ends after the first `*/`.
    /// Neither mode supports nesting.
    pub strict_block_comments: bool,
}

/// Everything a single scan produced.
#[derive(Debug)]
#[must_use]
pub struct ScanResult {
    /// Tokens in source order. Ends with [`TokenType::EndOfInput`]
    /// if, and only if, no diagnostics were reported.
    pub tokens: Vec<Token>,
    /// Problems found while scanning.
    pub diagnostics: Diagnostics,
}

impl ScanResult {
    /// Whether any lexical error occurred.
    #[must_use]
    pub fn had_error(&self) -> bool {
        self.diagnostics.had_error()
    }

    /// Either the full token list, or all diagnostics if there were any.
    /// Thus, you cannot proceed with the list of tokens if lexing had any errors.
    ///
    /// # Errors
    ///
    /// If at least one diagnostic was reported.
    pub fn into_result(self) -> Result<Vec<Token>, Vec<Diagnostic>> {
        if self.diagnostics.had_error() {
            Err(self.diagnostics.into_vec())
        } else {
            Ok(self.tokens)
        }
    }
}

/// Turns a source string into tokens. A scanner is used up by
/// [`scan_tokens`](Scanner::scan_tokens), so every input needs a fresh one.
#[derive(Debug)]
pub struct Scanner<'src> {
    /// The full source text.
    source: &'src str,
    /// Behavioural switches.
    config: ScannerConfig,
    /// Tokens recognized so far.
    tokens: Vec<Token>,
    /// Problems reported so far.
    diagnostics: Diagnostics,
    /// Byte offset of the first byte of the lexeme being scanned.
    start: usize,
    /// Byte offset of the next unread byte.
    current: usize,
    /// 1-based line of `current`.
    line: usize,
}

impl<'src> Scanner<'src> {
    /// A scanner with the default [`ScannerConfig`].
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Scanner::with_config(source, ScannerConfig::default())
    }

    /// A scanner with the given [`ScannerConfig`].
    #[must_use]
    pub const fn with_config(source: &'src str, config: ScannerConfig) -> Self {
        Scanner {
            source,
            config,
            tokens: Vec::new(),
            diagnostics: Diagnostics::new(),
            start: 0,
            current: 0,
            line: 1,
        }
    }

    /// Scans the whole source.
    ///
    /// Errors are reported and skipped over. The trailing
    /// [`TokenType::EndOfInput`] is only appended when none were reported.
    pub fn scan_tokens(mut self) -> ScanResult {
        while !self.is_at_end() {
            self.start = self.current;
            if let Err(err) = self.scan_token() {
                self.diagnostics.error(self.line, err);
            }
        }

        if !self.diagnostics.had_error() {
            self.tokens.push(Token::new(TokenType::EndOfInput, "", self.line));
        }
        debug!(
            "scanned {} tokens over {} lines with {} errors",
            self.tokens.len(),
            self.line,
            self.diagnostics.len()
        );

        ScanResult {
            tokens: self.tokens,
            diagnostics: self.diagnostics,
        }
    }

    /// Recognizes one token starting at `start`, or skips one piece of
    /// whitespace or one comment.
    ///
    /// In case of an error, the offending input stays consumed, so that
    /// lexing can continue past it.
    fn scan_token(&mut self) -> Result<(), LexingError> {
        let Some(byte) = self.advance() else {
            return Ok(());
        };

        match byte {
            // Grouping
            b'(' => self.add_token(TokenType::LeftParen),
            b')' => self.add_token(TokenType::RightParen),
            b'{' => self.add_token(TokenType::LeftBrace),
            b'}' => self.add_token(TokenType::RightBrace),

            // Punctuation
            b',' => self.add_token(TokenType::Comma),
            b'.' => self.add_token(TokenType::Dot),
            b';' => self.add_token(TokenType::Semicolon),

            // Arith Operators
            b'-' => self.add_token(TokenType::Minus),
            b'+' => self.add_token(TokenType::Plus),
            b'*' => self.add_token(TokenType::Star),

            // Comparison Operators
            b'!' if self.next_byte_is(b'=') => self.add_token(TokenType::BangEqual),
            b'!'                            => self.add_token(TokenType::Bang),
            b'=' if self.next_byte_is(b'=') => self.add_token(TokenType::EqualEqual),
            b'='                            => self.add_token(TokenType::Equal),
            b'<' if self.next_byte_is(b'=') => self.add_token(TokenType::LessEqual),
            b'<'                            => self.add_token(TokenType::Less),
            b'>' if self.next_byte_is(b'=') => self.add_token(TokenType::GreaterEqual),
            b'>'                            => self.add_token(TokenType::Greater),

            // Comments, or division
            b'/' if self.next_byte_is(b'/') => self.line_comment(),
            b'/' if self.next_byte_is(b'*') => return self.block_comment(),
            b'/' => self.add_token(TokenType::Slash),

            // Whitespace; newlines are counted by `advance`
            b' ' | b'\r' | b'\t' | b'\n' => {}

            // Literals
            b'"' => return self.string(),
            b if is_digit(b) => self.number(),

            // Identifiers and Keywords
            b if is_alpha(b) => self.identifier(),

            // ERROR
            _ => return Err(self.unexpected_character()),
        }
        Ok(())
    }

    /// Skips everything up to, but not including, the next newline.
    fn line_comment(&mut self) {
        while self.advance_if(|b| b != b'\n').is_some() {
            // do nothing...
        }
    }

    /// Skips a block comment whose `/*` has already been consumed.
    fn block_comment(&mut self) -> Result<(), LexingError> {
        if self.config.strict_block_comments {
            loop {
                match self.advance() {
                    None => return Err(LexingError::UnterminatedComment),
                    Some(b'*') if self.next_byte_is(b'/') => return Ok(()),
                    Some(_) => {}
                }
            }
        }

        // The closing `/` is left unconsumed.
        while self.advance_if(|b| b != b'/').is_some() {}
        if self.is_at_end() {
            Err(LexingError::UnterminatedComment)
        } else {
            Ok(())
        }
    }

    /// Scans a string literal whose opening quote has already been consumed.
    /// No escape sequences are recognized.
    fn string(&mut self) -> Result<(), LexingError> {
        while self.advance_if(|b| b != b'"').is_some() {}

        if self.advance().is_none() {
            return Err(LexingError::UnterminatedString);
        }

        let lexeme = self.lexeme();
        let value = lexeme
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
            .unwrap_or_default()
            .to_owned();
        self.add_token(TokenType::String(value));
        Ok(())
    }

    /// Scans a number: digits, optionally followed by `.` and more digits.
    /// The digits are kept exactly as written.
    fn number(&mut self) {
        while self.advance_if(is_digit).is_some() {}

        if self.peek() == Some(b'.') && self.peek_next().is_some_and(is_digit) {
            let _: Option<u8> = self.advance();
            while self.advance_if(is_digit).is_some() {}
        }

        let raw = self.lexeme().to_owned();
        self.add_token(TokenType::Number(raw));
    }

    /// Scans an identifier, turning it into a keyword if it is reserved.
    fn identifier(&mut self) {
        while self.advance_if(is_alpha_num).is_some() {}

        let token_type = KEYWORDS
            .get(self.lexeme())
            .map_or(TokenType::Identifier, |&kw| TokenType::Keyword(kw));
        self.add_token(token_type);
    }

    /// Consumes the whole character at `start`, which may span several bytes.
    fn unexpected_character(&mut self) -> LexingError {
        match self.source.get(self.start..).and_then(|rest| rest.chars().next()) {
            Some(c) => {
                self.current = self.start + c.len_utf8();
                LexingError::UnexpectedCharacter(c)
            }
            None => LexingError::UnexpectedCharacter(char::REPLACEMENT_CHARACTER),
        }
    }

    /// Emits a token of the given type for the current lexeme.
    fn add_token(&mut self, token_type: TokenType) {
        let token = Token::new(token_type, self.lexeme(), self.line);
        trace!("{token} (line {})", token.line);
        self.tokens.push(token);
    }

    /// The source text from `start` to `current`.
    ///
    /// Both offsets only ever come to rest right after an ASCII byte or at
    /// the end of input, so they are always on character boundaries.
    fn lexeme(&self) -> &'src str {
        self.source.get(self.start..self.current).unwrap_or_default()
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    /// Gets the next byte, counting lines.
    fn advance(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.current += 1;
        if byte == b'\n' {
            self.line += 1;
        }
        Some(byte)
    }

    /// Gets the next byte only if it matches the predicate.
    fn advance_if<P: FnOnce(u8) -> bool>(&mut self, test: P) -> Option<u8> {
        match self.peek() {
            Some(b) if test(b) => self.advance(),
            _ => None,
        }
    }

    /// Consumes the next byte only if it is exactly the expected one.
    fn next_byte_is(&mut self, expected: u8) -> bool {
        self.advance_if(|b| b == expected).is_some()
    }

    fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.current).copied()
    }

    /// The byte one beyond the next.
    fn peek_next(&self) -> Option<u8> {
        self.source.as_bytes().get(self.current + 1).copied()
    }
}

/// Is the byte an ASCII digit?
#[inline]
const fn is_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

/// Is the byte an ASCII letter or underscore?
#[inline]
const fn is_alpha(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

/// Is the byte an ASCII letter, digit or underscore?
#[inline]
const fn is_alpha_num(b: u8) -> bool {
    is_alpha(b) || is_digit(b)
}
