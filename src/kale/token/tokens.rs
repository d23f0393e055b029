//! Data types representing tokens available in the Kale language.
use core::fmt::{Display, Formatter};
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::kale::util::map;

/// Reserved words of the Kale language.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Keyword {
    // Constants
    /// `"nil"`
    Nil,
    /// `"false"`
    False,
    /// `"true"`
    True,

    // Logical Operators
    /// `"and"`
    And,
    /// `"or"`
    Or,

    // Control flow
    /// `"if"`
    If,
    /// `"else"`
    Else,
    /// `"for"`
    For,
    /// `"while"`
    While,
    /// `"return"`
    Return,

    // Declarations
    /// `"class"`
    Class,
    /// `"fun"`
    Fun,
    /// `"var"`
    Var,

    // Others
    /// `"print"`
    Print,
    /// `"super"`
    Super,
    /// `"this"`
    This,
}

impl Keyword {
    /// The token kind name of the keyword, e.g. `WHILE`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Keyword::Nil => "NIL",
            Keyword::False => "FALSE",
            Keyword::True => "TRUE",
            Keyword::And => "AND",
            Keyword::Or => "OR",
            Keyword::If => "IF",
            Keyword::Else => "ELSE",
            Keyword::For => "FOR",
            Keyword::While => "WHILE",
            Keyword::Return => "RETURN",
            Keyword::Class => "CLASS",
            Keyword::Fun => "FUN",
            Keyword::Var => "VAR",
            Keyword::Print => "PRINT",
            Keyword::Super => "SUPER",
            Keyword::This => "THIS",
        }
    }
}

/// Lookup table for keywords to distinguish them from identifiers.
/// Matching is exact and case-sensitive.
pub static KEYWORDS: LazyLock<HashMap<&'static str, Keyword>> = LazyLock::new(|| {
    map! {
        "nil"    => Keyword::Nil,
        "false"  => Keyword::False,
        "true"   => Keyword::True,

        "and"    => Keyword::And,
        "or"     => Keyword::Or,

        "if"     => Keyword::If,
        "else"   => Keyword::Else,
        "for"    => Keyword::For,
        "while"  => Keyword::While,
        "return" => Keyword::Return,

        "class"  => Keyword::Class,
        "fun"    => Keyword::Fun,
        "var"    => Keyword::Var,

        "print"  => Keyword::Print,
        "super"  => Keyword::Super,
        "this"   => Keyword::This,
    }
});

/// An enum covering all possible kinds a token can take on.
///
/// Only string and number literals carry a payload; every other
/// kind is fully described by its variant and the token's lexeme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenType {
    // Grouping
    /// `"("`
    LeftParen,
    /// `")"`
    RightParen,
    /// `"{"`
    LeftBrace,
    /// `"}"`
    RightBrace,

    // Punctuation
    /// `","`
    Comma,
    /// `"."`
    Dot,
    /// `";"`
    Semicolon,

    // Arith Operators
    /// `"-"`
    Minus,
    /// `"+"`
    Plus,
    /// `"*"`
    Star,
    /// `"/"`
    Slash,

    // Comparison Operators
    /// `"!"`
    Bang,
    /// `"!="`
    BangEqual,
    /// `"="`
    Equal,
    /// `"=="`
    EqualEqual,
    /// `"<"`
    Less,
    /// `"<="`
    LessEqual,
    /// `">"`
    Greater,
    /// `">="`
    GreaterEqual,

    // Literals
    /// A string literal, holding the text between the quotes.
    /// No escape sequences are interpreted.
    String(String),
    /// A number literal, holding the digits exactly as written.
    Number(String),

    // Identifiers and Keywords
    /// A user-defined name.
    Identifier,
    /// A reserved word.
    Keyword(Keyword),

    /// End of Input, either end of line in REPL mode, or End of File in normal mode.
    EndOfInput,
}

impl TokenType {
    /// The kind name of this token type, e.g. `BANG_EQUAL`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match *self {
            TokenType::LeftParen => "LEFT_PAREN",
            TokenType::RightParen => "RIGHT_PAREN",
            TokenType::LeftBrace => "LEFT_BRACE",
            TokenType::RightBrace => "RIGHT_BRACE",
            TokenType::Comma => "COMMA",
            TokenType::Dot => "DOT",
            TokenType::Semicolon => "SEMICOLON",
            TokenType::Minus => "MINUS",
            TokenType::Plus => "PLUS",
            TokenType::Star => "STAR",
            TokenType::Slash => "SLASH",
            TokenType::Bang => "BANG",
            TokenType::BangEqual => "BANG_EQUAL",
            TokenType::Equal => "EQUAL",
            TokenType::EqualEqual => "EQUAL_EQUAL",
            TokenType::Less => "LESS",
            TokenType::LessEqual => "LESS_EQUAL",
            TokenType::Greater => "GREATER",
            TokenType::GreaterEqual => "GREATER_EQUAL",
            TokenType::String(_) => "STRING",
            TokenType::Number(_) => "NUMBER",
            TokenType::Identifier => "IDENTIFIER",
            TokenType::Keyword(kw) => kw.name(),
            TokenType::EndOfInput => "EOF",
        }
    }

    /// The literal payload, present only for strings and numbers.
    #[must_use]
    pub fn literal(&self) -> Option<&str> {
        match *self {
            TokenType::String(ref value) | TokenType::Number(ref value) => Some(value.as_str()),
            _ => None,
        }
    }
}

/// A recognized lexeme, bundled with its kind and the line it was scanned on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Kind of this token.
    pub token_type: TokenType,
    /// The exact source text this token was recognized from.
    /// Empty only for [`TokenType::EndOfInput`].
    pub lexeme: String,
    /// 1-based line number.
    pub line: usize,
}

impl Token {
    /// Construct a token. Tokens are never modified afterwards.
    #[must_use]
    pub fn new<S: Into<String>>(token_type: TokenType, lexeme: S, line: usize) -> Self {
        Token {
            token_type,
            lexeme: lexeme.into(),
            line,
        }
    }

    /// See [`TokenType::literal`].
    #[must_use]
    pub fn literal(&self) -> Option<&str> {
        self.token_type.literal()
    }
}

/// Canonical one-line form: `KIND lexeme literal`, with `null`
/// standing in for an absent literal.
impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.token_type.name(),
            self.lexeme,
            self.literal().unwrap_or("null")
        )
    }
}
