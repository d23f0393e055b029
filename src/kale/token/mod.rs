//! This is the Lexing or Tokenization module, split into two submodules.
//!
//! - [tokens] specifies the data types making up the tokens of the Kale language.
//! - [lexer] contains the [Scanner](lexer::Scanner) turning source code into tokens,
//!   alongside the error definitions that can occur during this phase.
pub mod lexer;
pub mod tokens;
