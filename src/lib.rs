//! Lexical scanner for `{{ }}`-delimited text templates.
//!
//! Splits a template into plain text and actions, and tokenizes the
//! action grammar: delimiters, whitespace, operators, parentheses,
//! fields, variables, identifiers and keywords, and string, raw string,
//! character and number literals. Trim markers (`{{- ` and ` -}}`) are
//! resolved against the neighbouring text after scanning.
//!
//! # Quick start
//!
//! ```
//! use tmplscan::{TokenKind, scan};
//!
//! let tokens = scan("hello {{ .Name | printf \"%q\" }}!", "", "").unwrap();
//! assert_eq!(tokens[0].text, "hello ");
//! assert_eq!(tokens[3].kind, TokenKind::Field);
//! assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
//! ```
//!
//! ## Custom delimiters
//!
//! ```
//! use tmplscan::{TokenKind, scan};
//!
//! let tokens = scan("$$for@@", "$$", "@@").unwrap();
//! let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     [TokenKind::LeftDelim, TokenKind::Identifier, TokenKind::RightDelim, TokenKind::Eof]
//! );
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod config;
pub mod cursor;
pub mod lexer;
pub mod passes;
pub mod position;
pub mod token;

pub use config::{Delimiters, ScanOptions};
pub use lexer::{LexError, LexErrorKind, scan, scan_with};
pub use passes::{check_parens, trim_markers};
pub use position::{Position, line_column};
pub use token::{Token, TokenKind};
