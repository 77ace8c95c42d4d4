use std::fmt;

use crate::config::{Delimiters, ScanOptions};
use crate::cursor::Cursor;
use crate::passes::{self, ElidedComment};
use crate::position::Position;
use crate::token::{Token, TokenKind};

/// Classifies a lexer error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// End of input reached inside an action.
    UnclosedAction,
    /// `)` without a matching `(` in the same action.
    UnexpectedRightParen,
    /// Right delimiter reached with `(` still open.
    UnclosedLeftParen,
    /// Character that cannot start any token inside an action.
    UnrecognizedCharacter(char),
    /// Double-quoted string without its closing quote on the same line.
    UnterminatedString,
    /// Raw string without its closing backquote.
    UnterminatedRawString,
    /// Character constant without its closing quote on the same line.
    UnterminatedCharConstant,
    /// Numeric run that matches no number grammar.
    BadNumber(String),
    /// `/*` without `*/`.
    UnclosedComment,
    /// `*/` not followed by the right delimiter.
    CommentBeforeDelimiter,
}

/// Format a rune as `U+XXXX`, adding the quoted rune when printable.
fn codepoint(ch: char) -> String {
    let code = format!("U+{:04X}", u32::from(ch));
    if ch.is_control() || ch.is_whitespace() {
        code
    } else {
        format!("{code} '{ch}'")
    }
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnclosedAction => write!(f, "unclosed action"),
            Self::UnexpectedRightParen => write!(f, "unexpected right paren"),
            Self::UnclosedLeftParen => write!(f, "unclosed left paren"),
            Self::UnrecognizedCharacter(ch) => {
                write!(f, "unrecognized character in action: {}", codepoint(*ch))
            }
            Self::UnterminatedString => write!(f, "unterminated quoted string"),
            Self::UnterminatedRawString => write!(f, "unterminated raw quoted string"),
            Self::UnterminatedCharConstant => {
                write!(f, "unterminated character constant")
            }
            Self::BadNumber(text) => write!(f, "bad number syntax: {text:?}"),
            Self::UnclosedComment => write!(f, "unclosed comment"),
            Self::CommentBeforeDelimiter => {
                write!(f, "comment ends before closing delimiter")
            }
        }
    }
}

/// Error produced during scanning.
///
/// `tokens` holds everything scanned before the failure, ending with an
/// `Error` token whose text is the diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "{kind}, at {} (line {}, column {})",
    position.offset,
    position.line,
    position.column
)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub position: Position,
    pub tokens: Vec<Token>,
}

/// Scan a template with the given delimiters. Empty delimiter strings select
/// the defaults `{{` and `}}`.
///
/// On success the sequence ends with exactly one `Eof` token.
///
/// # Errors
///
/// Returns `LexError` on the first malformed construct: unclosed actions,
/// comments or literals, unbalanced parentheses, bad numbers or
/// unrecognized characters.
pub fn scan(input: &str, left: &str, right: &str) -> Result<Vec<Token>, LexError> {
    scan_with(input, &ScanOptions::new(Delimiters::new(left, right)))
}

/// Scan a template with explicit options.
#[tracing::instrument(level = "debug", skip_all, fields(len = input.len()))]
pub fn scan_with(input: &str, options: &ScanOptions) -> Result<Vec<Token>, LexError> {
    let (mut tokens, comments) = match Lexer::new(input, &options.delimiters).run() {
        Ok(scanned) => scanned,
        Err(err) => {
            tracing::debug!(kind = %err.kind, offset = err.position.offset, "scan failed");
            return Err(err);
        }
    };
    if options.trim {
        passes::resolve_trims(&mut tokens, &comments);
    }
    tracing::debug!(count = tokens.len(), "scan finished");
    Ok(tokens)
}

/// Which part of the template the lexer is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Text,
    /// Inside an action, with the current parenthesis depth.
    Action { depth: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Radix {
    Binary,
    Octal,
    Decimal,
    Hex,
}

impl Radix {
    const fn digits(self) -> &'static [u8] {
        match self {
            Self::Binary => b"01_",
            Self::Octal => b"01234567_",
            Self::Decimal => b"0123456789_",
            Self::Hex => b"0123456789abcdefABCDEF_",
        }
    }
}

const fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

fn is_word_start(ch: char) -> bool {
    ch == '_' || ch.is_alphabetic()
}

fn is_word_char(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

struct Lexer<'a> {
    cursor: Cursor<'a>,
    left: &'a str,
    right: &'a str,
    mode: Mode,
    tokens: Vec<Token>,
    comments: Vec<ElidedComment>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str, delimiters: &'a Delimiters) -> Self {
        Self {
            cursor: Cursor::new(input),
            left: delimiters.left(),
            right: delimiters.right(),
            mode: Mode::Text,
            tokens: Vec::new(),
            comments: Vec::new(),
        }
    }

    fn run(mut self) -> Result<(Vec<Token>, Vec<ElidedComment>), LexError> {
        while !self.cursor.is_eof() {
            if self.cursor.starts_with(self.left) {
                self.lex_action()?;
            } else {
                self.lex_text();
            }
        }
        let line = self.cursor.line();
        self.emit(TokenKind::Eof, self.cursor.pos(), line);
        Ok((self.tokens, self.comments))
    }

    fn emit(&mut self, kind: TokenKind, start: usize, line: usize) {
        self.tokens.push(Token {
            kind,
            text: self.cursor.slice_from(start).to_string(),
            start,
            end: self.cursor.pos(),
            line,
        });
    }

    /// Consume `len` bytes as a token of `kind`.
    fn emit_bytes(&mut self, kind: TokenKind, len: usize) {
        let (start, line) = (self.cursor.pos(), self.cursor.line());
        self.cursor.advance(len);
        self.emit(kind, start, line);
    }

    /// Terminate the scan: push an error token at `at` and hand back all
    /// tokens produced so far.
    fn fail(&mut self, kind: LexErrorKind, at: usize) -> LexError {
        let position = Position::locate(self.cursor.input(), at);
        self.tokens.push(Token {
            kind: TokenKind::Error,
            text: kind.to_string(),
            start: at,
            end: self.cursor.pos().max(at),
            line: position.line,
        });
        LexError {
            kind,
            position,
            tokens: std::mem::take(&mut self.tokens),
        }
    }

    /// Plain text up to the next left delimiter or the end of input.
    fn lex_text(&mut self) {
        let (start, line) = (self.cursor.pos(), self.cursor.line());
        let end = self
            .cursor
            .find(self.left)
            .unwrap_or(self.cursor.input().len());
        self.cursor.advance_to(end);
        self.emit(TokenKind::Text, start, line);
    }

    fn at_left_trim_marker(&self) -> bool {
        self.cursor.peek(0) == Some(b'-') && self.cursor.peek(1).is_some_and(is_space)
    }

    /// Length of the right delimiter at the cursor, including a leading
    /// trim marker.
    fn at_right_delim(&self) -> Option<usize> {
        if self.cursor.peek(0).is_some_and(is_space)
            && self.cursor.peek(1) == Some(b'-')
            && self.cursor.starts_with_at(2, self.right)
        {
            Some(2 + self.right.len())
        } else if self.cursor.starts_with(self.right) {
            Some(self.right.len())
        } else {
            None
        }
    }

    fn lex_action(&mut self) -> Result<(), LexError> {
        let (start, line) = (self.cursor.pos(), self.cursor.line());
        self.cursor.advance(self.left.len());
        let trim = self.at_left_trim_marker();
        let marker = if trim { 2 } else { 0 };
        if self.cursor.starts_with_at(marker, "/*") {
            self.cursor.advance(marker);
            return self.lex_comment(start, trim);
        }
        self.cursor.advance(marker);
        self.emit(TokenKind::LeftDelim, start, line);
        tracing::trace!(offset = start, line, "action");

        self.mode = Mode::Action { depth: 0 };
        while self.mode != Mode::Text {
            self.lex_inside_action()?;
        }
        Ok(())
    }

    /// A comment spanning the whole action. Emits nothing; its trim markers
    /// are recorded for the trim pass.
    fn lex_comment(&mut self, start: usize, trim_left: bool) -> Result<(), LexError> {
        self.skip_comment(start)?;
        let Some(len) = self.at_right_delim() else {
            return Err(self.fail(LexErrorKind::CommentBeforeDelimiter, start));
        };
        self.cursor.advance(len);
        self.comments.push(ElidedComment {
            index: self.tokens.len(),
            trim_left,
            trim_right: len > self.right.len(),
        });
        Ok(())
    }

    /// Step over `/* ... */` at the cursor. An unclosed comment is reported
    /// at `at`.
    fn skip_comment(&mut self, at: usize) -> Result<(), LexError> {
        self.cursor.advance(2);
        let Some(close) = self.cursor.find("*/") else {
            return Err(self.fail(LexErrorKind::UnclosedComment, at));
        };
        self.cursor.advance_to(close + 2);
        Ok(())
    }

    fn lex_inside_action(&mut self) -> Result<(), LexError> {
        let Mode::Action { depth } = self.mode else {
            return Ok(());
        };
        let start = self.cursor.pos();

        if let Some(len) = self.at_right_delim() {
            if depth != 0 {
                return Err(self.fail(LexErrorKind::UnclosedLeftParen, start));
            }
            self.emit_bytes(TokenKind::RightDelim, len);
            self.mode = Mode::Text;
            return Ok(());
        }

        let Some(b) = self.cursor.peek(0) else {
            return Err(self.fail(LexErrorKind::UnclosedAction, start));
        };
        let next = self.cursor.peek(1);
        match b {
            b if is_space(b) => self.lex_space(),
            b':' if next == Some(b'=') => self.emit_bytes(TokenKind::Declare, 2),
            b'=' => self.emit_bytes(TokenKind::Assign, 1),
            b'|' => self.emit_bytes(TokenKind::Pipe, 1),
            b',' => self.emit_bytes(TokenKind::Comma, 1),
            b'(' => {
                self.mode = Mode::Action { depth: depth + 1 };
                self.emit_bytes(TokenKind::LeftParen, 1);
            }
            b')' => {
                if depth == 0 {
                    return Err(self.fail(LexErrorKind::UnexpectedRightParen, start));
                }
                self.mode = Mode::Action { depth: depth - 1 };
                self.emit_bytes(TokenKind::RightParen, 1);
            }
            b'"' => self.lex_quote(b'"', TokenKind::String, LexErrorKind::UnterminatedString)?,
            b'\'' => self.lex_quote(
                b'\'',
                TokenKind::CharConstant,
                LexErrorKind::UnterminatedCharConstant,
            )?,
            b'`' => self.lex_raw_quote()?,
            b'/' if next == Some(b'*') => self.skip_comment(start)?,
            b'.' if next.is_some_and(|n| n.is_ascii_digit()) => self.lex_number()?,
            b'.' => self.lex_field(),
            b'$' => self.lex_variable(),
            b'0'..=b'9' => self.lex_number()?,
            b'+' | b'-' if next.is_some_and(|n| n.is_ascii_digit()) => self.lex_number()?,
            _ => {
                let ch = self.cursor.char_at(0).unwrap_or(char::REPLACEMENT_CHARACTER);
                if is_word_start(ch) {
                    self.lex_identifier();
                } else if ch.is_ascii_graphic() {
                    self.emit_bytes(TokenKind::Char, 1);
                } else {
                    return Err(self.fail(LexErrorKind::UnrecognizedCharacter(ch), start));
                }
            }
        }
        Ok(())
    }

    /// A whitespace run. Stops short of a ` -` trim marker so the marker
    /// stays with the right delimiter.
    fn lex_space(&mut self) {
        let (start, line) = (self.cursor.pos(), self.cursor.line());
        while self.cursor.peek(0).is_some_and(is_space) {
            self.cursor.advance(1);
        }
        if self.cursor.peek(0) == Some(b'-') && self.cursor.starts_with_at(1, self.right) {
            self.cursor.rewind(1);
            if self.cursor.pos() == start {
                return;
            }
        }
        self.emit(TokenKind::Space, start, line);
    }

    /// Interpreted string or character constant: scan to the closing
    /// `quote`, honouring backslash escapes. A newline ends it early.
    fn lex_quote(
        &mut self,
        quote: u8,
        kind: TokenKind,
        unterminated: LexErrorKind,
    ) -> Result<(), LexError> {
        let (start, line) = (self.cursor.pos(), self.cursor.line());
        self.cursor.advance(1);
        loop {
            match self.cursor.peek(0) {
                None | Some(b'\n') => return Err(self.fail(unterminated, start)),
                Some(b'\\') => match self.cursor.peek(1) {
                    None | Some(b'\n') => return Err(self.fail(unterminated, start)),
                    Some(_) => self.cursor.advance(2),
                },
                Some(b) if b == quote => {
                    self.cursor.advance(1);
                    break;
                }
                Some(_) => self.cursor.advance(1),
            }
        }
        self.emit(kind, start, line);
        Ok(())
    }

    fn lex_raw_quote(&mut self) -> Result<(), LexError> {
        let (start, line) = (self.cursor.pos(), self.cursor.line());
        self.cursor.advance(1);
        let Some(close) = self.cursor.find("`") else {
            return Err(self.fail(LexErrorKind::UnterminatedRawString, start));
        };
        self.cursor.advance_to(close + 1);
        self.emit(TokenKind::RawString, start, line);
        Ok(())
    }

    /// `.` alone is the cursor keyword; `.name` is a field. Chained fields
    /// (`.x.y`) come out as one token per segment.
    fn lex_field(&mut self) {
        let (start, line) = (self.cursor.pos(), self.cursor.line());
        self.cursor.advance(1);
        if self.cursor.char_at(0).is_some_and(is_word_start) {
            self.cursor.eat_while(is_word_char);
            self.emit(TokenKind::Field, start, line);
        } else {
            self.emit(TokenKind::Dot, start, line);
        }
    }

    fn lex_variable(&mut self) {
        let (start, line) = (self.cursor.pos(), self.cursor.line());
        self.cursor.advance(1);
        self.cursor.eat_while(is_word_char);
        self.emit(TokenKind::Variable, start, line);
    }

    fn lex_identifier(&mut self) {
        let (start, line) = (self.cursor.pos(), self.cursor.line());
        self.cursor.eat_while(is_word_char);
        let kind =
            TokenKind::lookup(self.cursor.slice_from(start)).unwrap_or(TokenKind::Identifier);
        self.emit(kind, start, line);
    }

    /// A number, or a complex constant when a signed imaginary part follows
    /// the real part directly (`1+2i`).
    fn lex_number(&mut self) -> Result<(), LexError> {
        let (start, line) = (self.cursor.pos(), self.cursor.line());
        if !self.scan_number() {
            return Err(self.bad_number(start));
        }
        if matches!(self.cursor.peek(0), Some(b'+' | b'-')) {
            if !self.scan_number() || !self.cursor.slice_from(start).ends_with('i') {
                return Err(self.bad_number(start));
            }
            self.emit(TokenKind::Complex, start, line);
        } else {
            self.emit(TokenKind::Number, start, line);
        }
        Ok(())
    }

    fn bad_number(&mut self, start: usize) -> LexError {
        let text = self.cursor.slice_from(start).to_string();
        self.fail(LexErrorKind::BadNumber(text), start)
    }

    /// Consume one numeric literal. Returns false, having consumed the
    /// offending character, when the run is followed by an alphanumeric.
    fn scan_number(&mut self) -> bool {
        self.cursor.accept(b"+-");
        let mut radix = Radix::Decimal;
        if self.cursor.accept(b"0") {
            if self.cursor.accept(b"xX") {
                radix = Radix::Hex;
            } else if self.cursor.accept(b"oO") {
                radix = Radix::Octal;
            } else if self.cursor.accept(b"bB") {
                radix = Radix::Binary;
            }
        }
        let digits = radix.digits();
        self.cursor.accept_run(digits);
        if self.cursor.accept(b".") {
            self.cursor.accept_run(digits);
        }
        if radix == Radix::Decimal && self.cursor.accept(b"eE") {
            self.cursor.accept(b"+-");
            self.cursor.accept_run(Radix::Decimal.digits());
        }
        if radix == Radix::Hex && self.cursor.accept(b"pP") {
            self.cursor.accept(b"+-");
            self.cursor.accept_run(Radix::Decimal.digits());
        }
        self.cursor.accept(b"i");
        if let Some(ch) = self.cursor.char_at(0) {
            if is_word_char(ch) {
                self.cursor.advance(ch.len_utf8());
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        scan(input, "", "")
            .expect("should scan")
            .iter()
            .map(|t| t.kind)
            .collect()
    }

    fn texts(input: &str) -> Vec<String> {
        scan(input, "", "")
            .expect("should scan")
            .into_iter()
            .map(|t| t.text)
            .collect()
    }

    fn error_kind(input: &str) -> LexErrorKind {
        scan(input, "", "").expect_err("should fail").kind
    }

    #[test]
    fn empty_input() {
        let tokens = scan("", "", "").expect("should scan");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
        assert_eq!((tokens[0].start, tokens[0].line), (0, 1));
    }

    #[test]
    fn text_only() {
        assert_eq!(texts("now is the time"), ["now is the time", ""]);
    }

    #[test]
    fn empty_action() {
        assert_eq!(
            kinds("{{}}"),
            [TokenKind::LeftDelim, TokenKind::RightDelim, TokenKind::Eof]
        );
    }

    #[test]
    fn operators() {
        assert_eq!(
            kinds("{{$x:=1|f,=}}"),
            [
                TokenKind::LeftDelim,
                TokenKind::Variable,
                TokenKind::Declare,
                TokenKind::Number,
                TokenKind::Pipe,
                TokenKind::Identifier,
                TokenKind::Comma,
                TokenKind::Assign,
                TokenKind::RightDelim,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lone_colon_is_char() {
        assert_eq!(texts("{{:}}"), ["{{", ":", "}}", ""]);
        assert_eq!(kinds("{{:}}")[1], TokenKind::Char);
    }

    #[test]
    fn space_run_stops_before_trim_marker() {
        assert_eq!(texts("{{x   -}}"), ["{{", "x", "  ", " -}}", ""]);
    }

    #[test]
    fn hyphen_without_space_is_not_a_trim_marker() {
        assert_eq!(texts("{{-3}}"), ["{{", "-3", "}}", ""]);
    }

    #[test]
    fn unicode_identifier() {
        let tokens = scan("{{héllo 本}}", "", "").expect("should scan");
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].text, "héllo");
        assert_eq!(tokens[3].text, "本");
    }

    #[test]
    fn keywords_are_exact() {
        assert_eq!(kinds("{{Range}}")[1], TokenKind::Identifier);
        assert_eq!(kinds("{{ranges}}")[1], TokenKind::Identifier);
        assert_eq!(kinds("{{template}}")[1], TokenKind::Template);
    }

    #[test]
    fn numbers_with_radix_prefixes() {
        assert_eq!(texts("{{0b1_0 0o17}}"), ["{{", "0b1_0", " ", "0o17", "}}", ""]);
    }

    #[test]
    fn complex_requires_imaginary_suffix() {
        assert_eq!(error_kind("{{1+2}}"), LexErrorKind::BadNumber("1+2".into()));
        assert_eq!(error_kind("{{1-}}"), LexErrorKind::BadNumber("1-".into()));
    }

    #[test]
    fn bad_number_reports_text() {
        let err = scan("{{3k}}", "", "").expect_err("should fail");
        assert_eq!(err.kind.to_string(), "bad number syntax: \"3k\"");
        assert_eq!(err.position.offset, 2);
    }

    #[test]
    fn unrecognized_character_codepoints() {
        assert_eq!(
            LexErrorKind::UnrecognizedCharacter('\u{1}').to_string(),
            "unrecognized character in action: U+0001"
        );
        assert_eq!(
            LexErrorKind::UnrecognizedCharacter('€').to_string(),
            "unrecognized character in action: U+20AC '€'"
        );
    }

    #[test]
    fn non_ascii_symbol_is_unrecognized() {
        assert_eq!(
            error_kind("{{€}}"),
            LexErrorKind::UnrecognizedCharacter('€')
        );
    }

    #[test]
    fn error_display_includes_location() {
        let err = scan("ab\n{{)}}", "", "").expect_err("should fail");
        assert_eq!(
            err.to_string(),
            "unexpected right paren, at 5 (line 2, column 3)"
        );
    }

    #[test]
    fn error_tokens_end_with_error() {
        let err = scan("x{{range", "", "").expect_err("should fail");
        let kinds: Vec<_> = err.tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            [
                TokenKind::Text,
                TokenKind::LeftDelim,
                TokenKind::Range,
                TokenKind::Error
            ]
        );
        assert_eq!(err.tokens[3].text, "unclosed action");
    }

    #[test]
    fn newline_inside_action_is_space() {
        let tokens = scan("{{x\ny}}", "", "").expect("should scan");
        assert_eq!(tokens[2].kind, TokenKind::Space);
        assert_eq!(tokens[3].line, 2);
    }

    #[test]
    fn no_trim_keeps_whitespace() {
        let options = ScanOptions::default().with_trim(false);
        let tokens = scan_with("a {{- x -}} b", &options).expect("should scan");
        assert_eq!(tokens[0].text, "a ");
        assert_eq!(tokens[4].text, " b");
    }
}
