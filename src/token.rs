use std::fmt;

/// Token kinds produced by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Error occurred; text is the diagnostic message.
    Error,
    /// End of input.
    Eof,
    /// Plain template text outside actions.
    Text,
    /// Left action delimiter, including a trailing trim marker.
    LeftDelim,
    /// Right action delimiter, including a leading trim marker.
    RightDelim,
    /// Run of spaces, tabs and newlines inside an action.
    Space,
    /// `=`
    Assign,
    /// `:=`
    Declare,
    /// `|`
    Pipe,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `,`
    Comma,
    /// Any other printable ASCII character.
    Char,
    /// Alphanumeric identifier not starting with `.`.
    Identifier,
    /// Alphanumeric identifier starting with `.`.
    Field,
    /// `$`, `$1`, `$hello`.
    Variable,
    /// Simple number, including imaginary.
    Number,
    /// Complex constant such as `1+2i`.
    Complex,
    /// Double-quoted string, quotes included.
    String,
    /// Backquoted raw string, quotes included.
    RawString,
    /// Character constant, quotes included.
    CharConstant,
    /// `true` or `false`.
    Bool,
    /// The untyped `nil` constant.
    Nil,

    // Keywords.
    /// The cursor, spelled `.`.
    Dot,
    Block,
    Define,
    Else,
    End,
    If,
    Range,
    Template,
    With,
}

/// Reserved words, looked up after an identifier or bare dot is scanned.
const RESERVED: &[(&str, TokenKind)] = &[
    (".", TokenKind::Dot),
    ("block", TokenKind::Block),
    ("define", TokenKind::Define),
    ("else", TokenKind::Else),
    ("end", TokenKind::End),
    ("if", TokenKind::If),
    ("range", TokenKind::Range),
    ("template", TokenKind::Template),
    ("with", TokenKind::With),
    ("nil", TokenKind::Nil),
    ("true", TokenKind::Bool),
    ("false", TokenKind::Bool),
];

impl TokenKind {
    /// Look up a word in the reserved-word table. Matching is exact and
    /// case-sensitive.
    #[must_use]
    pub fn lookup(word: &str) -> Option<Self> {
        RESERVED
            .iter()
            .find(|(name, _)| *name == word)
            .map(|&(_, kind)| kind)
    }

    /// Whether this kind is one of the reserved keywords.
    #[must_use]
    pub const fn is_keyword(self) -> bool {
        matches!(
            self,
            Self::Dot
                | Self::Block
                | Self::Define
                | Self::Else
                | Self::End
                | Self::If
                | Self::Range
                | Self::Template
                | Self::With
        )
    }

    /// Short diagnostic name of the kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Eof => "EOF",
            Self::Text => "text",
            Self::LeftDelim => "left delim",
            Self::RightDelim => "right delim",
            Self::Space => "space",
            Self::Assign => "=",
            Self::Declare => ":=",
            Self::Pipe => "pipe",
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::Comma => ",",
            Self::Char => "char",
            Self::Identifier => "identifier",
            Self::Field => "field",
            Self::Variable => "variable",
            Self::Number => "number",
            Self::Complex => "complex",
            Self::String => "string",
            Self::RawString => "raw string",
            Self::CharConstant => "charconst",
            Self::Bool => "bool",
            Self::Nil => "nil",
            Self::Dot => ".",
            Self::Block => "block",
            Self::Define => "define",
            Self::Else => "else",
            Self::End => "end",
            Self::If => "if",
            Self::Range => "range",
            Self::Template => "template",
            Self::With => "with",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single token: its kind, the source text it covers, the byte range
/// `start..end` of that text and the 1-based line of `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub line: usize,
}

/// Longest text rendered in full by `Display`.
const RENDER_LIMIT: usize = 10;

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => f.write_str("EOF"),
            TokenKind::Error => f.write_str(&self.text),
            kind if kind.is_keyword() => write!(f, "<{}>", self.text),
            _ if self.text.chars().count() > RENDER_LIMIT => {
                let head: String = self.text.chars().take(RENDER_LIMIT).collect();
                write!(f, "{head:?}...")
            }
            _ => write!(f, "{:?}", self.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: TokenKind, text: &str) -> Token {
        Token {
            kind,
            text: text.to_string(),
            start: 0,
            end: text.len(),
            line: 1,
        }
    }

    #[test]
    fn lookup_reserved_words() {
        assert_eq!(TokenKind::lookup("range"), Some(TokenKind::Range));
        assert_eq!(TokenKind::lookup("true"), Some(TokenKind::Bool));
        assert_eq!(TokenKind::lookup("nil"), Some(TokenKind::Nil));
        assert_eq!(TokenKind::lookup("Range"), None);
        assert_eq!(TokenKind::lookup("printf"), None);
    }

    #[test]
    fn keyword_partition() {
        assert!(TokenKind::Dot.is_keyword());
        assert!(TokenKind::Template.is_keyword());
        assert!(!TokenKind::Nil.is_keyword());
        assert!(!TokenKind::Bool.is_keyword());
        assert!(!TokenKind::Identifier.is_keyword());
    }

    #[test]
    fn render_eof_and_error() {
        assert_eq!(token(TokenKind::Eof, "").to_string(), "EOF");
        assert_eq!(
            token(TokenKind::Error, "unclosed action").to_string(),
            "unclosed action"
        );
    }

    #[test]
    fn render_keyword() {
        assert_eq!(token(TokenKind::Range, "range").to_string(), "<range>");
        assert_eq!(token(TokenKind::Dot, ".").to_string(), "<.>");
    }

    #[test]
    fn render_short_and_long_text() {
        assert_eq!(token(TokenKind::Text, "hello").to_string(), "\"hello\"");
        assert_eq!(
            token(TokenKind::Text, "now is the time").to_string(),
            "\"now is the\"..."
        );
        assert_eq!(token(TokenKind::Text, "0123456789").to_string(), "\"0123456789\"");
    }

    #[test]
    fn render_truncates_on_characters() {
        let rendered = token(TokenKind::String, "\"日本語のテキストです\"").to_string();
        assert_eq!(rendered, "\"\\\"日本語のテキストで\"...");
    }

    #[test]
    fn kind_names() {
        assert_eq!(TokenKind::LeftDelim.to_string(), "left delim");
        assert_eq!(TokenKind::Declare.to_string(), ":=");
        assert_eq!(TokenKind::CharConstant.to_string(), "charconst");
    }
}
