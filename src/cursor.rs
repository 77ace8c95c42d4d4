use crate::position::newline_count;

/// Byte cursor over the template input.
///
/// Tracks the current byte position and the 1-based line of that position.
/// All lookahead is by byte; `char_at` decodes a full rune where the
/// scanner needs Unicode awareness (identifiers, diagnostics).
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Cursor<'a> {
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
        }
    }

    #[must_use]
    pub const fn pos(&self) -> usize {
        self.pos
    }

    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    #[must_use]
    pub const fn input(&self) -> &'a str {
        self.input
    }

    #[must_use]
    pub const fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Byte at `pos + offset`, or `None` past the end of input.
    #[must_use]
    pub fn peek(&self, offset: usize) -> Option<u8> {
        self.input.as_bytes().get(self.pos + offset).copied()
    }

    /// Rune starting at `pos + offset`, or `None` past the end of input
    /// or off a character boundary.
    #[must_use]
    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.pos + offset..)?.chars().next()
    }

    /// Whether the input at `pos + offset` begins with `needle`.
    #[must_use]
    pub fn starts_with_at(&self, offset: usize, needle: &str) -> bool {
        self.input
            .as_bytes()
            .get(self.pos + offset..)
            .is_some_and(|rest| rest.starts_with(needle.as_bytes()))
    }

    #[must_use]
    pub fn starts_with(&self, needle: &str) -> bool {
        self.starts_with_at(0, needle)
    }

    /// Absolute offset of the next occurrence of `needle` at or after the
    /// cursor.
    #[must_use]
    pub fn find(&self, needle: &str) -> Option<usize> {
        self.input
            .get(self.pos..)?
            .find(needle)
            .map(|found| self.pos + found)
    }

    /// Consume `n` bytes (clamped to the end of input), counting newlines.
    pub fn advance(&mut self, n: usize) {
        let end = (self.pos + n).min(self.input.len());
        self.line += newline_count(&self.input.as_bytes()[self.pos..end]);
        self.pos = end;
    }

    /// Move to absolute offset `target`, which must not be behind the cursor.
    pub fn advance_to(&mut self, target: usize) {
        self.advance(target.saturating_sub(self.pos));
    }

    /// Step back `n` bytes, un-counting newlines.
    pub fn rewind(&mut self, n: usize) {
        let start = self.pos.saturating_sub(n);
        self.line -= newline_count(&self.input.as_bytes()[start..self.pos]);
        self.pos = start;
    }

    /// Consume the longest run of runes matching `pred`; returns bytes consumed.
    pub fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let start = self.pos;
        while let Some(ch) = self.char_at(0) {
            if !pred(ch) {
                break;
            }
            self.advance(ch.len_utf8());
        }
        self.pos - start
    }

    /// Consume one byte if it is one of `set`.
    pub fn accept(&mut self, set: &[u8]) -> bool {
        match self.peek(0) {
            Some(b) if set.contains(&b) => {
                self.advance(1);
                true
            }
            _ => false,
        }
    }

    /// Consume bytes while they are in `set`.
    pub fn accept_run(&mut self, set: &[u8]) {
        while self.accept(set) {}
    }

    /// Source text from `start` up to the cursor.
    #[must_use]
    pub fn slice_from(&self, start: usize) -> &'a str {
        self.input.get(start..self.pos).unwrap_or_default()
    }
}
