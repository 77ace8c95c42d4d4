/// Resolved source location for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Byte offset into the input.
    pub offset: usize,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column, in bytes.
    pub column: usize,
}

impl Position {
    /// Resolve a byte offset into a line/column position.
    #[must_use]
    pub fn locate(input: &str, offset: usize) -> Self {
        let (line, column) = line_column(input, offset);
        Self {
            offset,
            line,
            column,
        }
    }
}

/// Compute the 1-based line and column of byte offset `pos` by counting
/// newlines in `input[..pos]`. Offsets past the end clamp to the input
/// length.
#[must_use]
pub fn line_column(input: &str, pos: usize) -> (usize, usize) {
    let before = &input.as_bytes()[..pos.min(input.len())];
    let line = 1 + newline_count(before);
    let column = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(before.len() + 1, |nl| before.len() - nl);
    (line, column)
}

pub(crate) fn newline_count(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| b == b'\n').count()
}
