//! Passes over a finished token sequence: trim-marker resolution and the
//! paren-balance check.

use crate::lexer::{LexError, LexErrorKind};
use crate::position::{Position, newline_count};
use crate::token::{Token, TokenKind};

/// A comment action that was dropped from the sequence, remembered so its
/// trim markers can still apply to the text around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ElidedComment {
    /// Index the comment would have occupied in the token sequence.
    pub index: usize,
    pub trim_left: bool,
    pub trim_right: bool,
}

const TRIM_CHARS: [char; 4] = [' ', '\t', '\r', '\n'];

const fn is_trim_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

fn has_left_trim_marker(text: &str) -> bool {
    matches!(text.as_bytes(), [.., b'-', last] if is_trim_space(*last))
}

fn has_right_trim_marker(text: &str) -> bool {
    matches!(text.as_bytes(), [first, b'-', ..] if is_trim_space(*first))
}

/// Resolve trim markers: strip trailing whitespace from the text before a
/// `{{- ` and leading whitespace from the text after a ` -}}`, then drop
/// text tokens left empty. Only `Text` tokens are touched, and running the
/// pass again changes nothing.
pub fn trim_markers(tokens: &mut Vec<Token>) {
    resolve_trims(tokens, &[]);
}

pub(crate) fn resolve_trims(tokens: &mut Vec<Token>, comments: &[ElidedComment]) {
    for comment in comments {
        if comment.trim_left && comment.index > 0 {
            trim_before(tokens, comment.index - 1, comments);
        }
        if comment.trim_right {
            trim_after(tokens, comment.index, comments);
        }
    }

    for i in 0..tokens.len() {
        let (kind, text) = (tokens[i].kind, tokens[i].text.as_str());
        let trim_before_delim =
            kind == TokenKind::LeftDelim && i > 0 && has_left_trim_marker(text);
        let trim_after_delim = kind == TokenKind::RightDelim && has_right_trim_marker(text);
        if trim_before_delim {
            trim_before(tokens, i - 1, comments);
        }
        if trim_after_delim {
            trim_after(tokens, i + 1, comments);
        }
    }

    tokens.retain(|t| t.kind != TokenKind::Text || !t.text.is_empty());
}

/// Text on both sides of an elided comment is one run: a trim that empties
/// the text next to the comment carries on into the text beyond it.
fn crosses_comment(token: &Token, comments: &[ElidedComment], index: usize) -> bool {
    token.kind == TokenKind::Text
        && token.text.is_empty()
        && comments.iter().any(|c| c.index == index)
}

fn trim_before(tokens: &mut [Token], mut i: usize, comments: &[ElidedComment]) {
    loop {
        trim_text_end(&mut tokens[i]);
        if i == 0 || !crosses_comment(&tokens[i], comments, i) {
            return;
        }
        i -= 1;
    }
}

fn trim_after(tokens: &mut [Token], mut i: usize, comments: &[ElidedComment]) {
    while let Some(token) = tokens.get_mut(i) {
        trim_text_start(token);
        if !crosses_comment(token, comments, i + 1) {
            return;
        }
        i += 1;
    }
}

fn trim_text_end(token: &mut Token) {
    if token.kind != TokenKind::Text {
        return;
    }
    let kept = token.text.trim_end_matches(TRIM_CHARS).len();
    token.text.truncate(kept);
    token.end = token.start + kept;
}

fn trim_text_start(token: &mut Token) {
    if token.kind != TokenKind::Text {
        return;
    }
    let rest = token.text.trim_start_matches(TRIM_CHARS).len();
    let removed = token.text.len() - rest;
    token.line += newline_count(&token.text.as_bytes()[..removed]);
    token.start += removed;
    token.text.drain(..removed);
}

/// Verify that every action region in `tokens` has balanced parentheses
/// and ends in a right delimiter.
///
/// `input` is the source the tokens were scanned from; it is only used to
/// resolve error positions.
pub fn check_parens(input: &str, tokens: &[Token]) -> Result<(), LexError> {
    let mut i = 0;
    while i < tokens.len() {
        if tokens[i].kind != TokenKind::LeftDelim {
            i += 1;
            continue;
        }
        let open = i;
        let mut depth = 0usize;
        let mut closed = false;
        i += 1;
        while i < tokens.len() {
            let token = &tokens[i];
            match token.kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => {
                    if depth == 0 {
                        return Err(paren_error(
                            input,
                            tokens,
                            i,
                            LexErrorKind::UnexpectedRightParen,
                        ));
                    }
                    depth -= 1;
                }
                TokenKind::RightDelim => {
                    if depth != 0 {
                        return Err(paren_error(
                            input,
                            tokens,
                            i,
                            LexErrorKind::UnclosedLeftParen,
                        ));
                    }
                    closed = true;
                    break;
                }
                _ => {}
            }
            i += 1;
        }
        if !closed {
            return Err(paren_error(input, tokens, open, LexErrorKind::UnclosedAction));
        }
        i += 1;
    }
    Ok(())
}

fn paren_error(input: &str, tokens: &[Token], at: usize, kind: LexErrorKind) -> LexError {
    let offending = &tokens[at];
    let mut prefix = tokens[..at].to_vec();
    prefix.push(Token {
        kind: TokenKind::Error,
        text: kind.to_string(),
        start: offending.start,
        end: offending.end,
        line: offending.line,
    });
    LexError {
        kind,
        position: Position::locate(input, offending.start),
        tokens: prefix,
    }
}
