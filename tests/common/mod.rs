#![allow(dead_code)]

use tmplscan::{Token, TokenKind, scan};

/// Scan with default delimiters, panicking on error.
pub fn scan_ok(input: &str) -> Vec<Token> {
    scan(input, "", "").unwrap_or_else(|e| panic!("scan failed for {input:?}: {e}"))
}

/// Scan with default delimiters and return `(kind, text)` pairs.
pub fn pairs(input: &str) -> Vec<(TokenKind, String)> {
    scan_ok(input).into_iter().map(|t| (t.kind, t.text)).collect()
}

/// Build an expected `(kind, text)` list.
pub fn expect(items: &[(TokenKind, &str)]) -> Vec<(TokenKind, String)> {
    items.iter().map(|&(k, s)| (k, s.to_string())).collect()
}

/// Assert the scan of `input` produces exactly `items`.
pub fn assert_scan(input: &str, items: &[(TokenKind, &str)]) {
    assert_eq!(pairs(input), expect(items), "token mismatch for {input:?}");
}

/// Every token's text is the exact source slice it claims to cover.
pub fn assert_slices_match(input: &str, tokens: &[Token]) {
    for token in tokens {
        if token.kind == TokenKind::Error {
            continue;
        }
        assert_eq!(
            &input[token.start..token.end],
            token.text,
            "token {token:?} does not match its source range"
        );
    }
}
