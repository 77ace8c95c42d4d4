/// Default left action delimiter.
pub const DEFAULT_LEFT_DELIM: &str = "{{";
/// Default right action delimiter.
pub const DEFAULT_RIGHT_DELIM: &str = "}}";

/// The pair of strings that open and close an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiters {
    left: String,
    right: String,
}

impl Delimiters {
    /// Create a delimiter pair. An empty string selects the default for
    /// that side.
    #[must_use]
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        let or_default = |s: String, default: &str| {
            if s.is_empty() { default.to_string() } else { s }
        };
        Self {
            left: or_default(left.into(), DEFAULT_LEFT_DELIM),
            right: or_default(right.into(), DEFAULT_RIGHT_DELIM),
        }
    }

    #[must_use]
    pub fn left(&self) -> &str {
        &self.left
    }

    #[must_use]
    pub fn right(&self) -> &str {
        &self.right
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self::new(DEFAULT_LEFT_DELIM, DEFAULT_RIGHT_DELIM)
    }
}

/// Scanner configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    pub delimiters: Delimiters,
    /// Resolve `{{- ` / ` -}}` trim markers after scanning. When off, the
    /// token texts concatenate back to the input (comments aside).
    pub trim: bool,
}

impl ScanOptions {
    #[must_use]
    pub const fn new(delimiters: Delimiters) -> Self {
        Self {
            delimiters,
            trim: true,
        }
    }

    #[must_use]
    pub const fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::new(Delimiters::default())
    }
}
