//! Error types for jqdefs-core.

use thiserror::Error;

/// Result type for parsing.
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// A syntax error in a definition source.
///
/// `offset` is the byte offset into the source; `line` and `column` are
/// 1-based and filled in once the full source is known.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}:{column}: {message}")]
pub struct ParseError {
    pub message: String,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
            line: 0,
            column: 0,
        }
    }

    /// Resolve `line` and `column` from the byte offset.
    pub fn locate(mut self, source: &str) -> Self {
        let (line, column) = offset_to_line_col(source, self.offset);
        self.line = line;
        self.column = column;
        self
    }
}

fn offset_to_line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;
    for (i, ch) in source.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}
