//! Source code representation and error management.

use std::fmt;

/// Represents source code.
pub struct Source<'a> {
    /// Original source code.
    pub content: &'a str,
    /// Byte offset of the first character of every line. Always starts with `0`.
    line_starts: Vec<usize>,
}

impl<'a> Source<'a> {
    /// Create a new `Source` with the specified `content`.
    pub fn new(content: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(content.match_indices('\n').map(|(index, _)| index + 1))
            .collect();
        Self {
            content,
            line_starts,
        }
    }

    /// Returns the 1-based line containing the byte at `offset`.
    /// Offsets past the end of the content resolve to the last line.
    ///
    /// # Example
    /// ```
    /// use atel_source::Source;
    /// let source = Source::new("a\nb\n\nc");
    /// assert_eq!(source.line_of(0), 1);
    /// assert_eq!(source.line_of(2), 2);
    /// assert_eq!(source.line_of(5), 4);
    /// ```
    pub fn line_of(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= offset)
    }

    /// Number of lines in the source. An empty source has one (empty) line.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(content: &'a str) -> Self {
        Source::new(content)
    }
}

/// Represents a syntax error (compile time error).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    /// 1-based source line the error was detected on.
    pub line: usize,
}

impl SyntaxError {
    /// Create a new syntax error with the specified `message` and `line`.
    pub fn new(message: impl ToString, line: usize) -> Self {
        Self {
            message: message.to_string(),
            line,
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// Accumulates errors in the order they are reported.
#[derive(Debug, Default)]
pub struct ErrorReporter {
    errors: Vec<SyntaxError>,
}

impl ErrorReporter {
    /// Create an empty `ErrorReporter`.
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Adds an error to the `ErrorReporter`.
    pub fn add_error(&mut self, error: impl Into<SyntaxError>) {
        self.errors.push(error.into());
    }

    /// Returns `true` if no errors were reported.
    pub fn has_no_errors(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<SyntaxError> {
        self.errors
    }
}

impl fmt::Display for ErrorReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in &self.errors {
            writeln!(f, "ERROR: {}", error)?;
        }

        Ok(())
    }
}
