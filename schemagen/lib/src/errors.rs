//! Error types for the schema decoder and the emission pipeline.

use std::error::Error as StdError;
use std::process::ExitStatus;

use thiserror::Error;

/// Boxed error returned by [`CodeFormatter`](crate::format::CodeFormatter)
/// implementations.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors that can occur while decoding a schema or emitting code.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// The schema document is malformed or has an unexpected shape
    #[error("Failed to decode schema: {0}")]
    Decode(#[from] serde_json::Error),

    /// The formatter rejected the assembled source
    #[error(transparent)]
    Format(#[from] CodeFormatError),

    /// Failed to read an input file
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create an output directory
    #[error("Failed to create directory '{path}': {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write output file
    #[error("Failed to write output file '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write to an output stream
    #[error("Failed to write generated code: {0}")]
    Stream(#[source] std::io::Error),

    /// A declared or derived name cannot be used as a Rust identifier.
    #[error("'{name}' (from {entity}) is not a valid Rust identifier")]
    InvalidIdentifier {
        /// Declared name of the entity the identifier came from.
        entity: String,
        /// The rejected identifier.
        name: String,
    },

    /// A declared type does not parse as a Rust type.
    #[error("Invalid type '{ty}' on {entity}: {reason}")]
    InvalidType {
        entity: String,
        ty: String,
        reason: String,
    },

    /// A registered zero value does not parse as a Rust expression.
    #[error("Invalid zero value '{value}' for type '{ty}': {reason}")]
    InvalidDefault {
        ty: String,
        value: String,
        reason: String,
    },
}

/// The formatter rejected generated source.
///
/// Keeps the unformatted source so the offending line can be located with
/// [`CodeFormatError::annotated_source`].
#[derive(Debug, Error)]
#[error("Failed to format generated code: {error}")]
pub struct CodeFormatError {
    original: String,
    #[source]
    error: BoxError,
}

impl CodeFormatError {
    pub fn new(original: impl Into<String>, error: impl Into<BoxError>) -> Self {
        Self {
            original: original.into(),
            error: error.into(),
        }
    }

    /// The source exactly as it was handed to the formatter.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// The formatter's own error.
    pub fn formatter_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.error.as_ref()
    }

    /// Returns the original source with every line prefixed by its number.
    ///
    /// Numbers are zero-padded to the digit count of the source's line
    /// count, so a two-line snippet renders as `1: ...` / `2: ...`.
    ///
    /// ## Examples
    ///
    /// ```
    /// use schemagen::errors::CodeFormatError;
    ///
    /// let err = CodeFormatError::new("fn main(){\n}}", "unexpected `}`");
    /// assert_eq!(err.annotated_source(), "1: fn main(){\n2: }}\n");
    /// ```
    pub fn annotated_source(&self) -> String {
        let lines = self.original.lines().count();
        let width = digit_count(lines);

        let mut dst = String::with_capacity(self.original.len() + lines * (width + 3));
        for (idx, line) in self.original.lines().enumerate() {
            dst.push_str(&format!("{:0width$}: {}\n", idx + 1, line, width = width));
        }
        dst
    }
}

/// Number of decimal digits in `n`, treating zero as a single digit.
pub(crate) fn digit_count(n: usize) -> usize {
    n.checked_ilog10().map_or(1, |d| d as usize + 1)
}

/// An external formatting command exited unsuccessfully.
#[derive(Debug, Error)]
#[error("'{program}' exited with {status}: {stderr}")]
pub struct CommandFormatError {
    /// Program that was run.
    pub program: String,
    /// Its exit status.
    pub status: ExitStatus,
    /// Whatever it printed to stderr, trimmed.
    pub stderr: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotated_source_numbers_each_line() {
        let err = CodeFormatError::new("struct {\n}", "expected identifier");
        assert_eq!(err.annotated_source(), "1: struct {\n2: }\n");
    }

    #[test]
    fn annotated_source_pads_to_line_count() {
        let src = (1..=12).map(|i| format!("line{i}")).collect::<Vec<_>>().join("\n");
        let err = CodeFormatError::new(src, "boom");
        let annotated = err.annotated_source();

        assert!(annotated.starts_with("01: line1\n"));
        assert!(annotated.contains("\n09: line9\n"));
        assert!(annotated.ends_with("12: line12\n"));
    }

    #[test]
    fn annotated_source_ten_lines_without_trailing_newline() {
        let src = (1..=10).map(|i| format!("l{i}")).collect::<Vec<_>>().join("\n");
        let annotated = CodeFormatError::new(src, "x").annotated_source();

        assert!(annotated.starts_with("01: l1\n"), "{annotated}");
        assert!(annotated.contains("\n09: l9\n"), "{annotated}");
        assert!(annotated.ends_with("\n10: l10\n"), "{annotated}");
    }

    #[test]
    fn annotated_source_single_line_without_newline() {
        let err = CodeFormatError::new("fn", "expected identifier");
        assert_eq!(err.annotated_source(), "1: fn\n");
    }

    #[test]
    fn annotated_source_of_empty_source_is_empty() {
        let err = CodeFormatError::new("", "empty");
        assert_eq!(err.annotated_source(), "");
    }

    #[test]
    fn format_error_keeps_original_and_cause() {
        let err = CodeFormatError::new("fn main(", "unexpected end of input");
        assert_eq!(err.original(), "fn main(");
        assert_eq!(err.formatter_error().to_string(), "unexpected end of input");
        assert!(err.to_string().contains("unexpected end of input"));
        assert!(StdError::source(&err).is_some());
    }

    #[test]
    fn digit_count_boundaries() {
        assert_eq!(digit_count(0), 1);
        assert_eq!(digit_count(1), 1);
        assert_eq!(digit_count(9), 1);
        assert_eq!(digit_count(10), 2);
        assert_eq!(digit_count(100), 3);
    }

    #[test]
    fn codegen_error_wraps_format_error_transparently() {
        let err: CodegenError = CodeFormatError::new("x", "bad token").into();
        assert_eq!(err.to_string(), "Failed to format generated code: bad token");
        assert!(matches!(err, CodegenError::Format(_)));
    }
}
