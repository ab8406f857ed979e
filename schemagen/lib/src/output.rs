//! Emission pipeline: format, number and write assembled source.
//!
//! Assembled text goes through up to two passes before it is written:
//!
//! 1. **Formatting** (`format_code`): the source is handed to a
//!    [`CodeFormatter`]. If the formatter rejects it, emission stops with a
//!    [`CodeFormatError`] that keeps the unformatted source for
//!    diagnostics. Nothing is written in that case.
//! 2. **Line numbering** (`line_numbers`): every line of the (formatted)
//!    text is prefixed with its zero-padded line number.
//!
//! Files are written atomically: the rendered text goes to a temp file
//! which is then renamed over the target.

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::{debug, info};

use crate::errors::{CodeFormatError, CodegenError, digit_count};
use crate::format::{CodeFormatter, RustFormatter};

/// Switches for the emission passes. Both are off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitOptions {
    /// Run the source through the formatter before emitting it.
    pub format_code: bool,
    /// Prefix every output line with its line number.
    pub line_numbers: bool,
}

impl EmitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format_code(mut self, format_code: bool) -> Self {
        self.format_code = format_code;
        self
    }

    pub fn with_line_numbers(mut self, line_numbers: bool) -> Self {
        self.line_numbers = line_numbers;
        self
    }
}

/// Runs the emission passes with a given formatter.
///
/// ## Examples
///
/// ```
/// use schemagen::output::{EmitOptions, Emitter};
/// use schemagen::writer::SourceWriter;
///
/// let mut src = SourceWriter::new();
/// src.r("fn main(){");
/// src.l("}");
///
/// let emitter = Emitter::new(EmitOptions::new().with_format_code(true));
/// let code = emitter.render(src.as_str()).unwrap();
/// assert_eq!(code, "fn main() {}\n");
/// ```
pub struct Emitter {
    options: EmitOptions,
    formatter: Box<dyn CodeFormatter>,
}

impl Emitter {
    /// Creates an emitter that formats with [`RustFormatter`].
    pub fn new(options: EmitOptions) -> Self {
        Self {
            options,
            formatter: Box::new(RustFormatter),
        }
    }

    /// Replaces the formatter used when `format_code` is set.
    pub fn with_formatter(mut self, formatter: impl CodeFormatter + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    pub fn options(&self) -> EmitOptions {
        self.options
    }

    /// Applies the enabled passes to `src` and returns the final text.
    ///
    /// ## Errors
    ///
    /// Returns `CodegenError::Format` when the formatter rejects `src`.
    pub fn render(&self, src: &str) -> Result<String, CodegenError> {
        debug!(
            format_code = self.options.format_code,
            line_numbers = self.options.line_numbers,
            bytes = src.len(),
            "emitting generated code"
        );

        let mut code = if self.options.format_code {
            self.formatter.format(src).map_err(|e| {
                debug!(error = %e, "formatter rejected generated code");
                CodeFormatError::new(src, e)
            })?
        } else {
            src.to_string()
        };

        if self.options.line_numbers {
            code = number_lines(&code);
        }

        Ok(code)
    }

    /// Renders `src` and writes it to `dst`.
    pub fn write<W: Write>(&self, dst: &mut W, src: &str) -> Result<(), CodegenError> {
        let code = self.render(src)?;
        dst.write_all(code.as_bytes()).map_err(CodegenError::Stream)?;
        dst.flush().map_err(CodegenError::Stream)
    }

    /// Renders `src` and writes it to `path`, creating parent directories
    /// as needed.
    ///
    /// Rendering happens before anything touches the filesystem, so a
    /// formatting failure leaves `path` as it was.
    pub fn write_file(&self, path: &Path, src: &str) -> Result<(), CodegenError> {
        let code = self.render(src)?;
        write_atomic(path, &code)?;
        info!(path = %path.display(), bytes = code.len(), "wrote generated code");
        Ok(())
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new(EmitOptions::default())
    }
}

/// Renders `src` with the default formatter and writes it to `dst`.
pub fn write<W: Write>(dst: &mut W, src: &str, options: EmitOptions) -> Result<(), CodegenError> {
    Emitter::new(options).write(dst, src)
}

/// Renders `src` with the default formatter and writes it to `path`.
pub fn write_file(path: &Path, src: &str, options: EmitOptions) -> Result<(), CodegenError> {
    Emitter::new(options).write_file(path, src)
}

/// Prefixes every line with its number, zero-padded to the digit count of
/// the text's line count and followed by a space.
///
/// ## Examples
///
/// ```
/// use schemagen::output::number_lines;
///
/// assert_eq!(number_lines("a\nb\n"), "1 a\n2 b\n");
/// ```
pub fn number_lines(text: &str) -> String {
    let lines = text.lines().count();
    let width = digit_count(lines);

    let mut out = String::with_capacity(text.len() + lines * (width + 2));
    for (idx, line) in text.split_inclusive('\n').enumerate() {
        let line = line.strip_suffix('\n').unwrap_or(line);
        out.push_str(&format!("{:0width$} {}\n", idx + 1, line, width = width));
    }
    out
}

/// Creates `dir` and any missing parents with mode `0755` on unix.
fn create_dir_all(dir: &Path) -> Result<(), CodegenError> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }

    builder.create(dir).map_err(|e| CodegenError::CreateDir {
        path: dir.display().to_string(),
        source: e,
    })
}

/// Writes content to a file atomically using temp file + rename.
///
/// The target is either left untouched or fully replaced; it is never
/// observed half-written.
///
/// ## Errors
///
/// Returns `CodegenError::CreateDir` if parent directories cannot be
/// created and `CodegenError::Write` if the temp file cannot be written or
/// renamed.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), CodegenError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.is_dir()
    {
        create_dir_all(parent)?;
    }

    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    fs::write(&temp_path, content).map_err(|e| CodegenError::Write {
        path: temp_path.display().to_string(),
        source: e,
    })?;

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(CodegenError::Write {
            path: path.display().to_string(),
            source: e,
        });
    }

    Ok(())
}
