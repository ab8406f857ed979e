//! Formatters the emission pipeline can run generated source through.
//!
//! - [`RustFormatter`] parses the source with `syn` and prints it back with
//!   `prettyplease`. It needs no external tools and is the default.
//! - [`CommandFormatter`] pipes the source through an external program
//!   such as `rustfmt --emit stdout`.
//! - Any `Fn(&str) -> Result<String, BoxError>` closure.

use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;

use tracing::debug;

use crate::errors::{BoxError, CommandFormatError};

/// Turns raw source into canonically formatted source.
pub trait CodeFormatter {
    fn format(&self, source: &str) -> Result<String, BoxError>;
}

impl<F> CodeFormatter for F
where
    F: Fn(&str) -> Result<String, BoxError>,
{
    fn format(&self, source: &str) -> Result<String, BoxError> {
        self(source)
    }
}

/// Formats Rust source in-process with `syn` + `prettyplease`.
///
/// ## Examples
///
/// ```
/// use schemagen::format::{CodeFormatter, RustFormatter};
///
/// let formatted = RustFormatter.format("fn main(){\n}").unwrap();
/// assert_eq!(formatted, "fn main() {}\n");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RustFormatter;

impl CodeFormatter for RustFormatter {
    fn format(&self, source: &str) -> Result<String, BoxError> {
        let file = syn::parse_file(source)?;
        Ok(prettyplease::unparse(&file))
    }
}

/// Formats source by piping it through an external program's stdin and
/// reading the result from its stdout.
#[derive(Debug, Clone)]
pub struct CommandFormatter {
    program: String,
    args: Vec<String>,
}

impl CommandFormatter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// `rustfmt --edition 2024 --emit stdout`
    pub fn rustfmt() -> Self {
        Self::new("rustfmt")
            .arg("--edition")
            .arg("2024")
            .arg("--emit")
            .arg("stdout")
    }
}

impl CodeFormatter for CommandFormatter {
    fn format(&self, source: &str) -> Result<String, BoxError> {
        debug!(program = %self.program, args = ?self.args, "running external formatter");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Feed stdin concurrently, writing it all up front can deadlock on
        // large outputs.
        let mut stdin = child.stdin.take().ok_or("formatter stdin was not captured")?;
        let input = source.to_owned();
        let feeder = thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child.wait_with_output()?;
        let fed = feeder
            .join()
            .map_err(|_| "formatter stdin thread panicked")?;

        if !output.status.success() {
            return Err(Box::new(CommandFormatError {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }));
        }
        // A successful run that stopped reading early is not an error.
        if let Err(err) = fed
            && err.kind() != std::io::ErrorKind::BrokenPipe
        {
            return Err(Box::new(err));
        }

        Ok(String::from_utf8(output.stdout)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rust_formatter_formats_items() {
        let formatted = RustFormatter
            .format("pub struct Key{pub kid:String,}")
            .unwrap();
        assert_eq!(formatted, "pub struct Key {\n    pub kid: String,\n}\n");
    }

    #[test]
    fn rust_formatter_rejects_invalid_source() {
        assert!(RustFormatter.format("fn main(){\n}}").is_err());
        assert!(RustFormatter.format("let x =").is_err());
    }

    #[test]
    fn closures_are_formatters() {
        let upper = |s: &str| -> Result<String, BoxError> { Ok(s.to_uppercase()) };
        assert_eq!(upper.format("abc").unwrap(), "ABC");
    }

    #[cfg(unix)]
    #[test]
    fn command_formatter_pipes_through_program() {
        let formatted = CommandFormatter::new("cat").format("fn a() {}\n").unwrap();
        assert_eq!(formatted, "fn a() {}\n");
    }

    #[cfg(unix)]
    #[test]
    fn command_formatter_reports_failure_status() {
        let err = CommandFormatter::new("sh")
            .arg("-c")
            .arg("echo 'bad input' >&2; exit 3")
            .format("fn a() {}")
            .unwrap_err();
        let err = err.downcast::<CommandFormatError>().unwrap();
        assert_eq!(err.program, "sh");
        assert_eq!(err.stderr, "bad input");
        assert_eq!(err.status.code(), Some(3));
    }

    #[test]
    fn command_formatter_missing_program() {
        let result = CommandFormatter::new("schemagen-no-such-formatter").format("x");
        assert!(result.is_err());
    }
}
