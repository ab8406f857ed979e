//! Text assembly helpers for building source before it is emitted.

use std::fmt;

/// A `use` declaration written by [`SourceWriter::write_imports`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub path: String,
    pub alias: Option<String>,
}

impl Import {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alias: None,
        }
    }

    pub fn aliased(path: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alias: Some(alias.into()),
        }
    }
}

/// In-memory buffer for assembling generated source.
///
/// [`l`](Self::l) and [`ll`](Self::ll) put their newlines *before* the
/// text, so a file is written as a series of "start a new line, then
/// write" steps.
///
/// ## Examples
///
/// ```
/// use schemagen::writer::SourceWriter;
///
/// let mut out = SourceWriter::new();
/// out.r("mod generated;");
/// out.ll("fn main(){");
/// out.l("}");
/// assert_eq!(out.as_str(), "mod generated;\n\nfn main(){\n}");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SourceWriter {
    buf: String,
}

impl SourceWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `s` as-is.
    pub fn r(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    /// Starts a new line, then writes `s`.
    pub fn l(&mut self, s: &str) {
        self.buf.push('\n');
        self.buf.push_str(s);
    }

    /// Leaves a blank line, then writes `s`.
    pub fn ll(&mut self, s: &str) {
        self.buf.push_str("\n\n");
        self.buf.push_str(s);
    }

    /// Writes `text` as `//` comment lines, separated from what came
    /// before by a blank line.
    pub fn comment(&mut self, text: &str) {
        self.prefixed_lines("// ", text);
    }

    /// Writes `text` as `//!` inner doc lines, separated from what came
    /// before by a blank line.
    pub fn inner_doc(&mut self, text: &str) {
        self.prefixed_lines("//! ", text);
    }

    fn prefixed_lines(&mut self, prefix: &str, text: &str) {
        for (idx, line) in text.lines().enumerate() {
            let line = format!("{prefix}{line}");
            let line = line.trim_end();
            if idx == 0 {
                self.ll(line);
            } else {
                self.l(line);
            }
        }
    }

    /// Writes one `use` line per import.
    pub fn write_imports(&mut self, imports: &[Import]) {
        for import in imports {
            match &import.alias {
                Some(alias) => self.l(&format!("use {} as {};", import.path, alias)),
                None => self.l(&format!("use {};", import.path)),
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl fmt::Write for SourceWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buf.push_str(s);
        Ok(())
    }
}

impl fmt::Display for SourceWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.buf)
    }
}
