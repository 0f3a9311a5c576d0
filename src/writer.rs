//! Line assembly, quoting and sinks.
//!
//! [`LineWriter`] is the only component that quotes. It joins the tokens of one
//! record with the primary delimiter, wraps any token holding a reserved character
//! in the quote character (doubling embedded quotes), and appends the line ending.
//!
//! Finished lines go to a [`Sink`]. The crate ships three:
//!
//! - [`WriteSink`]: any [`std::io::Write`] (file, socket, `Vec<u8>`)
//! - [`LineBuffer`]: collects lines in memory
//! - [`SharedSink`]: wraps another sink behind a mutex, one line per lock
//!
//! ## Examples
//!
//! ```rust
//! use cerc_layout::{FieldKind, FieldSpec, LayoutSchema, LineBuffer, LineWriter, LineEnding, LayoutOptions};
//!
//! let schema = LayoutSchema::builder("t")
//!     .options(LayoutOptions::new().with_line_ending(LineEnding::Lf))
//!     .field(FieldSpec::required("a", FieldKind::Text))
//!     .field(FieldSpec::required("b", FieldKind::Text))
//!     .build()
//!     .unwrap();
//!
//! let mut sink = LineBuffer::new();
//! LineWriter::write(&["plain".to_string(), "has;delimiter".to_string()], &schema, &mut sink).unwrap();
//! assert_eq!(sink.lines(), ["plain;\"has;delimiter\"\n"]);
//! ```

use crate::{LayoutSchema, Result};
use parking_lot::Mutex;
use std::io;

/// Receives finished lines, in order, including their line ending.
pub trait Sink {
    fn write_line(&mut self, line: &str) -> Result<()>;

    /// Flushes buffered output. The default does nothing.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn write_line(&mut self, line: &str) -> Result<()> {
        (**self).write_line(line)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

impl Sink for Vec<String> {
    fn write_line(&mut self, line: &str) -> Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}

/// Sink over any byte writer. I/O failures propagate as [`Error::Io`](crate::Error::Io).
#[derive(Debug)]
pub struct WriteSink<W: io::Write> {
    writer: W,
    lines: usize,
}

impl<W: io::Write> WriteSink<W> {
    pub fn new(writer: W) -> Self {
        WriteSink { writer, lines: 0 }
    }

    /// Number of lines written so far.
    pub fn lines_written(&self) -> usize {
        self.lines
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: io::Write> Sink for WriteSink<W> {
    fn write_line(&mut self, line: &str) -> Result<()> {
        self.writer.write_all(line.as_bytes())?;
        self.lines += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// In-memory sink.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LineBuffer {
    lines: Vec<String>,
}

impl LineBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Concatenates all lines, endings included.
    #[must_use]
    pub fn contents(&self) -> String {
        self.lines.concat()
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl Sink for LineBuffer {
    fn write_line(&mut self, line: &str) -> Result<()> {
        self.lines.push(line.to_string());
        Ok(())
    }
}

/// A sink shared between threads. Each line is written under one lock acquisition,
/// so lines never interleave.
#[derive(Debug, Default)]
pub struct SharedSink<S> {
    inner: Mutex<S>,
}

impl<S: Sink> SharedSink<S> {
    pub fn new(sink: S) -> Self {
        SharedSink {
            inner: Mutex::new(sink),
        }
    }

    pub fn write_line(&self, line: &str) -> Result<()> {
        self.inner.lock().write_line(line)
    }

    pub fn flush(&self) -> Result<()> {
        self.inner.lock().flush()
    }

    pub fn into_inner(self) -> S {
        self.inner.into_inner()
    }
}

impl<S: Sink> Sink for &SharedSink<S> {
    fn write_line(&mut self, line: &str) -> Result<()> {
        SharedSink::write_line(self, line)
    }

    fn flush(&mut self) -> Result<()> {
        SharedSink::flush(self)
    }
}

/// Joins tokens into lines.
pub struct LineWriter;

impl LineWriter {
    /// Renders one complete line, line ending included.
    #[must_use]
    pub fn render(tokens: &[String], schema: &LayoutSchema) -> String {
        let delimiter = schema.delimiter().as_char();
        let ending = schema.line_ending().as_str();
        let mut line =
            String::with_capacity(tokens.iter().map(|t| t.len() + 1).sum::<usize>() + ending.len());
        for (i, token) in tokens.iter().enumerate() {
            if i > 0 {
                line.push(delimiter);
            }
            if Self::needs_quotes(token, schema) {
                Self::push_quoted(&mut line, token, schema.quote());
            } else {
                line.push_str(token);
            }
        }
        line.push_str(ending);
        line
    }

    /// Renders `tokens` and forwards the line to `sink`.
    pub fn write<S: Sink + ?Sized>(
        tokens: &[String],
        schema: &LayoutSchema,
        sink: &mut S,
    ) -> Result<()> {
        sink.write_line(&Self::render(tokens, schema))
    }

    /// True if `token` holds any character reserved by `schema`.
    #[inline]
    #[must_use]
    pub fn needs_quotes(token: &str, schema: &LayoutSchema) -> bool {
        token.chars().any(|c| schema.is_reserved(c))
    }

    /// Wraps `token` in `quote`, doubling embedded quote characters.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cerc_layout::LineWriter;
    ///
    /// assert_eq!(LineWriter::quote("X|Y", '"'), "\"X|Y\"");
    /// assert_eq!(LineWriter::quote("say \"hi\"", '"'), "\"say \"\"hi\"\"\"");
    /// ```
    #[must_use]
    pub fn quote(token: &str, quote: char) -> String {
        let mut out = String::with_capacity(token.len() + 2);
        Self::push_quoted(&mut out, token, quote);
        out
    }

    #[inline]
    fn push_quoted(out: &mut String, token: &str, quote: char) {
        out.push(quote);
        for ch in token.chars() {
            if ch == quote {
                out.push(quote);
            }
            out.push(ch);
        }
        out.push(quote);
    }
}
