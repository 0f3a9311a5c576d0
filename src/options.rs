//! Configuration options for layout encoding.
//!
//! This module provides the types that control the bit-exact output format:
//!
//! - [`LayoutOptions`]: Main configuration struct (builder style, serde-loadable)
//! - [`Delimiter`]: Separator character for one nesting level
//! - [`LineEnding`]: Line terminator appended after the last field
//!
//! ## Examples
//!
//! ```rust
//! use cerc_layout::{Delimiter, LayoutOptions, LineEnding};
//!
//! // Historical CERC exchange format
//! let cerc = LayoutOptions::cerc();
//! assert_eq!(cerc.delimiter, Delimiter::Semicolon);
//! assert_eq!(cerc.inter_group_delimiter, Delimiter::Pipe);
//! assert!(cerc.shared_intra_delimiter);
//!
//! // Custom configuration
//! let options = LayoutOptions::new()
//!     .with_delimiter(Delimiter::Tab)
//!     .with_line_ending(LineEnding::Lf)
//!     .with_fraction_digits(4);
//! assert_eq!(options.fraction_digits, 4);
//! ```

use serde::Deserialize;

/// Separator character used at one nesting level of a line.
///
/// # Examples
///
/// ```rust
/// use cerc_layout::Delimiter;
///
/// assert_eq!(Delimiter::Semicolon.as_char(), ';');
/// assert_eq!(Delimiter::Pipe.as_str(), "|");
/// assert_eq!(Delimiter::Tab.as_char(), '\t');
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delimiter {
    #[default]
    Semicolon,
    Pipe,
    Comma,
    Tab,
}

impl Delimiter {
    /// Returns the delimiter character.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Delimiter::Semicolon => ';',
            Delimiter::Pipe => '|',
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
        }
    }

    /// Returns the string representation of this delimiter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Delimiter::Semicolon => ";",
            Delimiter::Pipe => "|",
            Delimiter::Comma => ",",
            Delimiter::Tab => "\t",
        }
    }
}

/// Line terminator appended to every encoded record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineEnding {
    Lf,
    #[default]
    CrLf,
}

impl LineEnding {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Configuration for a [`LayoutSchema`](crate::LayoutSchema).
///
/// Options are fixed when the schema is built. The list delimiters set here are the
/// defaults for every list field; a single list field may override them.
///
/// Options deserialize from any serde format; missing keys take their default:
///
/// ```rust
/// use cerc_layout::{Delimiter, LayoutOptions, LineEnding};
///
/// let options: LayoutOptions =
///     serde_json::from_str(r#"{ "delimiter": "comma", "line_ending": "lf" }"#).unwrap();
/// assert_eq!(options.delimiter, Delimiter::Comma);
/// assert_eq!(options.line_ending, LineEnding::Lf);
/// assert_eq!(options.quote, '"');
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Separator between top-level fields.
    pub delimiter: Delimiter,
    /// Separator between the groups of a list field.
    pub inter_group_delimiter: Delimiter,
    /// Separator between the sub-fields of one group.
    pub intra_group_delimiter: Delimiter,
    pub quote: char,
    pub line_ending: LineEnding,
    /// Fraction digits for decimal fields that do not override it.
    pub fraction_digits: u8,
    /// Characters that force quoting in addition to the delimiters, the quote and CR/LF.
    pub reserved: Vec<char>,
    /// Permit the intra-group delimiter to equal the primary delimiter.
    ///
    /// The list token is then always quoted by the line writer, which keeps the
    /// nesting unambiguous. The inter-group delimiter must still differ from both.
    pub shared_intra_delimiter: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        LayoutOptions {
            delimiter: Delimiter::Semicolon,
            inter_group_delimiter: Delimiter::Pipe,
            intra_group_delimiter: Delimiter::Comma,
            quote: '"',
            line_ending: LineEnding::default(),
            fraction_digits: 2,
            reserved: Vec::new(),
            shared_intra_delimiter: false,
        }
    }
}

impl LayoutOptions {
    /// Creates default options: `;` between fields, `|` between groups, `,` inside a
    /// group, `"` quoting, CRLF line endings, two fraction digits.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cerc_layout::{Delimiter, LayoutOptions};
    ///
    /// let options = LayoutOptions::new();
    /// assert_eq!(options.intra_group_delimiter, Delimiter::Comma);
    /// assert!(!options.shared_intra_delimiter);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options reproducing the historical CERC exchange files: the intra-group
    /// delimiter is the primary `;`, groups are separated by `|`.
    #[must_use]
    pub fn cerc() -> Self {
        LayoutOptions {
            intra_group_delimiter: Delimiter::Semicolon,
            shared_intra_delimiter: true,
            ..Default::default()
        }
    }

    /// Sets the primary field delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the default delimiter between list groups.
    #[must_use]
    pub fn with_inter_group_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.inter_group_delimiter = delimiter;
        self
    }

    /// Sets the default delimiter between the sub-fields of a group.
    #[must_use]
    pub fn with_intra_group_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.intra_group_delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_quote(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }

    #[must_use]
    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    /// Sets the fraction digits used by decimal fields without an explicit override.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cerc_layout::LayoutOptions;
    ///
    /// let options = LayoutOptions::new().with_fraction_digits(3);
    /// assert_eq!(options.fraction_digits, 3);
    /// ```
    #[must_use]
    pub fn with_fraction_digits(mut self, digits: u8) -> Self {
        self.fraction_digits = digits;
        self
    }

    /// Adds a character that forces quoting of any token containing it.
    #[must_use]
    pub fn with_reserved(mut self, c: char) -> Self {
        if !self.reserved.contains(&c) {
            self.reserved.push(c);
        }
        self
    }

    #[must_use]
    pub fn with_shared_intra_delimiter(mut self, shared: bool) -> Self {
        self.shared_intra_delimiter = shared;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cerc_options() {
        let options = LayoutOptions::cerc();
        assert_eq!(options.delimiter.as_char(), ';');
        assert_eq!(options.intra_group_delimiter.as_char(), ';');
        assert_eq!(options.inter_group_delimiter.as_char(), '|');
        assert_eq!(options.line_ending.as_str(), "\r\n");
    }

    #[test]
    fn test_reserved_is_deduplicated() {
        let options = LayoutOptions::new().with_reserved('#').with_reserved('#');
        assert_eq!(options.reserved, vec!['#']);
    }

    #[test]
    fn test_deserialize_partial() {
        let options: LayoutOptions = serde_json::from_str(
            r##"{ "inter_group_delimiter": "tab", "fraction_digits": 4, "reserved": ["#"] }"##,
        )
        .unwrap();
        assert_eq!(options.inter_group_delimiter, Delimiter::Tab);
        assert_eq!(options.fraction_digits, 4);
        assert_eq!(options.reserved, vec!['#']);
        assert_eq!(options.delimiter, Delimiter::Semicolon);
    }
}
