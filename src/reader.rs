//! Splitting encoded lines back into tokens.
//!
//! The inverse of [`LineWriter`](crate::LineWriter), used to verify output and by
//! tooling that inspects generated files. Splitting is quote-aware: a token that
//! starts with the quote character runs to the matching closing quote, and doubled
//! quotes inside it collapse to one.

use crate::{Error, LayoutSchema, Result};

/// Splits one line into its unquoted tokens. A trailing CRLF or LF is ignored.
///
/// # Examples
///
/// ```rust
/// use cerc_layout::{reader, FieldKind, FieldSpec, LayoutSchema};
///
/// let schema = LayoutSchema::builder("t")
///     .field(FieldSpec::required("a", FieldKind::Text))
///     .build()
///     .unwrap();
///
/// let tokens = reader::split_line("REF_1;\"X|Y\";\"say \"\"hi\"\"\"\r\n", &schema).unwrap();
/// assert_eq!(tokens, vec!["REF_1", "X|Y", "say \"hi\""]);
/// ```
pub fn split_line(line: &str, schema: &LayoutSchema) -> Result<Vec<String>> {
    let line = line
        .strip_suffix("\r\n")
        .or_else(|| line.strip_suffix('\n'))
        .unwrap_or(line);
    let delimiter = schema.delimiter().as_char();
    let quote = schema.quote();

    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().enumerate().peekable();
    let mut at_token_start = true;

    while let Some((column, ch)) = chars.next() {
        if at_token_start && ch == quote {
            at_token_start = false;
            let mut closed = false;
            while let Some((_, inner)) = chars.next() {
                if inner != quote {
                    current.push(inner);
                } else if chars.peek().is_some_and(|&(_, next)| next == quote) {
                    chars.next();
                    current.push(quote);
                } else {
                    closed = true;
                    break;
                }
            }
            if !closed {
                return Err(Error::parse(column + 1, "unterminated quoted token"));
            }
            match chars.peek() {
                None => {}
                Some(&(_, next)) if next == delimiter => {}
                Some(&(after, _)) => {
                    return Err(Error::parse(
                        after + 1,
                        "unexpected character after closing quote",
                    ))
                }
            }
        } else if ch == delimiter {
            tokens.push(std::mem::take(&mut current));
            at_token_start = true;
        } else {
            at_token_start = false;
            current.push(ch);
        }
    }
    tokens.push(current);
    Ok(tokens)
}

/// Reverses [`LineWriter::quote`](crate::LineWriter::quote). Tokens that are not
/// wrapped in `quote` come back unchanged.
///
/// # Examples
///
/// ```rust
/// use cerc_layout::{reader, LineWriter};
///
/// let quoted = LineWriter::quote("a\"b", '"');
/// assert_eq!(reader::unquote(&quoted, '"'), "a\"b");
/// assert_eq!(reader::unquote("bare", '"'), "bare");
/// ```
#[must_use]
pub fn unquote(token: &str, quote: char) -> String {
    match token
        .strip_prefix(quote)
        .and_then(|rest| rest.strip_suffix(quote))
    {
        Some(inner) => {
            let doubled: String = [quote, quote].iter().collect();
            inner.replace(&doubled, &quote.to_string())
        }
        None => token.to_string(),
    }
}
