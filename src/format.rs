//! Field-level formatting rules.
//!
//! [`FieldFormatter`] turns one typed [`Value`] into one fixed-format token under a
//! [`FieldSpec`]. It is pure and never quotes: quoting belongs to the
//! [`LineWriter`](crate::LineWriter) alone.
//!
//! | Kind | Rendering |
//! |------|-----------|
//! | Identifier | digits left-padded with `0` to the declared width; longer input is an error |
//! | Document | CPF (11) or CNPJ (14) width, picked by digit count |
//! | Decimal | exactly N fraction digits, round half away from zero |
//! | Integer | base 10 |
//! | Date | `YYYY-MM-DD` |
//! | Timestamp | RFC3339, UTC, literal `Z` |
//! | Text, Enum | passthrough |
//!
//! ## Examples
//!
//! ```rust
//! use cerc_layout::FieldFormatter;
//!
//! assert_eq!(FieldFormatter::identifier("123", 14).unwrap(), "00000000000123");
//! assert_eq!(FieldFormatter::decimal(1234.5, 2).unwrap(), "1234.50");
//! assert_eq!(FieldFormatter::decimal(0.125, 2).unwrap(), "0.13");
//! assert_eq!(FieldFormatter::document("12345678901").unwrap(), "12345678901");
//! assert_eq!(FieldFormatter::document("1234567890123").unwrap(), "01234567890123");
//! ```

use crate::schema::{FieldKind, FieldSpec, DEFAULT_FRACTION_DIGITS};
use crate::{FormatError, Value};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

const CPF_WIDTH: usize = 11;
const CNPJ_WIDTH: usize = 14;

/// Converts typed values into fixed-format tokens.
pub struct FieldFormatter;

impl FieldFormatter {
    /// Formats `value` under `spec`.
    ///
    /// An absent value falls back to the field default. Absent required fields fail
    /// with [`FormatError::MissingField`]; absent optional fields render as `""`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cerc_layout::{FieldFormatter, FieldKind, FieldSpec, FormatError, Value};
    ///
    /// let tipo = FieldSpec::optional("tipo_conta", FieldKind::any_code()).with_default(Value::code("CC"));
    /// assert_eq!(FieldFormatter::format(None, &tipo).unwrap(), "CC");
    ///
    /// let compe = FieldSpec::optional("compe", FieldKind::Identifier { width: 3 });
    /// assert_eq!(FieldFormatter::format(None, &compe).unwrap(), "");
    /// assert_eq!(FieldFormatter::format(Some(&Value::identifier("1")), &compe).unwrap(), "001");
    ///
    /// let ispb = FieldSpec::required("ispb", FieldKind::Identifier { width: 8 });
    /// assert_eq!(FieldFormatter::format(None, &ispb), Err(FormatError::MissingField));
    /// ```
    pub fn format(value: Option<&Value>, spec: &FieldSpec) -> Result<String, FormatError> {
        let value = match value.or_else(|| spec.default_value()) {
            Some(value) => value,
            None if spec.is_required() => return Err(FormatError::MissingField),
            None => return Ok(String::new()),
        };

        match (spec.kind(), value) {
            (FieldKind::Identifier { width }, Value::Identifier(digits)) => {
                Self::identifier(digits, *width)
            }
            (FieldKind::Document, Value::Identifier(digits)) => Self::document(digits),
            (FieldKind::Decimal { fraction_digits }, Value::Decimal(magnitude)) => Self::decimal(
                *magnitude,
                fraction_digits.unwrap_or(DEFAULT_FRACTION_DIGITS),
            ),
            (FieldKind::Integer, Value::Integer(n)) => Ok(n.to_string()),
            (FieldKind::Date, Value::Date(date)) => Ok(Self::date(*date)),
            (FieldKind::Timestamp, Value::Timestamp(instant)) => Ok(Self::timestamp(instant)),
            (FieldKind::Text, Value::Text(text)) => Ok(text.clone()),
            (FieldKind::Enum { codes }, Value::Enum(code)) => {
                if codes.is_empty() || codes.iter().any(|c| c == code) {
                    Ok(code.clone())
                } else {
                    Err(FormatError::InvalidCode {
                        code: code.clone(),
                        allowed: codes.clone(),
                    })
                }
            }
            (kind, value) => Err(FormatError::TypeMismatch {
                expected: kind.value_name(),
                found: value.kind_name(),
            }),
        }
    }

    /// Left-pads `digits` with `0` to exactly `width`. Never truncates.
    pub fn identifier(digits: &str, width: usize) -> Result<String, FormatError> {
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FormatError::NonDigit {
                value: digits.to_string(),
            });
        }
        if digits.len() > width {
            return Err(FormatError::Overflow {
                width,
                len: digits.len(),
            });
        }
        Ok(format!("{:0>width$}", digits, width = width))
    }

    /// Pads a taxpayer document to CPF width, or to CNPJ width when it is longer.
    pub fn document(digits: &str) -> Result<String, FormatError> {
        let width = if digits.len() <= CPF_WIDTH {
            CPF_WIDTH
        } else {
            CNPJ_WIDTH
        };
        Self::identifier(digits, width)
    }

    /// Renders `magnitude` with exactly `fraction_digits` digits after the point.
    ///
    /// Rounding happens on the shortest decimal representation of the input, half
    /// away from zero, so `2.675` renders as `2.68` even though its binary value is
    /// slightly below.
    pub fn decimal(magnitude: f64, fraction_digits: u8) -> Result<String, FormatError> {
        if !magnitude.is_finite() {
            return Err(FormatError::NotFinite);
        }

        // Display for f64 never uses exponent notation.
        let repr = magnitude.abs().to_string();
        let (int_part, frac_part) = repr.split_once('.').unwrap_or((repr.as_str(), ""));
        let scale = usize::from(fraction_digits);

        let mut digits: Vec<u8> = int_part
            .bytes()
            .chain(frac_part.bytes().chain(std::iter::repeat(b'0')).take(scale))
            .map(|b| b - b'0')
            .collect();
        let round_up = frac_part.as_bytes().get(scale).is_some_and(|&b| b >= b'5');

        if round_up {
            let mut carry = true;
            for d in digits.iter_mut().rev() {
                if *d == 9 {
                    *d = 0;
                } else {
                    *d += 1;
                    carry = false;
                    break;
                }
            }
            if carry {
                digits.insert(0, 1);
            }
        }

        let int_len = digits.len() - scale;
        let is_zero = digits.iter().all(|&d| d == 0);
        let mut out = String::with_capacity(digits.len() + 2);
        if magnitude.is_sign_negative() && !is_zero {
            out.push('-');
        }
        out.extend(digits[..int_len].iter().map(|&d| char::from(b'0' + d)));
        if scale > 0 {
            out.push('.');
            out.extend(digits[int_len..].iter().map(|&d| char::from(b'0' + d)));
        }
        Ok(out)
    }

    /// `YYYY-MM-DD`.
    #[must_use]
    pub fn date(date: NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// RFC3339 with a literal `Z` and as many sub-second digits as the instant needs.
    #[must_use]
    pub fn timestamp(instant: &DateTime<Utc>) -> String {
        instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}
