//! CERC Exchange Line Format
//!
//! This module documents the line format produced by this library.
//!
//! # Overview
//!
//! Every exchange file is a sequence of lines, one record per line. A line is the
//! ordered list of a layout's top-level fields, separated by the primary delimiter and
//! terminated by the line ending. There is no header line.
//!
//! ```text
//! C;REF_000001;12345678000195;98765432000110;12345678901;VCC;2024-03-15;...\r\n
//! ```
//!
//! # Delimiter Levels
//!
//! Three separator levels nest strictly:
//!
//! | Level | Historical character | Appears |
//! |-------|----------------------|---------|
//! | Primary | `;` | between top-level fields |
//! | Inter-group | `\|` | between the groups of one list field |
//! | Intra-group | `;` | between the sub-fields of one group |
//!
//! The inter-group delimiter always differs from the primary one. The historical files
//! reuse `;` inside groups; that is only unambiguous because a list token containing
//! `;` is always quoted at the line level. Layouts must opt in to this with
//! `shared_intra_delimiter`; otherwise all three levels must differ.
//!
//! Sub-field tokens never contain either list delimiter. There is no escape below
//! the line level.
//!
//! # Field Tokens
//!
//! | Kind | Rule | Example |
//! |------|------|---------|
//! | Identifier | digits, left-padded with `0` to the declared width; never truncated | `00000000000123` |
//! | Document | CPF width (11) up to 11 digits, otherwise CNPJ width (14) | `12345678901` |
//! | Decimal | exactly N fraction digits (default 2), round half away from zero | `1234.50` |
//! | Integer | base 10 | `42` |
//! | Date | `YYYY-MM-DD` | `2024-03-15` |
//! | Timestamp | RFC3339 in UTC with literal `Z`, sub-seconds only when present | `2024-03-15T10:30:00Z` |
//! | Text, Enum | as given | `Carteira1` |
//!
//! Absent optional fields are empty tokens (`;;`).
//!
//! # List Fields
//!
//! A list field packs zero or more groups into one token:
//!
//! ```text
//! 12345678901;CC;001;12345678;1234;123456-7;500.00|98765432100;CC;;87654321;4321;7654321-0;250.00
//! ```
//!
//! Groups keep input order. Identical groups are repeated, never merged. An empty
//! list renders the layout's default group, unless the field permits an empty token.
//!
//! A list field may declare head fields, rendered once before the first group and
//! joined to it with the intra-group delimiter:
//!
//! ```text
//! EFEITO_1;2024-03-15;...;1000.00;12345678901;CC;001;12345678;1234;123456-7;Titular da Conta
//! ```
//!
//! # Quoting
//!
//! Quoting is minimal. A token is wrapped in `"` if and only if it contains:
//!
//! - the primary delimiter
//! - any list delimiter used by the layout
//! - the quote character
//! - CR or LF
//! - an extra reserved character configured on the layout
//!
//! Quote characters inside a quoted token are doubled:
//!
//! ```text
//! say "hi"   ->   "say ""hi"""
//! A;1|B;2    ->   "A;1|B;2"
//! ```
//!
//! Quoting happens in exactly one place, when the line is assembled. Field and list
//! tokens are never pre-quoted.
//!
//! # Line Endings
//!
//! CRLF by default, LF on request.

// This module contains only documentation; no implementation code
