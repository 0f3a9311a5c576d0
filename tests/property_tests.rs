//! Property-based tests for the formatting and nesting guarantees.
//!
//! Each property is checked across generated inputs: identifier widths, decimal
//! precision, list ordering, empty-list defaults and quoting round trips.

use cerc_layout::{
    from_line, reader, sub_record, Delimiter, FieldFormatter, FieldKind, FieldSpec, FormatError,
    LayoutOptions, LayoutSchema, LineWriter, ListEncoder, ListFieldSpec, SubRecord,
};
use proptest::prelude::*;

fn groups_spec() -> ListFieldSpec {
    ListFieldSpec::new(
        "grupos",
        vec![
            FieldSpec::required("codigo", FieldKind::Text),
            FieldSpec::required("valor", FieldKind::decimal()),
        ],
    )
    .with_delimiters(Delimiter::Semicolon, Delimiter::Pipe)
    .with_default(|| sub_record! { "codigo" => "PADRAO", "valor" => 0.0 })
}

fn line_schema() -> LayoutSchema {
    LayoutSchema::builder("t")
        .options(LayoutOptions::cerc())
        .field(FieldSpec::required("a", FieldKind::Text))
        .list(groups_spec())
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn prop_identifier_has_exact_width(digits in "[0-9]{0,14}", extra in 0usize..6) {
        let width = digits.len() + extra;
        let token = FieldFormatter::identifier(&digits, width).unwrap();
        prop_assert_eq!(token.len(), width);

        let stripped = token.trim_start_matches('0');
        let expected = digits.trim_start_matches('0');
        prop_assert_eq!(stripped, expected);
    }

    #[test]
    fn prop_identifier_overflow(digits in "[0-9]{2,20}", cut in 1usize..3) {
        let width = digits.len().saturating_sub(cut);
        prop_assert_eq!(
            FieldFormatter::identifier(&digits, width),
            Err(FormatError::Overflow { width, len: digits.len() })
        );
    }

    #[test]
    fn prop_decimal_fraction_digits(value in -1.0e12f64..1.0e12, digits in 0u8..7) {
        let token = FieldFormatter::decimal(value, digits).unwrap();
        match token.split_once('.') {
            Some((_, fraction)) => prop_assert_eq!(fraction.len(), usize::from(digits)),
            None => prop_assert_eq!(digits, 0),
        }
    }

    #[test]
    fn prop_decimal_close_to_input(value in -1.0e9f64..1.0e9) {
        let token = FieldFormatter::decimal(value, 2).unwrap();
        let parsed: f64 = token.parse().unwrap();
        prop_assert!((parsed - value).abs() <= 0.005 + 1e-6);
    }

    #[test]
    fn prop_groups_decode_in_order(
        codes in prop::collection::vec("[A-Z0-9]{1,8}", 1..10),
    ) {
        let spec = groups_spec();
        let groups: Vec<SubRecord> = codes
            .iter()
            .enumerate()
            .map(|(i, code)| sub_record! { "codigo" => code.as_str(), "valor" => i as f64 })
            .collect();

        let token = ListEncoder::encode(&groups, &spec).unwrap();
        let parts = ListEncoder::split(&token, &spec);
        prop_assert_eq!(parts.groups.len(), groups.len());
        for (group, code) in parts.groups.iter().zip(&codes) {
            prop_assert_eq!(&group[0], code);
        }
    }

    #[test]
    fn prop_quoting_is_idempotent(token in "\\PC{0,24}") {
        let schema = line_schema();
        let quoted = LineWriter::quote(&token, schema.quote());
        let unquoted = reader::unquote(&quoted, schema.quote());
        prop_assert_eq!(&unquoted, &token);
        prop_assert_eq!(LineWriter::quote(&unquoted, schema.quote()), quoted);
    }

    #[test]
    fn prop_line_round_trip(
        first in "[a-zA-Z0-9;|\" \\n]{0,16}",
        second in "[a-zA-Z0-9;|\" ]{0,16}",
    ) {
        let schema = line_schema();
        let tokens = vec![first, second];
        let line = LineWriter::render(&tokens, &schema);
        prop_assert_eq!(from_line(&schema, &line).unwrap(), tokens);
    }

    #[test]
    fn prop_unreserved_tokens_stay_bare(token in "[a-zA-Z0-9 ,.-]{0,24}") {
        let schema = line_schema();
        prop_assert!(!LineWriter::needs_quotes(&token, &schema));
    }
}

#[test]
fn test_empty_list_equals_default_group() {
    let spec = groups_spec();
    let default = spec.default_sub_record().unwrap();
    assert_eq!(
        ListEncoder::encode(&[], &spec).unwrap(),
        ListEncoder::encode(&[default], &spec).unwrap()
    );
}
