use cerc_layout::{
    record, sub_record, to_line, Entry, FieldKind, FieldSpec, LayoutOptions, LayoutSchema,
    ListFieldSpec, Record, SubRecord, Value,
};
use chrono::NaiveDate;

#[test]
fn test_record_macro_empty() {
    let record = record! {};
    assert!(record.is_empty());
}

#[test]
fn test_record_macro_scalars() {
    let record = record! {
        "referencia_externa" => "REF_000001",
        "cnpj" => Value::identifier("12345678000195"),
        "valor" => 1500.75,
        "quantidade" => 3i64,
        "data" => NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
    };
    assert_eq!(record.len(), 5);
    assert_eq!(record.scalar("valor"), Some(&Value::Decimal(1500.75)));
    assert_eq!(
        record.scalar("cnpj"),
        Some(&Value::Identifier("12345678000195".to_string()))
    );
}

#[test]
fn test_record_macro_trailing_comma_optional() {
    let with = record! { "a" => "1", };
    let without = record! { "a" => "1" };
    assert_eq!(with, without);
}

#[test]
fn test_record_macro_keeps_insertion_order() {
    let record = record! {
        "z" => "1",
        "a" => "2",
        "m" => "3",
    };
    let keys: Vec<&str> = record.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["z", "a", "m"]);
}

#[test]
fn test_sub_record_macro() {
    let group = sub_record! {
        "tipo_conta" => Value::code("CC"),
        "agencia" => "1234",
    };
    assert_eq!(group.get("tipo_conta"), Some(&Value::Enum("CC".to_string())));
    assert_eq!(group.get("agencia"), Some(&Value::Text("1234".to_string())));
}

#[test]
fn test_nested_lists() {
    let record = record! {
        "pagamentos" => vec![
            sub_record! { "valor" => 1.0 },
            sub_record! { "valor" => 2.0 },
            sub_record! { "valor" => 3.0 },
        ],
    };
    match record.get("pagamentos") {
        Some(Entry::List(groups)) => assert_eq!(groups.len(), 3),
        _ => panic!("Expected list"),
    }
    assert!(record.list("pagamentos").is_some());
}

#[test]
fn test_macro_records_encode() {
    let schema = LayoutSchema::builder("t")
        .options(LayoutOptions::cerc())
        .field(FieldSpec::required("id", FieldKind::Text))
        .list(
            ListFieldSpec::new("valores", vec![FieldSpec::required("valor", FieldKind::decimal())])
                .with_default(|| sub_record! { "valor" => 0.0 }),
        )
        .build()
        .unwrap();

    let record: Record = record! {
        "id" => "A",
        "valores" => vec![sub_record! { "valor" => 1.0 }, sub_record! { "valor" => 2.0 }],
    };
    assert_eq!(to_line(&schema, &record).unwrap(), "A;\"1.00|2.00\"\r\n");

    let empty: Record = record! {
        "id" => "B",
        "valores" => Vec::<SubRecord>::new(),
    };
    assert_eq!(to_line(&schema, &empty).unwrap(), "B;0.00\r\n");
}
