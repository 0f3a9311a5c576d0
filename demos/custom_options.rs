//! Customizing the line format with LayoutOptions.
//!
//! Run with: cargo run --example custom_options

use cerc_layout::{
    record, sub_record, to_line, Delimiter, FieldKind, FieldSpec, LayoutOptions, LayoutSchema,
    LineEnding, ListFieldSpec, Value,
};
use std::error::Error;

fn schema(options: LayoutOptions) -> Result<LayoutSchema, Box<dyn Error>> {
    Ok(LayoutSchema::builder("custom")
        .options(options)
        .field(FieldSpec::required("referencia_externa", FieldKind::Text))
        .field(FieldSpec::required("valor", FieldKind::decimal()))
        .list(
            ListFieldSpec::new(
                "contas",
                vec![
                    FieldSpec::required("ispb", FieldKind::Identifier { width: 8 }),
                    FieldSpec::optional("agencia", FieldKind::Text),
                ],
            )
            .allow_empty(),
        )
        .build()?)
}

fn main() -> Result<(), Box<dyn Error>> {
    let record = record! {
        "referencia_externa" => "REF_000001",
        "valor" => 1234.5678,
        "contas" => vec![
            sub_record! { "ispb" => Value::identifier("1"), "agencia" => "0001" },
            sub_record! { "ispb" => Value::identifier("2") },
        ],
    };

    // Default format: distinct delimiters at every level
    println!("Default:");
    print!("{}", to_line(&schema(LayoutOptions::new())?, &record)?);

    // CERC files reuse the semicolon inside groups
    println!("\nCERC:");
    print!("{}", to_line(&schema(LayoutOptions::cerc())?, &record)?);

    println!("\nTab delimiter, LF endings, four fraction digits:");
    let options = LayoutOptions::new()
        .with_delimiter(Delimiter::Tab)
        .with_line_ending(LineEnding::Lf)
        .with_fraction_digits(4);
    print!("{}", to_line(&schema(options)?, &record)?);

    println!("\nOptions loaded from JSON:");
    let options: LayoutOptions =
        serde_json::from_str(r#"{ "delimiter": "pipe", "inter_group_delimiter": "semicolon" }"#)?;
    print!("{}", to_line(&schema(options)?, &record)?);

    // Sharing the primary delimiter inside groups is rejected unless opted in
    let strict = LayoutOptions::new().with_intra_group_delimiter(Delimiter::Semicolon);
    match schema(strict) {
        Ok(_) => println!("\nunexpected: strict schema accepted"),
        Err(err) => println!("\n✓ Rejected: {err}"),
    }

    Ok(())
}
