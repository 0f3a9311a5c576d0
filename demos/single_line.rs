//! Encoding one record of a bundled CERC layout.
//!
//! Run with: cargo run --example single_line

use cerc_layout::layouts::Layout;
use cerc_layout::{from_line, record, to_line, Value};
use chrono::NaiveDate;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let schema = Layout::Ap001.schema()?;

    let record = record! {
        "tipo_operacao" => Value::code("I"),
        "referencia_externa" => "REF_000001",
        "cnpj" => Value::identifier("1234567000199"),
        "razao_social" => "Empresa Exemplo LTDA",
        "nome_fantasia" => "Exemplo; Filial Centro",
    };

    let line = to_line(&schema, &record)?;
    println!("{} line:\n{}", schema.name(), line.trim_end());

    // Tokens holding the delimiter come back out of their quotes
    let tokens = from_line(&schema, &line)?;
    assert_eq!(tokens[4], "Exemplo; Filial Centro");
    println!("✓ {} tokens decoded", tokens.len());

    let schema = Layout::Ap023.schema()?;
    let record = record! {
        "referencia_externa" => "REF_000023",
        "data_referencia" => NaiveDate::from_ymd_opt(2024, 3, 1).ok_or("invalid date")?,
        "solicitante" => Value::identifier("12345678000195"),
        "financiador" => Value::identifier("98765432000110"),
        "quantidade_optins_ativos" => 3i64,
        "carteira" => "Carteira1",
    };
    println!("\n{} line:\n{}", schema.name(), to_line(&schema, &record)?.trim_end());

    Ok(())
}
