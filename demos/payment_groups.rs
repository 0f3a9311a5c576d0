//! List fields: payment groups, the default group and head fields.
//!
//! Run with: cargo run --example payment_groups

use cerc_layout::layouts::Layout;
use cerc_layout::{record, sub_record, to_line, ListEncoder, Record, SubRecord, Value};
use chrono::{NaiveDate, TimeZone, Utc};
use std::error::Error;

fn ap002(pagamentos: Vec<SubRecord>) -> Result<Record, Box<dyn Error>> {
    Ok(record! {
        "tipo_operacao" => Value::code("C"),
        "referencia_externa" => "REF_000002",
        "cnpj_credenciadora" => Value::identifier("12345678000195"),
        "cnpj_participante" => Value::identifier("98765432000110"),
        "usuario_final_recebedor" => Value::identifier("12345678901"),
        "arranjo_pagamento" => Value::code("VCC"),
        "data_liquidacao" => NaiveDate::from_ymd_opt(2024, 3, 15).ok_or("invalid date")?,
        "titular" => Value::identifier("11222333000181"),
        "valor_constituido_total" => 750.0,
        "valor_bloqueado" => 0.0,
        "valor_livre" => 750.0,
        "valor_onerado" => 0.0,
        "valor_disponivel" => 750.0,
        "valor_transacao" => 750.0,
        "pagamentos" => pagamentos,
        "carteira" => "Carteira1",
    })
}

fn main() -> Result<(), Box<dyn Error>> {
    let schema = Layout::Ap002.schema()?;

    let payments = vec![
        sub_record! {
            "numero_documento_titular" => Value::identifier("12345678901"),
            "ispb" => Value::identifier("12345678"),
            "agencia" => "1234",
            "numero_conta" => "123456-7",
            "valor_a_pagar" => 500.0,
        },
        sub_record! {
            "numero_documento_titular" => Value::identifier("98765432000110"),
            "tipo_conta" => Value::code("PG"),
            "ispb" => Value::identifier("87654321"),
            "agencia" => "4321",
            "numero_conta" => "765432-1",
            "valor_a_pagar" => 250.0,
        },
    ];

    println!("Two payment groups:");
    let line = to_line(&schema, &ap002(payments)?)?;
    println!("{}\n", line.trim_end());

    println!("No payments, default group:");
    println!("{}\n", to_line(&schema, &ap002(Vec::new())?)?.trim_end());

    // AP008 places the effect fields before the account groups
    let schema = Layout::Ap008.schema()?;
    let record = record! {
        "referencia_externa" => "REF_000008",
        "identificador_contrato" => "CONTRATO_1",
        "entidade_registradora" => Value::identifier("12345678000195"),
        "instituicao_credenciadora" => Value::identifier("98765432000110"),
        "usuario_final_recebedor" => Value::identifier("11222333000181"),
        "arranjo_pagamento" => Value::code("VCC"),
        "identificador_efeito_contrato" => "EF1",
        "data_liquidacao" => NaiveDate::from_ymd_opt(2024, 3, 15).ok_or("invalid date")?,
        "titular_ur" => Value::identifier("11222333000181"),
        "constituicao_ur" => Value::code("1"),
        "valor_constituido_total" => 1000.0,
        "valor_bloqueado" => 0.0,
        "indicador_oneracao" => 1i64,
        "regra_divisao" => Value::code("1"),
        "valor_onerado" => 1000.0,
        "protocolo" => "PROT1",
        "data_hora_evento" => Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).single().ok_or("invalid time")?,
        "status_operacao" => Value::code("0"),
        "valor_constituido_efeito" => 1000.0,
    };
    let line = to_line(&schema, &record)?;
    println!("AP008 with head fields:\n{}", line.trim_end());

    let tokens = cerc_layout::from_line(&schema, &line)?;
    if let (Some(token), Some(spec)) = (tokens.get(6), schema.list_field("contas")) {
        let parts = ListEncoder::split(token, spec);
        println!(
            "✓ {} head fields, {} account group(s)",
            parts.head.len(),
            parts.groups.len()
        );
    }

    Ok(())
}
