//! End-to-end lines for the bundled CERC layouts.

use cerc_layout::layouts::Layout;
use cerc_layout::{
    from_line, record, sub_record, to_line, FormatError, ListEncoder, Record, RecordEncoder,
    RecordError, SubRecord, Value,
};
use chrono::{NaiveDate, TimeZone, Utc};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn ap002_record(pagamentos: Vec<SubRecord>) -> Record {
    record! {
        "tipo_operacao" => Value::code("C"),
        "referencia_externa" => "REF_000001",
        "cnpj_credenciadora" => Value::identifier("12345678000195"),
        "cnpj_participante" => Value::identifier("98765432000110"),
        "usuario_final_recebedor" => Value::identifier("12345678901"),
        "arranjo_pagamento" => Value::code("VCC"),
        "data_liquidacao" => day(2024, 3, 15),
        "titular" => Value::identifier("11222333000181"),
        "valor_constituido_total" => 750.0,
        "valor_bloqueado" => 0.0,
        "valor_livre" => 750.0,
        "valor_onerado" => 0.0,
        "valor_disponivel" => 750.0,
        "valor_transacao" => 750.0,
        "pagamentos" => pagamentos,
        "carteira" => "Carteira1",
    }
}

fn payment(documento: &str, ispb: &str, valor: f64) -> SubRecord {
    sub_record! {
        "numero_documento_titular" => Value::identifier(documento),
        "compe" => Value::identifier("1"),
        "ispb" => Value::identifier(ispb),
        "agencia" => "1234",
        "numero_conta" => "123456-7",
        "valor_a_pagar" => valor,
    }
}

#[test]
fn test_ap001_line() {
    let schema = Layout::Ap001.schema().unwrap();
    let record = record! {
        "tipo_operacao" => Value::code("I"),
        "referencia_externa" => "REF_000001",
        "cnpj" => Value::identifier("12345678000195"),
        "razao_social" => "Empresa Exemplo LTDA",
        "nome_fantasia" => "Exemplo",
    };
    assert_eq!(
        to_line(&schema, &record).unwrap(),
        "I;REF_000001;12345678000195;Empresa Exemplo LTDA;Exemplo\r\n"
    );
}

#[test]
fn test_ap001_rejects_unknown_operation() {
    let schema = Layout::Ap001.schema().unwrap();
    let record = record! {
        "tipo_operacao" => Value::code("X"),
        "referencia_externa" => "REF_000009",
        "cnpj" => Value::identifier("1"),
        "razao_social" => "A",
        "nome_fantasia" => "B",
    };
    let err = RecordEncoder::encode(&record, &schema).unwrap_err();
    assert_eq!(err.field(), "tipo_operacao");
    assert_eq!(err.record(), "REF_000009");
    assert!(matches!(
        err,
        RecordError::Format {
            source: FormatError::InvalidCode { .. },
            ..
        }
    ));
}

#[test]
fn test_ap002_payment_groups() {
    let schema = Layout::Ap002.schema().unwrap();
    let record = ap002_record(vec![
        payment("12345678901", "12345678", 500.0),
        payment("98765432000110", "87654321", 250.0),
    ]);
    let line = to_line(&schema, &record).unwrap();
    assert_eq!(
        line,
        "C;REF_000001;12345678000195;98765432000110;12345678901;VCC;2024-03-15;11222333000181;\
         750.00;0.00;750.00;0.00;750.00;750.00;\
         \"12345678901;CC;001;12345678;1234;123456-7;500.00;;;;|\
         98765432000110;CC;001;87654321;1234;123456-7;250.00;;;;\";\
         Carteira1\r\n"
    );

    let tokens = from_line(&schema, &line).unwrap();
    assert_eq!(tokens.len(), 16);
    let groups = ListEncoder::split(&tokens[14], schema.list_field("pagamentos").unwrap());
    assert_eq!(groups.groups.len(), 2);
    assert_eq!(groups.groups[1][0], "98765432000110");
    assert!(groups.groups.iter().all(|group| group.len() == 11));
}

#[test]
fn test_ap002_empty_payments_default_to_transaction_amount() {
    let schema = Layout::Ap002.schema().unwrap();
    let tokens = RecordEncoder::encode(&ap002_record(Vec::new()), &schema).unwrap();
    assert_eq!(
        tokens[14],
        "12345678901;CC;001;12345678;1234;123456-7;750.00;;;;"
    );
}

#[test]
fn test_ap002_repeated_payments_preserved() {
    let schema = Layout::Ap002.schema().unwrap();
    let same = payment("12345678901", "12345678", 100.0);
    let tokens =
        RecordEncoder::encode(&ap002_record(vec![same.clone(), same.clone(), same]), &schema)
            .unwrap();
    assert_eq!(tokens[14].matches('|').count(), 2);
}

#[test]
fn test_ap004_single_column_lists() {
    let schema = Layout::Ap004.schema().unwrap();
    let base = record! {
        "tipo_operacao" => Value::code("C"),
        "referencia_externa" => "REF_000004",
        "solicitante" => Value::identifier("12345678000195"),
        "financiador" => Value::identifier("98765432000110"),
        "usuario_final_recebedor" => Value::identifier("11222333000181"),
        "data_assinatura" => day(2024, 1, 10),
        "data_inicio" => day(2024, 1, 11),
    };

    let single = base.clone().with(
        "credenciadoras",
        vec![sub_record! { "cnpj" => Value::identifier("11111111000111") }],
    );
    assert_eq!(
        to_line(&schema, &single).unwrap(),
        "C;REF_000004;12345678000195;98765432000110;11111111000111;11222333000181;;\
         2024-01-10;2024-01-11;;;;;\r\n"
    );

    let many = base.with(
        "arranjos_pagamento",
        vec![
            sub_record! { "arranjo" => Value::code("VCC") },
            sub_record! { "arranjo" => Value::code("MCC") },
        ],
    );
    let line = to_line(&schema, &many).unwrap();
    assert!(line.contains(";98765432000110;;11222333000181;\"VCC|MCC\";2024-01-10;"));
    assert_eq!(line.matches('"').count(), 2);
}

#[test]
fn test_ap005_timestamp_and_payment_type() {
    let schema = Layout::Ap005.schema().unwrap();
    let record = record! {
        "referencia_externa" => "REF_000005",
        "entidade_registradora" => Value::identifier("12345678000195"),
        "credenciadora" => Value::identifier("98765432000110"),
        "usuario_final_recebedor" => Value::identifier("1234567890123"),
        "arranjo_pagamento" => Value::code("ECC"),
        "data_liquidacao" => day(2024, 3, 15),
        "titular" => Value::identifier("1234567890123"),
        "constituicao" => Value::code("1"),
        "valor_constituido_total" => 1000.0,
        "valor_constituido_antecipacao" => 100.0,
        "valor_bloqueado" => 50.0,
        "carteira" => "Carteira1",
        "valor_livre" => 950.0,
        "valor_total_ur" => 1100.0,
        "data_hora_ultima_atualizacao" => Utc.with_ymd_and_hms(2024, 3, 14, 23, 59, 59).unwrap(),
    };
    let tokens = RecordEncoder::encode(&record, &schema).unwrap();
    assert_eq!(tokens.len(), 16);
    assert_eq!(tokens[3], "01234567890123");
    assert_eq!(
        tokens[11],
        "11111111111;CC;001;00000001;1234;123456-7;1000.00;;;;;;7;;;"
    );
    assert_eq!(tokens[15], "2024-03-14T23:59:59Z");
}

#[test]
fn test_ap008_head_fields_precede_accounts() {
    let schema = Layout::Ap008.schema().unwrap();
    let record = record! {
        "referencia_externa" => "REF_000008",
        "identificador_contrato" => "CONTRATO_1",
        "entidade_registradora" => Value::identifier("12345678000195"),
        "instituicao_credenciadora" => Value::identifier("98765432000110"),
        "usuario_final_recebedor" => Value::identifier("11222333000181"),
        "arranjo_pagamento" => Value::code("VCC"),
        "identificador_efeito_contrato" => "EF1",
        "data_liquidacao" => day(2024, 3, 15),
        "titular_ur" => Value::identifier("11222333000181"),
        "constituicao_ur" => Value::code("1"),
        "valor_constituido_total" => 1000.0,
        "valor_bloqueado" => 0.0,
        "indicador_oneracao" => 1i64,
        "regra_divisao" => Value::code("1"),
        "valor_onerado" => 1000.0,
        "protocolo" => "PROT1",
        "data_hora_evento" => Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap(),
        "status_operacao" => Value::code("0"),
        "valor_constituido_efeito" => 1000.0,
    };
    let tokens = RecordEncoder::encode(&record, &schema).unwrap();
    assert_eq!(tokens.len(), 7);
    assert_eq!(
        tokens[6],
        "EF1;2024-03-15;11222333000181;1;1000.00;0.00;1;1;1000.00;PROT1;2024-03-15T10:30:00Z;0;;;1000.00;\
         12345678901;CC;001;12345678;1234;123456-7;Titular da Conta"
    );

    let parts = ListEncoder::split(&tokens[6], schema.list_field("contas").unwrap());
    assert_eq!(parts.head.len(), 15);
    let account = vec![
        "12345678901",
        "CC",
        "001",
        "12345678",
        "1234",
        "123456-7",
        "Titular da Conta",
    ];
    assert_eq!(parts.groups, vec![account]);
}

#[test]
fn test_ap008_missing_head_field() {
    let schema = Layout::Ap008.schema().unwrap();
    let record = record! {
        "referencia_externa" => "REF_000008",
        "identificador_contrato" => "CONTRATO_1",
        "entidade_registradora" => Value::identifier("12345678000195"),
        "instituicao_credenciadora" => Value::identifier("98765432000110"),
        "usuario_final_recebedor" => Value::identifier("11222333000181"),
        "arranjo_pagamento" => Value::code("VCC"),
    };
    let err = RecordEncoder::encode(&record, &schema).unwrap_err();
    assert!(matches!(
        err,
        RecordError::SchemaMismatch { ref field, .. } if field == "identificador_efeito_contrato"
    ));
}

#[test]
fn test_ap012_counts() {
    let schema = Layout::Ap012.schema().unwrap();
    let record = record! {
        "referencia_externa" => "REF_000012",
        "data_referencia" => day(2024, 3, 1),
        "participante" => Value::identifier("12345678000195"),
        "detentor" => Value::identifier("98765432000110"),
        "tipo_efeito" => Value::code("2"),
        "modalidade_operacao" => Value::code("3"),
        "quantidade_contratos" => 12i64,
        "quantidade_contratantes" => 4i64,
        "saldo_devedor_total" => 98765.432,
        "carteira" => "Carteira1",
    };
    assert_eq!(
        to_line(&schema, &record).unwrap(),
        "REF_000012;2024-03-01;12345678000195;98765432000110;2;3;12;4;98765.43;Carteira1\r\n"
    );
}

#[test]
fn test_ap023_optional_institution() {
    let schema = Layout::Ap023.schema().unwrap();
    let record = record! {
        "referencia_externa" => "REF_000023",
        "data_referencia" => day(2024, 3, 1),
        "solicitante" => Value::identifier("12345678000195"),
        "financiador" => Value::identifier("98765432000110"),
        "quantidade_optins_ativos" => 3i64,
        "carteira" => "Carteira1",
    };
    assert_eq!(
        to_line(&schema, &record).unwrap(),
        "REF_000023;2024-03-01;12345678000195;98765432000110;;3;Carteira1\r\n"
    );
}

#[test]
fn test_identifier_overflow_names_the_field() {
    let schema = Layout::Ap006.schema().unwrap();
    let record = record! {
        "referencia_externa" => "REF_000006",
        "protocolo_optin" => "OPTIN_1",
        "solicitante" => Value::identifier("123456789012345"),
        "carteira" => "Carteira1",
    };
    let err = RecordEncoder::encode(&record, &schema).unwrap_err();
    assert_eq!(
        err,
        RecordError::Format {
            field: "solicitante".to_string(),
            record: "REF_000006".to_string(),
            source: FormatError::Overflow { width: 14, len: 15 },
        }
    );
}

#[test]
fn test_ap004_accreditors_padded_to_cnpj_width() {
    let schema = Layout::Ap004.schema().unwrap();
    let tokens = RecordEncoder::encode(
        &record! {
            "tipo_operacao" => Value::code("A"),
            "referencia_externa" => "REF_000044",
            "solicitante" => Value::identifier("12345678000195"),
            "financiador" => Value::identifier("98765432000110"),
            "credenciadoras" => vec![
                sub_record! { "cnpj" => Value::identifier("1") },
                sub_record! { "cnpj" => Value::identifier("11111111000111") },
            ],
            "usuario_final_recebedor" => Value::identifier("11222333000181"),
            "data_assinatura" => day(2024, 1, 10),
            "data_inicio" => day(2024, 1, 11),
        },
        &schema,
    )
    .unwrap();
    assert_eq!(tokens[4], "00000000000001|11111111000111");
}
