//! The CERC record-type catalogue.
//!
//! Each exchange file type is one [`LayoutSchema`]: field order, widths and the
//! empty-list defaults of the historical generators. All of them use
//! [`LayoutOptions::cerc`] (`;` between fields, `|` between groups, `;` inside a
//! group) and key records by `referencia_externa`.
//!
//! | Layout | Content |
//! |--------|---------|
//! | AP001 | participant registration |
//! | AP002 | receivable unit registration with payment instructions |
//! | AP003 | anticipation settlement |
//! | AP004 | opt-in request |
//! | AP005 | receivable agenda with payment instructions |
//! | AP006 | opt-out request |
//! | AP008 | contract effects with account groups |
//! | AP010 | agenda query |
//! | AP012 | contract position |
//! | AP023 | active opt-in position |
//!
//! ## Examples
//!
//! ```rust
//! use cerc_layout::layouts::Layout;
//!
//! let layout: Layout = "ap006".parse().unwrap();
//! let schema = layout.schema().unwrap();
//! assert_eq!(schema.name(), "CERC-AP006");
//! assert_eq!(schema.len(), 4);
//! ```

use crate::schema::{FieldKind, FieldSpec, LayoutSchema, ListFieldSpec};
use crate::{Error, LayoutOptions, SchemaError, SubRecord, Value};
use std::fmt;
use std::str::FromStr;

const KEY: &str = "referencia_externa";

/// A CERC record type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layout {
    Ap001,
    Ap002,
    Ap003,
    Ap004,
    Ap005,
    Ap006,
    Ap008,
    Ap010,
    Ap012,
    Ap023,
}

impl Layout {
    pub const ALL: [Layout; 10] = [
        Layout::Ap001,
        Layout::Ap002,
        Layout::Ap003,
        Layout::Ap004,
        Layout::Ap005,
        Layout::Ap006,
        Layout::Ap008,
        Layout::Ap010,
        Layout::Ap012,
        Layout::Ap023,
    ];

    /// Short code, e.g. `AP002`.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Layout::Ap001 => "AP001",
            Layout::Ap002 => "AP002",
            Layout::Ap003 => "AP003",
            Layout::Ap004 => "AP004",
            Layout::Ap005 => "AP005",
            Layout::Ap006 => "AP006",
            Layout::Ap008 => "AP008",
            Layout::Ap010 => "AP010",
            Layout::Ap012 => "AP012",
            Layout::Ap023 => "AP023",
        }
    }

    /// Schema name, e.g. `CERC-AP002`.
    #[must_use]
    pub fn name(self) -> String {
        format!("CERC-{}", self.code())
    }

    /// Builds the layout's schema.
    pub fn schema(self) -> Result<LayoutSchema, SchemaError> {
        let builder = LayoutSchema::builder(self.name())
            .options(LayoutOptions::cerc())
            .key_field(KEY);
        let builder = match self {
            Layout::Ap001 => builder
                .field(FieldSpec::required("tipo_operacao", FieldKind::codes(["C", "A", "I"])))
                .field(text(KEY))
                .field(id14("cnpj"))
                .field(text("razao_social"))
                .field(text("nome_fantasia")),
            Layout::Ap002 => builder
                .field(FieldSpec::required("tipo_operacao", FieldKind::codes(["C", "A"])))
                .field(text(KEY))
                .field(id14("cnpj_credenciadora"))
                .field(id14("cnpj_participante"))
                .field(document("usuario_final_recebedor"))
                .field(code("arranjo_pagamento"))
                .field(date("data_liquidacao"))
                .field(document("titular"))
                .field(amount("valor_constituido_total"))
                .field(amount("valor_bloqueado"))
                .field(amount("valor_livre"))
                .field(amount("valor_onerado"))
                .field(amount("valor_disponivel"))
                .field(amount("valor_transacao"))
                .list(
                    ListFieldSpec::new("pagamentos", settlement_payment_fields())
                        .with_default(|| default_payment("12345678901", "12345678"))
                        .inherit_default("valor_a_pagar", "valor_transacao"),
                )
                .field(text("carteira")),
            Layout::Ap003 => builder
                .field(text(KEY))
                .field(date("data_liquidacao_prevista"))
                .field(document("titular"))
                .field(document("usuario_final_recebedor"))
                .field(id14("credenciadora"))
                .field(code("arranjo_pagamento"))
                .field(date("data_liquidacao_efetiva"))
                .field(amount("valor_antecipado"))
                .field(document("titular_conta"))
                .field(code("tipo_conta"))
                .field(FieldSpec::required("ispb", FieldKind::Identifier { width: 8 }))
                .field(text("agencia"))
                .field(text("numero_conta"))
                .field(amount("valor_pago")),
            Layout::Ap004 => builder
                .field(FieldSpec::required("tipo_operacao", FieldKind::codes(["C", "A"])))
                .field(text(KEY))
                .field(id14("solicitante"))
                .field(id14("financiador"))
                .list(ListFieldSpec::new("credenciadoras", vec![id14("cnpj")]).allow_empty())
                .field(id14("usuario_final_recebedor"))
                .list(
                    ListFieldSpec::new("arranjos_pagamento", vec![code("arranjo")]).allow_empty(),
                )
                .field(date("data_assinatura"))
                .field(date("data_inicio"))
                .field(FieldSpec::optional("data_fim", FieldKind::Date))
                .field(FieldSpec::optional("titular", FieldKind::Identifier { width: 14 }))
                .field(FieldSpec::optional("carteira", FieldKind::Text))
                .field(FieldSpec::optional("protocolo", FieldKind::Text))
                .field(FieldSpec::optional(
                    "instituicao_recebedora_agenda",
                    FieldKind::Identifier { width: 14 },
                )),
            Layout::Ap005 => builder
                .field(text(KEY))
                .field(id14("entidade_registradora"))
                .field(id14("credenciadora"))
                .field(document("usuario_final_recebedor"))
                .field(code("arranjo_pagamento"))
                .field(date("data_liquidacao"))
                .field(document("titular"))
                .field(code("constituicao"))
                .field(amount("valor_constituido_total"))
                .field(amount("valor_constituido_antecipacao"))
                .field(amount("valor_bloqueado"))
                .list(
                    ListFieldSpec::new("pagamentos", agenda_payment_fields()).with_default(|| {
                        default_payment("11111111111", "00000001")
                            .with("tipo_informacao_pagamento", Value::code("7"))
                    })
                    .inherit_default("valor_a_pagar", "valor_constituido_total"),
                )
                .field(text("carteira"))
                .field(amount("valor_livre"))
                .field(amount("valor_total_ur"))
                .field(FieldSpec::required(
                    "data_hora_ultima_atualizacao",
                    FieldKind::Timestamp,
                )),
            Layout::Ap006 => builder
                .field(text(KEY))
                .field(text("protocolo_optin"))
                .field(id14("solicitante"))
                .field(text("carteira")),
            Layout::Ap008 => builder
                .field(text(KEY))
                .field(text("identificador_contrato"))
                .field(id14("entidade_registradora"))
                .field(id14("instituicao_credenciadora"))
                .field(id14("usuario_final_recebedor"))
                .field(code("arranjo_pagamento"))
                .list(
                    ListFieldSpec::new("contas", account_fields())
                        .with_head(effect_fields())
                        .with_default(default_account),
                ),
            Layout::Ap010 => builder
                .field(text(KEY))
                .field(date("data_referencia"))
                .field(id14("credenciadora"))
                .field(document("usuario_final_recebedor"))
                .field(code("arranjo_pagamento"))
                .field(date("data_liquidacao"))
                .field(document("titular")),
            Layout::Ap012 => builder
                .field(text(KEY))
                .field(date("data_referencia"))
                .field(id14("participante"))
                .field(id14("detentor"))
                .field(FieldSpec::required("tipo_efeito", FieldKind::codes(["1", "2", "3", "4"])))
                .field(FieldSpec::required(
                    "modalidade_operacao",
                    FieldKind::codes(["1", "2", "3"]),
                ))
                .field(FieldSpec::required("quantidade_contratos", FieldKind::Integer))
                .field(FieldSpec::required("quantidade_contratantes", FieldKind::Integer))
                .field(amount("saldo_devedor_total"))
                .field(text("carteira")),
            Layout::Ap023 => builder
                .field(text(KEY))
                .field(date("data_referencia"))
                .field(id14("solicitante"))
                .field(id14("financiador"))
                .field(FieldSpec::optional(
                    "instituicao_recebedora_agenda",
                    FieldKind::Identifier { width: 14 },
                ))
                .field(FieldSpec::required("quantidade_optins_ativos", FieldKind::Integer))
                .field(text("carteira")),
        };
        builder.build()
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Layout {
    type Err = Error;

    /// Accepts `AP002`, `ap002` or `CERC-AP002`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let code = upper.strip_prefix("CERC-").unwrap_or(&upper);
        Layout::ALL
            .into_iter()
            .find(|layout| layout.code() == code)
            .ok_or_else(|| Error::config(format!("unknown layout {s:?}")))
    }
}

fn text(name: &str) -> FieldSpec {
    FieldSpec::required(name, FieldKind::Text)
}

fn id14(name: &str) -> FieldSpec {
    FieldSpec::required(name, FieldKind::Identifier { width: 14 })
}

fn document(name: &str) -> FieldSpec {
    FieldSpec::required(name, FieldKind::Document)
}

fn amount(name: &str) -> FieldSpec {
    FieldSpec::required(name, FieldKind::decimal())
}

fn date(name: &str) -> FieldSpec {
    FieldSpec::required(name, FieldKind::Date)
}

fn code(name: &str) -> FieldSpec {
    FieldSpec::required(name, FieldKind::any_code())
}

/// Bank account prefix shared by every payment and account group.
fn bank_account_fields() -> Vec<FieldSpec> {
    vec![
        document("numero_documento_titular"),
        FieldSpec::optional("tipo_conta", FieldKind::any_code()).with_default(Value::code("CC")),
        FieldSpec::optional("compe", FieldKind::Identifier { width: 3 }),
        FieldSpec::required("ispb", FieldKind::Identifier { width: 8 }),
        text("agencia"),
        text("numero_conta"),
    ]
}

fn payment_fields() -> Vec<FieldSpec> {
    let mut fields = bank_account_fields();
    fields.extend([
        amount("valor_a_pagar"),
        FieldSpec::optional("beneficiario", FieldKind::Document),
        FieldSpec::optional("data_liquidacao_efetiva", FieldKind::Date),
        FieldSpec::optional("valor_liquidacao_efetiva", FieldKind::decimal()),
    ]);
    fields
}

/// AP002 payment group: the shared payment fields plus the non-payment reason.
fn settlement_payment_fields() -> Vec<FieldSpec> {
    let mut fields = payment_fields();
    fields.push(FieldSpec::optional("motivo_nao_pagamento", FieldKind::Text));
    fields
}

fn agenda_payment_fields() -> Vec<FieldSpec> {
    let mut fields = payment_fields();
    fields.extend([
        FieldSpec::optional("regra_divisao", FieldKind::codes(["1", "2"])),
        FieldSpec::optional("valor_onerado", FieldKind::decimal()),
        FieldSpec::optional("tipo_informacao_pagamento", FieldKind::any_code())
            .with_default(Value::code("7")),
        FieldSpec::optional("indicador_ordem_efeito", FieldKind::Integer),
        FieldSpec::optional("valor_constituido_efeito", FieldKind::decimal()),
        FieldSpec::optional("identificador_contrato_cerc", FieldKind::Text),
    ]);
    fields
}

fn default_payment(documento: &str, ispb: &str) -> SubRecord {
    SubRecord::new()
        .with("numero_documento_titular", Value::identifier(documento))
        .with("tipo_conta", Value::code("CC"))
        .with("compe", Value::identifier("001"))
        .with("ispb", Value::identifier(ispb))
        .with("agencia", "1234")
        .with("numero_conta", "123456-7")
        .with("valor_a_pagar", 0.0)
}

/// AP008 contract effect, rendered once ahead of the account groups.
fn effect_fields() -> Vec<FieldSpec> {
    vec![
        text("identificador_efeito_contrato"),
        date("data_liquidacao"),
        id14("titular_ur"),
        code("constituicao_ur"),
        amount("valor_constituido_total"),
        amount("valor_bloqueado"),
        FieldSpec::required("indicador_oneracao", FieldKind::Integer),
        FieldSpec::required("regra_divisao", FieldKind::codes(["1", "2"])),
        amount("valor_onerado"),
        text("protocolo"),
        FieldSpec::required("data_hora_evento", FieldKind::Timestamp),
        FieldSpec::required("status_operacao", FieldKind::codes(["0", "1"])),
        FieldSpec::optional("codigo_erro", FieldKind::Text),
        FieldSpec::optional("descricao_erro", FieldKind::Text),
        amount("valor_constituido_efeito"),
    ]
}

fn account_fields() -> Vec<FieldSpec> {
    let mut fields = bank_account_fields();
    fields.push(text("nome_titular"));
    fields
}

fn default_account() -> SubRecord {
    SubRecord::new()
        .with("numero_documento_titular", Value::identifier("12345678901"))
        .with("tipo_conta", Value::code("CC"))
        .with("compe", Value::identifier("001"))
        .with("ispb", Value::identifier("12345678"))
        .with("agencia", "1234")
        .with("numero_conta", "123456-7")
        .with("nome_titular", "Titular da Conta")
}
