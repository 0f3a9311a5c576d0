/// Builds a [`Record`](crate::Record) from `name => value` pairs.
///
/// Values go through `Into<Entry>`: plain values become scalars, a
/// `Vec<SubRecord>` becomes a list field.
///
/// ```rust
/// use cerc_layout::{record, sub_record, Value};
///
/// let record = record! {
///     "referencia_externa" => "REF_000001",
///     "valor_livre" => 1500.0,
///     "pagamentos" => vec![sub_record! { "ispb" => Value::identifier("1") }],
/// };
/// assert_eq!(record.len(), 3);
/// ```
#[macro_export]
macro_rules! record {
    () => {
        $crate::Record::new()
    };

    ($($name:literal => $value:expr),+ $(,)?) => {{
        let mut record = $crate::Record::new();
        $(
            record.insert($name, $value);
        )+
        record
    }};
}

/// Builds a [`SubRecord`](crate::SubRecord) from `name => value` pairs.
#[macro_export]
macro_rules! sub_record {
    () => {
        $crate::SubRecord::new()
    };

    ($($name:literal => $value:expr),+ $(,)?) => {{
        let mut group = $crate::SubRecord::new();
        $(
            group.insert($name, $value);
        )+
        group
    }};
}

#[cfg(test)]
mod tests {
    use crate::{Entry, Record, SubRecord, Value};
    use chrono::NaiveDate;

    #[test]
    fn test_record_macro_empty() {
        assert_eq!(record! {}, Record::new());
        assert_eq!(sub_record! {}, SubRecord::new());
    }

    #[test]
    fn test_record_macro_scalars() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let record = record! {
            "carteira" => "Carteira1",
            "quantidade" => 3i64,
            "data" => date,
        };
        assert_eq!(record.scalar("carteira"), Some(&Value::from("Carteira1")));
        assert_eq!(record.scalar("quantidade"), Some(&Value::Integer(3)));
        assert_eq!(record.scalar("data"), Some(&Value::Date(date)));
    }

    #[test]
    fn test_record_macro_lists_keep_order() {
        let record = record! {
            "contas" => vec![
                sub_record! { "conta" => "1" },
                sub_record! { "conta" => "2" },
            ],
        };
        match record.get("contas") {
            Some(Entry::List(groups)) => {
                assert_eq!(groups.len(), 2);
                assert_eq!(groups[1].get("conta"), Some(&Value::from("2")));
            }
            _ => panic!("Expected list"),
        }
    }
}
