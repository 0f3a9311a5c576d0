//! Ordered parallel encoding of a large batch into a file.
//!
//! Run with: cargo run --example parallel_batch

use cerc_layout::layouts::Layout;
use cerc_layout::{pipeline, record, Record, Sink, Value, WriteSink};
use chrono::NaiveDate;
use std::error::Error;
use std::fs::File;
use std::io::BufWriter;

fn ap012(i: usize, date: NaiveDate) -> Record {
    let record = record! {
        "referencia_externa" => format!("REF_{i:06}"),
        "data_referencia" => date,
        "participante" => Value::identifier("12345678000195"),
        "detentor" => Value::identifier("98765432000110"),
        "tipo_efeito" => Value::code("2"),
        "modalidade_operacao" => Value::code("3"),
        "quantidade_contratos" => (i % 40) as i64,
        "quantidade_contratantes" => (i % 7) as i64,
        "saldo_devedor_total" => 1000.0 + i as f64 * 0.37,
        "carteira" => "Carteira1",
    };
    // Every thousandth record carries an oversized document and is rejected
    if i % 1000 == 999 {
        record.with("detentor", Value::identifier("123456789012345"))
    } else {
        record
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let schema = Layout::Ap012.schema()?;
    let date = NaiveDate::from_ymd_opt(2024, 3, 1).ok_or("invalid date")?;
    let records: Vec<Record> = (0..10_000).map(|i| ap012(i, date)).collect();

    let path = std::env::temp_dir().join("CERC-AP012_example.csv");
    let mut sink = WriteSink::new(BufWriter::new(File::create(&path)?));
    let report = pipeline::write_batch(&schema, &records, &mut sink)?;
    sink.flush()?;

    println!("Wrote {} lines to {}", report.written, path.display());
    for err in &report.rejected {
        println!("  rejected: {err}");
    }

    // Streaming a source in chunks keeps memory bounded
    let mut source = (0..2_500).map(|i| ap012(i, date));
    let mut buffer = cerc_layout::LineBuffer::new();
    let report = pipeline::drain(&schema, &mut source, &mut buffer, 512)?;
    println!(
        "✓ Drained {} records: {} written, {} rejected",
        report.total(),
        report.written,
        report.rejected.len()
    );

    std::fs::remove_file(&path)?;
    Ok(())
}
