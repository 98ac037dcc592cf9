//! CSV export for transaction ledgers

use std::io::Write;

use crate::error::{Error, Result};
use crate::models::Transaction;

/// Write transactions as CSV to any writer
pub fn write_transactions_csv<W: Write>(writer: W, transactions: &[Transaction]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record([
        "date",
        "description",
        "amount",
        "category",
        "type",
        "payment_method",
        "notes",
    ])?;

    for tx in transactions {
        csv_writer.write_record([
            tx.date.format("%Y-%m-%d %H:%M:%S").to_string(),
            tx.description.clone(),
            format!("{:.2}", tx.amount),
            tx.category.as_str().to_string(),
            tx.kind.as_str().to_string(),
            tx.payment_method.as_str().to_string(),
            tx.notes.clone().unwrap_or_default(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Render transactions as a CSV string
pub fn transactions_to_csv(transactions: &[Transaction]) -> Result<String> {
    let mut buf = Vec::new();
    write_transactions_csv(&mut buf, transactions)?;
    String::from_utf8(buf).map_err(|e| Error::InvalidData(format!("CSV was not UTF-8: {}", e)))
}
