//! CSV export of movement listings and movement details.
//!
//! Files start with a UTF-8 byte order mark so spreadsheet tools pick the
//! right encoding for accented headers.

use std::io::Write;

use csv::WriterBuilder;
use gestion_shared::types::round_currency;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::movement::{MovementLineRecord, MovementSummary};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Column headers of the movement listing.
pub const SUMMARY_HEADERS: [&str; 8] = [
    "ID", "Fecha", "Cliente", "Empresa", "Banco", "Débito", "Crédito", "Estado",
];

/// Column headers of a movement's detail.
pub const DETAIL_HEADERS: [&str; 6] = [
    "Cuenta",
    "Descripción",
    "Débito",
    "Crédito",
    "Notas",
    "Archivo",
];

/// Export failures.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV encoding failed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Writing to the sink failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn amount(value: Decimal) -> String {
    format!("{:.2}", round_currency(value))
}

/// Writes the movement listing as CSV rows to `writer`.
pub fn write_movements<W: Write>(rows: &[MovementSummary], writer: W) -> Result<(), ExportError> {
    let mut wrt = WriterBuilder::new().from_writer(writer);
    wrt.write_record(SUMMARY_HEADERS)?;
    for row in rows {
        wrt.write_record([
            row.id.to_string(),
            row.date.format("%Y-%m-%d").to_string(),
            row.client.clone(),
            row.company.clone(),
            row.bank.clone(),
            amount(row.total_debit),
            amount(row.total_credit),
            row.status.to_string(),
        ])?;
    }
    wrt.flush()?;
    Ok(())
}

/// Writes a movement's lines as CSV rows to `writer`.
pub fn write_lines<W: Write>(lines: &[MovementLineRecord], writer: W) -> Result<(), ExportError> {
    let mut wrt = WriterBuilder::new().from_writer(writer);
    wrt.write_record(DETAIL_HEADERS)?;
    for line in lines {
        wrt.write_record([
            line.account_label.as_str(),
            line.description.as_str(),
            amount(line.debit).as_str(),
            amount(line.credit).as_str(),
            line.notes.as_str(),
            line.attachment.as_deref().unwrap_or_default(),
        ])?;
    }
    wrt.flush()?;
    Ok(())
}

/// The movement listing as a BOM-prefixed CSV file.
pub fn movements_csv(rows: &[MovementSummary]) -> Result<Vec<u8>, ExportError> {
    let mut buf = UTF8_BOM.to_vec();
    write_movements(rows, &mut buf)?;
    tracing::debug!(rows = rows.len(), bytes = buf.len(), "Exported movement listing");
    Ok(buf)
}

/// A movement's detail as a BOM-prefixed CSV file.
pub fn lines_csv(lines: &[MovementLineRecord]) -> Result<Vec<u8>, ExportError> {
    let mut buf = UTF8_BOM.to_vec();
    write_lines(lines, &mut buf)?;
    Ok(buf)
}
