//! Semicolon CSV framing under code page 1252.

use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};

use super::{Row, cp1252};
use crate::error::{CollmexError, Result};

pub const DELIMITER: u8 = b';';
pub const QUOTE: u8 = b'"';

/// Serialize rows as windows-1252 CSV: every field quoted, `;` between
/// fields, CRLF after every row.
///
/// Fails with [`CollmexError::Encoding`] on the first character the code
/// page cannot represent; nothing is written in that case.
pub fn encode(rows: &[Row]) -> Result<Vec<u8>> {
    for (r, row) in rows.iter().enumerate() {
        for (f, field) in row.iter().enumerate() {
            if let Some(character) = field.chars().find(|c| cp1252::encode_char(*c).is_none()) {
                return Err(CollmexError::Encoding {
                    character,
                    row: r,
                    field: f,
                });
            }
        }
    }

    let mut writer = WriterBuilder::new()
        .delimiter(DELIMITER)
        .quote(QUOTE)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::CRLF)
        .has_headers(false)
        .flexible(true)
        .from_writer(Vec::new());
    for row in rows {
        writer
            .write_record(row)
            .map_err(|e| CollmexError::Io(e.into()))?;
    }
    let utf8 = writer
        .into_inner()
        .map_err(|e| CollmexError::Io(e.into_error()))?;
    let text = String::from_utf8(utf8)
        .map_err(|e| CollmexError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;

    text.chars()
        .map(|c| {
            cp1252::encode_char(c).ok_or(CollmexError::Encoding {
                character: c,
                row: 0,
                field: 0,
            })
        })
        .collect()
}

/// Parse a windows-1252 CSV payload into rows.
///
/// A doubled quote inside a quoted field yields one literal quote. Rows keep
/// whatever number of fields they arrived with; blank lines are skipped.
pub fn decode(data: &[u8]) -> Result<Vec<Row>> {
    let text = cp1252::decode(data).map_err(|offset| {
        CollmexError::Decoding(format!(
            "undefined windows-1252 byte {:#04x} at offset {offset}",
            data[offset]
        ))
    })?;
    check_quotes_closed(&text)?;

    let mut reader = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .quote(QUOTE)
        .double_quote(true)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| CollmexError::Decoding(e.to_string()))?;
        rows.push(record.iter().map(String::from).collect());
    }
    Ok(rows)
}

/// The CSV reader silently runs an open quote to end of input; reject that.
fn check_quotes_closed(text: &str) -> Result<()> {
    let mut chars = text.char_indices().peekable();
    let mut field_start = true;
    let mut opened_at = None;

    while let Some((pos, c)) = chars.next() {
        if opened_at.is_some() {
            if c == '"' {
                if matches!(chars.peek(), Some((_, '"'))) {
                    chars.next();
                } else {
                    opened_at = None;
                }
            }
            continue;
        }
        match c {
            '"' if field_start => {
                opened_at = Some(pos);
                field_start = false;
            }
            ';' | '\r' | '\n' => field_start = true,
            _ => field_start = false,
        }
    }

    match opened_at {
        Some(pos) => Err(CollmexError::Decoding(format!(
            "unterminated quoted field starting at offset {pos}"
        ))),
        None => Ok(()),
    }
}
