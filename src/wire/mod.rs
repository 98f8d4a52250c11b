//! Wire format of the Collmex data exchange interface.
//!
//! Requests and responses are semicolon-separated CSV in windows-1252.
//! Each line is a [`Row`] whose first field names the record type or command.
//!
//! ```
//! use collmex::wire;
//!
//! let rows = vec![vec!["VENDOR_GET".to_string(), "".into(), "1".into()]];
//! let bytes = wire::encode(&rows).unwrap();
//! assert_eq!(bytes, b"\"VENDOR_GET\";\"\";\"1\"\r\n");
//! assert_eq!(wire::decode(&bytes).unwrap(), rows);
//! ```

pub mod cp1252;
mod transcoder;

pub use transcoder::{DELIMITER, QUOTE, decode, encode};

/// One CSV line: ordered string fields, field 0 is the discriminator.
pub type Row = Vec<String>;

/// Field `idx` of a row, or `""` when the row is shorter.
pub fn field(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

/// The discriminator of a row, `""` for an empty row.
pub fn discriminator(row: &[String]) -> &str {
    field(row, 0)
}
