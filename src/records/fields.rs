//! Field-level codecs: `YYYYMMDD` dates, comma decimals, optional
//! references and `"1"`/`""` flags.

use std::fmt::Display;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::error::{CollmexError, Result};
use crate::wire::{self, Row};

/// Parse a `YYYYMMDD` date. The empty string means "no date".
pub fn parse_date(value: &str) -> std::result::Result<Option<NaiveDate>, String> {
    if value.is_empty() {
        return Ok(None);
    }
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err("expected YYYYMMDD".into());
    }
    let year: i32 = value[..4].parse().map_err(|_| "bad year".to_string())?;
    let month: u32 = value[4..6].parse().map_err(|_| "bad month".to_string())?;
    let day: u32 = value[6..].parse().map_err(|_| "bad day".to_string())?;
    NaiveDate::from_ymd_opt(year, month, day)
        .map(Some)
        .ok_or_else(|| "no such calendar date".into())
}

/// Format a date as `YYYYMMDD`, `""` for `None`.
pub fn format_date(value: Option<NaiveDate>) -> String {
    match value {
        Some(d) => format!("{:04}{:02}{:02}", d.year(), d.month(), d.day()),
        None => String::new(),
    }
}

/// Parse a decimal with comma as fractional separator (`"1234,56"`).
/// The empty string means "no value", which is distinct from zero.
pub fn parse_decimal(value: &str) -> std::result::Result<Option<Decimal>, String> {
    if value.is_empty() {
        return Ok(None);
    }
    Decimal::from_str(&value.replace(',', "."))
        .map(Some)
        .map_err(|e| e.to_string())
}

/// Format a decimal with comma separator, keeping its scale; `""` for `None`.
pub fn format_decimal(value: Option<Decimal>) -> String {
    match value {
        Some(d) => d.to_string().replace('.', ","),
        None => String::new(),
    }
}

/// Positional reader over one response row. Missing trailing fields read as `""`.
pub(crate) struct FieldReader<'a> {
    record: &'static str,
    row: &'a [String],
}

impl<'a> FieldReader<'a> {
    pub fn new(record: &'static str, row: &'a [String]) -> Self {
        Self { record, row }
    }

    fn raw(&self, idx: usize) -> &'a str {
        wire::field(self.row, idx)
    }

    fn invalid(&self, idx: usize, reason: impl Into<String>) -> CollmexError {
        CollmexError::Field {
            record: self.record,
            index: idx,
            value: self.raw(idx).to_string(),
            reason: reason.into(),
        }
    }

    pub fn text(&self, idx: usize) -> String {
        self.raw(idx).to_string()
    }

    pub fn text_or(&self, idx: usize, default: &str) -> String {
        match self.raw(idx) {
            "" => default.to_string(),
            v => v.to_string(),
        }
    }

    /// Optional integer: `""` is `None`, `"0"` is `Some(0)`.
    pub fn opt_int<T>(&self, idx: usize) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.raw(idx) {
            "" => Ok(None),
            v => v
                .parse::<T>()
                .map(Some)
                .map_err(|e| self.invalid(idx, e.to_string())),
        }
    }

    pub fn int_or<T>(&self, idx: usize, default: T) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        Ok(self.opt_int(idx)?.unwrap_or(default))
    }

    pub fn decimal(&self, idx: usize) -> Result<Option<Decimal>> {
        parse_decimal(self.raw(idx)).map_err(|e| self.invalid(idx, e))
    }

    pub fn date(&self, idx: usize) -> Result<Option<NaiveDate>> {
        parse_date(self.raw(idx)).map_err(|e| self.invalid(idx, e))
    }

    /// `""` and `"0"` are false, anything else is true.
    pub fn flag(&self, idx: usize) -> bool {
        !matches!(self.raw(idx), "" | "0")
    }
}

/// Positional row builder. Each call names the index it writes so a layout
/// drift shows up as a failed assertion instead of a shifted field.
pub(crate) struct RowWriter {
    fields: Row,
}

impl RowWriter {
    pub fn new(record_type: &str) -> Self {
        Self {
            fields: vec![record_type.to_string()],
        }
    }

    fn push(&mut self, idx: usize, value: String) -> &mut Self {
        debug_assert_eq!(idx, self.fields.len(), "field written out of order");
        self.fields.push(value);
        self
    }

    pub fn text(&mut self, idx: usize, value: &str) -> &mut Self {
        self.push(idx, value.to_string())
    }

    pub fn int(&mut self, idx: usize, value: impl Display) -> &mut Self {
        self.push(idx, value.to_string())
    }

    /// `None` is written as `""`, never as `"0"`.
    pub fn opt_int<T: Display>(&mut self, idx: usize, value: Option<T>) -> &mut Self {
        self.push(idx, value.map(|v| v.to_string()).unwrap_or_default())
    }

    pub fn decimal(&mut self, idx: usize, value: Option<Decimal>) -> &mut Self {
        self.push(idx, format_decimal(value))
    }

    pub fn date(&mut self, idx: usize, value: Option<NaiveDate>) -> &mut Self {
        self.push(idx, format_date(value))
    }

    /// `"1"` for true, `""` for false.
    pub fn flag(&mut self, idx: usize, value: bool) -> &mut Self {
        self.push(idx, if value { "1" } else { "" }.to_string())
    }

    pub fn finish(&mut self) -> Row {
        std::mem::take(&mut self.fields)
    }
}
