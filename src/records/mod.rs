//! Record codecs: positional mapping between rows and typed entities.
//!
//! Every record type has a fixed field layout keyed by its discriminator.
//! Layouts only ever grow at the end; existing indices never move.
//!
//! | Discriminator | Type | Fields |
//! |---------------|------|--------|
//! | `CMXLIF` | [`Vendor`] | 29 |
//! | `CMXLRN` | [`VendorInvoice`] | 21 |
//! | `OPEN_ITEM` | [`OpenItem`] | 20 |
//! | `ACCDOC` | [`AccountingDocument`] | 28 |
//! | `MESSAGE` | [`Message`] | 5 |
//!
//! Money is [`rust_decimal::Decimal`], never floating point.

mod accdoc;
mod fields;
mod message;
mod open_item;
mod vendor;
mod vendor_invoice;

pub use accdoc::AccountingDocument;
pub use fields::{format_date, format_decimal, parse_date, parse_decimal};
pub use message::{MESSAGE_RECORD_TYPE, Message, Severity};
pub use open_item::OpenItem;
pub use vendor::{OutputMedium, Vendor};
pub use vendor_invoice::VendorInvoice;

use crate::error::Result;
use crate::wire::{self, Row};

/// An entity with a fixed positional layout under one discriminator.
pub trait CollmexRecord: Sized {
    /// Discriminator in field 0.
    const RECORD_TYPE: &'static str;
    /// Field names in wire order, field 0 included.
    const LAYOUT: &'static [&'static str];

    /// Decode a row. Missing trailing fields read as empty.
    fn from_row(row: &[String]) -> Result<Self>;

    /// Encode into exactly `LAYOUT.len()` fields.
    fn to_row(&self) -> Row;

    /// True if the row carries this record type.
    fn matches(row: &[String]) -> bool {
        wire::discriminator(row) == Self::RECORD_TYPE
    }
}

/// Decode every row carrying `T`'s discriminator, skipping all others.
pub fn decode_all<T: CollmexRecord>(rows: &[Row]) -> Result<Vec<T>> {
    rows.iter()
        .filter(|r| T::matches(r))
        .map(|r| T::from_row(r))
        .collect()
}

/// Any record kind this crate understands.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Vendor(Vendor),
    VendorInvoice(VendorInvoice),
    OpenItem(OpenItem),
    AccountingDocument(AccountingDocument),
    Message(Message),
}

impl Record {
    /// Dispatch on the discriminator. Empty rows and unknown record types
    /// yield `Ok(None)`.
    pub fn parse(row: &[String]) -> Result<Option<Self>> {
        let record = match wire::discriminator(row) {
            Vendor::RECORD_TYPE => Self::Vendor(Vendor::from_row(row)?),
            VendorInvoice::RECORD_TYPE => Self::VendorInvoice(VendorInvoice::from_row(row)?),
            OpenItem::RECORD_TYPE => Self::OpenItem(OpenItem::from_row(row)?),
            AccountingDocument::RECORD_TYPE => {
                Self::AccountingDocument(AccountingDocument::from_row(row)?)
            }
            MESSAGE_RECORD_TYPE => Self::Message(Message::from_row(row)?),
            _ => return Ok(None),
        };
        Ok(Some(record))
    }

    pub fn record_type(&self) -> &'static str {
        match self {
            Self::Vendor(_) => Vendor::RECORD_TYPE,
            Self::VendorInvoice(_) => VendorInvoice::RECORD_TYPE,
            Self::OpenItem(_) => OpenItem::RECORD_TYPE,
            Self::AccountingDocument(_) => AccountingDocument::RECORD_TYPE,
            Self::Message(_) => MESSAGE_RECORD_TYPE,
        }
    }

    pub fn to_row(&self) -> Row {
        match self {
            Self::Vendor(r) => r.to_row(),
            Self::VendorInvoice(r) => r.to_row(),
            Self::OpenItem(r) => r.to_row(),
            Self::AccountingDocument(r) => r.to_row(),
            Self::Message(r) => r.to_row(),
        }
    }
}
