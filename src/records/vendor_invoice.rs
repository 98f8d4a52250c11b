use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CollmexRecord;
use super::fields::{FieldReader, RowWriter};
use crate::error::Result;
use crate::wire::Row;

/// Vendor invoice booking (Lieferantenrechnung), record type `CMXLRN`.
///
/// Books an incoming invoice or cash expense. Collmex calculates missing tax
/// amounts and falls back to its default accounts (3200 expense, 1600 payables)
/// for empty account fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorInvoice {
    pub vendor_id: Option<u32>,
    pub company_id: u32,
    pub invoice_date: Option<NaiveDate>,
    /// Vendor's invoice number, unique per vendor.
    pub invoice_number: String,
    /// Net amount at the full VAT rate.
    pub net_amount_full_tax: Option<Decimal>,
    /// Tax at the full rate; calculated by Collmex when empty.
    pub tax_full: Option<Decimal>,
    /// Net amount at the reduced VAT rate.
    pub net_amount_reduced_tax: Option<Decimal>,
    pub tax_reduced: Option<Decimal>,
    /// Account for amounts without tax.
    pub other_account: Option<u32>,
    pub other_amount: Option<Decimal>,
    pub currency: String,
    pub contra_account: Option<u32>,
    /// Credit note: debit and credit are swapped.
    pub is_credit: bool,
    pub booking_text: String,
    pub payment_terms: Option<u32>,
    pub account_full_tax: Option<u32>,
    pub account_reduced_tax: Option<u32>,
    pub is_cancelled: bool,
    pub cost_center: String,
    pub memo: String,
}

impl Default for VendorInvoice {
    fn default() -> Self {
        Self {
            vendor_id: None,
            company_id: 1,
            invoice_date: None,
            invoice_number: String::new(),
            net_amount_full_tax: None,
            tax_full: None,
            net_amount_reduced_tax: None,
            tax_reduced: None,
            other_account: None,
            other_amount: None,
            currency: "EUR".into(),
            contra_account: None,
            is_credit: false,
            booking_text: String::new(),
            payment_terms: None,
            account_full_tax: None,
            account_reduced_tax: None,
            is_cancelled: false,
            cost_center: String::new(),
            memo: String::new(),
        }
    }
}

impl VendorInvoice {
    pub fn new(vendor_id: u32, invoice_number: impl Into<String>, invoice_date: NaiveDate) -> Self {
        Self {
            vendor_id: Some(vendor_id),
            invoice_number: invoice_number.into(),
            invoice_date: Some(invoice_date),
            ..Default::default()
        }
    }
}

impl CollmexRecord for VendorInvoice {
    const RECORD_TYPE: &'static str = "CMXLRN";
    const LAYOUT: &'static [&'static str] = &[
        "record_type",
        "vendor_id",
        "company_id",
        "invoice_date",
        "invoice_number",
        "net_amount_full_tax",
        "tax_full",
        "net_amount_reduced_tax",
        "tax_reduced",
        "other_account",
        "other_amount",
        "currency",
        "contra_account",
        "is_credit",
        "booking_text",
        "payment_terms",
        "account_full_tax",
        "account_reduced_tax",
        "is_cancelled",
        "cost_center",
        "memo",
    ];

    fn from_row(row: &[String]) -> Result<Self> {
        let r = FieldReader::new(Self::RECORD_TYPE, row);
        Ok(Self {
            vendor_id: r.opt_int(1)?,
            company_id: r.int_or(2, 1)?,
            invoice_date: r.date(3)?,
            invoice_number: r.text(4),
            net_amount_full_tax: r.decimal(5)?,
            tax_full: r.decimal(6)?,
            net_amount_reduced_tax: r.decimal(7)?,
            tax_reduced: r.decimal(8)?,
            other_account: r.opt_int(9)?,
            other_amount: r.decimal(10)?,
            currency: r.text_or(11, "EUR"),
            contra_account: r.opt_int(12)?,
            is_credit: r.flag(13),
            booking_text: r.text(14),
            payment_terms: r.opt_int(15)?,
            account_full_tax: r.opt_int(16)?,
            account_reduced_tax: r.opt_int(17)?,
            is_cancelled: r.flag(18),
            cost_center: r.text(19),
            memo: r.text(20),
        })
    }

    fn to_row(&self) -> Row {
        RowWriter::new(Self::RECORD_TYPE)
            .opt_int(1, self.vendor_id)
            .int(2, self.company_id)
            .date(3, self.invoice_date)
            .text(4, &self.invoice_number)
            .decimal(5, self.net_amount_full_tax)
            .decimal(6, self.tax_full)
            .decimal(7, self.net_amount_reduced_tax)
            .decimal(8, self.tax_reduced)
            .opt_int(9, self.other_account)
            .decimal(10, self.other_amount)
            .text(11, &self.currency)
            .opt_int(12, self.contra_account)
            .flag(13, self.is_credit)
            .text(14, &self.booking_text)
            .opt_int(15, self.payment_terms)
            .opt_int(16, self.account_full_tax)
            .opt_int(17, self.account_reduced_tax)
            .flag(18, self.is_cancelled)
            .text(19, &self.cost_center)
            .text(20, &self.memo)
            .finish()
    }
}
