use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CollmexRecord;
use super::fields::{FieldReader, RowWriter};
use crate::error::Result;
use crate::wire::Row;

/// Unpaid receivable or payable (Offener Posten), record type `OPEN_ITEM`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenItem {
    pub company_id: u32,
    pub fiscal_year: i32,
    pub booking_id: u32,
    pub position: u32,
    pub customer_id: Option<u32>,
    pub customer_name: String,
    pub vendor_id: Option<u32>,
    pub vendor_name: String,
    pub invoice_number: String,
    pub document_date: Option<NaiveDate>,
    pub payment_terms: u32,
    pub due_date: Option<NaiveDate>,
    /// Negative while the item is not yet due.
    pub days_overdue: i32,
    pub dunning_level: u32,
    pub dunning_date: Option<NaiveDate>,
    pub dunning_fees: Option<Decimal>,
    pub amount: Option<Decimal>,
    pub paid: Option<Decimal>,
    pub open_amount: Option<Decimal>,
}

impl OpenItem {
    /// Counterparty name: the vendor for payables, the customer otherwise.
    pub fn counterparty(&self) -> &str {
        if self.vendor_id.is_some() {
            &self.vendor_name
        } else {
            &self.customer_name
        }
    }
}

impl CollmexRecord for OpenItem {
    const RECORD_TYPE: &'static str = "OPEN_ITEM";
    const LAYOUT: &'static [&'static str] = &[
        "record_type",
        "company_id",
        "fiscal_year",
        "booking_id",
        "position",
        "customer_id",
        "customer_name",
        "vendor_id",
        "vendor_name",
        "invoice_number",
        "document_date",
        "payment_terms",
        "due_date",
        "days_overdue",
        "dunning_level",
        "dunning_date",
        "dunning_fees",
        "amount",
        "paid",
        "open_amount",
    ];

    fn from_row(row: &[String]) -> Result<Self> {
        let r = FieldReader::new(Self::RECORD_TYPE, row);
        Ok(Self {
            company_id: r.int_or(1, 1)?,
            fiscal_year: r.int_or(2, 0)?,
            booking_id: r.int_or(3, 0)?,
            position: r.int_or(4, 0)?,
            customer_id: r.opt_int(5)?,
            customer_name: r.text(6),
            vendor_id: r.opt_int(7)?,
            vendor_name: r.text(8),
            invoice_number: r.text(9),
            document_date: r.date(10)?,
            payment_terms: r.int_or(11, 0)?,
            due_date: r.date(12)?,
            days_overdue: r.int_or(13, 0)?,
            dunning_level: r.int_or(14, 0)?,
            dunning_date: r.date(15)?,
            dunning_fees: r.decimal(16)?,
            amount: r.decimal(17)?,
            paid: r.decimal(18)?,
            open_amount: r.decimal(19)?,
        })
    }

    fn to_row(&self) -> Row {
        RowWriter::new(Self::RECORD_TYPE)
            .int(1, self.company_id)
            .int(2, self.fiscal_year)
            .int(3, self.booking_id)
            .int(4, self.position)
            .opt_int(5, self.customer_id)
            .text(6, &self.customer_name)
            .opt_int(7, self.vendor_id)
            .text(8, &self.vendor_name)
            .text(9, &self.invoice_number)
            .date(10, self.document_date)
            .int(11, self.payment_terms)
            .date(12, self.due_date)
            .int(13, self.days_overdue)
            .int(14, self.dunning_level)
            .date(15, self.dunning_date)
            .decimal(16, self.dunning_fees)
            .decimal(17, self.amount)
            .decimal(18, self.paid)
            .decimal(19, self.open_amount)
            .finish()
    }
}
