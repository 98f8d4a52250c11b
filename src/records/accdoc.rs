use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CollmexRecord;
use super::fields::{FieldReader, RowWriter};
use crate::error::Result;
use crate::wire::Row;

/// One journal line of a booking (Buchung), record type `ACCDOC`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountingDocument {
    pub company_id: u32,
    pub fiscal_year: i32,
    pub booking_id: u32,
    pub document_date: Option<NaiveDate>,
    pub booked_date: Option<NaiveDate>,
    pub booking_text: String,
    pub position: u32,
    pub account_number: u32,
    pub account_name: String,
    /// `S` (Soll, debit) or `H` (Haben, credit).
    pub debit_credit: String,
    pub amount: Option<Decimal>,
    pub customer_id: Option<u32>,
    pub customer_name: String,
    pub vendor_id: Option<u32>,
    pub vendor_name: String,
    pub asset_id: Option<u32>,
    pub asset_name: String,
    /// Booking this line cancels, if it is a cancellation.
    pub cancelled_booking: Option<u32>,
    pub cost_center: String,
    pub invoice_number: String,
    pub customer_order_id: Option<u32>,
    pub travel_id: Option<u32>,
    pub supplier_order_id: Option<u32>,
    pub payment_id: Option<u32>,
    pub document_number: String,
    pub memo: String,
    pub user: String,
}

impl AccountingDocument {
    /// A line without customer, vendor and invoice reference still needs a
    /// receipt assigned.
    pub fn is_unmatched(&self) -> bool {
        self.customer_id.is_none() && self.vendor_id.is_none() && self.invoice_number.is_empty()
    }

    pub fn is_debit(&self) -> bool {
        self.debit_credit == "S"
    }
}

impl CollmexRecord for AccountingDocument {
    const RECORD_TYPE: &'static str = "ACCDOC";
    const LAYOUT: &'static [&'static str] = &[
        "record_type",
        "company_id",
        "fiscal_year",
        "booking_id",
        "document_date",
        "booked_date",
        "booking_text",
        "position",
        "account_number",
        "account_name",
        "debit_credit",
        "amount",
        "customer_id",
        "customer_name",
        "vendor_id",
        "vendor_name",
        "asset_id",
        "asset_name",
        "cancelled_booking",
        "cost_center",
        "invoice_number",
        "customer_order_id",
        "travel_id",
        "supplier_order_id",
        "payment_id",
        "document_number",
        "memo",
        "user",
    ];

    fn from_row(row: &[String]) -> Result<Self> {
        let r = FieldReader::new(Self::RECORD_TYPE, row);
        Ok(Self {
            company_id: r.int_or(1, 1)?,
            fiscal_year: r.int_or(2, 0)?,
            booking_id: r.int_or(3, 0)?,
            document_date: r.date(4)?,
            booked_date: r.date(5)?,
            booking_text: r.text(6),
            position: r.int_or(7, 0)?,
            account_number: r.int_or(8, 0)?,
            account_name: r.text(9),
            debit_credit: r.text(10),
            amount: r.decimal(11)?,
            customer_id: r.opt_int(12)?,
            customer_name: r.text(13),
            vendor_id: r.opt_int(14)?,
            vendor_name: r.text(15),
            asset_id: r.opt_int(16)?,
            asset_name: r.text(17),
            cancelled_booking: r.opt_int(18)?,
            cost_center: r.text(19),
            invoice_number: r.text(20),
            customer_order_id: r.opt_int(21)?,
            travel_id: r.opt_int(22)?,
            supplier_order_id: r.opt_int(23)?,
            payment_id: r.opt_int(24)?,
            document_number: r.text(25),
            memo: r.text(26),
            user: r.text(27),
        })
    }

    fn to_row(&self) -> Row {
        RowWriter::new(Self::RECORD_TYPE)
            .int(1, self.company_id)
            .int(2, self.fiscal_year)
            .int(3, self.booking_id)
            .date(4, self.document_date)
            .date(5, self.booked_date)
            .text(6, &self.booking_text)
            .int(7, self.position)
            .int(8, self.account_number)
            .text(9, &self.account_name)
            .text(10, &self.debit_credit)
            .decimal(11, self.amount)
            .opt_int(12, self.customer_id)
            .text(13, &self.customer_name)
            .opt_int(14, self.vendor_id)
            .text(15, &self.vendor_name)
            .opt_int(16, self.asset_id)
            .text(17, &self.asset_name)
            .opt_int(18, self.cancelled_booking)
            .text(19, &self.cost_center)
            .text(20, &self.invoice_number)
            .opt_int(21, self.customer_order_id)
            .opt_int(22, self.travel_id)
            .opt_int(23, self.supplier_order_id)
            .opt_int(24, self.payment_id)
            .text(25, &self.document_number)
            .text(26, &self.memo)
            .text(27, &self.user)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn bank_line(customer: &str, vendor: &str, invoice: &str) -> Row {
        let mut row = vec![String::new(); 28];
        row[0] = "ACCDOC".into();
        row[1] = "1".into();
        row[2] = "2024".into();
        row[3] = "4711".into();
        row[4] = "20240315".into();
        row[6] = "Lastschrift Telekom".into();
        row[7] = "1".into();
        row[8] = "1200".into();
        row[10] = "H".into();
        row[11] = "59,90".into();
        row[12] = customer.into();
        row[14] = vendor.into();
        row[20] = invoice.into();
        row
    }

    #[test]
    fn decodes_bank_line() {
        let doc = AccountingDocument::from_row(&bank_line("", "", "")).unwrap();
        assert_eq!(doc.booking_id, 4711);
        assert_eq!(doc.account_number, 1200);
        assert_eq!(doc.amount, Some(dec!(59.90)));
        assert!(!doc.is_debit());
        assert_eq!(doc.document_date, NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(doc.booked_date, None);
    }

    #[test]
    fn unmatched_requires_all_three_missing() {
        let cases = [
            ("", "", "", true),
            ("10000", "", "", false),
            ("", "70001", "", false),
            ("", "", "RE-1", false),
            ("0", "", "", false),
        ];
        for (customer, vendor, invoice, expected) in cases {
            let doc = AccountingDocument::from_row(&bank_line(customer, vendor, invoice)).unwrap();
            assert_eq!(doc.is_unmatched(), expected, "{customer:?}/{vendor:?}/{invoice:?}");
        }
    }

    #[test]
    fn zero_customer_is_not_collapsed_to_none() {
        let doc = AccountingDocument::from_row(&bank_line("0", "", "")).unwrap();
        assert_eq!(doc.customer_id, Some(0));
        assert_eq!(doc.to_row()[12], "0");
    }

    #[test]
    fn decode_encode_is_stable() {
        let row = bank_line("", "70001", "SW-88");
        assert_eq!(AccountingDocument::from_row(&row).unwrap().to_row(), row);
    }
}
