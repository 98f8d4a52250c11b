//! Filter parameters of the query commands.
//!
//! Each struct turns into one request row whose field order is fixed by the
//! command; callers only choose values. Unset options are sent as `""`.

use chrono::NaiveDate;

use crate::api::Param;
use crate::wire::Row;

pub const VENDOR_GET: &str = "VENDOR_GET";
pub const OPEN_ITEMS_GET: &str = "OPEN_ITEMS_GET";
pub const ACCDOC_GET: &str = "ACCDOC_GET";

/// Bank account used for unmatched transaction lookups unless overridden.
pub const DEFAULT_BANK_ACCOUNT: u32 = 1200;

fn build(command: &str, params: impl IntoIterator<Item = Param>) -> Row {
    std::iter::once(command.to_string())
        .chain(params.into_iter().map(Param::into_field))
        .collect()
}

/// `VENDOR_GET` filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VendorQuery {
    pub vendor_id: Option<u32>,
    /// Free text search over name and address fields.
    pub text: Option<String>,
    /// Only records changed since the last query of this API user.
    pub only_changed: bool,
}

impl VendorQuery {
    pub fn by_id(vendor_id: u32) -> Self {
        Self {
            vendor_id: Some(vendor_id),
            ..Default::default()
        }
    }

    pub fn search(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// `VENDOR_GET;id;company;text;follow-up;zip/country;only changed;system`
    pub fn params(&self, company_id: u32) -> Vec<Param> {
        vec![
            self.vendor_id.into(),
            company_id.into(),
            self.text.clone().into(),
            Param::Empty,
            Param::Empty,
            self.only_changed.into(),
            Param::Empty,
        ]
    }

    pub fn to_row(&self, company_id: u32) -> Row {
        build(VENDOR_GET, self.params(company_id))
    }
}

/// `OPEN_ITEMS_GET` filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenItemsQuery {
    /// Vendor side (payables) instead of customer side (receivables).
    pub vendor: bool,
    pub customer_id: Option<u32>,
    pub vendor_id: Option<u32>,
    /// Items open as of this date.
    pub cutoff_date: Option<NaiveDate>,
}

impl OpenItemsQuery {
    pub fn vendors() -> Self {
        Self {
            vendor: true,
            ..Default::default()
        }
    }

    pub fn customers() -> Self {
        Self::default()
    }

    /// `OPEN_ITEMS_GET;company;vendor flag;customer;vendor;agent;cutoff`
    pub fn params(&self, company_id: u32) -> Vec<Param> {
        vec![
            company_id.into(),
            self.vendor.into(),
            self.customer_id.into(),
            self.vendor_id.into(),
            Param::Empty,
            self.cutoff_date.into(),
        ]
    }

    pub fn to_row(&self, company_id: u32) -> Row {
        build(OPEN_ITEMS_GET, self.params(company_id))
    }
}

/// `ACCDOC_GET` filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingQuery {
    pub fiscal_year: Option<i32>,
    pub booking_id: Option<u32>,
    pub account_number: Option<u32>,
    pub customer_id: Option<u32>,
    pub vendor_id: Option<u32>,
    pub invoice_number: Option<String>,
    /// Searched in booking text and memo.
    pub text: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub include_cancelled: bool,
    pub only_changed: bool,
}

impl BookingQuery {
    pub fn account(account_number: u32) -> Self {
        Self {
            account_number: Some(account_number),
            ..Default::default()
        }
    }

    /// `ACCDOC_GET;company;year;id;account;cost center;customer;vendor;asset;
    /// invoice;travel;text;from;to;cancelled;only changed`
    pub fn params(&self, company_id: u32) -> Vec<Param> {
        vec![
            company_id.into(),
            self.fiscal_year.into(),
            self.booking_id.into(),
            self.account_number.into(),
            Param::Empty,
            self.customer_id.into(),
            self.vendor_id.into(),
            Param::Empty,
            self.invoice_number.clone().into(),
            Param::Empty,
            self.text.clone().into(),
            self.date_from.into(),
            self.date_to.into(),
            self.include_cancelled.into(),
            self.only_changed.into(),
        ]
    }

    pub fn to_row(&self, company_id: u32) -> Row {
        build(ACCDOC_GET, self.params(company_id))
    }
}
