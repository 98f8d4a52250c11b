//! Typed operations on top of the protocol layer.
//!
//! ```no_run
//! use collmex::client::{BookingQuery, CollmexClient};
//!
//! let mut client = CollmexClient::from_env()?;
//! for doc in client.get_bookings(&BookingQuery::account(1200))? {
//!     println!("{} {:?} {}", doc.booking_id, doc.amount, doc.booking_text);
//! }
//! client.close();
//! # Ok::<(), collmex::CollmexError>(())
//! ```

mod matching;
mod queries;

pub use matching::{
    MAX_CANDIDATES, MIN_SCORE, MatchCandidate, MatchCriteria, MatchField, SUBSTRING_SCORE,
    VendorMatch, match_vendors, name_score,
};
pub use queries::{
    ACCDOC_GET, BookingQuery, DEFAULT_BANK_ACCOUNT, OPEN_ITEMS_GET, OpenItemsQuery, VENDOR_GET,
    VendorQuery,
};

use chrono::NaiveDate;

use crate::api::{CollmexApi, Config, HttpTransport, Transport};
use crate::error::Result;
use crate::records::{
    AccountingDocument, CollmexRecord, OpenItem, Vendor, VendorInvoice, decode_all,
};
use crate::wire::Row;

/// One method per supported command. Responses are filtered to the record
/// type the command returns; everything else is dropped.
pub struct CollmexClient<T: Transport = HttpTransport> {
    api: CollmexApi<T>,
}

impl CollmexClient<HttpTransport> {
    pub fn new(config: Config) -> Self {
        Self {
            api: CollmexApi::new(config),
        }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(Config::from_env()?))
    }
}

impl<T: Transport> CollmexClient<T> {
    pub fn with_transport(config: Config, transport: T) -> Self {
        Self {
            api: CollmexApi::with_transport(config, transport),
        }
    }

    pub fn api(&self) -> &CollmexApi<T> {
        &self.api
    }

    pub fn api_mut(&mut self) -> &mut CollmexApi<T> {
        &mut self.api
    }

    pub fn config(&self) -> &Config {
        self.api.config()
    }

    fn company_id(&self) -> u32 {
        self.api.config().company_id
    }

    fn fetch<R: CollmexRecord>(&mut self, row: Row) -> Result<Vec<R>> {
        let rows = self.api.send(&[row])?;
        let records = decode_all::<R>(&rows)?;
        tracing::debug!(record_type = R::RECORD_TYPE, count = records.len(), "decoded records");
        Ok(records)
    }

    pub fn get_vendors(&mut self, query: &VendorQuery) -> Result<Vec<Vendor>> {
        let row = query.to_row(self.company_id());
        self.fetch(row)
    }

    /// Create or update a vendor. Returns the raw response rows, which
    /// carry the assigned id on creation.
    pub fn create_vendor(&mut self, vendor: &Vendor) -> Result<Vec<Row>> {
        self.api.send(&[vendor.to_row()])
    }

    /// Book a vendor invoice.
    pub fn create_vendor_invoice(&mut self, invoice: &VendorInvoice) -> Result<Vec<Row>> {
        self.api.send(&[invoice.to_row()])
    }

    pub fn get_open_items(&mut self, query: &OpenItemsQuery) -> Result<Vec<OpenItem>> {
        let row = query.to_row(self.company_id());
        self.fetch(row)
    }

    pub fn get_bookings(&mut self, query: &BookingQuery) -> Result<Vec<AccountingDocument>> {
        let row = query.to_row(self.company_id());
        self.fetch(row)
    }

    /// Bank account bookings without customer, vendor or invoice reference.
    /// `bank_account` defaults to [`DEFAULT_BANK_ACCOUNT`].
    pub fn get_unmatched_bank_transactions(
        &mut self,
        bank_account: Option<u32>,
        fiscal_year: Option<i32>,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<Vec<AccountingDocument>> {
        let query = BookingQuery {
            account_number: Some(bank_account.unwrap_or(DEFAULT_BANK_ACCOUNT)),
            fiscal_year,
            date_from,
            date_to,
            ..Default::default()
        };
        let mut bookings = self.get_bookings(&query)?;
        bookings.retain(AccountingDocument::is_unmatched);
        Ok(bookings)
    }

    /// Fetch all vendors and match them against `criteria`.
    pub fn match_vendor(&mut self, criteria: &MatchCriteria) -> Result<VendorMatch> {
        if criteria.is_empty() {
            return Ok(VendorMatch::None);
        }
        let vendors = self.get_vendors(&VendorQuery::default())?;
        Ok(match_vendors(&vendors, criteria))
    }

    /// Release the transport. Also happens on drop.
    pub fn close(&mut self) {
        self.api.close();
    }
}
