//! ZUGFeRD / Factur-X XML for incoming vendor invoices.
//!
//! Produces UN/CEFACT Cross Industry Invoice XML under the EN 16931
//! guideline. The vendor from Collmex is the seller, the configured
//! [`BuyerConfig`](crate::api::BuyerConfig) is the buyer.
//!
//! ```
//! use chrono::NaiveDate;
//! use collmex::api::BuyerConfig;
//! use collmex::records::Vendor;
//! use collmex::zugferd::{ZugferdInvoice, ZugferdLine, create_zugferd_xml};
//! use rust_decimal_macros::dec;
//!
//! let buyer = BuyerConfig::new("Meine Firma GmbH", "Hauptstr. 1", "20095", "Hamburg");
//! let invoice = ZugferdInvoice::new("RE-1", NaiveDate::from_ymd_opt(2024, 5, 2).unwrap())
//!     .line(ZugferdLine::new("Wartung", dec!(1), dec!(250)));
//! let xml = create_zugferd_xml(&Vendor::new("Lieferant AG"), &invoice, &buyer)?;
//! assert!(xml.contains("<ram:GrandTotalAmount>297.50</ram:GrandTotalAmount>"));
//! # Ok::<(), collmex::CollmexError>(())
//! ```

mod invoice;
mod xml;

use std::path::Path;

pub use invoice::{
    DEFAULT_UNIT, TaxSubtotal, Totals, ZugferdInvoice, ZugferdLine, create_zugferd_xml,
};
pub use xml::format_amount;

use crate::error::Result;

/// Guideline of the EN 16931 (COMFORT) profile.
pub const EN16931_GUIDELINE: &str = "urn:cen.eu:en16931:2017";
/// UNTDID 1001 commercial invoice.
pub const INVOICE_TYPE_CODE: &str = "380";
/// UNTDID 4461 SEPA credit transfer.
pub const SEPA_CREDIT_TRANSFER: &str = "58";
pub const CURRENCY: &str = "EUR";

/// CII namespace URIs.
pub mod cii_ns {
    pub const RSM: &str = "urn:un:unece:uncefact:data:standard:CrossIndustryInvoice:100";
    pub const RAM: &str =
        "urn:un:unece:uncefact:data:standard:ReusableAggregateBusinessInformationEntity:100";
    pub const QDT: &str = "urn:un:unece:uncefact:data:standard:QualifiedDataType:100";
    pub const UDT: &str = "urn:un:unece:uncefact:data:standard:UnqualifiedDataType:100";
}

/// Write generated XML to `path` as UTF-8.
pub fn save_xml(xml: &str, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, xml)?;
    tracing::debug!(path = %path.display(), bytes = xml.len(), "saved ZUGFeRD XML");
    Ok(())
}
