//! # collmex
//!
//! Client for the Collmex accounting API: vendors, vendor invoices, open
//! items and accounting documents, plus ZUGFeRD XML for incoming invoices.
//!
//! Collmex exchanges semicolon-separated windows-1252 CSV over a single
//! HTTP endpoint. Meaning is positional, and errors arrive in-band as
//! `MESSAGE` rows. The layers of this crate, bottom-up:
//!
//! | Module | Content |
//! |--------|---------|
//! | [`wire`] | Code page 1252 and CSV framing of [`wire::Row`]s |
//! | [`records`] | Positional codecs for each record type |
//! | [`api`] | Credentials, transport, `MESSAGE` error policy |
//! | [`client`] | One typed method per command, vendor matching |
//! | `zugferd` | EN 16931 CII XML (feature `zugferd`) |
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//!
//! ## Quick Start
//!
//! ```no_run
//! use collmex::client::{CollmexClient, OpenItemsQuery};
//!
//! let mut client = CollmexClient::from_env()?;
//! for item in client.get_open_items(&OpenItemsQuery::vendors())? {
//!     println!("{} {} {:?}", item.vendor_name, item.invoice_number, item.open_amount);
//! }
//! # Ok::<(), collmex::CollmexError>(())
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `zugferd` | ZUGFeRD / Factur-X XML generation |
//! | `cli` (default) | The `collmex` binary, implies `zugferd` |

mod error;

pub mod api;
pub mod client;
pub mod records;
pub mod wire;

#[cfg(feature = "zugferd")]
pub mod zugferd;

pub use crate::error::*;
