//! Protocol layer: credentials, transport and response error policy.
//!
//! [`CollmexApi`] turns caller rows into an authenticated request, posts it
//! through a [`Transport`] and checks the decoded response for `MESSAGE`
//! rows with error severity before handing anything back.
//!
//! ```no_run
//! use collmex::api::{CollmexApi, Config, Param};
//!
//! let mut api = CollmexApi::new(Config::new("123456", "user", "secret"));
//! let rows = api.query("VENDOR_GET", [Param::Empty, Param::from(1u32)])?;
//! println!("{} rows", rows.len());
//! # Ok::<(), collmex::CollmexError>(())
//! ```

mod config;
mod param;
mod protocol;
mod response;
mod transport;

pub use config::{BuyerConfig, Config};
pub use param::Param;
pub use protocol::{CollmexApi, LOGIN_RECORD_TYPE};
pub use response::Response;
pub use transport::{
    HttpTransport, REQUEST_TIMEOUT, Transport, UPLOAD_FIELD, UPLOAD_FILENAME, UPLOAD_MIME,
};
