//! Connection settings and buyer identity.
//!
//! Values come from code or from `COLLMEX_*` environment variables:
//!
//! | Variable | Required | Meaning |
//! |----------|----------|---------|
//! | `COLLMEX_CUSTOMER_ID` | yes | Collmex customer number (part of the endpoint URL) |
//! | `COLLMEX_USERNAME` | yes | API user |
//! | `COLLMEX_PASSWORD` | yes | API password |
//! | `COLLMEX_COMPANY_ID` | no (1) | Firma within the account |
//! | `COLLMEX_API_URL` | no | Endpoint override |
//! | `COLLMEX_BUYER_*` | no | Own company data for ZUGFeRD XML |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CollmexError, Result};

/// Collmex account credentials and endpoint.
#[derive(Clone)]
pub struct Config {
    pub customer_id: String,
    pub company_id: u32,
    pub username: String,
    pub password: String,
    /// Replaces the URL derived from `customer_id`.
    pub endpoint: Option<String>,
    /// Own company, used as buyer in generated ZUGFeRD XML.
    pub buyer: Option<BuyerConfig>,
}

impl Config {
    pub fn new(
        customer_id: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            company_id: 1,
            username: username.into(),
            password: password.into(),
            endpoint: None,
            buyer: None,
        }
    }

    pub fn company_id(mut self, company_id: u32) -> Self {
        self.company_id = company_id;
        self
    }

    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = Some(url.into());
        self
    }

    pub fn buyer(mut self, buyer: BuyerConfig) -> Self {
        self.buyer = Some(buyer);
        self
    }

    /// Load from `COLLMEX_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary variable lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let required = |key: &str| {
            get(key).ok_or_else(|| {
                CollmexError::Config(format!("environment variable {key} is not set"))
            })
        };

        let mut config = Self::new(
            required("COLLMEX_CUSTOMER_ID")?,
            required("COLLMEX_USERNAME")?,
            required("COLLMEX_PASSWORD")?,
        );
        if let Some(company) = get("COLLMEX_COMPANY_ID") {
            config.company_id = company.parse().map_err(|_| {
                CollmexError::Config(format!("COLLMEX_COMPANY_ID is not a number: {company:?}"))
            })?;
        }
        config.endpoint = get("COLLMEX_API_URL");

        let buyer = BuyerConfig {
            name: get("COLLMEX_BUYER_NAME"),
            street: get("COLLMEX_BUYER_STREET"),
            zip: get("COLLMEX_BUYER_ZIP"),
            city: get("COLLMEX_BUYER_CITY"),
            country: get("COLLMEX_BUYER_COUNTRY").unwrap_or_else(|| "DE".into()),
            vat_id: get("COLLMEX_BUYER_VAT_ID"),
            email: get("COLLMEX_BUYER_EMAIL"),
        };
        if !buyer.is_empty() {
            config.buyer = Some(buyer);
        }
        Ok(config)
    }

    /// The data exchange endpoint for this account.
    pub fn api_url(&self) -> String {
        match &self.endpoint {
            Some(url) => url.clone(),
            None => format!(
                "https://www.collmex.de/cgi-bin/cgi.exe?{},0,data_exchange",
                self.customer_id
            ),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("customer_id", &self.customer_id)
            .field("company_id", &self.company_id)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("buyer", &self.buyer)
            .finish()
    }
}

/// Own company data, the buyer side of incoming invoices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuyerConfig {
    pub name: Option<String>,
    pub street: Option<String>,
    pub zip: Option<String>,
    pub city: Option<String>,
    /// ISO 3166-1 alpha-2, `DE` unless set.
    pub country: String,
    pub vat_id: Option<String>,
    pub email: Option<String>,
}

impl Default for BuyerConfig {
    fn default() -> Self {
        Self {
            name: None,
            street: None,
            zip: None,
            city: None,
            country: "DE".into(),
            vat_id: None,
            email: None,
        }
    }
}

impl BuyerConfig {
    pub fn new(
        name: impl Into<String>,
        street: impl Into<String>,
        zip: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            street: Some(street.into()),
            zip: Some(zip.into()),
            city: Some(city.into()),
            ..Default::default()
        }
    }

    /// Name, street, postal code and city are all present.
    pub fn is_complete(&self) -> bool {
        self.name.is_some() && self.street.is_some() && self.zip.is_some() && self.city.is_some()
    }

    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.street.is_none()
            && self.zip.is_none()
            && self.city.is_none()
            && self.vat_id.is_none()
            && self.email.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn api_url_contains_customer() {
        let c = Config::new("123456", "user", "secret");
        assert_eq!(
            c.api_url(),
            "https://www.collmex.de/cgi-bin/cgi.exe?123456,0,data_exchange"
        );
        assert_eq!(c.endpoint("http://localhost:9/x").api_url(), "http://localhost:9/x");
    }

    #[test]
    fn debug_redacts_password() {
        let c = Config::new("1", "user", "hunter2");
        let s = format!("{c:?}");
        assert!(!s.contains("hunter2"));
        assert!(s.contains("<redacted>"));
    }

    #[test]
    fn from_lookup_requires_credentials() {
        let err = Config::from_lookup(lookup(&[("COLLMEX_CUSTOMER_ID", "1")])).unwrap_err();
        assert!(err.to_string().contains("COLLMEX_USERNAME"));
    }

    #[test]
    fn from_lookup_reads_optional_values() {
        let c = Config::from_lookup(lookup(&[
            ("COLLMEX_CUSTOMER_ID", "42"),
            ("COLLMEX_USERNAME", "u"),
            ("COLLMEX_PASSWORD", "p"),
            ("COLLMEX_COMPANY_ID", "2"),
            ("COLLMEX_BUYER_NAME", "Meine Firma GmbH"),
            ("COLLMEX_BUYER_CITY", "Hamburg"),
        ]))
        .unwrap();
        assert_eq!(c.company_id, 2);
        let buyer = c.buyer.unwrap();
        assert_eq!(buyer.country, "DE");
        assert!(!buyer.is_complete());
    }

    #[test]
    fn non_numeric_company_is_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("COLLMEX_CUSTOMER_ID", "42"),
            ("COLLMEX_USERNAME", "u"),
            ("COLLMEX_PASSWORD", "p"),
            ("COLLMEX_COMPANY_ID", "eins"),
        ]))
        .unwrap_err();
        assert!(matches!(err, CollmexError::Config(_)));
    }

    #[test]
    fn no_buyer_variables_means_no_buyer() {
        let c = Config::from_lookup(lookup(&[
            ("COLLMEX_CUSTOMER_ID", "42"),
            ("COLLMEX_USERNAME", "u"),
            ("COLLMEX_PASSWORD", "p"),
        ]))
        .unwrap();
        assert!(c.buyer.is_none());
        assert_eq!(c.company_id, 1);
    }
}
