use super::config::Config;
use super::param::Param;
use super::response::Response;
use super::transport::{HttpTransport, Transport};
use crate::error::Result;
use crate::wire::{self, Row};

pub const LOGIN_RECORD_TYPE: &str = "LOGIN";

/// Low-level Collmex client: credential framing, transport and in-band
/// error detection.
///
/// Every request starts with a `LOGIN` row built from the configuration;
/// callers never supply it. The transport is released by [`close`](Self::close)
/// or when the client is dropped.
pub struct CollmexApi<T: Transport = HttpTransport> {
    config: Config,
    transport: T,
}

impl CollmexApi<HttpTransport> {
    pub fn new(config: Config) -> Self {
        Self::with_transport(config, HttpTransport::new())
    }

    /// Configure from `COLLMEX_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(Config::from_env()?))
    }

    /// Re-enable a transport released by [`close`](Self::close).
    pub fn reopen(&mut self) {
        self.transport.reopen();
    }
}

impl<T: Transport> CollmexApi<T> {
    pub fn with_transport(config: Config, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    fn login_row(&self) -> Row {
        vec![
            LOGIN_RECORD_TYPE.to_string(),
            self.config.username.clone(),
            self.config.password.clone(),
        ]
    }

    /// The full request payload for `rows`: the login row followed by
    /// `rows` in their original order.
    pub fn encode_request(&self, rows: &[Row]) -> Result<Vec<u8>> {
        let mut request = Vec::with_capacity(rows.len() + 1);
        request.push(self.login_row());
        request.extend_from_slice(rows);
        wire::encode(&request)
    }

    /// Submit `rows` and return every decoded response row, `MESSAGE` rows
    /// included. Fails if any `MESSAGE` row has error severity.
    pub fn send(&mut self, rows: &[Row]) -> Result<Vec<Row>> {
        let payload = self.encode_request(rows)?;
        tracing::debug!(
            rows = rows.len(),
            record_types = ?rows.iter().map(|r| wire::discriminator(r)).collect::<Vec<_>>(),
            bytes = payload.len(),
            "sending Collmex request"
        );

        let url = self.config.api_url();
        let body = self.transport.post(&url, payload)?;
        let rows = wire::decode(&body)?;
        tracing::debug!(rows = rows.len(), bytes = body.len(), "decoded Collmex response");

        Response::partition(rows.clone())?.check()?;
        Ok(rows)
    }

    /// Run a query command: `record_type` followed by `params` in order.
    /// Returns the response without any `MESSAGE` rows.
    pub fn query<I>(&mut self, record_type: &str, params: I) -> Result<Vec<Row>>
    where
        I: IntoIterator<Item = Param>,
    {
        let mut row = vec![record_type.to_string()];
        row.extend(params.into_iter().map(Param::into_field));
        let rows = self.send(&[row])?;
        Ok(Response::partition(rows)?.data)
    }

    /// Release the transport.
    pub fn close(&mut self) {
        self.transport.close();
    }
}

impl<T: Transport> Drop for CollmexApi<T> {
    fn drop(&mut self) {
        self.transport.close();
    }
}
