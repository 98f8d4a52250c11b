//! HTTP submission of encoded requests.

use std::time::Duration;

use reqwest::blocking::{Client, multipart};

use crate::error::{CollmexError, Result};

/// Fixed per-call ceiling; there is no retry at this layer.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Name, filename and content type of the single multipart field.
pub const UPLOAD_FIELD: &str = "file";
pub const UPLOAD_FILENAME: &str = "data.csv";
pub const UPLOAD_MIME: &str = "text/csv";

/// Posts an encoded request and returns the raw response body.
///
/// Implementations are used by one caller at a time and need not be `Sync`.
pub trait Transport {
    fn post(&mut self, url: &str, payload: Vec<u8>) -> Result<Vec<u8>>;

    /// Release held connections.
    fn close(&mut self) {}
}

#[derive(Debug, Default)]
enum State {
    /// Nothing allocated yet; the first post builds the client.
    #[default]
    Idle,
    Open(Client),
    /// Released by `close()`; posts fail until `reopen()`.
    Closed,
}

/// Blocking reqwest transport with a pooled client that is built on first
/// use and released by [`close`](Transport::close) or drop.
#[derive(Debug, Default)]
pub struct HttpTransport {
    state: State,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow a closed transport to build a fresh client on the next post.
    pub fn reopen(&mut self) {
        if matches!(self.state, State::Closed) {
            self.state = State::Idle;
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, State::Closed)
    }

    /// True while a client is allocated.
    pub fn is_open(&self) -> bool {
        matches!(self.state, State::Open(_))
    }

    fn client(&mut self) -> Result<&Client> {
        if matches!(self.state, State::Closed) {
            return Err(CollmexError::Transport("transport is closed".into()));
        }
        if matches!(self.state, State::Idle) {
            tracing::debug!(timeout = ?REQUEST_TIMEOUT, "creating HTTP client");
            let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
            self.state = State::Open(client);
        }
        match &self.state {
            State::Open(client) => Ok(client),
            _ => Err(CollmexError::Transport("transport is not open".into())),
        }
    }
}

impl Transport for HttpTransport {
    fn post(&mut self, url: &str, payload: Vec<u8>) -> Result<Vec<u8>> {
        let client = self.client()?;

        let part = multipart::Part::bytes(payload)
            .file_name(UPLOAD_FILENAME)
            .mime_str(UPLOAD_MIME)?;
        let form = multipart::Form::new().part(UPLOAD_FIELD, part);

        let resp = client.post(url).multipart(form).send()?;
        let status = resp.status();
        tracing::debug!(%status, "Collmex responded");
        if !status.is_success() {
            return Err(CollmexError::Transport(format!("HTTP {status}")));
        }
        Ok(resp.bytes()?.to_vec())
    }

    fn close(&mut self) {
        if matches!(self.state, State::Open(_)) {
            tracing::debug!("releasing HTTP client");
        }
        self.state = State::Closed;
    }
}
