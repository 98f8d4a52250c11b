//! In-memory transport that records requests and replays canned responses.

#![allow(dead_code)]

use std::collections::VecDeque;

use collmex::api::{Config, Transport};
use collmex::wire::{self, Row};

#[derive(Debug, Default)]
pub struct MockTransport {
    pub requests: Vec<(String, Vec<u8>)>,
    replies: VecDeque<Vec<u8>>,
    pub closed: bool,
}

impl MockTransport {
    /// Replies in order; further posts get an empty body.
    pub fn replying<I, B>(replies: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        Self {
            replies: replies.into_iter().map(|b| b.as_ref().to_vec()).collect(),
            ..Default::default()
        }
    }

    /// Decoded rows of request `n`.
    pub fn request_rows(&self, n: usize) -> Vec<Row> {
        wire::decode(&self.requests[n].1).expect("request is valid CSV")
    }
}

impl Transport for MockTransport {
    fn post(&mut self, url: &str, payload: Vec<u8>) -> collmex::Result<Vec<u8>> {
        self.requests.push((url.to_string(), payload));
        Ok(self.replies.pop_front().unwrap_or_default())
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

pub fn config() -> Config {
    Config::new("123456", "api-user", "s3cret")
}

/// Encode response lines the way the server sends them: windows-1252, CRLF.
pub fn response(lines: &[&[&str]]) -> Vec<u8> {
    let rows: Vec<Row> = lines
        .iter()
        .map(|l| l.iter().map(|s| s.to_string()).collect())
        .collect();
    wire::encode(&rows).expect("encodable response")
}
