use crate::error::Result;
use crate::records::{MESSAGE_RECORD_TYPE, Message};
use crate::wire::{self, Row};

/// A decoded response split into status messages and data rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    pub messages: Vec<Message>,
    pub data: Vec<Row>,
}

impl Response {
    /// Separate `MESSAGE` rows from data rows, keeping the order of each.
    pub fn partition(rows: Vec<Row>) -> Result<Self> {
        let mut response = Self::default();
        for row in rows {
            if wire::discriminator(&row) == MESSAGE_RECORD_TYPE {
                response.messages.push(Message::from_row(&row)?);
            } else {
                response.data.push(row);
            }
        }
        Ok(response)
    }

    /// Fail on the first error-severity message, wherever it sits in the
    /// response. Other messages are logged and dropped.
    pub fn check(&self) -> Result<()> {
        if let Some(err) = self.messages.iter().find_map(Message::to_error) {
            tracing::warn!(code = err.code().unwrap_or(""), "Collmex reported an error");
            return Err(err);
        }
        for m in &self.messages {
            tracing::info!(severity = m.severity.code(), code = %m.code, "{}", m.text);
        }
        Ok(())
    }
}
