use serde::{Deserialize, Serialize};

use super::fields::FieldReader;
use crate::error::{AUTH_ERROR_CODES, CollmexError, Result};
use crate::wire::Row;

pub const MESSAGE_RECORD_TYPE: &str = "MESSAGE";

/// Message severity, field 1 of a `MESSAGE` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// `E`
    Error,
    /// `W`
    Warning,
    /// `S`
    Success,
    Other(String),
}

impl Severity {
    pub fn from_code(code: &str) -> Self {
        match code {
            "E" => Self::Error,
            "W" => Self::Warning,
            "S" => Self::Success,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::Error => "E",
            Self::Warning => "W",
            Self::Success => "S",
            Self::Other(c) => c,
        }
    }
}

/// Status line the server embeds in a response: `MESSAGE;severity;code;text;line`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub severity: Severity,
    pub code: String,
    pub text: String,
    /// Request line the message refers to.
    pub line: Option<u32>,
}

impl Message {
    pub fn from_row(row: &[String]) -> Result<Self> {
        let r = FieldReader::new(MESSAGE_RECORD_TYPE, row);
        Ok(Self {
            severity: Severity::from_code(&r.text(1)),
            code: r.text(2),
            text: r.text_or(3, "Unknown error"),
            line: r.opt_int(4).unwrap_or(None),
        })
    }

    pub fn to_row(&self) -> Row {
        let mut row = vec![
            MESSAGE_RECORD_TYPE.to_string(),
            self.severity.code().to_string(),
            self.code.clone(),
            self.text.clone(),
        ];
        if let Some(line) = self.line {
            row.push(line.to_string());
        }
        row
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// The error this message signals, if its severity is `E`.
    pub fn to_error(&self) -> Option<CollmexError> {
        if !self.is_error() {
            return None;
        }
        let message = self.text.clone();
        let code = self.code.clone();
        if AUTH_ERROR_CODES.contains(&self.code.as_str()) {
            Some(CollmexError::Authentication { message, code })
        } else {
            Some(CollmexError::Protocol { message, code })
        }
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} {}] {}", self.severity.code(), self.code, self.text)
    }
}
