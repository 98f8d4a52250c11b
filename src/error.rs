use thiserror::Error;

/// Server codes reported in `MESSAGE` rows when the login was rejected.
pub const AUTH_ERROR_CODES: [&str; 3] = ["101001", "101002", "101003"];

/// Errors that can occur while talking to the Collmex API.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CollmexError {
    /// A field contains a character that code page 1252 cannot represent.
    #[error("cannot encode {character:?} in row {row}, field {field} as windows-1252")]
    Encoding {
        character: char,
        row: usize,
        field: usize,
    },

    /// The response payload is not valid windows-1252 CSV.
    #[error("decoding error: {0}")]
    Decoding(String),

    /// Network failure, timeout or non-success HTTP status.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server rejected the credentials.
    #[error("authentication failed: {message} ({code})")]
    Authentication { message: String, code: String },

    /// The server reported an error-severity `MESSAGE` row.
    #[error("Collmex error {code}: {message}")]
    Protocol { message: String, code: String },

    /// A non-empty field could not be interpreted at its position.
    #[error("invalid field {index} in {record} record ({value:?}): {reason}")]
    Field {
        record: &'static str,
        index: usize,
        value: String,
        reason: String,
    },

    /// Missing or invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// XML generation error.
    #[error("XML error: {0}")]
    Xml(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CollmexError {
    /// The server error code, for errors reported through `MESSAGE` rows.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Authentication { code, .. } | Self::Protocol { code, .. } => Some(code),
            _ => None,
        }
    }

    /// True for every error the server reported in-band, authentication included.
    pub fn is_protocol_error(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::Protocol { .. })
    }

    /// Only transport failures may succeed when repeated unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Short label for the error kind, used by the command-line front end.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Encoding { .. } => "encoding error",
            Self::Decoding(_) => "decoding error",
            Self::Transport(_) => "transport error",
            Self::Authentication { .. } => "authentication failed",
            Self::Protocol { .. } => "Collmex API error",
            Self::Field { .. } => "record error",
            Self::Config(_) => "configuration error",
            Self::Xml(_) => "XML error",
            Self::Io(_) => "I/O error",
        }
    }
}

impl From<reqwest::Error> for CollmexError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CollmexError>;
