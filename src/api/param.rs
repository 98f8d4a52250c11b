use std::fmt;

use chrono::NaiveDate;

use crate::records::format_date;

/// One positional parameter of a query row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    Empty,
    Text(String),
    Int(i64),
    /// `"1"` when set, `""` otherwise.
    Flag(bool),
    /// `YYYYMMDD`.
    Date(NaiveDate),
}

impl Param {
    pub fn into_field(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty | Self::Flag(false) => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Flag(true) => f.write_str("1"),
            Self::Date(d) => f.write_str(&format_date(Some(*d))),
        }
    }
}

impl From<&str> for Param {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Param {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<u32> for Param {
    fn from(n: u32) -> Self {
        Self::Int(n.into())
    }
}

impl From<i32> for Param {
    fn from(n: i32) -> Self {
        Self::Int(n.into())
    }
}

impl From<bool> for Param {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

impl From<NaiveDate> for Param {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl<T: Into<Param>> From<Option<T>> for Param {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Empty, Into::into)
    }
}
