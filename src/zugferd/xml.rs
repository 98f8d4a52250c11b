use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use rust_decimal::Decimal;

use crate::error::{CollmexError, Result};

fn write_failed(e: impl std::fmt::Display) -> CollmexError {
    CollmexError::Xml(format!("XML write error: {e}"))
}

/// Indented element writer over an in-memory buffer.
pub(crate) struct XmlWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlWriter {
    pub fn new() -> Result<Self> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(write_failed)?;
        Ok(Self { writer })
    }

    pub fn into_string(self) -> Result<String> {
        let buf = self.writer.into_inner().into_inner();
        String::from_utf8(buf).map_err(|e| CollmexError::Xml(format!("XML UTF-8 error: {e}")))
    }

    pub fn start(&mut self, name: &str) -> Result<&mut Self> {
        self.start_with_attrs(name, &[])
    }

    pub fn start_with_attrs(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<&mut Self> {
        let mut elem = BytesStart::new(name);
        for (k, v) in attrs {
            elem.push_attribute((*k, *v));
        }
        self.writer
            .write_event(Event::Start(elem))
            .map_err(write_failed)?;
        Ok(self)
    }

    pub fn end(&mut self, name: &str) -> Result<&mut Self> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(write_failed)?;
        Ok(self)
    }

    pub fn text(&mut self, name: &str, text: &str) -> Result<&mut Self> {
        self.text_with_attrs(name, text, &[])
    }

    pub fn text_with_attrs(
        &mut self,
        name: &str,
        text: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self> {
        self.start_with_attrs(name, attrs)?;
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(write_failed)?;
        self.end(name)
    }

    pub fn amount(&mut self, name: &str, value: Decimal) -> Result<&mut Self> {
        self.text(name, &format_amount(value))
    }

    /// `<name><udt:DateTimeString format="102">YYYYMMDD</udt:DateTimeString></name>`
    pub fn date(&mut self, name: &str, date: chrono::NaiveDate) -> Result<&mut Self> {
        self.start(name)?;
        self.text_with_attrs(
            "udt:DateTimeString",
            &date.format("%Y%m%d").to_string(),
            &[("format", "102")],
        )?;
        self.end(name)
    }
}

/// Dot-separated decimal with at least two fractional digits and no
/// trailing zeros beyond that.
pub fn format_amount(d: Decimal) -> String {
    let s = d.normalize().to_string();
    match s.find('.') {
        Some(dot) if s.len() - dot - 1 >= 2 => s,
        Some(dot) => format!("{s}{}", "0".repeat(2 - (s.len() - dot - 1))),
        None => format!("{s}.00"),
    }
}
