use serde::{Deserialize, Serialize};

use super::CollmexRecord;
use super::fields::{FieldReader, RowWriter};
use crate::error::Result;
use crate::wire::Row;

/// How Collmex delivers documents to a vendor (Ausgabemedium).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputMedium {
    /// 0: Print.
    #[default]
    Print,
    /// 1: Email.
    Email,
    /// 2: Fax.
    Fax,
    /// 3: Letter.
    Letter,
    /// 100: No output.
    None,
    /// Other code value.
    Other(u16),
}

impl OutputMedium {
    pub fn code(&self) -> u16 {
        match self {
            Self::Print => 0,
            Self::Email => 1,
            Self::Fax => 2,
            Self::Letter => 3,
            Self::None => 100,
            Self::Other(c) => *c,
        }
    }

    pub fn from_code(code: u16) -> Self {
        match code {
            0 => Self::Print,
            1 => Self::Email,
            2 => Self::Fax,
            3 => Self::Letter,
            100 => Self::None,
            c => Self::Other(c),
        }
    }
}

/// Vendor master record (Lieferant), record type `CMXLIF`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    /// Vendor number; `None` lets Collmex assign one on create.
    pub vendor_id: Option<u32>,
    pub company_id: u32,
    pub salutation: String,
    pub title: String,
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
    pub department: String,
    pub street: String,
    pub postal_code: String,
    pub city: String,
    pub notes: String,
    /// 0 active, 1 inactive, 2/3 delete.
    pub inactive: u8,
    /// ISO 3166-1 alpha-2.
    pub country: String,
    pub phone: String,
    pub fax: String,
    pub email: String,
    pub bank_account: String,
    /// Bankleitzahl.
    pub bank_code: String,
    pub iban: String,
    pub bic: String,
    pub bank_name: String,
    /// Steuernummer.
    pub tax_number: String,
    /// USt-IdNr.
    pub vat_id: String,
    pub payment_terms: u32,
    pub delivery_terms: String,
    pub delivery_terms_extra: String,
    pub output_medium: OutputMedium,
}

impl Default for Vendor {
    fn default() -> Self {
        Self {
            vendor_id: None,
            company_id: 1,
            salutation: String::new(),
            title: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            company_name: String::new(),
            department: String::new(),
            street: String::new(),
            postal_code: String::new(),
            city: String::new(),
            notes: String::new(),
            inactive: 0,
            country: "DE".into(),
            phone: String::new(),
            fax: String::new(),
            email: String::new(),
            bank_account: String::new(),
            bank_code: String::new(),
            iban: String::new(),
            bic: String::new(),
            bank_name: String::new(),
            tax_number: String::new(),
            vat_id: String::new(),
            payment_terms: 0,
            delivery_terms: String::new(),
            delivery_terms_extra: String::new(),
            output_medium: OutputMedium::Print,
        }
    }
}

impl Vendor {
    /// New vendor with only a company name set.
    pub fn new(company_name: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            ..Default::default()
        }
    }

    /// Company name, falling back to "first last" for private persons.
    pub fn display_name(&self) -> String {
        if !self.company_name.is_empty() {
            return self.company_name.clone();
        }
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

impl CollmexRecord for Vendor {
    const RECORD_TYPE: &'static str = "CMXLIF";
    const LAYOUT: &'static [&'static str] = &[
        "record_type",
        "vendor_id",
        "company_id",
        "salutation",
        "title",
        "first_name",
        "last_name",
        "company_name",
        "department",
        "street",
        "postal_code",
        "city",
        "notes",
        "inactive",
        "country",
        "phone",
        "fax",
        "email",
        "bank_account",
        "bank_code",
        "iban",
        "bic",
        "bank_name",
        "tax_number",
        "vat_id",
        "payment_terms",
        "delivery_terms",
        "delivery_terms_extra",
        "output_medium",
    ];

    fn from_row(row: &[String]) -> Result<Self> {
        let r = FieldReader::new(Self::RECORD_TYPE, row);
        Ok(Self {
            vendor_id: r.opt_int(1)?,
            company_id: r.int_or(2, 1)?,
            salutation: r.text(3),
            title: r.text(4),
            first_name: r.text(5),
            last_name: r.text(6),
            company_name: r.text(7),
            department: r.text(8),
            street: r.text(9),
            postal_code: r.text(10),
            city: r.text(11),
            notes: r.text(12),
            inactive: r.int_or(13, 0)?,
            country: r.text_or(14, "DE"),
            phone: r.text(15),
            fax: r.text(16),
            email: r.text(17),
            bank_account: r.text(18),
            bank_code: r.text(19),
            iban: r.text(20),
            bic: r.text(21),
            bank_name: r.text(22),
            tax_number: r.text(23),
            vat_id: r.text(24),
            payment_terms: r.int_or(25, 0)?,
            delivery_terms: r.text(26),
            delivery_terms_extra: r.text(27),
            output_medium: OutputMedium::from_code(r.int_or(28, 0)?),
        })
    }

    fn to_row(&self) -> Row {
        RowWriter::new(Self::RECORD_TYPE)
            .opt_int(1, self.vendor_id)
            .int(2, self.company_id)
            .text(3, &self.salutation)
            .text(4, &self.title)
            .text(5, &self.first_name)
            .text(6, &self.last_name)
            .text(7, &self.company_name)
            .text(8, &self.department)
            .text(9, &self.street)
            .text(10, &self.postal_code)
            .text(11, &self.city)
            .text(12, &self.notes)
            .int(13, self.inactive)
            .text(14, &self.country)
            .text(15, &self.phone)
            .text(16, &self.fax)
            .text(17, &self.email)
            .text(18, &self.bank_account)
            .text(19, &self.bank_code)
            .text(20, &self.iban)
            .text(21, &self.bic)
            .text(22, &self.bank_name)
            .text(23, &self.tax_number)
            .text(24, &self.vat_id)
            .int(25, self.payment_terms)
            .text(26, &self.delivery_terms)
            .text(27, &self.delivery_terms_extra)
            .int(28, self.output_medium.code())
            .finish()
    }
}
