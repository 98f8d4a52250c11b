use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::xml::XmlWriter;
use super::{CURRENCY, EN16931_GUIDELINE, INVOICE_TYPE_CODE, SEPA_CREDIT_TRANSFER, cii_ns};
use crate::api::BuyerConfig;
use crate::error::{CollmexError, Result};
use crate::records::Vendor;

/// UN/ECE rec 20 code for "piece".
pub const DEFAULT_UNIT: &str = "C62";

/// One invoiced position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZugferdLine {
    pub description: String,
    pub quantity: Decimal,
    /// UN/ECE rec 20 unit code, `C62` unless set.
    pub unit: String,
    /// Net price per unit.
    pub unit_price: Decimal,
    /// VAT percentage, 19 unless set.
    pub tax_rate: Decimal,
}

impl ZugferdLine {
    pub fn new(description: impl Into<String>, quantity: Decimal, unit_price: Decimal) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit: DEFAULT_UNIT.into(),
            unit_price,
            tax_rate: dec!(19),
        }
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn tax_rate(mut self, rate: Decimal) -> Self {
        self.tax_rate = rate;
        self
    }

    /// Quantity times unit price, rounded to cents.
    pub fn net_total(&self) -> Decimal {
        round_cents(self.quantity * self.unit_price)
    }
}

/// Header data of a vendor invoice to describe as ZUGFeRD XML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZugferdInvoice {
    pub number: String,
    pub date: NaiveDate,
    pub lines: Vec<ZugferdLine>,
    /// Our customer number at the vendor.
    pub buyer_id: Option<String>,
    pub payment_terms: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl ZugferdInvoice {
    pub fn new(number: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            number: number.into(),
            date,
            lines: Vec::new(),
            buyer_id: None,
            payment_terms: None,
            due_date: None,
            notes: None,
        }
    }

    pub fn line(mut self, line: ZugferdLine) -> Self {
        self.lines.push(line);
        self
    }

    /// Net amount, VAT and gross amount over all lines.
    pub fn totals(&self) -> Totals {
        let mut by_rate: BTreeMap<Decimal, Decimal> = BTreeMap::new();
        for line in &self.lines {
            *by_rate.entry(line.tax_rate.normalize()).or_default() += line.net_total();
        }
        let taxes: Vec<TaxSubtotal> = by_rate
            .into_iter()
            .map(|(rate, basis)| TaxSubtotal {
                rate,
                basis,
                tax: round_cents(basis * rate / dec!(100)),
            })
            .collect();
        let net: Decimal = taxes.iter().map(|t| t.basis).sum();
        let tax: Decimal = taxes.iter().map(|t| t.tax).sum();
        Totals {
            net,
            tax,
            gross: net + tax,
            taxes,
        }
    }
}

/// VAT of all lines sharing one rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxSubtotal {
    pub rate: Decimal,
    pub basis: Decimal,
    pub tax: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Totals {
    pub net: Decimal,
    pub tax: Decimal,
    pub gross: Decimal,
    /// Ascending by rate.
    pub taxes: Vec<TaxSubtotal>,
}

fn round_cents(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `S` for a positive rate, `Z` for zero-rated lines.
fn tax_category(rate: Decimal) -> &'static str {
    if rate.is_zero() { "Z" } else { "S" }
}

/// Build EN 16931 CII XML for an incoming invoice: `vendor` is the seller,
/// `buyer` is our own company.
pub fn create_zugferd_xml(
    vendor: &Vendor,
    invoice: &ZugferdInvoice,
    buyer: &BuyerConfig,
) -> Result<String> {
    let (Some(buyer_name), true) = (buyer.name.as_deref(), buyer.is_complete()) else {
        return Err(CollmexError::Config(
            "buyer configuration missing: set COLLMEX_BUYER_NAME, COLLMEX_BUYER_STREET, \
             COLLMEX_BUYER_ZIP, COLLMEX_BUYER_CITY"
                .into(),
        ));
    };
    if invoice.lines.is_empty() {
        return Err(CollmexError::Xml(format!(
            "invoice {} has no line items",
            invoice.number
        )));
    }

    let totals = invoice.totals();
    tracing::debug!(
        invoice = %invoice.number,
        lines = invoice.lines.len(),
        net = %totals.net,
        tax = %totals.tax,
        "writing ZUGFeRD XML"
    );

    let mut w = XmlWriter::new()?;
    w.start_with_attrs(
        "rsm:CrossIndustryInvoice",
        &[
            ("xmlns:rsm", cii_ns::RSM),
            ("xmlns:ram", cii_ns::RAM),
            ("xmlns:qdt", cii_ns::QDT),
            ("xmlns:udt", cii_ns::UDT),
        ],
    )?;

    w.start("rsm:ExchangedDocumentContext")?;
    w.start("ram:GuidelineSpecifiedDocumentContextParameter")?;
    w.text("ram:ID", EN16931_GUIDELINE)?;
    w.end("ram:GuidelineSpecifiedDocumentContextParameter")?;
    w.end("rsm:ExchangedDocumentContext")?;

    w.start("rsm:ExchangedDocument")?;
    w.text("ram:ID", &invoice.number)?;
    w.text("ram:TypeCode", INVOICE_TYPE_CODE)?;
    w.date("ram:IssueDateTime", invoice.date)?;
    if let Some(notes) = &invoice.notes {
        w.start("ram:IncludedNote")?;
        w.text("ram:Content", notes)?;
        w.end("ram:IncludedNote")?;
    }
    w.end("rsm:ExchangedDocument")?;

    w.start("rsm:SupplyChainTradeTransaction")?;
    for (i, line) in invoice.lines.iter().enumerate() {
        write_line(&mut w, i + 1, line)?;
    }

    w.start("ram:ApplicableHeaderTradeAgreement")?;
    write_seller(&mut w, vendor)?;
    write_buyer(&mut w, buyer_name, buyer, invoice.buyer_id.as_deref())?;
    w.end("ram:ApplicableHeaderTradeAgreement")?;

    w.start("ram:ApplicableHeaderTradeDelivery")?;
    w.end("ram:ApplicableHeaderTradeDelivery")?;

    w.start("ram:ApplicableHeaderTradeSettlement")?;
    w.text("ram:InvoiceCurrencyCode", CURRENCY)?;
    if !vendor.iban.is_empty() {
        w.start("ram:SpecifiedTradeSettlementPaymentMeans")?;
        w.text("ram:TypeCode", SEPA_CREDIT_TRANSFER)?;
        w.start("ram:PayeePartyCreditorFinancialAccount")?;
        w.text("ram:IBANID", &vendor.iban)?;
        w.end("ram:PayeePartyCreditorFinancialAccount")?;
        if !vendor.bic.is_empty() {
            w.start("ram:PayeeSpecifiedCreditorFinancialInstitution")?;
            w.text("ram:BICID", &vendor.bic)?;
            w.end("ram:PayeeSpecifiedCreditorFinancialInstitution")?;
        }
        w.end("ram:SpecifiedTradeSettlementPaymentMeans")?;
    }

    for t in &totals.taxes {
        w.start("ram:ApplicableTradeTax")?;
        w.amount("ram:CalculatedAmount", t.tax)?;
        w.text("ram:TypeCode", "VAT")?;
        w.amount("ram:BasisAmount", t.basis)?;
        w.text("ram:CategoryCode", tax_category(t.rate))?;
        w.amount("ram:RateApplicablePercent", t.rate)?;
        w.end("ram:ApplicableTradeTax")?;
    }

    if invoice.payment_terms.is_some() || invoice.due_date.is_some() {
        w.start("ram:SpecifiedTradePaymentTerms")?;
        if let Some(terms) = &invoice.payment_terms {
            w.text("ram:Description", terms)?;
        }
        if let Some(due) = invoice.due_date {
            w.date("ram:DueDateDateTime", due)?;
        }
        w.end("ram:SpecifiedTradePaymentTerms")?;
    }

    w.start("ram:SpecifiedTradeSettlementHeaderMonetarySummation")?;
    w.amount("ram:LineTotalAmount", totals.net)?;
    w.amount("ram:ChargeTotalAmount", Decimal::ZERO)?;
    w.amount("ram:AllowanceTotalAmount", Decimal::ZERO)?;
    w.amount("ram:TaxBasisTotalAmount", totals.net)?;
    w.text_with_attrs(
        "ram:TaxTotalAmount",
        &super::xml::format_amount(totals.tax),
        &[("currencyID", CURRENCY)],
    )?;
    w.amount("ram:GrandTotalAmount", totals.gross)?;
    w.amount("ram:TotalPrepaidAmount", Decimal::ZERO)?;
    w.amount("ram:DuePayableAmount", totals.gross)?;
    w.end("ram:SpecifiedTradeSettlementHeaderMonetarySummation")?;

    w.end("ram:ApplicableHeaderTradeSettlement")?;
    w.end("rsm:SupplyChainTradeTransaction")?;
    w.end("rsm:CrossIndustryInvoice")?;
    w.into_string()
}

fn write_line(w: &mut XmlWriter, id: usize, line: &ZugferdLine) -> Result<()> {
    w.start("ram:IncludedSupplyChainTradeLineItem")?;
    w.start("ram:AssociatedDocumentLineDocument")?;
    w.text("ram:LineID", &id.to_string())?;
    w.end("ram:AssociatedDocumentLineDocument")?;

    w.start("ram:SpecifiedTradeProduct")?;
    w.text("ram:Name", &line.description)?;
    w.end("ram:SpecifiedTradeProduct")?;

    w.start("ram:SpecifiedLineTradeAgreement")?;
    w.start("ram:NetPriceProductTradePrice")?;
    w.amount("ram:ChargeAmount", line.unit_price)?;
    w.text_with_attrs("ram:BasisQuantity", "1.000", &[("unitCode", line.unit.as_str())])?;
    w.end("ram:NetPriceProductTradePrice")?;
    w.end("ram:SpecifiedLineTradeAgreement")?;

    w.start("ram:SpecifiedLineTradeDelivery")?;
    w.text_with_attrs(
        "ram:BilledQuantity",
        &super::xml::format_amount(line.quantity),
        &[("unitCode", line.unit.as_str())],
    )?;
    w.end("ram:SpecifiedLineTradeDelivery")?;

    w.start("ram:SpecifiedLineTradeSettlement")?;
    w.start("ram:ApplicableTradeTax")?;
    w.text("ram:TypeCode", "VAT")?;
    w.text("ram:CategoryCode", tax_category(line.tax_rate))?;
    w.amount("ram:RateApplicablePercent", line.tax_rate)?;
    w.end("ram:ApplicableTradeTax")?;
    w.start("ram:SpecifiedTradeSettlementLineMonetarySummation")?;
    w.amount("ram:LineTotalAmount", line.net_total())?;
    w.end("ram:SpecifiedTradeSettlementLineMonetarySummation")?;
    w.end("ram:SpecifiedLineTradeSettlement")?;

    w.end("ram:IncludedSupplyChainTradeLineItem")?;
    Ok(())
}

// CII fixes the child order of a trade party: Name, ID-bearing organisation,
// PostalTradeAddress, URIUniversalCommunication, SpecifiedTaxRegistration.
fn write_seller(w: &mut XmlWriter, vendor: &Vendor) -> Result<()> {
    w.start("ram:SellerTradeParty")?;
    w.text("ram:Name", &vendor.display_name())?;

    w.start("ram:PostalTradeAddress")?;
    if !vendor.postal_code.is_empty() {
        w.text("ram:PostcodeCode", &vendor.postal_code)?;
    }
    if !vendor.street.is_empty() {
        w.text("ram:LineOne", &vendor.street)?;
    }
    if !vendor.city.is_empty() {
        w.text("ram:CityName", &vendor.city)?;
    }
    let country = if vendor.country.is_empty() { "DE" } else { &vendor.country };
    w.text("ram:CountryID", country)?;
    w.end("ram:PostalTradeAddress")?;

    if !vendor.email.is_empty() {
        w.start("ram:URIUniversalCommunication")?;
        w.text_with_attrs("ram:URIID", &vendor.email, &[("schemeID", "EM")])?;
        w.end("ram:URIUniversalCommunication")?;
    }
    if !vendor.vat_id.is_empty() {
        w.start("ram:SpecifiedTaxRegistration")?;
        w.text_with_attrs("ram:ID", &vendor.vat_id, &[("schemeID", "VA")])?;
        w.end("ram:SpecifiedTaxRegistration")?;
    }
    w.end("ram:SellerTradeParty")?;
    Ok(())
}

fn write_buyer(
    w: &mut XmlWriter,
    name: &str,
    buyer: &BuyerConfig,
    buyer_id: Option<&str>,
) -> Result<()> {
    w.start("ram:BuyerTradeParty")?;
    if let Some(id) = buyer_id {
        w.text("ram:ID", id)?;
    }
    w.text("ram:Name", name)?;

    w.start("ram:PostalTradeAddress")?;
    if let Some(zip) = &buyer.zip {
        w.text("ram:PostcodeCode", zip)?;
    }
    if let Some(street) = &buyer.street {
        w.text("ram:LineOne", street)?;
    }
    if let Some(city) = &buyer.city {
        w.text("ram:CityName", city)?;
    }
    w.text("ram:CountryID", &buyer.country)?;
    w.end("ram:PostalTradeAddress")?;

    if let Some(email) = &buyer.email {
        w.start("ram:URIUniversalCommunication")?;
        w.text_with_attrs("ram:URIID", email, &[("schemeID", "EM")])?;
        w.end("ram:URIUniversalCommunication")?;
    }
    if let Some(vat_id) = &buyer.vat_id {
        w.start("ram:SpecifiedTaxRegistration")?;
        w.text_with_attrs("ram:ID", vat_id, &[("schemeID", "VA")])?;
        w.end("ram:SpecifiedTaxRegistration")?;
    }
    w.end("ram:BuyerTradeParty")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buyer() -> BuyerConfig {
        BuyerConfig::new("Meine Firma GmbH", "Hauptstr. 1", "20095", "Hamburg")
    }

    fn vendor() -> Vendor {
        Vendor {
            vendor_id: Some(70001),
            street: "Lieferweg 5".into(),
            postal_code: "10115".into(),
            city: "Berlin".into(),
            email: "rechnung@lieferant.de".into(),
            iban: "DE89370400440532013000".into(),
            bic: "COBADEFFXXX".into(),
            vat_id: "DE123456789".into(),
            ..Vendor::new("Lieferant AG")
        }
    }

    fn invoice() -> ZugferdInvoice {
        ZugferdInvoice::new("RE-2024-001", NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
            .line(ZugferdLine::new("Beratung", dec!(10), dec!(120)).unit("HUR"))
            .line(ZugferdLine::new("Fachbuch", dec!(2), dec!(24.95)).tax_rate(dec!(7)))
            .line(ZugferdLine::new("Reisekosten", dec!(1), dec!(80)))
    }

    #[test]
    fn totals_group_by_rate() {
        let t = invoice().totals();
        assert_eq!(t.net, dec!(1329.90));
        assert_eq!(t.taxes.len(), 2);
        assert_eq!(t.taxes[0].rate, dec!(7));
        assert_eq!(t.taxes[0].basis, dec!(49.90));
        assert_eq!(t.taxes[0].tax, dec!(3.49));
        assert_eq!(t.taxes[1].basis, dec!(1280));
        assert_eq!(t.taxes[1].tax, dec!(243.20));
        assert_eq!(t.gross, dec!(1576.59));
    }

    #[test]
    fn equal_rates_with_different_scale_share_a_group() {
        let inv = ZugferdInvoice::new("X", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .line(ZugferdLine::new("a", dec!(1), dec!(10)).tax_rate(dec!(19.00)))
            .line(ZugferdLine::new("b", dec!(1), dec!(10)));
        assert_eq!(inv.totals().taxes.len(), 1);
    }

    #[test]
    fn writes_seller_buyer_and_summation() {
        let xml = create_zugferd_xml(&vendor(), &invoice(), &buyer()).unwrap();
        assert!(xml.contains("<ram:ID>urn:cen.eu:en16931:2017</ram:ID>"));
        assert!(xml.contains("<ram:TypeCode>380</ram:TypeCode>"));
        assert!(xml.contains("<udt:DateTimeString format=\"102\">20240315</udt:DateTimeString>"));
        assert!(xml.contains("<ram:Name>Lieferant AG</ram:Name>"));
        assert!(xml.contains("<ram:Name>Meine Firma GmbH</ram:Name>"));
        assert!(xml.contains("<ram:URIID schemeID=\"EM\">rechnung@lieferant.de</ram:URIID>"));
        assert!(xml.contains("<ram:ID schemeID=\"VA\">DE123456789</ram:ID>"));
        assert!(xml.contains("<ram:IBANID>DE89370400440532013000</ram:IBANID>"));
        assert!(xml.contains("<ram:BICID>COBADEFFXXX</ram:BICID>"));
        assert!(xml.contains("<ram:BilledQuantity unitCode=\"HUR\">10.00</ram:BilledQuantity>"));
        assert!(xml.contains("<ram:TaxTotalAmount currencyID=\"EUR\">246.69</ram:TaxTotalAmount>"));
        assert!(xml.contains("<ram:GrandTotalAmount>1576.59</ram:GrandTotalAmount>"));
        assert!(xml.contains("<ram:DuePayableAmount>1576.59</ram:DuePayableAmount>"));
    }

    #[test]
    fn payment_means_only_with_iban() {
        let mut v = vendor();
        v.iban.clear();
        let xml = create_zugferd_xml(&v, &invoice(), &buyer()).unwrap();
        assert!(!xml.contains("SpecifiedTradeSettlementPaymentMeans"));
    }

    #[test]
    fn payment_terms_and_buyer_id() {
        let mut inv = invoice();
        inv.payment_terms = Some("14 Tage netto".into());
        inv.due_date = NaiveDate::from_ymd_opt(2024, 3, 29);
        inv.buyer_id = Some("K-4711".into());
        let xml = create_zugferd_xml(&vendor(), &inv, &buyer()).unwrap();
        assert!(xml.contains("<ram:Description>14 Tage netto</ram:Description>"));
        assert!(xml.contains("20240329"));
        assert!(xml.contains("<ram:ID>K-4711</ram:ID>"));
    }

    #[test]
    fn incomplete_buyer_is_a_config_error() {
        let mut b = buyer();
        b.city = None;
        let err = create_zugferd_xml(&vendor(), &invoice(), &b).unwrap_err();
        assert!(matches!(err, CollmexError::Config(_)));
    }

    #[test]
    fn invoice_without_lines_is_rejected() {
        let inv = ZugferdInvoice::new("X", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert!(create_zugferd_xml(&vendor(), &inv, &buyer()).is_err());
    }

    #[test]
    fn private_vendor_named_by_person() {
        let mut v = Vendor::new("");
        v.first_name = "Erika".into();
        v.last_name = "Mustermann".into();
        let xml = create_zugferd_xml(&v, &invoice(), &buyer()).unwrap();
        assert!(xml.contains("<ram:Name>Erika Mustermann</ram:Name>"));
        assert!(xml.contains("<ram:CountryID>DE</ram:CountryID>"));
    }
}
