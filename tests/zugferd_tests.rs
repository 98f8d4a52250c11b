#![cfg(feature = "zugferd")]

mod common;

use chrono::NaiveDate;
use collmex::CollmexError;
use collmex::api::BuyerConfig;
use collmex::client::{CollmexClient, VendorQuery};
use collmex::records::Vendor;
use collmex::zugferd::{self, ZugferdInvoice, ZugferdLine, create_zugferd_xml};
use common::{MockTransport, config, response};
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn buyer() -> BuyerConfig {
    BuyerConfig {
        vat_id: Some("DE111222333".into()),
        email: Some("buchhaltung@meinefirma.de".into()),
        ..BuyerConfig::new("Meine Firma GmbH", "Hauptstr. 1", "20095", "Hamburg")
    }
}

fn vendor() -> Vendor {
    Vendor {
        vendor_id: Some(70001),
        street: "Lieferweg 5".into(),
        postal_code: "10115".into(),
        city: "Berlin".into(),
        iban: "DE89370400440532013000".into(),
        vat_id: "DE123456789".into(),
        ..Vendor::new("Lieferant AG")
    }
}

#[test]
fn vendor_from_collmex_becomes_seller() {
    let mut line = vec![""; 29];
    line[0] = "CMXLIF";
    line[1] = "70005";
    line[2] = "1";
    line[7] = "Druckerei Schwarz & Söhne";
    line[9] = "Papierweg 3";
    line[10] = "50667";
    line[11] = "Köln";
    line[17] = "info@druckerei.de";
    let mut client =
        CollmexClient::with_transport(config(), MockTransport::replying([response(&[&line])]));
    let vendor = client.get_vendors(&VendorQuery::by_id(70005)).unwrap().remove(0);

    let invoice = ZugferdInvoice::new("D-2024-55", date(2024, 9, 1))
        .line(ZugferdLine::new("Flyer A5", dec!(1000), dec!(0.12)));
    let xml = create_zugferd_xml(&vendor, &invoice, &buyer()).unwrap();

    assert!(xml.contains("<ram:Name>Druckerei Schwarz &amp; Söhne</ram:Name>"));
    assert!(xml.contains("<ram:CityName>Köln</ram:CityName>"));
    assert!(xml.contains("<ram:URIID schemeID=\"EM\">info@druckerei.de</ram:URIID>"));
    assert!(xml.contains("<ram:LineTotalAmount>120.00</ram:LineTotalAmount>"));
    assert!(xml.contains("<ram:GrandTotalAmount>142.80</ram:GrandTotalAmount>"));
    assert!(!xml.contains("SpecifiedTradeSettlementPaymentMeans"));
}

#[test]
fn seller_precedes_buyer_and_tax_registration_is_last() {
    let invoice = ZugferdInvoice::new("RE-1", date(2024, 1, 10))
        .line(ZugferdLine::new("Wartung", dec!(1), dec!(250)));
    let xml = create_zugferd_xml(&vendor(), &invoice, &buyer()).unwrap();

    let seller = xml.find("<ram:SellerTradeParty>").unwrap();
    let buyer = xml.find("<ram:BuyerTradeParty>").unwrap();
    assert!(seller < buyer);

    let buyer_block = &xml[buyer..xml.find("</ram:BuyerTradeParty>").unwrap()];
    let address = buyer_block.find("<ram:PostalTradeAddress>").unwrap();
    let uri = buyer_block.find("<ram:URIUniversalCommunication>").unwrap();
    let tax = buyer_block.find("<ram:SpecifiedTaxRegistration>").unwrap();
    assert!(address < uri && uri < tax);
}

#[test]
fn mixed_rates_produce_one_tax_block_per_rate() {
    let invoice = ZugferdInvoice::new("RE-2", date(2024, 2, 1))
        .line(ZugferdLine::new("Software", dec!(1), dec!(100)))
        .line(ZugferdLine::new("Buch", dec!(1), dec!(20)).tax_rate(dec!(7)))
        .line(ZugferdLine::new("Support", dec!(2), dec!(50)));
    let xml = create_zugferd_xml(&vendor(), &invoice, &buyer()).unwrap();

    let header = &xml[xml.find("<ram:ApplicableHeaderTradeSettlement>").unwrap()..];
    assert_eq!(header.matches("<ram:ApplicableTradeTax>").count(), 2);
    assert!(header.contains("<ram:BasisAmount>200.00</ram:BasisAmount>"));
    assert!(header.contains("<ram:CalculatedAmount>38.00</ram:CalculatedAmount>"));
    assert!(header.contains("<ram:BasisAmount>20.00</ram:BasisAmount>"));
    assert!(header.contains("<ram:CalculatedAmount>1.40</ram:CalculatedAmount>"));
    assert!(header.contains("<ram:TaxTotalAmount currencyID=\"EUR\">39.40</ram:TaxTotalAmount>"));
    assert!(header.contains("<ram:DuePayableAmount>259.40</ram:DuePayableAmount>"));
}

#[test]
fn missing_buyer_configuration() {
    let invoice = ZugferdInvoice::new("RE-3", date(2024, 3, 1))
        .line(ZugferdLine::new("x", dec!(1), dec!(1)));
    let err = create_zugferd_xml(&vendor(), &invoice, &BuyerConfig::default()).unwrap_err();
    assert!(matches!(err, CollmexError::Config(_)));
    assert!(err.to_string().contains("COLLMEX_BUYER_NAME"));
}

#[test]
fn save_writes_utf8_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rechnung.xml");
    let invoice = ZugferdInvoice::new("RE-4", date(2024, 4, 1))
        .line(ZugferdLine::new("Übersetzung", dec!(3), dec!(45.50)).unit("HUR"));
    let xml = create_zugferd_xml(&vendor(), &invoice, &buyer()).unwrap();

    zugferd::save_xml(&xml, &path).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, xml);
    assert!(written.contains("Übersetzung"));
}

#[test]
fn save_into_missing_directory_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fehlt").join("rechnung.xml");
    let err = zugferd::save_xml("<x/>", &path).unwrap_err();
    assert!(matches!(err, CollmexError::Io(_)));
}
