//! Typed client operations against an in-memory transport.

mod common;

use chrono::NaiveDate;
use collmex::CollmexError;
use collmex::client::{
    BookingQuery, CollmexClient, MatchCriteria, MatchField, OpenItemsQuery, VendorMatch,
    VendorQuery,
};
use collmex::records::{OutputMedium, Vendor, VendorInvoice};
use common::{MockTransport, config, response};
use rust_decimal_macros::dec;

fn client(replies: Vec<Vec<u8>>) -> CollmexClient<MockTransport> {
    CollmexClient::with_transport(config(), MockTransport::replying(replies))
}

fn vendor_line<'a>(id: &'a str, name: &'a str, iban: &'a str, vat: &'a str) -> Vec<&'a str> {
    let mut f = vec![""; 29];
    f[0] = "CMXLIF";
    f[1] = id;
    f[2] = "1";
    f[7] = name;
    f[11] = "Hamburg";
    f[20] = iban;
    f[24] = vat;
    f
}

fn accdoc_line<'a>(
    booking: &'a str,
    customer: &'a str,
    vendor: &'a str,
    invoice: &'a str,
) -> Vec<&'a str> {
    let mut f = vec![""; 28];
    f[0] = "ACCDOC";
    f[1] = "1";
    f[2] = "2024";
    f[3] = booking;
    f[4] = "20240305";
    f[6] = "Kontoauszug";
    f[7] = "1";
    f[8] = "1200";
    f[10] = "H";
    f[11] = "-119,00";
    f[12] = customer;
    f[14] = vendor;
    f[20] = invoice;
    f
}

#[test]
fn get_vendors_decodes_only_vendor_rows() {
    let v1 = vendor_line("70001", "Müller Bürobedarf GmbH", "DE89370400440532013000", "");
    let v2 = vendor_line("70002", "Stadtwerke Hamburg", "", "DE987654321");
    let reply = response(&[&v1, &["MESSAGE", "S", "204020", "ok"], &v2]);
    let mut c = client(vec![reply]);

    let vendors = c.get_vendors(&VendorQuery::default()).unwrap();
    assert_eq!(vendors.len(), 2);
    assert_eq!(vendors[0].vendor_id, Some(70001));
    assert_eq!(vendors[0].company_name, "Müller Bürobedarf GmbH");
    assert_eq!(vendors[0].country, "DE");
    assert_eq!(vendors[1].vat_id, "DE987654321");

    let sent = c.api().transport().request_rows(0);
    assert_eq!(sent[1], vec!["VENDOR_GET", "", "1", "", "", "", "", ""]);
}

#[test]
fn company_id_comes_from_config() {
    let mut c = CollmexClient::with_transport(config().company_id(3), MockTransport::default());
    c.get_open_items(&OpenItemsQuery::vendors()).unwrap();
    let sent = c.api().transport().request_rows(0);
    assert_eq!(sent[1], vec!["OPEN_ITEMS_GET", "3", "1", "", "", "", ""]);
}

#[test]
fn open_items_are_decoded() {
    let mut line = vec![""; 20];
    line[0] = "OPEN_ITEM";
    line[1] = "1";
    line[2] = "2024";
    line[3] = "88";
    line[4] = "1";
    line[7] = "70001";
    line[8] = "Müller Bürobedarf GmbH";
    line[9] = "RE-4711";
    line[10] = "20240201";
    line[12] = "20240301";
    line[13] = "14";
    line[17] = "238,00";
    line[18] = "0,00";
    line[19] = "238,00";
    let mut c = client(vec![response(&[&line])]);

    let items = c
        .get_open_items(&OpenItemsQuery {
            vendor_id: Some(70001),
            cutoff_date: NaiveDate::from_ymd_opt(2024, 3, 15),
            ..OpenItemsQuery::vendors()
        })
        .unwrap();
    assert_eq!(items.len(), 1);
    let item = &items[0];
    assert_eq!(item.customer_id, None);
    assert_eq!(item.vendor_id, Some(70001));
    assert_eq!(item.counterparty(), "Müller Bürobedarf GmbH");
    assert_eq!(item.days_overdue, 14);
    assert_eq!(item.paid, Some(dec!(0)));
    assert_eq!(item.open_amount, Some(dec!(238.00)));

    let sent = c.api().transport().request_rows(0);
    assert_eq!(sent[1], vec!["OPEN_ITEMS_GET", "1", "1", "", "70001", "", "20240315"]);
}

#[test]
fn bookings_query_row_and_decoding() {
    let reply = response(&[&accdoc_line("17", "", "70001", "RE-1")]);
    let mut c = client(vec![reply]);
    let docs = c
        .get_bookings(&BookingQuery {
            fiscal_year: Some(2024),
            vendor_id: Some(70001),
            only_changed: true,
            ..Default::default()
        })
        .unwrap();
    assert_eq!(docs[0].booking_id, 17);
    assert_eq!(docs[0].amount, Some(dec!(-119.00)));
    assert!(!docs[0].is_debit());

    let sent = c.api().transport().request_rows(0);
    assert_eq!(sent[1].len(), 16);
    assert_eq!(sent[1][2], "2024");
    assert_eq!(sent[1][7], "70001");
    assert_eq!(sent[1][15], "1");
}

#[test]
fn unmatched_keeps_bookings_without_any_reference() {
    let reply = response(&[
        &accdoc_line("1", "", "", ""),
        &accdoc_line("2", "", "70001", ""),
        &accdoc_line("3", "10001", "", ""),
        &accdoc_line("4", "", "", "RE-9"),
        &accdoc_line("5", "0", "", ""),
        &accdoc_line("6", "", "", ""),
    ]);
    let mut c = client(vec![reply]);
    let unmatched = c
        .get_unmatched_bank_transactions(None, Some(2024), None, None)
        .unwrap();
    let ids: Vec<u32> = unmatched.iter().map(|b| b.booking_id).collect();
    assert_eq!(ids, vec![1, 6]);

    let sent = c.api().transport().request_rows(0);
    assert_eq!(sent[1][4], "1200");
    assert_eq!(c.api().transport().requests.len(), 1);
}

#[test]
fn unmatched_uses_given_account() {
    let mut c = client(vec![]);
    c.get_unmatched_bank_transactions(Some(1210), None, None, None)
        .unwrap();
    assert_eq!(c.api().transport().request_rows(0)[1][4], "1210");
}

#[test]
fn create_vendor_sends_full_record_and_returns_raw_rows() {
    let reply = response(&[
        &["NEW_OBJECT_ID", "70009", "0", "1"],
        &["MESSAGE", "S", "204020", "Datensatz übernommen"],
    ]);
    let mut c = client(vec![reply]);
    let vendor = Vendor {
        iban: "DE02120300000000202051".into(),
        output_medium: OutputMedium::Email,
        ..Vendor::new("Neue Lieferant GmbH")
    };
    let rows = c.create_vendor(&vendor).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][1], "70009");

    let sent = c.api().transport().request_rows(0);
    assert_eq!(sent[1].len(), 29);
    assert_eq!(sent[1][0], "CMXLIF");
    assert_eq!(sent[1][1], "");
    assert_eq!(sent[1][7], "Neue Lieferant GmbH");
    assert_eq!(sent[1][28], "1");
}

#[test]
fn create_vendor_invoice_sends_comma_decimals() {
    let mut c = client(vec![]);
    let invoice = VendorInvoice {
        net_amount_full_tax: Some(dec!(100.00)),
        tax_full: Some(dec!(19.00)),
        booking_text: "Büromaterial".into(),
        ..VendorInvoice::new(70001, "RE-2024-17", NaiveDate::from_ymd_opt(2024, 4, 2).unwrap())
    };
    c.create_vendor_invoice(&invoice).unwrap();

    let sent = c.api().transport().request_rows(0);
    let row = &sent[1];
    assert_eq!(row.len(), 21);
    assert_eq!(row[0], "CMXLRN");
    assert_eq!(row[1], "70001");
    assert_eq!(row[3], "20240402");
    assert_eq!(row[4], "RE-2024-17");
    assert_eq!(row[5], "100,00");
    assert_eq!(row[6], "19,00");
    assert_eq!(row[7], "");
    assert_eq!(row[11], "EUR");
    assert_eq!(row[13], "");
}

#[test]
fn server_rejection_surfaces_from_write() {
    let reply = response(&[&["MESSAGE", "E", "204015", "Rechnungsnummer existiert bereits", "2"]]);
    let mut c = client(vec![reply]);
    let invoice =
        VendorInvoice::new(70001, "RE-1", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    let err = c.create_vendor_invoice(&invoice).unwrap_err();
    assert_eq!(err.code(), Some("204015"));
}

#[test]
fn match_vendor_by_iban() {
    let reply = response(&[
        &vendor_line("70001", "Müller Bürobedarf GmbH", "DE89370400440532013000", ""),
        &vendor_line("70002", "Stadtwerke Hamburg", "", "DE987654321"),
    ]);
    let mut c = client(vec![reply]);
    let m = c
        .match_vendor(&MatchCriteria {
            iban: Some("DE89 3704 0044 0532 0130 00".into()),
            ..Default::default()
        })
        .unwrap();
    assert!(matches!(m, VendorMatch::Exact { field: MatchField::Iban, .. }));
    assert_eq!(m.vendor_id(), Some(70001));
}

#[test]
fn match_vendor_fuzzy_by_name() {
    let reply = response(&[
        &vendor_line("70001", "Müller Bürobedarf GmbH", "", ""),
        &vendor_line("70002", "Stadtwerke Hamburg", "", ""),
    ]);
    let mut c = client(vec![reply]);
    let m = c
        .match_vendor(&MatchCriteria {
            name: Some("stadtwerke".into()),
            ..Default::default()
        })
        .unwrap();
    let VendorMatch::Fuzzy { candidates } = m else {
        panic!("expected fuzzy match");
    };
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].vendor_id, Some(70002));
}

#[test]
fn empty_criteria_skip_the_request() {
    let mut c = client(vec![]);
    let m = c.match_vendor(&MatchCriteria::default()).unwrap();
    assert_eq!(m, VendorMatch::None);
    assert!(c.api().transport().requests.is_empty());
}

#[test]
fn invalid_field_in_response_is_reported() {
    let mut line = accdoc_line("x7", "", "", "");
    line[3] = "x7";
    let mut c = client(vec![response(&[&line])]);
    let err = c.get_bookings(&BookingQuery::default()).unwrap_err();
    assert!(matches!(err, CollmexError::Field { record: "ACCDOC", index: 3, .. }));
}

#[test]
fn vendor_match_serializes_with_tag() {
    let m = VendorMatch::Fuzzy { candidates: vec![] };
    let json = serde_json::to_value(&m).unwrap();
    assert_eq!(json["match"], "fuzzy");
    assert_eq!(serde_json::to_value(VendorMatch::None).unwrap()["match"], "none");
}
