//! Command execution.

use colored::Colorize;
use rust_decimal::Decimal;
use serde_json::json;

use collmex::client::{
    BookingQuery, CollmexClient, MatchCriteria, OpenItemsQuery, VendorMatch, VendorQuery,
};
use collmex::records::{Vendor, VendorInvoice};
use collmex::wire::Row;
use collmex::zugferd::{ZugferdInvoice, ZugferdLine, create_zugferd_xml, save_xml};

use crate::Commands;
use crate::output::{self, cell, date, footer, table, truncate};

type CmdResult = Result<String, Box<dyn std::error::Error>>;

/// Executes a command and returns the formatted output.
pub fn execute(cmd: Commands) -> CmdResult {
    let mut client = CollmexClient::from_env()?;
    let out = run(&mut client, cmd);
    client.close();
    out
}

fn run(client: &mut CollmexClient, cmd: Commands) -> CmdResult {
    match cmd {
        Commands::Vendors { id, search, json } => {
            let vendors = client.get_vendors(&VendorQuery {
                vendor_id: id,
                text: search,
                only_changed: false,
            })?;
            if json {
                return Ok(output::json(&vendors)?);
            }
            let rows: Vec<Vec<String>> = vendors
                .iter()
                .map(|v| {
                    vec![
                        cell(v.vendor_id),
                        v.display_name(),
                        v.city.clone(),
                        v.email.clone(),
                    ]
                })
                .collect();
            Ok(table("Vendors", &["ID", "Name", "City", "Email"], &rows)
                + &footer(&format!("Total: {} vendors", vendors.len())))
        }

        Commands::VendorCreate {
            company,
            street,
            zip,
            city,
            country,
            email,
            iban,
            vat_id,
            json,
        } => {
            let vendor = Vendor {
                street: street.unwrap_or_default(),
                postal_code: zip.unwrap_or_default(),
                city: city.unwrap_or_default(),
                country,
                email: email.unwrap_or_default(),
                iban: iban.unwrap_or_default(),
                vat_id: vat_id.unwrap_or_default(),
                ..Vendor::new(company)
            };
            let response = client.create_vendor(&vendor)?;
            let new_id = new_object_id(&response);
            if json {
                return Ok(output::json(&json!({
                    "status": "created",
                    "vendor_id": new_id,
                    "response": response,
                }))?);
            }
            Ok(match new_id {
                Some(id) => format!("{} with ID {}", "Vendor created".green(), id.cyan()),
                None => "Vendor created".green().to_string(),
            })
        }

        Commands::VendorMatch {
            iban,
            vat_id,
            name,
            json,
        } => {
            let result = client.match_vendor(&MatchCriteria { iban, vat_id, name })?;
            if json {
                return Ok(output::json(&result)?);
            }
            Ok(match result {
                VendorMatch::Exact { field, vendor } => format!(
                    "{}\n  Match field: {:?}\n  Vendor ID: {}\n  Name: {}",
                    "Exact match found".green(),
                    field,
                    cell(vendor.vendor_id),
                    vendor.display_name()
                ),
                VendorMatch::Fuzzy { candidates } => {
                    let mut out = format!("{}\n", "Fuzzy matches found:".yellow());
                    for c in candidates {
                        out.push_str(&format!(
                            "  [{}] ID {}: {}\n",
                            c.score,
                            cell(c.vendor_id),
                            c.name
                        ));
                    }
                    out
                }
                VendorMatch::None => "No match found".red().to_string(),
            })
        }

        Commands::OpenItems {
            vendor,
            vendor_id,
            customer_id,
            cutoff,
            json,
        } => {
            let items = client.get_open_items(&OpenItemsQuery {
                vendor,
                customer_id,
                vendor_id,
                cutoff_date: cutoff,
            })?;
            if json {
                return Ok(output::json(&items)?);
            }
            let rows: Vec<Vec<String>> = items
                .iter()
                .map(|i| {
                    vec![
                        i.counterparty().to_string(),
                        i.invoice_number.clone(),
                        date(i.document_date),
                        date(i.due_date),
                        i.days_overdue.to_string(),
                        cell(i.open_amount),
                    ]
                })
                .collect();
            let total: Decimal = items.iter().filter_map(|i| i.open_amount).sum();
            let title = if vendor { "Open Items (Vendor)" } else { "Open Items (Customer)" };
            Ok(table(
                title,
                &["Name", "Invoice #", "Date", "Due", "Overdue", "Open Amount"],
                &rows,
            ) + &footer(&format!("Total: {} items, {total} EUR open", items.len())))
        }

        Commands::Bookings {
            account,
            vendor_id,
            customer_id,
            year,
            search,
            from,
            to,
            json,
        } => {
            let bookings = client.get_bookings(&BookingQuery {
                fiscal_year: year,
                account_number: account,
                customer_id,
                vendor_id,
                text: search,
                date_from: from,
                date_to: to,
                ..Default::default()
            })?;
            if json {
                return Ok(output::json(&bookings)?);
            }
            let rows: Vec<Vec<String>> = bookings
                .iter()
                .map(|b| {
                    vec![
                        b.booking_id.to_string(),
                        date(b.document_date),
                        b.account_number.to_string(),
                        b.debit_credit.clone(),
                        cell(b.amount),
                        truncate(&b.booking_text, 40),
                    ]
                })
                .collect();
            Ok(table(
                "Bookings",
                &["ID", "Date", "Account", "D/C", "Amount", "Text"],
                &rows,
            ) + &footer(&format!("Total: {} bookings", bookings.len())))
        }

        Commands::Unmatched {
            account,
            year,
            from,
            to,
            json,
        } => {
            let unmatched = client.get_unmatched_bank_transactions(Some(account), year, from, to)?;
            if json {
                return Ok(output::json(&unmatched)?);
            }
            let rows: Vec<Vec<String>> = unmatched
                .iter()
                .map(|b| {
                    vec![
                        b.booking_id.to_string(),
                        date(b.document_date),
                        b.debit_credit.clone(),
                        cell(b.amount),
                        truncate(&b.booking_text, 50),
                    ]
                })
                .collect();
            Ok(table(
                &format!("Unmatched Bank Transactions (Account {account})"),
                &["ID", "Date", "D/C", "Amount", "Text"],
                &rows,
            ) + &footer(&format!(
                "Total: {} unmatched transactions",
                unmatched.len()
            )))
        }

        Commands::VendorInvoice {
            vendor_id,
            invoice,
            date: invoice_date,
            net,
            tax,
            text,
            account,
            cost_center,
            json,
        } => {
            let inv = VendorInvoice {
                net_amount_full_tax: Some(net),
                tax_full: tax,
                booking_text: text.unwrap_or_default(),
                account_full_tax: account,
                cost_center: cost_center.unwrap_or_default(),
                ..VendorInvoice::new(vendor_id, invoice, invoice_date)
            };
            let response = client.create_vendor_invoice(&inv)?;
            if json {
                return Ok(output::json(&json!({
                    "status": "created",
                    "invoice": inv,
                    "response": response,
                }))?);
            }
            Ok(format!(
                "{}\n  Vendor: {}\n  Invoice: {}\n  Amount: {} EUR (net)",
                "Vendor invoice created".green(),
                vendor_id,
                inv.invoice_number.cyan(),
                net
            ))
        }

        Commands::ZugferdCreate {
            vendor_id,
            invoice,
            date: invoice_date,
            desc,
            net,
            tax_rate,
            qty,
            output: path,
            buyer_id,
            due,
            notes,
        } => {
            let vendor = client
                .get_vendors(&VendorQuery::by_id(vendor_id))?
                .into_iter()
                .next()
                .ok_or_else(|| format!("vendor {vendor_id} not found"))?;
            let unit_price = net
                .checked_div(qty)
                .ok_or("quantity must not be zero")?;

            let mut doc = ZugferdInvoice::new(invoice, invoice_date)
                .line(ZugferdLine::new(desc, qty, unit_price).tax_rate(tax_rate));
            doc.buyer_id = buyer_id;
            doc.due_date = due;
            doc.notes = notes;

            let buyer = client.config().buyer.clone().unwrap_or_default();
            let xml = create_zugferd_xml(&vendor, &doc, &buyer)?;
            match path {
                Some(path) => {
                    save_xml(&xml, &path)?;
                    Ok(format!("{} {}", "ZUGFeRD XML saved to".green(), path.display()))
                }
                None => Ok(xml),
            }
        }

        Commands::Test => {
            let vendors = client.get_vendors(&VendorQuery::default())?;
            Ok(format!(
                "{}\nFound {} vendors in your account.",
                "Connection successful!".green(),
                vendors.len()
            ))
        }
    }
}

/// The id Collmex assigns to a created record, from its `NEW_OBJECT_ID` row.
fn new_object_id(rows: &[Row]) -> Option<String> {
    rows.iter()
        .find(|r| collmex::wire::discriminator(r) == "NEW_OBJECT_ID")
        .map(|r| collmex::wire::field(r, 1).to_string())
        .filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_object_id_from_response() {
        let rows: Vec<Row> = vec![
            vec!["MESSAGE".into(), "S".into(), "204020".into(), "ok".into()],
            vec!["NEW_OBJECT_ID".into(), "70009".into(), "0".into(), "1".into()],
        ];
        assert_eq!(new_object_id(&rows).as_deref(), Some("70009"));
        assert_eq!(new_object_id(&rows[..1]), None);
    }
}
