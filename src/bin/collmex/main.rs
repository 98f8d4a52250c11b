//! collmex - command-line interface for the Collmex accounting API
//!
//! Credentials come from `COLLMEX_CUSTOMER_ID`, `COLLMEX_USERNAME` and
//! `COLLMEX_PASSWORD`; buyer data for ZUGFeRD from `COLLMEX_BUYER_*`.

mod commands;
mod output;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{ArgGroup, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "collmex")]
#[command(about = "CLI for the Collmex accounting API (Buchhaltung Pro)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List vendors (Lieferanten)
    Vendors {
        /// Filter by vendor ID
        #[arg(long)]
        id: Option<u32>,

        /// Search text
        #[arg(short, long)]
        search: Option<String>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Create a new vendor
    VendorCreate {
        /// Company name
        #[arg(short, long)]
        company: String,

        #[arg(long)]
        street: Option<String>,

        /// Postal code
        #[arg(long)]
        zip: Option<String>,

        #[arg(long)]
        city: Option<String>,

        /// ISO country code
        #[arg(long, default_value = "DE")]
        country: String,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        iban: Option<String>,

        /// VAT ID (USt-IdNr)
        #[arg(long)]
        vat_id: Option<String>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Match a vendor by IBAN, VAT ID or name (in that order)
    #[command(group(ArgGroup::new("criteria").required(true).multiple(true).args(["iban", "vat_id", "name"])))]
    VendorMatch {
        #[arg(long)]
        iban: Option<String>,

        /// VAT ID (USt-IdNr)
        #[arg(long)]
        vat_id: Option<String>,

        /// Company name, matched fuzzily
        #[arg(short, long)]
        name: Option<String>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// List open items (unpaid invoices)
    OpenItems {
        /// Vendor open items instead of customer open items
        #[arg(short, long)]
        vendor: bool,

        #[arg(long)]
        vendor_id: Option<u32>,

        #[arg(long)]
        customer_id: Option<u32>,

        /// Items open as of this date (YYYY-MM-DD)
        #[arg(long)]
        cutoff: Option<NaiveDate>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// List accounting documents (Buchungen)
    Bookings {
        /// Account number
        #[arg(short, long)]
        account: Option<u32>,

        #[arg(long)]
        vendor_id: Option<u32>,

        #[arg(long)]
        customer_id: Option<u32>,

        /// Fiscal year
        #[arg(short, long)]
        year: Option<i32>,

        /// Search in booking text
        #[arg(short, long)]
        search: Option<String>,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// List bank transactions that still need a receipt
    Unmatched {
        /// Bank account number
        #[arg(short, long, default_value_t = collmex::client::DEFAULT_BANK_ACCOUNT)]
        account: u32,

        /// Fiscal year
        #[arg(short, long)]
        year: Option<i32>,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Book a vendor invoice (Lieferantenrechnung)
    VendorInvoice {
        #[arg(short, long)]
        vendor_id: u32,

        /// Invoice number
        #[arg(short, long)]
        invoice: String,

        /// Invoice date (YYYY-MM-DD)
        #[arg(short, long)]
        date: NaiveDate,

        /// Net amount at the full VAT rate
        #[arg(short, long)]
        net: Decimal,

        /// Tax amount, calculated by Collmex if omitted
        #[arg(long)]
        tax: Option<Decimal>,

        /// Booking text
        #[arg(short, long)]
        text: Option<String>,

        /// Expense account
        #[arg(short, long)]
        account: Option<u32>,

        #[arg(long)]
        cost_center: Option<String>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Generate ZUGFeRD XML for a vendor invoice
    ZugferdCreate {
        #[arg(short, long)]
        vendor_id: u32,

        /// Invoice number
        #[arg(short, long)]
        invoice: String,

        /// Invoice date (YYYY-MM-DD)
        #[arg(short, long)]
        date: NaiveDate,

        /// Line item description
        #[arg(long)]
        desc: String,

        /// Net amount
        #[arg(short, long)]
        net: Decimal,

        /// VAT rate in percent
        #[arg(long, default_value = "19")]
        tax_rate: Decimal,

        #[arg(long, default_value = "1")]
        qty: Decimal,

        /// Output file, stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Our customer ID at the vendor
        #[arg(long)]
        buyer_id: Option<String>,

        /// Payment due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Test the API connection
    Test,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match commands::execute(cli.command) {
        Ok(out) => {
            if !out.is_empty() {
                println!("{out}");
            }
        }
        Err(e) => {
            output::print_error(e.as_ref());
            std::process::exit(1);
        }
    }
}
