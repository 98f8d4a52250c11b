//! Vendor lookup by IBAN, VAT id or name.
//!
//! IBAN and VAT id are exact matches after normalisation. Names are scored:
//! containment in either direction scores 0.9, otherwise the share of
//! common whitespace tokens relative to the longer name.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::records::Vendor;

/// Minimum score for a fuzzy candidate.
pub const MIN_SCORE: Decimal = Decimal::from_parts(5, 0, 0, false, 1);
/// Score of a name contained in the other.
pub const SUBSTRING_SCORE: Decimal = Decimal::from_parts(9, 0, 0, false, 1);
pub const MAX_CANDIDATES: usize = 5;

/// What to look for. Empty criteria match nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchCriteria {
    pub iban: Option<String>,
    pub vat_id: Option<String>,
    pub name: Option<String>,
}

impl MatchCriteria {
    pub fn is_empty(&self) -> bool {
        [&self.iban, &self.vat_id, &self.name]
            .iter()
            .all(|v| v.as_deref().is_none_or(|s| s.trim().is_empty()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchField {
    Iban,
    VatId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchCandidate {
    pub vendor_id: Option<u32>,
    pub name: String,
    /// Two decimal places, `0.50..=0.90`.
    pub score: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "match", rename_all = "snake_case")]
pub enum VendorMatch {
    Exact { field: MatchField, vendor: Box<Vendor> },
    Fuzzy { candidates: Vec<MatchCandidate> },
    None,
}

impl VendorMatch {
    pub fn is_exact(&self) -> bool {
        matches!(self, Self::Exact { .. })
    }

    /// The vendor id of an exact match.
    pub fn vendor_id(&self) -> Option<u32> {
        match self {
            Self::Exact { vendor, .. } => vendor.vendor_id,
            _ => None,
        }
    }
}

fn normalize_id(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

fn find_exact<'a>(
    vendors: &'a [Vendor],
    wanted: Option<&str>,
    field: impl Fn(&Vendor) -> &str,
) -> Option<&'a Vendor> {
    let wanted = normalize_id(wanted?);
    if wanted.is_empty() {
        return None;
    }
    vendors.iter().find(|v| normalize_id(field(v)) == wanted)
}

/// Similarity of two names in `[0, 1]`, rounded to two places.
pub fn name_score(a: &str, b: &str) -> Decimal {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return Decimal::ZERO;
    }
    if a.contains(&b) || b.contains(&a) {
        return SUBSTRING_SCORE;
    }
    let ta: HashSet<&str> = a.split_whitespace().collect();
    let tb: HashSet<&str> = b.split_whitespace().collect();
    let common = ta.intersection(&tb).count();
    let longest = ta.len().max(tb.len());
    (Decimal::from(common) / Decimal::from(longest)).round_dp(2)
}

/// Find the vendor matching `criteria`: IBAN first, then VAT id, then name.
pub fn match_vendors(vendors: &[Vendor], criteria: &MatchCriteria) -> VendorMatch {
    if let Some(v) = find_exact(vendors, criteria.iban.as_deref(), |v| v.iban.as_str()) {
        return VendorMatch::Exact {
            field: MatchField::Iban,
            vendor: Box::new(v.clone()),
        };
    }
    if let Some(v) = find_exact(vendors, criteria.vat_id.as_deref(), |v| v.vat_id.as_str()) {
        return VendorMatch::Exact {
            field: MatchField::VatId,
            vendor: Box::new(v.clone()),
        };
    }

    let Some(name) = criteria.name.as_deref().filter(|n| !n.trim().is_empty()) else {
        return VendorMatch::None;
    };

    let mut candidates: Vec<MatchCandidate> = vendors
        .iter()
        .filter_map(|v| {
            let display = v.display_name();
            let score = name_score(name, &display);
            (score >= MIN_SCORE).then_some(MatchCandidate {
                vendor_id: v.vendor_id,
                name: display,
                score,
            })
        })
        .collect();

    if candidates.is_empty() {
        return VendorMatch::None;
    }
    candidates.sort_by(|a, b| b.score.cmp(&a.score).then(a.vendor_id.cmp(&b.vendor_id)));
    candidates.truncate(MAX_CANDIDATES);
    VendorMatch::Fuzzy { candidates }
}
