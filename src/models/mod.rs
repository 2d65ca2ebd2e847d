use serde::{Deserialize, Serialize};

/// One car-for-sale record, keyed by its source URL.
///
/// Optional fields stay `None` when the source page does not list them;
/// absence is recorded as-is, never coerced to zero or an empty string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    pub url: String,
    pub title: String,
    pub price_usd: i64,
    /// Kilometers driven.
    pub odometer: i64,
    pub seller_name: Option<String>,
    /// Canonical international form, e.g. 380674567890.
    pub phone_number: Option<i64>,
    pub primary_image_url: Option<String>,
    pub image_count: Option<i64>,
    pub plate_number: Option<String>,
    pub vin: Option<String>,
    /// Local time the listing was first seen, "DD/MM/YYYY HH:MM".
    pub discovered_at: String,
}

/// Field values as extracted from the rendered page, before trimming and
/// phone-number conversion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawListing {
    pub url: String,
    pub title: String,
    pub price_usd: i64,
    pub odometer: i64,
    pub seller_name: Option<String>,
    pub phone_number: Option<String>,
    pub primary_image_url: Option<String>,
    pub image_count: Option<i64>,
    pub plate_number: Option<String>,
    pub vin: Option<String>,
}
