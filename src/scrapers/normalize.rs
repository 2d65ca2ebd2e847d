use crate::error::ScrapeError;
use crate::models::{Listing, RawListing};

const PHONE_COUNTRY_PREFIX: &str = "38";

/// Trim every string field and bring the phone number into canonical
/// international numeric form. Pure; the only failure mode is malformed
/// phone text, which the caller treats as an item-level failure.
pub fn normalize(raw: RawListing, discovered_at: String) -> Result<Listing, ScrapeError> {
    let phone_number = match raw.phone_number.as_deref().map(str::trim) {
        Some(phone) if !phone.is_empty() => Some(canonical_phone(phone)?),
        _ => None,
    };

    Ok(Listing {
        url: raw.url.trim().to_string(),
        title: raw.title.trim().to_string(),
        price_usd: raw.price_usd,
        odometer: raw.odometer,
        seller_name: raw.seller_name.map(|s| s.trim().to_string()),
        phone_number,
        primary_image_url: raw.primary_image_url.map(|s| s.trim().to_string()),
        image_count: raw.image_count,
        plate_number: raw.plate_number.map(|s| s.trim().to_string()),
        vin: raw.vin.map(|s| s.trim().to_string()),
        discovered_at,
    })
}

/// "(067) 456 7890" -> 380674567890: strip parentheses and spaces, prepend
/// the country code, parse as an integer.
pub fn canonical_phone(phone: &str) -> Result<i64, ScrapeError> {
    let digits: String = phone
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | ' '))
        .collect();

    format!("{PHONE_COUNTRY_PREFIX}{digits}")
        .parse()
        .map_err(|_| ScrapeError::InvalidField {
            field: "phone_number",
            value: phone.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_round_trip() {
        assert_eq!(canonical_phone("(067) 456 7890").unwrap(), 380674567890);
    }

    #[test]
    fn well_formed_phones_are_twelve_digits_starting_with_38() {
        for phone in ["(050) 123 4567", "(097) 000 0001", "(068) 999 9999"] {
            let canonical = canonical_phone(phone).unwrap();
            let rendered = canonical.to_string();
            assert_eq!(rendered.len(), 12);
            assert!(rendered.starts_with("38"));
        }
    }

    #[test]
    fn malformed_phone_is_item_failure() {
        let err = canonical_phone("call me maybe").unwrap_err();
        assert!(matches!(
            err,
            ScrapeError::InvalidField {
                field: "phone_number",
                ..
            }
        ));
    }

    #[test]
    fn strings_are_trimmed_and_absence_preserved() {
        let raw = RawListing {
            url: " https://auto/1 ".to_string(),
            title: " Audi A6 ".to_string(),
            price_usd: 12999,
            odometer: 150000,
            seller_name: Some("  Taras ".to_string()),
            phone_number: None,
            primary_image_url: Some("https://cdn.example/1.jpg".to_string()),
            image_count: Some(12),
            plate_number: None,
            vin: None,
        };

        let listing = normalize(raw, "01/06/2025 09:00".to_string()).unwrap();
        assert_eq!(listing.url, "https://auto/1");
        assert_eq!(listing.title, "Audi A6");
        assert_eq!(listing.seller_name.as_deref(), Some("Taras"));
        assert_eq!(listing.phone_number, None);
        assert_eq!(listing.plate_number, None);
    }

    #[test]
    fn empty_phone_text_is_left_unset_not_fabricated() {
        let raw = RawListing {
            url: "https://auto/1".to_string(),
            phone_number: Some("   ".to_string()),
            ..RawListing::default()
        };

        let listing = normalize(raw, "01/06/2025 09:00".to_string()).unwrap();
        assert_eq!(listing.phone_number, None);
    }
}
