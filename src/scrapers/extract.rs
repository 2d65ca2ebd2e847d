use scraper::{ElementRef, Html, Selector};
use tracing::info;

use crate::error::ScrapeError;
use crate::models::RawListing;

/// Outcome of extracting one rendered detail page.
#[derive(Debug)]
pub enum Extraction {
    /// The ad has been taken down; a normal skip, not an error.
    Inactive,
    Fields(RawListing),
}

/// Pull the fixed field set out of a rendered detail document.
///
/// Required fields (title, price, odometer, primary image, image count)
/// return an error when missing or unparseable; the caller treats that as an
/// item-level failure. Optional fields log their absence and stay unset.
pub fn extract_listing(html: &str, url: &str) -> Result<Extraction, ScrapeError> {
    let document = Html::parse_document(html);

    if select_first(&document, "div.notice_head").is_some() {
        return Ok(Extraction::Inactive);
    }

    let title = select_first(&document, "h1.head")
        .map(element_text)
        .ok_or(ScrapeError::MissingField("title"))?;

    let price_text = select_first(&document, "div.price_value strong")
        .map(element_text)
        .ok_or(ScrapeError::MissingField("price_usd"))?;
    let price_usd = parse_price(&price_text)?;

    let odometer_text = select_first(&document, "div.base-information span")
        .map(element_text)
        .ok_or(ScrapeError::MissingField("odometer"))?;
    let odometer = parse_odometer(&odometer_text)?;

    let primary_image_url = select_first(&document, "div#photosBlock img")
        .and_then(|img| img.value().attr("src"))
        .map(str::to_string)
        .ok_or(ScrapeError::MissingField("primary_image_url"))?;

    let count_text = select_first(&document, "div.count-photo span.mhide")
        .map(element_text)
        .ok_or(ScrapeError::MissingField("image_count"))?;
    let image_count = parse_image_count(&count_text)?;

    let seller_name = optional_text(
        &document,
        "div.seller_info_name, h4.seller_info_name",
        "seller name",
    );
    let phone_number = optional_text(&document, "span.phone", "phone number");
    let vin = optional_text(&document, "span.label-vin, span.vin-code", "VIN");

    // The plate element nests a region badge; only its own text is the plate.
    let plate_number = match select_first(&document, "span.state-num").and_then(own_text) {
        Some(plate) => Some(plate),
        None => {
            info!("No plate number is listed.");
            None
        }
    };

    Ok(Extraction::Fields(RawListing {
        url: url.to_string(),
        title,
        price_usd,
        odometer,
        seller_name,
        phone_number,
        primary_image_url: Some(primary_image_url),
        image_count: Some(image_count),
        plate_number,
        vin,
    }))
}

/// "12 999$" -> 12999: drop the trailing currency symbol, strip spaces.
fn parse_price(raw: &str) -> Result<i64, ScrapeError> {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    chars.next_back();
    chars
        .as_str()
        .replace(' ', "")
        .parse()
        .map_err(|_| ScrapeError::InvalidField {
            field: "price_usd",
            value: raw.to_string(),
        })
}

/// The page shows odometer readings in thousands of kilometers.
fn parse_odometer(raw: &str) -> Result<i64, ScrapeError> {
    raw.trim()
        .parse::<i64>()
        .map(|thousands| thousands * 1000)
        .map_err(|_| ScrapeError::InvalidField {
            field: "odometer",
            value: raw.to_string(),
        })
}

/// Photo counter reads "из N" ("of N"); strip the prefix, parse the count.
fn parse_image_count(raw: &str) -> Result<i64, ScrapeError> {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix("из")
        .map(str::trim)
        .unwrap_or(trimmed)
        .parse()
        .map_err(|_| ScrapeError::InvalidField {
            field: "image_count",
            value: raw.to_string(),
        })
}

fn select_first<'a>(document: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).unwrap();
    document.select(&selector).next()
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

/// Text directly inside the element, skipping nested child elements.
fn own_text(element: ElementRef<'_>) -> Option<String> {
    element
        .children()
        .find_map(|child| child.value().as_text().map(|text| text.to_string()))
}

fn optional_text(document: &Html, selector: &str, name: &str) -> Option<String> {
    match select_first(document, selector) {
        Some(element) => Some(element_text(element)),
        None => {
            info!("No {name} is listed.");
            None
        }
    }
}
