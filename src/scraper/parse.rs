use crate::domain::SubjectProperty;
use scraper::{ElementRef, Html, Selector};

const MAX_PHOTOS: usize = 5;
const MAX_DESCRIPTION_BLOCKS: usize = 3;

const PHOTO_KEYWORDS: [&str; 4] = ["property", "listing", "photo", "image"];
const DESCRIPTION_CLASSES: [&str; 3] = ["description", "details", "summary"];

/// Best-effort extraction of listing facts from arbitrary listing HTML.
///
/// Nothing here is site specific: the first dollar amount is taken as the
/// price, and beds/baths/sqft come from the first "N bed", "N bath" and
/// "N sq ft" in the page text. Anything not found stays `None`.
pub fn parse_listing_html(html: &str, url: &str) -> SubjectProperty {
    let document = Html::parse_document(html);

    let text = document.root_element().text().collect::<Vec<_>>().join(" ");
    let chars: Vec<char> = text.to_lowercase().chars().collect();

    let description = extract_description(&document);

    SubjectProperty {
        list_price: find_price(&chars),
        bedrooms: find_number_before(&chars, |rest| starts_with(rest, "bed"), is_digit),
        bathrooms: find_number_before(&chars, |rest| starts_with(rest, "bath"), is_decimal),
        sqft: find_number_before(&chars, sqft_marker, is_grouped_digit),
        photos: extract_photos(&document),
        description,
        data_source: Some("Listing page".to_string()),
        ..SubjectProperty::with_address(format!("Property from {url}"))
    }
}

fn extract_photos(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse("img") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|img| img.value().attr("src"))
        .filter(|src| {
            let src = src.to_lowercase();
            PHOTO_KEYWORDS.iter().any(|k| src.contains(k))
        })
        .take(MAX_PHOTOS)
        .map(str::to_string)
        .collect()
}

fn extract_description(document: &Html) -> Option<String> {
    let selector = Selector::parse("p, div").ok()?;

    let blocks: Vec<String> = document
        .select(&selector)
        .filter(has_description_class)
        .take(MAX_DESCRIPTION_BLOCKS)
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .filter(|t| !t.is_empty())
        .collect();

    if blocks.is_empty() {
        None
    } else {
        Some(blocks.join(" "))
    }
}

fn has_description_class(el: &ElementRef) -> bool {
    el.value().attr("class").is_some_and(|class| {
        let class = class.to_lowercase();
        DESCRIPTION_CLASSES.iter().any(|c| class.contains(c))
    })
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First `$` followed by digits (commas allowed) that reads as a positive amount.
fn find_price(chars: &[char]) -> Option<f64> {
    chars.iter().enumerate().find_map(|(i, c)| {
        if *c != '$' {
            return None;
        }
        let digits: String = chars[i + 1..]
            .iter()
            .take_while(|c| is_grouped_digit(**c))
            .filter(|c| **c != ',')
            .collect();
        digits.parse::<f64>().ok().filter(|p| *p > 0.0)
    })
}

/// Scans for `marker` and reads the number that ends right before it,
/// allowing whitespace in between ("3 beds", "1,850 sq ft", "2.5bath").
fn find_number_before<M, A>(chars: &[char], marker: M, accept: A) -> Option<f64>
where
    M: Fn(&[char]) -> bool,
    A: Fn(char) -> bool,
{
    (0..chars.len()).find_map(|i| {
        if !marker(&chars[i..]) {
            return None;
        }

        let mut end = i;
        while end > 0 && chars[end - 1].is_whitespace() {
            end -= 1;
        }
        let mut start = end;
        while start > 0 && accept(chars[start - 1]) {
            start -= 1;
        }

        let number: String = chars[start..end].iter().filter(|c| **c != ',').collect();
        let number = number.trim_matches('.');
        if number.is_empty() {
            return None;
        }
        number.parse::<f64>().ok()
    })
}

fn starts_with(rest: &[char], word: &str) -> bool {
    let mut rest = rest.iter();
    word.chars().all(|w| rest.next() == Some(&w))
}

/// "sq ft", "sqft", "sq. ft" and "sq.ft".
fn sqft_marker(rest: &[char]) -> bool {
    if !starts_with(rest, "sq") {
        return false;
    }
    let mut i = 2;
    if rest.get(i) == Some(&'.') {
        i += 1;
    }
    while rest.get(i).is_some_and(|c| c.is_whitespace()) {
        i += 1;
    }
    starts_with(&rest[i.min(rest.len())..], "ft")
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_decimal(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

fn is_grouped_digit(c: char) -> bool {
    c.is_ascii_digit() || c == ','
}
