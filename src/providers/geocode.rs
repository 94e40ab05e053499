// src/providers/geocode.rs

/// A user-typed address cleaned into a canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedAddress {
    /// Comma-separated parts, trimmed, with runs of whitespace collapsed.
    pub canonical: String,
    /// Usually the city: the second-to-last comma part.
    pub area_name: Option<String>,
    pub postal_code: Option<String>,
}

/// Normalizes a free-form US-style address.
/// Returns `None` when nothing but whitespace and commas was given.
pub fn normalize_address(raw: &str) -> Option<NormalizedAddress> {
    let parts: Vec<String> = raw
        .split(',')
        .map(|part| part.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        return None;
    }

    let area_name = if parts.len() >= 2 {
        Some(parts[parts.len() - 2].clone())
    } else {
        None
    };

    let postal_code = parts
        .last()
        .and_then(|last| last.split_whitespace().rev().find_map(parse_postal_code));

    Some(NormalizedAddress {
        canonical: parts.join(", "),
        area_name,
        postal_code,
    })
}

/// Five-digit ZIP, optionally followed by `-` and four digits.
fn parse_postal_code(token: &str) -> Option<String> {
    let (zip, plus4) = match token.split_once('-') {
        Some((zip, plus4)) => (zip, Some(plus4)),
        None => (token, None),
    };

    let digits = |s: &str, n: usize| s.len() == n && s.chars().all(|c| c.is_ascii_digit());

    if !digits(zip, 5) || plus4.is_some_and(|p| !digits(p, 4)) {
        return None;
    }
    Some(zip.to_string())
}
