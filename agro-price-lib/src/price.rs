use regex::Regex;
use std::sync::LazyLock;

/// Number with an optional single group separator: "25", "25.50", "12,75", "25 000".
const NUMBER: &str = r"([0-9]+[\s,.]?[0-9]*)";

/// Marks a price quoted per metric ton ("руб/т", "₽/т", "/тонна").
const PER_TON_MARKER: &str = "/т";

const KG_PER_TON: f64 = 1000.0;

/// Extraction patterns in priority order, the first one that yields a number wins.
static PRICE_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        // "25.50 руб", "25 000 ₽"
        Regex::new(&format!(r"{NUMBER}\s*(?:руб|₽)")).unwrap(),
        // "от 30"
        Regex::new(&format!(r"от\s+{NUMBER}")).unwrap(),
        // "12,75 р" but not "12 рулонов"
        Regex::new(&format!(r"{NUMBER}\s*р\b")).unwrap(),
    ]
});

/// Extracts a price in rubles per kilogram from free-form listing text.
///
/// Only ASCII digits count as digits, "２５ руб" has no price.
///
/// Returns `None` when no pattern produces a parseable number. Prices quoted
/// per ton are converted to per-kilogram. The result is not checked for being
/// positive, callers that need a strictly positive price filter on their own.
pub fn normalize_price(text: &str) -> Option<f64> {
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        return None;
    }
    let lowered = text.to_lowercase();

    PRICE_PATTERNS
        .iter()
        .filter_map(|pattern| pattern.captures(&lowered))
        .find_map(|caps| parse_number(caps.get(1)?.as_str()))
        .map(|price| {
            if lowered.contains(PER_TON_MARKER) {
                price / KG_PER_TON
            } else {
                price
            }
        })
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.replace(' ', "").replace(',', ".").parse::<f64>().ok()
}
