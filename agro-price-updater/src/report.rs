use agro_price_lib::{
    dto::Listing,
    stats::{price_change_percent, PriceStats},
};
use serde::Serialize;

const RULE_WIDTH: usize = 70;

#[derive(Serialize)]
pub struct Report<'a> {
    pub stats: &'a PriceStats,
    pub listings: &'a [Listing],
}

pub fn banner(title: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("\n{rule}\n{title}\n{rule}")
}

pub fn format_stats(stats: &PriceStats) -> String {
    [
        format!("Price statistics for {} ({})", stats.ingredient, stats.updated_on),
        format!("  Offers found:      {}", stats.offers),
        format!("  Minimum price:     {:.2} руб/кг", stats.min),
        format!("  Maximum price:     {:.2} руб/кг", stats.max),
        format!("  Average price:     {:.2} руб/кг", stats.mean),
        format!("  Median price:      {:.2} руб/кг", stats.median),
        format!("  Recommended price: {:.2} руб/кг", stats.recommended),
    ]
    .join("\n")
}

pub fn format_listings(listings: &[Listing]) -> String {
    let mut lines = vec![format!(
        "{:<40} {:>12}  {:<24} {:<30} {}",
        "Title", "руб/кг", "Region", "Supplier", "Parsed at"
    )];
    for listing in listings {
        lines.push(format!(
            "{:<40} {:>12.2}  {:<24} {:<30} {}",
            listing.title.as_deref().unwrap_or("-"),
            listing.price_per_kg,
            listing.region.as_deref().unwrap_or("-"),
            listing.supplier.as_deref().unwrap_or("-"),
            listing.parsed_at,
        ));
    }
    lines.join("\n")
}

pub fn format_price_change(old: Option<f64>, new: f64) -> String {
    let old_line = match old {
        Some(old) => format!("  Old price: {old:.2} руб/кг"),
        None => "  Old price: n/a".to_string(),
    };
    let change = match old.and_then(|old| price_change_percent(old, new)) {
        Some(change) => format!("{change:+.1}%"),
        None => "n/a".to_string(),
    };
    format!("{old_line}\n  New price: {new:.2} руб/кг\n  Change:    {change}")
}
