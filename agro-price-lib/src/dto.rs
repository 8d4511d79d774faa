use serde::{Deserialize, Serialize};

/// Local timestamp format used for `Listing::parsed_at`
pub const PARSED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
/// An accepted offer with a positive price in rubles per kilogram
pub struct Listing {
    pub title: Option<String>,
    pub price_per_kg: f64,
    pub region: Option<String>,
    pub supplier: Option<String>,
    pub parsed_at: String,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
/// A site category scraped for one ingredient
pub struct Category {
    pub name: String,
    pub path: String,
}

impl Category {
    pub fn new(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
        }
    }
}
