use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
/// Price summary for one ingredient, all values in rubles per kilogram
pub struct PriceStats {
    pub ingredient: String,
    /// Number of accepted offers
    pub offers: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// Price suggested for the price list, the median of all offers
    pub recommended: f64,
    pub updated_on: NaiveDate,
}

impl PriceStats {
    pub fn new(ingredient: &str, prices: &[f64], updated_on: NaiveDate) -> Option<Self> {
        let mut sorted: Vec<f64> = prices.to_vec();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let offers = sorted.len();
        let mean = sorted.iter().sum::<f64>() / offers as f64;
        let median = if offers % 2 == 1 {
            sorted[offers / 2]
        } else {
            (sorted[offers / 2 - 1] + sorted[offers / 2]) / 2.0
        };

        Some(PriceStats {
            ingredient: ingredient.to_string(),
            offers,
            min: sorted[0],
            max: sorted[offers - 1],
            mean,
            median,
            recommended: median,
            updated_on,
        })
    }
}

/// Relative change from `old` to `new` in percent
pub fn price_change_percent(old: f64, new: f64) -> Option<f64> {
    if old == 0.0 || !old.is_finite() {
        None
    } else {
        Some((new - old) / old * 100.0)
    }
}
