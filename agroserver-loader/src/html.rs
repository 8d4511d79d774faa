use crate::errors::AgroserverLoaderError;
use agro_price_lib::{dto::Listing, normalize_price, RegionFilter};
use scraper::{ElementRef, Html, Selector};

/// Ad containers, the first selector that finds anything on a page is used
const AD_BLOCK_SELECTORS: &[&str] = &["div.b-item", "div.item"];
const TITLE_SELECTOR: &str = "a.title";
const PRICE_SELECTOR: &str = "span.price";
const LOCATION_SELECTOR: &str = "span.location";
const COMPANY_SELECTOR: &str = "span.company";

#[derive(Debug, Clone, Default, PartialEq)]
/// Text fields of one ad block as found on the page
pub struct RawAd {
    pub title: Option<String>,
    pub price: Option<String>,
    pub location: Option<String>,
    pub company: Option<String>,
}

impl RawAd {
    /// Turns the ad into a listing if it is in the region and carries a positive price
    pub fn into_listing(self, region: &RegionFilter, parsed_at: &str) -> Option<Listing> {
        if !region.accepts(self.location.as_deref()) {
            return None;
        }
        let price_per_kg = self.price.as_deref().and_then(normalize_price)?;
        if price_per_kg <= 0.0 {
            return None;
        }
        Some(Listing {
            title: self.title,
            price_per_kg,
            region: self.location,
            supplier: self.company,
            parsed_at: parsed_at.to_string(),
        })
    }
}

pub struct AdSelectors {
    blocks: Vec<Selector>,
    title: Selector,
    price: Selector,
    location: Selector,
    company: Selector,
}

impl AdSelectors {
    pub fn new() -> Result<Self, AgroserverLoaderError> {
        Ok(Self {
            blocks: AD_BLOCK_SELECTORS
                .iter()
                .map(|s| parse_selector(s))
                .collect::<Result<_, _>>()?,
            title: parse_selector(TITLE_SELECTOR)?,
            price: parse_selector(PRICE_SELECTOR)?,
            location: parse_selector(LOCATION_SELECTOR)?,
            company: parse_selector(COMPANY_SELECTOR)?,
        })
    }

    /// Extracts all ad blocks of a listing page, empty if the page has none
    pub fn extract_ads(&self, html: &str) -> Vec<RawAd> {
        let document = Html::parse_document(html);

        for block in &self.blocks {
            let ads: Vec<RawAd> = document
                .select(block)
                .map(|ad| RawAd {
                    title: self.field(ad, &self.title),
                    price: self.field(ad, &self.price),
                    location: self.field(ad, &self.location),
                    company: self.field(ad, &self.company),
                })
                .collect();
            if !ads.is_empty() {
                return ads;
            }
        }
        Vec::new()
    }

    fn field(&self, ad: ElementRef, selector: &Selector) -> Option<String> {
        let text = ad
            .select(selector)
            .next()?
            .text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

fn parse_selector(selector: &str) -> Result<Selector, AgroserverLoaderError> {
    Selector::parse(selector)
        .map_err(|e| AgroserverLoaderError::InvalidSelector(format!("{selector}: {e}")))
}

#[cfg(test)]
mod test {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <div class="b-item">
            <a class="title" href="/b/1.htm">Мука пшеничная в/с</a>
            <span class="price">25 000 <b>руб/т</b></span>
            <span class="location">Москва</span>
            <span class="company">ООО Зерно</span>
          </div>
          <div class="b-item vip">
            <a class="title" href="/b/2.htm">Мука 1 сорт</a>
            <span class="price">от 28 руб</span>
            <span class="location">Краснодарский край</span>
          </div>
          <div class="b-item">
            <a class="title" href="/b/3.htm">Мука ржаная</a>
            <span class="price">договорная</span>
            <span class="location"> </span>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_extract_ads() {
        let ads = AdSelectors::new().unwrap().extract_ads(PAGE);
        assert_eq!(ads.len(), 3);
        assert_eq!(
            ads[0],
            RawAd {
                title: Some("Мука пшеничная в/с".to_string()),
                price: Some("25 000 руб/т".to_string()),
                location: Some("Москва".to_string()),
                company: Some("ООО Зерно".to_string()),
            }
        );
        assert_eq!(ads[1].company, None);
        assert_eq!(ads[2].location, None);
    }

    #[test]
    fn test_fallback_block_selector() {
        let page = r#"<div class="item"><span class="price">40 ₽</span></div>"#;
        let ads = AdSelectors::new().unwrap().extract_ads(page);
        assert_eq!(ads.len(), 1);
        assert_eq!(ads[0].price.as_deref(), Some("40 ₽"));
        assert_eq!(ads[0].title, None);
    }

    #[test]
    fn test_page_without_ads() {
        let ads = AdSelectors::new()
            .unwrap()
            .extract_ads("<html><body><p>Ничего не найдено</p></body></html>");
        assert!(ads.is_empty());
    }

    #[test]
    fn test_into_listing() {
        let region = RegionFilter::moscow();
        let listings: Vec<Listing> = AdSelectors::new()
            .unwrap()
            .extract_ads(PAGE)
            .into_iter()
            .filter_map(|ad| ad.into_listing(&region, "2024-05-17 10:00:00"))
            .collect();

        // second ad is outside the region, third has no price
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].price_per_kg, 25.0);
        assert_eq!(listings[0].supplier.as_deref(), Some("ООО Зерно"));
        assert_eq!(listings[0].parsed_at, "2024-05-17 10:00:00");
    }

    #[test]
    fn test_listing_without_location_is_kept() {
        let ad = RawAd {
            price: Some("31,5 руб".to_string()),
            ..Default::default()
        };
        let listing = ad.into_listing(&RegionFilter::moscow(), "now").unwrap();
        assert_eq!(listing.price_per_kg, 31.5);
        assert_eq!(listing.region, None);
    }

    #[test]
    fn test_non_positive_price_is_dropped() {
        let ad = RawAd {
            price: Some("0 руб".to_string()),
            location: Some("Москва".to_string()),
            ..Default::default()
        };
        assert_eq!(ad.into_listing(&RegionFilter::moscow(), "now"), None);
    }
}
