use crate::{
    client::{connect, get_html},
    config::Config,
    errors::AgroserverLoaderError,
    html::{AdSelectors, RawAd},
};
use agro_price_lib::dto::{Listing, PARSED_AT_FORMAT};
use log::{debug, error, info};
use reqwest::Client;

pub mod client;
pub mod config;
pub mod consts;
pub mod errors;
pub mod html;

pub struct Session {
    config: Config,
    client: Client,
    selectors: AdSelectors,
}

impl Session {
    pub fn new(config: Config) -> Result<Self, AgroserverLoaderError> {
        let client = connect(&config)?;
        Ok(Session {
            config,
            client,
            selectors: AdSelectors::new()?,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// First page is the category itself, following pages are `p{n}.htm` below it
    pub fn page_url(&self, category: &str, page: u32) -> String {
        if page <= 1 {
            format!("{}{}", self.config.url, category)
        } else {
            format!("{}{}p{}.htm", self.config.url, category, page)
        }
    }

    pub async fn get_page(
        &self,
        category: &str,
        page: u32,
    ) -> Result<Vec<RawAd>, AgroserverLoaderError> {
        let html = get_html(&self.client, self.page_url(category, page)).await?;
        Ok(self.selectors.extract_ads(&html))
    }

    /// Collects the accepted listings of up to `max_pages` pages of a category.
    ///
    /// Stops early at the first page that fails to load or has no ads, listings
    /// gathered until then are returned.
    pub async fn fetch_category(&self, category: &str, max_pages: u32) -> Vec<Listing> {
        let mut listings = Vec::new();

        for page in 1..=max_pages {
            info!("Fetching {}", self.page_url(category, page));

            let ads = match self.get_page(category, page).await {
                Ok(ads) => ads,
                Err(e) => {
                    error!("Failed to load page {page} of {category}: {e}");
                    break;
                }
            };
            if ads.is_empty() {
                info!("No ads on page {page} of {category}");
                break;
            }
            info!("Found {} ads on page {page}", ads.len());

            let parsed_at = chrono::Local::now().format(PARSED_AT_FORMAT).to_string();
            let before = listings.len();
            listings.extend(
                ads.into_iter()
                    .filter_map(|ad| ad.into_listing(&self.config.region, &parsed_at)),
            );
            debug!("Accepted {} listings from page {page}", listings.len() - before);

            if page < max_pages {
                tokio::time::sleep(self.config.page_delay).await;
            }
        }
        listings
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::{collections::HashMap, time::Duration};
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    const PAGE_1: &str = r#"
        <div class="b-item"><span class="price">30 руб</span><span class="location">Москва</span></div>
        <div class="b-item"><span class="price">40 руб</span><span class="location">Тверь</span></div>
    "#;
    const PAGE_2: &str = r#"<div class="item"><span class="price">50 000 руб/т</span></div>"#;
    const EMPTY_PAGE: &str = "<html><body></body></html>";

    /// Serves fixed UTF-8 bodies by request path, unknown paths get a 404
    async fn serve(pages: HashMap<&'static str, &'static str>) -> String {
        let pages = pages
            .into_iter()
            .map(|(path, body)| (path, body.as_bytes().to_vec()))
            .collect();
        serve_bytes(pages, "text/html; charset=utf-8").await
    }

    async fn serve_bytes(
        pages: HashMap<&'static str, Vec<u8>>,
        content_type: &'static str,
    ) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    break;
                };
                let mut buf = vec![0u8; 4096];
                let n = stream.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]);
                let path = request.split_whitespace().nth(1).unwrap_or("/");

                let response = match pages.get(path) {
                    Some(body) => {
                        let mut response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                            body.len()
                        )
                        .into_bytes();
                        response.extend_from_slice(body);
                        response
                    }
                    None => b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                        .to_vec(),
                };
                let _ = stream.write_all(&response).await;
                let _ = stream.shutdown().await;
            }
        });
        format!("http://{addr}")
    }

    fn session(url: String) -> Session {
        let config = Config {
            url,
            page_delay: Duration::ZERO,
            ..Default::default()
        };
        Session::new(config).unwrap()
    }

    #[test]
    fn test_page_url() {
        let session = session("https://agroserver.ru".to_string());
        assert_eq!(
            session.page_url("/sakhar/", 1),
            "https://agroserver.ru/sakhar/"
        );
        assert_eq!(
            session.page_url("/sakhar/", 3),
            "https://agroserver.ru/sakhar/p3.htm"
        );
    }

    #[tokio::test]
    async fn test_fetch_stops_at_empty_page() {
        let url = serve(HashMap::from([
            ("/sakhar/", PAGE_1),
            ("/sakhar/p2.htm", PAGE_2),
            ("/sakhar/p3.htm", EMPTY_PAGE),
            ("/sakhar/p4.htm", PAGE_1),
        ]))
        .await;

        let listings = session(url).fetch_category("/sakhar/", 5).await;
        let prices: Vec<f64> = listings.iter().map(|l| l.price_per_kg).collect();
        assert_eq!(prices, vec![30.0, 50.0]);
    }

    #[tokio::test]
    async fn test_fetch_keeps_results_on_http_error() {
        let url = serve(HashMap::from([("/moloko/", PAGE_1)])).await;

        let listings = session(url).fetch_category("/moloko/", 3).await;
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].region.as_deref(), Some("Москва"));
    }

    #[tokio::test]
    async fn test_get_page_reports_status() {
        let url = serve(HashMap::new()).await;

        let err = session(url).get_page("/moloko/", 1).await.unwrap_err();
        assert!(matches!(
            err,
            AgroserverLoaderError::HttpStatus { status, .. } if status.as_u16() == 404
        ));
    }

    #[tokio::test]
    async fn test_max_pages_limit() {
        let url = serve(HashMap::from([
            ("/sakhar/", PAGE_1),
            ("/sakhar/p2.htm", PAGE_2),
        ]))
        .await;

        let listings = session(url).fetch_category("/sakhar/", 1).await;
        assert_eq!(listings.len(), 1);
    }

    #[tokio::test]
    async fn test_page_in_windows_1251() {
        let page = r#"<html><head><meta charset="windows-1251"></head><body>
            <div class="b-item"><span class="price">30 руб</span><span class="location">Москва</span></div>
            </body></html>"#;
        let (bytes, _, _) = encoding_rs::WINDOWS_1251.encode(page);
        let pages = HashMap::from([("/sakhar/", bytes.into_owned())]);
        let url = serve_bytes(pages, "text/html").await;

        let session = session(url);
        let ads = session.get_page("/sakhar/", 1).await.unwrap();
        assert_eq!(ads[0].price.as_deref(), Some("30 руб"));
        assert_eq!(ads[0].location.as_deref(), Some("Москва"));

        let listings = session.fetch_category("/sakhar/", 1).await;
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].price_per_kg, 30.0);
    }
}
