use crate::{consts, errors::AgroserverLoaderError};
use agro_price_lib::RegionFilter;
use std::{str::FromStr, time::Duration};

pub struct Config {
    pub url: String,
    pub timeout: Duration,
    /// Pause between two pages of the same category
    pub page_delay: Duration,
    /// Pause between two ingredients when updating the price list
    pub ingredient_delay: Duration,
    pub region: RegionFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: consts::AGROSERVER_URL.to_string(),
            timeout: Duration::from_secs(consts::DEFAULT_TIMEOUT_SECS),
            page_delay: Duration::from_millis(consts::DEFAULT_PAGE_DELAY_MS),
            ingredient_delay: Duration::from_millis(consts::DEFAULT_INGREDIENT_DELAY_MS),
            region: RegionFilter::moscow(),
        }
    }
}

impl Config {
    /// Default configuration with overrides from the `AGROSERVER_*` environment variables
    pub fn new() -> Result<Self, AgroserverLoaderError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AgroserverLoaderError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("AGROSERVER_URL") {
            config.url = url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "AGROSERVER_TIMEOUT_SECS")? {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, "AGROSERVER_PAGE_DELAY_MS")? {
            config.page_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, "AGROSERVER_INGREDIENT_DELAY_MS")? {
            config.ingredient_delay = Duration::from_millis(ms);
        }
        if let Some(regions) = lookup("AGROSERVER_REGIONS") {
            let region = RegionFilter::new(regions.split(','));
            if region.keywords().is_empty() {
                return Err(AgroserverLoaderError::InvalidConfig {
                    name: "AGROSERVER_REGIONS",
                    value: regions,
                });
            }
            config.region = region;
        }
        Ok(config)
    }
}

fn parse_var<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, AgroserverLoaderError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| AgroserverLoaderError::InvalidConfig { name, value }),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.url, "https://agroserver.ru");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.page_delay, Duration::from_secs(2));
        assert_eq!(config.ingredient_delay, Duration::from_secs(3));
        assert_eq!(config.region, RegionFilter::moscow());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("AGROSERVER_URL", "http://localhost:8080/"),
            ("AGROSERVER_PAGE_DELAY_MS", "0"),
            ("AGROSERVER_REGIONS", "Тула,Калуга"),
        ]))
        .unwrap();
        assert_eq!(config.url, "http://localhost:8080");
        assert_eq!(config.page_delay, Duration::ZERO);
        assert!(config.region.matches("г. Калуга"));
        assert!(!config.region.matches("Москва"));
    }

    #[test]
    fn test_invalid_number() {
        let err = Config::from_lookup(lookup(&[("AGROSERVER_TIMEOUT_SECS", "ten")]))
            .err()
            .unwrap();
        assert!(matches!(
            err,
            AgroserverLoaderError::InvalidConfig { name: "AGROSERVER_TIMEOUT_SECS", .. }
        ));
    }

    #[test]
    fn test_empty_region_list() {
        for regions in ["", " , ,"] {
            let err = Config::from_lookup(lookup(&[("AGROSERVER_REGIONS", regions)]))
                .err()
                .unwrap();
            assert!(matches!(
                err,
                AgroserverLoaderError::InvalidConfig { name: "AGROSERVER_REGIONS", .. }
            ));
        }
    }
}
