/// Location keywords for Moscow and the Moscow oblast.
pub const MOSCOW_REGION: &[&str] = &[
    "москва",
    "московская",
    "мо",
    "moscow",
    "подмосковье",
    "химки",
    "балашиха",
    "одинцово",
    "мытищи",
    "люберцы",
    "королев",
    "красногорск",
];

#[derive(Debug, Clone, PartialEq)]
/// Matches free-form location text against a list of region keywords
pub struct RegionFilter {
    keywords: Vec<String>,
}

impl Default for RegionFilter {
    fn default() -> Self {
        Self::moscow()
    }
}

impl RegionFilter {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn moscow() -> Self {
        Self::new(MOSCOW_REGION)
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// True if the text contains any keyword, case-insensitive substring match.
    pub fn matches(&self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        let text = text.to_lowercase();
        self.keywords.iter().any(|k| text.contains(k.as_str()))
    }

    /// Listings without a location are kept, only a known foreign location is rejected.
    pub fn accepts(&self, location: Option<&str>) -> bool {
        match location {
            Some(location) if !location.is_empty() => self.matches(location),
            _ => true,
        }
    }
}
