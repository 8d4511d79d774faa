use agro_price_lib::dto::Category;

pub const AGROSERVER_URL: &str = "https://agroserver.ru";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PAGE_DELAY_MS: u64 = 2000;
pub const DEFAULT_INGREDIENT_DELAY_MS: u64 = 3000;
pub const DEFAULT_MAX_PAGES: u32 = 3;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
pub const ACCEPT_LANGUAGE: &str = "ru-RU,ru;q=0.9,en-US;q=0.8,en;q=0.7";

/// Known listing categories, name and site path
const CATEGORIES: &[(&str, &str)] = &[
    ("мука_пшеничная", "/muka-pshenichnaya/"),
    ("сахар", "/sakhar/"),
    ("масло_сливочное", "/maslo-slivochnoe/"),
    ("молоко", "/moloko/"),
];

/// Price list ingredient names and the category their offers are scraped from
const INGREDIENT_CATEGORIES: &[(&str, &str)] = &[
    ("Мука пшеничная в/с", "/muka-pshenichnaya/"),
    ("Мука пшеничная 1 с", "/muka-pshenichnaya/"),
    ("Сахар", "/sakhar/"),
    ("Масло сливочное 82,5%", "/maslo-slivochnoe/"),
    ("Масло сливочное 72,5%", "/maslo-slivochnoe/"),
];

pub fn get_user_agent() -> &'static str {
    USER_AGENT
}

pub fn categories() -> Vec<Category> {
    CATEGORIES
        .iter()
        .map(|(name, path)| Category::new(name, path))
        .collect()
}

pub fn ingredient_categories() -> Vec<Category> {
    INGREDIENT_CATEGORIES
        .iter()
        .map(|(name, path)| Category::new(name, path))
        .collect()
}
