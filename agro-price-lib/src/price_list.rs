use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use log::debug;
use std::{
    io::{Read, Write},
    path::Path,
};
use thiserror::Error;

pub const INGREDIENT_COLUMN: &str = "Ингредиент";
pub const PRICE_COLUMN: &str = "Стоимость, руб/кг";

#[derive(Error, Debug)]
pub enum PriceListError {
    #[error("Failed to access price list: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid price list: {0}")]
    Csv(#[from] csv::Error),

    #[error("Price list has no \"{0}\" column")]
    MissingColumn(&'static str),

    #[error("Ingredient \"{0}\" not found in price list")]
    UnknownIngredient(String),
}

#[derive(Debug, Clone)]
/// Ingredient price table, columns other than name and price are carried through untouched
pub struct PriceList {
    headers: StringRecord,
    rows: Vec<StringRecord>,
    ingredient_idx: usize,
    price_idx: usize,
}

impl PriceList {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PriceListError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, PriceListError> {
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
        let headers = reader.headers()?.clone();
        let column = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or(PriceListError::MissingColumn(name))
        };
        let ingredient_idx = column(INGREDIENT_COLUMN)?;
        let price_idx = column(PRICE_COLUMN)?;

        let rows = reader.records().collect::<Result<Vec<_>, _>>()?;
        debug!("Loaded price list with {} rows", rows.len());

        Ok(PriceList {
            headers,
            rows,
            ingredient_idx,
            price_idx,
        })
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), PriceListError> {
        let file = std::fs::File::create(path)?;
        self.write_to(file)
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), PriceListError> {
        let mut writer = WriterBuilder::new().from_writer(writer);
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn ingredients(&self) -> impl Iterator<Item = &str> + '_ {
        self.rows
            .iter()
            .filter_map(|row| row.get(self.ingredient_idx))
    }

    pub fn contains(&self, ingredient: &str) -> bool {
        self.ingredients().any(|name| name == ingredient)
    }

    /// Current price of the first row named `ingredient`, `None` if missing or not a number
    pub fn price_of(&self, ingredient: &str) -> Option<f64> {
        self.rows
            .iter()
            .find(|row| row.get(self.ingredient_idx) == Some(ingredient))
            .and_then(|row| row.get(self.price_idx))
            .and_then(parse_price_cell)
    }

    /// Overwrites the price of every row named `ingredient` and returns the previous price
    pub fn set_price(
        &mut self,
        ingredient: &str,
        price: f64,
    ) -> Result<Option<f64>, PriceListError> {
        if !self.contains(ingredient) {
            return Err(PriceListError::UnknownIngredient(ingredient.to_string()));
        }
        let old = self.price_of(ingredient);
        let cell = format!("{price:?}");

        for row in self.rows.iter_mut() {
            if row.get(self.ingredient_idx) != Some(ingredient) {
                continue;
            }
            *row = row
                .iter()
                .enumerate()
                .map(|(i, field)| if i == self.price_idx { cell.as_str() } else { field })
                .collect();
        }
        Ok(old)
    }
}

fn parse_price_cell(cell: &str) -> Option<f64> {
    cell.trim().replace(',', ".").parse::<f64>().ok()
}
