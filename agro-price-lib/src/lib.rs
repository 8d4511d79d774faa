pub mod dto;
pub mod price;
pub mod price_list;
pub mod region;
pub mod stats;

pub use price::normalize_price;
pub use region::RegionFilter;
