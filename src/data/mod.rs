pub mod loader;
pub mod price;

pub use loader::{build_price_series, load_csv, CloseRecord};
pub use price::{validate_closes, PriceError, PricePoint, PriceSeries};
