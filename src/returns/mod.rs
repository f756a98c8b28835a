pub mod cumulative;
pub mod series;

pub use cumulative::CumulativeSeries;
pub use series::{ReturnConvention, ReturnSeries};
