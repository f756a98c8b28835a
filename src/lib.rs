//a Rust-based risk/return metrics calculator for single-instrument price histories

pub mod config;
pub mod data;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod returns;

//prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{DegeneratePolicy, MetricsConfig};
    pub use crate::data::{build_price_series, load_csv, PriceError, PricePoint, PriceSeries};
    pub use crate::error::MetricsError;
    pub use crate::metrics::{
        print_comparison_table, ConventionMetrics, LogMetrics, MetricName, MetricsCalculator,
        MetricsRecord, SimpleMetrics,
    };
    pub use crate::pipeline::{compute_batch, compute_metrics, compute_series_metrics, BatchResult};
    pub use crate::returns::{CumulativeSeries, ReturnConvention, ReturnSeries};
}
