use crate::data::PriceError;
use crate::metrics::MetricName;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricsError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] PriceError),
    #[error("Degenerate series: {0}")]
    DegenerateSeries(String),
    #[error("Missing metric '{0}' for record assembly")]
    MissingMetric(MetricName),
    #[error("Series mismatch: {0}")]
    SeriesMismatch(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
