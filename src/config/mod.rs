pub mod metrics_config;

pub use metrics_config::{
    DegeneratePolicy, MetricsConfig, DEFAULT_RISK_FREE_RATE, DEFAULT_TRADING_DAYS_PER_YEAR,
};
