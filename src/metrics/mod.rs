pub mod calculator;
pub mod record;
pub mod timeseries;

pub use calculator::MetricsCalculator;
pub use record::{
    print_comparison_table, ConventionMetrics, LogMetrics, MetricName, MetricsRecord,
    SimpleMetrics,
};
pub use timeseries::{drawdown_curve, max_drawdown, DrawdownPoint};
