use crate::config::MetricsConfig;
use crate::data::PriceSeries;
use crate::error::MetricsError;
use crate::metrics::{MetricsCalculator, MetricsRecord};
use crate::returns::{CumulativeSeries, ReturnConvention, ReturnSeries};
use rayon::prelude::*;

//outcome of one (symbol, convention) job in a batch
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub symbol: String,
    pub convention: ReturnConvention,
    pub result: Result<MetricsRecord, MetricsError>,
}

//prices -> returns -> cumulative growth -> scalars -> record
pub fn compute_metrics(
    symbol: &str,
    prices: &[f64],
    convention: ReturnConvention,
    config: &MetricsConfig,
) -> Result<MetricsRecord, MetricsError> {
    let returns = ReturnSeries::build(prices, convention)?;
    let cumulative = CumulativeSeries::accumulate(&returns);

    tracing::debug!(
        symbol,
        %convention,
        prices = prices.len(),
        returns = returns.len(),
        "built return series"
    );

    let scalars = MetricsCalculator::new(*config).compute(&returns, &cumulative)?;
    MetricsRecord::assemble(symbol, convention, &scalars)
}

pub fn compute_series_metrics(
    series: &PriceSeries,
    convention: ReturnConvention,
    config: &MetricsConfig,
) -> Result<MetricsRecord, MetricsError> {
    compute_metrics(series.symbol(), &series.closes(), convention, config)
}

//computes every (series, convention) pair independently, in input order
pub fn compute_batch(
    series: &[PriceSeries],
    conventions: &[ReturnConvention],
    config: &MetricsConfig,
) -> Vec<BatchResult> {
    let jobs: Vec<(&PriceSeries, ReturnConvention)> = series
        .iter()
        .flat_map(|s| conventions.iter().map(move |&c| (s, c)))
        .collect();

    jobs.into_par_iter()
        .map(|(s, convention)| BatchResult {
            symbol: s.symbol().to_string(),
            convention,
            result: compute_series_metrics(s, convention, config),
        })
        .collect()
}
