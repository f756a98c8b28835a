use crate::config::MetricsConfig;
use crate::error::MetricsError;
use crate::metrics::record::MetricName;
use crate::metrics::timeseries::max_drawdown;
use crate::returns::{CumulativeSeries, ReturnConvention, ReturnSeries};
use indexmap::IndexMap;
use statrs::statistics::Statistics;

/// Derives the scalar statistics for one return series and its cumulative
/// growth.
///
/// The calculator holds no state between calls; the same instance can be
/// shared across threads and reused for any number of series.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsCalculator {
    config: MetricsConfig,
}

impl MetricsCalculator {
    pub fn new(config: MetricsConfig) -> Self {
        MetricsCalculator { config }
    }

    //computes every metric reported under the series' convention
    pub fn compute(
        &self,
        returns: &ReturnSeries,
        cumulative: &CumulativeSeries,
    ) -> Result<IndexMap<MetricName, f64>, MetricsError> {
        self.config.validate()?;

        if returns.convention() != cumulative.convention() {
            return Err(MetricsError::SeriesMismatch(format!(
                "returns are {} but cumulative series is {}",
                returns.convention(),
                cumulative.convention()
            )));
        }
        if returns.len() != cumulative.len() {
            return Err(MetricsError::SeriesMismatch(format!(
                "{} returns but {} cumulative values",
                returns.len(),
                cumulative.len()
            )));
        }

        let periods_per_year = self.config.periods_per_year();
        let risk_free_rate = self.config.risk_free_rate;
        let values = returns.values();

        let mut scalars = IndexMap::new();

        match returns.convention() {
            ReturnConvention::Log => {
                let total = cumulative.final_growth_factor().unwrap_or(f64::NAN);
                let annualized = annualized_log_return(values, periods_per_year);
                let volatility = annualized_volatility(values, periods_per_year);
                self.check_volatility(volatility)?;

                scalars.insert(MetricName::LogCumulativeReturn, total);
                scalars.insert(MetricName::LogAnnualizedReturn, annualized);
                scalars.insert(MetricName::LogAnnualizedVolatility, volatility);
                scalars.insert(MetricName::RawSharpeRatio, raw_sharpe(annualized, volatility));
                scalars.insert(
                    MetricName::SharpeRatio,
                    log_sharpe_ratio(annualized, volatility, risk_free_rate),
                );
            }
            ReturnConvention::Simple => {
                let growth = cumulative.growth_factors();
                let total = growth.last().copied().unwrap_or(f64::NAN);
                let annualized = annualized_simple_return(values, periods_per_year);
                let volatility = annualized_volatility(values, periods_per_year);
                self.check_volatility(volatility)?;

                if growth.is_empty() && self.config.is_strict() {
                    return Err(MetricsError::DegenerateSeries(
                        "CAGR needs at least one return period".to_string(),
                    ));
                }

                scalars.insert(MetricName::CumulativeReturn, total);
                scalars.insert(MetricName::SimpleAnnualizedReturn, annualized);
                scalars.insert(MetricName::Cagr, cagr(&growth, periods_per_year));
                scalars.insert(MetricName::SimpleAnnualizedVolatility, volatility);
                scalars.insert(MetricName::MaximumDrawdown, max_drawdown(&growth));
                scalars.insert(MetricName::RawSharpeRatio, raw_sharpe(annualized, volatility));
                scalars.insert(
                    MetricName::SharpeRatio,
                    simple_sharpe_ratio(annualized, volatility, risk_free_rate),
                );
            }
        }

        for (name, value) in &scalars {
            if !value.is_finite() {
                tracing::warn!(metric = %name, value = %value, "non-finite metric");
            }
        }

        Ok(scalars)
    }

    fn check_volatility(&self, volatility: f64) -> Result<(), MetricsError> {
        let degenerate = volatility == 0.0 || !volatility.is_finite();
        if degenerate && self.config.is_strict() {
            return Err(MetricsError::DegenerateSeries(format!(
                "annualized volatility is {}",
                volatility
            )));
        }
        Ok(())
    }
}

//exp(mean log return * periods) - 1
pub fn annualized_log_return(log_returns: &[f64], periods_per_year: f64) -> f64 {
    (log_returns.mean() * periods_per_year).exp() - 1.0
}

//mean simple return * periods
pub fn annualized_simple_return(simple_returns: &[f64], periods_per_year: f64) -> f64 {
    simple_returns.mean() * periods_per_year
}

//sample standard deviation scaled by sqrt(periods)
pub fn annualized_volatility(returns: &[f64], periods_per_year: f64) -> f64 {
    returns.std_dev() * periods_per_year.sqrt()
}

/// Compound annual growth rate of a growth factor series.
///
/// The series is the value of one unit invested at the first price, so the
/// total multiple is the last element. Years are `len / periods_per_year`.
/// Short series produce very large rates; that is the annualization, not a bug.
pub fn cagr(growth_factors: &[f64], periods_per_year: f64) -> f64 {
    match growth_factors.last() {
        Some(&total) => total.powf(periods_per_year / growth_factors.len() as f64) - 1.0,
        None => f64::NAN,
    }
}

pub fn raw_sharpe(annualized_return: f64, annualized_volatility: f64) -> f64 {
    annualized_return / annualized_volatility
}

//risk-free rate converted to its continuously compounded equivalent
pub fn log_sharpe_ratio(
    annualized_return: f64,
    annualized_volatility: f64,
    risk_free_rate: f64,
) -> f64 {
    (annualized_return - (1.0 + risk_free_rate).ln()) / annualized_volatility
}

pub fn simple_sharpe_ratio(
    annualized_return: f64,
    annualized_volatility: f64,
    risk_free_rate: f64,
) -> f64 {
    (annualized_return - risk_free_rate) / annualized_volatility
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DegeneratePolicy;
    use approx::assert_relative_eq;

    fn compute(
        prices: &[f64],
        convention: ReturnConvention,
        config: MetricsConfig,
    ) -> Result<IndexMap<MetricName, f64>, MetricsError> {
        let returns = ReturnSeries::build(prices, convention).unwrap();
        let cumulative = CumulativeSeries::accumulate(&returns);
        MetricsCalculator::new(config).compute(&returns, &cumulative)
    }

    #[test]
    fn simple_two_period_scenario() {
        let scalars = compute(
            &[100.0, 110.0, 121.0],
            ReturnConvention::Simple,
            MetricsConfig::default(),
        )
        .unwrap();

        assert_relative_eq!(scalars[&MetricName::SimpleAnnualizedReturn], 25.2, epsilon = 1e-9);
        assert_relative_eq!(scalars[&MetricName::CumulativeReturn], 1.21, epsilon = 1e-12);
        assert_relative_eq!(
            scalars[&MetricName::Cagr],
            1.21f64.powf(126.0) - 1.0,
            max_relative = 1e-9
        );
        assert_eq!(scalars[&MetricName::MaximumDrawdown], 0.0);
    }

    #[test]
    fn constant_prices_surface_non_finite_sharpe() {
        for convention in ReturnConvention::ALL {
            let scalars =
                compute(&[50.0, 50.0, 50.0, 50.0], convention, MetricsConfig::default()).unwrap();

            let volatility = match convention {
                ReturnConvention::Log => scalars[&MetricName::LogAnnualizedVolatility],
                ReturnConvention::Simple => scalars[&MetricName::SimpleAnnualizedVolatility],
            };
            assert_eq!(volatility, 0.0);
            assert!(!scalars[&MetricName::RawSharpeRatio].is_finite());
            assert!(!scalars[&MetricName::SharpeRatio].is_finite());
        }
    }

    #[test]
    fn strict_policy_rejects_zero_volatility() {
        let config = MetricsConfig::default().with_policy(DegeneratePolicy::Strict);
        for convention in ReturnConvention::ALL {
            let err = compute(&[50.0, 50.0, 50.0], convention, config).unwrap_err();
            assert!(matches!(err, MetricsError::DegenerateSeries(_)));
        }
    }

    #[test]
    fn strict_policy_rejects_single_period_volatility() {
        let config = MetricsConfig::default().with_policy(DegeneratePolicy::Strict);
        let err = compute(&[50.0, 55.0], ReturnConvention::Log, config).unwrap_err();
        assert!(matches!(err, MetricsError::DegenerateSeries(_)));
    }

    #[test]
    fn log_sharpe_uses_continuous_risk_free_rate() {
        let scalars = compute(
            &[100.0, 102.0, 101.0, 104.0, 103.5],
            ReturnConvention::Log,
            MetricsConfig::default(),
        )
        .unwrap();

        let annualized = scalars[&MetricName::LogAnnualizedReturn];
        let volatility = scalars[&MetricName::LogAnnualizedVolatility];
        assert_relative_eq!(
            scalars[&MetricName::SharpeRatio],
            (annualized - 1.03f64.ln()) / volatility,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            scalars[&MetricName::RawSharpeRatio],
            annualized / volatility,
            epsilon = 1e-12
        );
    }

    #[test]
    fn uses_sample_standard_deviation() {
        let returns: [f64; 3] = [0.01, -0.02, 0.03];
        let mean: f64 = 0.02 / 3.0;
        let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / 2.0;
        assert_relative_eq!(
            annualized_volatility(&returns, 252.0),
            variance.sqrt() * 252f64.sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn trading_days_are_configurable() {
        let weekly = MetricsConfig::default().with_trading_days(52);
        let scalars = compute(&[100.0, 110.0, 121.0], ReturnConvention::Simple, weekly).unwrap();
        assert_relative_eq!(scalars[&MetricName::SimpleAnnualizedReturn], 5.2, epsilon = 1e-9);
    }

    #[test]
    fn rejects_mismatched_series() {
        let log = ReturnSeries::build(&[1.0, 2.0, 3.0], ReturnConvention::Log).unwrap();
        let simple = ReturnSeries::build(&[1.0, 2.0, 3.0], ReturnConvention::Simple).unwrap();
        let err = MetricsCalculator::default()
            .compute(&log, &CumulativeSeries::accumulate(&simple))
            .unwrap_err();
        assert!(matches!(err, MetricsError::SeriesMismatch(_)));
    }

    #[test]
    fn cagr_of_empty_series_is_nan() {
        assert!(cagr(&[], 252.0).is_nan());
    }
}
