use crate::data::{validate_closes, PriceError, PriceSeries};
use crate::error::MetricsError;
use serde::{Deserialize, Serialize};
use std::fmt;

//return convention used to derive per-period returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnConvention {
    //continuously compounded, ln(p[t] / p[t-1])
    Log,
    //arithmetic, p[t] / p[t-1] - 1
    Simple,
}

impl ReturnConvention {
    pub const ALL: [ReturnConvention; 2] = [ReturnConvention::Log, ReturnConvention::Simple];

    //parse convention from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "log" | "logarithmic" => Some(ReturnConvention::Log),
            "simple" | "arithmetic" => Some(ReturnConvention::Simple),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnConvention::Log => "log",
            ReturnConvention::Simple => "simple",
        }
    }

    //single-period return from two consecutive prices
    fn period_return(&self, previous: f64, current: f64) -> f64 {
        let ratio = current / previous;
        match self {
            ReturnConvention::Log => ratio.ln(),
            ReturnConvention::Simple => ratio - 1.0,
        }
    }
}

impl fmt::Display for ReturnConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-period returns derived from a price series.
///
/// Holds one element fewer than the prices it was built from: the first
/// price has no predecessor and is dropped rather than carried as a
/// placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnSeries {
    convention: ReturnConvention,
    values: Vec<f64>,
}

impl ReturnSeries {
    //builds the return series, failing before any return is computed on bad input
    pub fn build(prices: &[f64], convention: ReturnConvention) -> Result<Self, MetricsError> {
        validate_closes(prices)?;

        let values: Vec<f64> = prices
            .windows(2)
            .map(|pair| convention.period_return(pair[0], pair[1]))
            .collect();

        //extreme but valid price ratios can overflow
        if let Some(offset) = values.iter().position(|r| !r.is_finite()) {
            return Err(PriceError::NonFiniteReturn { index: offset + 1 }.into());
        }

        Ok(ReturnSeries { convention, values })
    }

    pub fn from_prices(
        prices: &PriceSeries,
        convention: ReturnConvention,
    ) -> Result<Self, MetricsError> {
        Self::build(&prices.closes(), convention)
    }

    pub fn convention(&self) -> ReturnConvention {
        self.convention
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn simple_returns_are_ratio_minus_one() {
        let returns = ReturnSeries::build(&[100.0, 110.0, 99.0], ReturnConvention::Simple).unwrap();

        assert_eq!(returns.len(), 2);
        assert_relative_eq!(returns.values()[0], 0.10, epsilon = 1e-12);
        assert_relative_eq!(returns.values()[1], -0.10, epsilon = 1e-12);
    }

    #[test]
    fn log_returns_are_natural_log_of_ratio() {
        let returns = ReturnSeries::build(&[100.0, 110.0, 121.0], ReturnConvention::Log).unwrap();

        assert_eq!(returns.convention(), ReturnConvention::Log);
        for &r in returns.values() {
            assert_relative_eq!(r, 1.1f64.ln(), epsilon = 1e-12);
        }
    }

    #[test]
    fn rejects_invalid_prices_before_computing() {
        for convention in ReturnConvention::ALL {
            assert_eq!(
                ReturnSeries::build(&[100.0], convention),
                Err(MetricsError::InvalidInput(PriceError::TooFewObservations(1)))
            );
            assert!(matches!(
                ReturnSeries::build(&[100.0, 0.0, 50.0], convention),
                Err(MetricsError::InvalidInput(PriceError::NonPositivePrice { index: 1, .. }))
            ));
            assert!(matches!(
                ReturnSeries::build(&[100.0, f64::INFINITY], convention),
                Err(MetricsError::InvalidInput(PriceError::NonFinitePrice { .. }))
            ));
        }
    }

    #[test]
    fn rejects_overflowing_price_ratio() {
        for convention in ReturnConvention::ALL {
            assert_eq!(
                ReturnSeries::build(&[1.0, 1e-300, 1e300], convention),
                Err(MetricsError::InvalidInput(PriceError::NonFiniteReturn {
                    index: 2
                }))
            );
        }
    }

    #[test]
    fn parses_convention_names() {
        assert_eq!(ReturnConvention::parse("LOG"), Some(ReturnConvention::Log));
        assert_eq!(
            ReturnConvention::parse("arithmetic"),
            Some(ReturnConvention::Simple)
        );
        assert_eq!(ReturnConvention::parse("geometric"), None);
        assert_eq!(ReturnConvention::Simple.to_string(), "simple");
    }
}
