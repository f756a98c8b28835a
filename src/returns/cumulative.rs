use crate::returns::series::{ReturnConvention, ReturnSeries};
use serde::{Deserialize, Serialize};

/// Running growth of a return series, one element per return period.
///
/// Log series hold the running sum of log returns (log-growth); simple
/// series hold the running product of `1 + r`, which is already the growth
/// factor of one unit invested at the first price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CumulativeSeries {
    convention: ReturnConvention,
    values: Vec<f64>,
}

impl CumulativeSeries {
    //single-pass prefix fold of the return series
    pub fn accumulate(returns: &ReturnSeries) -> Self {
        let convention = returns.convention();
        let values = match convention {
            ReturnConvention::Log => returns
                .values()
                .iter()
                .scan(0.0, |sum, &r| {
                    *sum += r;
                    Some(*sum)
                })
                .collect(),
            ReturnConvention::Simple => returns
                .values()
                .iter()
                .scan(1.0, |product, &r| {
                    *product *= 1.0 + r;
                    Some(*product)
                })
                .collect(),
        };

        CumulativeSeries { convention, values }
    }

    pub fn convention(&self) -> ReturnConvention {
        self.convention
    }

    //raw accumulated values (log-growth or growth factor)
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    //growth factor at period i
    pub fn growth_factor(&self, i: usize) -> Option<f64> {
        let value = *self.values.get(i)?;
        Some(match self.convention {
            ReturnConvention::Log => value.exp(),
            ReturnConvention::Simple => value,
        })
    }

    //growth factors for every period
    pub fn growth_factors(&self) -> Vec<f64> {
        match self.convention {
            ReturnConvention::Log => self.values.iter().map(|v| v.exp()).collect(),
            ReturnConvention::Simple => self.values.clone(),
        }
    }

    //realized total multiple over the whole period (1.23 = +23%)
    pub fn final_growth_factor(&self) -> Option<f64> {
        self.growth_factor(self.values.len().checked_sub(1)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn simple_is_running_product() {
        let returns = ReturnSeries::build(&[100.0, 110.0, 99.0], ReturnConvention::Simple).unwrap();
        let cumulative = CumulativeSeries::accumulate(&returns);

        assert_eq!(cumulative.len(), returns.len());
        assert_relative_eq!(cumulative.values()[0], 1.10, epsilon = 1e-12);
        assert_relative_eq!(cumulative.values()[1], 0.99, epsilon = 1e-12);
    }

    #[test]
    fn log_is_running_sum() {
        let returns = ReturnSeries::build(&[100.0, 110.0, 121.0], ReturnConvention::Log).unwrap();
        let cumulative = CumulativeSeries::accumulate(&returns);

        assert_relative_eq!(cumulative.values()[1], 2.0 * 1.1f64.ln(), epsilon = 1e-12);
        assert_relative_eq!(
            cumulative.final_growth_factor().unwrap(),
            1.21,
            epsilon = 1e-12
        );
    }

    #[test]
    fn first_element_is_first_period_growth() {
        for convention in ReturnConvention::ALL {
            let returns = ReturnSeries::build(&[40.0, 42.0, 41.0], convention).unwrap();
            let cumulative = CumulativeSeries::accumulate(&returns);
            assert_relative_eq!(cumulative.growth_factor(0).unwrap(), 1.05, epsilon = 1e-12);
        }
    }

    #[test]
    fn growth_factor_out_of_range_is_none() {
        let returns = ReturnSeries::build(&[1.0, 2.0], ReturnConvention::Simple).unwrap();
        let cumulative = CumulativeSeries::accumulate(&returns);
        assert_eq!(cumulative.growth_factor(1), None);
    }
}
