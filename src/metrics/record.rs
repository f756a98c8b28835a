use crate::error::MetricsError;
use crate::returns::ReturnConvention;
use indexmap::IndexMap;
use prettytable::{Cell, Row, Table};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

//every metric label a record can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricName {
    #[serde(rename = "Log Cumulative Return")]
    LogCumulativeReturn,
    #[serde(rename = "Log Annualized Return")]
    LogAnnualizedReturn,
    #[serde(rename = "Log Annualized Volatility")]
    LogAnnualizedVolatility,
    #[serde(rename = "Cumulative Return")]
    CumulativeReturn,
    #[serde(rename = "Simple Annualized Return")]
    SimpleAnnualizedReturn,
    #[serde(rename = "CAGR")]
    Cagr,
    #[serde(rename = "Simple Annualized Volatility")]
    SimpleAnnualizedVolatility,
    #[serde(rename = "Maximum Drawdown")]
    MaximumDrawdown,
    #[serde(rename = "Raw Sharpe Ratio")]
    RawSharpeRatio,
    #[serde(rename = "Sharpe Ratio")]
    SharpeRatio,
}

const LOG_ORDER: [MetricName; 5] = [
    MetricName::LogCumulativeReturn,
    MetricName::LogAnnualizedReturn,
    MetricName::LogAnnualizedVolatility,
    MetricName::RawSharpeRatio,
    MetricName::SharpeRatio,
];

const SIMPLE_ORDER: [MetricName; 7] = [
    MetricName::CumulativeReturn,
    MetricName::SimpleAnnualizedReturn,
    MetricName::Cagr,
    MetricName::SimpleAnnualizedVolatility,
    MetricName::MaximumDrawdown,
    MetricName::RawSharpeRatio,
    MetricName::SharpeRatio,
];

impl MetricName {
    pub fn label(&self) -> &'static str {
        match self {
            MetricName::LogCumulativeReturn => "Log Cumulative Return",
            MetricName::LogAnnualizedReturn => "Log Annualized Return",
            MetricName::LogAnnualizedVolatility => "Log Annualized Volatility",
            MetricName::CumulativeReturn => "Cumulative Return",
            MetricName::SimpleAnnualizedReturn => "Simple Annualized Return",
            MetricName::Cagr => "CAGR",
            MetricName::SimpleAnnualizedVolatility => "Simple Annualized Volatility",
            MetricName::MaximumDrawdown => "Maximum Drawdown",
            MetricName::RawSharpeRatio => "Raw Sharpe Ratio",
            MetricName::SharpeRatio => "Sharpe Ratio",
        }
    }

    //presentation order of the metrics reported under a convention
    pub fn ordered_for(convention: ReturnConvention) -> &'static [MetricName] {
        match convention {
            ReturnConvention::Log => &LOG_ORDER,
            ReturnConvention::Simple => &SIMPLE_ORDER,
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

//metrics reported under the log convention
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogMetrics {
    pub cumulative_return: f64,
    pub annualized_return: f64,
    pub annualized_volatility: f64,
    pub raw_sharpe_ratio: f64,
    pub sharpe_ratio: f64,
}

//metrics reported under the simple convention
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimpleMetrics {
    pub cumulative_return: f64,
    pub annualized_return: f64,
    pub cagr: f64,
    pub annualized_volatility: f64,
    pub max_drawdown: f64,
    pub raw_sharpe_ratio: f64,
    pub sharpe_ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ConventionMetrics {
    Log(LogMetrics),
    Simple(SimpleMetrics),
}

/// Fixed-shape metrics for one symbol under one return convention.
///
/// Values may be non-finite when the series is degenerate (zero volatility
/// gives infinite or NaN Sharpe ratios) and the permissive policy is in use.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsRecord {
    symbol: String,
    metrics: ConventionMetrics,
}

impl MetricsRecord {
    pub fn new(symbol: impl Into<String>, metrics: ConventionMetrics) -> Self {
        MetricsRecord {
            symbol: symbol.into(),
            metrics,
        }
    }

    //places computed scalars into the fixed field order, no computation
    pub fn assemble(
        symbol: impl Into<String>,
        convention: ReturnConvention,
        scalars: &IndexMap<MetricName, f64>,
    ) -> Result<Self, MetricsError> {
        let get = |name: MetricName| {
            scalars
                .get(&name)
                .copied()
                .ok_or(MetricsError::MissingMetric(name))
        };

        let metrics = match convention {
            ReturnConvention::Log => ConventionMetrics::Log(LogMetrics {
                cumulative_return: get(MetricName::LogCumulativeReturn)?,
                annualized_return: get(MetricName::LogAnnualizedReturn)?,
                annualized_volatility: get(MetricName::LogAnnualizedVolatility)?,
                raw_sharpe_ratio: get(MetricName::RawSharpeRatio)?,
                sharpe_ratio: get(MetricName::SharpeRatio)?,
            }),
            ReturnConvention::Simple => ConventionMetrics::Simple(SimpleMetrics {
                cumulative_return: get(MetricName::CumulativeReturn)?,
                annualized_return: get(MetricName::SimpleAnnualizedReturn)?,
                cagr: get(MetricName::Cagr)?,
                annualized_volatility: get(MetricName::SimpleAnnualizedVolatility)?,
                max_drawdown: get(MetricName::MaximumDrawdown)?,
                raw_sharpe_ratio: get(MetricName::RawSharpeRatio)?,
                sharpe_ratio: get(MetricName::SharpeRatio)?,
            }),
        };

        Ok(MetricsRecord::new(symbol, metrics))
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn metrics(&self) -> &ConventionMetrics {
        &self.metrics
    }

    pub fn convention(&self) -> ReturnConvention {
        match self.metrics {
            ConventionMetrics::Log(_) => ReturnConvention::Log,
            ConventionMetrics::Simple(_) => ReturnConvention::Simple,
        }
    }

    //metric values in presentation order
    pub fn entries(&self) -> Vec<(MetricName, f64)> {
        match &self.metrics {
            ConventionMetrics::Log(m) => vec![
                (MetricName::LogCumulativeReturn, m.cumulative_return),
                (MetricName::LogAnnualizedReturn, m.annualized_return),
                (MetricName::LogAnnualizedVolatility, m.annualized_volatility),
                (MetricName::RawSharpeRatio, m.raw_sharpe_ratio),
                (MetricName::SharpeRatio, m.sharpe_ratio),
            ],
            ConventionMetrics::Simple(m) => vec![
                (MetricName::CumulativeReturn, m.cumulative_return),
                (MetricName::SimpleAnnualizedReturn, m.annualized_return),
                (MetricName::Cagr, m.cagr),
                (MetricName::SimpleAnnualizedVolatility, m.annualized_volatility),
                (MetricName::MaximumDrawdown, m.max_drawdown),
                (MetricName::RawSharpeRatio, m.raw_sharpe_ratio),
                (MetricName::SharpeRatio, m.sharpe_ratio),
            ],
        }
    }

    pub fn get(&self, name: MetricName) -> Option<f64> {
        self.entries()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, value)| value)
    }

    //true if any metric is infinite or NaN
    pub fn has_non_finite(&self) -> bool {
        self.entries().iter().any(|(_, value)| !value.is_finite())
    }

    //ordered label -> value mapping
    pub fn to_map(&self) -> IndexMap<&'static str, f64> {
        self.entries()
            .into_iter()
            .map(|(name, value)| (name.label(), value))
            .collect()
    }

    //serializes the record, non-finite values become null
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    //prints metrics in a formatted table
    pub fn pretty_print_table(&self) {
        let mut table = Table::new();

        table.add_row(Row::new(vec![
            Cell::new(&format!("{} ({})", self.symbol, self.convention())),
            Cell::new("Value"),
        ]));

        for (name, value) in self.entries() {
            table.add_row(Row::new(vec![
                Cell::new(name.label()),
                Cell::new(&format_value(value)),
            ]));
        }

        table.printstd();
    }
}

impl Serialize for MetricsRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("MetricsRecord", 3)?;
        state.serialize_field("symbol", &self.symbol)?;
        state.serialize_field("convention", &self.convention())?;
        state.serialize_field("metrics", &self.to_map())?;
        state.end()
    }
}

fn format_value(value: f64) -> String {
    if value.is_finite() {
        format!("{:.4}", value)
    } else {
        format!("{}", value)
    }
}

//prints one row per record, one table per convention
pub fn print_comparison_table(records: &[MetricsRecord]) {
    for convention in ReturnConvention::ALL {
        let rows: Vec<&MetricsRecord> = records
            .iter()
            .filter(|r| r.convention() == convention)
            .collect();

        if rows.is_empty() {
            continue;
        }

        let mut table = Table::new();

        let mut header = vec![Cell::new("Symbol")];
        header.extend(
            MetricName::ordered_for(convention)
                .iter()
                .map(|name| Cell::new(name.label())),
        );
        table.add_row(Row::new(header));

        for record in rows {
            let mut cells = vec![Cell::new(record.symbol())];
            cells.extend(
                record
                    .entries()
                    .into_iter()
                    .map(|(_, value)| Cell::new(&format_value(value))),
            );
            table.add_row(Row::new(cells));
        }

        table.printstd();
    }
}
