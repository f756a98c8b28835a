use crate::error::MetricsError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_RISK_FREE_RATE: f64 = 0.03;
pub const DEFAULT_TRADING_DAYS_PER_YEAR: u32 = 252;

//how a zero volatility or zero-length period count is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DegeneratePolicy {
    //surface the non-finite value as computed
    #[default]
    Permissive,
    //fail with a DegenerateSeries error
    Strict,
}

impl DegeneratePolicy {
    //parse policy from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "permissive" => Some(DegeneratePolicy::Permissive),
            "strict" => Some(DegeneratePolicy::Strict),
            _ => None,
        }
    }
}

//settings applied uniformly to every metrics computation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    //annual risk-free rate subtracted in the sharpe ratio
    pub risk_free_rate: f64,

    //sampling periods per year, used for all annualization
    pub trading_days_per_year: u32,

    pub degenerate_policy: DegeneratePolicy,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        MetricsConfig {
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            trading_days_per_year: DEFAULT_TRADING_DAYS_PER_YEAR,
            degenerate_policy: DegeneratePolicy::Permissive,
        }
    }
}

impl MetricsConfig {
    pub fn with_risk_free_rate(mut self, risk_free_rate: f64) -> Self {
        self.risk_free_rate = risk_free_rate;
        self
    }

    pub fn with_trading_days(mut self, trading_days_per_year: u32) -> Self {
        self.trading_days_per_year = trading_days_per_year;
        self
    }

    pub fn with_policy(mut self, degenerate_policy: DegeneratePolicy) -> Self {
        self.degenerate_policy = degenerate_policy;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.degenerate_policy == DegeneratePolicy::Strict
    }

    pub fn periods_per_year(&self) -> f64 {
        self.trading_days_per_year as f64
    }

    pub fn validate(&self) -> Result<(), MetricsError> {
        if self.trading_days_per_year == 0 {
            return Err(MetricsError::InvalidConfig(
                "trading_days_per_year must be positive".to_string(),
            ));
        }
        if !self.risk_free_rate.is_finite() {
            return Err(MetricsError::InvalidConfig(format!(
                "risk_free_rate must be finite, got {}",
                self.risk_free_rate
            )));
        }
        Ok(())
    }

    //load configuration from a JSON file
    pub fn from_json_file(path: &PathBuf) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: MetricsConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    //save configuration to a JSON file
    pub fn to_json_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
