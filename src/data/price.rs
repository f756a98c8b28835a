use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PriceError {
    #[error("At least 2 price observations are required, got {0}")]
    TooFewObservations(usize),
    #[error("Non-positive price {price} at index {index}")]
    NonPositivePrice { index: usize, price: f64 },
    #[error("Non-finite price {price} at index {index}")]
    NonFinitePrice { index: usize, price: f64 },
    #[error("Non-finite return ending at price index {index}")]
    NonFiniteReturn { index: usize },
    #[error("Dates not strictly increasing: {previous} followed by {current}")]
    UnorderedDates {
        previous: NaiveDate,
        current: NaiveDate,
    },
}

//a single closing price observation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        PricePoint { date, close }
    }
}

//ordered closing prices for one symbol, only built through validation
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    //creates a new PriceSeries with validation
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, PriceError> {
        for pair in points.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(PriceError::UnorderedDates {
                    previous: pair[0].date,
                    current: pair[1].date,
                });
            }
        }

        let closes: Vec<f64> = points.iter().map(|p| p.close).collect();
        validate_closes(&closes)?;

        Ok(PriceSeries {
            symbol: symbol.into(),
            points,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    //closing prices in date order
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    //always false once validated
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    //first and last observation dates
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.points.first()?.date, self.points.last()?.date))
    }
}

//checks that a close series can produce a defined return series
pub fn validate_closes(closes: &[f64]) -> Result<(), PriceError> {
    if closes.len() < 2 {
        return Err(PriceError::TooFewObservations(closes.len()));
    }

    for (index, &price) in closes.iter().enumerate() {
        if !price.is_finite() {
            return Err(PriceError::NonFinitePrice { index, price });
        }
        if price <= 0.0 {
            return Err(PriceError::NonPositivePrice { index, price });
        }
    }

    Ok(())
}
