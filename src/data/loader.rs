use crate::data::price::{PricePoint, PriceSeries};
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CsvRecord {
    date: String,
    close: f64,
    #[serde(default)]
    symbol: Option<String>,
}

//a parsed csv row, before symbol and date range filtering
#[derive(Debug, Clone, PartialEq)]
pub struct CloseRecord {
    pub date: NaiveDate,
    pub close: f64,
    pub symbol: Option<String>,
}

//loads closing prices from a csv file with a date,close[,symbol] header
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Vec<CloseRecord>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .context(format!("Failed to open CSV file: {:?}", path))?;

    let mut records = Vec::new();

    for (index, result) in reader.deserialize().enumerate() {
        let record: CsvRecord =
            result.context(format!("Failed to parse CSV record at line {}", index + 2))?;

        let date = parse_date(&record.date).context(format!(
            "Failed to parse date '{}' at line {}",
            record.date,
            index + 2
        ))?;

        records.push(CloseRecord {
            date,
            close: record.close,
            symbol: record.symbol.filter(|s| !s.is_empty()),
        });
    }

    //sort by date to ensure chronological order
    records.sort_by(|a, b| a.date.cmp(&b.date));

    tracing::debug!(path = ?path, rows = records.len(), "loaded close records");

    Ok(records)
}

//accepts plain dates or rfc3339 timestamps
fn parse_date(raw: &str) -> Result<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }

    let timestamp = DateTime::parse_from_rfc3339(raw)?;
    Ok(timestamp.date_naive())
}

//selects one symbol over [start, end) and validates it into a PriceSeries
pub fn build_price_series(
    records: &[CloseRecord],
    symbol: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<PriceSeries> {
    let points: Vec<PricePoint> = records
        .iter()
        .filter(|r| r.symbol.as_deref().map_or(true, |s| s == symbol))
        .filter(|r| start.map_or(true, |start| r.date >= start))
        .filter(|r| end.map_or(true, |end| r.date < end))
        .map(|r| PricePoint::new(r.date, r.close))
        .collect();

    PriceSeries::new(symbol, points).context(format!(
        "Invalid price history for {} over [{}, {})",
        symbol,
        start.map_or("start".to_string(), |d| d.to_string()),
        end.map_or("end".to_string(), |d| d.to_string()),
    ))
}
