// src/models.rs
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
}

/// A holding: ticker symbol with its current price.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerPrice {
    pub ticker: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalPrice {
    pub date: NaiveDate,
    pub price: Decimal,
}

/// Prices always go over the wire as strings with two decimals.
fn price_string(price: &Decimal) -> String {
    format!("{:.2}", price)
}

impl Serialize for TickerPrice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TickerPrice", 2)?;
        state.serialize_field("ticker", &self.ticker)?;
        state.serialize_field("price", &price_string(&self.price))?;
        state.end()
    }
}

impl Serialize for HistoricalPrice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("HistoricalPrice", 2)?;
        state.serialize_field("date", &self.date.format("%Y-%m-%d").to_string())?;
        state.serialize_field("price", &price_string(&self.price))?;
        state.end()
    }
}
