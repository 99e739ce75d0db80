// src/datasource.rs
use crate::error::PortfolioError;
use crate::models::{HistoricalPrice, TickerPrice, User};
use chrono::{Duration, NaiveDate, Utc};
use log::debug;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashSet};
use uuid::{uuid, Uuid};

pub trait UserRepository: Send + Sync {
    fn get_user_by_username(&self, username: &str) -> Result<User, PortfolioError>;
}

/// Source of portfolio and price data consumed by the portfolio service.
pub trait DataSource: Send + Sync {
    fn get_historical_prices(
        &self,
        ticker: &str,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> Result<Vec<HistoricalPrice>, PortfolioError>;

    fn get_user_portfolio(&self, user_id: Uuid) -> Result<Vec<TickerPrice>, PortfolioError>;

    fn user_has_ticker(&self, user_id: Uuid, ticker: &str) -> Result<bool, PortfolioError>;
}

/// Fixed tables the mock generator works from: users, ticker base prices and
/// the linear drift applied to them.
#[derive(Debug, Clone)]
pub struct MarketCatalog {
    pub users: Vec<User>,
    pub base_prices: BTreeMap<String, Decimal>,
    pub epoch: NaiveDate,
    pub daily_increment: Decimal,
}

const MOCK_BASE_PRICES: [(&str, i64); 20] = [
    ("AAPL", 150),
    ("MSFT", 300),
    ("GOOG", 100),
    ("AMZN", 100),
    ("META", 200),
    ("TSLA", 200),
    ("NVDA", 300),
    ("JPM", 130),
    ("BABA", 80),
    ("JNJ", 160),
    ("WMT", 140),
    ("PG", 130),
    ("PYPL", 70),
    ("DIS", 90),
    ("ADBE", 340),
    ("PFE", 45),
    ("V", 200),
    ("MA", 350),
    ("CRM", 150),
    ("NFLX", 280),
];

const PRICING_EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(2023, 1, 1) {
    Some(date) => date,
    None => panic!("invalid pricing epoch"),
};

const MOCK_USERS: [(Uuid, &str); 3] = [
    (uuid!("8a8d28aa-6c15-43be-8363-eb9862466063"), "johndoe"),
    (uuid!("f2f208c8-16a4-4ef6-80e3-88103f6471a2"), "littlejohn"),
    (uuid!("fa2fc7df-37ed-4582-8c46-01de352b375f"), "jennifer"),
];

impl MarketCatalog {
    /// The built-in demo catalog: three users, twenty tickers, prices drifting
    /// up by 0.50 a day from 2023-01-01.
    pub fn mock() -> Self {
        let users = MOCK_USERS
            .iter()
            .map(|(id, username)| User {
                id: *id,
                username: username.to_string(),
            })
            .collect();
        let base_prices = MOCK_BASE_PRICES
            .iter()
            .map(|(ticker, price)| (ticker.to_string(), Decimal::from(*price)))
            .collect();

        MarketCatalog {
            users,
            base_prices,
            epoch: PRICING_EPOCH,
            daily_increment: Decimal::new(5, 1),
        }
    }
}

impl Default for MarketCatalog {
    fn default() -> Self {
        MarketCatalog::mock()
    }
}

/// In-memory data source that derives everything from a [`MarketCatalog`].
/// Holds no mutable state, so it can be shared freely between requests.
#[derive(Debug, Clone)]
pub struct LocalDataSource {
    catalog: MarketCatalog,
}

impl LocalDataSource {
    pub fn new(catalog: MarketCatalog) -> Self {
        LocalDataSource { catalog }
    }

    /// Whole calendar days from the epoch, so days before it count as negative
    /// offsets on the same straight line (no rounding toward the epoch).
    fn price_on(&self, base_price: Decimal, date: NaiveDate) -> Decimal {
        let days = (date - self.catalog.epoch).num_days();
        base_price + self.catalog.daily_increment * Decimal::from(days)
    }

    fn find_user(&self, user_id: Uuid) -> Result<&User, PortfolioError> {
        self.catalog
            .users
            .iter()
            .find(|u| u.id == user_id)
            .ok_or_else(|| PortfolioError::NotFound(format!("user not found: {}", user_id)))
    }

    /// Picks tickers by mapping each character of the username onto the
    /// alphabetically sorted catalog. Repeats are skipped, first occurrence
    /// order is kept.
    fn user_tickers(&self, user: &User) -> Vec<&str> {
        let symbols: Vec<&str> = self.catalog.base_prices.keys().map(String::as_str).collect();
        if symbols.is_empty() {
            return Vec::new();
        }

        let mut seen = HashSet::new();
        user.username
            .chars()
            .map(|c| symbols[c as usize % symbols.len()])
            .filter(|ticker| seen.insert(*ticker))
            .collect()
    }
}

impl Default for LocalDataSource {
    fn default() -> Self {
        LocalDataSource::new(MarketCatalog::mock())
    }
}

impl UserRepository for LocalDataSource {
    fn get_user_by_username(&self, username: &str) -> Result<User, PortfolioError> {
        self.catalog
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned()
            .ok_or_else(|| {
                PortfolioError::NotFound(format!("cannot find user for username [{}]", username))
            })
    }
}

impl DataSource for LocalDataSource {
    fn get_historical_prices(
        &self,
        ticker: &str,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> Result<Vec<HistoricalPrice>, PortfolioError> {
        let base_price = self
            .catalog
            .base_prices
            .get(ticker)
            .copied()
            .ok_or_else(|| PortfolioError::IllegalArgument(format!("invalid ticker [{}]", ticker)))?;
        if date_from > date_to {
            return Err(PortfolioError::IllegalArgument(
                "date from cannot be after date to".to_string(),
            ));
        }

        let days = (date_to - date_from).num_days();
        let prices = (0..=days)
            .map(|offset| {
                let date = date_to - Duration::days(offset);
                HistoricalPrice {
                    date,
                    price: self.price_on(base_price, date),
                }
            })
            .collect();
        Ok(prices)
    }

    fn get_user_portfolio(&self, user_id: Uuid) -> Result<Vec<TickerPrice>, PortfolioError> {
        let user = self.find_user(user_id)?;
        let today = Utc::now().date_naive();

        let mut holdings = Vec::new();
        for ticker in self.user_tickers(user) {
            let today_price = self
                .get_historical_prices(ticker, today, today)
                .map_err(|e| {
                    PortfolioError::Internal(format!(
                        "cannot get today's price for ticker [{}]: {}",
                        ticker, e
                    ))
                })?
                .into_iter()
                .next()
                .ok_or_else(|| {
                    PortfolioError::Internal(format!("no price for ticker [{}] today", ticker))
                })?;
            holdings.push(TickerPrice {
                ticker: ticker.to_string(),
                price: today_price.price,
            });
        }
        debug!("Derived {} holdings for user {}", holdings.len(), user.username);
        Ok(holdings)
    }

    fn user_has_ticker(&self, user_id: Uuid, ticker: &str) -> Result<bool, PortfolioError> {
        let user = self.find_user(user_id)?;
        Ok(self.user_tickers(user).contains(&ticker))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const LITTLEJOHN: Uuid = uuid!("f2f208c8-16a4-4ef6-80e3-88103f6471a2");
    const JOHNDOE: Uuid = uuid!("8a8d28aa-6c15-43be-8363-eb9862466063");

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn unknown_ticker_is_an_illegal_argument() {
        let ds = LocalDataSource::default();
        let err = ds
            .get_historical_prices("non-existent", date("2023-02-10"), date("2023-02-20"))
            .unwrap_err();
        assert!(err.is(ErrorKind::IllegalArgument));
    }

    #[test]
    fn inverted_range_is_an_illegal_argument() {
        let ds = LocalDataSource::default();
        let err = ds
            .get_historical_prices("AAPL", date("2023-02-20"), date("2023-02-10"))
            .unwrap_err();
        assert!(err.is(ErrorKind::IllegalArgument));
    }

    #[test]
    fn history_has_one_entry_per_day_newest_first() {
        let ds = LocalDataSource::default();
        let prices = ds
            .get_historical_prices("AAPL", date("2023-02-10"), date("2023-02-20"))
            .unwrap();
        assert_eq!(prices.len(), 11);
        assert_eq!(prices[0].date, date("2023-02-20"));
        assert_eq!(prices[10].date, date("2023-02-10"));
        assert!(prices.windows(2).all(|w| w[0].date > w[1].date));
    }

    #[test]
    fn single_day_window_returns_one_price() {
        let ds = LocalDataSource::default();
        let prices = ds
            .get_historical_prices("MSFT", date("2024-06-01"), date("2024-06-01"))
            .unwrap();
        assert_eq!(prices.len(), 1);
    }

    #[test]
    fn price_drifts_linearly_from_epoch() {
        let ds = LocalDataSource::default();
        let at_epoch = ds
            .get_historical_prices("AAPL", date("2023-01-01"), date("2023-01-01"))
            .unwrap();
        assert_eq!(at_epoch[0].price, Decimal::from(150));

        let later = ds
            .get_historical_prices("AAPL", date("2023-02-10"), date("2023-02-10"))
            .unwrap();
        // 40 days after the epoch
        assert_eq!(later[0].price, Decimal::from(170));

        let before = ds
            .get_historical_prices("PFE", date("2022-12-31"), date("2022-12-31"))
            .unwrap();
        assert_eq!(before[0].price, Decimal::new(445, 1));
    }

    #[test]
    fn mock_catalog_uses_pricing_epoch() {
        assert_eq!(MarketCatalog::mock().epoch, date("2023-01-01"));
    }

    #[test]
    fn drift_stays_linear_across_the_epoch() {
        let ds = LocalDataSource::default();
        let prices = ds
            .get_historical_prices("GOOG", date("2022-12-29"), date("2023-01-02"))
            .unwrap();
        let values: Vec<Decimal> = prices.iter().map(|p| p.price).collect();
        assert_eq!(
            values,
            vec![
                Decimal::new(1005, 1),
                Decimal::from(100),
                Decimal::new(995, 1),
                Decimal::from(99),
                Decimal::new(985, 1),
            ]
        );
    }

    #[test]
    fn unknown_user_portfolio_is_not_found() {
        let ds = LocalDataSource::default();
        let err = ds
            .get_user_portfolio(uuid!("1a97a523-e1dd-4a9b-878e-cc4d391e9860"))
            .unwrap_err();
        assert!(err.is(ErrorKind::NotFound));
    }

    #[test]
    fn portfolio_size_follows_distinct_username_characters() {
        let ds = LocalDataSource::default();
        let holdings = ds.get_user_portfolio(LITTLEJOHN).unwrap();
        assert_eq!(holdings.len(), 8);
    }

    #[test]
    fn portfolio_is_deterministic() {
        let ds = LocalDataSource::default();
        let first: Vec<String> = ds
            .get_user_portfolio(JOHNDOE)
            .unwrap()
            .into_iter()
            .map(|h| h.ticker)
            .collect();
        let second: Vec<String> = ds
            .get_user_portfolio(JOHNDOE)
            .unwrap()
            .into_iter()
            .map(|h| h.ticker)
            .collect();
        assert_eq!(first, second);
        assert_eq!(first, vec!["GOOG", "MSFT", "CRM", "META", "AAPL", "ADBE"]);
    }

    #[test]
    fn empty_username_holds_nothing() {
        let mut catalog = MarketCatalog::mock();
        let id = uuid!("00000000-0000-0000-0000-000000000001");
        catalog.users.push(User {
            id,
            username: String::new(),
        });
        let ds = LocalDataSource::new(catalog);
        assert!(ds.get_user_portfolio(id).unwrap().is_empty());
        assert!(!ds.user_has_ticker(id, "AAPL").unwrap());
    }

    #[test]
    fn user_has_ticker_checks_membership() {
        let ds = LocalDataSource::default();
        assert!(ds.user_has_ticker(JOHNDOE, "AAPL").unwrap());
        assert!(ds.user_has_ticker(JOHNDOE, "GOOG").unwrap());
        assert!(!ds.user_has_ticker(JOHNDOE, "TSLA").unwrap());
        assert!(!ds.user_has_ticker(JOHNDOE, "wrong_name").unwrap());
    }

    #[test]
    fn user_has_ticker_for_unknown_user_is_not_found() {
        let ds = LocalDataSource::default();
        let err = ds.user_has_ticker(Uuid::nil(), "AAPL").unwrap_err();
        assert!(err.is(ErrorKind::NotFound));
    }

    #[test]
    fn username_lookup_is_case_sensitive() {
        let ds = LocalDataSource::default();
        assert_eq!(ds.get_user_by_username("johndoe").unwrap().id, JOHNDOE);
        let err = ds.get_user_by_username("JohnDoe").unwrap_err();
        assert!(err.is(ErrorKind::NotFound));
    }
}
