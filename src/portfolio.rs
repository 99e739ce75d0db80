// src/portfolio.rs
use crate::datasource::DataSource;
use crate::error::ApiError;
use crate::models::{HistoricalPrice, TickerPrice, User};
use chrono::{Duration, NaiveDate, Utc};
use log::{error, info, warn};
use std::sync::Arc;

pub const PAGE_SIZE_DAYS: i64 = 90;
/// Roughly ten years.
pub const MAX_DAYS_BACK: i64 = 10 * 365;
pub const MAX_PAGE: i64 = MAX_DAYS_BACK / PAGE_SIZE_DAYS;

#[derive(Clone)]
pub struct PortfolioService {
    data_source: Arc<dyn DataSource>,
}

impl PortfolioService {
    pub fn new(data_source: Arc<dyn DataSource>) -> Self {
        PortfolioService { data_source }
    }

    pub fn get_tickers(&self, user: &User) -> Result<Vec<TickerPrice>, ApiError> {
        match self.data_source.get_user_portfolio(user.id) {
            Ok(portfolio) => {
                info!(
                    "Portfolio of {} tickers retrieved for user [{}].",
                    portfolio.len(),
                    user.username
                );
                Ok(portfolio)
            }
            Err(e) => {
                error!(
                    "cannot fetch portfolio for user [{}]: {}",
                    user.username, e
                );
                Err(ApiError::from_domain(&e, "cannot get tickers"))
            }
        }
    }

    pub fn get_ticker_history(
        &self,
        user: &User,
        ticker: &str,
        page: Option<&str>,
    ) -> Result<Vec<HistoricalPrice>, ApiError> {
        let has_ticker = self
            .data_source
            .user_has_ticker(user.id, ticker)
            .map_err(|e| {
                error!(
                    "cannot determine whether user [{}] has ticker [{}]: {}",
                    user.username, ticker, e
                );
                ApiError::internal("cannot get ticker history")
            })?;
        if !has_ticker {
            info!("User [{}] does not hold ticker [{}].", user.username, ticker);
            return Err(ApiError::not_found("ticker not found"));
        }

        let page = parse_page(page);
        let (date_from, date_to) = page_window(page, Utc::now().date_naive());

        match self
            .data_source
            .get_historical_prices(ticker, date_from, date_to)
        {
            Ok(prices) => {
                info!(
                    "Retrieved {} prices of [{}] for user [{}], page {}.",
                    prices.len(),
                    ticker,
                    user.username,
                    page
                );
                Ok(prices)
            }
            Err(e) => {
                error!(
                    "cannot get historical prices of [{}] for user [{}]: {}",
                    ticker, user.username, e
                );
                Err(ApiError::internal("cannot get historical prices"))
            }
        }
    }
}

/// Turns the 1-based `page` query value into a 0-based page index within
/// `[0, MAX_PAGE]`. Missing or unparsable values mean the first page.
pub fn parse_page(raw: Option<&str>) -> i64 {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return 0;
    };
    match raw.parse::<i64>() {
        Ok(page) => page.saturating_sub(1).clamp(0, MAX_PAGE),
        Err(_) => {
            warn!("non-int page value: {}", raw);
            0
        }
    }
}

/// Inclusive `(date_from, date_to)` window for a 0-based page counted back
/// from `today`. The oldest page is cut off at `MAX_DAYS_BACK`.
pub fn page_window(page: i64, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let date_to = today - Duration::days(page * PAGE_SIZE_DAYS);
    let date_from = date_to - Duration::days(PAGE_SIZE_DAYS - 1);
    let oldest = today - Duration::days(MAX_DAYS_BACK);
    (date_from.max(oldest), date_to)
}
