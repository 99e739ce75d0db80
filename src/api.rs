// src/api.rs
use crate::auth::Authorizer;
use crate::error::ApiError;
use crate::models::User;
use crate::portfolio::PortfolioService;
use log::warn;
use std::sync::Arc;
use warp::filters::cors::Builder;
use warp::path::FullPath;
use warp::{Filter, Rejection, Reply};

pub fn routes(
    service: Arc<PortfolioService>,
    authorizer: Arc<dyn Authorizer>,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let tickers = warp::path!("tickers")
        .and(warp::get())
        .and(with_auth(authorizer.clone()))
        .and(with_service(service.clone()))
        .and_then(get_tickers_handler);

    let history = warp::path!("tickers" / String / "history")
        .and(warp::get())
        .and(with_auth(authorizer))
        .and(warp::query::<Vec<(String, String)>>())
        .and(with_service(service))
        .and_then(get_ticker_history_handler);

    tickers.or(history)
}

pub fn cors() -> Builder {
    warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET", "HEAD", "POST", "PUT", "OPTIONS"])
        .allow_headers(vec!["X-Requested-With", "Authorization", "Content-Type"])
}

fn with_service(
    service: Arc<PortfolioService>,
) -> impl Filter<Extract = (Arc<PortfolioService>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || service.clone())
}

/// Resolves the caller from the `Authorization` header, rejecting with 403
/// when that fails. Handlers receive the [`User`] as a plain argument.
fn with_auth(
    authorizer: Arc<dyn Authorizer>,
) -> impl Filter<Extract = (User,), Error = Rejection> + Clone {
    warp::header::optional::<String>("authorization")
        .and(warp::path::full())
        .and_then(move |header: Option<String>, path: FullPath| {
            let authorizer = authorizer.clone();
            async move {
                authorizer.authorize(header.as_deref()).map_err(|e| {
                    warn!("Unauthorized access by URI [{}]: {}", path.as_str(), e);
                    warp::reject::custom(ApiError::forbidden())
                })
            }
        })
}

async fn get_tickers_handler(
    user: User,
    service: Arc<PortfolioService>,
) -> Result<impl Reply, Rejection> {
    match service.get_tickers(&user) {
        Ok(portfolio) => Ok(warp::reply::json(&portfolio)),
        Err(e) => Err(warp::reject::custom(e)),
    }
}

async fn get_ticker_history_handler(
    ticker: String,
    user: User,
    query: Vec<(String, String)>,
    service: Arc<PortfolioService>,
) -> Result<impl Reply, Rejection> {
    // Repeated keys are allowed; the first `page` wins.
    let page = query
        .iter()
        .find(|(key, _)| key == "page")
        .map(|(_, value)| value.as_str());
    match service.get_ticker_history(&user, &ticker, page) {
        Ok(prices) => Ok(warp::reply::json(&prices)),
        Err(e) => Err(warp::reject::custom(e)),
    }
}
