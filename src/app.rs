// src/app.rs
use crate::api;
use crate::auth::{Authorizer, BasicAuthorizer};
use crate::config::{Config, DataSourceKind};
use crate::datasource::{DataSource, LocalDataSource, MarketCatalog, UserRepository};
use crate::error::handle_rejection;
use crate::portfolio::PortfolioService;
use log::info;
use std::sync::Arc;
use thiserror::Error;
use warp::{Filter, Rejection, Reply};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("data source [{0}] is not available")]
    DataSourceUnavailable(DataSourceKind),
}

/// Wires the configured data source, the authorizer and the portfolio
/// service into the complete HTTP filter, error recovery and CORS included.
pub fn build_routes(
    config: &Config,
) -> Result<impl Filter<Extract = impl Reply, Error = Rejection> + Clone, AppError> {
    let (data_source, users): (Arc<dyn DataSource>, Arc<dyn UserRepository>) =
        match config.data_source {
            DataSourceKind::Local => {
                let local = Arc::new(LocalDataSource::new(MarketCatalog::mock()));
                let data_source: Arc<dyn DataSource> = local.clone();
                let users: Arc<dyn UserRepository> = local;
                (data_source, users)
            }
            kind @ DataSourceKind::Yahoo => return Err(AppError::DataSourceUnavailable(kind)),
        };
    info!("Using {} data source.", config.data_source);

    let authorizer: Arc<dyn Authorizer> = Arc::new(BasicAuthorizer::new(users));
    let service = Arc::new(PortfolioService::new(data_source));

    Ok(api::routes(service, authorizer)
        .recover(handle_rejection)
        .with(api::cors())
        .with(warp::log("portfolio_api")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_data_source_cannot_be_built() {
        let config = Config {
            port: 8080,
            data_source: DataSourceKind::Yahoo,
        };
        assert!(matches!(
            build_routes(&config),
            Err(AppError::DataSourceUnavailable(DataSourceKind::Yahoo))
        ));
    }
}
