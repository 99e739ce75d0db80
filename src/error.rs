// src/error.rs
use log::error;
use serde::Serialize;
use std::convert::Infallible;
use std::fmt;
use thiserror::Error;
use warp::http::StatusCode;
use warp::reject::Reject;
use warp::{Rejection, Reply};

/// Discriminant of a [`PortfolioError`], used to branch on the cause of a
/// failure without looking at its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    IllegalArgument,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortfolioError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    IllegalArgument(String),

    #[error("{0}")]
    Internal(String),
}

impl PortfolioError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PortfolioError::NotFound(_) => ErrorKind::NotFound,
            PortfolioError::IllegalArgument(_) => ErrorKind::IllegalArgument,
            PortfolioError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind() == kind
    }
}

/// Rejection carried through warp filters and rendered by [`handle_rejection`].
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            message: message.into(),
        }
    }

    pub fn forbidden() -> Self {
        ApiError::new(StatusCode::FORBIDDEN, "forbidden")
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Maps a domain error onto a response. Only not-found causes reach the
    /// client; everything else gets the generic `fallback` text.
    pub fn from_domain(err: &PortfolioError, fallback: &str) -> Self {
        match err.kind() {
            ErrorKind::NotFound => ApiError::not_found("not found"),
            ErrorKind::IllegalArgument | ErrorKind::Internal => ApiError::internal(fallback),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status.as_u16(), self.message)
    }
}

impl std::error::Error for ApiError {}

impl Reject for ApiError {}

#[derive(Serialize)]
pub struct ErrorBody {
    pub message: String,
}

pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if let Some(api_error) = err.find::<ApiError>() {
        (api_error.status, api_error.message.clone())
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, "not found".to_string())
    } else if err.find::<warp::reject::InvalidQuery>().is_some()
        || err.find::<warp::reject::InvalidHeader>().is_some()
    {
        (StatusCode::BAD_REQUEST, "bad request".to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "method not allowed".to_string())
    } else {
        error!("Unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal server error".to_string(),
        )
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&ErrorBody { message }),
        status,
    ))
}
