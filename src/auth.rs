// src/auth.rs
use crate::datasource::UserRepository;
use crate::error::PortfolioError;
use crate::models::User;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::sync::Arc;
use thiserror::Error;

/// Only the username identifies a caller; every account shares this empty
/// password until real credentials exist.
const MOCK_PASSWORD: &str = "";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no basic auth credentials provided")]
    MissingCredentials,

    #[error("wrong basic auth credentials provided")]
    MalformedCredentials,

    #[error("cannot get user by username [{username}]: {source}")]
    UnknownUser {
        username: String,
        source: PortfolioError,
    },

    #[error("wrong username or password for username [{0}]")]
    WrongPassword(String),
}

/// Resolves the principal behind a request from its `Authorization` header.
pub trait Authorizer: Send + Sync {
    fn authorize(&self, authorization: Option<&str>) -> Result<User, AuthError>;
}

pub struct BasicAuthorizer {
    users: Arc<dyn UserRepository>,
}

impl BasicAuthorizer {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        BasicAuthorizer { users }
    }
}

impl Authorizer for BasicAuthorizer {
    fn authorize(&self, authorization: Option<&str>) -> Result<User, AuthError> {
        let header = authorization.ok_or(AuthError::MissingCredentials)?;
        let (username, password) =
            parse_basic_auth(header).ok_or(AuthError::MalformedCredentials)?;
        if username.is_empty() {
            return Err(AuthError::MalformedCredentials);
        }

        let user = self
            .users
            .get_user_by_username(&username)
            .map_err(|source| AuthError::UnknownUser {
                username: username.clone(),
                source,
            })?;

        if user.username != username || password != MOCK_PASSWORD {
            return Err(AuthError::WrongPassword(user.username));
        }
        Ok(user)
    }
}

/// Splits `Basic <base64(user:pass)>` into its two halves. The scheme name is
/// matched case-insensitively; the password may itself contain colons.
fn parse_basic_auth(header: &str) -> Option<(String, String)> {
    let (scheme, encoded) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let credentials = String::from_utf8(decoded).ok()?;
    let (username, password) = credentials.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}
