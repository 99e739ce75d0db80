// src/lib.rs
//! Authenticated HTTP API serving a user's stock holdings and paginated
//! price history from a deterministic in-memory market.

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod datasource;
pub mod error;
pub mod models;
pub mod portfolio;
