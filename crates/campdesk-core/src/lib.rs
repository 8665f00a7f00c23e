//! Core library for Campdesk, a camp agenda manager.
//!
//! Talks to the camp management REST API, keeps a query cache and an
//! on-disk snapshot, and implements the session editing workflow:
//! validate, mutate, invalidate, re-fetch.

pub mod agenda;
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod utils;

pub use api::{AgendaApi, ApiClient, ApiError};
pub use config::Config;
pub use error::{AgendaError, Notice};
