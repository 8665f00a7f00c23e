//! REST API client module for the camp management service.
//!
//! This module provides the `AgendaApi` transport trait, the `ApiClient`
//! HTTP implementation, and the `ApiError` taxonomy for the camp-scoped
//! agenda endpoints (`/api/camps/:campId/...`).
//!
//! Requests carry an optional bearer token; obtaining one is outside this crate.

pub mod client;
pub mod error;
pub mod transport;

pub use client::{ApiClient, DEFAULT_BASE_URL};
pub use error::{ApiError, FieldIssue};
pub use transport::AgendaApi;
