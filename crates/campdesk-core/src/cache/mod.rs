//! Caching for camp data.
//!
//! - `QueryCache`: in-memory query repository with explicit `get` and
//!   `invalidate`, keyed by `QueryKey`. Agenda mutations invalidate the
//!   agenda and camp keys so the next read re-fetches.
//! - `CacheManager`: on-disk JSON snapshot of the last loaded agenda, camp
//!   and reference data, shown at startup until the first fetch lands.

pub mod manager;
pub mod query;

pub use manager::{CacheAges, CacheManager, CachedData};
pub use query::{QueryCache, QueryKey};
