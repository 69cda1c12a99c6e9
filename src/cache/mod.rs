//! Client-side query cache with tag-based invalidation.
//!
//! Reads are cached per query key and labeled with the tags they
//! provide; writes invalidate tags, forcing subscribed queries to
//! re-fetch. See `tags` for the endpoint tag rules and `store` for the
//! cache itself.

pub mod store;
pub mod tags;

pub use store::{age_display, QueryState, Store};
pub use tags::{Mutation, QueryData, QueryKey, Tag};
