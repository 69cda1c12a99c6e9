//! REST API client module for the tutorials backend.
//!
//! This module provides the `ApiClient` for the eight REST actions the
//! application consumes: list, get-one, list-published, filter-by-title,
//! create, update, delete-one, and delete-all.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
