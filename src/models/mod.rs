//! Data models for tutorial records.
//!
//! - `Tutorial`: a server-side record (id, title, description, published)
//! - `NewTutorial`: the create payload (server assigns the id)
//! - `Draft`: client-only form state with validation

pub mod tutorial;

pub use tutorial::{Draft, DraftErrors, NewTutorial, Tutorial, DESCRIPTION_MAX_LEN, TITLE_MAX_LEN};
