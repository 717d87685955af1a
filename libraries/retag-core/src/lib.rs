//! Core library for retag
//!
//! Takes the free-text description a download tool leaves inside a song file,
//! extracts structured metadata from it, re-derives metadata buried in the
//! existing tags, and reconciles all of it into one final tag set.
//!
//! The library is I/O free: reading and writing tags goes through the
//! [`TagStore`] trait and every question to the user goes through the
//! [`Interaction`] trait.

#![forbid(unsafe_code)]

pub mod catalog;
pub mod description;
pub mod error;
pub mod interact;
pub mod reparse;
pub mod resolve;
pub mod store;
pub mod tags;
pub mod utils;

pub use description::DescriptionParser;
pub use error::{Result, RetagError};
pub use interact::Interaction;
pub use reparse::reparse;
pub use resolve::{Outcome, SongTags};
pub use store::TagStore;
pub use tags::{TagSet, TagValue};
