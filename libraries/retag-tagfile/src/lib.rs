//! Ogg Opus tag storage for retag
//!
//! Implements the [`retag_core::TagStore`] trait on top of `lofty`, mapping
//! a file's Vorbis comment block to and from a [`retag_core::TagSet`].

#![forbid(unsafe_code)]

mod error;
mod store;

pub use error::TagfileError;
pub use store::OpusTagStore;
