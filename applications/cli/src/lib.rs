//! Terminal front end for retag
//!
//! Walks a directory of `.opus` files and reconciles each song's tags with
//! the metadata hidden in its embedded description, asking the user to
//! settle real conflicts through simple numbered stdin menus.

#![forbid(unsafe_code)]

mod app;
mod args;
mod config;
mod display;
mod menu;

pub use app::run;
pub use args::Args;
pub use config::RetagConfig;
