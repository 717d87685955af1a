//! Command-line arguments.

use clap::Parser;
use std::path::PathBuf;

/// Reconcile song tags with metadata parsed from the embedded description
#[derive(Parser, Debug)]
#[command(name = "retag", version, about)]
pub struct Args {
    /// Directory containing the .opus files to process
    #[arg(short, long, value_name = "DIR", env = "RETAG_DIRECTORY")]
    pub directory: PathBuf,

    /// Force the album tag to this value; a differing parsed album is kept
    /// as the disc subtitle
    #[arg(short = 'b', long = "album", value_name = "ALBUM")]
    pub album: Option<String>,

    /// Offer every song for review, even ones with no new data
    #[arg(short, long)]
    pub all: bool,
}
