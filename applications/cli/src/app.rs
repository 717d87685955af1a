//! The per-song driver loop.

use crate::args::Args;
use crate::config::RetagConfig;
use crate::display::{self, paint, BLUE, GREEN, RED, YELLOW};
use crate::menu::TermMenu;
use anyhow::{bail, Result};
use retag_core::{
    reparse, utils, DescriptionParser, Interaction, Outcome, SongTags, TagStore,
};
use regex::Regex;
use retag_tagfile::OpusTagStore;
use std::path::{Path, PathBuf};
use tracing::info;

/// What the final review menu decided for one song
enum Review {
    Save,
    Pass,
    Reset,
    Quit,
}

/// Walk the music directory and process every `.opus` file in name order.
pub fn run(args: &Args, config: &RetagConfig) -> Result<()> {
    if !args.directory.is_dir() {
        bail!("{} is not a directory", args.directory.display());
    }
    let songs = collect_songs(&args.directory)?;
    if songs.is_empty() {
        println!(
            "{}",
            paint("No .opus files found, nothing to do", YELLOW)
        );
        return Ok(());
    }

    let deny_patterns = config.deny_patterns()?;
    let store = OpusTagStore::new();
    let mut ui = TermMenu::new();

    for (index, path) in songs.iter().enumerate() {
        let song_name = utils::song_display_name(path);
        let header = format!("Song {} of {}: {song_name}", index + 1, songs.len());
        // A reset re-reads the file and runs the whole pipeline again.
        'song: loop {
            println!("\n{}", paint(&header, BLUE));
            let mut tags = prepare_song(&store, path, args, config, &deny_patterns)?;

            if !args.all && args.album.is_none() && !tags.check_any_new_data_exists() {
                println!("{}", paint("No new data, skipping song", YELLOW));
                break 'song;
            }

            if tags.resolve(&mut ui)? == Outcome::Aborted {
                println!("Skipping this and all remaining songs");
                return Ok(());
            }

            match review(&mut tags, &mut ui)? {
                Review::Save => {
                    store.commit(path, &tags.resolved)?;
                    println!("{}", paint(&format!("Saved: {song_name}"), GREEN));
                    break 'song;
                }
                Review::Pass => {
                    println!("{}", paint(&format!("Left unchanged: {song_name}"), YELLOW));
                    break 'song;
                }
                Review::Reset => {
                    info!("re-deriving tags for {song_name}");
                }
                Review::Quit => {
                    println!("Skipping this and all remaining songs");
                    return Ok(());
                }
            }
        }
    }
    Ok(())
}

fn collect_songs(directory: &Path) -> Result<Vec<PathBuf>> {
    let mut songs: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(directory)? {
        let path = entry?.path();
        let is_opus = path
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case("opus"));
        if is_opus && path.is_file() {
            songs.push(path);
        }
    }
    songs.sort();
    Ok(songs)
}

/// Read a song and run every automatic step up to the interactive part.
fn prepare_song(
    store: &OpusTagStore,
    path: &Path,
    args: &Args,
    config: &RetagConfig,
    deny_patterns: &[Regex],
) -> Result<SongTags> {
    let mut tags = SongTags::new(store.snapshot(path)?);
    tags.discard_upload_date();
    if let Some(album) = &args.album {
        tags.set_manual_album(album);
    }
    tags.from_tags = reparse(&tags.original);

    if let Some(description) = tags.description_from_original() {
        let mut parser = DescriptionParser::new(args.album.is_some());
        parser.parse(&description);
        tags.youtube = parser.into_tags();
        tags.from_desc = reparse(&tags.youtube);
        tags.mark_provenance();
        tags.description = Some(description);
    }

    tags.prune_resolved(&config.tags_to_delete, deny_patterns);
    Ok(tags)
}

/// The final menu after resolution; loops until the song's fate is decided.
fn review(tags: &mut SongTags, ui: &mut TermMenu) -> Result<Review> {
    loop {
        println!("\nFinal result:");
        display::print_resolved(tags);

        let items: Vec<String> = [
            "Save the tags",
            "Pass, leave the file unchanged",
            "Reset and start this song over",
            "Modify a tag by hand",
            "Delete items from a tag",
            "Show the raw description",
            "Show all sources",
            "Show the resolved tags",
            "Quit",
        ]
        .map(String::from)
        .to_vec();

        match ui.choose_one("What do you want to do?", &items)? {
            Some(0) => return Ok(Review::Save),
            Some(1) => return Ok(Review::Pass),
            Some(2) => return Ok(Review::Reset),
            Some(3) => tags.modify_resolved(ui)?,
            Some(4) => tags.delete_tag_items(ui)?,
            Some(5) => match &tags.description {
                Some(text) => println!("{text}"),
                None => println!("{}", paint("This song has no description", RED)),
            },
            Some(6) => display::print_sources(tags),
            Some(7) => {} // the loop reprints the resolved view
            _ => return Ok(Review::Quit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_songs_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.opus", "a.opus", "notes.txt", "c.OPUS"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        std::fs::create_dir(dir.path().join("sub.opus")).unwrap();

        let songs = collect_songs(dir.path()).unwrap();
        let names: Vec<String> = songs
            .iter()
            .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.opus", "b.opus", "c.OPUS"]);
    }

    #[test]
    fn run_rejects_a_missing_directory() {
        let args = Args {
            directory: PathBuf::from("/definitely/not/here"),
            album: None,
            all: false,
        };
        assert!(run(&args, &RetagConfig::default()).is_err());
    }
}
