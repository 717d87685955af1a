//! `TagStore` implementation for Ogg Opus files.

use crate::error::{Result, TagfileError};
use lofty::ogg::{OpusFile, VorbisComments};
use lofty::{AudioFile, ParseOptions, TagExt};
use retag_core::{TagSet, TagStore, TagValue};
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Tag storage for `.opus` files.
///
/// Only the Vorbis comment block is touched; the vendor string, pictures and
/// the audio stream are preserved as-is.
#[derive(Debug, Default)]
pub struct OpusTagStore;

impl OpusTagStore {
    /// Create a new store
    pub fn new() -> Self {
        Self
    }

    fn read_comments(path: &Path) -> Result<OpusFile> {
        if !path.exists() {
            return Err(TagfileError::FileNotFound(path.display().to_string()));
        }
        let mut file = File::open(path)?;
        Ok(OpusFile::read_from(&mut file, ParseOptions::new())?)
    }
}

impl TagStore for OpusTagStore {
    fn snapshot(&self, path: &Path) -> retag_core::Result<TagSet> {
        let opus = Self::read_comments(path)?;
        let mut tags = TagSet::new();
        for (key, value) in opus.vorbis_comments().items() {
            tags.push(&key.to_lowercase(), value.to_string());
        }
        debug!("read {} tag fields from {}", tags.len(), path.display());
        Ok(tags)
    }

    fn commit(&self, path: &Path, tags: &TagSet) -> retag_core::Result<()> {
        let mut opus = Self::read_comments(path)?;
        apply(opus.vorbis_comments_mut(), tags);
        opus.vorbis_comments()
            .save_to_path(path)
            .map_err(TagfileError::from)?;
        debug!("saved tags to {}", path.display());
        Ok(())
    }
}

/// Replace the comment block's fields with `tags`.
///
/// Keys are matched case-insensitively; a removed field deletes every
/// spelling of its key and untouched keys stay as they are.
fn apply(comments: &mut VorbisComments, tags: &TagSet) {
    for (field, value) in tags.iter() {
        let existing_keys: Vec<String> = comments
            .items()
            .map(|(key, _)| key.to_string())
            .filter(|key| key.eq_ignore_ascii_case(field))
            .collect();
        for key in existing_keys {
            let _removed: Vec<String> = comments.remove(&key).collect();
        }
        if let TagValue::Values(values) = value {
            for item in values {
                comments.push(field.to_string(), item.clone());
            }
        }
    }
}
