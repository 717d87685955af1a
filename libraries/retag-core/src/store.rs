//! Tag storage boundary.

use crate::error::Result;
use crate::tags::TagSet;
use std::path::Path;

/// Reading and writing the tags of a song file.
///
/// Implementers map between a container's native tag representation and
/// [`TagSet`]. `commit` must translate a removed field into actual deletion
/// and must never write an empty value list.
pub trait TagStore {
    /// Read the tags of the file at `path`
    fn snapshot(&self, path: &Path) -> Result<TagSet>;

    /// Write `tags` back to the file at `path` in one shot
    fn commit(&self, path: &Path, tags: &TagSet) -> Result<()>;
}
