//! Re-derivation of metadata buried inside existing tag values.
//!
//! Titles often carry markup like `(feat. X)`, `(Live)` or `(2011 Remaster)`
//! that belongs in the artist, genre or version fields, and artist or genre
//! fields sometimes hold one comma-joined value instead of a list. This pass
//! turns such markup into proper fields; it never touches its input.

use crate::catalog::{Markup, MARKUP_PATTERNS};
use crate::tags::TagSet;
use crate::utils::{prune_title, split_tag, unique_in_order};
use std::collections::BTreeSet;
use tracing::debug;

/// Derive a new [`TagSet`] from markup found in `source`.
///
/// Only fields that gained something relative to `source` appear in the
/// result; an empty result means there was nothing to derive.
pub fn reparse(source: &TagSet) -> TagSet {
    let mut derived = TagSet::new();
    derive_from_titles(source, &mut derived);
    split_delimited(source, &mut derived);
    derived
}

fn derive_from_titles(source: &TagSet, derived: &mut TagSet) {
    let titles = source.values("title");

    let mut old_artist = source.values("artist").to_vec();
    if old_artist.len() == 1 {
        old_artist = split_tag(&old_artist[0]);
    }
    let old_version = source.values("version").to_vec();
    let old_genre = source.values("genre").to_vec();

    let mut new_artist: Vec<String> = Vec::new();
    let mut new_version: Vec<String> = Vec::new();
    let mut new_genre: Vec<String> = Vec::new();

    for title in titles {
        for markup in MARKUP_PATTERNS.iter() {
            let Some(caps) = markup.pattern.captures(title) else {
                continue;
            };
            let payload = caps.get(2).map_or("", |m| m.as_str()).trim();
            debug!("title markup {:?}: {payload:?}", markup.kind);
            match markup.kind {
                Markup::Featuring => new_artist.extend(split_tag(payload)),
                Markup::Instrumental | Markup::InstrumentalBracket => {
                    new_genre.push("Instrumental".to_string());
                }
                _ => new_version.push(payload.to_string()),
            }
        }
    }

    emit_merged(derived, "version", old_version, new_version);
    emit_merged(derived, "artist", old_artist, new_artist);
    emit_merged(derived, "genre", old_genre, new_genre);

    if let Some(first_title) = titles.first() {
        let pruned = prune_title(first_title);
        if pruned != *first_title {
            derived.set("title", vec![pruned]);
        }
    }
}

/// Emit `old` extended by `new` when the derivation found anything new.
fn emit_merged(derived: &mut TagSet, field: &str, old: Vec<String>, new: Vec<String>) {
    if new.is_empty() {
        return;
    }
    let old_set: BTreeSet<&str> = old.iter().map(String::as_str).collect();
    let new_set: BTreeSet<&str> = new.iter().map(String::as_str).collect();
    if old_set == new_set {
        return;
    }
    let mut merged = old;
    merged.extend(new);
    derived.set(field, unique_in_order(merged));
}

/// Split lone comma-joined `genre`/`artist` values into lists.
///
/// Skipped for a field the title markup already derived, since that
/// derivation starts from the split input anyway.
fn split_delimited(source: &TagSet, derived: &mut TagSet) {
    for field in ["genre", "artist"] {
        if derived.contains(field) || !source.contains(field) {
            continue;
        }
        let values = source.values(field);
        if values.len() != 1 {
            continue;
        }
        let split = split_tag(&values[0]);
        if split.len() > 1 {
            derived.set(field, split);
        }
    }
}
