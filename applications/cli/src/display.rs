//! Colored terminal rendering of tag data.
//!
//! Each source has a fixed color so the listings stay readable: existing
//! metadata is cyan, the description parse magenta, the re-parse of the
//! original tags yellow and the re-parse of the description green. Removed
//! fields show up red.

use retag_core::{catalog, SongTags, TagSet, TagValue};

pub const RESET: &str = "\x1b[0m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const MAGENTA: &str = "\x1b[35m";
pub const CYAN: &str = "\x1b[36m";
pub const GREY: &str = "\x1b[90m";

const ORIGINAL: &str = CYAN;
const YOUTUBE: &str = MAGENTA;
const FROM_TAGS: &str = YELLOW;
const FROM_DESC: &str = GREEN;

const SEPARATOR: &str = " | ";

pub fn paint(text: &str, color: &str) -> String {
    format!("{color}{text}{RESET}")
}

/// Display label for a field, falling back to the raw field id
fn label(field: &str) -> String {
    match catalog::display_label(field) {
        Some(label) => label.to_string(),
        None => field.to_string(),
    }
}

/// The fields worth showing, in catalog order followed by any extras the
/// song carries. Free-text fields are left out, they have their own view.
fn display_fields(tags: &SongTags) -> Vec<String> {
    let mut fields: Vec<String> = Vec::new();
    let mut add = |field: &str| {
        if !fields.iter().any(|known| known == field) {
            fields.push(field.to_string());
        }
    };
    for reference in catalog::BASE_FIELDS.iter() {
        add(reference.field);
    }
    for reference in catalog::PERFORMER_FIELDS.iter() {
        add(reference.field);
    }
    for source in [&tags.resolved, &tags.youtube, &tags.from_tags, &tags.from_desc] {
        for field in source.fields() {
            if field != "description" && field != "synopsis" {
                add(field);
            }
        }
    }
    fields
}

fn joined(set: &TagSet, field: &str, color: &str) -> Option<String> {
    match set.get(field)? {
        TagValue::Removed => Some(paint("[Removed]", RED)),
        TagValue::Values(values) => Some(paint(&values.join(SEPARATOR), color)),
    }
}

/// One line per field, every source side by side.
pub fn print_sources(tags: &SongTags) {
    println!(
        "\nTag data ({}, {}, {}, {}):",
        paint("existing", ORIGINAL),
        paint("description", YOUTUBE),
        paint("original tags", FROM_TAGS),
        paint("description tags", FROM_DESC),
    );
    for field in display_fields(tags) {
        let columns: Vec<String> = [
            joined(&tags.original, &field, ORIGINAL),
            joined(&tags.youtube, &field, YOUTUBE),
            joined(&tags.from_tags, &field, FROM_TAGS),
            joined(&tags.from_desc, &field, FROM_DESC),
        ]
        .into_iter()
        .flatten()
        .collect();
        if columns.is_empty() {
            continue;
        }
        println!("{}: {}", label(&field), columns.join(SEPARATOR));
    }
    println!();
}

/// The resolved view: green where the final value differs from what the
/// file had, cyan where it is unchanged, red for deletions.
pub fn print_resolved(tags: &SongTags) {
    for field in display_fields(tags) {
        let Some(value) = tags.resolved.get(&field) else {
            continue;
        };
        let line = match value {
            TagValue::Removed => paint("[Removed]", RED),
            TagValue::Values(values) => {
                let color = if values.as_slice() == tags.original.values(&field) {
                    ORIGINAL
                } else {
                    GREEN
                };
                paint(&values.join(SEPARATOR), color)
            }
        };
        println!("{}: {line}", label(&field));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retag_core::TagSet;

    #[test]
    fn paint_wraps_text_in_ansi_codes() {
        assert_eq!(paint("hi", RED), "\x1b[31mhi\x1b[0m");
    }

    #[test]
    fn labels_fall_back_to_the_field_id() {
        assert_eq!(label("title"), "Title");
        assert_eq!(label("performer:drums"), "Drums");
        assert_eq!(label("discsubtitle"), "discsubtitle");
    }

    #[test]
    fn display_fields_cover_catalog_and_extras_without_free_text() {
        let mut tags = SongTags::new(TagSet::from([
            ("discsubtitle", vec!["Live Disc"]),
            ("description", vec!["long text"]),
        ]));
        tags.resolved = tags.original.clone();
        let fields = display_fields(&tags);
        assert!(fields.iter().any(|field| field == "title"));
        assert!(fields.iter().any(|field| field == "discsubtitle"));
        assert!(!fields.iter().any(|field| field == "description"));
    }
}
