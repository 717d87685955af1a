//! Small string helpers shared by the parsers and the resolution engine.

use crate::catalog::MARKUP_PATTERNS;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static TAG_DELIMITERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r", | and | & |; ").unwrap_or_else(|err| panic!("delimiter pattern: {err}"))
});

static PLAYLIST_FILE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.+) - (.+) - (.+) - (.+)\.opus$")
        .unwrap_or_else(|err| panic!("file name pattern: {err}"))
});

static SINGLE_FILE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.+) - (.+)\.opus$").unwrap_or_else(|err| panic!("file name pattern: {err}"))
});

/// Remove duplicate values, keeping the first occurrence of each
pub fn unique_in_order(values: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

/// Split a combined tag value on the common name delimiters
/// (`, `, ` and `, ` & `, `; `). Each piece is stripped of surrounding
/// whitespace.
pub fn split_tag(value: &str) -> Vec<String> {
    TAG_DELIMITERS
        .split(value)
        .map(|piece| piece.trim().to_string())
        .collect()
}

/// Whether two value lists are equal ignoring order and surrounding whitespace
pub fn is_equal_when_stripped(left: &[String], right: &[String]) -> bool {
    let mut left: Vec<&str> = left.iter().map(|value| value.trim()).collect();
    let mut right: Vec<&str> = right.iter().map(|value| value.trim()).collect();
    left.sort_unstable();
    right.sort_unstable();
    left == right
}

/// Delete every known markup block from a title.
///
/// Each markup pattern is applied once, replacing the match with
/// `prefix suffix`; the result is trimmed.
pub fn prune_title(title: &str) -> String {
    let mut pruned = title.to_string();
    for markup in MARKUP_PATTERNS.iter() {
        pruned = markup.pattern.replace(&pruned, "${1} ${3}").into_owned();
    }
    pruned.trim().to_string()
}

/// Human-readable song name for a file, derived from its name.
///
/// Understands the `<artist> - <title>.opus` shape and the four-part
/// playlist shape `<uploader> - <playlist> - <index> - <title>.opus`;
/// anything else is shown as the bare file name.
pub fn song_display_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    if let Some(caps) = PLAYLIST_FILE_NAME.captures(&file_name) {
        return format!("{} - {}", &caps[1], &caps[4]);
    }
    if let Some(caps) = SINGLE_FILE_NAME.captures(&file_name) {
        return format!("{} - {}", &caps[1], &caps[2]);
    }
    file_name
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    #[test]
    fn unique_in_order_keeps_first_occurrence() {
        let values = strings(&["a", "b", "a", "c", "b"]);
        assert_eq!(unique_in_order(values), strings(&["a", "b", "c"]));
    }

    #[test]
    fn split_tag_handles_all_delimiters() {
        assert_eq!(
            split_tag("A, B and C & D; E"),
            strings(&["A", "B", "C", "D", "E"])
        );
        assert_eq!(split_tag("Single Artist"), strings(&["Single Artist"]));
    }

    #[test]
    fn split_tag_strips_each_piece() {
        assert_eq!(
            split_tag("Artist One , Artist Two"),
            strings(&["Artist One", "Artist Two"])
        );
        assert_eq!(split_tag("  Solo  "), strings(&["Solo"]));
    }

    #[test]
    fn split_tag_keeps_embedded_and_without_spaces() {
        assert_eq!(split_tag("Sand and Water"), strings(&["Sand", "Water"]));
        assert_eq!(split_tag("Sandland"), strings(&["Sandland"]));
    }

    #[test]
    fn is_equal_when_stripped_ignores_order_and_whitespace() {
        assert!(is_equal_when_stripped(
            &strings(&[" b", "a "]),
            &strings(&["a", "b"])
        ));
        assert!(!is_equal_when_stripped(
            &strings(&["a"]),
            &strings(&["a", "b"])
        ));
    }

    #[test]
    fn prune_title_removes_all_markup() {
        assert_eq!(
            prune_title("Song name (Remix) [feat. Second Artist]"),
            "Song name"
        );
        assert_eq!(prune_title("Song name - 1999 - Remaster"), "Song name");
    }

    #[test]
    fn prune_title_without_markup_is_identity() {
        assert_eq!(
            prune_title("Song name (With another paretheses)"),
            "Song name (With another paretheses)"
        );
    }

    #[test]
    fn song_display_name_understands_both_shapes() {
        assert_eq!(
            song_display_name(&PathBuf::from("/music/Artist - Title.opus")),
            "Artist - Title"
        );
        assert_eq!(
            song_display_name(&PathBuf::from(
                "/music/Uploader - Playlist - 003 - Title.opus"
            )),
            "Uploader - Title"
        );
        assert_eq!(song_display_name(&PathBuf::from("/music/odd.opus")), "odd.opus");
    }
}
