//! Line-oriented parser for the free-text description a download tool
//! embeds in a song file.
//!
//! The description is scanned line by line against the closed pattern
//! catalog. Auto-generated provider descriptions open with a
//! `Title · Artist · Artist` header, followed by the album name on the
//! next non-blank line; credit lines (`Producer: X`) can appear anywhere.

use crate::catalog::{self, FieldReference, INTERPUNCT};
use crate::tags::TagSet;
use crate::utils::{split_tag, unique_in_order};
use tracing::debug;

/// Parses one description into a [`TagSet`].
pub struct DescriptionParser {
    tags: TagSet,
    manual_album: bool,
}

impl DescriptionParser {
    /// Create a parser.
    ///
    /// With `manual_album` set, anything that would parse into the album
    /// field is stored as `discsubtitle` instead, leaving the album to the
    /// caller's override.
    pub fn new(manual_album: bool) -> Self {
        Self {
            tags: TagSet::new(),
            manual_album,
        }
    }

    /// The tags extracted so far
    pub fn into_tags(self) -> TagSet {
        self.tags
    }

    /// Parse `description`, accumulating into the held tag set.
    ///
    /// Finding nothing is not an error; the result is simply empty.
    pub fn parse(&mut self, description: &str) {
        let lines: Vec<&str> = description.lines().collect();

        // Large start value so that only the line directly after the header
        // can become the album.
        let mut lines_since_header = 1000_usize;
        for line in &lines {
            if line.trim().is_empty() {
                continue;
            }
            lines_since_header = lines_since_header.saturating_add(1);

            if line.contains(INTERPUNCT) {
                lines_since_header = 0;
                self.parse_header_line(line);
            }
            if lines_since_header == 1 {
                self.tags
                    .set(self.album_field(), vec![line.trim().to_string()]);
            }

            for reference in catalog::BASE_FIELDS.iter() {
                self.apply_reference(reference, line);
            }
            for reference in catalog::PERFORMER_FIELDS.iter() {
                self.apply_reference(reference, line);
            }

            // A later title match must not accumulate; the first one wins.
            if let Some(first) = self.tags.values("title").first().cloned() {
                self.tags.set("title", vec![first]);
            }
        }

        self.finish_artists();
        self.tags.prune_empty();
        self.copyright_year_fallback(&lines);
    }

    fn album_field(&self) -> &'static str {
        if self.manual_album {
            "discsubtitle"
        } else {
            "album"
        }
    }

    /// Handle a `Title · Artist · Artist` header line.
    fn parse_header_line(&mut self, line: &str) {
        let separator = format!(" {INTERPUNCT} ");
        let mut segments = line.split(separator.as_str());
        let title = segments.next().unwrap_or_default().trim().to_string();
        let mut artists: Vec<String> = segments.map(str::to_string).collect();

        // A lone artist segment may itself be a comma-joined list.
        if artists.len() == 1 && artists[0].contains(", ") {
            artists = split_tag(&artists[0]);
        }
        debug!("header line: title {title:?}, artists {artists:?}");

        if !artists.is_empty() {
            self.tags.set("artist", unique_in_order(artists));
        }
        self.tags.set("title", vec![title]);
    }

    fn apply_reference(&mut self, reference: &FieldReference, line: &str) {
        let field = if reference.field == "album" {
            self.album_field()
        } else {
            reference.field
        };
        for pattern in &reference.patterns {
            if let Some(value) = pattern.extract(line) {
                self.tags.push(field, value.trim().to_string());
            }
        }
    }

    /// Seed the album artist from the first artist entry, then split the
    /// artist values into individual names.
    fn finish_artists(&mut self) {
        let artists = self.tags.values("artist").to_vec();
        let Some(first) = artists.first() else {
            return;
        };
        self.tags.set("albumartist", vec![first.clone()]);

        let split: Vec<String> = if artists.len() > 1 {
            artists
                .iter()
                .flat_map(|artist| split_tag(artist))
                .collect()
        } else {
            split_tag(first)
        };
        self.tags.set("artist", unique_in_order(split));
    }

    /// Use a `℗ YYYY` credit as the release date when no date was found.
    fn copyright_year_fallback(&mut self, lines: &[&str]) {
        let mut years: Vec<String> = Vec::new();
        for line in lines {
            if let Some(caps) = catalog::COPYRIGHT_YEAR.captures(line) {
                if let Some(year) = caps.get(1) {
                    years.push(year.as_str().trim().to_string());
                }
            }
        }
        let years = unique_in_order(years);
        if !years.is_empty() && self.tags.values("date").is_empty() {
            self.tags.set("date", years);
        }
    }
}
