//! The closed catalog of recognized fields and title markup.
//!
//! Every pattern the parsers use lives here, built once and shared. The
//! catalog is closed: a line that matches none of these patterns contributes
//! nothing, and that is never an error.

use once_cell::sync::Lazy;
use regex::Regex;

/// Separator between title and artists on a provider header line (U+00B7)
pub const INTERPUNCT: char = '\u{00b7}';

/// Sound-recording copyright sign opening a label credit line (U+2117)
pub const COPYRIGHT_SIGN: char = '\u{2117}';

/// Comment marker identifying files whose tags came from a download tool
pub const PROVENANCE_MARKER: &str = "youtube-dl";

/// Matches a `℗ YYYY` credit; used as a fallback release date
pub static COPYRIGHT_YEAR: Lazy<Regex> = Lazy::new(|| build(r"^℗ (\d{4})\s"));

fn build(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(err) => panic!("catalog pattern {pattern:?} failed to compile: {err}"),
    }
}

/// A line pattern with an optional veto.
///
/// The veto replaces negative look-ahead, which the regex engine does not
/// support: a line matching `reject` never matches the pattern at all.
#[derive(Debug)]
pub struct TagPattern {
    accept: Regex,
    reject: Option<Regex>,
}

impl TagPattern {
    fn new(accept: &str) -> Self {
        Self {
            accept: build(accept),
            reject: None,
        }
    }

    fn with_reject(accept: &str, reject: &str) -> Self {
        Self {
            accept: build(accept),
            reject: Some(build(reject)),
        }
    }

    /// Match `line` and return the last capture group, untrimmed.
    pub fn extract<'t>(&self, line: &'t str) -> Option<&'t str> {
        if let Some(reject) = &self.reject {
            if reject.is_match(line) {
                return None;
            }
        }
        let caps = self.accept.captures(line)?;
        caps.get(caps.len() - 1).map(|m| m.as_str())
    }
}

/// A recognized tag field: its id, display label and line patterns
#[derive(Debug)]
pub struct FieldReference {
    /// Field id as written to the file, e.g. `performer:drums`
    pub field: &'static str,
    /// Human-readable label for display
    pub label: &'static str,
    /// Patterns extracting this field from a description line, tried in order
    pub patterns: Vec<TagPattern>,
}

impl FieldReference {
    fn new(field: &'static str, label: &'static str, patterns: Vec<TagPattern>) -> Self {
        Self {
            field,
            label,
            patterns,
        }
    }
}

/// Fields extracted directly from description lines.
///
/// Order matters: it is both the extraction order within a line and the
/// display order of a tag listing.
pub static BASE_FIELDS: Lazy<Vec<FieldReference>> = Lazy::new(|| {
    vec![
        FieldReference::new(
            "title",
            "Title",
            vec![TagPattern::new("^.*“(.*)” by .* from ‘.*’")],
        ),
        FieldReference::new(
            "album",
            "Album",
            vec![TagPattern::new("^.*“.*” by .* from ‘(.*)’")],
        ),
        FieldReference::new("albumartist", "Album Artist", vec![]),
        FieldReference::new(
            "artist",
            "Artist(s)",
            vec![
                TagPattern::with_reject(
                    r"^.*[aA]rtist.*:\s*(.+)\s*",
                    r"https?|[mM]akeup|[fF]inishing",
                ),
                TagPattern::new(r"^.*\([fF]eat. (.+?)\)"),
                TagPattern::new("^.*“.*” by (.*) from ‘.*’"),
            ],
        ),
        FieldReference::new(
            "date",
            "Date",
            vec![TagPattern::new(r"^Released on:\s*(\d\d\d\d-\d\d-\d\d)")],
        ),
        FieldReference::new("genre", "Genre", vec![]),
        FieldReference::new("version", "Version", vec![]),
        FieldReference::new(
            "performer",
            "Performer",
            vec![TagPattern::new(r"^.*[pP]erformer.*:\s*(.+)\s*")],
        ),
        FieldReference::new(
            "organization",
            "Organization",
            vec![TagPattern::new(r"^Provided to YouTube by (.+)\s*")],
        ),
        FieldReference::new(
            "copyright",
            "Copyright",
            vec![TagPattern::new(r"^℗ (.+)\s*")],
        ),
        FieldReference::new(
            "composer",
            "Composer",
            vec![TagPattern::new(r"^.*?[cC]omposer.*:\s*(.+)\s*")],
        ),
        FieldReference::new(
            "conductor",
            "Conductor",
            vec![TagPattern::new(r"^.*[cC]onductor.*:\s*(.+)\s*")],
        ),
        FieldReference::new(
            "arranger",
            "Arranger",
            vec![
                TagPattern::new(r"^.*?[aA]rranged\s+[bB]y.*:\s*(.+)\s*"),
                TagPattern::new(r"^.*?[aA]rranger.*:\s*(.+)\s*"),
            ],
        ),
        FieldReference::new(
            "author",
            "Author",
            vec![TagPattern::new(r"^(.*, )?[aA]uthor.*:\s*(.+)\s*")],
        ),
        FieldReference::new(
            "producer",
            "Producer",
            vec![TagPattern::new(r"^(.*, )?[pP]roducer.*:\s*(.+)\s*")],
        ),
        FieldReference::new(
            "publisher",
            "Publisher",
            vec![TagPattern::new(r"^(.*, )?[pP]ublisher.*:\s*(.+)\s*")],
        ),
        FieldReference::new(
            "lyricist",
            "Lyricist",
            vec![
                TagPattern::new(r"^(.*, )?[wW]riter.*:\s*(.+)\s*"),
                TagPattern::new(r"^(.*, )?[wW]ritten\s+[bB]y.*:\s*(.+)\s*"),
                TagPattern::new(r"^.*[lL]yricist.*:\s*(.+)\s*"),
            ],
        ),
    ]
});

/// Performer credits, written as `performer:<role>` sub-fields.
///
/// Electric guitar deliberately lands under the plain guitar role.
pub static PERFORMER_FIELDS: Lazy<Vec<FieldReference>> = Lazy::new(|| {
    vec![
        FieldReference::new(
            "performer:vocals",
            "Vocals",
            vec![TagPattern::with_reject(
                r"^(.*, )?(Lead\s+)?[vV]ocal.*:\s*(.+)\s*",
                r"[vV]ocal.*[eE]ngineer",
            )],
        ),
        FieldReference::new(
            "performer:background vocals",
            "Background Vocals",
            vec![TagPattern::new(
                r"^(.*, )?[bB]ackground\s+[vV]ocal.*:\s*(.+)\s*",
            )],
        ),
        FieldReference::new(
            "performer:drums",
            "Drums",
            vec![TagPattern::new(r"^(.*, )?[dD]rum.*:\s*(.+)\s*")],
        ),
        FieldReference::new(
            "performer:percussion",
            "Percussion",
            vec![TagPattern::new(r"^.*[pP]ercussion.*:\s*(.+)\s*")],
        ),
        FieldReference::new(
            "performer:keyboard",
            "Keyboard",
            vec![TagPattern::new(r"^(.*, )?[kK]eyboard.*:\s*(.+)\s*")],
        ),
        FieldReference::new(
            "performer:piano",
            "Piano",
            vec![TagPattern::new(r"^(.*, )?[pP]iano.*:\s*(.+)\s*")],
        ),
        FieldReference::new(
            "performer:synthesizer",
            "Synthesizer",
            vec![TagPattern::new(r"^.*[sS]ynth.*:\s*(.+)\s*")],
        ),
        FieldReference::new(
            "performer:guitar",
            "Guitar",
            vec![
                TagPattern::new(r"^(.*, )?[gG]uitar.*:\s*(.+)\s*"),
                TagPattern::new(r"^.*[eE]lectric\s+[gG]uitar.*:\s*(.+)\s*"),
            ],
        ),
        FieldReference::new(
            "performer:bass guitar",
            "Bass Guitar",
            vec![TagPattern::new(r"^.*[bB]ass\s+[gG]uitar.*:\s*(.+)\s*")],
        ),
        FieldReference::new(
            "performer:acoustic guitar",
            "Acoustic Guitar",
            vec![TagPattern::new(r"^.*[aA]coustic\s+[gG]uitar.*:\s*(.+)\s*")],
        ),
        FieldReference::new(
            "performer:ukulele",
            "Ukulele",
            vec![TagPattern::new(r"^.*[uU]kulele.*:\s*(.+)\s*")],
        ),
        FieldReference::new(
            "performer:violin",
            "Violin",
            vec![TagPattern::new(r"^(.*, )?[vV]iolin.*:\s*(.+)\s*")],
        ),
        FieldReference::new(
            "performer:double bass",
            "Double Bass",
            vec![TagPattern::new(r"^.*[dD]ouble\s+[bB]ass.*:\s*(.+)\s*")],
        ),
        FieldReference::new(
            "performer:cello",
            "Cello",
            vec![TagPattern::new(r"^(.*, )?[cC]ello.*:\s*(.+)\s*")],
        ),
        FieldReference::new(
            "performer:programming",
            "Programming",
            vec![TagPattern::new(r"^(.*, )?[pP]rogramm(er|ing).*:\s*(.+)\s*")],
        ),
        FieldReference::new(
            "performer:saxophone",
            "Saxophone",
            vec![TagPattern::new(r"^(.*, )?[sS]axophone.*:\s*(.+)\s*")],
        ),
        FieldReference::new(
            "performer:flute",
            "Flute",
            vec![TagPattern::new(r"^(.*, )?[fF]lute.*:\s*(.+)\s*")],
        ),
    ]
});

/// Display label for a known field id
pub fn display_label(field: &str) -> Option<&'static str> {
    BASE_FIELDS
        .iter()
        .chain(PERFORMER_FIELDS.iter())
        .find(|reference| reference.field == field)
        .map(|reference| reference.label)
}

/// Whether `field` is part of the closed catalog
pub fn is_known_field(field: &str) -> bool {
    display_label(field).is_some()
}

/// Kind of markup a title can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Markup {
    /// `(feat. X)` / `[ft. X]` guest credit; payload becomes extra artists
    Featuring,
    /// `(2011 Remaster)` style suffix; payload becomes a version
    Remaster,
    /// `- 2011 Remaster` dash suffix
    RemasterDash,
    /// `(Live ...)` suffix
    Live,
    /// `(... Instrumental ...)`; contributes the literal genre "Instrumental"
    Instrumental,
    /// `[... Instrumental ...]`
    InstrumentalBracket,
    /// `(X Remix)` suffix
    Remix,
    /// `- X Remix` dash suffix
    RemixDash,
    /// `(Album Version)` suffix
    AlbumVersion,
}

/// One markup pattern: three groups (prefix, payload, suffix)
#[derive(Debug)]
pub struct MarkupPattern {
    /// What the payload means
    pub kind: Markup,
    /// The matching pattern; group 2 is the payload
    pub pattern: Regex,
}

impl MarkupPattern {
    fn new(kind: Markup, pattern: &str) -> Self {
        Self {
            kind,
            pattern: build(pattern),
        }
    }
}

/// Title markup patterns, tried in this fixed order
pub static MARKUP_PATTERNS: Lazy<Vec<MarkupPattern>> = Lazy::new(|| {
    vec![
        MarkupPattern::new(
            Markup::Featuring,
            r"(?i)^(.*?)\s*[\(\[ ](?:feat|ft|featuring)\.?\s+([^\]\)\(\[]+)[\)\]]*\s*(.*)",
        ),
        MarkupPattern::new(
            Markup::Remaster,
            r"(?i)^(.*?)\s*[\(\[](\d{0,4}\s*remaster.*)[\)\]]\s*(.*)",
        ),
        MarkupPattern::new(
            Markup::RemasterDash,
            r"(?i)^(.*?)\s*-\s*(\d{0,4}.*remaster.*)(.*)",
        ),
        MarkupPattern::new(Markup::Live, r"(?i)^(.*?)\s*[\(\[](live.*?)[\)\]]\s*(.*)"),
        MarkupPattern::new(
            Markup::Instrumental,
            r"(?i)^(.*?)\s*\((.*instrumental.*)\)\s*(.*)",
        ),
        MarkupPattern::new(
            Markup::InstrumentalBracket,
            r"(?i)^(.*?)\s*\[(.*instrumental.*)\]\s*(.*)",
        ),
        MarkupPattern::new(Markup::Remix, r"(?i)^(.+)\s*\((.*remix.*?)\)\s*(.*)"),
        MarkupPattern::new(Markup::RemixDash, r"(?i)^(.+)\s*-\s*(.*remix.*)\s*(.*)"),
        MarkupPattern::new(
            Markup::AlbumVersion,
            r"(?i)^(.*?)\s*[\(\[](album version.*?)[\)\]]\s*(.*)",
        ),
    ]
});
