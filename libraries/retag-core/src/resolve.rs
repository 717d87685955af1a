//! Reconciliation of the four metadata sources into one final tag set.
//!
//! Sources, in candidate order: the description parse ("Youtube"), the
//! re-parse of the original tags, the original tags themselves, and the
//! re-parse of the description parse. Agreement is accepted silently;
//! genuine conflicts go to the user through the [`Interaction`] trait.

use crate::catalog::{self, PROVENANCE_MARKER};
use crate::error::Result;
use crate::interact::Interaction;
use crate::tags::{TagSet, TagValue};
use crate::utils::{is_equal_when_stripped, split_tag, unique_in_order};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

/// An eight-digit run at the start of a date is an upload date, not a
/// release date.
static UPLOAD_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{8}").unwrap_or_else(|err| panic!("upload date pattern: {err}"))
});

/// How a resolution run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every field was resolved
    Completed,
    /// The user backed out; the remaining work must be dropped
    Aborted,
}

/// All metadata sources for one song, plus the evolving result.
///
/// Built per song and discarded afterwards; nothing here is shared between
/// songs.
#[derive(Debug, Clone, Default)]
pub struct SongTags {
    /// Tags as read from the file
    pub original: TagSet,
    /// Tags parsed from the embedded description
    pub youtube: TagSet,
    /// Re-parse of `youtube`
    pub from_desc: TagSet,
    /// Re-parse of `original`
    pub from_tags: TagSet,
    /// The evolving final tag set, seeded from `original`
    pub resolved: TagSet,
    /// Raw description text, for display on request
    pub description: Option<String>,
}

enum Candidate<'a> {
    Source(&'a [String]),
    Other,
    Quit,
}

enum OtherOutcome {
    Done,
    Back,
}

impl SongTags {
    /// Start from the tags read out of a file
    pub fn new(original: TagSet) -> Self {
        Self {
            resolved: original.clone(),
            original,
            ..Self::default()
        }
    }

    /// The description text carried by the original tags, if any.
    ///
    /// The `synopsis` field is preferred over `description`; multiple values
    /// are joined with newlines.
    pub fn description_from_original(&self) -> Option<String> {
        for field in ["synopsis", "description"] {
            let values = self.original.values(field);
            if !values.is_empty() {
                return Some(values.join("\n"));
            }
        }
        None
    }

    /// Drop a date that is really an upload date (an undelimited 8-digit
    /// value a download tool writes).
    pub fn discard_upload_date(&mut self) {
        let is_upload = self
            .original
            .values("date")
            .first()
            .is_some_and(|date| UPLOAD_DATE.is_match(date));
        if is_upload {
            warn!("discarding upload date {:?}", self.original.values("date"));
            self.original.remove("date");
            self.resolved.remove("date");
        }
    }

    /// Force the album to `album`, demoting a different existing album to
    /// the disc subtitle.
    pub fn set_manual_album(&mut self, album: &str) {
        if let Some(TagValue::Values(values)) = self.original.remove("album") {
            self.resolved.remove("album");
            if values != [album] {
                self.original.set("discsubtitle", values.clone());
                self.resolved.set("discsubtitle", values);
            }
        }
        self.resolved.set("album", vec![album.to_string()]);
    }

    /// Record in the comment field that the tags came from a download tool.
    /// The marker is appended, never replacing existing comments.
    pub fn mark_provenance(&mut self) {
        let comments = self.original.values("comment");
        if comments.iter().any(|comment| comment == PROVENANCE_MARKER) {
            return;
        }
        let mut comments = comments.to_vec();
        comments.push(PROVENANCE_MARKER.to_string());
        self.resolved.set("comment", comments);
    }

    /// Apply the configured deny rules: fields on the deny list, and fields
    /// whose every value matches some deny pattern, are scheduled for
    /// deletion. Fields the file never had are left alone.
    pub fn prune_resolved(&mut self, deny_fields: &[String], deny_patterns: &[Regex]) {
        for field in deny_fields {
            if self.original.contains(field) {
                self.resolved.mark_removed(field);
            }
        }
        if deny_patterns.is_empty() {
            return;
        }
        let fields: Vec<String> = self.original.fields().map(str::to_string).collect();
        for field in fields {
            let values = self.original.values(&field);
            let all_denied = !values.is_empty()
                && values
                    .iter()
                    .all(|value| deny_patterns.iter().any(|pattern| pattern.is_match(value)));
            if all_denied {
                self.resolved.mark_removed(&field);
            }
        }
    }

    /// Fields any parsed source knows about, deduplicated in source order.
    /// The original tags never introduce a field on their own.
    fn union_fields(&self) -> Vec<String> {
        let mut fields: Vec<String> = Vec::new();
        let all = self
            .youtube
            .fields()
            .chain(self.from_desc.fields())
            .chain(self.from_tags.fields());
        for field in all {
            if !fields.iter().any(|known| known == field) {
                fields.push(field.to_string());
            }
        }
        fields
    }

    /// Every value any source holds for `field`, deduplicated, original
    /// first unless `only_new`.
    pub fn field_candidates(&self, field: &str, only_new: bool) -> Vec<String> {
        let mut values: Vec<String> = Vec::new();
        if !only_new {
            values.extend_from_slice(self.original.values(field));
        }
        values.extend_from_slice(self.youtube.values(field));
        values.extend_from_slice(self.from_desc.values(field));
        values.extend_from_slice(self.from_tags.values(field));
        unique_in_order(values)
    }

    /// Whether any source offers a value the original tags do not already
    /// have, or the preliminary steps already changed something.
    pub fn check_any_new_data_exists(&self) -> bool {
        for field in self.union_fields() {
            let known = self.original.values(&field);
            let novel = self
                .field_candidates(&field, true)
                .iter()
                .any(|value| !known.contains(value));
            if novel {
                return true;
            }
        }
        for (field, value) in self.resolved.iter() {
            let known = self.original.values(field);
            match value {
                TagValue::Removed => {
                    if self.original.contains(field) {
                        return true;
                    }
                }
                TagValue::Values(values) => {
                    if values.iter().any(|value| !known.contains(value)) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Run the per-field resolution loop, then the album-artist pass.
    pub fn resolve(&mut self, ui: &mut dyn Interaction) -> Result<Outcome> {
        for field in self.union_fields() {
            // Album artist is handled by its own pass at the end.
            if field == "albumartist" {
                continue;
            }
            if self.resolve_field(&field, ui)? == Outcome::Aborted {
                return Ok(Outcome::Aborted);
            }
        }
        self.resolve_albumartist(ui)
    }

    fn resolve_field(&mut self, field: &str, ui: &mut dyn Interaction) -> Result<Outcome> {
        let old = self.original.values(field).to_vec();
        let youtube = self.youtube.values(field).to_vec();
        let from_tags = self.from_tags.values(field).to_vec();
        let from_desc = self.from_desc.values(field).to_vec();

        if old.is_empty() {
            let first_available = [&youtube, &from_tags, &from_desc]
                .into_iter()
                .find(|values| !values.is_empty());
            if let Some(values) = first_available {
                info!("{field}: no value existed, using parsed data {values:?}");
                self.resolved.set(field, values.clone());
            }
            return Ok(Outcome::Completed);
        }

        let sources = [
            (&youtube, "description"),
            (&from_desc, "description tags"),
            (&from_tags, "original tags"),
        ];
        for (source, name) in sources {
            if let Some(values) = agreed_value(&old, source) {
                info!("{field}: existing metadata agrees with the {name}");
                self.resolved.set(field, values);
                return Ok(Outcome::Completed);
            }
        }

        self.resolve_conflict(field, &old, &youtube, &from_tags, &from_desc, ui)
    }

    /// Ask the user to pick between genuinely conflicting candidates.
    fn resolve_conflict(
        &mut self,
        field: &str,
        old: &[String],
        youtube: &[String],
        from_tags: &[String],
        from_desc: &[String],
        ui: &mut dyn Interaction,
    ) -> Result<Outcome> {
        ui.show_tags(self);
        loop {
            let mut items: Vec<String> = Vec::new();
            let mut candidates: Vec<Candidate> = Vec::new();
            let mut offer = |label: &str, values: &[String]| {
                if !values.is_empty() {
                    items.push(format!("{label}: {}", values.join(" | ")));
                }
            };
            offer("Parsed from the description", youtube);
            if !youtube.is_empty() {
                candidates.push(Candidate::Source(youtube));
            }
            offer("Parsed from the original tags", from_tags);
            if !from_tags.is_empty() {
                candidates.push(Candidate::Source(from_tags));
            }
            offer("Existing metadata", old);
            if !old.is_empty() {
                candidates.push(Candidate::Source(old));
            }
            offer("Parsed from the description tags", from_desc);
            if !from_desc.is_empty() {
                candidates.push(Candidate::Source(from_desc));
            }
            if items.is_empty() {
                return Ok(Outcome::Completed);
            }
            items.push("Other action".to_string());
            candidates.push(Candidate::Other);
            items.push("Quit".to_string());
            candidates.push(Candidate::Quit);

            let title = format!("Mismatching data for field '{field}'");
            let Some(choice) = ui.choose_one(&title, &items)? else {
                return Ok(Outcome::Aborted);
            };
            match candidates.get(choice) {
                Some(Candidate::Source(values)) => {
                    self.resolved.set(field, values.to_vec());
                    return Ok(Outcome::Completed);
                }
                Some(Candidate::Quit) => return Ok(Outcome::Aborted),
                Some(Candidate::Other) => match self.other_action(field, ui)? {
                    OtherOutcome::Done => return Ok(Outcome::Completed),
                    OtherOutcome::Back => {}
                },
                None => {}
            }
        }
    }

    fn other_action(&mut self, field: &str, ui: &mut dyn Interaction) -> Result<OtherOutcome> {
        let items: Vec<String> = [
            "Select items from a list",
            "Manually fill in the tag",
            "Show the raw description",
            "Remove the field",
            "Go back",
        ]
        .map(String::from)
        .to_vec();
        match ui.choose_one("Other action", &items)? {
            Some(0) => {
                let available = self.field_candidates(field, false);
                let Some(indices) =
                    ui.choose_many("Select the items you want in this tag", &available)?
                else {
                    ui.show_text("Invalid choice, try again");
                    return Ok(OtherOutcome::Back);
                };
                let selected: Vec<String> = indices
                    .iter()
                    .filter_map(|&index| available.get(index).cloned())
                    .collect();
                // Selecting nothing means the field should go away; an empty
                // value list must never reach the file.
                if selected.is_empty() {
                    self.resolved.mark_removed(field);
                } else {
                    self.resolved.set(field, selected);
                }
                Ok(OtherOutcome::Done)
            }
            Some(1) => {
                let value = ui.prompt_text("New value")?;
                self.resolved.set(field, vec![value]);
                Ok(OtherOutcome::Done)
            }
            Some(2) => {
                match &self.description {
                    Some(text) => ui.show_text(text),
                    None => ui.show_text("There is no description for this song"),
                }
                Ok(OtherOutcome::Back)
            }
            Some(3) => {
                self.resolved.mark_removed(field);
                Ok(OtherOutcome::Done)
            }
            _ => Ok(OtherOutcome::Back),
        }
    }

    /// Decide the album artist once every other field is settled.
    ///
    /// With several artist candidates the user picks one (or keeps things as
    /// they are); with no existing album artist the resolved artist, then
    /// the original artist, is used as the default.
    fn resolve_albumartist(&mut self, ui: &mut dyn Interaction) -> Result<Outcome> {
        let artists = self.field_candidates("artist", false);
        if artists.len() > 1 {
            ui.show_tags(self);
            let mut items = artists.clone();
            items.push("No change".to_string());
            if let Some(choice) = ui.choose_one("Select the album artist", &items)? {
                if let Some(artist) = artists.get(choice) {
                    self.resolved.set("albumartist", vec![artist.clone()]);
                }
            }
        } else if self.original.values("albumartist").is_empty() {
            let resolved_artist = self.resolved.values("artist");
            let fallback = if resolved_artist.is_empty() {
                self.original.values("artist")
            } else {
                resolved_artist
            };
            if !fallback.is_empty() {
                let fallback = fallback.to_vec();
                info!("albumartist: defaulting to the artist {fallback:?}");
                self.resolved.set("albumartist", fallback);
            }
        }
        Ok(Outcome::Completed)
    }

    /// Let the user set arbitrary fields by hand; an empty key or value ends
    /// the loop.
    pub fn modify_resolved(&mut self, ui: &mut dyn Interaction) -> Result<()> {
        loop {
            let field = ui.prompt_text("Field to set (empty to finish)")?;
            let field = field.trim().to_lowercase();
            if field.is_empty() {
                return Ok(());
            }
            let value = ui.prompt_text("Value (empty to cancel)")?;
            if value.trim().is_empty() {
                return Ok(());
            }
            self.resolved.set(&field, vec![value]);
        }
    }

    /// Let the user delete individual values from a resolved field.
    pub fn delete_tag_items(&mut self, ui: &mut dyn Interaction) -> Result<()> {
        let fields: Vec<String> = self
            .resolved
            .iter()
            .filter(|(field, value)| catalog::is_known_field(field) && !value.is_removed())
            .map(|(field, _)| field.to_string())
            .collect();
        if fields.is_empty() {
            ui.show_text("There is nothing to delete");
            return Ok(());
        }
        let mut items = fields.clone();
        items.push("Quit".to_string());
        let Some(choice) = ui.choose_one("Delete items from which field?", &items)? else {
            return Ok(());
        };
        let Some(field) = fields.get(choice) else {
            return Ok(());
        };
        let field = field.clone();

        let values = self.resolved.values(&field).to_vec();
        let Some(indices) =
            ui.choose_many(&format!("Items to remove from '{field}'"), &values)?
        else {
            return Ok(());
        };
        if indices.is_empty() {
            return Ok(());
        }
        let kept: Vec<String> = values
            .into_iter()
            .enumerate()
            .filter(|(index, _)| !indices.contains(index))
            .map(|(_, value)| value)
            .collect();
        if kept.is_empty() {
            self.resolved.remove(&field);
        } else {
            self.resolved.set(&field, kept);
        }
        Ok(())
    }
}

/// A source value the original agrees with, normalized.
///
/// Agreement is whitespace-insensitive; a single unsplit original value also
/// agrees with a source holding its delimiter-split form, and resolves to
/// the split form.
fn agreed_value(old: &[String], source: &[String]) -> Option<Vec<String>> {
    if old.is_empty() || source.is_empty() {
        return None;
    }
    if is_equal_when_stripped(old, source) {
        return Some(old.iter().map(|value| value.trim().to_string()).collect());
    }
    if old.len() == 1 {
        let split = split_tag(&old[0]);
        if split.len() > 1 && is_equal_when_stripped(&split, source) {
            return Some(source.to_vec());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agreed_value_is_whitespace_insensitive() {
        let old = vec![" Artist ".to_string()];
        let source = vec!["Artist".to_string()];
        assert_eq!(agreed_value(&old, &source), Some(source));
    }

    #[test]
    fn agreed_value_accepts_the_split_form() {
        let old = vec!["First, Second".to_string()];
        let source = vec!["First".to_string(), "Second".to_string()];
        assert_eq!(agreed_value(&old, &source), Some(source));
    }

    #[test]
    fn agreed_value_rejects_real_differences() {
        let old = vec!["One".to_string()];
        let source = vec!["Two".to_string()];
        assert_eq!(agreed_value(&old, &source), None);
    }

    #[test]
    fn upload_date_is_discarded() {
        let mut tags = SongTags::new(TagSet::from([("date", vec!["20220501"])]));
        tags.discard_upload_date();
        assert!(!tags.original.contains("date"));
        assert!(!tags.resolved.contains("date"));
    }

    #[test]
    fn real_release_date_is_kept() {
        let mut tags = SongTags::new(TagSet::from([("date", vec!["2022-05-01"])]));
        tags.discard_upload_date();
        assert_eq!(tags.original.values("date"), ["2022-05-01"]);
    }

    #[test]
    fn manual_album_demotes_the_old_album() {
        let mut tags = SongTags::new(TagSet::from([("album", vec!["Old Album"])]));
        tags.set_manual_album("New Album");
        assert_eq!(tags.resolved.values("album"), ["New Album"]);
        assert_eq!(tags.resolved.values("discsubtitle"), ["Old Album"]);
        assert!(!tags.original.contains("album"));
    }

    #[test]
    fn manual_album_matching_the_old_one_adds_no_discsubtitle() {
        let mut tags = SongTags::new(TagSet::from([("album", vec!["Same"])]));
        tags.set_manual_album("Same");
        assert_eq!(tags.resolved.values("album"), ["Same"]);
        assert!(!tags.resolved.contains("discsubtitle"));
    }

    #[test]
    fn provenance_marker_is_appended_once() {
        let mut tags = SongTags::new(TagSet::from([("comment", vec!["existing"])]));
        tags.mark_provenance();
        assert_eq!(tags.resolved.values("comment"), ["existing", "youtube-dl"]);
        tags.mark_provenance();
        assert_eq!(tags.resolved.values("comment"), ["existing", "youtube-dl"]);
    }

    #[test]
    fn provenance_marker_already_present_changes_nothing() {
        let mut tags = SongTags::new(TagSet::from([("comment", vec!["youtube-dl"])]));
        tags.mark_provenance();
        assert_eq!(tags.resolved.values("comment"), ["youtube-dl"]);
    }

    #[test]
    fn deny_rules_only_touch_existing_fields() {
        let mut tags = SongTags::new(TagSet::from([
            ("description", vec!["text"]),
            ("comment", vec!["https://example.com"]),
            ("title", vec!["Keep me"]),
        ]));
        let patterns = vec![Regex::new("^https?://").unwrap()];
        tags.prune_resolved(
            &["description".to_string(), "absent".to_string()],
            &patterns,
        );
        assert!(tags.resolved.get("description").unwrap().is_removed());
        assert!(tags.resolved.get("comment").unwrap().is_removed());
        assert!(!tags.resolved.contains("absent"));
        assert_eq!(tags.resolved.values("title"), ["Keep me"]);
    }

    #[test]
    fn new_data_detection_in_both_directions() {
        let mut tags = SongTags::new(TagSet::from([("title", vec!["Song"])]));
        tags.youtube = TagSet::from([("title", vec!["Song"])]);
        assert!(!tags.check_any_new_data_exists());

        tags.youtube = TagSet::from([("title", vec!["Song"]), ("artist", vec!["A"])]);
        assert!(tags.check_any_new_data_exists());
    }

    #[test]
    fn preliminary_changes_count_as_new_data() {
        let mut tags = SongTags::new(TagSet::from([("comment", vec!["old"])]));
        assert!(!tags.check_any_new_data_exists());
        tags.mark_provenance();
        assert!(tags.check_any_new_data_exists());

        let mut tags = SongTags::new(TagSet::from([("description", vec!["text"])]));
        tags.prune_resolved(&["description".to_string()], &[]);
        assert!(tags.check_any_new_data_exists());
    }

    #[test]
    fn description_prefers_synopsis() {
        let tags = SongTags::new(TagSet::from([
            ("description", vec!["secondary"]),
            ("synopsis", vec!["line one", "line two"]),
        ]));
        assert_eq!(
            tags.description_from_original().as_deref(),
            Some("line one\nline two")
        );
    }
}
