//! Integration tests for the resolution engine, driven by a scripted
//! interaction double.

use retag_core::{reparse, Interaction, Outcome, Result, SongTags, TagSet};
use std::collections::VecDeque;

/// Interaction double replaying pre-recorded answers.
///
/// Panics when the engine asks a question the script did not expect, which
/// is exactly what the silent-resolution tests rely on.
#[derive(Default)]
struct Scripted {
    choices: VecDeque<Option<usize>>,
    selections: VecDeque<Option<Vec<usize>>>,
    texts: VecDeque<String>,
}

impl Scripted {
    fn silent() -> Self {
        Self::default()
    }

    fn choosing(choices: &[Option<usize>]) -> Self {
        Self {
            choices: choices.iter().copied().collect(),
            ..Self::default()
        }
    }
}

impl Interaction for Scripted {
    fn choose_one(&mut self, title: &str, _items: &[String]) -> Result<Option<usize>> {
        match self.choices.pop_front() {
            Some(choice) => Ok(choice),
            None => panic!("unexpected question: {title}"),
        }
    }

    fn choose_many(&mut self, title: &str, _items: &[String]) -> Result<Option<Vec<usize>>> {
        match self.selections.pop_front() {
            Some(selection) => Ok(selection),
            None => panic!("unexpected multi-select: {title}"),
        }
    }

    fn prompt_text(&mut self, label: &str) -> Result<String> {
        match self.texts.pop_front() {
            Some(text) => Ok(text),
            None => panic!("unexpected prompt: {label}"),
        }
    }

    fn show_text(&mut self, _text: &str) {}

    fn show_tags(&mut self, _tags: &SongTags) {}
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

#[test]
fn missing_field_is_filled_without_questions() {
    let mut tags = SongTags::new(TagSet::from([("title", vec!["Song"])]));
    tags.from_tags = TagSet::from([("version", vec!["Live"])]);

    let mut ui = Scripted::silent();
    let outcome = tags.resolve(&mut ui).unwrap();

    assert_eq!(outcome, Outcome::Completed);
    assert_eq!(tags.resolved.values("version"), ["Live"]);
}

#[test]
fn description_parse_outranks_the_other_sources_for_missing_fields() {
    let mut tags = SongTags::new(TagSet::new());
    tags.youtube = TagSet::from([("genre", vec!["Pop"])]);
    tags.from_tags = TagSet::from([("genre", vec!["Rock"])]);
    tags.from_desc = TagSet::from([("genre", vec!["Jazz"])]);

    let mut ui = Scripted::silent();
    tags.resolve(&mut ui).unwrap();

    assert_eq!(tags.resolved.values("genre"), ["Pop"]);
}

#[test]
fn agreeing_sources_resolve_without_questions() {
    let mut tags = SongTags::new(TagSet::from([
        ("title", vec![" Song "]),
        ("artist", vec!["Artist"]),
    ]));
    tags.youtube = TagSet::from([("title", vec!["Song"]), ("artist", vec!["Artist"])]);

    let mut ui = Scripted::silent();
    let outcome = tags.resolve(&mut ui).unwrap();

    assert_eq!(outcome, Outcome::Completed);
    assert_eq!(tags.resolved.values("title"), ["Song"]);
    assert_eq!(tags.resolved.values("artist"), ["Artist"]);
}

#[test]
fn unsplit_artist_list_resolves_to_the_split_form() {
    let mut tags = SongTags::new(TagSet::from([("artist", vec!["First, Second"])]));
    tags.youtube = TagSet::from([("artist", vec!["First", "Second"])]);
    // The album-artist pass sees several candidates; "No change" follows
    // the three artist entries.
    let mut ui = Scripted::choosing(&[Some(3)]);

    let outcome = tags.resolve(&mut ui).unwrap();

    assert_eq!(outcome, Outcome::Completed);
    assert_eq!(tags.resolved.values("artist"), ["First", "Second"]);
}

#[test]
fn conflicting_values_use_the_chosen_candidate() {
    let mut tags = SongTags::new(TagSet::from([("title", vec!["Old Title"])]));
    tags.youtube = TagSet::from([("title", vec!["New Title"])]);

    // First candidate is the description parse.
    let mut ui = Scripted::choosing(&[Some(0)]);
    let outcome = tags.resolve(&mut ui).unwrap();

    assert_eq!(outcome, Outcome::Completed);
    assert_eq!(tags.resolved.values("title"), ["New Title"]);
}

#[test]
fn keeping_the_existing_value_is_a_candidate_too() {
    let mut tags = SongTags::new(TagSet::from([("title", vec!["Old Title"])]));
    tags.youtube = TagSet::from([("title", vec!["New Title"])]);
    tags.from_tags = TagSet::from([("title", vec!["Derived Title"])]);

    // Candidates: description, original tags parse, existing metadata.
    let mut ui = Scripted::choosing(&[Some(2)]);
    tags.resolve(&mut ui).unwrap();

    assert_eq!(tags.resolved.values("title"), ["Old Title"]);
}

#[test]
fn declining_the_menu_aborts_and_leaves_the_field_alone() {
    let mut tags = SongTags::new(TagSet::from([("title", vec!["Old Title"])]));
    tags.youtube = TagSet::from([("title", vec!["New Title"])]);

    let mut ui = Scripted::choosing(&[None]);
    let outcome = tags.resolve(&mut ui).unwrap();

    assert_eq!(outcome, Outcome::Aborted);
    assert_eq!(tags.resolved.values("title"), ["Old Title"]);
}

#[test]
fn quit_is_always_the_last_candidate() {
    let mut tags = SongTags::new(TagSet::from([("title", vec!["Old Title"])]));
    tags.youtube = TagSet::from([("title", vec!["New Title"])]);

    // Candidates: description, existing, "Other action", "Quit".
    let mut ui = Scripted::choosing(&[Some(3)]);
    let outcome = tags.resolve(&mut ui).unwrap();

    assert_eq!(outcome, Outcome::Aborted);
}

#[test]
fn other_action_can_remove_the_field() {
    let mut tags = SongTags::new(TagSet::from([("title", vec!["Old Title"])]));
    tags.youtube = TagSet::from([("title", vec!["New Title"])]);

    // "Other action" (index 2), then "Remove the field" (index 3).
    let mut ui = Scripted::choosing(&[Some(2), Some(3)]);
    let outcome = tags.resolve(&mut ui).unwrap();

    assert_eq!(outcome, Outcome::Completed);
    assert!(tags.resolved.get("title").unwrap().is_removed());
}

#[test]
fn other_action_can_fill_in_a_manual_value() {
    let mut tags = SongTags::new(TagSet::from([("title", vec!["Old Title"])]));
    tags.youtube = TagSet::from([("title", vec!["New Title"])]);

    let mut ui = Scripted::choosing(&[Some(2), Some(1)]);
    ui.texts.push_back("Hand Written".to_string());
    tags.resolve(&mut ui).unwrap();

    assert_eq!(tags.resolved.values("title"), ["Hand Written"]);
}

#[test]
fn other_action_can_select_a_subset_of_all_candidates() {
    let mut tags = SongTags::new(TagSet::from([("genre", vec!["Rock"])]));
    tags.youtube = TagSet::from([("genre", vec!["Pop"])]);

    // "Other action", then "Select items from a list", keeping both values.
    let mut ui = Scripted::choosing(&[Some(2), Some(0)]);
    ui.selections.push_back(Some(vec![0, 1]));
    tags.resolve(&mut ui).unwrap();

    assert_eq!(tags.resolved.values("genre"), ["Rock", "Pop"]);
}

#[test]
fn empty_selection_removes_the_field() {
    let mut tags = SongTags::new(TagSet::from([("genre", vec!["Rock"])]));
    tags.youtube = TagSet::from([("genre", vec!["Pop"])]);

    let mut ui = Scripted::choosing(&[Some(2), Some(0)]);
    ui.selections.push_back(Some(vec![]));
    tags.resolve(&mut ui).unwrap();

    assert!(tags.resolved.get("genre").unwrap().is_removed());
}

#[test]
fn going_back_returns_to_the_candidate_menu() {
    let mut tags = SongTags::new(TagSet::from([("title", vec!["Old Title"])]));
    tags.youtube = TagSet::from([("title", vec!["New Title"])]);

    // "Other action", "Go back", then pick the description parse.
    let mut ui = Scripted::choosing(&[Some(2), Some(4), Some(0)]);
    let outcome = tags.resolve(&mut ui).unwrap();

    assert_eq!(outcome, Outcome::Completed);
    assert_eq!(tags.resolved.values("title"), ["New Title"]);
}

#[test]
fn albumartist_defaults_to_the_resolved_artist() {
    let mut tags = SongTags::new(TagSet::new());
    tags.youtube = TagSet::from([("artist", vec!["Only Artist"])]);

    let mut ui = Scripted::silent();
    tags.resolve(&mut ui).unwrap();

    assert_eq!(tags.resolved.values("albumartist"), ["Only Artist"]);
}

#[test]
fn albumartist_with_several_candidates_is_chosen_by_the_user() {
    let mut tags = SongTags::new(TagSet::from([("artist", vec!["Old Artist"])]));
    tags.youtube = TagSet::from([("artist", vec!["Old Artist", "Guest"])]);

    // Artist conflict: pick the description parse, then pick "Guest" as the
    // album artist.
    let mut ui = Scripted::choosing(&[Some(0), Some(1)]);
    tags.resolve(&mut ui).unwrap();

    assert_eq!(tags.resolved.values("artist"), ["Old Artist", "Guest"]);
    assert_eq!(tags.resolved.values("albumartist"), ["Guest"]);
}

#[test]
fn albumartist_no_change_keeps_the_existing_value() {
    let mut tags = SongTags::new(TagSet::from([
        ("artist", vec!["Old Artist"]),
        ("albumartist", vec!["Old Artist"]),
    ]));
    tags.youtube = TagSet::from([("artist", vec!["Old Artist", "Guest"])]);

    // Artist conflict resolved to the description parse; "No change" is the
    // entry after the two artist candidates.
    let mut ui = Scripted::choosing(&[Some(0), Some(2)]);
    tags.resolve(&mut ui).unwrap();

    assert_eq!(tags.resolved.values("albumartist"), ["Old Artist"]);
}

#[test]
fn existing_albumartist_is_untouched_without_candidates() {
    let mut tags = SongTags::new(TagSet::from([
        ("artist", vec!["Artist"]),
        ("albumartist", vec!["Someone Else"]),
    ]));
    tags.youtube = TagSet::from([("artist", vec!["Artist"])]);

    let mut ui = Scripted::silent();
    tags.resolve(&mut ui).unwrap();

    assert_eq!(tags.resolved.values("albumartist"), ["Someone Else"]);
}

#[test]
fn resolution_is_repeatable_with_the_same_answers() {
    let original = TagSet::from([("title", vec!["Song (feat. Guest)"])]);
    let run = || {
        let mut tags = SongTags::new(original.clone());
        tags.from_tags = reparse(&tags.original);
        // One title conflict, answered with the pruned derivation.
        let mut ui = Scripted::choosing(&[Some(0)]);
        assert_eq!(tags.resolve(&mut ui).unwrap(), Outcome::Completed);
        tags.resolved
    };
    let resolved = run();
    assert_eq!(resolved.values("title"), ["Song"]);
    assert_eq!(resolved.values("artist"), ["Guest"]);
    assert_eq!(resolved.values("albumartist"), ["Guest"]);
    assert_eq!(resolved, run());
}

#[test]
fn full_pipeline_resolves_a_typical_download() {
    let original = TagSet::from([
        ("title", vec!["Song Title (feat. Guest)"]),
        ("artist", vec!["Artist One"]),
        ("date", vec!["20220501"]),
        ("synopsis", vec![
            "Song Title (feat. Guest) · Artist One, Guest",
            "",
            "Album Name",
            "",
            "Provided to YouTube by Label LLC",
            "℗ 2022 Label LLC",
            "Released on: 2022-05-01",
        ]),
    ]);

    let mut tags = SongTags::new(original);
    tags.discard_upload_date();
    tags.from_tags = reparse(&tags.original);
    let description = tags.description_from_original().unwrap();
    let mut parser = retag_core::DescriptionParser::new(false);
    parser.parse(&description);
    tags.youtube = parser.into_tags();
    tags.from_desc = reparse(&tags.youtube);
    tags.mark_provenance();
    tags.description = Some(description);

    assert!(tags.check_any_new_data_exists());

    // Artist conflict (["Artist One"] vs ["Artist One", "Guest"]): take the
    // description parse; then keep "Artist One" as the album artist.
    let mut ui = Scripted::choosing(&[Some(0), Some(0)]);
    let outcome = tags.resolve(&mut ui).unwrap();

    assert_eq!(outcome, Outcome::Completed);
    // The description header repeats the raw title, so the existing title is
    // silently confirmed, markup and all.
    assert_eq!(tags.resolved.values("title"), ["Song Title (feat. Guest)"]);
    assert_eq!(tags.resolved.values("artist"), strings(&["Artist One", "Guest"]));
    assert_eq!(tags.resolved.values("albumartist"), ["Artist One"]);
    assert_eq!(tags.resolved.values("album"), ["Album Name"]);
    assert_eq!(tags.resolved.values("date"), ["2022-05-01"]);
    assert_eq!(tags.resolved.values("organization"), ["Label LLC"]);
    assert_eq!(tags.resolved.values("comment"), ["youtube-dl"]);
}
