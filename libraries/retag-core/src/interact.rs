//! Interaction boundary between the resolution engine and any front end.

use crate::error::Result;
use crate::resolve::SongTags;

/// User conversation needed during resolution.
///
/// Implementers render menus and collect answers; the engine never prints
/// anything itself. Every choice can be declined (`None`), which the engine
/// treats as backing out of the current question.
pub trait Interaction {
    /// Pick one of `items`; `None` means the user backed out
    fn choose_one(&mut self, title: &str, items: &[String]) -> Result<Option<usize>>;

    /// Pick any subset of `items`; `None` means the user backed out.
    /// `Some(vec![])` is a deliberate empty selection.
    fn choose_many(&mut self, title: &str, items: &[String]) -> Result<Option<Vec<usize>>>;

    /// Ask for a free-text value
    fn prompt_text(&mut self, label: &str) -> Result<String>;

    /// Show a piece of text to the user
    fn show_text(&mut self, text: &str);

    /// Show the current state of all sources for a song
    fn show_tags(&mut self, tags: &SongTags);
}
