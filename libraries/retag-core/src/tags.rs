//! Ordered tag container shared by every metadata source.

/// Value of a single tag field.
///
/// A field that is absent from a [`TagSet`] is simply not in the map;
/// `Removed` marks a field that existed but must be deleted when the set is
/// committed to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValue {
    /// Ordered list of values for the field
    Values(Vec<String>),
    /// The field is scheduled for deletion
    Removed,
}

impl TagValue {
    /// The values of this field, empty when the field is marked removed.
    pub fn values(&self) -> &[String] {
        match self {
            Self::Values(values) => values,
            Self::Removed => &[],
        }
    }

    /// Whether this field is scheduled for deletion
    pub fn is_removed(&self) -> bool {
        matches!(self, Self::Removed)
    }
}

/// An insertion-ordered mapping from tag field to [`TagValue`].
///
/// Song files carry a handful of fields, so this is a plain vector: order is
/// meaningful (it is the order fields are shown and written back) and lookup
/// cost is irrelevant at this size.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    entries: Vec<(String, TagValue)>,
}

impl TagSet {
    /// Create an empty tag set
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the set contains no fields
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of fields in the set
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether `field` is present (including when marked removed)
    pub fn contains(&self, field: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == field)
    }

    /// The value of `field`, if present
    pub fn get(&self, field: &str) -> Option<&TagValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// The values of `field`; empty when the field is absent or removed
    pub fn values(&self, field: &str) -> &[String] {
        self.get(field).map_or(&[], TagValue::values)
    }

    /// Set `field` to `values`, keeping its position if it already exists
    pub fn set(&mut self, field: &str, values: Vec<String>) {
        self.set_value(field, TagValue::Values(values));
    }

    /// Mark `field` for deletion, keeping its position if it already exists
    pub fn mark_removed(&mut self, field: &str) {
        self.set_value(field, TagValue::Removed);
    }

    fn set_value(&mut self, field: &str, value: TagValue) {
        if let Some(entry) = self.entries.iter_mut().find(|(name, _)| name == field) {
            entry.1 = value;
        } else {
            self.entries.push((field.to_string(), value));
        }
    }

    /// Append `value` to `field`, creating the field if needed.
    ///
    /// Duplicate values are dropped, keeping the first occurrence. Appending
    /// to a removed field resurrects it with just the new value.
    pub fn push(&mut self, field: &str, value: String) {
        match self.entries.iter_mut().find(|(name, _)| name == field) {
            Some((_, TagValue::Values(values))) => {
                if !values.contains(&value) {
                    values.push(value);
                }
            }
            Some(entry) => entry.1 = TagValue::Values(vec![value]),
            None => self
                .entries
                .push((field.to_string(), TagValue::Values(vec![value]))),
        }
    }

    /// Remove `field` entirely, returning its previous value
    pub fn remove(&mut self, field: &str) -> Option<TagValue> {
        let index = self.entries.iter().position(|(name, _)| name == field)?;
        Some(self.entries.remove(index).1)
    }

    /// Drop every field whose value list is empty
    pub fn prune_empty(&mut self) {
        self.entries
            .retain(|(_, value)| !matches!(value, TagValue::Values(values) if values.is_empty()));
    }

    /// Iterate over field names in insertion order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Iterate over (field, value) pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TagValue)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }
}

impl<const N: usize> From<[(&str, Vec<&str>); N]> for TagSet {
    fn from(entries: [(&str, Vec<&str>); N]) -> Self {
        let mut tags = Self::new();
        for (field, values) in entries {
            tags.set(field, values.into_iter().map(String::from).collect());
        }
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_deduplicates_keeping_first_occurrence() {
        let mut tags = TagSet::new();
        tags.push("artist", "A".to_string());
        tags.push("artist", "B".to_string());
        tags.push("artist", "A".to_string());
        assert_eq!(tags.values("artist"), ["A", "B"]);
    }

    #[test]
    fn absent_and_removed_fields_both_yield_no_values() {
        let mut tags = TagSet::new();
        tags.mark_removed("genre");
        assert!(tags.values("genre").is_empty());
        assert!(tags.values("artist").is_empty());
        assert!(tags.contains("genre"));
        assert!(!tags.contains("artist"));
    }

    #[test]
    fn set_keeps_field_position() {
        let mut tags = TagSet::from([("title", vec!["t"]), ("artist", vec!["a"])]);
        tags.set("title", vec!["other".to_string()]);
        let fields: Vec<&str> = tags.fields().collect();
        assert_eq!(fields, ["title", "artist"]);
        assert_eq!(tags.values("title"), ["other"]);
    }

    #[test]
    fn prune_empty_drops_only_empty_lists() {
        let mut tags = TagSet::new();
        tags.set("genre", vec![]);
        tags.set("artist", vec!["A".to_string()]);
        tags.mark_removed("composer");
        tags.prune_empty();
        assert!(!tags.contains("genre"));
        assert!(tags.contains("artist"));
        assert!(tags.contains("composer"));
    }

    #[test]
    fn push_after_removal_resurrects_the_field() {
        let mut tags = TagSet::new();
        tags.set("genre", vec!["Rock".to_string()]);
        tags.mark_removed("genre");
        tags.push("genre", "Pop".to_string());
        assert_eq!(tags.values("genre"), ["Pop"]);
    }
}
