//! Dump options and field path filters

use indexmap::IndexMap;

/// Tree of dotted field paths used by include/exclude filters.
///
/// `"address"` selects a whole field; `"address.pincode"` selects one
/// sub-field of a nested record. Selecting the whole field wins over any
/// sub-path given for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPaths {
    entries: IndexMap<String, Option<FieldPaths>>,
}

/// How a filter selects one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<'a> {
    /// The field and everything under it
    Whole,
    /// Only the given sub-paths of a nested value
    Nested(&'a FieldPaths),
}

impl FieldPaths {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a dotted path
    pub fn with(mut self, path: &str) -> Self {
        self.insert(path);
        self
    }

    pub fn insert(&mut self, path: &str) {
        let mut segments = path.split('.').filter(|s| !s.is_empty());
        if let Some(first) = segments.next() {
            let rest: Vec<&str> = segments.collect();
            self.insert_segments(first, &rest);
        }
    }

    fn insert_segments(&mut self, head: &str, rest: &[&str]) {
        match rest.split_first() {
            None => {
                self.entries.insert(head.to_string(), None);
            }
            Some((next, tail)) => {
                let slot = self
                    .entries
                    .entry(head.to_string())
                    .or_insert_with(|| Some(FieldPaths::new()));
                // `None` already selects the whole field
                if let Some(children) = slot {
                    children.insert_segments(next, tail);
                }
            }
        }
    }

    /// How this filter selects `name`, if at all
    pub fn select(&self, name: &str) -> Option<Selection<'_>> {
        self.entries.get(name).map(|entry| match entry {
            None => Selection::Whole,
            Some(children) => Selection::Nested(children),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for FieldPaths {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut paths = FieldPaths::new();
        for path in iter {
            paths.insert(path);
        }
        paths
    }
}

/// Options for projecting a record into a mapping or text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DumpOptions {
    /// Only these fields, when set.
    pub include: Option<FieldPaths>,
    /// Never these fields.
    pub exclude: Option<FieldPaths>,
    /// Drop fields that were not explicitly supplied at construction.
    pub exclude_unset: bool,
    /// Drop fields equal to their declared default.
    pub exclude_defaults: bool,
    /// Drop null fields.
    pub exclude_none: bool,
    /// Append computed fields.
    pub computed: bool,
    /// Use field aliases as output keys.
    pub by_alias: bool,
}

impl DumpOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include<'a>(mut self, paths: impl IntoIterator<Item = &'a str>) -> Self {
        self.include = Some(paths.into_iter().collect());
        self
    }

    pub fn exclude<'a>(mut self, paths: impl IntoIterator<Item = &'a str>) -> Self {
        self.exclude = Some(paths.into_iter().collect());
        self
    }

    pub fn exclude_unset(mut self) -> Self {
        self.exclude_unset = true;
        self
    }

    pub fn exclude_defaults(mut self) -> Self {
        self.exclude_defaults = true;
        self
    }

    pub fn exclude_none(mut self) -> Self {
        self.exclude_none = true;
        self
    }

    pub fn with_computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub fn by_alias(mut self) -> Self {
        self.by_alias = true;
        self
    }
}
