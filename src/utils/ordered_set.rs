// src/utils/ordered_set.rs
use serde::{Serialize, Serializer};
use std::collections::HashSet;

/// Insertion-ordered set of candidate strings.
///
/// Values keep the order in which they were first seen. Empty strings are
/// never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedSet {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl OrderedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` unless it is empty or already present.
    /// Returns `true` when the value was added.
    pub fn insert(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        if value.is_empty() || self.seen.contains(&value) {
            return false;
        }
        self.seen.insert(value.clone());
        self.items.push(value);
        true
    }

    pub fn contains(&self, value: &str) -> bool {
        self.seen.contains(value)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items
    }
}

impl<S: Into<String>> Extend<S> for OrderedSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<S: Into<String>> FromIterator<S> for OrderedSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = OrderedSet::new();
        set.extend(iter);
        set
    }
}

impl<'a> IntoIterator for &'a OrderedSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl Serialize for OrderedSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.items)
    }
}
