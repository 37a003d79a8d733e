use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::item::{Entry, Item, ItemId};

/// An ordered collection of entries, analogous to a table.
///
/// Order is insertion order, except that [`Dataset::upsert`] replaces an
/// existing item at its current position.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    entries: Vec<Entry>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interpret a JSON value as a dataset. Only arrays qualify.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Array(values) => Some(values.into_iter().map(Entry::from).collect()),
            _ => None,
        }
    }

    /// Like [`Dataset::from_value`], but anything that is not an array reads
    /// as an empty dataset.
    pub fn from_value_lossy(value: Value) -> Self {
        Self::from_value(value).unwrap_or_default()
    }

    pub fn into_value(self) -> Value {
        Value::Array(self.entries.into_iter().map(Entry::into_value).collect())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// Iterate over the entries that are valid items.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.entries.iter().filter_map(Entry::as_item)
    }

    /// Largest id present, counting the numeric ids of raw entries, or
    /// [`ItemId::ZERO`] when there is none.
    pub fn max_id(&self) -> ItemId {
        self.entries
            .iter()
            .filter_map(Entry::loose_id)
            .fold(ItemId::ZERO, std::cmp::max)
    }

    /// The id the next appended item receives: one past [`Dataset::max_id`],
    /// or the smallest free positive id once the maximum is `i64::MAX`.
    pub fn next_id(&self) -> ItemId {
        self.max_id()
            .next()
            .unwrap_or_else(|| self.lowest_free_id())
    }

    fn lowest_free_id(&self) -> ItemId {
        let used: BTreeSet<ItemId> = self
            .entries
            .iter()
            .filter_map(Entry::loose_id)
            .filter(|id| id.get() > 0)
            .collect();
        let mut candidate = ItemId::new(1);
        for id in used {
            if id != candidate {
                break;
            }
            match candidate.next() {
                Some(next) => candidate = next,
                None => break,
            }
        }
        candidate
    }

    /// Index of the first item with this id.
    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id() == Some(id))
    }

    /// First item with this id.
    pub fn find(&self, id: ItemId) -> Option<&Item> {
        self.items().find(|item| item.id() == id)
    }

    pub fn push(&mut self, entry: impl Into<Entry>) {
        self.entries.push(entry.into());
    }

    /// Replace the first item sharing `item`'s id in place, or append it.
    ///
    /// Returns `true` when an existing item was replaced.
    pub fn upsert(&mut self, item: Item) -> bool {
        match self.position(item.id()) {
            Some(index) => {
                self.entries[index] = Entry::Item(item);
                true
            }
            None => {
                self.entries.push(Entry::Item(item));
                false
            }
        }
    }

    /// Remove the first item with this id, if any.
    pub fn remove(&mut self, id: ItemId) -> Option<Item> {
        let index = self.position(id)?;
        match self.entries.remove(index) {
            Entry::Item(item) => Some(item),
            // `position` only matches items.
            Entry::Raw(_) => None,
        }
    }

    /// Entries in `offset..offset + limit`, clamped to the dataset bounds.
    pub fn slice(&self, offset: usize, limit: usize) -> &[Entry] {
        let start = offset.min(self.entries.len());
        let end = start.saturating_add(limit).min(self.entries.len());
        &self.entries[start..end]
    }
}

impl FromIterator<Entry> for Dataset {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<Item> for Dataset {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        iter.into_iter().map(Entry::Item).collect()
    }
}

impl IntoIterator for Dataset {
    type Item = Entry;
    type IntoIter = std::vec::IntoIter<Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// The whole per-session state: dataset name to dataset.
///
/// This is the unit of persistence. It is read and written as one value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RootBlob {
    datasets: BTreeMap<String, Dataset>,
}

impl RootBlob {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a stored blob. Non-object values read as empty, and members that
    /// are not arrays read as empty datasets.
    pub fn from_value_lossy(value: Value) -> Self {
        match value {
            Value::Object(map) => map
                .into_iter()
                .map(|(name, value)| (name, Dataset::from_value_lossy(value)))
                .collect(),
            _ => Self::default(),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(
            self.datasets
                .into_iter()
                .map(|(name, dataset)| (name, dataset.into_value()))
                .collect(),
        )
    }

    pub fn get(&self, name: &str) -> Option<&Dataset> {
        self.datasets.get(name)
    }

    /// Take a dataset out of the blob, leaving nothing behind.
    pub fn take(&mut self, name: &str) -> Option<Dataset> {
        self.datasets.remove(name)
    }

    /// Set `name` to `dataset`, returning the previous dataset.
    pub fn insert(&mut self, name: impl Into<String>, dataset: Dataset) -> Option<Dataset> {
        self.datasets.insert(name.into(), dataset)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.datasets.contains_key(name)
    }

    /// Dataset names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Dataset)> {
        self.datasets.iter().map(|(name, dataset)| (name.as_str(), dataset))
    }
}

impl FromIterator<(String, Dataset)> for RootBlob {
    fn from_iter<I: IntoIterator<Item = (String, Dataset)>>(iter: I) -> Self {
        Self {
            datasets: iter.into_iter().collect(),
        }
    }
}
