use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{json_kind, TypeError};

/// Name of the identifier field inside every stored record.
pub const ID_FIELD: &str = "id";

/// Integer identifier of an item within one dataset.
///
/// Only integer JSON numbers become an `ItemId`. A record carrying
/// `"id": "3"` or `"id": 3.5` is never addressable by id, so lookups are
/// strictly typed: the string `"3"` does not match the integer `3`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(i64);

impl ItemId {
    /// The id an empty dataset reports as its maximum.
    pub const ZERO: Self = Self(0);

    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i64 {
        self.0
    }

    /// The id following this one, or `None` at `i64::MAX`.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl From<i64> for ItemId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>()
            .map(Self)
            .map_err(|_| TypeError::InvalidId(s.to_string()))
    }
}

/// A raw record payload that has not been given an id yet.
///
/// Any `id` field the payload carries is kept as ordinary data until
/// [`Draft::into_item`] overwrites it; it is never used for lookup.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct Draft {
    fields: Map<String, Value>,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a JSON object as a draft. Any other JSON kind is rejected.
    pub fn from_value(value: Value) -> Result<Self, TypeError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(TypeError::NotAnObject(json_kind(&other))),
        }
    }

    /// Builder-style field setter.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Stamp `id` onto the payload, producing a stored item.
    ///
    /// An existing `id` field keeps its position and gets the new value;
    /// otherwise `id` is appended as the last field.
    pub fn into_item(self, id: ItemId) -> Item {
        let mut fields = self.fields;
        fields.insert(ID_FIELD.to_string(), Value::from(id.get()));
        Item { id, fields }
    }
}

impl TryFrom<Value> for Draft {
    type Error = TypeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl From<Draft> for Value {
    fn from(draft: Draft) -> Self {
        Value::Object(draft.fields)
    }
}

/// A validated record: a JSON object whose `id` field is an integer.
///
/// The typed id is cached next to the field map and always agrees with
/// the map's `id` entry.
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    id: ItemId,
    fields: Map<String, Value>,
}

impl Item {
    /// Validate a JSON value as an item.
    pub fn from_value(value: Value) -> Result<Self, TypeError> {
        let fields = match value {
            Value::Object(fields) => fields,
            other => return Err(TypeError::NotAnObject(json_kind(&other))),
        };
        let id = match fields.get(ID_FIELD) {
            None => return Err(TypeError::MissingId),
            Some(raw) => raw
                .as_i64()
                .ok_or_else(|| TypeError::NonIntegerId(raw.to_string()))?,
        };
        Ok(Self {
            id: ItemId(id),
            fields,
        })
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Look up a single field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Turn the item back into a draft, e.g. to store it under another id.
    pub fn into_draft(self) -> Draft {
        Draft {
            fields: self.fields,
        }
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

impl Serialize for Item {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Item {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Item::from_value(value).map_err(serde::de::Error::custom)
    }
}

/// One element of a dataset.
///
/// Seed files may contain values that are not valid items (string ids,
/// missing ids, scalars). Those are kept verbatim as [`Entry::Raw`] so they
/// survive a round trip. They are never matched by id, but a numeric
/// looking id on a raw object still counts when the next id is chosen
/// (see [`Entry::loose_id`]).
#[derive(Clone, Debug, PartialEq)]
pub enum Entry {
    Item(Item),
    Raw(Value),
}

impl Entry {
    /// The integer id, if this entry is an item.
    pub fn id(&self) -> Option<ItemId> {
        match self {
            Entry::Item(item) => Some(item.id()),
            Entry::Raw(_) => None,
        }
    }

    /// The id this entry reserves for id generation: an item's id, or a
    /// raw object's `id` written as an integer-valued float (`5.0`) or an
    /// integer string (`"5"`).
    pub fn loose_id(&self) -> Option<ItemId> {
        match self {
            Entry::Item(item) => Some(item.id()),
            Entry::Raw(Value::Object(fields)) => fields.get(ID_FIELD).and_then(loose_integer),
            Entry::Raw(_) => None,
        }
    }

    pub fn as_item(&self) -> Option<&Item> {
        match self {
            Entry::Item(item) => Some(item),
            Entry::Raw(_) => None,
        }
    }

    pub fn is_item(&self) -> bool {
        matches!(self, Entry::Item(_))
    }

    pub fn to_value(&self) -> Value {
        match self {
            Entry::Item(item) => item.to_value(),
            Entry::Raw(value) => value.clone(),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Entry::Item(item) => item.into_value(),
            Entry::Raw(value) => value,
        }
    }
}

fn loose_integer(value: &Value) -> Option<ItemId> {
    match value {
        Value::Number(number) => number
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| ItemId(f as i64)),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

impl From<Item> for Entry {
    fn from(item: Item) -> Self {
        Entry::Item(item)
    }
}

impl From<Value> for Entry {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(fields) => match fields.get(ID_FIELD).and_then(Value::as_i64) {
                Some(id) => Entry::Item(Item {
                    id: ItemId(id),
                    fields,
                }),
                None => Entry::Raw(Value::Object(fields)),
            },
            other => Entry::Raw(other),
        }
    }
}

impl Serialize for Entry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Entry::Item(item) => item.serialize(serializer),
            Entry::Raw(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Entry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Entry::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // -----------------------------------------------------------------------
    // ItemId
    // -----------------------------------------------------------------------

    #[test]
    fn item_id_parses_integers() {
        assert_eq!("42".parse::<ItemId>().unwrap(), ItemId::new(42));
        assert_eq!("-7".parse::<ItemId>().unwrap(), ItemId::new(-7));
    }

    #[test]
    fn item_id_rejects_non_integers() {
        assert!(matches!("abc".parse::<ItemId>(), Err(TypeError::InvalidId(_))));
        assert!("3.0".parse::<ItemId>().is_err());
        assert!("".parse::<ItemId>().is_err());
    }

    #[test]
    fn item_id_next_stops_at_max() {
        assert_eq!(ItemId::ZERO.next(), Some(ItemId::new(1)));
        assert_eq!(ItemId::new(i64::MAX - 1).next(), Some(ItemId::new(i64::MAX)));
        assert_eq!(ItemId::new(i64::MAX).next(), None);
    }

    #[test]
    fn loose_id_reads_numeric_raw_ids() {
        assert_eq!(Entry::from(json!({"id": 4})).loose_id(), Some(ItemId::new(4)));
        assert_eq!(Entry::from(json!({"id": "5"})).loose_id(), Some(ItemId::new(5)));
        assert_eq!(Entry::from(json!({"id": 6.0})).loose_id(), Some(ItemId::new(6)));
        assert_eq!(Entry::from(json!({"id": 6.5})).loose_id(), None);
        assert_eq!(Entry::from(json!({"id": "abc"})).loose_id(), None);
        assert_eq!(Entry::from(json!({"id": null})).loose_id(), None);
        assert_eq!(Entry::from(json!(5)).loose_id(), None);
        // Raw entries are still never matched by id.
        assert_eq!(Entry::from(json!({"id": "5"})).id(), None);
    }

    #[test]
    fn item_id_display() {
        assert_eq!(ItemId::new(12).to_string(), "12");
    }

    // -----------------------------------------------------------------------
    // Draft
    // -----------------------------------------------------------------------

    #[test]
    fn draft_accepts_objects_only() {
        assert!(Draft::from_value(json!({"title": "A"})).is_ok());
        assert_eq!(
            Draft::from_value(json!([1, 2])),
            Err(TypeError::NotAnObject("array"))
        );
        assert_eq!(
            Draft::from_value(json!("text")),
            Err(TypeError::NotAnObject("string"))
        );
    }

    #[test]
    fn into_item_appends_id_last() {
        let item = Draft::new()
            .with_field("title", "A")
            .with_field("year", 1999)
            .into_item(ItemId::new(5));
        let keys: Vec<&String> = item.fields().keys().collect();
        assert_eq!(keys, ["title", "year", "id"]);
        assert_eq!(item.id(), ItemId::new(5));
        assert_eq!(item.get("id"), Some(&json!(5)));
    }

    #[test]
    fn into_item_overwrites_existing_id_in_place() {
        let draft = Draft::from_value(json!({"id": "whatever", "title": "A"})).unwrap();
        let item = draft.into_item(ItemId::new(9));
        let keys: Vec<&String> = item.fields().keys().collect();
        assert_eq!(keys, ["id", "title"]);
        assert_eq!(item.into_value(), json!({"id": 9, "title": "A"}));
    }

    #[test]
    fn draft_deserializes_from_json() {
        let draft: Draft = serde_json::from_str(r#"{"name":"x"}"#).unwrap();
        assert_eq!(draft.fields().get("name"), Some(&json!("x")));
        assert!(serde_json::from_str::<Draft>("[1]").is_err());
    }

    // -----------------------------------------------------------------------
    // Item
    // -----------------------------------------------------------------------

    #[test]
    fn item_requires_integer_id() {
        assert!(Item::from_value(json!({"id": 1})).is_ok());
        assert_eq!(Item::from_value(json!({"name": "x"})), Err(TypeError::MissingId));
        assert!(matches!(
            Item::from_value(json!({"id": "1"})),
            Err(TypeError::NonIntegerId(_))
        ));
        assert!(matches!(
            Item::from_value(json!({"id": 1.5})),
            Err(TypeError::NonIntegerId(_))
        ));
        assert_eq!(Item::from_value(json!(3)), Err(TypeError::NotAnObject("number")));
    }

    #[test]
    fn item_serializes_as_plain_object() {
        let item = Item::from_value(json!({"id": 2, "title": "B"})).unwrap();
        let text = serde_json::to_string(&item).unwrap();
        assert_eq!(text, r#"{"id":2,"title":"B"}"#);
        let back: Item = serde_json::from_str(&text).unwrap();
        assert_eq!(back, item);
    }

    // -----------------------------------------------------------------------
    // Entry classification
    // -----------------------------------------------------------------------

    #[test]
    fn entry_classifies_values() {
        assert!(Entry::from(json!({"id": 3})).is_item());
        assert!(!Entry::from(json!({"id": "3"})).is_item());
        assert!(!Entry::from(json!({"id": 3.0})).is_item());
        assert!(!Entry::from(json!({"title": "no id"})).is_item());
        assert!(!Entry::from(json!(17)).is_item());
    }

    #[test]
    fn string_id_has_no_item_id() {
        let entry = Entry::from(json!({"id": "3"}));
        assert_eq!(entry.id(), None);
        assert_eq!(Entry::from(json!({"id": 3})).id(), Some(ItemId::new(3)));
    }

    #[test]
    fn raw_entries_round_trip_verbatim() {
        let raw = json!({"id": "x", "nested": {"a": [1, 2]}});
        let entry: Entry = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&entry).unwrap(), raw);
        assert_eq!(entry.into_value(), raw);
    }
}
