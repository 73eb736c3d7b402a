use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// The object built by `pick`.
///
/// Always an object at the root. Everything inside it is owned, so it never
/// aliases the source it was picked from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selection {
    pub(crate) entries: BTreeMap<String, Picked>,
}

/// A node of a [`Selection`]
#[derive(Debug, Clone, PartialEq)]
pub enum Picked {
    /// A selected value, copied whole from the source
    Value(Value),
    /// An object rebuilt along a picked path
    Object(BTreeMap<String, Picked>),
    /// An array rebuilt along a picked path, keeping source positions
    Array(SparseArray),
}

/// An array with holes.
///
/// Only picked positions are populated. The length is one past the highest
/// populated index, so picking `[2]` alone gives a length of 3.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SparseArray {
    pub(crate) slots: BTreeMap<usize, Picked>,
}

impl Selection {
    pub fn new() -> Self {
        Selection::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Picked> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Picked)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Convert to a plain JSON object. Holes in sparse arrays become `null`.
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect(),
        )
    }

    pub fn into_value(self) -> Value {
        Value::Object(
            self.entries
                .into_iter()
                .map(|(k, v)| (k, v.into_value()))
                .collect(),
        )
    }
}

impl From<Map<String, Value>> for Selection {
    fn from(map: Map<String, Value>) -> Self {
        Selection {
            entries: map.into_iter().map(|(k, v)| (k, Picked::Value(v))).collect(),
        }
    }
}

impl Picked {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Picked::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, Picked>> {
        match self {
            Picked::Object(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&SparseArray> {
        match self {
            Picked::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Picked::Value(value) => value.clone(),
            Picked::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_value()))
                    .collect(),
            ),
            Picked::Array(array) => Value::Array(
                (0..array.len())
                    .map(|idx| array.get(idx).map_or(Value::Null, Picked::to_value))
                    .collect(),
            ),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Picked::Value(value) => value,
            Picked::Object(fields) => Value::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, v.into_value()))
                    .collect(),
            ),
            Picked::Array(array) => {
                let mut items = vec![Value::Null; array.len()];
                for (idx, picked) in array.slots {
                    items[idx] = picked.into_value();
                }
                Value::Array(items)
            }
        }
    }
}

impl From<Value> for Picked {
    fn from(value: Value) -> Self {
        Picked::Value(value)
    }
}

impl SparseArray {
    pub fn new() -> Self {
        SparseArray::default()
    }

    pub fn len(&self) -> usize {
        self.slots.last_key_value().map_or(0, |(idx, _)| idx + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Picked> {
        self.slots.get(&idx)
    }

    /// True for positions below `len()` that were never populated
    pub fn is_hole(&self, idx: usize) -> bool {
        idx < self.len() && !self.slots.contains_key(&idx)
    }

    /// Populated positions, in index order
    pub fn populated(&self) -> impl Iterator<Item = (usize, &Picked)> {
        self.slots.iter().map(|(idx, picked)| (*idx, picked))
    }
}

impl FromIterator<(usize, Picked)> for SparseArray {
    fn from_iter<I: IntoIterator<Item = (usize, Picked)>>(iter: I) -> Self {
        SparseArray {
            slots: iter.into_iter().collect(),
        }
    }
}

impl Serialize for Selection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, picked) in &self.entries {
            map.serialize_entry(key, picked)?;
        }
        map.end()
    }
}

impl Serialize for Picked {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Picked::Value(value) => value.serialize(serializer),
            Picked::Object(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, picked) in fields {
                    map.serialize_entry(key, picked)?;
                }
                map.end()
            }
            Picked::Array(array) => array.serialize(serializer),
        }
    }
}

impl Serialize for SparseArray {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.len();
        let mut seq = serializer.serialize_seq(Some(len))?;
        for idx in 0..len {
            // JSON has no holes; emit null
            seq.serialize_element(&self.slots.get(&idx))?;
        }
        seq.end()
    }
}
