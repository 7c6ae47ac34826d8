use crate::core::value::Value;
use serde::{Serialize, Serializer, ser::SerializeMap};

#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
    pub name: String,
    pub value: Value,
}

impl FieldValue {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        FieldValue {
            name: name.into(),
            value,
        }
    }
}

/// An ordered mapping from column name to value.
///
/// Rows are snapshots: projections build new rows instead of editing existing ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowData {
    pub field_values: Vec<FieldValue>,
}

impl RowData {
    pub fn new(field_values: Vec<FieldValue>) -> Self {
        RowData { field_values }
    }

    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        RowData {
            field_values: pairs
                .into_iter()
                .map(|(name, value)| FieldValue::new(name, value))
                .collect(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.field_values.iter().find(|f| f.name == field)
    }

    pub fn value(&self, field: &str) -> Option<&Value> {
        self.get(field).map(|f| &f.value)
    }

    /// Value of `field`, or `Null` when the row has no such field.
    pub fn get_value(&self, field: &str) -> Value {
        self.value(field).cloned().unwrap_or(Value::Null)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.field_values.iter().map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.field_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.field_values.is_empty()
    }

    pub fn from_json_object(object: serde_json::Map<String, serde_json::Value>) -> Self {
        RowData::from_pairs(
            object
                .into_iter()
                .map(|(name, value)| (name, Value::from_json(value))),
        )
    }

    pub fn to_json_object(&self) -> serde_json::Map<String, serde_json::Value> {
        self.field_values
            .iter()
            .map(|f| (f.name.clone(), f.value.to_json()))
            .collect()
    }
}

impl Serialize for RowData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.field_values.len()))?;
        for field in &self.field_values {
            map.serialize_entry(&field.name, &field.value)?;
        }
        map.end()
    }
}
