use crate::core::data_type::TypeTag;
use serde::{Deserialize, Serialize};

/// Name and type of a single column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: TypeTag,
    /// Type string exactly as reported by the catalog, when the column came from one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_type: Option<String>,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, data_type: TypeTag) -> Self {
        ColumnDescriptor {
            name: name.into(),
            data_type,
            raw_type: None,
        }
    }

    pub fn from_catalog(name: impl Into<String>, raw_type: impl Into<String>) -> Self {
        let raw_type = raw_type.into();
        ColumnDescriptor {
            name: name.into(),
            data_type: TypeTag::from_clickhouse_type(&raw_type),
            raw_type: Some(raw_type),
        }
    }
}
