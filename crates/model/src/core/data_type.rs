use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar type of a column, either inferred from a CSV sample or reported by
/// the warehouse catalog.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Int64,
    Float64,
    DateTime,
    #[default]
    String,
}

impl TypeTag {
    /// Name of the type in ClickHouse DDL.
    pub fn clickhouse_name(&self) -> &'static str {
        match self {
            TypeTag::Int64 => "Int64",
            TypeTag::Float64 => "Float64",
            TypeTag::DateTime => "DateTime",
            TypeTag::String => "String",
        }
    }

    /// Maps a raw ClickHouse column type onto the closest tag.
    ///
    /// `Nullable(..)` and `LowCardinality(..)` wrappers are unwrapped first.
    /// Anything that is not numeric or temporal is treated as a string.
    pub fn from_clickhouse_type(raw: &str) -> Self {
        let inner = Self::unwrap_modifiers(raw.trim());

        if inner.starts_with("Int") || inner.starts_with("UInt") {
            TypeTag::Int64
        } else if inner.starts_with("Float") || inner.starts_with("Decimal") {
            TypeTag::Float64
        } else if inner.starts_with("DateTime") || inner.starts_with("Date") {
            TypeTag::DateTime
        } else {
            TypeTag::String
        }
    }

    fn unwrap_modifiers(mut name: &str) -> &str {
        loop {
            let stripped = ["Nullable(", "LowCardinality("].iter().find_map(|prefix| {
                name.strip_prefix(prefix)
                    .and_then(|rest| rest.strip_suffix(')'))
            });
            match stripped {
                Some(inner) => name = inner.trim(),
                None => return name,
            }
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.clickhouse_name())
    }
}
