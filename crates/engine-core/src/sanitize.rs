//! Mapping of arbitrary column names onto destination identifiers.

use crate::error::ValidationError;
use model::core::identifiers::Selection;
use std::collections::HashMap;

/// Replaces every character outside `[A-Za-z0-9]` with `_`, one for one.
pub fn sanitize_identifier(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Forward (original to sanitized) and reverse mappings for the columns of
/// one create-and-import request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameMapping {
    forward: HashMap<String, String>,
    reverse: HashMap<String, String>,
}

impl NameMapping {
    /// Builds the mapping for `selection`.
    ///
    /// Fails when a name is selected twice or when two selected names
    /// sanitize to the same identifier.
    pub fn build(selection: &Selection) -> Result<Self, ValidationError> {
        if let Some(dup) = selection.first_duplicate() {
            return Err(ValidationError::DuplicateColumn(dup.to_string()));
        }

        let mut mapping = NameMapping::default();
        for original in selection.iter() {
            let sanitized = sanitize_identifier(original);
            if let Some(existing) = mapping.reverse.get(&sanitized) {
                return Err(ValidationError::NameCollision {
                    originals: vec![existing.clone(), original.to_string()],
                    sanitized,
                });
            }
            mapping
                .forward
                .insert(original.to_string(), sanitized.clone());
            mapping.reverse.insert(sanitized, original.to_string());
        }

        Ok(mapping)
    }

    pub fn sanitized(&self, original: &str) -> Option<&str> {
        self.forward.get(original).map(String::as_str)
    }

    pub fn original(&self, sanitized: &str) -> Option<&str> {
        self.reverse.get(sanitized).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}
