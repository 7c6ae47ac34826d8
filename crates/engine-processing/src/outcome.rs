//! The structured result every operation reports.

use crate::error::{LoadError, TransferError};
use engine_core::error::ValidationError;
use serde::Serialize;
use serde_json::{Value as JsonValue, json};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<JsonValue>,
}

impl TransferOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        TransferOutcome {
            success: true,
            message: message.into(),
            count: None,
            file_path: None,
            data: None,
            details: None,
        }
    }

    pub fn failure(err: &TransferError) -> Self {
        TransferOutcome {
            success: false,
            message: err.to_string(),
            count: err.partial_count(),
            file_path: None,
            data: None,
            details: Some(failure_details(err)),
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    /// Attaches `data`; a value that fails to serialize is reported as null.
    pub fn with_data<T: Serialize>(mut self, data: &T) -> Self {
        self.data = Some(serde_json::to_value(data).unwrap_or(JsonValue::Null));
        self
    }

    pub fn with_details(mut self, details: JsonValue) -> Self {
        self.details = Some(details);
        self
    }
}

fn failure_details(err: &TransferError) -> JsonValue {
    let mut details = json!({ "kind": err.kind() });
    let extra = match err {
        TransferError::Load(LoadError::Row {
            inserted,
            row_number,
            batch,
            row,
            ..
        }) => json!({
            "inserted": inserted,
            "row_number": row_number,
            "batch": batch,
            "row": row,
        }),
        TransferError::Load(LoadError::Cancelled { inserted }) => json!({ "inserted": inserted }),
        TransferError::Validation(ValidationError::NotEnoughJoinConditions {
            required,
            supplied,
        }) => json!({ "required": required, "supplied": supplied }),
        TransferError::Validation(ValidationError::NameCollision {
            sanitized,
            originals,
        }) => json!({ "sanitized": sanitized, "originals": originals }),
        TransferError::Schema { table, .. } => json!({ "table": table }),
        _ => JsonValue::Null,
    };

    if let (Some(target), JsonValue::Object(extra)) = (details.as_object_mut(), extra) {
        target.extend(extra);
    }
    details
}
