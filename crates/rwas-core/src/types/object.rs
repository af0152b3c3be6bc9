use serde::{Deserialize, Serialize};

use crate::types::address::ObjectId;

/// An object as returned by an object-content fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectData {
    pub object_id: ObjectId,
    pub version: u64,
    /// Absent when the ledger did not return content for the object
    #[serde(default)]
    pub content: Option<ObjectContent>,
}

/// Parsed object content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "dataType", rename_all = "camelCase")]
pub enum ObjectContent {
    /// A Move struct instance; `fields` mirrors the struct layout as JSON
    MoveObject {
        #[serde(rename = "type")]
        type_: String,
        fields: serde_json::Value,
    },
    /// A published package carries no fields
    Package,
}

impl ObjectContent {
    pub fn fields(&self) -> Option<&serde_json::Value> {
        match self {
            ObjectContent::MoveObject { fields, .. } => Some(fields),
            ObjectContent::Package => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_tagged_by_data_type() {
        let object: ObjectData = serde_json::from_value(json!({
            "objectId": "0x6",
            "version": 3,
            "content": {
                "dataType": "moveObject",
                "type": "0x2::clock::Clock",
                "fields": { "timestamp_ms": "1700000000000" }
            }
        }))
        .unwrap();

        assert_eq!(object.object_id, ObjectId::CLOCK);
        let fields = object.content.as_ref().and_then(|c| c.fields()).unwrap();
        assert_eq!(fields["timestamp_ms"], "1700000000000");
    }

    #[test]
    fn test_package_has_no_fields() {
        let content: ObjectContent = serde_json::from_value(json!({ "dataType": "package" })).unwrap();
        assert!(content.fields().is_none());
    }
}
