use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Serialize to deterministic bincode bytes
pub fn to_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, CoreError> {
    bincode::serialize(value).map_err(|e| CoreError::Serialization(e.to_string()))
}

/// Serialize to pretty JSON string (wallet handoff format)
pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<String, CoreError> {
    serde_json::to_string_pretty(value).map_err(|e| CoreError::Serialization(e.to_string()))
}

/// Deserialize from JSON string
pub fn from_json<'a, T: Deserialize<'a>>(json: &'a str) -> Result<T, CoreError> {
    serde_json::from_str(json).map_err(|e| CoreError::Deserialization(e.to_string()))
}

/// Deserialize from an already parsed JSON value (object content fields)
pub fn from_json_value<T: for<'de> Deserialize<'de>>(value: serde_json::Value) -> Result<T, CoreError> {
    serde_json::from_value(value).map_err(|e| CoreError::Deserialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CoinObject, CoinType, ObjectId};

    fn coin() -> CoinObject {
        CoinObject {
            coin_type: CoinType::parse("0x2::rwas::RWAS").unwrap(),
            coin_object_id: ObjectId::from_u8(7),
            version: 3,
            balance: 4_000,
        }
    }

    #[test]
    fn test_bincode_is_deterministic() {
        assert_eq!(to_bytes(&coin()).unwrap(), to_bytes(&coin()).unwrap());
    }

    #[test]
    fn test_pretty_json_uses_wire_field_names() {
        let json = to_json_pretty(&coin()).unwrap();
        assert!(json.contains("\"coinObjectId\""));
        assert_eq!(from_json::<CoinObject>(&json).unwrap(), coin());
    }

    #[test]
    fn test_json_errors_are_deserialization_errors() {
        let err = from_json::<CoinObject>("{\"balance\": \"nope\"}").unwrap_err();
        assert!(matches!(err, CoreError::Deserialization(_)));
        let err = from_json_value::<CoinObject>(serde_json::json!([1, 2])).unwrap_err();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }
}
