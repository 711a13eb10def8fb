// Structured text (JSON) encoding

use super::Payload;
use crate::error::{Error, Result};

/// Field-preserving JSON rendering of the payload shape
pub fn encode(payload: Payload<'_>) -> Result<Vec<u8>> {
    if let Payload::Empty = payload {
        return Ok(Vec::new());
    }
    serde_json::to_vec(&payload).map_err(|e| Error::Encoding(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ErrorBody, FavoriteRecord};
    use chrono::{TimeZone, Utc};

    fn record() -> FavoriteRecord {
        FavoriteRecord {
            id: 1,
            external_id: "52805".to_string(),
            name: "Cheese Pie".to_string(),
            category: "Dessert".to_string(),
            instructions_preview: "Preheat the oven...".to_string(),
            date_added: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_collection_is_array() {
        let records = vec![record()];
        let bytes = encode(Payload::Collection(&records)).unwrap();

        let decoded: Vec<FavoriteRecord> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(decoded, records);
        assert_eq!(bytes[0], b'[');
    }

    #[test]
    fn test_empty_collection() {
        assert_eq!(encode(Payload::Collection(&[])).unwrap(), b"[]");
    }

    #[test]
    fn test_single_record_is_object() {
        let bytes = encode(Payload::Record(&record())).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["externalId"], "52805");
        assert_eq!(value["dateAdded"], "2024-05-01T12:00:00Z");
    }

    #[test]
    fn test_error_body() {
        let body = ErrorBody::new("Favorite not found: 9");
        let bytes = encode(Payload::Error(&body)).unwrap();
        assert_eq!(bytes, br#"{"message":"Favorite not found: 9"}"#);
    }

    #[test]
    fn test_empty_payload() {
        assert!(encode(Payload::Empty).unwrap().is_empty());
    }
}
