// Favorite record types shared by the repository and every encoder

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored favorite recipe
///
/// This is the single shape every wire format is derived from. Field names on
/// the wire are camelCase; the instructions preview travels as `instructions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRecord {
    /// Process-local id assigned by the repository
    pub id: i64,
    /// Catalog id, used as the deduplication key
    pub external_id: String,
    pub name: String,
    pub category: String,
    #[serde(rename = "instructions")]
    pub instructions_preview: String,
    pub date_added: DateTime<Utc>,
}

/// A normalized catalog entry that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub external_id: String,
    pub name: String,
    pub category: String,
    pub instructions_preview: String,
    pub date_added: DateTime<Utc>,
}

impl Candidate {
    /// Attach a repository id, producing the stored form
    pub(crate) fn into_record(self, id: i64) -> FavoriteRecord {
        FavoriteRecord {
            id,
            external_id: self.external_id,
            name: self.name,
            category: self.category,
            instructions_preview: self.instructions_preview,
            date_added: self.date_added,
        }
    }
}

/// Error body returned to clients in whatever format they asked for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_candidate_into_record() {
        let added = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let candidate = Candidate {
            external_id: "52805".to_string(),
            name: "Cheese Pie".to_string(),
            category: "Dessert".to_string(),
            instructions_preview: "Preheat...".to_string(),
            date_added: added,
        };

        let record = candidate.into_record(4);
        assert_eq!(record.id, 4);
        assert_eq!(record.external_id, "52805");
        assert_eq!(record.date_added, added);
    }

    #[test]
    fn test_wire_field_names() {
        let record = FavoriteRecord {
            id: 1,
            external_id: "52805".to_string(),
            name: "Cheese Pie".to_string(),
            category: "Dessert".to_string(),
            instructions_preview: "Preheat...".to_string(),
            date_added: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"externalId\":\"52805\""));
        assert!(json.contains("\"instructions\":\"Preheat...\""));
        assert!(json.contains("\"dateAdded\":"));
        assert!(!json.contains("instructionsPreview"));
    }
}
