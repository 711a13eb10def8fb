// Response encoding
//
// One payload, three wire formats. The encoder knows nothing about the
// transport; it only maps a payload and a format tag to bytes plus a
// content type.
//
// - `json`  - structured text, the default
// - `xml`   - markup with per-payload root elements
// - `proto` - Protocol Buffers, collection listing only

pub mod json;
pub mod proto;
pub mod xml;

use crate::error::{Error, Result};
use crate::pairing::PairingSuggestion;
use crate::record::{ErrorBody, FavoriteRecord};
use serde::Serialize;
use std::sync::{Arc, OnceLock};

pub use proto::ListSchema;

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_XML: &str = "application/xml";
pub const CONTENT_TYPE_PROTO: &str = "application/x-protobuf";

/// Wire format requested by the caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Default,
    Xml,
    Proto,
}

impl Format {
    /// Parse a format tag; absent or unknown tags select `Default`
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag.map(|t| t.trim().to_ascii_lowercase()).as_deref() {
            Some("xml") => Format::Xml,
            Some("proto") => Format::Proto,
            _ => Format::Default,
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Default => write!(f, "default"),
            Format::Xml => write!(f, "xml"),
            Format::Proto => write!(f, "proto"),
        }
    }
}

/// Anything a response can carry
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum Payload<'a> {
    Collection(&'a [FavoriteRecord]),
    Record(&'a FavoriteRecord),
    Error(&'a ErrorBody),
    Pairing(&'a PairingSuggestion),
    Empty,
}

/// Encoded response body
#[derive(Debug, Clone, PartialEq)]
pub struct Encoded {
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl Encoded {
    pub fn empty() -> Self {
        Self {
            content_type: CONTENT_TYPE_JSON,
            bytes: Vec::new(),
        }
    }
}

/// Holder for the binary schema, filled once after startup
///
/// Clones share the same slot, so a loader task can fill it while the
/// encoder is already serving requests.
#[derive(Debug, Clone, Default)]
pub struct SchemaSlot(Arc<OnceLock<ListSchema>>);

impl SchemaSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot that is ready from the start
    pub fn ready(schema: ListSchema) -> Self {
        let slot = Self::new();
        slot.fill(schema);
        slot
    }

    /// Store the schema; returns false if the slot was already filled
    pub fn fill(&self, schema: ListSchema) -> bool {
        self.0.set(schema).is_ok()
    }

    pub fn get(&self) -> Option<&ListSchema> {
        self.0.get()
    }

    pub fn is_ready(&self) -> bool {
        self.0.get().is_some()
    }
}

/// Selects and runs the encoder for a format tag
#[derive(Debug, Clone)]
pub struct FormatEncoder {
    schema: SchemaSlot,
}

impl FormatEncoder {
    pub fn new(schema: SchemaSlot) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &SchemaSlot {
        &self.schema
    }

    /// Encode `payload` in `format`
    ///
    /// Binary encoding only applies to collections; other payloads requested
    /// as `proto` are rendered as structured text.
    pub fn encode(&self, payload: Payload<'_>, format: Format) -> Result<Encoded> {
        match (format, payload) {
            (_, Payload::Empty) => Ok(Encoded::empty()),
            (Format::Xml, payload) => Ok(Encoded {
                content_type: CONTENT_TYPE_XML,
                bytes: xml::encode(payload)?,
            }),
            (Format::Proto, Payload::Collection(records)) => {
                let schema = self.schema.get().ok_or(Error::EncoderNotReady)?;
                Ok(Encoded {
                    content_type: CONTENT_TYPE_PROTO,
                    bytes: schema.encode(records)?,
                })
            }
            (_, payload) => Ok(Encoded {
                content_type: CONTENT_TYPE_JSON,
                bytes: json::encode(payload)?,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn records() -> Vec<FavoriteRecord> {
        vec![
            FavoriteRecord {
                id: 1,
                external_id: "52805".to_string(),
                name: "Best Cheese Pie".to_string(),
                category: "Dessert".to_string(),
                instructions_preview: "Preheat the oven to 180C...".to_string(),
                date_added: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            },
            FavoriteRecord {
                id: 2,
                external_id: "52772".to_string(),
                name: "Teriyaki Chicken Casserole".to_string(),
                category: "Chicken".to_string(),
                instructions_preview: "Preheat oven to 350° F...".to_string(),
                date_added: Utc.with_ymd_and_hms(2024, 5, 1, 12, 5, 30).unwrap() + chrono::Duration::milliseconds(42),
            },
        ]
    }

    fn ready_encoder() -> FormatEncoder {
        FormatEncoder::new(SchemaSlot::ready(ListSchema::parse(proto::DEFAULT_SCHEMA).unwrap()))
    }

    #[test]
    fn test_format_from_tag() {
        assert_eq!(Format::from_tag(None), Format::Default);
        assert_eq!(Format::from_tag(Some("default")), Format::Default);
        assert_eq!(Format::from_tag(Some("xml")), Format::Xml);
        assert_eq!(Format::from_tag(Some("XML")), Format::Xml);
        assert_eq!(Format::from_tag(Some("proto")), Format::Proto);
        assert_eq!(Format::from_tag(Some("yaml")), Format::Default);
        assert_eq!(Format::from_tag(Some("")), Format::Default);
    }

    #[test]
    fn test_content_types() {
        let encoder = ready_encoder();
        let records = records();

        let encoded = encoder.encode(Payload::Collection(&records), Format::Default).unwrap();
        assert_eq!(encoded.content_type, CONTENT_TYPE_JSON);
        let encoded = encoder.encode(Payload::Collection(&records), Format::Xml).unwrap();
        assert_eq!(encoded.content_type, CONTENT_TYPE_XML);
        let encoded = encoder.encode(Payload::Collection(&records), Format::Proto).unwrap();
        assert_eq!(encoded.content_type, CONTENT_TYPE_PROTO);
    }

    #[test]
    fn test_round_trip_across_formats() {
        #[derive(serde::Deserialize)]
        struct Document {
            #[serde(default)]
            recipe: Vec<FavoriteRecord>,
        }

        let encoder = ready_encoder();
        let records = records();

        let json = encoder.encode(Payload::Collection(&records), Format::Default).unwrap();
        let from_json: Vec<FavoriteRecord> = serde_json::from_slice(&json.bytes).unwrap();

        let xml = encoder.encode(Payload::Collection(&records), Format::Xml).unwrap();
        let from_xml: Document = quick_xml::de::from_str(std::str::from_utf8(&xml.bytes).unwrap()).unwrap();

        let proto = encoder.encode(Payload::Collection(&records), Format::Proto).unwrap();
        let from_proto = encoder.schema().get().unwrap().decode(&proto.bytes).unwrap();

        assert_eq!(from_json, records);
        assert_eq!(from_xml.recipe, records);
        assert_eq!(from_proto, records);
    }

    #[test]
    fn test_encoding_is_stable() {
        let encoder = ready_encoder();
        let records = records();

        for format in [Format::Default, Format::Xml, Format::Proto] {
            let first = encoder.encode(Payload::Collection(&records), format).unwrap();
            let second = encoder.encode(Payload::Collection(&records), format).unwrap();
            assert_eq!(first, second, "format {} is not stable", format);
        }
    }

    #[test]
    fn test_proto_not_ready() {
        let encoder = FormatEncoder::new(SchemaSlot::new());
        let records = records();

        let result = encoder.encode(Payload::Collection(&records), Format::Proto);
        assert!(matches!(result, Err(Error::EncoderNotReady)));

        // Other formats are unaffected
        assert!(encoder.encode(Payload::Collection(&records), Format::Xml).is_ok());
    }

    #[test]
    fn test_slot_filled_later_is_seen_by_encoder() {
        let slot = SchemaSlot::new();
        let encoder = FormatEncoder::new(slot.clone());
        assert!(!encoder.schema().is_ready());

        assert!(slot.fill(ListSchema::parse(proto::DEFAULT_SCHEMA).unwrap()));
        assert!(!slot.fill(ListSchema::parse(proto::DEFAULT_SCHEMA).unwrap()));
        assert!(encoder.encode(Payload::Collection(&records()), Format::Proto).is_ok());
    }

    #[test]
    fn test_proto_for_single_record_falls_back_to_json() {
        let encoder = FormatEncoder::new(SchemaSlot::new());
        let records = records();

        let encoded = encoder.encode(Payload::Record(&records[0]), Format::Proto).unwrap();
        assert_eq!(encoded.content_type, CONTENT_TYPE_JSON);

        let body = ErrorBody::new("nope");
        let encoded = encoder.encode(Payload::Error(&body), Format::Proto).unwrap();
        assert_eq!(encoded.bytes, br#"{"message":"nope"}"#);
    }

    #[test]
    fn test_empty_payload_has_no_body() {
        let encoder = ready_encoder();
        for format in [Format::Default, Format::Xml, Format::Proto] {
            assert!(encoder.encode(Payload::Empty, format).unwrap().bytes.is_empty());
        }
    }
}
