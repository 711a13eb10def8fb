// Protocol Buffers encoding of the favorites listing
//
// The wire layout is not compiled in. A `.proto` definition is parsed at
// runtime into a descriptor pool, and every record is set field by field
// through the descriptor, so a record that does not fit the loaded schema is
// rejected before any bytes are produced.

use crate::error::{Error, Result};
use crate::record::FavoriteRecord;
use chrono::{DateTime, SecondsFormat, Utc};
use eyre::{Context, eyre};
use prost::Message;
use prost_reflect::{DescriptorPool, DynamicMessage, Kind, MessageDescriptor, ReflectMessage, Value};
use std::path::Path;
use tracing::{debug, info};

/// Schema used when no path is configured
pub const DEFAULT_SCHEMA: &str = include_str!("../../proto/favorites.proto");

const SCHEMA_FILE_NAME: &str = "favorites.proto";
const LIST_MESSAGE: &str = "recipebox.FavoriteList";
const LIST_FIELD: &str = "favorites";

/// Loaded binary schema for the collection-as-list encoding
#[derive(Debug, Clone)]
pub struct ListSchema {
    list: MessageDescriptor,
}

impl ListSchema {
    /// Parse a `.proto` source that defines `recipebox.FavoriteList`
    pub fn parse(source: &str) -> eyre::Result<Self> {
        let file = protox_parse::parse(SCHEMA_FILE_NAME, source).map_err(|e| eyre!("Failed to parse binary schema: {}", e))?;

        let mut pool = DescriptorPool::new();
        pool.add_file_descriptor_proto(file)
            .map_err(|e| eyre!("Invalid binary schema: {}", e))?;

        let list = pool
            .get_message_by_name(LIST_MESSAGE)
            .ok_or_else(|| eyre!("Binary schema does not define {}", LIST_MESSAGE))?;

        Ok(Self { list })
    }

    /// Load the schema from `path`, or the built-in definition if `None`
    pub async fn load(path: Option<&Path>) -> eyre::Result<Self> {
        let schema = match path {
            Some(path) => {
                let source = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read binary schema {}", path.display()))?;
                Self::parse(&source)?
            }
            None => Self::parse(DEFAULT_SCHEMA)?,
        };

        info!(schema = LIST_MESSAGE, "Binary schema loaded");
        Ok(schema)
    }

    fn entry_descriptor(&self) -> Result<MessageDescriptor> {
        let field = self
            .list
            .get_field_by_name(LIST_FIELD)
            .ok_or_else(|| Error::SchemaViolation(format!("{} has no '{}' field", LIST_MESSAGE, LIST_FIELD)))?;

        if !field.is_list() {
            return Err(Error::SchemaViolation(format!("'{}' is not a repeated field", LIST_FIELD)));
        }

        match field.kind() {
            Kind::Message(entry) => Ok(entry),
            other => Err(Error::SchemaViolation(format!(
                "'{}' holds {:?}, expected a message",
                LIST_FIELD, other
            ))),
        }
    }

    /// Validate `records` against the schema and encode them
    pub fn encode(&self, records: &[FavoriteRecord]) -> Result<Vec<u8>> {
        let entry_desc = self.entry_descriptor()?;

        let mut entries = Vec::with_capacity(records.len());
        for record in records {
            let mut entry = DynamicMessage::new(entry_desc.clone());
            set_field(&mut entry, "id", Value::I64(record.id))?;
            set_field(&mut entry, "external_id", Value::String(record.external_id.clone()))?;
            set_field(&mut entry, "name", Value::String(record.name.clone()))?;
            set_field(&mut entry, "category", Value::String(record.category.clone()))?;
            set_field(&mut entry, "instructions", Value::String(record.instructions_preview.clone()))?;
            set_field(
                &mut entry,
                "date_added",
                Value::String(record.date_added.to_rfc3339_opts(SecondsFormat::Millis, true)),
            )?;
            entries.push(Value::Message(entry));
        }

        let mut list = DynamicMessage::new(self.list.clone());
        set_field(&mut list, LIST_FIELD, Value::List(entries))?;

        let bytes = list.encode_to_vec();
        debug!(count = records.len(), bytes = bytes.len(), "Encoded favorites list");
        Ok(bytes)
    }

    /// Decode a binary favorites list back into records
    pub fn decode(&self, bytes: &[u8]) -> eyre::Result<Vec<FavoriteRecord>> {
        let list = DynamicMessage::decode(self.list.clone(), bytes).context("Failed to decode favorites list")?;

        let field = list
            .get_field_by_name(LIST_FIELD)
            .ok_or_else(|| eyre!("{} has no '{}' field", LIST_MESSAGE, LIST_FIELD))?;
        let entries = field
            .as_list()
            .ok_or_else(|| eyre!("'{}' is not a list", LIST_FIELD))?;

        entries
            .iter()
            .map(|value| {
                let entry = value.as_message().ok_or_else(|| eyre!("List entry is not a message"))?;
                let date_added = string_field(entry, "date_added")?;

                Ok(FavoriteRecord {
                    id: int_field(entry, "id")?,
                    external_id: string_field(entry, "external_id")?,
                    name: string_field(entry, "name")?,
                    category: string_field(entry, "category")?,
                    instructions_preview: string_field(entry, "instructions")?,
                    date_added: DateTime::parse_from_rfc3339(&date_added)
                        .with_context(|| format!("Invalid date_added: {}", date_added))?
                        .with_timezone(&Utc),
                })
            })
            .collect()
    }
}

fn set_field(message: &mut DynamicMessage, name: &str, value: Value) -> Result<()> {
    message
        .try_set_field_by_name(name, value)
        .map_err(|e| Error::SchemaViolation(format!("{}.{}: {}", message.descriptor().full_name(), name, e)))
}

fn string_field(message: &DynamicMessage, name: &str) -> eyre::Result<String> {
    message
        .get_field_by_name(name)
        .and_then(|v| v.as_str().map(str::to_string))
        .ok_or_else(|| eyre!("Missing string field '{}'", name))
}

fn int_field(message: &DynamicMessage, name: &str) -> eyre::Result<i64> {
    message
        .get_field_by_name(name)
        .and_then(|v| v.as_i64())
        .ok_or_else(|| eyre!("Missing integer field '{}'", name))
}
