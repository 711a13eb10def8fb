// Markup (XML) encoding
//
// Collections render as <favorites> with one <recipe> child per record.
// A single record renders as <recipe>, an error as <error>.
// Characters XML 1.0 forbids (most C0 controls, U+FFFE, U+FFFF) become U+FFFD.

use super::Payload;
use crate::error::{Error, Result};
use crate::record::FavoriteRecord;
use serde::Serialize;

pub const COLLECTION_ROOT: &str = "favorites";
pub const RECORD_ROOT: &str = "recipe";
pub const ERROR_ROOT: &str = "error";
pub const PAIRING_ROOT: &str = "pairing";

#[derive(Serialize)]
struct FavoritesDocument<'a> {
    recipe: &'a [FavoriteRecord],
}

pub fn encode(payload: Payload<'_>) -> Result<Vec<u8>> {
    let xml = match payload {
        Payload::Collection(records) => {
            quick_xml::se::to_string_with_root(COLLECTION_ROOT, &FavoritesDocument { recipe: records })
        }
        Payload::Record(record) => quick_xml::se::to_string_with_root(RECORD_ROOT, record),
        Payload::Error(body) => quick_xml::se::to_string_with_root(ERROR_ROOT, body),
        Payload::Pairing(suggestion) => quick_xml::se::to_string_with_root(PAIRING_ROOT, suggestion),
        Payload::Empty => return Ok(Vec::new()),
    }
    .map_err(|e| Error::Encoding(e.to_string()))?;

    Ok(replace_forbidden_chars(xml).into_bytes())
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{FFFD}' | '\u{10000}'..)
}

fn replace_forbidden_chars(xml: String) -> String {
    if xml.chars().all(is_xml_char) {
        return xml;
    }
    xml.chars()
        .map(|c| if is_xml_char(c) { c } else { char::REPLACEMENT_CHARACTER })
        .collect()
}
