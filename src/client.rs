// Fetch the binary favorites listing from a running server

use crate::format::{CONTENT_TYPE_PROTO, ListSchema};
use crate::record::FavoriteRecord;
use eyre::{Context, Result, eyre};
use tracing::debug;

/// Decoded listing plus the size of the payload it came from
#[derive(Debug, Clone)]
pub struct FetchedList {
    pub byte_len: usize,
    pub records: Vec<FavoriteRecord>,
}

pub async fn fetch_favorites(http: &reqwest::Client, base_url: &str, schema: &ListSchema) -> Result<FetchedList> {
    let url = format!("{}/api/favorites", base_url.trim_end_matches('/'));
    let response = http
        .get(&url)
        .query(&[("format", "proto")])
        .send()
        .await
        .with_context(|| format!("Failed to reach {}", url))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(eyre!("Server answered {}: {}", status, body));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    if content_type != CONTENT_TYPE_PROTO {
        return Err(eyre!("Expected {}, got '{}'", CONTENT_TYPE_PROTO, content_type));
    }

    let bytes = response.bytes().await.context("Failed to read response body")?;
    debug!(bytes = bytes.len(), "Received binary listing");

    Ok(FetchedList {
        byte_len: bytes.len(),
        records: schema.decode(&bytes)?,
    })
}
