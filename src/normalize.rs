// Catalog entry -> favorite candidate

use crate::catalog::MealEntry;
use crate::error::{Error, Result};
use crate::record::Candidate;
use chrono::{DateTime, SubsecRound, Utc};

/// Preview length kept for stored favorites
pub const FAVORITE_PREVIEW_CHARS: usize = 100;

pub const TRUNCATION_MARKER: &str = "...";

/// First `limit` characters of `text` followed by the truncation marker
///
/// Counts characters, not bytes, so multi-byte text is never split.
pub fn truncate_preview(text: &str, limit: usize) -> String {
    let mut preview: String = text.chars().take(limit).collect();
    preview.push_str(TRUNCATION_MARKER);
    preview
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| Error::UpstreamError(format!("catalog entry is missing {}", field)))
}

/// Build a candidate from a catalog lookup result
///
/// `term` is the name that was searched for; `now` becomes `date_added`
/// (millisecond precision, so every wire format carries it exactly).
pub fn normalize_meal(entry: Option<MealEntry>, term: &str, now: DateTime<Utc>) -> Result<Candidate> {
    let meal = entry.ok_or_else(|| Error::UpstreamNotFound(term.to_string()))?;

    let instructions = required(meal.instructions, "strInstructions")?;

    Ok(Candidate {
        external_id: required(meal.id, "idMeal")?,
        name: required(meal.name, "strMeal")?,
        category: meal.category.unwrap_or_default(),
        instructions_preview: truncate_preview(&instructions, FAVORITE_PREVIEW_CHARS),
        date_added: now.trunc_subsecs(3),
    })
}
