//! Note row model and its column encodings.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One row of the `notes` table.
///
/// When `encrypted` is true, `title` and `content` hold envelope blobs and
/// are opaque to the store.  The serde shape doubles as the legacy
/// `notes.json` interchange format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRecord {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub encrypted: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn encode_tags(tags: &[String]) -> serde_json::Result<String> {
    serde_json::to_string(tags)
}

/// `NULL`, `""` and `null` all mean "no tags".  Malformed JSON is treated
/// the same way, with a warning, so one bad column doesn't hide a note.
pub(crate) fn decode_tags(id: &str, raw: Option<&str>) -> Vec<String> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Vec::new(),
        Some(raw) => raw,
    };
    match serde_json::from_str::<Option<Vec<String>>>(raw) {
        Ok(tags) => tags.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(note_id = %id, error = %e, "unreadable tags column, treating as empty");
            Vec::new()
        }
    }
}

pub(crate) fn encode_time(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Unparsable timestamps decode to the Unix epoch instead of failing the read.
pub(crate) fn decode_time(raw: Option<&str>) -> DateTime<Utc> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}
