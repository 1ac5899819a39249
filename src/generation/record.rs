use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::generation::ImageSize;
use crate::store::Document;

/// A generation as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub id: String,
    pub prompt: String,
    pub style: Option<String>,
    pub size: String,
    pub image_url: String,
    pub width: u32,
    pub height: u32,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/generate`. Every field is optional on the wire so a
/// missing prompt reaches validation instead of failing deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
}

/// Fields the generation service hands to the record store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewGeneration {
    pub prompt: String,
    pub style: Option<String>,
    pub size: ImageSize,
    pub image_url: String,
    pub width: u32,
    pub height: u32,
}

impl NewGeneration {
    pub fn to_document(&self) -> Document {
        let value = json!({
            "prompt": self.prompt,
            "style": self.style,
            "size": self.size.keyword(),
            "image_url": self.image_url,
            "width": self.width,
            "height": self.height,
        });
        match value {
            Value::Object(map) => map,
            _ => Document::new(),
        }
    }

    pub fn into_record(self, id: String, created_at: DateTime<Utc>) -> GenerationRecord {
        GenerationRecord {
            id,
            prompt: self.prompt,
            style: self.style,
            size: self.size.keyword().to_string(),
            image_url: self.image_url,
            width: self.width,
            height: self.height,
            created_at,
        }
    }
}

/// A document read back from the store. Only `_id`, `prompt` and
/// `image_url` are required. `created_at` is kept raw and parsed leniently.
#[derive(Debug, Deserialize)]
pub(crate) struct StoredGeneration {
    #[serde(rename = "_id")]
    id: String,
    prompt: String,
    #[serde(default)]
    style: Option<String>,
    #[serde(default)]
    size: Option<String>,
    image_url: String,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    created_at: Option<Value>,
}

impl StoredGeneration {
    pub(crate) fn from_document(document: Document) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(document))
    }

    /// Missing dimensions come from the size; a missing or unreadable
    /// `created_at` becomes `now`.
    pub(crate) fn into_record(self, now: DateTime<Utc>) -> GenerationRecord {
        let size = self.size.unwrap_or_else(|| ImageSize::Square.keyword().to_string());
        let (default_width, default_height) = ImageSize::from_keyword(Some(&size)).dimensions();
        GenerationRecord {
            id: self.id,
            prompt: self.prompt,
            style: self.style,
            width: self.width.unwrap_or(default_width),
            height: self.height.unwrap_or(default_height),
            size,
            image_url: self.image_url,
            created_at: self.created_at.as_ref().and_then(parse_timestamp).unwrap_or(now),
        }
    }
}

/// RFC 3339 strings, naive `YYYY-MM-DD[ T]HH:MM:SS[.f]` strings read as UTC,
/// and extended-JSON `{"$date": ...}` wrappers around either.
fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(raw) => {
            let raw = raw.trim();
            if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
                return Some(parsed.with_timezone(&Utc));
            }
            ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
                .map(|naive| naive.and_utc())
        }
        Value::Object(map) => map.get("$date").and_then(parse_timestamp),
        _ => None,
    }
}
