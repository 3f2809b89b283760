//! Blocklist document and the rules shared by every operation on it.
//!
//! The persisted layout is a single JSON object:
//!
//! ```json
//! {
//!   "fixedExtensions": [{ "extension": "bat", "blocked": 0 }],
//!   "customExtensions": [{ "extension": "sh", "created_at": "2024-05-01T09:30:00.000Z" }]
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifiers seeded into a fresh document, all unblocked.
pub const DEFAULT_FIXED_EXTENSIONS: [&str; 7] = ["bat", "cmd", "com", "cpl", "exe", "scr", "js"];

/// Upper bound on user-added extensions.
pub const MAX_CUSTOM_EXTENSIONS: usize = 200;

/// Longest accepted identifier, in characters, after normalization.
pub const MAX_EXTENSION_LEN: usize = 20;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FixedExtension {
    pub extension: String,
    #[serde(with = "bool_as_int")]
    pub blocked: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomExtension {
    pub extension: String,
    #[serde(with = "iso8601_millis")]
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BlocklistDocument {
    pub fixed_extensions: Vec<FixedExtension>,
    pub custom_extensions: Vec<CustomExtension>,
}

impl Default for BlocklistDocument {
    fn default() -> Self {
        Self {
            fixed_extensions: DEFAULT_FIXED_EXTENSIONS
                .iter()
                .map(|ext| FixedExtension { extension: (*ext).to_string(), blocked: false })
                .collect(),
            custom_extensions: Vec::new(),
        }
    }
}

impl BlocklistDocument {
    pub fn is_fixed(&self, extension: &str) -> bool {
        self.fixed_extensions.iter().any(|e| e.extension == extension)
    }

    pub fn has_custom(&self, extension: &str) -> bool {
        self.custom_extensions.iter().any(|e| e.extension == extension)
    }
}

/// Computed view of everything currently blocked.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockedExtensions {
    pub fixed: Vec<String>,
    pub custom: Vec<String>,
    pub all: Vec<String>,
}

impl From<&BlocklistDocument> for BlockedExtensions {
    fn from(doc: &BlocklistDocument) -> Self {
        let fixed: Vec<String> = doc
            .fixed_extensions
            .iter()
            .filter(|e| e.blocked)
            .map(|e| e.extension.clone())
            .collect();
        let custom: Vec<String> = doc.custom_extensions.iter().map(|e| e.extension.clone()).collect();
        let all = fixed.iter().chain(custom.iter()).cloned().collect();
        Self { fixed, custom, all }
    }
}

/// Lowercase, trim surrounding whitespace, then drop every leading `.`.
pub fn normalize_extension(raw: &str) -> String {
    raw.to_lowercase().trim().trim_start_matches('.').to_string()
}

/// Loose truthiness used for the toggle body: `false`, `null`, `0` and `""` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// `blocked` is stored as `0|1`; older files written by hand may carry a boolean.
mod bool_as_int {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u8(u8::from(*value))
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Bool(bool),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        match Raw::deserialize(d)? {
            Raw::Int(1) => Ok(true),
            Raw::Int(0) => Ok(false),
            Raw::Int(other) => Err(de::Error::custom(format!("blocked must be 0 or 1, got {other}"))),
            Raw::Bool(b) => Ok(b),
        }
    }
}

mod iso8601_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(de::Error::custom)
    }
}
