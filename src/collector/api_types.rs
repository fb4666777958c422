use super::{CollectorError, Result};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Envelope fields holding the record list, in lookup order
const ENVELOPE_KEYS: [&str; 2] = ["list", "data"];

/// Raw VOD record as returned by `api.php/provide/vod`
///
/// Collectors are loose about types (`vod_id` and `vod_year` come back as
/// numbers or strings), so every field is read leniently.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VodRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub vod_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub vod_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub type_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub vod_year: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub vod_area: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub vod_director: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub vod_actor: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub vod_content: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub vod_play_from: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub vod_play_url: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// Extract the record list from a collector response body.
///
/// `list` is preferred over `data`; the first of them holding an array wins.
pub fn normalize_envelope(body: Value) -> Result<Vec<Value>> {
    let Value::Object(mut map) = body else {
        return Err(CollectorError::UnknownEnvelope(Vec::new()));
    };

    for key in ENVELOPE_KEYS {
        if !map.get(key).is_some_and(Value::is_array) {
            continue;
        }
        if let Some(Value::Array(items)) = map.remove(key) {
            return Ok(items);
        }
    }

    Err(CollectorError::UnknownEnvelope(map.keys().cloned().collect()))
}
