//! Serde helpers for the boundary JSON shape

/// Default for a note's `velocity` when the field is absent
pub fn default_velocity() -> i32 {
    super::defaults::DEFAULT_VELOCITY
}

pub fn default_curve_color() -> String {
    "#FF6B6B".to_string()
}

pub fn default_line_width() -> f64 {
    2.0
}

pub fn default_y_max() -> f64 {
    super::defaults::PIANO_ROLL_HEIGHT
}

/// Read a number field from a JSON object, if present and numeric
pub fn get_f64(map: &serde_json::Map<String, serde_json::Value>, key: &str) -> Option<f64> {
    map.get(key).and_then(serde_json::Value::as_f64)
}

/// Read a non-negative integer field that fits in `u32`
pub fn get_u32(map: &serde_json::Map<String, serde_json::Value>, key: &str) -> Option<u32> {
    map.get(key)
        .and_then(serde_json::Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
}

pub fn get_string(map: &serde_json::Map<String, serde_json::Value>, key: &str) -> Option<String> {
    map.get(key).and_then(serde_json::Value::as_str).map(str::to_string)
}

/// A string field that ignores values of any other type (read as empty)
pub fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(string_or_none(deserializer)?.unwrap_or_default())
}

/// An optional string field; values of any other type read as `None`
pub fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match <serde_json::Value as serde::Deserialize>::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

/// True for JSON values that carry no data (null, `{}`, `[]`, `""`)
pub fn is_blank(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::Object(map) => map.is_empty(),
        serde_json::Value::Array(items) => items.is_empty(),
        serde_json::Value::String(s) => s.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_readers() {
        let value = json!({"tempo": 90, "ppqn": 960, "mode": "draw", "neg": -1});
        let map = value.as_object().unwrap();

        assert_eq!(get_f64(map, "tempo"), Some(90.0));
        assert_eq!(get_u32(map, "ppqn"), Some(960));
        assert_eq!(get_u32(map, "neg"), None);
        assert_eq!(get_string(map, "mode"), Some("draw".to_string()));
        assert_eq!(get_f64(map, "missing"), None);
    }

    #[derive(serde::Deserialize)]
    struct Labels {
        #[serde(default, deserialize_with = "string_or_empty")]
        id: String,
        #[serde(default, deserialize_with = "string_or_none")]
        lyric: Option<String>,
    }

    #[test]
    fn test_lenient_strings() {
        let labels: Labels = serde_json::from_value(json!({"id": 7, "lyric": "la"})).unwrap();
        assert_eq!(labels.id, "");
        assert_eq!(labels.lyric.as_deref(), Some("la"));

        let labels: Labels = serde_json::from_value(json!({"id": "n1", "lyric": ["x"]})).unwrap();
        assert_eq!(labels.id, "n1");
        assert_eq!(labels.lyric, None);

        let labels: Labels = serde_json::from_value(json!({})).unwrap();
        assert_eq!(labels.id, "");
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(&json!(null)));
        assert!(is_blank(&json!({})));
        assert!(!is_blank(&json!({"notes": []})));
        assert!(!is_blank(&json!(0)));
    }
}
