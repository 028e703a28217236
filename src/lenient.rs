//! Field-level tolerant decoding for loosely typed JSON sources.
//!
//! Schema structs mark every optional field with
//! `#[serde(default, deserialize_with = "lenient")]`: a value of the wrong
//! shape decodes to `None` instead of failing the whole record, and the
//! mapping code applies the documented default.

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Either a single value or a list of values, as JSON-LD and model output
/// freely mix both. `Many` is tried first so a list never decodes as a
/// single catch-all item.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }

    pub(crate) fn into_first(self) -> Option<T> {
        self.into_vec().into_iter().next()
    }
}

/// A JSON scalar that may stand for text: strings, numbers, or an object
/// carrying `text`/`name`. Anything else is kept as `Other` and ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum TextValue {
    Text(String),
    Number(serde_json::Number),
    Object {
        text: Option<String>,
        name: Option<String>,
    },
    Other(IgnoredAny),
}

impl TextValue {
    pub(crate) fn into_text(self) -> Option<String> {
        match self {
            TextValue::Text(text) => Some(text),
            TextValue::Number(number) => Some(number.to_string()),
            TextValue::Object { text, name } => text.or(name),
            TextValue::Other(_) => None,
        }
    }
}

/// Read a non-negative whole number from a JSON number, tolerating `4.0`.
pub(crate) fn whole_number(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    value
        .as_f64()
        .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= f64::from(u32::MAX))
        .map(|f| f as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "lenient")]
        count: Option<u32>,
        #[serde(default, deserialize_with = "lenient")]
        tags: Option<OneOrMany<String>>,
    }

    #[test]
    fn test_wrong_type_becomes_none() {
        let sample: Sample = serde_json::from_value(json!({"count": "four", "tags": 7})).unwrap();
        assert!(sample.count.is_none());
        assert!(sample.tags.is_none());
    }

    #[test]
    fn test_missing_fields_default() {
        let sample: Sample = serde_json::from_value(json!({})).unwrap();
        assert!(sample.count.is_none());
        assert!(sample.tags.is_none());
    }

    #[test]
    fn test_one_or_many() {
        let sample: Sample = serde_json::from_value(json!({"tags": "soup"})).unwrap();
        assert_eq!(sample.tags.unwrap().into_vec(), vec!["soup"]);
        let sample: Sample = serde_json::from_value(json!({"tags": ["a", "b"]})).unwrap();
        assert_eq!(sample.tags.unwrap().into_first(), Some("a".to_string()));
    }

    #[test]
    fn test_text_value_variants() {
        let values: Vec<TextValue> =
            serde_json::from_value(json!(["Dinner", 4, {"text": "Stir"}, {"name": "Chef"}, true]))
                .unwrap();
        let texts: Vec<_> = values.into_iter().map(TextValue::into_text).collect();
        assert_eq!(
            texts,
            vec![
                Some("Dinner".to_string()),
                Some("4".to_string()),
                Some("Stir".to_string()),
                Some("Chef".to_string()),
                None
            ]
        );
    }

    #[test]
    fn test_whole_number() {
        assert_eq!(whole_number(&json!(4)), Some(4));
        assert_eq!(whole_number(&json!(4.0)), Some(4));
        assert_eq!(whole_number(&json!(4.5)), None);
        assert_eq!(whole_number(&json!(-2)), None);
        assert_eq!(whole_number(&json!("4")), None);
    }
}
