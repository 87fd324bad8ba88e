use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Languages every entry carries after normalization, in output order.
pub const LANGUAGES: [&str; 4] = ["pt", "en", "es", "fr"];

/// Description text as typed in by hand: numbers and booleans are kept as
/// their text, anything else that is not a string reads as missing.
fn lenient_text<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(de)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other) => {
            log::warn!("description value {other} is not text, treated as missing");
            None
        }
    })
}

fn lenient_src<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(de)? {
        Some(Value::String(s)) => Some(s),
        None | Some(Value::Null) => None,
        Some(other) => {
            log::warn!("entry src {other} is not a string");
            None
        }
    })
}

/// A description map that is not an object is replaced by an empty one.
fn lenient_descriptions<'de, D>(de: D) -> Result<Descriptions, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(de)? {
        None | Some(Value::Null) => Ok(Descriptions::default()),
        Some(v @ Value::Object(_)) => Ok(serde_json::from_value(v).unwrap_or_else(|e| {
            log::warn!("descriptions unreadable, starting empty: {e}");
            Descriptions::default()
        })),
        Some(other) => {
            log::warn!("descriptions {other} is not an object, starting empty");
            Ok(Descriptions::default())
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Descriptions {
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub pt: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub en: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub es: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub fr: Option<String>,

    /// Languages beyond the four managed ones are carried through untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Descriptions {
    /// All four languages present and empty.
    pub fn empty() -> Self {
        Self::new("", "", "", "")
    }

    pub fn new(
        pt: impl Into<String>,
        en: impl Into<String>,
        es: impl Into<String>,
        fr: impl Into<String>,
    ) -> Self {
        Self {
            pt: Some(pt.into()),
            en: Some(en.into()),
            es: Some(es.into()),
            fr: Some(fr.into()),
            extra: BTreeMap::new(),
        }
    }

    pub fn get(&self, lang: &str) -> Option<&str> {
        match lang {
            "pt" => self.pt.as_deref(),
            "en" => self.en.as_deref(),
            "es" => self.es.as_deref(),
            "fr" => self.fr.as_deref(),
            other => self.extra.get(other).and_then(|v| v.as_str()),
        }
    }

    /// Fills missing managed languages with `""`. Returns whether anything changed.
    pub fn ensure_complete(&mut self) -> bool {
        let mut changed = false;
        for slot in [&mut self.pt, &mut self.en, &mut self.es, &mut self.fr] {
            if slot.is_none() {
                *slot = Some(String::new());
                changed = true;
            }
        }
        changed
    }

    pub fn is_complete(&self) -> bool {
        self.pt.is_some() && self.en.is_some() && self.es.is_some() && self.fr.is_some()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Entry {
    #[serde(
        default,
        deserialize_with = "lenient_src",
        skip_serializing_if = "Option::is_none"
    )]
    pub src: Option<String>,

    #[serde(default, deserialize_with = "lenient_descriptions")]
    pub descriptions: Descriptions,

    /// Entry fields this editor does not manage, such as `title`.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Entry {
    /// New entry with all four descriptions empty.
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: Some(src.into()),
            descriptions: Descriptions::empty(),
            extra: BTreeMap::new(),
        }
    }

    pub fn with_descriptions(src: impl Into<String>, descriptions: Descriptions) -> Self {
        Self {
            src: Some(src.into()),
            descriptions,
            extra: BTreeMap::new(),
        }
    }

    /// `src` when present and non-empty.
    pub fn src(&self) -> Option<&str> {
        self.src.as_deref().filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_languages_are_none_until_completed() {
        let mut d: Descriptions = serde_json::from_str(r#"{ "pt": "Janela" }"#).unwrap();
        assert_eq!(d.get("pt"), Some("Janela"));
        assert_eq!(d.get("en"), None);

        assert!(d.ensure_complete());
        assert!(d.is_complete());
        assert_eq!(d.get("pt"), Some("Janela"));
        assert_eq!(d.get("fr"), Some(""));
        assert!(!d.ensure_complete());
    }

    #[test]
    fn extra_languages_survive_serialization() {
        let d: Descriptions =
            serde_json::from_str(r#"{ "pt": "a", "de": "Fenster" }"#).unwrap();
        assert_eq!(d.get("de"), Some("Fenster"));

        let out = serde_json::to_value(&d).unwrap();
        assert_eq!(out["de"], "Fenster");
        assert!(out.get("en").is_none());
    }

    #[test]
    fn null_descriptions_read_as_empty() {
        let e: Entry =
            serde_json::from_str(r#"{ "src": "img/img_al/a.jpg", "descriptions": null }"#)
                .unwrap();
        assert_eq!(e.src(), Some("img/img_al/a.jpg"));
        assert_eq!(e.descriptions, Descriptions::default());
    }

    #[test]
    fn odd_description_values_keep_the_entry() {
        let e: Entry = serde_json::from_str(
            r#"{ "src": "img/img_al/a.jpg", "descriptions": { "pt": 2024, "en": "x", "es": true, "fr": [1] } }"#,
        )
        .unwrap();
        assert_eq!(e.src(), Some("img/img_al/a.jpg"));
        assert_eq!(e.descriptions.get("pt"), Some("2024"));
        assert_eq!(e.descriptions.get("en"), Some("x"));
        assert_eq!(e.descriptions.get("es"), Some("true"));
        assert_eq!(e.descriptions.get("fr"), None);

        let e: Entry =
            serde_json::from_str(r#"{ "src": "img/img_al/b.jpg", "descriptions": "Janela" }"#)
                .unwrap();
        assert_eq!(e.src(), Some("img/img_al/b.jpg"));
        assert_eq!(e.descriptions, Descriptions::default());
    }

    #[test]
    fn unmanaged_entry_fields_round_trip() {
        let e: Entry = serde_json::from_str(
            r#"{ "src": "img/img_al/c.jpg", "title": "Porta", "descriptions": { "pt": "c" } }"#,
        )
        .unwrap();
        assert_eq!(e.extra.get("title"), Some(&Value::from("Porta")));

        let out = serde_json::to_value(&e).unwrap();
        assert_eq!(out["title"], "Porta");
        assert_eq!(out["src"], "img/img_al/c.jpg");
    }

    #[test]
    fn empty_src_counts_as_missing() {
        let e: Entry = serde_json::from_str(r#"{ "src": "" }"#).unwrap();
        assert_eq!(e.src(), None);
    }
}
