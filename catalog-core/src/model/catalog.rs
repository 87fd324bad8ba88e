use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::category::CategoryId;
use super::entry::Entry;

/// Accepts `null` for the whole list. Elements that are not objects become
/// src-less placeholders, dropped on normalization. An element with a string
/// `src` always keeps it.
fn lenient_entries<'de, D>(de: D) -> Result<Vec<Entry>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(de)?.unwrap_or_default();

    Ok(raw.into_iter().map(entry_from_value).collect())
}

fn entry_from_value(v: Value) -> Entry {
    if !v.is_object() {
        if !v.is_null() {
            log::warn!("catalog entry {v} is not an object, kept as placeholder");
        }
        return Entry::default();
    }

    let src = v.get("src").and_then(|s| s.as_str()).map(str::to_string);
    serde_json::from_value::<Entry>(v).unwrap_or_else(|e| {
        log::warn!("catalog entry partly unreadable: {e}");
        Entry {
            src,
            ..Entry::default()
        }
    })
}

/// The three category lists, serialized in definition order.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Catalog {
    #[serde(default, deserialize_with = "lenient_entries")]
    pub aluminio: Vec<Entry>,

    #[serde(default, deserialize_with = "lenient_entries")]
    pub construcoes: Vec<Entry>,

    #[serde(default, deserialize_with = "lenient_entries")]
    pub servicos: Vec<Entry>,
}

impl Catalog {
    /// Empty skeleton: all three categories present, no entries.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when `doc` has any category key with a non-null value.
    pub fn is_current_shape(doc: &Value) -> bool {
        CategoryId::ALL
            .iter()
            .any(|id| doc.get(id.as_str()).is_some_and(|v| !v.is_null()))
    }

    pub fn from_value(doc: Value) -> serde_json::Result<Self> {
        serde_json::from_value(doc)
    }

    pub fn list(&self, id: CategoryId) -> &Vec<Entry> {
        match id {
            CategoryId::Aluminio => &self.aluminio,
            CategoryId::Construcoes => &self.construcoes,
            CategoryId::Servicos => &self.servicos,
        }
    }

    pub fn list_mut(&mut self, id: CategoryId) -> &mut Vec<Entry> {
        match id {
            CategoryId::Aluminio => &mut self.aluminio,
            CategoryId::Construcoes => &mut self.construcoes,
            CategoryId::Servicos => &mut self.servicos,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (CategoryId, &Vec<Entry>)> {
        CategoryId::ALL.into_iter().map(move |id| (id, self.list(id)))
    }

    pub fn contains_src(&self, id: CategoryId, src: &str) -> bool {
        self.list(id).iter().any(|e| e.src() == Some(src))
    }

    pub fn len(&self) -> usize {
        self.aluminio.len() + self.construcoes.len() + self.servicos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pretty JSON with two-space indentation.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
