use serde_json::Value;

use crate::model::{Catalog, CategoryId, Descriptions, Entry};

const ALUMINIO_HINTS: [&str; 4] = ["/img_al/", "/alum", "aluminio", "/img/img_al"];
const CONSTRUCOES_HINTS: [&str; 3] = ["/img_cm", "/estrutura", "constru"];
const SERVICOS_HINTS: [&str; 3] = ["/img_ms", "/remates", "sol-"];

/// First-match classification of an image path; falls back to `aluminio`.
pub fn classify(path: &str) -> CategoryId {
    let s = path.to_lowercase();
    let hit = |hints: &[&str]| hints.iter().any(|h| s.contains(h));

    if hit(&ALUMINIO_HINTS) {
        CategoryId::Aluminio
    } else if hit(&CONSTRUCOES_HINTS) {
        CategoryId::Construcoes
    } else if hit(&SERVICOS_HINTS) {
        CategoryId::Servicos
    } else {
        CategoryId::Aluminio
    }
}

fn legacy_descriptions(entry: &Value) -> Descriptions {
    match entry.get("descriptions") {
        None | Some(Value::Null) => Descriptions::empty(),
        Some(v) => serde_json::from_value::<Descriptions>(v.clone()).unwrap_or_else(|e| {
            log::warn!("legacy descriptions ignored: {e}");
            Descriptions::empty()
        }),
    }
}

/// Converts `{ name: { images: [...], descriptions: {...} } }` into a catalog.
///
/// Never fails: anything malformed is skipped and whatever was collected is
/// returned. Each derived entry owns its own copy of the shared descriptions.
pub fn adapt(legacy: &Value) -> Catalog {
    let mut out = Catalog::new();

    let Some(map) = legacy.as_object() else {
        if !legacy.is_null() {
            log::warn!("legacy adapt: expected an object at the root");
        }
        return out;
    };

    for (name, entry) in map {
        let Some(images) = entry.get("images").and_then(|v| v.as_array()) else {
            log::debug!("legacy adapt: '{name}' has no images, skipped");
            continue;
        };

        let descriptions = legacy_descriptions(entry);

        for img in images {
            let Some(src) = img.as_str() else {
                log::warn!("legacy adapt: non-string image in '{name}' skipped");
                continue;
            };

            out.list_mut(classify(src)).push(Entry::with_descriptions(src, descriptions.clone()));
        }
    }

    out
}
