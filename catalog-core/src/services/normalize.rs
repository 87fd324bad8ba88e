use std::collections::HashSet;

use crate::model::{Catalog, CategoryId};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct NormalizeReport {
    pub completed_descriptions: usize,
    pub removed: usize,
}

/// Gives every entry all four description languages. Returns how many entries changed.
pub fn ensure_descriptions(catalog: &mut Catalog) -> usize {
    let mut changed = 0usize;

    for id in CategoryId::ALL {
        for e in catalog.list_mut(id).iter_mut() {
            if e.descriptions.ensure_complete() {
                changed += 1;
            }
        }
    }

    changed
}

/// Per category, keeps the first entry for each `src` and drops src-less ones.
/// Returns how many entries were removed.
pub fn remove_duplicates(catalog: &mut Catalog) -> usize {
    let mut removed = 0usize;

    for id in CategoryId::ALL {
        let list = catalog.list_mut(id);
        let before = list.len();

        let mut seen: HashSet<String> = HashSet::with_capacity(before);
        list.retain(|e| match e.src() {
            Some(src) => seen.insert(src.to_string()),
            None => false,
        });

        removed += before - list.len();
    }

    removed
}

pub fn normalize(catalog: &mut Catalog) -> NormalizeReport {
    let completed_descriptions = ensure_descriptions(catalog);
    let removed = remove_duplicates(catalog);

    if removed > 0 {
        log::info!("normalize: dropped {removed} duplicate or src-less entries");
    }

    NormalizeReport {
        completed_descriptions,
        removed,
    }
}
