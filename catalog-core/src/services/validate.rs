use serde::{Deserialize, Serialize};

use crate::model::{Catalog, CategoryId};

/// An entry whose `src` does not live under its category folder.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PathIssue {
    pub category: CategoryId,
    pub src: String,
    pub expected_prefix: String,
}

pub fn validate_paths(catalog: &Catalog) -> Vec<PathIssue> {
    let mut issues: Vec<PathIssue> = Vec::new();

    for (id, list) in catalog.iter() {
        let folder = id.folder();

        for e in list {
            // src-less entries are the normalizer's business
            let Some(src) = e.src() else {
                continue;
            };

            if !src.starts_with(folder) {
                issues.push(PathIssue {
                    category: id,
                    src: src.to_string(),
                    expected_prefix: folder.to_string(),
                });
            }
        }
    }

    issues
}
