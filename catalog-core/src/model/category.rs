use serde::{Deserialize, Serialize};

use crate::error::CmsError;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CategoryId {
    Aluminio,
    Construcoes,
    Servicos,
}

impl CategoryId {
    pub const ALL: [CategoryId; 3] = [
        CategoryId::Aluminio,
        CategoryId::Construcoes,
        CategoryId::Servicos,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CategoryId::Aluminio => "aluminio",
            CategoryId::Construcoes => "construcoes",
            CategoryId::Servicos => "servicos",
        }
    }

    pub fn def(self) -> &'static CategoryDef {
        match self {
            CategoryId::Aluminio => &CATEGORIES[0],
            CategoryId::Construcoes => &CATEGORIES[1],
            CategoryId::Servicos => &CATEGORIES[2],
        }
    }

    pub fn folder(self) -> &'static str {
        self.def().folder
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CategoryId {
    type Err = CmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "aluminio" => Ok(CategoryId::Aluminio),
            "construcoes" => Ok(CategoryId::Construcoes),
            "servicos" => Ok(CategoryId::Servicos),
            other => Err(CmsError::UnknownCategory(other.to_string())),
        }
    }
}

/// Static description of a catalog partition.
///
/// `folder` is both the expected `src` prefix and the on-disk directory,
/// relative to the project root, where new images for the category land.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct CategoryDef {
    pub id: CategoryId,
    pub label: &'static str,
    pub folder: &'static str,
}

pub const CATEGORIES: [CategoryDef; 3] = [
    CategoryDef {
        id: CategoryId::Aluminio,
        label: "Alumínio",
        folder: "img/img_al",
    },
    CategoryDef {
        id: CategoryId::Construcoes,
        label: "Construções",
        folder: "img/img_cm_fe",
    },
    CategoryDef {
        id: CategoryId::Servicos,
        label: "Serviços",
        folder: "img/img_ms",
    },
];
