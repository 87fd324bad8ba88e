//! Catalog editor core: three fixed image categories with multilingual
//! descriptions, kept in a JSON document and synchronized through a file
//! handle, a project folder or a download fallback.

pub mod config;
pub mod error;
pub mod model;
pub mod protocol;
pub mod services;

pub use error::{CmsError, Result};
