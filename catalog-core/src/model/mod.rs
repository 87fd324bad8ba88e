pub mod catalog;
pub mod category;
pub mod entry;

pub use catalog::Catalog;
pub use category::{CategoryDef, CategoryId, CATEGORIES};
pub use entry::{Descriptions, Entry, LANGUAGES};
