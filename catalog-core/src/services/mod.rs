pub mod capability;
pub mod editor;
pub mod legacy;
pub mod loader;
pub mod naming;
pub mod normalize;
pub mod shared;
pub mod storage;
pub mod validate;
