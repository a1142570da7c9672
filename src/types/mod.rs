// Linkshelf shared type definitions
// Each submodule defines types used across the crate.

pub mod bookmark;
pub mod category;
pub mod errors;
pub mod metadata;
pub mod settings;
