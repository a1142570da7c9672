// Linkshelf services
// Services provide stateless or self-contained functionality: URL handling, metadata resolution, settings.

pub mod favicon;
pub mod html_metadata;
pub mod metadata_resolver;
pub mod settings_engine;
pub mod url_normalizer;
