// Linkshelf state managers
// Managers own mutable collections and write them through to storage.

pub mod bookmark_store;
