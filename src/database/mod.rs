//! Linkshelf database layer.
//!
//! Provides SQLite connection management and schema migrations for the
//! key/value table behind [`crate::storage::SqliteStorage`].
//!
//! # Usage
//!
//! ```no_run
//! use linkshelf::database::Database;
//!
//! let db = Database::open("linkshelf.db").expect("failed to open database");
//! let conn = db.connection();
//! ```

pub mod connection;
pub mod migrations;

pub use connection::Database;
