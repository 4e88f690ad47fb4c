// Infrastructure - the two external boundaries and what implements them
pub mod document;         // Loosely-typed documents and query predicates
pub mod memory_store;     // In-process document store
pub mod middleware;       // Request extractors
pub mod security;         // Local auth provider and password hashing
pub mod sqlite_database;  // SQLite document store
pub mod traits;           // AuthProvider and DocumentStore

pub use document::{Document, Fields, Filter, FilterOp};
pub use memory_store::MemoryDocumentStore;
pub use security::LocalAuthProvider;
pub use sqlite_database::SqliteDatabase;
pub use traits::{AuthProvider, DocumentStore, Identity};
