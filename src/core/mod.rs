// Core types shared by every layer

pub mod strong_types;

pub use strong_types::{Collection, DocumentId, IdentityKey};
