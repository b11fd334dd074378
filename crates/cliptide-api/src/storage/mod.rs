// Storage layer
//
// Layout:
// - models: row types and conversions into the public entity types
// - repositories: the PostgreSQL implementation (all SQL lives there)
// - memory: HashMap-backed implementation with the same semantics
// - backend: enum dispatch between the two
// - password: Argon2id hashing helpers

pub mod backend;
pub mod memory;
pub mod models;
pub mod password;
pub mod repositories;

pub use backend::StorageBackend;
pub use memory::InMemoryDatabase;
pub use models::*;
pub use repositories::Database;
