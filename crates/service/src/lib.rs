//! Service layer: the file-backed users store and the socket registry.
//! - Keeps storage and seeding out of the HTTP handlers.
//! - Exposes `UserRepository` so routes depend on a trait, not a file.

pub mod errors;
pub mod runtime;
#[cfg(test)]
pub mod test_support;
pub mod storage;
pub mod users;
pub mod realtime;
