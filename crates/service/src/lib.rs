//! Service layer: the JSON-file-backed collection store and the user and
//! tweet services built on it.
//! - Every operation reloads its collection from disk.
//! - Writes are serialized per collection and land via temp file + rename.
//! - Reuses validation and entity definitions in `models` crate.

pub mod errors;
pub mod metrics;
pub mod passwords;
pub mod runtime;
pub mod storage;
pub mod tweets;
pub mod users;

#[cfg(test)]
pub mod test_support;

pub use errors::ServiceError;
pub use tweets::TweetService;
pub use users::UserService;
