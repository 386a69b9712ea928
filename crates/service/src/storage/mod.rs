//! Storage abstractions for service layer
//!
//! One JSON-array file per entity kind, accessed through a generic store so
//! the user and tweet services share the load-mutate-persist logic.

pub mod collection_store;

pub use collection_store::JsonCollectionStore;
