//! Entities persisted by the service, plus the codec that moves them to and
//! from their JSON form.

pub mod codec;
pub mod errors;
pub mod id;
pub mod record;
pub mod tweet;
pub mod user;
pub mod validation;

pub use errors::ModelError;
pub use id::RecordId;
pub use record::Record;
