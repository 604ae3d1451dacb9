//! Common types, report definitions, and errors shared across `fieldseal` crates.

pub mod error;
pub mod protocol;

pub use error::ServiceError;
