//! Core data models: raw usage records in, aggregate entries out.

mod aggregate;
mod records;
mod scope;

pub use aggregate::*;
pub use records::*;
pub use scope::*;
