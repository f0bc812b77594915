//! Aggregation primitives.
//!
//! Pure functions shared by every statistics view:
//! - Insertion-ordered grouping
//! - Order-independent combination keys
//! - Two-pass weighted averages
//! - Stable ranking with top-N truncation
//! - Scoped percentage normalization
//!
//! Nothing here performs I/O or logs.

mod combo;
mod group;
mod percentage;
mod rank;
mod weighted;

pub use combo::*;
pub use group::*;
pub use percentage::*;
pub use rank::*;
pub use weighted::*;
