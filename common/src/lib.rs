//! Easner Common Types
//!
//! Shared value types used across the Easner transfer platform, including
//! currency codes, cent rounding, identifiers and clocks.

pub mod identifiers;
pub mod monetary;
pub mod error;
pub mod time;

pub use identifiers::*;
pub use monetary::*;
pub use error::*;
pub use time::*;
