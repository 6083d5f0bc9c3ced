//! Utility functions

pub mod crypto;
pub mod parse;
pub mod precision;
pub mod time;

pub use parse::*;
pub use precision::*;
