//! Infrastructure Layer
//!
//! Database implementations of repository traits.

pub mod memory;
pub mod postgres;
