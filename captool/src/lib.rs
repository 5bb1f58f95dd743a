#![deny(missing_docs)]

//! Tahoe-LAFS capability tool - complete library.
//!
//! Re-exports the capability components for single-crate usage and
//! hosts the command-line front end.

pub use captool_primitives as primitives;
pub use captool_cap as cap;

pub mod cli;
