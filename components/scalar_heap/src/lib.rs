//! Scalar Heap - a reference-counted foreign runtime
//!
//! This component provides:
//! - Generation-checked slot storage for scalar values
//! - Reference counting with mortal (scope-owned) registration
//! - Lazy numeric and string conversion with flag caching
//! - Blessing, class inheritance and extension records with free callbacks
//! - An implementation of [`bridge_types::Interpreter`] over all of the above

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod heap;
mod interp;
mod numeric;
mod strings;

// Re-export main types
pub use config::HeapConfig;
pub use heap::{ScalarHeap, SvId};
