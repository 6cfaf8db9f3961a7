//! Core types shared by the foreign value bridge.
//!
//! This crate defines the contract between the bridge and a foreign runtime
//! instance, plus the small vocabulary both sides speak.
//!
//! # Overview
//!
//! - [`Interpreter`] - Primitive operations of one foreign runtime instance
//! - [`SvFlags`] - Type tag bits carried by every scalar value
//! - [`SvType`] - Body kind of a scalar value
//! - [`ExtTag`] - Process-wide key identifying an extension record owner
//! - [`ObjectTable`] - Side table of host objects owned by foreign scalars
//!
//! # Examples
//!
//! ```
//! use bridge_types::SvFlags;
//!
//! let flags = SvFlags::IOK | SvFlags::P_IOK;
//! assert!(flags.is_integer());
//! assert!(flags.is_defined());
//! assert!(!flags.is_string());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod ext;
mod flags;
mod interpreter;
mod objects;

pub use ext::ExtTag;
pub use flags::{SvFlags, SvType};
pub use interpreter::{FreeFn, Interpreter, Mortality, RefClaim, StringUnits};
pub use objects::{ObjectKey, ObjectTable};
