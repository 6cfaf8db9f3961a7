//! Bridge between host values and a foreign runtime's scalars.
//!
//! This crate provides:
//! - [`Scalar`]: a view of one foreign scalar paired with its interpreter,
//!   with explicit claim management (`inc`, `dec`, `mortal`)
//! - Type inspection and checked/unchecked coercion through [`FromScalar`]
//! - Construction and in-place mutation from host values
//! - Host object wrapping via an extension record and release callback
//! - [`Scope`]: a guard delimiting a dynamic scope for mortal scalars
//!
//! # Example
//!
//! ```
//! use scalar_heap::ScalarHeap;
//! use value_bridge::{Mortality, Scalar};
//!
//! let heap = ScalarHeap::new();
//! let sv = Scalar::new(&heap);
//! sv.set_int(-7);
//! assert_eq!(sv.get::<i64>().unwrap(), -7);
//! assert!(sv.get::<u64>().is_err());
//!
//! let text = Scalar::from_str(&heap, "café", Mortality::Owned);
//! assert!(text.is_utf8());
//! assert_eq!(text.get::<String>().unwrap(), "café");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod coerce;
mod construct;
mod error;
mod handle;
mod inspect;
mod object;
mod scope;

pub use coerce::FromScalar;
pub use error::{BridgeError, ErrorKind, Result};
pub use handle::Scalar;
pub use object::{HostObject, HOST_OBJECT_TAG};
pub use scope::Scope;

// Re-export the contract vocabulary callers need alongside handles
pub use bridge_types::{Interpreter, Mortality, StringUnits};
