//! Bridge error types.

use std::fmt;
use std::mem::ManuallyDrop;

use bridge_types::Interpreter;
use thiserror::Error;

use crate::Scalar;

/// What a failed conversion wanted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// Checked numeric conversion of a scalar that is not a number of the
    /// requested width and signedness
    #[error("not a number convertible to {want}")]
    NotNumber {
        /// Name of the requested host type
        want: &'static str,
    },
    /// Checked text conversion of a scalar that is neither string nor number
    #[error("not a string or number")]
    NotStringOrNumber,
}

/// A failed checked conversion.
///
/// The error owns one claim on the offending scalar, so the value stays
/// inspectable after the failing call returns. Dropping the error releases
/// the claim; [`BridgeError::into_value`] hands it to the caller instead.
#[derive(Error)]
#[error("{kind}: {value:?}")]
pub struct BridgeError<'i, I: Interpreter> {
    kind: ErrorKind,
    value: Scalar<'i, I>,
}

/// Result type for bridge conversions.
pub type Result<'i, T, I> = std::result::Result<T, BridgeError<'i, I>>;

impl<'i, I: Interpreter> BridgeError<'i, I> {
    /// Creates an error, taking a new claim on `value`.
    pub fn new(kind: ErrorKind, value: &Scalar<'i, I>) -> Self {
        BridgeError {
            kind,
            value: value.inc(),
        }
    }

    /// What went wrong.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The offending scalar.
    pub fn value(&self) -> &Scalar<'i, I> {
        &self.value
    }

    /// Takes over the error's claim on the offending scalar.
    pub fn into_value(self) -> Scalar<'i, I> {
        let this = ManuallyDrop::new(self);
        this.value.clone()
    }

    /// Renames the wanted type of a numeric error.
    pub(crate) fn with_want(mut self, want: &'static str) -> Self {
        if let ErrorKind::NotNumber { .. } = self.kind {
            self.kind = ErrorKind::NotNumber { want };
        }
        self
    }
}

impl<'i, I: Interpreter> fmt::Debug for BridgeError<'i, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeError")
            .field("kind", &self.kind)
            .field("value", &self.value)
            .finish()
    }
}

impl<'i, I: Interpreter> Drop for BridgeError<'i, I> {
    fn drop(&mut self) {
        self.value.clone().dec();
    }
}
