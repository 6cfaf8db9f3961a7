//! Read-only type queries, comparison and hashing.

use std::hash::{Hash, Hasher};

use bridge_types::{Interpreter, SvFlags};

use crate::Scalar;

impl<'i, I: Interpreter> Scalar<'i, I> {
    /// Type tag bits.
    pub fn flags(&self) -> SvFlags {
        self.interp().flags(self.raw())
    }

    /// True unless the scalar is undefined.
    pub fn is_defined(&self) -> bool {
        self.flags().is_defined()
    }

    /// True if the integer slot is valid.
    pub fn is_integer(&self) -> bool {
        self.flags().is_integer()
    }

    /// True if the integer slot holds an unsigned value.
    pub fn is_unsigned(&self) -> bool {
        self.flags().is_unsigned()
    }

    /// True if the float slot is valid.
    pub fn is_float(&self) -> bool {
        self.flags().is_float()
    }

    /// True if the string slot is valid.
    pub fn is_string(&self) -> bool {
        self.flags().is_string()
    }

    /// True if the string slot holds characters rather than bytes.
    pub fn is_utf8(&self) -> bool {
        self.flags().is_utf8()
    }

    /// True if the scalar is a reference.
    pub fn is_reference(&self) -> bool {
        self.flags().is_reference()
    }

    /// Referent of a reference, borrowed without adding a claim.
    pub fn referent(&self) -> Option<Scalar<'i, I>> {
        if !self.is_reference() {
            return None;
        }
        self.interp()
            .rv(self.raw())
            .map(|sv| Scalar::from_raw(sv, self.interp()))
    }

    /// True if the scalar is a reference to a blessed value.
    pub fn is_object(&self) -> bool {
        self.interp().is_object(self.raw())
    }

    /// True if the scalar is, or refers to, `class` or a subclass of it.
    pub fn is_derived_from(&self, class: &str) -> bool {
        self.interp().derived_from(self.raw(), class)
    }

    /// Class the referent is blessed into; `None` unless an object.
    pub fn class_name(&self) -> Option<String> {
        if !self.is_object() {
            return None;
        }
        self.interp().class_name(self.raw())
    }

    /// Runs `f` over the string form of the scalar.
    ///
    /// Numbers are stringified on demand. The slice is only valid inside
    /// `f`.
    pub fn with_bytes<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        self.interp().with_pv(self.raw(), f)
    }

    /// 32-bit content hash computed by the runtime.
    pub fn content_hash(&self) -> u32 {
        self.interp().hash(self.raw())
    }

    /// Value equality as the runtime defines it.
    pub fn equals(&self, other: &Scalar<'_, I>) -> bool {
        self.interp().sv_eq(self.raw(), other.raw())
    }
}

impl<'i, I: Interpreter> PartialEq for Scalar<'i, I> {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl<'i, I: Interpreter> Eq for Scalar<'i, I> {}

impl<'i, I: Interpreter> Hash for Scalar<'i, I> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.content_hash());
    }
}
