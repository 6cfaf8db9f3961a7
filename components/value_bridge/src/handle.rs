//! The value handle.

use std::fmt;

use bridge_types::{Interpreter, SvType};

/// One foreign scalar paired with the interpreter that owns it.
///
/// A `Scalar` is a view: holding one does not by itself keep the scalar
/// alive. Factories return handles that carry one claim, which the caller
/// gives back with [`Scalar::dec`] or hands to the current dynamic scope
/// with [`Scalar::mortal`]. Both consume the handle. Cloning duplicates the
/// view without adding a claim.
///
/// Using a handle after its scalar has been freed is a programming error.
///
/// # Examples
///
/// ```
/// use scalar_heap::ScalarHeap;
/// use value_bridge::Scalar;
///
/// let heap = ScalarHeap::new();
/// let sv = Scalar::new(&heap);
/// let extra = sv.inc();
/// assert_eq!(sv.refcnt(), 2);
///
/// extra.dec();
/// assert_eq!(sv.refcnt(), 1);
/// sv.dec();
/// assert_eq!(heap.live_count(), 0);
/// ```
pub struct Scalar<'i, I: Interpreter> {
    sv: I::Sv,
    interp: &'i I,
}

impl<'i, I: Interpreter> Scalar<'i, I> {
    /// Wraps a raw scalar reference without touching its count.
    pub fn from_raw(sv: I::Sv, interp: &'i I) -> Self {
        Scalar { sv, interp }
    }

    /// Raw scalar reference.
    pub fn raw(&self) -> I::Sv {
        self.sv
    }

    /// Interpreter the scalar lives in.
    pub fn interp(&self) -> &'i I {
        self.interp
    }

    /// Adds one claim and returns a handle standing for it.
    pub fn inc(&self) -> Self {
        self.interp.refcnt_inc(self.sv);
        Scalar::from_raw(self.sv, self.interp)
    }

    /// Releases the claim this handle stands for.
    pub fn dec(self) {
        self.interp.refcnt_dec(self.sv);
    }

    /// Hands the claim this handle stands for to the innermost dynamic
    /// scope. The returned view stays usable until that scope ends.
    pub fn mortal(self) -> Self {
        let sv = self.interp.mortalize(self.sv);
        Scalar::from_raw(sv, self.interp)
    }

    /// Current number of claims.
    pub fn refcnt(&self) -> u32 {
        self.interp.refcnt(self.sv)
    }

    /// Body kind.
    pub fn sv_type(&self) -> SvType {
        self.interp.sv_type(self.sv)
    }

    /// Diagnostic description, also emitted as a debug event.
    pub fn dump(&self) -> String {
        let text = self.interp.dump(self.sv);
        tracing::debug!(sv = ?self.sv, "{}", text);
        text
    }
}

impl<'i, I: Interpreter> Clone for Scalar<'i, I> {
    fn clone(&self) -> Self {
        Scalar::from_raw(self.sv, self.interp)
    }
}

impl<'i, I: Interpreter> fmt::Debug for Scalar<'i, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scalar")
            .field("sv", &self.sv)
            .field("flags", &self.interp.flags(self.sv))
            .finish()
    }
}
