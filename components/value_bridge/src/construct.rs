//! Factories and in-place setters.
//!
//! Factories return a handle carrying one claim unless they take a
//! [`Mortality::Mortal`] argument. Setters overwrite an existing scalar and
//! allocate nothing.

use bridge_types::{Interpreter, Mortality, RefClaim, StringUnits};

use crate::Scalar;

/// True if `text` needs the character flag: some character is wider than
/// one byte.
fn needs_utf8(text: &str) -> bool {
    text.len() != text.chars().count()
}

impl<'i, I: Interpreter> Scalar<'i, I> {
    /// Allocates an undefined scalar.
    pub fn new(interp: &'i I) -> Self {
        Scalar::from_raw(interp.new_sv(), interp)
    }

    /// Allocates a scalar holding a deep copy of `src`.
    pub fn new_copy(src: &Scalar<'i, I>) -> Self {
        let interp = src.interp();
        Scalar::from_raw(interp.new_sv_copy(src.raw()), interp)
    }

    /// Allocates a scalar and assigns `src` into it.
    ///
    /// Equal to [`Scalar::new_copy`], but lets the runtime share or steal
    /// the source's buffers instead of copying them.
    pub fn new_stealing_copy(src: &Scalar<'i, I>) -> Self {
        let dst = Scalar::new(src.interp());
        dst.set_scalar(src);
        dst
    }

    /// Allocates a reference to `target`, adding a claim on it.
    pub fn new_ref_inc(target: &Scalar<'i, I>) -> Self {
        let interp = target.interp();
        Scalar::from_raw(interp.new_rv(target.raw(), RefClaim::Increment), interp)
    }

    /// Allocates a reference to `target`, moving the caller's claim into it.
    pub fn new_ref_steal(target: Scalar<'i, I>) -> Self {
        let interp = target.interp();
        Scalar::from_raw(interp.new_rv(target.raw(), RefClaim::Steal), interp)
    }

    /// Allocates a string scalar from `bytes`.
    ///
    /// With [`StringUnits::Characters`] the bytes are marked as characters
    /// when they are valid UTF-8 and left as bytes otherwise.
    pub fn from_bytes(interp: &'i I, bytes: &[u8], units: StringUnits, mortality: Mortality) -> Self {
        let sv = interp.new_sv_bytes(bytes, false, mortality);
        if units == StringUnits::Characters && !interp.utf8_decode(sv) {
            tracing::debug!(?sv, "bytes are not valid UTF-8; kept as a byte string");
        }
        Scalar::from_raw(sv, interp)
    }

    /// Allocates a string scalar from `text`.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(interp: &'i I, text: &str, mortality: Mortality) -> Self {
        let sv = interp.new_sv_bytes(text.as_bytes(), needs_utf8(text), mortality);
        Scalar::from_raw(sv, interp)
    }

    /// Allocates a copy of the runtime's true or false value.
    pub fn from_bool(interp: &'i I, value: bool) -> Self {
        Scalar::from_raw(interp.new_sv_copy(interp.boolean(value)), interp)
    }

    /// Assigns the runtime's true or false value.
    pub fn set_bool(&self, value: bool) {
        let interp = self.interp();
        interp.set_sv(self.raw(), interp.boolean(value));
    }

    /// Stores a signed integer.
    pub fn set_int(&self, value: i64) {
        self.interp().set_iv(self.raw(), value);
    }

    /// Stores an unsigned integer.
    pub fn set_uint(&self, value: u64) {
        self.interp().set_uv(self.raw(), value);
    }

    /// Stores a float.
    pub fn set_float(&self, value: f64) {
        self.interp().set_nv(self.raw(), value);
    }

    /// Stores `text`, marking it as characters only if some character
    /// takes more than one byte.
    pub fn set_str(&self, text: &str) {
        let interp = self.interp();
        interp.set_pvn(self.raw(), text.as_bytes());
        interp.set_utf8(self.raw(), needs_utf8(text));
    }

    /// Stores `bytes`, decoding them as characters if `units` says so.
    pub fn set_bytes(&self, bytes: &[u8], units: StringUnits) {
        let interp = self.interp();
        interp.set_utf8(self.raw(), false);
        interp.set_pvn(self.raw(), bytes);
        if units == StringUnits::Characters && !interp.utf8_decode(self.raw()) {
            tracing::debug!(sv = ?self.raw(), "bytes are not valid UTF-8; kept as a byte string");
        }
    }

    /// Assigns the value of `src`.
    pub fn set_scalar(&self, src: &Scalar<'_, I>) {
        tracing::trace!(dst = ?self.raw(), src = ?src.raw(), "assign");
        self.interp().set_sv(self.raw(), src.raw());
    }
}
