//! The interpreter context contract.
//!
//! An [`Interpreter`] is one foreign runtime instance. Its lifecycle is owned
//! by the embedding; the bridge only ever borrows it and calls the primitives
//! below. Every primitive is synchronous and none of them may be raced
//! against another on the same instance.

use std::fmt;
use std::hash::Hash;

use crate::{ExtTag, ObjectTable, SvFlags, SvType};

/// Release callback stored in an extension record.
///
/// The runtime calls it exactly once, when the scalar carrying the record
/// reaches a reference count of zero, passing the record's payload. The
/// scalar is still readable during the call.
pub type FreeFn<I> = fn(&I, <I as Interpreter>::Sv, i64);

/// How a new reference acquires its claim on the referent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefClaim {
    /// Add a claim; the caller keeps its own
    Increment,
    /// Move the caller's claim into the reference
    Steal,
}

/// Who owns a freshly allocated scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mortality {
    /// The caller owns one claim
    #[default]
    Owned,
    /// The innermost dynamic scope owns it
    Mortal,
}

/// What the bytes handed to a string setter represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StringUnits {
    /// Opaque bytes
    #[default]
    Bytes,
    /// UTF-8 encoded characters
    Characters,
}

/// Primitive operations of one foreign runtime instance.
///
/// `Sv` is the runtime's raw scalar reference. It is a plain copyable token:
/// holding one does not keep the scalar alive. Passing an `Sv` whose scalar
/// has already been freed to any method is a contract violation.
pub trait Interpreter: Sized {
    /// Raw scalar reference.
    type Sv: Copy + Eq + Hash + fmt::Debug;

    /// Allocates an undefined scalar with one claim.
    fn new_sv(&self) -> Self::Sv;

    /// Allocates a scalar holding a deep copy of `src`.
    fn new_sv_copy(&self, src: Self::Sv) -> Self::Sv;

    /// Allocates a string scalar from `bytes`.
    ///
    /// With `utf8` set the character flag is turned on without validation.
    fn new_sv_bytes(&self, bytes: &[u8], utf8: bool, mortality: Mortality) -> Self::Sv;

    /// Allocates a reference to `referent`.
    fn new_rv(&self, referent: Self::Sv, claim: RefClaim) -> Self::Sv;

    /// Allocates a referent holding `iv`, blesses it into `class` and
    /// returns an owning reference to it.
    fn new_object(&self, class: &str, iv: i64) -> Self::Sv;

    /// Immortal true or false scalar.
    fn boolean(&self, value: bool) -> Self::Sv;

    /// Adds one claim.
    fn refcnt_inc(&self, sv: Self::Sv);

    /// Releases one claim, freeing the scalar when none remain.
    fn refcnt_dec(&self, sv: Self::Sv);

    /// Current number of claims.
    fn refcnt(&self, sv: Self::Sv) -> u32;

    /// Hands the caller's claim to the innermost dynamic scope.
    fn mortalize(&self, sv: Self::Sv) -> Self::Sv;

    /// Opens a dynamic scope for mortal scalars.
    fn push_scope(&self);

    /// Closes the innermost dynamic scope, releasing its mortals.
    fn pop_scope(&self);

    /// Type tag bits.
    fn flags(&self, sv: Self::Sv) -> SvFlags;

    /// Body kind.
    fn sv_type(&self, sv: Self::Sv) -> SvType;

    /// Truthiness.
    fn sv_true(&self, sv: Self::Sv) -> bool;

    /// Integer value, converting and caching as needed.
    fn sv_iv(&self, sv: Self::Sv) -> i64;

    /// Unsigned value, converting and caching as needed.
    fn sv_uv(&self, sv: Self::Sv) -> u64;

    /// Float value, converting and caching as needed.
    fn sv_nv(&self, sv: Self::Sv) -> f64;

    /// Runs `f` over the string form of `sv`.
    ///
    /// The slice must not escape `f`: the next mutation may move or free it.
    fn with_pv<R, F: FnOnce(&[u8]) -> R>(&self, sv: Self::Sv, f: F) -> R;

    /// Stores a signed integer.
    fn set_iv(&self, sv: Self::Sv, value: i64);

    /// Stores an unsigned integer.
    fn set_uv(&self, sv: Self::Sv, value: u64);

    /// Stores a float.
    fn set_nv(&self, sv: Self::Sv, value: f64);

    /// Stores bytes; the character flag is cleared.
    fn set_pvn(&self, sv: Self::Sv, bytes: &[u8]);

    /// Assigns `src` to `dst`, sharing buffers where possible.
    fn set_sv(&self, dst: Self::Sv, src: Self::Sv);

    /// Turns the character flag on or off without touching the bytes.
    fn set_utf8(&self, sv: Self::Sv, on: bool);

    /// Marks the bytes as characters if they are valid UTF-8.
    ///
    /// Returns false and leaves the scalar untouched if they are not.
    fn utf8_decode(&self, sv: Self::Sv) -> bool;

    /// Referent of a reference.
    fn rv(&self, sv: Self::Sv) -> Option<Self::Sv>;

    /// True if `sv` is a reference to a blessed scalar.
    fn is_object(&self, sv: Self::Sv) -> bool;

    /// Class a reference's referent is blessed into.
    fn class_name(&self, sv: Self::Sv) -> Option<String>;

    /// True if `sv` is, or refers to something that is, `class` or a
    /// subclass of it.
    fn derived_from(&self, sv: Self::Sv, class: &str) -> bool;

    /// 32-bit content hash.
    fn hash(&self, sv: Self::Sv) -> u32;

    /// Value equality of the string forms.
    fn sv_eq(&self, a: Self::Sv, b: Self::Sv) -> bool;

    /// Attaches an extension record tagged `tag` holding `payload` to `sv`.
    ///
    /// The payload lives in the record, out of reach of assignments to `sv`.
    fn attach_ext(&self, sv: Self::Sv, tag: ExtTag, payload: i64, free: FreeFn<Self>);

    /// Payload of the first extension record on `sv` tagged `tag`.
    fn find_ext(&self, sv: Self::Sv, tag: ExtTag) -> Option<i64>;

    /// True if `sv` carries an extension record tagged `tag`.
    fn has_ext(&self, sv: Self::Sv, tag: ExtTag) -> bool {
        self.find_ext(sv, tag).is_some()
    }

    /// Diagnostic description.
    fn dump(&self, sv: Self::Sv) -> String;

    /// Host objects owned by scalars of this instance.
    fn host_objects(&self) -> &ObjectTable;
}
