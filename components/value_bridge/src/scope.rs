//! Dynamic scope guard.

use bridge_types::Interpreter;

/// Opens a dynamic scope on creation and closes it on drop, releasing every
/// mortal registered in between.
///
/// # Examples
///
/// ```
/// use scalar_heap::ScalarHeap;
/// use value_bridge::{Mortality, Scalar, Scope};
///
/// let heap = ScalarHeap::new();
/// let raw = {
///     let _scope = Scope::enter(&heap);
///     let sv = Scalar::from_str(&heap, "temp", Mortality::Mortal);
///     assert!(heap.is_live(sv.raw()));
///     sv.raw()
/// };
/// assert!(!heap.is_live(raw));
/// ```
#[must_use = "the scope closes as soon as the guard is dropped"]
pub struct Scope<'i, I: Interpreter> {
    interp: &'i I,
}

impl<'i, I: Interpreter> Scope<'i, I> {
    /// Opens a scope on `interp`.
    pub fn enter(interp: &'i I) -> Self {
        interp.push_scope();
        Scope { interp }
    }

    /// Runs `f` inside a fresh scope.
    pub fn run<R>(interp: &'i I, f: impl FnOnce() -> R) -> R {
        let _scope = Scope::enter(interp);
        f()
    }
}

impl<'i, I: Interpreter> Drop for Scope<'i, I> {
    fn drop(&mut self) {
        self.interp.pop_scope();
    }
}
