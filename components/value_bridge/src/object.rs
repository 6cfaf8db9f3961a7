//! Host objects owned by foreign scalars.
//!
//! Wrapping parks the object in the interpreter's
//! [`ObjectTable`](bridge_types::ObjectTable) and blesses a new referent
//! holding the table key. The referent carries an extension record tagged
//! with [`HOST_OBJECT_TAG`] whose payload is the same key; only referents
//! carrying that tag are ever read back as host objects, whatever class they
//! are blessed into. Lookups use the payload, never the referent's value,
//! which foreign code may overwrite. When the runtime frees the referent,
//! the record's release callback removes the table entry, dropping the
//! table's claim on the object.

use std::any::Any;
use std::rc::Rc;

use bridge_types::{ExtTag, Interpreter, ObjectKey, SvType};
use once_cell::sync::Lazy;

use crate::Scalar;

/// Extension tag marking referents that own a host object.
pub static HOST_OBJECT_TAG: Lazy<ExtTag> = Lazy::new(|| ExtTag::register("value_bridge::host_object"));

/// A host type with a default foreign class.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use scalar_heap::ScalarHeap;
/// use value_bridge::{HostObject, Scalar};
///
/// struct Counter(u32);
///
/// impl HostObject for Counter {
///     const CLASS_NAME: &'static str = "My::Counter";
/// }
///
/// let heap = ScalarHeap::new();
/// let sv = Scalar::wrap_object(&heap, Rc::new(Counter(3)));
/// assert_eq!(sv.class_name().as_deref(), Some("My::Counter"));
/// assert_eq!(sv.unwrap_object::<Counter>().unwrap().0, 3);
/// ```
pub trait HostObject: Any {
    /// Class wrapped values are blessed into.
    const CLASS_NAME: &'static str;
}

/// Release callback run by the runtime when a wrapping referent is freed.
fn release_host_object<I: Interpreter>(interp: &I, sv: I::Sv, key: ObjectKey) {
    match interp.host_objects().remove(key) {
        Some(object) => {
            tracing::debug!(?sv, key, "releasing host object");
            drop(object);
        }
        None => tracing::warn!(?sv, key, "no host object registered for freed scalar"),
    }
}

impl<'i, I: Interpreter> Scalar<'i, I> {
    /// Hands `object` to a new scalar blessed into `class`.
    ///
    /// The scalar owns the claim `object` stands for; the host gets it back
    /// when the runtime frees the referent.
    ///
    /// # Panics
    ///
    /// Panics if the interpreter's `new_object` does not return a reference.
    pub fn wrap<T: Any>(interp: &'i I, object: Rc<T>, class: &str) -> Self {
        let key = interp.host_objects().insert(object);
        let sv = interp.new_object(class, key);
        let referent = interp
            .rv(sv)
            .unwrap_or_else(|| panic!("new_object returned a non-reference {:?}", sv));
        interp.attach_ext(referent, *HOST_OBJECT_TAG, key, release_host_object::<I>);
        tracing::debug!(?sv, key, class, "wrapped host object");
        Scalar::from_raw(sv, interp)
    }

    /// Wraps `object` in its type's default class.
    pub fn wrap_object<T: HostObject>(interp: &'i I, object: Rc<T>) -> Self {
        Self::wrap(interp, object, T::CLASS_NAME)
    }

    /// Host object owned by the referent, if this scalar wraps one.
    ///
    /// Objects blessed by anything other than [`Scalar::wrap`] yield `None`.
    pub fn host_object(&self) -> Option<Rc<dyn Any>> {
        if !self.is_object() {
            return None;
        }
        let interp = self.interp();
        let referent = interp.rv(self.raw())?;
        if interp.sv_type(referent) != SvType::PvMg {
            return None;
        }
        let key = interp.find_ext(referent, *HOST_OBJECT_TAG)?;
        interp.host_objects().get(key)
    }

    /// Host object of type `T` owned by the referent.
    pub fn unwrap_object<T: Any>(&self) -> Option<Rc<T>> {
        self.host_object()?.downcast::<T>().ok()
    }
}
