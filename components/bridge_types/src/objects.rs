//! Host object side table.
//!
//! A foreign scalar cannot hold a host object directly. Instead the object
//! is parked here under a small integer key and the key is what the scalar
//! stores. The table holds exactly one ownership claim per entry.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Key of a host object parked in an [`ObjectTable`].
///
/// Keys start at 1 and are never reused within one table.
pub type ObjectKey = i64;

/// Per-interpreter table mapping keys to host objects.
///
/// # Examples
///
/// ```
/// use bridge_types::ObjectTable;
/// use std::any::Any;
/// use std::rc::Rc;
///
/// let table = ObjectTable::new();
/// let obj: Rc<dyn Any> = Rc::new(String::from("hello"));
/// let key = table.insert(obj.clone());
///
/// assert!(Rc::ptr_eq(&table.get(key).unwrap(), &obj));
/// assert!(table.remove(key).is_some());
/// assert!(table.get(key).is_none());
/// ```
pub struct ObjectTable {
    entries: RefCell<HashMap<ObjectKey, Rc<dyn Any>>>,
    next_key: Cell<ObjectKey>,
}

impl ObjectTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        ObjectTable {
            entries: RefCell::new(HashMap::new()),
            next_key: Cell::new(1),
        }
    }

    /// Takes over `object`'s claim and returns its key.
    pub fn insert(&self, object: Rc<dyn Any>) -> ObjectKey {
        let key = self.next_key.get();
        self.next_key.set(key + 1);
        self.entries.borrow_mut().insert(key, object);
        key
    }

    /// Returns a new claim on the object stored under `key`.
    pub fn get(&self, key: ObjectKey) -> Option<Rc<dyn Any>> {
        self.entries.borrow().get(&key).cloned()
    }

    /// Removes the entry and hands its claim back to the caller.
    pub fn remove(&self, key: ObjectKey) -> Option<Rc<dyn Any>> {
        self.entries.borrow_mut().remove(&key)
    }

    /// Number of parked objects.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Returns true if no object is parked.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl Default for ObjectTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ObjectTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectTable")
            .field("len", &self.len())
            .field("next_key", &self.next_key.get())
            .finish()
    }
}
