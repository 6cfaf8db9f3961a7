//! Scalar storage with reference counting.
//!
//! This module implements the heap behind [`ScalarHeap`]:
//! - Slots: generation-checked storage for scalar bodies
//! - Temporaries stack: mortal scalars owned by dynamic scopes
//! - Release path: runs extension free callbacks, then frees bodies
//!   iteratively so long reference chains cannot overflow the stack

use std::cell::{Ref, RefCell, RefMut};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::rc::Rc;

use bridge_types::{ExtTag, FreeFn, ObjectTable, SvFlags, SvType};

use crate::config::HeapConfig;

/// Claim count of the immortal scalars; never reaches zero.
const IMMORTAL_REFCNT: u32 = u32::MAX / 2;
/// Address reported for slot 0
const BASE_ADDRESS: u64 = 0x5600_0000_1000;
/// Address stride between slots
const SLOT_SIZE: u64 = 0x18;

/// Raw reference to a scalar in a [`ScalarHeap`].
///
/// Carries the slot generation so a stale id is caught instead of silently
/// aliasing whatever reused the slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SvId {
    index: u32,
    generation: u32,
}

impl SvId {
    /// Slot index.
    pub fn index(self) -> u32 {
        self.index
    }

    /// Address the runtime reports for this scalar.
    pub fn address(self) -> u64 {
        BASE_ADDRESS + u64::from(self.index) * SLOT_SIZE
    }
}

impl fmt::Debug for SvId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SV({:#x}/{})", self.address(), self.generation)
    }
}

/// Extension record attached to a scalar.
#[derive(Clone, Copy)]
pub(crate) struct Magic {
    pub(crate) tag: ExtTag,
    pub(crate) payload: i64,
    pub(crate) free: FreeFn<ScalarHeap>,
}

/// Contents of a live scalar.
pub(crate) struct SvBody {
    pub(crate) refcnt: u32,
    pub(crate) flags: SvFlags,
    /// Integer slot; unsigned values are stored as their bit pattern
    pub(crate) iv: i64,
    pub(crate) nv: f64,
    pub(crate) pv: Option<Rc<[u8]>>,
    pub(crate) rv: Option<SvId>,
    pub(crate) stash: Option<String>,
    pub(crate) magic: Vec<Magic>,
    pub(crate) kind: SvType,
}

impl SvBody {
    pub(crate) fn new() -> Self {
        SvBody {
            refcnt: 1,
            flags: SvFlags::empty(),
            iv: 0,
            nv: 0.0,
            pv: None,
            rv: None,
            stash: None,
            magic: Vec::new(),
            kind: SvType::Null,
        }
    }

    fn immortal(text: &[u8], value: i64) -> Self {
        let mut body = SvBody::new();
        body.refcnt = IMMORTAL_REFCNT;
        body.flags = SvFlags::IOK
            | SvFlags::P_IOK
            | SvFlags::NOK
            | SvFlags::P_NOK
            | SvFlags::POK
            | SvFlags::P_POK
            | SvFlags::READONLY;
        body.iv = value;
        body.nv = value as f64;
        body.pv = Some(Rc::from(text));
        body.kind = SvType::PvNv;
        body
    }

    /// Raises the body kind; bodies are never downgraded.
    pub(crate) fn upgrade(&mut self, kind: SvType) {
        if kind > self.kind {
            self.kind = kind;
        }
    }

    pub(crate) fn is_readonly(&self) -> bool {
        self.flags.contains(SvFlags::READONLY)
    }

    /// Forgets the current value and returns the referent it owned, if any.
    pub(crate) fn clear_value(&mut self) -> Option<SvId> {
        assert!(
            !self.is_readonly(),
            "Modification of a read-only value attempted"
        );
        self.flags.remove(SvFlags::OK | SvFlags::IS_UV | SvFlags::UTF8);
        self.pv = None;
        self.rv.take()
    }
}

struct Slot {
    generation: u32,
    body: Option<SvBody>,
}

/// Mutable heap state, borrowed for the duration of one primitive.
pub(crate) struct HeapState {
    slots: Vec<Slot>,
    free_slots: Vec<u32>,
    tmps: Vec<SvId>,
    scope_floors: Vec<usize>,
    classes: HashMap<String, Vec<String>>,
}

impl HeapState {
    fn with_capacity(capacity: usize) -> Self {
        HeapState {
            slots: Vec::with_capacity(capacity),
            free_slots: Vec::new(),
            tmps: Vec::new(),
            scope_floors: Vec::new(),
            classes: HashMap::new(),
        }
    }

    fn alloc(&mut self, body: SvBody) -> SvId {
        match self.free_slots.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.body = Some(body);
                SvId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = u32::try_from(self.slots.len())
                    .unwrap_or_else(|_| panic!("scalar heap exhausted"));
                self.slots.push(Slot {
                    generation: 0,
                    body: Some(body),
                });
                SvId {
                    index,
                    generation: 0,
                }
            }
        }
    }

    /// Returns the body of a live scalar.
    ///
    /// # Panics
    ///
    /// Panics if `sv` has been freed.
    pub(crate) fn body(&self, sv: SvId) -> &SvBody {
        self.slots
            .get(sv.index as usize)
            .filter(|slot| slot.generation == sv.generation)
            .and_then(|slot| slot.body.as_ref())
            .unwrap_or_else(|| panic!("use of freed scalar {:?}", sv))
    }

    /// Mutable variant of [`HeapState::body`].
    pub(crate) fn body_mut(&mut self, sv: SvId) -> &mut SvBody {
        self.slots
            .get_mut(sv.index as usize)
            .filter(|slot| slot.generation == sv.generation)
            .and_then(|slot| slot.body.as_mut())
            .unwrap_or_else(|| panic!("use of freed scalar {:?}", sv))
    }

    fn free(&mut self, sv: SvId) -> SvBody {
        let slot = &mut self.slots[sv.index as usize];
        let body = slot
            .body
            .take()
            .unwrap_or_else(|| panic!("double free of scalar {:?}", sv));
        slot.generation = slot.generation.wrapping_add(1);
        self.free_slots.push(sv.index);
        body
    }

    fn is_live(&self, sv: SvId) -> bool {
        self.slots
            .get(sv.index as usize)
            .map_or(false, |slot| {
                slot.generation == sv.generation && slot.body.is_some()
            })
    }

    /// Returns true if `class` is `target` or inherits from it.
    pub(crate) fn isa(&self, class: &str, target: &str) -> bool {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([class.to_string()]);
        while let Some(current) = queue.pop_front() {
            if current == target {
                return true;
            }
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Some(parents) = self.classes.get(&current) {
                queue.extend(parents.iter().cloned());
            }
        }
        false
    }
}

/// A single foreign runtime instance.
///
/// All state lives behind a `RefCell`: the heap is confined to one thread
/// and every primitive borrows it only for its own duration, so extension
/// free callbacks may call back into the heap.
///
/// # Examples
///
/// ```
/// use bridge_types::Interpreter;
/// use scalar_heap::ScalarHeap;
///
/// let heap = ScalarHeap::new();
/// let sv = heap.new_sv();
/// heap.set_iv(sv, 42);
/// assert_eq!(heap.sv_iv(sv), 42);
///
/// heap.refcnt_dec(sv);
/// assert!(!heap.is_live(sv));
/// ```
pub struct ScalarHeap {
    state: RefCell<HeapState>,
    objects: ObjectTable,
    config: HeapConfig,
    yes: SvId,
    no: SvId,
}

impl ScalarHeap {
    /// Creates a heap with the default configuration.
    pub fn new() -> Self {
        Self::with_config(HeapConfig::default())
    }

    /// Creates a heap with the given configuration.
    pub fn with_config(config: HeapConfig) -> Self {
        let mut state = HeapState::with_capacity(config.initial_capacity);
        let yes = state.alloc(SvBody::immortal(b"1", 1));
        let no = state.alloc(SvBody::immortal(b"", 0));
        ScalarHeap {
            state: RefCell::new(state),
            objects: ObjectTable::new(),
            config,
            yes,
            no,
        }
    }

    /// Returns the configuration this heap was built with.
    pub fn config(&self) -> &HeapConfig {
        &self.config
    }

    /// Records that `class` inherits from `parents`, in lookup order.
    pub fn define_class(&self, class: &str, parents: &[&str]) {
        self.state_mut().classes.insert(
            class.to_string(),
            parents.iter().map(|p| p.to_string()).collect(),
        );
    }

    /// Number of live scalars, not counting the immortals.
    pub fn live_count(&self) -> usize {
        let state = self.state();
        state.slots.iter().filter(|slot| slot.body.is_some()).count() - 2
    }

    /// Returns true if `sv` has not been freed.
    pub fn is_live(&self, sv: SvId) -> bool {
        self.state().is_live(sv)
    }

    /// Number of scalars waiting on a dynamic scope.
    pub fn mortal_count(&self) -> usize {
        self.state().tmps.len()
    }

    /// Depth of open dynamic scopes.
    pub fn scope_depth(&self) -> usize {
        self.state().scope_floors.len()
    }

    /// Returns true if `a` and `b` share one string buffer.
    pub fn shares_buffer(&self, a: SvId, b: SvId) -> bool {
        let state = self.state();
        match (&state.body(a).pv, &state.body(b).pv) {
            (Some(x), Some(y)) => Rc::ptr_eq(x, y),
            _ => false,
        }
    }

    pub(crate) fn state(&self) -> Ref<'_, HeapState> {
        self.state.borrow()
    }

    pub(crate) fn state_mut(&self) -> RefMut<'_, HeapState> {
        self.state.borrow_mut()
    }

    pub(crate) fn objects(&self) -> &ObjectTable {
        &self.objects
    }

    pub(crate) fn immortal(&self, value: bool) -> SvId {
        if value {
            self.yes
        } else {
            self.no
        }
    }

    pub(crate) fn alloc(&self, body: SvBody) -> SvId {
        let sv = self.state_mut().alloc(body);
        tracing::trace!(?sv, "allocated scalar");
        sv
    }

    pub(crate) fn retain(&self, sv: SvId) {
        let mut state = self.state_mut();
        let body = state.body_mut(sv);
        if !body.is_readonly() {
            body.refcnt += 1;
        }
    }

    /// Releases one claim on `sv` and frees everything that drops to zero.
    pub(crate) fn release(&self, sv: SvId) {
        let mut pending = vec![sv];
        while let Some(sv) = pending.pop() {
            let magic = {
                let mut state = self.state_mut();
                let body = state.body_mut(sv);
                if body.is_readonly() {
                    continue;
                }
                body.refcnt -= 1;
                if body.refcnt > 0 {
                    continue;
                }
                std::mem::take(&mut body.magic)
            };

            for record in &magic {
                tracing::debug!(?sv, tag = ?record.tag, "running extension free callback");
                (record.free)(self, sv, record.payload);
            }

            let body = self.state_mut().free(sv);
            tracing::debug!(?sv, "freed scalar");
            if let Some(referent) = body.rv {
                pending.push(referent);
            }
        }
    }

    pub(crate) fn push_tmp(&self, sv: SvId) {
        let mut state = self.state_mut();
        let body = state.body_mut(sv);
        if body.is_readonly() {
            return;
        }
        body.flags.insert(SvFlags::TEMP);
        state.tmps.push(sv);
    }

    pub(crate) fn open_scope(&self) {
        let mut state = self.state_mut();
        let floor = state.tmps.len();
        state.scope_floors.push(floor);
    }

    pub(crate) fn close_scope(&self) {
        let doomed: Vec<SvId> = {
            let mut state = self.state_mut();
            let floor = match state.scope_floors.pop() {
                Some(floor) => floor,
                None => {
                    tracing::warn!("pop_scope without matching push_scope; releasing all mortals");
                    0
                }
            };
            let floor = floor.min(state.tmps.len());
            state.tmps.drain(floor..).collect()
        };

        tracing::debug!(count = doomed.len(), "releasing mortals");
        for sv in doomed {
            self.state_mut().body_mut(sv).flags.remove(SvFlags::TEMP);
            self.release(sv);
        }
    }
}

impl Default for ScalarHeap {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ScalarHeap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarHeap")
            .field("live", &self.live_count())
            .field("mortals", &self.mortal_count())
            .field("objects", &self.objects)
            .finish()
    }
}

impl Drop for ScalarHeap {
    fn drop(&mut self) {
        let live = self.live_count();
        if live > 0 {
            tracing::debug!(live, "dropping heap with live scalars");
        }
    }
}
