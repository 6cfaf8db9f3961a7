//! [`Interpreter`] implementation for [`ScalarHeap`].
//!
//! Conversions are lazy: reading a scalar as a number or string caches the
//! converted value in the corresponding slot and updates the flags. Public
//! flags are only set when the cached value fully represents the scalar.

use std::fmt::Write as _;
use std::rc::Rc;

use bridge_types::{
    ExtTag, FreeFn, Interpreter, Mortality, ObjectTable, RefClaim, SvFlags, SvType,
};

use crate::heap::{HeapState, Magic, ScalarHeap, SvBody, SvId};
use crate::numeric::{self, Number};
use crate::strings;

const INT_FLAGS: SvFlags = SvFlags::from_bits(SvFlags::IOK.bits() | SvFlags::P_IOK.bits());
const NUM_FLAGS: SvFlags = SvFlags::from_bits(SvFlags::NOK.bits() | SvFlags::P_NOK.bits());
const STR_FLAGS: SvFlags = SvFlags::from_bits(SvFlags::POK.bits() | SvFlags::P_POK.bits());

fn reftype(body: &SvBody) -> &'static str {
    if body.flags.is_reference() {
        "REF"
    } else {
        "SCALAR"
    }
}

fn ref_string(state: &HeapState, referent: SvId) -> String {
    let target = state.body(referent);
    match &target.stash {
        Some(class) => format!("{}={}({:#x})", class, reftype(target), referent.address()),
        None => format!("{}({:#x})", reftype(target), referent.address()),
    }
}

fn decode_text(bytes: &[u8], utf8: bool) -> String {
    if utf8 {
        String::from_utf8_lossy(bytes).into_owned()
    } else {
        bytes.iter().map(|&b| char::from(b)).collect()
    }
}

fn cache_int(body: &mut SvBody, bits: i64, unsigned: bool, public: bool) {
    body.iv = bits;
    body.flags.set(SvFlags::IS_UV, unsigned);
    body.flags.insert(SvFlags::P_IOK);
    if public {
        body.flags.insert(SvFlags::IOK);
    }
}

fn cache_int_from_float(body: &mut SvBody) {
    let public = body.flags.is_float();
    let converted = numeric::float_to_int(body.nv);
    cache_int(body, converted.bits, converted.unsigned, public && converted.exact);
}

/// Numifies the string slot into the integer or float slot.
fn grok_string(body: &mut SvBody) {
    let grokked = numeric::grok_number(body.pv.as_deref().unwrap_or(&[]));
    match grokked.value {
        Number::Int(iv) => {
            cache_int(body, iv, false, grokked.complete);
            body.upgrade(SvType::PvIv);
        }
        Number::UInt(uv) => {
            cache_int(body, uv as i64, true, grokked.complete);
            body.upgrade(SvType::PvIv);
        }
        Number::Float(nv) => {
            body.nv = nv;
            body.flags.insert(SvFlags::P_NOK);
            if grokked.complete {
                body.flags.insert(SvFlags::NOK);
            }
            cache_int_from_float(body);
            body.upgrade(SvType::PvNv);
        }
    }
}

impl ScalarHeap {
    /// Replaces the value of `sv`, releasing a referent it owned.
    fn assign(&self, sv: SvId, fill: impl FnOnce(&mut SvBody)) {
        let old_referent = {
            let mut state = self.state_mut();
            let body = state.body_mut(sv);
            let old = body.clear_value();
            fill(body);
            old
        };
        if let Some(referent) = old_referent {
            self.release(referent);
        }
    }

    /// Copies the value of `src` into `dst`, sharing the string buffer when
    /// `share` is set.
    fn copy_value(&self, dst: SvId, src: SvId, share: bool) {
        let (flags, iv, nv, pv, rv, kind) = {
            let state = self.state();
            let body = state.body(src);
            let pv = if share {
                body.pv.clone()
            } else {
                body.pv.as_deref().map(Rc::from)
            };
            (
                body.flags & (SvFlags::OK | SvFlags::IS_UV | SvFlags::UTF8),
                body.iv,
                body.nv,
                pv,
                body.rv,
                body.kind.min(SvType::PvNv),
            )
        };
        if let Some(referent) = rv {
            self.retain(referent);
        }
        self.assign(dst, |body| {
            body.flags.insert(flags);
            body.iv = iv;
            body.nv = nv;
            body.pv = pv;
            body.rv = rv;
            body.upgrade(kind);
        });
    }

    /// String form of `sv` and its character flag, caching it for numbers.
    fn string_form(&self, sv: SvId) -> (Rc<[u8]>, bool) {
        let mut state = self.state_mut();
        let body = state.body(sv);
        let flags = body.flags;
        if flags.intersects(STR_FLAGS) {
            let pv = body.pv.clone().unwrap_or_else(|| Rc::from(&b""[..]));
            return (pv, flags.is_utf8());
        }
        if let Some(referent) = body.rv {
            let text = ref_string(&state, referent);
            return (Rc::from(text.as_bytes()), false);
        }

        let text = if flags.is_integer() || (flags.contains(SvFlags::P_IOK) && !flags.intersects(NUM_FLAGS)) {
            numeric::format_int(body.iv, flags.is_unsigned())
        } else if flags.intersects(NUM_FLAGS) {
            numeric::format_float(body.nv)
        } else {
            return (Rc::from(&b""[..]), false);
        };

        let pv: Rc<[u8]> = Rc::from(text.as_bytes());
        let body = state.body_mut(sv);
        body.pv = Some(pv.clone());
        body.flags.insert(STR_FLAGS);
        if body.flags.intersects(NUM_FLAGS) {
            body.upgrade(SvType::PvNv);
        } else {
            body.upgrade(SvType::PvIv);
        }
        (pv, false)
    }

    /// Integer slot of `sv` as a bit pattern plus its unsigned flag.
    fn numify_int(&self, sv: SvId) -> (i64, bool) {
        let mut state = self.state_mut();
        let body = state.body_mut(sv);
        if let Some(referent) = body.rv {
            return (referent.address() as i64, false);
        }
        if !body.flags.intersects(INT_FLAGS) {
            if body.flags.intersects(NUM_FLAGS) {
                cache_int_from_float(body);
            } else if body.flags.intersects(STR_FLAGS) {
                grok_string(body);
            } else {
                return (0, false);
            }
        }
        (body.iv, body.flags.is_unsigned())
    }

    fn numify_float(&self, sv: SvId) -> f64 {
        let mut state = self.state_mut();
        let body = state.body_mut(sv);
        if let Some(referent) = body.rv {
            return referent.address() as f64;
        }
        if body.flags.intersects(NUM_FLAGS) {
            return body.nv;
        }
        if !body.flags.intersects(INT_FLAGS) {
            if body.flags.intersects(STR_FLAGS) {
                grok_string(body);
            } else {
                return 0.0;
            }
            if body.flags.intersects(NUM_FLAGS) {
                return body.nv;
            }
        }

        let (nv, exact) = numeric::int_to_float(body.iv, body.flags.is_unsigned());
        body.nv = nv;
        body.flags.insert(SvFlags::P_NOK);
        if exact && body.flags.is_integer() {
            body.flags.insert(SvFlags::NOK);
        }
        body.upgrade(SvType::Nv);
        nv
    }
}

impl Interpreter for ScalarHeap {
    type Sv = SvId;

    fn new_sv(&self) -> SvId {
        self.alloc(SvBody::new())
    }

    fn new_sv_copy(&self, src: SvId) -> SvId {
        let sv = self.new_sv();
        self.copy_value(sv, src, false);
        sv
    }

    fn new_sv_bytes(&self, bytes: &[u8], utf8: bool, mortality: Mortality) -> SvId {
        let mut body = SvBody::new();
        body.flags = STR_FLAGS;
        body.flags.set(SvFlags::UTF8, utf8);
        body.pv = Some(Rc::from(bytes));
        body.kind = SvType::Pv;
        let sv = self.alloc(body);
        if mortality == Mortality::Mortal {
            self.push_tmp(sv);
        }
        sv
    }

    fn new_rv(&self, referent: SvId, claim: RefClaim) -> SvId {
        if claim == RefClaim::Increment {
            self.retain(referent);
        }
        let mut body = SvBody::new();
        body.flags = SvFlags::ROK;
        body.rv = Some(referent);
        body.kind = SvType::Iv;
        self.alloc(body)
    }

    fn new_object(&self, class: &str, iv: i64) -> SvId {
        let mut body = SvBody::new();
        body.flags = INT_FLAGS | SvFlags::OBJECT;
        body.iv = iv;
        body.stash = Some(class.to_string());
        body.kind = SvType::PvMg;
        let referent = self.alloc(body);
        self.new_rv(referent, RefClaim::Steal)
    }

    fn boolean(&self, value: bool) -> SvId {
        self.immortal(value)
    }

    fn refcnt_inc(&self, sv: SvId) {
        tracing::trace!(?sv, "refcnt_inc");
        self.retain(sv);
    }

    fn refcnt_dec(&self, sv: SvId) {
        tracing::trace!(?sv, "refcnt_dec");
        self.release(sv);
    }

    fn refcnt(&self, sv: SvId) -> u32 {
        self.state().body(sv).refcnt
    }

    fn mortalize(&self, sv: SvId) -> SvId {
        self.push_tmp(sv);
        sv
    }

    fn push_scope(&self) {
        self.open_scope();
    }

    fn pop_scope(&self) {
        self.close_scope();
    }

    fn flags(&self, sv: SvId) -> SvFlags {
        self.state().body(sv).flags
    }

    fn sv_type(&self, sv: SvId) -> SvType {
        self.state().body(sv).kind
    }

    fn sv_true(&self, sv: SvId) -> bool {
        let state = self.state();
        let body = state.body(sv);
        let flags = body.flags;
        // Public slots win over cached ones: a float read as an integer
        // keeps its float truthiness.
        if flags.is_reference() {
            true
        } else if flags.intersects(STR_FLAGS) {
            !matches!(body.pv.as_deref(), None | Some(b"") | Some(b"0"))
        } else if flags.is_float() {
            body.nv != 0.0
        } else if flags.is_integer() {
            body.iv != 0
        } else if flags.contains(SvFlags::P_NOK) {
            body.nv != 0.0
        } else if flags.contains(SvFlags::P_IOK) {
            body.iv != 0
        } else {
            false
        }
    }

    fn sv_iv(&self, sv: SvId) -> i64 {
        self.numify_int(sv).0
    }

    fn sv_uv(&self, sv: SvId) -> u64 {
        self.numify_int(sv).0 as u64
    }

    fn sv_nv(&self, sv: SvId) -> f64 {
        self.numify_float(sv)
    }

    fn with_pv<R, F: FnOnce(&[u8]) -> R>(&self, sv: SvId, f: F) -> R {
        let (pv, _) = self.string_form(sv);
        f(&pv)
    }

    fn set_iv(&self, sv: SvId, value: i64) {
        self.assign(sv, |body| {
            body.iv = value;
            body.flags.insert(INT_FLAGS);
            body.upgrade(SvType::Iv);
        });
    }

    fn set_uv(&self, sv: SvId, value: u64) {
        match i64::try_from(value) {
            Ok(iv) => self.set_iv(sv, iv),
            Err(_) => self.assign(sv, |body| {
                body.iv = value as i64;
                body.flags.insert(INT_FLAGS | SvFlags::IS_UV);
                body.upgrade(SvType::Iv);
            }),
        }
    }

    fn set_nv(&self, sv: SvId, value: f64) {
        self.assign(sv, |body| {
            body.nv = value;
            body.flags.insert(NUM_FLAGS);
            body.upgrade(SvType::Nv);
        });
    }

    fn set_pvn(&self, sv: SvId, bytes: &[u8]) {
        self.assign(sv, |body| {
            body.pv = Some(Rc::from(bytes));
            body.flags.insert(STR_FLAGS);
            body.upgrade(SvType::Pv);
        });
    }

    fn set_sv(&self, dst: SvId, src: SvId) {
        if dst != src {
            self.copy_value(dst, src, true);
        }
    }

    fn set_utf8(&self, sv: SvId, on: bool) {
        self.state_mut().body_mut(sv).flags.set(SvFlags::UTF8, on);
    }

    fn utf8_decode(&self, sv: SvId) -> bool {
        let (pv, utf8) = self.string_form(sv);
        if utf8 {
            return true;
        }
        if std::str::from_utf8(&pv).is_err() {
            return false;
        }
        if !pv.is_ascii() {
            self.set_utf8(sv, true);
        }
        true
    }

    fn rv(&self, sv: SvId) -> Option<SvId> {
        self.state().body(sv).rv
    }

    fn is_object(&self, sv: SvId) -> bool {
        let state = self.state();
        state
            .body(sv)
            .rv
            .map_or(false, |referent| state.body(referent).flags.contains(SvFlags::OBJECT))
    }

    fn class_name(&self, sv: SvId) -> Option<String> {
        let state = self.state();
        let referent = state.body(sv).rv?;
        state.body(referent).stash.clone()
    }

    fn derived_from(&self, sv: SvId, class: &str) -> bool {
        {
            let state = self.state();
            if let Some(referent) = state.body(sv).rv {
                let target = state.body(referent);
                return match &target.stash {
                    Some(stash) => state.isa(stash, class),
                    None => reftype(target) == class,
                };
            }
        }
        let (pv, utf8) = self.string_form(sv);
        let name = decode_text(&pv, utf8);
        self.state().isa(&name, class)
    }

    fn hash(&self, sv: SvId) -> u32 {
        let (pv, utf8) = self.string_form(sv);
        let canonical = strings::canonical(&pv, utf8);
        strings::one_at_a_time(self.config().hash_seed, &canonical.bytes)
    }

    fn sv_eq(&self, a: SvId, b: SvId) -> bool {
        let (pv_a, utf8_a) = self.string_form(a);
        let (pv_b, utf8_b) = self.string_form(b);
        strings::canonical(&pv_a, utf8_a) == strings::canonical(&pv_b, utf8_b)
    }

    fn attach_ext(&self, sv: SvId, tag: ExtTag, payload: i64, free: FreeFn<Self>) {
        let mut state = self.state_mut();
        let body = state.body_mut(sv);
        body.magic.push(Magic { tag, payload, free });
        body.upgrade(SvType::PvMg);
    }

    fn find_ext(&self, sv: SvId, tag: ExtTag) -> Option<i64> {
        self.state()
            .body(sv)
            .magic
            .iter()
            .find(|record| record.tag == tag)
            .map(|record| record.payload)
    }

    fn dump(&self, sv: SvId) -> String {
        let state = self.state();
        let body = state.body(sv);
        let flags = body.flags;
        let mut out = String::new();

        let _ = writeln!(out, "SV = {}({:#x}) at {:#x}", body.kind, sv.address() + 8, sv.address());
        let _ = writeln!(out, "  REFCNT = {}", body.refcnt);
        let _ = writeln!(out, "  FLAGS = {:?}", flags);
        if flags.intersects(INT_FLAGS) {
            if flags.is_unsigned() {
                let _ = writeln!(out, "  UV = {}", body.iv as u64);
            } else {
                let _ = writeln!(out, "  IV = {}", body.iv);
            }
        }
        if flags.intersects(NUM_FLAGS) {
            let _ = writeln!(out, "  NV = {}", numeric::format_float(body.nv));
        }
        if let Some(referent) = body.rv {
            let _ = writeln!(out, "  RV = {:#x}", referent.address());
        }
        if flags.intersects(STR_FLAGS) {
            let pv = body.pv.as_deref().unwrap_or(&[]);
            let _ = writeln!(out, "  PV = {}", strings::escape(pv, flags.is_utf8()));
            let _ = writeln!(out, "  CUR = {}", pv.len());
        }
        if let Some(stash) = &body.stash {
            let _ = writeln!(out, "  STASH = \"{}\"", stash);
        }
        for record in &body.magic {
            let _ = writeln!(out, "  MAGIC = ext {:?} PTR = {}", record.tag, record.payload);
        }
        out
    }

    fn host_objects(&self) -> &ObjectTable {
        self.objects()
    }
}
