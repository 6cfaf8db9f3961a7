//! Blessing, inheritance and extension record tests

use std::cell::Cell;

use bridge_types::{ExtTag, Interpreter, SvType};
use scalar_heap::{ScalarHeap, SvId};

thread_local! {
    static FREED: Cell<u32> = Cell::new(0);
    static SEEN_IV: Cell<i64> = Cell::new(0);
    static SEEN_PAYLOAD: Cell<i64> = Cell::new(0);
}

fn count_free(heap: &ScalarHeap, sv: SvId, payload: i64) {
    FREED.with(|f| f.set(f.get() + 1));
    SEEN_IV.with(|s| s.set(heap.sv_iv(sv)));
    SEEN_PAYLOAD.with(|s| s.set(payload));
}

#[test]
fn test_new_object_is_blessed_reference() {
    let heap = ScalarHeap::new();
    let obj = heap.new_object("Foo::Bar", 9);
    assert!(heap.is_object(obj));
    assert_eq!(heap.class_name(obj).as_deref(), Some("Foo::Bar"));

    let referent = heap.rv(obj).unwrap();
    assert_eq!(heap.sv_iv(referent), 9);
    assert_eq!(heap.sv_type(referent), SvType::PvMg);
    assert!(!heap.is_object(referent));
}

#[test]
fn test_plain_reference_is_not_object() {
    let heap = ScalarHeap::new();
    let target = heap.new_sv();
    let rv = heap.new_rv(target, bridge_types::RefClaim::Steal);
    assert!(!heap.is_object(rv));
    assert_eq!(heap.class_name(rv), None);
    assert!(heap.derived_from(rv, "SCALAR"));
}

#[test]
fn test_derived_from_uses_class_table() {
    let heap = ScalarHeap::new();
    heap.define_class("Foo::Bar", &["Foo"]);
    let obj = heap.new_object("Foo::Bar", 0);
    assert!(heap.derived_from(obj, "Foo::Bar"));
    assert!(heap.derived_from(obj, "Foo"));
    assert!(!heap.derived_from(obj, "Baz"));

    let name = heap.new_sv_bytes(b"Foo::Bar", false, bridge_types::Mortality::Owned);
    assert!(heap.derived_from(name, "Foo"));
}

#[test]
fn test_free_callback_runs_once_with_readable_scalar() {
    FREED.with(|f| f.set(0));
    let heap = ScalarHeap::new();
    let tag = ExtTag::register("magic_test");
    let obj = heap.new_object("Counted", 1234);
    let referent = heap.rv(obj).unwrap();
    heap.attach_ext(referent, tag, 77, count_free);
    assert!(heap.has_ext(referent, tag));

    heap.refcnt_inc(obj);
    heap.refcnt_dec(obj);
    assert_eq!(FREED.with(Cell::get), 0);

    heap.refcnt_dec(obj);
    assert_eq!(FREED.with(Cell::get), 1);
    assert_eq!(SEEN_IV.with(Cell::get), 1234);
    assert_eq!(SEEN_PAYLOAD.with(Cell::get), 77);
    assert!(!heap.is_live(referent));
}

#[test]
fn test_ext_lookup_is_by_tag() {
    let heap = ScalarHeap::new();
    let ours = ExtTag::register("ours");
    let theirs = ExtTag::register("theirs");
    let sv = heap.new_sv();
    heap.attach_ext(sv, theirs, 0, |_, _, _| {});
    assert_eq!(heap.find_ext(sv, theirs), Some(0));
    assert_eq!(heap.find_ext(sv, ours), None);
    assert!(heap.has_ext(sv, theirs));
    assert!(!heap.has_ext(sv, ours));
    assert_eq!(heap.sv_type(sv), SvType::PvMg);
}

#[test]
fn test_dump_of_object_referent() {
    let heap = ScalarHeap::new();
    let obj = heap.new_object("Dumped", 5);
    let referent = heap.rv(obj).unwrap();
    let dump = heap.dump(referent);
    assert!(dump.starts_with("SV = PVMG("));
    assert!(dump.contains("OBJECT"));
    assert!(dump.contains("STASH = \"Dumped\""));
}
