//! Reference counting and mortal scope tests

use bridge_types::{Interpreter, Mortality, RefClaim};
use scalar_heap::ScalarHeap;

#[test]
fn test_new_scalar_has_one_claim() {
    let heap = ScalarHeap::new();
    let sv = heap.new_sv();
    assert_eq!(heap.refcnt(sv), 1);
    assert_eq!(heap.live_count(), 1);
}

#[test]
fn test_inc_then_dec_keeps_scalar() {
    let heap = ScalarHeap::new();
    let sv = heap.new_sv();
    heap.refcnt_inc(sv);
    assert_eq!(heap.refcnt(sv), 2);
    heap.refcnt_dec(sv);
    assert!(heap.is_live(sv));
    heap.refcnt_dec(sv);
    assert!(!heap.is_live(sv));
}

#[test]
fn test_reference_increment_adds_claim_on_referent() {
    let heap = ScalarHeap::new();
    let target = heap.new_sv();
    let rv = heap.new_rv(target, RefClaim::Increment);
    assert_eq!(heap.refcnt(target), 2);

    heap.refcnt_dec(rv);
    assert_eq!(heap.refcnt(target), 1);
    heap.refcnt_dec(target);
    assert_eq!(heap.live_count(), 0);
}

#[test]
fn test_reference_steal_moves_claim() {
    let heap = ScalarHeap::new();
    let target = heap.new_sv();
    let rv = heap.new_rv(target, RefClaim::Steal);
    assert_eq!(heap.refcnt(target), 1);

    heap.refcnt_dec(rv);
    assert!(!heap.is_live(target));
}

#[test]
fn test_mortal_freed_at_scope_exit() {
    let heap = ScalarHeap::new();
    heap.push_scope();
    let sv = heap.new_sv_bytes(b"temp", false, Mortality::Mortal);
    assert!(heap.is_live(sv));
    assert_eq!(heap.mortal_count(), 1);
    heap.pop_scope();
    assert!(!heap.is_live(sv));
    assert_eq!(heap.scope_depth(), 0);
}

#[test]
fn test_mortal_with_extra_claim_survives_scope() {
    let heap = ScalarHeap::new();
    heap.push_scope();
    let sv = heap.new_sv();
    heap.mortalize(sv);
    heap.refcnt_inc(sv);
    heap.pop_scope();

    assert!(heap.is_live(sv));
    assert_eq!(heap.refcnt(sv), 1);
    heap.refcnt_dec(sv);
}

#[test]
fn test_nested_scopes() {
    let heap = ScalarHeap::new();
    heap.push_scope();
    let outer = heap.mortalize(heap.new_sv());
    heap.push_scope();
    let inner = heap.mortalize(heap.new_sv());
    heap.pop_scope();
    assert!(heap.is_live(outer));
    assert!(!heap.is_live(inner));
    heap.pop_scope();
    assert!(!heap.is_live(outer));
}

#[test]
fn test_unbalanced_pop_releases_everything() {
    let heap = ScalarHeap::new();
    let sv = heap.mortalize(heap.new_sv());
    heap.pop_scope();
    assert!(!heap.is_live(sv));
}

#[test]
fn test_boolean_immortals_ignore_refcounting() {
    let heap = ScalarHeap::new();
    let yes = heap.boolean(true);
    let before = heap.refcnt(yes);
    heap.refcnt_inc(yes);
    heap.refcnt_dec(yes);
    heap.refcnt_dec(yes);
    heap.mortalize(yes);
    assert_eq!(heap.refcnt(yes), before);
    assert_eq!(heap.mortal_count(), 0);
}

#[test]
fn test_assignment_moves_reference_claims() {
    let heap = ScalarHeap::new();
    let a = heap.new_sv();
    let b = heap.new_sv();
    let rv = heap.new_rv(a, RefClaim::Increment);
    let copy = heap.new_sv();
    heap.set_sv(copy, rv);
    assert_eq!(heap.refcnt(a), 3);

    let other = heap.new_rv(b, RefClaim::Increment);
    heap.set_sv(copy, other);
    assert_eq!(heap.refcnt(a), 2);
    assert_eq!(heap.refcnt(b), 3);
}
