//! Numeric and string conversion tests

use bridge_types::{Interpreter, Mortality, SvFlags};
use scalar_heap::{HeapConfig, ScalarHeap};

fn string(heap: &ScalarHeap, text: &str) -> scalar_heap::SvId {
    heap.new_sv_bytes(text.as_bytes(), false, Mortality::Owned)
}

#[test]
fn test_set_uv_small_values_are_signed() {
    let heap = ScalarHeap::new();
    let sv = heap.new_sv();
    heap.set_uv(sv, 7);
    assert!(!heap.flags(sv).is_unsigned());
    assert_eq!(heap.sv_iv(sv), 7);

    heap.set_uv(sv, u64::MAX);
    assert!(heap.flags(sv).is_unsigned());
    assert_eq!(heap.sv_uv(sv), u64::MAX);
    assert_eq!(heap.sv_iv(sv), -1);
}

#[test]
fn test_large_integer_string_is_unsigned() {
    let heap = ScalarHeap::new();
    let sv = string(&heap, "18446744073709551615");
    assert_eq!(heap.sv_uv(sv), u64::MAX);
    let flags = heap.flags(sv);
    assert!(flags.is_integer());
    assert!(flags.is_unsigned());
}

#[test]
fn test_float_to_integer_caching() {
    let heap = ScalarHeap::new();
    let sv = heap.new_sv();
    heap.set_nv(sv, 2.0);
    assert_eq!(heap.sv_iv(sv), 2);
    assert!(heap.flags(sv).is_integer());

    heap.set_nv(sv, 2.5);
    assert_eq!(heap.sv_iv(sv), 2);
    assert!(!heap.flags(sv).is_integer());
    assert!(heap.flags(sv).contains(SvFlags::P_IOK));
}

#[test]
fn test_integer_to_float_caching() {
    let heap = ScalarHeap::new();
    let sv = heap.new_sv();
    heap.set_iv(sv, -12);
    assert_eq!(heap.sv_nv(sv), -12.0);
    assert!(heap.flags(sv).is_float());
}

#[test]
fn test_non_numeric_string_only_gets_private_flags() {
    let heap = ScalarHeap::new();
    let sv = string(&heap, "hello");
    assert_eq!(heap.sv_iv(sv), 0);
    assert_eq!(heap.sv_nv(sv), 0.0);
    let flags = heap.flags(sv);
    assert!(!flags.is_numeric());
    assert!(flags.is_string());
}

#[test]
fn test_stringification_of_numbers() {
    let heap = ScalarHeap::new();
    let sv = heap.new_sv();
    heap.set_iv(sv, -42);
    assert_eq!(heap.with_pv(sv, |b| b.to_vec()), b"-42");

    heap.set_nv(sv, 1e20);
    assert_eq!(heap.with_pv(sv, |b| b.to_vec()), b"1e+20");

    heap.set_nv(sv, f64::NAN);
    assert_eq!(heap.with_pv(sv, |b| b.to_vec()), b"NaN");
}

#[test]
fn test_utf8_decode() {
    let heap = ScalarHeap::new();
    let ascii = string(&heap, "plain");
    assert!(heap.utf8_decode(ascii));
    assert!(!heap.flags(ascii).is_utf8());

    let text = heap.new_sv_bytes("naïve".as_bytes(), false, Mortality::Owned);
    assert!(heap.utf8_decode(text));
    assert!(heap.flags(text).is_utf8());

    let broken = heap.new_sv_bytes(b"\xff\xfe", false, Mortality::Owned);
    assert!(!heap.utf8_decode(broken));
    assert!(!heap.flags(broken).is_utf8());
}

#[test]
fn test_set_pvn_clears_utf8() {
    let heap = ScalarHeap::new();
    let sv = heap.new_sv_bytes("é".as_bytes(), true, Mortality::Owned);
    assert!(heap.flags(sv).is_utf8());
    heap.set_pvn(sv, b"x");
    assert!(!heap.flags(sv).is_utf8());
}

#[test]
fn test_text_and_bytes_with_same_characters_are_equal() {
    let heap = ScalarHeap::new();
    let text = heap.new_sv_bytes("café".as_bytes(), true, Mortality::Owned);
    let bytes = heap.new_sv_bytes(b"caf\xe9", false, Mortality::Owned);
    assert!(heap.sv_eq(text, bytes));
    assert_eq!(heap.hash(text), heap.hash(bytes));
}

#[test]
fn test_numbers_compare_by_string_form() {
    let heap = ScalarHeap::new();
    let int = heap.new_sv();
    heap.set_iv(int, 1);
    let float = heap.new_sv();
    heap.set_nv(float, 1.0);
    let text = string(&heap, "1.0");

    assert!(heap.sv_eq(int, float));
    assert_eq!(heap.hash(int), heap.hash(float));
    assert!(!heap.sv_eq(int, text));
}

#[test]
fn test_undef_equals_empty_string() {
    let heap = ScalarHeap::new();
    let undef = heap.new_sv();
    let empty = string(&heap, "");
    assert!(heap.sv_eq(undef, empty));
    assert_eq!(heap.hash(undef), heap.hash(empty));
}

#[test]
fn test_hash_seed_comes_from_config() {
    let a = ScalarHeap::with_config(HeapConfig::default().with_hash_seed(1));
    let b = ScalarHeap::with_config(HeapConfig::default().with_hash_seed(2));
    let sa = a.new_sv_bytes(b"key", false, Mortality::Owned);
    let sb = b.new_sv_bytes(b"key", false, Mortality::Owned);
    assert_ne!(a.hash(sa), b.hash(sb));
}
