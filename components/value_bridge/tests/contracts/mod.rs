//! Contract tests for the value bridge API
//!
//! These tests verify the public API exists with the documented ownership
//! behavior for each operation.

use std::rc::Rc;

use scalar_heap::ScalarHeap;
use value_bridge::{
    BridgeError, ErrorKind, FromScalar, Interpreter, Mortality, Result, Scalar, Scope,
    StringUnits, HOST_OBJECT_TAG,
};

/// Test factories return owning handles
#[test]
fn test_factories_return_owned_handles() {
    let heap = ScalarHeap::new();
    let src = Scalar::from_str(&heap, "s", Mortality::Owned);
    let handles = vec![
        Scalar::new(&heap),
        Scalar::new_copy(&src),
        Scalar::new_stealing_copy(&src),
        Scalar::from_bool(&heap, true),
        Scalar::from_bytes(&heap, b"b", StringUnits::Bytes, Mortality::Owned),
        Scalar::new_ref_inc(&src),
    ];
    for sv in handles {
        assert_eq!(sv.refcnt(), 1);
        sv.dec();
    }
    src.dec();
    assert_eq!(heap.live_count(), 0);
}

/// Test mortal factories hand the claim to the scope
#[test]
fn test_mortal_factories() {
    let heap = ScalarHeap::new();
    let scope = Scope::enter(&heap);
    let a = Scalar::from_str(&heap, "a", Mortality::Mortal);
    let b = Scalar::from_bytes(&heap, b"b", StringUnits::Characters, Mortality::Mortal);
    let (ra, rb) = (a.raw(), b.raw());
    drop(scope);
    assert!(!heap.is_live(ra));
    assert!(!heap.is_live(rb));
}

/// Test FromScalar is implemented for every host type
#[test]
fn test_from_scalar_coverage() {
    fn both<'i, T: FromScalar<ScalarHeap>>(sv: &Scalar<'i, ScalarHeap>) -> (Result<'i, T, ScalarHeap>, T) {
        (T::from_scalar(sv), T::from_scalar_unchecked(sv))
    }

    let heap = ScalarHeap::new();
    let sv = Scalar::new(&heap);
    sv.set_int(7);
    assert!(both::<bool>(&sv).1);
    assert_eq!(both::<i8>(&sv).0.unwrap(), 7);
    assert_eq!(both::<i16>(&sv).0.unwrap(), 7);
    assert_eq!(both::<i32>(&sv).0.unwrap(), 7);
    assert_eq!(both::<i64>(&sv).0.unwrap(), 7);
    assert_eq!(both::<isize>(&sv).0.unwrap(), 7);
    assert_eq!(both::<u8>(&sv).0.unwrap(), 7);
    assert_eq!(both::<u16>(&sv).0.unwrap(), 7);
    assert_eq!(both::<u32>(&sv).0.unwrap(), 7);
    assert_eq!(both::<u64>(&sv).0.unwrap(), 7);
    assert_eq!(both::<usize>(&sv).0.unwrap(), 7);
    assert_eq!(both::<f32>(&sv).0.unwrap(), 7.0);
    assert_eq!(both::<f64>(&sv).0.unwrap(), 7.0);
    assert_eq!(both::<String>(&sv).0.unwrap(), "7");
    assert_eq!(both::<Vec<u8>>(&sv).0.unwrap(), b"7");
}

/// Test the error kinds reported by checked conversions
#[test]
fn test_error_kinds() {
    let heap = ScalarHeap::new();
    let undef = Scalar::new(&heap);
    let err: BridgeError<'_, ScalarHeap> = undef.get::<i64>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotNumber { want: "i64" });
    let err = undef.get::<String>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotStringOrNumber);
}

/// Test the object tag is stable and attached to wrapped referents
#[test]
fn test_host_object_tag() {
    let heap = ScalarHeap::new();
    let sv = Scalar::wrap(&heap, Rc::new(()), "Unit");
    let referent = sv.referent().unwrap();
    assert!(heap.has_ext(referent.raw(), *HOST_OBJECT_TAG));
    assert_eq!(*HOST_OBJECT_TAG, *HOST_OBJECT_TAG);
    assert_eq!(HOST_OBJECT_TAG.owner(), "value_bridge::host_object");
}
