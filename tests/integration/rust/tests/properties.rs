//! Property Tests for the Value Bridge
//!
//! Round trips, stealing-copy equivalence and hash/equality consistency
//! over generated values.

use proptest::prelude::*;
use scalar_heap::ScalarHeap;
use value_bridge::{Mortality, Scalar, StringUnits};

/// Generated scalar contents
#[derive(Debug, Clone)]
enum Content {
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Bool(bool),
    Undef,
}

fn content() -> impl Strategy<Value = Content> {
    prop_oneof![
        any::<i64>().prop_map(Content::Int),
        any::<u64>().prop_map(Content::UInt),
        any::<f64>().prop_map(Content::Float),
        any::<String>().prop_map(Content::Text),
        proptest::collection::vec(any::<u8>(), 0..32).prop_map(Content::Bytes),
        any::<bool>().prop_map(Content::Bool),
        Just(Content::Undef),
    ]
}

fn make<'h>(heap: &'h ScalarHeap, content: &Content) -> Scalar<'h, ScalarHeap> {
    let sv = Scalar::new(heap);
    match content {
        Content::Int(v) => sv.set_int(*v),
        Content::UInt(v) => sv.set_uint(*v),
        Content::Float(v) => sv.set_float(*v),
        Content::Text(v) => sv.set_str(v),
        Content::Bytes(v) => sv.set_bytes(v, StringUnits::Bytes),
        Content::Bool(v) => sv.set_bool(*v),
        Content::Undef => {}
    }
    sv
}

proptest! {
    #[test]
    fn prop_int_round_trip(v in any::<i64>()) {
        let heap = ScalarHeap::new();
        let sv = Scalar::new(&heap);
        sv.set_int(v);
        prop_assert_eq!(sv.get::<i64>().unwrap(), v);
    }

    #[test]
    fn prop_uint_round_trip(v in any::<u64>()) {
        let heap = ScalarHeap::new();
        let sv = Scalar::new(&heap);
        sv.set_uint(v);
        prop_assert_eq!(sv.get::<u64>().unwrap(), v);
        prop_assert_eq!(sv.get::<i64>().is_ok(), v <= i64::MAX as u64);
    }

    #[test]
    fn prop_negative_never_unsigned(v in i64::MIN..0) {
        let heap = ScalarHeap::new();
        let sv = Scalar::new(&heap);
        sv.set_int(v);
        prop_assert!(sv.get::<u64>().is_err());
    }

    #[test]
    fn prop_float_round_trip(v in any::<f64>().prop_filter("not NaN", |v| !v.is_nan())) {
        let heap = ScalarHeap::new();
        let sv = Scalar::new(&heap);
        sv.set_float(v);
        prop_assert_eq!(sv.get::<f64>().unwrap(), v);
    }

    #[test]
    fn prop_text_round_trip(text in any::<String>()) {
        let heap = ScalarHeap::new();
        let sv = Scalar::new(&heap);
        sv.set_str(&text);
        prop_assert!(sv.is_string());
        prop_assert_eq!(sv.is_utf8(), text.len() != text.chars().count());
        prop_assert_eq!(sv.get::<String>().unwrap(), text.clone());

        let fresh = Scalar::from_str(&heap, &text, Mortality::Owned);
        prop_assert_eq!(fresh.is_utf8(), sv.is_utf8());
        prop_assert!(fresh.equals(&sv));
    }

    #[test]
    fn prop_bytes_round_trip(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        let heap = ScalarHeap::new();
        let sv = Scalar::new(&heap);
        sv.set_bytes(&bytes, StringUnits::Bytes);
        prop_assert!(!sv.is_utf8());
        prop_assert_eq!(sv.get::<Vec<u8>>().unwrap(), bytes);
    }

    #[test]
    fn prop_bool_round_trip(v in any::<bool>()) {
        let heap = ScalarHeap::new();
        let sv = Scalar::new(&heap);
        sv.set_bool(v);
        prop_assert_eq!(sv.get::<bool>().unwrap(), v);
    }

    #[test]
    fn prop_stealing_copy_equals_copy(c in content()) {
        let heap = ScalarHeap::new();
        let src = make(&heap, &c);
        let copy = Scalar::new_copy(&src);
        let stolen = Scalar::new_stealing_copy(&src);
        prop_assert!(copy.equals(&stolen));
        prop_assert!(stolen.equals(&src));
        prop_assert_eq!(copy.is_defined(), stolen.is_defined());

        for sv in [src, copy, stolen] {
            sv.dec();
        }
        prop_assert_eq!(heap.live_count(), 0);
    }

    #[test]
    fn prop_equal_implies_same_hash(a in content(), b in content()) {
        let heap = ScalarHeap::new();
        let sa = make(&heap, &a);
        let sb = make(&heap, &b);
        if sa.equals(&sb) {
            prop_assert_eq!(sa.content_hash(), sb.content_hash());
        }
        let sa2 = Scalar::new_copy(&sa);
        prop_assert!(sa.equals(&sa2));
        prop_assert_eq!(sa.content_hash(), sa2.content_hash());
    }
}
