//! Integration tests for Primitive
//!
//! Tests name lookup and numeric classification.

use idlbind_foundation::Primitive;

#[test]
fn multi_word_names() {
    assert_eq!(
        Primitive::from_name("unsigned long long"),
        Some(Primitive::UnsignedLongLong)
    );
    assert_eq!(
        Primitive::from_name("unrestricted double"),
        Some(Primitive::UnrestrictedDouble)
    );
    assert_eq!(Primitive::UnsignedShort.to_string(), "unsigned short");
}

#[test]
fn string_types() {
    for name in ["DOMString", "ByteString", "USVString"] {
        let primitive = Primitive::from_name(name).unwrap();
        assert!(primitive.is_string(), "{name}");
        assert!(!primitive.is_numeric(), "{name}");
    }
}

#[test]
fn integer_ranges_are_inclusive() {
    let (min, max) = Primitive::Byte.integer_range().unwrap();
    assert_eq!((min, max), (-128, 127));
    let (min, max) = Primitive::UnsignedLongLong.integer_range().unwrap();
    assert_eq!(min, 0);
    assert_eq!(max, i128::from(u64::MAX));
    assert!(Primitive::BigInt.integer_range().is_none());
}
