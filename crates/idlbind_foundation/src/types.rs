//! Built-in primitive types of the interface definition language.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A built-in type that needs no declaration to resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Primitive {
    /// `any`
    Any,
    /// `undefined`
    Undefined,
    /// `boolean`
    Boolean,
    /// `byte`
    Byte,
    /// `octet`
    Octet,
    /// `short`
    Short,
    /// `unsigned short`
    UnsignedShort,
    /// `long`
    Long,
    /// `unsigned long`
    UnsignedLong,
    /// `long long`
    LongLong,
    /// `unsigned long long`
    UnsignedLongLong,
    /// `float`
    Float,
    /// `unrestricted float`
    UnrestrictedFloat,
    /// `double`
    Double,
    /// `unrestricted double`
    UnrestrictedDouble,
    /// `bigint`
    BigInt,
    /// `DOMString`
    DomString,
    /// `ByteString`
    ByteString,
    /// `USVString`
    UsvString,
    /// `object`
    Object,
    /// `symbol`
    Symbol,
}

impl Primitive {
    /// Every primitive, in declaration order.
    pub const ALL: [Primitive; 21] = [
        Self::Any,
        Self::Undefined,
        Self::Boolean,
        Self::Byte,
        Self::Octet,
        Self::Short,
        Self::UnsignedShort,
        Self::Long,
        Self::UnsignedLong,
        Self::LongLong,
        Self::UnsignedLongLong,
        Self::Float,
        Self::UnrestrictedFloat,
        Self::Double,
        Self::UnrestrictedDouble,
        Self::BigInt,
        Self::DomString,
        Self::ByteString,
        Self::UsvString,
        Self::Object,
        Self::Symbol,
    ];

    /// Looks up a primitive by its source spelling (e.g. `"unsigned long"`).
    ///
    /// Multi-word spellings use a single space between words.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// Returns the source spelling of this primitive.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Undefined => "undefined",
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Octet => "octet",
            Self::Short => "short",
            Self::UnsignedShort => "unsigned short",
            Self::Long => "long",
            Self::UnsignedLong => "unsigned long",
            Self::LongLong => "long long",
            Self::UnsignedLongLong => "unsigned long long",
            Self::Float => "float",
            Self::UnrestrictedFloat => "unrestricted float",
            Self::Double => "double",
            Self::UnrestrictedDouble => "unrestricted double",
            Self::BigInt => "bigint",
            Self::DomString => "DOMString",
            Self::ByteString => "ByteString",
            Self::UsvString => "USVString",
            Self::Object => "object",
            Self::Symbol => "symbol",
        }
    }

    /// Returns true for the integer types.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            Self::Byte
                | Self::Octet
                | Self::Short
                | Self::UnsignedShort
                | Self::Long
                | Self::UnsignedLong
                | Self::LongLong
                | Self::UnsignedLongLong
        )
    }

    /// Returns true for the floating point types.
    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(
            self,
            Self::Float | Self::UnrestrictedFloat | Self::Double | Self::UnrestrictedDouble
        )
    }

    /// Returns true for float types that admit `NaN` and the infinities.
    #[must_use]
    pub const fn is_unrestricted(self) -> bool {
        matches!(self, Self::UnrestrictedFloat | Self::UnrestrictedDouble)
    }

    /// Returns true for any numeric type, `bigint` included.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float() || matches!(self, Self::BigInt)
    }

    /// Returns true for the string types.
    #[must_use]
    pub const fn is_string(self) -> bool {
        matches!(self, Self::DomString | Self::ByteString | Self::UsvString)
    }

    /// Returns the inclusive value range of an integer type.
    #[must_use]
    pub const fn integer_range(self) -> Option<(i128, i128)> {
        match self {
            Self::Byte => Some((i8::MIN as i128, i8::MAX as i128)),
            Self::Octet => Some((0, u8::MAX as i128)),
            Self::Short => Some((i16::MIN as i128, i16::MAX as i128)),
            Self::UnsignedShort => Some((0, u16::MAX as i128)),
            Self::Long => Some((i32::MIN as i128, i32::MAX as i128)),
            Self::UnsignedLong => Some((0, u32::MAX as i128)),
            Self::LongLong => Some((i64::MIN as i128, i64::MAX as i128)),
            Self::UnsignedLongLong => Some((0, u64::MAX as i128)),
            _ => None,
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
