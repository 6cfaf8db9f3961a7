//! Scalar type tag bits and body kinds.
//!
//! Flags are maintained by the foreign runtime. The bridge only reads them;
//! setters on the runtime side update them as a side effect.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Type tag bits of a scalar value.
///
/// Public flags (`IOK`, `NOK`, `POK`) mean the slot holds a value that fully
/// represents the scalar. Private flags (`P_IOK`, `P_NOK`, `P_POK`) mean a
/// cached value exists but may be lossy, as for the integer part of `"12abc"`.
///
/// # Examples
///
/// ```
/// use bridge_types::SvFlags;
///
/// let mut flags = SvFlags::empty();
/// assert!(!flags.is_defined());
///
/// flags.insert(SvFlags::P_IOK);
/// assert!(flags.is_defined());
/// assert!(!flags.is_integer());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SvFlags(u32);

impl SvFlags {
    /// Integer slot is valid
    pub const IOK: SvFlags = SvFlags(1 << 0);
    /// Float slot is valid
    pub const NOK: SvFlags = SvFlags(1 << 1);
    /// String slot is valid
    pub const POK: SvFlags = SvFlags(1 << 2);
    /// Scalar is a reference
    pub const ROK: SvFlags = SvFlags(1 << 3);
    /// Integer slot holds a cached, possibly lossy value
    pub const P_IOK: SvFlags = SvFlags(1 << 4);
    /// Float slot holds a cached, possibly lossy value
    pub const P_NOK: SvFlags = SvFlags(1 << 5);
    /// String slot holds a cached value
    pub const P_POK: SvFlags = SvFlags(1 << 6);
    /// Integer slot is to be read as unsigned
    pub const IS_UV: SvFlags = SvFlags(1 << 7);
    /// String slot holds UTF-8 encoded characters rather than bytes
    pub const UTF8: SvFlags = SvFlags(1 << 8);
    /// Scalar is blessed into a class
    pub const OBJECT: SvFlags = SvFlags(1 << 9);
    /// Scalar is registered with the innermost dynamic scope
    pub const TEMP: SvFlags = SvFlags(1 << 10);
    /// Scalar is immortal and cannot be modified
    pub const READONLY: SvFlags = SvFlags(1 << 11);

    /// Every bit that says the scalar holds some value.
    pub const OK: SvFlags = SvFlags(
        Self::IOK.0
            | Self::NOK.0
            | Self::POK.0
            | Self::ROK.0
            | Self::P_IOK.0
            | Self::P_NOK.0
            | Self::P_POK.0,
    );

    const NAMES: [(SvFlags, &'static str); 12] = [
        (Self::IOK, "IOK"),
        (Self::NOK, "NOK"),
        (Self::POK, "POK"),
        (Self::ROK, "ROK"),
        (Self::P_IOK, "pIOK"),
        (Self::P_NOK, "pNOK"),
        (Self::P_POK, "pPOK"),
        (Self::IS_UV, "IsUV"),
        (Self::UTF8, "UTF8"),
        (Self::OBJECT, "OBJECT"),
        (Self::TEMP, "TEMP"),
        (Self::READONLY, "READONLY"),
    ];

    /// Returns a flag set with no bits set.
    pub const fn empty() -> Self {
        SvFlags(0)
    }

    /// Returns the raw bit representation.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Builds a flag set from raw bits.
    pub const fn from_bits(bits: u32) -> Self {
        SvFlags(bits)
    }

    /// Returns true if every bit of `other` is set.
    pub const fn contains(self, other: SvFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true if any bit of `other` is set.
    pub const fn intersects(self, other: SvFlags) -> bool {
        self.0 & other.0 != 0
    }

    /// Sets every bit of `other`.
    pub fn insert(&mut self, other: SvFlags) {
        self.0 |= other.0;
    }

    /// Clears every bit of `other`.
    pub fn remove(&mut self, other: SvFlags) {
        self.0 &= !other.0;
    }

    /// Sets or clears the bits of `other`.
    pub fn set(&mut self, other: SvFlags, on: bool) {
        if on {
            self.insert(other);
        } else {
            self.remove(other);
        }
    }

    /// Scalar holds any value, public or cached.
    pub const fn is_defined(self) -> bool {
        self.intersects(Self::OK)
    }

    /// Public integer flag.
    pub const fn is_integer(self) -> bool {
        self.contains(Self::IOK)
    }

    /// Public float flag.
    pub const fn is_float(self) -> bool {
        self.contains(Self::NOK)
    }

    /// Public integer or float flag.
    pub const fn is_numeric(self) -> bool {
        self.intersects(SvFlags(Self::IOK.0 | Self::NOK.0))
    }

    /// Public string flag.
    pub const fn is_string(self) -> bool {
        self.contains(Self::POK)
    }

    /// Reference flag.
    pub const fn is_reference(self) -> bool {
        self.contains(Self::ROK)
    }

    /// Integer slot is unsigned.
    pub const fn is_unsigned(self) -> bool {
        self.contains(Self::IS_UV)
    }

    /// String slot holds characters.
    pub const fn is_utf8(self) -> bool {
        self.contains(Self::UTF8)
    }
}

impl BitOr for SvFlags {
    type Output = SvFlags;

    fn bitor(self, rhs: SvFlags) -> SvFlags {
        SvFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for SvFlags {
    fn bitor_assign(&mut self, rhs: SvFlags) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for SvFlags {
    type Output = SvFlags;

    fn bitand(self, rhs: SvFlags) -> SvFlags {
        SvFlags(self.0 & rhs.0)
    }
}

/// Formats as the runtime's dump notation, e.g. `(IOK,pIOK)`.
impl fmt::Debug for SvFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "({})", names.join(","))
    }
}

/// Body kind of a scalar value.
///
/// A scalar's body is upgraded as it caches more representations; it is
/// never downgraded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SvType {
    /// No value has ever been stored
    Null,
    /// Integer or reference
    Iv,
    /// Float
    Nv,
    /// String
    Pv,
    /// String with a cached integer
    PvIv,
    /// String with cached integer and float
    PvNv,
    /// Blessed or carrying extension records
    PvMg,
}

impl fmt::Display for SvType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SvType::Null => "NULL",
            SvType::Iv => "IV",
            SvType::Nv => "NV",
            SvType::Pv => "PV",
            SvType::PvIv => "PVIV",
            SvType::PvNv => "PVNV",
            SvType::PvMg => "PVMG",
        };
        f.write_str(name)
    }
}
