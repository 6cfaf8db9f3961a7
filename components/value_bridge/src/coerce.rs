//! Conversions from foreign scalars to host values.
//!
//! Every conversion has a checked form, which validates that the scalar
//! really holds a value of the target type, and an unchecked form, which
//! reads the runtime's slot unconditionally. Checked forms read the value
//! first: the read is what makes the runtime cache the converted slot and
//! update the flags the check then inspects.

use bridge_types::Interpreter;
use num_traits::{AsPrimitive, FromPrimitive};

use crate::error::{BridgeError, ErrorKind, Result};
use crate::Scalar;

/// A host type that can be read out of a foreign scalar.
pub trait FromScalar<I: Interpreter>: Sized {
    /// Converts `value`, failing if it does not hold a `Self`.
    ///
    /// The error carries its own claim on `value`.
    fn from_scalar<'i>(value: &Scalar<'i, I>) -> Result<'i, Self, I>;

    /// Converts `value` without validation.
    fn from_scalar_unchecked(value: &Scalar<'_, I>) -> Self;
}

impl<'i, I: Interpreter> Scalar<'i, I> {
    /// Checked conversion to `T`.
    pub fn get<T: FromScalar<I>>(&self) -> Result<'i, T, I> {
        T::from_scalar(self)
    }

    /// Unchecked conversion to `T`.
    pub fn get_unchecked<T: FromScalar<I>>(&self) -> T {
        T::from_scalar_unchecked(self)
    }
}

fn not_number<'i, I: Interpreter>(value: &Scalar<'i, I>, want: &'static str) -> BridgeError<'i, I> {
    BridgeError::new(ErrorKind::NotNumber { want }, value)
}

impl<I: Interpreter> FromScalar<I> for bool {
    fn from_scalar<'i>(value: &Scalar<'i, I>) -> Result<'i, Self, I> {
        Ok(Self::from_scalar_unchecked(value))
    }

    fn from_scalar_unchecked(value: &Scalar<'_, I>) -> Self {
        value.interp().sv_true(value.raw())
    }
}

impl<I: Interpreter> FromScalar<I> for i64 {
    fn from_scalar<'i>(value: &Scalar<'i, I>) -> Result<'i, Self, I> {
        let v = Self::from_scalar_unchecked(value);
        let flags = value.flags();
        let fits = (v as u64) <= i64::MAX as u64;
        let ok = flags.is_integer() && (!flags.is_unsigned() || fits)
            || flags.is_float() && (!flags.is_unsigned() && v != i64::MIN || fits);
        if ok {
            Ok(v)
        } else {
            Err(not_number(value, "i64"))
        }
    }

    fn from_scalar_unchecked(value: &Scalar<'_, I>) -> Self {
        value.interp().sv_iv(value.raw())
    }
}

impl<I: Interpreter> FromScalar<I> for u64 {
    fn from_scalar<'i>(value: &Scalar<'i, I>) -> Result<'i, Self, I> {
        let v = Self::from_scalar_unchecked(value);
        let flags = value.flags();
        let non_negative = (v as i64) >= 0;
        let ok = flags.is_integer() && (flags.is_unsigned() || non_negative)
            || flags.is_float() && (flags.is_unsigned() && v != u64::MAX || non_negative);
        if ok {
            Ok(v)
        } else {
            Err(not_number(value, "u64"))
        }
    }

    fn from_scalar_unchecked(value: &Scalar<'_, I>) -> Self {
        value.interp().sv_uv(value.raw())
    }
}

/// Narrow integers go through the 64-bit rule of matching signedness and
/// then must fit the target width.
macro_rules! narrow_int {
    ($($t:ty => $wide:ty, $from:ident;)*) => {$(
        impl<I: Interpreter> FromScalar<I> for $t {
            fn from_scalar<'i>(value: &Scalar<'i, I>) -> Result<'i, Self, I> {
                let wide = <$wide as FromScalar<I>>::from_scalar(value)
                    .map_err(|err| err.with_want(stringify!($t)))?;
                <$t as FromPrimitive>::$from(wide).ok_or_else(|| not_number(value, stringify!($t)))
            }

            fn from_scalar_unchecked(value: &Scalar<'_, I>) -> Self {
                <$wide as FromScalar<I>>::from_scalar_unchecked(value).as_()
            }
        }
    )*};
}

narrow_int! {
    i8 => i64, from_i64;
    i16 => i64, from_i64;
    i32 => i64, from_i64;
    isize => i64, from_i64;
    u8 => u64, from_u64;
    u16 => u64, from_u64;
    u32 => u64, from_u64;
    usize => u64, from_u64;
}

impl<I: Interpreter> FromScalar<I> for f64 {
    fn from_scalar<'i>(value: &Scalar<'i, I>) -> Result<'i, Self, I> {
        let v = Self::from_scalar_unchecked(value);
        if value.flags().is_numeric() {
            Ok(v)
        } else {
            Err(not_number(value, "f64"))
        }
    }

    fn from_scalar_unchecked(value: &Scalar<'_, I>) -> Self {
        value.interp().sv_nv(value.raw())
    }
}

impl<I: Interpreter> FromScalar<I> for f32 {
    fn from_scalar<'i>(value: &Scalar<'i, I>) -> Result<'i, Self, I> {
        f64::from_scalar(value)
            .map(|v| v.as_())
            .map_err(|err| err.with_want("f32"))
    }

    fn from_scalar_unchecked(value: &Scalar<'_, I>) -> Self {
        f64::from_scalar_unchecked(value).as_()
    }
}

/// Fails unless the scalar, once stringified, is string or float flagged.
fn check_stringy<'i, I: Interpreter>(value: &Scalar<'i, I>) -> Result<'i, (), I> {
    let flags = value.flags();
    if flags.is_string() || flags.is_float() {
        Ok(())
    } else {
        Err(BridgeError::new(ErrorKind::NotStringOrNumber, value))
    }
}

impl<I: Interpreter> FromScalar<I> for String {
    fn from_scalar<'i>(value: &Scalar<'i, I>) -> Result<'i, Self, I> {
        let text = Self::from_scalar_unchecked(value);
        check_stringy(value).map(|()| text)
    }

    fn from_scalar_unchecked(value: &Scalar<'_, I>) -> Self {
        let bytes = value.with_bytes(<[u8]>::to_vec);
        if value.is_utf8() {
            match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
            }
        } else {
            bytes.into_iter().map(char::from).collect()
        }
    }
}

impl<I: Interpreter> FromScalar<I> for Vec<u8> {
    fn from_scalar<'i>(value: &Scalar<'i, I>) -> Result<'i, Self, I> {
        let bytes = Self::from_scalar_unchecked(value);
        check_stringy(value).map(|()| bytes)
    }

    fn from_scalar_unchecked(value: &Scalar<'_, I>) -> Self {
        value.with_bytes(<[u8]>::to_vec)
    }
}
