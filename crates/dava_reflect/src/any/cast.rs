use alloc::string::String;

use dava_utils::FastName;
use thiserror::Error;

use crate::TypeToken;
use crate::any::Any;

// -----------------------------------------------------------------------------
// CastError

/// Failure to read an [`Any`] as another type.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum CastError {
    #[error("cannot cast an empty value")]
    Empty,
    #[error("no conversion from `{from}` to `{to}`")]
    NoConversion { from: TypeToken, to: TypeToken },
    #[error("value of `{from}` does not fit into `{to}`")]
    OutOfRange { from: TypeToken, to: TypeToken },
}

// -----------------------------------------------------------------------------
// Built-in conversions

#[derive(Clone, Copy)]
enum Number {
    Int(i128),
    Float(f64),
}

macro_rules! is_any_of {
    ($token:expr; $($ty:ty),* $(,)?) => {
        false $(|| $token.is::<$ty>())*
    };
}

fn is_number(ty: TypeToken) -> bool {
    is_any_of!(ty; bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64)
}

fn is_text(ty: TypeToken) -> bool {
    is_any_of!(ty; String, &'static str, FastName)
}

/// Returns `true` if [`cast_builtin`] knows a conversion between the two types.
pub(crate) fn can_cast_builtin(from: TypeToken, to: TypeToken) -> bool {
    (is_number(from) && is_number(to) && !to.is::<char>())
        || (is_text(from) && (to.is::<String>() || to.is::<FastName>()))
}

fn read_number(value: &Any) -> Option<Number> {
    macro_rules! read_int {
        ($($ty:ty),*) => {$(
            if let Some(v) = value.get::<$ty>() {
                return Some(Number::Int(i128::from(*v)));
            }
        )*};
    }

    read_int!(i8, i16, i32, i64, i128, u8, u16, u32, u64, bool);
    if let Some(v) = value.get::<isize>() {
        return Some(Number::Int(*v as i128));
    }
    if let Some(v) = value.get::<usize>() {
        return Some(Number::Int(*v as i128));
    }
    if let Some(v) = value.get::<u128>() {
        return i128::try_from(*v).ok().map(Number::Int);
    }
    if let Some(v) = value.get::<char>() {
        return Some(Number::Int(i128::from(u32::from(*v))));
    }
    if let Some(v) = value.get::<f32>() {
        return Some(Number::Float(f64::from(*v)));
    }
    value.get::<f64>().map(|v| Number::Float(*v))
}

/// `None` if `to` is not numeric, `Some(None)` if the value does not fit.
fn write_number(number: Number, to: TypeToken) -> Option<Option<Any>> {
    macro_rules! write_int {
        ($($ty:ty),*) => {$(
            if to.is::<$ty>() {
                return Some(match number {
                    Number::Int(v) => <$ty>::try_from(v).ok().map(Any::new),
                    Number::Float(v) if v >= <$ty>::MIN as f64 && v <= <$ty>::MAX as f64 => {
                        Some(Any::new(v as $ty))
                    }
                    Number::Float(_) => None,
                });
            }
        )*};
    }

    write_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
    if to.is::<f32>() {
        return Some(Some(Any::new(match number {
            Number::Int(v) => v as f32,
            Number::Float(v) => v as f32,
        })));
    }
    if to.is::<f64>() {
        return Some(Some(Any::new(match number {
            Number::Int(v) => v as f64,
            Number::Float(v) => v,
        })));
    }
    if to.is::<bool>() {
        return Some(Some(Any::new(match number {
            Number::Int(v) => v != 0,
            Number::Float(v) => v != 0.0,
        })));
    }
    None
}

/// Converts between built-in numeric and text types.
///
/// Identical types are copied, which fails for values stored without a
/// clone function.
pub(crate) fn cast_builtin(value: &Any, to: TypeToken) -> Result<Any, CastError> {
    let Some(from) = value.type_token() else {
        return Err(CastError::Empty);
    };
    if from == to {
        return value.try_clone().ok_or(CastError::NoConversion { from, to });
    }

    if let Some(number) = read_number(value)
        && let Some(result) = write_number(number, to)
    {
        return result.ok_or(CastError::OutOfRange { from, to });
    }

    if let Some(text) = value.as_str() {
        if to.is::<String>() {
            return Ok(Any::new(String::from(text)));
        }
        if to.is::<FastName>() {
            return Ok(Any::new(FastName::new(text)));
        }
    }

    Err(CastError::NoConversion { from, to })
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use dava_utils::FastName;

    use super::{can_cast_builtin, cast_builtin};
    use crate::TypeToken;
    use crate::any::Any;

    #[test]
    fn text_converts_to_names() {
        let name = cast_builtin(&Any::new(String::from("Pos")), TypeToken::of::<FastName>()).unwrap();
        assert_eq!(name.get::<FastName>().map(|n| n.as_str()), Some("Pos"));
        assert!(can_cast_builtin(
            TypeToken::of::<&'static str>(),
            TypeToken::of::<String>()
        ));
        assert!(!can_cast_builtin(TypeToken::of::<String>(), TypeToken::of::<i32>()));
    }

    #[test]
    fn float_out_of_range() {
        assert!(cast_builtin(&Any::new(1e20_f64), TypeToken::of::<i32>()).is_err());
        let v = cast_builtin(&Any::new(-2.5_f32), TypeToken::of::<i64>()).unwrap();
        assert_eq!(v.get::<i64>(), Some(&-2));
    }
}
