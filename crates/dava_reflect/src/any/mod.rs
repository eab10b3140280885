//! Type-erased values and callables.
//!
//! - [`Any`]: an owned value of any type, possibly empty.
//! - [`AnyFn`]: a callable with a runtime signature, invoked with `Any`
//!   arguments.

// -----------------------------------------------------------------------------
// Modules

mod any_fn;
mod cast;

// -----------------------------------------------------------------------------
// Exports

pub use any_fn::{AnyFn, AnyFnParams, IntoAnyFn, IntoMethod, InvokeError, ThisParam};
pub use cast::CastError;

pub(crate) use cast::{can_cast_builtin, cast_builtin};

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use core::fmt;

use dava_utils::FastName;

use crate::object::ErasedPtr;
use crate::{Reflected, TypeToken};

// -----------------------------------------------------------------------------
// Storage

trait AnyBox: Send + Sync {
    fn clone_box(&self) -> Option<Box<dyn AnyBox>>;
    fn token(&self) -> TypeToken;
    fn erased(&self) -> ErasedPtr;
    fn erased_mut(&mut self) -> ErasedPtr;
    fn as_any(&self) -> &dyn core::any::Any;
    fn as_any_mut(&mut self) -> &mut dyn core::any::Any;
    fn into_any(self: Box<Self>) -> Box<dyn core::any::Any>;
}

struct Stored<T> {
    value: T,
    clone: Option<fn(&T) -> Option<T>>,
}

impl<T: Send + Sync + 'static> AnyBox for Stored<T> {
    fn clone_box(&self) -> Option<Box<dyn AnyBox>> {
        let value = (self.clone?)(&self.value)?;
        Some(Box::new(Stored {
            value,
            clone: self.clone,
        }))
    }

    #[inline]
    fn token(&self) -> TypeToken {
        TypeToken::of::<T>()
    }

    #[inline]
    fn erased(&self) -> ErasedPtr {
        ErasedPtr::of(&self.value)
    }

    #[inline]
    fn erased_mut(&mut self) -> ErasedPtr {
        ErasedPtr::of_mut(&mut self.value)
    }

    #[inline]
    fn as_any(&self) -> &dyn core::any::Any {
        &self.value
    }

    #[inline]
    fn as_any_mut(&mut self) -> &mut dyn core::any::Any {
        &mut self.value
    }

    #[inline]
    fn into_any(self: Box<Self>) -> Box<dyn core::any::Any> {
        Box::new(self.value)
    }
}

// -----------------------------------------------------------------------------
// Any

/// An owned, type-erased value.
///
/// An `Any` is either empty or holds exactly one value. Values stored with
/// [`Any::new`] can be duplicated with [`try_clone`](Any::try_clone), values
/// stored with [`Any::new_unique`] can only be moved.
///
/// # Examples
///
/// ```
/// use dava_reflect::any::Any;
///
/// let value = Any::new(42_i32);
/// assert!(value.is::<i32>());
/// assert_eq!(value.get::<i32>(), Some(&42));
///
/// // Built-in numeric conversions.
/// assert_eq!(value.cast::<f64>(), Ok(42.0));
/// assert!(value.cast::<u8>().is_ok());
/// assert!(Any::new(-1_i32).cast::<u8>().is_err());
///
/// assert!(Any::empty().is_empty());
/// ```
#[derive(Default)]
pub struct Any {
    value: Option<Box<dyn AnyBox>>,
}

impl Any {
    /// Creates an empty value.
    #[inline]
    pub const fn empty() -> Self {
        Self { value: None }
    }

    /// Stores a cloneable value.
    pub fn new<T: Clone + Send + Sync + 'static>(value: T) -> Self {
        Self {
            value: Some(Box::new(Stored {
                value,
                clone: Some(|v: &T| Some(v.clone())),
            })),
        }
    }

    /// Stores a value that can only be moved out again.
    pub fn new_unique<T: Send + Sync + 'static>(value: T) -> Self {
        Self {
            value: Some(Box::new(Stored { value, clone: None })),
        }
    }

    /// Stores a value copied through [`Reflected::reflect_clone`].
    pub fn from_reflected<T: Reflected>(value: T) -> Self {
        Self {
            value: Some(Box::new(Stored {
                value,
                clone: Some(T::reflect_clone),
            })),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    /// Token of the held value, `None` when empty.
    #[inline]
    pub fn type_token(&self) -> Option<TypeToken> {
        self.value.as_ref().map(|v| v.token())
    }

    /// Returns `true` if the held value is a `T`.
    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_token().is_some_and(|t| t.is::<T>())
    }

    #[inline]
    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.value.as_ref()?.as_any().downcast_ref()
    }

    #[inline]
    pub fn get_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.value.as_mut()?.as_any_mut().downcast_mut()
    }

    /// Moves the value out, or gives `self` back if it is not a `T`.
    pub fn take<T: 'static>(self) -> Result<T, Self> {
        if !self.is::<T>() {
            return Err(self);
        }
        match self.value {
            Some(value) => value
                .into_any()
                .downcast::<T>()
                .map(|v| *v)
                .map_err(|_| Self::empty()),
            None => Err(self),
        }
    }

    /// Duplicates the value.
    ///
    /// An empty `Any` clones to an empty `Any`. Returns `None` if the held
    /// value cannot be copied.
    pub fn try_clone(&self) -> Option<Self> {
        match &self.value {
            None => Some(Self::empty()),
            Some(value) => Some(Self {
                value: Some(value.clone_box()?),
            }),
        }
    }

    /// Returns `true` if [`try_clone`](Self::try_clone) would succeed.
    pub fn is_cloneable(&self) -> bool {
        self.try_clone().is_some()
    }

    /// Returns `true` if [`cast::<T>`](Self::cast) can succeed for this kind of value.
    pub fn can_cast<T: 'static>(&self) -> bool {
        match self.type_token() {
            Some(from) => from.is::<T>() || can_cast_builtin(from, TypeToken::of::<T>()),
            None => false,
        }
    }

    /// Reads the value as a `T`, converting between built-in numeric and
    /// string types when needed.
    pub fn cast<T: Clone + 'static>(&self) -> Result<T, CastError> {
        if let Some(value) = self.get::<T>() {
            return Ok(value.clone());
        }
        let to = TypeToken::of::<T>();
        let converted = cast_builtin(self, to)?;
        converted.take::<T>().map_err(|_| CastError::NoConversion {
            from: self.type_token().unwrap_or(to),
            to,
        })
    }

    /// Borrows the value as text if it is a `String`, `&'static str` or [`FastName`].
    pub fn as_str(&self) -> Option<&str> {
        if let Some(s) = self.get::<String>() {
            return Some(s.as_str());
        }
        if let Some(s) = self.get::<&'static str>() {
            return Some(s);
        }
        self.get::<FastName>().map(|n| n.as_str())
    }

    /// Formats built-in values, `None` for anything else.
    pub(crate) fn display(&self) -> Option<String> {
        macro_rules! display {
            ($($ty:ty),* $(,)?) => {$(
                if let Some(v) = self.get::<$ty>() {
                    return Some(v.to_string());
                }
            )*};
        }

        display!(
            bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
            String, &'static str, FastName,
        );
        None
    }

    #[inline]
    pub(crate) fn erased(&self) -> Option<ErasedPtr> {
        self.value.as_ref().map(|v| v.erased())
    }

    #[inline]
    pub(crate) fn erased_mut(&mut self) -> Option<ErasedPtr> {
        self.value.as_mut().map(|v| v.erased_mut())
    }
}

impl fmt::Debug for Any {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.type_token(), self.display()) {
            (None, _) => f.write_str("Any(<empty>)"),
            (Some(ty), Some(text)) => write!(f, "Any({ty}: {text})"),
            (Some(ty), None) => write!(f, "Any({ty})"),
        }
    }
}

macro_rules! impl_from_for_any {
    ($($ty:ty),* $(,)?) => {$(
        impl From<$ty> for Any {
            #[inline]
            fn from(value: $ty) -> Self {
                Self::new(value)
            }
        }
    )*};
}

impl_from_for_any!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, String,
    &'static str, FastName,
);

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::{Any, CastError};
    use crate::TypeToken;

    struct NoClone(u8);

    #[test]
    fn take_moves_value_out() {
        let value = Any::new_unique(NoClone(3));
        assert!(value.try_clone().is_none());
        let value = value.take::<i32>().unwrap_err();
        assert_eq!(value.take::<NoClone>().ok().map(|v| v.0), Some(3));
    }

    #[test]
    fn clone_keeps_type() {
        let value = Any::new(String::from("abc"));
        let copy = value.try_clone().unwrap();
        assert_eq!(copy.as_str(), Some("abc"));
        assert_eq!(copy.type_token(), Some(TypeToken::of::<String>()));
        assert!(Any::empty().try_clone().unwrap().is_empty());
    }

    #[test]
    fn casts_between_builtins() {
        assert_eq!(Any::new(3.9_f64).cast::<i32>(), Ok(3));
        assert_eq!(Any::new(true).cast::<u8>(), Ok(1));
        assert_eq!(Any::new("name").cast::<String>().as_deref(), Ok("name"));
        assert!(Any::new(300_i32).can_cast::<u8>());
        assert!(matches!(
            Any::new(300_i32).cast::<u8>(),
            Err(CastError::OutOfRange { .. })
        ));
        assert!(matches!(Any::empty().cast::<u8>(), Err(CastError::Empty)));
        assert!(!Any::new_unique(NoClone(1)).can_cast::<u8>());
    }

    #[test]
    fn debug_shows_builtin_values() {
        assert_eq!(alloc::format!("{:?}", Any::new(5_u8)), "Any(u8: 5)");
        assert_eq!(alloc::format!("{:?}", Any::empty()), "Any(<empty>)");
    }
}
