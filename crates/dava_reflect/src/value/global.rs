use std::sync::{PoisonError, RwLock};

use crate::any::Any;
use crate::object::ReflectedObject;
use crate::value::{ValueWrapper, clone_into_any};
use crate::{Reflected, TypeToken};

// -----------------------------------------------------------------------------
// StaticValueWrapper

/// A value with `'static` storage, independent of the object.
///
/// Read-only unless it sits behind a lock. The constness of the object does
/// not matter.
pub enum StaticValueWrapper<T: 'static> {
    Const(&'static T),
    Getter(fn() -> &'static T),
    Locked(&'static RwLock<T>),
}

impl<T: Reflected> ValueWrapper for StaticValueWrapper<T> {
    #[inline]
    fn value_type(&self, _object: &ReflectedObject<'_>) -> Option<TypeToken> {
        Some(TypeToken::of::<T>())
    }

    #[inline]
    fn is_readonly(&self, _object: &ReflectedObject<'_>) -> bool {
        !matches!(self, Self::Locked(_))
    }

    fn get_value(&self, _object: &ReflectedObject<'_>) -> Any {
        match self {
            Self::Const(value) => clone_into_any(*value),
            Self::Getter(get) => clone_into_any(get()),
            Self::Locked(lock) => clone_into_any(&*lock.read().unwrap_or_else(PoisonError::into_inner)),
        }
    }

    fn set_value(&self, _object: &ReflectedObject<'_>, value: Any) -> bool {
        let Self::Locked(lock) = self else {
            return false;
        };
        match value.take::<T>() {
            Ok(value) => {
                *lock.write().unwrap_or_else(PoisonError::into_inner) = value;
                true
            }
            Err(_) => false,
        }
    }

    fn get_value_object<'a>(&self, _object: &ReflectedObject<'a>) -> Option<ReflectedObject<'a>> {
        match self {
            Self::Const(value) => Some(ReflectedObject::from_ref(*value)),
            Self::Getter(get) => Some(ReflectedObject::from_ref(get())),
            Self::Locked(_) => None,
        }
    }
}
