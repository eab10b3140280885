use core::marker::PhantomData;

use crate::any::Any;
use crate::object::ReflectedObject;
use crate::value::{ValueWrapper, clone_into_any};
use crate::{Reflected, TypeToken};

// -----------------------------------------------------------------------------
// ObjectValueWrapper

/// The object is the value.
///
/// Used for roots created from a reference and for container elements.
pub struct ObjectValueWrapper<T>(PhantomData<fn() -> T>);

impl<T: Reflected> ObjectValueWrapper<T> {
    pub const INSTANCE: &'static Self = &Self(PhantomData);
}

impl<T: Reflected> ValueWrapper for ObjectValueWrapper<T> {
    #[inline]
    fn value_type(&self, _object: &ReflectedObject<'_>) -> Option<TypeToken> {
        Some(TypeToken::of::<T>())
    }

    #[inline]
    fn is_readonly(&self, object: &ReflectedObject<'_>) -> bool {
        object.is_const()
    }

    fn get_value(&self, object: &ReflectedObject<'_>) -> Any {
        object
            .with_ref::<T, _>(clone_into_any)
            .unwrap_or_default()
    }

    fn set_value(&self, object: &ReflectedObject<'_>, value: Any) -> bool {
        if object.is_const() {
            return false;
        }
        match value.take::<T>() {
            Ok(value) => object.with_mut::<T, _>(|v| *v = value).is_some(),
            Err(_) => false,
        }
    }

    #[inline]
    fn get_value_object<'a>(&self, object: &ReflectedObject<'a>) -> Option<ReflectedObject<'a>> {
        Some(*object)
    }
}

// -----------------------------------------------------------------------------
// OpaqueValueWrapper

/// The object is the value, but its type was never made known to a database.
///
/// The value can be inspected structurally but not copied or replaced.
pub struct OpaqueValueWrapper;

impl OpaqueValueWrapper {
    pub const INSTANCE: &'static Self = &Self;
}

impl ValueWrapper for OpaqueValueWrapper {
    #[inline]
    fn value_type(&self, object: &ReflectedObject<'_>) -> Option<TypeToken> {
        Some(object.type_token())
    }

    #[inline]
    fn is_readonly(&self, object: &ReflectedObject<'_>) -> bool {
        object.is_const()
    }

    #[inline]
    fn get_value(&self, _object: &ReflectedObject<'_>) -> Any {
        Any::empty()
    }

    #[inline]
    fn set_value(&self, _object: &ReflectedObject<'_>, _value: Any) -> bool {
        false
    }

    #[inline]
    fn get_value_object<'a>(&self, object: &ReflectedObject<'a>) -> Option<ReflectedObject<'a>> {
        Some(*object)
    }
}
