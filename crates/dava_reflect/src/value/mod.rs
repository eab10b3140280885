//! Reading and writing the value a [`Reflection`](crate::Reflection) points to.
//!
//! A [`ValueWrapper`] knows how to get from an object handle to a value:
//! the object itself, a member, an accessor pair, a static, raw bytes or the
//! contents of an [`Any`]. Each kind lives in its own module.

// -----------------------------------------------------------------------------
// Modules

mod accessor;
mod any;
mod member;
mod object;
mod raw;
mod global;

// -----------------------------------------------------------------------------
// Exports

pub use accessor::{AccessorValueWrapper, Getter, Setter};
pub use any::AnyValueWrapper;
pub use global::StaticValueWrapper;
pub use member::MemberValueWrapper;
pub use object::{ObjectValueWrapper, OpaqueValueWrapper};
pub use raw::RawValueWrapper;

use crate::any::Any;
use crate::object::ReflectedObject;
use crate::registry::ReflectedTypeDB;
use crate::{Reflected, TypeToken};

// -----------------------------------------------------------------------------
// ValueWrapper

/// Access to a value reachable from an object.
///
/// Implementations must report a read-only value whenever the object handle
/// is const, and must never write through a const handle.
pub trait ValueWrapper: Send + Sync {
    /// Static type of the value, `None` if it is unknown (an empty [`Any`]).
    fn value_type(&self, object: &ReflectedObject<'_>) -> Option<TypeToken>;

    fn is_readonly(&self, object: &ReflectedObject<'_>) -> bool;

    /// Copies the value out, an empty [`Any`] if it cannot be copied.
    fn get_value(&self, object: &ReflectedObject<'_>) -> Any;

    /// Replaces the value, which must already be of the exact value type.
    fn set_value(&self, object: &ReflectedObject<'_>, value: Any) -> bool;

    /// Like [`set_value`](Self::set_value), but converts `value` first when
    /// its type differs.
    fn set_value_with_cast(
        &self,
        db: &ReflectedTypeDB,
        object: &ReflectedObject<'_>,
        value: Any,
    ) -> bool {
        let Some(ty) = self.value_type(object) else {
            return false;
        };
        if value.type_token() == Some(ty) {
            return self.set_value(object, value);
        }
        match db.cast_any(&value, ty) {
            Ok(converted) => self.set_value(object, converted),
            Err(_) => false,
        }
    }

    /// A live handle to the value, `None` for values produced on the fly.
    fn get_value_object<'a>(&self, object: &ReflectedObject<'a>) -> Option<ReflectedObject<'a>>;
}

/// Copies `value` into an [`Any`] that can be copied again.
#[inline]
pub(crate) fn clone_into_any<T: Reflected>(value: &T) -> Any {
    value
        .reflect_clone()
        .map(Any::from_reflected)
        .unwrap_or_default()
}
