use alloc::vec::Vec;

use bytemuck::Pod;

use crate::TypeToken;
use crate::any::Any;
use crate::object::ReflectedObject;
use crate::value::ValueWrapper;

// -----------------------------------------------------------------------------
// RawValueWrapper

/// A plain-old-data value copied as bytes.
///
/// Values are read out as a `Vec<u8>` holding the native byte
/// representation. Writes accept either such a byte buffer of the exact
/// size or a `T`.
pub struct RawValueWrapper<C, T> {
    get: fn(&C) -> &T,
    get_mut: fn(&mut C) -> &mut T,
}

fn identity<T>(value: &T) -> &T {
    value
}

fn identity_mut<T>(value: &mut T) -> &mut T {
    value
}

impl<C: 'static, T: Pod + Send + Sync> RawValueWrapper<C, T> {
    #[inline]
    pub const fn new(get: fn(&C) -> &T, get_mut: fn(&mut C) -> &mut T) -> Self {
        Self { get, get_mut }
    }
}

impl<T: Pod + Send + Sync> RawValueWrapper<T, T> {
    /// Treats the object itself as the blob.
    pub const IDENTITY: &'static Self = &Self {
        get: identity::<T>,
        get_mut: identity_mut::<T>,
    };
}

impl<C: 'static, T: Pod + Send + Sync> ValueWrapper for RawValueWrapper<C, T> {
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
            .with_ref::<C, _>(|c| Any::new(bytemuck::bytes_of((self.get)(c)).to_vec()))
            .unwrap_or_default()
    }

    fn set_value(&self, object: &ReflectedObject<'_>, value: Any) -> bool {
        if object.is_const() {
            return false;
        }
        let value = match value.take::<T>() {
            Ok(value) => value,
            Err(value) => match value
                .get::<Vec<u8>>()
                .and_then(|bytes| bytemuck::try_pod_read_unaligned::<T>(bytes).ok())
            {
                Some(value) => value,
                None => return false,
            },
        };
        let get_mut = self.get_mut;
        object.with_mut::<C, _>(|c| *get_mut(c) = value).is_some()
    }

    fn get_value_object<'a>(&self, object: &ReflectedObject<'a>) -> Option<ReflectedObject<'a>> {
        let (get, get_mut) = (self.get, self.get_mut);
        object.map_child::<C, T>(|c| Some(get(c)), |c| Some(get_mut(c)))
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use bytemuck::{Pod, Zeroable};

    use super::RawValueWrapper;
    use crate::any::Any;
    use crate::object::ReflectedObject;
    use crate::value::ValueWrapper;

    #[repr(C)]
    #[derive(Clone, Copy, Pod, Zeroable, PartialEq, Debug)]
    struct Color {
        r: u8,
        g: u8,
        b: u8,
        a: u8,
    }

    #[test]
    fn bytes_round_trip() {
        let raw = RawValueWrapper::<Color, Color>::IDENTITY;
        let mut color = Color { r: 1, g: 2, b: 3, a: 4 };
        let obj = ReflectedObject::typed_mut(&mut color);

        assert_eq!(raw.get_value(&obj).get::<Vec<u8>>(), Some(&vec![1, 2, 3, 4]));
        assert!(raw.set_value(&obj, Any::new(vec![9_u8, 9, 9, 9])));
        assert!(!raw.set_value(&obj, Any::new(vec![1_u8])));
        assert_eq!(color, Color { r: 9, g: 9, b: 9, a: 9 });
    }
}
