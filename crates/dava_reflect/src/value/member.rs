use crate::any::Any;
use crate::object::ReflectedObject;
use crate::value::{ValueWrapper, clone_into_any};
use crate::{Reflected, TypeToken};

// -----------------------------------------------------------------------------
// MemberValueWrapper

/// A value stored inside the object, reached through a pair of projections.
///
/// Without a mutable projection the value is read-only. The value object is
/// a live handle, so nested fields of the member are reachable.
pub struct MemberValueWrapper<C, T> {
    get: fn(&C) -> &T,
    get_mut: Option<fn(&mut C) -> &mut T>,
}

impl<C: 'static, T: Reflected> MemberValueWrapper<C, T> {
    #[inline]
    pub const fn new(get: fn(&C) -> &T, get_mut: fn(&mut C) -> &mut T) -> Self {
        Self {
            get,
            get_mut: Some(get_mut),
        }
    }

    #[inline]
    pub const fn readonly(get: fn(&C) -> &T) -> Self {
        Self { get, get_mut: None }
    }
}

impl<C: 'static, T: Reflected> ValueWrapper for MemberValueWrapper<C, T> {
    #[inline]
    fn value_type(&self, _object: &ReflectedObject<'_>) -> Option<TypeToken> {
        Some(TypeToken::of::<T>())
    }

    #[inline]
    fn is_readonly(&self, object: &ReflectedObject<'_>) -> bool {
        object.is_const() || self.get_mut.is_none()
    }

    fn get_value(&self, object: &ReflectedObject<'_>) -> Any {
        object
            .with_ref::<C, _>(|c| clone_into_any((self.get)(c)))
            .unwrap_or_default()
    }

    fn set_value(&self, object: &ReflectedObject<'_>, value: Any) -> bool {
        let Some(get_mut) = self.get_mut else {
            return false;
        };
        if object.is_const() {
            return false;
        }
        match value.take::<T>() {
            Ok(value) => object.with_mut::<C, _>(|c| *get_mut(c) = value).is_some(),
            Err(_) => false,
        }
    }

    fn get_value_object<'a>(&self, object: &ReflectedObject<'a>) -> Option<ReflectedObject<'a>> {
        let get = self.get;
        match self.get_mut {
            Some(get_mut) => object.map_child::<C, T>(|c| Some(get(c)), |c| Some(get_mut(c))),
            None => object
                .as_const()
                .map_child::<C, T>(|c| Some(get(c)), |_| None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MemberValueWrapper;
    use crate::any::Any;
    use crate::object::ReflectedObject;
    use crate::value::ValueWrapper;

    struct Pair {
        a: i32,
        b: i32,
    }

    #[test]
    fn read_write_member() {
        let a = MemberValueWrapper::<Pair, i32>::new(|p| &p.a, |p| &mut p.a);
        let mut pair = Pair { a: 1, b: 2 };
        let obj = ReflectedObject::typed_mut(&mut pair);

        assert_eq!(a.get_value(&obj).get::<i32>(), Some(&1));
        assert!(a.set_value(&obj, Any::new(10_i32)));
        assert!(!a.set_value(&obj, Any::new(10_u8)));
        assert!(!a.set_value(&obj.as_const(), Any::new(11_i32)));
        assert_eq!(pair.a, 10);
    }

    #[test]
    fn readonly_member_yields_const_object() {
        let b = MemberValueWrapper::<Pair, i32>::readonly(|p| &p.b);
        let mut pair = Pair { a: 1, b: 2 };
        let obj = ReflectedObject::typed_mut(&mut pair);

        assert!(b.is_readonly(&obj));
        assert!(!b.set_value(&obj, Any::new(5_i32)));
        let value = b.get_value_object(&obj).unwrap();
        assert!(value.is_const());
        assert!(value.type_token().is::<i32>());
    }
}
