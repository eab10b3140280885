use crate::TypeToken;
use crate::any::Any;
use crate::object::ReflectedObject;
use crate::value::ValueWrapper;

// -----------------------------------------------------------------------------
// AnyValueWrapper

/// The object is an [`Any`] and the value is its contents.
///
/// An empty `Any` accepts a value of any type, otherwise the type must stay
/// the same.
pub struct AnyValueWrapper;

impl AnyValueWrapper {
    pub const INSTANCE: &'static Self = &Self;
}

impl ValueWrapper for AnyValueWrapper {
    fn value_type(&self, object: &ReflectedObject<'_>) -> Option<TypeToken> {
        object.with_ref::<Any, _>(Any::type_token).flatten()
    }

    #[inline]
    fn is_readonly(&self, object: &ReflectedObject<'_>) -> bool {
        object.is_const()
    }

    fn get_value(&self, object: &ReflectedObject<'_>) -> Any {
        object
            .with_ref::<Any, _>(Any::try_clone)
            .flatten()
            .unwrap_or_default()
    }

    fn set_value(&self, object: &ReflectedObject<'_>, value: Any) -> bool {
        object
            .with_mut::<Any, _>(|current| {
                if current.is_empty() || current.type_token() == value.type_token() {
                    *current = value;
                    true
                } else {
                    false
                }
            })
            .unwrap_or(false)
    }

    fn get_value_object<'a>(&self, object: &ReflectedObject<'a>) -> Option<ReflectedObject<'a>> {
        object.map_erased::<Any>(Any::erased, Any::erased_mut)
    }
}

#[cfg(test)]
mod tests {
    use super::AnyValueWrapper;
    use crate::TypeToken;
    use crate::any::Any;
    use crate::object::ReflectedObject;
    use crate::value::ValueWrapper;

    #[test]
    fn contents_are_the_value() {
        let mut any = Any::new(2_i64);
        let obj = ReflectedObject::typed_mut(&mut any);
        let vw = AnyValueWrapper::INSTANCE;

        assert_eq!(vw.value_type(&obj), Some(TypeToken::of::<i64>()));
        assert!(!vw.set_value(&obj, Any::new(1_u8)));
        assert!(vw.set_value(&obj, Any::new(5_i64)));
        let inner = vw.get_value_object(&obj).unwrap();
        assert!(inner.type_token().is::<i64>());
        assert_eq!(vw.get_value(&obj).get::<i64>(), Some(&5));
    }
}
