use alloc::boxed::Box;

use crate::any::Any;
use crate::object::ReflectedObject;
use crate::value::{ValueWrapper, clone_into_any};
use crate::{Reflected, TypeToken};

// -----------------------------------------------------------------------------
// Getter & Setter

/// Produces a value, by copy or by reference into the object.
pub enum Getter<C, T> {
    /// Does not look at the object, e.g. a static function.
    Static(Box<dyn Fn() -> T + Send + Sync>),
    /// Reads the object, e.g. a `&self` method or a free function taking `&C`.
    Const(Box<dyn Fn(&C) -> T + Send + Sync>),
    /// Needs a mutable object, e.g. a `&mut self` method. Unreadable
    /// through a const object.
    Mut(Box<dyn Fn(&mut C) -> T + Send + Sync>),
    /// Borrows the value from the object, e.g. a `fn name(&self) -> &String`.
    /// The value object is a read-only handle to the borrowed value.
    Ref(fn(&C) -> &T),
}

/// Consumes a new value.
pub enum Setter<C, T> {
    /// Does not look at the object, e.g. a static function.
    Static(Box<dyn Fn(T) + Send + Sync>),
    /// Writes into the object.
    Mut(Box<dyn Fn(&mut C, T) + Send + Sync>),
}

// -----------------------------------------------------------------------------
// AccessorValueWrapper

/// A value produced by a getter and optionally consumed by a setter.
///
/// A copied value only exists for the duration of the call, so there is no
/// value object and nested fields are unreachable. A [`Getter::Ref`] value
/// lives in the object and its nested fields can be read.
pub struct AccessorValueWrapper<C, T> {
    getter: Getter<C, T>,
    setter: Option<Setter<C, T>>,
}

impl<C: 'static, T: Reflected> AccessorValueWrapper<C, T> {
    #[inline]
    pub fn new(getter: Getter<C, T>, setter: Option<Setter<C, T>>) -> Self {
        Self { getter, setter }
    }
}

impl<C: 'static, T: Reflected> ValueWrapper for AccessorValueWrapper<C, T> {
    #[inline]
    fn value_type(&self, _object: &ReflectedObject<'_>) -> Option<TypeToken> {
        Some(TypeToken::of::<T>())
    }

    #[inline]
    fn is_readonly(&self, object: &ReflectedObject<'_>) -> bool {
        self.setter.is_none() || object.is_const()
    }

    fn get_value(&self, object: &ReflectedObject<'_>) -> Any {
        let value = match &self.getter {
            Getter::Static(get) => Some(Any::from_reflected(get())),
            Getter::Const(get) => object.with_ref::<C, _>(|c| Any::from_reflected(get(c))),
            Getter::Mut(get) => object.with_mut::<C, _>(|c| Any::from_reflected(get(c))),
            Getter::Ref(get) => object.with_ref::<C, _>(|c| clone_into_any(get(c))),
        };
        value.unwrap_or_default()
    }

    fn set_value(&self, object: &ReflectedObject<'_>, value: Any) -> bool {
        if self.is_readonly(object) {
            return false;
        }
        let Ok(value) = value.take::<T>() else {
            return false;
        };
        match &self.setter {
            Some(Setter::Static(set)) => {
                set(value);
                true
            }
            Some(Setter::Mut(set)) => object.with_mut::<C, _>(|c| set(c, value)).is_some(),
            None => false,
        }
    }

    fn get_value_object<'a>(&self, object: &ReflectedObject<'a>) -> Option<ReflectedObject<'a>> {
        match self.getter {
            Getter::Ref(get) => object
                .as_const()
                .map_child::<C, T>(|c| Some(get(c)), |_| None),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use super::{AccessorValueWrapper, Getter, Setter};
    use crate::any::Any;
    use crate::object::ReflectedObject;
    use crate::value::ValueWrapper;

    struct Temperature {
        kelvin: f32,
    }

    #[test]
    fn getter_only_is_readonly() {
        let celsius = AccessorValueWrapper::<Temperature, f32>::new(
            Getter::Const(Box::new(|t: &Temperature| t.kelvin - 273.0)),
            None,
        );
        let mut t = Temperature { kelvin: 300.0 };
        let obj = ReflectedObject::typed_mut(&mut t);

        assert!(celsius.is_readonly(&obj));
        assert_eq!(celsius.get_value(&obj).get::<f32>(), Some(&27.0));
        assert!(!celsius.set_value(&obj, Any::new(0.0_f32)));
        assert!(celsius.get_value_object(&obj).is_none());
    }

    #[test]
    fn setter_converts_through_object() {
        let celsius = AccessorValueWrapper::<Temperature, f32>::new(
            Getter::Const(Box::new(|t: &Temperature| t.kelvin - 273.0)),
            Some(Setter::Mut(Box::new(|t: &mut Temperature, c: f32| {
                t.kelvin = c + 273.0
            }))),
        );
        let mut t = Temperature { kelvin: 0.0 };
        let obj = ReflectedObject::typed_mut(&mut t);

        assert!(!celsius.is_readonly(&obj));
        assert!(celsius.set_value(&obj, Any::new(10.0_f32)));
        assert!(celsius.is_readonly(&obj.as_const()));
        assert_eq!(t.kelvin, 283.0);
    }

    #[test]
    fn reference_getter_exposes_value_object() {
        let kelvin = AccessorValueWrapper::<Temperature, f32>::new(
            Getter::Ref(|t: &Temperature| &t.kelvin),
            Some(Setter::Mut(Box::new(|t: &mut Temperature, k: f32| {
                t.kelvin = k.max(0.0)
            }))),
        );
        let mut t = Temperature { kelvin: 12.0 };
        let obj = ReflectedObject::typed_mut(&mut t);

        assert_eq!(kelvin.get_value(&obj).get::<f32>(), Some(&12.0));
        let value = kelvin.get_value_object(&obj).unwrap();
        assert!(value.is_const());
        assert!(!kelvin.is_readonly(&obj));
        assert!(kelvin.set_value(&obj, Any::new(-5.0_f32)));
        assert_eq!(t.kelvin, 0.0);
    }
}
