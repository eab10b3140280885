use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use core::hash::{BuildHasher, Hash};
use core::marker::PhantomData;
use std::collections::HashSet;

use crate::any::Any;
use crate::object::ReflectedObject;
use crate::reflection::Field;
use crate::registry::ReflectedTypeDB;
use crate::structure::{FieldCaps, FieldFlags, StructureWrapper, key_as, take_as};
use crate::value::ObjectValueWrapper;
use crate::{Reflected, Reflection, TypeToken};

// -----------------------------------------------------------------------------
// SetLike

/// A container of unique items.
pub trait SetLike: Send + Sync + 'static {
    type Item: Reflected + Clone;

    fn len(&self) -> usize;

    fn items(&self) -> Vec<&Self::Item>;

    fn find(&self, item: &Self::Item) -> Option<&Self::Item>;

    /// Inserts a new item, `false` if it is already present.
    fn insert_new(&mut self, item: Self::Item) -> bool;

    fn remove(&mut self, item: &Self::Item) -> bool;
}

impl<T, S> SetLike for HashSet<T, S>
where
    T: Reflected + Clone + Eq + Hash,
    S: BuildHasher + Send + Sync + 'static,
{
    type Item = T;

    #[inline]
    fn len(&self) -> usize {
        HashSet::len(self)
    }

    fn items(&self) -> Vec<&T> {
        self.iter().collect()
    }

    #[inline]
    fn find(&self, item: &T) -> Option<&T> {
        self.get(item)
    }

    #[inline]
    fn insert_new(&mut self, item: T) -> bool {
        self.insert(item)
    }

    #[inline]
    fn remove(&mut self, item: &T) -> bool {
        HashSet::remove(self, item)
    }
}

impl<T> SetLike for BTreeSet<T>
where
    T: Reflected + Clone + Ord,
{
    type Item = T;

    #[inline]
    fn len(&self) -> usize {
        BTreeSet::len(self)
    }

    fn items(&self) -> Vec<&T> {
        self.iter().collect()
    }

    #[inline]
    fn find(&self, item: &T) -> Option<&T> {
        self.get(item)
    }

    #[inline]
    fn insert_new(&mut self, item: T) -> bool {
        self.insert(item)
    }

    #[inline]
    fn remove(&mut self, item: &T) -> bool {
        BTreeSet::remove(self, item)
    }
}

// -----------------------------------------------------------------------------
// SetStructure

/// Items of a [`SetLike`] container as fields keyed by the item itself.
///
/// Items double as keys, so every field is read-only. New items are added
/// from the value, the key argument is ignored.
pub struct SetStructure<S>(PhantomData<fn() -> S>);

impl<S: SetLike> SetStructure<S> {
    #[inline]
    pub const fn new() -> Self {
        Self(PhantomData)
    }

    fn entry<'a>(db: &'a ReflectedTypeDB, item: &S::Item, element: ReflectedObject<'a>) -> Field<'a> {
        Field {
            key: Any::from_reflected(item.clone()),
            reflection: Reflection::from_parts(db, element, ObjectValueWrapper::<S::Item>::INSTANCE, None, None),
            inherit_from: None,
        }
    }
}

impl<S: SetLike> StructureWrapper for SetStructure<S> {
    fn fields_count(&self, _db: &ReflectedTypeDB, value: &ReflectedObject<'_>) -> usize {
        value.with_ref::<S, _>(S::len).unwrap_or(0)
    }

    fn get_field<'a>(&self, db: &'a ReflectedTypeDB, value: &ReflectedObject<'a>, key: &Any) -> Reflection<'a> {
        let Some(key) = key_as::<S::Item>(db, key) else {
            return Reflection::invalid();
        };
        match value.as_const().map_child::<S, S::Item>(|s| s.find(&key), |_| None) {
            Some(element) => Self::entry(db, &key, element).reflection,
            None => Reflection::invalid(),
        }
    }

    fn get_fields<'a>(&self, db: &'a ReflectedTypeDB, value: &ReflectedObject<'a>) -> Vec<Field<'a>> {
        value
            .as_const()
            .map_children::<S, S::Item, S::Item>(
                |s| s.items().into_iter().map(|item| (item.clone(), item)).collect(),
                |_| Vec::new(),
            )
            .into_iter()
            .map(|(item, element)| Self::entry(db, &item, element))
            .collect()
    }

    fn fields_caps(&self, _db: &ReflectedTypeDB, _value: &ReflectedObject<'_>) -> FieldCaps {
        FieldCaps {
            flags: FieldFlags::IS_FLAT
                | FieldFlags::CAN_ADD
                | FieldFlags::CAN_REMOVE
                | FieldFlags::HAS_DYNAMIC_STRUCT,
            flat_key_type: Some(TypeToken::of::<S::Item>()),
            flat_value_type: Some(TypeToken::of::<S::Item>()),
        }
    }

    fn add_field(&self, db: &ReflectedTypeDB, value: &ReflectedObject<'_>, _key: Any, field_value: Any) -> bool {
        if value.is_const() {
            return false;
        }
        let Some(item) = take_as::<S::Item>(db, field_value) else {
            return false;
        };
        value.with_mut::<S, _>(|s| s.insert_new(item)).unwrap_or(false)
    }

    fn remove_field(&self, db: &ReflectedTypeDB, value: &ReflectedObject<'_>, key: &Any) -> bool {
        if value.is_const() {
            return false;
        }
        let Some(item) = key_as::<S::Item>(db, key) else {
            return false;
        };
        value.with_mut::<S, _>(|s| s.remove(&item)).unwrap_or(false)
    }
}
