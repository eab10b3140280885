use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::hash::{BuildHasher, Hash};
use core::marker::PhantomData;
use std::collections::HashMap;

use crate::any::Any;
use crate::object::ReflectedObject;
use crate::reflection::Field;
use crate::registry::ReflectedTypeDB;
use crate::structure::{FieldCaps, FieldFlags, StructureWrapper, key_as, take_as};
use crate::value::ObjectValueWrapper;
use crate::{Reflected, Reflection, TypeToken};

// -----------------------------------------------------------------------------
// Associative

/// A container of unique keys, each with a value.
pub trait Associative: Send + Sync + 'static {
    type Key: Reflected + Clone;
    type Value: Reflected;

    fn len(&self) -> usize;

    fn entries(&self) -> Vec<(&Self::Key, &Self::Value)>;

    fn entries_mut(&mut self) -> Vec<(&Self::Key, &mut Self::Value)>;

    fn get(&self, key: &Self::Key) -> Option<&Self::Value>;

    fn get_mut(&mut self, key: &Self::Key) -> Option<&mut Self::Value>;

    /// Inserts a new entry, `false` if the key already exists.
    fn insert_new(&mut self, key: Self::Key, value: Self::Value) -> bool;

    fn remove(&mut self, key: &Self::Key) -> bool;
}

impl<K, V, S> Associative for HashMap<K, V, S>
where
    K: Reflected + Clone + Eq + Hash,
    V: Reflected,
    S: BuildHasher + Send + Sync + 'static,
{
    type Key = K;
    type Value = V;

    #[inline]
    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn entries(&self) -> Vec<(&K, &V)> {
        self.iter().collect()
    }

    fn entries_mut(&mut self) -> Vec<(&K, &mut V)> {
        self.iter_mut().collect()
    }

    #[inline]
    fn get(&self, key: &K) -> Option<&V> {
        HashMap::get(self, key)
    }

    #[inline]
    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        HashMap::get_mut(self, key)
    }

    fn insert_new(&mut self, key: K, value: V) -> bool {
        if self.contains_key(&key) {
            return false;
        }
        self.insert(key, value);
        true
    }

    #[inline]
    fn remove(&mut self, key: &K) -> bool {
        HashMap::remove(self, key).is_some()
    }
}

impl<K, V> Associative for BTreeMap<K, V>
where
    K: Reflected + Clone + Ord,
    V: Reflected,
{
    type Key = K;
    type Value = V;

    #[inline]
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn entries(&self) -> Vec<(&K, &V)> {
        self.iter().collect()
    }

    fn entries_mut(&mut self) -> Vec<(&K, &mut V)> {
        self.iter_mut().collect()
    }

    #[inline]
    fn get(&self, key: &K) -> Option<&V> {
        BTreeMap::get(self, key)
    }

    #[inline]
    fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        BTreeMap::get_mut(self, key)
    }

    fn insert_new(&mut self, key: K, value: V) -> bool {
        if self.contains_key(&key) {
            return false;
        }
        self.insert(key, value);
        true
    }

    #[inline]
    fn remove(&mut self, key: &K) -> bool {
        BTreeMap::remove(self, key).is_some()
    }
}

// -----------------------------------------------------------------------------
// MapStructure

/// Entries of an [`Associative`] container as fields keyed by the map key.
///
/// Entries can be added and removed but not inserted at a position.
pub struct MapStructure<M>(PhantomData<fn() -> M>);

impl<M: Associative> MapStructure<M> {
    #[inline]
    pub const fn new() -> Self {
        Self(PhantomData)
    }

    fn entry<'a>(db: &'a ReflectedTypeDB, key: &M::Key, element: ReflectedObject<'a>) -> Field<'a> {
        Field {
            key: Any::from_reflected(key.clone()),
            reflection: Reflection::from_parts(db, element, ObjectValueWrapper::<M::Value>::INSTANCE, None, None),
            inherit_from: None,
        }
    }
}

impl<M: Associative> StructureWrapper for MapStructure<M> {
    fn fields_count(&self, _db: &ReflectedTypeDB, value: &ReflectedObject<'_>) -> usize {
        value.with_ref::<M, _>(M::len).unwrap_or(0)
    }

    fn get_field<'a>(&self, db: &'a ReflectedTypeDB, value: &ReflectedObject<'a>, key: &Any) -> Reflection<'a> {
        let Some(key) = key_as::<M::Key>(db, key) else {
            return Reflection::invalid();
        };
        match value.map_child::<M, M::Value>(|m| m.get(&key), |m| m.get_mut(&key)) {
            Some(element) => Self::entry(db, &key, element).reflection,
            None => Reflection::invalid(),
        }
    }

    fn get_fields<'a>(&self, db: &'a ReflectedTypeDB, value: &ReflectedObject<'a>) -> Vec<Field<'a>> {
        value
            .map_children::<M, M::Key, M::Value>(
                |m| m.entries().into_iter().map(|(k, v)| (k.clone(), v)).collect(),
                |m| m.entries_mut().into_iter().map(|(k, v)| (k.clone(), v)).collect(),
            )
            .into_iter()
            .map(|(key, element)| Self::entry(db, &key, element))
            .collect()
    }

    fn fields_caps(&self, _db: &ReflectedTypeDB, _value: &ReflectedObject<'_>) -> FieldCaps {
        FieldCaps {
            flags: FieldFlags::IS_FLAT
                | FieldFlags::CAN_ADD
                | FieldFlags::CAN_REMOVE
                | FieldFlags::HAS_DYNAMIC_STRUCT,
            flat_key_type: Some(TypeToken::of::<M::Key>()),
            flat_value_type: Some(TypeToken::of::<M::Value>()),
        }
    }

    fn add_field(&self, db: &ReflectedTypeDB, value: &ReflectedObject<'_>, key: Any, field_value: Any) -> bool {
        if value.is_const() {
            return false;
        }
        let (Some(key), Some(item)) = (take_as::<M::Key>(db, key), take_as::<M::Value>(db, field_value)) else {
            return false;
        };
        value.with_mut::<M, _>(|m| m.insert_new(key, item)).unwrap_or(false)
    }

    fn remove_field(&self, db: &ReflectedTypeDB, value: &ReflectedObject<'_>, key: &Any) -> bool {
        if value.is_const() {
            return false;
        }
        let Some(key) = key_as::<M::Key>(db, key) else {
            return false;
        };
        value.with_mut::<M, _>(|m| m.remove(&key)).unwrap_or(false)
    }
}
