use alloc::collections::{LinkedList, VecDeque};
use alloc::vec::Vec;
use core::marker::PhantomData;

use crate::any::Any;
use crate::object::ReflectedObject;
use crate::reflection::Field;
use crate::registry::ReflectedTypeDB;
use crate::structure::{FieldCaps, FieldFlags, StructureWrapper, key_as, take_as};
use crate::value::ObjectValueWrapper;
use crate::{Reflected, Reflection, TypeToken};

// -----------------------------------------------------------------------------
// Sequence

/// An ordered container of `Item`s, addressed by index.
pub trait Sequence: Send + Sync + 'static {
    type Item: Reflected;

    /// The number of elements can change.
    const DYNAMIC: bool;

    /// Elements can be reached by index without walking the container.
    const RANGE_ACCESS: bool;

    fn len(&self) -> usize;

    fn items(&self) -> Vec<&Self::Item>;

    fn items_mut(&mut self) -> Vec<&mut Self::Item>;

    fn item(&self, index: usize) -> Option<&Self::Item>;

    fn item_mut(&mut self, index: usize) -> Option<&mut Self::Item>;

    fn push(&mut self, _item: Self::Item) -> bool {
        false
    }

    /// Inserts before `index`, `index == len` appends.
    fn insert(&mut self, _index: usize, _item: Self::Item) -> bool {
        false
    }

    fn remove(&mut self, _index: usize) -> bool {
        false
    }
}

impl<T: Reflected> Sequence for Vec<T> {
    type Item = T;
    const DYNAMIC: bool = true;
    const RANGE_ACCESS: bool = true;

    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn items(&self) -> Vec<&T> {
        self.iter().collect()
    }

    fn items_mut(&mut self) -> Vec<&mut T> {
        self.iter_mut().collect()
    }

    #[inline]
    fn item(&self, index: usize) -> Option<&T> {
        self.get(index)
    }

    #[inline]
    fn item_mut(&mut self, index: usize) -> Option<&mut T> {
        self.get_mut(index)
    }

    fn push(&mut self, item: T) -> bool {
        Vec::push(self, item);
        true
    }

    fn insert(&mut self, index: usize, item: T) -> bool {
        if index > Vec::len(self) {
            return false;
        }
        Vec::insert(self, index, item);
        true
    }

    fn remove(&mut self, index: usize) -> bool {
        if index >= Vec::len(self) {
            return false;
        }
        Vec::remove(self, index);
        true
    }
}

impl<T: Reflected> Sequence for VecDeque<T> {
    type Item = T;
    const DYNAMIC: bool = true;
    const RANGE_ACCESS: bool = true;

    #[inline]
    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn items(&self) -> Vec<&T> {
        self.iter().collect()
    }

    fn items_mut(&mut self) -> Vec<&mut T> {
        self.iter_mut().collect()
    }

    #[inline]
    fn item(&self, index: usize) -> Option<&T> {
        self.get(index)
    }

    #[inline]
    fn item_mut(&mut self, index: usize) -> Option<&mut T> {
        self.get_mut(index)
    }

    fn push(&mut self, item: T) -> bool {
        self.push_back(item);
        true
    }

    fn insert(&mut self, index: usize, item: T) -> bool {
        if index > VecDeque::len(self) {
            return false;
        }
        VecDeque::insert(self, index, item);
        true
    }

    fn remove(&mut self, index: usize) -> bool {
        VecDeque::remove(self, index).is_some()
    }
}

impl<T: Reflected> Sequence for LinkedList<T> {
    type Item = T;
    const DYNAMIC: bool = true;
    const RANGE_ACCESS: bool = false;

    #[inline]
    fn len(&self) -> usize {
        LinkedList::len(self)
    }

    fn items(&self) -> Vec<&T> {
        self.iter().collect()
    }

    fn items_mut(&mut self) -> Vec<&mut T> {
        self.iter_mut().collect()
    }

    fn item(&self, index: usize) -> Option<&T> {
        self.iter().nth(index)
    }

    fn item_mut(&mut self, index: usize) -> Option<&mut T> {
        self.iter_mut().nth(index)
    }

    fn push(&mut self, item: T) -> bool {
        self.push_back(item);
        true
    }

    fn insert(&mut self, index: usize, item: T) -> bool {
        if index > LinkedList::len(self) {
            return false;
        }
        let mut tail = self.split_off(index);
        self.push_back(item);
        self.append(&mut tail);
        true
    }

    fn remove(&mut self, index: usize) -> bool {
        if index >= LinkedList::len(self) {
            return false;
        }
        let mut tail = self.split_off(index);
        tail.pop_front();
        self.append(&mut tail);
        true
    }
}

impl<T: Reflected, const N: usize> Sequence for [T; N] {
    type Item = T;
    const DYNAMIC: bool = false;
    const RANGE_ACCESS: bool = true;

    #[inline]
    fn len(&self) -> usize {
        N
    }

    fn items(&self) -> Vec<&T> {
        self.iter().collect()
    }

    fn items_mut(&mut self) -> Vec<&mut T> {
        self.iter_mut().collect()
    }

    #[inline]
    fn item(&self, index: usize) -> Option<&T> {
        self.get(index)
    }

    #[inline]
    fn item_mut(&mut self, index: usize) -> Option<&mut T> {
        self.get_mut(index)
    }
}

// -----------------------------------------------------------------------------
// SequenceStructure

/// Elements of a [`Sequence`] as fields keyed by `usize` index.
pub struct SequenceStructure<S>(PhantomData<fn() -> S>);

impl<S: Sequence> SequenceStructure<S> {
    #[inline]
    pub const fn new() -> Self {
        Self(PhantomData)
    }

    fn element<'a>(db: &'a ReflectedTypeDB, element: ReflectedObject<'a>) -> Reflection<'a> {
        Reflection::from_parts(db, element, ObjectValueWrapper::<S::Item>::INSTANCE, None, None)
    }

    fn field_at<'a>(db: &'a ReflectedTypeDB, value: &ReflectedObject<'a>, index: usize) -> Option<Field<'a>> {
        let element = value.map_child::<S, S::Item>(|s| s.item(index), |s| s.item_mut(index))?;
        Some(Field {
            key: Any::new(index),
            reflection: Self::element(db, element),
            inherit_from: None,
        })
    }
}

impl<S: Sequence> StructureWrapper for SequenceStructure<S> {
    fn fields_count(&self, _db: &ReflectedTypeDB, value: &ReflectedObject<'_>) -> usize {
        value.with_ref::<S, _>(S::len).unwrap_or(0)
    }

    fn get_field<'a>(&self, db: &'a ReflectedTypeDB, value: &ReflectedObject<'a>, key: &Any) -> Reflection<'a> {
        key_as::<usize>(db, key)
            .and_then(|index| Self::field_at(db, value, index))
            .map(|field| field.reflection)
            .unwrap_or_default()
    }

    fn get_fields<'a>(&self, db: &'a ReflectedTypeDB, value: &ReflectedObject<'a>) -> Vec<Field<'a>> {
        value
            .map_children::<S, usize, S::Item>(
                |s| s.items().into_iter().enumerate().collect(),
                |s| s.items_mut().into_iter().enumerate().collect(),
            )
            .into_iter()
            .map(|(index, element)| Field {
                key: Any::new(index),
                reflection: Self::element(db, element),
                inherit_from: None,
            })
            .collect()
    }

    fn get_fields_range<'a>(
        &self,
        db: &'a ReflectedTypeDB,
        value: &ReflectedObject<'a>,
        first: usize,
        count: usize,
    ) -> Vec<Field<'a>> {
        if !S::RANGE_ACCESS {
            return self
                .get_fields(db, value)
                .into_iter()
                .skip(first)
                .take(count)
                .collect();
        }
        let len = self.fields_count(db, value);
        let last = first.saturating_add(count).min(len);
        (first..last)
            .filter_map(|index| Self::field_at(db, value, index))
            .collect()
    }

    fn fields_caps(&self, _db: &ReflectedTypeDB, _value: &ReflectedObject<'_>) -> FieldCaps {
        let mut flags = FieldFlags::IS_FLAT;
        if S::RANGE_ACCESS {
            flags |= FieldFlags::HAS_RANGE_ACCESS;
        }
        if S::DYNAMIC {
            flags |= FieldFlags::CAN_ADD
                | FieldFlags::CAN_INSERT
                | FieldFlags::CAN_REMOVE
                | FieldFlags::HAS_DYNAMIC_STRUCT;
        }
        FieldCaps {
            flags,
            flat_key_type: Some(TypeToken::of::<usize>()),
            flat_value_type: Some(TypeToken::of::<S::Item>()),
        }
    }

    fn add_field(&self, db: &ReflectedTypeDB, value: &ReflectedObject<'_>, _key: Any, field_value: Any) -> bool {
        if !S::DYNAMIC || value.is_const() {
            return false;
        }
        let Some(item) = take_as::<S::Item>(db, field_value) else {
            return false;
        };
        value.with_mut::<S, _>(|s| s.push(item)).unwrap_or(false)
    }

    fn insert_field(
        &self,
        db: &ReflectedTypeDB,
        value: &ReflectedObject<'_>,
        before: &Any,
        _key: Any,
        field_value: Any,
    ) -> bool {
        if !S::DYNAMIC || value.is_const() {
            return false;
        }
        let (Some(index), Some(item)) = (key_as::<usize>(db, before), take_as::<S::Item>(db, field_value)) else {
            return false;
        };
        value.with_mut::<S, _>(|s| s.insert(index, item)).unwrap_or(false)
    }

    fn remove_field(&self, db: &ReflectedTypeDB, value: &ReflectedObject<'_>, key: &Any) -> bool {
        if !S::DYNAMIC || value.is_const() {
            return false;
        }
        let Some(index) = key_as::<usize>(db, key) else {
            return false;
        };
        value.with_mut::<S, _>(|s| s.remove(index)).unwrap_or(false)
    }
}
