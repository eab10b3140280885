//! Enumerating and editing the fields and methods of a value.
//!
//! A [`StructureWrapper`] is attached to each reflected type and interprets
//! a value object of that type:
//!
//! - [`ClassStructure`]: registered fields and methods, bases first.
//! - [`PointerStructure`]: forwards to the dynamic type of the pointee.
//! - [`SequenceStructure`], [`MapStructure`], [`SetStructure`]: container
//!   elements as fields.
//! - [`EmptyStructure`]: no fields, no methods.

// -----------------------------------------------------------------------------
// Modules

mod class;
mod empty;
mod map;
mod pointer;
mod sequence;
mod set;

// -----------------------------------------------------------------------------
// Exports

pub use class::ClassStructure;
pub use empty::{EMPTY_STRUCTURE, EmptyStructure};
pub use map::{Associative, MapStructure};
pub use pointer::{PointerLike, PointerStructure};
pub use sequence::{Sequence, SequenceStructure};
pub use set::{SetLike, SetStructure};

use alloc::vec::Vec;

use bitflags::bitflags;

use crate::any::Any;
use crate::object::ReflectedObject;
use crate::reflection::{Field, Method};
use crate::registry::ReflectedTypeDB;
use crate::{Reflection, TypeToken};

// -----------------------------------------------------------------------------
// FieldCaps

bitflags! {
    /// Operations a structure supports on its fields.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FieldFlags: u8 {
        const CAN_ADD = 1 << 0;
        const CAN_INSERT = 1 << 1;
        const CAN_REMOVE = 1 << 2;
        /// All fields share one key type and one value type.
        const IS_FLAT = 1 << 3;
        /// Fields by index are reachable without walking the whole structure.
        const HAS_RANGE_ACCESS = 1 << 4;
        /// The number of fields can change.
        const HAS_DYNAMIC_STRUCT = 1 << 5;
    }
}

/// Capabilities of a structure, with the key and value types of flat ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldCaps {
    pub flags: FieldFlags,
    pub flat_key_type: Option<TypeToken>,
    pub flat_value_type: Option<TypeToken>,
}

impl FieldCaps {
    #[inline]
    pub fn can_add(&self) -> bool {
        self.flags.contains(FieldFlags::CAN_ADD)
    }

    #[inline]
    pub fn can_insert(&self) -> bool {
        self.flags.contains(FieldFlags::CAN_INSERT)
    }

    #[inline]
    pub fn can_remove(&self) -> bool {
        self.flags.contains(FieldFlags::CAN_REMOVE)
    }

    #[inline]
    pub fn is_flat(&self) -> bool {
        self.flags.contains(FieldFlags::IS_FLAT)
    }

    #[inline]
    pub fn has_range_access(&self) -> bool {
        self.flags.contains(FieldFlags::HAS_RANGE_ACCESS)
    }

    #[inline]
    pub fn has_dynamic_struct(&self) -> bool {
        self.flags.contains(FieldFlags::HAS_DYNAMIC_STRUCT)
    }
}

// -----------------------------------------------------------------------------
// StructureWrapper

/// Field and method access for values of one type.
///
/// `value` is always the value object of a [`Reflection`], not the object
/// the reflection was created from. Mutating operations must fail on const
/// values.
pub trait StructureWrapper: Send + Sync {
    fn has_fields(&self, db: &ReflectedTypeDB, value: &ReflectedObject<'_>) -> bool {
        self.fields_count(db, value) > 0
    }

    fn fields_count(&self, db: &ReflectedTypeDB, value: &ReflectedObject<'_>) -> usize;

    /// The field under `key`, invalid if there is none.
    fn get_field<'a>(
        &self,
        db: &'a ReflectedTypeDB,
        value: &ReflectedObject<'a>,
        key: &Any,
    ) -> Reflection<'a>;

    /// All fields, in declaration order for classes.
    fn get_fields<'a>(&self, db: &'a ReflectedTypeDB, value: &ReflectedObject<'a>) -> Vec<Field<'a>>;

    /// `count` fields starting at index `first`, clamped to the available ones.
    fn get_fields_range<'a>(
        &self,
        db: &'a ReflectedTypeDB,
        value: &ReflectedObject<'a>,
        first: usize,
        count: usize,
    ) -> Vec<Field<'a>> {
        self.get_fields(db, value)
            .into_iter()
            .skip(first)
            .take(count)
            .collect()
    }

    fn fields_caps(&self, _db: &ReflectedTypeDB, _value: &ReflectedObject<'_>) -> FieldCaps {
        FieldCaps::default()
    }

    fn add_field(
        &self,
        _db: &ReflectedTypeDB,
        _value: &ReflectedObject<'_>,
        _key: Any,
        _field_value: Any,
    ) -> bool {
        false
    }

    fn insert_field(
        &self,
        _db: &ReflectedTypeDB,
        _value: &ReflectedObject<'_>,
        _before: &Any,
        _key: Any,
        _field_value: Any,
    ) -> bool {
        false
    }

    fn remove_field(&self, _db: &ReflectedTypeDB, _value: &ReflectedObject<'_>, _key: &Any) -> bool {
        false
    }

    fn has_methods(&self, db: &ReflectedTypeDB, value: &ReflectedObject<'_>) -> bool {
        !self.get_methods(db, value).is_empty()
    }

    fn get_method<'a>(
        &self,
        _db: &'a ReflectedTypeDB,
        _value: &ReflectedObject<'a>,
        _name: &str,
    ) -> Option<Method<'a>> {
        None
    }

    fn get_methods<'a>(&self, _db: &'a ReflectedTypeDB, _value: &ReflectedObject<'a>) -> Vec<Method<'a>> {
        Vec::new()
    }

    /// The object a pointer-like value refers to.
    fn pointee<'a>(&self, _db: &'a ReflectedTypeDB, _value: &ReflectedObject<'a>) -> Option<ReflectedObject<'a>> {
        None
    }
}

/// Reads an element out of an [`Any`], converting through `db` when needed.
pub(crate) fn take_as<T: 'static>(db: &ReflectedTypeDB, value: Any) -> Option<T> {
    match value.take::<T>() {
        Ok(value) => Some(value),
        Err(value) => db
            .cast_any(&value, TypeToken::of::<T>())
            .ok()?
            .take::<T>()
            .ok(),
    }
}

/// Reads a key out of an [`Any`], converting through `db` when needed.
pub(crate) fn key_as<K: Clone + 'static>(db: &ReflectedTypeDB, key: &Any) -> Option<K> {
    match key.get::<K>() {
        Some(key) => Some(key.clone()),
        None => db.cast::<K>(key).ok(),
    }
}
