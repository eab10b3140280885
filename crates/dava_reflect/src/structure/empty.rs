use alloc::vec::Vec;

use crate::Reflection;
use crate::any::Any;
use crate::object::ReflectedObject;
use crate::reflection::Field;
use crate::registry::ReflectedTypeDB;
use crate::structure::StructureWrapper;

/// A structure without fields or methods.
pub struct EmptyStructure;

/// Shared [`EmptyStructure`] used by types that have no structure of their own.
pub static EMPTY_STRUCTURE: EmptyStructure = EmptyStructure;

impl StructureWrapper for EmptyStructure {
    #[inline]
    fn fields_count(&self, _db: &ReflectedTypeDB, _value: &ReflectedObject<'_>) -> usize {
        0
    }

    #[inline]
    fn get_field<'a>(
        &self,
        _db: &'a ReflectedTypeDB,
        _value: &ReflectedObject<'a>,
        _key: &Any,
    ) -> Reflection<'a> {
        Reflection::invalid()
    }

    #[inline]
    fn get_fields<'a>(&self, _db: &'a ReflectedTypeDB, _value: &ReflectedObject<'a>) -> Vec<Field<'a>> {
        Vec::new()
    }
}
