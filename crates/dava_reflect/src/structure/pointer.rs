use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::marker::PhantomData;

use crate::any::Any;
use crate::object::ReflectedObject;
use crate::reflection::{Field, Method};
use crate::registry::ReflectedTypeDB;
use crate::structure::{FieldCaps, StructureWrapper};
use crate::{Reflection, ReflectionBase};

// -----------------------------------------------------------------------------
// PointerLike

/// An owning pointer whose pointee is reflected by its dynamic type.
pub trait PointerLike: Send + Sync + 'static {
    type Target: ?Sized + ReflectionBase;

    /// `false` if the pointee can only be viewed as const.
    const MUTABLE: bool;

    fn target(&self) -> Option<&Self::Target>;

    fn target_mut(&mut self) -> Option<&mut Self::Target>;
}

impl<T: ?Sized + ReflectionBase> PointerLike for Box<T> {
    type Target = T;
    const MUTABLE: bool = true;

    #[inline]
    fn target(&self) -> Option<&T> {
        Some(&**self)
    }

    #[inline]
    fn target_mut(&mut self) -> Option<&mut T> {
        Some(&mut **self)
    }
}

impl<T: ?Sized + ReflectionBase> PointerLike for Option<Box<T>> {
    type Target = T;
    const MUTABLE: bool = true;

    #[inline]
    fn target(&self) -> Option<&T> {
        self.as_deref()
    }

    #[inline]
    fn target_mut(&mut self) -> Option<&mut T> {
        self.as_deref_mut()
    }
}

impl<T: ?Sized + ReflectionBase> PointerLike for Arc<T> {
    type Target = T;
    const MUTABLE: bool = false;

    #[inline]
    fn target(&self) -> Option<&T> {
        Some(&**self)
    }

    #[inline]
    fn target_mut(&mut self) -> Option<&mut T> {
        None
    }
}

// -----------------------------------------------------------------------------
// PointerStructure

/// Forwards every operation to the pointee, reflected as its dynamic type.
///
/// A null pointer has no fields and no methods.
pub struct PointerStructure<P>(PhantomData<fn() -> P>);

impl<P: PointerLike> PointerStructure<P> {
    #[inline]
    pub const fn new() -> Self {
        Self(PhantomData)
    }

    fn target<'a>(value: &ReflectedObject<'a>) -> Option<ReflectedObject<'a>> {
        let value = if P::MUTABLE { *value } else { value.as_const() };
        value.map_child_dyn::<P, P::Target>(P::target, P::target_mut)
    }


    // The pointee's own structure, looked up by its dynamic type.
    fn forward<'a>(
        db: &ReflectedTypeDB,
        value: &ReflectedObject<'a>,
    ) -> Option<(&'static dyn StructureWrapper, ReflectedObject<'a>)> {
        let target = Self::target(value)?;
        let record = db.get_by_object(&target)?;
        Some((record.structure_wrapper(), target))
    }
}

impl<P: PointerLike> StructureWrapper for PointerStructure<P> {
    fn has_fields(&self, db: &ReflectedTypeDB, value: &ReflectedObject<'_>) -> bool {
        Self::forward(db, value).is_some_and(|(wrapper, target)| wrapper.has_fields(db, &target))
    }

    fn fields_count(&self, db: &ReflectedTypeDB, value: &ReflectedObject<'_>) -> usize {
        Self::forward(db, value).map_or(0, |(wrapper, target)| wrapper.fields_count(db, &target))
    }

    fn get_field<'a>(&self, db: &'a ReflectedTypeDB, value: &ReflectedObject<'a>, key: &Any) -> Reflection<'a> {
        match Self::forward(db, value) {
            Some((wrapper, target)) => wrapper.get_field(db, &target, key),
            None => Reflection::invalid(),
        }
    }

    fn get_fields<'a>(&self, db: &'a ReflectedTypeDB, value: &ReflectedObject<'a>) -> Vec<Field<'a>> {
        Self::forward(db, value).map_or_else(Vec::new, |(wrapper, target)| wrapper.get_fields(db, &target))
    }

    fn get_fields_range<'a>(
        &self,
        db: &'a ReflectedTypeDB,
        value: &ReflectedObject<'a>,
        first: usize,
        count: usize,
    ) -> Vec<Field<'a>> {
        Self::forward(db, value).map_or_else(Vec::new, |(wrapper, target)| {
            wrapper.get_fields_range(db, &target, first, count)
        })
    }

    fn fields_caps(&self, db: &ReflectedTypeDB, value: &ReflectedObject<'_>) -> FieldCaps {
        Self::forward(db, value)
            .map(|(wrapper, target)| wrapper.fields_caps(db, &target))
            .unwrap_or_default()
    }

    fn add_field(&self, db: &ReflectedTypeDB, value: &ReflectedObject<'_>, key: Any, field_value: Any) -> bool {
        Self::forward(db, value).is_some_and(|(wrapper, target)| wrapper.add_field(db, &target, key, field_value))
    }

    fn insert_field(
        &self,
        db: &ReflectedTypeDB,
        value: &ReflectedObject<'_>,
        before: &Any,
        key: Any,
        field_value: Any,
    ) -> bool {
        Self::forward(db, value).is_some_and(|(wrapper, target)| {
            wrapper.insert_field(db, &target, before, key, field_value)
        })
    }

    fn remove_field(&self, db: &ReflectedTypeDB, value: &ReflectedObject<'_>, key: &Any) -> bool {
        Self::forward(db, value).is_some_and(|(wrapper, target)| wrapper.remove_field(db, &target, key))
    }

    fn has_methods(&self, db: &ReflectedTypeDB, value: &ReflectedObject<'_>) -> bool {
        Self::forward(db, value).is_some_and(|(wrapper, target)| wrapper.has_methods(db, &target))
    }

    fn get_method<'a>(&self, db: &'a ReflectedTypeDB, value: &ReflectedObject<'a>, name: &str) -> Option<Method<'a>> {
        let (wrapper, target) = Self::forward(db, value)?;
        wrapper.get_method(db, &target, name)
    }

    fn get_methods<'a>(&self, db: &'a ReflectedTypeDB, value: &ReflectedObject<'a>) -> Vec<Method<'a>> {
        Self::forward(db, value).map_or_else(Vec::new, |(wrapper, target)| wrapper.get_methods(db, &target))
    }

    fn pointee<'a>(&self, _db: &'a ReflectedTypeDB, value: &ReflectedObject<'a>) -> Option<ReflectedObject<'a>> {
        Self::target(value)
    }
}
