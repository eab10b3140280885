//! The [`Reflection`] handle.
//!
//! A `Reflection` pairs an object with the wrappers that interpret it: a
//! [`ValueWrapper`] for the value, a [`StructureWrapper`] for its fields and
//! methods, and optional [`ReflectedMeta`]. Handles borrow the object they
//! were created from; children borrow the handle they came from.
//!
//! Every operation is safe on an invalid handle and returns an empty result.

// -----------------------------------------------------------------------------
// Modules

mod dump;
mod field;

// -----------------------------------------------------------------------------
// Exports

pub use field::{Field, Method};

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::any::Any;
use crate::meta::ReflectedMeta;
use crate::object::ReflectedObject;
use crate::registry::{ReflectedType, ReflectedTypeDB};
use crate::structure::{EMPTY_STRUCTURE, FieldCaps, StructureWrapper};
use crate::value::{AnyValueWrapper, ObjectValueWrapper, OpaqueValueWrapper, ValueWrapper};
use crate::{Reflected, ReflectionBase, TypeToken};

// -----------------------------------------------------------------------------
// Reflection

#[derive(Clone, Copy)]
struct Inner<'a> {
    db: &'a ReflectedTypeDB,
    object: ReflectedObject<'a>,
    value_wrapper: &'a dyn ValueWrapper,
    structure_wrapper: &'a dyn StructureWrapper,
    meta: Option<&'a ReflectedMeta>,
}

impl Inner<'_> {
    #[inline]
    fn into_const(mut self) -> Self {
        self.object = self.object.as_const();
        self
    }
}

/// A handle to a value for dynamic inspection.
///
/// Handles follow the borrow rules of the value they reflect. Children
/// listed through `&self` are read-only views; writing and changing the
/// shape of a container go through `&mut self`, so no child can outlive a
/// change to its parent.
///
/// # Examples
///
/// ```
/// use dava_reflect::{impl_reflected, member, Reflection, ReflectionRegistrator, ReflectedTypeDB};
///
/// struct Point {
///     x: f32,
///     y: f32,
/// }
/// impl_reflected!(Point);
///
/// let db = ReflectedTypeDB::new();
/// ReflectionRegistrator::<Point>::begin(&db)
///     .field("X", member!(Point, x))
///     .field("Y", member!(Point, y))
///     .end()
///     .unwrap();
///
/// let mut p = Point { x: 3.0, y: 4.0 };
/// let mut r = Reflection::create(&db, &mut p);
///
/// assert_eq!(r.field("X").get_value().get::<f32>(), Some(&3.0));
/// assert!(!r.field("X").set_value(5.0_f32.into()));
/// assert!(r.field_mut("X").set_value(5.0_f32.into()));
/// assert!(!r.field("Z").is_valid());
/// assert_eq!(p.x, 5.0);
/// ```
///
/// A child cannot be used after its parent container was changed:
///
/// ```compile_fail
/// use dava_reflect::any::Any;
/// use dava_reflect::{Reflection, ReflectedTypeDB};
///
/// let db = ReflectedTypeDB::new();
/// let mut numbers = vec![111_u64];
/// let mut r = Reflection::create(&db, &mut numbers);
///
/// let first = r.get_field(&Any::new(0_usize));
/// r.add_field(Any::empty(), Any::new(222_u64));
/// let _ = first.get_value();
/// ```
#[derive(Default)]
pub struct Reflection<'a> {
    inner: Option<Inner<'a>>,
}

impl<'a> Reflection<'a> {
    /// Builds a read-only handle from its parts.
    ///
    /// A missing structure wrapper or meta is taken from the record of the
    /// value's type. Values of unknown types get no fields.
    pub fn new(
        db: &'a ReflectedTypeDB,
        object: ReflectedObject<'a>,
        value_wrapper: &'a dyn ValueWrapper,
        structure_wrapper: Option<&'a dyn StructureWrapper>,
        meta: Option<&'a ReflectedMeta>,
    ) -> Self {
        Self::from_parts(db, object.as_const(), value_wrapper, structure_wrapper, meta)
    }

    /// Like [`new`](Self::new), keeping the constness of `object`.
    pub(crate) fn from_parts(
        db: &'a ReflectedTypeDB,
        object: ReflectedObject<'a>,
        value_wrapper: &'a dyn ValueWrapper,
        structure_wrapper: Option<&'a dyn StructureWrapper>,
        meta: Option<&'a ReflectedMeta>,
    ) -> Self {
        let record = value_wrapper
            .get_value_object(&object)
            .and_then(|value| db.get_by_object(&value));
        let structure_wrapper = structure_wrapper
            .or_else(|| record.map(ReflectedType::structure_wrapper))
            .unwrap_or(&EMPTY_STRUCTURE);
        let meta = meta.or_else(|| record.and_then(ReflectedType::meta));
        Self {
            inner: Some(Inner {
                db,
                object,
                value_wrapper,
                structure_wrapper,
                meta,
            }),
        }
    }

    /// A handle that refers to nothing.
    #[inline]
    pub const fn invalid() -> Self {
        Self { inner: None }
    }

    /// Reflects `value` as its static type `T`.
    pub fn create<T: Reflected>(db: &'a ReflectedTypeDB, value: &'a mut T) -> Self {
        db.edit::<T>();
        Self::from_parts(
            db,
            ReflectedObject::typed_mut(value),
            ObjectValueWrapper::<T>::INSTANCE,
            None,
            None,
        )
    }

    /// Reflects `value` as its static type `T`, read-only.
    pub fn create_ref<T: Reflected>(db: &'a ReflectedTypeDB, value: &'a T) -> Self {
        db.edit::<T>();
        Self::from_parts(
            db,
            ReflectedObject::typed_ref(value),
            ObjectValueWrapper::<T>::INSTANCE,
            None,
            None,
        )
    }

    /// Reflects `value` as its dynamic type.
    ///
    /// A `&mut dyn Trait` shows the fields of the concrete type behind it.
    #[inline]
    pub fn create_dyn<T: ?Sized + ReflectionBase>(db: &'a ReflectedTypeDB, value: &'a mut T) -> Self {
        Self::dynamic(db, ReflectedObject::from_mut(value))
    }

    /// Reflects `value` as its dynamic type, read-only.
    #[inline]
    pub fn create_dyn_ref<T: ?Sized + ReflectionBase>(db: &'a ReflectedTypeDB, value: &'a T) -> Self {
        Self::dynamic(db, ReflectedObject::from_ref(value))
    }

    /// Reflects the object behind a handle, read-only.
    ///
    /// The value can only be read if the database knows the object's type.
    #[inline]
    pub fn from_object(db: &'a ReflectedTypeDB, object: ReflectedObject<'a>) -> Self {
        Self::dynamic(db, object.as_const())
    }

    /// Like [`from_object`](Self::from_object), keeping the constness of `object`.
    pub(crate) fn dynamic(db: &'a ReflectedTypeDB, object: ReflectedObject<'a>) -> Self {
        let value_wrapper: &'a dyn ValueWrapper = match db.get_by_object(&object) {
            Some(record) => record.value_wrapper(),
            None => OpaqueValueWrapper::INSTANCE,
        };
        Self::from_parts(db, object, value_wrapper, None, None)
    }

    /// Reflects the contents of `value`.
    ///
    /// An owning pointer is followed to its pointee, which is reflected as
    /// its dynamic type. Anything else is reflected in place, and setting the
    /// value replaces the contents of the `Any`.
    pub fn create_any(db: &'a ReflectedTypeDB, value: &'a mut Any) -> Self {
        if value.is_empty() {
            return Self::invalid();
        }
        let object = ReflectedObject::typed_mut(value);
        let Some(contents) = AnyValueWrapper::INSTANCE.get_value_object(&object) else {
            return Self::invalid();
        };
        let pointee = db
            .get_by_object(&contents)
            .and_then(|record| record.structure_wrapper().pointee(db, &contents));
        match pointee {
            Some(target) => Self::dynamic(db, target),
            None => Self::from_parts(db, object, AnyValueWrapper::INSTANCE, None, None),
        }
    }

    /// Reflects `value` through a specific record, usually a custom one.
    ///
    /// Returns an invalid handle if the record describes another type.
    pub fn create_as<T: Reflected>(db: &'a ReflectedTypeDB, record: &'static ReflectedType, value: &'a mut T) -> Self {
        if record.type_token() != TypeToken::of::<T>() {
            return Self::invalid();
        }
        Self::from_parts(
            db,
            ReflectedObject::typed_mut(value),
            record.value_wrapper(),
            Some(record.structure_wrapper()),
            record.meta(),
        )
    }

    /// The same handle with `meta` in place of its own meta.
    pub fn with_meta(mut self, meta: &'a ReflectedMeta) -> Self {
        if let Some(inner) = &mut self.inner {
            inner.meta = Some(meta);
        }
        self
    }

    /// The same handle with the meta of `other`.
    pub fn with_meta_of(mut self, other: &Reflection<'a>) -> Self {
        if let Some(inner) = &mut self.inner {
            inner.meta = other.meta();
        }
        self
    }

    /// A read-only view of the same value.
    #[inline]
    pub fn as_const(&self) -> Reflection<'_> {
        Reflection {
            inner: self.inner.map(Inner::into_const),
        }
    }

    /// A handle to the same value that borrows this one.
    #[inline]
    pub fn reborrow(&mut self) -> Reflection<'_> {
        Reflection { inner: self.inner }
    }

    // -------------------------------------------------------------------------
    // Value

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.inner.is_some()
    }

    /// Returns `true` if the value cannot be written. Invalid handles are
    /// read-only.
    pub fn is_readonly(&self) -> bool {
        self.inner
            .is_none_or(|inner| inner.value_wrapper.is_readonly(&inner.object))
    }

    pub fn value_type(&self) -> Option<TypeToken> {
        let inner = self.inner?;
        inner.value_wrapper.value_type(&inner.object)
    }

    /// A read-only handle to the value itself, `None` for computed values.
    pub fn value_object(&self) -> Option<ReflectedObject<'_>> {
        let inner = self.inner?;
        inner
            .value_wrapper
            .get_value_object(&inner.object)
            .map(ReflectedObject::as_const)
    }

    /// The record of the value's type.
    pub fn reflected_type(&self) -> Option<&'static ReflectedType> {
        let inner = self.inner?;
        match self.value_object() {
            Some(value) => inner.db.get_by_object(&value),
            None => inner.db.get_by_type(self.value_type()?),
        }
    }

    /// A copy of the value, empty if it cannot be copied.
    pub fn get_value(&self) -> Any {
        match self.inner {
            Some(inner) => inner.value_wrapper.get_value(&inner.object),
            None => Any::empty(),
        }
    }

    /// The value converted to `T` with the database's conversions.
    pub fn get_value_cast<T: Clone + 'static>(&self) -> Option<T> {
        let inner = self.inner?;
        inner.db.cast::<T>(&self.get_value()).ok()
    }

    /// Replaces the value with `value`, which must have the value's exact type.
    pub fn set_value(&mut self, value: Any) -> bool {
        self.inner
            .is_some_and(|inner| inner.value_wrapper.set_value(&inner.object, value))
    }

    /// Replaces the value, converting `value` first if needed.
    pub fn set_value_with_cast(&mut self, value: Any) -> bool {
        self.inner.is_some_and(|inner| {
            inner
                .value_wrapper
                .set_value_with_cast(inner.db, &inner.object, value)
        })
    }

    /// The object an owning pointer value points to.
    pub(crate) fn pointee(&self) -> Option<ReflectedObject<'_>> {
        let (inner, value) = self.view()?;
        inner.structure_wrapper.pointee(inner.db, &value)
    }

    // -------------------------------------------------------------------------
    // Meta

    #[inline]
    pub fn meta(&self) -> Option<&'a ReflectedMeta> {
        self.inner?.meta
    }

    pub fn get_meta<M: 'static>(&self) -> Option<&'a M> {
        self.meta()?.get::<M>()
    }

    // -------------------------------------------------------------------------
    // Fields

    // Read-only value object.
    fn view(&self) -> Option<(Inner<'a>, ReflectedObject<'a>)> {
        let (inner, value) = self.value_parts()?;
        Some((inner, value.as_const()))
    }

    fn view_mut(&mut self) -> Option<(Inner<'a>, ReflectedObject<'a>)> {
        self.value_parts()
    }

    fn value_parts(&self) -> Option<(Inner<'a>, ReflectedObject<'a>)> {
        let inner = self.inner?;
        let value = inner.value_wrapper.get_value_object(&inner.object)?;
        Some((inner, value))
    }

    pub fn has_fields(&self) -> bool {
        self.view()
            .is_some_and(|(inner, value)| inner.structure_wrapper.has_fields(inner.db, &value))
    }

    pub fn fields_count(&self) -> usize {
        self.view().map_or(0, |(inner, value)| {
            inner.structure_wrapper.fields_count(inner.db, &value)
        })
    }

    /// A read-only view of the field under `key`: a name for classes, an
    /// index or key for containers.
    pub fn get_field(&self, key: &Any) -> Reflection<'_> {
        match self.view() {
            Some((inner, value)) => inner.structure_wrapper.get_field(inner.db, &value, key),
            None => Reflection::invalid(),
        }
    }

    /// The field under `key`, writable if this handle is.
    pub fn get_field_mut(&mut self, key: &Any) -> Reflection<'_> {
        match self.view_mut() {
            Some((inner, value)) => inner.structure_wrapper.get_field(inner.db, &value, key),
            None => Reflection::invalid(),
        }
    }

    /// A read-only view of the field named `name`.
    #[inline]
    pub fn field(&self, name: &str) -> Reflection<'_> {
        self.get_field(&Any::new(String::from(name)))
    }

    /// The field named `name`, writable if this handle is.
    #[inline]
    pub fn field_mut(&mut self, name: &str) -> Reflection<'_> {
        self.get_field_mut(&Any::new(String::from(name)))
    }

    /// The field at position `index`.
    pub fn field_at(&self, index: usize) -> Option<Field<'_>> {
        self.fields_range(index, 1).pop()
    }

    /// Read-only views of every field.
    pub fn fields(&self) -> Vec<Field<'_>> {
        match self.view() {
            Some((inner, value)) => inner.structure_wrapper.get_fields(inner.db, &value),
            None => Vec::new(),
        }
    }

    /// Up to `count` fields starting at position `first`.
    pub fn fields_range(&self, first: usize, count: usize) -> Vec<Field<'_>> {
        match self.view() {
            Some((inner, value)) => inner
                .structure_wrapper
                .get_fields_range(inner.db, &value, first, count),
            None => Vec::new(),
        }
    }

    pub fn fields_caps(&self) -> FieldCaps {
        self.view()
            .map(|(inner, value)| inner.structure_wrapper.fields_caps(inner.db, &value))
            .unwrap_or_default()
    }

    pub fn add_field(&mut self, key: Any, value: Any) -> bool {
        self.view_mut().is_some_and(|(inner, object)| {
            inner
                .structure_wrapper
                .add_field(inner.db, &object, key, value)
        })
    }

    /// Inserts a field before the field under `before`.
    pub fn insert_field(&mut self, before: &Any, key: Any, value: Any) -> bool {
        self.view_mut().is_some_and(|(inner, object)| {
            inner
                .structure_wrapper
                .insert_field(inner.db, &object, before, key, value)
        })
    }

    pub fn remove_field(&mut self, key: &Any) -> bool {
        self.view_mut()
            .is_some_and(|(inner, object)| inner.structure_wrapper.remove_field(inner.db, &object, key))
    }

    // -------------------------------------------------------------------------
    // Methods

    pub fn has_methods(&self) -> bool {
        self.view()
            .is_some_and(|(inner, value)| inner.structure_wrapper.has_methods(inner.db, &value))
    }

    /// The method named `name`, bound to a read-only view of the value.
    ///
    /// Methods that take `&mut self` fail with
    /// [`InvokeError::ReadonlyThis`](crate::any::InvokeError::ReadonlyThis).
    pub fn get_method(&self, name: &str) -> Option<Method<'_>> {
        let (inner, value) = self.view()?;
        inner.structure_wrapper.get_method(inner.db, &value, name)
    }

    /// The method named `name`, bound to the value, writable if this handle is.
    pub fn get_method_mut(&mut self, name: &str) -> Option<Method<'_>> {
        let (inner, value) = self.view_mut()?;
        inner.structure_wrapper.get_method(inner.db, &value, name)
    }

    pub fn methods(&self) -> Vec<Method<'_>> {
        match self.view() {
            Some((inner, value)) => inner.structure_wrapper.get_methods(inner.db, &value),
            None => Vec::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Dump

    /// Writes the value as a tree, one field per line, followed by the
    /// methods of each value.
    ///
    /// The tree is cut below `max_level`; zero prints everything.
    pub fn dump(&self, out: &mut dyn fmt::Write, max_level: usize) -> fmt::Result {
        let root = Field {
            key: Any::new("this"),
            reflection: self.as_const(),
            inherit_from: None,
        };
        dump::dump_field(out, &root, 0, max_level)
    }
}

impl fmt::Debug for Reflection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner {
            Some(inner) => f
                .debug_struct("Reflection")
                .field("object", &inner.object)
                .field("value_type", &self.value_type())
                .field("has_meta", &inner.meta.is_some())
                .finish(),
            None => f.write_str("Reflection(<invalid>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec::Vec;

    use crate::any::Any;
    use crate::meta::{DisplayName, ReflectedMeta};
    use crate::registry::ReflectedTypeDB;
    use crate::object::ReflectedObject;
    use crate::{Reflection, ReflectionBase, ReflectionRegistrator, TypeToken, impl_reflected, member};

    #[derive(Clone, Default)]
    struct Point {
        x: f32,
        y: f32,
    }
    impl_reflected!(Point: Clone);

    trait Shape: ReflectionBase {}

    #[derive(Default)]
    struct Circle {
        center: Point,
        radius: f32,
    }
    impl_reflected!(Circle);
    impl Shape for Circle {}

    #[derive(Default)]
    struct Scene {
        shapes: Vec<Box<dyn Shape>>,
        labels: BTreeMap<String, i32>,
    }
    impl_reflected!(Scene);

    fn register(db: &ReflectedTypeDB) {
        ReflectionRegistrator::<Point>::begin(db)
            .field("X", member!(Point, x))
            .field("Y", member!(Point, y))
            .end()
            .unwrap();
        ReflectionRegistrator::<Circle>::begin(db)
            .field("center", member!(Circle, center))
            .field("radius", member!(Circle, radius))
            .end()
            .unwrap();
        ReflectionRegistrator::<Scene>::begin(db)
            .field("shapes", member!(Scene, shapes))
            .field("labels", member!(Scene, labels))
            .end()
            .unwrap();
    }

    #[test]
    fn get_and_set_fields() {
        let db = ReflectedTypeDB::new();
        register(&db);
        let mut p = Point { x: 3.0, y: 4.0 };
        let mut r = Reflection::create(&db, &mut p);

        assert!(r.is_valid());
        assert_eq!(r.fields_count(), 2);
        assert_eq!(r.field("X").get_value().get::<f32>(), Some(&3.0));
        assert!(r.field_mut("X").set_value(Any::new(5.0_f32)));
        assert!(!r.field_mut("X").set_value(Any::new(5_i32)));
        assert!(r.field_mut("Y").set_value_with_cast(Any::new(7_i32)));
        assert_eq!(r.field("Y").get_value_cast::<f64>(), Some(7.0));

        let names: Vec<String> = r
            .fields()
            .iter()
            .filter_map(|f| f.key.as_str().map(String::from))
            .collect();
        assert_eq!(names, ["X", "Y"]);
        assert_eq!((p.x, p.y), (5.0, 7.0));
    }

    #[test]
    fn const_handles_are_readonly() {
        let db = ReflectedTypeDB::new();
        register(&db);
        let p = Point::default();
        let mut r = Reflection::create_ref(&db, &p);
        assert!(r.field("X").is_readonly());
        assert!(!r.field_mut("X").set_value(Any::new(1.0_f32)));
    }

    #[test]
    fn invalid_handles_are_inert() {
        let mut r = Reflection::invalid();
        assert!(!r.is_valid());
        assert!(r.is_readonly());
        assert!(r.get_value().is_empty());
        assert!(!r.set_value(Any::new(1_i32)));
        assert!(r.fields().is_empty());
        assert!(r.methods().is_empty());
        assert!(!r.field("x").is_valid());
        assert!(r.get_method("x").is_none());
    }

    #[test]
    fn trait_objects_show_dynamic_type() {
        let db = ReflectedTypeDB::new();
        register(&db);
        let mut scene = Scene::default();
        scene.shapes.push(Box::new(Circle {
            center: Point { x: 1.0, y: 2.0 },
            radius: 0.5,
        }));

        let mut r = Reflection::create(&db, &mut scene);
        let mut shapes = r.field_mut("shapes");
        assert_eq!(shapes.fields_count(), 1);

        let mut first = shapes.get_field_mut(&Any::new(0_usize));
        assert_eq!(first.fields_count(), 2);
        assert!(first.field_mut("radius").set_value(Any::new(2.0_f32)));
        assert!(first.field_mut("center").field_mut("Y").set_value(Any::new(9.0_f32)));

        let shape: &mut dyn Shape = &mut *scene.shapes[0];
        let r = Reflection::create_dyn(&db, shape);
        assert_eq!(r.field("radius").get_value_cast::<f32>(), Some(2.0));
        assert_eq!(r.field("center").field("Y").get_value_cast::<f32>(), Some(9.0));
    }

    #[test]
    fn container_fields() {
        let db = ReflectedTypeDB::new();
        register(&db);
        let mut scene = Scene::default();
        let mut r = Reflection::create(&db, &mut scene);
        let mut labels = r.field_mut("labels");

        assert!(labels.fields_caps().can_add());
        assert!(labels.add_field(Any::new(String::from("a")), Any::new(1_i32)));
        assert!(labels.add_field(Any::new(String::from("b")), Any::new(2_u8)));
        assert!(!labels.add_field(Any::new(String::from("a")), Any::new(3_i32)));
        assert_eq!(labels.fields_count(), 2);
        assert_eq!(labels.field("b").get_value_cast::<i32>(), Some(2));
        assert!(labels.remove_field(&Any::new(String::from("a"))));
        assert_eq!(labels.field_at(0).unwrap().key.as_str(), Some("b"));
        assert_eq!(scene.labels.len(), 1);
    }

    #[test]
    fn any_contents() {
        let db = ReflectedTypeDB::new();
        register(&db);

        let mut value = Any::new(Point { x: 1.0, y: 2.0 });
        let mut r = Reflection::create_any(&db, &mut value);
        assert_eq!(r.fields_count(), 2);
        assert!(r.field_mut("X").set_value(Any::new(4.0_f32)));
        assert_eq!(value.get::<Point>().map(|p| p.x), Some(4.0));

        let mut boxed = Any::new_unique::<Box<dyn Shape>>(Box::new(Circle::default()));
        let r = Reflection::create_any(&db, &mut boxed);
        assert!(r.field("radius").is_valid());

        let mut empty = Any::empty();
        assert!(!Reflection::create_any(&db, &mut empty).is_valid());
    }

    #[test]
    fn external_meta() {
        let db = ReflectedTypeDB::new();
        register(&db);
        let meta = ReflectedMeta::new().with(DisplayName("Origin"));
        let mut p = Point::default();
        let r = Reflection::create(&db, &mut p);
        assert!(r.get_meta::<DisplayName>().is_none());

        let named = r.with_meta(&meta);
        assert_eq!(named.get_meta::<DisplayName>(), Some(&DisplayName("Origin")));
        let x = named.field("X").with_meta_of(&named);
        assert_eq!(x.get_meta::<DisplayName>(), Some(&DisplayName("Origin")));
        assert_eq!(x.get_value().get::<f32>(), Some(&0.0));
    }

    #[test]
    fn boxed_trait_objects_report_concrete_type() {
        let db = ReflectedTypeDB::new();
        register(&db);
        let mut boxed: Box<dyn Shape> = Box::new(Circle {
            center: Point::default(),
            radius: 1.5,
        });

        assert_eq!((*boxed).dyn_type_token(), TypeToken::of::<Circle>());
        assert_ne!(boxed.dyn_type_token(), TypeToken::of::<Circle>());

        let r = Reflection::create_dyn(&db, &mut *boxed);
        assert_eq!(r.value_type(), Some(TypeToken::of::<Circle>()));
        assert_eq!(r.field("radius").get_value_cast::<f32>(), Some(1.5));
    }

    #[test]
    fn shared_children_are_readonly() {
        let db = ReflectedTypeDB::new();
        register(&db);
        let mut p = Point { x: 1.0, y: 2.0 };
        let r = Reflection::create(&db, &mut p);

        assert!(!r.is_readonly());
        assert!(r.field("X").is_readonly());
        assert!(r.fields().iter().all(|f| f.reflection.is_readonly()));
        assert!(r.as_const().is_readonly());

        let mut x = r.field("X");
        assert!(!x.set_value(Any::new(8.0_f32)));
        assert_eq!(p.x, 1.0);
    }

    #[test]
    fn objects_from_handles_are_readonly() {
        let db = ReflectedTypeDB::new();
        register(&db);
        let mut p = Point::default();
        let r = Reflection::create(&db, &mut p);

        let object = r.value_object().unwrap();
        assert!(object.is_const());
        let mut again = Reflection::from_object(&db, object);
        assert!(again.field("X").is_valid());
        assert!(!again.field_mut("X").set_value(Any::new(3.0_f32)));

        let q = Point::default();
        let mut from_ref = Reflection::from_object(&db, ReflectedObject::from_ref(&q));
        assert!(!from_ref.field_mut("Y").set_value(Any::new(3.0_f32)));
    }

    #[test]
    fn children_refetched_after_growth() {
        let db = ReflectedTypeDB::new();
        let mut numbers = Vec::with_capacity(1);
        numbers.push(111_u64);
        let mut r = Reflection::create(&db, &mut numbers);

        assert_eq!(r.get_field(&Any::new(0_usize)).get_value_cast::<u64>(), Some(111));
        for n in 0..64_u64 {
            assert!(r.add_field(Any::empty(), Any::new(n)));
        }
        let first = r.get_field(&Any::new(0_usize));
        assert_eq!(first.get_value_cast::<u64>(), Some(111));
        assert!(r.reborrow().get_field_mut(&Any::new(64_usize)).set_value(Any::new(5_u64)));
        assert_eq!(numbers.len(), 65);
        assert_eq!(numbers[64], 5);
    }
}
