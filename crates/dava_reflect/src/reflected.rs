use alloc::boxed::Box;

use crate::registry::ReflectedTypeDB;
use crate::structure::StructureWrapper;
use crate::TypeToken;

// -----------------------------------------------------------------------------
// Reflected

/// A type that can be described by a [`ReflectedTypeDB`].
///
/// Implementing the trait only makes the type *known*: records are created
/// lazily the first time a database sees the type. Fields, methods and
/// constructors are attached through a
/// [`ReflectionRegistrator`](crate::ReflectionRegistrator).
///
/// Plain types usually use [`impl_reflected!`](crate::impl_reflected).
/// Containers override [`structure_wrapper`](Reflected::structure_wrapper)
/// to expose their elements as fields.
pub trait Reflected: Sized + Send + Sync + 'static {
    /// Structure wrapper installed when a database first creates the record.
    ///
    /// `None` means the record receives a class structure once it is
    /// registered, or stays without fields.
    fn structure_wrapper() -> Option<Box<dyn StructureWrapper>> {
        None
    }

    /// Creates the records of types this type exposes, such as element types.
    fn register_dependencies(_db: &ReflectedTypeDB) {}

    /// Copies the value, if the type supports copying.
    ///
    /// Used whenever a value is read out of an object into an [`Any`](crate::any::Any).
    fn reflect_clone(&self) -> Option<Self> {
        None
    }
}

// -----------------------------------------------------------------------------
// ReflectionBase

/// Object-safe access to the concrete type behind a reference.
///
/// Implemented for every [`Reflected`] type. Use it as a supertrait of
/// polymorphic interfaces so that a `&dyn Trait` can be reflected as the
/// value it really is:
///
/// ```
/// use dava_reflect::{impl_reflected, ReflectionBase, TypeToken};
///
/// trait Shape: ReflectionBase {}
///
/// struct Circle;
/// impl_reflected!(Circle);
/// impl Shape for Circle {}
///
/// let shape: Box<dyn Shape> = Box::new(Circle);
/// assert_eq!((*shape).dyn_type_token(), TypeToken::of::<Circle>());
/// assert_eq!(shape.dyn_type_token(), TypeToken::of::<Box<dyn Shape>>());
/// ```
///
/// A `Box<dyn Shape>` is itself [`Reflected`], so method calls on the box
/// report the box. Dereference it first to reach the value inside.
pub trait ReflectionBase: core::any::Any + Send + Sync {
    /// Token of the concrete type.
    fn dyn_type_token(&self) -> TypeToken;
}

impl<T: Reflected> ReflectionBase for T {
    #[inline]
    fn dyn_type_token(&self) -> TypeToken {
        TypeToken::of::<T>()
    }
}

// -----------------------------------------------------------------------------
// impl_reflected

/// Implements [`Reflected`] for plain types.
///
/// The `Type: Clone` form also lets values be read out by copy.
///
/// ```
/// use dava_reflect::{impl_reflected, Reflected};
///
/// #[derive(Clone)]
/// struct Copyable(i32);
/// struct Unique(i32);
///
/// impl_reflected!(Copyable: Clone);
/// impl_reflected!(Unique);
///
/// assert!(Copyable(1).reflect_clone().is_some());
/// assert!(Unique(1).reflect_clone().is_none());
/// ```
#[macro_export]
macro_rules! impl_reflected {
    ($ty:ty : Clone) => {
        impl $crate::Reflected for $ty {
            #[inline]
            fn reflect_clone(&self) -> ::core::option::Option<Self> {
                ::core::option::Option::Some(::core::clone::Clone::clone(self))
            }
        }
    };
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Reflected for $ty {}
        )+
    };
}
