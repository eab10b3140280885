//! Type-erased, borrow-branded object handles.
//!
//! A [`ReflectedObject<'a>`] is a pointer to some value together with the
//! [`TypeToken`] of that value and a const flag. The lifetime `'a` is the
//! borrow the handle was created from, so a handle can never outlive the
//! object it points to.
//!
//! Handles are `Copy`. Typed access is therefore crate private and scoped to
//! a closure: every access re-checks the token and the const flag and the
//! produced reference never escapes the closure.
#![expect(unsafe_code, reason = "type-erased pointers are dereferenced after a token check")]

use alloc::vec::Vec;
use core::fmt;
use core::marker::PhantomData;
use core::ptr::NonNull;

use crate::{ReflectionBase, TypeToken};

// -----------------------------------------------------------------------------
// ErasedPtr

/// A pointer paired with the token of its pointee.
#[derive(Clone, Copy)]
pub(crate) struct ErasedPtr {
    ptr: NonNull<u8>,
    ty: TypeToken,
}

impl ErasedPtr {
    #[inline]
    pub(crate) fn of<T: 'static>(value: &T) -> Self {
        Self {
            ptr: NonNull::from(value).cast(),
            ty: TypeToken::of::<T>(),
        }
    }

    #[inline]
    pub(crate) fn of_mut<T: 'static>(value: &mut T) -> Self {
        Self {
            ptr: NonNull::from(value).cast(),
            ty: TypeToken::of::<T>(),
        }
    }

    #[inline]
    pub(crate) fn of_dyn<T: ?Sized + ReflectionBase>(value: &T) -> Self {
        Self {
            ty: value.dyn_type_token(),
            ptr: NonNull::from(value).cast(),
        }
    }

    #[inline]
    pub(crate) fn of_dyn_mut<T: ?Sized + ReflectionBase>(value: &mut T) -> Self {
        let ty = value.dyn_type_token();
        Self {
            ty,
            ptr: NonNull::from(value).cast(),
        }
    }
}

// -----------------------------------------------------------------------------
// ReflectedObject

/// A typed pointer to a value borrowed for `'a`.
///
/// Besides the viewed type, a handle remembers the *origin*: the most
/// derived object it was produced from. Upcasting to a base keeps the origin,
/// which is what makes a later downcast back to the derived type possible.
///
/// # Examples
///
/// ```
/// use dava_reflect::object::ReflectedObject;
/// use dava_reflect::TypeToken;
///
/// let value = 5_i32;
/// let obj = ReflectedObject::from_ref(&value);
///
/// assert_eq!(obj.type_token(), TypeToken::of::<i32>());
/// assert!(obj.is_const());
/// ```
#[derive(Clone, Copy)]
pub struct ReflectedObject<'a> {
    value: ErasedPtr,
    origin: ErasedPtr,
    is_const: bool,
    _marker: PhantomData<&'a mut ()>,
}

impl<'a> ReflectedObject<'a> {
    #[inline]
    const fn from_erased(value: ErasedPtr, is_const: bool) -> Self {
        Self {
            value,
            origin: value,
            is_const,
            _marker: PhantomData,
        }
    }

    /// Creates a const handle to `value`, typed by its dynamic type.
    #[inline]
    pub fn from_ref<T: ?Sized + ReflectionBase>(value: &'a T) -> Self {
        Self::from_erased(ErasedPtr::of_dyn(value), true)
    }

    /// Creates a mutable handle to `value`, typed by its dynamic type.
    #[inline]
    pub(crate) fn from_mut<T: ?Sized + ReflectionBase>(value: &'a mut T) -> Self {
        Self::from_erased(ErasedPtr::of_dyn_mut(value), false)
    }

    /// Creates a const handle typed by the static type `T`.
    #[inline]
    pub(crate) fn typed_ref<T: 'static>(value: &'a T) -> Self {
        Self::from_erased(ErasedPtr::of(value), true)
    }

    /// Creates a mutable handle typed by the static type `T`.
    #[inline]
    pub(crate) fn typed_mut<T: 'static>(value: &'a mut T) -> Self {
        Self::from_erased(ErasedPtr::of_mut(value), false)
    }

    /// The type this handle views the object as.
    #[inline]
    pub fn type_token(&self) -> TypeToken {
        self.value.ty
    }

    /// The most derived type this handle was produced from.
    #[inline]
    pub fn origin_type(&self) -> TypeToken {
        self.origin.ty
    }

    /// Returns `true` if the object must not be modified through this handle.
    #[inline]
    pub fn is_const(&self) -> bool {
        self.is_const
    }

    /// Returns the same handle with the const flag set.
    #[inline]
    pub fn as_const(mut self) -> Self {
        self.is_const = true;
        self
    }

    /// Address of the viewed object, for identity checks.
    #[inline]
    pub fn addr(&self) -> *const () {
        self.value.ptr.as_ptr().cast_const().cast()
    }

    /// Returns `true` if both handles view the same address as the same type.
    #[inline]
    pub fn same_object(&self, other: &Self) -> bool {
        self.value.ptr == other.value.ptr && self.value.ty == other.value.ty
    }

    /// Runs `f` on the object if it is a `T`.
    pub(crate) fn with_ref<T: 'static, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        if !self.value.ty.is::<T>() {
            return None;
        }
        // SAFETY: the token proves the pointee is a `T`, and the pointer was
        // derived from a borrow that lives for `'a`.
        let value = unsafe { self.value.ptr.cast::<T>().as_ref() };
        Some(f(value))
    }

    /// Runs `f` on the object if it is a mutable `T`.
    pub(crate) fn with_mut<T: 'static, R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        if self.is_const || !self.value.ty.is::<T>() {
            return None;
        }
        // SAFETY: as in `with_ref`. Non-const handles only come from
        // `&'a mut` borrows, and the reference is confined to `f`.
        let value = unsafe { self.value.ptr.cast::<T>().as_mut() };
        Some(f(value))
    }

    fn child(&self, value: ErasedPtr) -> Self {
        Self::from_erased(value, self.is_const)
    }

    /// Produces a handle to a value reachable from a `C`.
    ///
    /// Only one of `get` and `get_mut` is called, chosen by the const flag.
    pub(crate) fn map_erased<C: 'static>(
        &self,
        get: impl FnOnce(&C) -> Option<ErasedPtr>,
        get_mut: impl FnOnce(&mut C) -> Option<ErasedPtr>,
    ) -> Option<Self> {
        let value = if self.is_const {
            self.with_ref::<C, _>(get)?
        } else {
            self.with_mut::<C, _>(get_mut)?
        }?;
        Some(self.child(value))
    }

    /// Produces a handle to a `T` reachable from a `C`.
    pub(crate) fn map_child<C: 'static, T: 'static>(
        &self,
        get: impl FnOnce(&C) -> Option<&T>,
        get_mut: impl FnOnce(&mut C) -> Option<&mut T>,
    ) -> Option<Self> {
        self.map_erased::<C>(
            |c| get(c).map(ErasedPtr::of),
            |c| get_mut(c).map(ErasedPtr::of_mut),
        )
    }

    /// Like [`map_child`](Self::map_child) but types the child by its dynamic type.
    pub(crate) fn map_child_dyn<C: 'static, T: ?Sized + ReflectionBase>(
        &self,
        get: impl FnOnce(&C) -> Option<&T>,
        get_mut: impl FnOnce(&mut C) -> Option<&mut T>,
    ) -> Option<Self> {
        self.map_erased::<C>(
            |c| get(c).map(ErasedPtr::of_dyn),
            |c| get_mut(c).map(ErasedPtr::of_dyn_mut),
        )
    }

    /// Produces keyed handles to every `T` reachable from a `C`.
    ///
    /// Returns an empty list if the object is not a `C`.
    pub(crate) fn map_children<C: 'static, K, T: 'static>(
        &self,
        get: impl FnOnce(&C) -> Vec<(K, &T)>,
        get_mut: impl FnOnce(&mut C) -> Vec<(K, &mut T)>,
    ) -> Vec<(K, Self)> {
        let erased = if self.is_const {
            self.with_ref::<C, _>(|c| {
                get(c)
                    .into_iter()
                    .map(|(k, v)| (k, ErasedPtr::of(v)))
                    .collect::<Vec<_>>()
            })
        } else {
            self.with_mut::<C, _>(|c| {
                get_mut(c)
                    .into_iter()
                    .map(|(k, v)| (k, ErasedPtr::of_mut(v)))
                    .collect::<Vec<_>>()
            })
        };
        erased
            .unwrap_or_default()
            .into_iter()
            .map(|(k, v)| (k, self.child(v)))
            .collect()
    }

    /// Views a `D` as its base `B`, keeping the origin.
    pub(crate) fn upcast_with<D: 'static, B: 'static>(
        &self,
        get: fn(&D) -> &B,
        get_mut: fn(&mut D) -> &mut B,
    ) -> Option<Self> {
        let mut base = self.map_child::<D, B>(|d| Some(get(d)), |d| Some(get_mut(d)))?;
        base.origin = self.origin;
        Some(base)
    }

    /// Handle to the most derived object this handle was produced from.
    #[inline]
    pub(crate) fn origin_object(&self) -> Self {
        Self::from_erased(self.origin, self.is_const)
    }
}

impl fmt::Debug for ReflectedObject<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReflectedObject")
            .field("ptr", &self.value.ptr)
            .field("type", &self.value.ty)
            .field("origin", &self.origin.ty)
            .field("is_const", &self.is_const)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::ReflectedObject;

    struct Inner {
        v: i32,
    }

    struct Outer {
        inner: Inner,
    }

    #[test]
    fn typed_access_checks_token() {
        let mut value = 7_i32;
        let obj = ReflectedObject::typed_mut(&mut value);
        assert_eq!(obj.with_ref(|v: &i32| *v), Some(7));
        assert_eq!(obj.with_ref(|v: &u32| *v), None);
        obj.with_mut(|v: &mut i32| *v = 9);
        assert_eq!(value, 9);
    }

    #[test]
    fn const_handles_refuse_mutation() {
        let mut value = 7_i32;
        let obj = ReflectedObject::typed_mut(&mut value).as_const();
        assert!(obj.with_mut(|v: &mut i32| *v = 1).is_none());
        assert_eq!(value, 7);
    }

    #[test]
    fn upcast_keeps_origin() {
        let mut outer = Outer {
            inner: Inner { v: 3 },
        };
        let obj = ReflectedObject::typed_mut(&mut outer);
        let base = obj
            .upcast_with::<Outer, Inner>(|o| &o.inner, |o| &mut o.inner)
            .unwrap();
        assert!(base.type_token().is::<Inner>());
        assert!(base.origin_type().is::<Outer>());
        assert!(base.origin_object().same_object(&obj));
        assert_eq!(base.with_ref(|i: &Inner| i.v), Some(3));

        let field = obj
            .map_child::<Outer, Inner>(|o| Some(&o.inner), |o| Some(&mut o.inner))
            .unwrap();
        assert!(field.origin_type().is::<Inner>());
    }
}
