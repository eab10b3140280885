use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use crate::TypeToken;
use crate::any::{Any, AnyFn, can_cast_builtin};
use crate::meta::ReflectedMeta;
use crate::registry::{CreateError, ReflectedStructure};
use crate::structure::{EMPTY_STRUCTURE, StructureWrapper};
use crate::value::ValueWrapper;

// -----------------------------------------------------------------------------
// CreatePolicy

/// How [`ReflectedType::create_object`] returns the new object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CreatePolicy {
    /// The object itself, inside the returned [`Any`].
    ByValue,
    /// A `Box` of the object, inside the returned [`Any`].
    ByPointer,
}

// -----------------------------------------------------------------------------
// ReflectedType

/// The database record of one reflected type.
///
/// Records are created on first use and live for the rest of the process,
/// so references to them are `'static`. The structure is attached once, when
/// the registration of the type is committed.
pub struct ReflectedType {
    ty: TypeToken,
    is_custom: bool,
    value_wrapper: &'static dyn ValueWrapper,
    structure: OnceLock<ReflectedStructure>,
    structure_wrapper: OnceLock<Box<dyn StructureWrapper>>,
    permanent_name: OnceLock<String>,
    sealed: AtomicBool,
}

impl ReflectedType {
    pub(crate) fn new(
        ty: TypeToken,
        is_custom: bool,
        value_wrapper: &'static dyn ValueWrapper,
        structure_wrapper: Option<Box<dyn StructureWrapper>>,
    ) -> Self {
        let wrapper = OnceLock::new();
        if let Some(structure_wrapper) = structure_wrapper {
            let _ = wrapper.set(structure_wrapper);
        }
        Self {
            ty,
            is_custom,
            value_wrapper,
            structure: OnceLock::new(),
            structure_wrapper: wrapper,
            permanent_name: OnceLock::new(),
            sealed: AtomicBool::new(false),
        }
    }

    /// Leaks a new record.
    pub(crate) fn leak(self) -> &'static Self {
        Box::leak(Box::new(self))
    }

    #[inline]
    pub fn type_token(&self) -> TypeToken {
        self.ty
    }

    /// Returns `true` for records made by
    /// [`create_custom_type`](crate::ReflectedTypeDB::create_custom_type).
    #[inline]
    pub fn is_custom(&self) -> bool {
        self.is_custom
    }

    /// The registered structure, `None` before registration.
    #[inline]
    pub fn structure(&self) -> Option<&ReflectedStructure> {
        self.structure.get()
    }

    /// Reads and writes a whole object of this type.
    #[inline]
    pub fn value_wrapper(&self) -> &'static dyn ValueWrapper {
        self.value_wrapper
    }

    /// The strategy used to enumerate fields of values of this type.
    pub fn structure_wrapper(&self) -> &dyn StructureWrapper {
        match self.structure_wrapper.get() {
            Some(wrapper) => &**wrapper,
            None => &EMPTY_STRUCTURE,
        }
    }

    #[inline]
    pub fn permanent_name(&self) -> Option<&str> {
        self.permanent_name.get().map(String::as_str)
    }

    /// Meta bound to the type itself.
    #[inline]
    pub fn meta(&self) -> Option<&ReflectedMeta> {
        self.structure()?.meta()
    }

    pub fn get_meta<M: 'static>(&self) -> Option<&M> {
        self.meta()?.get::<M>()
    }

    /// Returns `true` once the structure of the type has been used and can
    /// no longer change.
    #[inline]
    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn seal(&self) {
        self.sealed.store(true, Ordering::Release);
    }

    pub(crate) fn set_structure(&self, structure: ReflectedStructure) -> bool {
        self.structure.set(structure).is_ok()
    }

    pub(crate) fn set_structure_wrapper(&self, wrapper: Box<dyn StructureWrapper>) -> bool {
        self.structure_wrapper.set(wrapper).is_ok()
    }

    #[inline]
    pub(crate) fn has_structure_wrapper(&self) -> bool {
        self.structure_wrapper.get().is_some()
    }

    pub(crate) fn set_permanent_name(&self, name: &str) -> bool {
        self.permanent_name.set(String::from(name)).is_ok()
    }

    // -------------------------------------------------------------------------
    // Construction

    /// All constructors, in registration order.
    pub fn get_ctors(&self) -> Vec<&AnyFn> {
        self.structure()
            .map(|s| s.ctors().iter().map(|c| c.func()).collect())
            .unwrap_or_default()
    }

    /// The constructor of `policy` taking exactly `args`.
    pub fn get_ctor(&self, policy: CreatePolicy, args: &[TypeToken]) -> Option<&AnyFn> {
        self.structure()?
            .ctors()
            .iter()
            .find(|c| c.policy() == policy && c.func().params().args() == args)
            .map(|c| c.func())
    }

    pub fn get_dtor(&self) -> Option<&AnyFn> {
        self.structure()?.dtor()
    }

    // Exact argument types win, then built-in numeric conversions.
    fn find_ctor(&self, policy: CreatePolicy, args: &[Any]) -> Option<&AnyFn> {
        let tokens: Vec<Option<TypeToken>> = args.iter().map(Any::type_token).collect();
        let ctors = self.structure()?.ctors();
        let arity = tokens.len();
        let candidates = move || {
            ctors
                .iter()
                .filter(move |c| c.policy() == policy && c.func().params().arity() == arity)
        };

        let exact = candidates().find(|c| {
            c.func()
                .params()
                .args()
                .iter()
                .zip(&tokens)
                .all(|(expected, actual)| Some(*expected) == *actual)
        });
        let converted = || {
            candidates().find(|c| {
                c.func()
                    .params()
                    .args()
                    .iter()
                    .zip(&tokens)
                    .all(|(expected, actual)| {
                        actual.is_some_and(|a| a == *expected || can_cast_builtin(a, *expected))
                    })
            })
        };
        exact.or_else(converted).map(|c| c.func())
    }

    /// Creates an object through a registered constructor.
    ///
    /// With [`CreatePolicy::ByValue`] the result holds the object, with
    /// [`CreatePolicy::ByPointer`] a `Box` of it. A missing constructor is a
    /// programming error reported as [`CreateError::NoMatchingConstructor`].
    pub fn create_object(&self, policy: CreatePolicy, args: Vec<Any>) -> Result<Any, CreateError> {
        let ctor = self
            .find_ctor(policy, &args)
            .ok_or(CreateError::NoMatchingConstructor { ty: self.ty, policy })?;
        ctor.invoke(args)
            .map_err(|source| CreateError::ConstructorFailed { ty: self.ty, source })
    }

    /// Destroys an object made by [`create_object`](Self::create_object).
    ///
    /// A by-value object is dropped. Anything else is handed to the
    /// registered destructor. Returns `false` if neither applies; the value
    /// is dropped in any case.
    pub fn destroy(&self, object: Any) -> bool {
        if object.type_token() == Some(self.ty) {
            return true;
        }
        match self.get_dtor() {
            Some(dtor) => dtor.invoke(alloc::vec![object]).is_ok(),
            None => false,
        }
    }
}

impl fmt::Debug for ReflectedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReflectedType")
            .field("type", &self.ty)
            .field("permanent_name", &self.permanent_name())
            .field("is_custom", &self.is_custom)
            .field("is_registered", &self.structure.get().is_some())
            .finish()
    }
}
