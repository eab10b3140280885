use alloc::boxed::Box;
use alloc::vec::Vec;

use dava_utils::FastName;

use crate::TypeToken;
use crate::any::AnyFn;
use crate::meta::ReflectedMeta;
use crate::registry::CreatePolicy;
use crate::value::ValueWrapper;

// -----------------------------------------------------------------------------
// ReflectedField

/// A field declared directly on a type.
pub struct ReflectedField {
    pub(crate) name: FastName,
    pub(crate) value_wrapper: Box<dyn ValueWrapper>,
    pub(crate) meta: Option<ReflectedMeta>,
}

impl ReflectedField {
    #[inline]
    pub fn name(&self) -> FastName {
        self.name
    }

    #[inline]
    pub fn value_wrapper(&self) -> &dyn ValueWrapper {
        &*self.value_wrapper
    }

    #[inline]
    pub fn meta(&self) -> Option<&ReflectedMeta> {
        self.meta.as_ref()
    }
}

// -----------------------------------------------------------------------------
// ReflectedMethod

/// A method or static function declared directly on a type.
pub struct ReflectedMethod {
    pub(crate) name: FastName,
    pub(crate) func: AnyFn,
    pub(crate) meta: Option<ReflectedMeta>,
}

impl ReflectedMethod {
    #[inline]
    pub fn name(&self) -> FastName {
        self.name
    }

    #[inline]
    pub fn func(&self) -> &AnyFn {
        &self.func
    }

    #[inline]
    pub fn meta(&self) -> Option<&ReflectedMeta> {
        self.meta.as_ref()
    }
}

// -----------------------------------------------------------------------------
// ReflectedCtor

/// A registered constructor.
///
/// By-value constructors return the type itself, by-pointer ones a `Box` of it.
pub struct ReflectedCtor {
    pub(crate) policy: CreatePolicy,
    pub(crate) func: AnyFn,
}

impl ReflectedCtor {
    #[inline]
    pub fn policy(&self) -> CreatePolicy {
        self.policy
    }

    #[inline]
    pub fn func(&self) -> &AnyFn {
        &self.func
    }
}

// -----------------------------------------------------------------------------
// ReflectedEnum

/// Named values of an enumeration registered alongside a type.
#[derive(Debug, Clone)]
pub struct ReflectedEnum {
    pub(crate) ty: TypeToken,
    pub(crate) entries: Vec<(FastName, i64)>,
}

impl ReflectedEnum {
    /// The enumeration type.
    #[inline]
    pub fn type_token(&self) -> TypeToken {
        self.ty
    }

    /// `(name, value)` pairs in registration order.
    #[inline]
    pub fn entries(&self) -> &[(FastName, i64)] {
        &self.entries
    }

    pub fn value_of(&self, name: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, v)| v)
    }

    pub fn name_of(&self, value: i64) -> Option<FastName> {
        self.entries
            .iter()
            .find(|&&(_, v)| v == value)
            .map(|&(n, _)| n)
    }
}

// -----------------------------------------------------------------------------
// ReflectedStructure

/// Everything registered for one type by a
/// [`ReflectionRegistrator`](crate::ReflectionRegistrator).
///
/// Only the directly declared members are stored here. Inherited fields and
/// methods are merged by the [`ClassStructure`](crate::structure::ClassStructure).
#[derive(Default)]
pub struct ReflectedStructure {
    pub(crate) fields: Vec<ReflectedField>,
    pub(crate) methods: Vec<ReflectedMethod>,
    pub(crate) enums: Vec<ReflectedEnum>,
    pub(crate) ctors: Vec<ReflectedCtor>,
    pub(crate) dtor: Option<AnyFn>,
    pub(crate) meta: Option<ReflectedMeta>,
}

impl ReflectedStructure {
    #[inline]
    pub fn fields(&self) -> &[ReflectedField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&ReflectedField> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[inline]
    pub fn methods(&self) -> &[ReflectedMethod] {
        &self.methods
    }

    pub fn method(&self, name: &str) -> Option<&ReflectedMethod> {
        self.methods.iter().find(|m| m.name == name)
    }

    #[inline]
    pub fn enums(&self) -> &[ReflectedEnum] {
        &self.enums
    }

    #[inline]
    pub fn ctors(&self) -> &[ReflectedCtor] {
        &self.ctors
    }

    #[inline]
    pub fn dtor(&self) -> Option<&AnyFn> {
        self.dtor.as_ref()
    }

    /// Meta of the type itself.
    #[inline]
    pub fn meta(&self) -> Option<&ReflectedMeta> {
        self.meta.as_ref()
    }
}
