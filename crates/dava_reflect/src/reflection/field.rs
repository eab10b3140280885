use alloc::vec::Vec;
use core::fmt;

use dava_utils::FastName;

use crate::Reflection;
use crate::any::{Any, AnyFn, AnyFnParams, InvokeError};
use crate::meta::ReflectedMeta;
use crate::object::ReflectedObject;
use crate::registry::ReflectedType;

// -----------------------------------------------------------------------------
// Field

/// One field of a value, as listed by [`Reflection::fields`].
pub struct Field<'a> {
    /// Field name for classes, index or key for containers.
    pub key: Any,
    pub reflection: Reflection<'a>,
    /// The ancestor that declared the field, `None` for own fields.
    pub inherit_from: Option<&'static ReflectedType>,
}

impl fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("key", &self.key)
            .field("reflection", &self.reflection)
            .field("inherit_from", &self.inherit_from.map(ReflectedType::type_token))
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Method

/// A method bound to the object it was listed from.
///
/// Static functions carry no receiver and are invoked as is.
#[derive(Clone, Copy)]
pub struct Method<'a> {
    name: FastName,
    func: &'a AnyFn,
    this: Option<ReflectedObject<'a>>,
    meta: Option<&'a ReflectedMeta>,
}

impl<'a> Method<'a> {
    pub(crate) fn new(
        name: FastName,
        func: &'a AnyFn,
        this: Option<ReflectedObject<'a>>,
        meta: Option<&'a ReflectedMeta>,
    ) -> Self {
        Self {
            name,
            func,
            this,
            meta,
        }
    }

    #[inline]
    pub fn name(&self) -> FastName {
        self.name
    }

    #[inline]
    pub fn func(&self) -> &'a AnyFn {
        self.func
    }

    #[inline]
    pub fn params(&self) -> &'a AnyFnParams {
        self.func.params()
    }

    #[inline]
    pub fn meta(&self) -> Option<&'a ReflectedMeta> {
        self.meta
    }

    pub fn get_meta<M: 'static>(&self) -> Option<&'a M> {
        self.meta?.get::<M>()
    }

    /// Calls the method on its object.
    pub fn invoke(&self, args: Vec<Any>) -> Result<Any, InvokeError> {
        if self.func.is_static() {
            return self.func.invoke(args);
        }
        let this = self.this.ok_or(InvokeError::MissingThis)?;
        self.func.invoke_with(this, args)
    }
}

impl fmt::Debug for Method<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("params", self.func.params())
            .field("this", &self.this.map(|this| this.type_token()))
            .finish()
    }
}
