use alloc::string::String;

use dava_utils::FastName;
use thiserror::Error;

use crate::TypeToken;
use crate::any::InvokeError;
use crate::registry::CreatePolicy;

// -----------------------------------------------------------------------------
// RegistrationError

/// A mistake in the registration of a type.
///
/// These are configuration errors: they are reported once, while types are
/// registered at startup, and are not meant to be recovered from. A failed
/// registration leaves the database unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegistrationError {
    #[error("field `{field}` is registered twice on `{ty}`")]
    DuplicateField { ty: TypeToken, field: FastName },
    #[error("method `{method}` is registered twice on `{ty}`")]
    DuplicateMethod { ty: TypeToken, method: FastName },
    #[error("a record of `{actual}` cannot be registered as `{expected}`")]
    TypeMismatch { expected: TypeToken, actual: TypeToken },
    #[error("meta on `{ty}` has no target, or its target already has a meta")]
    MetaWithoutTarget { ty: TypeToken },
    #[error("constructor of `{ty}` returns `{ret}`")]
    InvalidConstructor { ty: TypeToken, ret: TypeToken },
    #[error("permanent name `{name}` is already bound to `{bound}`")]
    PermanentNameTaken { name: String, bound: TypeToken },
    #[error("`{ty}` already has the permanent name `{current}`")]
    PermanentNameMismatch { ty: TypeToken, current: String },
    #[error("`{ty}` is closed for registration, its structure is already in use")]
    RegistrationClosed { ty: TypeToken },
    #[error("the master database is already set")]
    MasterAlreadySet,
    #[error("making `{base}` a base of `{derived}` creates a cycle")]
    CyclicInheritance { derived: TypeToken, base: TypeToken },
}

// -----------------------------------------------------------------------------
// CreateError

/// Failure of [`ReflectedType::create_object`](crate::registry::ReflectedType::create_object).
///
/// Asking for a constructor that was never registered is a programming
/// error, not something to retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CreateError {
    #[error("`{ty}` has no {policy:?} constructor for the given arguments")]
    NoMatchingConstructor { ty: TypeToken, policy: CreatePolicy },
    #[error("constructor of `{ty}` failed: {source}")]
    ConstructorFailed {
        ty: TypeToken,
        #[source]
        source: InvokeError,
    },
}
