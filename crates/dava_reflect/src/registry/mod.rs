//! The type database and the registration of types into it.
//!
//! - [`ReflectedTypeDB`]: records of every known type, the inheritance
//!   graph and the registered value conversions.
//! - [`ReflectedType`]: one record, with its [`ReflectedStructure`].
//! - [`ReflectionRegistrator`]: fluent declaration of fields, methods,
//!   constructors, bases and meta, committed in one step.
//!
//! Registration is meant to happen at startup. A type can be registered
//! once, and only until its structure is first used.

// -----------------------------------------------------------------------------
// Modules

mod db;
mod error;
mod reflected_type;
mod registrator;
mod structure;

#[cfg(feature = "auto_register")]
mod auto_register;

// -----------------------------------------------------------------------------
// Exports

pub use db::{ReflectedTypeDB, ReflectedTypeDBStats};
pub use error::{CreateError, RegistrationError};
pub use reflected_type::{CreatePolicy, ReflectedType};
pub use registrator::{FieldBinding, ReflectionRegistrator};
pub use structure::{ReflectedCtor, ReflectedEnum, ReflectedField, ReflectedMethod, ReflectedStructure};

#[cfg(feature = "auto_register")]
pub use auto_register::AutoRegistration;

pub(crate) use db::{BaseEntry, CastEntry};
