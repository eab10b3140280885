#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// Macros expand to `$crate`, doc tests name the crate `dava_reflect`.
extern crate self as dava_reflect;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod impls;
mod inheritance;
mod reflected;
mod ty;

pub mod any;
pub mod meta;
pub mod object;
pub mod reflection;
pub mod registry;
pub mod structure;
pub mod value;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use reflected::{Reflected, ReflectionBase};
pub use reflection::Reflection;
pub use registry::{ReflectedTypeDB, ReflectionRegistrator};
pub use ty::TypeToken;

#[doc(hidden)]
pub mod __macro_exports {
    #[cfg(feature = "auto_register")]
    pub use inventory;
}
