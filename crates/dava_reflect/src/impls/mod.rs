//! [`Reflected`](crate::Reflected) implementations for foreign types.
//!
//! ## Implemented Menu
//!
//! - native:
//!     - `()`, `bool`, `char`
//!     - `i8`-`i128`, `u8`-`u128`, `isize`, `usize`, `f32`, `f64`
//!     - `&'static str`
//!     - `[T; N]`
//! - alloc:
//!     - `String`, `Vec<T>`, `VecDeque<T>`, `LinkedList<T>`
//!     - `BTreeMap<K, V>`, `BTreeSet<T>`
//!     - `Box<T>`, `Option<Box<T>>`, `Arc<T>`, `T: ?Sized`
//! - std:
//!     - `HashMap<K, V, S>`, `HashSet<T, S>`
//! - dava_utils:
//!     - `FastName`
//!
//! Containers expose their elements as fields and create the records of
//! their element types. Pointers forward to the dynamic type of the pointee.

// -----------------------------------------------------------------------------
// Modules

mod alloc;
mod dava_utils;
mod native;
mod std;
