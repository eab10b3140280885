//! Hash states and container aliases.
//!
//! - [`FixedHashState`]: `foldhash` with a fixed seed, stable across runs.
//! - [`NoOpHashState`]: passes a single `u64` through unchanged, suitable for
//!   keys that already are hashes, such as [`TypeId`](core::any::TypeId).

// -----------------------------------------------------------------------------
// Modules

mod hasher;

// -----------------------------------------------------------------------------
// Exports

pub use foldhash;
pub use hashbrown;

pub use hasher::{FixedHashState, FixedHasher, NoOpHashState, NoOpHasher};

/// A [`hashbrown::HashMap`] using [`FixedHashState`] by default.
pub type HashMap<K, V, S = FixedHashState> = hashbrown::HashMap<K, V, S>;

/// A [`hashbrown::HashSet`] using [`FixedHashState`] by default.
pub type HashSet<T, S = FixedHashState> = hashbrown::HashSet<T, S>;

/// A [`HashMap`] whose keys are already well-distributed hashes.
pub type NoOpHashMap<K, V> = hashbrown::HashMap<K, V, NoOpHashState>;
