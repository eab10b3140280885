//! Metadata attached to types, fields and methods.
//!
//! A [`ReflectedMeta`] stores at most one value per Rust type. Any
//! `Send + Sync + 'static` value can be a meta, the types in this module are
//! the ones editors commonly look for.

use alloc::boxed::Box;
use core::any::TypeId;
use core::fmt;

use dava_utils::TypeIdMap;

// -----------------------------------------------------------------------------
// ReflectedMeta

/// A set of metadata values keyed by their type.
///
/// # Examples
///
/// ```
/// use dava_reflect::meta::{DisplayName, ReadOnly, ReflectedMeta, ValueRange};
///
/// let meta = ReflectedMeta::new()
///     .with(DisplayName("Speed"))
///     .with(ValueRange::new(0.0_f32, 10.0))
///     .with(ReadOnly);
///
/// assert_eq!(meta.get::<DisplayName>(), Some(&DisplayName("Speed")));
/// assert_eq!(meta.get::<ValueRange<f32>>().map(|r| r.max), Some(10.0));
/// assert!(meta.contains::<ReadOnly>());
/// assert_eq!(meta.len(), 3);
/// ```
#[derive(Default)]
pub struct ReflectedMeta {
    entries: TypeIdMap<Box<dyn core::any::Any + Send + Sync>>,
}

impl ReflectedMeta {
    pub(crate) const EMPTY: &'static Self = &Self::new();

    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: TypeIdMap::new(),
        }
    }

    /// Adds `meta`, replacing any previous value of the same type.
    #[inline]
    pub fn with<M: Send + Sync + 'static>(mut self, meta: M) -> Self {
        self.insert(meta);
        self
    }

    /// Adds `meta`, returning the previous value of the same type.
    pub fn insert<M: Send + Sync + 'static>(&mut self, meta: M) -> Option<Box<dyn core::any::Any + Send + Sync>> {
        self.entries.insert(TypeId::of::<M>(), Box::new(meta))
    }

    /// Moves every entry of `other` into `self`, `other` wins on conflicts.
    pub fn merge(&mut self, other: ReflectedMeta) {
        for (id, value) in other.entries {
            self.entries.insert(id, value);
        }
    }

    #[inline]
    pub fn get<M: 'static>(&self) -> Option<&M> {
        self.entries.get_type::<M>()?.downcast_ref()
    }

    #[inline]
    pub fn contains<M: 'static>(&self) -> bool {
        self.entries.contains_type::<M>()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ReflectedMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReflectedMeta")
            .field("len", &self.entries.len())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Common metas

/// Name shown to users instead of the registered name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayName(pub &'static str);

/// Group a field is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category(pub &'static str);

/// The value must not be edited by tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOnly;

/// The value is not listed by tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hidden;

/// Inclusive range of accepted values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd> ValueRange<T> {
    #[inline]
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn contains(&self, value: &T) -> bool {
        *value >= self.min && *value <= self.max
    }
}

#[cfg(test)]
mod tests {
    use super::{Category, Hidden, ReflectedMeta};

    #[test]
    fn later_values_replace_earlier() {
        let meta = ReflectedMeta::new()
            .with(Category("A"))
            .with(Category("B"));
        assert_eq!(meta.len(), 1);
        assert_eq!(meta.get::<Category>(), Some(&Category("B")));
    }

    #[test]
    fn merge_combines_entries() {
        let mut meta = ReflectedMeta::new().with(Category("A"));
        meta.merge(ReflectedMeta::new().with(Hidden).with(Category("B")));
        assert!(meta.contains::<Hidden>());
        assert_eq!(meta.get::<Category>(), Some(&Category("B")));
        assert!(ReflectedMeta::EMPTY.is_empty());
    }
}
