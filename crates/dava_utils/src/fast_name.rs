use alloc::boxed::Box;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;
use std::sync::{OnceLock, PoisonError, RwLock};

use crate::hash::HashMap;

// -----------------------------------------------------------------------------
// Interner

#[derive(Default)]
struct NameTable {
    names: Vec<&'static str>,
    index: HashMap<&'static str, u32>,
}

fn table() -> &'static RwLock<NameTable> {
    static TABLE: OnceLock<RwLock<NameTable>> = OnceLock::new();
    TABLE.get_or_init(|| RwLock::new(NameTable::default()))
}

// -----------------------------------------------------------------------------
// FastName

/// An interned string.
///
/// Two `FastName`s created from equal strings share the same index, so
/// equality and hashing cost one integer comparison. Interned strings are
/// kept alive for the rest of the process.
///
/// Ordering compares the underlying strings, which keeps sorted containers
/// stable between runs.
///
/// # Examples
///
/// ```
/// use dava_utils::FastName;
///
/// let a = FastName::new("Position");
/// let b = FastName::new("Position");
///
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "Position");
/// assert_eq!(FastName::lookup("Position"), Some(a));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FastName(u32);

impl FastName {
    /// Interns `name`, returning the existing handle if it was seen before.
    pub fn new(name: &str) -> Self {
        if let Some(found) = Self::lookup(name) {
            return found;
        }

        let mut table = table().write().unwrap_or_else(PoisonError::into_inner);
        if let Some(&index) = table.index.get(name) {
            return FastName(index);
        }

        let leaked: &'static str = Box::leak(Box::from(name));
        let index = table.names.len() as u32;
        table.names.push(leaked);
        table.index.insert(leaked, index);
        FastName(index)
    }

    /// Returns the handle of an already interned string without interning it.
    pub fn lookup(name: &str) -> Option<Self> {
        let table = table().read().unwrap_or_else(PoisonError::into_inner);
        table.index.get(name).copied().map(FastName)
    }

    /// Returns the interned string.
    pub fn as_str(self) -> &'static str {
        let table = table().read().unwrap_or_else(PoisonError::into_inner);
        table.names[self.0 as usize]
    }

    /// Returns the intern index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl From<&str> for FastName {
    #[inline]
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl PartialOrd for FastName {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FastName {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.0 == other.0 {
            return Ordering::Equal;
        }
        self.as_str().cmp(other.as_str())
    }
}

impl PartialEq<str> for FastName {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for FastName {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Display for FastName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for FastName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::FastName;

    #[test]
    fn interning_is_stable() {
        let a = FastName::new("fast_name_interning_is_stable");
        let b = FastName::from("fast_name_interning_is_stable");
        assert_eq!(a, b);
        assert_eq!(a.index(), b.index());
        assert_eq!(a, "fast_name_interning_is_stable");
    }

    #[test]
    fn lookup_does_not_intern() {
        assert!(FastName::lookup("fast_name_never_interned").is_none());
        assert!(FastName::lookup("fast_name_never_interned").is_none());
    }

    #[test]
    fn ordering_follows_strings() {
        let b = FastName::new("fast_name_order_b");
        let a = FastName::new("fast_name_order_a");
        assert!(a < b);
    }
}
