//! Runtime type identity.

use core::any::TypeId;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};

// -----------------------------------------------------------------------------
// TypeToken

/// A copyable description of a concrete Rust type.
///
/// Two tokens are equal exactly when they were created for the same type,
/// the remaining data (name, size, alignment) is only carried for display
/// and layout checks.
///
/// # Examples
///
/// ```
/// use dava_reflect::TypeToken;
///
/// let t = TypeToken::of::<Vec<i32>>();
/// assert_eq!(t, TypeToken::of::<Vec<i32>>());
/// assert_ne!(t, TypeToken::of::<Vec<u32>>());
/// assert_eq!(t.name(), "alloc::vec::Vec<i32>");
/// assert_eq!(t.short_name(), "Vec<i32>");
/// ```
#[derive(Clone, Copy)]
pub struct TypeToken {
    id: TypeId,
    name: &'static str,
    size: usize,
    align: usize,
}

impl TypeToken {
    /// Returns the token of `T`.
    #[inline]
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: core::any::type_name::<T>(),
            size: size_of::<T>(),
            align: align_of::<T>(),
        }
    }

    #[inline]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// Full type name as reported by [`core::any::type_name`].
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Type name with module paths stripped, generics kept.
    pub fn short_name(&self) -> &'static str {
        let head_end = self.name.find('<').unwrap_or(self.name.len());
        let start = self.name[..head_end].rfind("::").map_or(0, |pos| pos + 2);
        let short = &self.name[start..];
        if !short.contains("::") {
            return short;
        }
        // Generic arguments carry paths too, fall back to the head only.
        let end = short.find('<').unwrap_or(short.len());
        &short[..end]
    }

    #[inline]
    pub const fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub const fn align(&self) -> usize {
        self.align
    }

    /// Returns `true` if this is the token of `T`.
    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeToken {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeToken {}

impl Hash for TypeToken {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for TypeToken {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeToken {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Debug for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::TypeToken;

    struct Local;

    #[test]
    fn short_name_strips_paths() {
        assert_eq!(TypeToken::of::<Local>().short_name(), "Local");
        assert_eq!(TypeToken::of::<i32>().short_name(), "i32");
        assert_eq!(TypeToken::of::<Vec<Local>>().short_name(), "Vec");
    }

    #[test]
    fn layout_is_recorded() {
        let t = TypeToken::of::<u64>();
        assert_eq!(t.size(), 8);
        assert_eq!(t.align(), 8);
        assert!(t.is::<u64>());
        assert!(!t.is::<i64>());
    }
}
