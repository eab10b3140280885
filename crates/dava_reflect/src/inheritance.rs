//! Base/derived relationships between reflected types.
//!
//! Rust composes instead of inheriting, so a "base" is a sub-object of the
//! derived value reached through a pair of projections. The graph of those
//! projections lets a [`ReflectedObject`] be viewed as any of its ancestors
//! (upcast) and, starting from the most derived object it remembers, as any
//! type on the way back down (downcast). No pointer arithmetic is involved:
//! every step goes through a typed projection.

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::vec::Vec;

use dava_utils::TypeIdMap;

use crate::TypeToken;
use crate::object::ReflectedObject;
use crate::registry::RegistrationError;

// -----------------------------------------------------------------------------
// Upcast

/// A type-erased projection from a derived object to one of its bases.
pub(crate) trait ErasedUpcast: Send + Sync {
    fn upcast<'a>(&self, object: &ReflectedObject<'a>) -> Option<ReflectedObject<'a>>;
}

pub(crate) struct Projection<D, B> {
    get: fn(&D) -> &B,
    get_mut: fn(&mut D) -> &mut B,
}

impl<D: 'static, B: 'static> Projection<D, B> {
    #[inline]
    pub(crate) const fn new(get: fn(&D) -> &B, get_mut: fn(&mut D) -> &mut B) -> Self {
        Self { get, get_mut }
    }
}

impl<D: 'static, B: 'static> ErasedUpcast for Projection<D, B> {
    #[inline]
    fn upcast<'a>(&self, object: &ReflectedObject<'a>) -> Option<ReflectedObject<'a>> {
        object.upcast_with(self.get, self.get_mut)
    }
}

struct BaseEdge {
    base: TypeToken,
    upcast: Box<dyn ErasedUpcast>,
}

// -----------------------------------------------------------------------------
// TypeInheritance

/// Directed acyclic graph of `derived -> base` edges.
#[derive(Default)]
pub(crate) struct TypeInheritance {
    edges: TypeIdMap<Vec<BaseEdge>>,
    count: usize,
}

impl TypeInheritance {
    pub(crate) const fn new() -> Self {
        Self {
            edges: TypeIdMap::new(),
            count: 0,
        }
    }

    /// Adds `base` as a direct base of `derived`.
    ///
    /// Returns `Ok(false)` if the edge already exists.
    pub(crate) fn add(
        &mut self,
        derived: TypeToken,
        base: TypeToken,
        upcast: Box<dyn ErasedUpcast>,
    ) -> Result<bool, RegistrationError> {
        if self.bases(derived).any(|b| b == base) {
            return Ok(false);
        }
        if derived == base || self.is_ancestor(derived, base) {
            return Err(RegistrationError::CyclicInheritance { derived, base });
        }
        self.edges
            .get_or_insert(derived.id(), Vec::new)
            .push(BaseEdge { base, upcast });
        self.count += 1;
        Ok(true)
    }

    /// Direct bases of `ty`, in registration order.
    pub(crate) fn bases(&self, ty: TypeToken) -> impl Iterator<Item = TypeToken> + '_ {
        self.edges
            .get(&ty.id())
            .into_iter()
            .flatten()
            .map(|edge| edge.base)
    }

    /// Number of edges in the graph.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if `ancestor` is reachable from `ty` through base edges.
    /// A type is not its own ancestor.
    pub(crate) fn is_ancestor(&self, ancestor: TypeToken, ty: TypeToken) -> bool {
        let mut stack: Vec<TypeToken> = self.bases(ty).collect();
        let mut visited: Vec<TypeToken> = Vec::new();
        while let Some(next) = stack.pop() {
            if next == ancestor {
                return true;
            }
            if !visited.contains(&next) {
                visited.push(next);
                stack.extend(self.bases(next));
            }
        }
        false
    }

    // Breadth first, so the shortest chain wins when several lead to `to`.
    fn path(&self, from: TypeToken, to: TypeToken) -> Option<Vec<&BaseEdge>> {
        let mut queue: VecDeque<(TypeToken, Vec<&BaseEdge>)> = VecDeque::new();
        let mut visited: Vec<TypeToken> = Vec::new();
        queue.push_back((from, Vec::new()));
        while let Some((ty, path)) = queue.pop_front() {
            if ty == to {
                return Some(path);
            }
            if visited.contains(&ty) {
                continue;
            }
            visited.push(ty);
            for edge in self.edges.get(&ty.id()).into_iter().flatten() {
                let mut next = path.clone();
                next.push(edge);
                queue.push_back((edge.base, next));
            }
        }
        None
    }

    /// Views `object` as its ancestor `to`.
    pub(crate) fn upcast<'a>(
        &self,
        object: &ReflectedObject<'a>,
        to: TypeToken,
    ) -> Option<ReflectedObject<'a>> {
        let path = self.path(object.type_token(), to)?;
        path.into_iter()
            .try_fold(*object, |current, edge| edge.upcast.upcast(&current))
    }

    /// Views `object` as the derived type `to`.
    ///
    /// Succeeds only if the object was produced from a `to`, or from a type
    /// deriving from `to`.
    pub(crate) fn downcast<'a>(
        &self,
        object: &ReflectedObject<'a>,
        to: TypeToken,
    ) -> Option<ReflectedObject<'a>> {
        let from = object.type_token();
        if from == to {
            return Some(*object);
        }
        if !self.is_ancestor(from, to) {
            return None;
        }
        self.upcast(&object.origin_object(), to)
    }

    /// Upcast if `to` is an ancestor, downcast otherwise.
    pub(crate) fn cast<'a>(
        &self,
        object: &ReflectedObject<'a>,
        to: TypeToken,
    ) -> Option<ReflectedObject<'a>> {
        self.upcast(object, to)
            .or_else(|| self.downcast(object, to))
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use super::{Projection, TypeInheritance};
    use crate::TypeToken;
    use crate::object::ReflectedObject;
    use crate::registry::RegistrationError;

    struct A {
        a: i32,
    }

    struct B {
        base: A,
        b: i32,
    }

    struct C {
        base: B,
    }

    struct Unrelated;

    fn graph() -> TypeInheritance {
        let mut g = TypeInheritance::new();
        let b_to_a = Projection::<B, A>::new(|b| &b.base, |b| &mut b.base);
        let c_to_b = Projection::<C, B>::new(|c| &c.base, |c| &mut c.base);
        assert!(g.add(TypeToken::of::<B>(), TypeToken::of::<A>(), Box::new(b_to_a)).unwrap());
        assert!(g.add(TypeToken::of::<C>(), TypeToken::of::<B>(), Box::new(c_to_b)).unwrap());
        g
    }

    #[test]
    fn ancestry() {
        let g = graph();
        let (a, b, c) = (TypeToken::of::<A>(), TypeToken::of::<B>(), TypeToken::of::<C>());

        assert!(g.is_ancestor(a, c));
        assert!(g.is_ancestor(b, c));
        assert!(!g.is_ancestor(c, a));
        assert!(!g.is_ancestor(a, a));
        assert_eq!(g.len(), 2);
    }

    #[test]
    fn duplicate_and_cyclic_edges() {
        let mut g = graph();
        let dup = Projection::<B, A>::new(|b| &b.base, |b| &mut b.base);
        assert!(!g.add(TypeToken::of::<B>(), TypeToken::of::<A>(), Box::new(dup)).unwrap());

        let back = Projection::<A, A>::new(|a| a, |a| a);
        let err = g
            .add(TypeToken::of::<A>(), TypeToken::of::<A>(), Box::new(back))
            .unwrap_err();
        assert!(matches!(err, RegistrationError::CyclicInheritance { .. }));
    }

    #[test]
    fn upcast_then_downcast_returns_origin() {
        let g = graph();
        let mut c = C {
            base: B {
                base: A { a: 1 },
                b: 2,
            },
        };

        let obj = ReflectedObject::typed_mut(&mut c);
        let as_a = g.upcast(&obj, TypeToken::of::<A>()).unwrap();
        assert_eq!(as_a.with_ref::<A, _>(|a| a.a), Some(1));

        let as_b = g.downcast(&as_a, TypeToken::of::<B>()).unwrap();
        assert_eq!(as_b.with_ref::<B, _>(|b| b.b), Some(2));

        let back = g.downcast(&as_a, TypeToken::of::<C>()).unwrap();
        assert!(back.same_object(&obj));
    }

    #[test]
    fn downcast_of_plain_base_fails() {
        let g = graph();
        let mut b = B {
            base: A { a: 1 },
            b: 2,
        };

        let obj = ReflectedObject::typed_mut(&mut b);
        let as_a = g.upcast(&obj, TypeToken::of::<A>()).unwrap();

        assert!(g.downcast(&as_a, TypeToken::of::<C>()).is_none());
        assert!(g.cast(&as_a, TypeToken::of::<Unrelated>()).is_none());
        assert!(g.cast(&as_a, TypeToken::of::<B>()).is_some());
    }
}
