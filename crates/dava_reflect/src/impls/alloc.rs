use alloc::boxed::Box;
use alloc::collections::{BTreeMap, BTreeSet, LinkedList, VecDeque};
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::registry::ReflectedTypeDB;
use crate::structure::{MapStructure, PointerStructure, SequenceStructure, SetStructure, StructureWrapper};
use crate::{Reflected, ReflectionBase};

// -----------------------------------------------------------------------------
// String

impl Reflected for String {
    #[inline]
    fn reflect_clone(&self) -> Option<Self> {
        Some(self.clone())
    }
}

// -----------------------------------------------------------------------------
// Sequences

macro_rules! impl_reflected_sequence {
    ($($ty:ident),*) => {$(
        impl<T: Reflected> Reflected for $ty<T> {
            fn structure_wrapper() -> Option<Box<dyn StructureWrapper>> {
                Some(Box::new(SequenceStructure::<Self>::new()))
            }

            fn register_dependencies(db: &ReflectedTypeDB) {
                db.edit::<T>();
            }

            fn reflect_clone(&self) -> Option<Self> {
                self.iter().map(T::reflect_clone).collect()
            }
        }
    )*};
}

impl_reflected_sequence!(Vec, VecDeque, LinkedList);

// -----------------------------------------------------------------------------
// Ordered containers

impl<K, V> Reflected for BTreeMap<K, V>
where
    K: Reflected + Clone + Ord,
    V: Reflected,
{
    fn structure_wrapper() -> Option<Box<dyn StructureWrapper>> {
        Some(Box::new(MapStructure::<Self>::new()))
    }

    fn register_dependencies(db: &ReflectedTypeDB) {
        db.edit::<K>();
        db.edit::<V>();
    }

    fn reflect_clone(&self) -> Option<Self> {
        self.iter()
            .map(|(k, v)| Some((k.clone(), v.reflect_clone()?)))
            .collect()
    }
}

impl<T> Reflected for BTreeSet<T>
where
    T: Reflected + Clone + Ord,
{
    fn structure_wrapper() -> Option<Box<dyn StructureWrapper>> {
        Some(Box::new(SetStructure::<Self>::new()))
    }

    fn register_dependencies(db: &ReflectedTypeDB) {
        db.edit::<T>();
    }

    #[inline]
    fn reflect_clone(&self) -> Option<Self> {
        Some(self.clone())
    }
}

// -----------------------------------------------------------------------------
// Pointers

impl<T: ?Sized + ReflectionBase> Reflected for Box<T> {
    fn structure_wrapper() -> Option<Box<dyn StructureWrapper>> {
        Some(Box::new(PointerStructure::<Self>::new()))
    }
}

impl<T: ?Sized + ReflectionBase> Reflected for Option<Box<T>> {
    fn structure_wrapper() -> Option<Box<dyn StructureWrapper>> {
        Some(Box::new(PointerStructure::<Self>::new()))
    }
}

impl<T: ?Sized + ReflectionBase> Reflected for Arc<T> {
    fn structure_wrapper() -> Option<Box<dyn StructureWrapper>> {
        Some(Box::new(PointerStructure::<Self>::new()))
    }

    #[inline]
    fn reflect_clone(&self) -> Option<Self> {
        Some(Arc::clone(self))
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::{BTreeSet, LinkedList, VecDeque};
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec;

    use crate::any::Any;
    use crate::registry::ReflectedTypeDB;
    use crate::{Reflected, Reflection, ReflectionRegistrator, TypeToken, impl_reflected, member};

    struct Node {
        value: i32,
    }
    impl_reflected!(Node);

    #[test]
    fn sequences_edit_and_clone() {
        let db = ReflectedTypeDB::new();
        let mut names = vec![String::from("a"), String::from("c")];
        let mut r = Reflection::create(&db, &mut names);

        let caps = r.fields_caps();
        assert!(caps.can_add() && caps.can_insert() && caps.can_remove());
        assert_eq!(caps.flat_value_type, Some(TypeToken::of::<String>()));
        assert!(r.insert_field(&Any::new(1_usize), Any::empty(), Any::new(String::from("b"))));
        assert!(r.remove_field(&Any::new(0_usize)));
        assert_eq!(names.reflect_clone(), Some(vec![String::from("b"), String::from("c")]));

        let mut queue = VecDeque::from([Node { value: 1 }]);
        let mut r = Reflection::create(&db, &mut queue);
        assert!(r.add_field(Any::empty(), Any::new_unique(Node { value: 2 })));
        assert_eq!(queue.len(), 2);
        assert!(queue.reflect_clone().is_none());
    }

    #[test]
    fn vector_fields_by_index() {
        let db = ReflectedTypeDB::new();
        let mut numbers = vec![10_i32, 20, 30];
        let mut r = Reflection::create(&db, &mut numbers);

        assert_eq!(r.fields_count(), 3);
        assert!(r.fields_caps().has_range_access());
        assert_eq!(r.get_field(&Any::new(1_usize)).get_value_cast::<i32>(), Some(20));
        assert!(!r.get_field(&Any::new(3_usize)).is_valid());
        assert!(r.add_field(Any::empty(), Any::new(40_i32)));
        assert_eq!(r.get_field(&Any::new(3_usize)).get_value_cast::<i32>(), Some(40));
        assert_eq!(r.fields_range(1, 2).len(), 2);

        let mut list = LinkedList::from([1_i32]);
        let r = Reflection::create(&db, &mut list);
        assert!(!r.fields_caps().has_range_access());
        assert!(r.fields_caps().has_dynamic_struct());
    }

    #[test]
    fn sets_hold_keys() {
        let db = ReflectedTypeDB::new();
        let mut set = BTreeSet::from([1_u8, 2]);
        let mut r = Reflection::create(&db, &mut set);
        assert!(r.add_field(Any::empty(), Any::new(3_u8)));
        assert!(!r.add_field(Any::empty(), Any::new(3_u8)));
        assert!(r.get_field(&Any::new(2_u8)).is_readonly());
        assert!(r.remove_field(&Any::new(1_u8)));
        assert_eq!(set, BTreeSet::from([2, 3]));
    }

    #[test]
    fn shared_pointers_are_readonly() {
        let db = ReflectedTypeDB::new();
        ReflectionRegistrator::<Node>::begin(&db)
            .field("value", member!(Node, value))
            .end()
            .unwrap();

        let mut shared = Arc::new(Node { value: 1 });
        let mut r = Reflection::create(&db, &mut shared);
        assert_eq!(r.field("value").get_value_cast::<i32>(), Some(1));
        assert!(!r.field_mut("value").set_value(Any::new(2_i32)));

        let mut owned: Option<Box<Node>> = None;
        let r = Reflection::create(&db, &mut owned);
        assert!(!r.has_fields());
        let mut owned = Some(Box::new(Node { value: 5 }));
        let mut r = Reflection::create(&db, &mut owned);
        assert!(r.field_mut("value").set_value(Any::new(6_i32)));
        assert_eq!(owned.map(|n| n.value), Some(6));
    }
}
