use alloc::boxed::Box;
use core::hash::{BuildHasher, Hash};
use std::collections::{HashMap, HashSet};

use crate::Reflected;
use crate::registry::ReflectedTypeDB;
use crate::structure::{MapStructure, SetStructure, StructureWrapper};

impl<K, V, S> Reflected for HashMap<K, V, S>
where
    K: Reflected + Clone + Eq + Hash,
    V: Reflected,
    S: BuildHasher + Default + Send + Sync + 'static,
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

impl<T, S> Reflected for HashSet<T, S>
where
    T: Reflected + Clone + Eq + Hash,
    S: BuildHasher + Default + Send + Sync + 'static,
{
    fn structure_wrapper() -> Option<Box<dyn StructureWrapper>> {
        Some(Box::new(SetStructure::<Self>::new()))
    }

    fn register_dependencies(db: &ReflectedTypeDB) {
        db.edit::<T>();
    }

    fn reflect_clone(&self) -> Option<Self> {
        Some(self.iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::any::Any;
    use crate::registry::ReflectedTypeDB;
    use crate::{Reflection, TypeToken};

    #[test]
    fn hash_maps_by_key() {
        let db = ReflectedTypeDB::new();
        let mut scores: HashMap<u32, f64> = HashMap::new();
        let mut r = Reflection::create(&db, &mut scores);

        assert!(r.add_field(Any::new(7_u32), Any::new(1.5_f64)));
        assert!(r.get_field_mut(&Any::new(7_i32)).set_value(Any::new(2.5_f64)));
        assert!(!r.get_field(&Any::new(8_u32)).is_valid());
        assert_eq!(r.fields_caps().flat_key_type, Some(TypeToken::of::<u32>()));
        assert_eq!(scores.get(&7), Some(&2.5));
    }
}
