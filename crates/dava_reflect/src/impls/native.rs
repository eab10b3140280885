use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::Reflected;
use crate::registry::ReflectedTypeDB;
use crate::structure::{SequenceStructure, StructureWrapper};

macro_rules! impl_reflected_copy {
    ($($ty:ty),* $(,)?) => {$(
        impl Reflected for $ty {
            #[inline]
            fn reflect_clone(&self) -> Option<Self> {
                Some(*self)
            }
        }
    )*};
}

impl_reflected_copy!(
    (), bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    &'static str,
);

impl<T: Reflected, const N: usize> Reflected for [T; N] {
    fn structure_wrapper() -> Option<Box<dyn StructureWrapper>> {
        Some(Box::new(SequenceStructure::<Self>::new()))
    }

    fn register_dependencies(db: &ReflectedTypeDB) {
        db.edit::<T>();
    }

    fn reflect_clone(&self) -> Option<Self> {
        let items = self.iter().map(T::reflect_clone).collect::<Option<Vec<T>>>()?;
        items.try_into().ok()
    }
}

#[cfg(test)]
mod tests {
    use crate::any::Any;
    use crate::registry::ReflectedTypeDB;
    use crate::{Reflected, Reflection, TypeToken};

    #[test]
    fn arrays_are_fixed_sequences() {
        let db = ReflectedTypeDB::new();
        let mut values = [1_i32, 2, 3];
        let mut r = Reflection::create(&db, &mut values);

        assert_eq!(r.fields_count(), 3);
        assert!(!r.fields_caps().can_add());
        assert!(r.get_field_mut(&Any::new(1_usize)).set_value(Any::new(7_i32)));
        assert_eq!(values.reflect_clone(), Some([1, 7, 3]));
        assert!(db.get_by_type(TypeToken::of::<i32>()).is_some());
    }
}
