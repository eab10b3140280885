use dava_utils::FastName;

use crate::Reflected;

impl Reflected for FastName {
    #[inline]
    fn reflect_clone(&self) -> Option<Self> {
        Some(*self)
    }
}
