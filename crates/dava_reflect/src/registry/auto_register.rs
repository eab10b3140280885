use crate::registry::{ReflectedTypeDB, RegistrationError};

// -----------------------------------------------------------------------------
// AutoRegistration

/// A registration function collected at link time.
///
/// Submitted with [`auto_register!`](crate::auto_register) and run by
/// [`ReflectedTypeDB::auto_register`].
pub struct AutoRegistration {
    register: fn(&ReflectedTypeDB) -> Result<(), RegistrationError>,
}

impl AutoRegistration {
    #[inline]
    pub const fn new(register: fn(&ReflectedTypeDB) -> Result<(), RegistrationError>) -> Self {
        Self { register }
    }

    #[inline]
    pub(crate) fn run(&self, db: &ReflectedTypeDB) -> Result<(), RegistrationError> {
        (self.register)(db)
    }
}

inventory::collect!(AutoRegistration);

/// Submits a registration function to [`ReflectedTypeDB::auto_register`].
///
/// The function takes the database and returns
/// `Result<(), RegistrationError>`.
///
/// ```
/// use dava_reflect::registry::{RegistrationError, ReflectedTypeDB};
/// use dava_reflect::{auto_register, impl_reflected, member, ReflectionRegistrator};
///
/// struct Light {
///     intensity: f32,
/// }
/// impl_reflected!(Light);
///
/// fn register_light(db: &ReflectedTypeDB) -> Result<(), RegistrationError> {
///     ReflectionRegistrator::<Light>::begin(db)
///         .field("intensity", member!(Light, intensity))
///         .end()?;
///     Ok(())
/// }
///
/// auto_register!(register_light);
///
/// let db = ReflectedTypeDB::new();
/// assert!(db.auto_register().unwrap() >= 1);
/// assert!(db.get_by_type(dava_reflect::TypeToken::of::<Light>()).unwrap().structure().is_some());
/// ```
#[macro_export]
macro_rules! auto_register {
    ($register:path) => {
        $crate::__macro_exports::inventory::submit! {
            $crate::registry::AutoRegistration::new($register)
        }
    };
}
