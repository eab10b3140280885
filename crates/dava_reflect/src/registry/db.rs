use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;
#[cfg(feature = "auto_register")]
use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::{OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use dava_utils::hash::{FixedHashState, HashMap};
use dava_utils::{FastName, TypeIdMap};

use crate::any::{Any, CastError, can_cast_builtin, cast_builtin};
use crate::inheritance::{ErasedUpcast, Projection, TypeInheritance};
use crate::object::ReflectedObject;
use crate::registry::{RegistrationError, ReflectedStructure, ReflectedType};
use crate::structure::{ClassStructure, StructureWrapper};
use crate::value::ObjectValueWrapper;
use crate::{Reflected, TypeToken};

// -----------------------------------------------------------------------------
// Casts

type CastFn = dyn Fn(&Any) -> Option<Any> + Send + Sync;

/// A conversion between two types, waiting to be installed.
pub(crate) struct CastEntry {
    from: TypeToken,
    to: TypeToken,
    cast: Arc<CastFn>,
}

impl CastEntry {
    pub(crate) fn new<F: 'static, T: Clone + Send + Sync + 'static>(
        cast: impl Fn(&F) -> Option<T> + Send + Sync + 'static,
    ) -> Self {
        Self {
            from: TypeToken::of::<F>(),
            to: TypeToken::of::<T>(),
            cast: Arc::new(move |value: &Any| value.get::<F>().and_then(&cast).map(Any::new)),
        }
    }
}

/// A base waiting to be installed.
pub(crate) struct BaseEntry {
    pub(crate) base: TypeToken,
    pub(crate) upcast: Box<dyn ErasedUpcast>,
}

impl BaseEntry {
    pub(crate) fn new<D: 'static, B: 'static>(get: fn(&D) -> &B, get_mut: fn(&mut D) -> &mut B) -> Self {
        Self {
            base: TypeToken::of::<B>(),
            upcast: Box::new(Projection::new(get, get_mut)),
        }
    }
}

// -----------------------------------------------------------------------------
// Tables

struct Tables {
    by_type: TypeIdMap<&'static ReflectedType>,
    by_rtti_name: HashMap<&'static str, &'static ReflectedType>,
    by_permanent_name: HashMap<String, &'static ReflectedType>,
    custom: Vec<&'static ReflectedType>,
    inheritance: TypeInheritance,
    casts: HashMap<(TypeId, TypeId), Arc<CastFn>>,
}

impl Tables {
    const fn new() -> Self {
        Self {
            by_type: TypeIdMap::new(),
            by_rtti_name: HashMap::with_hasher(FixedHashState),
            by_permanent_name: HashMap::with_hasher(FixedHashState),
            custom: Vec::new(),
            inheritance: TypeInheritance::new(),
            casts: HashMap::with_hasher(FixedHashState),
        }
    }

    fn bind_permanent_name(
        &mut self,
        rtype: &'static ReflectedType,
        name: &str,
    ) -> Result<(), RegistrationError> {
        let ty = rtype.type_token();
        if let Some(current) = rtype.permanent_name() {
            if current == name {
                return Ok(());
            }
            return Err(RegistrationError::PermanentNameMismatch {
                ty,
                current: String::from(current),
            });
        }
        if let Some(bound) = self.by_permanent_name.get(name) {
            return Err(RegistrationError::PermanentNameTaken {
                name: String::from(name),
                bound: bound.type_token(),
            });
        }
        rtype.set_permanent_name(name);
        self.by_permanent_name.insert(String::from(name), rtype);
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Stats

/// Counters over the content of a [`ReflectedTypeDB`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReflectedTypeDBStats {
    pub types: usize,
    pub custom_types: usize,
    pub permanent_names: usize,
    pub structures: usize,
    pub fields: usize,
    pub methods: usize,
    pub enums: usize,
    pub ctors: usize,
    pub dtors: usize,
    pub metas: usize,
    pub inheritance_edges: usize,
    pub casts: usize,
}

impl ReflectedTypeDBStats {
    fn add_structure(&mut self, structure: &ReflectedStructure) {
        self.structures += 1;
        self.fields += structure.fields().len();
        self.methods += structure.methods().len();
        self.enums += structure.enums().len();
        self.ctors += structure.ctors().len();
        self.dtors += usize::from(structure.dtor().is_some());
        self.metas += usize::from(structure.meta().is_some())
            + structure.fields().iter().filter(|f| f.meta().is_some()).count()
            + structure.methods().iter().filter(|m| m.meta().is_some()).count();
    }
}

// -----------------------------------------------------------------------------
// ReflectedTypeDB

/// The database of reflected types.
///
/// Records are created lazily by [`edit`](Self::edit) and filled by a
/// [`ReflectionRegistrator`](crate::ReflectionRegistrator). Lookups work by
/// Rust type, by type name and by permanent name.
///
/// All mutation goes through one lock, so types can be registered from
/// several threads. Registration is expected to finish before the structure
/// of a type is first used: from then on the type is closed.
///
/// A database may forward everything to a *master* database. This lets
/// separately built modules share one set of records.
///
/// # Examples
///
/// ```
/// use dava_reflect::{ReflectedTypeDB, TypeToken};
///
/// let db = ReflectedTypeDB::new();
/// let rtype = db.get_by_type(TypeToken::of::<i32>()).unwrap();
///
/// db.register_permanent_name(rtype, "int32").unwrap();
/// assert!(std::ptr::eq(db.get_by_permanent_name("int32").unwrap(), rtype));
/// ```
pub struct ReflectedTypeDB {
    master: OnceLock<&'static ReflectedTypeDB>,
    tables: RwLock<Tables>,
    #[cfg(feature = "auto_register")]
    auto_registered: AtomicBool,
}

impl Default for ReflectedTypeDB {
    /// See [`ReflectedTypeDB::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ReflectedTypeDB {
    /// Creates a database without any record.
    pub const fn empty() -> Self {
        Self {
            master: OnceLock::new(),
            tables: RwLock::new(Tables::new()),
            #[cfg(feature = "auto_register")]
            auto_registered: AtomicBool::new(false),
        }
    }

    /// Creates a database with records for the built-in types.
    ///
    /// - `()` `bool` `char`
    /// - `i8 - i128` `isize`
    /// - `u8 - u128` `usize`
    /// - `f32` `f64`
    /// - `String` `&'static str` [`FastName`]
    pub fn new() -> Self {
        let db = Self::empty();
        db.edit::<()>();
        db.edit::<bool>();
        db.edit::<char>();
        db.edit::<i8>();
        db.edit::<i16>();
        db.edit::<i32>();
        db.edit::<i64>();
        db.edit::<i128>();
        db.edit::<isize>();
        db.edit::<u8>();
        db.edit::<u16>();
        db.edit::<u32>();
        db.edit::<u64>();
        db.edit::<u128>();
        db.edit::<usize>();
        db.edit::<f32>();
        db.edit::<f64>();
        db.edit::<String>();
        db.edit::<&'static str>();
        db.edit::<FastName>();
        db
    }

    /// Creates a database forwarding every operation to `master`.
    pub fn with_master(master: &'static ReflectedTypeDB) -> Self {
        let db = Self::empty();
        let _ = db.master.set(master);
        db
    }

    /// The process-wide database, created with [`new`](Self::new) on first use.
    pub fn global() -> &'static ReflectedTypeDB {
        static GLOBAL: OnceLock<ReflectedTypeDB> = OnceLock::new();
        GLOBAL.get_or_init(Self::new)
    }

    /// Forwards every further operation to `master`.
    ///
    /// Can be done once; records created before stay unreachable.
    pub fn set_master(&self, master: &'static ReflectedTypeDB) -> Result<(), RegistrationError> {
        if core::ptr::eq(self, master) {
            return Ok(());
        }
        self.master.set(master).map_err(|_| {
            log::error!("the master database is already set");
            RegistrationError::MasterAlreadySet
        })
    }

    /// The database that actually answers, following masters.
    pub fn resolve(&self) -> &ReflectedTypeDB {
        match self.master.get() {
            Some(master) => master.resolve(),
            None => self,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }

    // -------------------------------------------------------------------------
    // Records

    /// The record of `T`, created if needed.
    ///
    /// A new record receives the default structure wrapper of `T`, and the
    /// records of the types `T` exposes are created as well.
    pub fn edit<T: Reflected>(&self) -> &'static ReflectedType {
        let db = self.resolve();
        let ty = TypeToken::of::<T>();
        if let Some(found) = db.get_by_type(ty) {
            return found;
        }

        let (rtype, created) = {
            let mut tables = db.write();
            match tables.by_type.get(&ty.id()) {
                Some(&found) => (found, false),
                None => {
                    let wrapper = ObjectValueWrapper::<T>::INSTANCE;
                    let rtype = ReflectedType::new(ty, false, wrapper, T::structure_wrapper()).leak();
                    tables.by_type.insert(ty.id(), rtype);
                    tables.by_rtti_name.insert(ty.name(), rtype);
                    (rtype, true)
                }
            }
        };

        if created {
            log::debug!("created reflected type `{ty}`");
            T::register_dependencies(db);
        }
        rtype
    }

    pub fn get_by_type(&self, ty: TypeToken) -> Option<&'static ReflectedType> {
        self.resolve().read().by_type.get(&ty.id()).copied()
    }

    /// Looks a record up by [`core::any::type_name`].
    pub fn get_by_type_name(&self, name: &str) -> Option<&'static ReflectedType> {
        self.resolve().read().by_rtti_name.get(name).copied()
    }

    pub fn get_by_permanent_name(&self, name: &str) -> Option<&'static ReflectedType> {
        self.resolve().read().by_permanent_name.get(name).copied()
    }

    /// The record of the dynamic type of `object`.
    #[inline]
    pub fn get_by_object(&self, object: &ReflectedObject<'_>) -> Option<&'static ReflectedType> {
        self.get_by_type(object.type_token())
    }

    /// Records made by [`create_custom_type`](Self::create_custom_type).
    pub fn custom_types(&self) -> Vec<&'static ReflectedType> {
        self.resolve().read().custom.clone()
    }

    /// Binds a persistent name to a record.
    ///
    /// Binding the same name again is a no-op. A name already bound to
    /// another record, or a record that already has another name, is an
    /// error.
    pub fn register_permanent_name(
        &self,
        rtype: &'static ReflectedType,
        name: &str,
    ) -> Result<(), RegistrationError> {
        let result = self.resolve().write().bind_permanent_name(rtype, name);
        if let Err(err) = &result {
            log::error!("{err}");
        }
        result
    }

    /// Creates an additional record describing `T` under its own permanent name.
    ///
    /// The record is reachable by permanent name only and can be registered
    /// with [`ReflectionRegistrator::begin_custom`](crate::ReflectionRegistrator::begin_custom).
    pub fn create_custom_type<T: Reflected>(
        &self,
        name: &str,
    ) -> Result<&'static ReflectedType, RegistrationError> {
        let db = self.resolve();
        db.edit::<T>();
        let rtype = {
            let mut tables = db.write();
            // Checked before the record is leaked.
            if let Some(bound) = tables.by_permanent_name.get(name) {
                let err = RegistrationError::PermanentNameTaken {
                    name: String::from(name),
                    bound: bound.type_token(),
                };
                log::error!("{err}");
                return Err(err);
            }
            let rtype = ReflectedType::new(
                TypeToken::of::<T>(),
                true,
                ObjectValueWrapper::<T>::INSTANCE,
                T::structure_wrapper(),
            ).leak();
            if let Err(err) = tables.bind_permanent_name(rtype, name) {
                log::error!("{err}");
                return Err(err);
            }
            tables.custom.push(rtype);
            rtype
        };
        log::debug!("created custom reflected type `{name}` for `{}`", rtype.type_token());
        Ok(rtype)
    }

    /// Attaches a registered structure to `rtype`.
    ///
    /// Either everything is installed or nothing is.
    pub(crate) fn commit(
        &self,
        rtype: &'static ReflectedType,
        structure: ReflectedStructure,
        wrapper: Option<Box<dyn StructureWrapper>>,
        bases: Vec<BaseEntry>,
        casts: Vec<CastEntry>,
    ) -> Result<bool, RegistrationError> {
        let ty = rtype.type_token();
        let mut tables = self.resolve().write();

        if rtype.structure().is_some() {
            return Ok(false);
        }
        if rtype.is_sealed() {
            return Err(RegistrationError::RegistrationClosed { ty });
        }
        for base in &bases {
            if base.base == ty || tables.inheritance.is_ancestor(ty, base.base) {
                return Err(RegistrationError::CyclicInheritance {
                    derived: ty,
                    base: base.base,
                });
            }
        }

        for base in bases {
            tables.inheritance.add(ty, base.base, base.upcast)?;
        }
        for cast in casts {
            tables.casts.insert((cast.from.id(), cast.to.id()), cast.cast);
        }
        if !rtype.has_structure_wrapper() {
            let wrapper: Box<dyn StructureWrapper> = match wrapper {
                Some(wrapper) => wrapper,
                None => Box::new(ClassStructure::new(rtype)),
            };
            rtype.set_structure_wrapper(wrapper);
        }
        rtype.set_structure(structure);
        Ok(true)
    }

    // -------------------------------------------------------------------------
    // Inheritance

    /// Records `B` as a base of `D`, reached through the given projections.
    ///
    /// Returns `Ok(false)` if the relationship was already known.
    pub fn register_base<D: Reflected, B: Reflected>(
        &self,
        get: fn(&D) -> &B,
        get_mut: fn(&mut D) -> &mut B,
    ) -> Result<bool, RegistrationError> {
        let db = self.resolve();
        let derived = db.edit::<D>();
        db.edit::<B>();
        if derived.is_sealed() {
            return Err(RegistrationError::RegistrationClosed {
                ty: derived.type_token(),
            });
        }
        let entry = BaseEntry::new(get, get_mut);
        db.write()
            .inheritance
            .add(derived.type_token(), entry.base, entry.upcast)
    }

    /// Direct bases of `ty`, in registration order.
    pub fn base_types(&self, ty: TypeToken) -> Vec<TypeToken> {
        self.resolve().read().inheritance.bases(ty).collect()
    }

    /// Returns `true` if a `from` can be viewed as a `to`.
    pub fn can_upcast(&self, from: TypeToken, to: TypeToken) -> bool {
        from == to || self.resolve().read().inheritance.is_ancestor(to, from)
    }

    /// Returns `true` if a `from` may turn out to be a `to`.
    pub fn can_downcast(&self, from: TypeToken, to: TypeToken) -> bool {
        from == to || self.resolve().read().inheritance.is_ancestor(from, to)
    }

    /// Views `object` as its ancestor `to`.
    pub fn upcast<'a>(&self, object: &ReflectedObject<'a>, to: TypeToken) -> Option<ReflectedObject<'a>> {
        if object.type_token() == to {
            return Some(*object);
        }
        self.resolve().read().inheritance.upcast(object, to)
    }

    /// Views `object` as the derived type `to`.
    ///
    /// Fails unless the object really is a `to`, or part of one.
    pub fn downcast<'a>(&self, object: &ReflectedObject<'a>, to: TypeToken) -> Option<ReflectedObject<'a>> {
        self.resolve().read().inheritance.downcast(object, to)
    }

    /// Views `object` as `to`, in either direction.
    pub fn cast_object<'a>(&self, object: &ReflectedObject<'a>, to: TypeToken) -> Option<ReflectedObject<'a>> {
        if object.type_token() == to {
            return Some(*object);
        }
        self.resolve().read().inheritance.cast(object, to)
    }

    // -------------------------------------------------------------------------
    // Value casts

    /// Installs a conversion used by [`cast_any`](Self::cast_any).
    ///
    /// A later conversion between the same types replaces the earlier one.
    pub fn register_cast<F: 'static, T: Clone + Send + Sync + 'static>(
        &self,
        cast: impl Fn(&F) -> Option<T> + Send + Sync + 'static,
    ) {
        let entry = CastEntry::new(cast);
        self.resolve()
            .write()
            .casts
            .insert((entry.from.id(), entry.to.id()), entry.cast);
    }

    fn find_cast(&self, from: TypeToken, to: TypeToken) -> Option<Arc<CastFn>> {
        self.resolve().read().casts.get(&(from.id(), to.id())).cloned()
    }

    /// Returns `true` if [`cast_any`](Self::cast_any) knows a conversion.
    pub fn can_cast(&self, from: TypeToken, to: TypeToken) -> bool {
        from == to || can_cast_builtin(from, to) || self.find_cast(from, to).is_some()
    }

    /// Converts `value` to `to` with the registered conversions, falling
    /// back to the built-in ones.
    pub fn cast_any(&self, value: &Any, to: TypeToken) -> Result<Any, CastError> {
        let from = value.type_token().ok_or(CastError::Empty)?;
        if from != to
            && let Some(cast) = self.find_cast(from, to)
        {
            return cast(value).ok_or(CastError::OutOfRange { from, to });
        }
        cast_builtin(value, to)
    }

    /// Reads `value` as a `T` through [`cast_any`](Self::cast_any).
    pub fn cast<T: Clone + 'static>(&self, value: &Any) -> Result<T, CastError> {
        if let Some(value) = value.get::<T>() {
            return Ok(value.clone());
        }
        let to = TypeToken::of::<T>();
        let from = value.type_token().ok_or(CastError::Empty)?;
        self.cast_any(value, to)?
            .take::<T>()
            .map_err(|_| CastError::NoConversion { from, to })
    }

    // -------------------------------------------------------------------------
    // Diagnostics

    pub fn stats(&self) -> ReflectedTypeDBStats {
        let tables = self.resolve().read();
        let mut stats = ReflectedTypeDBStats {
            types: tables.by_type.len(),
            custom_types: tables.custom.len(),
            permanent_names: tables.by_permanent_name.len(),
            inheritance_edges: tables.inheritance.len(),
            casts: tables.casts.len(),
            ..Default::default()
        };
        let records = tables.by_type.values().chain(tables.custom.iter());
        for structure in records.filter_map(|rtype| rtype.structure()) {
            stats.add_structure(structure);
        }
        stats
    }

    /// Runs every registration submitted with
    /// [`auto_register!`](crate::auto_register).
    ///
    /// Only the first call does anything. Returns the number of
    /// registrations that ran.
    #[cfg(feature = "auto_register")]
    pub fn auto_register(&self) -> Result<usize, RegistrationError> {
        let db = self.resolve();
        if db.auto_registered.swap(true, Ordering::AcqRel) {
            return Ok(0);
        }
        let mut count = 0;
        for registration in inventory::iter::<crate::registry::AutoRegistration> {
            registration.run(db)?;
            count += 1;
        }
        log::debug!("ran {count} automatic registrations");
        Ok(count)
    }
}

impl fmt::Debug for ReflectedTypeDB {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReflectedTypeDB")
            .field("has_master", &self.master.get().is_some())
            .field("stats", &self.stats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;
    use std::thread;

    use crate::any::{Any, CastError};
    use crate::registry::{RegistrationError, ReflectedTypeDB};
    use crate::{ReflectionRegistrator, TypeToken, impl_reflected, member};

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Mode {
        Off,
        On,
    }
    impl_reflected!(Mode: Clone);

    struct Named;
    impl_reflected!(Named);

    #[test]
    fn new_contains_builtins() {
        let db = ReflectedTypeDB::new();
        assert!(db.get_by_type(TypeToken::of::<i32>()).is_some());
        assert!(db.get_by_type(TypeToken::of::<String>()).is_some());
        assert!(db.get_by_type_name("f64").is_some());

        assert!(ReflectedTypeDB::empty().get_by_type(TypeToken::of::<i32>()).is_none());
    }

    #[test]
    fn edit_is_idempotent() {
        let db = ReflectedTypeDB::empty();
        let a = db.edit::<Named>();
        let b = db.edit::<Named>();
        assert!(core::ptr::eq(a, b));
        assert_eq!(db.stats().types, 1);
    }

    #[test]
    fn permanent_names() {
        let db = ReflectedTypeDB::new();
        let named = db.edit::<Named>();
        let int = db.edit::<i32>();

        db.register_permanent_name(named, "Named").unwrap();
        db.register_permanent_name(named, "Named").unwrap();
        assert!(core::ptr::eq(db.get_by_permanent_name("Named").unwrap(), named));
        assert_eq!(named.permanent_name(), Some("Named"));

        assert!(matches!(
            db.register_permanent_name(int, "Named"),
            Err(RegistrationError::PermanentNameTaken { .. })
        ));
        assert!(matches!(
            db.register_permanent_name(named, "Other"),
            Err(RegistrationError::PermanentNameMismatch { .. })
        ));
    }

    #[test]
    fn master_is_set_once() {
        static MASTER: ReflectedTypeDB = ReflectedTypeDB::empty();
        static OTHER: ReflectedTypeDB = ReflectedTypeDB::empty();

        let local = ReflectedTypeDB::empty();
        local.set_master(&MASTER).unwrap();
        assert_eq!(local.set_master(&OTHER), Err(RegistrationError::MasterAlreadySet));

        let rtype = local.edit::<Named>();
        assert!(core::ptr::eq(MASTER.get_by_type(TypeToken::of::<Named>()).unwrap(), rtype));
        assert!(OTHER.get_by_type(TypeToken::of::<Named>()).is_none());

        let child = ReflectedTypeDB::with_master(&MASTER);
        assert!(core::ptr::eq(child.resolve(), &MASTER));
    }

    #[test]
    fn registered_casts() {
        let db = ReflectedTypeDB::new();
        db.register_cast::<Mode, i32>(|m| Some(*m as i32));
        db.register_cast::<i32, Mode>(|v| match v {
            0 => Some(Mode::Off),
            1 => Some(Mode::On),
            _ => None,
        });

        assert!(db.can_cast(TypeToken::of::<Mode>(), TypeToken::of::<i32>()));
        assert_eq!(db.cast::<i32>(&Any::new(Mode::On)), Ok(1));
        assert_eq!(db.cast::<Mode>(&Any::new(0_i32)), Ok(Mode::Off));
        assert!(matches!(
            db.cast::<Mode>(&Any::new(7_i32)),
            Err(CastError::OutOfRange { .. })
        ));

        // built-in conversions still apply
        assert_eq!(db.cast::<f64>(&Any::new(2_u8)), Ok(2.0));
        assert_eq!(db.cast::<i32>(&Any::empty()), Err(CastError::Empty));
    }

    #[test]
    fn custom_types_are_separate_records() {
        let db = ReflectedTypeDB::new();
        let regular = db.edit::<Named>();
        let custom = db.create_custom_type::<Named>("CustomNamed").unwrap();

        assert!(!core::ptr::eq(regular, custom));
        assert!(custom.is_custom());
        assert_eq!(custom.type_token(), TypeToken::of::<Named>());
        assert!(core::ptr::eq(db.get_by_permanent_name("CustomNamed").unwrap(), custom));
        assert!(core::ptr::eq(db.get_by_type(TypeToken::of::<Named>()).unwrap(), regular));
        assert_eq!(db.custom_types().len(), 1);

        assert!(db.create_custom_type::<Named>("CustomNamed").is_err());
    }

    #[test]
    fn taken_custom_name_adds_no_record() {
        let db = ReflectedTypeDB::new();
        db.register_permanent_name(db.edit::<Mode>(), "Mode").unwrap();
        db.create_custom_type::<Named>("NamedView").unwrap();
        let stats = db.stats();

        for name in ["Mode", "NamedView", "Mode"] {
            assert!(matches!(
                db.create_custom_type::<Named>(name),
                Err(RegistrationError::PermanentNameTaken { .. })
            ));
        }
        assert_eq!(db.custom_types().len(), 1);
        assert_eq!(db.stats().custom_types, stats.custom_types);
        assert_eq!(db.stats().permanent_names, stats.permanent_names);
    }

    #[test]
    fn concurrent_edit_and_registration() {
        struct Sample {
            a: i32,
            b: f32,
        }
        impl_reflected!(Sample);

        let db = ReflectedTypeDB::empty();
        let records: Vec<_> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        let edited = db.edit::<Sample>();
                        let registered = ReflectionRegistrator::<Sample>::begin(&db)
                            .field("a", member!(Sample, a))
                            .field("b", member!(Sample, b))
                            .end()
                            .unwrap();
                        assert!(core::ptr::eq(edited, registered));
                        registered
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let first = records[0];
        assert!(records.iter().all(|r| core::ptr::eq(*r, first)));
        assert_eq!(first.structure().map(|s| s.fields().len()), Some(2));

        let stats = db.stats();
        assert!(db.get_by_type(TypeToken::of::<f32>()).is_some());
        assert_eq!(stats.structures, 1);
        assert_eq!(stats.fields, 2);
        db.edit::<Sample>();
        assert_eq!(db.stats().types, stats.types);
    }
}
