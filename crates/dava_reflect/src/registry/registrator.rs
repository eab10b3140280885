use alloc::boxed::Box;
use alloc::vec::Vec;
use core::marker::PhantomData;
use std::sync::RwLock;

use bytemuck::Pod;
use dava_utils::FastName;

use crate::any::{AnyFn, IntoAnyFn, IntoMethod};
use crate::meta::ReflectedMeta;
use crate::registry::{
    BaseEntry, CastEntry, CreatePolicy, ReflectedCtor, ReflectedEnum, ReflectedField, ReflectedMethod,
    ReflectedStructure, ReflectedType, ReflectedTypeDB, RegistrationError,
};
use crate::structure::StructureWrapper;
use crate::value::{
    AccessorValueWrapper, Getter, MemberValueWrapper, RawValueWrapper, Setter, StaticValueWrapper,
    ValueWrapper,
};
use crate::{Reflected, TypeToken};

// -----------------------------------------------------------------------------
// FieldBinding

fn ensure_type<T: Reflected>(db: &ReflectedTypeDB) {
    db.edit::<T>();
}

fn ensure_nothing(_db: &ReflectedTypeDB) {}

/// How a field of `C` is reached: the value wrapper of the field plus the
/// record of the field type to create.
///
/// Usually built with [`member!`](crate::member) or one of the constructors.
pub struct FieldBinding<C> {
    wrapper: Box<dyn ValueWrapper>,
    ensure: fn(&ReflectedTypeDB),
    _marker: PhantomData<fn(&C)>,
}

impl<C: Reflected> FieldBinding<C> {
    fn with<T: Reflected>(wrapper: impl ValueWrapper + 'static) -> Self {
        Self {
            wrapper: Box::new(wrapper),
            ensure: ensure_type::<T>,
            _marker: PhantomData,
        }
    }

    /// A field stored in `C`, read and written in place.
    pub fn member<T: Reflected>(get: fn(&C) -> &T, get_mut: fn(&mut C) -> &mut T) -> Self {
        Self::with::<T>(MemberValueWrapper::new(get, get_mut))
    }

    /// A field stored in `C` that cannot be written.
    pub fn member_readonly<T: Reflected>(get: fn(&C) -> &T) -> Self {
        Self::with::<T>(MemberValueWrapper::readonly(get))
    }

    /// A read-only value computed from `&C`.
    pub fn getter<T: Reflected>(get: impl Fn(&C) -> T + Send + Sync + 'static) -> Self {
        Self::accessors(Getter::Const(Box::new(get)), None)
    }

    /// A read-only value computed from `&mut C`.
    ///
    /// Read-only views of the object cannot call `get`, so the field reads
    /// as empty through them. Use [`field_mut`](crate::Reflection::field_mut).
    pub fn getter_mut<T: Reflected>(get: impl Fn(&mut C) -> T + Send + Sync + 'static) -> Self {
        Self::accessors(Getter::Mut(Box::new(get)), None)
    }

    /// A value computed from `&C` and written back through `set`.
    pub fn getter_setter<T: Reflected>(
        get: impl Fn(&C) -> T + Send + Sync + 'static,
        set: impl Fn(&mut C, T) + Send + Sync + 'static,
    ) -> Self {
        Self::accessors(Getter::Const(Box::new(get)), Some(Setter::Mut(Box::new(set))))
    }

    /// A read-only value borrowed from `C`.
    ///
    /// Unlike [`getter`](Self::getter) the value keeps a value object, so its
    /// own fields can be listed.
    pub fn ref_getter<T: Reflected>(get: fn(&C) -> &T) -> Self {
        Self::accessors(Getter::Ref(get), None)
    }

    /// A value borrowed from `C` and written back through `set`.
    pub fn ref_getter_setter<T: Reflected>(
        get: fn(&C) -> &T,
        set: impl Fn(&mut C, T) + Send + Sync + 'static,
    ) -> Self {
        Self::accessors(Getter::Ref(get), Some(Setter::Mut(Box::new(set))))
    }

    /// A read-only value that does not depend on the object.
    pub fn static_getter<T: Reflected>(get: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self::accessors(Getter::Static(Box::new(get)), None)
    }

    /// A value that does not depend on the object, with a free setter.
    pub fn static_getter_setter<T: Reflected>(
        get: impl Fn() -> T + Send + Sync + 'static,
        set: impl Fn(T) + Send + Sync + 'static,
    ) -> Self {
        Self::accessors(Getter::Static(Box::new(get)), Some(Setter::Static(Box::new(set))))
    }

    /// Any combination of getter and optional setter.
    pub fn accessors<T: Reflected>(getter: Getter<C, T>, setter: Option<Setter<C, T>>) -> Self {
        Self::with::<T>(AccessorValueWrapper::new(getter, setter))
    }

    /// A read-only static.
    pub fn static_ref<T: Reflected>(value: &'static T) -> Self {
        Self::with::<T>(StaticValueWrapper::Const(value))
    }

    /// A read-only static returned by a function.
    pub fn static_ref_getter<T: Reflected>(get: fn() -> &'static T) -> Self {
        Self::with::<T>(StaticValueWrapper::Getter(get))
    }

    /// A writable static behind a lock.
    pub fn static_locked<T: Reflected>(value: &'static RwLock<T>) -> Self {
        Self::with::<T>(StaticValueWrapper::Locked(value))
    }

    /// A plain-old-data field copied as bytes.
    pub fn raw<T: Pod + Send + Sync>(get: fn(&C) -> &T, get_mut: fn(&mut C) -> &mut T) -> Self {
        Self {
            wrapper: Box::new(RawValueWrapper::new(get, get_mut)),
            ensure: ensure_nothing,
            _marker: PhantomData,
        }
    }

    /// A hand-written value wrapper.
    pub fn wrapper(wrapper: impl ValueWrapper + 'static) -> Self {
        Self {
            wrapper: Box::new(wrapper),
            ensure: ensure_nothing,
            _marker: PhantomData,
        }
    }
}

/// Builds a [`FieldBinding::member`] for a field path of a type.
///
/// ```
/// use dava_reflect::{impl_reflected, member};
///
/// struct Inner { v: i32 }
/// struct Outer { inner: Inner }
/// impl_reflected!(Outer);
///
/// let _direct = member!(Outer, inner.v);
/// ```
#[macro_export]
macro_rules! member {
    ($ty:ty, $($field:tt).+) => {
        $crate::registry::FieldBinding::<$ty>::member(
            |this| &this.$($field).+,
            |this| &mut this.$($field).+,
        )
    };
}

// -----------------------------------------------------------------------------
// ReflectionRegistrator

enum MetaTarget {
    None,
    Type,
    Field(usize),
    Method(usize),
}

/// Fluent registration of the structure of `C`.
///
/// Nothing reaches the database until [`end`](Self::end), which installs
/// everything or, on error, nothing. Registering a type a second time is
/// ignored.
///
/// [`meta`](Self::meta) binds to whatever was declared last: the type right
/// after `begin`, otherwise the last field or method.
///
/// # Examples
///
/// ```
/// use dava_reflect::any::Any;
/// use dava_reflect::meta::{DisplayName, ReflectedMeta};
/// use dava_reflect::{impl_reflected, member, Reflection, ReflectionRegistrator, ReflectedTypeDB};
///
/// #[derive(Clone, Default)]
/// struct Player {
///     name: String,
///     hp: i32,
/// }
/// impl_reflected!(Player: Clone);
///
/// impl Player {
///     fn heal(&mut self, amount: i32) {
///         self.hp += amount;
///     }
/// }
///
/// let db = ReflectedTypeDB::new();
/// ReflectionRegistrator::<Player>::begin(&db)
///     .meta(ReflectedMeta::new().with(DisplayName("Player")))
///     .constructor_default()
///     .field("name", member!(Player, name))
///     .field("hp", member!(Player, hp))
///     .meta(ReflectedMeta::new().with(DisplayName("Health")))
///     .method("heal", Player::heal)
///     .end()
///     .unwrap();
///
/// let mut player = Player::default();
/// let mut r = Reflection::create(&db, &mut player);
/// assert_eq!(r.field("hp").get_meta::<DisplayName>().unwrap().0, "Health");
///
/// r.get_method_mut("heal").unwrap().invoke(vec![Any::new(5_i32)]).unwrap();
/// assert_eq!(player.hp, 5);
/// ```
pub struct ReflectionRegistrator<'db, C> {
    db: &'db ReflectedTypeDB,
    rtype: &'static ReflectedType,
    wrapper: Option<Box<dyn StructureWrapper>>,
    structure: ReflectedStructure,
    bases: Vec<BaseEntry>,
    casts: Vec<CastEntry>,
    dependencies: Vec<fn(&ReflectedTypeDB)>,
    meta_target: MetaTarget,
    error: Option<RegistrationError>,
    _marker: PhantomData<fn() -> C>,
}

impl<'db, C: Reflected> ReflectionRegistrator<'db, C> {
    fn on(db: &'db ReflectedTypeDB, rtype: &'static ReflectedType) -> Self {
        Self {
            db,
            rtype,
            wrapper: None,
            structure: ReflectedStructure::default(),
            bases: Vec::new(),
            casts: Vec::new(),
            dependencies: Vec::new(),
            meta_target: MetaTarget::Type,
            error: None,
            _marker: PhantomData,
        }
    }

    /// Starts the registration of `C`.
    pub fn begin(db: &'db ReflectedTypeDB) -> Self {
        let rtype = db.edit::<C>();
        Self::on(db, rtype)
    }

    /// Starts the registration of `C` with a hand-written structure wrapper
    /// in place of the class structure.
    ///
    /// A record that already has a wrapper keeps it.
    pub fn begin_with_wrapper(db: &'db ReflectedTypeDB, wrapper: impl StructureWrapper + 'static) -> Self {
        let mut this = Self::begin(db);
        this.wrapper = Some(Box::new(wrapper));
        this
    }

    /// Starts the registration of a record made by
    /// [`ReflectedTypeDB::create_custom_type`].
    pub fn begin_custom(db: &'db ReflectedTypeDB, rtype: &'static ReflectedType) -> Self {
        let mut this = Self::on(db, rtype);
        let expected = TypeToken::of::<C>();
        if rtype.type_token() != expected {
            this.error = Some(RegistrationError::TypeMismatch {
                expected,
                actual: rtype.type_token(),
            });
        }
        this
    }

    #[inline]
    fn ty(&self) -> TypeToken {
        self.rtype.type_token()
    }

    fn fail(mut self, err: RegistrationError) -> Self {
        self.error.get_or_insert(err);
        self
    }

    // -------------------------------------------------------------------------
    // Constructors and destructor

    fn ctor(self, policy: CreatePolicy, func: AnyFn) -> Self {
        if self.error.is_some() {
            return self;
        }
        let expected = match policy {
            CreatePolicy::ByValue => TypeToken::of::<C>(),
            CreatePolicy::ByPointer => TypeToken::of::<Box<C>>(),
        };
        let ret = func.params().ret();
        if ret != expected {
            let ty = self.ty();
            return self.fail(RegistrationError::InvalidConstructor { ty, ret });
        }
        let mut this = self;
        this.structure.ctors.push(ReflectedCtor { policy, func });
        this.meta_target = MetaTarget::None;
        this
    }

    /// Registers a function returning `C`.
    pub fn constructor_by_value<M, F: IntoAnyFn<M>>(self, f: F) -> Self {
        self.ctor(CreatePolicy::ByValue, AnyFn::new(f))
    }

    /// Registers [`Default::default`] as a by-value constructor.
    pub fn constructor_default(self) -> Self
    where
        C: Default,
    {
        self.constructor_by_value(C::default)
    }

    /// Registers a function returning `Box<C>`.
    pub fn constructor_by_pointer<M, F: IntoAnyFn<M>>(self, f: F) -> Self {
        self.ctor(CreatePolicy::ByPointer, AnyFn::new(f))
    }

    /// Registers a destructor that drops a `Box<C>`.
    pub fn destructor_by_pointer(self) -> Self {
        self.destructor_by_pointer_with(drop::<Box<C>>)
    }

    /// Registers a function consuming a `Box<C>` as destructor.
    pub fn destructor_by_pointer_with(mut self, f: impl Fn(Box<C>) + Send + Sync + 'static) -> Self {
        if self.error.is_none() {
            self.structure.dtor = Some(AnyFn::new(f));
            self.meta_target = MetaTarget::None;
        }
        self
    }

    // -------------------------------------------------------------------------
    // Members

    /// Declares a field.
    pub fn field(mut self, name: &str, binding: FieldBinding<C>) -> Self {
        if self.error.is_some() {
            return self;
        }
        let name = FastName::new(name);
        if self.structure.fields.iter().any(|f| f.name == name) {
            let ty = self.ty();
            return self.fail(RegistrationError::DuplicateField { ty, field: name });
        }
        self.dependencies.push(binding.ensure);
        self.meta_target = MetaTarget::Field(self.structure.fields.len());
        self.structure.fields.push(ReflectedField {
            name,
            value_wrapper: binding.wrapper,
            meta: None,
        });
        self
    }

    fn push_method(mut self, name: &str, func: AnyFn) -> Self {
        if self.error.is_some() {
            return self;
        }
        let name = FastName::new(name);
        if self.structure.methods.iter().any(|m| m.name == name) {
            let ty = self.ty();
            return self.fail(RegistrationError::DuplicateMethod { ty, method: name });
        }
        self.meta_target = MetaTarget::Method(self.structure.methods.len());
        self.structure.methods.push(ReflectedMethod {
            name,
            func,
            meta: None,
        });
        self
    }

    /// Declares a method taking `&C` or `&mut C` first.
    pub fn method<M, F: IntoMethod<C, M>>(self, name: &str, f: F) -> Self {
        self.push_method(name, AnyFn::method(f))
    }

    /// Declares a function that takes no receiver.
    pub fn static_method<M, F: IntoAnyFn<M>>(self, name: &str, f: F) -> Self {
        self.push_method(name, AnyFn::new(f))
    }

    /// Declares `B` as a base of `C`, embedded in it.
    ///
    /// Fields and methods of `B` then show up on `C`, ahead of its own.
    pub fn base<B: Reflected>(mut self, get: fn(&C) -> &B, get_mut: fn(&mut C) -> &mut B) -> Self {
        if self.error.is_none() {
            self.dependencies.push(ensure_type::<B>);
            self.bases.push(BaseEntry::new(get, get_mut));
        }
        self
    }

    /// Records the named values of an enumeration and installs conversions
    /// between it and `i64`/`i32`.
    ///
    /// Integers that match no entry do not convert to `E`.
    pub fn enumeration<E: Reflected + Clone>(mut self, to_int: fn(&E) -> i64, entries: &[(&str, E)]) -> Self {
        if self.error.is_some() {
            return self;
        }
        let table: Vec<(i64, E)> = entries.iter().map(|(_, e)| (to_int(e), e.clone())).collect();
        let from_int = move |v: i64| table.iter().find(|(i, _)| *i == v).map(|(_, e)| e.clone());
        let from_i32 = from_int.clone();

        self.structure.enums.push(ReflectedEnum {
            ty: TypeToken::of::<E>(),
            entries: entries.iter().map(|(n, e)| (FastName::new(n), to_int(e))).collect(),
        });
        self.casts.push(CastEntry::new::<E, i64>(move |e| Some(to_int(e))));
        self.casts.push(CastEntry::new::<E, i32>(move |e| i32::try_from(to_int(e)).ok()));
        self.casts.push(CastEntry::new::<i64, E>(move |v| from_int(*v)));
        self.casts.push(CastEntry::new::<i32, E>(move |v| from_i32(i64::from(*v))));
        self.dependencies.push(ensure_type::<E>);
        self.meta_target = MetaTarget::None;
        self
    }

    /// Binds `meta` to the type, field or method declared last.
    ///
    /// Each target takes one meta.
    pub fn meta(mut self, meta: ReflectedMeta) -> Self {
        if self.error.is_some() {
            return self;
        }
        let slot = match self.meta_target {
            MetaTarget::None => None,
            MetaTarget::Type => Some(&mut self.structure.meta),
            MetaTarget::Field(i) => Some(&mut self.structure.fields[i].meta),
            MetaTarget::Method(i) => Some(&mut self.structure.methods[i].meta),
        };
        if let Some(slot) = slot.filter(|slot| slot.is_none()) {
            *slot = Some(meta);
            self.meta_target = MetaTarget::None;
            return self;
        }
        let ty = self.ty();
        self.fail(RegistrationError::MetaWithoutTarget { ty })
    }

    // -------------------------------------------------------------------------
    // Commit

    /// Installs the registration in the database.
    ///
    /// A type that is already registered is left untouched. A type whose
    /// structure is already in use cannot be registered any more.
    pub fn end(self) -> Result<&'static ReflectedType, RegistrationError> {
        let ty = self.ty();
        let result = self.commit();
        if let Err(err) = &result {
            log::error!("registration of `{ty}` failed: {err}");
        }
        result
    }

    // Own fields hide base fields of the same name in lookups.
    #[cfg(all(debug_assertions, feature = "debug"))]
    fn check_shadowing(&self) {
        for base in &self.bases {
            let Some(structure) = self.db.get_by_type(base.base).and_then(ReflectedType::structure) else {
                continue;
            };
            for field in self.structure.fields() {
                if structure.field(field.name().as_str()).is_some() {
                    log::warn!(
                        "field `{}` of `{}` hides the field of its base `{}`",
                        field.name(),
                        self.ty(),
                        base.base
                    );
                }
            }
        }
    }

    fn commit(self) -> Result<&'static ReflectedType, RegistrationError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let ty = self.ty();
        let rtype = self.rtype;
        if rtype.structure().is_some() {
            log::warn!("`{ty}` is already registered, ignoring the repeated registration");
            return Ok(rtype);
        }
        if rtype.is_sealed() {
            return Err(RegistrationError::RegistrationClosed { ty });
        }

        for ensure in &self.dependencies {
            ensure(self.db);
        }
        #[cfg(all(debug_assertions, feature = "debug"))]
        self.check_shadowing();

        let fields = self.structure.fields.len();
        let methods = self.structure.methods.len();
        let committed = self
            .db
            .commit(rtype, self.structure, self.wrapper, self.bases, self.casts)?;
        if committed {
            log::debug!("registered `{ty}`: {fields} fields, {methods} methods");
        } else {
            log::warn!("`{ty}` is already registered, ignoring the repeated registration");
        }
        Ok(rtype)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;
    use std::sync::RwLock;

    use crate::any::Any;
    use crate::meta::ReflectedMeta;
    use crate::registry::{CreatePolicy, FieldBinding, RegistrationError, ReflectedTypeDB};
    use crate::{Reflection, ReflectionRegistrator, TypeToken, impl_reflected};

    #[derive(Clone, Default)]
    struct Counter {
        value: i32,
        tag: String,
        bits: u32,
    }
    impl_reflected!(Counter: Clone);

    impl Counter {
        fn with_value(value: i32) -> Counter {
            Counter {
                value,
                ..Counter::default()
            }
        }

        fn doubled(&self) -> i32 {
            self.value * 2
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Mode {
        Off,
        On,
    }
    impl_reflected!(Mode: Clone);

    #[test]
    fn duplicate_field_fails() {
        let db = ReflectedTypeDB::new();
        let err = ReflectionRegistrator::<Counter>::begin(&db)
            .field("value", member!(Counter, value))
            .field("value", member!(Counter, value))
            .end()
            .unwrap_err();
        assert!(matches!(err, RegistrationError::DuplicateField { .. }));
        assert!(db.edit::<Counter>().structure().is_none());
    }

    #[test]
    fn duplicate_method_fails() {
        let db = ReflectedTypeDB::new();
        let err = ReflectionRegistrator::<Counter>::begin(&db)
            .method("doubled", Counter::doubled)
            .method("doubled", Counter::doubled)
            .end()
            .unwrap_err();
        assert!(matches!(err, RegistrationError::DuplicateMethod { .. }));
    }

    #[test]
    fn meta_needs_a_free_target() {
        let db = ReflectedTypeDB::new();
        let err = ReflectionRegistrator::<Counter>::begin(&db)
            .meta(ReflectedMeta::new().with(1_u8))
            .meta(ReflectedMeta::new().with(2_u8))
            .end()
            .unwrap_err();
        assert!(matches!(err, RegistrationError::MetaWithoutTarget { .. }));

        let db = ReflectedTypeDB::new();
        let err = ReflectionRegistrator::<Counter>::begin(&db)
            .constructor_default()
            .meta(ReflectedMeta::new())
            .end()
            .unwrap_err();
        assert!(matches!(err, RegistrationError::MetaWithoutTarget { .. }));
    }

    #[test]
    fn constructors_must_return_the_type() {
        let db = ReflectedTypeDB::new();
        let err = ReflectionRegistrator::<Counter>::begin(&db)
            .constructor_by_value(|| 5_i32)
            .end()
            .unwrap_err();
        assert_eq!(
            err,
            RegistrationError::InvalidConstructor {
                ty: TypeToken::of::<Counter>(),
                ret: TypeToken::of::<i32>(),
            }
        );
    }

    #[test]
    fn create_and_destroy() {
        let db = ReflectedTypeDB::new();
        let rtype = ReflectionRegistrator::<Counter>::begin(&db)
            .constructor_default()
            .constructor_by_value(Counter::with_value)
            .constructor_by_pointer(|v: i32| Box::new(Counter::with_value(v)))
            .destructor_by_pointer()
            .end()
            .unwrap();

        let object = rtype.create_object(CreatePolicy::ByValue, vec![Any::new(7_i32)]).unwrap();
        assert_eq!(object.get::<Counter>().map(|c| c.value), Some(7));
        assert!(rtype.destroy(object));

        let boxed = rtype.create_object(CreatePolicy::ByPointer, vec![Any::new(3_i32)]).unwrap();
        assert_eq!(boxed.get::<Box<Counter>>().map(|c| c.value), Some(3));
        assert!(rtype.destroy(boxed));

        assert!(rtype.create_object(CreatePolicy::ByPointer, Vec::new()).is_err());
    }

    #[test]
    fn accessor_bindings() {
        static LIMIT: RwLock<u32> = RwLock::new(10);

        let db = ReflectedTypeDB::new();
        ReflectionRegistrator::<Counter>::begin(&db)
            .field("value", member!(Counter, value))
            .field("tag", FieldBinding::member_readonly(|c: &Counter| &c.tag))
            .field("doubled", FieldBinding::getter(Counter::doubled))
            .field("limit", FieldBinding::static_locked(&LIMIT))
            .field("bits", FieldBinding::raw(|c: &Counter| &c.bits, |c: &mut Counter| &mut c.bits))
            .end()
            .unwrap();

        let mut counter = Counter::with_value(4);
        counter.bits = 0x0102_0304;
        let mut r = Reflection::create(&db, &mut counter);

        assert!(r.field_mut("tag").is_readonly());
        assert!(!r.field_mut("tag").set_value(Any::new(String::from("x"))));
        assert!(r.field("doubled").is_readonly());
        assert_eq!(r.field("doubled").get_value_cast::<i32>(), Some(8));

        assert!(r.field_mut("limit").set_value(Any::new(25_u32)));
        assert_eq!(*LIMIT.read().unwrap(), 25);

        let bytes = r.field("bits").get_value();
        assert_eq!(bytes.get::<Vec<u8>>().map(Vec::len), Some(4));
        assert!(!r.field("bits").set_value(Any::new(7_u32)));
        assert!(r.field_mut("bits").set_value(Any::new(7_u32)));
        assert_eq!(counter.bits, 7);
    }

    #[test]
    fn reference_accessors_reach_nested_fields() {
        #[derive(Default)]
        struct Holder {
            counter: Counter,
            writes: u32,
        }
        impl_reflected!(Holder);

        let db = ReflectedTypeDB::new();
        ReflectionRegistrator::<Counter>::begin(&db)
            .field("value", member!(Counter, value))
            .end()
            .unwrap();
        ReflectionRegistrator::<Holder>::begin(&db)
            .field(
                "counter",
                FieldBinding::ref_getter_setter(
                    |h: &Holder| &h.counter,
                    |h: &mut Holder, c: Counter| {
                        h.counter = c;
                        h.writes += 1;
                    },
                ),
            )
            .end()
            .unwrap();

        let mut holder = Holder::default();
        holder.counter.value = 3;
        let mut r = Reflection::create(&db, &mut holder);

        let counter = r.field("counter");
        assert!(counter.value_object().is_some());
        assert!(counter.has_fields());
        assert_eq!(counter.field("value").get_value_cast::<i32>(), Some(3));

        assert!(r.field_mut("counter").set_value(Any::new(Counter::with_value(9))));
        assert_eq!(r.field("counter").field("value").get_value_cast::<i32>(), Some(9));
        assert!(!r.field_mut("counter").field_mut("value").set_value(Any::new(1_i32)));
        assert_eq!((holder.counter.value, holder.writes), (9, 1));
    }

    #[test]
    fn enumerations_register_integer_casts() {
        let db = ReflectedTypeDB::new();
        let rtype = ReflectionRegistrator::<Counter>::begin(&db)
            .enumeration::<Mode>(|m| *m as i64, &[("off", Mode::Off), ("on", Mode::On)])
            .end()
            .unwrap();

        let structure = rtype.structure().unwrap();
        assert_eq!(structure.enums().len(), 1);
        assert_eq!(db.cast::<i64>(&Any::new(Mode::On)), Ok(1));
        assert_eq!(db.cast::<Mode>(&Any::new(0_i32)), Ok(Mode::Off));
        assert!(db.cast::<Mode>(&Any::new(9_i64)).is_err());
        assert!(db.get_by_type(TypeToken::of::<Mode>()).is_some());
    }

    #[test]
    fn repeated_registration_keeps_the_first() {
        let db = ReflectedTypeDB::new();
        let first = ReflectionRegistrator::<Counter>::begin(&db)
            .field("value", member!(Counter, value))
            .end()
            .unwrap();
        let second = ReflectionRegistrator::<Counter>::begin(&db)
            .field("value", member!(Counter, value))
            .field("tag", member!(Counter, tag))
            .end()
            .unwrap();
        assert!(core::ptr::eq(first, second));
        assert_eq!(second.structure().unwrap().fields().len(), 1);
    }

    #[test]
    fn registration_closes_once_structure_is_read() {
        #[derive(Default)]
        struct Labeled {
            counter: Counter,
            label: i32,
        }
        impl_reflected!(Labeled);

        let db = ReflectedTypeDB::new();
        ReflectionRegistrator::<Labeled>::begin(&db)
            .base(|l: &Labeled| &l.counter, |l: &mut Labeled| &mut l.counter)
            .field("label", member!(Labeled, label))
            .end()
            .unwrap();
        let mut labeled = Labeled::default();
        assert_eq!(Reflection::create(&db, &mut labeled).fields_count(), 1);

        let err = ReflectionRegistrator::<Counter>::begin(&db)
            .field("value", member!(Counter, value))
            .end()
            .unwrap_err();
        assert!(matches!(err, RegistrationError::RegistrationClosed { .. }));
    }

    #[test]
    fn custom_records() {
        let db = ReflectedTypeDB::new();
        ReflectionRegistrator::<Counter>::begin(&db)
            .field("value", member!(Counter, value))
            .end()
            .unwrap();
        let custom = db.create_custom_type::<Counter>("CounterView").unwrap();
        ReflectionRegistrator::<Counter>::begin_custom(&db, custom)
            .field("doubled", FieldBinding::getter(Counter::doubled))
            .end()
            .unwrap();

        let mut counter = Counter::with_value(6);
        let r = Reflection::create_as(&db, custom, &mut counter);
        assert!(!r.field("value").is_valid());
        assert_eq!(r.field("doubled").get_value_cast::<i32>(), Some(12));
        assert!(core::ptr::eq(db.get_by_permanent_name("CounterView").unwrap(), custom));

        let err = ReflectionRegistrator::<Mode>::begin_custom(&db, custom).end().unwrap_err();
        assert!(matches!(err, RegistrationError::TypeMismatch { .. }));
    }

    #[test]
    fn create_as_rejects_other_types() {
        let db = ReflectedTypeDB::new();
        let custom = db.create_custom_type::<Counter>("Other").unwrap();
        let mut mode = Mode::On;
        assert!(!Reflection::create_as(&db, custom, &mut mode).is_valid());
    }

    #[test]
    fn stats_count_registered_parts() {
        let db = ReflectedTypeDB::new();
        ReflectionRegistrator::<Counter>::begin(&db)
            .meta(ReflectedMeta::new().with(1_u8))
            .constructor_default()
            .destructor_by_pointer()
            .field("value", member!(Counter, value))
            .meta(ReflectedMeta::new().with(2_u8))
            .method("doubled", Counter::doubled)
            .end()
            .unwrap();

        let stats = db.stats();
        assert_eq!(stats.structures, 1);
        assert_eq!(stats.fields, 1);
        assert_eq!(stats.methods, 1);
        assert_eq!(stats.ctors, 1);
        assert_eq!(stats.dtors, 1);
        assert_eq!(stats.metas, 2);
    }
}
