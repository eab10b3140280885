use alloc::vec::Vec;
use std::sync::OnceLock;

use dava_utils::FastName;
use dava_utils::hash::HashMap;

use crate::any::Any;
use crate::object::ReflectedObject;
use crate::reflection::{Field, Method};
use crate::registry::{ReflectedField, ReflectedMethod, ReflectedType, ReflectedTypeDB};
use crate::structure::StructureWrapper;
use crate::{Reflection, TypeToken};

// -----------------------------------------------------------------------------
// Cache

struct CachedField {
    owner: &'static ReflectedType,
    field: &'static ReflectedField,
}

struct CachedMethod {
    owner: &'static ReflectedType,
    method: &'static ReflectedMethod,
}

#[derive(Default)]
struct ClassCache {
    fields: Vec<CachedField>,
    field_index: HashMap<FastName, usize>,
    methods: Vec<CachedMethod>,
    method_index: HashMap<FastName, usize>,
}

impl ClassCache {
    fn build(db: &ReflectedTypeDB, owner: &'static ReflectedType) -> Self {
        let mut cache = Self::default();
        let mut visited = Vec::new();
        cache.collect(db, owner, &mut visited);
        log::debug!(
            "built structure cache of `{}`: {} fields, {} methods",
            owner.type_token(),
            cache.fields.len(),
            cache.methods.len()
        );
        cache
    }

    // Bases first, each type once. Later names shadow earlier ones in lookups.
    fn collect(&mut self, db: &ReflectedTypeDB, owner: &'static ReflectedType, visited: &mut Vec<TypeToken>) {
        let ty = owner.type_token();
        if visited.contains(&ty) {
            return;
        }
        visited.push(ty);

        for base in db.base_types(ty) {
            if let Some(base) = db.get_by_type(base) {
                self.collect(db, base, visited);
            }
        }

        owner.seal();
        let Some(structure) = owner.structure() else {
            return;
        };

        for field in structure.fields() {
            self.field_index.insert(field.name(), self.fields.len());
            self.fields.push(CachedField { owner, field });
        }
        for method in structure.methods() {
            self.method_index.insert(method.name(), self.methods.len());
            self.methods.push(CachedMethod { owner, method });
        }
    }
}

// -----------------------------------------------------------------------------
// ClassStructure

/// Fields and methods registered for a type and all of its bases.
///
/// The flattened lists are built on first use. Building closes the type and
/// every ancestor for further registration, so the lists never go stale.
/// Inherited entries are accessed through an upcast of the value.
pub struct ClassStructure {
    owner: &'static ReflectedType,
    ty: TypeToken,
    cache: OnceLock<ClassCache>,
}

impl ClassStructure {
    /// Structure of the record `owner`, which may be a custom record.
    #[inline]
    pub fn new(owner: &'static ReflectedType) -> Self {
        Self {
            owner,
            ty: owner.type_token(),
            cache: OnceLock::new(),
        }
    }

    fn cache(&self, db: &ReflectedTypeDB) -> &ClassCache {
        self.cache.get_or_init(|| ClassCache::build(db, self.owner))
    }

    /// Views `value` as the type this structure describes.
    fn view<'a>(&self, db: &ReflectedTypeDB, value: &ReflectedObject<'a>) -> Option<ReflectedObject<'a>> {
        if value.type_token() == self.ty {
            Some(*value)
        } else {
            db.cast_object(value, self.ty)
        }
    }

    fn owner_view<'a>(
        &self,
        db: &ReflectedTypeDB,
        this: &ReflectedObject<'a>,
        owner: &ReflectedType,
    ) -> Option<ReflectedObject<'a>> {
        if owner.type_token() == self.ty {
            Some(*this)
        } else {
            db.upcast(this, owner.type_token())
        }
    }

    fn inherit_from(&self, owner: &'static ReflectedType) -> Option<&'static ReflectedType> {
        (!core::ptr::eq(owner, self.owner)).then_some(owner)
    }

    fn field<'a>(&self, db: &'a ReflectedTypeDB, this: &ReflectedObject<'a>, entry: &CachedField) -> Field<'a> {
        let reflection = match self.owner_view(db, this, entry.owner) {
            Some(object) => Reflection::from_parts(
                db,
                object,
                entry.field.value_wrapper(),
                None,
                entry.field.meta(),
            ),
            None => Reflection::invalid(),
        };
        Field {
            key: Any::new(entry.field.name()),
            reflection,
            inherit_from: self.inherit_from(entry.owner),
        }
    }

    fn method<'a>(&self, db: &ReflectedTypeDB, this: &ReflectedObject<'a>, entry: &CachedMethod) -> Method<'a> {
        let func = entry.method.func();
        let this = if func.is_static() {
            None
        } else {
            self.owner_view(db, this, entry.owner)
        };
        Method::new(entry.method.name(), func, this, entry.method.meta())
    }
}

impl StructureWrapper for ClassStructure {
    fn fields_count(&self, db: &ReflectedTypeDB, _value: &ReflectedObject<'_>) -> usize {
        self.cache(db).fields.len()
    }

    fn get_field<'a>(&self, db: &'a ReflectedTypeDB, value: &ReflectedObject<'a>, key: &Any) -> Reflection<'a> {
        let Some(name) = key.as_str().and_then(FastName::lookup) else {
            return Reflection::invalid();
        };
        let cache = self.cache(db);
        let (Some(&index), Some(this)) = (cache.field_index.get(&name), self.view(db, value)) else {
            return Reflection::invalid();
        };
        self.field(db, &this, &cache.fields[index]).reflection
    }

    fn get_fields<'a>(&self, db: &'a ReflectedTypeDB, value: &ReflectedObject<'a>) -> Vec<Field<'a>> {
        self.get_fields_range(db, value, 0, usize::MAX)
    }

    fn get_fields_range<'a>(
        &self,
        db: &'a ReflectedTypeDB,
        value: &ReflectedObject<'a>,
        first: usize,
        count: usize,
    ) -> Vec<Field<'a>> {
        let Some(this) = self.view(db, value) else {
            return Vec::new();
        };
        self.cache(db)
            .fields
            .iter()
            .skip(first)
            .take(count)
            .map(|entry| self.field(db, &this, entry))
            .collect()
    }

    fn has_methods(&self, db: &ReflectedTypeDB, _value: &ReflectedObject<'_>) -> bool {
        !self.cache(db).methods.is_empty()
    }

    fn get_method<'a>(&self, db: &'a ReflectedTypeDB, value: &ReflectedObject<'a>, name: &str) -> Option<Method<'a>> {
        let cache = self.cache(db);
        let index = *cache.method_index.get(&FastName::lookup(name)?)?;
        let this = self.view(db, value)?;
        Some(self.method(db, &this, &cache.methods[index]))
    }

    fn get_methods<'a>(&self, db: &'a ReflectedTypeDB, value: &ReflectedObject<'a>) -> Vec<Method<'a>> {
        let Some(this) = self.view(db, value) else {
            return Vec::new();
        };
        self.cache(db)
            .methods
            .iter()
            .map(|entry| self.method(db, &this, entry))
            .collect()
    }
}
