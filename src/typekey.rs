//! Semantic type descriptors used to match write parameters, read return
//! types, and random generator outputs.
//!
//! Matching is strict: two keys are equivalent only when they denote the
//! same `TypeId` or the same scalar kind. "Assignable" is never enough.

use std::any::{TypeId, type_name};
use std::fmt;

/// The scalar kinds that get first-class generator support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Bool,
    Char,
}

impl ScalarKind {
    /// Canonical lowercase name, as it appears in generator method names.
    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
            ScalarKind::Bool => "bool",
            ScalarKind::Char => "char",
        }
    }

    fn of(id: TypeId) -> Option<ScalarKind> {
        let table: [(TypeId, ScalarKind); 12] = [
            (TypeId::of::<i8>(), ScalarKind::I8),
            (TypeId::of::<i16>(), ScalarKind::I16),
            (TypeId::of::<i32>(), ScalarKind::I32),
            (TypeId::of::<i64>(), ScalarKind::I64),
            (TypeId::of::<u8>(), ScalarKind::U8),
            (TypeId::of::<u16>(), ScalarKind::U16),
            (TypeId::of::<u32>(), ScalarKind::U32),
            (TypeId::of::<u64>(), ScalarKind::U64),
            (TypeId::of::<f32>(), ScalarKind::F32),
            (TypeId::of::<f64>(), ScalarKind::F64),
            (TypeId::of::<bool>(), ScalarKind::Bool),
            (TypeId::of::<char>(), ScalarKind::Char),
        ];
        table.iter().find(|(tid, _)| *tid == id).map(|(_, kind)| *kind)
    }
}

/// A runtime type descriptor: a `TypeId` plus the type's full path name.
#[derive(Debug, Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// The key for a concrete type.
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Full path name of the type, e.g. `alloc::string::String`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The scalar kind of this type, when it is one of the scalar kinds.
    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        ScalarKind::of(self.id)
    }

    pub fn is_bool(&self) -> bool {
        self.scalar_kind() == Some(ScalarKind::Bool)
    }

    /// The last path segment of the type name with generics stripped,
    /// e.g. `String` or `DateTime`.
    pub fn simple_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        base.rsplit("::").next().unwrap_or(base)
    }

    /// Whether two keys denote the same type for matching purposes.
    pub fn equivalent(&self, other: &TypeKey) -> bool {
        if self.id == other.id {
            return true;
        }
        matches!(
            (self.scalar_kind(), other.scalar_kind()),
            (Some(a), Some(b)) if a == b
        )
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Derive the conventional generator method name for a type:
/// `next_` plus the lowercased simple name (scalars use their kind name).
pub fn generator_name(key: &TypeKey) -> String {
    match key.scalar_kind() {
        Some(kind) => format!("next_{}", kind.name()),
        None => format!("next_{}", key.simple_name().to_lowercase()),
    }
}
