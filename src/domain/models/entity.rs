use std::any::TypeId;
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Runtime descriptor for a schema-bound record type.
///
/// Identity is the Rust type (`TypeId`); the display name feeds token
/// derivation (`UserRepository` for an entity named `User`).
#[derive(Debug, Clone)]
pub struct EntityType {
    name: Cow<'static, str>,
    id: TypeId,
}

impl EntityType {
    /// Descriptor for `E`, named after the last path segment of the type name.
    pub fn of<E: 'static>() -> Self {
        let full = std::any::type_name::<E>();
        let name = full.rsplit("::").next().unwrap_or(full);
        Self {
            name: Cow::Borrowed(name),
            id: TypeId::of::<E>(),
        }
    }

    /// Descriptor for `E` with an explicit display name.
    pub fn named<E: 'static>(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            id: TypeId::of::<E>(),
        }
    }

    /// Display name used in accessor tokens
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type identity used for de-duplication
    pub fn type_id(&self) -> TypeId {
        self.id
    }
}

impl PartialEq for EntityType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EntityType {}

impl Hash for EntityType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
