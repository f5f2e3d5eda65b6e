//! Reusable accessor closures
//!
//! A [`FieldHandle`] is a field resolved and access-checked once, bound to
//! its declaring class and slot. The getter/setter wrappers around it are
//! immutable, cheap to clone, and safe to invoke concurrently; the
//! wrapped instance's own thread-safety is the caller's concern.

use std::sync::Arc;

use crate::error::{MirrorError, MirrorResult};
use crate::kind::{ClassId, Kind};
use crate::object::{Instance, Visibility};
use crate::registry::TypeRegistry;
use crate::value::Value;

/// A pre-resolved, access-checked field binding
#[derive(Debug)]
pub struct FieldHandle {
    /// Class the field is declared on
    pub(crate) declaring: ClassId,
    /// Field name, kept for error reporting
    pub(crate) name: String,
    /// Declared kind
    pub(crate) kind: Kind,
    /// Member visibility, re-checked against the capability on cache hits
    pub(crate) visibility: Visibility,
    /// Resolved slot index
    pub(crate) slot: usize,
    /// Whether the binding targets static storage
    pub(crate) is_static: bool,
    /// Registry the declaring class lives in
    pub(crate) registry: Arc<TypeRegistry>,
}

impl FieldHandle {
    /// Read the bound field
    pub(crate) fn get(&self, target: Option<&Instance>) -> MirrorResult<Value> {
        if self.is_static {
            let class = self.registry.class_or_err(self.declaring)?;
            return class
                .get_static(self.slot)
                .ok_or_else(|| self.missing_slot());
        }
        let instance = self.check_target(target)?;
        instance.get_slot(self.slot).ok_or_else(|| self.missing_slot())
    }

    /// Write the bound field
    ///
    /// Null is accepted for reference kinds only.
    pub(crate) fn set(&self, target: Option<&Instance>, value: Value) -> MirrorResult<()> {
        let compatible = if value.is_null() {
            self.kind.is_reference()
        } else {
            self.registry
                .is_assignable(self.kind.boxed(), value.kind().boxed())
        };
        if !compatible {
            return Err(MirrorError::TypeMismatch {
                expected: self.kind.name(),
                found: value.kind().name(),
            });
        }
        if self.is_static {
            let class = self.registry.class_or_err(self.declaring)?;
            return class
                .set_static(self.slot, value)
                .map_err(|_| self.missing_slot());
        }
        let instance = self.check_target(target)?;
        instance
            .set_slot(self.slot, value)
            .map_err(|_| self.missing_slot())
    }

    fn check_target<'t>(&self, target: Option<&'t Instance>) -> MirrorResult<&'t Instance> {
        let instance = target.ok_or(MirrorError::MissingValue("target instance"))?;
        if !self
            .registry
            .is_subclass_of(instance.class_id(), self.declaring)
        {
            return Err(MirrorError::TypeMismatch {
                expected: Kind::Class(self.declaring).name(),
                found: Kind::Class(instance.class_id()).name(),
            });
        }
        Ok(instance)
    }

    fn missing_slot(&self) -> MirrorError {
        MirrorError::MemberNotFound {
            member: self.name.clone(),
            target: format!("#{}", self.declaring),
        }
    }
}

/// Reusable getter for an instance field
#[derive(Debug, Clone)]
pub struct Getter {
    pub(crate) handle: Arc<FieldHandle>,
}

impl Getter {
    /// Read the field from the given instance
    pub fn apply(&self, target: &Instance) -> MirrorResult<Value> {
        self.handle.get(Some(target))
    }
}

/// Reusable setter for an instance field
#[derive(Debug, Clone)]
pub struct Setter {
    pub(crate) handle: Arc<FieldHandle>,
}

impl Setter {
    /// Write the field on the given instance
    pub fn accept(&self, target: &Instance, value: impl Into<Value>) -> MirrorResult<()> {
        self.handle.set(Some(target), value.into())
    }
}

/// Reusable getter for a static field
#[derive(Debug, Clone)]
pub struct StaticGetter {
    pub(crate) handle: Arc<FieldHandle>,
}

impl StaticGetter {
    /// Read the static field
    pub fn get(&self) -> MirrorResult<Value> {
        self.handle.get(None)
    }
}

/// Reusable setter for a static field
#[derive(Debug, Clone)]
pub struct StaticSetter {
    pub(crate) handle: Arc<FieldHandle>,
}

impl StaticSetter {
    /// Write the static field
    pub fn accept(&self, value: impl Into<Value>) -> MirrorResult<()> {
        self.handle.set(None, value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{ClassBuilder, FieldSpec};

    fn handle_for(
        registry: &Arc<TypeRegistry>,
        declaring: ClassId,
        name: &str,
        kind: Kind,
        slot: usize,
        is_static: bool,
    ) -> Arc<FieldHandle> {
        Arc::new(FieldHandle {
            declaring,
            name: name.to_string(),
            kind,
            visibility: Visibility::Private,
            slot,
            is_static,
            registry: Arc::clone(registry),
        })
    }

    #[test]
    fn test_getter_and_setter_share_storage() {
        let registry = Arc::new(TypeRegistry::new());
        let id = ClassBuilder::new("Holder")
            .add_field(FieldSpec::new("value", Kind::Str).private().initial(""))
            .register(&registry)
            .unwrap();
        let instance = registry.instantiate(id).unwrap();

        let handle = handle_for(&registry, id, "value", Kind::Str, 0, false);
        let getter = Getter {
            handle: Arc::clone(&handle),
        };
        let setter = Setter { handle };

        assert_eq!(getter.apply(&instance).unwrap(), Value::from(""));
        for text in ["a", "b", "c"] {
            setter.accept(&instance, text).unwrap();
            assert_eq!(getter.apply(&instance).unwrap(), Value::from(text));
        }
    }

    #[test]
    fn test_setter_rejects_incompatible_kind() {
        let registry = Arc::new(TypeRegistry::new());
        let id = ClassBuilder::new("Holder")
            .add_field(FieldSpec::new("value", Kind::Str))
            .register(&registry)
            .unwrap();
        let instance = registry.instantiate(id).unwrap();

        let handle = handle_for(&registry, id, "value", Kind::Str, 0, false);
        let setter = Setter { handle };
        let err = setter.accept(&instance, 3i32).unwrap_err();
        assert!(matches!(err, MirrorError::TypeMismatch { .. }));
    }

    #[test]
    fn test_getter_rejects_unrelated_instance() {
        let registry = Arc::new(TypeRegistry::new());
        let holder = ClassBuilder::new("Holder")
            .add_field(FieldSpec::new("value", Kind::Str))
            .register(&registry)
            .unwrap();
        let other = ClassBuilder::new("Other").register(&registry).unwrap();
        let stranger = registry.instantiate(other).unwrap();

        let handle = handle_for(&registry, holder, "value", Kind::Str, 0, false);
        let getter = Getter { handle };
        let err = getter.apply(&stranger).unwrap_err();
        assert!(matches!(err, MirrorError::TypeMismatch { .. }));
    }

    #[test]
    fn test_static_accessors() {
        let registry = Arc::new(TypeRegistry::new());
        let id = ClassBuilder::new("Target")
            .add_field(
                FieldSpec::new("value", Kind::BoxedLong)
                    .private()
                    .as_static()
                    .initial(3i64),
            )
            .register(&registry)
            .unwrap();

        let handle = handle_for(&registry, id, "value", Kind::BoxedLong, 0, true);
        let getter = StaticGetter {
            handle: Arc::clone(&handle),
        };
        let setter = StaticSetter { handle };

        assert_eq!(getter.get().unwrap(), Value::Long(3));
        setter.accept(9i64).unwrap();
        assert_eq!(getter.get().unwrap(), Value::Long(9));
    }
}
