//! Access engine
//!
//! The engine binds the resolver and the capability token together: every
//! mirror operation funnels through here. Resolution finds the member
//! against the effective type, escalation runs only when the member is
//! non-public, and the result is either an immediate invocation or a
//! cached [`FieldHandle`] wrapped in a reusable accessor closure.
//!
//! The accessor cache lives on the engine, not in a process-wide static:
//! dropping the engine drops every cached handle with it. Capability
//! checks re-run on every cache hit, so a cached handle never widens
//! access for a weaker token.

use std::sync::Arc;

use dashmap::DashMap;

use crate::accessor::{FieldHandle, Getter, Setter, StaticGetter, StaticSetter};
use crate::capability::Capability;
use crate::error::{MirrorError, MirrorResult};
use crate::kind::{ClassId, Kind};
use crate::mirror::Mirror;
use crate::object::{Instance, Visibility};
use crate::registry::TypeRegistry;
use crate::resolve::MemberResolver;
use crate::signature::arg_kinds;
use crate::value::Value;

/// Cache key for resolved field handles
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct AccessorKey {
    class: ClassId,
    name: String,
    kind: Kind,
    is_static: bool,
}

/// Orchestrates member resolution, capability checks, and invocation
///
/// The engine is a cheap-to-clone handle; clones share the registry and
/// the accessor cache.
#[derive(Debug, Clone)]
pub struct AccessEngine {
    registry: Arc<TypeRegistry>,
    cache: Arc<DashMap<AccessorKey, Arc<FieldHandle>>>,
}

impl AccessEngine {
    /// Create an engine over a shared registry
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self {
            registry,
            cache: Arc::new(DashMap::new()),
        }
    }

    /// The registry this engine resolves against
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// Wrap a value in an object-mode mirror
    pub fn of(&self, value: impl Into<Value>, capability: Capability) -> MirrorResult<Mirror> {
        Mirror::of(self.clone(), value.into(), capability)
    }

    /// Wrap a registered class in a type-mode mirror
    pub fn of_class(&self, class: ClassId, capability: Capability) -> MirrorResult<Mirror> {
        Mirror::of_class(self.clone(), class, capability)
    }

    /// Wrap a registered class, looked up by name, in a type-mode mirror
    pub fn of_class_named(&self, name: &str, capability: Capability) -> MirrorResult<Mirror> {
        let class = self
            .registry
            .id_of(name)
            .ok_or_else(|| MirrorError::UnknownClass(name.to_string()))?;
        Mirror::of_class(self.clone(), class, capability)
    }

    /// Escalate for a resolved member; public members pass through
    fn escalate(
        &self,
        capability: &Capability,
        visibility: Visibility,
        declaring: ClassId,
    ) -> MirrorResult<()> {
        if visibility.is_public() {
            return Ok(());
        }
        let class = self.registry.class_or_err(declaring)?;
        capability.scoped_to(&class).map(|_| ())
    }

    /// Check that the receiver really is an instance of the declaring class
    fn check_receiver(&self, receiver: &Instance, declaring: ClassId) -> MirrorResult<()> {
        if self.registry.is_subclass_of(receiver.class_id(), declaring) {
            Ok(())
        } else {
            Err(MirrorError::TypeMismatch {
                expected: Kind::Class(declaring).name(),
                found: Kind::Class(receiver.class_id()).name(),
            })
        }
    }

    /// Read an instance field resolved against the effective type
    pub fn get_field(
        &self,
        receiver: &Instance,
        effective: ClassId,
        capability: &Capability,
        name: &str,
        kind: Kind,
    ) -> MirrorResult<Value> {
        let resolved =
            MemberResolver::new(&self.registry).find_field(effective, name, kind, false)?;
        self.escalate(capability, resolved.field.visibility, resolved.declaring)?;
        self.check_receiver(receiver, resolved.declaring)?;
        receiver
            .get_slot(resolved.field.slot)
            .ok_or_else(|| MirrorError::MemberNotFound {
                member: name.to_string(),
                target: Kind::Class(effective).name(),
            })
    }

    /// Write an instance field; the desired kind comes from the value
    pub fn set_field(
        &self,
        receiver: &Instance,
        effective: ClassId,
        capability: &Capability,
        name: &str,
        value: Value,
    ) -> MirrorResult<()> {
        let resolved =
            MemberResolver::new(&self.registry).find_field(effective, name, value.kind(), false)?;
        self.escalate(capability, resolved.field.visibility, resolved.declaring)?;
        self.check_receiver(receiver, resolved.declaring)?;
        receiver
            .set_slot(resolved.field.slot, value)
            .map_err(|source| MirrorError::Invocation {
                member: name.to_string(),
                source,
            })
    }

    /// Read a static field resolved against the effective type
    pub fn get_static_field(
        &self,
        effective: ClassId,
        capability: &Capability,
        name: &str,
        kind: Kind,
    ) -> MirrorResult<Value> {
        let resolved =
            MemberResolver::new(&self.registry).find_field(effective, name, kind, true)?;
        self.escalate(capability, resolved.field.visibility, resolved.declaring)?;
        let class = self.registry.class_or_err(resolved.declaring)?;
        class
            .get_static(resolved.field.slot)
            .ok_or_else(|| MirrorError::MemberNotFound {
                member: name.to_string(),
                target: class.name.clone(),
            })
    }

    /// Write a static field; the desired kind comes from the value
    pub fn set_static_field(
        &self,
        effective: ClassId,
        capability: &Capability,
        name: &str,
        value: Value,
    ) -> MirrorResult<()> {
        let resolved =
            MemberResolver::new(&self.registry).find_field(effective, name, value.kind(), true)?;
        self.escalate(capability, resolved.field.visibility, resolved.declaring)?;
        let class = self.registry.class_or_err(resolved.declaring)?;
        class
            .set_static(resolved.field.slot, value)
            .map_err(|source| MirrorError::Invocation {
                member: name.to_string(),
                source,
            })
    }

    /// Resolve and invoke a method
    ///
    /// The receiver binds for instance methods and is dropped for static
    /// ones. A `None` result is the no-value marker for void returns.
    pub fn invoke(
        &self,
        receiver: Option<&Instance>,
        effective: ClassId,
        capability: &Capability,
        name: &str,
        args: &[Value],
        statics_only: bool,
    ) -> MirrorResult<Option<Value>> {
        let kinds = arg_kinds(args);
        let resolved =
            MemberResolver::new(&self.registry).find_method(effective, name, &kinds, statics_only)?;
        self.escalate(capability, resolved.method.visibility, resolved.declaring)?;

        let bound = if resolved.method.is_static {
            None
        } else {
            let instance = receiver.ok_or(MirrorError::MissingValue("receiver instance"))?;
            self.check_receiver(instance, resolved.declaring)?;
            Some(instance)
        };
        (resolved.method.body)(bound, args).map_err(|source| MirrorError::Invocation {
            member: name.to_string(),
            source,
        })
    }

    /// Resolve the best-matching constructor and build an instance
    ///
    /// Declared initial field values apply before the constructor body runs.
    pub fn construct(
        &self,
        class_id: ClassId,
        capability: &Capability,
        args: &[Value],
    ) -> MirrorResult<Value> {
        let kinds = arg_kinds(args);
        let resolved = MemberResolver::new(&self.registry).find_constructor(class_id, &kinds)?;
        self.escalate(
            capability,
            resolved.constructor.visibility,
            resolved.declaring,
        )?;
        let instance = self.registry.instantiate(class_id)?;
        (resolved.constructor.body)(Some(&instance), args).map_err(|source| {
            MirrorError::Invocation {
                member: "<init>".to_string(),
                source,
            }
        })?;
        Ok(Value::Object(instance))
    }

    /// Resolve a field once and return the shared handle, checking the
    /// capability on every call, cached or not
    fn field_handle(
        &self,
        effective: ClassId,
        capability: &Capability,
        name: &str,
        kind: Kind,
        is_static: bool,
    ) -> MirrorResult<Arc<FieldHandle>> {
        let key = AccessorKey {
            class: effective,
            name: name.to_string(),
            kind,
            is_static,
        };
        if let Some(handle) = self.cache.get(&key) {
            let handle = Arc::clone(&handle);
            self.escalate(capability, handle.visibility, handle.declaring)?;
            return Ok(handle);
        }

        let resolved =
            MemberResolver::new(&self.registry).find_field(effective, name, kind, is_static)?;
        self.escalate(capability, resolved.field.visibility, resolved.declaring)?;
        let handle = Arc::new(FieldHandle {
            declaring: resolved.declaring,
            name: resolved.field.name,
            kind: resolved.field.kind,
            visibility: resolved.field.visibility,
            slot: resolved.field.slot,
            is_static,
            registry: Arc::clone(&self.registry),
        });
        self.cache.insert(key, Arc::clone(&handle));
        Ok(handle)
    }

    /// Create a reusable getter for an instance field
    pub fn getter(
        &self,
        effective: ClassId,
        capability: &Capability,
        name: &str,
        kind: Kind,
    ) -> MirrorResult<Getter> {
        Ok(Getter {
            handle: self.field_handle(effective, capability, name, kind, false)?,
        })
    }

    /// Create a reusable setter for an instance field
    pub fn setter(
        &self,
        effective: ClassId,
        capability: &Capability,
        name: &str,
        kind: Kind,
    ) -> MirrorResult<Setter> {
        Ok(Setter {
            handle: self.field_handle(effective, capability, name, kind, false)?,
        })
    }

    /// Create a reusable getter for a static field
    pub fn static_getter(
        &self,
        effective: ClassId,
        capability: &Capability,
        name: &str,
        kind: Kind,
    ) -> MirrorResult<StaticGetter> {
        Ok(StaticGetter {
            handle: self.field_handle(effective, capability, name, kind, true)?,
        })
    }

    /// Create a reusable setter for a static field
    pub fn static_setter(
        &self,
        effective: ClassId,
        capability: &Capability,
        name: &str,
        kind: Kind,
    ) -> MirrorResult<StaticSetter> {
        Ok(StaticSetter {
            handle: self.field_handle(effective, capability, name, kind, true)?,
        })
    }

    /// Number of cached field handles
    pub fn cached_handles(&self) -> usize {
        self.cache.len()
    }
}
