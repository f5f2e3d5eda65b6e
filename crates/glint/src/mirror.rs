//! Mirror façade
//!
//! A [`Mirror`] is an immutable value wrapper pairing a current value (or a
//! class, before construction) with an optional treat-as-ancestor override
//! and the capability token in effect for the chain. Every
//! mutating-looking operation returns a new mirror; the only shared state
//! is the wrapped object itself.
//!
//! ```
//! let mirror = engine.of_class_named("Target", capability)?;
//! let value = mirror
//!     .create(&[])?
//!     .set("name", "updated")?
//!     .call(Kind::Str, "describe", &[])?
//!     .value();
//! ```

use std::fmt;

use crate::access::AccessEngine;
use crate::accessor::{Getter, Setter, StaticGetter, StaticSetter};
use crate::capability::Capability;
use crate::error::{MirrorError, MirrorResult};
use crate::kind::{ClassId, Kind};
use crate::object::Instance;
use crate::value::Value;

/// The two wrapper modes: an object, or a class before construction
#[derive(Debug, Clone)]
enum MirrorState {
    /// Wraps a non-null value
    Object(Value),
    /// Wraps a registered class
    Type(ClassId),
}

/// Immutable chainable wrapper for reflective access
#[derive(Debug, Clone)]
pub struct Mirror {
    engine: AccessEngine,
    state: MirrorState,
    as_type: Option<ClassId>,
    capability: Capability,
}

impl Mirror {
    /// Wrap a value; the value must not be null
    pub fn of(
        engine: AccessEngine,
        value: Value,
        capability: Capability,
    ) -> MirrorResult<Mirror> {
        if value.is_null() {
            return Err(MirrorError::MissingValue("value"));
        }
        Ok(Mirror {
            engine,
            state: MirrorState::Object(value),
            as_type: None,
            capability,
        })
    }

    /// Wrap a registered class for construction and static access
    pub fn of_class(
        engine: AccessEngine,
        class: ClassId,
        capability: Capability,
    ) -> MirrorResult<Mirror> {
        engine.registry().class_or_err(class)?;
        Ok(Mirror {
            engine,
            state: MirrorState::Type(class),
            as_type: None,
            capability,
        })
    }

    // ========================================================================
    // Current value
    // ========================================================================

    /// The wrapped value, when in object mode
    pub fn value(&self) -> Option<&Value> {
        match &self.state {
            MirrorState::Object(value) => Some(value),
            MirrorState::Type(_) => None,
        }
    }

    /// The wrapped class, when in type mode
    pub fn wrapped_class(&self) -> Option<ClassId> {
        match &self.state {
            MirrorState::Object(_) => None,
            MirrorState::Type(class) => Some(*class),
        }
    }

    /// The capability token in effect for this chain
    pub fn capability(&self) -> &Capability {
        &self.capability
    }

    /// The type member resolution runs against: the ancestor override if
    /// present, else the wrapped value's runtime class
    pub fn effective_class(&self) -> MirrorResult<ClassId> {
        if let Some(override_class) = self.as_type {
            return Ok(override_class);
        }
        match &self.state {
            MirrorState::Type(class) => Ok(*class),
            MirrorState::Object(value) => value
                .as_instance()
                .map(Instance::class_id)
                .ok_or_else(|| MirrorError::TypeMismatch {
                    expected: "object instance".to_string(),
                    found: value.kind().name(),
                }),
        }
    }

    fn instance(&self) -> MirrorResult<&Instance> {
        match &self.state {
            MirrorState::Object(value) => {
                value.as_instance().ok_or_else(|| MirrorError::TypeMismatch {
                    expected: "object instance".to_string(),
                    found: value.kind().name(),
                })
            }
            MirrorState::Type(_) => Err(MirrorError::TypeMismatch {
                expected: "object instance".to_string(),
                found: "class".to_string(),
            }),
        }
    }

    fn class_name(&self, id: ClassId) -> String {
        self.engine
            .registry()
            .class(id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| format!("#{id}"))
    }

    // ========================================================================
    // Type override
    // ========================================================================

    /// Treat the wrapped value as one of its ancestor types
    ///
    /// Member resolution then starts from the ancestor, which reaches
    /// members a descendant has shadowed or overridden. Invocation still
    /// targets the real object. Fails immediately if the given class is
    /// not an ancestor of the runtime type.
    pub fn as_type(&self, ancestor: ClassId) -> MirrorResult<Mirror> {
        let runtime = match &self.state {
            MirrorState::Type(class) => *class,
            MirrorState::Object(value) => value
                .as_instance()
                .map(Instance::class_id)
                .ok_or_else(|| MirrorError::TypeMismatch {
                    expected: "object instance".to_string(),
                    found: value.kind().name(),
                })?,
        };
        if !self.engine.registry().is_subclass_of(runtime, ancestor) {
            return Err(MirrorError::TypeMismatch {
                expected: format!("ancestor of `{}`", self.class_name(runtime)),
                found: self.class_name(ancestor),
            });
        }
        Ok(Mirror {
            engine: self.engine.clone(),
            state: self.state.clone(),
            as_type: Some(ancestor),
            capability: self.capability.clone(),
        })
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Invoke the best-matching constructor of the effective type and wrap
    /// the new instance
    pub fn create(&self, args: &[Value]) -> MirrorResult<Mirror> {
        let class = self.effective_class()?;
        let value = self.engine.construct(class, &self.capability, args)?;
        Mirror::of(self.engine.clone(), value, self.capability.clone())
    }

    // ========================================================================
    // Fields
    // ========================================================================

    /// Get the value of a field, identified by its name
    pub fn get(&self, name: &str, kind: Kind) -> MirrorResult<Value> {
        let effective = self.effective_class()?;
        self.engine
            .get_field(self.instance()?, effective, &self.capability, name, kind)
    }

    /// Set the value of a field; returns a new wrapper for the same object
    pub fn set(&self, name: &str, value: impl Into<Value>) -> MirrorResult<Mirror> {
        let effective = self.effective_class()?;
        self.engine.set_field(
            self.instance()?,
            effective,
            &self.capability,
            name,
            value.into(),
        )?;
        Ok(self.clone())
    }

    /// Switch over to a field, wrapping its current value
    ///
    /// A field holding null cannot become a usable mirror, so a null value
    /// is an error here; use [`Mirror::get`] to observe nulls.
    pub fn field(&self, name: &str, kind: Kind) -> MirrorResult<Mirror> {
        let value = self.get(name, kind)?;
        if value.is_null() {
            return Err(MirrorError::NullResult {
                member: name.to_string(),
            });
        }
        Mirror::of(self.engine.clone(), value, self.capability.clone())
    }

    /// Get the value of a static field of the effective type
    pub fn get_static(&self, name: &str, kind: Kind) -> MirrorResult<Value> {
        let effective = self.effective_class()?;
        self.engine
            .get_static_field(effective, &self.capability, name, kind)
    }

    /// Set a static field of the effective type
    pub fn set_static(&self, name: &str, value: impl Into<Value>) -> MirrorResult<Mirror> {
        let effective = self.effective_class()?;
        self.engine
            .set_static_field(effective, &self.capability, name, value.into())?;
        Ok(self.clone())
    }

    /// Switch over to a static field, wrapping its current value
    pub fn static_field(&self, name: &str, kind: Kind) -> MirrorResult<Mirror> {
        let value = self.get_static(name, kind)?;
        if value.is_null() {
            return Err(MirrorError::NullResult {
                member: name.to_string(),
            });
        }
        Mirror::of(self.engine.clone(), value, self.capability.clone())
    }

    // ========================================================================
    // Methods
    // ========================================================================

    /// Run a method, discarding any return value
    pub fn run(&self, name: &str, args: &[Value]) -> MirrorResult<Mirror> {
        let effective = self.effective_class()?;
        self.engine.invoke(
            Some(self.instance()?),
            effective,
            &self.capability,
            name,
            args,
            false,
        )?;
        Ok(self.clone())
    }

    /// Call a method and wrap its return value
    ///
    /// The result must be a non-null value assignable to the requested
    /// kind; a void or null result is an error.
    pub fn call(&self, kind: Kind, name: &str, args: &[Value]) -> MirrorResult<Mirror> {
        let effective = self.effective_class()?;
        let result = self.engine.invoke(
            Some(self.instance()?),
            effective,
            &self.capability,
            name,
            args,
            false,
        )?;
        self.wrap_result(kind, name, result)
    }

    /// Run a static method of the effective type, discarding any return value
    pub fn run_static(&self, name: &str, args: &[Value]) -> MirrorResult<Mirror> {
        let effective = self.effective_class()?;
        self.engine
            .invoke(None, effective, &self.capability, name, args, true)?;
        Ok(self.clone())
    }

    /// Call a static method of the effective type and wrap its return value
    pub fn call_static(&self, kind: Kind, name: &str, args: &[Value]) -> MirrorResult<Mirror> {
        let effective = self.effective_class()?;
        let result = self
            .engine
            .invoke(None, effective, &self.capability, name, args, true)?;
        self.wrap_result(kind, name, result)
    }

    fn wrap_result(
        &self,
        kind: Kind,
        name: &str,
        result: Option<Value>,
    ) -> MirrorResult<Mirror> {
        let value = match result {
            Some(value) if !value.is_null() => value,
            _ => {
                return Err(MirrorError::NullResult {
                    member: name.to_string(),
                })
            }
        };
        if !self
            .engine
            .registry()
            .is_assignable(kind.boxed(), value.kind().boxed())
        {
            return Err(MirrorError::TypeMismatch {
                expected: kind.name(),
                found: value.kind().name(),
            });
        }
        Mirror::of(self.engine.clone(), value, self.capability.clone())
    }

    // ========================================================================
    // Accessor closures
    // ========================================================================

    /// Create a reusable getter bound to a field of the effective type
    pub fn create_getter(&self, name: &str, kind: Kind) -> MirrorResult<Getter> {
        let effective = self.effective_class()?;
        self.engine.getter(effective, &self.capability, name, kind)
    }

    /// Create a reusable setter bound to a field of the effective type
    pub fn create_setter(&self, name: &str, kind: Kind) -> MirrorResult<Setter> {
        let effective = self.effective_class()?;
        self.engine.setter(effective, &self.capability, name, kind)
    }

    /// Create a reusable getter bound to a static field of the effective type
    pub fn create_static_getter(&self, name: &str, kind: Kind) -> MirrorResult<StaticGetter> {
        let effective = self.effective_class()?;
        self.engine
            .static_getter(effective, &self.capability, name, kind)
    }

    /// Create a reusable setter bound to a static field of the effective type
    pub fn create_static_setter(&self, name: &str, kind: Kind) -> MirrorResult<StaticSetter> {
        let effective = self.effective_class()?;
        self.engine
            .static_setter(effective, &self.capability, name, kind)
    }

    /// Hash delegated to the wrapped value (class id in type mode)
    pub fn hash_code(&self) -> u64 {
        match &self.state {
            MirrorState::Object(value) => value.hash_code(),
            MirrorState::Type(class) => *class as u64,
        }
    }
}

impl PartialEq for Mirror {
    fn eq(&self, other: &Self) -> bool {
        match (&self.state, &other.state) {
            (MirrorState::Object(a), MirrorState::Object(b)) => a == b,
            (MirrorState::Type(a), MirrorState::Type(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Mirror {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            MirrorState::Object(value) => write!(f, "{value}"),
            MirrorState::Type(class) => write!(f, "{}", self.class_name(*class)),
        }
    }
}
