//! Class definition builders
//!
//! Classes are assembled from chained specs and registered into a
//! [`TypeRegistry`]. Slot layout is computed at registration time:
//! declared instance fields take the slots after the parent's, so a
//! shadowing redeclaration keeps its own storage alongside the ancestor's.

use std::sync::Arc;

use crate::error::{MirrorError, MirrorResult, NativeError};
use crate::kind::{ClassId, Kind};
use crate::object::{ClassDef, ConstructorDef, FieldDef, Instance, MethodDef, NativeFn, Visibility};
use crate::registry::TypeRegistry;
use crate::value::Value;

/// Specification for a field to be declared on a class
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    kind: Kind,
    visibility: Visibility,
    is_static: bool,
    initial: Option<Value>,
}

impl FieldSpec {
    /// Create a public instance field spec
    pub fn new(name: &str, kind: Kind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            visibility: Visibility::Public,
            is_static: false,
            initial: None,
        }
    }

    /// Mark as private
    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    /// Mark as protected
    pub fn protected(mut self) -> Self {
        self.visibility = Visibility::Protected;
        self
    }

    /// Mark as static
    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Set the initial value
    pub fn initial(mut self, value: impl Into<Value>) -> Self {
        self.initial = Some(value.into());
        self
    }
}

/// Specification for a method to be declared on a class
#[derive(Clone)]
pub struct MethodSpec {
    name: String,
    param_kinds: Vec<Kind>,
    return_kind: Kind,
    visibility: Visibility,
    is_static: bool,
    body: NativeFn,
}

impl MethodSpec {
    /// Create a public zero-arg void method spec with the given body
    pub fn new<F>(name: &str, body: F) -> Self
    where
        F: Fn(Option<&Instance>, &[Value]) -> Result<Option<Value>, NativeError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.to_string(),
            param_kinds: Vec::new(),
            return_kind: Kind::Void,
            visibility: Visibility::Public,
            is_static: false,
            body: Arc::new(body),
        }
    }

    /// Set the parameter kinds
    pub fn params(mut self, kinds: &[Kind]) -> Self {
        self.param_kinds = kinds.to_vec();
        self
    }

    /// Set the return kind
    pub fn returns(mut self, kind: Kind) -> Self {
        self.return_kind = kind;
        self
    }

    /// Mark as private
    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    /// Mark as protected
    pub fn protected(mut self) -> Self {
        self.visibility = Visibility::Protected;
        self
    }

    /// Mark as static
    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }
}

/// Specification for a constructor to be declared on a class
#[derive(Clone)]
pub struct ConstructorSpec {
    param_kinds: Vec<Kind>,
    visibility: Visibility,
    body: NativeFn,
}

impl ConstructorSpec {
    /// Create a public zero-arg constructor spec with the given body
    ///
    /// The body receives the freshly allocated instance as its receiver;
    /// declared initial field values are already applied.
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(Option<&Instance>, &[Value]) -> Result<Option<Value>, NativeError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            param_kinds: Vec::new(),
            visibility: Visibility::Public,
            body: Arc::new(body),
        }
    }

    /// Set the parameter kinds
    pub fn params(mut self, kinds: &[Kind]) -> Self {
        self.param_kinds = kinds.to_vec();
        self
    }

    /// Mark as private
    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }
}

/// Builder for registering classes
pub struct ClassBuilder {
    name: String,
    module: String,
    open: bool,
    parent: Option<ClassId>,
    fields: Vec<FieldSpec>,
    methods: Vec<MethodSpec>,
    constructors: Vec<ConstructorSpec>,
}

impl ClassBuilder {
    /// Start a class definition in the default `main` module
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            module: "main".to_string(),
            open: false,
            parent: None,
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
        }
    }

    /// Set the owning module
    pub fn module(mut self, module: &str) -> Self {
        self.module = module.to_string();
        self
    }

    /// Allow foreign modules to escalate into this class
    pub fn open(mut self) -> Self {
        self.open = true;
        self
    }

    /// Set the parent class
    pub fn extends(mut self, parent: ClassId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Declare a field
    pub fn add_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Declare a method
    pub fn add_method(mut self, method: MethodSpec) -> Self {
        self.methods.push(method);
        self
    }

    /// Declare a constructor
    pub fn add_constructor(mut self, constructor: ConstructorSpec) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// Compute the slot layout and register the class
    ///
    /// A class with no declared constructor gets an implicit public
    /// zero-arg constructor whose body does nothing.
    pub fn register(self, registry: &TypeRegistry) -> MirrorResult<ClassId> {
        let parent_field_count = match self.parent {
            Some(parent_id) => {
                registry
                    .class(parent_id)
                    .ok_or_else(|| {
                        MirrorError::Definition(format!(
                            "parent class #{} of `{}` is not registered",
                            parent_id, self.name
                        ))
                    })?
                    .field_count
            }
            None => 0,
        };

        let mut fields = Vec::new();
        let mut static_fields = Vec::new();
        for spec in self.fields {
            let same_space = if spec.is_static {
                &static_fields
            } else {
                &fields
            };
            if same_space.iter().any(|f: &FieldDef| f.name == spec.name) {
                return Err(MirrorError::Definition(format!(
                    "duplicate field `{}` on `{}`",
                    spec.name, self.name
                )));
            }
            let slot = if spec.is_static {
                static_fields.len()
            } else {
                parent_field_count + fields.len()
            };
            let def = FieldDef {
                name: spec.name,
                kind: spec.kind,
                visibility: spec.visibility,
                is_static: spec.is_static,
                slot,
                initial: spec.initial,
            };
            if def.is_static {
                static_fields.push(def);
            } else {
                fields.push(def);
            }
        }
        let field_count = parent_field_count + fields.len();

        let methods = self
            .methods
            .into_iter()
            .map(|spec| {
                Arc::new(MethodDef {
                    name: spec.name,
                    param_kinds: spec.param_kinds,
                    return_kind: spec.return_kind,
                    visibility: spec.visibility,
                    is_static: spec.is_static,
                    body: spec.body,
                })
            })
            .collect();

        let mut constructors: Vec<Arc<ConstructorDef>> = self
            .constructors
            .into_iter()
            .map(|spec| {
                Arc::new(ConstructorDef {
                    param_kinds: spec.param_kinds,
                    visibility: spec.visibility,
                    body: spec.body,
                })
            })
            .collect();
        if constructors.is_empty() {
            constructors.push(Arc::new(ConstructorDef {
                param_kinds: Vec::new(),
                visibility: Visibility::Public,
                body: Arc::new(|_, _| Ok(None)),
            }));
        }

        let id = registry.allocate_id();
        registry.register(ClassDef::new(
            id,
            self.name,
            self.module,
            self.open,
            self.parent,
            field_count,
            fields,
            static_fields,
            methods,
            constructors,
        ))
    }
}
