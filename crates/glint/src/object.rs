//! Object model: instances and class definitions
//!
//! Classes are metadata records registered in a
//! [`TypeRegistry`](crate::TypeRegistry): declared fields, static fields
//! with their storage, methods and constructors backed by native Rust
//! closures, a parent link, and the module the class belongs to.
//! Instances are cheap-to-clone shared slot vectors tagged with a class id.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::error::NativeError;
use crate::kind::{ClassId, Kind};
use crate::value::Value;

/// Global counter for generating unique object IDs
static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// Generate a new unique object ID
fn generate_object_id() -> u64 {
    NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Native Rust closure implementing a method or constructor body
///
/// The receiver is present for instance methods and constructors, absent
/// for static methods. A `None` result is the "ran successfully with no
/// value" marker for void returns, distinct from `Some(Value::Null)`.
pub type NativeFn =
    Arc<dyn Fn(Option<&Instance>, &[Value]) -> Result<Option<Value>, NativeError> + Send + Sync>;

/// Member visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Accessible from anywhere
    Public,
    /// Accessible from the declaring class and its descendants
    Protected,
    /// Accessible from the declaring class only
    Private,
}

impl Visibility {
    /// Check for public visibility
    pub fn is_public(self) -> bool {
        matches!(self, Visibility::Public)
    }
}

/// Object instance (heap-allocated, shared)
#[derive(Debug, Clone)]
pub struct Instance {
    inner: Arc<InstanceInner>,
}

#[derive(Debug)]
struct InstanceInner {
    /// Unique object ID (assigned on creation, used for equality/hashing)
    object_id: u64,
    /// Class ID (index into the owning registry)
    class_id: ClassId,
    /// Field slot values, including inherited slots
    slots: RwLock<Vec<Value>>,
}

impl Instance {
    /// Create a new instance with null-initialized slots
    pub fn new(class_id: ClassId, field_count: usize) -> Self {
        Self {
            inner: Arc::new(InstanceInner {
                object_id: generate_object_id(),
                class_id,
                slots: RwLock::new(vec![Value::Null; field_count]),
            }),
        }
    }

    /// The unique object ID
    pub fn object_id(&self) -> u64 {
        self.inner.object_id
    }

    /// The class this instance belongs to
    pub fn class_id(&self) -> ClassId {
        self.inner.class_id
    }

    /// Get a field slot value by index
    pub fn get_slot(&self, index: usize) -> Option<Value> {
        self.inner.slots.read().get(index).cloned()
    }

    /// Set a field slot value by index
    pub fn set_slot(&self, index: usize, value: Value) -> Result<(), NativeError> {
        let mut slots = self.inner.slots.write();
        if index < slots.len() {
            slots[index] = value;
            Ok(())
        } else {
            Err(NativeError::Message(format!(
                "slot index {} out of bounds (instance has {} slots)",
                index,
                slots.len()
            )))
        }
    }

    /// Number of field slots, including inherited slots
    pub fn slot_count(&self) -> usize {
        self.inner.slots.read().len()
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.inner.object_id == other.inner.object_id
    }
}

impl Eq for Instance {}

/// Declared field metadata
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Field name
    pub name: String,
    /// Declared kind
    pub kind: Kind,
    /// Member visibility
    pub visibility: Visibility,
    /// Whether the field is static
    pub is_static: bool,
    /// Slot index: absolute instance slot, or index into static storage
    pub slot: usize,
    /// Initial value applied at allocation (instance) or registration (static)
    pub initial: Option<Value>,
}

/// Declared method metadata with its native body
#[derive(Clone)]
pub struct MethodDef {
    /// Method name
    pub name: String,
    /// Declared parameter kinds, in order
    pub param_kinds: Vec<Kind>,
    /// Declared return kind (`Kind::Void` for none)
    pub return_kind: Kind,
    /// Member visibility
    pub visibility: Visibility,
    /// Whether the method is static
    pub is_static: bool,
    /// The registered body
    pub body: NativeFn,
}

impl fmt::Debug for MethodDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDef")
            .field("name", &self.name)
            .field("param_kinds", &self.param_kinds)
            .field("return_kind", &self.return_kind)
            .field("visibility", &self.visibility)
            .field("is_static", &self.is_static)
            .finish_non_exhaustive()
    }
}

/// Declared constructor metadata with its native body
#[derive(Clone)]
pub struct ConstructorDef {
    /// Declared parameter kinds, in order
    pub param_kinds: Vec<Kind>,
    /// Member visibility
    pub visibility: Visibility,
    /// The registered body; receives the freshly allocated instance
    pub body: NativeFn,
}

impl fmt::Debug for ConstructorDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorDef")
            .field("param_kinds", &self.param_kinds)
            .field("visibility", &self.visibility)
            .finish_non_exhaustive()
    }
}

/// Class definition metadata
#[derive(Debug)]
pub struct ClassDef {
    /// Class ID (unique within the owning registry)
    pub id: ClassId,
    /// Class name
    pub name: String,
    /// Name of the module this class belongs to
    pub module: String,
    /// Whether foreign modules may escalate into this class
    pub open: bool,
    /// Parent class ID (None for root classes)
    pub parent_id: Option<ClassId>,
    /// Number of instance slots, including inherited
    pub field_count: usize,
    /// Instance fields declared directly on this class
    pub fields: Vec<FieldDef>,
    /// Static fields declared directly on this class
    pub static_fields: Vec<FieldDef>,
    /// Static field storage (class-level, shared across instances)
    pub statics: RwLock<Vec<Value>>,
    /// Methods declared directly on this class
    pub methods: Vec<Arc<MethodDef>>,
    /// Constructors declared on this class
    pub constructors: Vec<Arc<ConstructorDef>>,
    /// Instance field name to declaration index
    field_index: FxHashMap<String, usize>,
    /// Static field name to declaration index
    static_index: FxHashMap<String, usize>,
}

impl ClassDef {
    /// Assemble a class definition; used by the builder
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: ClassId,
        name: String,
        module: String,
        open: bool,
        parent_id: Option<ClassId>,
        field_count: usize,
        fields: Vec<FieldDef>,
        static_fields: Vec<FieldDef>,
        methods: Vec<Arc<MethodDef>>,
        constructors: Vec<Arc<ConstructorDef>>,
    ) -> Self {
        let field_index = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.clone(), i))
            .collect();
        let static_index = static_fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.clone(), i))
            .collect();
        let statics = static_fields
            .iter()
            .map(|f| f.initial.clone().unwrap_or(Value::Null))
            .collect();
        Self {
            id,
            name,
            module,
            open,
            parent_id,
            field_count,
            fields,
            static_fields,
            statics: RwLock::new(statics),
            methods,
            constructors,
            field_index,
            static_index,
        }
    }

    /// Look up an instance field declared directly on this class
    pub fn declared_field(&self, name: &str) -> Option<&FieldDef> {
        self.field_index.get(name).map(|&i| &self.fields[i])
    }

    /// Look up a static field declared directly on this class
    pub fn declared_static_field(&self, name: &str) -> Option<&FieldDef> {
        self.static_index.get(name).map(|&i| &self.static_fields[i])
    }

    /// Get a static field value by storage index
    pub fn get_static(&self, index: usize) -> Option<Value> {
        self.statics.read().get(index).cloned()
    }

    /// Set a static field value by storage index
    pub fn set_static(&self, index: usize, value: Value) -> Result<(), NativeError> {
        let mut statics = self.statics.write();
        if index < statics.len() {
            statics[index] = value;
            Ok(())
        } else {
            Err(NativeError::Message(format!(
                "static index {} out of bounds (class `{}` has {} static fields)",
                index,
                self.name,
                statics.len()
            )))
        }
    }
}
