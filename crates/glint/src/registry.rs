//! Class registry and hierarchy queries
//!
//! The registry owns every [`ClassDef`] and answers the hierarchy and
//! assignability questions the resolver and matcher depend on. It is an
//! explicit, `Arc`-shared object created by the caller; the crate keeps
//! no process-wide registry.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use crate::error::{MirrorError, MirrorResult};
use crate::kind::{ClassId, Kind};
use crate::object::{ClassDef, Instance};

/// Registry of class definitions
#[derive(Debug, Default)]
pub struct TypeRegistry {
    /// Definitions indexed by class ID
    classes: DashMap<ClassId, Arc<ClassDef>>,
    /// Class name to ID
    by_name: DashMap<String, ClassId>,
    /// Next class ID to allocate
    next_id: AtomicUsize,
}

impl TypeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next class ID
    pub(crate) fn allocate_id(&self) -> ClassId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Register a fully assembled class definition
    ///
    /// Fails if the name is already taken or the parent is not registered.
    pub fn register(&self, class: ClassDef) -> MirrorResult<ClassId> {
        if self.by_name.contains_key(&class.name) {
            return Err(MirrorError::Definition(format!(
                "class `{}` is already registered",
                class.name
            )));
        }
        if let Some(parent_id) = class.parent_id {
            if !self.classes.contains_key(&parent_id) {
                return Err(MirrorError::Definition(format!(
                    "parent class #{} of `{}` is not registered",
                    parent_id, class.name
                )));
            }
        }
        let id = class.id;
        self.by_name.insert(class.name.clone(), id);
        self.classes.insert(id, Arc::new(class));
        Ok(id)
    }

    /// Get a class by ID
    pub fn class(&self, id: ClassId) -> Option<Arc<ClassDef>> {
        self.classes.get(&id).map(|entry| Arc::clone(&entry))
    }

    /// Get a class by ID, or fail with `UnknownClass`
    pub fn class_or_err(&self, id: ClassId) -> MirrorResult<Arc<ClassDef>> {
        self.class(id)
            .ok_or_else(|| MirrorError::UnknownClass(format!("#{id}")))
    }

    /// Get a class by name
    pub fn class_named(&self, name: &str) -> Option<Arc<ClassDef>> {
        self.by_name.get(name).and_then(|id| self.class(*id))
    }

    /// Get a class ID by name
    pub fn id_of(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).map(|id| *id)
    }

    /// Number of registered classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Check if a class is the same as, or a descendant of, another class
    pub fn is_subclass_of(&self, sub: ClassId, ancestor: ClassId) -> bool {
        if sub == ancestor {
            return true;
        }
        let mut current = sub;
        while let Some(class) = self.class(current) {
            match class.parent_id {
                Some(parent_id) if parent_id == ancestor => return true,
                Some(parent_id) => current = parent_id,
                None => break,
            }
        }
        false
    }

    /// The inheritance chain for a class, from the class itself to the root
    pub fn hierarchy(&self, id: ClassId) -> Vec<Arc<ClassDef>> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(class_id) = current {
            match self.class(class_id) {
                Some(class) => {
                    current = class.parent_id;
                    chain.push(class);
                }
                None => break,
            }
        }
        chain
    }

    /// Check whether a value of kind `from` is acceptable where `to` is declared
    ///
    /// Primitive and boxed forms compare after boxing both sides; class
    /// kinds consult the hierarchy.
    pub fn is_assignable(&self, to: Kind, from: Kind) -> bool {
        match (to.boxed(), from.boxed()) {
            (Kind::Class(to_id), Kind::Class(from_id)) => self.is_subclass_of(from_id, to_id),
            (a, b) => a == b,
        }
    }

    /// Allocate an instance of a class with declared initial field values
    ///
    /// Initial values apply root-first so a shadowing redeclaration wins
    /// its own slot. Constructor bodies run afterwards, in the engine.
    pub fn instantiate(&self, id: ClassId) -> MirrorResult<Instance> {
        let class = self.class_or_err(id)?;
        let instance = Instance::new(id, class.field_count);
        let mut chain = self.hierarchy(id);
        chain.reverse();
        for level in chain {
            for field in &level.fields {
                if let Some(initial) = &field.initial {
                    // Slot indices are absolute; bounds were fixed at registration
                    let _ = instance.set_slot(field.slot, initial.clone());
                }
            }
        }
        Ok(instance)
    }
}
