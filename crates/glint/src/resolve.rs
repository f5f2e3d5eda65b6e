//! Member resolution
//!
//! One parameterized walk serves fields, methods, and constructors: four
//! passes in fixed priority order. Exact signature against public members
//! of the whole hierarchy, exact against declared members per ancestor
//! level, then the same two scans with similar (wrapper-coercible)
//! matching. The first hit wins; there is no best-match scoring.

use std::sync::Arc;

use crate::error::{MirrorError, MirrorResult};
use crate::kind::{ClassId, Kind};
use crate::object::{ClassDef, ConstructorDef, FieldDef, MethodDef};
use crate::registry::TypeRegistry;
use crate::signature::{matches_exact, matches_similar};

/// A field located by the resolver
#[derive(Debug, Clone)]
pub struct ResolvedField {
    /// Class the field is declared on
    pub declaring: ClassId,
    /// The field declaration
    pub field: FieldDef,
}

/// A method located by the resolver
#[derive(Debug, Clone)]
pub struct ResolvedMethod {
    /// Class the method is declared on
    pub declaring: ClassId,
    /// The method declaration
    pub method: Arc<MethodDef>,
}

/// A constructor located by the resolver
#[derive(Debug, Clone)]
pub struct ResolvedConstructor {
    /// Class the constructor is declared on
    pub declaring: ClassId,
    /// The constructor declaration
    pub constructor: Arc<ConstructorDef>,
}

/// Signature comparison mode for a resolution pass
#[derive(Debug, Clone, Copy)]
enum MatchMode {
    Exact,
    Similar,
}

/// Member scope for a resolution pass
#[derive(Debug, Clone, Copy)]
enum Scope {
    PublicOnly,
    Declared,
}

/// The fixed pass order: exact before similar, public before declared
const PASSES: [(MatchMode, Scope); 4] = [
    (MatchMode::Exact, Scope::PublicOnly),
    (MatchMode::Exact, Scope::Declared),
    (MatchMode::Similar, Scope::PublicOnly),
    (MatchMode::Similar, Scope::Declared),
];

/// Walks a type hierarchy to locate fields, methods, and constructors
pub struct MemberResolver<'a> {
    registry: &'a TypeRegistry,
}

impl<'a> MemberResolver<'a> {
    /// Create a resolver over a registry
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self { registry }
    }

    /// Locate a method starting from the effective type
    ///
    /// `statics_only` restricts the search to static methods, for the
    /// static invocation entry points.
    pub fn find_method(
        &self,
        effective: ClassId,
        name: &str,
        args: &[Kind],
        statics_only: bool,
    ) -> MirrorResult<ResolvedMethod> {
        let chain = self.chain(effective)?;
        for (mode, scope) in PASSES {
            for class in &chain {
                for method in &class.methods {
                    if statics_only && !method.is_static {
                        continue;
                    }
                    if method.name != name {
                        continue;
                    }
                    if matches!(scope, Scope::PublicOnly) && !method.visibility.is_public() {
                        continue;
                    }
                    if self.signature_matches(mode, &method.param_kinds, args) {
                        return Ok(ResolvedMethod {
                            declaring: class.id,
                            method: Arc::clone(method),
                        });
                    }
                }
            }
        }
        Err(self.not_found(effective, &signature_label(name, args)))
    }

    /// Locate a field starting from the effective type
    pub fn find_field(
        &self,
        effective: ClassId,
        name: &str,
        kind: Kind,
        statics: bool,
    ) -> MirrorResult<ResolvedField> {
        let chain = self.chain(effective)?;
        for (mode, scope) in PASSES {
            for class in &chain {
                let field = if statics {
                    class.declared_static_field(name)
                } else {
                    class.declared_field(name)
                };
                let Some(field) = field else { continue };
                if matches!(scope, Scope::PublicOnly) && !field.visibility.is_public() {
                    continue;
                }
                if self.signature_matches(mode, &[field.kind], &[kind]) {
                    return Ok(ResolvedField {
                        declaring: class.id,
                        field: field.clone(),
                    });
                }
            }
        }
        Err(self.not_found(effective, name))
    }

    /// Locate a constructor on the declaring type only
    ///
    /// Constructors are not inherited, so there is no hierarchy walk:
    /// an exact pass over the type's own constructors, then a similar one.
    pub fn find_constructor(
        &self,
        class_id: ClassId,
        args: &[Kind],
    ) -> MirrorResult<ResolvedConstructor> {
        let class = self.registry.class_or_err(class_id)?;
        for mode in [MatchMode::Exact, MatchMode::Similar] {
            for constructor in &class.constructors {
                if self.signature_matches(mode, &constructor.param_kinds, args) {
                    return Ok(ResolvedConstructor {
                        declaring: class.id,
                        constructor: Arc::clone(constructor),
                    });
                }
            }
        }
        Err(self.not_found(class_id, &signature_label("<init>", args)))
    }

    fn signature_matches(&self, mode: MatchMode, declared: &[Kind], args: &[Kind]) -> bool {
        match mode {
            MatchMode::Exact => matches_exact(declared, args),
            MatchMode::Similar => matches_similar(self.registry, declared, args),
        }
    }

    fn chain(&self, effective: ClassId) -> MirrorResult<Vec<Arc<ClassDef>>> {
        self.registry.class_or_err(effective)?;
        Ok(self.registry.hierarchy(effective))
    }

    fn not_found(&self, effective: ClassId, member: &str) -> MirrorError {
        let target = self
            .registry
            .class(effective)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| format!("#{effective}"));
        MirrorError::MemberNotFound {
            member: member.to_string(),
            target,
        }
    }
}

fn signature_label(name: &str, args: &[Kind]) -> String {
    let kinds: Vec<String> = args.iter().map(|k| k.name()).collect();
    format!("{}({})", name, kinds.join(", "))
}
