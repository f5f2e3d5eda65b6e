//! Glint: fluent reflective accessors
//!
//! This crate provides runtime reflection over a registered dynamic class
//! model:
//! - Class definitions with fields, methods, constructors, visibility,
//!   inheritance, and module membership ([`ClassBuilder`], [`TypeRegistry`])
//! - A chainable [`Mirror`] wrapper for reading and writing non-public
//!   fields, invoking non-public methods, and constructing instances
//! - An explicit [`Capability`] token that controls how far the
//!   access-control bypass may go, scoped per declaring type
//! - Reusable accessor closures ([`Getter`], [`Setter`], [`StaticGetter`],
//!   [`StaticSetter`]) that resolve a member once and bind it for repeated
//!   invocation
//!
//! ## Usage
//!
//! ```
//! use glint::{AccessEngine, Capability, ClassBuilder, FieldSpec, Kind, TypeRegistry};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(TypeRegistry::new());
//! let target = ClassBuilder::new("Target")
//!     .module("server")
//!     .add_field(FieldSpec::new("b", Kind::Char).private().initial('b'))
//!     .register(&registry)?;
//!
//! let engine = Arc::new(AccessEngine::new(registry));
//! let capability = Capability::for_module("server");
//! let b = engine
//!     .of_class(target, capability)?
//!     .create(&[])?
//!     .get("b", Kind::Char)?;
//! ```
//!
//! Member resolution prefers an exact signature match over a "similar"
//! one, where primitive kinds and their boxed forms are interchangeable,
//! and public members of the whole hierarchy over members declared on an
//! ancestor level. An `as_type` override re-targets resolution at an
//! ancestor class to reach shadowed members.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod access;
pub mod accessor;
pub mod builder;
pub mod capability;
pub mod error;
pub mod kind;
pub mod mirror;
pub mod object;
pub mod registry;
pub mod resolve;
pub mod signature;
pub mod value;

pub use access::AccessEngine;
pub use accessor::{Getter, Setter, StaticGetter, StaticSetter};
pub use builder::{ClassBuilder, ConstructorSpec, FieldSpec, MethodSpec};
pub use capability::Capability;
pub use error::{MirrorError, MirrorResult, NativeError};
pub use kind::{ClassId, Kind};
pub use mirror::Mirror;
pub use object::{ClassDef, ConstructorDef, FieldDef, Instance, MethodDef, NativeFn, Visibility};
pub use registry::TypeRegistry;
pub use resolve::{MemberResolver, ResolvedConstructor, ResolvedField, ResolvedMethod};
pub use value::Value;
