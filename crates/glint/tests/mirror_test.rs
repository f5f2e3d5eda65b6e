//! Integration tests for object-mode mirrors
//!
//! Field access, method invocation, construction, and the wrapper's
//! value-delegating equality and display.

use std::sync::Arc;

use glint::{
    AccessEngine, Capability, ClassBuilder, ConstructorSpec, FieldSpec, Kind, MethodSpec,
    MirrorError, NativeError, TypeRegistry, Value,
};

fn engine() -> AccessEngine {
    let registry = Arc::new(TypeRegistry::new());

    ClassBuilder::new("GetterSetterTarget")
        .add_field(FieldSpec::new("value", Kind::Str).private().initial(""))
        .add_constructor(ConstructorSpec::new(|_, _| Ok(None)))
        .add_constructor(
            ConstructorSpec::new(|instance, args| {
                instance.unwrap().set_slot(0, args[0].clone())?;
                Ok(None)
            })
            .params(&[Kind::Str]),
        )
        .register(&registry)
        .unwrap();

    ClassBuilder::new("RunTarget")
        .add_method(
            MethodSpec::new("run", |_, args| {
                if args[0].is_null() {
                    Err(NativeError::NullPointer)
                } else {
                    Ok(None)
                }
            })
            .params(&[Kind::Str]),
        )
        .register(&registry)
        .unwrap();

    ClassBuilder::new("CallTarget")
        .add_method(
            MethodSpec::new("call", |_, _| Ok(Some(Value::from("callable"))))
                .returns(Kind::Str)
                .private(),
        )
        .register(&registry)
        .unwrap();

    AccessEngine::new(registry)
}

fn capability() -> Capability {
    Capability::for_module("main")
}

// ============================================================================
// Entry Points
// ============================================================================

#[test]
fn test_of_rejects_null_value() {
    let engine = engine();
    let err = engine.of(Value::Null, capability()).unwrap_err();
    assert!(matches!(err, MirrorError::MissingValue(_)));
}

#[test]
fn test_of_wraps_any_non_null_value() {
    let engine = engine();
    let mirror = engine.of(Value::Int(42), capability()).unwrap();
    assert_eq!(mirror.value(), Some(&Value::Int(42)));
}

#[test]
fn test_of_class_named_rejects_unknown() {
    let engine = engine();
    let err = engine
        .of_class_named("Nowhere", capability())
        .unwrap_err();
    assert!(matches!(err, MirrorError::UnknownClass(_)));
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_create_with_matching_constructors() {
    let engine = engine();
    let mirror = engine
        .of_class_named("GetterSetterTarget", capability())
        .unwrap();

    let empty = mirror.create(&[]).unwrap();
    assert_eq!(empty.get("value", Kind::Str).unwrap(), Value::from(""));

    let filled = mirror.create(&[Value::from("seed")]).unwrap();
    assert_eq!(filled.get("value", Kind::Str).unwrap(), Value::from("seed"));
}

#[test]
fn test_create_with_wrong_arity_fails() {
    let engine = engine();
    let mirror = engine.of_class_named("RunTarget", capability()).unwrap();

    assert!(mirror.create(&[]).is_ok());
    let err = mirror.create(&[Value::Int(1)]).unwrap_err();
    assert!(matches!(err, MirrorError::MemberNotFound { .. }));
}

#[test]
fn test_create_from_object_mode_builds_a_sibling() {
    let engine = engine();
    let first = engine
        .of_class_named("GetterSetterTarget", capability())
        .unwrap()
        .create(&[Value::from("a")])
        .unwrap();

    let second = first.create(&[Value::from("b")]).unwrap();
    assert_eq!(second.get("value", Kind::Str).unwrap(), Value::from("b"));
    assert_ne!(first, second);
}

// ============================================================================
// Fields
// ============================================================================

#[test]
fn test_set_then_get_round_trips() {
    let engine = engine();
    let mirror = engine
        .of_class_named("GetterSetterTarget", capability())
        .unwrap()
        .create(&[])
        .unwrap();

    for text in ["a", "b", "c"] {
        let after = mirror.set("value", text).unwrap();
        assert_eq!(after.get("value", Kind::Str).unwrap(), Value::from(text));
        // The returned wrapper has the same effective identity
        assert_eq!(mirror, after);
    }
}

#[test]
fn test_field_wraps_the_current_value() {
    let engine = engine();
    let mirror = engine
        .of_class_named("GetterSetterTarget", capability())
        .unwrap()
        .create(&[Value::from("field")])
        .unwrap();

    let field = mirror.field("value", Kind::Str).unwrap();
    assert_eq!(field.value(), Some(&Value::from("field")));
    assert_eq!(field.to_string(), "field");
}

#[test]
fn test_field_rejects_null_values() {
    let engine = engine();
    let mirror = engine
        .of_class_named("GetterSetterTarget", capability())
        .unwrap()
        .create(&[])
        .unwrap();
    mirror.set("value", Value::Null).unwrap();

    // get observes the null; field refuses to wrap it
    assert_eq!(mirror.get("value", Kind::Str).unwrap(), Value::Null);
    let err = mirror.field("value", Kind::Str).unwrap_err();
    assert!(matches!(err, MirrorError::NullResult { .. }));
}

#[test]
fn test_unknown_field_fails() {
    let engine = engine();
    let mirror = engine
        .of_class_named("GetterSetterTarget", capability())
        .unwrap()
        .create(&[])
        .unwrap();

    let err = mirror.get("missing", Kind::Str).unwrap_err();
    assert!(matches!(err, MirrorError::MemberNotFound { .. }));
}

// ============================================================================
// Methods
// ============================================================================

#[test]
fn test_run_discards_the_result() {
    let engine = engine();
    let mirror = engine
        .of_class_named("RunTarget", capability())
        .unwrap()
        .create(&[])
        .unwrap();

    let after = mirror.run("run", &[Value::from("arg")]).unwrap();
    assert_eq!(mirror, after);
}

#[test]
fn test_run_with_null_argument_surfaces_the_cause() {
    let engine = engine();
    let mirror = engine
        .of_class_named("RunTarget", capability())
        .unwrap()
        .create(&[])
        .unwrap();

    let err = mirror.run("run", &[Value::Null]).unwrap_err();
    match err {
        MirrorError::Invocation { source, .. } => {
            assert!(matches!(source, NativeError::NullPointer));
        }
        other => panic!("expected Invocation, got {other:?}"),
    }
}

#[test]
fn test_call_wraps_the_return_value() {
    let engine = engine();
    let mirror = engine
        .of_class_named("CallTarget", capability())
        .unwrap()
        .create(&[])
        .unwrap();

    let result = mirror.call(Kind::Str, "call", &[]).unwrap();
    assert_eq!(result.value(), Some(&Value::from("callable")));
}

#[test]
fn test_call_on_void_method_is_an_error() {
    let engine = engine();
    let mirror = engine
        .of_class_named("RunTarget", capability())
        .unwrap()
        .create(&[])
        .unwrap();

    let err = mirror
        .call(Kind::Str, "run", &[Value::from("arg")])
        .unwrap_err();
    assert!(matches!(err, MirrorError::NullResult { .. }));
}

// ============================================================================
// Delegated Equality and Display
// ============================================================================

#[test]
fn test_equality_delegates_to_the_wrapped_value() {
    let engine = engine();
    let target = engine
        .of_class_named("CallTarget", capability())
        .unwrap()
        .create(&[])
        .unwrap();
    let instance = target.value().unwrap().clone();

    let other = engine.of(instance, capability()).unwrap();
    assert_eq!(target, other);
    assert_eq!(target.hash_code(), other.hash_code());
}

#[test]
fn test_type_mode_mirrors_compare_by_class() {
    let engine = engine();
    let a = engine.of_class_named("CallTarget", capability()).unwrap();
    let b = engine.of_class_named("CallTarget", capability()).unwrap();
    let c = engine.of_class_named("RunTarget", capability()).unwrap();

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a.to_string(), "CallTarget");
}
