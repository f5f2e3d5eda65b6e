//! Integration tests for static member access
//!
//! Type-mode mirrors reach static fields and methods of the effective
//! type without constructing an instance; static resolution walks the
//! same four-pass order as instance members.

use std::sync::Arc;

use glint::{
    AccessEngine, Capability, ClassBuilder, FieldSpec, Kind, MethodSpec, MirrorError, NativeError,
    TypeRegistry, Value,
};

fn engine() -> AccessEngine {
    let registry = Arc::new(TypeRegistry::new());

    let parent = ClassBuilder::new("Parent")
        .add_field(
            FieldSpec::new("i", Kind::Int)
                .private()
                .as_static()
                .initial(3i32),
        )
        .register(&registry)
        .unwrap();
    ClassBuilder::new("Child")
        .extends(parent)
        .add_field(
            FieldSpec::new("i", Kind::Int)
                .private()
                .as_static()
                .initial(4i32),
        )
        .register(&registry)
        .unwrap();

    ClassBuilder::new("StaticTarget")
        .add_field(
            FieldSpec::new("value", Kind::Str)
                .private()
                .as_static()
                .initial(""),
        )
        .add_method(
            MethodSpec::new("runStatic", |_, args| {
                if args[0].is_null() {
                    Err(NativeError::NullPointer)
                } else {
                    Ok(None)
                }
            })
            .params(&[Kind::Str])
            .as_static(),
        )
        .add_method(
            MethodSpec::new("callStatic", |_, _| Ok(Some(Value::from("callable"))))
                .returns(Kind::Str)
                .private()
                .as_static(),
        )
        .add_method(MethodSpec::new("instanceOnly", |_, _| Ok(None)))
        .register(&registry)
        .unwrap();

    AccessEngine::new(registry)
}

fn capability() -> Capability {
    Capability::for_module("main")
}

// ============================================================================
// Static Fields
// ============================================================================

#[test]
fn test_get_static_prefers_the_declaring_level() {
    let engine = engine();

    let child = engine.of_class_named("Child", capability()).unwrap();
    assert_eq!(child.get_static("i", Kind::Int).unwrap(), Value::Int(4));

    let parent = engine.of_class_named("Parent", capability()).unwrap();
    assert_eq!(parent.get_static("i", Kind::Int).unwrap(), Value::Int(3));
}

#[test]
fn test_set_static_round_trips() {
    let engine = engine();
    let mirror = engine.of_class_named("StaticTarget", capability()).unwrap();

    let after = mirror.set_static("value", "updated").unwrap();
    assert_eq!(
        mirror.get_static("value", Kind::Str).unwrap(),
        Value::from("updated")
    );
    assert_eq!(mirror, after);
}

#[test]
fn test_static_field_wraps_the_value() {
    let engine = engine();
    let mirror = engine.of_class_named("StaticTarget", capability()).unwrap();
    mirror.set_static("value", "inner").unwrap();

    let field = mirror.static_field("value", Kind::Str).unwrap();
    assert_eq!(field.value(), Some(&Value::from("inner")));
}

#[test]
fn test_static_field_rejects_null() {
    let engine = engine();
    let mirror = engine.of_class_named("StaticTarget", capability()).unwrap();
    mirror.set_static("value", Value::Null).unwrap();

    let err = mirror.static_field("value", Kind::Str).unwrap_err();
    assert!(matches!(err, MirrorError::NullResult { .. }));
}

#[test]
fn test_instance_lookup_does_not_see_static_fields() {
    let engine = engine();
    let mirror = engine
        .of_class_named("StaticTarget", capability())
        .unwrap()
        .create(&[])
        .unwrap();

    let err = mirror.get("value", Kind::Str).unwrap_err();
    assert!(matches!(err, MirrorError::MemberNotFound { .. }));
}

// ============================================================================
// Static Methods
// ============================================================================

#[test]
fn test_run_static() {
    let engine = engine();
    let mirror = engine.of_class_named("StaticTarget", capability()).unwrap();

    let after = mirror.run_static("runStatic", &[Value::from("arg")]).unwrap();
    assert_eq!(mirror, after);

    let err = mirror.run_static("runStatic", &[Value::Null]).unwrap_err();
    match err {
        MirrorError::Invocation { source, .. } => {
            assert!(matches!(source, NativeError::NullPointer));
        }
        other => panic!("expected Invocation, got {other:?}"),
    }
}

#[test]
fn test_call_static_wraps_the_return_value() {
    let engine = engine();
    let mirror = engine.of_class_named("StaticTarget", capability()).unwrap();

    let result = mirror.call_static(Kind::Str, "callStatic", &[]).unwrap();
    assert_eq!(result.value(), Some(&Value::from("callable")));
}

#[test]
fn test_static_lookup_skips_instance_methods() {
    let engine = engine();
    let mirror = engine.of_class_named("StaticTarget", capability()).unwrap();

    let err = mirror.run_static("instanceOnly", &[]).unwrap_err();
    assert!(matches!(err, MirrorError::MemberNotFound { .. }));
}

#[test]
fn test_static_access_works_from_object_mode() {
    let engine = engine();
    let mirror = engine
        .of_class_named("StaticTarget", capability())
        .unwrap()
        .create(&[])
        .unwrap();
    mirror.set_static("value", "from instance").unwrap();

    assert_eq!(
        mirror.get_static("value", Kind::Str).unwrap(),
        Value::from("from instance")
    );
}
