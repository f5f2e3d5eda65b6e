//! Runtime values
//!
//! [`Value`] is the dynamic value representation flowing through mirrors,
//! accessor closures, and registered method bodies. Primitive variants
//! report their *primitive* [`Kind`]; boxedness exists only in
//! declarations and is bridged by the wrapper table during matching.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::kind::Kind;
use crate::object::Instance;

/// A dynamic runtime value
#[derive(Debug, Clone)]
pub enum Value {
    /// The null reference
    Null,
    /// Boolean value
    Bool(bool),
    /// Character value
    Char(char),
    /// 8-bit integer value
    Byte(i8),
    /// 16-bit integer value
    Short(i16),
    /// 32-bit integer value
    Int(i32),
    /// 64-bit integer value
    Long(i64),
    /// 32-bit float value
    Float(f32),
    /// 64-bit float value
    Double(f64),
    /// Immutable shared string
    Str(Arc<str>),
    /// Instance of a registered class
    Object(Instance),
}

impl Value {
    /// The runtime kind of this value
    ///
    /// Null values report the [`Kind::Null`] sentinel: the kind of a null
    /// argument is unknown and matches any reference parameter.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Char(_) => Kind::Char,
            Value::Byte(_) => Kind::Byte,
            Value::Short(_) => Kind::Short,
            Value::Int(_) => Kind::Int,
            Value::Long(_) => Kind::Long,
            Value::Float(_) => Kind::Float,
            Value::Double(_) => Kind::Double,
            Value::Str(_) => Kind::Str,
            Value::Object(instance) => Kind::Class(instance.class_id()),
        }
    }

    /// Check for the null reference
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// View as an instance, if this value wraps one
    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Value::Object(instance) => Some(instance),
            _ => None,
        }
    }

    /// View as a string slice, if this value is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Hash suitable for delegation from wrapper types
    ///
    /// Doubles and floats hash by bit pattern; objects hash by identity.
    pub fn hash_code(&self) -> u64 {
        let mut hasher = rustc_hash::FxHasher::default();
        match self {
            Value::Null => 0u8.hash(&mut hasher),
            Value::Bool(b) => b.hash(&mut hasher),
            Value::Char(c) => c.hash(&mut hasher),
            Value::Byte(b) => b.hash(&mut hasher),
            Value::Short(s) => s.hash(&mut hasher),
            Value::Int(i) => i.hash(&mut hasher),
            Value::Long(l) => l.hash(&mut hasher),
            Value::Float(f) => f.to_bits().hash(&mut hasher),
            Value::Double(d) => d.to_bits().hash(&mut hasher),
            Value::Str(s) => s.hash(&mut hasher),
            Value::Object(instance) => instance.object_id().hash(&mut hasher),
        }
        hasher.finish()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            // Objects compare by identity, not structure
            (Value::Object(a), Value::Object(b)) => a.object_id() == b.object_id(),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Char(c) => write!(f, "{c}"),
            Value::Byte(b) => write!(f, "{b}"),
            Value::Short(s) => write!(f, "{s}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Long(l) => write!(f, "{l}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Double(d) => write!(f, "{d}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Object(instance) => {
                write!(f, "instance@{}", instance.object_id())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

impl From<i8> for Value {
    fn from(b: i8) -> Self {
        Value::Byte(b)
    }
}

impl From<i16> for Value {
    fn from(s: i16) -> Self {
        Value::Short(s)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i)
    }
}

impl From<i64> for Value {
    fn from(l: i64) -> Self {
        Value::Long(l)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s.as_str()))
    }
}

impl From<Instance> for Value {
    fn from(instance: Instance) -> Self {
        Value::Object(instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_of_primitives() {
        assert_eq!(Value::Null.kind(), Kind::Null);
        assert_eq!(Value::Bool(true).kind(), Kind::Bool);
        assert_eq!(Value::Int(42).kind(), Kind::Int);
        assert_eq!(Value::Long(3).kind(), Kind::Long);
        assert_eq!(Value::from("a").kind(), Kind::Str);
    }

    #[test]
    fn test_equality_by_value() {
        assert_eq!(Value::Int(1), Value::Int(1));
        assert_ne!(Value::Int(1), Value::Long(1));
        assert_eq!(Value::from("a"), Value::from("a"));
        assert_ne!(Value::Null, Value::Bool(false));
    }

    #[test]
    fn test_object_equality_is_identity() {
        let a = Instance::new(0, 1);
        let b = Instance::new(0, 1);
        assert_eq!(Value::Object(a.clone()), Value::Object(a.clone()));
        assert_ne!(Value::Object(a), Value::Object(b));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Char('b').to_string(), "b");
        assert_eq!(Value::from("field").to_string(), "field");
    }

    #[test]
    fn test_hash_code_is_stable() {
        let v = Value::Double(3.25);
        assert_eq!(v.hash_code(), Value::Double(3.25).hash_code());
        assert_eq!(
            Value::from("a").hash_code(),
            Value::from("a").hash_code()
        );
    }
}
