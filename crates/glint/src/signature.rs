//! Signature matching
//!
//! Two modes: exact (pairwise identical kinds) and "similar", where both
//! sides are boxed through the wrapper table before the assignability
//! check, and a null argument matches any reference parameter.

use crate::kind::Kind;
use crate::registry::TypeRegistry;
use crate::value::Value;

/// Check an exact signature match: equal arity, pairwise identical kinds
pub fn matches_exact(declared: &[Kind], args: &[Kind]) -> bool {
    declared.len() == args.len() && declared.iter().zip(args).all(|(d, a)| d == a)
}

/// Check a similar signature match
///
/// Equal arity; per position a [`Kind::Null`] argument matches any
/// reference parameter, otherwise the boxed parameter kind must be
/// assignable from the boxed argument kind.
pub fn matches_similar(registry: &TypeRegistry, declared: &[Kind], args: &[Kind]) -> bool {
    if declared.len() != args.len() {
        return false;
    }
    declared.iter().zip(args).all(|(&d, &a)| {
        if a == Kind::Null {
            d.is_reference()
        } else {
            registry.is_assignable(d.boxed(), a.boxed())
        }
    })
}

/// The runtime kinds of an argument list; null arguments report the sentinel
pub fn arg_kinds(args: &[Value]) -> Vec<Kind> {
    args.iter().map(Value::kind).collect()
}
