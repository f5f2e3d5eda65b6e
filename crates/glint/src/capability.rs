//! Access capability tokens
//!
//! A [`Capability`] is the caller-supplied credential carried by every
//! mirror chain. It represents as much access as the originating module
//! legitimately has; reaching a non-public member requires deriving a
//! *type-scoped* escalation via [`Capability::scoped_to`], the sole
//! privilege boundary in the crate. Derivation fails closed: a class in a
//! foreign module refuses escalation unless it is declared `open`.

use crate::error::{MirrorError, MirrorResult};
use crate::kind::ClassId;
use crate::object::{ClassDef, Visibility};

/// Caller-supplied access token, scoped per declaring type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capability {
    /// Module the calling context belongs to
    origin: String,
    /// Class this token has been escalated for, if any
    scope: Option<ClassId>,
}

impl Capability {
    /// Create a token carrying the access of the given module
    pub fn for_module(origin: &str) -> Self {
        Self {
            origin: origin.to_string(),
            scope: None,
        }
    }

    /// The module this token originates from
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// The class this token is escalated for, if any
    pub fn scope(&self) -> Option<ClassId> {
        self.scope
    }

    /// Derive a token escalated for one declaring class
    ///
    /// Permitted when the class belongs to the token's own module, or the
    /// class is `open` to foreign modules. Anything else is refused.
    pub fn scoped_to(&self, class: &ClassDef) -> MirrorResult<Capability> {
        if class.module == self.origin || class.open {
            Ok(Capability {
                origin: self.origin.clone(),
                scope: Some(class.id),
            })
        } else {
            Err(MirrorError::AccessDenied {
                class: class.name.clone(),
                origin: self.origin.clone(),
            })
        }
    }

    /// Check whether this token may touch a member as resolved
    ///
    /// Public members need no escalation; non-public members require the
    /// token to be scoped to the declaring class.
    pub fn permits(&self, visibility: Visibility, declaring: ClassId) -> bool {
        visibility.is_public() || self.scope == Some(declaring)
    }
}
