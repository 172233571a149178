//! Reference-identity `Equals` and `GetHashCode`.

use crate::{
    invocation::{Invocation, MemberKind, Return},
    pipeline::{Behavior, Next},
    value::{TypeDesc, Value},
    Result,
};

/// Makes proxies compare like ordinary reference types.
///
/// Applies to `Equals(object)` returning `bool` and `GetHashCode()` returning `i32`, and
/// answers them from the identity of the proxy the call was made on. Setups placed before
/// this behavior can still override either method.
#[derive(Debug, Default)]
pub struct EqualityBehavior;

impl EqualityBehavior {
    /// Creates the behavior.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn is_equals(invocation: &Invocation) -> bool {
        let method = invocation.method();
        method.name() == "Equals"
            && *method.return_type() == TypeDesc::Bool
            && method.parameters().len() == 1
            && method.parameters()[0].ty().accepts_null()
    }

    fn is_get_hash_code(invocation: &Invocation) -> bool {
        let method = invocation.method();
        method.name() == "GetHashCode"
            && *method.return_type() == TypeDesc::I32
            && method.parameters().is_empty()
    }
}

/// Folds an identity into the 32-bit hash code range.
fn identity_hash(identity: usize) -> i32 {
    let wide = identity as u64;
    (wide ^ (wide >> 32)) as u32 as i32
}

impl Behavior for EqualityBehavior {
    fn applies_to(&self, invocation: &Invocation) -> bool {
        invocation.method().kind() == MemberKind::Method
            && (Self::is_equals(invocation) || Self::is_get_hash_code(invocation))
    }

    fn execute(&self, invocation: &Invocation, _next: &mut Next<'_>) -> Result<Return> {
        let identity = invocation.target().identity();

        let value = if Self::is_get_hash_code(invocation) {
            Value::I32(identity_hash(identity))
        } else {
            let other = invocation.arguments().get(0)?;
            let same = other
                .as_object()
                .is_some_and(|object| object.identity() == identity);
            Value::Bool(same)
        };

        Ok(invocation.create_value_return(value))
    }
}
