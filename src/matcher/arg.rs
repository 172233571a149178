//! Typed matcher helpers for setup expressions.
//!
//! Each helper pushes a matcher onto the current call flow and returns the typed placeholder
//! the surrounding call is evaluated with.
//!
//! ```rust,ignore
//! use stunts::matcher::{arg, capture};
//!
//! capture::setup(|| calculator.add(arg::any(), arg::is(|y: &i32| *y > 0)))?;
//! capture::setup(|| calculator.add(arg::not(Matcher::value(TypeDesc::I32, 0.into())), 1))?;
//! ```

use std::any::TypeId;

use crate::{
    matcher::{capture, Condition, Matcher},
    value::{ArgType, Value},
};

/// Matches any value of type `T`.
pub fn any<T: ArgType>() -> T {
    matching(Matcher::any(T::type_desc()))
}

/// Matches values of type `T` for which `predicate` holds.
///
/// A predicate that captures nothing is identified by its closure type, so evaluating the same
/// setup expression again yields an equal matcher. A capturing predicate is only equal to
/// itself, since its captured state may differ between evaluations.
pub fn is<T, F>(predicate: F) -> T
where
    T: ArgType,
    F: Fn(&T) -> bool + Send + Sync + 'static,
{
    let description = std::any::type_name::<F>();
    let stateless = std::mem::size_of::<F>() == 0;
    let check = move |value: &Value| T::from_value(value).is_some_and(|typed| predicate(&typed));

    let condition = if stateless {
        Condition::keyed(TypeId::of::<F>(), description, check)
    } else {
        Condition::new(description, check)
    };
    matching(Matcher::Conditional(T::type_desc(), condition))
}

/// Matches values rejected by `matcher`.
pub fn not<T: ArgType>(matcher: Matcher) -> T {
    matching(Matcher::not(matcher))
}

/// Matches values equal to `value`.
///
/// Only needed where a literal argument equals its type's default and would otherwise be
/// taken for a placeholder.
pub fn eq<T: ArgType>(value: T) -> T {
    matching(Matcher::value(T::type_desc(), value.into_value()))
}

/// Pushes an arbitrary matcher and returns the placeholder of `T`.
pub fn matching<T: ArgType>(matcher: Matcher) -> T {
    capture::push(matcher);
    T::placeholder()
}
