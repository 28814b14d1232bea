//! Combinators over dynamically typed input.
//!
//! Hosts that receive combinator input as data (for example from a scripting
//! layer or over the wire) cannot rely on the `IntoIterator` bound to rule
//! out non-iterable input. These variants accept a [`serde_json::Value`]:
//!
//! - arrays iterate their elements
//! - strings iterate their characters, each as a one-character string
//! - anything else rejects with [`TypeError::NotIterable`] before any element
//!   is looked at
//!
//! Elements are plain values, so they fulfil right away. Rejections use
//! [`Reason`].

use crate::deferred::{Deferred, Resolution};
use crate::error::{Reason, TypeError};
use crate::runtime::SchedulerHandle;
use crate::tracing_compat::debug;
use crate::types::{Payload, Settlement};
use serde_json::Value;
use std::sync::Arc;

/// Returns the JSON type name used in not-iterable diagnostics.
#[must_use]
pub const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Splits `input` into the elements a combinator iterates.
pub fn elements(input: &Value) -> Result<Vec<Value>, TypeError> {
    match input {
        Value::Array(items) => Ok(items.clone()),
        Value::String(text) => Ok(text.chars().map(|c| Value::String(c.to_string())).collect()),
        other => Err(TypeError::not_iterable(type_name(other))),
    }
}

fn with_elements<A, F>(scheduler: &SchedulerHandle, input: &Value, combine: F) -> Deferred<A, Reason>
where
    A: Payload,
    F: FnOnce(Vec<Resolution<Value, Reason>>) -> Deferred<A, Reason>,
{
    match elements(input) {
        Ok(items) => combine(items.into_iter().map(Resolution::Value).collect()),
        Err(error) => {
            debug!(%error, "combinator input rejected");
            Deferred::rejected(Arc::clone(scheduler), Reason::from(error))
        }
    }
}

/// [`all`](super::all) over dynamic input.
pub fn all(scheduler: &SchedulerHandle, input: &Value) -> Deferred<Vec<Value>, Reason> {
    with_elements(scheduler, input, |items| super::all(scheduler, items))
}

/// [`race`](super::race) over dynamic input.
pub fn race(scheduler: &SchedulerHandle, input: &Value) -> Deferred<Value, Reason> {
    with_elements(scheduler, input, |items| super::race(scheduler, items))
}

/// [`any`](super::any) over dynamic input.
pub fn any(scheduler: &SchedulerHandle, input: &Value) -> Deferred<Value, Reason> {
    with_elements(scheduler, input, |items| super::any(scheduler, items))
}

/// [`all_settled`](super::all_settled) over dynamic input.
pub fn all_settled(
    scheduler: &SchedulerHandle,
    input: &Value,
) -> Deferred<Vec<Settlement<Value, Reason>>, Reason> {
    with_elements(scheduler, input, |items| super::all_settled(scheduler, items))
}
