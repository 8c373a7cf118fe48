// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Argument checking for untyped callers.
//!
//! Embedders that expose observers to a scripting language receive arguments as
//! dynamic values. [`ScriptValue`] models those values, and the functions here
//! validate them the way a native implementation would before forwarding to the
//! typed API.
//!
//! | Call | Argument | Error |
//! | --- | --- | --- |
//! | [`construct`] | missing | [`ArgumentError::CallbackRequired`] |
//! | [`construct`] | not a function | [`ArgumentError::CallbackNotCallable`] |
//! | [`observe`], [`unobserve`] | missing or `undefined` | [`ArgumentError::ElementRequired`] |
//! | [`observe`], [`unobserve`] | not a live element | [`ArgumentError::NotAnElement`] |
//! | [`observe`] | unknown `box` | [`ArgumentError::InvalidBoxOption`] |
//! | [`observe`] | options not a dictionary | [`ArgumentError::InvalidOptions`] |

use std::fmt;

use crate::error::ArgumentError;
use crate::host::Host;
use crate::observer::ResizeObserver;
use crate::types::{BoxModel, ObserveOptions, ResizeEntry};
use crate::watcher::ResizeWatcher;

/// A script callback.
pub type ScriptFunction<E> = Box<dyn FnMut(&[ResizeEntry<E>])>;

/// A dynamically typed value crossing the scripting boundary.
pub enum ScriptValue<E> {
    /// `undefined`.
    Undefined,
    /// `null`, also what a failed element lookup returns.
    Null,
    /// A boolean.
    Bool(bool),
    /// A number.
    Number(f64),
    /// A string.
    String(String),
    /// A plain object, as key/value pairs.
    Object(Vec<(String, ScriptValue<E>)>),
    /// An element handle.
    Element(E),
    /// A callable.
    Function(ScriptFunction<E>),
}

impl<E> ScriptValue<E> {
    /// Wrap a closure as a callable value.
    pub fn function(f: impl FnMut(&[ResizeEntry<E>]) + 'static) -> Self {
        Self::Function(Box::new(f))
    }

    /// An object with a single `box` member.
    pub fn box_options(value: &str) -> Self {
        Self::Object(vec![("box".into(), Self::String(value.into()))])
    }

    fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Object(fields) => fields.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// String conversion as a script engine would apply to an enum argument.
    fn to_script_string(&self) -> String {
        match self {
            Self::Undefined => "undefined".into(),
            Self::Null => "null".into(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => n.to_string(),
            Self::String(s) => s.clone(),
            Self::Object(_) | Self::Element(_) => "[object Object]".into(),
            Self::Function(_) => "function".into(),
        }
    }
}

impl<E: fmt::Debug> fmt::Debug for ScriptValue<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("Undefined"),
            Self::Null => f.write_str("Null"),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Self::String(s) => f.debug_tuple("String").field(s).finish(),
            Self::Object(fields) => f.debug_tuple("Object").field(fields).finish(),
            Self::Element(e) => f.debug_tuple("Element").field(e).finish(),
            Self::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// Construct an observer from an untyped callback argument.
///
/// # Errors
///
/// [`ArgumentError::CallbackRequired`] when `callback` is `None`,
/// [`ArgumentError::CallbackNotCallable`] when it is not a function.
pub fn construct<H: Host>(
    watcher: &ResizeWatcher<H>,
    callback: Option<ScriptValue<H::Element>>,
) -> Result<ResizeObserver<H>, ArgumentError> {
    match callback {
        None => Err(ArgumentError::CallbackRequired),
        Some(ScriptValue::Function(f)) => Ok(watcher.observer(f)),
        Some(_) => Err(ArgumentError::CallbackNotCallable),
    }
}

fn element<E: Copy>(
    value: Option<&ScriptValue<E>>,
    method: &'static str,
) -> Result<E, ArgumentError> {
    match value {
        None | Some(ScriptValue::Undefined) => Err(ArgumentError::ElementRequired { method }),
        Some(ScriptValue::Element(e)) => Ok(*e),
        Some(_) => Err(ArgumentError::NotAnElement { method }),
    }
}

/// Read observe options; absent, `undefined`, and `null` mean the defaults.
///
/// # Errors
///
/// [`ArgumentError::InvalidBoxOption`] for an unknown `box` value,
/// [`ArgumentError::InvalidOptions`] when `value` is not an object.
pub fn parse_options<E>(value: Option<&ScriptValue<E>>) -> Result<ObserveOptions, ArgumentError> {
    let options = match value {
        None | Some(ScriptValue::Undefined | ScriptValue::Null) => return Ok(ObserveOptions::default()),
        Some(v @ ScriptValue::Object(_)) => v,
        Some(_) => return Err(ArgumentError::InvalidOptions),
    };
    match options.get("box") {
        None | Some(ScriptValue::Undefined) => Ok(ObserveOptions::default()),
        Some(v) => {
            let keyword = v.to_script_string();
            BoxModel::from_keyword(&keyword)
                .map(|box_model| ObserveOptions { box_model })
                .ok_or(ArgumentError::InvalidBoxOption { value: keyword })
        }
    }
}

/// Validate and forward an `observe(target, options)` call.
///
/// # Errors
///
/// See the [module table](self).
pub fn observe<H: Host>(
    observer: &ResizeObserver<H>,
    target: Option<&ScriptValue<H::Element>>,
    options: Option<&ScriptValue<H::Element>>,
) -> Result<(), ArgumentError> {
    let element = element(target, "observe")?;
    let options = parse_options(options)?;
    observer.observe(element, options)
}

/// Validate and forward an `unobserve(target)` call.
///
/// # Errors
///
/// See the [module table](self).
pub fn unobserve<H: Host>(
    observer: &ResizeObserver<H>,
    target: Option<&ScriptValue<H::Element>>,
) -> Result<(), ArgumentError> {
    observer.unobserve(element(target, "unobserve")?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_host::{MemoryHost, NodeId};

    type Value = ScriptValue<NodeId>;

    fn watcher_with_element() -> (ResizeWatcher<MemoryHost>, NodeId) {
        let mut host = MemoryHost::new();
        let root = host.root();
        let el = host.append(root, "div");
        host.set_id(el, "box");
        host.set_size(el, 10.0, 10.0);
        (ResizeWatcher::new(host), el)
    }

    /// Constructs through any host, not just the in-memory one.
    fn construct_on<H: Host>(watcher: &ResizeWatcher<H>) -> ResizeObserver<H> {
        construct(watcher, Some(ScriptValue::function(|_| {}))).unwrap()
    }

    #[test]
    fn constructs_for_any_host() {
        let (watcher, el) = watcher_with_element();
        let observer = construct_on(&watcher);
        observer.observe(el, ObserveOptions::default()).unwrap();
        assert_eq!(observer.observed(), vec![el]);
    }

    #[test]
    fn constructor_arguments() {
        let (watcher, _) = watcher_with_element();
        assert_eq!(
            construct(&watcher, None).unwrap_err(),
            ArgumentError::CallbackRequired
        );
        for bad in [Value::Object(Vec::new()), Value::String("123".into())] {
            assert_eq!(
                construct(&watcher, Some(bad)).unwrap_err(),
                ArgumentError::CallbackNotCallable
            );
        }
        assert!(construct(&watcher, Some(Value::function(|_| {}))).is_ok());
    }

    #[test]
    fn observe_arguments() {
        let (watcher, el) = watcher_with_element();
        let observer = construct(&watcher, Some(Value::function(|_| {}))).unwrap();
        let missing = watcher.with_host(|h| h.element_by_id("nope"));
        let lookup = missing.map_or(Value::Null, Value::Element);

        assert_eq!(
            observe(&observer, None, None).unwrap_err(),
            ArgumentError::ElementRequired { method: "observe" }
        );
        assert_eq!(
            observe(&observer, Some(&Value::Undefined), None).unwrap_err(),
            ArgumentError::ElementRequired { method: "observe" }
        );
        for bad in [Value::Object(Vec::new()), Value::String("123".into()), lookup] {
            assert_eq!(
                observe(&observer, Some(&bad), None).unwrap_err(),
                ArgumentError::NotAnElement { method: "observe" }
            );
        }
        assert!(observe(&observer, Some(&Value::Element(el)), None).is_ok());
        assert_eq!(
            unobserve(&observer, None).unwrap_err(),
            ArgumentError::ElementRequired { method: "unobserve" }
        );
        assert!(unobserve(&observer, Some(&Value::Element(el))).is_ok());
    }

    #[test]
    fn removed_elements_are_not_elements() {
        let (watcher, el) = watcher_with_element();
        let observer = construct(&watcher, Some(Value::function(|_| {}))).unwrap();
        watcher.with_host(|h| h.remove(el));
        assert_eq!(
            observe(&observer, Some(&Value::Element(el)), None).unwrap_err(),
            ArgumentError::NotAnElement { method: "observe" }
        );
    }

    #[test]
    fn options() {
        assert_eq!(parse_options::<NodeId>(None), Ok(ObserveOptions::default()));
        assert_eq!(
            parse_options(Some(&Value::box_options("border-box"))),
            Ok(ObserveOptions::BORDER_BOX)
        );
        assert_eq!(
            parse_options(Some(&Value::Object(Vec::new()))),
            Ok(ObserveOptions::default())
        );
        assert_eq!(
            parse_options(Some(&Value::box_options("padding-box"))),
            Err(ArgumentError::InvalidBoxOption {
                value: "padding-box".into()
            })
        );
        assert_eq!(
            parse_options(Some(&Value::Number(3.0))),
            Err(ArgumentError::InvalidOptions)
        );
    }
}
