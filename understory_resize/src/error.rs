// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Argument errors raised at the observer boundary.

/// A malformed argument to a constructor, `observe`, or `unobserve`.
///
/// Messages name the failing call and the parameter position, the way script
/// engines phrase them.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    /// No callback was passed to the constructor.
    #[error("Failed to construct 'ResizeObserver': 1 argument required, but only 0 present.")]
    CallbackRequired,
    /// The constructor argument is not callable.
    #[error(
        "Failed to construct 'ResizeObserver': The callback provided as parameter 1 is not a function."
    )]
    CallbackNotCallable,
    /// No element was passed.
    #[error("Failed to execute '{method}' on 'ResizeObserver': 1 argument required, but only 0 present.")]
    ElementRequired {
        /// `observe` or `unobserve`.
        method: &'static str,
    },
    /// The value is not a live element.
    #[error("Failed to execute '{method}' on 'ResizeObserver': parameter 1 is not of type 'Element'.")]
    NotAnElement {
        /// `observe` or `unobserve`.
        method: &'static str,
    },
    /// The `box` option is not a known box model.
    #[error(
        "Failed to execute 'observe' on 'ResizeObserver': The provided value '{value}' is not a valid enum value of type ResizeObserverBoxOptions."
    )]
    InvalidBoxOption {
        /// The rejected value.
        value: String,
    },
    /// The options argument is not a dictionary.
    #[error(
        "Failed to execute 'observe' on 'ResizeObserver': The provided value is not of type 'ResizeObserverOptions'."
    )]
    InvalidOptions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_call_and_parameter() {
        assert_eq!(
            ArgumentError::CallbackRequired.to_string(),
            "Failed to construct 'ResizeObserver': 1 argument required, but only 0 present."
        );
        assert_eq!(
            ArgumentError::NotAnElement { method: "unobserve" }.to_string(),
            "Failed to execute 'unobserve' on 'ResizeObserver': parameter 1 is not of type 'Element'."
        );
        assert!(
            ArgumentError::InvalidBoxOption {
                value: "padding-box".into()
            }
            .to_string()
            .contains("'padding-box'")
        );
    }
}
