// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The allow-list of properties whose change can alter an element's box dimensions.

use alloc::collections::BTreeSet;
use alloc::string::String;

/// Set of properties treated as size-affecting.
///
/// The built-in list covers sizing (`width`, `min-height`, ..), `padding*`, `margin*`,
/// border widths, `transform`, the inset properties, and `line-height`. Extra names can
/// be added for hosts with custom properties.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropertySet {
    extra: BTreeSet<String>,
}

impl PropertySet {
    /// The built-in list only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in list plus `extra`.
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extra: extra
                .into_iter()
                .map(|s| s.as_ref().trim().to_ascii_lowercase())
                .collect(),
        }
    }

    /// Add one extra property name.
    pub fn insert(&mut self, name: &str) {
        self.extra.insert(name.trim().to_ascii_lowercase());
    }

    /// True if `name` can change box dimensions.
    pub fn contains(&self, name: &str) -> bool {
        is_builtin(name) || self.extra.contains(name)
    }

    /// True if a transition over `name` can change box dimensions (`all` included).
    pub fn contains_transition(&self, name: &str) -> bool {
        name == "all" || self.contains(name)
    }
}

fn is_builtin(name: &str) -> bool {
    match name {
        "width" | "height" | "min-width" | "max-width" | "min-height" | "max-height"
        | "inline-size" | "block-size" | "min-inline-size" | "max-inline-size"
        | "min-block-size" | "max-block-size" | "transform" | "top" | "left" | "right"
        | "bottom" | "inset" | "line-height" => true,
        _ if name.starts_with("padding") || name.starts_with("margin") => true,
        _ => is_border_width(name),
    }
}

/// `border`, `border-width`, and the side shorthands and width longhands.
fn is_border_width(name: &str) -> bool {
    let Some(rest) = name.strip_prefix("border") else {
        return false;
    };
    if rest.is_empty() || rest == "-width" {
        return true;
    }
    let Some(side) = rest.strip_prefix('-') else {
        return false;
    };
    let side = side.strip_suffix("-width").unwrap_or(side);
    matches!(
        side,
        "top"
            | "right"
            | "bottom"
            | "left"
            | "inline"
            | "block"
            | "inline-start"
            | "inline-end"
            | "block-start"
            | "block-end"
    )
}

impl<S: AsRef<str>> FromIterator<S> for PropertySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::with_extra(iter)
    }
}
