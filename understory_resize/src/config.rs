// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Watcher configuration.

use crate::host::ListenerSet;

/// Configuration for a [`ResizeWatcher`](crate::ResizeWatcher).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResizeConfig {
    /// Listeners attached while anything is tracked. Defaults to all of them.
    pub listeners: ListenerSet,
    /// Properties treated as size-affecting in addition to the built-in list, for
    /// example custom properties a layout reads.
    pub extra_properties: Vec<String>,
    /// How many times a pass may be re-run because a trigger arrived while callbacks
    /// were being notified. Zero disables re-running.
    pub max_chained_passes: usize,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            listeners: ListenerSet::all(),
            extra_properties: Vec::new(),
            max_chained_passes: 8,
        }
    }
}
