// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types: observer identifiers, box-model options, and emitted entries.

use kurbo::{Rect, Size};

/// Identifier of one observer (subscriber group) within a [`ResizeWatcher`](crate::ResizeWatcher).
///
/// Identifiers are never reused within a watcher.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ObserverId(pub(crate) u64);

impl ObserverId {
    /// The raw identifier, for logging.
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Which box a reported size describes.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum BoxModel {
    /// Excludes padding and border.
    #[default]
    ContentBox,
    /// Includes padding and border.
    BorderBox,
}

impl BoxModel {
    /// Parse the option keyword (`content-box` or `border-box`).
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "content-box" => Some(Self::ContentBox),
            "border-box" => Some(Self::BorderBox),
            _ => None,
        }
    }

    /// The option keyword.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ContentBox => "content-box",
            Self::BorderBox => "border-box",
        }
    }
}

/// Options for [`ResizeObserver::observe`](crate::ResizeObserver::observe).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ObserveOptions {
    /// Box whose size changes are reported. Defaults to [`BoxModel::ContentBox`].
    pub box_model: BoxModel,
}

impl ObserveOptions {
    /// Options observing the border box.
    pub const BORDER_BOX: Self = Self {
        box_model: BoxModel::BorderBox,
    };
}

/// A size in logical terms: block (vertical) and inline (horizontal) extent.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BoxSize {
    /// Vertical extent.
    pub block_size: f64,
    /// Horizontal extent.
    pub inline_size: f64,
}

impl From<Size> for BoxSize {
    fn from(size: Size) -> Self {
        Self {
            block_size: size.height,
            inline_size: size.width,
        }
    }
}

/// A rectangle in the shape scripts expect: origin, size, and the four edges.
///
/// Edges are always derived from origin and size (`right = x + width`,
/// `bottom = y + height`), never computed independently.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ContentRect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
    /// Same as `y`.
    pub top: f64,
    /// `x + width`.
    pub right: f64,
    /// `y + height`.
    pub bottom: f64,
    /// Same as `x`.
    pub left: f64,
}

impl ContentRect {
    /// Build from origin and size.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            top: y,
            right: x + width,
            bottom: y + height,
            left: x,
        }
    }

    /// Convert to a Kurbo rectangle.
    pub fn to_rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.right, self.bottom)
    }
}

impl From<Rect> for ContentRect {
    fn from(rect: Rect) -> Self {
        Self::new(rect.x0, rect.y0, rect.width(), rect.height())
    }
}

/// One reported size change for one element.
#[derive(Clone, Debug, PartialEq)]
pub struct ResizeEntry<E> {
    /// The observed element.
    pub target: E,
    /// Content rectangle for the observed box model.
    pub content_rect: ContentRect,
    /// Border-box size.
    pub border_box_size: BoxSize,
    /// Content-box size.
    pub content_box_size: BoxSize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_rect_edges_follow_origin_and_size() {
        let r = ContentRect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!((r.left, r.top, r.right, r.bottom), (10.0, 20.0, 40.0, 60.0));
        assert_eq!(r.to_rect(), Rect::new(10.0, 20.0, 40.0, 60.0));
        let from_rect = ContentRect::from(Rect::new(1.0, 2.0, 4.0, 8.0));
        assert_eq!((from_rect.width, from_rect.height), (3.0, 6.0));
    }

    #[test]
    fn box_model_keywords() {
        assert_eq!(BoxModel::from_keyword("border-box"), Some(BoxModel::BorderBox));
        assert_eq!(BoxModel::from_keyword("content-box"), Some(BoxModel::ContentBox));
        assert_eq!(BoxModel::from_keyword("padding-box"), None);
        assert_eq!(BoxModel::default().as_str(), "content-box");
    }
}
