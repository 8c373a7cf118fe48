// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Size derivation and change detection.
//!
//! Pure functions over a bounding rectangle and a [`ComputedStyle`]: derive border- and
//! content-box sizes, compare them with a previous snapshot, and build the entry a
//! pass reports.
//!
//! ```
//! use kurbo::{Insets, Rect};
//! use understory_resize::diff::{build_entry, compute_dimensions};
//! use understory_resize::{BoxModel, ComputedStyle};
//!
//! let style = ComputedStyle { padding: Insets::uniform(10.0), ..Default::default() };
//! let rect = Rect::new(0.0, 0.0, 120.0, 50.0);
//!
//! let dims = compute_dimensions(rect, &style);
//! assert_eq!((dims.content.width, dims.content.height), (100.0, 30.0));
//!
//! let entry = build_entry("box", rect, &style, BoxModel::ContentBox);
//! assert_eq!(entry.content_box_size.inline_size, 100.0);
//! assert_eq!(entry.border_box_size.block_size, 50.0);
//! ```

use kurbo::{Rect, Size};

use crate::host::ComputedStyle;
use crate::types::{BoxModel, ContentRect, ResizeEntry};

/// Derived sizes of one element.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Dimensions {
    /// Border-box size: the raw rectangle size.
    pub border: Size,
    /// Content-box size: the border box less padding and border widths.
    pub content: Size,
}

impl Dimensions {
    /// The pair a box model compares.
    pub fn for_box(&self, box_model: BoxModel) -> Size {
        match box_model {
            BoxModel::ContentBox => self.content,
            BoxModel::BorderBox => self.border,
        }
    }
}

/// Derive border- and content-box sizes.
///
/// Content sizes never go below zero.
pub fn compute_dimensions(rect: Rect, style: &ComputedStyle) -> Dimensions {
    let border = rect.size();
    let content = Size::new(
        (border.width - style.padding.x_value() - style.border.x_value()).max(0.0),
        (border.height - style.padding.y_value() - style.border.y_value()).max(0.0),
    );
    Dimensions { border, content }
}

/// True if the pair selected by `box_model` differs.
///
/// Comparison is exact; any difference counts.
pub fn has_changed(previous: &Dimensions, current: &Dimensions, box_model: BoxModel) -> bool {
    previous.for_box(box_model) != current.for_box(box_model)
}

/// Build the entry reported for `target`.
///
/// For [`BoxModel::BorderBox`] the content rectangle is `rect` itself. For
/// [`BoxModel::ContentBox`] it is `rect` inset by the left and top padding and border,
/// sized to the content box.
pub fn build_entry<E>(
    target: E,
    rect: Rect,
    style: &ComputedStyle,
    box_model: BoxModel,
) -> ResizeEntry<E> {
    let dims = compute_dimensions(rect, style);
    let content_rect = match box_model {
        BoxModel::BorderBox => ContentRect::from(rect),
        BoxModel::ContentBox => ContentRect::new(
            rect.x0 + style.padding.x0 + style.border.x0,
            rect.y0 + style.padding.y0 + style.border.y0,
            dims.content.width,
            dims.content.height,
        ),
    };
    ResizeEntry {
        target,
        content_rect,
        border_box_size: dims.border.into(),
        content_box_size: dims.content.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Insets;
    use proptest::prelude::*;

    fn padded(padding: f64, border: f64) -> ComputedStyle {
        ComputedStyle {
            padding: Insets::uniform(padding),
            border: Insets::uniform(border),
            ..Default::default()
        }
    }

    #[test]
    fn padding_is_removed_from_content_box() {
        let entry = build_entry(
            1_u32,
            Rect::new(0.0, 0.0, 120.0, 50.0),
            &padded(10.0, 0.0),
            BoxModel::ContentBox,
        );
        assert_eq!(entry.content_box_size.block_size, 30.0);
        assert_eq!(entry.content_box_size.inline_size, 100.0);
        assert_eq!(entry.border_box_size.block_size, 50.0);
        assert_eq!(entry.border_box_size.inline_size, 120.0);
        assert_eq!(entry.content_rect, ContentRect::new(10.0, 10.0, 100.0, 30.0));
    }

    #[test]
    fn border_box_reports_the_raw_rect() {
        let rect = Rect::new(5.0, 7.0, 55.0, 27.0);
        let entry = build_entry(1_u32, rect, &padded(4.0, 1.0), BoxModel::BorderBox);
        assert_eq!(entry.content_rect, ContentRect::from(rect));
        assert_eq!(entry.content_box_size.inline_size, 40.0);
    }

    #[test]
    fn asymmetric_insets() {
        let style = ComputedStyle {
            padding: Insets::new(1.0, 2.0, 3.0, 4.0),
            border: Insets::new(5.0, 6.0, 7.0, 8.0),
            ..Default::default()
        };
        let dims = compute_dimensions(Rect::new(0.0, 0.0, 100.0, 100.0), &style);
        assert_eq!(dims.content, Size::new(84.0, 80.0));
        let entry = build_entry(
            1_u32,
            Rect::new(0.0, 0.0, 100.0, 100.0),
            &style,
            BoxModel::ContentBox,
        );
        assert_eq!((entry.content_rect.x, entry.content_rect.y), (6.0, 8.0));
    }

    #[test]
    fn change_detection_follows_the_box_model() {
        let style = padded(10.0, 0.0);
        let before = compute_dimensions(Rect::new(0.0, 0.0, 120.0, 50.0), &style);
        // Horizontal padding grows as much as the rect does: content box unchanged.
        let wider_padding = ComputedStyle {
            padding: Insets::new(20.0, 10.0, 20.0, 10.0),
            ..Default::default()
        };
        let after = compute_dimensions(Rect::new(0.0, 0.0, 140.0, 50.0), &wider_padding);
        assert!(has_changed(&before, &after, BoxModel::BorderBox));
        assert!(!has_changed(&before, &after, BoxModel::ContentBox));
        assert!(!has_changed(&before, &before, BoxModel::ContentBox));

        let moved = compute_dimensions(Rect::new(30.0, 30.0, 150.0, 80.0), &style);
        assert!(!has_changed(&before, &moved, BoxModel::BorderBox));
        assert!(!has_changed(&before, &moved, BoxModel::ContentBox));
    }

    #[test]
    fn oversized_insets_clamp_to_zero() {
        let dims = compute_dimensions(Rect::new(0.0, 0.0, 10.0, 10.0), &padded(8.0, 0.0));
        assert_eq!(dims.content, Size::ZERO);
    }

    proptest! {
        #[test]
        fn content_rect_edges_are_consistent(
            x in -500.0..500.0_f64,
            y in -500.0..500.0_f64,
            w in 0.0..800.0_f64,
            h in 0.0..800.0_f64,
            pad in 0.0..40.0_f64,
            border in 0.0..10.0_f64,
        ) {
            let rect = Rect::new(x, y, x + w, y + h);
            let style = padded(pad, border);
            for box_model in [BoxModel::ContentBox, BoxModel::BorderBox] {
                let r = build_entry((), rect, &style, box_model).content_rect;
                prop_assert_eq!(r.right, r.x + r.width);
                prop_assert_eq!(r.bottom, r.y + r.height);
                prop_assert_eq!(r.left, r.x);
                prop_assert_eq!(r.top, r.y);
            }
            let dims = compute_dimensions(rect, &style);
            prop_assert!(dims.content.width <= dims.border.width);
            prop_assert!(dims.content.height <= dims.border.height);
            prop_assert!(dims.content.width >= 0.0 && dims.content.height >= 0.0);
        }
    }
}
