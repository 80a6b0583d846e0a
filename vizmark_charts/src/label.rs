// Copyright 2025 the VizMark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Label placement for bar marks.
//!
//! Shaping and drawing text are left downstream. The engine only measures text through a
//! [`TextMeasurer`] and decides whether a label fits inside its mark, just past the mark's
//! value end, or not at all.

extern crate alloc;

use alloc::string::String;

use kurbo::{Point, Rect, Size};
use vizmark_core::{DatasetId, Orientation};

use crate::projector::ProjectedMark;

/// A minimal text measurement interface.
///
/// Callers can plug in a shaping backend, or use [`HeuristicTextMeasurer`].
pub trait TextMeasurer {
    /// Returns the extent of `text` in pixels.
    fn measure(&self, text: &str, font_size: f64) -> Size;
}

/// A tiny heuristic text measurer suitable for demos and tests.
///
/// It assumes an average glyph width of ~0.6em and height of 1em.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> Size {
        let width = 0.6 * font_size * text.chars().count() as f64;
        Size::new(width, font_size)
    }
}

/// Per-dataset label settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelConfig {
    /// Whether labels are drawn for this dataset at all.
    pub enabled: bool,
    /// Font size passed to the measurer.
    pub font_size: f64,
    /// Gap between the label and the mark's edges, in pixels.
    pub padding: f64,
    /// Place labels past the value end when they do not fit inside.
    pub allow_outside: bool,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            font_size: 12.0,
            padding: 3.0,
            allow_outside: true,
        }
    }
}

/// Where a label goes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LabelFit {
    /// Centred inside the mark.
    Inside {
        /// Centre of the label.
        anchor: Point,
    },
    /// Just past the mark's value end.
    Outside {
        /// Centre of the label.
        anchor: Point,
    },
    /// Not drawn.
    Hidden,
}

/// A label decision for one mark.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedLabel {
    /// Dataset of the labelled datum.
    pub dataset: DatasetId,
    /// Datum index.
    pub index: usize,
    /// Label text.
    pub text: String,
    /// Placement.
    pub fit: LabelFit,
}

/// Decides where a label of extent `text` goes for `mark`.
///
/// Text runs horizontally, so on vertical plots its height is measured against the mark's
/// length and its width against the thickness; horizontal plots swap the two. An outside
/// label must stay within `viewport` when one is given.
pub fn fit_label(
    mark: &ProjectedMark,
    orientation: Orientation,
    text: Size,
    config: &LabelConfig,
    viewport: Option<Rect>,
) -> LabelFit {
    if !config.enabled {
        return LabelFit::Hidden;
    }
    let g = &mark.geometry;
    let (need_primary, need_secondary) = if orientation.is_vertical() {
        (text.height, text.width)
    } else {
        (text.width, text.height)
    };
    let centre = g.secondary_center();

    if need_secondary <= g.thickness && need_primary + 2.0 * config.padding <= g.length {
        let anchor = orientation.join(g.primary_offset + g.length * 0.5, centre);
        return LabelFit::Inside { anchor };
    }
    if !config.allow_outside {
        return LabelFit::Hidden;
    }

    let (end, _) = orientation.split(mark.position);
    let (start, _) = orientation.split(mark.base);
    // Pixel y grows downward, so a zero-length vertical bar grows up and a horizontal one right.
    let dir = if end > start || (end == start && !orientation.is_vertical()) {
        1.0
    } else {
        -1.0
    };
    let anchor = orientation.join(end + dir * (config.padding + need_primary * 0.5), centre);
    let rect = Rect::from_center_size(anchor, text);
    if viewport.is_none_or(|v| encloses(v, rect)) {
        LabelFit::Outside { anchor }
    } else {
        LabelFit::Hidden
    }
}

fn encloses(outer: Rect, inner: Rect) -> bool {
    inner.x0 >= outer.x0 && inner.x1 <= outer.x1 && inner.y0 >= outer.y0 && inner.y1 <= outer.y1
}
