// Copyright 2025 the VizMark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit-testing over rendered marks.

extern crate alloc;

use alloc::vec::Vec;

use kurbo::{Point, Rect};
use vizmark_core::{DatasetId, Orientation};

use crate::projector::ProjectedMark;

/// Slack applied to every "inside" test, in pixels.
///
/// Pointer coordinates arrive integer-rounded, while geometry is fractional.
pub const HIT_TOLERANCE: f64 = 0.5;

/// A rendered mark as seen by spatial queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkEntity {
    /// Dataset the mark belongs to.
    pub dataset: DatasetId,
    /// Datum index within the dataset.
    pub index: usize,
    /// Pixel position of the mark (value end, centred on the secondary axis).
    pub position: Point,
    /// Bounding box in pixel space.
    pub bounds: Rect,
}

/// Answers point, region, and nearest-mark queries.
///
/// Entities are kept in draw order; every query reports results in that order, and
/// [`SpatialQueryEngine::nearest`] resolves exact ties to the earliest entity.
#[derive(Clone, Debug, Default)]
pub struct SpatialQueryEngine {
    orientation: Orientation,
    entities: Vec<MarkEntity>,
    viewport: Option<Rect>,
}

impl SpatialQueryEngine {
    /// Builds an engine over `marks` in draw order.
    pub fn new(orientation: Orientation, marks: &[ProjectedMark]) -> Self {
        let entities = marks
            .iter()
            .map(|m| MarkEntity {
                dataset: m.dataset,
                index: m.index,
                position: m.position,
                bounds: m.geometry.to_rect(orientation),
            })
            .collect();
        Self {
            orientation,
            entities,
            viewport: None,
        }
    }

    /// Restricts [`SpatialQueryEngine::nearest`] to entities overlapping `viewport`.
    pub fn with_viewport(mut self, viewport: Option<Rect>) -> Self {
        self.viewport = viewport;
        self
    }

    /// Returns every entity, in draw order.
    pub fn entities(&self) -> &[MarkEntity] {
        &self.entities
    }

    /// Returns entities whose bounds contain `point`.
    pub fn entities_at(&self, point: Point) -> impl Iterator<Item = &MarkEntity> + '_ {
        self.entities.iter().filter(move |e| {
            within(point.x, e.bounds.x0, e.bounds.x1) && within(point.y, e.bounds.y0, e.bounds.y1)
        })
    }

    /// Returns entities whose bounds overlap the region, bounds inclusive.
    ///
    /// Ranges may be given in either order.
    pub fn entities_intersecting(
        &self,
        x_range: (f64, f64),
        y_range: (f64, f64),
    ) -> impl Iterator<Item = &MarkEntity> + '_ {
        let region = Rect::new(x_range.0, y_range.0, x_range.1, y_range.1).abs();
        self.entities.iter().filter(move |e| overlaps(region, e.bounds))
    }

    /// Returns the entity closest to `point`, or `None` if no entity is visible.
    ///
    /// Distance is `(primary, secondary)` compared lexicographically, each measured to the
    /// nearest edge of the mark's span on that axis and `0` inside it.
    pub fn nearest(&self, point: Point) -> Option<&MarkEntity> {
        let (p, s) = self.orientation.split(point);
        let mut best: Option<(&MarkEntity, (f64, f64))> = None;
        for e in self.entities.iter().filter(|e| self.is_visible(e)) {
            let d = (
                span_distance(p, self.orientation.primary_span(e.bounds)),
                span_distance(s, self.orientation.secondary_span(e.bounds)),
            );
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((e, d));
            }
        }
        if let Some((e, d)) = best {
            tracing::trace!(dataset = e.dataset.0, index = e.index, ?d, "nearest entity");
        }
        best.map(|(e, _)| e)
    }

    fn is_visible(&self, e: &MarkEntity) -> bool {
        self.viewport.is_none_or(|v| overlaps(v, e.bounds))
    }
}

fn within(v: f64, lo: f64, hi: f64) -> bool {
    v >= lo - HIT_TOLERANCE && v <= hi + HIT_TOLERANCE
}

fn overlaps(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

fn span_distance(v: f64, (lo, hi): (f64, f64)) -> f64 {
    if within(v, lo, hi) {
        0.0
    } else if v < lo {
        lo - v
    } else {
        v - hi
    }
}
