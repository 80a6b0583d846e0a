// Copyright 2025 the VizMark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-datum bar geometry.
//!
//! A [`ProjectionSnapshot`] is an immutable view of everything a geometry pass reads: the
//! scales, accessors, baseline, orientation, mark family, solved thickness, and resolved
//! stack offsets. Projection is a pure function of the snapshot; the plot builds a new
//! snapshot whenever any input changes.

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;

use kurbo::Point;
use vizmark_core::{
    Accessor, BarGeometry, Dataset, DatasetId, DomainValue, Orientation, RangeType, ScaleBinding,
};
use vizmark_transforms::StackOffsets;

use crate::family::MarkFamily;

/// Accessors reading a datum's position, value, and optional explicit thickness.
pub struct MarkAccessors<D> {
    /// Position along the secondary axis; also the stack key.
    pub domain: Accessor<D, DomainValue>,
    /// Value along the primary axis.
    pub value: Accessor<D, f64>,
    /// Per-datum thickness in pixels, overriding the solved width on continuous scales.
    pub thickness: Option<Accessor<D, f64>>,
}

impl<D> MarkAccessors<D> {
    /// Creates accessors without an explicit thickness.
    pub fn new(domain: Accessor<D, DomainValue>, value: Accessor<D, f64>) -> Self {
        Self {
            domain,
            value,
            thickness: None,
        }
    }

    /// Sets a per-datum thickness accessor.
    pub fn with_thickness(mut self, thickness: Accessor<D, f64>) -> Self {
        self.thickness = Some(thickness);
        self
    }
}

impl<D> Clone for MarkAccessors<D> {
    fn clone(&self) -> Self {
        Self {
            domain: self.domain.clone(),
            value: self.value.clone(),
            thickness: self.thickness.clone(),
        }
    }
}

impl<D> fmt::Debug for MarkAccessors<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkAccessors")
            .field("thickness", &self.thickness.is_some())
            .finish_non_exhaustive()
    }
}

/// One drawable mark.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectedMark {
    /// Dataset the datum belongs to.
    pub dataset: DatasetId,
    /// Index of the datum within its dataset.
    pub index: usize,
    /// Pixel geometry.
    pub geometry: BarGeometry,
    /// Value end of the mark, centred on the secondary axis.
    pub position: Point,
    /// Start of the mark's span (baseline or stack offset), centred on the secondary axis.
    pub base: Point,
}

/// Drawable marks of one geometry pass.
#[derive(Clone, Debug, Default)]
pub struct Projection {
    /// Finite marks, in draw order (dataset order, then datum index).
    pub marks: Vec<ProjectedMark>,
    /// Number of datums dropped because their geometry was not finite.
    pub dropped: usize,
}

/// Immutable inputs of a geometry pass.
pub struct ProjectionSnapshot<'a, D> {
    /// Plot orientation.
    pub orientation: Orientation,
    /// Baseline, in primary domain units.
    pub baseline: f64,
    /// Scale for the length axis.
    pub primary_scale: &'a dyn ScaleBinding,
    /// Scale for the thickness axis.
    pub secondary_scale: &'a dyn ScaleBinding,
    /// Datum accessors.
    pub accessors: &'a MarkAccessors<D>,
    /// Mark family.
    pub family: &'a dyn MarkFamily,
    /// Shared thickness from [`crate::BarWidthSolver`].
    pub thickness: f64,
    /// Resolved offsets; only read when the family stacks.
    pub stack: Option<&'a StackOffsets>,
}

impl<D> fmt::Debug for ProjectionSnapshot<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectionSnapshot")
            .field("orientation", &self.orientation)
            .field("baseline", &self.baseline)
            .field("family", &self.family)
            .field("thickness", &self.thickness)
            .finish_non_exhaustive()
    }
}

impl<D> ProjectionSnapshot<'_, D> {
    /// Returns the baseline in pixels.
    pub fn scaled_baseline(&self) -> f64 {
        self.primary_scale.scale_number(self.baseline)
    }

    /// Returns the projection function for `dataset`.
    ///
    /// The result may be non-finite; see [`ProjectionSnapshot::project_all`] for the
    /// filtered set.
    pub fn projector<'s>(
        &'s self,
        dataset: &'s Dataset<D>,
    ) -> impl Fn(&D, usize) -> BarGeometry + 's {
        move |datum, index| self.project_datum(dataset, datum, index).geometry
    }

    /// Projects every datum of `datasets`, dropping non-finite geometry.
    pub fn project_all<'d>(&self, datasets: impl IntoIterator<Item = &'d Dataset<D>>) -> Projection
    where
        D: 'd,
    {
        let mut out = Projection::default();
        for dataset in datasets {
            for (index, datum) in dataset.data().iter().enumerate() {
                let mark = self.project_datum(dataset, datum, index);
                if is_drawable(&mark.geometry) {
                    out.marks.push(mark);
                } else {
                    out.dropped += 1;
                }
            }
        }
        out
    }

    fn project_datum(&self, dataset: &Dataset<D>, datum: &D, index: usize) -> ProjectedMark {
        let key = (self.accessors.domain)(datum, index, dataset);
        let value = (self.accessors.value)(datum, index, dataset);

        let stack_offset = match self.stack {
            Some(stack) if self.family.is_stacked() => {
                stack.offset(dataset.id(), &key).unwrap_or(0.0)
            }
            _ => 0.0,
        };
        let (start, end) = self.family.primary_span(self.baseline, value, stack_offset);
        let start_px = self.primary_scale.scale_number(start);
        let end_px = self.primary_scale.scale_number(end);

        let primary_offset = if end_px > start_px { start_px } else { end_px };
        let length = (start_px - end_px).abs();

        let secondary_px = self.secondary_scale.scale(&key);
        let band = match self.secondary_scale.range_type() {
            Some(RangeType::Bands) => self.secondary_scale.range_band(),
            _ => None,
        };
        let (secondary_offset, thickness) = match (self.family.has_thickness(), band) {
            (false, Some(band)) => (secondary_px + band * 0.5, 0.0),
            (false, None) => (secondary_px, 0.0),
            (true, Some(band)) => (secondary_px, band),
            (true, None) => {
                let t = match &self.accessors.thickness {
                    Some(f) => f(datum, index, dataset),
                    None => self.thickness,
                };
                (secondary_px - t * 0.5, t)
            }
        };

        let geometry = BarGeometry {
            primary_offset,
            secondary_offset,
            length,
            thickness,
        };
        let centre = geometry.secondary_center();
        ProjectedMark {
            dataset: dataset.id(),
            index,
            geometry,
            position: self.orientation.join(end_px, centre),
            base: self.orientation.join(start_px, centre),
        }
    }
}

fn is_drawable(g: &BarGeometry) -> bool {
    g.is_finite() && g.length >= 0.0 && g.thickness >= 0.0
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;
    use crate::{BarFamily, ScaleBand, ScaleLinear};
    use vizmark_core::accessor;

    struct Row {
        x: f64,
        y: f64,
    }

    fn rows() -> Dataset<Row> {
        Dataset::new(
            DatasetId(1),
            vec![
                Row { x: 1.0, y: 5.0 },
                Row { x: 2.0, y: -3.0 },
                Row { x: 3.0, y: 0.0 },
            ],
        )
    }

    fn accessors() -> MarkAccessors<Row> {
        MarkAccessors::new(
            accessor(|r: &Row, _, _| DomainValue::Number(r.x)),
            accessor(|r: &Row, _, _| r.y),
        )
    }

    #[test]
    fn bars_span_from_baseline_either_sign() {
        let x = ScaleLinear::new((1.0, 3.0), (0.0, 100.0));
        let y = ScaleLinear::new((-3.0, 5.0), (100.0, 0.0));
        let acc = accessors();
        let family = BarFamily::plain();
        let snap = ProjectionSnapshot {
            orientation: Orientation::Vertical,
            baseline: 0.0,
            primary_scale: &y,
            secondary_scale: &x,
            accessors: &acc,
            family: &family,
            thickness: 10.0,
            stack: None,
        };
        assert_eq!(snap.scaled_baseline(), 62.5);

        let data = rows();
        let project = snap.projector(&data);
        let g0 = project(&data.data()[0], 0);
        assert_eq!(g0.primary_offset, 0.0);
        assert_eq!(g0.length, 62.5);
        assert_eq!(g0.secondary_offset, -5.0);
        let g1 = project(&data.data()[1], 1);
        assert_eq!(g1.primary_offset, 62.5);
        assert_eq!(g1.length, 37.5);
        let g2 = project(&data.data()[2], 2);
        assert_eq!(g2.length, 0.0);
        assert_eq!(g2.primary_offset, 62.5);
    }

    #[test]
    fn band_scale_overrides_centred_thickness() {
        let x = ScaleBand::new(["a", "b"], (0.0, 100.0)).with_padding(0.0, 0.0);
        let y = ScaleLinear::new((0.0, 10.0), (100.0, 0.0));
        let acc = MarkAccessors::new(
            accessor(|r: &(&'static str, f64), _, _| DomainValue::from(r.0)),
            accessor(|r: &(&'static str, f64), _, _| r.1),
        )
        .with_thickness(accessor(|_: &(&'static str, f64), _, _| 3.0));
        let family = BarFamily::plain();
        let snap = ProjectionSnapshot {
            orientation: Orientation::Vertical,
            baseline: 0.0,
            primary_scale: &y,
            secondary_scale: &x,
            accessors: &acc,
            family: &family,
            thickness: 1.0,
            stack: None,
        };
        let data = Dataset::new(DatasetId(0), vec![("a", 2.0), ("b", 4.0), ("z", 1.0)]);
        let out = snap.project_all([&data]);
        assert_eq!(out.dropped, 1);
        assert_eq!(out.marks.len(), 2);
        assert_eq!(out.marks[1].geometry.secondary_offset, 50.0);
        assert_eq!(out.marks[1].geometry.thickness, 50.0);
        assert_eq!(out.marks[1].position, Point::new(75.0, 60.0));
        assert_eq!(out.marks[1].base, Point::new(75.0, 100.0));
    }

    #[test]
    fn explicit_thickness_applies_on_continuous_scales() {
        let x = ScaleLinear::new((0.0, 10.0), (0.0, 100.0));
        let y = ScaleLinear::new((0.0, 10.0), (0.0, 100.0));
        let acc = accessors().with_thickness(accessor(|r: &Row, _, _| r.x * 2.0));
        let family = BarFamily::plain();
        let snap = ProjectionSnapshot {
            orientation: Orientation::Horizontal,
            baseline: 0.0,
            primary_scale: &y,
            secondary_scale: &x,
            accessors: &acc,
            family: &family,
            thickness: 8.0,
            stack: None,
        };
        let data = rows();
        let g = snap.projector(&data)(&data.data()[1], 1);
        assert_eq!(g.thickness, 4.0);
        assert_eq!(g.secondary_offset, 18.0);
        assert_eq!(g.primary_offset, -30.0);
        assert_eq!(g.length, 30.0);
    }
}
