// Copyright 2025 the VizMark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mark families.
//!
//! A family decides how a datum's value becomes a span along the primary axis, whether
//! datasets stack, and whether marks have a thickness. Everything else (baseline scaling,
//! width solving, draw steps, hit-testing) is shared by the plot engine.

use core::fmt::Debug;

use kurbo::BezPath;

use crate::projector::ProjectedMark;

/// Per-family geometry rules.
pub trait MarkFamily: Debug {
    /// Returns `true` if datasets are stacked on top of each other.
    fn is_stacked(&self) -> bool;

    /// Returns `true` if marks have a solved thickness; `false` for zero-thickness samples.
    fn has_thickness(&self) -> bool {
        true
    }

    /// Returns `(start, end)` of a mark along the primary axis, in domain units.
    ///
    /// `stack_offset` is `0` for unstacked families.
    fn primary_span(&self, baseline: f64, value: f64, stack_offset: f64) -> (f64, f64);

    /// Builds a closed outline through one dataset's marks, for families drawn as areas.
    fn outline(&self, marks: &[ProjectedMark]) -> Option<BezPath> {
        let _ = marks;
        None
    }
}

/// Rectangular bars, optionally stacked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BarFamily {
    /// Stack datasets on top of each other instead of overlaying them.
    pub stacked: bool,
}

impl BarFamily {
    /// Plain bars growing from the baseline.
    pub fn plain() -> Self {
        Self { stacked: false }
    }

    /// Bars stacked across datasets.
    pub fn stacked() -> Self {
        Self { stacked: true }
    }
}

impl MarkFamily for BarFamily {
    fn is_stacked(&self) -> bool {
        self.stacked
    }

    fn primary_span(&self, baseline: f64, value: f64, stack_offset: f64) -> (f64, f64) {
        if self.stacked {
            let start = baseline + stack_offset;
            (start, start + value)
        } else {
            (baseline, value)
        }
    }
}

/// Stacked areas: one zero-thickness sample per datum, outlined per dataset.
///
/// The outline follows the dataset's datum order, so data should be sorted along the
/// secondary axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StackedAreaFamily;

impl MarkFamily for StackedAreaFamily {
    fn is_stacked(&self) -> bool {
        true
    }

    fn has_thickness(&self) -> bool {
        false
    }

    fn primary_span(&self, baseline: f64, value: f64, stack_offset: f64) -> (f64, f64) {
        let start = baseline + stack_offset;
        (start, start + value)
    }

    fn outline(&self, marks: &[ProjectedMark]) -> Option<BezPath> {
        let first = marks.first()?;
        let mut p = BezPath::new();
        p.move_to(first.base);
        p.line_to(first.position);
        for m in marks.iter().skip(1) {
            p.line_to(m.position);
        }
        for m in marks.iter().rev() {
            p.line_to(m.base);
        }
        p.close_path();
        Some(p)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn plain_bars_span_from_baseline() {
        assert_eq!(BarFamily::plain().primary_span(1.0, 5.0, 3.0), (1.0, 5.0));
    }

    #[test]
    fn stacked_families_start_at_offset() {
        assert_eq!(BarFamily::stacked().primary_span(0.0, 4.0, 2.0), (2.0, 6.0));
        assert_eq!(StackedAreaFamily.primary_span(1.0, -1.0, -2.0), (-1.0, -2.0));
        assert!(!StackedAreaFamily.has_thickness());
        assert!(StackedAreaFamily.outline(&[]).is_none());
    }
}
