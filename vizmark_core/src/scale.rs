// Copyright 2025 the VizMark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scale boundary consumed by the geometry engine.

use core::fmt::Debug;

use crate::DomainValue;

/// How a discrete scale lays out its range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeType {
    /// Each domain value maps to a point; marks are centred on it.
    Points,
    /// Each domain value owns a fixed-width slot starting at the mapped position.
    Bands,
}

/// Maps domain values to pixel coordinates.
///
/// Continuous scales return `None` from [`ScaleBinding::range_type`]. Discrete scales report
/// their layout, and band scales additionally report the slot width through
/// [`ScaleBinding::range_band`]. For band scales, [`ScaleBinding::scale`] returns the start of
/// the slot, not its centre.
pub trait ScaleBinding: Debug {
    /// Maps a domain value to a pixel coordinate.
    ///
    /// Values the scale cannot place (unknown categories, non-positive values on a log scale,
    /// categories on a continuous scale) map to `f64::NAN`.
    fn scale(&self, value: &DomainValue) -> f64;

    /// Maps a pixel coordinate back to a domain value, if the scale can.
    fn invert(&self, pixel: f64) -> Option<DomainValue>;

    /// Returns the output range as authored (`(r0, r1)`, possibly descending).
    fn range(&self) -> (f64, f64);

    /// Returns the discrete layout, or `None` for continuous scales.
    fn range_type(&self) -> Option<RangeType> {
        None
    }

    /// Returns the slot width for band scales.
    fn range_band(&self) -> Option<f64> {
        None
    }

    /// Returns the spacing between adjacent positions for point scales.
    fn range_step(&self) -> Option<f64> {
        None
    }

    /// Maps a number; shorthand for `scale(&DomainValue::Number(v))`.
    fn scale_number(&self, v: f64) -> f64 {
        self.scale(&DomainValue::Number(v))
    }
}
