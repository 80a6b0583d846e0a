// Copyright 2025 the VizMark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared bar thickness.

extern crate alloc;

use alloc::vec::Vec;

use vizmark_core::{ConfigError, DomainValue, RangeType, ScaleBinding};

/// Default fraction of the available slot a bar fills.
pub const DEFAULT_SHRINK_RATIO: f64 = 0.95;
/// Default fraction of the available extent used when only one distinct value is plotted.
pub const DEFAULT_SINGLE_BAR_RATIO: f64 = 0.4;
/// Default lower bound for a solved width, in pixels.
pub const DEFAULT_MIN_WIDTH: f64 = 1.0;

/// Solves the single pixel thickness shared by every bar of a plot.
///
/// The regime follows the thickness-axis scale:
/// - **bands**: the band width, as is;
/// - **points**: the point step times the shrink ratio;
/// - **continuous**: the smallest pixel gap between adjacent distinct values, clamped so
///   bars at either end stay inside the available pixel interval, times the shrink ratio.
///
/// The low clamp only applies when the smallest value sits strictly inside the interval.
/// The high clamp always applies: a value on or past the far edge leaves no room and the
/// width falls to the minimum.
///
/// Degenerate inputs (no gap, non-finite pixels) never produce a zero or negative width;
/// the result is floored at the configured minimum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarWidthSolver {
    shrink_ratio: f64,
    single_bar_ratio: f64,
    min_width: f64,
}

impl Default for BarWidthSolver {
    fn default() -> Self {
        Self {
            shrink_ratio: DEFAULT_SHRINK_RATIO,
            single_bar_ratio: DEFAULT_SINGLE_BAR_RATIO,
            min_width: DEFAULT_MIN_WIDTH,
        }
    }
}

impl BarWidthSolver {
    /// Creates a solver with the given shrink ratio (in `(0, 1]`).
    pub fn new(shrink_ratio: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            shrink_ratio: ConfigError::check_ratio("shrink_ratio", shrink_ratio)?,
            ..Self::default()
        })
    }

    /// Sets the fraction of the available extent used for a lone bar (in `(0, 1]`).
    pub fn with_single_bar_ratio(mut self, ratio: f64) -> Result<Self, ConfigError> {
        self.single_bar_ratio = ConfigError::check_ratio("single_bar_ratio", ratio)?;
        Ok(self)
    }

    /// Sets the minimum solved width in pixels.
    pub fn with_min_width(mut self, min_width: f64) -> Result<Self, ConfigError> {
        self.min_width = ConfigError::check_length("min_width", min_width)?;
        Ok(self)
    }

    /// Returns the shrink ratio.
    pub fn shrink_ratio(&self) -> f64 {
        self.shrink_ratio
    }

    /// Solves the width for `values` plotted on `scale` within the pixel interval
    /// `available`, given as `(min, max)`.
    ///
    /// `values` are the distinct thickness-axis domain values across every dataset of the
    /// plot; duplicates are tolerated.
    pub fn solve(
        &self,
        scale: &dyn ScaleBinding,
        values: &[DomainValue],
        available: (f64, f64),
    ) -> f64 {
        let (min, max) = available;
        let available_extent = (max - min).max(0.0);
        match scale.range_type() {
            Some(RangeType::Bands) => {
                let band = scale.range_band().unwrap_or(0.0);
                if band.is_finite() { band.max(0.0) } else { 0.0 }
            }
            Some(RangeType::Points) => {
                let step = scale
                    .range_step()
                    .or_else(|| min_gap(&sorted_pixels(scale, values)));
                let candidate = match step {
                    Some(step) if step > 0.0 => step,
                    _ => available_extent * self.single_bar_ratio,
                };
                self.finish(candidate)
            }
            None => {
                let pixels = sorted_pixels(scale, values);
                let mut candidate =
                    min_gap(&pixels).unwrap_or(available_extent * self.single_bar_ratio);
                if let (Some(&lo), Some(&hi)) = (pixels.first(), pixels.last()) {
                    if lo > min {
                        candidate = candidate.min(2.0 * (lo - min));
                    }
                    candidate = candidate.min(2.0 * (max - hi).max(0.0));
                }
                self.finish(candidate)
            }
        }
    }

    fn finish(&self, candidate: f64) -> f64 {
        let width = candidate * self.shrink_ratio;
        if width.is_finite() && width >= self.min_width {
            width
        } else {
            self.min_width
        }
    }
}

fn sorted_pixels(scale: &dyn ScaleBinding, values: &[DomainValue]) -> Vec<f64> {
    let mut pixels: Vec<f64> = values
        .iter()
        .map(|v| scale.scale(v))
        .filter(|p| p.is_finite())
        .collect();
    pixels.sort_by(f64::total_cmp);
    pixels.dedup();
    pixels
}

fn min_gap(sorted: &[f64]) -> Option<f64> {
    sorted
        .windows(2)
        .map(|w| w[1] - w[0])
        .min_by(f64::total_cmp)
}
