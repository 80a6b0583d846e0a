// Copyright 2025 the VizMark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Concrete scales.
//!
//! The geometry engine only sees [`ScaleBinding`]; these are the stock implementations
//! (linear, log, time, point, band) used by plots and tests.

extern crate alloc;

use alloc::vec::Vec;

use hashbrown::HashMap;
use vizmark_core::{DomainValue, RangeType, ScaleBinding};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// A linear mapping from a continuous domain to a continuous range.
#[derive(Clone, Copy, Debug)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
}

impl ScaleLinear {
    /// Creates a new scale mapping `domain` values to `range` values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 {
            return r0;
        }
        let t = (x - d0) / denom;
        r0 + t * (r1 - r0)
    }

    /// Maps a value from range space back into domain space.
    pub fn unmap(&self, y: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = r1 - r0;
        if denom == 0.0 {
            return d0;
        }
        let t = (y - r0) / denom;
        d0 + t * (d1 - d0)
    }

    /// Returns the domain as authored.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }
}

impl ScaleBinding for ScaleLinear {
    fn scale(&self, value: &DomainValue) -> f64 {
        value.as_f64().map_or(f64::NAN, |v| self.map(v))
    }

    fn invert(&self, pixel: f64) -> Option<DomainValue> {
        let v = self.unmap(pixel);
        v.is_finite().then_some(DomainValue::Number(v))
    }

    fn range(&self) -> (f64, f64) {
        self.range
    }
}

/// A log-scale mapping from a positive domain to a range.
#[derive(Clone, Copy, Debug)]
pub struct ScaleLog {
    domain: (f64, f64),
    range: (f64, f64),
    base: f64,
}

impl ScaleLog {
    /// Creates a new log scale with base 10.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            domain,
            range,
            base: 10.0,
        }
    }

    /// Sets the log base.
    pub fn with_base(mut self, base: f64) -> Self {
        self.base = if base.is_finite() && base > 0.0 && base != 1.0 {
            base
        } else {
            10.0
        };
        self
    }

    fn log_base(&self, x: f64) -> f64 {
        let denom = self.base.ln();
        if denom == 0.0 { x.ln() } else { x.ln() / denom }
    }

    /// Maps a value from domain space into range space.
    ///
    /// Non-positive values have no logarithm and map to `NaN`.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if x <= 0.0 || d0 <= 0.0 || d1 <= 0.0 {
            return f64::NAN;
        }
        let ld0 = self.log_base(d0);
        let ld1 = self.log_base(d1);
        let denom = ld1 - ld0;
        if denom == 0.0 {
            return r0;
        }
        let t = (self.log_base(x) - ld0) / denom;
        r0 + t * (r1 - r0)
    }

    /// Maps a value from range space back into domain space.
    pub fn unmap(&self, y: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d0 <= 0.0 || d1 <= 0.0 {
            return f64::NAN;
        }
        let denom = r1 - r0;
        if denom == 0.0 {
            return d0;
        }
        let ld0 = self.log_base(d0);
        let ld1 = self.log_base(d1);
        let t = (y - r0) / denom;
        self.base.powf(ld0 + t * (ld1 - ld0))
    }
}

impl ScaleBinding for ScaleLog {
    fn scale(&self, value: &DomainValue) -> f64 {
        value.as_f64().map_or(f64::NAN, |v| self.map(v))
    }

    fn invert(&self, pixel: f64) -> Option<DomainValue> {
        let v = self.unmap(pixel);
        v.is_finite().then_some(DomainValue::Number(v))
    }

    fn range(&self) -> (f64, f64) {
        self.range
    }
}

/// A time scale (a linear scale over numeric timestamps, e.g. seconds).
#[derive(Clone, Copy, Debug)]
pub struct ScaleTime {
    inner: ScaleLinear,
}

impl ScaleTime {
    /// Creates a new time scale.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            inner: ScaleLinear::new(domain, range),
        }
    }

    /// Maps a timestamp value into range space.
    pub fn map(&self, t: f64) -> f64 {
        self.inner.map(t)
    }
}

impl ScaleBinding for ScaleTime {
    fn scale(&self, value: &DomainValue) -> f64 {
        self.inner.scale(value)
    }

    fn invert(&self, pixel: f64) -> Option<DomainValue> {
        self.inner.invert(pixel)
    }

    fn range(&self) -> (f64, f64) {
        self.inner.range
    }
}

/// An ordered categorical domain with an index lookup.
#[derive(Clone, Debug, Default)]
struct Categories {
    values: Vec<DomainValue>,
    index: HashMap<DomainValue, usize>,
}

impl Categories {
    fn new<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<DomainValue>,
    {
        let mut out = Self::default();
        for v in values {
            let v = v.into();
            if !out.index.contains_key(&v) {
                out.index.insert(v.clone(), out.values.len());
                out.values.push(v);
            }
        }
        out
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn position(&self, v: &DomainValue) -> Option<usize> {
        self.index.get(v).copied()
    }
}

fn range_start(range: (f64, f64)) -> f64 {
    let (r0, r1) = range;
    if r1 >= r0 { r0 } else { r1 }
}

/// A discrete band scale for categorical charts.
///
/// Each category owns a slot of [`ScaleBand::band_width`] pixels; [`ScaleBinding::scale`]
/// returns the start of the slot.
#[derive(Clone, Debug)]
pub struct ScaleBand {
    range: (f64, f64),
    domain: Categories,
    padding_inner: f64,
    padding_outer: f64,
}

impl ScaleBand {
    /// Creates a new band scale over `domain` (duplicates are ignored) covering `range`.
    pub fn new<I, V>(domain: I, range: (f64, f64)) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<DomainValue>,
    {
        Self {
            range,
            domain: Categories::new(domain),
            padding_inner: 0.1,
            padding_outer: 0.1,
        }
    }

    /// Sets inner and outer padding in band units.
    pub fn with_padding(mut self, inner: f64, outer: f64) -> Self {
        self.padding_inner = inner.max(0.0);
        self.padding_outer = outer.max(0.0);
        self
    }

    /// Returns the computed band width.
    pub fn band_width(&self) -> f64 {
        let (r0, r1) = self.range;
        let n = self.domain.len() as f64;
        if n <= 0.0 {
            return 0.0;
        }
        let span = (r1 - r0).abs();
        let denom = n + self.padding_inner * (n - 1.0) + 2.0 * self.padding_outer;
        if denom == 0.0 { 0.0 } else { span / denom }
    }

    /// Returns the distance between the starts of adjacent bands.
    pub fn step(&self) -> f64 {
        self.band_width() * (1.0 + self.padding_inner)
    }

    /// Returns the number of bands.
    pub fn count(&self) -> usize {
        self.domain.len()
    }

    /// Returns the categories in band order.
    pub fn domain(&self) -> &[DomainValue] {
        &self.domain.values
    }

    /// Returns the start position for a band at `index`.
    pub fn x(&self, index: usize) -> f64 {
        let bw = self.band_width();
        range_start(self.range) + bw * self.padding_outer + self.step() * index as f64
    }
}

impl ScaleBinding for ScaleBand {
    fn scale(&self, value: &DomainValue) -> f64 {
        self.domain.position(value).map_or(f64::NAN, |i| self.x(i))
    }

    fn invert(&self, pixel: f64) -> Option<DomainValue> {
        let step = self.step();
        if self.count() == 0 || step <= 0.0 {
            return None;
        }
        let rel = (pixel - self.x(0)) / step;
        if !rel.is_finite() || rel < 0.0 {
            return None;
        }
        #[allow(clippy::cast_possible_truncation, reason = "finite and non-negative")]
        let i = rel.floor() as usize;
        if i >= self.count() || pixel > self.x(i) + self.band_width() {
            return None;
        }
        self.domain.values.get(i).cloned()
    }

    fn range(&self) -> (f64, f64) {
        self.range
    }

    fn range_type(&self) -> Option<RangeType> {
        Some(RangeType::Bands)
    }

    fn range_band(&self) -> Option<f64> {
        Some(self.band_width())
    }
}

/// A discrete point scale (like band without width).
#[derive(Clone, Debug)]
pub struct ScalePoint {
    range: (f64, f64),
    domain: Categories,
    padding: f64,
}

impl ScalePoint {
    /// Creates a new point scale over `domain` (duplicates are ignored) covering `range`.
    pub fn new<I, V>(domain: I, range: (f64, f64)) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<DomainValue>,
    {
        Self {
            range,
            domain: Categories::new(domain),
            padding: 0.5,
        }
    }

    /// Sets the outer padding in point steps.
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding.max(0.0);
        self
    }

    /// Returns the distance between adjacent points (`0` for fewer than two points).
    pub fn step(&self) -> f64 {
        let (r0, r1) = self.range;
        let n = self.domain.len() as f64;
        if n <= 1.0 {
            return 0.0;
        }
        let span = (r1 - r0).abs();
        let denom = (n - 1.0) + 2.0 * self.padding;
        if denom == 0.0 { 0.0 } else { span / denom }
    }

    /// Returns the categories in point order.
    pub fn domain(&self) -> &[DomainValue] {
        &self.domain.values
    }

    /// Returns the position for a point at `index`.
    pub fn x(&self, index: usize) -> f64 {
        let step = self.step();
        range_start(self.range) + self.padding * step + step * index as f64
    }
}

impl ScaleBinding for ScalePoint {
    fn scale(&self, value: &DomainValue) -> f64 {
        self.domain.position(value).map_or(f64::NAN, |i| self.x(i))
    }

    /// Returns the category whose point is nearest to `pixel`.
    #[allow(clippy::cast_possible_truncation, reason = "clamped before cast")]
    fn invert(&self, pixel: f64) -> Option<DomainValue> {
        let n = self.domain.len();
        if n == 0 || !pixel.is_finite() {
            return None;
        }
        let step = self.step();
        let i = if step > 0.0 {
            let rel = ((pixel - self.x(0)) / step).round();
            rel.clamp(0.0, (n - 1) as f64) as usize
        } else {
            0
        };
        self.domain.values.get(i).cloned()
    }

    fn range(&self) -> (f64, f64) {
        self.range
    }

    fn range_type(&self) -> Option<RangeType> {
        Some(RangeType::Points)
    }

    fn range_step(&self) -> Option<f64> {
        let step = self.step();
        (step > 0.0).then_some(step)
    }
}
