// Copyright 2025 the VizMark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Orientation and per-mark geometry.

extern crate alloc;

use alloc::string::ToString;
use core::str::FromStr;

use kurbo::{Point, Rect};

use crate::ConfigError;

/// Which pixel axis carries a mark's length.
///
/// - `Vertical`: column bars; length runs along y, thickness along x.
/// - `Horizontal`: row bars; length runs along x, thickness along y.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Length along y (the primary axis), thickness along x.
    #[default]
    Vertical,
    /// Length along x (the primary axis), thickness along y.
    Horizontal,
}

impl Orientation {
    /// Returns `true` for [`Orientation::Vertical`].
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Vertical)
    }

    /// Splits a point into `(primary, secondary)` coordinates.
    pub fn split(self, p: Point) -> (f64, f64) {
        match self {
            Self::Vertical => (p.y, p.x),
            Self::Horizontal => (p.x, p.y),
        }
    }

    /// Builds a point from `(primary, secondary)` coordinates.
    pub fn join(self, primary: f64, secondary: f64) -> Point {
        match self {
            Self::Vertical => Point::new(secondary, primary),
            Self::Horizontal => Point::new(primary, secondary),
        }
    }

    /// Returns the `(min, max)` extent of `rect` along the primary axis.
    pub fn primary_span(self, rect: Rect) -> (f64, f64) {
        match self {
            Self::Vertical => (rect.y0, rect.y1),
            Self::Horizontal => (rect.x0, rect.x1),
        }
    }

    /// Returns the `(min, max)` extent of `rect` along the secondary axis.
    pub fn secondary_span(self, rect: Rect) -> (f64, f64) {
        match self {
            Self::Vertical => (rect.x0, rect.x1),
            Self::Horizontal => (rect.y0, rect.y1),
        }
    }
}

impl FromStr for Orientation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("vertical") {
            Ok(Self::Vertical)
        } else if s.eq_ignore_ascii_case("horizontal") {
            Ok(Self::Horizontal)
        } else {
            Err(ConfigError::InvalidOrientation(s.to_string()))
        }
    }
}

/// Pixel geometry of one mark.
///
/// The mark covers `[primary_offset, primary_offset + length]` on the primary axis and
/// `[secondary_offset, secondary_offset + thickness]` on the secondary axis. `primary_offset`
/// is the lesser pixel coordinate of the baseline and the value end, so `length` and
/// `thickness` are never negative for projected marks.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BarGeometry {
    /// Start of the mark along the primary (length) axis.
    pub primary_offset: f64,
    /// Start of the mark along the secondary (thickness) axis.
    pub secondary_offset: f64,
    /// Extent along the primary axis.
    pub length: f64,
    /// Extent along the secondary axis.
    pub thickness: f64,
}

impl BarGeometry {
    /// Returns `true` if every component is finite.
    pub fn is_finite(&self) -> bool {
        self.primary_offset.is_finite()
            && self.secondary_offset.is_finite()
            && self.length.is_finite()
            && self.thickness.is_finite()
    }

    /// Returns the mark's bounding box in pixel space.
    pub fn to_rect(&self, orientation: Orientation) -> Rect {
        let p0 = self.primary_offset;
        let p1 = self.primary_offset + self.length;
        let s0 = self.secondary_offset;
        let s1 = self.secondary_offset + self.thickness;
        match orientation {
            Orientation::Vertical => Rect::new(s0, p0, s1, p1),
            Orientation::Horizontal => Rect::new(p0, s0, p1, s1),
        }
    }

    /// Returns the centre of the mark along the secondary axis.
    pub fn secondary_center(&self) -> f64 {
        self.secondary_offset + self.thickness * 0.5
    }

    /// Returns this geometry collapsed onto `scaled_baseline` with zero length.
    pub fn collapsed_to(&self, scaled_baseline: f64) -> Self {
        Self {
            primary_offset: scaled_baseline,
            length: 0.0,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn orientation_parses_case_insensitively() {
        assert_eq!("Vertical".parse::<Orientation>(), Ok(Orientation::Vertical));
        assert_eq!("horizontal".parse::<Orientation>(), Ok(Orientation::Horizontal));
        assert!(matches!(
            "diagonal".parse::<Orientation>(),
            Err(ConfigError::InvalidOrientation(_))
        ));
    }

    #[test]
    fn rect_follows_orientation() {
        let g = BarGeometry {
            primary_offset: 10.0,
            secondary_offset: 2.0,
            length: 5.0,
            thickness: 3.0,
        };
        assert_eq!(g.to_rect(Orientation::Vertical), Rect::new(2.0, 10.0, 5.0, 15.0));
        assert_eq!(g.to_rect(Orientation::Horizontal), Rect::new(10.0, 2.0, 15.0, 5.0));
    }
}
