// Copyright 2025 the VizMark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mark geometry and spatial queries for `vizmark_core` datasets.
//!
//! This crate turns datasets, scales, and accessors into pixel geometry for bars and
//! stacked areas, and answers hit-testing queries over the result:
//! - **Projection** ([`ProjectionSnapshot`]) maps each datum to a [`BarGeometry`] measured
//!   from the baseline.
//! - **Width solving** ([`BarWidthSolver`]) picks one thickness shared by every mark.
//! - **Stacking** uses `vizmark_transforms` to offset datasets on top of each other.
//! - **Draw steps** ([`build_draw_steps`]) hand reset and main phases to an external
//!   animation driver.
//! - **Spatial queries** ([`SpatialQueryEngine`]) find marks at, inside, or nearest a point.
//!
//! [`Plot`] ties these together and rebuilds its geometry on every change. Rendering, text
//! shaping, and animation timing are out of scope.
//!
//! [`BarGeometry`]: vizmark_core::BarGeometry

#![no_std]

extern crate alloc;

mod bar_width;
mod draw_steps;
mod family;
#[cfg(not(feature = "std"))]
mod float;
mod label;
mod plot;
mod projector;
mod scale;
mod spatial;


pub use bar_width::{
    BarWidthSolver, DEFAULT_MIN_WIDTH, DEFAULT_SHRINK_RATIO, DEFAULT_SINGLE_BAR_RATIO,
};
pub use draw_steps::{
    AnimationConfig, AnimationDriver, Animator, DrawStep, DrawSteps, build_draw_steps,
};
pub use family::{BarFamily, MarkFamily, StackedAreaFamily};
pub use label::{
    HeuristicTextMeasurer, LabelConfig, LabelFit, PlacedLabel, TextMeasurer, fit_label,
};
pub use plot::{Entity, Plot, PlotConfig};
pub use projector::{MarkAccessors, ProjectedMark, Projection, ProjectionSnapshot};
pub use scale::{ScaleBand, ScaleLinear, ScaleLog, ScalePoint, ScaleTime};
pub use spatial::{HIT_TOLERANCE, MarkEntity, SpatialQueryEngine};
