// Copyright 2025 the VizMark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `vizmark_core`: the data model shared by the mark geometry engine.
//!
//! This crate provides:
//! - opaque, application-owned data wrapped in [`Dataset`]s with a stable [`DatasetId`]
//! - caller-supplied [`Accessor`]s that extract values from a datum
//! - plot [`Orientation`] and the per-mark output, [`BarGeometry`]
//! - the consumed [`ScaleBinding`] boundary (domain value to pixel)
//! - configuration errors ([`ConfigError`])
//!
//! It intentionally does NOT compute any geometry; see `vizmark_charts` for that.

#![no_std]

extern crate alloc;

mod dataset;
mod error;
mod geometry;
mod scale;
mod value;

pub use dataset::{Accessor, Dataset, DatasetId, accessor};
pub use error::ConfigError;
pub use geometry::{BarGeometry, Orientation};
pub use scale::{RangeType, ScaleBinding};
pub use value::DomainValue;
