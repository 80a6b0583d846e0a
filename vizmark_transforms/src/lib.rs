// Copyright 2025 the VizMark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dataset transforms for the mark geometry engine.
//!
//! This crate currently provides stack resolution:
//! - [`StackOffsetResolver`] accumulates per-key offsets over datasets in stack order, and
//! - [`StackOutcome`] carries the offsets together with any [`StackDiagnostic`]s.
//!
//! Inconsistent stacks (datasets that do not cover the same keys) are reported, not
//! rejected; missing keys are treated as a zero value so partially loaded data still renders.

#![no_std]

extern crate alloc;

mod stack;

pub use stack::{StackDiagnostic, StackOffsetResolver, StackOffsets, StackOutcome};
