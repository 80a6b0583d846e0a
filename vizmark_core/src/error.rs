// Copyright 2025 the VizMark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration errors.

extern crate alloc;

use alloc::string::String;

use crate::DatasetId;

/// Errors raised when a plot or solver is configured with values that have no geometric
/// meaning.
///
/// These are rejected up front; a geometry pass never produces them.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The orientation string is neither `"vertical"` nor `"horizontal"`.
    #[error("invalid orientation {0:?}, expected \"vertical\" or \"horizontal\"")]
    InvalidOrientation(String),
    /// A ratio parameter is non-finite or outside `(0, 1]`.
    #[error("{name} must be a finite ratio in (0, 1], got {value}")]
    InvalidRatio {
        /// Parameter name.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// A pixel length parameter is non-finite or negative.
    #[error("{name} must be a finite, non-negative length, got {value}")]
    InvalidLength {
        /// Parameter name.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// A domain-space parameter (such as the baseline) is NaN or infinite.
    #[error("{name} must be finite, got {value}")]
    NonFinite {
        /// Parameter name.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// The dataset is not attached to the plot.
    #[error("dataset {0:?} is not attached")]
    UnknownDataset(DatasetId),
    /// A dataset with this id is already attached.
    #[error("dataset {0:?} is already attached")]
    DuplicateDataset(DatasetId),
}

impl ConfigError {
    /// Validates a ratio in `(0, 1]`.
    pub fn check_ratio(name: &'static str, value: f64) -> Result<f64, Self> {
        if value.is_finite() && value > 0.0 && value <= 1.0 {
            Ok(value)
        } else {
            Err(Self::InvalidRatio { name, value })
        }
    }

    /// Validates a finite value.
    pub fn check_finite(name: &'static str, value: f64) -> Result<f64, Self> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Self::NonFinite { name, value })
        }
    }

    /// Validates a finite, non-negative pixel length.
    pub fn check_length(name: &'static str, value: f64) -> Result<f64, Self> {
        if value.is_finite() && value >= 0.0 {
            Ok(value)
        } else {
            Err(Self::InvalidLength { name, value })
        }
    }
}
