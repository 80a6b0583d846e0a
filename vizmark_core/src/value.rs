// Copyright 2025 the VizMark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Domain values.

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};

/// A value in a scale's domain.
///
/// Continuous scales read [`DomainValue::Number`]; band and point scales match on the whole
/// value, so numeric categories work as well as string keys.
///
/// Equality and hashing treat numbers by bit pattern after folding `-0.0` into `0.0` and all
/// NaNs into one canonical NaN, which makes the type usable as a map key.
#[derive(Clone, Debug)]
pub enum DomainValue {
    /// A numeric value.
    Number(f64),
    /// A categorical key.
    Category(Arc<str>),
}

impl DomainValue {
    /// Returns the numeric value, if this is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Category(_) => None,
        }
    }

    /// Returns the category key, if this is a category.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Number(_) => None,
            Self::Category(k) => Some(k),
        }
    }

    fn number_bits(v: f64) -> u64 {
        if v == 0.0 {
            0
        } else if v.is_nan() {
            f64::NAN.to_bits()
        } else {
            v.to_bits()
        }
    }
}

impl PartialEq for DomainValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => Self::number_bits(*a) == Self::number_bits(*b),
            (Self::Category(a), Self::Category(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for DomainValue {}

impl Hash for DomainValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Number(v) => {
                0_u8.hash(state);
                Self::number_bits(*v).hash(state);
            }
            Self::Category(k) => {
                1_u8.hash(state);
                k.hash(state);
            }
        }
    }
}

impl PartialOrd for DomainValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DomainValue {
    /// Numbers sort before categories; numbers use `f64::total_cmp` (NaN last).
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => {
                f64::from_bits(Self::number_bits(*a)).total_cmp(&f64::from_bits(Self::number_bits(*b)))
            }
            (Self::Number(_), Self::Category(_)) => Ordering::Less,
            (Self::Category(_), Self::Number(_)) => Ordering::Greater,
            (Self::Category(a), Self::Category(b)) => a.cmp(b),
        }
    }
}

impl fmt::Display for DomainValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v}"),
            Self::Category(k) => f.write_str(k),
        }
    }
}

impl From<f64> for DomainValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for DomainValue {
    fn from(value: &str) -> Self {
        Self::Category(value.into())
    }
}

impl From<String> for DomainValue {
    fn from(value: String) -> Self {
        Self::Category(value.into())
    }
}

impl From<Arc<str>> for DomainValue {
    fn from(value: Arc<str>) -> Self {
        Self::Category(value)
    }
}
