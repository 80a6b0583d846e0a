// Copyright 2025 the VizMark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Datasets and accessors.

extern crate alloc;

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

/// Stable identifier for a [`Dataset`].
///
/// Used as a map key for per-dataset state (stack offsets, label settings) and reported on
/// query results.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DatasetId(pub u32);

/// An ordered sequence of application records with a stable identity.
///
/// The engine never inspects `D`; it only passes each record to caller-supplied
/// [`Accessor`]s.
#[derive(Clone)]
pub struct Dataset<D> {
    id: DatasetId,
    data: Vec<D>,
}

impl<D> Dataset<D> {
    /// Creates a dataset.
    pub fn new(id: DatasetId, data: Vec<D>) -> Self {
        Self { id, data }
    }

    /// Returns the dataset id.
    pub fn id(&self) -> DatasetId {
        self.id
    }

    /// Returns the records in order.
    pub fn data(&self) -> &[D] {
        &self.data
    }

    /// Returns the record at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&D> {
        self.data.get(index)
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the dataset holds no records.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Replaces the records, keeping the id.
    pub fn set_data(&mut self, data: Vec<D>) {
        self.data = data;
    }
}

impl<D> fmt::Debug for Dataset<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dataset")
            .field("id", &self.id)
            .field("len", &self.data.len())
            .finish_non_exhaustive()
    }
}

/// A pure function `(datum, index, dataset) -> value`.
///
/// Accessors may be called several times per datum within one geometry pass (width solving,
/// stacking, projection), so they must be deterministic and free of side effects.
pub type Accessor<D, T> = Arc<dyn Fn(&D, usize, &Dataset<D>) -> T>;

/// Wraps a closure as an [`Accessor`].
pub fn accessor<D, T>(f: impl Fn(&D, usize, &Dataset<D>) -> T + 'static) -> Accessor<D, T> {
    Arc::new(f)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;

    #[test]
    fn accessor_sees_index_and_dataset() {
        let ds = Dataset::new(DatasetId(7), vec![10.0_f64, 20.0]);
        let get = accessor(|d: &f64, i, ds: &Dataset<f64>| {
            *d + i as f64 + f64::from(ds.id().0)
        });
        assert_eq!(get(&ds.data()[1], 1, &ds), 28.0);
        assert_eq!(ds.len(), 2);
    }
}
