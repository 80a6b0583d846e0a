// Copyright 2025 the VizMark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stack offset resolution.

extern crate alloc;

use alloc::vec::Vec;

use hashbrown::HashMap;
use vizmark_core::{Accessor, Dataset, DatasetId, DomainValue};

/// A non-fatal problem found while resolving a stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackDiagnostic {
    /// The dataset has no datum for keys that other datasets in the group cover.
    ///
    /// Those keys were resolved as if the dataset contributed a value of zero.
    MissingKeys {
        /// The dataset lacking the keys.
        dataset: DatasetId,
        /// The missing keys, in first-seen order across the group.
        keys: Vec<DomainValue>,
    },
}

/// Resolved per-`(dataset, key)` offsets for one stack group.
#[derive(Debug, Clone, Default)]
pub struct StackOffsets {
    keys: Vec<DomainValue>,
    offsets: HashMap<(DatasetId, DomainValue), f64>,
    positive_totals: Vec<f64>,
    negative_totals: Vec<f64>,
}

impl StackOffsets {
    /// Returns the offset at which `dataset` starts stacking for `key`.
    ///
    /// Returns `None` if the dataset or key was not part of the group.
    pub fn offset(&self, dataset: DatasetId, key: &DomainValue) -> Option<f64> {
        self.offsets.get(&(dataset, key.clone())).copied()
    }

    /// Returns the union of keys across the group, in first-seen order.
    pub fn keys(&self) -> &[DomainValue] {
        &self.keys
    }

    /// Returns the stacked `(negative_total, positive_total)` for `key`.
    pub fn totals(&self, key: &DomainValue) -> Option<(f64, f64)> {
        let i = self.keys.iter().position(|k| k == key)?;
        Some((self.negative_totals[i], self.positive_totals[i]))
    }

    /// Returns the `(min, max)` of all stack ends, including `0`.
    ///
    /// Useful for fitting a value-axis domain to the stacked data. Returns `None` for an empty
    /// group.
    pub fn extent(&self) -> Option<(f64, f64)> {
        if self.keys.is_empty() {
            return None;
        }
        let min = self.negative_totals.iter().copied().fold(0.0_f64, f64::min);
        let max = self.positive_totals.iter().copied().fold(0.0_f64, f64::max);
        Some((min, max))
    }
}

/// Offsets plus any diagnostics raised while resolving them.
#[derive(Debug, Clone, Default)]
pub struct StackOutcome {
    /// Resolved offsets.
    pub offsets: StackOffsets,
    /// Non-fatal problems, empty for a consistent stack.
    pub diagnostics: Vec<StackDiagnostic>,
}

impl StackOutcome {
    /// Returns `true` if every dataset covers the same keys.
    pub fn is_consistent(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Accumulates stack offsets for datasets that share a categorical domain.
///
/// Datasets are stacked in the order given (first is the bottom layer). Within each key,
/// non-negative values stack upward from the running positive total and negative values
/// downward from the running negative total. Non-finite values do not advance either total.
pub struct StackOffsetResolver<'a, D> {
    key: &'a Accessor<D, DomainValue>,
    value: &'a Accessor<D, f64>,
}

impl<D> core::fmt::Debug for StackOffsetResolver<'_, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StackOffsetResolver")
            .field("key", &"<fn>")
            .field("value", &"<fn>")
            .finish()
    }
}

impl<'a, D> StackOffsetResolver<'a, D> {
    /// Creates a resolver reading the stack key and value through the given accessors.
    pub fn new(key: &'a Accessor<D, DomainValue>, value: &'a Accessor<D, f64>) -> Self {
        Self { key, value }
    }

    /// Resolves offsets for `datasets` in stack order.
    ///
    /// This never fails: datasets missing keys produce a [`StackDiagnostic::MissingKeys`] and
    /// contribute zero for those keys.
    pub fn resolve<'d>(&self, datasets: impl IntoIterator<Item = &'d Dataset<D>>) -> StackOutcome
    where
        D: 'd,
    {
        let mut key_index: HashMap<DomainValue, usize> = HashMap::new();
        let mut keys: Vec<DomainValue> = Vec::new();
        let mut layers: Vec<(DatasetId, HashMap<usize, f64>)> = Vec::new();

        for dataset in datasets {
            let mut sums: HashMap<usize, f64> = HashMap::new();
            for (index, datum) in dataset.data().iter().enumerate() {
                let key = (self.key)(datum, index, dataset);
                let ki = *key_index.entry(key.clone()).or_insert_with(|| {
                    keys.push(key);
                    keys.len() - 1
                });
                let v = (self.value)(datum, index, dataset);
                let sum = sums.entry(ki).or_insert(0.0);
                if v.is_finite() {
                    *sum += v;
                }
            }
            layers.push((dataset.id(), sums));
        }

        let mut positive_totals = alloc::vec![0.0_f64; keys.len()];
        let mut negative_totals = alloc::vec![0.0_f64; keys.len()];
        let mut offsets = HashMap::with_capacity(keys.len() * layers.len());
        let mut diagnostics = Vec::new();

        for (dataset, sums) in &layers {
            let mut missing = Vec::new();
            for (ki, key) in keys.iter().enumerate() {
                let v = match sums.get(&ki) {
                    Some(v) => *v,
                    None => {
                        missing.push(key.clone());
                        0.0
                    }
                };
                let offset = if v < 0.0 {
                    let start = negative_totals[ki];
                    negative_totals[ki] += v;
                    start
                } else {
                    let start = positive_totals[ki];
                    positive_totals[ki] += v;
                    start
                };
                offsets.insert((*dataset, key.clone()), offset);
            }
            if !missing.is_empty() {
                tracing::warn!(
                    dataset = dataset.0,
                    missing = missing.len(),
                    "stacked dataset does not cover every key; treating missing values as 0"
                );
                diagnostics.push(StackDiagnostic::MissingKeys {
                    dataset: *dataset,
                    keys: missing,
                });
            }
        }

        StackOutcome {
            offsets: StackOffsets {
                keys,
                offsets,
                positive_totals,
                negative_totals,
            },
            diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use vizmark_core::accessor;

    use super::*;

    type Row = (&'static str, f64);

    fn accessors() -> (Accessor<Row, DomainValue>, Accessor<Row, f64>) {
        (
            accessor(|d: &Row, _, _: &Dataset<Row>| DomainValue::from(d.0)),
            accessor(|d: &Row, _, _: &Dataset<Row>| d.1),
        )
    }

    #[test]
    fn offsets_accumulate_in_stack_order() {
        let (key, value) = accessors();
        let bottom = Dataset::new(DatasetId(1), vec![("a", 1.0), ("b", 2.0)]);
        let top = Dataset::new(DatasetId(2), vec![("a", 3.0), ("b", 4.0)]);

        let out = StackOffsetResolver::new(&key, &value).resolve([&bottom, &top]);

        assert!(out.is_consistent());
        let o = &out.offsets;
        assert_eq!(o.offset(DatasetId(1), &"a".into()), Some(0.0));
        assert_eq!(o.offset(DatasetId(1), &"b".into()), Some(0.0));
        assert_eq!(o.offset(DatasetId(2), &"a".into()), Some(1.0));
        assert_eq!(o.offset(DatasetId(2), &"b".into()), Some(2.0));
        assert_eq!(o.totals(&"b".into()), Some((0.0, 6.0)));
        assert_eq!(o.extent(), Some((0.0, 6.0)));
    }

    #[test]
    fn missing_keys_are_flagged_and_zero_filled() {
        let (key, value) = accessors();
        let partial = Dataset::new(DatasetId(1), vec![("a", 1.0), ("b", 2.0)]);
        let full = Dataset::new(DatasetId(2), vec![("a", 3.0), ("b", 4.0), ("c", 5.0)]);

        let out = StackOffsetResolver::new(&key, &value).resolve([&partial, &full]);

        assert!(!out.is_consistent());
        assert_eq!(
            out.diagnostics,
            vec![StackDiagnostic::MissingKeys {
                dataset: DatasetId(1),
                keys: vec!["c".into()],
            }]
        );
        assert_eq!(out.offsets.offset(DatasetId(1), &"c".into()), Some(0.0));
        assert_eq!(out.offsets.offset(DatasetId(2), &"c".into()), Some(0.0));
        assert_eq!(out.offsets.offset(DatasetId(2), &"a".into()), Some(1.0));
    }

    #[test]
    fn negative_values_stack_downward_separately() {
        let (key, value) = accessors();
        let a = Dataset::new(DatasetId(1), vec![("x", 2.0)]);
        let b = Dataset::new(DatasetId(2), vec![("x", -1.0)]);
        let c = Dataset::new(DatasetId(3), vec![("x", -3.0)]);
        let d = Dataset::new(DatasetId(4), vec![("x", 5.0)]);

        let out = StackOffsetResolver::new(&key, &value).resolve([&a, &b, &c, &d]);
        let o = &out.offsets;
        assert_eq!(o.offset(DatasetId(1), &"x".into()), Some(0.0));
        assert_eq!(o.offset(DatasetId(2), &"x".into()), Some(0.0));
        assert_eq!(o.offset(DatasetId(3), &"x".into()), Some(-1.0));
        assert_eq!(o.offset(DatasetId(4), &"x".into()), Some(2.0));
        assert_eq!(o.extent(), Some((-4.0, 7.0)));
    }

    #[test]
    fn non_finite_values_do_not_advance_totals() {
        let (key, value) = accessors();
        let a = Dataset::new(DatasetId(1), vec![("x", f64::NAN)]);
        let b = Dataset::new(DatasetId(2), vec![("x", 2.0)]);

        let out = StackOffsetResolver::new(&key, &value).resolve([&a, &b]);
        assert!(out.is_consistent());
        assert_eq!(out.offsets.offset(DatasetId(2), &"x".into()), Some(0.0));
    }

    #[test]
    fn empty_group_resolves_to_nothing() {
        let (key, value) = accessors();
        let out = StackOffsetResolver::new(&key, &value).resolve(core::iter::empty());
        assert!(out.is_consistent());
        assert!(out.offsets.keys().is_empty());
        assert_eq!(out.offsets.extent(), None);
    }
}
