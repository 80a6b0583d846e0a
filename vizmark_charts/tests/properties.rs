// Copyright 2025 the VizMark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for plot geometry.

use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;
use vizmark_charts::{
    AnimationConfig, Animator, BarFamily, BarWidthSolver, MarkAccessors, Plot, PlotConfig,
    ScaleBand, ScaleLinear,
};
use vizmark_core::{Dataset, DatasetId, DomainValue, Orientation, ScaleBinding, accessor};

type Row = (f64, f64);
type Keyed = (String, f64);

fn row_accessors() -> MarkAccessors<Row> {
    MarkAccessors::new(
        accessor(|r: &Row, _, _| DomainValue::Number(r.0)),
        accessor(|r: &Row, _, _| r.1),
    )
}

fn indexed(values: &[f64]) -> Vec<Row> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f64, *v))
        .collect()
}

fn orientation(vertical: bool) -> Orientation {
    if vertical {
        Orientation::Vertical
    } else {
        Orientation::Horizontal
    }
}

proptest! {
    #[test]
    fn marks_span_exactly_from_baseline_to_value(
        values in proptest::collection::vec(-100.0f64..100.0, 1..32),
        baseline in -50.0f64..50.0,
        vertical in any::<bool>(),
    ) {
        let primary = ScaleLinear::new((-100.0, 100.0), (500.0, 0.0));
        let n = values.len() as f64;
        let config = PlotConfig::new(orientation(vertical)).with_baseline(baseline).unwrap();
        let mut plot = Plot::new(
            config,
            Arc::new(primary),
            Arc::new(ScaleLinear::new((0.0, n), (0.0, 400.0))),
            row_accessors(),
        );
        plot.add_dataset(Dataset::new(DatasetId(0), indexed(&values))).unwrap();

        prop_assert_eq!(plot.marks().len(), values.len());
        let sb = primary.map(baseline);
        for (mark, v) in plot.marks().iter().zip(&values) {
            let raw = primary.map(*v);
            let g = mark.geometry;
            prop_assert!(g.length >= 0.0 && g.thickness >= 0.0);
            prop_assert!((g.primary_offset - sb.min(raw)).abs() < 1e-9);
            prop_assert!((g.primary_offset + g.length - sb.max(raw)).abs() < 1e-9);
        }
    }

    #[test]
    fn widening_the_extent_never_narrows_bars(
        mut positions in proptest::collection::vec(1.0f64..400.0, 1..16),
        narrow_extent in 50.0f64..200.0,
        extra in 0.0f64..500.0,
    ) {
        positions.sort_by(f64::total_cmp);
        positions.dedup();
        let scale = ScaleLinear::new((0.0, 1.0), (0.0, 1.0));
        let values: Vec<DomainValue> = positions.iter().copied().map(DomainValue::Number).collect();
        let solver = BarWidthSolver::default();

        let narrow = solver.solve(&scale, &values, (0.0, narrow_extent));
        let wide = solver.solve(&scale, &values, (0.0, narrow_extent + extra));
        prop_assert!(narrow > 0.0);
        prop_assert!(wide >= narrow, "{wide} < {narrow}");
    }

    #[test]
    fn stack_tops_project_the_sum_of_layers(
        layers in proptest::collection::vec(
            proptest::collection::vec(0.0f64..100.0, 3),
            1..5,
        ),
    ) {
        let keys = ["k0", "k1", "k2"];
        let primary = ScaleLinear::new((0.0, 500.0), (600.0, 0.0));
        let mut plot = Plot::new(
            PlotConfig::new(Orientation::Vertical).with_family(BarFamily::stacked()),
            Arc::new(primary),
            Arc::new(ScaleBand::new(keys, (0.0, 300.0))),
            MarkAccessors::new(
                accessor(|r: &Keyed, _, _| DomainValue::from(r.0.as_str())),
                accessor(|r: &Keyed, _, _| r.1),
            ),
        );
        for (id, layer) in layers.iter().enumerate() {
            let rows = keys.iter().zip(layer).map(|(k, v)| (k.to_string(), *v)).collect();
            plot.add_dataset(Dataset::new(DatasetId(id as u32), rows)).unwrap();
        }
        prop_assert!(plot.stack_diagnostics().is_empty());

        let top = DatasetId(layers.len() as u32 - 1);
        for (ki, key) in keys.iter().enumerate() {
            let sum: f64 = layers.iter().map(|l| l[ki]).sum();
            let mark = plot
                .marks()
                .iter()
                .find(|m| m.dataset == top && m.index == ki)
                .unwrap();
            prop_assert!((mark.position.y - primary.map(sum)).abs() < 1e-6);
            let (_, pos) = plot.stack_offsets().unwrap().totals(&DomainValue::from(*key)).unwrap();
            prop_assert!((pos - sum).abs() < 1e-9);
        }
    }

    #[test]
    fn mixed_sign_stacks_split_totals_by_sign(
        layers in proptest::collection::vec(
            proptest::collection::vec(-100.0f64..100.0, 2),
            1..6,
        ),
    ) {
        let keys = ["k0", "k1"];
        let primary = ScaleLinear::new((-600.0, 600.0), (600.0, 0.0));
        let mut plot = Plot::new(
            PlotConfig::new(Orientation::Vertical).with_family(BarFamily::stacked()),
            Arc::new(primary),
            Arc::new(ScaleBand::new(keys, (0.0, 200.0))),
            MarkAccessors::new(
                accessor(|r: &Keyed, _, _| DomainValue::from(r.0.as_str())),
                accessor(|r: &Keyed, _, _| r.1),
            ),
        );
        for (id, layer) in layers.iter().enumerate() {
            let rows = keys.iter().zip(layer).map(|(k, v)| (k.to_string(), *v)).collect();
            plot.add_dataset(Dataset::new(DatasetId(id as u32), rows)).unwrap();
        }
        let offsets = plot.stack_offsets().unwrap();

        for (ki, key) in keys.iter().enumerate() {
            let up: f64 = layers.iter().map(|l| l[ki]).filter(|v| *v >= 0.0).sum();
            let down: f64 = layers.iter().map(|l| l[ki]).filter(|v| *v < 0.0).sum();
            let (neg, pos) = offsets.totals(&DomainValue::from(*key)).unwrap();
            prop_assert!((pos - up).abs() < 1e-9);
            prop_assert!((neg - down).abs() < 1e-9);

            // Each layer starts at the running total of its own sign.
            let (mut run_up, mut run_down) = (0.0_f64, 0.0_f64);
            for (id, layer) in layers.iter().enumerate() {
                let v = layer[ki];
                let offset = offsets.offset(DatasetId(id as u32), &DomainValue::from(*key)).unwrap();
                if v < 0.0 {
                    prop_assert!((offset - run_down).abs() < 1e-9);
                    run_down += v;
                } else {
                    prop_assert!((offset - run_up).abs() < 1e-9);
                    run_up += v;
                }
            }
        }
    }

    #[test]
    fn nearest_to_a_bar_centre_is_that_bar(
        values in proptest::collection::vec(
            prop_oneof![-100.0f64..-1.0, 1.0f64..100.0],
            2..24,
        ),
        vertical in any::<bool>(),
    ) {
        let n = values.len() as f64;
        // 40px between centres, 38px bars: 2px gutters.
        let mut plot = Plot::new(
            PlotConfig::new(orientation(vertical)),
            Arc::new(ScaleLinear::new((-100.0, 100.0), (400.0, 0.0))),
            Arc::new(ScaleLinear::new((0.0, n), (0.0, 40.0 * n))),
            row_accessors(),
        );
        plot.add_dataset(Dataset::new(DatasetId(0), indexed(&values))).unwrap();
        prop_assert!((plot.thickness() - 38.0).abs() < 1e-9);

        for mark in plot.marks() {
            let bounds = mark.geometry.to_rect(orientation(vertical));
            let hit = plot.entity_nearest(bounds.center()).unwrap();
            prop_assert_eq!(hit.index, mark.index);
        }
    }

    #[test]
    fn reset_phase_is_flush_and_main_phase_is_the_projection(
        values in proptest::collection::vec(-100.0f64..100.0, 0..32),
        baseline in -100.0f64..100.0,
    ) {
        let primary = ScaleLinear::new((-100.0, 100.0), (0.0, 300.0));
        let config = PlotConfig::new(Orientation::Horizontal)
            .with_baseline(baseline)
            .unwrap()
            .with_animation(AnimationConfig::animated(Duration::from_millis(200)));
        let mut plot = Plot::new(
            config,
            Arc::new(primary),
            Arc::new(ScaleLinear::new((0.0, 32.0), (0.0, 320.0))),
            row_accessors(),
        );
        plot.add_dataset(Dataset::new(DatasetId(0), indexed(&values))).unwrap();

        let steps = plot.draw_steps();
        prop_assert_eq!(steps.len(), 2);
        prop_assert_eq!(steps[0].animator, Animator::Reset);
        let sb = primary.scale_number(baseline);
        for m in &steps[0].attrs {
            prop_assert_eq!(m.geometry.length, 0.0);
            prop_assert_eq!(m.geometry.primary_offset, sb);
        }
        let direct = plot.snapshot().project_all(plot.datasets());
        prop_assert_eq!(&steps[1].attrs, &direct.marks);
    }
}
