// Copyright 2025 the VizMark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The shared plot engine.
//!
//! A [`Plot`] owns its datasets, scales, accessors, and configuration, and keeps one geometry
//! cache. Every change that can affect geometry (datasets, accessors, scales, baseline)
//! rebuilds the cache wholesale. The mark family is the only per-chart-kind piece.

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;
use kurbo::{BezPath, Point, Rect};
use vizmark_core::{ConfigError, Dataset, DatasetId, DomainValue, Orientation, ScaleBinding};
use vizmark_transforms::{StackDiagnostic, StackOffsetResolver, StackOffsets, StackOutcome};

use crate::bar_width::BarWidthSolver;
use crate::draw_steps::{AnimationConfig, AnimationDriver, DrawSteps, build_draw_steps};
use crate::family::{BarFamily, MarkFamily};
use crate::label::{LabelConfig, PlacedLabel, TextMeasurer, fit_label};
use crate::projector::{MarkAccessors, ProjectedMark, Projection, ProjectionSnapshot};
use crate::spatial::{MarkEntity, SpatialQueryEngine};

/// Plot-wide settings.
#[derive(Clone, Debug)]
pub struct PlotConfig {
    orientation: Orientation,
    baseline: f64,
    family: Arc<dyn MarkFamily>,
    width: BarWidthSolver,
    animation: AnimationConfig,
    viewport: Option<Rect>,
    available_extent: Option<f64>,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self::new(Orientation::Vertical)
    }
}

impl PlotConfig {
    /// Plain bars at baseline `0`, no animation, no viewport.
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            baseline: 0.0,
            family: Arc::new(BarFamily::plain()),
            width: BarWidthSolver::default(),
            animation: AnimationConfig::default(),
            viewport: None,
            available_extent: None,
        }
    }

    /// Sets the baseline in primary domain units.
    pub fn with_baseline(mut self, baseline: f64) -> Result<Self, ConfigError> {
        self.baseline = ConfigError::check_finite("baseline", baseline)?;
        Ok(self)
    }

    /// Sets the mark family.
    pub fn with_family(mut self, family: impl MarkFamily + 'static) -> Self {
        self.family = Arc::new(family);
        self
    }

    /// Sets the width solver.
    pub fn with_width(mut self, width: BarWidthSolver) -> Self {
        self.width = width;
        self
    }

    /// Sets animation settings.
    pub fn with_animation(mut self, animation: AnimationConfig) -> Self {
        self.animation = animation;
        self
    }

    /// Sets the plotted viewport; marks entirely outside it are ignored by nearest queries.
    pub fn with_viewport(mut self, viewport: Rect) -> Self {
        self.viewport = Some(viewport);
        self
    }

    /// Overrides the pixel extent of the thickness axis.
    ///
    /// The extent is measured from the low end of the secondary scale's range.
    pub fn with_available_extent(mut self, extent: f64) -> Result<Self, ConfigError> {
        self.available_extent = Some(ConfigError::check_length("available_extent", extent)?);
        Ok(self)
    }

    /// Returns the orientation.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Returns the baseline.
    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    /// Returns the mark family.
    pub fn family(&self) -> &dyn MarkFamily {
        &*self.family
    }

    /// Returns the animation settings.
    pub fn animation(&self) -> AnimationConfig {
        self.animation
    }

    /// Returns the viewport, if any.
    pub fn viewport(&self) -> Option<Rect> {
        self.viewport
    }
}

/// A query-time view of one rendered datum.
#[derive(Debug)]
pub struct Entity<'a, D> {
    /// The datum.
    pub datum: &'a D,
    /// Index of the datum in its dataset.
    pub index: usize,
    /// The datum's dataset.
    pub dataset: &'a Dataset<D>,
    /// Pixel position (value end, centred on the secondary axis).
    pub position: Point,
    /// Pixel bounding box.
    pub bounds: Rect,
}

impl<D> Clone for Entity<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for Entity<'_, D> {}

#[derive(Debug, Default)]
struct GeometryCache {
    scaled_baseline: f64,
    thickness: f64,
    stack: Option<StackOutcome>,
    projection: Projection,
    queries: SpatialQueryEngine,
}

/// A bar or stacked-area plot.
pub struct Plot<D> {
    config: PlotConfig,
    primary_scale: Arc<dyn ScaleBinding>,
    secondary_scale: Arc<dyn ScaleBinding>,
    accessors: MarkAccessors<D>,
    datasets: Vec<Dataset<D>>,
    labels: HashMap<DatasetId, LabelConfig>,
    cache: GeometryCache,
    data_changed: bool,
}

impl<D> fmt::Debug for Plot<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plot")
            .field("config", &self.config)
            .field("primary_scale", &self.primary_scale)
            .field("secondary_scale", &self.secondary_scale)
            .field("datasets", &self.datasets)
            .field("cache", &self.cache)
            .field("data_changed", &self.data_changed)
            .finish_non_exhaustive()
    }
}

impl<D> Plot<D> {
    /// Creates an empty plot.
    pub fn new(
        config: PlotConfig,
        primary_scale: Arc<dyn ScaleBinding>,
        secondary_scale: Arc<dyn ScaleBinding>,
        accessors: MarkAccessors<D>,
    ) -> Self {
        let mut plot = Self {
            config,
            primary_scale,
            secondary_scale,
            accessors,
            datasets: Vec::new(),
            labels: HashMap::new(),
            cache: GeometryCache::default(),
            data_changed: false,
        };
        plot.rebuild();
        plot
    }

    /// Attaches `dataset` on top of the existing ones.
    pub fn add_dataset(&mut self, dataset: Dataset<D>) -> Result<(), ConfigError> {
        let id = dataset.id();
        if self.dataset(id).is_some() {
            return Err(ConfigError::DuplicateDataset(id));
        }
        self.labels.insert(id, LabelConfig::default());
        self.datasets.push(dataset);
        self.data_changed = true;
        self.rebuild();
        Ok(())
    }

    /// Detaches a dataset and returns it.
    pub fn remove_dataset(&mut self, id: DatasetId) -> Result<Dataset<D>, ConfigError> {
        let pos = self
            .datasets
            .iter()
            .position(|d| d.id() == id)
            .ok_or(ConfigError::UnknownDataset(id))?;
        let dataset = self.datasets.remove(pos);
        self.labels.remove(&id);
        self.data_changed = true;
        self.rebuild();
        Ok(dataset)
    }

    /// Replaces the contents of an attached dataset, keeping its stack position.
    pub fn replace_dataset(&mut self, id: DatasetId, data: Vec<D>) -> Result<(), ConfigError> {
        let dataset = self
            .datasets
            .iter_mut()
            .find(|d| d.id() == id)
            .ok_or(ConfigError::UnknownDataset(id))?;
        dataset.set_data(data);
        self.data_changed = true;
        self.rebuild();
        Ok(())
    }

    /// Moves the baseline.
    pub fn set_baseline(&mut self, baseline: f64) -> Result<(), ConfigError> {
        self.config.baseline = ConfigError::check_finite("baseline", baseline)?;
        self.rebuild();
        Ok(())
    }

    /// Swaps both scales.
    pub fn set_scales(
        &mut self,
        primary_scale: Arc<dyn ScaleBinding>,
        secondary_scale: Arc<dyn ScaleBinding>,
    ) {
        self.primary_scale = primary_scale;
        self.secondary_scale = secondary_scale;
        self.rebuild();
    }

    /// Rebinds the accessors.
    pub fn set_accessors(&mut self, accessors: MarkAccessors<D>) {
        self.accessors = accessors;
        self.data_changed = true;
        self.rebuild();
    }

    /// Sets label settings for an attached dataset.
    pub fn set_label_config(
        &mut self,
        id: DatasetId,
        config: LabelConfig,
    ) -> Result<(), ConfigError> {
        let slot = self
            .labels
            .get_mut(&id)
            .ok_or(ConfigError::UnknownDataset(id))?;
        *slot = config;
        Ok(())
    }

    /// Returns label settings for an attached dataset.
    pub fn label_config(&self, id: DatasetId) -> Option<&LabelConfig> {
        self.labels.get(&id)
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    /// Returns attached datasets in stack order.
    pub fn datasets(&self) -> &[Dataset<D>] {
        &self.datasets
    }

    /// Returns an attached dataset.
    pub fn dataset(&self, id: DatasetId) -> Option<&Dataset<D>> {
        self.datasets.iter().find(|d| d.id() == id)
    }

    /// Returns the solved shared thickness.
    pub fn thickness(&self) -> f64 {
        self.cache.thickness
    }

    /// Returns the baseline in pixels.
    pub fn scaled_baseline(&self) -> f64 {
        self.cache.scaled_baseline
    }

    /// Returns drawable marks in draw order.
    pub fn marks(&self) -> &[ProjectedMark] {
        &self.cache.projection.marks
    }

    /// Returns how many datums were dropped for non-finite geometry.
    pub fn dropped_count(&self) -> usize {
        self.cache.projection.dropped
    }

    /// Returns resolved stack offsets, for stacked families.
    pub fn stack_offsets(&self) -> Option<&StackOffsets> {
        self.cache.stack.as_ref().map(|s| &s.offsets)
    }

    /// Returns stack diagnostics from the last rebuild.
    pub fn stack_diagnostics(&self) -> &[StackDiagnostic] {
        self.cache
            .stack
            .as_ref()
            .map_or(&[][..], |s| s.diagnostics.as_slice())
    }

    /// Returns `true` if datasets changed since the last draw.
    pub fn data_changed(&self) -> bool {
        self.data_changed
    }

    /// Returns an immutable snapshot of the current geometry inputs.
    pub fn snapshot(&self) -> ProjectionSnapshot<'_, D> {
        self.snapshot_with(self.cache.thickness, self.stack_offsets())
    }

    /// Builds the animation phases for the current geometry and clears the data-changed flag.
    pub fn draw_steps(&mut self) -> DrawSteps<Vec<ProjectedMark>> {
        let marks = &self.cache.projection.marks;
        let orientation = self.config.orientation;
        let baseline = self.cache.scaled_baseline;
        let steps = build_draw_steps(
            self.data_changed,
            self.config.animation.enabled,
            marks.clone(),
            || reset_marks(marks, orientation, baseline),
        );
        self.data_changed = false;
        steps
    }

    /// Hands the current phases to `driver`.
    pub fn draw(&mut self, driver: &mut impl AnimationDriver<Vec<ProjectedMark>>) {
        let steps = self.draw_steps();
        driver.run(&steps, self.config.animation.duration);
    }

    /// Returns entities whose bounds contain `point`, in draw order.
    pub fn entities_at(&self, point: Point) -> Vec<Entity<'_, D>> {
        self.cache
            .queries
            .entities_at(point)
            .filter_map(|e| self.entity(e))
            .collect()
    }

    /// Returns entities overlapping the region, in draw order.
    pub fn entities_intersecting(
        &self,
        x_range: (f64, f64),
        y_range: (f64, f64),
    ) -> Vec<Entity<'_, D>> {
        self.cache
            .queries
            .entities_intersecting(x_range, y_range)
            .filter_map(|e| self.entity(e))
            .collect()
    }

    /// Returns the visible entity nearest `point`.
    pub fn entity_nearest(&self, point: Point) -> Option<Entity<'_, D>> {
        self.cache
            .queries
            .nearest(point)
            .and_then(|e| self.entity(e))
    }

    /// Returns one closed outline per dataset, for area families.
    pub fn area_paths(&self) -> Vec<(DatasetId, BezPath)> {
        self.cache
            .projection
            .marks
            .chunk_by(|a, b| a.dataset == b.dataset)
            .filter_map(|chunk| {
                let id = chunk.first()?.dataset;
                Some((id, self.config.family.outline(chunk)?))
            })
            .collect()
    }

    /// Decides label placement for every drawable mark.
    pub fn labels(
        &self,
        measurer: &dyn TextMeasurer,
        label_text: impl Fn(&D, usize, &Dataset<D>) -> String,
    ) -> Vec<PlacedLabel> {
        let mut out = Vec::with_capacity(self.marks().len());
        for mark in self.marks() {
            let Some(dataset) = self.dataset(mark.dataset) else {
                continue;
            };
            let Some(datum) = dataset.get(mark.index) else {
                continue;
            };
            let config = self.labels.get(&mark.dataset).copied().unwrap_or_default();
            let text = label_text(datum, mark.index, dataset);
            let extent = measurer.measure(&text, config.font_size);
            let fit = fit_label(
                mark,
                self.config.orientation,
                extent,
                &config,
                self.config.viewport,
            );
            out.push(PlacedLabel {
                dataset: mark.dataset,
                index: mark.index,
                text,
                fit,
            });
        }
        out
    }

    fn entity(&self, e: &MarkEntity) -> Option<Entity<'_, D>> {
        let dataset = self.dataset(e.dataset)?;
        Some(Entity {
            datum: dataset.get(e.index)?,
            index: e.index,
            dataset,
            position: e.position,
            bounds: e.bounds,
        })
    }

    fn snapshot_with<'a>(
        &'a self,
        thickness: f64,
        stack: Option<&'a StackOffsets>,
    ) -> ProjectionSnapshot<'a, D> {
        ProjectionSnapshot {
            orientation: self.config.orientation,
            baseline: self.config.baseline,
            primary_scale: &*self.primary_scale,
            secondary_scale: &*self.secondary_scale,
            accessors: &self.accessors,
            family: &*self.config.family,
            thickness,
            stack,
        }
    }

    fn available_span(&self) -> (f64, f64) {
        let (r0, r1) = self.secondary_scale.range();
        let range = (r0.min(r1), r0.max(r1));
        if let Some(extent) = self.config.available_extent {
            return (range.0, range.0 + extent);
        }
        match self.config.viewport {
            Some(v) if self.config.orientation.is_vertical() => (v.x0.min(v.x1), v.x0.max(v.x1)),
            Some(v) => (v.y0.min(v.y1), v.y0.max(v.y1)),
            None => range,
        }
    }

    fn domain_values(&self) -> Vec<DomainValue> {
        let mut values: Vec<DomainValue> = self
            .datasets
            .iter()
            .flat_map(|dataset| {
                dataset
                    .data()
                    .iter()
                    .enumerate()
                    .map(move |(i, datum)| (self.accessors.domain)(datum, i, dataset))
            })
            .collect();
        values.sort();
        values.dedup();
        values
    }

    fn rebuild(&mut self) {
        let family = &*self.config.family;
        let thickness = if family.has_thickness() {
            self.config.width.solve(
                &*self.secondary_scale,
                &self.domain_values(),
                self.available_span(),
            )
        } else {
            0.0
        };
        let stack = family.is_stacked().then(|| {
            StackOffsetResolver::new(&self.accessors.domain, &self.accessors.value)
                .resolve(&self.datasets)
        });

        let snapshot = self.snapshot_with(thickness, stack.as_ref().map(|s| &s.offsets));
        let scaled_baseline = snapshot.scaled_baseline();
        let projection = snapshot.project_all(&self.datasets);
        let queries = SpatialQueryEngine::new(self.config.orientation, &projection.marks)
            .with_viewport(self.config.viewport);

        tracing::debug!(
            datasets = self.datasets.len(),
            drawable = projection.marks.len(),
            dropped = projection.dropped,
            thickness,
            "rebuilt plot geometry"
        );
        self.cache = GeometryCache {
            scaled_baseline,
            thickness,
            stack,
            projection,
            queries,
        };
    }
}

fn reset_marks(
    marks: &[ProjectedMark],
    orientation: Orientation,
    scaled_baseline: f64,
) -> Vec<ProjectedMark> {
    marks
        .iter()
        .map(|m| {
            let geometry = m.geometry.collapsed_to(scaled_baseline);
            let flush = orientation.join(scaled_baseline, geometry.secondary_center());
            ProjectedMark {
                geometry,
                position: flush,
                base: flush,
                ..*m
            }
        })
        .collect()
}
