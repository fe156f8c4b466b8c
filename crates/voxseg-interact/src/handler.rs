//! Event handlers and the sampling handler
//!
//! Handlers receive pointer events together with a
//! [`SegmentationContext`] holding the grids they work on. Each handler is
//! bound to one [`InteractionMode`] and passes every event through while
//! another mode is current.

use crate::error::InteractResult;
use crate::event::{
    HandlerResponse, InteractionMode, PointerButton, PointerEvent, PointerEventKind,
};
use crate::sampler::Sampler;
use crate::segmenter::Segmenter;
use crate::training::TrainingSet;
use voxseg_core::{DensityVolume, Point3, RegionVolume, Stroke3};
use voxseg_region::line::line_cells_3d;

/// Grids and application state an event is handled against
#[derive(Debug)]
pub struct SegmentationContext<'a> {
    /// Mode currently active in the application
    pub mode: InteractionMode,
    pub density: &'a DensityVolume,
    pub region: &'a mut RegionVolume,
}

impl<'a> SegmentationContext<'a> {
    pub fn new(
        mode: InteractionMode,
        density: &'a DensityVolume,
        region: &'a mut RegionVolume,
    ) -> Self {
        Self {
            mode,
            density,
            region,
        }
    }
}

pub trait EventHandler {
    /// Mode this handler reacts in
    fn mode(&self) -> InteractionMode;

    fn handle(
        &mut self,
        ctx: &mut SegmentationContext<'_>,
        event: &PointerEvent,
    ) -> InteractResult<HandlerResponse>;

    #[inline]
    fn is_active(&self, current: InteractionMode) -> bool {
        self.mode() == current
    }
}

/// Append `point` unless it repeats the last one
pub(crate) fn push_distinct(stroke: &mut Stroke3, point: Point3) {
    if stroke.last() != Some(point) {
        stroke.push(point);
    }
}

/// Collects samples along strokes and retrains a segmenter on release
///
/// Primary-button strokes feed the positive set, secondary-button strokes
/// the negative one. With retraining off both sets are cleared after each
/// segmentation; with it on they accumulate across strokes.
pub struct SamplingHandler<Sm: Sampler, Sg> {
    mode: InteractionMode,
    sampler: Sm,
    segmenter: Sg,
    positive: TrainingSet<Sm::Sample>,
    negative: TrainingSet<Sm::Sample>,
    stroke: Stroke3,
    retrain: bool,
}

impl<Sm, Sg> SamplingHandler<Sm, Sg>
where
    Sm: Sampler,
    Sg: Segmenter<Sm::Sample>,
{
    /// Handler active in [`InteractionMode::AutoSegmentation`]
    pub fn new(sampler: Sm, segmenter: Sg) -> Self {
        Self::with_mode(InteractionMode::AutoSegmentation, sampler, segmenter)
    }

    pub fn with_mode(mode: InteractionMode, sampler: Sm, segmenter: Sg) -> Self {
        Self {
            mode,
            sampler,
            segmenter,
            positive: TrainingSet::new(),
            negative: TrainingSet::new(),
            stroke: Stroke3::new(),
            retrain: false,
        }
    }

    pub fn set_retrain(&mut self, retrain: bool) {
        self.retrain = retrain;
    }

    pub fn retrain(&self) -> bool {
        self.retrain
    }

    pub fn positive(&self) -> &TrainingSet<Sm::Sample> {
        &self.positive
    }

    pub fn negative(&self) -> &TrainingSet<Sm::Sample> {
        &self.negative
    }

    pub fn segmenter(&self) -> &Sg {
        &self.segmenter
    }

    pub fn segmenter_mut(&mut self) -> &mut Sg {
        &mut self.segmenter
    }

    /// Points of the stroke in progress
    pub fn stroke(&self) -> &Stroke3 {
        &self.stroke
    }

    /// Empty both training sets and the stroke
    pub fn clear(&mut self) {
        self.positive.clear();
        self.negative.clear();
        self.stroke.clear();
    }

    /// Sample every voxel the stroke passes through
    ///
    /// Consecutive repeats of a voxel are sampled once.
    fn collect_samples(&mut self, density: &DensityVolume, button: PointerButton) {
        let set = match button {
            PointerButton::Primary => &mut self.positive,
            PointerButton::Secondary => &mut self.negative,
        };
        let sampler = &self.sampler;
        let mut last = None;
        let mut visit = |x: i32, y: i32, z: i32| {
            if last != Some((x, y, z)) {
                last = Some((x, y, z));
                sampler.sample(density, (x, y, z), set);
            }
        };
        match self.stroke.points() {
            [] => {}
            [p] => {
                let (x, y, z) = p.cell();
                visit(x, y, z);
            }
            points => {
                for pair in points.windows(2) {
                    line_cells_3d(pair[0].cell(), pair[1].cell(), &mut visit);
                }
            }
        }
    }
}

impl<Sm, Sg> EventHandler for SamplingHandler<Sm, Sg>
where
    Sm: Sampler,
    Sg: Segmenter<Sm::Sample>,
{
    fn mode(&self) -> InteractionMode {
        self.mode
    }

    fn handle(
        &mut self,
        ctx: &mut SegmentationContext<'_>,
        event: &PointerEvent,
    ) -> InteractResult<HandlerResponse> {
        if !self.is_active(ctx.mode) {
            return Ok(HandlerResponse::pass_through());
        }
        match event.kind {
            PointerEventKind::Push => {
                self.stroke.clear();
                self.stroke.push(event.point);
                Ok(HandlerResponse::handled())
            }
            PointerEventKind::Drag => {
                push_distinct(&mut self.stroke, event.point);
                Ok(HandlerResponse::handled())
            }
            PointerEventKind::Release => {
                push_distinct(&mut self.stroke, event.point);
                self.collect_samples(ctx.density, event.button);
                let result = self.segmenter.segment(
                    &self.positive,
                    &self.negative,
                    ctx.density,
                    ctx.region,
                );
                if !self.retrain {
                    self.positive.clear();
                    self.negative.clear();
                }
                self.stroke.clear();
                let modified = result?;
                log::debug!("sampling stroke relabeled {} voxels", modified);
                Ok(HandlerResponse::completed(modified))
            }
        }
    }
}
