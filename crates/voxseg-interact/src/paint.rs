//! Manual region painting on volume slices
//!
//! Strokes arrive in volume coordinates. They are projected onto the
//! configured slice and rasterized with the current tool through a
//! [`MultiTestSetModifier`], whose tests decide which cells may change:
//!
//! - erasing (secondary button) only touches cells of the current region
//! - with `protect_other_regions`, painting only touches blank cells and
//!   the current region
//! - with a density window, only cells whose density lies in the window
//! - the flood tool only spreads through cells holding the seed's label

use crate::error::InteractResult;
use crate::event::{
    HandlerResponse, InteractionMode, PointerButton, PointerEvent, PointerEventKind,
};
use crate::handler::{EventHandler, SegmentationContext, push_distinct};
use voxseg_core::{
    DensityPixel, DensityVolume, JoinedStepper, Point2, Point3, Rect, RegionPixel, RegionVolume,
    Stepper, StepperMut, Stroke3, UNLABELED, VolumeStepper,
};
use voxseg_region::{
    FloodFill2DRasterizer, MaskOrZeroTest, MaskTest, Modifier, MultiTestSetModifier,
    PlaneRasterizer, PolygonRasterizer, Projection, RangeTest, Secondary, ThickLine2DRasterizer,
    VisitOnce,
};

/// Slice plane a paint handler works on
pub type SliceOrientation = Projection;

/// Paint tool
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaintTool {
    /// Stroke of the given width; 1 or less draws a thin line
    Line { width: f32 },
    /// Fill of the closed stroke outline
    Lasso,
    /// 4-connected flood from the stroke points
    Flood,
    /// Fill of a polygon whose vertices are the stroke release points
    Polygon,
}

impl Default for PaintTool {
    fn default() -> Self {
        PaintTool::Line { width: 1.0 }
    }
}

/// Options for [`PaintHandler`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintOptions {
    pub tool: PaintTool,
    pub orientation: SliceOrientation,
    /// Index of the slice along the axis the orientation drops
    pub slice: i32,
    /// Label written by the primary button
    pub region_id: RegionPixel,
    /// Leave cells of other regions untouched
    pub protect_other_regions: bool,
    /// Only paint cells whose density lies in `[min, max]`
    pub density_window: Option<(DensityPixel, DensityPixel)>,
}

impl Default for PaintOptions {
    fn default() -> Self {
        Self {
            tool: PaintTool::default(),
            orientation: SliceOrientation::XY,
            slice: 0,
            region_id: 1,
            protect_other_regions: false,
            density_window: None,
        }
    }
}

impl PaintOptions {
    pub fn with_tool(mut self, tool: PaintTool) -> Self {
        self.tool = tool;
        self
    }

    pub fn on_slice(mut self, orientation: SliceOrientation, slice: i32) -> Self {
        self.orientation = orientation;
        self.slice = slice;
        self
    }

    pub fn with_region_id(mut self, region_id: RegionPixel) -> Self {
        self.region_id = region_id;
        self
    }

    pub fn with_protect_other_regions(mut self, protect: bool) -> Self {
        self.protect_other_regions = protect;
        self
    }

    pub fn with_density_window(mut self, min: DensityPixel, max: DensityPixel) -> Self {
        self.density_window = Some((min, max));
        self
    }
}

/// Extent of a volume along the axis a projection drops
fn slice_count(orientation: SliceOrientation, (x, y, z): (u32, u32, u32)) -> u32 {
    match orientation {
        Projection::XY => z,
        Projection::XZ => y,
        Projection::YZ => x,
    }
}

/// Paints region labels with strokes on one slice
#[derive(Debug, Clone)]
pub struct PaintHandler {
    mode: InteractionMode,
    options: PaintOptions,
    stroke: Stroke3,
    button: PointerButton,
    vertices: Stroke3,
    polygon_button: Option<PointerButton>,
}

impl PaintHandler {
    /// Handler active in [`InteractionMode::RegionPaint`]
    pub fn new(options: PaintOptions) -> Self {
        Self::with_mode(InteractionMode::RegionPaint, options)
    }

    pub fn with_mode(mode: InteractionMode, options: PaintOptions) -> Self {
        Self {
            mode,
            options,
            stroke: Stroke3::new(),
            button: PointerButton::Primary,
            vertices: Stroke3::new(),
            polygon_button: None,
        }
    }

    pub fn options(&self) -> &PaintOptions {
        &self.options
    }

    /// Change options; a stroke or polygon in progress is discarded
    pub fn set_options(&mut self, options: PaintOptions) {
        self.options = options;
        self.cancel();
    }

    /// Pending polygon vertices
    pub fn vertices(&self) -> &Stroke3 {
        &self.vertices
    }

    /// Discard the stroke and polygon in progress
    pub fn cancel(&mut self) {
        self.stroke.clear();
        self.vertices.clear();
        self.polygon_button = None;
    }

    /// Fill the pending polygon and clear its vertices
    ///
    /// The polygon is painted with the button of its first vertex.
    pub fn close_polygon(
        &mut self,
        ctx: &mut SegmentationContext<'_>,
    ) -> InteractResult<HandlerResponse> {
        if self.vertices.is_empty() {
            return Ok(HandlerResponse::handled());
        }
        let button = self.polygon_button.take().unwrap_or(PointerButton::Primary);
        let result = self.paint(self.vertices.points(), button, ctx.density, ctx.region);
        self.vertices.clear();
        Ok(HandlerResponse::completed(result?))
    }

    /// Paint `points` with the current tool
    ///
    /// A slice index outside the volume paints nothing.
    ///
    /// # Returns
    ///
    /// The number of cells written.
    ///
    /// # Errors
    ///
    /// Returns an error if a density window is set and the density volume
    /// differs in extent from `region`.
    pub fn paint(
        &self,
        points: &[Point3],
        button: PointerButton,
        density: &DensityVolume,
        region: &mut RegionVolume,
    ) -> InteractResult<usize> {
        let opts = &self.options;
        let dims = region.dimensions();
        if opts.slice < 0 || opts.slice as u32 >= slice_count(opts.orientation, dims) {
            return Ok(0);
        }
        let (w, h) = opts.orientation.plane_size(dims);
        let bounds = Rect::from_size(w, h);
        let stroke = PlaneRasterizer::new(opts.orientation, bounds).project_stroke(points);
        if stroke.is_empty() {
            return Ok(0);
        }

        let mode = opts.orientation.stepping_mode();
        let erase = button == PointerButton::Secondary;
        let value = if erase { UNLABELED } else { opts.region_id };
        let flood_label = match opts.tool {
            PaintTool::Flood => {
                let seed = stroke
                    .iter()
                    .map(|p| p.cell())
                    .find(|&(u, v)| bounds.contains(u, v));
                let Some((u, v)) = seed else {
                    return Ok(0);
                };
                let (x, y, z) = mode.to_grid([u, v, opts.slice]);
                Some(region.at(x, y, z))
            }
            _ => None,
        };

        let written = match opts.density_window {
            Some((min, max)) => {
                let stepper = JoinedStepper::new(
                    VolumeStepper::new(&mut *region, mode),
                    VolumeStepper::new(density, mode),
                )?;
                let mut m = MultiTestSetModifier::new(stepper, value);
                self.add_label_tests(&mut m, erase, flood_label);
                m.add_test(Secondary(RangeTest::new(min, max)));
                m.stepper_mut().set_position(0, 0, opts.slice);
                self.rasterize(bounds, stroke.points(), &mut m)
            }
            None => {
                let stepper = VolumeStepper::new(&mut *region, mode);
                let mut m = MultiTestSetModifier::new(stepper, value);
                self.add_label_tests(&mut m, erase, flood_label);
                m.stepper_mut().set_position(0, 0, opts.slice);
                self.rasterize(bounds, stroke.points(), &mut m)
            }
        };
        log::debug!(
            "{:?} {} on {:?} slice {}: {} cells",
            opts.tool,
            if erase { "erase" } else { "paint" },
            opts.orientation,
            opts.slice,
            written
        );
        Ok(written)
    }

    fn add_label_tests<'a, S>(
        &self,
        m: &mut MultiTestSetModifier<'a, S>,
        erase: bool,
        flood_label: Option<RegionPixel>,
    ) where
        S: StepperMut<Value = RegionPixel> + 'a,
    {
        let id = self.options.region_id;
        if erase {
            m.add_test(MaskTest(id));
        } else if self.options.protect_other_regions {
            m.add_test(MaskOrZeroTest(id));
        }
        if let Some(label) = flood_label {
            m.add_test(MaskTest(label));
        }
    }

    fn rasterize<M: Modifier>(&self, bounds: Rect, points: &[Point2], m: &mut M) -> usize {
        match self.options.tool {
            PaintTool::Line { width } => {
                ThickLine2DRasterizer::new(bounds, width).rasterize_stroke(points, m)
            }
            PaintTool::Lasso | PaintTool::Polygon => {
                PolygonRasterizer::new(bounds).rasterize(points, m)
            }
            PaintTool::Flood => {
                let mut once = VisitOnce::new(m);
                FloodFill2DRasterizer::new(bounds).rasterize(points, &mut once)
            }
        }
    }
}

impl EventHandler for PaintHandler {
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
                self.button = event.button;
                Ok(HandlerResponse::handled())
            }
            PointerEventKind::Drag => {
                push_distinct(&mut self.stroke, event.point);
                Ok(HandlerResponse::handled())
            }
            PointerEventKind::Release if self.options.tool == PaintTool::Polygon => {
                push_distinct(&mut self.vertices, event.point);
                self.polygon_button.get_or_insert(event.button);
                self.stroke.clear();
                Ok(HandlerResponse::handled())
            }
            PointerEventKind::Release => {
                push_distinct(&mut self.stroke, event.point);
                let points = self.stroke.points();
                let result = self.paint(points, self.button, ctx.density, ctx.region);
                self.stroke.clear();
                Ok(HandlerResponse::completed(result?))
            }
        }
    }
}
