//! Interaction handler regression test
//!
//! Tests mode gating, sample collection with and without retraining,
//! range, EM and clustering segmenters driven by strokes, and every paint
//! tool on the three slice orientations.

use voxseg_cluster::{FcmOptions, FuzzyCMeans, RegionRegistry};
use voxseg_core::{DensityVolume, Point3};
use voxseg_interact::{
    ClusteringSegmenter, EmSegmenter, EmSegmenterOptions, EventHandler, EventOutcome, HandlerResponse, InteractionMode,
    PaintHandler, PaintOptions, PaintTool, PointerButton, PointerEvent, RangeSegmenter,
    RangeSegmenterOptions, SamplingHandler, SegmentationContext, SliceOrientation,
    VoxelValueSampler,
};
use voxseg_test::{RegParams, region_volume_like, step_volume};

const PRIMARY: PointerButton = PointerButton::Primary;
const SECONDARY: PointerButton = PointerButton::Secondary;

fn p(x: f32, y: f32, z: f32) -> Point3 {
    Point3::new(x, y, z)
}

/// Push at the first point, drag through the middle, release at the last
fn stroke<H: EventHandler>(
    handler: &mut H,
    ctx: &mut SegmentationContext<'_>,
    button: PointerButton,
    points: &[Point3],
) -> HandlerResponse {
    let (first, rest) = points.split_first().unwrap();
    handler.handle(ctx, &PointerEvent::push(button, *first)).unwrap();
    let Some((last, middle)) = rest.split_last() else {
        return handler.handle(ctx, &PointerEvent::release(button, *first)).unwrap();
    };
    for q in middle {
        handler.handle(ctx, &PointerEvent::drag(button, *q)).unwrap();
    }
    handler.handle(ctx, &PointerEvent::release(button, *last)).unwrap()
}

fn sampling_reg(rp: &mut RegParams, density: &DensityVolume) {
    let mut region = region_volume_like(density);
    let segmenter = RangeSegmenter::new(RangeSegmenterOptions::default().with_clear(true));
    let mut handler = SamplingHandler::new(VoxelValueSampler, segmenter);

    // --- inactive outside its mode ---
    {
        let mut ctx = SegmentationContext::new(InteractionMode::Navigate, density, &mut region);
        let r = stroke(&mut handler, &mut ctx, PRIMARY, &[p(3.0, 1.0, 1.0), p(5.0, 1.0, 1.0)]);
        rp.check(r.outcome == EventOutcome::PassThrough, "pass through in other mode");
        rp.check(handler.stroke().is_empty(), "no stroke recorded");
    }
    rp.compare_counts(0, region.count_value(1));

    let mut ctx = SegmentationContext::new(InteractionMode::AutoSegmentation, density, &mut region);

    // --- one positive stroke on the middle plateau ---
    let r = stroke(&mut handler, &mut ctx, PRIMARY, &[p(3.0, 1.0, 1.0), p(5.0, 1.0, 1.0)]);
    rp.compare_counts(27, r.modified());
    rp.check(handler.positive().is_empty(), "sets cleared without retraining");
    rp.check(handler.segmenter().last_window() == Some((50, 50)), "window of one level");

    // --- retraining accumulates samples across strokes ---
    handler.set_retrain(true);
    stroke(&mut handler, &mut ctx, PRIMARY, &[p(3.0, 0.0, 0.0), p(5.0, 0.0, 0.0)]);
    let r = stroke(&mut handler, &mut ctx, PRIMARY, &[p(6.0, 0.0, 0.0), p(8.0, 0.0, 0.0)]);
    rp.compare_counts(6, handler.positive().len());
    rp.compare_counts(54, r.modified());

    let r = stroke(&mut handler, &mut ctx, SECONDARY, &[p(6.0, 2.0, 2.0), p(8.0, 2.0, 2.0)]);
    rp.compare_counts(3, handler.negative().len());
    rp.compare_counts(6, handler.positive().len());
    rp.compare_counts(27, r.modified());
    drop(ctx);
    rp.compare_counts(27, region.count_value(1));
    rp.check(region.at(7, 1, 1) == 0, "negative level cleared");

    handler.clear();
    rp.check(handler.negative().is_empty(), "clear empties both sets");
}

fn em_reg(rp: &mut RegParams, density: &DensityVolume) {
    let mut region = region_volume_like(density);
    let segmenter = EmSegmenter::new(EmSegmenterOptions::default().with_region_id(4));
    let mut handler = SamplingHandler::new(VoxelValueSampler, segmenter);
    handler.set_retrain(true);
    let mut ctx = SegmentationContext::new(InteractionMode::AutoSegmentation, density, &mut region);

    // --- positive model alone accepts its plateau ---
    let r = stroke(&mut handler, &mut ctx, PRIMARY, &[p(3.0, 1.0, 1.0), p(5.0, 1.0, 1.0)]);
    rp.compare_counts(27, r.modified());
    let components = handler.segmenter().positive_model().map(|m| m.len());
    rp.check(components == Some(4), "four mixture components");

    // --- a negative stroke on the bright plateau keeps the same voxels ---
    let r = stroke(&mut handler, &mut ctx, SECONDARY, &[p(6.0, 1.0, 1.0), p(8.0, 1.0, 1.0)]);
    rp.compare_counts(27, r.modified());
    rp.check(handler.segmenter().negative_model().is_some(), "negative model trained");
    drop(ctx);
    rp.compare_counts(27, region.count_value(4));
    rp.check(region.at(4, 0, 0) == 4 && region.at(7, 0, 0) == 0, "middle plateau only");
}

fn clustering_reg(rp: &mut RegParams, density: &DensityVolume) {
    let mut region = region_volume_like(density);
    let fcm = FuzzyCMeans::new(FcmOptions::default().with_clusters(3).with_seed(5)).unwrap();
    let segmenter = ClusteringSegmenter::new(fcm, RegionRegistry::default());
    let mut handler = SamplingHandler::new(VoxelValueSampler, segmenter);
    let mut ctx = SegmentationContext::new(InteractionMode::AutoSegmentation, density, &mut region);

    for _ in 0..2 {
        let r = stroke(&mut handler, &mut ctx, PRIMARY, &[p(0.0, 0.0, 0.0)]);
        rp.compare_counts(81, r.modified());
        let labels = handler.segmenter().last_outcome().map(|o| o.labels.clone());
        rp.check(labels == Some(1..=3), "ids reused after release");
    }
    drop(ctx);
    for id in 1..=3 {
        rp.compare_counts(27, region.count_value(id));
    }
}

fn paint_reg(rp: &mut RegParams) {
    let density = step_volume(8, 8, 4, &[0, 100]).unwrap();
    let mut region = region_volume_like(&density);
    let mut ctx = SegmentationContext::new(InteractionMode::RegionPaint, &density, &mut region);

    // --- lasso fills the closed outline ---
    let xy1 = PaintOptions::default().on_slice(SliceOrientation::XY, 1);
    let mut lasso = PaintHandler::new(xy1.with_tool(PaintTool::Lasso));
    let square = [p(1.0, 1.0, 1.0), p(5.0, 1.0, 1.0), p(5.0, 5.0, 1.0), p(1.0, 5.0, 1.0)];
    rp.compare_counts(25, stroke(&mut lasso, &mut ctx, PRIMARY, &square).modified());

    // --- protected painting skips the other region ---
    let mut line = PaintHandler::new(xy1.with_region_id(2).with_protect_other_regions(true));
    let r = stroke(&mut line, &mut ctx, PRIMARY, &[p(0.0, 3.0, 1.0), p(7.0, 3.0, 1.0)]);
    rp.compare_counts(3, r.modified());

    // --- density window limits painting to the bright half ---
    let mut windowed = PaintHandler::new(xy1.with_region_id(3).with_density_window(50, 150));
    let r = stroke(&mut windowed, &mut ctx, PRIMARY, &[p(0.0, 6.0, 1.0), p(7.0, 6.0, 1.0)]);
    rp.compare_counts(4, r.modified());

    // --- erase only removes the current region ---
    let mut eraser = PaintHandler::new(xy1);
    let r = stroke(&mut eraser, &mut ctx, SECONDARY, &[p(0.0, 3.0, 1.0), p(7.0, 3.0, 1.0)]);
    rp.compare_counts(5, r.modified());

    // --- wide line covers rows on both sides ---
    let mut wide = PaintHandler::new(
        PaintOptions::default()
            .on_slice(SliceOrientation::XY, 3)
            .with_tool(PaintTool::Line { width: 3.0 })
            .with_region_id(4),
    );
    let r = stroke(&mut wide, &mut ctx, PRIMARY, &[p(1.0, 2.0, 3.0), p(6.0, 2.0, 3.0)]);
    rp.check(r.modified() > 6, "wide line paints more than the thin one");

    // --- polygon vertices collect until closed ---
    let mut poly = PaintHandler::new(
        PaintOptions::default()
            .on_slice(SliceOrientation::XY, 0)
            .with_tool(PaintTool::Polygon)
            .with_region_id(5),
    );
    for v in [p(0.0, 0.0, 0.0), p(4.0, 0.0, 0.0), p(4.0, 4.0, 0.0), p(0.0, 4.0, 0.0)] {
        let r = stroke(&mut poly, &mut ctx, PRIMARY, &[v]);
        rp.check(r.is_handled() && r.stroke.is_none(), "vertex recorded");
    }
    rp.compare_counts(4, poly.vertices().len());
    rp.compare_counts(25, poly.close_polygon(&mut ctx).unwrap().modified());
    rp.check(poly.vertices().is_empty(), "vertices cleared");

    // --- flood on an XZ slice stops at a wall ---
    let mut flood = PaintHandler::new(
        PaintOptions::default()
            .on_slice(SliceOrientation::XZ, 7)
            .with_tool(PaintTool::Flood)
            .with_region_id(6),
    );
    drop(ctx);
    for z in 0..4 {
        region.set_at(4, 7, z, 9);
    }
    let mut ctx = SegmentationContext::new(InteractionMode::RegionPaint, &density, &mut region);
    let r = stroke(&mut flood, &mut ctx, PRIMARY, &[p(1.0, 7.0, 1.0)]);
    rp.compare_counts(16, r.modified());

    // --- thin line on a YZ slice ---
    let mut yz = PaintHandler::new(
        PaintOptions::default()
            .on_slice(SliceOrientation::YZ, 2)
            .with_region_id(7),
    );
    let r = stroke(&mut yz, &mut ctx, PRIMARY, &[p(2.0, 0.0, 2.0), p(2.0, 5.0, 2.0)]);
    rp.compare_counts(6, r.modified());
    drop(ctx);

    rp.compare_counts(20, region.count_value(1));
    rp.compare_counts(3, region.count_value(2));
    rp.compare_counts(4, region.count_value(3));
    rp.compare_counts(25, region.count_value(5));
    rp.compare_counts(16, region.count_value(6));
    rp.check(region.at(5, 7, 0) == 0, "flood did not cross the wall");
    rp.check(region.at(2, 5, 2) == 7 && region.at(2, 6, 2) != 7, "yz line endpoints");
    rp.check(region.at(3, 1, 3) == 4 && region.at(3, 3, 3) == 4, "wide line rows");
}

#[test]
fn handler_reg() {
    let mut rp = RegParams::new("handler");
    let density = step_volume(9, 3, 3, &[0, 50, 100]).unwrap();

    sampling_reg(&mut rp, &density);
    em_reg(&mut rp, &density);
    clustering_reg(&mut rp, &density);
    paint_reg(&mut rp);

    assert!(rp.cleanup(), "handler regression test failed");
}
