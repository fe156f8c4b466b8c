//! Polygon and line rasterizer regression test
//!
//! Tests the even-odd scanline fill against an independent center-sampling
//! point-in-polygon test, degenerate polygons, and straight strokes.

use voxseg_core::{PlaneStepper, Point2, Rect, RegionPlane};
use voxseg_region::polygon::scan_spans;
use voxseg_region::{Line2DRasterizer, PolygonRasterizer, SetModifier, ThickLine2DRasterizer};
use voxseg_test::RegParams;

/// Even-odd test of the pixel center `(x + 0.5, y + 0.5)`
fn center_inside(points: &[Point2], x: i32, y: i32) -> bool {
    let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
    let n = points.len();
    let mut inside = false;
    for i in 0..n {
        let (a, b) = (points[i], points[(i + 1) % n]);
        if a.y == b.y {
            continue;
        }
        let (lo, hi) = if a.y < b.y { (a, b) } else { (b, a) };
        if py < lo.y || py >= hi.y {
            continue;
        }
        let t = (py - lo.y) / (hi.y - lo.y);
        if lo.x + t * (hi.x - lo.x) > px {
            inside = !inside;
        }
    }
    inside
}

fn star() -> Vec<Point2> {
    [
        (16.0, 1.0),
        (20.0, 28.0),
        (2.0, 11.0),
        (30.0, 11.0),
        (12.0, 28.0),
    ]
    .into_iter()
    .map(Point2::from)
    .collect()
}

#[test]
fn polygon_reg() {
    let mut rp = RegParams::new("polygon");
    let bounds = Rect::from_size(32, 32);

    // --- spans agree with center sampling, including the star's hole ---
    let pts = star();
    let spans = scan_spans(&pts, bounds);
    let mut from_spans = RegionPlane::new(32, 32, 0).unwrap();
    for s in &spans {
        for x in s.x0..=s.x1 {
            from_spans.set_at(x, s.y, 1);
        }
    }
    let mut sampled = RegionPlane::new(32, 32, 0).unwrap();
    for y in 0..32 {
        for x in 0..32 {
            if center_inside(&pts, x, y) {
                sampled.set_at(x, y, 1);
            }
        }
    }
    rp.compare_planes(&sampled, &from_spans);
    rp.check(from_spans.get(16, 16) == Some(0), "even-odd leaves star center empty");

    // --- full rasterization covers fill plus outline ---
    let mut plane = RegionPlane::new(32, 32, 0).unwrap();
    let n = {
        let mut m = SetModifier::new(PlaneStepper::new(&mut plane), 1);
        PolygonRasterizer::new(bounds).rasterize(&pts, &mut m)
    };
    rp.compare_counts(plane.count_value(1), n);
    for p in &pts {
        let (x, y) = p.cell();
        rp.check(plane.get(x, y) == Some(1), "vertex painted");
    }
    let covered = (0..32)
        .flat_map(|y| (0..32).map(move |x| (x, y)))
        .all(|(x, y)| sampled.at(x, y) == 0 || plane.at(x, y) == 1);
    rp.check(covered, "fill contains every sampled center");

    // --- degenerate polygons ---
    let mut plane = RegionPlane::new(8, 8, 0).unwrap();
    {
        let mut m = SetModifier::new(PlaneStepper::new(&mut plane), 1);
        let two = [Point2::new(1.0, 1.0), Point2::new(5.0, 5.0)];
        rp.compare_counts(0, PolygonRasterizer::new(Rect::from_size(8, 8)).rasterize(&two, &mut m));
    }
    rp.compare_counts(0, plane.count_value(1));

    // --- horizontal line includes both endpoints ---
    let mut plane = RegionPlane::new(8, 8, 0).unwrap();
    {
        let mut m = SetModifier::new(PlaneStepper::new(&mut plane), 1);
        let n = Line2DRasterizer::new(Rect::from_size(8, 8)).rasterize(
            Point2::new(0.0, 0.0),
            Point2::new(5.0, 0.0),
            &mut m,
        );
        rp.compare_counts(6, n);
    }
    rp.check(plane.get(0, 0) == Some(1) && plane.get(5, 0) == Some(1), "endpoints set");
    rp.check(plane.get(6, 0) == Some(0), "line stops at end");

    // --- a thin thick-line stroke matches the plain line ---
    let stroke = [
        Point2::new(1.0, 1.0),
        Point2::new(6.0, 3.0),
        Point2::new(2.0, 6.0),
    ];
    let mut thin = RegionPlane::new(8, 8, 0).unwrap();
    let mut thick = RegionPlane::new(8, 8, 0).unwrap();
    {
        let mut m = SetModifier::new(PlaneStepper::new(&mut thin), 1);
        Line2DRasterizer::new(Rect::from_size(8, 8)).rasterize_stroke(&stroke, &mut m);
    }
    {
        let mut m = SetModifier::new(PlaneStepper::new(&mut thick), 1);
        ThickLine2DRasterizer::new(Rect::from_size(8, 8), 1.0).rasterize_stroke(&stroke, &mut m);
    }
    rp.compare_planes(&thin, &thick);

    assert!(rp.cleanup(), "polygon regression test failed");
}
