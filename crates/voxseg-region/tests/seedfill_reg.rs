//! Seed fill regression test
//!
//! Tests SeedFill2D and SeedFill3D connectivity, termination on a second
//! pass, clipping to the fill bounds, and fills gated by a density window
//! through a joined stepper.

use voxseg_core::{
    Box3, DensityVolume, JoinedStepper, PlaneStepper, Rect, RegionPlane, RegionVolume,
    SteppingMode, VolumeStepper,
};
use voxseg_region::{
    MaskTest, MultiTest, NotDoneTest, RangeTest, SeedFill2D, SeedFill3D, Secondary, SetModifier,
};
use voxseg_test::{RegParams, checkerboard_plane, region_volume_like, step_volume};

type Joined<'a> =
    JoinedStepper<VolumeStepper<&'a mut RegionVolume>, VolumeStepper<&'a DensityVolume>>;

#[test]
fn seedfill_reg() {
    let mut rp = RegParams::new("seedfill");

    // --- 4-connectivity does not cross diagonal contacts ---
    let mut board = checkerboard_plane(6, 6, 1).unwrap();
    let filler = SeedFill2D::new(Rect::from_size(6, 6));
    {
        let mut m = SetModifier::new(PlaneStepper::new(&mut board), 2);
        let n = filler.fill((0, 0), &MaskTest(1u16), &mut m);
        rp.compare_counts(1, n);
        let n = filler.fill((1, 0), &MaskTest(0u16), &mut m);
        rp.compare_counts(1, n);
    }
    rp.compare_counts(2, board.count_value(2));
    rp.compare_counts(17, board.count_value(1));

    // --- a wall column splits the plane, second pass writes nothing ---
    let mut plane = RegionPlane::new(8, 8, 1).unwrap();
    for y in 0..8 {
        plane.set_at(4, y, 9);
    }
    let filler = SeedFill2D::new(Rect::from_size(8, 8));
    {
        let mut m = SetModifier::new(PlaneStepper::new(&mut plane), 3);
        rp.compare_counts(32, filler.fill((0, 0), &MaskTest(0u16), &mut m));
        rp.compare_counts(0, filler.fill((0, 0), &MaskTest(0u16), &mut m));
        rp.compare_counts(0, filler.fill((7, 7), &NotDoneTest(0u16), &mut m));
    }
    rp.compare_counts(32, plane.count_value(3));
    rp.compare_counts(8, plane.count_value(9));
    rp.compare_counts(24, plane.count_value(0));
    if rp.display() {
        eprintln!("{}", voxseg_test::render_plane(&plane));
    }

    // --- the fill never leaves its bounds ---
    let mut plane = RegionPlane::new(8, 8, 1).unwrap();
    let filler = SeedFill2D::new(Rect::new(2, 2, 3, 3).unwrap());
    {
        let mut m = SetModifier::new(PlaneStepper::new(&mut plane), 1);
        rp.compare_counts(0, filler.fill((0, 0), &NotDoneTest(1u16), &mut m));
        rp.compare_counts(9, filler.fill((3, 3), &NotDoneTest(1u16), &mut m));
    }
    rp.check(plane.get(1, 1) == Some(0), "cell outside bounds untouched");
    rp.check(plane.get(4, 4) == Some(1), "far corner of bounds filled");
    rp.check(plane.get(5, 5) == Some(0), "cell past bounds untouched");

    // --- 6-connected fill stops at a wall plane ---
    let mut vol = RegionVolume::new(5, 5, 5, 1).unwrap();
    for y in 0..5 {
        for x in 0..5 {
            vol.set_at(x, y, 2, 7);
        }
    }
    let filler = SeedFill3D::new(Box3::from_size(5, 5, 5));
    {
        let mut m = SetModifier::new(VolumeStepper::new(&mut vol, SteppingMode::Volume), 4);
        rp.compare_counts(50, filler.fill((0, 0, 0), &MaskTest(0u16), &mut m));
    }
    rp.compare_counts(50, vol.count_value(4));
    rp.compare_counts(50, vol.count_value(0));
    rp.check(vol.at(0, 0, 4) == 0, "far side of wall untouched");

    // --- density window through a joined stepper ---
    let density = step_volume(9, 3, 3, &[0, 50, 100]).unwrap();
    let mut region = region_volume_like(&density);
    {
        let joined = JoinedStepper::new(
            VolumeStepper::new(&mut region, SteppingMode::Volume),
            VolumeStepper::new(&density, SteppingMode::Volume),
        )
        .unwrap();
        let mut tests: MultiTest<'_, Joined<'_>> = MultiTest::new();
        rp.check(tests.add_test(NotDoneTest(1u16)), "add label test");
        rp.check(tests.add_test(Secondary(RangeTest::new(40i16, 60))), "add window test");

        let mut m = SetModifier::new(joined, 1);
        let n = SeedFill3D::new(Box3::from_size(9, 3, 3)).fill((4, 1, 1), &tests, &mut m);
        rp.compare_counts(27, n);
        // seed outside the window
        let n = SeedFill3D::new(Box3::from_size(9, 3, 3)).fill((0, 0, 0), &tests, &mut m);
        rp.compare_counts(0, n);
    }
    rp.compare_counts(27, region.count_value(1));
    rp.check(region.at(3, 0, 0) == 1 && region.at(5, 2, 2) == 1, "plateau filled");
    rp.check(region.at(2, 1, 1) == 0 && region.at(6, 1, 1) == 0, "neighbors untouched");

    assert!(rp.cleanup(), "seedfill regression test failed");
}
