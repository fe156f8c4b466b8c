//! Grid model regression test
//!
//! Tests margin handling, slice extraction, histograms over synthetic
//! plateaus, and plane-mode steppers writing through a volume.

use voxseg_core::{
    Axis, DensityVolume, Histogram, JoinedStepper, RegionVolume, Stepper, StepperMut,
    SteppingMode, VolumeStepper,
};
use voxseg_test::{RegParams, region_volume_like, step_volume};

#[test]
fn grid_reg() {
    let mut rp = RegParams::new("grid");

    // --- margin ring is addressable but never iterated ---
    let mut density = step_volume(12, 4, 3, &[-100, 0, 100]).unwrap();
    density.fill_margin(i16::MIN);
    rp.compare_counts(144, density.iter().count());
    rp.check(density.min_max() == Some((-100, 100)), "min/max ignore the margin");
    rp.check(density.get(-1, 0, 0) == Some(i16::MIN), "margin readable");
    rp.check(density.get(12, 4, 3) == Some(i16::MIN), "far margin corner readable");
    rp.check(density.get(13, 0, 0).is_none(), "beyond margin is not");

    // --- histogram over the plateaus ---
    let hist = Histogram::from_volume(&density).unwrap();
    rp.compare_counts(201, hist.bin_count());
    rp.compare_counts(3, hist.distinct_values());
    rp.compare_values(48.0, hist.count(0) as f64, 0.0);
    rp.compare_values(48.0, hist.count(200) as f64, 0.0);
    rp.compare_values(0.0, hist.mean().unwrap(), 1e-9);

    let clamped = Histogram::from_volume_in_range(&density, -10, 10).unwrap();
    rp.compare_values(48.0, clamped.count(0) as f64, 0.0);
    rp.compare_values(48.0, clamped.count(20) as f64, 0.0);

    // --- slice extraction round trip ---
    let slice = density.plane_xy(1).unwrap();
    let mut copy = DensityVolume::new_like(&density);
    for z in 0..3 {
        copy.set_plane_xy(z, &slice).unwrap();
    }
    let mut expected = density.clone();
    expected.fill_margin(0);
    rp.compare_volumes(&expected, &copy);

    // --- XZ stepper walks a slice of constant y ---
    let mut region = region_volume_like(&density);
    {
        let mut s = VolumeStepper::new(&mut region, SteppingMode::PlaneXZ);
        s.set_position(0, 0, 2);
        while s.is_in() {
            s.set_position_2d(0, s.position()[1]);
            while s.is_in() {
                s.set(5);
                s.inc(Axis::X);
            }
            let [_, v, _] = s.position();
            s.set_position_2d(0, v + 1);
        }
    }
    rp.compare_counts(36, region.count_value(5));
    rp.check(region.at(11, 2, 2) == 5, "last cell of slice y = 2 written");
    rp.check(region.at(0, 1, 0) == 0, "neighbouring slice untouched");

    // --- joined steppers read density while writing labels ---
    let mut labels = RegionVolume::new_like(&density);
    {
        let mut joined = JoinedStepper::new(
            VolumeStepper::new(&mut labels, SteppingMode::Volume),
            VolumeStepper::new(&density, SteppingMode::Volume),
        )
        .unwrap();
        for x in 0..12 {
            joined.set_position(x, 0, 0);
            if joined.secondary().get() > 0 {
                joined.set(1);
            }
        }
    }
    rp.compare_counts(4, labels.count_value(1));

    let short = DensityVolume::new(12, 4, 2, 1).unwrap();
    let mismatch = JoinedStepper::new(
        VolumeStepper::new(&labels, SteppingMode::Volume),
        VolumeStepper::new(&short, SteppingMode::Volume),
    );
    rp.check(mismatch.is_err(), "joined steppers reject a size mismatch");

    assert!(rp.cleanup(), "grid regression test failed");
}
