//! Multi-seed flood rasterizers
//!
//! Unlike [`SeedFill2D`](crate::SeedFill2D) these take no separate test:
//! a cell belongs to the flood when the modifier accepts it. They are what
//! the paint tools use to flood from every point of a stroke at once.
//!
//! The 3D variant works on x-runs. It first finds the maximal run of
//! accepted cells through each seed, links runs on the four adjacent lines
//! (`y ± 1`, `z ± 1`) whose x-range overlaps, and writes every reached run
//! at the end. Overlap on adjacent lines is exactly 6-connectivity.

use crate::modifiers::Modifier;
use std::collections::{HashMap, VecDeque};
use voxseg_core::{Box3, Point2, Point3, Rect};

/// 4-connected flood from many seeds
#[derive(Debug, Clone, Copy)]
pub struct FloodFill2DRasterizer {
    bounds: Rect,
}

impl FloodFill2DRasterizer {
    pub fn new(bounds: Rect) -> Self {
        Self { bounds }
    }

    /// Flood from every seed point
    ///
    /// # Returns
    ///
    /// The number of cells written.
    pub fn rasterize<M: Modifier>(&self, seeds: &[Point2], modifier: &mut M) -> usize {
        let mut queue: VecDeque<(i32, i32)> = seeds
            .iter()
            .map(|p| p.cell())
            .filter(|&(x, y)| self.bounds.contains(x, y))
            .collect();

        let mut written = 0usize;
        while let Some((x, y)) = queue.pop_front() {
            modifier.move_to_2d(x, y);
            if !modifier.set() {
                continue;
            }
            written += 1;
            for (nx, ny) in [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)] {
                if self.bounds.contains(nx, ny) {
                    queue.push_back((nx, ny));
                }
            }
        }
        written
    }
}

#[derive(Debug, Clone, Copy)]
struct Run {
    start: i32,
    end: i32,
    reached: bool,
}

/// Span-based 6-connected flood from many seeds
#[derive(Debug, Clone, Copy)]
pub struct FloodFill3DRasterizer {
    bounds: Box3,
}

impl FloodFill3DRasterizer {
    pub fn new(bounds: Box3) -> Self {
        Self { bounds }
    }

    /// Flood from every seed point
    ///
    /// Acceptance is evaluated against the grid state before any write.
    /// Seeds outside the bounds or on refused cells are skipped.
    ///
    /// # Returns
    ///
    /// The number of cells written.
    pub fn rasterize<M: Modifier>(&self, seeds: &[Point3], modifier: &mut M) -> usize {
        let mut lines: HashMap<(i32, i32), Vec<Run>> = HashMap::new();
        let mut queue: VecDeque<(i32, i32, usize)> = VecDeque::new();

        for seed in seeds {
            let (x, y, z) = seed.cell();
            if !self.bounds.contains(x, y, z) {
                continue;
            }
            let runs = self.line_runs(&mut lines, y, z, modifier);
            if let Some(i) = runs.iter().position(|r| r.start <= x && x <= r.end)
                && !runs[i].reached
            {
                runs[i].reached = true;
                queue.push_back((y, z, i));
            }
        }

        while let Some((y, z, i)) = queue.pop_front() {
            let (start, end) = {
                let r = lines[&(y, z)][i];
                (r.start, r.end)
            };
            for (ny, nz) in [(y - 1, z), (y + 1, z), (y, z - 1), (y, z + 1)] {
                if ny < self.bounds.y
                    || ny >= self.bounds.bottom()
                    || nz < self.bounds.z
                    || nz >= self.bounds.back()
                {
                    continue;
                }
                let runs = self.line_runs(&mut lines, ny, nz, modifier);
                for (j, run) in runs.iter_mut().enumerate() {
                    if !run.reached && run.start <= end && run.end >= start {
                        run.reached = true;
                        queue.push_back((ny, nz, j));
                    }
                }
            }
        }

        let mut written = 0usize;
        for (&(y, z), runs) in &lines {
            for run in runs.iter().filter(|r| r.reached) {
                for x in run.start..=run.end {
                    modifier.move_to(x, y, z);
                    if modifier.set() {
                        written += 1;
                    }
                }
            }
        }

        log::debug!(
            "span flood over {} lines from {} seeds: {} cells",
            lines.len(),
            seeds.len(),
            written
        );
        written
    }

    /// Runs of accepted cells on line `(y, z)`, computed on first use
    fn line_runs<'l, M: Modifier>(
        &self,
        lines: &'l mut HashMap<(i32, i32), Vec<Run>>,
        y: i32,
        z: i32,
        modifier: &mut M,
    ) -> &'l mut Vec<Run> {
        lines.entry((y, z)).or_insert_with(|| {
            let mut runs = Vec::new();
            let mut open: Option<i32> = None;
            for x in self.bounds.x..self.bounds.right() {
                modifier.move_to(x, y, z);
                match (modifier.accepts(), open) {
                    (true, None) => open = Some(x),
                    (false, Some(start)) => {
                        runs.push(Run {
                            start,
                            end: x - 1,
                            reached: false,
                        });
                        open = None;
                    }
                    _ => {}
                }
            }
            if let Some(start) = open {
                runs.push(Run {
                    start,
                    end: self.bounds.right() - 1,
                    reached: false,
                });
            }
            runs
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifiers::{MultiTestSetModifier, TestSetModifier};
    use crate::predicate::{MaskTest, NotDoneTest};
    use crate::seedfill::SeedFill3D;
    use voxseg_core::{PlaneStepper, RegionPlane, RegionVolume, SteppingMode, VolumeStepper};

    #[test]
    fn test_flood_2d_multiple_seeds() {
        // two compartments separated by a wall column
        let mut plane = RegionPlane::from_rows(
            5,
            2,
            1,
            &[
                0, 0, 9, 0, 0, //
                0, 0, 9, 0, 0, //
            ],
        )
        .unwrap();
        let flood = FloodFill2DRasterizer::new(Rect::from_size(5, 2));
        let mut m = TestSetModifier::new(PlaneStepper::new(&mut plane), 3, MaskTest(0u16));
        let seeds = [Point2::new(0.5, 0.5), Point2::new(4.2, 1.9), Point2::new(9.0, 0.0)];
        assert_eq!(flood.rasterize(&seeds, &mut m), 8);
        drop(m);
        assert_eq!(plane.count_value(9), 2);
    }

    #[test]
    fn test_flood_2d_refused_seed() {
        let mut plane = RegionPlane::new_with_value(3, 3, 0, 1).unwrap();
        let flood = FloodFill2DRasterizer::new(Rect::from_size(3, 3));
        let mut m = TestSetModifier::new(PlaneStepper::new(&mut plane), 3, MaskTest(0u16));
        assert_eq!(flood.rasterize(&[Point2::new(1.0, 1.0)], &mut m), 0);
    }

    fn hollow_cube() -> RegionVolume {
        let mut vol = RegionVolume::new(6, 6, 6, 1).unwrap();
        for z in 0..6 {
            for y in 0..6 {
                for x in 0..6 {
                    let edge = |c: i32| c == 1 || c == 4;
                    let within = |c: i32| (1..=4).contains(&c);
                    if within(x) && within(y) && within(z) && (edge(x) || edge(y) || edge(z)) {
                        vol.set_at(x, y, z, 9);
                    }
                }
            }
        }
        vol
    }

    #[test]
    fn test_span_flood_matches_seed_fill() {
        let bounds = Box3::from_size(6, 6, 6);

        let mut by_span = hollow_cube();
        let mut m =
            MultiTestSetModifier::new(VolumeStepper::new(&mut by_span, SteppingMode::Volume), 2);
        m.add_test(MaskTest(0u16));
        let span_count =
            FloodFill3DRasterizer::new(bounds).rasterize(&[Point3::new(0.0, 0.0, 0.0)], &mut m);
        drop(m);

        let mut by_seed = hollow_cube();
        let mut m = TestSetModifier::new(
            VolumeStepper::new(&mut by_seed, SteppingMode::Volume),
            2,
            MaskTest(0u16),
        );
        let seed_count = SeedFill3D::new(bounds).fill((0, 0, 0), &NotDoneTest(2u16), &mut m);
        drop(m);

        // 216 cells - 64 cube cells
        assert_eq!(span_count, 152);
        assert_eq!(span_count, seed_count);
        assert_eq!(by_span, by_seed);
        // the cavity is untouched
        assert_eq!(by_span.at(2, 2, 2), 0);
    }

    #[test]
    fn test_span_flood_inner_seed() {
        let mut vol = hollow_cube();
        let mut m = TestSetModifier::new(
            VolumeStepper::new(&mut vol, SteppingMode::Volume),
            5,
            MaskTest(0u16),
        );
        let flood = FloodFill3DRasterizer::new(Box3::from_size(6, 6, 6));
        let seeds = [Point3::new(2.5, 2.5, 2.5), Point3::new(3.0, 3.0, 3.0)];
        assert_eq!(flood.rasterize(&seeds, &mut m), 8);
    }
}
