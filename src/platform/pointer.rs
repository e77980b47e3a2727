//! Pointer input
//!
//! A tracker reports one normalized fingertip position per frame, or nothing
//! when no hand is detected. [`PointerMapper`] turns that into world
//! coordinates for hit-testing.

use std::collections::VecDeque;

use glam::Vec2;

/// Per-frame pointer provider. Coordinates are normalized to the input
/// frame: (0, 0) top-left, (1, 1) bottom-right.
pub trait PointerSource {
    fn poll(&mut self) -> Option<Vec2>;
}

/// Rescales normalized samples to world space, with optional smoothing
#[derive(Debug, Clone)]
pub struct PointerMapper {
    world: Vec2,
    /// Fraction of the distance to the new sample covered each tick
    smoothing: f32,
    prev: Option<Vec2>,
}

impl PointerMapper {
    /// `smoothing` of 0 or 1 disables smoothing
    pub fn new(world: Vec2, smoothing: f32) -> Self {
        Self {
            world,
            smoothing,
            prev: None,
        }
    }

    pub fn map(&mut self, sample: Option<Vec2>) -> Option<Vec2> {
        let Some(normalized) = sample else {
            self.prev = None;
            return None;
        };
        let target = crate::normalized_to_world(normalized, self.world);

        let pos = match self.prev {
            Some(prev) if self.smoothing > 0.0 && self.smoothing < 1.0 => {
                prev + (target - prev) * self.smoothing
            }
            _ => target,
        };
        self.prev = Some(pos);
        Some(pos)
    }
}

/// Replays a fixed list of samples, then reports no pointer
#[derive(Debug, Clone, Default)]
pub struct ScriptedPointer {
    samples: VecDeque<Option<Vec2>>,
}

impl ScriptedPointer {
    pub fn new(samples: impl IntoIterator<Item = Option<Vec2>>) -> Self {
        Self {
            samples: samples.into_iter().collect(),
        }
    }

    pub fn push(&mut self, sample: Option<Vec2>) {
        self.samples.push_back(sample);
    }

    pub fn remaining(&self) -> usize {
        self.samples.len()
    }
}

impl PointerSource for ScriptedPointer {
    fn poll(&mut self) -> Option<Vec2> {
        self.samples.pop_front().flatten()
    }
}

/// One straight segment of a [`TourPointer`] path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TourLeg {
    pub from: Vec2,
    pub to: Vec2,
    pub ticks: u32,
}

impl TourLeg {
    /// Rest at one point
    pub fn hold(at: Vec2, ticks: u32) -> Self {
        Self {
            from: at,
            to: at,
            ticks,
        }
    }

    pub fn line(from: Vec2, to: Vec2, ticks: u32) -> Self {
        Self { from, to, ticks }
    }
}

/// Walks a looping path of legs, one step per poll (demo input)
#[derive(Debug, Clone)]
pub struct TourPointer {
    legs: Vec<TourLeg>,
    leg: usize,
    tick: u32,
}

impl TourPointer {
    pub fn new(legs: Vec<TourLeg>) -> Self {
        Self { legs, leg: 0, tick: 0 }
    }
}

impl PointerSource for TourPointer {
    fn poll(&mut self) -> Option<Vec2> {
        if self.legs.iter().all(|l| l.ticks == 0) {
            return None;
        }
        while self.legs[self.leg].ticks == 0 {
            self.leg = (self.leg + 1) % self.legs.len();
        }

        let leg = self.legs[self.leg];
        let t = self.tick as f32 / leg.ticks as f32;
        let pos = leg.from.lerp(leg.to, t);

        self.tick += 1;
        if self.tick >= leg.ticks {
            self.tick = 0;
            self.leg = (self.leg + 1) % self.legs.len();
        }
        Some(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORLD: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn test_mapper_scales_to_world() {
        let mut mapper = PointerMapper::new(WORLD, 0.0);
        assert_eq!(mapper.map(Some(Vec2::new(0.5, 0.5))), Some(Vec2::new(400.0, 300.0)));
        assert_eq!(mapper.map(Some(Vec2::ONE)), Some(WORLD));
        assert_eq!(mapper.map(None), None);
    }

    #[test]
    fn test_mapper_smoothing_resets_on_loss() {
        let mut mapper = PointerMapper::new(WORLD, 0.5);
        assert_eq!(mapper.map(Some(Vec2::ZERO)), Some(Vec2::ZERO));
        assert_eq!(mapper.map(Some(Vec2::new(1.0, 0.0))), Some(Vec2::new(400.0, 0.0)));
        assert_eq!(mapper.map(Some(Vec2::new(1.0, 0.0))), Some(Vec2::new(600.0, 0.0)));

        // After losing the hand, the next sample is taken as-is
        mapper.map(None);
        assert_eq!(mapper.map(Some(Vec2::new(0.0, 1.0))), Some(Vec2::new(0.0, 600.0)));
    }

    #[test]
    fn test_scripted_pointer() {
        let mut pointer = ScriptedPointer::new([Some(Vec2::ONE), None]);
        pointer.push(Some(Vec2::ZERO));
        assert_eq!(pointer.remaining(), 3);
        assert_eq!(pointer.poll(), Some(Vec2::ONE));
        assert_eq!(pointer.poll(), None);
        assert_eq!(pointer.poll(), Some(Vec2::ZERO));
        assert_eq!(pointer.poll(), None);
    }

    #[test]
    fn test_tour_pointer_walks_and_loops() {
        let mut tour = TourPointer::new(vec![
            TourLeg::hold(Vec2::ZERO, 2),
            TourLeg::line(Vec2::ZERO, Vec2::new(1.0, 0.0), 2),
        ]);
        let path: Vec<_> = (0..5).map(|_| tour.poll().unwrap()).collect();
        assert_eq!(
            path,
            vec![
                Vec2::ZERO,
                Vec2::ZERO,
                Vec2::ZERO,
                Vec2::new(0.5, 0.0),
                Vec2::ZERO,
            ]
        );
    }

    #[test]
    fn test_empty_tour_reports_nothing() {
        assert_eq!(TourPointer::new(Vec::new()).poll(), None);
        assert_eq!(TourPointer::new(vec![TourLeg::hold(Vec2::ONE, 0)]).poll(), None);
    }
}
