//! Regrowth of vegetation patches.
//!
//! A patch that is not fully grown has two ways back: a growth accumulator
//! fed by the prey around it, and a plain countdown. The accumulator is
//! checked first; the countdown only runs on ticks where the accumulator did
//! not finish the job, so a single growth event always has one cause.

use crate::agent::{Agent, VegetationPatch};
use crate::simulation::Simulation;
use pasture_core::{AgentId, Result};
use tracing::trace;

/// Accumulator gain per tick before counting nearby prey
pub const BASE_GROWTH_RATE: u32 = 3;
/// Accumulator value at which a patch is fully grown
pub const GROWTH_THRESHOLD: u32 = 15;

impl VegetationPatch {
    /// Density-driven growth. More prey nearby means faster regrowth.
    pub fn accumulate_growth(&mut self, prey_nearby: usize) -> bool {
        if self.fully_grown {
            return false;
        }

        let rate = BASE_GROWTH_RATE.saturating_add(prey_nearby as u32);
        self.growth_accumulator = self.growth_accumulator.saturating_add(rate);
        if self.growth_accumulator >= GROWTH_THRESHOLD {
            self.fully_grown = true;
            self.growth_accumulator = 0;
            return true;
        }
        false
    }

    /// Countdown-driven growth. An expired countdown grows the patch and
    /// restarts at `regrowth_time`.
    pub fn advance_countdown(&mut self, regrowth_time: u32) -> bool {
        if self.fully_grown {
            return false;
        }

        if self.regrowth_countdown == 0 {
            self.fully_grown = true;
            self.regrowth_countdown = regrowth_time;
            true
        } else {
            self.regrowth_countdown -= 1;
            false
        }
    }

    /// One tick of growth; true if the patch became fully grown.
    pub fn grow(&mut self, prey_nearby: usize, regrowth_time: u32) -> bool {
        self.accumulate_growth(prey_nearby) || self.advance_countdown(regrowth_time)
    }

    /// Eaten by a prey
    pub fn consume(&mut self) {
        self.fully_grown = false;
        self.growth_accumulator = 0;
    }
}

pub(crate) fn step(sim: &mut Simulation, id: AgentId) -> Result<()> {
    let Some(mut patch) = sim.schedule.get(id).and_then(Agent::as_patch).copied() else {
        return Ok(());
    };
    if patch.fully_grown {
        return Ok(());
    }

    let prey_nearby = sim.grid.prey_around(patch.position);
    if patch.grow(prey_nearby, sim.config.ecosystem.vegetation_regrowth_time) {
        sim.summary.regrown += 1;
        trace!(
            event = "patch_regrown",
            patch_id = %id,
            prey_nearby,
            "Patch fully grown"
        );
    }

    sim.update_agent(Agent::Patch(patch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pasture_core::{Position, SimulationConfig, WorldConfig};
    use proptest::prelude::*;

    fn growing(countdown: u32) -> VegetationPatch {
        VegetationPatch::new(AgentId(0), Position::new(0, 0), false, countdown)
    }

    fn ticks_to_grow(patch: &mut VegetationPatch, prey_nearby: usize, regrowth_time: u32) -> u32 {
        let mut ticks = 0;
        loop {
            ticks += 1;
            if patch.grow(prey_nearby, regrowth_time) {
                return ticks;
            }
        }
    }

    #[test]
    fn test_density_growth_without_prey() {
        let mut patch = growing(1000);
        assert_eq!(ticks_to_grow(&mut patch, 0, 30), 5);
        assert!(patch.fully_grown);
        assert_eq!(patch.growth_accumulator, 0);
    }

    #[test]
    fn test_density_growth_with_three_prey() {
        let mut patch = growing(1000);
        assert_eq!(ticks_to_grow(&mut patch, 3, 30), 3);
    }

    #[test]
    fn test_countdown_growth_wins_when_shorter() {
        let mut patch = growing(1);
        assert!(!patch.grow(0, 30));
        assert_eq!(patch.regrowth_countdown, 0);
        assert!(patch.grow(0, 30));
        assert_eq!(patch.regrowth_countdown, 30);
        // accumulator keeps its partial progress
        assert_eq!(patch.growth_accumulator, 6);
    }

    #[test]
    fn test_density_growth_skips_countdown() {
        let mut patch = growing(4);
        for _ in 0..4 {
            assert!(!patch.grow(0, 30));
        }
        assert_eq!(patch.regrowth_countdown, 0);
        assert!(patch.grow(0, 30));
        // grown by the accumulator, so the countdown was not touched
        assert_eq!(patch.regrowth_countdown, 0);
        assert_eq!(patch.growth_accumulator, 0);
    }

    #[test]
    fn test_grown_patch_is_idle() {
        let mut patch = VegetationPatch::new(AgentId(0), Position::new(0, 0), true, 7);
        assert!(!patch.grow(8, 30));
        assert_eq!(patch.regrowth_countdown, 7);
        assert_eq!(patch.growth_accumulator, 0);
    }

    #[test]
    fn test_consume_restarts_growth() {
        let mut patch = growing(1000);
        patch.grow(0, 30);
        patch.fully_grown = true;
        patch.consume();
        assert!(!patch.fully_grown);
        assert_eq!(patch.growth_accumulator, 0);
    }

    #[test]
    fn test_step_counts_neighboring_prey() {
        let config = SimulationConfig {
            world: WorldConfig {
                width: 5,
                height: 5,
                torus: true,
            },
            ..Default::default()
        };
        let mut sim = Simulation::empty(config).unwrap();
        let id = sim.add_patch(Position::new(2, 2), false, 1000).unwrap();
        for position in [Position::new(1, 1), Position::new(3, 3), Position::new(2, 3)] {
            sim.add_prey(position, Some(1.0)).unwrap();
        }
        // on the patch itself, not counted
        sim.add_prey(Position::new(2, 2), Some(1.0)).unwrap();

        for _ in 0..2 {
            step(&mut sim, id).unwrap();
        }
        let patch = *sim.agent(id).and_then(Agent::as_patch).unwrap();
        assert!(!patch.fully_grown);
        assert_eq!(patch.growth_accumulator, 12);

        step(&mut sim, id).unwrap();
        let patch = *sim.agent(id).and_then(Agent::as_patch).unwrap();
        assert!(patch.fully_grown);
        assert_eq!(sim.summary.regrown, 1);
    }

    proptest! {
        #[test]
        fn density_growth_takes_ceil_ticks(prey_nearby in 0usize..40) {
            let mut patch = growing(u32::MAX);
            let rate = BASE_GROWTH_RATE + prey_nearby as u32;
            let expected = GROWTH_THRESHOLD.div_ceil(rate);
            prop_assert_eq!(ticks_to_grow(&mut patch, prey_nearby, 30), expected);
        }
    }
}
