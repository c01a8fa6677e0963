//! Per-tick behavior of predators: wander, hunt, starve or reproduce.

use crate::agent::{Agent, Predator};
use crate::movement;
use crate::simulation::Simulation;
use pasture_core::{AgentId, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, trace};

pub(crate) fn step(sim: &mut Simulation, id: AgentId) -> Result<()> {
    let Some(mut predator) = sim.schedule.get(id).and_then(Agent::as_predator).copied() else {
        return Ok(());
    };

    predator.position = movement::wander(
        &mut sim.grid,
        id,
        predator.position,
        predator.connectivity,
        &mut sim.rng,
    )?;
    predator.energy -= 1.0;

    let victim = sim
        .grid
        .contents(predator.position)
        .prey
        .choose(&mut sim.rng)
        .copied();
    if let Some(victim) = victim {
        sim.despawn(victim)?;
        predator.energy += sim.config.ecosystem.predator_gain_from_food;
        sim.summary.kills += 1;
        trace!(
            event = "predation",
            predator_id = %id,
            prey_id = %victim,
            energy = predator.energy,
            "Predator ate prey"
        );
    }

    if predator.is_starving() {
        sim.despawn(id)?;
        sim.summary.predators_starved += 1;
        debug!(
            event = "predator_starved",
            predator_id = %id,
            position_x = predator.position.x,
            position_y = predator.position.y,
            "Predator starved"
        );
        return Ok(());
    }

    let reproduces = sim.rng.gen::<f64>() < sim.config.ecosystem.predator_reproduce_probability;
    if reproduces {
        predator.energy /= 2.0;
    }
    sim.update_agent(Agent::Predator(predator))?;

    if reproduces {
        let cub_id = sim.next_id();
        let cub = Predator::new(cub_id, predator.position, predator.connectivity, predator.energy);
        sim.spawn(Agent::Predator(cub))?;
        sim.summary.predators_born += 1;
        trace!(
            event = "predator_born",
            parent_id = %id,
            offspring_id = %cub_id,
            energy = predator.energy,
            "Predator reproduced"
        );
    }

    Ok(())
}
