//! Per-tick behavior of prey: wander, graze, starve or reproduce.

use crate::agent::{Agent, Prey};
use crate::movement;
use crate::simulation::Simulation;
use pasture_core::{AgentId, Error, Result};
use rand::Rng;
use tracing::{debug, trace};

pub(crate) fn step(sim: &mut Simulation, id: AgentId) -> Result<()> {
    let Some(mut prey) = sim.schedule.get(id).and_then(Agent::as_prey).copied() else {
        return Ok(());
    };

    prey.position = movement::wander(
        &mut sim.grid,
        id,
        prey.position,
        prey.connectivity,
        &mut sim.rng,
    )?;

    let vegetation_enabled = sim.config.ecosystem.vegetation_enabled;
    if vegetation_enabled {
        let mut energy = prey.energy.ok_or_else(|| {
            Error::Invariant(format!("prey {} has no energy in a vegetation run", id))
        })?;
        energy -= 1.0;

        let gain = sim.config.ecosystem.prey_gain_from_food;
        let patch = sim.patch_at_mut(prey.position)?;
        if patch.fully_grown {
            patch.consume();
            energy += gain;
            sim.summary.grazes += 1;
            trace!(event = "graze", prey_id = %id, energy, "Prey grazed");
        }
        prey.energy = Some(energy);

        if prey.is_starving() {
            sim.despawn(id)?;
            sim.summary.prey_starved += 1;
            debug!(
                event = "prey_starved",
                prey_id = %id,
                position_x = prey.position.x,
                position_y = prey.position.y,
                "Prey starved"
            );
            return Ok(());
        }
    }

    let reproduces = sim.rng.gen::<f64>() < sim.config.ecosystem.prey_reproduce_probability;
    if reproduces && vegetation_enabled {
        prey.energy = prey.energy.map(|energy| energy / 2.0);
    }
    sim.update_agent(Agent::Prey(prey))?;

    if reproduces {
        let lamb_id = sim.next_id();
        let lamb = Prey::new(lamb_id, prey.position, prey.connectivity, prey.energy);
        sim.spawn(Agent::Prey(lamb))?;
        sim.summary.prey_born += 1;
        trace!(
            event = "prey_born",
            parent_id = %id,
            offspring_id = %lamb_id,
            energy = ?prey.energy,
            "Prey reproduced"
        );
    }

    Ok(())
}
