//! Simulation engine: owns the grid, the scheduler and the run RNG.

use crate::agent::{Agent, Predator, Prey, VegetationPatch};
use crate::grid::Grid;
use crate::scheduler::Scheduler;
use crate::{predator, prey, vegetation};
use pasture_core::{
    AgentId, AgentKind, EcosystemParams, Error, PopulationCounts, Position, Result, RunId,
    RunTotals, SimulationConfig, TickSummary,
};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Ticks between population snapshots in the log
const SNAPSHOT_INTERVAL: u64 = 50;

pub struct Simulation {
    pub(crate) grid: Grid,
    pub(crate) schedule: Scheduler,
    pub(crate) config: SimulationConfig,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) summary: TickSummary,
    run_id: RunId,
    id_counter: u64,
    tick: u64,
    trace: Vec<PopulationCounts>,
    totals: RunTotals,
}

impl Simulation {
    /// Validate the config, seed the initial population and record the
    /// tick-0 census.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let mut sim = Self::empty(config)?;
        sim.seed_population()?;
        let counts = sim.counts();
        sim.trace.push(counts);

        info!(
            event = "population_seeded",
            run_id = %sim.run_id,
            prey = counts.prey,
            predators = counts.predators,
            grown_patches = counts.grown_patches,
            "Initial population placed"
        );

        Ok(sim)
    }

    /// A validated world with no agents, for placing a population by hand.
    pub fn empty(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            grid: Grid::from_config(&config.world),
            schedule: Scheduler::new(config.activation),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            summary: TickSummary::default(),
            run_id: RunId::new(),
            id_counter: 0,
            tick: 0,
            trace: Vec::new(),
            totals: RunTotals::new(),
        })
    }

    /// Run the simulation for the configured number of ticks, stopping early
    /// once prey and predators are both gone.
    #[instrument(skip(self), fields(run_id = %self.run_id, seed = self.config.seed, num_ticks = self.config.num_ticks))]
    pub fn run(&mut self) -> Result<SimulationResult> {
        info!("Starting simulation for {} ticks", self.config.num_ticks);

        for _ in 0..self.config.num_ticks {
            self.step()?;

            let counts = self.counts();
            if counts.is_extinct() {
                warn!(
                    event = "extinction",
                    tick = self.tick,
                    "Prey and predators are extinct, stopping early"
                );
                break;
            }
        }

        self.emit_run_summary();

        Ok(self.collect_results())
    }

    /// Activate every agent that is alive at the start of the tick, once,
    /// in scheduler order.
    pub fn step(&mut self) -> Result<TickSummary> {
        self.tick += 1;
        self.summary = TickSummary::default();

        let order = self.schedule.activation_order(&mut self.rng);
        for id in order {
            // Eaten earlier this tick
            let Some(kind) = self.schedule.get(id).map(Agent::kind) else {
                continue;
            };

            match kind {
                AgentKind::Prey => prey::step(self, id)?,
                AgentKind::Predator => predator::step(self, id)?,
                AgentKind::Patch => vegetation::step(self, id)?,
            }
        }

        let summary = self.summary;
        let counts = self.counts();
        self.trace.push(counts);
        self.totals.update(&summary, &counts);

        debug!(
            event = "tick_complete",
            tick = self.tick,
            prey = counts.prey,
            predators = counts.predators,
            grown_patches = counts.grown_patches,
            prey_born = summary.prey_born,
            predators_born = summary.predators_born,
            kills = summary.kills,
            grazes = summary.grazes,
            "Tick complete"
        );

        if self.tick % SNAPSHOT_INTERVAL == 0 {
            info!(
                event = "population_metrics",
                tick = self.tick,
                prey = counts.prey,
                predators = counts.predators,
                grown_patches = counts.grown_patches,
                total_kills = self.totals.kills,
                total_grazes = self.totals.grazes,
                "Population metrics snapshot"
            );
        }

        Ok(summary)
    }

    /// Next unused agent id
    pub fn next_id(&mut self) -> AgentId {
        let id = AgentId(self.id_counter);
        self.id_counter += 1;
        id
    }

    /// Put an agent on the grid and in the scheduler together.
    pub fn spawn(&mut self, agent: Agent) -> Result<AgentId> {
        let id = agent.id();
        let position = agent.position();
        if !position.in_bounds(self.grid.width, self.grid.height) {
            return Err(Error::Invariant(format!(
                "cannot spawn {} {} outside the grid at {}",
                agent.kind(),
                id,
                position
            )));
        }

        self.grid.place(id, agent.kind(), position)?;
        if let Err(e) = self.schedule.add(agent) {
            self.grid.remove(id);
            return Err(e);
        }
        Ok(id)
    }

    /// Take an agent off the grid and out of the scheduler together.
    pub fn despawn(&mut self, id: AgentId) -> Result<Agent> {
        let placed = self.grid.remove(id);
        let scheduled = self.schedule.remove(id);

        match (placed, scheduled) {
            (Some(_), Some(agent)) => Ok(agent),
            (None, None) => Err(Error::Invariant(format!(
                "agent {} was already removed",
                id
            ))),
            (Some(_), None) => Err(Error::Invariant(format!(
                "agent {} was on the grid but not scheduled",
                id
            ))),
            (None, Some(_)) => Err(Error::Invariant(format!(
                "agent {} was scheduled but not on the grid",
                id
            ))),
        }
    }

    pub fn add_prey(&mut self, position: Position, energy: Option<f64>) -> Result<AgentId> {
        let id = self.next_id();
        self.spawn(Agent::Prey(Prey::new(
            id,
            position,
            self.config.connectivity,
            energy,
        )))
    }

    pub fn add_predator(&mut self, position: Position, energy: f64) -> Result<AgentId> {
        let id = self.next_id();
        self.spawn(Agent::Predator(Predator::new(
            id,
            position,
            self.config.connectivity,
            energy,
        )))
    }

    pub fn add_patch(
        &mut self,
        position: Position,
        fully_grown: bool,
        regrowth_countdown: u32,
    ) -> Result<AgentId> {
        let id = self.next_id();
        self.spawn(Agent::Patch(VegetationPatch::new(
            id,
            position,
            fully_grown,
            regrowth_countdown,
        )))
    }

    /// Write back an agent's state after its step.
    pub(crate) fn update_agent(&mut self, agent: Agent) -> Result<()> {
        let id = agent.id();
        let slot = self
            .schedule
            .get_mut(id)
            .ok_or_else(|| Error::Invariant(format!("agent {} is no longer scheduled", id)))?;
        *slot = agent;
        Ok(())
    }

    /// The patch under `position`. Every cell has one while vegetation is
    /// enabled, so a miss means grid and scheduler went out of sync.
    pub(crate) fn patch_at_mut(&mut self, position: Position) -> Result<&mut VegetationPatch> {
        let patch_id = self.grid.contents(position).patch.ok_or_else(|| {
            Error::Invariant(format!("no vegetation patch at {}", position))
        })?;
        self.schedule
            .get_mut(patch_id)
            .and_then(Agent::as_patch_mut)
            .ok_or_else(|| {
                Error::Invariant(format!(
                    "patch {} at {} is on the grid but not scheduled",
                    patch_id, position
                ))
            })
    }

    /// Place prey, then predators, then one patch per cell.
    fn seed_population(&mut self) -> Result<()> {
        let params = self.config.ecosystem.clone();

        for _ in 0..self.config.population.initial_prey {
            let position = self.random_position();
            let energy = if params.vegetation_enabled {
                Some(self.initial_energy(params.prey_gain_from_food))
            } else {
                None
            };
            self.add_prey(position, energy)?;
        }

        for _ in 0..self.config.population.initial_predators {
            let position = self.random_position();
            let energy = self.initial_energy(params.predator_gain_from_food);
            self.add_predator(position, energy)?;
        }

        if params.vegetation_enabled {
            let regrowth_time = params.vegetation_regrowth_time;
            let positions: Vec<Position> = self.grid.positions().collect();
            for position in positions {
                let fully_grown = self.rng.gen::<bool>();
                let countdown = if fully_grown || regrowth_time == 0 {
                    regrowth_time
                } else {
                    self.rng.gen_range(0..regrowth_time)
                };
                self.add_patch(position, fully_grown, countdown)?;
            }
        }

        Ok(())
    }

    fn random_position(&mut self) -> Position {
        let x = self.rng.gen_range(0..self.grid.width);
        let y = self.rng.gen_range(0..self.grid.height);
        Position::new(x, y)
    }

    /// Whole-number starting energy in `[0, 2 * gain)`
    fn initial_energy(&mut self, gain: f64) -> f64 {
        let upper = (2.0 * gain).floor() as u64;
        if upper == 0 {
            0.0
        } else {
            self.rng.gen_range(0..upper) as f64
        }
    }

    pub fn counts(&self) -> PopulationCounts {
        let mut counts = PopulationCounts {
            tick: self.tick,
            ..Default::default()
        };
        for agent in self.schedule.iter() {
            match agent {
                Agent::Prey(_) => counts.prey += 1,
                Agent::Predator(_) => counts.predators += 1,
                Agent::Patch(patch) => {
                    if patch.fully_grown {
                        counts.grown_patches += 1;
                    }
                }
            }
        }
        counts
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.schedule.get(id)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn schedule(&self) -> &Scheduler {
        &self.schedule
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn params(&self) -> &EcosystemParams {
        &self.config.ecosystem
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Census after seeding (when built with `new`) and after every tick
    pub fn trace(&self) -> &[PopulationCounts] {
        &self.trace
    }

    pub fn totals(&self) -> &RunTotals {
        &self.totals
    }

    fn emit_run_summary(&self) {
        let counts = self.counts();
        info!(
            event = "run_summary",
            run_id = %self.run_id,
            ticks_run = self.tick,
            final_prey = counts.prey,
            final_predators = counts.predators,
            final_grown_patches = counts.grown_patches,
            prey_born = self.totals.prey_born,
            predators_born = self.totals.predators_born,
            prey_starved = self.totals.prey_starved,
            predators_starved = self.totals.predators_starved,
            kills = self.totals.kills,
            grazes = self.totals.grazes,
            peak_mobile_population = self.totals.peak_mobile_population,
            "Simulation complete"
        );
    }

    fn collect_results(&self) -> SimulationResult {
        SimulationResult {
            run_id: self.run_id,
            seed: self.config.seed,
            ticks_run: self.tick,
            final_counts: self.counts(),
            totals: self.totals,
            trace: self.trace.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub run_id: RunId,
    pub seed: u64,
    pub ticks_run: u64,
    pub final_counts: PopulationCounts,
    pub totals: RunTotals,
    pub trace: Vec<PopulationCounts>,
}
