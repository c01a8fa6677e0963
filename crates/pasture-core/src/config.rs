//! Configuration types for the simulation.

use crate::{ActivationOrder, Connectivity, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// World configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Width of the world grid
    pub width: i32,
    /// Height of the world grid
    pub height: i32,
    /// Wrap at the edges; when false, neighborhoods are clipped instead
    pub torus: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            torus: true,
        }
    }
}

/// Starting population sizes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    pub initial_prey: usize,
    pub initial_predators: usize,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            initial_prey: 100,
            initial_predators: 50,
        }
    }
}

/// Model-wide parameters read by the agent behaviors
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EcosystemParams {
    /// Energy a prey gains from a fully grown patch
    pub prey_gain_from_food: f64,
    /// Energy a predator gains from a kill
    pub predator_gain_from_food: f64,
    /// Per-tick reproduction chance for prey (0.0 to 1.0)
    pub prey_reproduce_probability: f64,
    /// Per-tick reproduction chance for predators (0.0 to 1.0)
    pub predator_reproduce_probability: f64,
    /// Enables patches and the prey energy model
    pub vegetation_enabled: bool,
    /// Ticks for the countdown regrowth path
    pub vegetation_regrowth_time: u32,
}

impl Default for EcosystemParams {
    fn default() -> Self {
        Self {
            prey_gain_from_food: 4.0,
            predator_gain_from_food: 20.0,
            prey_reproduce_probability: 0.04,
            predator_reproduce_probability: 0.05,
            vegetation_enabled: true,
            vegetation_regrowth_time: 30,
        }
    }
}

impl EcosystemParams {
    pub fn validate(&self) -> Result<()> {
        check_gain("prey_gain_from_food", self.prey_gain_from_food)?;
        check_gain("predator_gain_from_food", self.predator_gain_from_food)?;
        check_probability("prey_reproduce_probability", self.prey_reproduce_probability)?;
        check_probability(
            "predator_reproduce_probability",
            self.predator_reproduce_probability,
        )?;
        Ok(())
    }
}

fn check_gain(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::Config(format!(
            "{} must be a finite non-negative number, got {}",
            name, value
        )));
    }
    Ok(())
}

fn check_probability(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(Error::Config(format!(
            "{} must lie in [0, 1], got {}",
            name, value
        )));
    }
    Ok(())
}

/// Simulation run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of ticks to run the simulation
    pub num_ticks: u64,
    /// Random seed for reproducibility
    pub seed: u64,
    /// Neighborhood used by prey and predator movement
    pub connectivity: Connectivity,
    /// Scheduler ordering
    pub activation: ActivationOrder,
    pub world: WorldConfig,
    pub population: PopulationConfig,
    pub ecosystem: EcosystemParams,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_ticks: 200,
            seed: 0,
            connectivity: Connectivity::Moore,
            activation: ActivationOrder::Random,
            world: WorldConfig::default(),
            population: PopulationConfig::default(),
            ecosystem: EcosystemParams::default(),
        }
    }
}

impl SimulationConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Reject parameter sets the behaviors cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.world.width <= 0 || self.world.height <= 0 {
            return Err(Error::Config(format!(
                "world must be at least 1x1, got {}x{}",
                self.world.width, self.world.height
            )));
        }
        if self.world.width.checked_mul(self.world.height).is_none() {
            return Err(Error::Config(format!(
                "world of {}x{} cells is too large",
                self.world.width, self.world.height
            )));
        }
        self.ecosystem.validate()
    }
}
