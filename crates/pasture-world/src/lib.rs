//! World simulation engine.
//!
//! This module implements the grid world where prey graze, predators hunt,
//! and vegetation regrows.

pub mod agent;
pub mod grid;
pub mod movement;
pub mod scheduler;
pub mod simulation;
pub mod vegetation;

mod predator;
mod prey;

pub use agent::{Agent, Predator, Prey, VegetationPatch};
pub use grid::{CellContents, Grid};
pub use scheduler::Scheduler;
pub use simulation::{Simulation, SimulationResult};
