//! Agent state for the three kinds sharing the grid.

use pasture_core::{AgentId, AgentKind, Connectivity, Position};
use serde::{Deserialize, Serialize};

/// A sheep. `energy` is `None` only in runs without vegetation, where prey
/// cannot starve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prey {
    pub id: AgentId,
    pub position: Position,
    pub connectivity: Connectivity,
    pub energy: Option<f64>,
}

impl Prey {
    pub fn new(
        id: AgentId,
        position: Position,
        connectivity: Connectivity,
        energy: Option<f64>,
    ) -> Self {
        Self {
            id,
            position,
            connectivity,
            energy,
        }
    }

    pub fn is_starving(&self) -> bool {
        self.energy.is_some_and(|energy| energy < 0.0)
    }
}

/// A wolf
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Predator {
    pub id: AgentId,
    pub position: Position,
    pub connectivity: Connectivity,
    pub energy: f64,
}

impl Predator {
    pub fn new(id: AgentId, position: Position, connectivity: Connectivity, energy: f64) -> Self {
        Self {
            id,
            position,
            connectivity,
            energy,
        }
    }

    pub fn is_starving(&self) -> bool {
        self.energy < 0.0
    }
}

/// A grass patch. Exactly one per cell when vegetation is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VegetationPatch {
    pub id: AgentId,
    pub position: Position,
    pub fully_grown: bool,
    pub regrowth_countdown: u32,
    pub growth_accumulator: u32,
}

impl VegetationPatch {
    pub fn new(id: AgentId, position: Position, fully_grown: bool, regrowth_countdown: u32) -> Self {
        Self {
            id,
            position,
            fully_grown,
            regrowth_countdown,
            growth_accumulator: 0,
        }
    }
}

/// Anything the scheduler can activate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Agent {
    Prey(Prey),
    Predator(Predator),
    Patch(VegetationPatch),
}

impl Agent {
    pub fn id(&self) -> AgentId {
        match self {
            Agent::Prey(prey) => prey.id,
            Agent::Predator(predator) => predator.id,
            Agent::Patch(patch) => patch.id,
        }
    }

    pub fn kind(&self) -> AgentKind {
        match self {
            Agent::Prey(_) => AgentKind::Prey,
            Agent::Predator(_) => AgentKind::Predator,
            Agent::Patch(_) => AgentKind::Patch,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Agent::Prey(prey) => prey.position,
            Agent::Predator(predator) => predator.position,
            Agent::Patch(patch) => patch.position,
        }
    }

    pub fn as_prey(&self) -> Option<&Prey> {
        match self {
            Agent::Prey(prey) => Some(prey),
            _ => None,
        }
    }

    pub fn as_predator(&self) -> Option<&Predator> {
        match self {
            Agent::Predator(predator) => Some(predator),
            _ => None,
        }
    }

    pub fn as_patch(&self) -> Option<&VegetationPatch> {
        match self {
            Agent::Patch(patch) => Some(patch),
            _ => None,
        }
    }

    pub fn as_patch_mut(&mut self) -> Option<&mut VegetationPatch> {
        match self {
            Agent::Patch(patch) => Some(patch),
            _ => None,
        }
    }
}
