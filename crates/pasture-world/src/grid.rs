//! 2D multi-occupancy grid for the world.

use pasture_core::{AgentId, AgentKind, Connectivity, Error, Position, Result, WorldConfig};
use std::collections::HashMap;

static EMPTY_CELL: CellContents = CellContents {
    prey: Vec::new(),
    predators: Vec::new(),
    patch: None,
};

/// Agents occupying one cell, indexed by kind
#[derive(Debug, Clone, Default)]
pub struct CellContents {
    /// Prey ids in placement order
    pub prey: Vec<AgentId>,
    /// Predator ids in placement order
    pub predators: Vec<AgentId>,
    pub patch: Option<AgentId>,
}

impl CellContents {
    pub fn is_empty(&self) -> bool {
        self.prey.is_empty() && self.predators.is_empty() && self.patch.is_none()
    }

    fn insert(&mut self, id: AgentId, kind: AgentKind) -> Result<()> {
        match kind {
            AgentKind::Prey => self.prey.push(id),
            AgentKind::Predator => self.predators.push(id),
            AgentKind::Patch => {
                if let Some(existing) = self.patch {
                    return Err(Error::Invariant(format!(
                        "cell already holds patch {}, cannot add {}",
                        existing, id
                    )));
                }
                self.patch = Some(id);
            }
        }
        Ok(())
    }

    fn take(&mut self, id: AgentId, kind: AgentKind) {
        match kind {
            AgentKind::Prey => self.prey.retain(|other| *other != id),
            AgentKind::Predator => self.predators.retain(|other| *other != id),
            AgentKind::Patch => {
                if self.patch == Some(id) {
                    self.patch = None;
                }
            }
        }
    }
}

/// A 2D grid, toroidal or clipped at the edges
#[derive(Debug, Clone)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    torus: bool,
    cells: Vec<CellContents>,
    locations: HashMap<AgentId, (Position, AgentKind)>,
}

impl Grid {
    pub fn new(width: i32, height: i32, torus: bool) -> Self {
        let size = width.max(0) as usize * height.max(0) as usize;
        Self {
            width,
            height,
            torus,
            cells: vec![CellContents::default(); size],
            locations: HashMap::new(),
        }
    }

    /// Create a grid from world configuration
    pub fn from_config(config: &WorldConfig) -> Self {
        Self::new(config.width, config.height, config.torus)
    }

    /// Map a position onto the grid: wrapped on a torus, `None` when it
    /// falls off a clipped grid.
    pub fn normalize(&self, pos: Position) -> Option<Position> {
        if self.torus {
            Some(pos.wrap(self.width, self.height))
        } else if pos.in_bounds(self.width, self.height) {
            Some(pos)
        } else {
            None
        }
    }

    /// Radius-1 neighborhood of `pos`. Positions are unique, so a small
    /// torus never reports the same cell twice.
    pub fn neighborhood(
        &self,
        pos: Position,
        connectivity: Connectivity,
        include_center: bool,
    ) -> Vec<Position> {
        let mut neighbors = Vec::with_capacity(9);

        for (dx, dy) in connectivity.offsets(include_center) {
            if let Some(neighbor) = self.normalize(pos.add(dx, dy)) {
                if !neighbors.contains(&neighbor) {
                    neighbors.push(neighbor);
                }
            }
        }

        neighbors
    }

    /// Get cell contents at position. Wraps on a torus; off-grid cells of a
    /// clipped grid read as empty.
    pub fn contents(&self, pos: Position) -> &CellContents {
        match self.normalize(pos) {
            Some(pos) => &self.cells[self.pos_to_index(pos)],
            None => &EMPTY_CELL,
        }
    }

    /// Number of prey on the cells around `pos`, the center excluded
    pub fn prey_around(&self, pos: Position) -> usize {
        self.neighborhood(pos, Connectivity::Moore, false)
            .into_iter()
            .map(|neighbor| self.contents(neighbor).prey.len())
            .sum()
    }

    pub fn place(&mut self, id: AgentId, kind: AgentKind, pos: Position) -> Result<()> {
        if self.locations.contains_key(&id) {
            return Err(Error::Invariant(format!("agent {} is already on the grid", id)));
        }
        let pos = self
            .normalize(pos)
            .ok_or_else(|| Error::Invariant(format!("position {} is off the grid", pos)))?;

        let index = self.pos_to_index(pos);
        self.cells[index].insert(id, kind)?;
        self.locations.insert(id, (pos, kind));
        Ok(())
    }

    /// Move a mobile agent to another cell
    pub fn move_agent(&mut self, id: AgentId, to: Position) -> Result<Position> {
        let (from, kind) = *self
            .locations
            .get(&id)
            .ok_or_else(|| Error::NotFound(format!("agent {} is not on the grid", id)))?;
        if kind == AgentKind::Patch {
            return Err(Error::Invariant(format!("patch {} cannot move", id)));
        }
        let to = self
            .normalize(to)
            .ok_or_else(|| Error::Invariant(format!("position {} is off the grid", to)))?;

        if from != to {
            let from_index = self.pos_to_index(from);
            self.cells[from_index].take(id, kind);
            let to_index = self.pos_to_index(to);
            self.cells[to_index].insert(id, kind)?;
            self.locations.insert(id, (to, kind));
        }
        Ok(to)
    }

    /// Remove an agent, returning where it was
    pub fn remove(&mut self, id: AgentId) -> Option<(Position, AgentKind)> {
        let (pos, kind) = self.locations.remove(&id)?;
        let index = self.pos_to_index(pos);
        self.cells[index].take(id, kind);
        Some((pos, kind))
    }

    pub fn position_of(&self, id: AgentId) -> Option<Position> {
        self.locations.get(&id).map(|(pos, _)| *pos)
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.locations.contains_key(&id)
    }

    /// Number of agents on the grid
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    fn pos_to_index(&self, pos: Position) -> usize {
        pos.y as usize * self.width as usize + pos.x as usize
    }

    /// Get position from index
    pub fn index_to_pos(&self, index: usize) -> Position {
        let x = (index as i32) % self.width;
        let y = (index as i32) / self.width;
        Position::new(x, y)
    }

    /// Iterator over all positions, row-major
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.cells.len()).map(move |i| self.index_to_pos(i))
    }
}
