//! Random-walk movement shared by prey and predators.

use crate::grid::Grid;
use pasture_core::{AgentId, Connectivity, Error, Position, Result};
use rand::seq::SliceRandom;
use rand::Rng;

/// Extra moves are drawn as `trunc(u)` for `u` uniform in `[0, MAX_EXTRA_MOVES_DRAW)`.
const MAX_EXTRA_MOVES_DRAW: f64 = 2.0;

/// One step to a uniformly chosen cell of the neighborhood, the current
/// cell included.
pub fn random_move<R: Rng>(
    grid: &mut Grid,
    id: AgentId,
    from: Position,
    connectivity: Connectivity,
    rng: &mut R,
) -> Result<Position> {
    let candidates = grid.neighborhood(from, connectivity, true);
    let target = *candidates
        .choose(rng)
        .ok_or_else(|| Error::Invariant(format!("no cell to move to from {}", from)))?;
    grid.move_agent(id, target)
}

/// A tick's worth of movement: one mandatory move, then zero or one more.
pub fn wander<R: Rng>(
    grid: &mut Grid,
    id: AgentId,
    from: Position,
    connectivity: Connectivity,
    rng: &mut R,
) -> Result<Position> {
    let mut position = random_move(grid, id, from, connectivity, rng)?;

    let extra_moves = (rng.gen::<f64>() * MAX_EXTRA_MOVES_DRAW) as usize;
    for _ in 0..extra_moves {
        position = random_move(grid, id, position, connectivity, rng)?;
    }

    Ok(position)
}
