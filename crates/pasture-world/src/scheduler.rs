//! Live agent set and per-tick activation order.

use crate::agent::Agent;
use pasture_core::{ActivationOrder, AgentId, AgentKind, Error, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;

/// Holds every live agent. Ids are kept ordered so the activation order
/// depends only on the RNG stream.
#[derive(Debug, Clone)]
pub struct Scheduler {
    agents: BTreeMap<AgentId, Agent>,
    order: ActivationOrder,
}

impl Scheduler {
    pub fn new(order: ActivationOrder) -> Self {
        Self {
            agents: BTreeMap::new(),
            order,
        }
    }

    pub fn add(&mut self, agent: Agent) -> Result<()> {
        let id = agent.id();
        if self.agents.contains_key(&id) {
            return Err(Error::Invariant(format!("agent {} is already scheduled", id)));
        }
        self.agents.insert(id, agent);
        Ok(())
    }

    pub fn remove(&mut self, id: AgentId) -> Option<Agent> {
        self.agents.remove(&id)
    }

    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(&id)
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.agents.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent> + '_ {
        self.agents.values()
    }

    pub fn count(&self, kind: AgentKind) -> usize {
        self.agents.values().filter(|agent| agent.kind() == kind).count()
    }

    /// Snapshot of this tick's activations. Agents added after the snapshot
    /// wait for the next tick; the caller skips ids removed in the meantime.
    pub fn activation_order<R: Rng>(&self, rng: &mut R) -> Vec<AgentId> {
        match self.order {
            ActivationOrder::Random => {
                let mut ids: Vec<AgentId> = self.agents.keys().copied().collect();
                ids.shuffle(rng);
                ids
            }
            ActivationOrder::RandomByKind => {
                let mut ids = Vec::with_capacity(self.agents.len());
                for kind in [AgentKind::Prey, AgentKind::Predator, AgentKind::Patch] {
                    let mut group: Vec<AgentId> = self
                        .agents
                        .values()
                        .filter(|agent| agent.kind() == kind)
                        .map(|agent| agent.id())
                        .collect();
                    group.shuffle(rng);
                    ids.extend(group);
                }
                ids
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{Predator, Prey, VegetationPatch};
    use pasture_core::{Connectivity, Position};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn prey(id: u64) -> Agent {
        Agent::Prey(Prey::new(AgentId(id), Position::new(0, 0), Connectivity::Moore, None))
    }

    fn predator(id: u64) -> Agent {
        Agent::Predator(Predator::new(AgentId(id), Position::new(0, 0), Connectivity::Moore, 1.0))
    }

    fn patch(id: u64) -> Agent {
        Agent::Patch(VegetationPatch::new(AgentId(id), Position::new(0, 0), true, 0))
    }

    #[test]
    fn test_add_remove() {
        let mut scheduler = Scheduler::new(ActivationOrder::Random);
        scheduler.add(prey(1)).unwrap();
        assert!(scheduler.add(prey(1)).is_err());
        assert_eq!(scheduler.len(), 1);

        assert!(scheduler.remove(AgentId(1)).is_some());
        assert!(scheduler.remove(AgentId(1)).is_none());
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_random_order_is_a_permutation() {
        let mut scheduler = Scheduler::new(ActivationOrder::Random);
        for id in 0..20 {
            scheduler.add(prey(id)).unwrap();
        }
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut order = scheduler.activation_order(&mut rng);
        order.sort();
        assert_eq!(order, (0..20).map(AgentId).collect::<Vec<_>>());
    }

    #[test]
    fn test_order_is_seed_deterministic() {
        let mut scheduler = Scheduler::new(ActivationOrder::Random);
        for id in 0..50 {
            scheduler.add(prey(id)).unwrap();
        }
        let a = scheduler.activation_order(&mut ChaCha8Rng::seed_from_u64(9));
        let b = scheduler.activation_order(&mut ChaCha8Rng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_by_kind_groups() {
        let mut scheduler = Scheduler::new(ActivationOrder::RandomByKind);
        scheduler.add(patch(1)).unwrap();
        scheduler.add(predator(2)).unwrap();
        scheduler.add(prey(3)).unwrap();
        scheduler.add(patch(4)).unwrap();
        scheduler.add(prey(5)).unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let order = scheduler.activation_order(&mut rng);
        let kinds: Vec<AgentKind> = order
            .iter()
            .map(|id| scheduler.get(*id).unwrap().kind())
            .collect();
        assert_eq!(
            kinds,
            vec![
                AgentKind::Prey,
                AgentKind::Prey,
                AgentKind::Predator,
                AgentKind::Patch,
                AgentKind::Patch,
            ]
        );
    }

    #[test]
    fn test_count_by_kind() {
        let mut scheduler = Scheduler::new(ActivationOrder::Random);
        scheduler.add(prey(1)).unwrap();
        scheduler.add(prey(2)).unwrap();
        scheduler.add(predator(3)).unwrap();
        assert_eq!(scheduler.count(AgentKind::Prey), 2);
        assert_eq!(scheduler.count(AgentKind::Predator), 1);
        assert_eq!(scheduler.count(AgentKind::Patch), 0);
    }
}
