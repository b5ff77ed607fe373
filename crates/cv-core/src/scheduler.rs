//! Random Activation
//!
//! Holds every agent in creation order and produces a fresh uniform
//! permutation of them for each step.

use bevy_ecs::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

use crate::components::AgentId;
use crate::error::SimError;

#[derive(Resource, Debug, Clone, Default)]
pub struct RandomActivation {
    agents: Vec<(AgentId, Entity)>,
    index: HashMap<AgentId, usize>,
}

impl RandomActivation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, id: AgentId, entity: Entity) {
        self.index.insert(id, self.agents.len());
        self.agents.push((id, entity));
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Agents in creation order.
    pub fn agents(&self) -> &[(AgentId, Entity)] {
        &self.agents
    }

    pub fn entity_of(&self, id: AgentId) -> Option<Entity> {
        self.index.get(&id).map(|&i| self.agents[i].1)
    }

    /// A new uniformly random activation order.
    pub fn shuffled<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<(AgentId, Entity)> {
        let mut order = self.agents.clone();
        order.shuffle(rng);
        order
    }

    /// Resolve an injected order. It must name every agent exactly once.
    pub fn order_from_ids(&self, ids: &[AgentId]) -> Result<Vec<(AgentId, Entity)>, SimError> {
        let mut seen = vec![false; self.agents.len()];
        let mut order = Vec::with_capacity(ids.len());
        for &id in ids {
            let i = *self.index.get(&id).ok_or(SimError::UnknownAgent(id))?;
            if seen[i] {
                return Err(SimError::IncompleteOrder {
                    expected: self.agents.len(),
                    got: ids.len(),
                });
            }
            seen[i] = true;
            order.push(self.agents[i]);
        }
        if order.len() != self.agents.len() {
            return Err(SimError::IncompleteOrder {
                expected: self.agents.len(),
                got: ids.len(),
            });
        }
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn scheduler(n: u32) -> RandomActivation {
        let mut s = RandomActivation::new();
        for i in 1..=n {
            s.add(AgentId(i), Entity::from_raw(i + 100));
        }
        s
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let s = scheduler(20);
        let mut rng = SmallRng::seed_from_u64(7);
        let mut ids: Vec<u32> = s.shuffled(&mut rng).iter().map(|(id, _)| id.0).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=20).collect::<Vec<_>>());
    }

    #[test]
    fn test_shuffle_is_seeded() {
        let s = scheduler(20);
        let a = s.shuffled(&mut SmallRng::seed_from_u64(3));
        let b = s.shuffled(&mut SmallRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn test_order_from_ids() {
        let s = scheduler(3);
        let order = s.order_from_ids(&[AgentId(3), AgentId(1), AgentId(2)]).unwrap();
        assert_eq!(order[0], (AgentId(3), Entity::from_raw(103)));
        assert_eq!(s.entity_of(AgentId(2)), Some(Entity::from_raw(102)));
    }

    #[test]
    fn test_order_from_ids_rejects_bad_orders() {
        let s = scheduler(3);
        assert!(matches!(
            s.order_from_ids(&[AgentId(1), AgentId(9), AgentId(2)]),
            Err(SimError::UnknownAgent(AgentId(9)))
        ));
        assert!(matches!(
            s.order_from_ids(&[AgentId(1), AgentId(2)]),
            Err(SimError::IncompleteOrder { expected: 3, got: 2 })
        ));
        assert!(matches!(
            s.order_from_ids(&[AgentId(1), AgentId(1), AgentId(2)]),
            Err(SimError::IncompleteOrder { .. })
        ));
    }
}
