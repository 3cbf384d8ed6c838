use crate::agent::Agent;

/// Picks which idle agent takes the oldest queued call.
pub trait AssignmentPolicy {
    fn select(&mut self, agents: &[Agent]) -> Option<usize>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LowestIdFirst;

impl AssignmentPolicy for LowestIdFirst {
    fn select(&mut self, agents: &[Agent]) -> Option<usize> {
        // Agents are stored in id order.
        agents.iter().position(Agent::is_idle)
    }
}
