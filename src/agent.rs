use serde::{Deserialize, Serialize};

/// Label for the four service states an agent can be in.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentStatus {
    Idle,
    Busy,
    AfterCallWork,
    Break,
}

impl AgentStatus {
    /// Transition table. Break is entered and left only through a reset.
    pub fn can_transition_to(self, next: AgentStatus) -> bool {
        matches!(
            (self, next),
            (AgentStatus::Idle, AgentStatus::Busy)
                | (AgentStatus::Busy, AgentStatus::AfterCallWork)
                | (AgentStatus::AfterCallWork, AgentStatus::Idle)
        )
    }
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AgentStatus::Idle => "idle",
            AgentStatus::Busy => "busy",
            AgentStatus::AfterCallWork => "after-call-work",
            AgentStatus::Break => "break",
        };
        write!(f, "{}", label)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AgentState {
    Idle,
    Busy { since: f64, until: f64 },
    AfterCallWork { until: f64 },
    Break,
}

impl AgentState {
    pub fn status(&self) -> AgentStatus {
        match self {
            AgentState::Idle => AgentStatus::Idle,
            AgentState::Busy { .. } => AgentStatus::Busy,
            AgentState::AfterCallWork { .. } => AgentStatus::AfterCallWork,
            AgentState::Break => AgentStatus::Break,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Agent {
    /// 1-based, stable for the lifetime of the pool.
    pub id: usize,
    state: AgentState,
}

impl Agent {
    pub fn idle(id: usize) -> Self {
        Self {
            id,
            state: AgentState::Idle,
        }
    }

    pub fn on_break(id: usize) -> Self {
        Self {
            id,
            state: AgentState::Break,
        }
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    pub fn status(&self) -> AgentStatus {
        self.state.status()
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, AgentState::Idle)
    }

    pub fn busy_until(&self) -> Option<f64> {
        match self.state {
            AgentState::Busy { until, .. } => Some(until),
            _ => None,
        }
    }

    pub fn acw_until(&self) -> Option<f64> {
        match self.state {
            AgentState::AfterCallWork { until } => Some(until),
            _ => None,
        }
    }

    /// Idle -> Busy. Returns false and leaves the agent untouched otherwise.
    pub fn start_call(&mut self, since: f64, until: f64) -> bool {
        self.transition(AgentState::Busy { since, until })
    }

    pub fn start_wrap_up(&mut self, until: f64) -> bool {
        self.transition(AgentState::AfterCallWork { until })
    }

    pub fn finish_wrap_up(&mut self) -> bool {
        self.transition(AgentState::Idle)
    }

    /// Forces the agent back to Idle regardless of the transition table.
    /// Only the zero-staff compatibility path uses this.
    pub(crate) fn force_idle(&mut self) {
        self.state = AgentState::Idle;
    }

    fn transition(&mut self, next: AgentState) -> bool {
        if !self.status().can_transition_to(next.status()) {
            return false;
        }
        self.state = next;
        true
    }
}
