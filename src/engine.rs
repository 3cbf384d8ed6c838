use tracing::{debug, info, trace};

use crate::agent::{Agent, AgentState, AgentStatus};
use crate::assignment::{AssignmentPolicy, LowestIdFirst};
use crate::duration::{DurationSource, ExponentialDurations};
use crate::metrics::{FlushContext, MinuteAccumulator, MinuteRecord, RunTotals};
use crate::models::Configuration;
use crate::queue::QueueStore;
use crate::state::{MetricsReport, Snapshot};

pub const SIM_SECONDS_PER_REAL_SECOND: f64 = 60.0;
pub const MINUTE_SECONDS: f64 = 60.0;
/// Upper bound on simulated time covered by one `advance` (one simulated day).
pub const MAX_STEP_SECONDS: f64 = 86_400.0;
const MIN_DRAW_SECONDS: f64 = 1.0;

pub struct SimulationEngine<D: DurationSource = ExponentialDurations> {
    config: Configuration,
    durations: D,
    policy: Box<dyn AssignmentPolicy>,
    agents: Vec<Agent>,
    staff_active: usize,
    unstaffed: bool,
    queue: QueueStore,
    accumulator: MinuteAccumulator,
    totals: RunTotals,
    log: Vec<MinuteRecord>,
    sim_time: f64,
    next_arrival: f64,
    next_log_boundary: f64,
    done: u64,
    ticks: u64,
    running: bool,
}

impl SimulationEngine<ExponentialDurations> {
    pub fn new() -> Self {
        Self::with_source(Configuration::default(), ExponentialDurations::from_entropy())
    }

    pub fn seeded(config: Configuration, seed: u64) -> Self {
        Self::with_source(config, ExponentialDurations::from_seed(seed))
    }
}

impl Default for SimulationEngine<ExponentialDurations> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: DurationSource> SimulationEngine<D> {
    pub fn with_source(config: Configuration, durations: D) -> Self {
        let mut engine = Self {
            config: config.sanitized(),
            durations,
            policy: Box::new(LowestIdFirst),
            agents: Vec::new(),
            staff_active: 0,
            unstaffed: false,
            queue: QueueStore::new(),
            accumulator: MinuteAccumulator::default(),
            totals: RunTotals::default(),
            log: Vec::new(),
            sim_time: 0.0,
            next_arrival: 0.0,
            next_log_boundary: MINUTE_SECONDS,
            done: 0,
            ticks: 0,
            running: true,
        };
        engine.reset();
        engine
    }

    pub fn with_policy(mut self, policy: Box<dyn AssignmentPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn log(&self) -> &[MinuteRecord] {
        &self.log
    }

    /// Stores a new configuration. The agent pool and staffing keep the values
    /// from the last `reset` until the next one.
    pub fn configure(&mut self, config: Configuration) {
        self.config = config.sanitized();
        info!(
            lambda = self.config.arrival_rate_per_hour,
            aht = self.config.mean_talk_seconds,
            acw = self.config.mean_acw_seconds,
            agents = self.config.agent_count,
            shrinkage = self.config.shrinkage_percent,
            "simulation configured"
        );
    }

    pub fn reset(&mut self) {
        let staff_active = self.config.staff_active();
        self.staff_active = staff_active;
        self.unstaffed = self.config.agent_count == 0;
        self.agents = (1..=self.config.agent_count)
            .map(|id| {
                if id <= staff_active {
                    Agent::idle(id)
                } else {
                    Agent::on_break(id)
                }
            })
            .collect();
        self.queue.clear();
        self.accumulator = MinuteAccumulator::default();
        self.totals = RunTotals::default();
        self.log.clear();
        self.sim_time = 0.0;
        self.next_arrival = 0.0;
        self.next_log_boundary = MINUTE_SECONDS;
        self.done = 0;
        self.ticks = 0;
        self.running = true;
        info!(agents = self.agents.len(), staff_active, "simulation reset");
    }

    pub fn stop(&mut self) {
        if self.running {
            info!(sim_time = self.sim_time, "simulation stopped");
        }
        self.running = false;
    }

    /// Appends an agent with the next free id. Only the zero-staff path puts it to work.
    pub fn add_agent(&mut self) -> usize {
        let id = self.agents.len() + 1;
        self.agents.push(Agent::idle(id));
        id
    }

    pub fn enqueue(&mut self) {
        self.queue.push(self.sim_time);
    }

    /// Advances by `real_dt` wall seconds at `speed`. Negative or non-finite inputs count as
    /// zero, and one call never covers more than `MAX_STEP_SECONDS`.
    pub fn advance(&mut self, real_dt: f64, speed: f64) {
        if !self.running {
            debug!("advance ignored, simulation is stopped");
            return;
        }
        if self.unstaffed {
            self.advance_unstaffed();
            return;
        }

        let sim_dt = (non_negative(real_dt) * SIM_SECONDS_PER_REAL_SECOND * non_negative(speed))
            .min(MAX_STEP_SECONDS);
        let t_end = self.sim_time + sim_dt;
        let staff_active = self.staff_active();

        self.spawn_arrivals(t_end);
        self.accumulator.active_agent_seconds += sim_dt * staff_active as f64;
        self.transition_agents(t_end, staff_active);
        self.assign_queued(staff_active);

        if t_end >= self.next_log_boundary {
            self.flush_minute(staff_active);
            self.next_log_boundary += MINUTE_SECONDS;
        }

        self.sim_time = t_end;
        self.ticks += 1;
        trace!(
            sim_time = self.sim_time,
            queue = self.queue.len(),
            done = self.done,
            "advanced"
        );
    }

    pub fn snapshot(&self) -> Snapshot {
        let staff_active = self.staff_active();
        let eligible = &self.agents[..staff_active];
        Snapshot {
            sim_time: self.sim_time,
            queue_length: self.queue.len(),
            talking: count_status(eligible, AgentStatus::Busy),
            in_acw: count_status(eligible, AgentStatus::AfterCallWork),
            done: self.done,
            staff_active,
            ticks: self.ticks,
            running: self.running,
        }
    }

    pub fn metrics(&self) -> MetricsReport {
        MetricsReport {
            snapshot: self.snapshot(),
            log: self.log.clone(),
            summary: self.totals.summarize(self.config.sla_target_percent),
        }
    }

    fn staff_active(&self) -> usize {
        self.staff_active.min(self.agents.len())
    }

    /// Serves one queued entry with the first added agent; time does not move.
    fn advance_unstaffed(&mut self) {
        if !self.agents.is_empty() && self.queue.pop_oldest().is_some() {
            self.done += 1;
            self.agents[0].force_idle();
        }
        self.ticks += 1;
    }

    fn spawn_arrivals(&mut self, t_end: f64) {
        let mean_gap = self.config.mean_interarrival_seconds();
        while self.next_arrival <= t_end {
            self.queue.push(self.next_arrival);
            self.accumulator.record_arrival();
            let gap = self.durations.sample(mean_gap).max(MIN_DRAW_SECONDS);
            self.next_arrival += gap;
        }
    }

    fn transition_agents(&mut self, t_end: f64, staff_active: usize) {
        let mean_acw = self.config.mean_acw_seconds;
        for agent in &mut self.agents[..staff_active] {
            if let AgentState::Busy { since, until } = agent.state() {
                let overlap = (t_end.min(until) - self.sim_time).max(0.0);
                self.accumulator.busy_agent_seconds += overlap;
                if t_end >= until {
                    self.accumulator.record_talk_finished(until - since);
                    let wrap_up = self.durations.sample(mean_acw).max(MIN_DRAW_SECONDS);
                    agent.start_wrap_up(until + wrap_up);
                }
            }

            if let AgentState::AfterCallWork { until } = agent.state() {
                if t_end >= until {
                    agent.finish_wrap_up();
                    self.done += 1;
                    self.accumulator.record_completion();
                }
            }
        }
    }

    fn assign_queued(&mut self, staff_active: usize) {
        let mean_talk = self.config.mean_talk_seconds;
        let threshold = self.config.sla_threshold_seconds;
        while !self.queue.is_empty() {
            let Some(idx) = self.policy.select(&self.agents[..staff_active]) else {
                break;
            };
            let Some(arrived_at) = self.queue.pop_oldest() else {
                break;
            };
            let talk = self.durations.sample(mean_talk).max(MIN_DRAW_SECONDS);
            self.agents[idx].start_call(self.sim_time, self.sim_time + talk);
            let wait = (self.sim_time - arrived_at).max(0.0);
            self.accumulator.record_answer(wait, threshold);
        }
    }

    fn flush_minute(&mut self, staff_active: usize) {
        let eligible = &self.agents[..staff_active];
        let ctx = FlushContext {
            minute: (self.next_log_boundary / MINUTE_SECONDS).round() as u64,
            queue_length: self.queue.len(),
            talking: count_status(eligible, AgentStatus::Busy),
            in_acw: count_status(eligible, AgentStatus::AfterCallWork),
            staff_active,
            mean_talk_seconds: self.config.mean_talk_seconds,
        };
        let record = self.accumulator.flush(ctx);
        self.totals.absorb(&record, self.config.max_occupancy_percent);
        debug!(
            minute = record.t,
            arrivals = record.arrivals,
            answered = record.answered,
            occupancy = record.occupancy,
            queue = record.queue_length,
            "minute closed"
        );
        self.log.push(record);
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn count_status(agents: &[Agent], status: AgentStatus) -> usize {
    agents.iter().filter(|agent| agent.status() == status).count()
}
