use serde::{Deserialize, Serialize};

/// Running totals for the currently open simulated minute.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MinuteAccumulator {
    pub arrivals: u64,
    pub answered: u64,
    pub answered_in_threshold: u64,
    pub completed: u64,
    pub waits: Vec<f64>,
    pub handle_times: Vec<f64>,
    pub busy_agent_seconds: f64,
    pub active_agent_seconds: f64,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FlushContext {
    pub minute: u64,
    pub queue_length: usize,
    pub talking: usize,
    pub in_acw: usize,
    pub staff_active: usize,
    pub mean_talk_seconds: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MinuteRecord {
    pub t: u64,
    pub arrivals: u64,
    pub queue_length: usize,
    pub talking: usize,
    pub in_acw: usize,
    pub answered: u64,
    pub answered_in_threshold: u64,
    pub completed: u64,
    pub staff_active: usize,
    pub occupancy: f64,
    pub asa_minutes: f64,
    pub aht_minutes: f64,
    pub avg_wait_minutes: f64,
}

impl MinuteAccumulator {
    pub fn record_arrival(&mut self) {
        self.arrivals += 1;
    }

    pub fn record_answer(&mut self, wait: f64, threshold: f64) {
        self.answered += 1;
        if wait <= threshold {
            self.answered_in_threshold += 1;
        }
        self.waits.push(wait);
    }

    pub fn record_talk_finished(&mut self, talk_seconds: f64) {
        self.handle_times.push(talk_seconds);
    }

    pub fn record_completion(&mut self) {
        self.completed += 1;
    }

    /// Closes the minute and resets every running total.
    pub fn flush(&mut self, ctx: FlushContext) -> MinuteRecord {
        let closed = std::mem::take(self);

        let occupancy = if closed.active_agent_seconds > 0.0 {
            closed.busy_agent_seconds / closed.active_agent_seconds
        } else {
            0.0
        };
        let total_wait: f64 = closed.waits.iter().sum();
        let asa_minutes = if closed.answered == 0 {
            0.0
        } else {
            total_wait / closed.answered.max(1) as f64 / 60.0
        };
        let aht_minutes = if closed.handle_times.is_empty() {
            ctx.mean_talk_seconds / 60.0
        } else {
            closed.handle_times.iter().sum::<f64>() / closed.handle_times.len() as f64 / 60.0
        };
        let avg_wait_minutes = if closed.waits.is_empty() {
            0.0
        } else {
            total_wait / closed.waits.len() as f64 / 60.0
        };

        MinuteRecord {
            t: ctx.minute,
            arrivals: closed.arrivals,
            queue_length: ctx.queue_length,
            talking: ctx.talking,
            in_acw: ctx.in_acw,
            answered: closed.answered,
            answered_in_threshold: closed.answered_in_threshold,
            completed: closed.completed,
            staff_active: ctx.staff_active,
            occupancy,
            asa_minutes,
            aht_minutes,
            avg_wait_minutes,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunTotals {
    pub minutes: u64,
    pub arrivals: u64,
    pub answered: u64,
    pub answered_in_threshold: u64,
    pub completed: u64,
    pub peak_occupancy: f64,
    pub occupancy_breaches: u64,
}

impl RunTotals {
    pub fn absorb(&mut self, record: &MinuteRecord, max_occupancy_percent: f64) {
        self.minutes += 1;
        self.arrivals += record.arrivals;
        self.answered += record.answered;
        self.answered_in_threshold += record.answered_in_threshold;
        self.completed += record.completed;
        self.peak_occupancy = self.peak_occupancy.max(record.occupancy);
        if record.occupancy * 100.0 > max_occupancy_percent {
            self.occupancy_breaches += 1;
        }
    }

    pub fn summarize(&self, sla_target_percent: f64) -> RunSummary {
        let service_level_percent = if self.answered == 0 {
            None
        } else {
            Some(self.answered_in_threshold as f64 / self.answered as f64 * 100.0)
        };
        RunSummary {
            minutes: self.minutes,
            arrivals: self.arrivals,
            answered: self.answered,
            answered_in_threshold: self.answered_in_threshold,
            completed: self.completed,
            service_level_percent,
            meets_sla: service_level_percent.map(|level| level >= sla_target_percent),
            peak_occupancy: self.peak_occupancy,
            occupancy_breaches: self.occupancy_breaches,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub minutes: u64,
    pub arrivals: u64,
    pub answered: u64,
    pub answered_in_threshold: u64,
    pub completed: u64,
    pub service_level_percent: Option<f64>,
    pub meets_sla: Option<bool>,
    pub peak_occupancy: f64,
    pub occupancy_breaches: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> FlushContext {
        FlushContext {
            minute: 1,
            queue_length: 3,
            talking: 2,
            in_acw: 1,
            staff_active: 4,
            mean_talk_seconds: 540.0,
        }
    }

    #[test]
    fn empty_minute_uses_fallbacks() {
        let mut acc = MinuteAccumulator::default();
        let record = acc.flush(ctx());
        assert_eq!(record.occupancy, 0.0);
        assert_eq!(record.asa_minutes, 0.0);
        assert_eq!(record.avg_wait_minutes, 0.0);
        assert_eq!(record.aht_minutes, 9.0);
        assert_eq!(record.queue_length, 3);
        assert_eq!(record.staff_active, 4);
    }

    #[test]
    fn flush_derives_rates_and_resets() {
        let mut acc = MinuteAccumulator::default();
        acc.record_arrival();
        acc.record_arrival();
        acc.record_answer(30.0, 20.0);
        acc.record_answer(90.0, 20.0);
        acc.record_talk_finished(120.0);
        acc.record_talk_finished(240.0);
        acc.record_completion();
        acc.busy_agent_seconds = 120.0;
        acc.active_agent_seconds = 240.0;

        let record = acc.flush(ctx());
        assert_eq!(record.arrivals, 2);
        assert_eq!(record.answered, 2);
        assert_eq!(record.answered_in_threshold, 0);
        assert_eq!(record.completed, 1);
        assert_eq!(record.occupancy, 0.5);
        assert_eq!(record.asa_minutes, 1.0);
        assert_eq!(record.avg_wait_minutes, 1.0);
        assert_eq!(record.aht_minutes, 3.0);
        assert_eq!(acc, MinuteAccumulator::default());
    }

    #[test]
    fn threshold_is_inclusive() {
        let mut acc = MinuteAccumulator::default();
        acc.record_answer(20.0, 20.0);
        assert_eq!(acc.answered_in_threshold, 1);
    }

    #[test]
    fn totals_track_service_level_and_breaches() {
        let mut totals = RunTotals::default();
        let mut acc = MinuteAccumulator::default();
        acc.record_answer(5.0, 20.0);
        acc.record_answer(50.0, 20.0);
        acc.busy_agent_seconds = 90.0;
        acc.active_agent_seconds = 100.0;
        totals.absorb(&acc.flush(ctx()), 85.0);

        let summary = totals.summarize(80.0);
        assert_eq!(summary.minutes, 1);
        assert_eq!(summary.answered, 2);
        assert_eq!(summary.service_level_percent, Some(50.0));
        assert_eq!(summary.meets_sla, Some(false));
        assert_eq!(summary.occupancy_breaches, 1);
        assert_eq!(summary.peak_occupancy, 0.9);
    }

    #[test]
    fn service_level_is_absent_without_answers() {
        let summary = RunTotals::default().summarize(80.0);
        assert_eq!(summary.service_level_percent, None);
        assert_eq!(summary.meets_sla, None);
    }
}
