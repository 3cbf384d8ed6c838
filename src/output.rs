use std::fmt::Write;

use crate::models::Configuration;
use crate::state::MetricsReport;

pub trait Formatter {
    fn write(&self, report: &MetricsReport) -> String;
}

pub struct HumanFormatter;
pub struct SummaryFormatter;
pub struct JsonFormatter;

impl Formatter for HumanFormatter {
    fn write(&self, report: &MetricsReport) -> String {
        let mut out = String::new();
        write_snapshot(&mut out, report);
        let _ = writeln!(out, "Minutes:");
        for record in &report.log {
            let _ = writeln!(
                out,
                "t={} arrivals={} queue={} talking={} acw={} answered={} in_threshold={} completed={} occupancy={:.2} asa={:.2}m aht={:.2}m wait={:.2}m",
                record.t,
                record.arrivals,
                record.queue_length,
                record.talking,
                record.in_acw,
                record.answered,
                record.answered_in_threshold,
                record.completed,
                record.occupancy,
                record.asa_minutes,
                record.aht_minutes,
                record.avg_wait_minutes,
            );
        }
        write_summary(&mut out, report);
        out
    }
}

impl Formatter for SummaryFormatter {
    fn write(&self, report: &MetricsReport) -> String {
        let mut out = String::new();
        write_snapshot(&mut out, report);
        write_summary(&mut out, report);
        out
    }
}

impl Formatter for JsonFormatter {
    fn write(&self, report: &MetricsReport) -> String {
        let mut out = serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string());
        out.push('\n');
        out
    }
}

pub fn render_configuration(config: &Configuration) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Arrival rate: {}/h", config.arrival_rate_per_hour);
    let _ = writeln!(out, "Mean talk: {}s", config.mean_talk_seconds);
    let _ = writeln!(out, "Mean after-call work: {}s", config.mean_acw_seconds);
    let _ = writeln!(
        out,
        "SLA: {}% within {}s",
        config.sla_target_percent, config.sla_threshold_seconds
    );
    let _ = writeln!(out, "Max occupancy: {}%", config.max_occupancy_percent);
    let _ = writeln!(out, "Shrinkage: {}%", config.shrinkage_percent);
    let _ = writeln!(
        out,
        "Agents: {} ({} active)",
        config.agent_count,
        config.staff_active()
    );
    out
}

fn write_snapshot(out: &mut String, report: &MetricsReport) {
    let snapshot = &report.snapshot;
    let _ = writeln!(out, "State:");
    let _ = writeln!(out, "sim_time: {}s", snapshot.sim_time);
    let _ = writeln!(out, "queue: {}", snapshot.queue_length);
    let _ = writeln!(out, "talking: {}", snapshot.talking);
    let _ = writeln!(out, "acw: {}", snapshot.in_acw);
    let _ = writeln!(out, "done: {}", snapshot.done);
    let _ = writeln!(out, "staff_active: {}", snapshot.staff_active);
}

fn write_summary(out: &mut String, report: &MetricsReport) {
    let summary = &report.summary;
    let _ = writeln!(out, "Summary:");
    let _ = writeln!(out, "minutes: {}", summary.minutes);
    let _ = writeln!(out, "arrivals: {}", summary.arrivals);
    let _ = writeln!(
        out,
        "answered: {} ({} within threshold)",
        summary.answered, summary.answered_in_threshold
    );
    let _ = writeln!(out, "completed: {}", summary.completed);
    match (summary.service_level_percent, summary.meets_sla) {
        (Some(level), Some(met)) => {
            let verdict = if met { "met" } else { "missed" };
            let _ = writeln!(out, "service_level: {:.1}% ({})", level, verdict);
        }
        _ => {
            let _ = writeln!(out, "service_level: n/a");
        }
    }
    let _ = writeln!(out, "peak_occupancy: {:.2}", summary.peak_occupancy);
    let _ = writeln!(out, "occupancy_breaches: {}", summary.occupancy_breaches);
}
