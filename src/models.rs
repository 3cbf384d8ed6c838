use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

pub const DEFAULT_ARRIVAL_RATE_PER_HOUR: f64 = 360.0;
pub const DEFAULT_MEAN_TALK_SECONDS: f64 = 540.0;
pub const DEFAULT_MEAN_ACW_SECONDS: f64 = 60.0;
pub const DEFAULT_SLA_TARGET_PERCENT: f64 = 80.0;
pub const DEFAULT_SLA_THRESHOLD_SECONDS: f64 = 20.0;
pub const DEFAULT_MAX_OCCUPANCY_PERCENT: f64 = 85.0;
pub const DEFAULT_SHRINKAGE_PERCENT: f64 = 20.0;
pub const DEFAULT_AGENT_COUNT: usize = 12;
/// Largest accepted pool size; larger counts fall back to the default.
pub const MAX_AGENT_COUNT: usize = 10_000;

/// Tunable parameters for one simulation run. Always complete and in domain once it has
/// passed through [`Configuration::sanitized`].
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Configuration {
    pub arrival_rate_per_hour: f64,
    pub mean_talk_seconds: f64,
    pub mean_acw_seconds: f64,
    pub sla_target_percent: f64,
    pub sla_threshold_seconds: f64,
    pub max_occupancy_percent: f64,
    pub shrinkage_percent: f64,
    pub agent_count: usize,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            arrival_rate_per_hour: DEFAULT_ARRIVAL_RATE_PER_HOUR,
            mean_talk_seconds: DEFAULT_MEAN_TALK_SECONDS,
            mean_acw_seconds: DEFAULT_MEAN_ACW_SECONDS,
            sla_target_percent: DEFAULT_SLA_TARGET_PERCENT,
            sla_threshold_seconds: DEFAULT_SLA_THRESHOLD_SECONDS,
            max_occupancy_percent: DEFAULT_MAX_OCCUPANCY_PERCENT,
            shrinkage_percent: DEFAULT_SHRINKAGE_PERCENT,
            agent_count: DEFAULT_AGENT_COUNT,
        }
    }
}

impl Configuration {
    /// Agents eligible to work: `N * (1 - shrinkage / 100)`, ties rounded to even.
    pub fn staff_active(&self) -> usize {
        let active = self.agent_count as f64 * (1.0 - self.shrinkage_percent / 100.0);
        (active.round_ties_even().max(0.0) as usize).min(self.agent_count)
    }

    pub fn mean_interarrival_seconds(&self) -> f64 {
        3600.0 / self.arrival_rate_per_hour
    }

    /// Replaces every out-of-domain field with its default.
    pub fn sanitized(self) -> Self {
        Self {
            arrival_rate_per_hour: in_domain(
                "arrivalRatePerHour",
                self.arrival_rate_per_hour,
                |v| v > 0.0,
                DEFAULT_ARRIVAL_RATE_PER_HOUR,
            ),
            mean_talk_seconds: in_domain(
                "meanTalkSeconds",
                self.mean_talk_seconds,
                |v| v > 0.0,
                DEFAULT_MEAN_TALK_SECONDS,
            ),
            mean_acw_seconds: in_domain(
                "meanAcwSeconds",
                self.mean_acw_seconds,
                |v| v >= 0.0,
                DEFAULT_MEAN_ACW_SECONDS,
            ),
            sla_target_percent: in_domain(
                "slaTargetPercent",
                self.sla_target_percent,
                |v| (0.0..=100.0).contains(&v),
                DEFAULT_SLA_TARGET_PERCENT,
            ),
            sla_threshold_seconds: in_domain(
                "slaThresholdSeconds",
                self.sla_threshold_seconds,
                |v| v >= 0.0,
                DEFAULT_SLA_THRESHOLD_SECONDS,
            ),
            max_occupancy_percent: in_domain(
                "maxOccupancyPercent",
                self.max_occupancy_percent,
                |v| (0.0..=100.0).contains(&v),
                DEFAULT_MAX_OCCUPANCY_PERCENT,
            ),
            shrinkage_percent: in_domain(
                "shrinkagePercent",
                self.shrinkage_percent,
                |v| (0.0..100.0).contains(&v),
                DEFAULT_SHRINKAGE_PERCENT,
            ),
            agent_count: if self.agent_count <= MAX_AGENT_COUNT {
                self.agent_count
            } else {
                warn!(
                    field = "agentCount",
                    value = self.agent_count,
                    default = DEFAULT_AGENT_COUNT,
                    "configuration value out of range, using default"
                );
                DEFAULT_AGENT_COUNT
            },
        }
    }
}

fn in_domain(field: &str, value: f64, valid: impl Fn(f64) -> bool, default: f64) -> f64 {
    if value.is_finite() && valid(value) {
        value
    } else {
        warn!(field, value, default, "configuration value out of range, using default");
        default
    }
}

/// Loosely typed options as they arrive from a command, a config file or the CLI.
/// Each value may be a number or a numeric string.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ConfigureOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lambda: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aht: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acw: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sla: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thr: Option<Value>,
    #[serde(rename = "occMax", default, skip_serializing_if = "Option::is_none")]
    pub occ_max: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shrink: Option<Value>,
    #[serde(rename = "N", default, skip_serializing_if = "Option::is_none")]
    pub agents: Option<Value>,
}

impl ConfigureOptions {
    /// Keys present in `other` win.
    pub fn merged(self, other: ConfigureOptions) -> Self {
        Self {
            lambda: other.lambda.or(self.lambda),
            aht: other.aht.or(self.aht),
            acw: other.acw.or(self.acw),
            sla: other.sla.or(self.sla),
            thr: other.thr.or(self.thr),
            occ_max: other.occ_max.or(self.occ_max),
            shrink: other.shrink.or(self.shrink),
            agents: other.agents.or(self.agents),
        }
    }

    /// Builds a configuration from `current`: absent keys keep the current value,
    /// unreadable or out-of-domain ones fall back to the default.
    pub fn resolve(&self, current: &Configuration) -> Configuration {
        let defaults = Configuration::default();
        let agent_count = match &self.agents {
            None => current.agent_count,
            Some(value) => match coerce_number(value) {
                Some(count) if (0.0..=MAX_AGENT_COUNT as f64).contains(&count) => {
                    count.trunc() as usize
                }
                _ => {
                    warn!(
                        field = "N",
                        ?value,
                        "agent count unreadable or out of range, using default"
                    );
                    defaults.agent_count
                }
            },
        };

        Configuration {
            arrival_rate_per_hour: pick(
                "lambda",
                &self.lambda,
                current.arrival_rate_per_hour,
                defaults.arrival_rate_per_hour,
            ),
            mean_talk_seconds: pick(
                "aht",
                &self.aht,
                current.mean_talk_seconds,
                defaults.mean_talk_seconds,
            ),
            mean_acw_seconds: pick(
                "acw",
                &self.acw,
                current.mean_acw_seconds,
                defaults.mean_acw_seconds,
            ),
            sla_target_percent: pick(
                "sla",
                &self.sla,
                current.sla_target_percent,
                defaults.sla_target_percent,
            ),
            sla_threshold_seconds: pick(
                "thr",
                &self.thr,
                current.sla_threshold_seconds,
                defaults.sla_threshold_seconds,
            ),
            max_occupancy_percent: pick(
                "occMax",
                &self.occ_max,
                current.max_occupancy_percent,
                defaults.max_occupancy_percent,
            ),
            shrinkage_percent: pick(
                "shrink",
                &self.shrink,
                current.shrinkage_percent,
                defaults.shrinkage_percent,
            ),
            agent_count,
        }
        .sanitized()
    }
}

fn pick(field: &str, value: &Option<Value>, current: f64, default: f64) -> f64 {
    match value {
        None => current,
        Some(value) => coerce_number(value).unwrap_or_else(|| {
            warn!(field, ?value, "unreadable numeric option, using default");
            default
        }),
    }
}

/// Reads a JSON number or a numeric string.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options(value: Value) -> ConfigureOptions {
        serde_json::from_value(value).expect("options should parse")
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = Configuration::default();
        assert_eq!(config.arrival_rate_per_hour, 360.0);
        assert_eq!(config.mean_talk_seconds, 540.0);
        assert_eq!(config.mean_acw_seconds, 60.0);
        assert_eq!(config.sla_target_percent, 80.0);
        assert_eq!(config.sla_threshold_seconds, 20.0);
        assert_eq!(config.max_occupancy_percent, 85.0);
        assert_eq!(config.shrinkage_percent, 20.0);
        assert_eq!(config.agent_count, 12);
    }

    #[test]
    fn staff_active_rounds_after_shrinkage() {
        let config = Configuration::default();
        assert_eq!(config.staff_active(), 10);

        let config = Configuration {
            agent_count: 5,
            shrinkage_percent: 10.0,
            ..Configuration::default()
        };
        assert_eq!(config.staff_active(), 4);

        let config = Configuration {
            agent_count: 10,
            shrinkage_percent: 25.0,
            ..Configuration::default()
        };
        assert_eq!(config.staff_active(), 8);

        let config = Configuration {
            agent_count: 0,
            ..Configuration::default()
        };
        assert_eq!(config.staff_active(), 0);
    }

    #[test]
    fn resolve_accepts_numbers_and_numeric_strings() {
        let resolved = options(json!({
            "lambda": "120",
            "aht": 300,
            "N": "4",
            "occMax": 90.5
        }))
        .resolve(&Configuration::default());
        assert_eq!(resolved.arrival_rate_per_hour, 120.0);
        assert_eq!(resolved.mean_talk_seconds, 300.0);
        assert_eq!(resolved.agent_count, 4);
        assert_eq!(resolved.max_occupancy_percent, 90.5);
    }

    #[test]
    fn resolve_keeps_current_values_for_absent_keys() {
        let current = Configuration {
            arrival_rate_per_hour: 42.0,
            agent_count: 3,
            ..Configuration::default()
        };
        let resolved = ConfigureOptions::default().resolve(&current);
        assert_eq!(resolved, current);
    }

    #[test]
    fn resolve_falls_back_to_defaults_for_garbage() {
        let current = Configuration {
            arrival_rate_per_hour: 42.0,
            shrinkage_percent: 0.0,
            agent_count: 3,
            ..Configuration::default()
        };
        let resolved = options(json!({
            "lambda": "lots",
            "shrink": 150,
            "N": -2,
            "aht": 0,
            "thr": null
        }))
        .resolve(&current);
        assert_eq!(resolved.arrival_rate_per_hour, 360.0);
        assert_eq!(resolved.shrinkage_percent, 20.0);
        assert_eq!(resolved.agent_count, 12);
        assert_eq!(resolved.mean_talk_seconds, 540.0);
        assert_eq!(resolved.sla_threshold_seconds, 20.0);
    }

    #[test]
    fn oversized_agent_counts_fall_back_to_default() {
        let current = Configuration {
            agent_count: 3,
            ..Configuration::default()
        };
        let resolved = options(json!({ "N": 1e20 })).resolve(&current);
        assert_eq!(resolved.agent_count, DEFAULT_AGENT_COUNT);

        let resolved = options(json!({ "N": MAX_AGENT_COUNT })).resolve(&current);
        assert_eq!(resolved.agent_count, MAX_AGENT_COUNT);

        let sanitized = Configuration {
            agent_count: usize::MAX,
            ..Configuration::default()
        }
        .sanitized();
        assert_eq!(sanitized.agent_count, DEFAULT_AGENT_COUNT);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let resolved =
            options(json!({ "colour": "blue", "N": 2 })).resolve(&Configuration::default());
        assert_eq!(resolved.agent_count, 2);
    }

    #[test]
    fn merged_prefers_the_overlay() {
        let base = options(json!({ "lambda": 10, "aht": 20 }));
        let overlay = options(json!({ "aht": 30 }));
        let merged = base.merged(overlay);
        assert_eq!(merged.lambda, Some(json!(10)));
        assert_eq!(merged.aht, Some(json!(30)));
    }

    #[test]
    fn configuration_round_trips_through_camel_case() {
        let parsed: Configuration =
            serde_json::from_value(json!({ "arrivalRatePerHour": 60.0, "agentCount": 2 }))
                .expect("configuration should parse");
        assert_eq!(parsed.arrival_rate_per_hour, 60.0);
        assert_eq!(parsed.agent_count, 2);
        assert_eq!(parsed.mean_talk_seconds, 540.0);
    }
}
