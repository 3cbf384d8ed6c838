//! Command/query surface over a single owned [`SimulationEngine`].
//!
//! Commands arrive as JSON objects tagged by `op`:
//!
//! ```text
//! {"op":"start","lambda":360,"N":12}   configure + reset, returns the snapshot
//! {"op":"stop"}                        stop, returns the snapshot
//! {"op":"reset","aht":"300"}           configure + reset, returns the snapshot
//! {"op":"step","dt":1.0,"speed":2.0}   one advance, returns the metrics report
//! {"op":"results"}                     metrics report
//! {"op":"health"}                      liveness
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::duration::DurationSource;
use crate::engine::SimulationEngine;
use crate::error::{Error, Result};
use crate::models::{coerce_number, ConfigureOptions};
use crate::state::{MetricsReport, Snapshot};

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Command {
    Start {
        #[serde(flatten)]
        options: ConfigureOptions,
    },
    Stop,
    Reset {
        #[serde(flatten)]
        options: ConfigureOptions,
    },
    Step {
        #[serde(default)]
        dt: Option<Value>,
        #[serde(default)]
        speed: Option<Value>,
    },
    Results,
    Health,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Status { status: String, state: Snapshot },
    Metrics(MetricsReport),
    Health { status: String },
    Error { error: String },
}

pub fn parse_command(line: &str) -> Result<Command> {
    serde_json::from_str(line).map_err(|err| Error::InvalidCommand(err.to_string()))
}

/// Owns the engine and maps each command onto engine operations.
pub struct Controller<D: DurationSource> {
    engine: SimulationEngine<D>,
}

impl<D: DurationSource> Controller<D> {
    pub fn new(engine: SimulationEngine<D>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &SimulationEngine<D> {
        &self.engine
    }

    pub fn handle(&mut self, command: Command) -> Response {
        match command {
            Command::Start { options } => {
                self.reconfigure(&options);
                status("started", self.engine.snapshot())
            }
            Command::Stop => {
                self.engine.stop();
                status("stopped", self.engine.snapshot())
            }
            Command::Reset { options } => {
                self.reconfigure(&options);
                status("reset", self.engine.snapshot())
            }
            Command::Step { dt, speed } => {
                let dt = step_value(dt.as_ref());
                let speed = step_value(speed.as_ref());
                self.engine.advance(dt, speed);
                Response::Metrics(self.engine.metrics())
            }
            Command::Results => Response::Metrics(self.engine.metrics()),
            Command::Health => Response::Health {
                status: "ok".to_string(),
            },
        }
    }

    /// Parses and handles one line; malformed input becomes an error response.
    pub fn handle_line(&mut self, line: &str) -> Response {
        match parse_command(line) {
            Ok(command) => self.handle(command),
            Err(err) => Response::Error {
                error: err.to_string(),
            },
        }
    }

    fn reconfigure(&mut self, options: &ConfigureOptions) {
        let config = options.resolve(self.engine.config());
        self.engine.configure(config);
        self.engine.reset();
    }
}

fn status(label: &str, state: Snapshot) -> Response {
    Response::Status {
        status: label.to_string(),
        state,
    }
}

/// `dt` and `speed` default to 1.0 when absent or unreadable.
fn step_value(value: Option<&Value>) -> f64 {
    value.and_then(coerce_number).unwrap_or(1.0)
}
