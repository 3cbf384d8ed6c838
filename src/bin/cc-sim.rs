use std::io::{self, BufRead, Write};

use cc_sim::api::Controller;
use cc_sim::config::{self, CliCommand, FormatArg, RunConfig, ServeArgs};
use cc_sim::duration::ExponentialDurations;
use cc_sim::engine::SimulationEngine;
use cc_sim::error::{Error, Result};
use cc_sim::logging;
use cc_sim::output::{self, Formatter, HumanFormatter, JsonFormatter, SummaryFormatter};
use cc_sim::state::MetricsReport;

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = config::parse_args()?;
    match cli.command {
        CliCommand::Run(args) => {
            let (run_config, format) = config::build_run_config(args)?;
            let report = run_batch(&run_config);
            let formatter = formatter_for(&format);
            print!("{}", formatter.write(&report));
        }
        CliCommand::ShowConfig(args) => {
            let configuration = config::resolve_configuration(&args)?;
            print!("{}", output::render_configuration(&configuration));
        }
        CliCommand::Serve(args) => serve(args)?,
    }
    Ok(())
}

fn run_batch(run_config: &RunConfig) -> MetricsReport {
    let durations = ExponentialDurations::from_optional_seed(run_config.seed);
    let mut engine = SimulationEngine::with_source(run_config.simulation.clone(), durations);
    for _ in 0..run_config.steps {
        engine.advance(run_config.dt, run_config.speed);
    }
    engine.stop();
    engine.metrics()
}

fn serve(args: ServeArgs) -> Result<()> {
    let configuration = config::resolve_configuration(&args.config)?;
    let durations = ExponentialDurations::from_optional_seed(args.seed);
    let mut controller = Controller::new(SimulationEngine::with_source(configuration, durations));

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in stdin.lock().lines() {
        let line = line.map_err(|err| Error::Io(format!("failed to read stdin: {}", err)))?;
        if line.trim().is_empty() {
            continue;
        }
        let response = controller.handle_line(&line);
        let rendered = serde_json::to_string(&response)
            .map_err(|err| Error::Io(format!("failed to encode response: {}", err)))?;
        writeln!(out, "{}", rendered)
            .and_then(|_| out.flush())
            .map_err(|err| Error::Io(format!("failed to write stdout: {}", err)))?;
    }
    Ok(())
}

fn formatter_for(format: &FormatArg) -> Box<dyn Formatter> {
    match format {
        FormatArg::Human => Box::new(HumanFormatter),
        FormatArg::Summary => Box::new(SummaryFormatter),
        FormatArg::Json => Box::new(JsonFormatter),
    }
}
