use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::models::{Configuration, ConfigureOptions};

#[derive(Parser, Debug)]
#[command(name = "cc-sim", about = "Call-center work queue simulator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Run a fixed number of steps and print the metrics.
    Run(RunArgs),
    /// Print the configuration a run would use.
    ShowConfig(ConfigArgs),
    /// Answer line-delimited JSON commands on stdin.
    Serve(ServeArgs),
}

#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    #[arg(long, help = "TOML or JSON file with lambda/aht/acw/sla/thr/occMax/shrink/N keys")]
    pub config: Option<PathBuf>,
    #[arg(long, help = "Arrivals per hour")]
    pub lambda: Option<f64>,
    #[arg(long, help = "Mean talk time in seconds")]
    pub aht: Option<f64>,
    #[arg(long, help = "Mean after-call work in seconds")]
    pub acw: Option<f64>,
    #[arg(long, help = "Service level target in percent")]
    pub sla: Option<f64>,
    #[arg(long, help = "Service level threshold in seconds")]
    pub thr: Option<f64>,
    #[arg(long, help = "Maximum occupancy in percent")]
    pub occ_max: Option<f64>,
    #[arg(long, help = "Shrinkage in percent")]
    pub shrink: Option<f64>,
    #[arg(long, help = "Number of agents")]
    pub agents: Option<u64>,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
    #[arg(long, default_value_t = 60)]
    pub steps: u64,
    #[arg(long, default_value_t = 1.0, help = "Real seconds per step")]
    pub dt: f64,
    #[arg(long, default_value_t = 1.0, help = "Speed multiplier")]
    pub speed: f64,
    #[arg(long, help = "Seed the duration source; omit for a fresh random run")]
    pub seed: Option<u64>,
    #[arg(long, value_enum, default_value_t = FormatArg::Human)]
    pub format: FormatArg,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum FormatArg {
    Human,
    Summary,
    Json,
}

#[derive(Clone, Debug)]
pub struct RunConfig {
    pub simulation: Configuration,
    pub steps: u64,
    pub dt: f64,
    pub speed: f64,
    pub seed: Option<u64>,
}

pub fn parse_args() -> Result<Cli> {
    Cli::try_parse().map_err(|e| Error::Cli(e.to_string()))
}

pub fn build_run_config(args: RunArgs) -> Result<(RunConfig, FormatArg)> {
    let simulation = resolve_configuration(&args.config)?;
    Ok((
        RunConfig {
            simulation,
            steps: args.steps,
            dt: args.dt,
            speed: args.speed,
            seed: args.seed,
        },
        args.format,
    ))
}

/// File values first, then flags on top, resolved against the defaults.
pub fn resolve_configuration(args: &ConfigArgs) -> Result<Configuration> {
    let from_file = match &args.config {
        Some(path) => load_options(path)?,
        None => ConfigureOptions::default(),
    };
    let options = from_file.merged(flag_options(args));
    Ok(options.resolve(&Configuration::default()))
}

pub fn load_options(path: &Path) -> Result<ConfigureOptions> {
    let contents = fs::read_to_string(path).map_err(|err| {
        Error::ConfigIo(format!(
            "failed to read config '{}': {}",
            path.display(),
            err
        ))
    })?;
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .unwrap_or("");

    match ext {
        "toml" => toml::from_str(&contents)
            .map_err(|err| Error::ConfigParse(format!("failed to parse TOML: {}", err))),
        "json" => serde_json::from_str(&contents)
            .map_err(|err| Error::ConfigParse(format!("failed to parse JSON: {}", err))),
        "" => Err(Error::UnsupportedConfigFormat("unknown".to_string())),
        _ => Err(Error::UnsupportedConfigFormat(ext.to_string())),
    }
}

fn flag_options(args: &ConfigArgs) -> ConfigureOptions {
    ConfigureOptions {
        lambda: args.lambda.map(Value::from),
        aht: args.aht.map(Value::from),
        acw: args.acw.map(Value::from),
        sla: args.sla.map(Value::from),
        thr: args.thr.map(Value::from),
        occ_max: args.occ_max.map(Value::from),
        shrink: args.shrink.map(Value::from),
        agents: args.agents.map(Value::from),
    }
}
