mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use acwave::analysis::{estimate_samples_per_cycle, WaveformSet};
use acwave::config::{self, Options};
use acwave::dataset;
use acwave::report::Report;
use cli::Cli;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    // Explicit --config path, or auto-detect acwave.toml / global config
    let config_path = cli.config.clone().or_else(|| {
        let local = PathBuf::from("acwave.toml");
        if local.exists() {
            return Some(local);
        }
        if let Some(home) = dirs::home_dir() {
            let xdg = home.join(".config").join("acwave").join("config.toml");
            if xdg.exists() {
                return Some(xdg);
            }
        }
        if let Some(config_dir) = dirs::config_dir() {
            let platform = config_dir.join("acwave").join("config.toml");
            if platform.exists() {
                return Some(platform);
            }
        }
        None
    });
    let mut options = match config_path {
        Some(ref path) => match config::load_config(path) {
            Ok(cfg) => {
                log::info!("Loaded config from {}", path.display());
                cfg
            }
            Err(err) => {
                log::warn!("{:#}; using defaults", err);
                Options::default()
            }
        },
        None => Options::default(),
    };
    if cli.no_rms {
        options.waveform.show_rms = false;
    }

    if !cli.input.exists() {
        anyhow::bail!("Input file not found: {}", cli.input.display());
    }
    let mut data = dataset::load_dataset(&cli.input)?;

    if cli.samples_per_cycle.is_some() {
        data.samples_per_cycle = cli.samples_per_cycle;
    }
    if data.samples_per_cycle.is_none() && cli.estimate {
        let first = data
            .data
            .first()
            .context("Cannot estimate samples per cycle from an empty dataset")?;
        let estimate = estimate_samples_per_cycle(&first.samples)
            .with_context(|| format!("Failed to estimate samples per cycle from '{}'", first.label))?;
        log::info!("Estimated {} samples per cycle from '{}'", estimate, first.label);
        data.samples_per_cycle = Some(estimate);
    }

    let mut set = WaveformSet::create(data, &options).context("Failed to build waveform set")?;
    set.analyze(cli.first_sample)
        .context("Failed to analyze waveforms")?;

    let report = Report::build(&set, cli.first_sample, &options.harmonics.pipeline());
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report);
    }

    Ok(())
}
