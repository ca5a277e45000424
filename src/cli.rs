use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "acwave", about = "Spectral analysis of AC power waveforms")]
pub struct Cli {
    /// Waveform dataset (JSON: samplesPerCycle + data[])
    pub input: PathBuf,

    /// Options file (TOML, or JSON by extension)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// First sample of the analyzed cycle
    #[arg(short, long, default_value_t = 0)]
    pub first_sample: usize,

    /// Override the dataset's samples per cycle
    #[arg(short, long)]
    pub samples_per_cycle: Option<usize>,

    /// Estimate samples per cycle from the first waveform when the dataset has none
    #[arg(long)]
    pub estimate: bool,

    /// Skip the sliding RMS traces
    #[arg(long)]
    pub no_rms: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}
