//! Analysis of sampled AC voltage and current waveforms.
//!
//! A [`WaveformSet`](analysis::WaveformSet) groups waveforms by unit and phase,
//! tracks per-unit peak scales, computes sliding RMS traces and runs a one-cycle
//! spectral analysis per waveform, yielding a phasor and a harmonic series.
//! [`HarmonicTransform`](analysis::HarmonicTransform) reshapes harmonic series
//! for display.
//!
//! ```rust,ignore
//! use acwave::analysis::{Waveform, WaveformSet};
//!
//! let mut set = WaveformSet::new(Some(32))?;
//! set.add_waveform(Waveform::new(samples, "Va")?, Some("Voltage"), Some("1"));
//! set.analyze(0)?;
//! println!("{}", set.phasor(0).unwrap());
//! ```

pub mod analysis;
pub mod config;
pub mod dataset;
pub mod error;
pub mod report;
pub mod style;

pub use analysis::{
    HarmonicOp, HarmonicTransform, Phasor, Scaler, SpectralAnalysis, SpectralAnalyzer, Waveform,
    WaveformSet,
};
pub use error::AcwfError;
