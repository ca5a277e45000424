//! Waveform spectral analysis and scaling.

pub mod dft;
pub mod harmonics;
pub mod phasor;
pub mod scaler;
pub mod set;
pub mod spectral;
pub mod waveform;

pub use harmonics::{Harmonic, HarmonicKey, HarmonicLabel, HarmonicOp, HarmonicSeries, HarmonicTransform};
pub use phasor::{deg2rad, rad2deg, Phasor, Reference};
pub use scaler::Scaler;
pub use set::{
    estimate_samples_per_cycle, sliding_rms, waveform_cycle_range, RmsTrace, Styled,
    StyledHarmonics, StyledPhasor, WaveformSet, DEFAULT_SCALE,
};
pub use spectral::{SpectralAnalysis, SpectralAnalyzer};
pub use waveform::{peak_and_rms, Levels, Waveform};
