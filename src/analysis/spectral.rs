use crate::error::{AcwfError, Result};

use super::dft::Dft;
use super::harmonics::{Harmonic, HarmonicSeries};
use super::phasor::Phasor;
use super::waveform::peak_and_rms;

/// Frequency-domain view of one analysis window.
///
/// `spectrum[0]` is DC, `spectrum[1]` the fundamental. The phasor carries the
/// window RMS as its magnitude and the fundamental's angle.
#[derive(Clone, Debug, PartialEq)]
pub struct SpectralAnalysis {
    label: String,
    rms: f64,
    spectrum: Vec<f64>,
    phasor: Phasor,
}

/// Runs the DFT over analysis windows and derives RMS, spectrum and phasor.
///
/// Holds the FFT planner so repeated windows of the same length reuse a plan.
#[derive(Default)]
pub struct SpectralAnalyzer {
    dft: Dft,
}

impl SpectralAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyzes a one-cycle window. Fails on an empty window.
    pub fn analyze(&mut self, samples: &[f64], label: impl Into<String>) -> Result<SpectralAnalysis> {
        let label = label.into();
        let levels = peak_and_rms(samples).map_err(|_| AcwfError::empty(&label))?;

        let dft = self.dft.forward(samples);
        let (real, imag) = match (dft.real.get(1), dft.imag.get(1)) {
            (Some(&re), Some(&im)) => (re, im),
            _ => (0.0, 0.0),
        };
        // Real part first: angles are measured from a sine reference.
        let angle = real.atan2(imag);
        let phasor = Phasor::new(levels.rms, angle, label.clone());

        log::debug!(
            "analyzed '{}': {} samples, rms={:.4}, angle={:.4} rad",
            label,
            samples.len(),
            levels.rms,
            angle
        );

        Ok(SpectralAnalysis {
            label,
            rms: levels.rms,
            spectrum: dft.spectrum,
            phasor,
        })
    }
}

impl SpectralAnalysis {
    /// One-shot analysis with a fresh analyzer.
    pub fn of(samples: &[f64], label: impl Into<String>) -> Result<Self> {
        SpectralAnalyzer::new().analyze(samples, label)
    }

    pub fn rms(&self) -> f64 {
        self.rms
    }

    pub fn spectrum(&self) -> &[f64] {
        &self.spectrum
    }

    pub fn phasor(&self) -> &Phasor {
        &self.phasor
    }

    /// `(order, magnitude)` for every spectrum bin, in order.
    pub fn harmonics(&self) -> HarmonicSeries {
        self.spectrum
            .iter()
            .enumerate()
            .map(|(i, &v)| Harmonic::new(i, v))
            .collect()
    }

    /// Total harmonic distortion relative to the fundamental. DC is excluded.
    pub fn thd(&self) -> Result<f64> {
        let fundamental = self.spectrum.get(1).copied().unwrap_or(0.0);
        if fundamental == 0.0 {
            log::warn!("THD undefined for '{}': zero fundamental", self.label);
            return Err(AcwfError::ZeroFundamental {
                label: self.label.clone(),
            });
        }
        let sum_of_squares: f64 = self.spectrum.iter().skip(2).map(|v| v * v).sum();
        Ok(sum_of_squares.sqrt() / fundamental)
    }
}
