use std::sync::OnceLock;

use crate::error::{AcwfError, Result};

use super::spectral::SpectralAnalysis;

/// Peak and RMS of a sample buffer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Levels {
    /// Largest absolute sample value.
    pub peak: f64,
    /// Root-mean-square of the samples.
    pub rms: f64,
}

/// Single pass over `samples` computing peak and RMS.
pub fn peak_and_rms(samples: &[f64]) -> Result<Levels> {
    if samples.is_empty() {
        return Err(AcwfError::empty(""));
    }
    let mut peak = 0.0f64;
    let mut sum_of_squares = 0.0f64;
    for &s in samples {
        peak = peak.max(s.abs());
        sum_of_squares += s * s;
    }
    Ok(Levels {
        peak,
        rms: (sum_of_squares / samples.len() as f64).sqrt(),
    })
}

/// A sampled AC waveform.
///
/// Peak and RMS are computed on first access and cached for the lifetime of
/// the instance. The cache is a `OnceLock`, so concurrent first reads agree.
#[derive(Debug)]
pub struct Waveform {
    samples: Vec<f64>,
    label: String,
    pub(crate) unit: Option<String>,
    pub(crate) phase: Option<String>,
    pub(crate) analysis: Option<SpectralAnalysis>,
    levels: OnceLock<Levels>,
}

impl Waveform {
    /// Wraps `samples`. Fails when the buffer is empty.
    pub fn new(samples: Vec<f64>, label: impl Into<String>) -> Result<Self> {
        let label = label.into();
        if samples.is_empty() {
            return Err(AcwfError::empty(&label));
        }
        Ok(Self {
            samples,
            label,
            unit: None,
            phase: None,
            analysis: None,
            levels: OnceLock::new(),
        })
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Physical unit tag, set when the waveform joins a set.
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// Electrical phase tag, set when the waveform joins a set.
    pub fn phase(&self) -> Option<&str> {
        self.phase.as_deref()
    }

    /// Result of the last `WaveformSet::analyze` run, if any.
    pub fn analysis(&self) -> Option<&SpectralAnalysis> {
        self.analysis.as_ref()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f64 {
        self.levels().peak
    }

    pub fn rms(&self) -> f64 {
        self.levels().rms
    }

    fn levels(&self) -> Levels {
        *self.levels.get_or_init(|| {
            // Construction guarantees a non-empty buffer.
            peak_and_rms(&self.samples).unwrap_or(Levels { peak: 0.0, rms: 0.0 })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn peak_is_largest_magnitude() {
        let wf = Waveform::new(vec![3.0, -5.0, 4.0], "x").unwrap();
        assert_eq!(wf.peak(), 5.0);
    }

    #[test]
    fn rms_of_whole_cycles() {
        let amplitude = 170.0;
        let samples: Vec<f64> = (0..96)
            .map(|i| amplitude * (2.0 * PI * i as f64 / 32.0).sin())
            .collect();
        let wf = Waveform::new(samples, "Va").unwrap();
        assert!((wf.rms() - amplitude / 2f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn levels_are_cached() {
        let wf = Waveform::new(vec![1.0, -2.0], "x").unwrap();
        let first = wf.rms();
        assert!(wf.levels.get().is_some());
        assert_eq!(wf.rms(), first);
        assert_eq!(wf.peak(), 2.0);
    }

    #[test]
    fn empty_buffer_rejected() {
        let err = Waveform::new(Vec::new(), "Ia").unwrap_err();
        assert_eq!(err, AcwfError::EmptySamples { label: "Ia".into() });
        assert!(peak_and_rms(&[]).is_err());
    }
}
