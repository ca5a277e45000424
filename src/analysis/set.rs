use crate::error::{AcwfError, Result};
use crate::style::{PlotStyle, StyleBook};

use super::harmonics::{HarmonicKey, HarmonicSeries, HarmonicTransform};
use super::phasor::Phasor;
use super::scaler::Scaler;
use super::spectral::{SpectralAnalysis, SpectralAnalyzer};
use super::waveform::{peak_and_rms, Waveform};

/// Scale name used for waveforms without a unit.
pub const DEFAULT_SCALE: &str = "default";

/// Sliding one-cycle RMS of a waveform, aligned sample for sample.
///
/// The last `samples_per_cycle` positions have no full window and hold `None`.
#[derive(Clone, Debug, PartialEq)]
pub struct RmsTrace {
    pub label: String,
    pub unit: Option<String>,
    pub phase: Option<String>,
    pub values: Vec<Option<f64>>,
}

impl RmsTrace {
    /// Largest defined value.
    pub fn peak(&self) -> Option<f64> {
        self.values.iter().flatten().copied().reduce(f64::max)
    }

    /// Smallest defined value.
    pub fn min(&self) -> Option<f64> {
        self.values.iter().flatten().copied().reduce(f64::min)
    }
}

/// A set member paired with its resolved display style and scale name.
#[derive(Clone, Debug)]
pub struct Styled<'a, T> {
    pub item: &'a T,
    pub style: PlotStyle,
    pub scale: &'a str,
}

#[derive(Clone, Debug)]
pub struct StyledPhasor<'a> {
    pub phasor: &'a Phasor,
    pub style: PlotStyle,
    pub unit: &'a str,
    pub phase: Option<&'a str>,
}

#[derive(Clone, Debug)]
pub struct StyledHarmonics<'a> {
    pub label: &'a str,
    pub harmonics: HarmonicSeries,
    pub style: PlotStyle,
    pub unit: &'a str,
}

/// A group of waveforms analyzed and scaled together.
///
/// Peaks are tracked per unit so that, for instance, all voltages share one
/// axis and all currents another.
pub struct WaveformSet {
    samples_per_cycle: usize,
    waveforms: Vec<Waveform>,
    rms_traces: Vec<RmsTrace>,
    unit_scales: Scaler,
    styles: StyleBook,
    analyzer: SpectralAnalyzer,
}

impl WaveformSet {
    pub fn new(samples_per_cycle: Option<usize>) -> Result<Self> {
        let samples_per_cycle = match samples_per_cycle {
            None => return Err(AcwfError::MissingSamplesPerCycle),
            Some(0) => return Err(AcwfError::InvalidSamplesPerCycle(0)),
            Some(n) => n,
        };
        Ok(Self {
            samples_per_cycle,
            waveforms: Vec::new(),
            rms_traces: Vec::new(),
            unit_scales: Scaler::new(),
            styles: StyleBook::new(),
            analyzer: SpectralAnalyzer::new(),
        })
    }

    pub fn samples_per_cycle(&self) -> usize {
        self.samples_per_cycle
    }

    pub fn add_unit_style(&mut self, unit: &str, style: PlotStyle) -> &mut Self {
        self.styles.add_unit_style(unit, style);
        self
    }

    pub fn add_phase_color(&mut self, phase: &str, color: &str) -> &mut Self {
        self.styles.add_phase_color(phase, color);
        self
    }

    /// Tags `waveform` with its unit and phase, appends it and widens the unit's scale.
    pub fn add_waveform(
        &mut self,
        mut waveform: Waveform,
        unit: Option<&str>,
        phase: Option<&str>,
    ) -> &mut Self {
        waveform.unit = unit.map(str::to_string);
        waveform.phase = phase.map(str::to_string);
        self.unit_scales
            .set_scale(unit.unwrap_or(DEFAULT_SCALE), waveform.peak());
        self.waveforms.push(waveform);
        self
    }

    /// Rebuilds the sliding RMS trace of every waveform.
    pub fn compute_rms(&mut self) -> &mut Self {
        let samples_per_cycle = self.samples_per_cycle;
        self.rms_traces = self
            .waveforms
            .iter()
            .map(|wf| RmsTrace {
                label: format!("{} RMS", wf.label()),
                unit: wf.unit.clone(),
                phase: wf.phase.clone(),
                values: sliding_rms(wf.samples(), Some(samples_per_cycle)),
            })
            .collect();
        log::debug!("computed {} sliding RMS traces", self.rms_traces.len());
        self
    }

    /// Analyzes one cycle of every waveform starting at `first_sample`.
    ///
    /// A window that would run past the end of a buffer is shifted back so it
    /// ends on the last sample. Fails if any buffer is shorter than a cycle, in
    /// which case no waveform is updated.
    pub fn analyze(&mut self, first_sample: usize) -> Result<&mut Self> {
        let samples_per_cycle = self.samples_per_cycle;
        if let Some(short) = self.waveforms.iter().find(|wf| wf.len() < samples_per_cycle) {
            return Err(AcwfError::WindowTooShort {
                label: short.label().to_string(),
                len: short.len(),
                samples_per_cycle,
            });
        }

        for wf in &mut self.waveforms {
            let (start, end) = cycle_window(wf.len(), first_sample, samples_per_cycle);
            let analysis = self.analyzer.analyze(&wf.samples()[start..end], wf.label())?;
            wf.analysis = Some(analysis);
        }
        log::info!(
            "analyzed {} waveforms from sample {} ({} samples/cycle)",
            self.waveforms.len(),
            first_sample,
            samples_per_cycle
        );
        Ok(self)
    }

    pub fn waveforms(&self) -> &[Waveform] {
        &self.waveforms
    }

    pub fn waveform(&self, index: usize) -> Option<&Waveform> {
        self.waveforms.get(index)
    }

    pub fn rms_traces(&self) -> &[RmsTrace] {
        &self.rms_traces
    }

    pub fn rms_trace(&self, index: usize) -> Option<&RmsTrace> {
        self.rms_traces.get(index)
    }

    /// Phasor of the waveform at `index`, once `analyze` has run.
    pub fn phasor(&self, index: usize) -> Option<&Phasor> {
        self.waveform(index)
            .and_then(Waveform::analysis)
            .map(SpectralAnalysis::phasor)
    }

    pub fn scales(&self) -> &Scaler {
        &self.unit_scales
    }

    pub fn iter_scales(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.unit_scales.iter()
    }

    pub fn iter_waveforms(&self) -> impl Iterator<Item = Styled<'_, Waveform>> + '_ {
        self.waveforms.iter().map(move |wf| Styled {
            item: wf,
            style: self.styles.resolve(wf.unit(), wf.phase()),
            scale: wf.unit().unwrap_or(DEFAULT_SCALE),
        })
    }

    pub fn iter_rms(&self) -> impl Iterator<Item = Styled<'_, RmsTrace>> + '_ {
        self.rms_traces.iter().map(move |trace| Styled {
            item: trace,
            style: self
                .styles
                .resolve(trace.unit.as_deref(), trace.phase.as_deref()),
            scale: trace.unit.as_deref().unwrap_or(DEFAULT_SCALE),
        })
    }

    /// Phasors of analyzed waveforms. Unanalyzed waveforms are skipped.
    pub fn iter_phasors(&self) -> impl Iterator<Item = StyledPhasor<'_>> + '_ {
        self.waveforms.iter().filter_map(move |wf| {
            wf.analysis().map(|analysis| StyledPhasor {
                phasor: analysis.phasor(),
                style: self.styles.resolve(wf.unit(), wf.phase()),
                unit: wf.unit().unwrap_or(DEFAULT_SCALE),
                phase: wf.phase(),
            })
        })
    }

    /// Harmonic series of analyzed waveforms. Unanalyzed waveforms are skipped.
    pub fn iter_harmonics(&self) -> impl Iterator<Item = StyledHarmonics<'_>> + '_ {
        self.waveforms.iter().filter_map(move |wf| {
            wf.analysis().map(|analysis| StyledHarmonics {
                label: wf.label(),
                harmonics: analysis.harmonics(),
                style: self.styles.resolve(wf.unit(), wf.phase()),
                unit: wf.unit().unwrap_or(DEFAULT_SCALE),
            })
        })
    }
}

/// `[start, end)` of a one-cycle window, clamped to end at `len`.
fn cycle_window(len: usize, first_sample: usize, samples_per_cycle: usize) -> (usize, usize) {
    let end = first_sample.saturating_add(samples_per_cycle);
    if end >= len {
        (len - samples_per_cycle, len)
    } else {
        (first_sample, end)
    }
}

/// Sliding one-cycle RMS over `samples`, same length as the input.
///
/// Without `samples_per_cycle` (or with zero) the cycle length is estimated.
pub fn sliding_rms(samples: &[f64], samples_per_cycle: Option<usize>) -> Vec<Option<f64>> {
    let samples_per_cycle = match samples_per_cycle.filter(|&n| n > 0) {
        Some(n) => n,
        None => match estimate_samples_per_cycle(samples) {
            Ok(n) => n,
            Err(_) => return Vec::new(),
        },
    };
    let last_cycle_start = samples.len().saturating_sub(samples_per_cycle);
    (0..samples.len())
        .map(|i| {
            if i >= last_cycle_start {
                return None;
            }
            peak_and_rms(&samples[i..i + samples_per_cycle])
                .ok()
                .map(|levels| levels.rms)
        })
        .collect()
}

/// Estimates the cycle length from the strongest non-DC harmonic.
///
/// Assumes the fundamental dominates. Falls back to the whole buffer when no
/// harmonic above DC has energy.
pub fn estimate_samples_per_cycle(samples: &[f64]) -> Result<usize> {
    let analysis = SpectralAnalysis::of(samples, "")?;
    let mut transform = HarmonicTransform::new(analysis.harmonics());
    transform.remove(&[HarmonicKey::Order(0)]);
    let estimate = match transform.largest().map(|h| &h.key) {
        Some(HarmonicKey::Order(order)) if *order > 0 => samples.len() / order,
        _ => samples.len(),
    };
    log::debug!("estimated {} samples per cycle from {} samples", estimate, samples.len());
    Ok(estimate)
}

/// Range of start indices that still fit a whole cycle: `(0, max(0, total - spc))`.
pub fn waveform_cycle_range(total_samples: usize, samples_per_cycle: usize) -> (usize, usize) {
    (0, total_samples.saturating_sub(samples_per_cycle))
}
