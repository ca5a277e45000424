use serde::Serialize;
use std::fmt;

use crate::analysis::{rad2deg, Harmonic, HarmonicOp, HarmonicTransform, WaveformSet};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub samples_per_cycle: usize,
    pub first_sample: usize,
    pub scales: Vec<ScaleEntry>,
    pub waveforms: Vec<WaveformReport>,
}

#[derive(Debug, Serialize)]
pub struct ScaleEntry {
    pub name: String,
    pub max: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveformReport {
    pub label: String,
    pub unit: Option<String>,
    pub phase: Option<String>,
    pub peak: f64,
    pub rms: f64,
    pub phasor_magnitude: Option<f64>,
    /// Degrees relative to the first phasor in the set.
    pub phasor_angle: Option<f64>,
    pub thd: Option<f64>,
    pub harmonics: Vec<Harmonic>,
    pub sliding_rms_min: Option<f64>,
    pub sliding_rms_max: Option<f64>,
}

impl Report {
    /// Summarizes an analyzed set. Harmonic series go through `pipeline`.
    pub fn build(set: &WaveformSet, first_sample: usize, pipeline: &[HarmonicOp]) -> Self {
        let reference = set.phasor(0).cloned();

        let waveforms = set
            .waveforms()
            .iter()
            .enumerate()
            .map(|(i, wf)| {
                let analysis = wf.analysis();
                let phasor = analysis.map(|a| a.phasor());
                let harmonics = analysis
                    .map(|a| {
                        let mut transform = HarmonicTransform::new(a.harmonics());
                        transform.transform(pipeline);
                        transform.into_harmonics()
                    })
                    .unwrap_or_default();
                let trace = set.rms_trace(i);

                WaveformReport {
                    label: wf.label().to_string(),
                    unit: wf.unit().map(str::to_string),
                    phase: wf.phase().map(str::to_string),
                    peak: wf.peak(),
                    rms: wf.rms(),
                    phasor_magnitude: phasor.map(|p| p.magnitude),
                    phasor_angle: phasor
                        .zip(reference.as_ref())
                        .map(|(p, r)| rad2deg(p.relative(r))),
                    thd: analysis.and_then(|a| a.thd().ok()),
                    harmonics,
                    sliding_rms_min: trace.and_then(|t| t.min()),
                    sliding_rms_max: trace.and_then(|t| t.peak()),
                }
            })
            .collect();

        Report {
            samples_per_cycle: set.samples_per_cycle(),
            first_sample,
            scales: set
                .iter_scales()
                .map(|(name, max)| ScaleEntry {
                    name: name.to_string(),
                    max,
                })
                .collect(),
            waveforms,
        }
    }
}

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.*}", precision, v))
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} samples/cycle, window starting at sample {}",
            self.samples_per_cycle, self.first_sample
        )?;
        writeln!(f, "Scales:")?;
        for scale in &self.scales {
            writeln!(f, "  {:<12} {:.4}", scale.name, scale.max)?;
        }
        for wf in &self.waveforms {
            writeln!(
                f,
                "{} [{} / phase {}]",
                wf.label,
                wf.unit.as_deref().unwrap_or("-"),
                wf.phase.as_deref().unwrap_or("-")
            )?;
            writeln!(f, "  peak {:.4}  rms {:.4}", wf.peak, wf.rms)?;
            writeln!(
                f,
                "  phasor {} @ {} deg  THD {}",
                fmt_opt(wf.phasor_magnitude, 4),
                fmt_opt(wf.phasor_angle, 2),
                fmt_opt(wf.thd.map(|t| t * 100.0), 2) + "%"
            )?;
            if wf.sliding_rms_max.is_some() {
                writeln!(
                    f,
                    "  sliding rms {} .. {}",
                    fmt_opt(wf.sliding_rms_min, 4),
                    fmt_opt(wf.sliding_rms_max, 4)
                )?;
            }
            if !wf.harmonics.is_empty() {
                let top: Vec<String> = wf
                    .harmonics
                    .iter()
                    .take(8)
                    .map(|h| format!("{}:{:.2}", h.key, h.magnitude))
                    .collect();
                writeln!(f, "  harmonics {}", top.join(" "))?;
            }
        }
        Ok(())
    }
}
