use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::analysis::HarmonicOp;
use crate::style::PlotStyle;

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    #[serde(default = "default_unit_styles")]
    pub unit_styles: Vec<UnitStyle>,
    #[serde(default = "default_phase_styles")]
    pub phase_styles: Vec<PhaseStyle>,
    #[serde(default)]
    pub waveform: WaveformOptions,
    #[serde(default)]
    pub phasor: PhasorOptions,
    #[serde(default)]
    pub harmonics: HarmonicsOptions,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UnitStyle {
    pub name: String,
    #[serde(default)]
    pub style: PlotStyle,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PhaseStyle {
    pub name: String,
    #[serde(default)]
    pub style: PlotStyle,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveformOptions {
    #[serde(default = "default_true")]
    pub show_rms: bool,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhasorOptions {
    #[serde(default = "default_true")]
    pub show_grid: bool,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarmonicsOptions {
    #[serde(default = "default_harmonic_limit")]
    pub limit: usize,
    #[serde(default)]
    pub show_first: bool,
    /// Explicit pipeline; replaces the one derived from `limit`/`show_first`.
    #[serde(default)]
    pub transform: Option<Vec<HarmonicOp>>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            unit_styles: default_unit_styles(),
            phase_styles: default_phase_styles(),
            waveform: WaveformOptions::default(),
            phasor: PhasorOptions::default(),
            harmonics: HarmonicsOptions::default(),
        }
    }
}

impl Default for WaveformOptions {
    fn default() -> Self {
        Self { show_rms: true }
    }
}

impl Default for PhasorOptions {
    fn default() -> Self {
        Self { show_grid: true }
    }
}

impl Default for HarmonicsOptions {
    fn default() -> Self {
        Self {
            limit: default_harmonic_limit(),
            show_first: false,
            transform: None,
        }
    }
}

impl HarmonicsOptions {
    /// Percent-of-fundamental view, truncated at `limit`, without H1 unless `show_first`.
    pub fn pipeline(&self) -> Vec<HarmonicOp> {
        if let Some(ops) = &self.transform {
            return ops.clone();
        }
        let mut ops = vec![
            HarmonicOp::PercentOf { reference: 1usize.into() },
            HarmonicOp::Limit { max: self.limit },
        ];
        if !self.show_first {
            ops.push(HarmonicOp::Remove { keys: vec![1usize.into()] });
        }
        ops
    }
}

fn default_unit_styles() -> Vec<UnitStyle> {
    vec![
        UnitStyle {
            name: "Voltage".into(),
            style: PlotStyle::new().with_width(2.0).with_dashed(false),
        },
        UnitStyle {
            name: "Current".into(),
            style: PlotStyle::new().with_width(2.0).with_dashed(true),
        },
    ]
}

fn default_phase_styles() -> Vec<PhaseStyle> {
    ["#AA4644", "#89A54E", "#4573A7", "#93A9D0", "#D09392"]
        .iter()
        .enumerate()
        .map(|(i, &color)| PhaseStyle {
            name: (i + 1).to_string(),
            style: PlotStyle::new().with_color(Some(color)),
        })
        .collect()
}

fn default_true() -> bool { true }
fn default_harmonic_limit() -> usize { 31 }

/// Loads options from TOML, or JSON when the file ends in `.json`.
pub fn load_config(path: &Path) -> Result<Options> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let options = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?
    } else {
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?
    };
    Ok(options)
}
