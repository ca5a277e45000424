use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::path::Path;

use crate::analysis::{Waveform, WaveformSet};
use crate::config::Options;
use crate::error::AcwfError;

/// Waveform data as delivered to the factory.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveformData {
    #[serde(default)]
    pub samples_per_cycle: Option<usize>,
    pub data: Vec<ChannelData>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ChannelData {
    pub samples: Vec<f64>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub unit: Option<String>,
    /// Phases arrive as either names or numbers; both are kept as text.
    #[serde(default, deserialize_with = "string_or_number")]
    pub phase: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Tag {
        Int(i64),
        Float(f64),
        Text(String),
    }

    Ok(match Option::<Tag>::deserialize(deserializer)? {
        None => None,
        Some(Tag::Int(n)) => Some(n.to_string()),
        Some(Tag::Float(x)) => Some(x.to_string()),
        Some(Tag::Text(s)) => Some(s),
    })
}

pub fn load_dataset(path: &Path) -> Result<WaveformData> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset: {}", path.display()))?;
    let data: WaveformData = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse dataset: {}", path.display()))?;
    log::info!(
        "Loaded {} waveforms from {}",
        data.data.len(),
        path.display()
    );
    Ok(data)
}

impl WaveformSet {
    /// Builds a set from a dataset, applying unit and phase styles from `options`.
    ///
    /// Runs `compute_rms` when `waveform.showRms` is set.
    pub fn create(data: WaveformData, options: &Options) -> std::result::Result<Self, AcwfError> {
        let mut set = WaveformSet::new(data.samples_per_cycle)?;
        for unit in &options.unit_styles {
            set.add_unit_style(&unit.name, unit.style.clone());
        }
        for phase in &options.phase_styles {
            if let Some(color) = phase.style.color.as_deref() {
                set.add_phase_color(&phase.name, color);
            }
        }
        for channel in data.data {
            let waveform = Waveform::new(channel.samples, channel.label)?;
            set.add_waveform(waveform, channel.unit.as_deref(), channel.phase.as_deref());
        }
        if options.waveform.show_rms {
            set.compute_rms();
        }
        Ok(set)
    }
}
