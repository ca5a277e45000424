use thiserror::Error;

/// Errors raised while building or analyzing a waveform set.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AcwfError {
    /// The dataset or caller did not supply samples per cycle.
    #[error("samples per cycle must be provided")]
    MissingSamplesPerCycle,

    /// Samples per cycle was supplied but is not a positive count.
    #[error("samples per cycle must be greater than zero (got {0})")]
    InvalidSamplesPerCycle(usize),

    /// A waveform or analysis window had no samples.
    #[error("waveform '{label}' has no samples")]
    EmptySamples {
        /// Label of the offending waveform.
        label: String,
    },

    /// THD requested for a spectrum whose fundamental is zero.
    #[error("waveform '{label}' has a zero fundamental, THD is undefined")]
    ZeroFundamental {
        /// Label of the analyzed waveform.
        label: String,
    },

    /// A buffer is shorter than one analysis cycle.
    #[error("waveform '{label}' has {len} samples, fewer than one cycle of {samples_per_cycle}")]
    WindowTooShort {
        /// Label of the offending waveform.
        label: String,
        /// Number of samples in the buffer.
        len: usize,
        /// Requested window length.
        samples_per_cycle: usize,
    },
}

impl AcwfError {
    /// True for errors that stem from how the set was configured.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            AcwfError::MissingSamplesPerCycle | AcwfError::InvalidSamplesPerCycle(_)
        )
    }

    /// True for errors where the numeric quantity is undefined for the input.
    pub fn is_domain(&self) -> bool {
        !self.is_configuration()
    }

    pub(crate) fn empty(label: &str) -> Self {
        AcwfError::EmptySamples {
            label: label.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AcwfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_configuration_errors() {
        assert!(AcwfError::MissingSamplesPerCycle.is_configuration());
        assert!(AcwfError::InvalidSamplesPerCycle(0).is_configuration());
        assert!(!AcwfError::empty("Va").is_configuration());
    }

    #[test]
    fn classifies_domain_errors() {
        assert!(AcwfError::empty("Va").is_domain());
        assert!(AcwfError::ZeroFundamental { label: "Ia".into() }.is_domain());
        let short = AcwfError::WindowTooShort {
            label: "Vb".into(),
            len: 10,
            samples_per_cycle: 32,
        };
        assert!(short.is_domain());
    }

    #[test]
    fn window_too_short_display() {
        let err = AcwfError::WindowTooShort {
            label: "Vb".into(),
            len: 10,
            samples_per_cycle: 32,
        };
        assert_eq!(
            err.to_string(),
            "waveform 'Vb' has 10 samples, fewer than one cycle of 32"
        );
    }
}
