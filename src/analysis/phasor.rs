use std::f64::consts::PI;
use std::fmt;

use serde::Serialize;

/// Magnitude and angle of a waveform at the fundamental frequency.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Phasor {
    pub magnitude: f64,
    /// Angle in radians.
    pub angle: f64,
    pub label: String,
}

/// Something a phasor angle can be measured against.
#[derive(Clone, Copy, Debug)]
pub enum Reference<'a> {
    Phasor(&'a Phasor),
    /// Raw angle in radians.
    Angle(f64),
}

impl<'a> From<&'a Phasor> for Reference<'a> {
    fn from(phasor: &'a Phasor) -> Self {
        Reference::Phasor(phasor)
    }
}

impl From<f64> for Reference<'_> {
    fn from(angle: f64) -> Self {
        Reference::Angle(angle)
    }
}

impl Phasor {
    pub fn new(magnitude: f64, angle: f64, label: impl Into<String>) -> Self {
        Self {
            magnitude,
            angle,
            label: label.into(),
        }
    }

    /// Angle relative to `reference`, in radians. Not wrapped.
    pub fn relative<'a>(&self, reference: impl Into<Reference<'a>>) -> f64 {
        match reference.into() {
            Reference::Phasor(other) => self.angle - other.angle,
            Reference::Angle(angle) => self.angle - angle,
        }
    }
}

impl fmt::Display for Phasor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Phasor {}: {} @ {} deg",
            self.label,
            self.magnitude,
            rad2deg(self.angle)
        )
    }
}

pub fn deg2rad(deg: f64) -> f64 {
    deg * PI / 180.0
}

/// Radians to degrees, wrapped once into `[-180, 180]`.
pub fn rad2deg(rad: f64) -> f64 {
    let mut deg = rad * 180.0 / PI;
    if deg > 180.0 {
        deg -= 360.0;
    }
    if deg < -180.0 {
        deg += 360.0;
    }
    deg
}
