use rustfft::{num_complex::Complex, FftPlanner};

/// Output of a forward transform over one sample window.
///
/// Only the non-negative harmonics `0..=N/2` are kept. `real` and `imag` are the
/// cosine and sine correlations of the window, `spectrum` is the amplitude of
/// each harmonic (`2/N * |X[k]|`).
#[derive(Clone, Debug, PartialEq)]
pub struct DftBins {
    pub spectrum: Vec<f64>,
    pub real: Vec<f64>,
    pub imag: Vec<f64>,
}

/// Real-input DFT with plan caching across window sizes.
pub struct Dft {
    planner: FftPlanner<f64>,
}

impl Default for Dft {
    fn default() -> Self {
        Self::new()
    }
}

impl Dft {
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
        }
    }

    /// Forward DFT of a real window.
    ///
    /// `imag[k]` is `sum(x[n] * sin(2*pi*k*n/N))`, the opposite sign of the
    /// engineering convention `rustfft` uses.
    pub fn forward(&mut self, samples: &[f64]) -> DftBins {
        let n = samples.len();
        if n == 0 {
            return DftBins {
                spectrum: Vec::new(),
                real: Vec::new(),
                imag: Vec::new(),
            };
        }

        let fft = self.planner.plan_fft_forward(n);
        let mut buffer: Vec<Complex<f64>> =
            samples.iter().map(|&s| Complex::new(s, 0.0)).collect();
        fft.process(&mut buffer);

        let bins = n / 2 + 1;
        let scale = 2.0 / n as f64;
        let mut spectrum = Vec::with_capacity(bins);
        let mut real = Vec::with_capacity(bins);
        let mut imag = Vec::with_capacity(bins);
        for c in &buffer[..bins] {
            spectrum.push(scale * c.norm());
            real.push(c.re);
            imag.push(-c.im);
        }

        DftBins {
            spectrum,
            real,
            imag,
        }
    }
}
