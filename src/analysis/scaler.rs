/// Tracks the largest value seen for each named scale.
///
/// Names are kept in the order they were first set.
#[derive(Clone, Debug, Default)]
pub struct Scaler {
    scales: Vec<(String, f64)>,
}

impl Scaler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the named scale to `value` if it is larger than what is stored.
    pub fn set_scale(&mut self, name: &str, value: f64) {
        match self.scales.iter_mut().find(|(n, _)| n == name) {
            Some((_, scale)) => *scale = scale.max(value),
            None => self.scales.push((name.to_string(), value)),
        }
    }

    /// The named scale, or `default` when it has never been set.
    pub fn get_scale(&self, name: &str, default: f64) -> f64 {
        self.scale(name).unwrap_or(default)
    }

    pub fn scale(&self, name: &str) -> Option<f64> {
        self.scales
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, value)| value)
    }

    /// `(name, max)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.scales.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.scales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scales.is_empty()
    }
}
