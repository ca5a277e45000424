//! Post-processing of harmonic series for display.
//!
//! A [`HarmonicSeries`] starts out keyed by harmonic number (0 = DC,
//! 1 = fundamental). The transform can drop entries, truncate, rescale to a
//! percentage of a reference harmonic, and swap numeric keys for text labels.
//! Operations run in the order the caller lists them.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Key of a harmonic entry: its order, or a display label once relabeled.
///
/// Deserializes all-digit strings such as `"3"` as orders.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum HarmonicKey {
    Order(usize),
    Label(String),
}

impl<'de> Deserialize<'de> for HarmonicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Order(usize),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Order(n) => HarmonicKey::Order(n),
            Raw::Text(s) => {
                let digits = s.trim();
                match digits.parse::<usize>() {
                    Ok(n) if digits.bytes().all(|b| b.is_ascii_digit()) => HarmonicKey::Order(n),
                    _ => HarmonicKey::Label(s),
                }
            }
        })
    }
}

impl From<usize> for HarmonicKey {
    fn from(order: usize) -> Self {
        HarmonicKey::Order(order)
    }
}

impl From<&str> for HarmonicKey {
    fn from(label: &str) -> Self {
        HarmonicKey::Label(label.to_string())
    }
}

impl fmt::Display for HarmonicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarmonicKey::Order(n) => write!(f, "{}", n),
            HarmonicKey::Label(s) => f.write_str(s),
        }
    }
}

/// One `(key, magnitude)` entry. Serializes as a two-element array.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "(HarmonicKey, f64)", into = "(HarmonicKey, f64)")]
pub struct Harmonic {
    pub key: HarmonicKey,
    pub magnitude: f64,
}

impl Harmonic {
    pub fn new(key: impl Into<HarmonicKey>, magnitude: f64) -> Self {
        Self {
            key: key.into(),
            magnitude,
        }
    }
}

impl From<(HarmonicKey, f64)> for Harmonic {
    fn from((key, magnitude): (HarmonicKey, f64)) -> Self {
        Self { key, magnitude }
    }
}

impl From<Harmonic> for (HarmonicKey, f64) {
    fn from(h: Harmonic) -> Self {
        (h.key, h.magnitude)
    }
}

pub type HarmonicSeries = Vec<Harmonic>;

/// Replacement label for one harmonic.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct HarmonicLabel {
    #[serde(alias = "i")]
    pub harmonic: HarmonicKey,
    pub label: String,
}

/// A single step of a transform pipeline.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum HarmonicOp {
    Remove { keys: Vec<HarmonicKey> },
    /// Expects ascending numeric keys up to the cut.
    Limit { max: usize },
    PercentOf { reference: HarmonicKey },
    Label { labels: Vec<HarmonicLabel> },
}

/// In-place transformer over one harmonic series.
#[derive(Clone, Debug, Default)]
pub struct HarmonicTransform {
    harmonics: HarmonicSeries,
    skipped: Vec<HarmonicKey>,
}

impl HarmonicTransform {
    pub fn new(harmonics: HarmonicSeries) -> Self {
        Self {
            harmonics,
            skipped: Vec::new(),
        }
    }

    pub fn harmonics(&self) -> &[Harmonic] {
        &self.harmonics
    }

    pub fn into_harmonics(self) -> HarmonicSeries {
        self.harmonics
    }

    /// References passed to `percent_of` that were absent, zero or NaN.
    pub fn skipped_references(&self) -> &[HarmonicKey] {
        &self.skipped
    }

    /// Applies `ops` in order.
    pub fn transform(&mut self, ops: &[HarmonicOp]) -> &mut Self {
        for op in ops {
            match op {
                HarmonicOp::Remove { keys } => self.remove(keys),
                HarmonicOp::Limit { max } => self.limit(*max),
                HarmonicOp::PercentOf { reference } => self.percent_of(reference.clone()),
                HarmonicOp::Label { labels } => self.label(labels),
            };
        }
        self
    }

    /// Drops every entry whose key is in `keys`.
    pub fn remove(&mut self, keys: &[HarmonicKey]) -> &mut Self {
        self.harmonics.retain(|h| !keys.contains(&h.key));
        self
    }

    /// Keeps entries until the first numeric key above `max`.
    ///
    /// Labeled entries never stop the scan.
    pub fn limit(&mut self, max: usize) -> &mut Self {
        let cut = self
            .harmonics
            .iter()
            .position(|h| matches!(h.key, HarmonicKey::Order(n) if n > max))
            .unwrap_or(self.harmonics.len());
        self.harmonics.truncate(cut);
        self
    }

    /// Rescales every magnitude to a percentage of the `reference` entry.
    ///
    /// Leaves the series untouched when the reference is missing, zero or NaN and
    /// records it in [`skipped_references`](Self::skipped_references).
    pub fn percent_of(&mut self, reference: impl Into<HarmonicKey>) -> &mut Self {
        let reference = reference.into();
        let value = self
            .find(&reference)
            .map(|h| h.magnitude)
            .filter(|&m| m != 0.0 && !m.is_nan());
        match value {
            Some(reference_value) => {
                for h in &mut self.harmonics {
                    h.magnitude = 100.0 * h.magnitude / reference_value;
                }
            }
            None => {
                log::warn!("percent_of: harmonic {} missing or zero, series left as is", reference);
                self.skipped.push(reference);
            }
        }
        self
    }

    /// Replaces keys with text labels. Empty labels are ignored.
    pub fn label(&mut self, labels: &[HarmonicLabel]) -> &mut Self {
        for def in labels {
            if def.label.is_empty() {
                continue;
            }
            if let Some(h) = self.harmonics.iter_mut().find(|h| h.key == def.harmonic) {
                h.key = HarmonicKey::Label(def.label.clone());
            }
        }
        self
    }

    /// Entry with the greatest positive magnitude.
    pub fn largest(&self) -> Option<&Harmonic> {
        let mut largest: Option<&Harmonic> = None;
        for h in &self.harmonics {
            let best = largest.map_or(0.0, |l| l.magnitude);
            if h.magnitude > best {
                largest = Some(h);
            }
        }
        largest
    }

    /// Runs the same pipeline over each series independently.
    pub fn batch(series: Vec<HarmonicSeries>, ops: &[HarmonicOp]) -> Vec<HarmonicSeries> {
        series
            .into_iter()
            .map(|harmonics| {
                let mut transform = HarmonicTransform::new(harmonics);
                transform.transform(ops);
                transform.into_harmonics()
            })
            .collect()
    }

    fn find(&self, key: &HarmonicKey) -> Option<&Harmonic> {
        self.harmonics.iter().find(|h| &h.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[(usize, f64)]) -> HarmonicSeries {
        values.iter().map(|&(k, m)| Harmonic::new(k, m)).collect()
    }

    #[test]
    fn limit_stops_at_first_key_above_max() {
        let mut t = HarmonicTransform::new(series(&[(0, 10.0), (1, 100.0), (2, 50.0), (3, 5.0)]));
        t.limit(2);
        assert_eq!(t.harmonics(), series(&[(0, 10.0), (1, 100.0), (2, 50.0)]).as_slice());
    }

    #[test]
    fn limit_after_reorder_keeps_only_leading_entries() {
        let mut t = HarmonicTransform::new(series(&[(5, 1.0), (1, 2.0)]));
        t.limit(3);
        assert!(t.harmonics().is_empty());
    }

    #[test]
    fn percent_of_scales_to_reference() {
        let mut t = HarmonicTransform::new(series(&[(0, 10.0), (1, 200.0), (2, 50.0)]));
        t.percent_of(1usize);
        assert_eq!(t.harmonics(), series(&[(0, 5.0), (1, 100.0), (2, 25.0)]).as_slice());
        assert!(t.skipped_references().is_empty());
    }

    #[test]
    fn percent_of_already_normalized_is_identity() {
        let mut t = HarmonicTransform::new(series(&[(0, 10.0), (1, 100.0), (2, 50.0)]));
        t.percent_of(1usize);
        assert_eq!(t.harmonics(), series(&[(0, 10.0), (1, 100.0), (2, 50.0)]).as_slice());
    }

    #[test]
    fn percent_of_zero_or_missing_reference_is_skipped() {
        let original = series(&[(0, 1.0), (1, 0.0), (2, 3.0)]);
        let mut t = HarmonicTransform::new(original.clone());
        t.percent_of(1usize).percent_of(7usize);
        assert_eq!(t.harmonics(), original.as_slice());
        assert_eq!(
            t.skipped_references(),
            &[HarmonicKey::Order(1), HarmonicKey::Order(7)]
        );
    }

    #[test]
    fn percent_of_nan_reference_is_skipped() {
        let mut t = HarmonicTransform::new(series(&[(0, 10.0), (1, f64::NAN), (2, 5.0)]));
        t.percent_of(1usize);
        assert_eq!(t.harmonics()[0].magnitude, 10.0);
        assert!(t.harmonics()[1].magnitude.is_nan());
        assert_eq!(t.harmonics()[2].magnitude, 5.0);
        assert_eq!(t.skipped_references(), &[HarmonicKey::Order(1)]);
    }

    #[test]
    fn remove_drops_all_listed_keys() {
        let mut t = HarmonicTransform::new(series(&[(0, 1.0), (1, 2.0), (2, 3.0), (3, 4.0)]));
        t.remove(&[0usize.into(), 2usize.into(), 9usize.into()]);
        assert_eq!(t.harmonics(), series(&[(1, 2.0), (3, 4.0)]).as_slice());
    }

    #[test]
    fn label_replaces_matching_keys() {
        let mut t = HarmonicTransform::new(series(&[(0, 1.0), (1, 2.0)]));
        t.label(&[
            HarmonicLabel { harmonic: 0usize.into(), label: "DC".into() },
            HarmonicLabel { harmonic: 1usize.into(), label: String::new() },
            HarmonicLabel { harmonic: 4usize.into(), label: "H4".into() },
        ]);
        assert_eq!(t.harmonics()[0].key, HarmonicKey::Label("DC".into()));
        assert_eq!(t.harmonics()[1].key, HarmonicKey::Order(1));
    }

    #[test]
    fn labeled_entries_do_not_stop_limit() {
        let mut t = HarmonicTransform::new(series(&[(0, 1.0), (1, 2.0), (2, 3.0), (3, 4.0), (4, 5.0)]));
        t.label(&[
            HarmonicLabel { harmonic: 0usize.into(), label: "DC".into() },
            HarmonicLabel { harmonic: 1usize.into(), label: "Fund".into() },
        ])
        .limit(2);
        assert_eq!(
            t.harmonics(),
            &[
                Harmonic::new("DC", 1.0),
                Harmonic::new("Fund", 2.0),
                Harmonic::new(2usize, 3.0),
            ]
        );
    }

    #[test]
    fn largest_and_empty_sentinel() {
        let t = HarmonicTransform::new(series(&[(0, 1.0), (1, 9.0), (2, 3.0)]));
        assert_eq!(t.largest(), Some(&Harmonic::new(1usize, 9.0)));
        assert_eq!(HarmonicTransform::new(Vec::new()).largest(), None);
        assert_eq!(HarmonicTransform::new(series(&[(0, 0.0)])).largest(), None);
    }

    #[test]
    fn ops_run_in_listed_order() {
        let data = series(&[(0, 10.0), (1, 50.0), (2, 25.0), (3, 5.0)]);
        let percent_first = [
            HarmonicOp::PercentOf { reference: 1usize.into() },
            HarmonicOp::Remove { keys: vec![1usize.into()] },
        ];
        let remove_first = [
            HarmonicOp::Remove { keys: vec![1usize.into()] },
            HarmonicOp::PercentOf { reference: 1usize.into() },
        ];
        let a = HarmonicTransform::batch(vec![data.clone()], &percent_first);
        let b = HarmonicTransform::batch(vec![data], &remove_first);
        assert_eq!(a[0], series(&[(0, 20.0), (2, 50.0), (3, 10.0)]));
        assert_eq!(b[0], series(&[(0, 10.0), (2, 25.0), (3, 5.0)]));
    }

    #[test]
    fn batch_is_independent_per_series() {
        let ops = [HarmonicOp::PercentOf { reference: 1usize.into() }];
        let out = HarmonicTransform::batch(
            vec![series(&[(1, 2.0), (2, 1.0)]), series(&[(1, 4.0), (2, 1.0)])],
            &ops,
        );
        assert_eq!(out[0], series(&[(1, 100.0), (2, 50.0)]));
        assert_eq!(out[1], series(&[(1, 100.0), (2, 25.0)]));
    }

    #[test]
    fn ops_deserialize_from_toml() {
        #[derive(Deserialize)]
        struct Pipeline {
            transform: Vec<HarmonicOp>,
        }
        let src = r#"
            [[transform]]
            op = "percentOf"
            reference = 1

            [[transform]]
            op = "limit"
            max = 31

            [[transform]]
            op = "label"
            labels = [{ i = 1, label = "Fund" }]
        "#;
        let p: Pipeline = toml::from_str(src).unwrap();
        assert_eq!(p.transform[1], HarmonicOp::Limit { max: 31 });
        assert_eq!(
            p.transform[2],
            HarmonicOp::Label {
                labels: vec![HarmonicLabel { harmonic: 1usize.into(), label: "Fund".into() }]
            }
        );
    }

    #[test]
    fn quoted_orders_deserialize_as_orders() {
        let ops: Vec<HarmonicOp> = serde_json::from_str(
            r#"[{ "op": "remove", "keys": ["1", "DC", 2] }, { "op": "percentOf", "reference": "0" }]"#,
        )
        .unwrap();
        assert_eq!(
            ops[0],
            HarmonicOp::Remove {
                keys: vec![1usize.into(), "DC".into(), 2usize.into()]
            }
        );

        let mut t = HarmonicTransform::new(series(&[(0, 1.0), (1, 2.0), (3, 4.0)]));
        t.transform(&ops);
        assert_eq!(t.harmonics(), series(&[(0, 100.0), (3, 400.0)]).as_slice());
        assert!(t.skipped_references().is_empty());
    }

    #[test]
    fn harmonic_serializes_as_pair() {
        let json = serde_json::to_string(&vec![Harmonic::new(1usize, 2.5), Harmonic::new("DC", 1.0)]).unwrap();
        assert_eq!(json, r#"[[1,2.5],["DC",1.0]]"#);
    }
}
