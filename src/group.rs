//! Series grouping
//!
//! Partitions flat result records into named series by an explicit list of
//! categorical key selectors. Key values are discovered from the data and
//! iterated in one canonical order (numbers numerically, strings lexically),
//! so legends and output files come out identical across runs on the same
//! input.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::ResultRecord;

/// One categorical key value.
///
/// Ordering is total: numbers compare with [`f64::total_cmp`], text compares
/// lexically, and every number sorts before every string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CategoryValue {
    /// Numeric key (e.g. a learning rate)
    Number(f64),
    /// String key (e.g. a method name)
    Text(String),
}

impl Ord for CategoryValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for CategoryValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for CategoryValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CategoryValue {}

impl fmt::Display for CategoryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CategoryValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for CategoryValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Which record attribute a grouping level reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeySelector {
    /// Optimizer name
    Method,
    /// Learning rate
    LearningRate,
}

impl KeySelector {
    /// Read this key from a record.
    #[must_use]
    pub fn extract(self, record: &ResultRecord) -> CategoryValue {
        match self {
            Self::Method => CategoryValue::from(record.method()),
            Self::LearningRate => CategoryValue::Number(record.learning_rate()),
        }
    }

    /// Legend fragment for a value of this key (`GD`, `lr=0.1`).
    #[must_use]
    pub fn format(self, value: &CategoryValue) -> String {
        match self {
            Self::Method => value.to_string(),
            Self::LearningRate => format!("lr={value}"),
        }
    }
}

/// Key tuple identifying one series, ordered lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeriesKey(Vec<CategoryValue>);

impl SeriesKey {
    /// Build a key from its components.
    #[must_use]
    pub fn new(values: Vec<CategoryValue>) -> Self {
        Self(values)
    }

    /// Key with a single text component, for series that are not grouped
    /// out of a table (e.g. "Loss").
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self(vec![CategoryValue::from(name)])
    }

    /// Key components in selector order.
    #[must_use]
    pub fn values(&self) -> &[CategoryValue] {
        &self.0
    }

    /// First component, if any.
    #[must_use]
    pub fn first(&self) -> Option<&CategoryValue> {
        self.0.first()
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join(", "))
    }
}

/// An ordered sequence of `(ordinal, value)` pairs for one key tuple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    key: SeriesKey,
    points: Vec<(u64, f64)>,
}

impl Series {
    /// Create a series. Points are taken as given; [`SeriesGrouper`] is
    /// what sorts them.
    #[must_use]
    pub fn new(key: SeriesKey, points: Vec<(u64, f64)>) -> Self {
        Self { key, points }
    }

    /// Series identity.
    #[must_use]
    pub const fn key(&self) -> &SeriesKey {
        &self.key
    }

    /// Points in ordinal order.
    #[must_use]
    pub fn points(&self) -> &[(u64, f64)] {
        &self.points
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points as `f64` pairs for plotting.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn xy(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|&(i, v)| (i as f64, v)).collect()
    }
}

/// Grouped series in canonical key order.
pub type SeriesMap = BTreeMap<SeriesKey, Series>;

/// Partitions records by an explicit list of key selectors.
#[derive(Debug, Clone)]
pub struct SeriesGrouper {
    selectors: Vec<KeySelector>,
}

impl SeriesGrouper {
    /// Create a grouper over the given selectors (outermost first).
    #[must_use]
    pub fn new(selectors: &[KeySelector]) -> Self {
        Self {
            selectors: selectors.to_vec(),
        }
    }

    /// Key tuple of one record.
    #[must_use]
    pub fn key_of(&self, record: &ResultRecord) -> SeriesKey {
        SeriesKey(self.selectors.iter().map(|s| s.extract(record)).collect())
    }

    /// Group records into series.
    ///
    /// Records sharing a key keep their file order, then a stable sort by
    /// iteration is applied, so duplicate iterations stay in file order.
    #[must_use]
    pub fn group(&self, records: &[ResultRecord]) -> SeriesMap {
        let mut buckets: BTreeMap<SeriesKey, Vec<(u64, f64)>> = BTreeMap::new();
        for record in records {
            buckets
                .entry(self.key_of(record))
                .or_default()
                .push((record.iteration(), record.value()));
        }

        buckets
            .into_iter()
            .map(|(key, mut points)| {
                points.sort_by_key(|&(iteration, _)| iteration);
                (key.clone(), Series::new(key, points))
            })
            .collect()
    }

    /// Legend text for a key using selectors from `skip` onwards
    /// (`skip = 1` drops the outermost level for per-group charts).
    #[must_use]
    pub fn label(&self, key: &SeriesKey, skip: usize) -> String {
        self.selectors
            .iter()
            .zip(key.values())
            .skip(skip)
            .map(|(selector, value)| selector.format(value))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Split grouped series by their first key component, keeping canonical
/// order inside each part.
#[must_use]
pub fn split_on_first(series: &SeriesMap) -> BTreeMap<CategoryValue, Vec<&Series>> {
    let mut parts: BTreeMap<CategoryValue, Vec<&Series>> = BTreeMap::new();
    for (key, s) in series {
        if let Some(first) = key.first() {
            parts.entry(first.clone()).or_default().push(s);
        }
    }
    parts
}
