//! Typed result records produced by the statistic operations.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One category row of an areal categorical statistics computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalStatistics {
    /// Raster category code.
    pub cat: String,

    /// Category label, e.g. "not classified".
    pub name: String,

    /// Area covered by the category, in square meters.
    pub area: f64,

    /// Number of cells belonging to the category.
    pub cell_count: u64,

    /// Percentage of the computation region covered.
    pub percent: f64,
}

/// Univariate raster statistics of one polygon feature.
///
/// A numeric field stays unset when the underlying attribute table token
/// did not parse as a float; unset fields are omitted from the JSON output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AreaUnivarStatistics {
    /// Vector category of the feature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cat: Option<String>,

    /// Feature id of the feature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fid: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub raster_number: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub raster_minimum: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub raster_maximum: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub raster_range: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub raster_average: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub raster_median: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub raster_stddev: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub raster_sum: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub raster_variance: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub raster_coeff_var: Option<f64>,
}

/// Attribute map for one sampled point, keyed by the caller-supplied id.
///
/// Serializes as a single-entry object `{"<id>": {..}}`; sampling
/// responses are ordered lists of these, one per input point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointSample {
    pub point_id: String,
    pub values: BTreeMap<String, String>,
}

impl PointSample {
    pub fn new(point_id: impl Into<String>) -> Self {
        Self {
            point_id: point_id.into(),
            values: BTreeMap::new(),
        }
    }

    /// Add an attribute, builder style.
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl Serialize for PointSample {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.point_id, &self.values)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for PointSample {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = BTreeMap::<String, BTreeMap<String, String>>::deserialize(deserializer)?;
        let mut entries = map.into_iter();
        match (entries.next(), entries.next()) {
            (Some((point_id, values)), None) => Ok(PointSample { point_id, values }),
            _ => Err(serde::de::Error::custom(
                "expected a single-entry point sample object",
            )),
        }
    }
}

/// Typed union of every result shape the operations produce.
///
/// Serializes untagged, so each variant is a plain JSON array of its row
/// type. Deserialization tries variants in declaration order; PointSamples
/// must precede UnivarStats, whose fields are all optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProcessResults {
    CategoricalStats(Vec<CategoricalStatistics>),
    PointSamples(Vec<PointSample>),
    UnivarStats(Vec<AreaUnivarStatistics>),
    SamplingRows(Vec<Vec<String>>),
}

impl ProcessResults {
    /// Number of result rows or entries.
    pub fn len(&self) -> usize {
        match self {
            ProcessResults::CategoricalStats(rows) => rows.len(),
            ProcessResults::PointSamples(samples) => samples.len(),
            ProcessResults::UnivarStats(rows) => rows.len(),
            ProcessResults::SamplingRows(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
