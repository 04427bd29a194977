//! Embedded image metadata.
//!
//! Photographs usually carry an EXIF block with camera settings: body and
//! lens, exposure time, aperture, ISO, focal length, capture time. The loader
//! turns that block into a [`Metadata`] map keyed by tag name
//! (`"ExposureTime"`, `"FNumber"`, …).
//!
//! Metadata is strictly advisory. A file without EXIF, or with a block the
//! reader cannot parse, loads as `metadata: None` on the
//! [`LoadedImage`](crate::imaging::LoadedImage); no analysis ever depends on
//! it.
//!
//! ## Value model
//!
//! EXIF fields are typed arrays. They are folded into [`TagValue`]:
//!
//! - ASCII strings → [`TagValue::Text`]
//! - a single integer → [`TagValue::Integer`]
//! - a single rational or float → [`TagValue::Float`]
//! - several components (GPS coordinates, lens specification) → [`TagValue::Tuple`]

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// A scalar or tuple metadata value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TagValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Tuple(Vec<TagValue>),
}

impl TagValue {
    /// Collapse a list of components: one element stays scalar, more become a tuple.
    pub fn from_components(mut values: Vec<TagValue>) -> Option<Self> {
        match values.len() {
            0 => None,
            1 => values.pop(),
            _ => Some(TagValue::Tuple(values)),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            TagValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TagValue::Integer(i) => Some(*i as f64),
            TagValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Text(s) => f.write_str(s),
            TagValue::Integer(i) => write!(f, "{i}"),
            TagValue::Float(v) => write!(f, "{v}"),
            TagValue::Tuple(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Tag name → value, ordered by tag name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Metadata {
    tags: BTreeMap<String, TagValue>,
}

/// Tags shown in the shooting summary, in display order.
const SUMMARY_TAGS: &[&str] = &[
    "Make",
    "Model",
    "LensModel",
    "ExposureTime",
    "FNumber",
    "PhotographicSensitivity",
    "FocalLength",
    "DateTimeOriginal",
];

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tag. The first value seen for a name wins, so primary-image
    /// tags read before thumbnail tags are not overwritten.
    pub fn insert(&mut self, name: impl Into<String>, value: TagValue) {
        self.tags.entry(name.into()).or_insert(value);
    }

    pub fn get(&self, name: &str) -> Option<&TagValue> {
        self.tags.get(name)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TagValue)> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The common camera-settings tags present in this block, in a stable order.
    pub fn shooting_summary(&self) -> Vec<(&'static str, &TagValue)> {
        SUMMARY_TAGS
            .iter()
            .filter_map(|&name| self.tags.get(name).map(|v| (name, v)))
            .collect()
    }
}

impl FromIterator<(String, TagValue)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (String, TagValue)>>(iter: I) -> Self {
        let mut meta = Metadata::new();
        for (name, value) in iter {
            meta.insert(name, value);
        }
        meta
    }
}
