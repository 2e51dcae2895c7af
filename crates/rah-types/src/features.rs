//! Fixed-arity feature vectors and their named-segment layouts.
//!
//! Every record kind in the characterized-elements unit carries a numeric
//! descriptor of known width. A [`FeatureKind`] names the layout; the layout
//! is an ordered list of [`Segment`]s whose widths add up to the arity.
//!
//! ```
//! use rah_types::{FeatureKind, FeatureVector};
//!
//! let values: Vec<f64> = (0..9).map(f64::from).collect();
//! let scan = FeatureVector::from_values(FeatureKind::ObservationScan, values).unwrap();
//! assert_eq!(scan.segment("num-of-points").and_then(|s| s.as_scalar()), Some(4.0));
//! ```

use std::fmt;
use std::ops::Index;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One named run of consecutive slots inside a feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub name: &'static str,
    pub width: usize,
}

const fn seg(name: &'static str, width: usize) -> Segment {
    Segment { name, width }
}

const OBJECT_SEGMENTS: &[Segment] = &[
    seg("planarity", 1),
    seg("scatter", 1),
    seg("linearity", 1),
    seg("min-height", 1),
    seg("max-height", 1),
    seg("centroid", 3),
    seg("volume", 1),
    seg("biggest-area", 1),
    seg("orientation", 1),
    seg("hue-mean", 1),
    seg("saturation-mean", 1),
    seg("value-mean", 1),
    seg("hue-stdv", 1),
    seg("saturation-stdv", 1),
    seg("value-stdv", 1),
    seg("hue-histogram", 5),
    seg("value-histogram", 5),
    seg("saturation-histogram", 5),
];

const RELATION_SEGMENTS: &[Segment] = &[
    seg("minimum-distance", 1),
    seg("perpendicularity", 1),
    seg("vertical-distance", 1),
    seg("volume-ratio", 1),
    seg("is-on", 1),
    seg("abs-hue-stdv-diff", 1),
    seg("abs-saturation-stdv-diff", 1),
    seg("abs-value-stdv-diff", 1),
    seg("abs-hue-mean-diff", 1),
    seg("abs-saturation-mean-diff", 1),
    seg("abs-value-mean-diff", 1),
];

const OBSERVATION_SEGMENTS: &[Segment] = &[
    seg("mean-hue", 1),
    seg("mean-saturation", 1),
    seg("mean-value", 1),
    seg("hue-stdv", 1),
    seg("saturation-stdv", 1),
    seg("value-stdv", 1),
    seg("hue-histogram", 5),
    seg("saturation-histogram", 5),
    seg("value-histogram", 5),
    seg("distance", 1),
    seg("foot-print", 1),
    seg("volume", 1),
    seg("mean-mean-hue", 1),
    seg("mean-mean-saturation", 1),
    seg("mean-mean-value", 1),
    seg("mean-hue-stdv", 1),
    seg("mean-saturation-stdv", 1),
    seg("mean-value-stdv", 1),
    seg("mean-hue-histogram", 5),
    seg("mean-saturation-histogram", 5),
    seg("mean-value-histogram", 5),
    seg("mean-distance", 1),
    seg("mean-foot-print", 1),
    seg("mean-volume", 1),
];

const OBSERVATION_SCAN_SEGMENTS: &[Segment] = &[
    seg("area", 1),
    seg("elongation", 1),
    seg("mean-distance", 1),
    seg("distance-stdv", 1),
    seg("num-of-points", 1),
    seg("compactness", 1),
    seg("compactness2", 1),
    seg("linearity", 1),
    seg("scatter", 1),
];

/// The four feature layouts found in the characterized-elements unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    /// Geometry and colour of a segmented object (32 slots).
    Object,
    /// Pairwise object relation (11 slots).
    Relation,
    /// Appearance of an observation and its neighbours (48 slots).
    Observation,
    /// Laser-scan shape of an observation (9 slots).
    ObservationScan,
}

impl FeatureKind {
    pub const ALL: [FeatureKind; 4] = [
        FeatureKind::Object,
        FeatureKind::Relation,
        FeatureKind::Observation,
        FeatureKind::ObservationScan,
    ];

    /// Number of values a vector of this kind always holds.
    pub const fn arity(self) -> usize {
        match self {
            FeatureKind::Object => 32,
            FeatureKind::Relation => 11,
            FeatureKind::Observation => 48,
            FeatureKind::ObservationScan => 9,
        }
    }

    /// Ordered segment layout; widths sum to [`arity`](Self::arity).
    pub fn segments(self) -> &'static [Segment] {
        match self {
            FeatureKind::Object => OBJECT_SEGMENTS,
            FeatureKind::Relation => RELATION_SEGMENTS,
            FeatureKind::Observation => OBSERVATION_SEGMENTS,
            FeatureKind::ObservationScan => OBSERVATION_SCAN_SEGMENTS,
        }
    }

    /// Start offset and width of the segment called `name`.
    pub fn span_of(self, name: &str) -> Option<(usize, usize)> {
        let mut offset = 0;
        for segment in self.segments() {
            if segment.name == name {
                return Some((offset, segment.width));
            }
            offset += segment.width;
        }
        None
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeatureKind::Object => "object",
            FeatureKind::Relation => "relation",
            FeatureKind::Observation => "observation",
            FeatureKind::ObservationScan => "observation scan",
        };
        f.write_str(name)
    }
}

/// Value of a named segment: single-width segments are scalars, wider ones
/// borrow their run of slots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentValue<'a> {
    Scalar(f64),
    Slice(&'a [f64]),
}

impl<'a> SegmentValue<'a> {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            SegmentValue::Scalar(v) => Some(*v),
            SegmentValue::Slice(_) => None,
        }
    }

    pub fn as_slice(&self) -> Option<&'a [f64]> {
        match self {
            SegmentValue::Scalar(_) => None,
            SegmentValue::Slice(values) => Some(values),
        }
    }
}

/// A feature vector whose length always equals `kind.arity()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "RawFeatureVector")]
pub struct FeatureVector {
    kind: FeatureKind,
    values: Vec<f64>,
}

// Deserialized vectors are routed through `from_values`.
#[derive(Deserialize)]
struct RawFeatureVector {
    kind: FeatureKind,
    values: Vec<f64>,
}

impl TryFrom<RawFeatureVector> for FeatureVector {
    type Error = String;

    fn try_from(raw: RawFeatureVector) -> Result<Self, Self::Error> {
        let found = raw.values.len();
        FeatureVector::from_values(raw.kind, raw.values).ok_or_else(|| {
            format!(
                "{} feature vector needs {} values, found {found}",
                raw.kind,
                raw.kind.arity()
            )
        })
    }
}

impl FeatureVector {
    /// Build a vector, returning `None` when `values` has the wrong length.
    pub fn from_values(kind: FeatureKind, values: Vec<f64>) -> Option<Self> {
        (values.len() == kind.arity()).then_some(Self { kind, values })
    }

    pub fn kind(&self) -> FeatureKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Look up a segment by its layout name.
    pub fn segment(&self, name: &str) -> Option<SegmentValue<'_>> {
        let (start, width) = self.kind.span_of(name)?;
        let slots = &self.values[start..start + width];
        Some(if width == 1 {
            SegmentValue::Scalar(slots[0])
        } else {
            SegmentValue::Slice(slots)
        })
    }

    /// Iterate `(name, value)` pairs in layout order.
    pub fn segments(&self) -> impl Iterator<Item = (&'static str, SegmentValue<'_>)> + '_ {
        self.kind.segments().iter().filter_map(move |s| {
            self.segment(s.name).map(|value| (s.name, value))
        })
    }
}

impl Index<usize> for FeatureVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.values[index]
    }
}
