// Snapshot of all scalars collected at one step

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::{Dimension, Scalar};

/// Caller-owned mapping that collectors fill in place.
pub type CounterMap = BTreeMap<Dimension, Scalar>;

/// Immutable step-tagged snapshot. The map handed to [`DataPoint::new`] is adopted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "DataPointRepr", from = "DataPointRepr")]
pub struct DataPoint {
    step: u32,
    scalars: CounterMap,
}

/// Wire shape: `{"step": 0, "scalars": {"USER_TIME": 120, ...}}`.
#[derive(Serialize, Deserialize)]
struct DataPointRepr {
    step: u32,
    scalars: BTreeMap<Dimension, i64>,
}

impl From<DataPoint> for DataPointRepr {
    fn from(point: DataPoint) -> Self {
        Self {
            step: point.step,
            scalars: point
                .scalars
                .into_iter()
                .map(|(dim, scalar)| (dim, scalar.magnitude()))
                .collect(),
        }
    }
}

impl From<DataPointRepr> for DataPoint {
    fn from(repr: DataPointRepr) -> Self {
        let scalars = repr
            .scalars
            .into_iter()
            .map(|(dim, value)| (dim, Scalar::new(dim, value)))
            .collect();
        DataPoint::new(repr.step, scalars)
    }
}

impl DataPoint {
    pub fn new(step: u32, scalars: CounterMap) -> Self {
        Self { step, scalars }
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn dimensions(&self) -> impl Iterator<Item = Dimension> + '_ {
        self.scalars.keys().copied()
    }

    pub fn scalars(&self) -> impl Iterator<Item = &Scalar> + '_ {
        self.scalars.values()
    }

    pub fn contains(&self, dimension: Dimension) -> bool {
        self.scalars.contains_key(&dimension)
    }

    /// `None` when the dimension was not collected for this step.
    pub fn scalar(&self, dimension: Dimension) -> Option<&Scalar> {
        self.scalars.get(&dimension)
    }

    pub fn len(&self) -> usize {
        self.scalars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scalars.is_empty()
    }

    pub fn as_map(&self) -> &CounterMap {
        &self.scalars
    }
}

impl fmt::Display for DataPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DataPoint [step= {}, #dimensions: {}]",
            self.step,
            self.scalars.len()
        )
    }
}
