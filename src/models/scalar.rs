// One measured value for one dimension

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Dimension, Unit};

const BYTE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Immutable (dimension, magnitude) pair. Sanity of the magnitude is the collector's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scalar {
    dimension: Dimension,
    #[serde(rename = "value")]
    magnitude: i64,
}

impl Scalar {
    pub fn new(dimension: Dimension, magnitude: i64) -> Self {
        Self {
            dimension,
            magnitude,
        }
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn magnitude(&self) -> i64 {
        self.magnitude
    }

    /// Human-readable magnitude in the dimension's unit, e.g. "120 ms" or "4.00 KB".
    pub fn display_value(&self) -> String {
        let v = self.magnitude;
        match self.dimension.unit() {
            Unit::Milliseconds => format!("{} ms", v),
            Unit::Count => v.to_string(),
            Unit::Bytes => {
                if v.unsigned_abs() < 1024 {
                    return format!("{} B", v);
                }
                let mut value = v as f64;
                let mut idx = 0;
                while value.abs() >= 1024.0 && idx < BYTE_UNITS.len() - 1 {
                    value /= 1024.0;
                    idx += 1;
                }
                format!("{:.2} {}", value, BYTE_UNITS[idx])
            }
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Scalar [dimension= {}, value= {}]",
            self.dimension, self.magnitude
        )
    }
}
