// Dimensioned measurement models

mod data_point;
mod dimension;
mod run;
mod scalar;

pub use data_point::{CounterMap, DataPoint};
pub use dimension::{Dimension, Unit};
pub use run::Run;
pub use scalar::Scalar;
