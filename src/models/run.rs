// Ordered sequence of data points for one measurement run

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{CounterMap, DataPoint, Dimension, Scalar};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    points: Vec<DataPoint>,
}

impl Run {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a run ordered by step. Points sharing a step keep their relative order.
    pub fn from_points(mut points: Vec<DataPoint>) -> Self {
        points.sort_by_key(DataPoint::step);
        Self { points }
    }

    pub fn push(&mut self, point: DataPoint) {
        let at = self.points.partition_point(|p| p.step() <= point.step());
        self.points.insert(at, point);
    }

    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First point recorded for `step`.
    pub fn point(&self, step: u32) -> Option<&DataPoint> {
        self.points.iter().find(|p| p.step() == step)
    }

    /// Union of dimensions over every point.
    pub fn dimensions(&self) -> BTreeSet<Dimension> {
        self.points.iter().flat_map(|p| p.dimensions()).collect()
    }

    /// Per-dimension `to - from` for dimensions present at both steps.
    /// `None` if either step has no point.
    pub fn delta(&self, from_step: u32, to_step: u32) -> Option<CounterMap> {
        let from = self.point(from_step)?;
        let to = self.point(to_step)?;
        Some(
            to.scalars()
                .filter_map(|after| {
                    let dim = after.dimension();
                    from.scalar(dim).map(|before| {
                        (
                            dim,
                            Scalar::new(dim, after.magnitude().saturating_sub(before.magnitude())),
                        )
                    })
                })
                .collect(),
        )
    }
}
