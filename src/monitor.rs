// Sampling lifecycle: runs a collector and accumulates data points for a run

use crate::collector::CounterCollector;
use crate::models::{CounterMap, DataPoint, Run};
use std::sync::{Mutex, PoisonError};
use tracing::instrument;

/// Step of the snapshot taken by [`Monitor::start`].
pub const BEFORE: u32 = 0;
/// Step of the snapshot taken by [`Monitor::stop`].
pub const AFTER: u32 = 1;

pub struct Monitor {
    collector: Box<dyn CounterCollector>,
    points: Mutex<Vec<DataPoint>>,
}

impl Monitor {
    pub fn new(collector: Box<dyn CounterCollector>) -> Self {
        Self {
            collector,
            points: Mutex::new(Vec::new()),
        }
    }

    pub fn collector_name(&self) -> &'static str {
        self.collector.name()
    }

    /// Collects process and global counters into a fresh map, records the point, returns it.
    #[instrument(skip(self), fields(collector = self.collector.name()))]
    pub fn sample(&self, step: u32) -> DataPoint {
        let mut scalars = CounterMap::new();
        self.collector.collect_process_counters(&mut scalars);
        self.collector.collect_global_counters(&mut scalars);
        let point = DataPoint::new(step, scalars);
        tracing::debug!(
            step,
            dimensions = point.len(),
            operation = "sample",
            "data point collected"
        );
        self.lock_points().push(point.clone());
        point
    }

    pub fn start(&self) -> DataPoint {
        self.sample(BEFORE)
    }

    pub fn stop(&self) -> DataPoint {
        self.sample(AFTER)
    }

    pub fn len(&self) -> usize {
        self.lock_points().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_points().is_empty()
    }

    /// Copy of the points recorded so far, ordered by step.
    pub fn run(&self) -> Run {
        Run::from_points(self.lock_points().clone())
    }

    /// Hands over the recorded points and starts a new, empty run.
    pub fn take_run(&self) -> Run {
        Run::from_points(std::mem::take(&mut *self.lock_points()))
    }

    fn lock_points(&self) -> std::sync::MutexGuard<'_, Vec<DataPoint>> {
        self.points.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
