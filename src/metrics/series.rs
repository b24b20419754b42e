use std::collections::VecDeque;

use serde::Serialize;

/// A timestamped value in a rolling series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint<T> {
    /// Seconds since the session started
    pub t: f64,
    pub value: T,
}

/// Fixed-capacity FIFO of timestamped values.
///
/// Pushing at capacity evicts the oldest point first, so the series always
/// holds the newest `capacity` points in arrival order.
#[derive(Debug, Clone)]
pub struct RollingSeries<T> {
    capacity: usize,
    points: VecDeque<SeriesPoint<T>>,
}

impl<T: Clone> RollingSeries<T> {
    /// Create an empty series bounded to `capacity` points.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            points: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a point, evicting the oldest when full.
    pub fn push(&mut self, t: f64, value: T) {
        if self.capacity == 0 {
            return;
        }
        while self.points.len() >= self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(SeriesPoint { t, value });
    }

    /// Drop all points.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Points in arrival order, oldest first.
    pub fn snapshot(&self) -> Vec<SeriesPoint<T>> {
        self.points.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_within_capacity_at_every_push() {
        let mut series = RollingSeries::new(20);
        for i in 0..40 {
            series.push(i as f64, i);
            assert!(series.len() <= 20);
        }
        assert_eq!(series.len(), 20);
    }

    #[test]
    fn evicts_oldest_first() {
        let mut series = RollingSeries::new(20);
        for v in 100..=125 {
            series.push(v as f64, v);
        }
        let values: Vec<i32> = series.snapshot().into_iter().map(|p| p.value).collect();
        assert_eq!(values, (106..=125).collect::<Vec<i32>>());
    }

    #[test]
    fn snapshot_preserves_arrival_order_and_timestamps() {
        let mut series = RollingSeries::new(3);
        series.push(0.5, "a");
        series.push(1.0, "b");
        let points = series.snapshot();
        assert_eq!(points[0].t, 0.5);
        assert_eq!(points[1].value, "b");
    }

    #[test]
    fn clear_empties_the_series() {
        let mut series = RollingSeries::new(5);
        series.push(1.0, 10);
        series.push(2.0, 20);
        series.clear();
        assert!(series.is_empty());
        assert_eq!(series.capacity(), 5);
    }

    #[test]
    fn zero_capacity_accepts_nothing() {
        let mut series = RollingSeries::new(0);
        series.push(1.0, 1);
        assert!(series.is_empty());
    }
}
