//! Fixed-capacity FIFO of samples with a running mean

use std::collections::VecDeque;

/// Keeps the most recent `capacity` samples; the oldest is evicted first.
#[derive(Debug, Clone, PartialEq)]
pub struct RollingAverage {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl RollingAverage {
    /// Create an empty buffer. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, dropping the oldest ones beyond capacity
    pub fn push(&mut self, sample: f32) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Mean of the retained samples, `None` when empty
    pub fn average(&self) -> Option<f32> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.samples.iter().sum::<f32>() / self.samples.len() as f32)
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Retained samples, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &f32> {
        self.samples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_of_samples() {
        let mut history = RollingAverage::new(10);
        assert_eq!(history.average(), None);

        history.push(1.0);
        history.push(2.0);
        history.push(6.0);
        assert_eq!(history.average(), Some(3.0));
    }

    #[test]
    fn test_evicts_oldest_first() {
        let mut history = RollingAverage::new(10);
        for i in 0..15 {
            history.push(i as f32);
        }

        assert_eq!(history.len(), 10);
        let kept: Vec<f32> = history.iter().copied().collect();
        assert_eq!(kept, (5..15).map(|i| i as f32).collect::<Vec<_>>());
        assert_eq!(history.average(), Some(9.5));
    }

    #[test]
    fn test_clear() {
        let mut history = RollingAverage::new(3);
        history.push(4.0);
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.average(), None);
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let mut history = RollingAverage::new(0);
        history.push(1.0);
        history.push(2.0);
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.average(), Some(2.0));
    }
}
