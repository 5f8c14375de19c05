//! Fixed-window running averages.

use std::collections::VecDeque;
use std::ops::{Add, Div, Sub};

/// Mean of the last `window` samples. Each `add` is O(1).
#[derive(Debug, Clone)]
pub struct RunningAverage<T> {
    samples: VecDeque<T>,
    window: usize,
    sum: T,
}

impl<T> RunningAverage<T>
where
    T: Copy + Default + Add<Output = T> + Sub<Output = T> + Div<f64, Output = T>,
{
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            samples: VecDeque::with_capacity(window),
            window,
            sum: T::default(),
        }
    }

    /// Push a sample and return the new average.
    pub fn add(&mut self, sample: T) -> T {
        if self.samples.len() == self.window {
            if let Some(oldest) = self.samples.pop_front() {
                self.sum = self.sum - oldest;
            }
        }
        self.samples.push_back(sample);
        self.sum = self.sum + sample;
        self.value()
    }

    pub fn value(&self) -> T {
        if self.samples.is_empty() {
            T::default()
        } else {
            self.sum / self.samples.len() as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use pronav_core::types::Vec2;

    #[test]
    fn test_average_over_window() {
        let mut avg = RunningAverage::new(3);
        assert_eq!(avg.value(), 0.0);
        assert_eq!(avg.add(3.0), 3.0);
        assert_eq!(avg.add(6.0), 4.5);
        assert_eq!(avg.add(9.0), 6.0);
        // Oldest sample (3.0) drops out.
        assert_abs_diff_eq!(avg.add(12.0), 9.0, epsilon = 1e-12);
    }

    #[test]
    fn test_average_of_vectors() {
        let mut avg = RunningAverage::new(2);
        avg.add(Vec2::new(2.0, 0.0));
        let v = avg.add(Vec2::new(0.0, 4.0));
        assert_eq!(v, Vec2::new(1.0, 2.0));
    }
}
