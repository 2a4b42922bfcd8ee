//! Exponential Moving Average Filter
//!
//! Single-pole low-pass filter for noisy ADC channels.
//!
//! The first sample seeds the filter directly instead of being blended with
//! an arbitrary initial value, so a freshly started filter reports the real
//! reading rather than ramping up from zero.
//!
//! # Example
//!
//! ```rust
//! use tugbot_library::algorithms::ema_filter::EmaFilter;
//!
//! let mut filter = EmaFilter::new(0.5);
//! assert_eq!(filter.update(10.0), 10.0); // seeded
//! assert_eq!(filter.update(0.0), 5.0);   // 0.5 * 10 + 0.5 * 0
//! ```

/// Exponential moving average with seed-on-first-sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmaFilter {
    alpha: f64,
    value: Option<f64>,
}

impl EmaFilter {
    /// Create a filter; `alpha` is the weight of each new sample, clamped to [0, 1]
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            value: None,
        }
    }

    /// Feed a sample and return the filtered value
    pub fn update(&mut self, sample: f64) -> f64 {
        let next = match self.value {
            None => sample,
            Some(prev) => (1.0 - self.alpha) * prev + self.alpha * sample,
        };
        self.value = Some(next);
        next
    }

    /// Replace the filter state with `sample`
    pub fn seed(&mut self, sample: f64) {
        self.value = Some(sample);
    }

    /// Current filtered value, if any sample has been seen
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn is_seeded(&self) -> bool {
        self.value.is_some()
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn reset(&mut self) {
        self.value = None;
    }
}
