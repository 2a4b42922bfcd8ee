//! Shared traits for Tugbot state records

/// Compact one-line rendering of a state record for telemetry logging
///
/// Per-tick state is logged at high rates, so implementations keep the
/// output short and fixed-precision instead of relying on `Debug`.
pub trait LogSummary {
    /// Return a compact string representation suitable for logging
    fn log_summary(&self) -> String;
}

impl LogSummary for f64 {
    fn log_summary(&self) -> String {
        format!("{:.3}", self)
    }
}

impl LogSummary for bool {
    fn log_summary(&self) -> String {
        if *self { "on" } else { "off" }.to_string()
    }
}
