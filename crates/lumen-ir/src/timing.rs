//! Diagnostic records sampled by the realtime workers.

/// Scheduling diagnostics for one audio feeder cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimingSample {
    /// Cycle number, starting at 0.
    pub cycle: u64,
    /// Wall-clock cost of the cycle's successful sink writes, in µs.
    pub runtime_us: i64,
    /// Time since the previous wake, in µs. `None` on the first cycle.
    pub wake_interval_us: Option<i64>,
    /// Actual wake time minus the scheduled deadline, in µs. A negative
    /// value is a deadline miss.
    pub jitter_us: i64,
}

/// Diagnostics for one pattern step transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepTrace {
    /// Sequencer tick at which the step was entered.
    pub tick: u64,
    /// Time since the sequencer started, in µs.
    pub elapsed_us: i64,
    /// Wall-clock cost of the set/clear register write pair, in µs.
    pub write_us: i64,
}
