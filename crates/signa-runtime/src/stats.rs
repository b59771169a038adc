use std::time::Duration;

/// Pipeline counters
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PipelineStats {
    pub cycles: u64,
    pub dropped_while_closed: u64,
    pub windows_evaluated: u64,
    pub empty_gate_trips: u64,
    pub classifications: u64,
    pub emissions: u64,
    pub errors: u64,
    pub last_cycle_duration: Duration,
}
