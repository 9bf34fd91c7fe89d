use crate::constants::{CLOCK_SPEED, MAX_SAVED_STATES, TIMER_SPEED};

/// Knobs an embedder can turn when building a `Chip8` or a `Scheduler`
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Instructions executed per second
    pub cpu_hz: u32,
    /// Timer decrements per second; 60 on every real machine
    pub timer_hz: u32,
    /// How many past states are kept for `reverse_cpu`; 0 disables rewinding
    pub max_saved_states: usize,
    /// Seed for `CXNN`; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cpu_hz: CLOCK_SPEED,
            timer_hz: TIMER_SPEED,
            max_saved_states: MAX_SAVED_STATES,
            seed: None,
        }
    }
}
