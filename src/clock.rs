use std::time::{Duration, Instant};

use crate::chip8::Chip8;
use crate::config::Config;
use crate::error::{Chip8Error, Status};

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// # Clock
/// Converts elapsed wall-clock time into whole ticks of a fixed frequency.
///
/// Partial periods carry over between calls, so feeding it many small durations yields the
/// same number of ticks as one large one.
#[derive(Copy, Clone, Debug)]
pub struct Clock {
    hz: u32,
    // elapsed nanoseconds scaled by hz, always < NANOS_PER_SEC after advancing
    budget: u128,
}

impl Clock {
    pub fn new(hz: u32) -> Self {
        Clock { hz, budget: 0 }
    }

    /// Returns how many ticks fell due during `elapsed`
    pub fn advance(&mut self, elapsed: Duration) -> u64 {
        self.budget += elapsed.as_nanos() * u128::from(self.hz);
        let ticks = self.budget / NANOS_PER_SEC;
        self.budget %= NANOS_PER_SEC;
        ticks as u64
    }
}

/// # Scheduler
/// Drives a `Chip8` from two independent clocks: one for instructions, one for the 60Hz
/// delay and sound timers. Timer decay depends only on elapsed time, never on how many
/// instructions ran.
pub struct Scheduler {
    cpu: Clock,
    timers: Clock,
    last_run: Option<Instant>,
}

impl Scheduler {
    pub fn new(config: &Config) -> Self {
        Scheduler {
            cpu: Clock::new(config.cpu_hz),
            timers: Clock::new(config.timer_hz),
            last_run: None,
        }
    }

    /// Runs everything that fell due during `elapsed`.
    ///
    /// Timers are ticked first, then instructions are stepped until the budget is spent or
    /// the machine waits on a key; the rest of the CPU budget is dropped in that case.
    /// Returns the status of the last step, or `Status::Ok` if none ran.
    pub fn run(&mut self, chip8: &mut Chip8, elapsed: Duration) -> Result<Status, Chip8Error> {
        for _ in 0..self.timers.advance(elapsed) {
            chip8.tick_timers();
        }

        let mut status = Status::Ok;
        for _ in 0..self.cpu.advance(elapsed) {
            status = chip8.step()?;
            if status == Status::AwaitingInput {
                break;
            }
        }
        Ok(status)
    }

    /// Runs everything that fell due since the previous call; the first call only starts the clock
    pub fn run_until(&mut self, chip8: &mut Chip8, now: Instant) -> Result<Status, Chip8Error> {
        let elapsed = match self.last_run {
            Some(last) => now.saturating_duration_since(last),
            None => Duration::from_secs(0),
        };
        self.last_run = Some(now);
        self.run(chip8, elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_counts_whole_periods() {
        let mut clock = Clock::new(500);
        assert_eq!(clock.advance(Duration::from_millis(10)), 5);
        assert_eq!(clock.advance(Duration::from_millis(1)), 0);
        assert_eq!(clock.advance(Duration::from_millis(1)), 1);
    }

    #[test]
    fn test_clock_carries_remainders() {
        let mut clock = Clock::new(60);
        let ticks: u64 = (0..100)
            .map(|_| clock.advance(Duration::from_millis(10)))
            .sum();
        assert_eq!(ticks, 60);
    }

    #[test]
    fn test_stopped_clock_never_ticks() {
        let mut clock = Clock::new(0);
        assert_eq!(clock.advance(Duration::from_secs(10)), 0);
    }

    #[test]
    fn test_timers_run_independently_of_instructions() {
        // V0 = 60; DT = V0; loop forever
        let rom = [0x60, 0x3C, 0xF0, 0x15, 0x12, 0x04];
        let mut fast = Chip8::new();
        fast.load_rom(&rom).unwrap();
        let mut fast_scheduler = Scheduler::new(&Config {
            cpu_hz: 600,
            ..Config::default()
        });
        let mut slow = Chip8::new();
        slow.load_rom(&rom).unwrap();
        let mut slow_scheduler = Scheduler::new(&Config {
            cpu_hz: 60,
            ..Config::default()
        });

        fast_scheduler
            .run(&mut fast, Duration::from_millis(10))
            .unwrap();
        slow_scheduler
            .run(&mut slow, Duration::from_millis(50))
            .unwrap();
        assert_eq!(fast.state().delay_timer, 0x3C);
        assert_eq!(slow.state().delay_timer, 0x3C);

        fast_scheduler
            .run(&mut fast, Duration::from_millis(500))
            .unwrap();
        slow_scheduler
            .run(&mut slow, Duration::from_millis(500))
            .unwrap();
        assert_eq!(fast.state().delay_timer, 0x3C - 30);
        assert_eq!(slow.state().delay_timer, 0x3C - 30);
    }

    #[test]
    fn test_run_stops_when_awaiting_input() {
        let mut chip8 = Chip8::new();
        chip8.load_rom(&[0xF0, 0x0A, 0x12, 0x00]).unwrap();
        let mut scheduler = Scheduler::new(&Config::default());
        let status = scheduler.run(&mut chip8, Duration::from_millis(100)).unwrap();
        assert_eq!(status, Status::AwaitingInput);
        assert_eq!(chip8.state().pc, 0x200);
    }

    #[test]
    fn test_run_reports_fatal_errors() {
        let mut chip8 = Chip8::new();
        chip8.load_rom(&[0x00, 0xEE]).unwrap();
        let mut scheduler = Scheduler::new(&Config::default());
        assert!(matches!(
            scheduler.run(&mut chip8, Duration::from_millis(100)),
            Err(Chip8Error::StackUnderflow { .. })
        ));
    }

    #[test]
    fn test_run_until_starts_the_clock() {
        let mut chip8 = Chip8::new();
        chip8.load_rom(&[0x12, 0x00]).unwrap();
        let mut scheduler = Scheduler::new(&Config::default());
        let start = Instant::now();
        assert_eq!(scheduler.run_until(&mut chip8, start).unwrap(), Status::Ok);
        assert!(!chip8.reverse_cpu());
        scheduler
            .run_until(&mut chip8, start + Duration::from_millis(10))
            .unwrap();
        assert!(chip8.reverse_cpu());
    }
}
