//! # Search monitors
//! Cooperative cancellation for the iterative solvers ([simulated annealing](crate::alg::anneal)
//! and [particle swarm](crate::alg::swarm)). A solver calls [Monitor::on_step] once per iteration
//! and stops as soon as [Monitor::search_command] asks it to, returning the best solution found
//! so far.
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Decision of a [Monitor] whether the search may go on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCommand {
    Continue,
    Terminate(String),
}

pub trait Monitor {
    /// Called once per solver iteration.
    fn on_step(&mut self) {}

    fn search_command(&self) -> SearchCommand;
}

/// Never interrupts the search.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbounded;

impl Monitor for Unbounded {
    #[inline]
    fn search_command(&self) -> SearchCommand {
        SearchCommand::Continue
    }
}

/// Terminates once a shared flag is raised, e.g. by another thread.
#[derive(Debug, Clone, Copy)]
pub struct InterruptMonitor<'a> {
    stop_flag: &'a AtomicBool,
}

impl<'a> InterruptMonitor<'a> {
    pub fn new(stop_flag: &'a AtomicBool) -> Self {
        Self { stop_flag }
    }
}

impl Monitor for InterruptMonitor<'_> {
    fn search_command(&self) -> SearchCommand {
        if self.stop_flag.load(Ordering::Relaxed) {
            SearchCommand::Terminate("interrupt signal received".to_string())
        } else {
            SearchCommand::Continue
        }
    }
}

/// Terminates once a wall-clock budget, measured from construction, is exhausted.
///
/// The clock is read only every `2^k` steps where the mask is `2^k - 1`.
#[derive(Debug, Clone)]
pub struct TimeLimitMonitor {
    time_limit: Duration,
    start: Instant,
    steps: u64,
    clock_check_mask: u64,
    expired: bool,
}

impl TimeLimitMonitor {
    const DEFAULT_CLOCK_CHECK_MASK: u64 = 0xFF;

    pub fn new(time_limit: Duration) -> Self {
        Self::with_clock_check_mask(time_limit, Self::DEFAULT_CLOCK_CHECK_MASK)
    }

    pub fn with_clock_check_mask(time_limit: Duration, clock_check_mask: u64) -> Self {
        Self {
            time_limit,
            start: Instant::now(),
            steps: 0,
            clock_check_mask,
            expired: time_limit.is_zero(),
        }
    }
}

impl Monitor for TimeLimitMonitor {
    fn on_step(&mut self) {
        self.steps = self.steps.wrapping_add(1);
        if !self.expired && (self.steps & self.clock_check_mask) == 0 {
            self.expired = self.start.elapsed() >= self.time_limit;
        }
    }

    fn search_command(&self) -> SearchCommand {
        if self.expired {
            SearchCommand::Terminate("time limit reached".to_string())
        } else {
            SearchCommand::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_continues() {
        let mut monitor = Unbounded;
        for _ in 0..1000 {
            monitor.on_step();
        }
        assert_eq!(monitor.search_command(), SearchCommand::Continue);
    }

    #[test]
    fn interrupt_flag() {
        let flag = AtomicBool::new(false);
        let monitor = InterruptMonitor::new(&flag);
        assert_eq!(monitor.search_command(), SearchCommand::Continue);

        flag.store(true, Ordering::Relaxed);
        assert!(matches!(
            monitor.search_command(),
            SearchCommand::Terminate(_)
        ));
    }

    #[test]
    fn zero_time_limit_terminates_immediately() {
        let monitor = TimeLimitMonitor::new(Duration::ZERO);
        assert_eq!(
            monitor.search_command(),
            SearchCommand::Terminate("time limit reached".to_string())
        );
    }

    #[test]
    fn time_limit_checks_clock_on_mask() {
        let mut monitor = TimeLimitMonitor::with_clock_check_mask(Duration::from_nanos(1), 0);
        std::thread::sleep(Duration::from_millis(1));
        assert_eq!(monitor.search_command(), SearchCommand::Continue);

        monitor.on_step();
        assert!(matches!(
            monitor.search_command(),
            SearchCommand::Terminate(_)
        ));
    }

    #[test]
    fn generous_time_limit_continues() {
        let mut monitor = TimeLimitMonitor::with_clock_check_mask(Duration::from_secs(3600), 0);
        monitor.on_step();
        assert_eq!(monitor.search_command(), SearchCommand::Continue);
    }
}
