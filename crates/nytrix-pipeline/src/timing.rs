//! Per-phase timing (`SPEC_FULL.md` §6): each stage records its own
//! [`Duration`]; `-vv`/`-vvv` print the resulting table. Backs the
//! "observable by phase timers" requirement of `spec.md` §8 scenario 8
//! (JIT cache hit).

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Assemble,
    Parse,
    Emit,
    Optimise,
    LinkOrJit,
}

impl Phase {
    fn label(self) -> &'static str {
        match self {
            Phase::Assemble => "assemble",
            Phase::Parse => "parse",
            Phase::Emit => "emit",
            Phase::Optimise => "optimise",
            Phase::LinkOrJit => "link/jit",
        }
    }
}

#[derive(Debug, Default)]
pub struct PhaseTimings(Vec<(Phase, Duration)>);

impl PhaseTimings {
    pub fn new() -> PhaseTimings {
        PhaseTimings(Vec::new())
    }

    pub fn time<T>(&mut self, phase: Phase, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let result = f();
        self.0.push((phase, start.elapsed()));
        result
    }

    pub fn print_table(&self) {
        for (phase, duration) in &self.0 {
            eprintln!("{:>10} {:>8.3}ms", phase.label(), duration.as_secs_f64() * 1000.0);
        }
    }

    pub fn total(&self) -> Duration {
        self.0.iter().map(|(_, d)| *d).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_records_one_entry_per_call() {
        let mut timings = PhaseTimings::new();
        timings.time(Phase::Assemble, || 1 + 1);
        timings.time(Phase::Parse, || ());
        assert_eq!(timings.0.len(), 2);
    }
}
