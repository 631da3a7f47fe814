// SPDX-License-Identifier: MPL-2.0

//! Per-interval throughput from cumulative counters
//!
//! Rates are computed over the measured wall-clock time between two
//! successful samples rather than the nominal tick period, so a late or
//! skipped tick does not inflate the reported speed.

use super::counters::{CounterError, CounterSource, CumulativeCounters};
use std::time::{Duration, Instant};

/// Nominal period between two ticks.
pub const NOMINAL_TICK: Duration = Duration::from_secs(1);

/// Download and upload speed over one interval, in bytes per second.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IntervalRate {
    pub down_bytes_per_sec: f64,
    pub up_bytes_per_sec: f64,
}

impl IntervalRate {
    pub const ZERO: Self = Self {
        down_bytes_per_sec: 0.0,
        up_bytes_per_sec: 0.0,
    };

    /// Rate between two samples taken `elapsed` apart.
    ///
    /// A counter that went backwards yields zero for that direction. A zero
    /// interval is treated as one nominal tick.
    pub fn between(
        previous: CumulativeCounters,
        current: CumulativeCounters,
        elapsed: Duration,
    ) -> Self {
        let secs = if elapsed.is_zero() {
            NOMINAL_TICK
        } else {
            elapsed
        }
        .as_secs_f64();

        Self {
            down_bytes_per_sec: current
                .bytes_received
                .saturating_sub(previous.bytes_received) as f64
                / secs,
            up_bytes_per_sec: current.bytes_sent.saturating_sub(previous.bytes_sent) as f64
                / secs,
        }
    }
}

/// Owns the single retained "previous" sample.
pub struct SpeedSampler<C> {
    source: C,
    previous: CumulativeCounters,
    sampled_at: Instant,
}

impl<C: CounterSource> SpeedSampler<C> {
    /// Seeds the sampler with a first sample. Fails if the source is unavailable.
    pub fn initialize(source: C) -> Result<Self, CounterError> {
        Self::initialize_at(source, Instant::now())
    }

    pub fn initialize_at(mut source: C, now: Instant) -> Result<Self, CounterError> {
        let previous = source.sample()?;
        Ok(Self {
            source,
            previous,
            sampled_at: now,
        })
    }

    pub fn update(&mut self) -> Result<IntervalRate, CounterError> {
        self.update_at(Instant::now())
    }

    /// Takes a new sample and returns the rate since the previous one.
    ///
    /// The new sample always replaces the previous one, so a rollback is
    /// clamped exactly once. On error nothing is replaced and the next
    /// successful update measures over the whole gap.
    pub fn update_at(&mut self, now: Instant) -> Result<IntervalRate, CounterError> {
        let current = self.source.sample()?;
        let elapsed = now.saturating_duration_since(self.sampled_at);
        let rate = IntervalRate::between(self.previous, current, elapsed);

        self.previous = current;
        self.sampled_at = now;
        Ok(rate)
    }

    pub fn previous(&self) -> CumulativeCounters {
        self.previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speed::counters::ScriptedCounters;

    fn sampler(
        samples: impl IntoIterator<Item = Option<(u64, u64)>>,
    ) -> (SpeedSampler<ScriptedCounters>, Instant) {
        let start = Instant::now();
        let sampler = SpeedSampler::initialize_at(ScriptedCounters::new(samples), start)
            .expect("first sample seeds the sampler");
        (sampler, start)
    }

    #[test]
    fn rate_is_delta_over_one_second() {
        for (a, b) in [(0, 0), (0, 1), (1000, 151_000), (u64::MAX - 5, u64::MAX)] {
            let (mut sampler, start) = sampler([Some((a, a)), Some((b, b))]);
            let rate = sampler.update_at(start + Duration::from_secs(1)).unwrap();
            assert_eq!(rate.down_bytes_per_sec, (b - a) as f64);
            assert_eq!(rate.up_bytes_per_sec, (b - a) as f64);
        }
    }

    #[test]
    fn rollback_clamps_to_zero_once() {
        let (mut sampler, start) = sampler([
            Some((5000, 800)),
            Some((100, 900)),
            Some((1124, 1000)),
        ]);

        let rate = sampler.update_at(start + Duration::from_secs(1)).unwrap();
        assert_eq!(rate.down_bytes_per_sec, 0.0);
        assert_eq!(rate.up_bytes_per_sec, 100.0);
        assert_eq!(sampler.previous().bytes_received, 100);

        let rate = sampler.update_at(start + Duration::from_secs(2)).unwrap();
        assert_eq!(rate.down_bytes_per_sec, 1024.0);
    }

    #[test]
    fn measured_elapsed_scales_rate() {
        let (mut sampler, start) = sampler([Some((0, 0)), Some((4096, 2048))]);
        let rate = sampler.update_at(start + Duration::from_secs(2)).unwrap();
        assert_eq!(rate.down_bytes_per_sec, 2048.0);
        assert_eq!(rate.up_bytes_per_sec, 1024.0);
    }

    #[test]
    fn zero_elapsed_uses_nominal_tick() {
        let (mut sampler, start) = sampler([Some((0, 0)), Some((300, 0))]);
        let rate = sampler.update_at(start).unwrap();
        assert_eq!(rate.down_bytes_per_sec, 300.0);
    }

    #[test]
    fn failed_sample_keeps_previous_state() {
        let (mut sampler, start) = sampler([Some((1000, 500)), None, Some((3000, 500))]);

        assert!(matches!(
            sampler.update_at(start + Duration::from_secs(1)),
            Err(CounterError::NoInterfaces)
        ));
        assert_eq!(
            sampler.previous(),
            CumulativeCounters {
                bytes_received: 1000,
                bytes_sent: 500
            }
        );

        let rate = sampler.update_at(start + Duration::from_secs(2)).unwrap();
        assert_eq!(rate.down_bytes_per_sec, 1000.0);
        assert_eq!(rate.up_bytes_per_sec, 0.0);
    }

    #[test]
    fn unavailable_source_fails_initialization() {
        let result = SpeedSampler::initialize(ScriptedCounters::new([None]));
        assert!(matches!(result, Err(CounterError::NoInterfaces)));
    }
}
