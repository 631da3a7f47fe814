// SPDX-License-Identifier: MPL-2.0

//! Speed sampling, classification and formatting

pub mod classify;
pub mod counters;
pub mod format;
pub mod sampler;

pub use classify::{Rgb, SeverityTier, classify};
pub use counters::{CounterError, CounterSource, CumulativeCounters, SysinfoCounters};
pub use format::{FormattedSpeed, SpeedUnit, format_speed};
pub use sampler::{IntervalRate, NOMINAL_TICK, SpeedSampler};
