// SPDX-License-Identifier: MPL-2.0

//! Cumulative network byte counters
//!
//! Counters are summed over every interface sysinfo lists at sample time.
//! The interface list is re-read on each sample, so devices plugged in after
//! startup are counted. When an interface disappears or resets, its totals
//! leave the sum and it goes backwards; the sampler clamps that to zero.

use sysinfo::Networks;
use thiserror::Error;

/// Total bytes received and sent since an unspecified epoch (usually boot).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CumulativeCounters {
    pub bytes_received: u64,
    pub bytes_sent: u64,
}

#[derive(Debug, Error)]
pub enum CounterError {
    #[error("no network interface reports byte counters")]
    NoInterfaces,
}

/// Provider of cumulative byte totals, polled once per tick.
pub trait CounterSource {
    fn sample(&mut self) -> Result<CumulativeCounters, CounterError>;
}

/// Reads counters from the OS through sysinfo.
pub struct SysinfoCounters {
    networks: Networks,
}

impl SysinfoCounters {
    pub fn new() -> Self {
        Self {
            networks: Networks::new_with_refreshed_list(),
        }
    }
}

impl CounterSource for SysinfoCounters {
    fn sample(&mut self) -> Result<CumulativeCounters, CounterError> {
        // `refresh` alone keeps the interface set from startup.
        self.networks.refresh_list();

        let interfaces = self.networks.list();
        if interfaces.is_empty() {
            return Err(CounterError::NoInterfaces);
        }

        Ok(sum_counters(interfaces.values().map(|network| {
            (network.total_received(), network.total_transmitted())
        })))
    }
}

/// Adds up `(received, sent)` totals of several interfaces.
pub fn sum_counters(totals: impl IntoIterator<Item = (u64, u64)>) -> CumulativeCounters {
    totals
        .into_iter()
        .fold(CumulativeCounters::default(), |total, (received, sent)| {
            CumulativeCounters {
                bytes_received: total.bytes_received.saturating_add(received),
                bytes_sent: total.bytes_sent.saturating_add(sent),
            }
        })
}

/// Counter source replaying a fixed script of samples.
#[cfg(test)]
pub struct ScriptedCounters {
    samples: std::collections::VecDeque<Option<CumulativeCounters>>,
}

#[cfg(test)]
impl ScriptedCounters {
    /// `None` entries make the corresponding `sample` call fail.
    pub fn new(samples: impl IntoIterator<Item = Option<(u64, u64)>>) -> Self {
        Self {
            samples: samples
                .into_iter()
                .map(|sample| {
                    sample.map(|(bytes_received, bytes_sent)| CumulativeCounters {
                        bytes_received,
                        bytes_sent,
                    })
                })
                .collect(),
        }
    }
}

#[cfg(test)]
impl CounterSource for ScriptedCounters {
    fn sample(&mut self) -> Result<CumulativeCounters, CounterError> {
        self.samples
            .pop_front()
            .flatten()
            .ok_or(CounterError::NoInterfaces)
    }
}
